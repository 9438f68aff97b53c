//! Contention scaling benchmarks
//!
//! Measures how each strategy scales as writers pile onto one row:
//! - Version retry: optimistic, wasted cycles grow with contention
//! - Row lock: pessimistic, writers serialize on the lock
//! - Timestamp retry: optimistic, same shape as version retry
//!
//! Run with: cargo bench --bench contention

use chrono::Utc;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use tally::{CancelToken, Controller, Increment, MemStore, RecordId, RecordStore, StoreConfig, TallyRecord};

const ITERATIONS_PER_THREAD: usize = 200;

fn seeded_store() -> (Arc<MemStore>, RecordId) {
    let store = Arc::new(MemStore::with_config(
        StoreConfig::new().with_timestamp_resolution(Duration::from_micros(1)),
    ));
    let id = RecordId::new();
    store
        .insert(
            &CancelToken::new(),
            TallyRecord::new(id, "contested", "nobody", Utc::now()),
        )
        .unwrap();
    (store, id)
}

fn bench_strategy(
    c: &mut Criterion,
    name: &str,
    make: fn(Arc<MemStore>) -> Controller<MemStore>,
) {
    let mut group = c.benchmark_group(format!("contention/{name}"));
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(ITERATIONS_PER_THREAD as u64));

    for threads in [1, 2, 4, 8] {
        group.bench_function(BenchmarkId::new("increments", threads), |b| {
            b.iter(|| {
                let (store, id) = seeded_store();
                let controller = Arc::new(make(Arc::clone(&store)));

                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let controller = Arc::clone(&controller);
                        std::thread::spawn(move || {
                            let cancel = CancelToken::new();
                            for _ in 0..ITERATIONS_PER_THREAD {
                                controller.increment(&cancel, &id, 1).unwrap();
                            }
                        })
                    })
                    .collect();

                for h in handles {
                    h.join().unwrap();
                }

                let record = store.get(&CancelToken::new(), &id).unwrap();
                assert_eq!(record.count, (threads * ITERATIONS_PER_THREAD) as i64);
            });
        });
    }

    group.finish();
}

fn bench_version_retry(c: &mut Criterion) {
    bench_strategy(c, "version_retry", Controller::version_retry);
}

fn bench_row_lock(c: &mut Criterion) {
    bench_strategy(c, "row_lock", Controller::row_lock);
}

fn bench_timestamp_retry(c: &mut Criterion) {
    bench_strategy(c, "timestamp_retry", Controller::timestamp_retry);
}

criterion_group!(
    benches,
    bench_version_retry,
    bench_row_lock,
    bench_timestamp_retry
);
criterion_main!(benches);
