//! Cooperative cancellation handle
//!
//! Every store and controller operation takes a [`CancelToken`]. Operations
//! check the token at each blocking boundary and at the top of every
//! optimistic retry iteration, so a cancelled caller stops retrying
//! immediately instead of looping until it wins.
//!
//! Tokens are cheap to clone; clones share the same flag. A deadline, if
//! set, trips the token without anyone calling [`CancelToken::cancel`].

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared cancellation flag with an optional deadline
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Create a token that never trips unless [`cancel`](Self::cancel) is called
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that trips automatically after `timeout`
    pub fn with_deadline(timeout: Duration) -> Self {
        CancelToken {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                deadline: Some(Instant::now() + timeout),
            }),
        }
    }

    /// Trip the token
    ///
    /// Idempotent; all clones observe the cancellation.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether the token has been tripped or its deadline passed
    pub fn is_cancelled(&self) -> bool {
        if self.inner.cancelled.load(Ordering::SeqCst) {
            return true;
        }
        match self.inner.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    /// Fail fast if cancelled
    ///
    /// Returns `Err(Error::Cancelled)` if the token is tripped, `Ok(())`
    /// otherwise. Call sites use `cancel.check()?` at blocking boundaries.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}
