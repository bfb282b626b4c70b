use std::time::Duration;

use tokio::time::{sleep_until, Instant};

/// Trailing-edge debounce holding at most one pending value
///
/// Each [`Debounce::push`] replaces the pending value and restarts the quiet
/// interval. [`Debounce::ready`] resolves once the interval elapses without a
/// new push. Time comes from tokio, so a paused test clock drives it.
#[derive(Debug)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    value: T,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some(Pending {
            deadline: Instant::now() + self.delay,
            value,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Waits for the pending value to settle
    ///
    /// Never resolves while nothing is pending. Cancel safe: dropping the
    /// future keeps the pending value.
    pub async fn ready(&mut self) -> Option<T> {
        let deadline = match &self.pending {
            Some(pending) => pending.deadline,
            None => return std::future::pending().await,
        };
        sleep_until(deadline).await;
        self.pending.take().map(|pending| pending.value)
    }
}
