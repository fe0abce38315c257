//! Cancelable delay — run an action once after a duration, unless canceled first.
//!
//! [`arm`] spawns a task that sleeps until the deadline and then runs the
//! action. Firing and canceling race on a single atomic state word, so
//! exactly one of them wins: once [`DelayHandle::cancel`] returns `true`
//! the action is guaranteed never to run, and once the action has started
//! `cancel` is a no-op.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

const PENDING: u8 = 0;
const FIRED: u8 = 1;
const CANCELED: u8 = 2;

/// Stand-in deadline for durations too long to represent.
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// Handle to an armed delay.
///
/// Dropping the handle does **not** cancel the delay.
#[derive(Debug)]
pub struct DelayHandle {
    state: Arc<AtomicU8>,
    task: JoinHandle<()>,
}

/// Schedule `action` to run once, `duration` from now, on a spawned task.
///
/// The deadline is fixed at call time. A zero duration fires as soon as the
/// runtime schedules the task; a duration past what [`Instant`] can hold
/// never fires. Must be called from within a tokio runtime.
pub fn arm<F>(duration: Duration, action: F) -> DelayHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let now = Instant::now();
    let deadline = now
        .checked_add(duration)
        .unwrap_or_else(|| now + FAR_FUTURE);
    let state = Arc::new(AtomicU8::new(PENDING));

    let task = tokio::spawn({
        let state = Arc::clone(&state);
        async move {
            tokio::time::sleep_until(deadline).await;
            if state
                .compare_exchange(PENDING, FIRED, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                action.await;
            }
        }
    });

    DelayHandle { state, task }
}

impl DelayHandle {
    /// Cancel the delay.
    ///
    /// Returns `true` if this call prevented the action from running, and
    /// `false` if the delay had already fired or was already canceled.
    pub fn cancel(&self) -> bool {
        let won = self
            .state
            .compare_exchange(PENDING, CANCELED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.task.abort();
        }
        won
    }
}
