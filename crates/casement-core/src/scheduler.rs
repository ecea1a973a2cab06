//! The consumer scheduler seam.
//!
//! Listener events are produced on arbitrary native threads but must be
//! consumed on one designated thread. A [`ConsumerScheduler`] is the only
//! thing the listener layer knows about that thread: it can post a task in
//! FIFO order, and it can tell whether the caller is already on the
//! consumer thread.
//!
//! Two delivery modes are built on top of it, mirroring the connection types
//! of a signal/slot system:
//!
//! - **Queued**: [`ConsumerScheduler::post`]. Fire-and-forget, ordered.
//! - **Blocking**: [`call_blocking`]. The caller parks until the consumer has
//!   run the task and reads its result back. When the caller is already on
//!   the consumer thread the task runs inline, since waiting on itself would
//!   deadlock.
//!
//! # Deadlock Hazard
//!
//! A blocking hand-off has no timeout. If the consumer thread is itself
//! waiting on the thread that issued the blocking call, both threads hang.

use crate::error::{Result, SchedulerError};
use crate::invocation::{QueuedInvocation, Task};

/// A single-threaded consumer execution context.
pub trait ConsumerScheduler: Send + Sync {
    /// Post an ordered, fire-and-forget invocation.
    ///
    /// Invocations posted from one thread run in submission order.
    fn post(&self, invocation: QueuedInvocation) -> Result<()>;

    /// Whether the calling thread is the consumer thread.
    fn is_consumer_thread(&self) -> bool;

    /// Post a task and wait until it has run on the consumer thread.
    fn post_blocking(&self, task: Task) -> Result<()> {
        call_blocking(self, task)
    }
}

/// Run `f` on the consumer thread and return its result.
///
/// Runs inline if the caller is already on the consumer thread. Otherwise
/// posts the call and blocks until it completes.
///
/// # Errors
///
/// Returns the scheduler's error if it rejects the post, or
/// [`SchedulerError::TaskDropped`] if the task was discarded before running.
pub fn call_blocking<S, T, F>(scheduler: &S, f: F) -> Result<T>
where
    S: ConsumerScheduler + ?Sized,
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    if scheduler.is_consumer_thread() {
        tracing::trace!(
            target: crate::logging::targets::SCHEDULER,
            "blocking call issued on consumer thread, running inline"
        );
        return Ok(f());
    }

    let _span = tracing::trace_span!(crate::logging::span_names::BLOCKING_CALL).entered();
    let (invocation, waiter) = QueuedInvocation::blocking(f);
    scheduler.post(invocation)?;
    waiter.wait().ok_or(SchedulerError::TaskDropped)
}

/// A scheduler that runs every task immediately on the posting thread.
///
/// Suitable when native callbacks already arrive on the consumer thread, and
/// for tests that do not care about thread hand-off.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineScheduler;

impl ConsumerScheduler for InlineScheduler {
    fn post(&self, invocation: QueuedInvocation) -> Result<()> {
        invocation.execute();
        Ok(())
    }

    fn is_consumer_thread(&self) -> bool {
        true
    }
}

static_assertions::assert_obj_safe!(ConsumerScheduler);
