//! Queued invocations and completion pairs for cross-thread hand-off.
//!
//! # How It Works
//!
//! 1. A producer thread wraps the work it wants to run on the consumer thread
//!    in a [`QueuedInvocation`] and posts it to a consumer scheduler.
//!
//! 2. For a blocking hand-off, the invocation is built with
//!    [`QueuedInvocation::blocking`], which also returns a
//!    [`CompletionWaiter`]. The producer parks on the waiter.
//!
//! 3. When the consumer runs the invocation, the result is written into the
//!    shared completion slot and the producer wakes up with it. If the
//!    invocation is dropped without running (the scheduler shut down with
//!    the task still queued), the producer wakes up with `None` instead of
//!    waiting forever.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

/// A type-erased unit of work for the consumer thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A deferred invocation that can be executed later on another thread.
pub struct QueuedInvocation {
    invoke: Task,
}

impl QueuedInvocation {
    /// Create a new fire-and-forget invocation.
    pub fn new<F>(invoke: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            invoke: Box::new(invoke),
        }
    }

    /// Create an invocation whose result is delivered to a waiter.
    pub fn blocking<T, F>(invoke: F) -> (Self, CompletionWaiter<T>)
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (handle, waiter) = completion_pair();
        let invocation = Self::new(move || handle.complete(invoke()));
        (invocation, waiter)
    }

    /// Execute the invocation.
    pub fn execute(self) {
        (self.invoke)();
    }

    /// Unwrap into the boxed task.
    pub fn into_task(self) -> Task {
        self.invoke
    }
}

impl std::fmt::Debug for QueuedInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedInvocation").finish_non_exhaustive()
    }
}

enum Slot<T> {
    Pending,
    Done(T),
    Abandoned,
}

struct CompletionState<T> {
    slot: Mutex<Slot<T>>,
    condvar: Condvar,
}

/// The sending half of a completion pair.
///
/// Dropping the handle without calling [`complete`](Self::complete) wakes the
/// waiter with `None`.
pub struct CompletionHandle<T> {
    inner: Option<Arc<CompletionState<T>>>,
}

impl<T> CompletionHandle<T> {
    /// Store the result and wake the waiter.
    pub fn complete(mut self, value: T) {
        if let Some(inner) = self.inner.take() {
            *inner.slot.lock() = Slot::Done(value);
            inner.condvar.notify_all();
        }
    }
}

impl<T> Drop for CompletionHandle<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            let mut slot = inner.slot.lock();
            if matches!(*slot, Slot::Pending) {
                *slot = Slot::Abandoned;
            }
            inner.condvar.notify_all();
        }
    }
}

/// The receiving half of a completion pair.
pub struct CompletionWaiter<T> {
    inner: Arc<CompletionState<T>>,
}

impl<T> CompletionWaiter<T> {
    /// Block until the handle completes or is dropped.
    ///
    /// Returns `None` if the handle was dropped without a value.
    ///
    /// # Warning
    ///
    /// Calling this on the thread that is supposed to run the matching
    /// invocation will deadlock. There is no timeout.
    pub fn wait(self) -> Option<T> {
        let mut slot = self.inner.slot.lock();
        while matches!(*slot, Slot::Pending) {
            self.inner.condvar.wait(&mut slot);
        }
        match std::mem::replace(&mut *slot, Slot::Abandoned) {
            Slot::Done(value) => Some(value),
            Slot::Pending | Slot::Abandoned => None,
        }
    }

    /// Whether a result (or abandonment) is already available.
    pub fn is_ready(&self) -> bool {
        !matches!(*self.inner.slot.lock(), Slot::Pending)
    }
}

/// Create a completion handle/waiter pair for blocking invocations.
pub fn completion_pair<T>() -> (CompletionHandle<T>, CompletionWaiter<T>) {
    let state = Arc::new(CompletionState {
        slot: Mutex::new(Slot::Pending),
        condvar: Condvar::new(),
    });

    (
        CompletionHandle {
            inner: Some(state.clone()),
        },
        CompletionWaiter { inner: state },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn test_execute() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = executed.clone();
        let invocation = QueuedInvocation::new(move || {
            executed_clone.store(true, Ordering::SeqCst);
        });

        invocation.execute();
        assert!(executed.load(Ordering::SeqCst));
    }

    #[test]
    fn test_completion_pair() {
        let (handle, waiter) = completion_pair();

        let thread = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            handle.complete(7);
        });

        assert_eq!(waiter.wait(), Some(7));
        thread.join().unwrap();
    }

    #[test]
    fn test_dropped_handle_wakes_waiter() {
        let (handle, waiter) = completion_pair::<bool>();

        let thread = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            drop(handle);
        });

        assert_eq!(waiter.wait(), None);
        thread.join().unwrap();
    }

    #[test]
    fn test_blocking_invocation() {
        let (invocation, waiter) = QueuedInvocation::blocking(|| "done".to_string());
        assert!(!waiter.is_ready());

        let thread = std::thread::spawn(move || invocation.execute());

        assert_eq!(waiter.wait().as_deref(), Some("done"));
        thread.join().unwrap();
    }

    #[test]
    fn test_dropped_blocking_invocation() {
        let (invocation, waiter) = QueuedInvocation::blocking(|| 1_u32);
        drop(invocation);
        assert!(waiter.is_ready());
        assert_eq!(waiter.wait(), None);
    }
}
