//! Host-driven task queue.
//!
//! [`PumpedScheduler`] is a [`ConsumerScheduler`] for hosts that already own
//! an event loop: producers post into a shared queue and the host drains it
//! from its own thread by calling [`PumpedScheduler::process_pending`] (or
//! [`process_batch`](PumpedScheduler::process_batch) to bound the work done
//! per iteration). The thread that creates the scheduler is the consumer
//! thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::{Result, SchedulerError};
use crate::invocation::QueuedInvocation;
use crate::logging::targets;
use crate::scheduler::ConsumerScheduler;
use crate::thread_check::ThreadAffinity;

/// Default number of tasks processed per batch.
const DEFAULT_BATCH_SIZE: usize = 10;

/// A FIFO queue of pending invocations.
#[derive(Debug)]
pub struct TaskQueue {
    tasks: VecDeque<QueuedInvocation>,
    /// Maximum number of tasks to process per batch.
    batch_size: usize,
}

impl TaskQueue {
    /// Create a new task queue.
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Create a new task queue with a custom batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            batch_size: batch_size.max(1),
        }
    }

    /// Append an invocation.
    pub fn push(&mut self, invocation: QueuedInvocation) {
        self.tasks.push_back(invocation);
    }

    /// Take the oldest invocation.
    pub fn pop(&mut self) -> Option<QueuedInvocation> {
        self.tasks.pop_front()
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// The configured batch size.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Set the batch size.
    pub fn set_batch_size(&mut self, size: usize) {
        self.batch_size = size.max(1);
    }

    /// Discard all pending tasks.
    ///
    /// Returns the number of tasks discarded.
    pub fn clear(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A scheduler whose queue is drained explicitly by the host.
///
/// Tasks never run while the queue lock is held, so a running task may post
/// further tasks; those run in a later pass.
#[derive(Debug)]
pub struct PumpedScheduler {
    queue: Mutex<TaskQueue>,
    affinity: ThreadAffinity,
    shut_down: AtomicBool,
}

impl PumpedScheduler {
    /// Create a scheduler bound to the current thread.
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    /// Create a scheduler bound to the current thread with a batch size.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            queue: Mutex::new(TaskQueue::with_batch_size(batch_size)),
            affinity: ThreadAffinity::current(),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.queue.lock().pending_count()
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        self.queue.lock().has_pending()
    }

    /// Run up to one batch of tasks.
    ///
    /// Returns the number of tasks processed.
    pub fn process_batch(&self) -> usize {
        let limit = self.queue.lock().batch_size();
        self.process_up_to(limit)
    }

    /// Run every pending task, including ones posted while processing.
    ///
    /// Returns the number of tasks processed.
    pub fn process_pending(&self) -> usize {
        self.process_up_to(usize::MAX)
    }

    fn process_up_to(&self, limit: usize) -> usize {
        self.affinity.assert_same_thread();
        let mut count = 0;
        while count < limit {
            // Release the lock before running so the task can post.
            let Some(invocation) = self.queue.lock().pop() else {
                break;
            };
            invocation.execute();
            count += 1;
        }
        count
    }

    /// Reject further posts and discard queued tasks.
    ///
    /// Blocking callers waiting on a discarded task are woken with
    /// [`SchedulerError::TaskDropped`].
    pub fn shutdown(&self) {
        self.shut_down.store(true, Ordering::Release);
        let dropped = self.queue.lock().clear();
        tracing::debug!(target: targets::SCHEDULER, dropped, "pumped scheduler shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }
}

impl Default for PumpedScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsumerScheduler for PumpedScheduler {
    fn post(&self, invocation: QueuedInvocation) -> Result<()> {
        if self.is_shut_down() {
            return Err(SchedulerError::ShutDown);
        }
        self.queue.lock().push(invocation);
        Ok(())
    }

    fn is_consumer_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }
}
