//! A dedicated consumer thread with its own task queue.
//!
//! `ConsumerLoop` owns one thread that drains a bounded channel of
//! [`QueuedInvocation`]s in FIFO order. It is the stock
//! [`ConsumerScheduler`] for hosts that do not bring their own event loop.
//!
//! # Example
//!
//! ```
//! use casement_core::consumer::ConsumerLoop;
//! use casement_core::scheduler::call_blocking;
//!
//! let consumer = ConsumerLoop::builder().name("ui-consumer").build().unwrap();
//!
//! let answer = call_blocking(&consumer, || 6 * 7).unwrap();
//! assert_eq!(answer, 42);
//!
//! consumer.stop_and_join();
//! ```
//!
//! # Shutdown
//!
//! [`ConsumerLoop::stop`] rejects new posts immediately. Tasks that were
//! already queued still run before the thread exits, so nothing posted before
//! `stop` is lost.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use parking_lot::Mutex;

use crate::error::{Result, SchedulerError};
use crate::invocation::QueuedInvocation;
use crate::logging::targets;
use crate::scheduler::ConsumerScheduler;
use crate::thread_check::ThreadAffinity;

/// Default capacity for the consumer's task queue.
const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Configuration for creating a ConsumerLoop.
#[derive(Debug, Clone)]
pub struct ConsumerLoopConfig {
    /// Name for the consumer thread.
    pub name: String,
    /// Stack size for the consumer thread in bytes. `None` uses the default.
    pub stack_size: Option<usize>,
    /// Capacity of the task queue.
    pub queue_capacity: usize,
}

impl Default for ConsumerLoopConfig {
    fn default() -> Self {
        Self {
            name: "casement-consumer".to_string(),
            stack_size: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl ConsumerLoopConfig {
    /// Create a new configuration with the given thread name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Builder for creating ConsumerLoops with custom configuration.
#[derive(Debug, Default)]
pub struct ConsumerLoopBuilder {
    config: ConsumerLoopConfig,
}

impl ConsumerLoopBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set the stack size for the consumer thread.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Set the task queue capacity.
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Build and start the consumer loop.
    pub fn build(self) -> std::io::Result<ConsumerLoop> {
        ConsumerLoop::with_config(self.config)
    }
}

/// State shared between the handle and the consumer thread.
struct LoopState {
    running: AtomicBool,
    pending_tasks: AtomicUsize,
}

enum LoopMessage {
    Run(QueuedInvocation),
    Shutdown,
}

/// A dedicated consumer thread processing tasks sequentially.
///
/// `ConsumerLoop` is `Send + Sync`; any number of producer threads may post
/// to it concurrently.
pub struct ConsumerLoop {
    sender: Sender<LoopMessage>,
    handle: Mutex<Option<JoinHandle<()>>>,
    state: Arc<LoopState>,
    affinity: ThreadAffinity,
    capacity: usize,
}

impl ConsumerLoop {
    /// Create a builder.
    pub fn builder() -> ConsumerLoopBuilder {
        ConsumerLoopBuilder::new()
    }

    /// Start a consumer loop with default configuration.
    pub fn new() -> std::io::Result<Self> {
        Self::with_config(ConsumerLoopConfig::default())
    }

    /// Start a consumer loop with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn with_config(config: ConsumerLoopConfig) -> std::io::Result<Self> {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        let state = Arc::new(LoopState {
            running: AtomicBool::new(true),
            pending_tasks: AtomicUsize::new(0),
        });

        let thread_state = state.clone();
        let mut builder = thread::Builder::new().name(config.name.clone());
        if let Some(stack_size) = config.stack_size {
            builder = builder.stack_size(stack_size);
        }

        let handle = builder.spawn(move || {
            consumer_loop(receiver, &thread_state);
            thread_state.running.store(false, Ordering::Release);
        })?;
        let affinity = ThreadAffinity::for_thread(handle.thread().id());

        tracing::debug!(
            target: targets::SCHEDULER,
            name = %config.name,
            capacity,
            "consumer loop started"
        );

        Ok(Self {
            sender,
            handle: Mutex::new(Some(handle)),
            state,
            affinity,
            capacity,
        })
    }

    /// Check if the loop still accepts tasks.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// Get the number of tasks queued but not yet run.
    pub fn pending_tasks(&self) -> usize {
        self.state.pending_tasks.load(Ordering::Acquire)
    }

    /// The consumer thread's affinity.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Request the loop to stop after draining queued tasks.
    ///
    /// Non-blocking. New posts are rejected from this point on.
    pub fn stop(&self) {
        if self.state.running.swap(false, Ordering::AcqRel) {
            tracing::debug!(target: targets::SCHEDULER, "consumer loop stopping");
        }
        // The channel may be full; the loop also exits once all senders drop.
        let _ = self.sender.try_send(LoopMessage::Shutdown);
    }

    /// Wait for the consumer thread to finish.
    ///
    /// Returns `true` if the thread was joined successfully, `false` if
    /// already joined, if it panicked, or if called from the consumer thread.
    pub fn join(&self) -> bool {
        if self.affinity.is_same_thread() {
            return false;
        }
        let mut handle = self.handle.lock();
        if let Some(h) = handle.take() {
            h.join().is_ok()
        } else {
            false
        }
    }

    /// Stop the loop and wait for it to finish.
    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }
}

impl ConsumerScheduler for ConsumerLoop {
    fn post(&self, invocation: QueuedInvocation) -> Result<()> {
        if !self.is_running() {
            return Err(SchedulerError::ShutDown);
        }

        self.state.pending_tasks.fetch_add(1, Ordering::AcqRel);

        match self.sender.try_send(LoopMessage::Run(invocation)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                self.state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
                Err(SchedulerError::queue_full(self.capacity))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
                Err(SchedulerError::ShutDown)
            }
        }
    }

    fn is_consumer_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }
}

impl Drop for ConsumerLoop {
    fn drop(&mut self) {
        self.stop();
        // Don't block in drop - just request shutdown
    }
}

impl std::fmt::Debug for ConsumerLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerLoop")
            .field("running", &self.is_running())
            .field("pending_tasks", &self.pending_tasks())
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// The main loop that processes tasks.
fn consumer_loop(receiver: Receiver<LoopMessage>, state: &LoopState) {
    while let Ok(message) = receiver.recv() {
        match message {
            LoopMessage::Run(invocation) => {
                invocation.execute();
                state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
                // The shutdown message is lost if `stop` found the queue full.
                if !state.running.load(Ordering::Acquire) {
                    drain(&receiver, state);
                    break;
                }
            }
            LoopMessage::Shutdown => {
                drain(&receiver, state);
                break;
            }
        }
    }
    tracing::debug!(target: targets::SCHEDULER, "consumer loop exited");
}

/// Process remaining tasks before exiting.
fn drain(receiver: &Receiver<LoopMessage>, state: &LoopState) {
    while let Ok(message) = receiver.try_recv() {
        if let LoopMessage::Run(invocation) = message {
            invocation.execute();
            state.pending_tasks.fetch_sub(1, Ordering::AcqRel);
        }
    }
}

static_assertions::assert_impl_all!(ConsumerLoop: Send, Sync);
