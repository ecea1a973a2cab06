//! Core runtime for Casement.
//!
//! This crate provides the pieces of the listener layer that know nothing
//! about windows:
//!
//! - **Consumer Scheduler**: the [`ConsumerScheduler`] seam through which
//!   events reach the single consumer thread
//! - **Consumer Loop**: a dedicated consumer thread fed by a bounded channel
//! - **Pumped Scheduler**: a queue drained by a host-owned event loop
//! - **Invocations**: queued work and completion pairs for blocking hand-off
//! - **Thread Affinity**: detecting calls made on the consumer thread
//! - **Logging**: `tracing` targets and span names
//!
//! # Example
//!
//! ```
//! use casement_core::{ConsumerScheduler, PumpedScheduler, QueuedInvocation};
//!
//! let scheduler = PumpedScheduler::new();
//! scheduler
//!     .post(QueuedInvocation::new(|| println!("delivered on the consumer thread")))
//!     .unwrap();
//!
//! assert_eq!(scheduler.process_pending(), 1);
//! ```

pub mod consumer;
mod error;
pub mod invocation;
pub mod logging;
pub mod scheduler;
mod task;
pub mod thread_check;

pub use consumer::{ConsumerLoop, ConsumerLoopBuilder, ConsumerLoopConfig};
pub use error::{Result, SchedulerError};
pub use invocation::{CompletionHandle, CompletionWaiter, QueuedInvocation, Task, completion_pair};
pub use scheduler::{ConsumerScheduler, InlineScheduler, call_blocking};
pub use task::{PumpedScheduler, TaskQueue};
pub use thread_check::ThreadAffinity;
