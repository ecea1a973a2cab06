//! Thread affinity tracking for the consumer thread.
//!
//! Schedulers record the thread that consumes their tasks so that a blocking
//! hand-off issued from that very thread can run inline instead of waiting on
//! itself.
//!
//! ```
//! use casement_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.is_same_thread());
//!
//! let other = std::thread::spawn(move || affinity.is_same_thread())
//!     .join()
//!     .unwrap();
//! assert!(!other);
//! ```

use std::thread::ThreadId;

/// Records the thread an object is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Create a tracker bound to an explicit thread.
    #[inline]
    pub fn for_thread(thread_id: ThreadId) -> Self {
        Self { thread_id }
    }

    /// Get the thread ID this affinity is bound to.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Check if the current thread matches this affinity.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Assert that the current thread matches this affinity.
    ///
    /// # Panics
    ///
    /// Panics if called from a different thread.
    #[track_caller]
    pub fn assert_same_thread(&self) {
        if !self.is_same_thread() {
            panic!(
                "Thread affinity violation: expected thread {:?}, but called from {:?}",
                self.thread_id,
                std::thread::current().id()
            );
        }
    }
}
