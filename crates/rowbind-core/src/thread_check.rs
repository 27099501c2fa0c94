//! Thread affinity verification for rowbind.
//!
//! List adapters and the sequences they observe belong to the UI thread.
//! Register that thread once with [`set_main_thread`]; objects created
//! afterwards bind to it through [`ThreadAffinity::main_thread`] no matter
//! which thread constructs them. Operations then call
//! [`ThreadAffinity::check`], which returns a [`WrongThreadError`] so the
//! caller can refuse the operation before any state is touched.
//!
//! Without a registration, objects bind to the thread that created them.
//!
//! # Usage
//!
//! ```
//! use rowbind_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.check("update").is_ok());
//!
//! let handle = std::thread::spawn(move || affinity.check("update").is_err());
//! assert!(handle.join().unwrap());
//! ```

use std::sync::OnceLock;
use std::thread::ThreadId;

use crate::error::WrongThreadError;

/// Global storage for the main (UI) thread ID.
static MAIN_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Record the current thread as the UI thread.
///
/// Call once at startup, from the UI thread. Calling again from the same
/// thread is harmless.
///
/// # Panics
///
/// Panics if a different thread was already registered.
pub fn set_main_thread() {
    let current = std::thread::current().id();
    if MAIN_THREAD_ID.set(current).is_err() && MAIN_THREAD_ID.get() != Some(&current) {
        panic!(
            "set_main_thread() called from different thread than original. \
             The main thread ID can only be set once."
        );
    }
}

/// Get the main thread ID if it has been set.
#[inline]
pub fn main_thread_id() -> Option<ThreadId> {
    MAIN_THREAD_ID.get().copied()
}

/// Thread affinity tracker.
///
/// Records the thread an object belongs to so later mutations can be
/// refused when they come from elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl ThreadAffinity {
    /// Create a new thread affinity tracker for the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// Create a tracker for the registered main thread.
    ///
    /// Falls back to the current thread if none is registered.
    pub fn main_thread() -> Self {
        main_thread_id()
            .map(|thread_id| Self { thread_id })
            .unwrap_or_else(Self::current)
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

    /// Verify the current thread, reporting a violation as an error.
    ///
    /// `operation` names what was attempted and ends up in the error message.
    pub fn check(&self, operation: &'static str) -> Result<(), WrongThreadError> {
        if self.is_same_thread() {
            return Ok(());
        }
        let current = std::thread::current();
        let err = WrongThreadError {
            operation,
            owner: self.thread_id,
            current: current.id(),
            current_name: current.name().unwrap_or("<unnamed>").to_string(),
        };
        tracing::error!(target: "rowbind_core::thread_check", %err, "thread affinity violation");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_affinity_same_thread() {
        let affinity = ThreadAffinity::current();
        assert!(affinity.is_same_thread());
        assert!(affinity.check("same thread").is_ok());
    }

    #[test]
    fn test_check_from_other_thread_returns_error() {
        let affinity = ThreadAffinity::current();
        let owner = std::thread::current().id();

        let err = std::thread::Builder::new()
            .name("worker".into())
            .spawn(move || affinity.check("push").unwrap_err())
            .unwrap()
            .join()
            .unwrap();

        assert_eq!(err.operation, "push");
        assert_eq!(err.owner, owner);
        assert_ne!(err.current, owner);
        assert_eq!(err.current_name, "worker");
        assert!(err.to_string().contains("push"));
    }

    #[test]
    fn test_main_thread_affinity_ignores_constructing_thread() {
        set_main_thread();
        set_main_thread();
        let main = std::thread::current().id();
        assert_eq!(main_thread_id(), Some(main));

        let (bound_to, worker_check_failed) = std::thread::spawn(|| {
            let affinity = ThreadAffinity::main_thread();
            (affinity.thread_id(), affinity.check("build").is_err())
        })
        .join()
        .unwrap();

        assert_eq!(bound_to, main);
        assert!(worker_check_failed);
    }

    #[test]
    fn test_thread_affinity_copy() {
        let affinity1 = ThreadAffinity::current();
        let affinity2 = affinity1;

        assert_eq!(affinity1.thread_id(), affinity2.thread_id());
        assert!(affinity2.is_same_thread());
    }
}
