//! Error types for rowbind-core.

use std::thread::ThreadId;

/// An operation that requires UI-thread affinity was attempted elsewhere.
///
/// Returned by [`ThreadAffinity::check`](crate::thread_check::ThreadAffinity::check).
/// This always indicates a programming error in the caller; nothing was
/// modified when it is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{operation} must run on the thread that owns it (owner: {owner:?}, current: {current_name} {current:?})"
)]
pub struct WrongThreadError {
    /// The operation that was rejected.
    pub operation: &'static str,
    /// Thread that owns the object.
    pub owner: ThreadId,
    /// Thread the operation was attempted on.
    pub current: ThreadId,
    /// Name of the current thread, or `<unnamed>`.
    pub current_name: String,
}

/// A specialized Result type for rowbind-core operations.
pub type Result<T> = std::result::Result<T, WrongThreadError>;
