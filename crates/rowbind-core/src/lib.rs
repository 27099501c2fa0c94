//! Core systems for rowbind.
//!
//! This crate provides the foundation the list adapter is built on:
//!
//! - **Signal/Slot System**: observer primitive used for change notification
//! - **Thread Affinity**: UI-thread tracking and fallible affinity checks
//! - **Logging**: tracing targets and span helpers
//!
//! # Signal/Slot Example
//!
//! ```
//! use rowbind_core::Signal;
//!
//! let value_changed = Signal::<i32>::new();
//! let conn_id = value_changed.connect(|value| {
//!     println!("Value changed to: {}", value);
//! });
//!
//! value_changed.emit(42);
//! value_changed.disconnect(conn_id);
//! ```

mod error;
pub mod logging;
pub mod signal;
pub mod thread_check;

pub use error::{Result, WrongThreadError};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};
pub use thread_check::ThreadAffinity;
