//! Logging facilities for rowbind.
//!
//! rowbind uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("rowbind=debug")
//!     .init();
//! ```
//!
//! Each subsystem logs under its own target (`rowbind::adapter`,
//! `rowbind::selection`, `rowbind::observer`, `rowbind::presentation`,
//! `rowbind_core::signal`) so they can be filtered independently, for
//! example `rowbind::selection=trace`.

/// Span names used for performance tracing.
pub mod span_names {
    /// Full row bind.
    pub const BIND: &str = "rowbind::bind";
    /// Deleting the selected items from the backing sequence.
    pub const DELETE_SELECTED: &str = "rowbind::delete_selected";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Useful for measuring how long an operation took.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "rowbind::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::BIND);
        tracing::trace!(target: "rowbind_core", "inside perf span");
    }
}
