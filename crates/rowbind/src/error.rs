//! Error types for the list adapter.

use rowbind_core::WrongThreadError;

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors that can occur while configuring or driving an adapter.
///
/// Apart from [`AdapterError::State`] and [`AdapterError::Settings`], every
/// variant reports a programming mistake; none of them are worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The item's tag has no registered presentation entry.
    #[error("no presentation registered for item tag {tag} (position {position:?})")]
    UnmappedType {
        tag: String,
        position: Option<usize>,
    },

    /// The variant selector chose a layout index that does not exist.
    #[error("variant selector for tag {tag} returned {variant}, but only {layout_count} layouts are registered")]
    InvalidVariant {
        tag: String,
        variant: usize,
        layout_count: usize,
    },

    /// A UI-thread-only operation was attempted from another thread.
    #[error(transparent)]
    WrongThread(#[from] WrongThreadError),

    /// A position outside the backing sequence was requested.
    #[error("position {position} is out of range for a sequence of {len} items")]
    PositionOutOfRange { position: usize, len: usize },

    /// The operation needs a host list widget, but none is attached (or it was dropped).
    #[error("adapter is not attached to a live host list")]
    NotAttached,

    /// A layout was registered without a binding slot and no default slot was configured.
    #[error("layout registered for tag {tag} without a binding slot, and no default slot was set")]
    MissingBindingSlot { tag: String },

    /// Saved state could not be encoded or decoded.
    #[error("saved state error: {0}")]
    State(#[from] serde_json::Error),

    /// Settings could not be read or parsed.
    #[error("settings error: {0}")]
    Settings(String),
}

impl AdapterError {
    /// Create an unmapped-type error for a tag.
    pub fn unmapped(tag: impl std::fmt::Debug, position: Option<usize>) -> Self {
        Self::UnmappedType {
            tag: format!("{tag:?}"),
            position,
        }
    }

    /// Create a settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }
}

impl From<toml::de::Error> for AdapterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Settings(err.to_string())
    }
}
