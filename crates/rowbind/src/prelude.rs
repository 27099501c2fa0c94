//! Prelude module for rowbind.
//!
//! ```ignore
//! use rowbind::prelude::*;
//! ```

// ============================================================================
// Adapter
// ============================================================================

pub use crate::adapter::{AdapterBuilder, BindingAdapter};
pub use crate::error::{AdapterError, Result};

// ============================================================================
// Model
// ============================================================================

pub use crate::model::{
    AdapterItem, BindInfo, ItemSource, ObservableList, PresentationMap, SelectionMode, TaggedItem,
    ViewTarget,
};

// ============================================================================
// Host boundary
// ============================================================================

pub use crate::host::{BindingSlot, IconRef, LayoutId, ListHost, Payload, RowView, StatusSurface, ViewId};

// ============================================================================
// Settings and saved state
// ============================================================================

pub use crate::settings::AdapterSettings;
pub use crate::state::{STATE_SELECTED_ITEMS, StateBundle};
