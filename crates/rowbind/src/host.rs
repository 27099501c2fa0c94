//! Boundary with the host toolkit.
//!
//! The adapter does not draw, measure or recycle anything itself. The host
//! list widget inflates rows, owns their view trees and receives change
//! notifications; an optional status surface (a toolbar, a header line)
//! shows the selection count. Both are expressed here as traits and are held
//! by the adapter through [`Weak`](std::sync::Weak) references only.

use serde::{Deserialize, Serialize};

/// Identifies a layout template. The view-kind of a position is the
/// `LayoutId` its item resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayoutId(pub u32);

/// Identifies which variable of a layout template receives the bound item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingSlot(pub u32);

/// Identifies a sub-view inside a row's view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

/// Reference to an icon resource understood by the status surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(pub String);

impl IconRef {
    /// Creates an icon reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the icon name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extra information attached to a partial redraw request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// The row's bindings were cancelled and must be fully re-bound.
    DataInvalidation,
    /// Host- or application-defined partial update marker.
    Custom(String),
}

/// Returns `true` when `payloads` only asks for pending bindings to be flushed.
///
/// An empty list, or any list containing [`Payload::DataInvalidation`],
/// requires a full bind instead.
pub fn is_binding_refresh(payloads: &[Payload]) -> bool {
    !payloads.is_empty() && !payloads.contains(&Payload::DataInvalidation)
}

/// A row created by the host for a given layout.
///
/// Implemented by the host toolkit's row/view-holder type.
pub trait RowView<T>: Send {
    /// The layout this row was inflated from.
    fn layout(&self) -> LayoutId;

    /// Assigns `item` to the layout variable `slot`.
    fn bind(&mut self, slot: BindingSlot, item: &T);

    /// Flushes bindings that were deferred by the host.
    fn execute_pending_bindings(&mut self) {}

    /// Whether the row's view tree contains a sub-view with this identifier.
    fn contains_view(&self, id: ViewId) -> bool;
}

/// The host list widget.
pub trait ListHost<T>: Send + Sync {
    /// Inflates a fresh row for `layout`.
    fn inflate(&self, layout: LayoutId) -> Box<dyn RowView<T>>;

    /// Whether the host is in the middle of a layout pass.
    fn is_computing_layout(&self) -> bool {
        false
    }

    /// Everything may have changed.
    fn notify_data_set_changed(&self);

    /// `count` items were inserted starting at `from`.
    fn notify_item_range_inserted(&self, from: usize, count: usize);

    /// `count` items were removed starting at `from`.
    fn notify_item_range_removed(&self, from: usize, count: usize);

    /// `count` items starting at `from` changed.
    fn notify_item_range_changed(&self, from: usize, count: usize, payload: Option<Payload>);

    /// The item at `from` now lives at `to`.
    fn notify_item_moved(&self, from: usize, to: usize);
}

/// A status surface that reflects the selection mode (usually a toolbar).
pub trait StatusSurface: Send + Sync {
    /// Sets or clears the subtitle.
    fn set_subtitle(&self, subtitle: Option<&str>);

    /// Sets the navigation icon.
    fn set_navigation_icon(&self, icon: &IconRef);
}
