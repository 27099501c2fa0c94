//! Model side of the adapter.
//!
//! These types hold everything the adapter knows about items, independent
//! of any host toolkit:
//!
//! - `PresentationMap`: which layout and binding slot an item uses
//! - `SelectionState`: the multi-select state machine
//! - `HandlerTable`, `RowHandle`: gesture handlers and the rows they attach to
//! - `ItemSource`, `ObservableList`: the backing sequence and its change signals
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────────┐  signals   ┌────────────────┐  notify_*  ┌────────────┐
//! │ ObservableList │──────────> │ BindingAdapter │──────────> │  ListHost  │
//! │  (ItemSource)  │            │                │ <──────────│            │
//! └────────────────┘            └────────────────┘  bind/click└────────────┘
//!                                 │            │
//!                 ┌───────────────┘            └──────────────┐
//!                 v                                           v
//!       ┌──────────────────┐                        ┌──────────────────┐
//!       │ PresentationMap  │                        │  SelectionState  │
//!       └──────────────────┘                        └──────────────────┘
//! ```

pub mod dispatch;
pub mod observable;
pub mod presentation;
pub mod selection;

pub use dispatch::{BindHandler, BindInfo, ClickHandler, HandlerTable, RefreshHandler, RowHandle, ViewTarget};
pub use observable::{ItemSource, ListSignals, ObservableList};
pub use presentation::{
    AdapterItem, PresentationEntry, PresentationMap, PresentationMapBuilder, Resolved, TaggedItem,
    VariantSelector,
};
pub use selection::{Invalidation, SelectionMode, SelectionState, Transition};
