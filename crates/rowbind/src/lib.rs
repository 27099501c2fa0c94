//! rowbind - a declarative adapter for scrollable list widgets.
//!
//! The crate maps heterogeneous items to row layouts, dispatches press and
//! long-press gestures to handlers, and implements a multi-select mode whose
//! state survives a teardown/recreate cycle. Rendering, measuring and
//! recycling rows stay with the host toolkit, which talks to the adapter
//! through the traits in [`host`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use rowbind::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Contact(String);
//!
//! impl TaggedItem for Contact {
//!     type Tag = ();
//!     fn tag(&self) {}
//! }
//!
//! let contacts = Arc::new(ObservableList::new(vec![Contact("Ada".into())]));
//! let adapter = BindingAdapter::builder(contacts.clone())
//!     .map((), LayoutId(1), BindingSlot(1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(adapter.item_count(), 1);
//! assert_eq!(adapter.item_view_kind(0).unwrap(), LayoutId(1));
//! ```

pub mod adapter;
pub mod error;
pub mod host;
pub mod model;
pub mod prelude;
pub mod settings;
pub mod state;

pub use adapter::{AdapterBuilder, BindingAdapter};
pub use error::{AdapterError, Result};
pub use host::{BindingSlot, IconRef, LayoutId, ListHost, Payload, RowView, StatusSurface, ViewId};
pub use settings::{AdapterSettings, SelectionChrome};
pub use state::{STATE_SELECTED_ITEMS, StateBundle};

pub use rowbind_core::{Signal, WrongThreadError, thread_check};
