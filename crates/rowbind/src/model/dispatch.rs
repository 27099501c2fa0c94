//! Gesture handler tables and row handles.
//!
//! Handlers are registered per [`ViewTarget`]: either the whole row or a
//! sub-view found by identifier inside the row's view tree. When a row is
//! bound, the adapter records which targets actually exist in that row;
//! targets that cannot be found are skipped without error.

use std::fmt;
use std::sync::Arc;

use crate::host::{LayoutId, RowView, ViewId};

/// Where a gesture handler is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewTarget {
    /// The row's root view.
    Row,
    /// A sub-view of the row, looked up by identifier.
    Child(ViewId),
}

/// Press and long-press handler: `(item, row, position)`.
pub type ClickHandler<T> = Arc<dyn Fn(&T, &dyn RowView<T>, usize) + Send + Sync>;

/// Called after every full bind.
pub type BindHandler<T> = Arc<dyn Fn(&T, &dyn RowView<T>, BindInfo) + Send + Sync>;

/// Called after selection gestures so the application can refresh its chrome.
pub type RefreshHandler = Arc<dyn Fn() + Send + Sync>;

/// Context passed to the bind handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindInfo {
    /// Adapter position of the row.
    pub position: usize,
    /// Whether the selection feature is enabled for this adapter.
    pub selection_enabled: bool,
    /// Whether selection mode is currently engaged.
    pub selection_active: bool,
    /// Whether the bound item is in the selection set.
    pub selected: bool,
}

/// Ordered `ViewTarget → handler` table.
///
/// Registering a target twice replaces the first handler but keeps its
/// original slot in the iteration order.
pub struct HandlerTable<H> {
    entries: Vec<(ViewTarget, H)>,
}

impl<H> Default for HandlerTable<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Clone> Clone for HandlerTable<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H> fmt::Debug for HandlerTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(target, _)| target))
            .finish()
    }
}

impl<H> HandlerTable<H> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `target`, returning the handler it replaced.
    pub fn insert(&mut self, target: ViewTarget, handler: H) -> Option<H> {
        match self.entries.iter_mut().find(|(t, _)| *t == target) {
            Some((_, existing)) => Some(std::mem::replace(existing, handler)),
            None => {
                self.entries.push((target, handler));
                None
            }
        }
    }

    /// The handler registered for `target`.
    pub fn get(&self, target: ViewTarget) -> Option<&H> {
        self.entries
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, handler)| handler)
    }

    /// Iterates over registrations in order.
    pub fn iter(&self) -> impl Iterator<Item = (ViewTarget, &H)> {
        self.entries.iter().map(|(target, handler)| (*target, handler))
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Targets of this table that exist in `view`, in registration order.
    pub fn resolve<T>(&self, view: &dyn RowView<T>) -> Vec<ViewTarget> {
        self.entries
            .iter()
            .map(|(target, _)| *target)
            .filter(|target| match target {
                ViewTarget::Row => true,
                ViewTarget::Child(id) => view.contains_view(*id),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct BoundRow {
    pub(crate) position: Option<usize>,
    pub(crate) clicks: Vec<ViewTarget>,
    pub(crate) long_clicks: Vec<ViewTarget>,
}

/// A row created by the adapter and handed back to it for binding and
/// gesture dispatch.
pub struct RowHandle<T> {
    view: Box<dyn RowView<T>>,
    kind: LayoutId,
    pub(crate) bound: Option<BoundRow>,
}

impl<T> fmt::Debug for RowHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowHandle")
            .field("kind", &self.kind)
            .field("bound", &self.bound)
            .finish_non_exhaustive()
    }
}

impl<T> RowHandle<T> {
    pub(crate) fn new(view: Box<dyn RowView<T>>, kind: LayoutId) -> Self {
        Self {
            view,
            kind,
            bound: None,
        }
    }

    /// The host row.
    pub fn view(&self) -> &dyn RowView<T> {
        self.view.as_ref()
    }

    /// The host row, mutably.
    pub fn view_mut(&mut self) -> &mut dyn RowView<T> {
        self.view.as_mut()
    }

    /// The view-kind this row was created for.
    pub fn kind(&self) -> LayoutId {
        self.kind
    }

    /// Adapter position of the last bind, if the row is still bound.
    pub fn position(&self) -> Option<usize> {
        self.bound.as_ref().and_then(|bound| bound.position)
    }

    /// Marks the row as no longer having an adapter position.
    ///
    /// Hosts call this when the row is scrapped or its item is removed;
    /// gestures on it are then ignored.
    pub fn invalidate_position(&mut self) {
        if let Some(bound) = self.bound.as_mut() {
            bound.position = None;
        }
    }

    /// Whether a handler for `target` was attached at the last bind.
    pub fn has_click_target(&self, target: ViewTarget) -> bool {
        self.bound
            .as_ref()
            .is_some_and(|bound| bound.clicks.contains(&target))
    }

    /// Whether a long-press handler for `target` was attached at the last bind.
    pub fn has_long_click_target(&self, target: ViewTarget) -> bool {
        self.bound
            .as_ref()
            .is_some_and(|bound| bound.long_clicks.contains(&target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::BindingSlot;

    struct FakeRow {
        children: Vec<ViewId>,
    }

    impl RowView<u32> for FakeRow {
        fn layout(&self) -> LayoutId {
            LayoutId(1)
        }

        fn bind(&mut self, _slot: BindingSlot, _item: &u32) {}

        fn contains_view(&self, id: ViewId) -> bool {
            self.children.contains(&id)
        }
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = HandlerTable::new();
        assert!(table.insert(ViewTarget::Child(ViewId(4)), "first").is_none());
        table.insert(ViewTarget::Row, "row");
        assert_eq!(table.insert(ViewTarget::Child(ViewId(4)), "second"), Some("first"));

        let order: Vec<_> = table.iter().map(|(t, h)| (t, *h)).collect();
        assert_eq!(
            order,
            vec![(ViewTarget::Child(ViewId(4)), "second"), (ViewTarget::Row, "row")]
        );
        assert_eq!(table.get(ViewTarget::Row), Some(&"row"));
    }

    #[test]
    fn test_resolve_skips_missing_children() {
        let mut table = HandlerTable::new();
        table.insert(ViewTarget::Row, ());
        table.insert(ViewTarget::Child(ViewId(1)), ());
        table.insert(ViewTarget::Child(ViewId(2)), ());

        let row = FakeRow {
            children: vec![ViewId(2)],
        };
        assert_eq!(
            table.resolve(&row),
            vec![ViewTarget::Row, ViewTarget::Child(ViewId(2))]
        );
    }

    #[test]
    fn test_row_handle_position_lifecycle() {
        let mut handle = RowHandle::new(Box::new(FakeRow { children: vec![] }) as Box<dyn RowView<u32>>, LayoutId(1));
        assert_eq!(handle.position(), None);

        handle.bound = Some(BoundRow {
            position: Some(3),
            clicks: vec![ViewTarget::Row],
            long_clicks: Vec::new(),
        });
        assert_eq!(handle.position(), Some(3));
        assert!(handle.has_click_target(ViewTarget::Row));
        assert!(!handle.has_long_click_target(ViewTarget::Row));

        handle.invalidate_position();
        assert_eq!(handle.position(), None);
    }
}
