//! The list adapter.
//!
//! [`BindingAdapter`] sits between a backing sequence and a host list widget.
//! The host asks it for the item count and the view-kind of each position,
//! has it create and bind rows, and forwards gestures to it. The adapter
//! resolves layouts through its [`PresentationMap`], runs the user's
//! handlers, and drives the [`SelectionState`] when the selection feature
//! is enabled.
//!
//! # Example
//!
//! ```ignore
//! let adapter = BindingAdapter::builder(items.clone())
//!     .default_slot(BindingSlot(1))
//!     .map_layout(RowTag::Text, LayoutId(1))
//!     .on_click(|item, _row, position| println!("clicked {item:?} at {position}"))
//!     .enable_selection_mode()
//!     .status_surface(&toolbar)
//!     .build()?;
//!
//! adapter.attach(&list_widget)?;
//! ```
//!
//! # Threading
//!
//! The adapter belongs to the UI thread registered with
//! [`set_main_thread`](rowbind_core::thread_check::set_main_thread), or to the
//! thread that built it when none is registered. Operations that change
//! state (`attach`, `detach`, `bind_row`, gestures, `disable_selection_mode`,
//! `delete_selected_items`) fail with [`AdapterError::WrongThread`] anywhere
//! else. Host callbacks and user handlers always run with no adapter lock
//! held, so they may call back into the adapter.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rowbind_core::logging::span_names;
use rowbind_core::{ConnectionId, PerfSpan, ThreadAffinity};
use serde::Serialize;

use crate::error::{AdapterError, Result};
use crate::host::{
    BindingSlot, IconRef, LayoutId, ListHost, Payload, RowView, StatusSurface, ViewId,
    is_binding_refresh,
};
use crate::model::dispatch::{
    BindHandler, BindInfo, BoundRow, ClickHandler, HandlerTable, RefreshHandler, RowHandle,
    ViewTarget,
};
use crate::model::observable::{ItemSource, ListSignals};
use crate::model::presentation::{AdapterItem, PresentationMap, PresentationMapBuilder};
use crate::model::selection::{Invalidation, SelectionMode, SelectionState, Transition};
use crate::settings::AdapterSettings;
use crate::state::StateBundle;

/// Connections held on the backing sequence's signals while attached.
#[derive(Debug, Clone, Copy)]
struct ObserverToken {
    reset: ConnectionId,
    inserted: ConnectionId,
    removed: ConnectionId,
    changed: ConnectionId,
    moved: ConnectionId,
}

impl ObserverToken {
    fn disconnect(self, signals: &ListSignals) {
        signals.reset.disconnect(self.reset);
        signals.range_inserted.disconnect(self.inserted);
        signals.range_removed.disconnect(self.removed);
        signals.range_changed.disconnect(self.changed);
        signals.range_moved.disconnect(self.moved);
    }
}

struct Handlers<T> {
    bind: Option<BindHandler<T>>,
    clicks: HandlerTable<ClickHandler<T>>,
    long_clicks: HandlerTable<ClickHandler<T>>,
    refresh: Option<RefreshHandler>,
}

struct AdapterState<T> {
    selection: SelectionState<T>,
    host: Option<Weak<dyn ListHost<T>>>,
    observer: Option<ObserverToken>,
}

struct Shared<T: AdapterItem> {
    source: Arc<dyn ItemSource<T>>,
    presentation: PresentationMap<T>,
    handlers: Handlers<T>,
    selection_enabled: bool,
    status: Option<Weak<dyn StatusSurface>>,
    settings: AdapterSettings,
    affinity: ThreadAffinity,
    state: Mutex<AdapterState<T>>,
}

impl<T: AdapterItem> Drop for Shared<T> {
    fn drop(&mut self) {
        let token = self.state.get_mut().observer.take();
        if let (Some(token), Some(signals)) = (token, self.source.change_signals()) {
            token.disconnect(signals);
        }
    }
}

/// Adapter between a backing sequence and a host list widget.
///
/// Cloning yields another handle to the same adapter.
pub struct BindingAdapter<T: AdapterItem> {
    shared: Arc<Shared<T>>,
}

impl<T: AdapterItem> Clone for BindingAdapter<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: AdapterItem + std::fmt::Debug> std::fmt::Debug for BindingAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("BindingAdapter")
            .field("items", &self.shared.source.len())
            .field("presentation", &self.shared.presentation)
            .field("selection_enabled", &self.shared.selection_enabled)
            .field("selection", &state.selection)
            .field("attached", &state.observer.is_some())
            .finish()
    }
}

impl<T: AdapterItem> BindingAdapter<T> {
    /// Starts configuring an adapter over `source`.
    pub fn builder<S>(source: Arc<S>) -> AdapterBuilder<T>
    where
        S: ItemSource<T> + 'static,
    {
        AdapterBuilder::new(source)
    }

    // -------------------------------------------------------------------------
    // Host queries
    // -------------------------------------------------------------------------

    /// Number of items in the backing sequence.
    pub fn item_count(&self) -> usize {
        self.shared.source.len()
    }

    /// Returns `true` if the backing sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.shared.source.is_empty()
    }

    /// A copy of the item at `position`.
    pub fn item(&self, position: usize) -> Option<T> {
        self.shared.source.get(position)
    }

    /// The view-kind (resolved layout) of the item at `position`.
    pub fn item_view_kind(&self, position: usize) -> Result<LayoutId> {
        let item = self.shared.item_at(position)?;
        Ok(self.shared.presentation.resolve(&item, position)?.layout)
    }

    /// The presentation table this adapter resolves through.
    pub fn presentation(&self) -> &PresentationMap<T> {
        &self.shared.presentation
    }

    /// The adapter's settings.
    pub fn settings(&self) -> &AdapterSettings {
        &self.shared.settings
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Asks the attached host to inflate a row for `kind`.
    pub fn create_row(&self, kind: LayoutId) -> Result<RowHandle<T>> {
        let host = self.shared.host().ok_or(AdapterError::NotAttached)?;
        let view = host.inflate(kind);
        tracing::trace!(target: "rowbind::adapter", ?kind, "row created");
        Ok(RowHandle::new(view, kind))
    }

    /// Binds the item at `position` into `row` and records which gesture
    /// targets exist in it.
    ///
    /// The item is resolved with its variant selector, so a selector that
    /// returns an unknown variant fails the bind with
    /// [`AdapterError::InvalidVariant`] and leaves `row` untouched.
    pub fn bind_row(&self, row: &mut RowHandle<T>, position: usize) -> Result<()> {
        let shared = &self.shared;
        shared.affinity.check("BindingAdapter::bind_row")?;
        let item = shared.item_at(position)?;
        let slot: BindingSlot = shared.presentation.resolve(&item, position)?.slot;

        let _span = PerfSpan::new(span_names::BIND);
        row.view_mut().bind(slot, &item);
        row.view_mut().execute_pending_bindings();

        let clicks = shared.handlers.clicks.resolve(row.view());
        let long_clicks = shared.handlers.long_clicks.resolve(row.view());
        tracing::trace!(
            target: "rowbind::adapter",
            position,
            ?slot,
            click_targets = clicks.len(),
            long_click_targets = long_clicks.len(),
            "row bound"
        );
        row.bound = Some(BoundRow {
            position: Some(position),
            clicks,
            long_clicks,
        });

        if let Some(on_bind) = &shared.handlers.bind {
            let info = {
                let state = shared.state.lock();
                BindInfo {
                    position,
                    selection_enabled: shared.selection_enabled,
                    selection_active: state.selection.is_activated(),
                    selected: state.selection.is_selected(&item),
                }
            };
            on_bind(&item, row.view(), info);
        }
        Ok(())
    }

    /// Binds with partial-update payloads.
    ///
    /// A non-empty payload list without [`Payload::DataInvalidation`] only
    /// flushes the row's pending bindings. Anything else is one full bind.
    pub fn bind_row_with_payloads(
        &self,
        row: &mut RowHandle<T>,
        position: usize,
        payloads: &[Payload],
    ) -> Result<()> {
        if is_binding_refresh(payloads) {
            self.shared.affinity.check("BindingAdapter::bind_row_with_payloads")?;
            row.view_mut().execute_pending_bindings();
            tracing::trace!(target: "rowbind::adapter", position, "pending bindings flushed");
            return Ok(());
        }
        self.bind_row(row, position)
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Dispatches a press on `target` of `row`.
    ///
    /// Returns whether anything handled the press.
    pub fn perform_click(&self, row: &RowHandle<T>, target: ViewTarget) -> Result<bool> {
        let shared = &self.shared;
        shared.affinity.check("BindingAdapter::perform_click")?;
        let Some((item, position)) = shared.bound_item(row) else {
            tracing::debug!(target: "rowbind::adapter", ?target, "press on a row without position ignored");
            return Ok(false);
        };

        if shared.selection_enabled {
            let transition = {
                let mut state = shared.state.lock();
                if !state.selection.is_activated() {
                    None
                } else if target == ViewTarget::Row {
                    Some(state.selection.toggle_at(&item, position))
                } else {
                    return Ok(false);
                }
            };
            if let Some(transition) = transition {
                self.finish_gesture(transition);
                return Ok(true);
            }
        }

        if !row.has_click_target(target) {
            return Ok(false);
        }
        match shared.handlers.clicks.get(target) {
            Some(handler) => {
                handler(&item, row.view(), position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Dispatches a long-press on `target` of `row`.
    ///
    /// With the selection feature enabled, a long-press on the row itself
    /// activates selection mode (or toggles the item if already active).
    pub fn perform_long_click(&self, row: &RowHandle<T>, target: ViewTarget) -> Result<bool> {
        let shared = &self.shared;
        shared.affinity.check("BindingAdapter::perform_long_click")?;
        let bound = shared.bound_item(row);

        if shared.selection_enabled {
            if target == ViewTarget::Row {
                let transition = {
                    let mut state = shared.state.lock();
                    state
                        .selection
                        .activate_at(bound.as_ref().map(|(item, position)| (item, *position)))
                };
                self.finish_gesture(transition);
                return Ok(true);
            }
            if shared.state.lock().selection.is_activated() {
                return Ok(false);
            }
        }

        let Some((item, position)) = bound else {
            return Ok(false);
        };
        if !row.has_long_click_target(target) {
            return Ok(false);
        }
        match shared.handlers.long_clicks.get(target) {
            Some(handler) => {
                handler(&item, row.view(), position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // -------------------------------------------------------------------------
    // Attachment
    // -------------------------------------------------------------------------

    /// Attaches to a host list widget.
    ///
    /// The adapter keeps only a weak reference to `host`. If the backing
    /// sequence reports changes, they are forwarded to the host until
    /// [`detach`](Self::detach) or until the adapter is dropped.
    pub fn attach<H>(&self, host: &Arc<H>) -> Result<()>
    where
        H: ListHost<T> + 'static,
    {
        self.shared.affinity.check("BindingAdapter::attach")?;
        self.detach_inner();

        let weak_host: Weak<dyn ListHost<T>> = Arc::downgrade(host) as Weak<dyn ListHost<T>>;
        let observer = self
            .shared
            .source
            .change_signals()
            .map(|signals| self.subscribe(signals));

        let mut state = self.shared.state.lock();
        state.host = Some(weak_host);
        state.observer = observer;
        tracing::debug!(target: "rowbind::adapter", observing = observer.is_some(), "attached to host");
        Ok(())
    }

    /// Detaches from the host and stops observing the backing sequence.
    pub fn detach(&self) -> Result<()> {
        self.shared.affinity.check("BindingAdapter::detach")?;
        self.detach_inner();
        tracing::debug!(target: "rowbind::adapter", "detached from host");
        Ok(())
    }

    /// Whether a host is attached and still alive.
    pub fn is_attached(&self) -> bool {
        self.shared.host().is_some()
    }

    fn detach_inner(&self) {
        let token = {
            let mut state = self.shared.state.lock();
            state.host = None;
            state.observer.take()
        };
        if let (Some(token), Some(signals)) = (token, self.shared.source.change_signals()) {
            token.disconnect(signals);
        }
    }

    fn subscribe(&self, signals: &ListSignals) -> ObserverToken {
        let weak = Arc::downgrade(&self.shared);
        let reset = signals.reset.connect({
            let weak = weak.clone();
            move |_| {
                if let Some(shared) = observed(&weak, "reset") {
                    shared.forward(|host| host.notify_data_set_changed());
                    shared.prune_selection();
                }
            }
        });
        let inserted = signals.range_inserted.connect({
            let weak = weak.clone();
            move |&(from, count)| {
                if let Some(shared) = observed(&weak, "range_inserted") {
                    shared.forward(|host| host.notify_item_range_inserted(from, count));
                }
            }
        });
        let removed = signals.range_removed.connect({
            let weak = weak.clone();
            move |&(from, count)| {
                if let Some(shared) = observed(&weak, "range_removed") {
                    shared.forward(|host| host.notify_item_range_removed(from, count));
                    shared.prune_selection();
                }
            }
        });
        let changed = signals.range_changed.connect({
            let weak = weak.clone();
            move |&(from, count)| {
                if let Some(shared) = observed(&weak, "range_changed") {
                    shared.forward(|host| host.notify_item_range_changed(from, count, None));
                    shared.prune_selection();
                }
            }
        });
        let moved = signals.range_moved.connect(move |&(from, to, count)| {
            if let Some(shared) = observed(&weak, "range_moved") {
                shared.forward(|host| {
                    for offset in 0..count {
                        host.notify_item_moved(from + offset, to + offset);
                    }
                });
            }
        });

        ObserverToken {
            reset,
            inserted,
            removed,
            changed,
            moved,
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Current selection mode.
    pub fn selection_mode(&self) -> SelectionMode {
        self.shared.state.lock().selection.mode()
    }

    /// Whether the selection feature was enabled at build time.
    pub fn is_selection_mode_enabled(&self) -> bool {
        self.shared.selection_enabled
    }

    /// Whether selection mode is engaged.
    pub fn is_selection_mode_activated(&self) -> bool {
        self.shared.state.lock().selection.is_activated()
    }

    /// Whether selection mode was engaged by the last transition.
    pub fn is_entering_selection_mode(&self) -> bool {
        self.shared.state.lock().selection.is_entering()
    }

    /// Number of selected items.
    pub fn total_selected(&self) -> usize {
        self.shared.state.lock().selection.len()
    }

    /// The selected items, in selection order.
    pub fn selected_items(&self) -> Vec<T> {
        self.shared.state.lock().selection.selected().to_vec()
    }

    /// Whether the item at `position` is selected.
    pub fn is_item_selected(&self, position: usize) -> bool {
        self.shared
            .source
            .get(position)
            .is_some_and(|item| self.shared.state.lock().selection.is_selected(&item))
    }

    /// Clears the selection and leaves selection mode.
    pub fn disable_selection_mode(&self) -> Result<()> {
        self.shared.affinity.check("BindingAdapter::disable_selection_mode")?;
        let transition = self.shared.state.lock().selection.disable();
        tracing::debug!(target: "rowbind::selection", from = ?transition.from, "selection mode disabled");
        self.shared.forward_invalidations(&transition.invalidations);
        self.shared.refresh_status();
        Ok(())
    }

    /// Hands the selected items to `on_deleted`, removes them from the
    /// backing sequence and leaves selection mode.
    ///
    /// Returns how many items were removed from the sequence. If removal
    /// fails the items are selected again.
    pub fn delete_selected_items<F>(&self, on_deleted: F) -> Result<usize>
    where
        F: FnOnce(&[T]),
    {
        let shared = &self.shared;
        shared.affinity.check("BindingAdapter::delete_selected_items")?;
        let _span = PerfSpan::new(span_names::DELETE_SELECTED);

        let (items, transition) = shared.state.lock().selection.take_all();
        on_deleted(&items);
        let removed = match shared.source.remove_items(&items) {
            Ok(removed) => removed,
            Err(err) => {
                shared.state.lock().selection.restore(items);
                return Err(err);
            }
        };

        tracing::debug!(
            target: "rowbind::selection",
            selected = items.len(),
            removed,
            "selected items deleted"
        );
        shared.forward_invalidations(&transition.invalidations);
        shared.refresh_status();
        Ok(removed)
    }

    /// Writes the selection into `bundle` under the configured state key.
    pub fn save_state(&self, bundle: &mut StateBundle) -> Result<()>
    where
        T: Serialize,
    {
        let selected = self.selected_items();
        bundle.put(self.shared.settings.state_key.as_str(), &selected)?;
        tracing::debug!(target: "rowbind::adapter", count = selected.len(), "selection saved");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Deferred rebinds
    // -------------------------------------------------------------------------

    /// Whether a pending rebind should wait (the host is laying out).
    pub fn should_defer_rebind(&self) -> bool {
        self.shared.host().is_some_and(|host| host.is_computing_layout())
    }

    /// A deferred rebind of the row at `position` was dropped.
    ///
    /// Requests a [`Payload::DataInvalidation`] redraw so the row gets a
    /// full bind once the host is idle.
    pub fn rebind_cancelled(&self, position: Option<usize>) {
        let Some(position) = position else {
            return;
        };
        let Some(host) = self.shared.host() else {
            return;
        };
        if host.is_computing_layout() {
            return;
        }
        host.notify_item_range_changed(position, 1, Some(Payload::DataInvalidation));
    }

    fn finish_gesture(&self, transition: Transition) {
        let shared = &self.shared;
        if transition.from != transition.to {
            tracing::debug!(
                target: "rowbind::selection",
                from = ?transition.from,
                to = ?transition.to,
                "selection mode changed"
            );
        }
        shared.forward_invalidations(&transition.invalidations);
        shared.refresh_status();
        shared.fire_refresh();
    }
}

impl<T: AdapterItem> Shared<T> {
    fn host(&self) -> Option<Arc<dyn ListHost<T>>> {
        self.state.lock().host.as_ref().and_then(Weak::upgrade)
    }

    fn item_at(&self, position: usize) -> Result<T> {
        self.source.get(position).ok_or(AdapterError::PositionOutOfRange {
            position,
            len: self.source.len(),
        })
    }

    fn bound_item(&self, row: &RowHandle<T>) -> Option<(T, usize)> {
        let position = row.position()?;
        self.source.get(position).map(|item| (item, position))
    }

    fn forward<F>(&self, notify: F)
    where
        F: FnOnce(&dyn ListHost<T>),
    {
        match self.host() {
            Some(host) => notify(host.as_ref()),
            None => tracing::warn!(target: "rowbind::observer", "change notification with no live host dropped"),
        }
    }

    fn forward_invalidations(&self, invalidations: &[Invalidation]) {
        if invalidations.is_empty() {
            return;
        }
        let Some(host) = self.host() else {
            return;
        };
        for invalidation in invalidations {
            match *invalidation {
                Invalidation::All => host.notify_data_set_changed(),
                Invalidation::Row(position) => host.notify_item_range_changed(position, 1, None),
            }
        }
    }

    fn refresh_status(&self) {
        if !self.selection_enabled {
            return;
        }
        let Some(status) = self.status.as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let (subtitle, icon): (Option<String>, IconRef) = {
            let state = self.state.lock();
            let chrome = &self.settings.selection;
            (
                state.selection.subtitle(chrome),
                state.selection.navigation_icon(chrome).clone(),
            )
        };
        status.set_subtitle(subtitle.as_deref());
        status.set_navigation_icon(&icon);
    }

    fn fire_refresh(&self) {
        if let Some(refresh) = &self.handlers.refresh {
            refresh();
        }
    }

    /// Drops selected items that are no longer in the backing sequence.
    ///
    /// The status surface is refreshed whenever the count changes, even if
    /// selection mode stays engaged.
    fn prune_selection(&self) {
        let (transition, pruned) = {
            let mut state = self.state.lock();
            let before = state.selection.len();
            if before == 0 {
                return;
            }
            let source = &self.source;
            let transition = state.selection.retain(|item| source.position_of(item).is_some());
            (transition, before - state.selection.len())
        };
        if pruned == 0 {
            return;
        }
        tracing::debug!(
            target: "rowbind::selection",
            pruned,
            to = ?transition.to,
            "selection pruned after removal"
        );
        self.forward_invalidations(&transition.invalidations);
        self.refresh_status();
        self.fire_refresh();
    }
}

fn observed<T: AdapterItem>(weak: &Weak<Shared<T>>, event: &'static str) -> Option<Arc<Shared<T>>> {
    let shared = weak.upgrade()?;
    if shared.affinity.check("backing sequence change").is_err() {
        return None;
    }
    tracing::trace!(target: "rowbind::observer", event, "forwarding change");
    Some(shared)
}

/// Fluent configuration for [`BindingAdapter`].
pub struct AdapterBuilder<T: AdapterItem> {
    source: Arc<dyn ItemSource<T>>,
    presentation: PresentationMapBuilder<T>,
    handlers: Handlers<T>,
    selection_enabled: bool,
    status: Option<Weak<dyn StatusSurface>>,
    selected_items: Vec<T>,
    settings: AdapterSettings,
}

impl<T: AdapterItem> AdapterBuilder<T> {
    fn new<S>(source: Arc<S>) -> Self
    where
        S: ItemSource<T> + 'static,
    {
        Self {
            source,
            presentation: PresentationMapBuilder::new(),
            handlers: Handlers {
                bind: None,
                clicks: HandlerTable::new(),
                long_clicks: HandlerTable::new(),
                refresh: None,
            },
            selection_enabled: false,
            status: None,
            selected_items: Vec::new(),
            settings: AdapterSettings::default(),
        }
    }

    /// Slot used by [`map_layout`](Self::map_layout).
    pub fn default_slot(mut self, slot: BindingSlot) -> Self {
        self.presentation = self.presentation.default_slot(slot);
        self
    }

    /// Maps `tag` to a single layout and slot.
    pub fn map(mut self, tag: T::Tag, layout: LayoutId, slot: BindingSlot) -> Self {
        self.presentation = self.presentation.map(tag, layout, slot);
        self
    }

    /// Maps `tag` to a single layout bound through the default slot.
    pub fn map_layout(mut self, tag: T::Tag, layout: LayoutId) -> Self {
        self.presentation = self.presentation.map_layout(tag, layout);
        self
    }

    /// Maps `tag` to several layouts chosen per item by `selector`.
    pub fn map_variants<F>(
        mut self,
        tag: T::Tag,
        layouts: Vec<LayoutId>,
        slot: BindingSlot,
        selector: F,
    ) -> Self
    where
        F: Fn(&T, usize) -> usize + Send + Sync + 'static,
    {
        self.presentation = self.presentation.map_variants(tag, layouts, slot, selector);
        self
    }

    /// Called after every full bind.
    pub fn on_bind<F>(mut self, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, BindInfo) + Send + Sync + 'static,
    {
        self.handlers.bind = Some(Arc::new(handler));
        self
    }

    /// Press handler for the whole row.
    pub fn on_click<F>(self, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        self.on_click_target(ViewTarget::Row, handler)
    }

    /// Press handler for the sub-view `id`.
    pub fn on_click_view<F>(self, id: ViewId, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        self.on_click_target(ViewTarget::Child(id), handler)
    }

    /// Long-press handler for the whole row.
    pub fn on_long_click<F>(self, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        self.on_long_click_target(ViewTarget::Row, handler)
    }

    /// Long-press handler for the sub-view `id`.
    pub fn on_long_click_view<F>(self, id: ViewId, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        self.on_long_click_target(ViewTarget::Child(id), handler)
    }

    fn on_click_target<F>(mut self, target: ViewTarget, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        if self.handlers.clicks.insert(target, Arc::new(handler)).is_some() {
            tracing::debug!(target: "rowbind::adapter", ?target, "click handler replaced");
        }
        self
    }

    fn on_long_click_target<F>(mut self, target: ViewTarget, handler: F) -> Self
    where
        F: Fn(&T, &dyn RowView<T>, usize) + Send + Sync + 'static,
    {
        if self.handlers.long_clicks.insert(target, Arc::new(handler)).is_some() {
            tracing::debug!(target: "rowbind::adapter", ?target, "long-click handler replaced");
        }
        self
    }

    /// Enables the multi-select feature.
    pub fn enable_selection_mode(mut self) -> Self {
        self.selection_enabled = true;
        self
    }

    /// Status surface that shows the selection count. Held weakly.
    pub fn status_surface<S>(mut self, surface: &Arc<S>) -> Self
    where
        S: StatusSurface + 'static,
    {
        let weak: Weak<dyn StatusSurface> = Arc::downgrade(surface) as Weak<dyn StatusSurface>;
        self.status = Some(weak);
        self
    }

    /// Called after every selection gesture and after restoring a selection.
    pub fn on_selection_refresh<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.refresh = Some(Arc::new(handler));
        self
    }

    /// Items to select initially, typically read back from a [`StateBundle`].
    ///
    /// Items not present in the backing sequence are ignored.
    pub fn selected_items(mut self, items: Vec<T>) -> Self {
        self.selected_items = items;
        self
    }

    /// Replaces the default settings.
    pub fn settings(mut self, settings: AdapterSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the adapter, bound to the UI thread.
    ///
    /// Restored items are applied only when selection mode is enabled.
    pub fn build(self) -> Result<BindingAdapter<T>> {
        let presentation = self.presentation.build()?;
        let shared = Arc::new(Shared {
            source: self.source,
            presentation,
            handlers: self.handlers,
            selection_enabled: self.selection_enabled,
            status: self.status,
            settings: self.settings,
            affinity: ThreadAffinity::main_thread(),
            state: Mutex::new(AdapterState {
                selection: SelectionState::new(),
                host: None,
                observer: None,
            }),
        });

        let transition = if shared.selection_enabled {
            let present: Vec<T> = self
                .selected_items
                .into_iter()
                .filter(|item| shared.source.position_of(item).is_some())
                .collect();
            shared.state.lock().selection.restore(present)
        } else {
            if !self.selected_items.is_empty() {
                tracing::warn!(
                    target: "rowbind::adapter",
                    ignored = self.selected_items.len(),
                    "selected items given without selection mode, ignoring"
                );
            }
            Transition::default()
        };
        tracing::debug!(
            target: "rowbind::adapter",
            entries = shared.presentation.len(),
            selection_enabled = shared.selection_enabled,
            restored = ?transition.to,
            "adapter built"
        );
        if shared.selection_enabled {
            shared.refresh_status();
            shared.fire_refresh();
        }

        Ok(BindingAdapter { shared })
    }

    /// Builds the adapter and attaches it to `host`.
    pub fn into_host<H>(self, host: &Arc<H>) -> Result<BindingAdapter<T>>
    where
        H: ListHost<T> + 'static,
    {
        let adapter = self.build()?;
        adapter.attach(host)?;
        Ok(adapter)
    }
}
