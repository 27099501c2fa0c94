//! Sample list with two kinds of rows, a nested list per list row, and
//! multi-select.
//!
//! Rows are "drawn" to the log by a console host.
//!
//! Run with: cargo run -p rowbind --example sample
//! More detail: RUST_LOG=rowbind=trace cargo run -p rowbind --example sample

use std::error::Error;
use std::sync::Arc;

use parking_lot::Mutex;
use rowbind::model::{ObservableList, RowHandle, TaggedItem, ViewTarget};
use rowbind::thread_check::set_main_thread;
use rowbind::{
    BindingAdapter, BindingSlot, IconRef, LayoutId, ListHost, Payload, RowView, StateBundle,
    StatusSurface, ViewId,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const ITEM_TEXT: LayoutId = LayoutId(1);
const ITEM_LIST: LayoutId = LayoutId(2);
const SIMPLE_ITEM: BindingSlot = BindingSlot(1);
const SIMPLE_LIST_ITEM: BindingSlot = BindingSlot(2);
const CHILD_LIST: ViewId = ViewId(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SimpleItem {
    value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SimpleListItem {
    value: u32,
    text: String,
    children: Vec<SimpleItem>,
}

impl SimpleListItem {
    fn new(value: u32) -> Self {
        Self {
            value,
            text: format!("I am a list item. I have {value} children"),
            children: (0..value).map(|value| SimpleItem { value }).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SampleItem {
    Simple(SimpleItem),
    List(SimpleListItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SampleTag {
    Simple,
    List,
}

impl TaggedItem for SampleItem {
    type Tag = SampleTag;

    fn tag(&self) -> SampleTag {
        match self {
            SampleItem::Simple(_) => SampleTag::Simple,
            SampleItem::List(_) => SampleTag::List,
        }
    }
}

impl TaggedItem for SimpleItem {
    type Tag = ();

    fn tag(&self) {}
}

// ============================================================================
// Console host
// ============================================================================

/// A list widget that logs what it would draw.
struct ConsoleList {
    name: &'static str,
}

struct ConsoleRow {
    list: &'static str,
    layout: LayoutId,
    text: String,
}

impl<T: std::fmt::Debug> RowView<T> for ConsoleRow {
    fn layout(&self) -> LayoutId {
        self.layout
    }

    fn bind(&mut self, slot: BindingSlot, item: &T) {
        self.text = format!("{item:?}");
        tracing::trace!(list = self.list, ?slot, "bound");
    }

    fn execute_pending_bindings(&mut self) {
        tracing::info!(list = self.list, layout = ?self.layout, "  {}", self.text);
    }

    fn contains_view(&self, id: ViewId) -> bool {
        self.layout == ITEM_LIST && id == CHILD_LIST
    }
}

impl<T: std::fmt::Debug + 'static> ListHost<T> for ConsoleList {
    fn inflate(&self, layout: LayoutId) -> Box<dyn RowView<T>> {
        Box::new(ConsoleRow {
            list: self.name,
            layout,
            text: String::new(),
        })
    }

    fn notify_data_set_changed(&self) {
        tracing::info!(list = self.name, "redraw everything");
    }

    fn notify_item_range_inserted(&self, from: usize, count: usize) {
        tracing::info!(list = self.name, from, count, "rows inserted");
    }

    fn notify_item_range_removed(&self, from: usize, count: usize) {
        tracing::info!(list = self.name, from, count, "rows removed");
    }

    fn notify_item_range_changed(&self, from: usize, count: usize, payload: Option<Payload>) {
        tracing::info!(list = self.name, from, count, ?payload, "rows changed");
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        tracing::info!(list = self.name, from, to, "row moved");
    }
}

struct ConsoleToolbar;

impl StatusSurface for ConsoleToolbar {
    fn set_subtitle(&self, subtitle: Option<&str>) {
        tracing::info!(subtitle = subtitle.unwrap_or("<none>"), "toolbar subtitle");
    }

    fn set_navigation_icon(&self, icon: &IconRef) {
        tracing::info!(icon = icon.as_str(), "toolbar icon");
    }
}

/// Creates and binds one row per position, the way a host would on first layout.
fn render<T: rowbind::model::AdapterItem>(
    adapter: &BindingAdapter<T>,
) -> rowbind::Result<Vec<RowHandle<T>>> {
    (0..adapter.item_count())
        .map(|position| {
            let mut row = adapter.create_row(adapter.item_view_kind(position)?)?;
            adapter.bind_row(&mut row, position)?;
            Ok(row)
        })
        .collect()
}

fn sample_data() -> Vec<SampleItem> {
    (0..10)
        .map(|i| {
            if i % 2 == 0 {
                SampleItem::Simple(SimpleItem { value: i })
            } else {
                SampleItem::List(SimpleListItem::new(i))
            }
        })
        .collect()
}

/// Shows the children of a list row with their own adapter.
fn render_children(item: &SampleItem) {
    let SampleItem::List(list_item) = item else {
        return;
    };
    tracing::info!(value = list_item.value, "{}", list_item.text);
    let children = Arc::new(parking_lot::RwLock::new(list_item.children.clone()));
    let host = Arc::new(ConsoleList { name: "children" });
    let nested = BindingAdapter::<SimpleItem>::builder(children)
        .map((), ITEM_TEXT, SIMPLE_ITEM)
        .into_host(&host)
        .and_then(|adapter| render(&adapter));
    if let Err(err) = nested {
        tracing::error!(%err, "nested list failed");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,rowbind=debug")),
        )
        .init();
    set_main_thread();

    let items = Arc::new(ObservableList::new(sample_data()));
    let host = Arc::new(ConsoleList { name: "main" });
    let toolbar = Arc::new(ConsoleToolbar);
    let expanded = Arc::new(Mutex::new(Vec::new()));

    let opened = expanded.clone();
    let adapter = BindingAdapter::builder(items.clone())
        .map(SampleTag::Simple, ITEM_TEXT, SIMPLE_ITEM)
        .map(SampleTag::List, ITEM_LIST, SIMPLE_LIST_ITEM)
        .on_click(|item, _row, position| tracing::info!(position, ?item, "row clicked"))
        .on_click_view(CHILD_LIST, move |item, _row, position| {
            opened.lock().push(position);
            render_children(item);
        })
        .enable_selection_mode()
        .status_surface(&toolbar)
        .on_selection_refresh(|| tracing::debug!("selection chrome refreshed"))
        .into_host(&host)?;

    tracing::info!("first layout");
    let rows = render(&adapter)?;

    tracing::info!("open the nested list of row 1");
    adapter.perform_click(&rows[1], ViewTarget::Child(CHILD_LIST))?;

    tracing::info!("select rows 2 and 5");
    adapter.perform_long_click(&rows[2], ViewTarget::Row)?;
    adapter.perform_click(&rows[5], ViewTarget::Row)?;

    let mut bundle = StateBundle::new();
    adapter.save_state(&mut bundle)?;
    let saved = bundle.to_json()?;
    tracing::info!(state = %saved, "saved state");

    tracing::info!("recreate the adapter from saved state");
    drop(adapter);
    let restored = bundle.selected_items::<SampleItem>(rowbind::STATE_SELECTED_ITEMS)?;
    let adapter = BindingAdapter::builder(items.clone())
        .map(SampleTag::Simple, ITEM_TEXT, SIMPLE_ITEM)
        .map(SampleTag::List, ITEM_LIST, SIMPLE_LIST_ITEM)
        .enable_selection_mode()
        .status_surface(&toolbar)
        .selected_items(restored)
        .into_host(&host)?;
    tracing::info!(selected = adapter.total_selected(), "selection restored");

    adapter.delete_selected_items(|deleted| tracing::info!(?deleted, "deleting"))?;
    items.push(SampleItem::Simple(SimpleItem { value: 42 }))?;
    items.move_range(0, 2, 1)?;

    tracing::info!(
        remaining = adapter.item_count(),
        nested_lists_opened = expanded.lock().len(),
        "done"
    );
    Ok(())
}
