//! Thread affinity with a registered UI thread.
//!
//! Registering the main thread is process-wide, so these checks live in their
//! own test binary and run as a single test.

use std::sync::Arc;

use parking_lot::Mutex;
use rowbind::model::{ObservableList, TaggedItem};
use rowbind::thread_check::set_main_thread;
use rowbind::{AdapterError, BindingAdapter, BindingSlot, LayoutId, ListHost, Payload, RowView, ViewId};

#[derive(Debug, Clone, PartialEq)]
struct Note(u32);

impl TaggedItem for Note {
    type Tag = ();

    fn tag(&self) {}
}

struct NoteRow;

impl RowView<Note> for NoteRow {
    fn layout(&self) -> LayoutId {
        LayoutId(1)
    }

    fn bind(&mut self, _slot: BindingSlot, _item: &Note) {}

    fn contains_view(&self, _id: ViewId) -> bool {
        false
    }
}

#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<String>>,
}

impl ListHost<Note> for EventLog {
    fn inflate(&self, _layout: LayoutId) -> Box<dyn RowView<Note>> {
        Box::new(NoteRow)
    }

    fn notify_data_set_changed(&self) {
        self.events.lock().push("reset".into());
    }

    fn notify_item_range_inserted(&self, from: usize, count: usize) {
        self.events.lock().push(format!("inserted {from}+{count}"));
    }

    fn notify_item_range_removed(&self, from: usize, count: usize) {
        self.events.lock().push(format!("removed {from}+{count}"));
    }

    fn notify_item_range_changed(&self, from: usize, count: usize, _payload: Option<Payload>) {
        self.events.lock().push(format!("changed {from}+{count}"));
    }

    fn notify_item_moved(&self, from: usize, to: usize) {
        self.events.lock().push(format!("moved {from}->{to}"));
    }
}

#[test]
fn test_objects_built_on_worker_belong_to_registered_ui_thread() {
    set_main_thread();

    let (list, adapter, worker_attach, worker_push) = std::thread::spawn(|| {
        let list = Arc::new(ObservableList::new((0..5).map(Note).collect()));
        let adapter = BindingAdapter::builder(list.clone())
            .map((), LayoutId(1), BindingSlot(1))
            .build()
            .expect("Failed to build adapter");
        let worker_host = Arc::new(EventLog::default());
        let worker_attach = adapter.attach(&worker_host);
        let worker_push = list.push(Note(99));
        (list, adapter, worker_attach, worker_push)
    })
    .join()
    .expect("Failed to join worker");

    assert!(matches!(worker_attach, Err(AdapterError::WrongThread(_))));
    assert!(matches!(worker_push, Err(AdapterError::WrongThread(_))));
    assert!(!adapter.is_attached());
    assert_eq!(list.len(), 5);

    let host = Arc::new(EventLog::default());
    adapter.attach(&host).expect("Failed to attach on the UI thread");
    list.push(Note(5)).expect("Failed to push on the UI thread");

    assert_eq!(adapter.item_count(), 6);
    assert_eq!(*host.events.lock(), vec!["inserted 5+1".to_string()]);
}
