//! Backing sequences.
//!
//! The adapter reads its items through [`ItemSource`]. A plain
//! `RwLock<Vec<T>>` works for static or externally refreshed data; an
//! [`ObservableList`] additionally reports every structural change through
//! [`ListSignals`], which the adapter forwards to the host while attached.
//!
//! An `ObservableList` belongs to the UI thread: the one registered with
//! [`set_main_thread`](rowbind_core::thread_check::set_main_thread), or the
//! creating thread when none is registered. Mutating it from anywhere else
//! fails with [`AdapterError::WrongThread`] and leaves the list untouched.

use std::ops::Range;

use parking_lot::RwLock;
use rowbind_core::{Signal, ThreadAffinity};

use crate::error::{AdapterError, Result};

/// Change notifications emitted by an observable backing sequence.
#[derive(Debug, Default)]
pub struct ListSignals {
    /// Everything may have changed.
    pub reset: Signal<()>,
    /// `(from, count)` items were inserted.
    pub range_inserted: Signal<(usize, usize)>,
    /// `(from, count)` items were removed.
    pub range_removed: Signal<(usize, usize)>,
    /// `(from, count)` items were replaced in place.
    pub range_changed: Signal<(usize, usize)>,
    /// `(from, to, count)` items were moved.
    pub range_moved: Signal<(usize, usize, usize)>,
}

/// Read access (plus bulk removal) to the items an adapter presents.
pub trait ItemSource<T>: Send + Sync {
    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A copy of the item at `position`.
    fn get(&self, position: usize) -> Option<T>;

    /// Position of the first item equal to `item`.
    fn position_of(&self, item: &T) -> Option<usize>;

    /// Removes every item equal to one of `items`, returning how many were removed.
    fn remove_items(&self, items: &[T]) -> Result<usize>;

    /// Change notifications, if this source reports them.
    fn change_signals(&self) -> Option<&ListSignals> {
        None
    }
}

impl<T> ItemSource<T> for RwLock<Vec<T>>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn len(&self) -> usize {
        self.read().len()
    }

    fn get(&self, position: usize) -> Option<T> {
        self.read().get(position).cloned()
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.read().iter().position(|candidate| candidate == item)
    }

    fn remove_items(&self, items: &[T]) -> Result<usize> {
        let mut guard = self.write();
        let before = guard.len();
        guard.retain(|candidate| !items.contains(candidate));
        Ok(before - guard.len())
    }
}

/// A vector that reports structural changes through [`ListSignals`].
pub struct ObservableList<T> {
    items: RwLock<Vec<T>>,
    signals: ListSignals,
    affinity: ThreadAffinity,
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &*self.items.read())
            .field("owner", &self.affinity.thread_id())
            .finish()
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ObservableList<T> {
    /// Creates a list owned by the UI thread.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
            signals: ListSignals::default(),
            affinity: ThreadAffinity::main_thread(),
        }
    }

    /// Creates an empty list owned by the UI thread.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The change notifications of this list.
    pub fn signals(&self) -> &ListSignals {
        &self.signals
    }

    /// The thread allowed to mutate this list.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Runs `f` with a read view of the items.
    pub fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    /// Appends `item`.
    pub fn push(&self, item: T) -> Result<()> {
        self.affinity.check("ObservableList::push")?;
        let position = {
            let mut items = self.items.write();
            items.push(item);
            items.len() - 1
        };
        self.signals.range_inserted.emit((position, 1));
        Ok(())
    }

    /// Inserts `item` at `position`, shifting later items.
    pub fn insert(&self, position: usize, item: T) -> Result<()> {
        self.affinity.check("ObservableList::insert")?;
        {
            let mut items = self.items.write();
            check_bounds(position, items.len() + 1)?;
            items.insert(position, item);
        }
        self.signals.range_inserted.emit((position, 1));
        Ok(())
    }

    /// Appends every item of `iter`.
    pub fn extend(&self, iter: impl IntoIterator<Item = T>) -> Result<()> {
        self.affinity.check("ObservableList::extend")?;
        let (start, count) = {
            let mut items = self.items.write();
            let start = items.len();
            items.extend(iter);
            (start, items.len() - start)
        };
        if count > 0 {
            self.signals.range_inserted.emit((start, count));
        }
        Ok(())
    }

    /// Replaces the item at `position`, returning the old one.
    pub fn set(&self, position: usize, item: T) -> Result<T> {
        self.affinity.check("ObservableList::set")?;
        let old = {
            let mut items = self.items.write();
            let len = items.len();
            let slot = items
                .get_mut(position)
                .ok_or(AdapterError::PositionOutOfRange { position, len })?;
            std::mem::replace(slot, item)
        };
        self.signals.range_changed.emit((position, 1));
        Ok(old)
    }

    /// Removes and returns the item at `position`.
    pub fn remove(&self, position: usize) -> Result<T> {
        self.affinity.check("ObservableList::remove")?;
        let removed = {
            let mut items = self.items.write();
            check_bounds(position, items.len())?;
            items.remove(position)
        };
        self.signals.range_removed.emit((position, 1));
        Ok(removed)
    }

    /// Removes and returns the items in `range`.
    pub fn remove_range(&self, range: Range<usize>) -> Result<Vec<T>> {
        self.affinity.check("ObservableList::remove_range")?;
        let removed: Vec<T> = {
            let mut items = self.items.write();
            let len = items.len();
            if range.start > range.end || range.end > len {
                return Err(AdapterError::PositionOutOfRange {
                    position: range.end.max(range.start),
                    len,
                });
            }
            items.drain(range.clone()).collect()
        };
        if !removed.is_empty() {
            self.signals.range_removed.emit((range.start, removed.len()));
        }
        Ok(removed)
    }

    /// Moves `count` items starting at `from` so that they start at `to`.
    ///
    /// `to` is an index into the list after the block has been taken out.
    pub fn move_range(&self, from: usize, to: usize, count: usize) -> Result<()> {
        self.affinity.check("ObservableList::move_range")?;
        if count == 0 || from == to {
            return Ok(());
        }
        {
            let mut items = self.items.write();
            let len = items.len();
            check_block(from, count, len)?;
            check_block(to, count, len)?;
            let block: Vec<T> = items.drain(from..from + count).collect();
            let tail = items.split_off(to);
            items.extend(block);
            items.extend(tail);
        }
        self.signals.range_moved.emit((from, to, count));
        Ok(())
    }

    /// Removes every item.
    pub fn clear(&self) -> Result<()> {
        self.affinity.check("ObservableList::clear")?;
        let count = {
            let mut items = self.items.write();
            let count = items.len();
            items.clear();
            count
        };
        if count > 0 {
            self.signals.range_removed.emit((0, count));
        }
        Ok(())
    }

    /// Swaps in a new set of items, reporting a full reset.
    pub fn replace_all(&self, new_items: Vec<T>) -> Result<()> {
        self.affinity.check("ObservableList::replace_all")?;
        *self.items.write() = new_items;
        self.signals.reset.emit(());
        Ok(())
    }

    /// Keeps only the items for which `keep` returns `true`.
    ///
    /// Each removed item is reported individually, from the back.
    pub fn retain(&self, mut keep: impl FnMut(&T) -> bool) -> Result<usize> {
        self.affinity.check("ObservableList::retain")?;
        let removed_positions = {
            let mut items = self.items.write();
            let removed: Vec<usize> = items
                .iter()
                .enumerate()
                .filter(|(_, item)| !keep(*item))
                .map(|(position, _)| position)
                .collect();
            for &position in removed.iter().rev() {
                items.remove(position);
            }
            removed
        };
        for &position in removed_positions.iter().rev() {
            self.signals.range_removed.emit((position, 1));
        }
        Ok(removed_positions.len())
    }
}

impl<T: Clone> ObservableList<T> {
    /// A copy of the item at `position`.
    pub fn get(&self, position: usize) -> Option<T> {
        self.items.read().get(position).cloned()
    }

    /// A copy of every item.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }
}

impl<T> ItemSource<T> for ObservableList<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn len(&self) -> usize {
        ObservableList::len(self)
    }

    fn get(&self, position: usize) -> Option<T> {
        ObservableList::get(self, position)
    }

    fn position_of(&self, item: &T) -> Option<usize> {
        self.items.read().iter().position(|candidate| candidate == item)
    }

    fn remove_items(&self, items: &[T]) -> Result<usize> {
        self.retain(|candidate| !items.contains(candidate))
    }

    fn change_signals(&self) -> Option<&ListSignals> {
        Some(&self.signals)
    }
}

static_assertions::assert_impl_all!(ObservableList<u32>: Send, Sync);

fn check_bounds(position: usize, len: usize) -> Result<()> {
    if position < len {
        Ok(())
    } else {
        Err(AdapterError::PositionOutOfRange { position, len })
    }
}

/// Checks that the non-empty block `start..start + count` fits in `len`.
fn check_block(start: usize, count: usize, len: usize) -> Result<()> {
    let last = start
        .checked_add(count - 1)
        .ok_or(AdapterError::PositionOutOfRange {
            position: usize::MAX,
            len,
        })?;
    check_bounds(last, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Reset,
        Inserted(usize, usize),
        Removed(usize, usize),
        Changed(usize, usize),
        Moved(usize, usize, usize),
    }

    fn record(list: &ObservableList<u32>) -> Arc<Mutex<Vec<Event>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let signals = list.signals();

        let e = events.clone();
        signals.reset.connect(move |_| e.lock().push(Event::Reset));
        let e = events.clone();
        signals
            .range_inserted
            .connect(move |&(from, count)| e.lock().push(Event::Inserted(from, count)));
        let e = events.clone();
        signals
            .range_removed
            .connect(move |&(from, count)| e.lock().push(Event::Removed(from, count)));
        let e = events.clone();
        signals
            .range_changed
            .connect(move |&(from, count)| e.lock().push(Event::Changed(from, count)));
        let e = events.clone();
        signals
            .range_moved
            .connect(move |&(from, to, count)| e.lock().push(Event::Moved(from, to, count)));
        events
    }

    #[test]
    fn test_mutations_emit_granular_events() {
        let list = ObservableList::new(vec![1, 2, 3]);
        let events = record(&list);

        list.push(4).unwrap();
        list.insert(0, 0).unwrap();
        list.set(2, 20).unwrap();
        list.remove(1).unwrap();
        list.extend([5, 6]).unwrap();
        list.replace_all(vec![9]).unwrap();

        assert_eq!(
            *events.lock(),
            vec![
                Event::Inserted(3, 1),
                Event::Inserted(0, 1),
                Event::Changed(2, 1),
                Event::Removed(1, 1),
                Event::Inserted(4, 2),
                Event::Reset,
            ]
        );
        assert_eq!(list.snapshot(), vec![9]);
    }

    #[test]
    fn test_move_range() {
        let list = ObservableList::new(vec![0, 1, 2, 3, 4]);
        let events = record(&list);

        list.move_range(0, 3, 2).unwrap();
        assert_eq!(list.snapshot(), vec![2, 3, 4, 0, 1]);
        assert_eq!(*events.lock(), vec![Event::Moved(0, 3, 2)]);

        assert!(matches!(
            list.move_range(4, 0, 2),
            Err(AdapterError::PositionOutOfRange { .. })
        ));
    }

    #[test]
    fn test_move_range_with_huge_count_is_out_of_range() {
        let list = ObservableList::new(vec![0, 1, 2]);
        let events = record(&list);

        assert!(matches!(
            list.move_range(2, 0, usize::MAX),
            Err(AdapterError::PositionOutOfRange { position: usize::MAX, len: 3 })
        ));
        assert!(matches!(
            list.move_range(0, 2, usize::MAX - 1),
            Err(AdapterError::PositionOutOfRange { .. })
        ));
        assert_eq!(list.snapshot(), vec![0, 1, 2]);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_retain_reports_removals_from_the_back() {
        let list = ObservableList::new(vec![1, 2, 3, 4]);
        let events = record(&list);

        assert_eq!(list.retain(|n| n % 2 == 0).unwrap(), 2);
        assert_eq!(list.snapshot(), vec![2, 4]);
        assert_eq!(*events.lock(), vec![Event::Removed(2, 1), Event::Removed(0, 1)]);
    }

    #[test]
    fn test_out_of_range_leaves_list_untouched() {
        let list = ObservableList::new(vec![1]);
        let events = record(&list);

        assert!(list.remove(3).is_err());
        assert!(list.insert(5, 0).is_err());
        assert!(list.remove_range(0..4).is_err());
        assert_eq!(list.snapshot(), vec![1]);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_mutation_from_other_thread_fails() {
        let list = Arc::new(ObservableList::new(vec![1, 2]));
        let events = record(&list);

        let remote = list.clone();
        let result = std::thread::spawn(move || remote.push(3)).join().unwrap();

        assert!(matches!(result, Err(AdapterError::WrongThread(_))));
        assert_eq!(list.snapshot(), vec![1, 2]);
        assert!(events.lock().is_empty());
    }

    #[test]
    fn test_plain_vec_source() {
        let source = RwLock::new(vec!["a", "b", "a", "c"]);
        assert_eq!(ItemSource::len(&source), 4);
        assert_eq!(source.position_of(&"c"), Some(3));
        assert_eq!(source.remove_items(&["a"]).unwrap(), 2);
        assert_eq!(*source.read(), vec!["b", "c"]);
        assert!(source.change_signals().is_none());
    }
}
