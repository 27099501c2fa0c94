//! Multi-select state machine.
//!
//! [`SelectionState`] tracks which items are selected and whether selection
//! mode is engaged. It is a plain value: every transition returns a
//! [`Transition`] describing which rows the host must redraw, and the
//! adapter forwards those invalidations after releasing its locks.
//!
//! ```text
//!               long-press (item)               press, set non-empty
//!   Inactive ─────────────────────> Active ──────────────┐
//!      ^                          (entering)  <──────────┘
//!      │   disable / press empties the set      │
//!      └────────────────────────────────────────┘
//! ```
//!
//! Selection is by value: the set holds item values, membership is tested
//! with `PartialEq`, and duplicates are never stored.

use crate::settings::SelectionChrome;
use crate::host::IconRef;

/// Whether selection mode is engaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Presses fire the normal click handlers.
    #[default]
    Inactive,
    /// Presses toggle membership. `entering` is set only until the first
    /// transition after activation.
    Active { entering: bool },
}

impl SelectionMode {
    /// Returns `true` for any `Active` state.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

/// A redraw request produced by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// Every row must be redrawn.
    All,
    /// Only the row at this position must be redrawn.
    Row(usize),
}

/// The observable outcome of a selection transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    /// Mode before the transition.
    pub from: SelectionMode,
    /// Mode after the transition.
    pub to: SelectionMode,
    /// Redraws to forward to the host, in order.
    pub invalidations: Vec<Invalidation>,
}

impl Transition {
    fn unchanged(mode: SelectionMode) -> Self {
        Self {
            from: mode,
            to: mode,
            invalidations: Vec::new(),
        }
    }

    /// Returns `true` if the transition changed nothing.
    pub fn is_noop(&self) -> bool {
        self.from == self.to && self.invalidations.is_empty()
    }
}

/// Selection set plus the two mode flags.
#[derive(Debug, Clone)]
pub struct SelectionState<T> {
    selected: Vec<T>,
    activated: bool,
    entering: bool,
}

impl<T> Default for SelectionState<T> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
            activated: false,
            entering: false,
        }
    }
}

impl<T: Clone + PartialEq> SelectionState<T> {
    /// Creates an empty, inactive selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    pub fn mode(&self) -> SelectionMode {
        if self.activated {
            SelectionMode::Active {
                entering: self.entering,
            }
        } else {
            SelectionMode::Inactive
        }
    }

    /// Whether selection mode is engaged.
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Whether this is the first frame after activation.
    pub fn is_entering(&self) -> bool {
        self.entering
    }

    /// Number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected items in selection order.
    pub fn selected(&self) -> &[T] {
        &self.selected
    }

    /// Whether `item` is in the selection set.
    pub fn is_selected(&self, item: &T) -> bool {
        self.selected.contains(item)
    }

    /// Long-press on a row.
    ///
    /// `target` is `None` when the row no longer has an adapter position;
    /// that is a no-op. While inactive, the item becomes the first selected
    /// item and the mode switches to `Active { entering: true }`. While
    /// already active, a long-press toggles like a press.
    pub fn activate_at(&mut self, target: Option<(&T, usize)>) -> Transition {
        let Some((item, position)) = target else {
            return Transition::unchanged(self.mode());
        };
        if self.activated {
            return self.toggle_at(item, position);
        }

        let from = self.mode();
        self.activated = true;
        self.entering = true;
        if !self.is_selected(item) {
            self.selected.push(item.clone());
        }
        Transition {
            from,
            to: self.mode(),
            invalidations: vec![Invalidation::All, Invalidation::Row(position)],
        }
    }

    /// Press on a row while active: toggles membership of `item`.
    ///
    /// Emptying the set deactivates selection mode. Does nothing while
    /// inactive.
    pub fn toggle_at(&mut self, item: &T, position: usize) -> Transition {
        let from = self.mode();
        if !self.activated {
            return Transition::unchanged(from);
        }

        self.entering = false;
        match self.selected.iter().position(|s| s == item) {
            Some(index) => {
                self.selected.remove(index);
            }
            None => self.selected.push(item.clone()),
        }

        let mut invalidations = vec![Invalidation::Row(position)];
        if self.selected.is_empty() {
            self.deactivate();
            invalidations.push(Invalidation::All);
        }
        Transition {
            from,
            to: self.mode(),
            invalidations,
        }
    }

    /// Clears the set and leaves selection mode.
    pub fn disable(&mut self) -> Transition {
        let from = self.mode();
        self.deactivate();
        Transition {
            from,
            to: self.mode(),
            invalidations: vec![Invalidation::All],
        }
    }

    /// Pre-populates the set, for instance after a teardown/recreate cycle.
    ///
    /// Items already selected are skipped. Activates selection mode if the
    /// resulting set is non-empty.
    pub fn restore<I>(&mut self, items: I) -> Transition
    where
        I: IntoIterator<Item = T>,
    {
        let from = self.mode();
        for item in items {
            if !self.is_selected(&item) {
                self.selected.push(item);
            }
        }
        if self.selected.is_empty() {
            return Transition::unchanged(from);
        }
        if !self.activated {
            self.activated = true;
            self.entering = true;
        }
        Transition {
            from,
            to: self.mode(),
            invalidations: vec![Invalidation::All],
        }
    }

    /// Drops selected items for which `keep` returns `false`.
    ///
    /// Used when items disappear from the backing sequence. Deactivates if
    /// the set becomes empty while active.
    pub fn retain<F>(&mut self, mut keep: F) -> Transition
    where
        F: FnMut(&T) -> bool,
    {
        let from = self.mode();
        let before = self.selected.len();
        self.selected.retain(|item| keep(item));
        if self.selected.len() == before {
            return Transition::unchanged(from);
        }
        if self.activated && self.selected.is_empty() {
            self.deactivate();
            return Transition {
                from,
                to: self.mode(),
                invalidations: vec![Invalidation::All],
            };
        }
        Transition::unchanged(from)
    }

    /// Removes and returns every selected item, leaving selection mode.
    pub fn take_all(&mut self) -> (Vec<T>, Transition) {
        let from = self.mode();
        let items = std::mem::take(&mut self.selected);
        self.deactivate();
        let transition = Transition {
            from,
            to: self.mode(),
            invalidations: vec![Invalidation::All],
        };
        (items, transition)
    }

    /// Subtitle to show on the status surface, `None` while inactive.
    pub fn subtitle(&self, chrome: &SelectionChrome) -> Option<String> {
        self.activated.then(|| chrome.subtitle(self.selected.len()))
    }

    /// Navigation icon to show on the status surface.
    pub fn navigation_icon<'a>(&self, chrome: &'a SelectionChrome) -> &'a IconRef {
        if self.activated {
            &chrome.active_icon
        } else {
            &chrome.inactive_icon
        }
    }

    fn deactivate(&mut self) {
        self.selected.clear();
        self.activated = false;
        self.entering = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_long_press_activates_with_item() {
        let mut state = SelectionState::new();
        let t = state.activate_at(Some((&"d", 3)));

        assert_eq!(t.from, SelectionMode::Inactive);
        assert_eq!(t.to, SelectionMode::Active { entering: true });
        assert_eq!(t.invalidations, vec![Invalidation::All, Invalidation::Row(3)]);
        assert_eq!(state.selected(), &["d"]);
        assert_eq!(state.subtitle(&SelectionChrome::default()).as_deref(), Some("1 Selected"));
    }

    #[test]
    fn test_long_press_without_position_is_noop() {
        let mut state = SelectionState::<&str>::new();
        let t = state.activate_at(None);
        assert!(t.is_noop());
        assert_eq!(state.mode(), SelectionMode::Inactive);
    }

    #[test]
    fn test_press_clears_entering_flag() {
        let mut state = SelectionState::new();
        state.activate_at(Some((&1, 0)));
        assert!(state.is_entering());

        let t = state.toggle_at(&2, 1);
        assert_eq!(t.to, SelectionMode::Active { entering: false });
        assert_eq!(state.selected(), &[1, 2]);
    }

    #[test]
    fn test_press_emptying_set_deactivates() {
        let mut state = SelectionState::new();
        state.activate_at(Some((&"d", 3)));

        let t = state.toggle_at(&"d", 3);
        assert_eq!(t.to, SelectionMode::Inactive);
        assert_eq!(t.invalidations, vec![Invalidation::Row(3), Invalidation::All]);
        assert!(state.is_empty());
        assert_eq!(state.subtitle(&SelectionChrome::default()), None);
    }

    #[test]
    fn test_press_while_inactive_does_nothing() {
        let mut state = SelectionState::new();
        assert!(state.toggle_at(&1, 0).is_noop());
        assert!(state.is_empty());
    }

    #[test]
    fn test_disable_resets_flags() {
        let mut state = SelectionState::new();
        state.activate_at(Some((&1, 0)));
        state.toggle_at(&2, 1);

        let t = state.disable();
        assert_eq!(t.to, SelectionMode::Inactive);
        assert!(!state.is_activated());
        assert!(!state.is_entering());
        assert!(state.is_empty());
    }

    #[test]
    fn test_restore_activates_only_when_non_empty() {
        let mut state = SelectionState::<u32>::new();
        assert!(state.restore(Vec::new()).is_noop());
        assert_eq!(state.mode(), SelectionMode::Inactive);

        let t = state.restore(vec![4, 4, 7]);
        assert_eq!(t.to, SelectionMode::Active { entering: true });
        assert_eq!(state.selected(), &[4, 7]);
    }

    #[test]
    fn test_retain_deactivates_when_emptied() {
        let mut state = SelectionState::new();
        state.restore(vec![1, 2]);

        assert!(state.retain(|&i| i != 1).invalidations.is_empty());
        assert_eq!(state.selected(), &[2]);

        let t = state.retain(|_| false);
        assert_eq!(t.to, SelectionMode::Inactive);
    }

    #[test]
    fn test_navigation_icon_follows_activation() {
        let chrome = SelectionChrome::default();
        let mut state = SelectionState::new();
        assert_eq!(state.navigation_icon(&chrome), &chrome.inactive_icon);
        state.activate_at(Some((&1, 0)));
        assert_eq!(state.navigation_icon(&chrome), &chrome.active_icon);
    }

    #[test]
    fn test_take_all_returns_selection_in_order() {
        let mut state = SelectionState::new();
        state.restore(vec!["b", "a"]);
        let (items, t) = state.take_all();
        assert_eq!(items, vec!["b", "a"]);
        assert_eq!(t.to, SelectionMode::Inactive);
    }

    proptest! {
        #[test]
        fn prop_toggle_twice_restores_set(
            initial in proptest::collection::vec(0u8..20, 1..8),
            pick in 0u8..20,
        ) {
            let mut state = SelectionState::new();
            state.restore(initial.clone());
            state.toggle_at(&pick, 0);
            // The first toggle may have emptied the set and left selection mode.
            prop_assume!(state.is_activated());
            let before: Vec<u8> = {
                let mut s = SelectionState::new();
                s.restore(initial);
                let mut v = s.selected().to_vec();
                v.sort_unstable();
                v
            };
            state.toggle_at(&pick, 0);
            let mut after = state.selected().to_vec();
            after.sort_unstable();
            prop_assert_eq!(after, before);
        }

        #[test]
        fn prop_empty_set_is_never_active(
            ops in proptest::collection::vec((any::<bool>(), 0u8..6), 0..40),
        ) {
            let mut state = SelectionState::new();
            for (long_press, item) in ops {
                if long_press {
                    state.activate_at(Some((&item, item as usize)));
                } else {
                    state.toggle_at(&item, item as usize);
                }
                prop_assert_eq!(state.is_activated(), !state.is_empty());
                let mut dedup = state.selected().to_vec();
                dedup.sort_unstable();
                dedup.dedup();
                prop_assert_eq!(dedup.len(), state.len());
            }
        }
    }
}
