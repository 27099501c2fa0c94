//! Type-to-presentation mapping.
//!
//! A [`PresentationMap`] answers "which layout draws this item, and into
//! which binding slot does the item go". Entries are keyed by the item's
//! [`TaggedItem::Tag`], an explicit discriminant rather than a runtime type,
//! so heterogeneous rows can share one list without reflection.
//!
//! # Example
//!
//! ```
//! use rowbind::model::{PresentationMap, TaggedItem};
//! use rowbind::{BindingSlot, LayoutId};
//!
//! #[derive(Clone, PartialEq)]
//! enum Row { Header(String), Entry(u32) }
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum RowTag { Header, Entry }
//!
//! impl TaggedItem for Row {
//!     type Tag = RowTag;
//!     fn tag(&self) -> RowTag {
//!         match self {
//!             Row::Header(_) => RowTag::Header,
//!             Row::Entry(_) => RowTag::Entry,
//!         }
//!     }
//! }
//!
//! let map = PresentationMap::<Row>::builder()
//!     .default_slot(BindingSlot(1))
//!     .map_layout(RowTag::Header, LayoutId(10))
//!     .map_variants(RowTag::Entry, vec![LayoutId(20), LayoutId(21)], BindingSlot(2), |row, _| {
//!         matches!(row, Row::Entry(n) if n % 2 == 1) as usize
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(map.resolve(&Row::Entry(3), 0).unwrap().layout, LayoutId(21));
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{AdapterError, Result};
use crate::host::{BindingSlot, LayoutId};

/// Items that expose an explicit discriminant for presentation lookup.
pub trait TaggedItem {
    /// The discriminant type, usually a fieldless enum mirroring the item enum.
    type Tag: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns this item's tag.
    fn tag(&self) -> Self::Tag;
}

/// Everything the adapter needs from an item type.
pub trait AdapterItem: TaggedItem + Clone + PartialEq + Send + Sync + 'static {}

impl<T> AdapterItem for T where T: TaggedItem + Clone + PartialEq + Send + Sync + 'static {}

/// Chooses a layout variant for `(item, position)`; the result indexes the
/// entry's layout list.
pub type VariantSelector<T> = Arc<dyn Fn(&T, usize) -> usize + Send + Sync>;

/// One registered presentation: candidate layouts, a binding slot and a selector.
pub struct PresentationEntry<T> {
    layouts: Vec<LayoutId>,
    slot: BindingSlot,
    selector: VariantSelector<T>,
}

impl<T> Clone for PresentationEntry<T> {
    fn clone(&self) -> Self {
        Self {
            layouts: self.layouts.clone(),
            slot: self.slot,
            selector: self.selector.clone(),
        }
    }
}

impl<T> Debug for PresentationEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationEntry")
            .field("layouts", &self.layouts)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

impl<T> PresentationEntry<T> {
    /// A single layout; the selector always picks variant 0.
    pub fn single(layout: LayoutId, slot: BindingSlot) -> Self {
        Self {
            layouts: vec![layout],
            slot,
            selector: Arc::new(|_, _| 0),
        }
    }

    /// Several layouts chosen per item by `selector`.
    pub fn variants<F>(layouts: Vec<LayoutId>, slot: BindingSlot, selector: F) -> Self
    where
        F: Fn(&T, usize) -> usize + Send + Sync + 'static,
    {
        Self {
            layouts,
            slot,
            selector: Arc::new(selector),
        }
    }

    /// Candidate layouts in variant order.
    pub fn layouts(&self) -> &[LayoutId] {
        &self.layouts
    }

    /// The binding slot that receives the item.
    pub fn binding_slot(&self) -> BindingSlot {
        self.slot
    }

    /// Runs the selector. Returns the chosen variant index and its layout,
    /// or `None` for the layout when the index is out of range.
    pub fn select(&self, item: &T, position: usize) -> (usize, Option<LayoutId>) {
        let variant = (self.selector)(item, position);
        (variant, self.layouts.get(variant).copied())
    }
}

/// The result of resolving an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Layout to inflate; doubles as the row's view-kind.
    pub layout: LayoutId,
    /// Slot that receives the item.
    pub slot: BindingSlot,
}

/// Immutable tag → presentation table.
pub struct PresentationMap<T: TaggedItem> {
    entries: HashMap<T::Tag, PresentationEntry<T>>,
}

impl<T: TaggedItem> Debug for PresentationMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<T: TaggedItem> PresentationMap<T> {
    /// Starts a new map.
    pub fn builder() -> PresentationMapBuilder<T> {
        PresentationMapBuilder::new()
    }

    /// Resolves `item` at `position` to a layout and slot.
    ///
    /// Fails with [`AdapterError::UnmappedType`] if the tag is not registered
    /// and [`AdapterError::InvalidVariant`] if the selector picks a layout
    /// index outside the entry's list.
    pub fn resolve(&self, item: &T, position: usize) -> Result<Resolved> {
        let tag = item.tag();
        let entry = self
            .entries
            .get(&tag)
            .ok_or_else(|| AdapterError::unmapped(tag, Some(position)))?;

        match entry.select(item, position) {
            (_, Some(layout)) => Ok(Resolved {
                layout,
                slot: entry.slot,
            }),
            (variant, None) => Err(AdapterError::InvalidVariant {
                tag: format!("{tag:?}"),
                variant,
                layout_count: entry.layouts.len(),
            }),
        }
    }

    /// Looks up the binding slot for `item` without running the selector.
    pub fn binding_slot(&self, item: &T) -> Result<BindingSlot> {
        let tag = item.tag();
        self.entries
            .get(&tag)
            .map(PresentationEntry::binding_slot)
            .ok_or_else(|| AdapterError::unmapped(tag, None))
    }

    /// The entry registered for `tag`.
    pub fn entry(&self, tag: T::Tag) -> Option<&PresentationEntry<T>> {
        self.entries.get(&tag)
    }

    /// Whether `tag` has an entry.
    pub fn contains(&self, tag: T::Tag) -> bool {
        self.entries.contains_key(&tag)
    }

    /// Number of registered tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum PendingSlot {
    Explicit(BindingSlot),
    Default,
}

/// Fluent builder for [`PresentationMap`].
///
/// Later registrations for the same tag replace earlier ones.
pub struct PresentationMapBuilder<T: TaggedItem> {
    default_slot: Option<BindingSlot>,
    pending: Vec<(T::Tag, PendingSlot, PresentationEntry<T>)>,
}

impl<T: TaggedItem> Default for PresentationMapBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TaggedItem> PresentationMapBuilder<T> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self {
            default_slot: None,
            pending: Vec::new(),
        }
    }

    /// Slot used by [`map_layout`](Self::map_layout) registrations.
    pub fn default_slot(mut self, slot: BindingSlot) -> Self {
        self.default_slot = Some(slot);
        self
    }

    /// Registers a single layout and slot for `tag`.
    pub fn map(mut self, tag: T::Tag, layout: LayoutId, slot: BindingSlot) -> Self {
        self.pending
            .push((tag, PendingSlot::Explicit(slot), PresentationEntry::single(layout, slot)));
        self
    }

    /// Registers a single layout for `tag`, bound through the default slot.
    pub fn map_layout(mut self, tag: T::Tag, layout: LayoutId) -> Self {
        let placeholder = BindingSlot(0);
        self.pending.push((
            tag,
            PendingSlot::Default,
            PresentationEntry::single(layout, placeholder),
        ));
        self
    }

    /// Registers several layouts for `tag`, chosen per item by `selector`.
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
        self.pending.push((
            tag,
            PendingSlot::Explicit(slot),
            PresentationEntry::variants(layouts, slot, selector),
        ));
        self
    }

    /// Registers a prepared entry for `tag`.
    pub fn entry(mut self, tag: T::Tag, entry: PresentationEntry<T>) -> Self {
        let slot = entry.slot;
        self.pending.push((tag, PendingSlot::Explicit(slot), entry));
        self
    }

    /// Finishes the map.
    ///
    /// Fails with [`AdapterError::MissingBindingSlot`] if a
    /// [`map_layout`](Self::map_layout) registration has no default slot to
    /// fall back on.
    pub fn build(self) -> Result<PresentationMap<T>> {
        let mut entries = HashMap::with_capacity(self.pending.len());
        for (tag, pending_slot, mut entry) in self.pending {
            entry.slot = match pending_slot {
                PendingSlot::Explicit(slot) => slot,
                PendingSlot::Default => self.default_slot.ok_or_else(|| {
                    AdapterError::MissingBindingSlot {
                        tag: format!("{tag:?}"),
                    }
                })?,
            };
            if entries.insert(tag, entry).is_some() {
                tracing::debug!(
                    target: "rowbind::presentation",
                    ?tag,
                    "presentation entry replaced by a later registration"
                );
            }
        }
        tracing::trace!(target: "rowbind::presentation", entries = entries.len(), "presentation map built");
        Ok(PresentationMap { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Item {
        A(u32),
        B(u32),
        C,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Tag {
        A,
        B,
        C,
    }

    impl TaggedItem for Item {
        type Tag = Tag;

        fn tag(&self) -> Tag {
            match self {
                Item::A(_) => Tag::A,
                Item::B(_) => Tag::B,
                Item::C => Tag::C,
            }
        }
    }

    #[test]
    fn test_last_registration_wins() {
        let map = PresentationMap::<Item>::builder()
            .map(Tag::A, LayoutId(1), BindingSlot(7))
            .map(Tag::A, LayoutId(2), BindingSlot(7))
            .build()
            .unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.resolve(&Item::A(0), 0).unwrap().layout, LayoutId(2));
    }

    #[test]
    fn test_unmapped_tag_fails() {
        let map = PresentationMap::<Item>::builder()
            .map(Tag::A, LayoutId(1), BindingSlot(1))
            .build()
            .unwrap();

        let err = map.resolve(&Item::C, 4).unwrap_err();
        match err {
            AdapterError::UnmappedType { tag, position } => {
                assert_eq!(tag, "C");
                assert_eq!(position, Some(4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            map.binding_slot(&Item::C),
            Err(AdapterError::UnmappedType { position: None, .. })
        ));
    }

    #[test]
    fn test_out_of_range_variant_fails() {
        let map = PresentationMap::<Item>::builder()
            .map_variants(Tag::B, vec![LayoutId(1), LayoutId(2)], BindingSlot(3), |_, _| 5)
            .build()
            .unwrap();

        match map.resolve(&Item::B(0), 0).unwrap_err() {
            AdapterError::InvalidVariant {
                variant,
                layout_count,
                ..
            } => {
                assert_eq!(variant, 5);
                assert_eq!(layout_count, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_selector_sees_item_and_position() {
        let map = PresentationMap::<Item>::builder()
            .map_variants(
                Tag::B,
                vec![LayoutId(10), LayoutId(11), LayoutId(12)],
                BindingSlot(3),
                |item, position| match item {
                    Item::B(n) => (*n as usize + position) % 3,
                    _ => 0,
                },
            )
            .build()
            .unwrap();

        assert_eq!(
            map.resolve(&Item::B(1), 1).unwrap(),
            Resolved {
                layout: LayoutId(12),
                slot: BindingSlot(3)
            }
        );
    }

    #[test]
    fn test_map_layout_uses_default_slot() {
        let map = PresentationMap::<Item>::builder()
            .map_layout(Tag::A, LayoutId(1))
            .default_slot(BindingSlot(9))
            .build()
            .unwrap();

        assert_eq!(map.binding_slot(&Item::A(1)).unwrap(), BindingSlot(9));
    }

    #[test]
    fn test_map_layout_without_default_slot_fails() {
        let result = PresentationMap::<Item>::builder()
            .map_layout(Tag::A, LayoutId(1))
            .build();
        assert!(matches!(result, Err(AdapterError::MissingBindingSlot { .. })));
    }

    #[test]
    fn test_empty_layout_list_is_invalid_variant() {
        let map = PresentationMap::<Item>::builder()
            .entry(Tag::C, PresentationEntry::variants(Vec::new(), BindingSlot(1), |_, _| 0))
            .build()
            .unwrap();
        assert!(matches!(
            map.resolve(&Item::C, 0),
            Err(AdapterError::InvalidVariant { layout_count: 0, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_resolve_returns_last_registration(
            regs in proptest::collection::vec((0u8..3, 0u32..100), 1..30),
        ) {
            let tag_of = |t: u8| match t { 0 => Tag::A, 1 => Tag::B, _ => Tag::C };
            let mut builder = PresentationMap::<Item>::builder();
            let mut expected: HashMap<Tag, u32> = HashMap::new();
            for (t, layout) in &regs {
                builder = builder.map(tag_of(*t), LayoutId(*layout), BindingSlot(u32::from(*t)));
                expected.insert(tag_of(*t), *layout);
            }
            let map = builder.build().unwrap();

            for (item, tag) in [(Item::A(0), Tag::A), (Item::B(0), Tag::B), (Item::C, Tag::C)] {
                match expected.get(&tag) {
                    Some(layout) => prop_assert_eq!(map.resolve(&item, 0).unwrap().layout, LayoutId(*layout)),
                    None => prop_assert!(
                        matches!(map.resolve(&item, 0), Err(AdapterError::UnmappedType { .. })),
                        "unregistered tag must fail"
                    ),
                }
            }
        }
    }
}
