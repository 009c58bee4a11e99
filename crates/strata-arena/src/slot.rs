//! Flat slot storage addressed by raw index.
//!
//! [`SlotTable`] performs no validity checking. Callers confirm allocation
//! state through the [`IdRegistry`](crate::IdRegistry) first and only then
//! write or free a slot.

use strata_core::{Generation, SlotIndex, FALLBACK_LABEL};

/// Parent reference fixed at the moment a slot is written.
///
/// Stores the parent's generation at link time, so a parent slot that was
/// since recycled is not mistaken for the original parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParentLink {
    /// Slot index of the parent.
    pub index: SlotIndex,
    /// The parent's generation when the link was made.
    pub generation: Generation,
}

impl ParentLink {
    /// Link to the fallback slot, meaning "no parent".
    pub const FALLBACK: Self = Self {
        index: SlotIndex::FALLBACK,
        generation: Generation::INITIAL,
    };
}

/// A single storage cell.
#[derive(Clone, Debug)]
pub struct Slot<C> {
    /// Bumped on every allocated→free transition.
    pub generation: Generation,
    /// Parent link; meaningful only while allocated.
    pub parent: ParentLink,
    /// Human-readable label.
    pub label: String,
    /// Opaque caller context.
    pub context: Option<C>,
    /// Set once the generation counter is exhausted. A retired slot keeps
    /// its id allocated forever and never validates a handle again.
    pub retired: bool,
}

impl<C> Default for Slot<C> {
    fn default() -> Self {
        Self {
            generation: Generation::INITIAL,
            parent: ParentLink::FALLBACK,
            label: FALLBACK_LABEL.to_owned(),
            context: None,
            retired: false,
        }
    }
}

/// Growable array of slots. Slot 0 is the permanent fallback slot.
#[derive(Clone, Debug)]
pub struct SlotTable<C> {
    slots: Vec<Slot<C>>,
}

impl<C> SlotTable<C> {
    /// Create a table holding only the fallback slot, with room reserved
    /// for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity.max(1));
        slots.push(Slot::default());
        Self { slots }
    }

    /// Number of slots, including the fallback slot.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always false: the fallback slot is never removed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at `index`, if the table is that large.
    pub fn get(&self, index: SlotIndex) -> Option<&Slot<C>> {
        self.slots.get(index.as_usize())
    }

    /// Append default slots until `index` is addressable.
    pub fn grow_to(&mut self, index: SlotIndex) {
        let needed = index.as_usize() + 1;
        if self.slots.len() < needed {
            self.slots.resize_with(needed, Slot::default);
        }
    }

    /// Populate a freshly allocated slot. Returns its current generation.
    ///
    /// # Panics
    ///
    /// Panics if `index` was not grown into first.
    pub fn write(
        &mut self,
        index: SlotIndex,
        label: String,
        context: Option<C>,
        parent: ParentLink,
    ) -> Generation {
        let slot = &mut self.slots[index.as_usize()];
        slot.label = label;
        slot.context = context;
        slot.parent = parent;
        slot.generation
    }

    /// Reset a slot after its id was released and bump its generation.
    ///
    /// Returns the removed context so the caller decides when it is
    /// dropped. If the generation cannot be bumped the slot is retired
    /// instead; the caller must then keep its id allocated.
    pub fn free(&mut self, index: SlotIndex) -> Option<C> {
        let slot = &mut self.slots[index.as_usize()];
        match slot.generation.next() {
            Some(next) => slot.generation = next,
            None => slot.retired = true,
        }
        slot.parent = ParentLink::FALLBACK;
        slot.label.clear();
        slot.label.push_str(FALLBACK_LABEL);
        slot.context.take()
    }

    #[cfg(test)]
    pub(crate) fn slot_mut(&mut self, index: SlotIndex) -> &mut Slot<C> {
        &mut self.slots[index.as_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_holds_fallback_slot() {
        let table: SlotTable<u8> = SlotTable::with_capacity(0);
        assert_eq!(table.len(), 1);
        let fallback = table.get(SlotIndex::FALLBACK).unwrap();
        assert_eq!(fallback.label, FALLBACK_LABEL);
        assert_eq!(fallback.generation, Generation::INITIAL);
        assert!(fallback.context.is_none());
    }

    #[test]
    fn grow_to_appends_default_slots() {
        let mut table: SlotTable<u8> = SlotTable::with_capacity(4);
        table.grow_to(SlotIndex(5));
        assert_eq!(table.len(), 6);
        // Growing to a smaller index is a no-op.
        table.grow_to(SlotIndex(2));
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(SlotIndex(5)).unwrap().label, FALLBACK_LABEL);
    }

    #[test]
    fn write_then_free_bumps_generation_and_clears_payload() {
        let mut table = SlotTable::with_capacity(4);
        table.grow_to(SlotIndex(2));
        let parent = ParentLink {
            index: SlotIndex(1),
            generation: Generation(3),
        };
        let gen = table.write(SlotIndex(2), "load".into(), Some(7u8), parent);
        assert_eq!(gen, Generation::INITIAL);

        let slot = table.get(SlotIndex(2)).unwrap();
        assert_eq!(slot.label, "load");
        assert_eq!(slot.parent, parent);

        assert_eq!(table.free(SlotIndex(2)), Some(7));
        let slot = table.get(SlotIndex(2)).unwrap();
        assert_eq!(slot.generation, Generation(1));
        assert_eq!(slot.label, FALLBACK_LABEL);
        assert_eq!(slot.parent, ParentLink::FALLBACK);
        assert!(slot.context.is_none());
        assert!(!slot.retired);
    }

    #[test]
    fn free_at_max_generation_retires() {
        let mut table: SlotTable<u8> = SlotTable::with_capacity(2);
        table.grow_to(SlotIndex(1));
        table.slot_mut(SlotIndex(1)).generation = Generation(u64::MAX);
        table.free(SlotIndex(1));
        let slot = table.get(SlotIndex(1)).unwrap();
        assert!(slot.retired);
        assert_eq!(slot.generation, Generation(u64::MAX));
    }
}
