//! Non-owning slot handles.
//!
//! A [`Handle`] names a slot by index plus the generation the slot had when
//! the handle was captured. It never owns the slot. Once the slot is freed
//! the generations disagree and the handle reads as invalid, even after the
//! index has been handed to an unrelated scope.

use std::fmt;

use strata_core::{Generation, SlotIndex, FALLBACK_LABEL};

use crate::arena::SlotArena;

/// Slot index plus generation snapshot.
///
/// `Handle::default()` is the fallback handle, which is always valid. "No
/// scope" and "the fallback scope" are deliberately the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Handle {
    index: SlotIndex,
    generation: Generation,
}

impl Handle {
    /// The fallback handle.
    pub const FALLBACK: Self = Self {
        index: SlotIndex::FALLBACK,
        generation: Generation::INITIAL,
    };

    /// Build a handle from raw parts.
    ///
    /// Mostly useful in tests; handles obtained from the arena always carry
    /// the slot's generation at capture time.
    pub fn from_parts(index: SlotIndex, generation: Generation) -> Self {
        Self { index, generation }
    }

    /// The slot this handle names.
    pub fn index(&self) -> SlotIndex {
        self.index
    }

    /// The generation captured with this handle.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether this is the fallback handle.
    pub fn is_fallback(&self) -> bool {
        self.index.is_fallback()
    }

    /// Whether the slot still belongs to the scope this handle was captured from.
    ///
    /// The fallback handle is always valid. Any other handle must name an
    /// existing slot whose own generation matches the snapshot, whose id is
    /// allocated, and which has not been retired.
    pub fn is_valid<C>(&self, arena: &SlotArena<C>) -> bool {
        if self.is_fallback() {
            return true;
        }
        let Some(slot) = arena.slots.get(self.index) else {
            return false;
        };
        slot.generation == self.generation
            && !slot.retired
            && arena.registry.is_allocated(self.index.0)
    }

    /// Label of the referenced slot, or the fallback label if invalid.
    pub fn label<'a, C>(&self, arena: &'a SlotArena<C>) -> &'a str {
        if !self.is_valid(arena) {
            return FALLBACK_LABEL;
        }
        arena
            .slots
            .get(self.index)
            .map_or(FALLBACK_LABEL, |slot| slot.label.as_str())
    }

    /// Context of the referenced slot, or `None` if invalid.
    pub fn context<'a, C>(&self, arena: &'a SlotArena<C>) -> Option<&'a C> {
        if !self.is_valid(arena) {
            return None;
        }
        arena.slots.get(self.index)?.context.as_ref()
    }

    /// Resolve the parent one hop up.
    ///
    /// Returns `None` when the parent has since been closed (or its slot
    /// recycled), and when the parent is the fallback slot unless
    /// `include_fallback` is set. An invalid handle has no parent beyond
    /// the fallback.
    pub fn resolve_parent<C>(&self, arena: &SlotArena<C>, include_fallback: bool) -> Option<Handle> {
        if !self.is_valid(arena) {
            return include_fallback.then_some(Handle::FALLBACK);
        }
        let link = arena.slots.get(self.index)?.parent;
        let candidate = Handle::from_parts(link.index, link.generation);
        if candidate.is_fallback() {
            return include_fallback.then_some(Handle::FALLBACK);
        }
        candidate.is_valid(arena).then_some(candidate)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(slot={}, gen={})", self.index, self.generation)
    }
}
