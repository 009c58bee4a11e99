//! Strongly-typed identifiers for arena slots.

use std::fmt;

/// Index of a slot in the arena's slot table.
///
/// Index 0 is the permanent fallback slot. Every other index is handed out
/// by the id registry and may be reused once the scope occupying it closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// The reserved fallback slot.
    pub const FALLBACK: Self = Self(0);

    /// Whether this is the fallback slot.
    pub fn is_fallback(self) -> bool {
        self.0 == 0
    }

    /// The index as a `usize`, for addressing the slot table.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Per-slot reuse counter.
///
/// Bumped by one every time a slot goes from allocated to free. A handle
/// whose snapshot differs from the slot's current generation refers to a
/// previous occupant of that slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// Generation every slot starts at.
    pub const INITIAL: Self = Self(0);

    /// The next generation, or `None` once the counter is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
