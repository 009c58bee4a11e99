//! The slot arena: id registry plus slot table.
//!
//! [`SlotArena`] is the only writer to both structures. Allocation and
//! release keep them in lock step, so a slot's generation is bumped in the
//! same call that releases its id.

use strata_core::SlotIndex;

use crate::config::{ArenaConfig, ConfigError};
use crate::error::{ArenaError, CloseMisuse};
use crate::handle::Handle;
use crate::registry::IdRegistry;
use crate::slot::{ParentLink, Slot, SlotTable};

/// Generational slot arena, generic over the opaque context type `C`.
#[derive(Clone, Debug)]
pub struct SlotArena<C> {
    config: ArenaConfig,
    pub(crate) registry: IdRegistry,
    pub(crate) slots: SlotTable<C>,
}

impl<C> SlotArena<C> {
    /// Create an arena holding only the fallback slot.
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            registry: IdRegistry::new(config.max_id),
            slots: SlotTable::with_capacity(config.initial_slots),
            config,
        })
    }

    /// The configuration this arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Check that [`allocate`](Self::allocate) would succeed right now.
    ///
    /// Lets a caller find out before handing over a context it would
    /// otherwise lose on failure.
    pub fn check_available(&self) -> Result<(), ArenaError> {
        if !self.config.enabled {
            return Err(ArenaError::Disabled);
        }
        self.registry.peek_next().map(|_| ())
    }

    /// Allocate a slot and return a handle to it.
    ///
    /// `parent` is linked only if it is a valid, non-fallback handle;
    /// anything else is recorded as "no parent".
    pub fn allocate(
        &mut self,
        label: impl Into<String>,
        context: Option<C>,
        parent: Handle,
    ) -> Result<Handle, ArenaError> {
        self.check_available()?;
        let link = if !parent.is_fallback() && parent.is_valid(self) {
            ParentLink {
                index: parent.index(),
                generation: parent.generation(),
            }
        } else {
            ParentLink::FALLBACK
        };

        let index = self.registry.allocate_next()?;
        self.slots.grow_to(index);
        let generation = self.slots.write(index, label.into(), context, link);
        Ok(Handle::from_parts(index, generation))
    }

    /// Release the slot `handle` names.
    ///
    /// Returns the slot's context, which the caller should drop once it no
    /// longer holds the arena mutably. Fails for the fallback handle and for
    /// handles that are no longer valid.
    pub fn release(&mut self, handle: Handle) -> Result<Option<C>, ArenaError> {
        if handle.is_fallback() {
            return Err(ArenaError::InvalidOperation {
                handle,
                misuse: CloseMisuse::Fallback,
            });
        }
        if !handle.is_valid(self) {
            return Err(ArenaError::InvalidOperation {
                handle,
                misuse: CloseMisuse::Stale,
            });
        }
        Ok(self.free_slot(handle.index()))
    }

    fn free_slot(&mut self, index: SlotIndex) -> Option<C> {
        let released = self.registry.release(index.0);
        debug_assert!(released, "valid handle for unallocated id {index}");
        let context = self.slots.free(index);
        if self.slots.get(index).is_some_and(|s| s.retired) {
            // Keep the id taken so the retired slot is never reissued.
            self.registry.mark_allocated(index.0);
        }
        context
    }

    /// Whether `handle` names a live slot (the fallback always is).
    pub fn is_valid(&self, handle: Handle) -> bool {
        handle.is_valid(self)
    }

    /// Label behind `handle`, degrading to the fallback label.
    pub fn label(&self, handle: Handle) -> &str {
        handle.label(self)
    }

    /// Context behind `handle`, degrading to `None`.
    pub fn context(&self, handle: Handle) -> Option<&C> {
        handle.context(self)
    }

    /// Parent of `handle`, see [`Handle::resolve_parent`].
    pub fn resolve_parent(&self, handle: Handle, include_fallback: bool) -> Option<Handle> {
        handle.resolve_parent(self, include_fallback)
    }

    /// Raw slot access for diagnostics. Performs no validity check.
    pub fn slot(&self, index: SlotIndex) -> Option<&Slot<C>> {
        self.slots.get(index)
    }

    /// The id registry.
    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    /// Number of open slots, excluding the fallback slot and retired slots.
    pub fn open_count(&self) -> usize {
        let retired = (1..self.slots.len())
            .filter(|&i| self.slots.get(SlotIndex(i as u32)).is_some_and(|s| s.retired))
            .count();
        self.registry.allocated_count() - retired
    }

    /// Number of slots in the table, including the fallback slot.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Free every open slot, invalidating all outstanding handles.
    ///
    /// Returns the contexts that were held so the caller can drop them
    /// outside any borrow of the arena.
    pub fn reset(&mut self) -> Vec<C> {
        let open: Vec<SlotIndex> = (1..self.slots.len())
            .map(|i| SlotIndex(i as u32))
            .filter(|&i| {
                self.registry.is_allocated(i.0) && self.slots.get(i).is_some_and(|s| !s.retired)
            })
            .collect();
        open.into_iter()
            .filter_map(|index| self.free_slot(index))
            .collect()
    }
}

impl<C> Default for SlotArena<C> {
    fn default() -> Self {
        Self {
            registry: IdRegistry::new(ArenaConfig::DEFAULT_MAX_ID),
            slots: SlotTable::with_capacity(ArenaConfig::DEFAULT_INITIAL_SLOTS),
            config: ArenaConfig::default(),
        }
    }
}
