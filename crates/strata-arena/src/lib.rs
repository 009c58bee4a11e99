//! Generational slot arena backing Strata scopes.
//!
//! Hands out small, reusable integer ids and lets holders of a cheap
//! [`Handle`] detect whether the slot it names still belongs to the scope
//! it was captured from.
//!
//! # Architecture
//!
//! ```text
//! SlotArena<C>
//! ├── IdRegistry   (allocated ids as coalesced half-open ranges)
//! └── SlotTable<C> (generation + parent link + label/context per slot)
//!          ▲
//!          └── Handle (slot index + generation snapshot, Copy)
//! ```
//!
//! Slot 0 is the permanent fallback slot. It is always valid, never
//! recycled, and is what every failed allocation degrades to.
//!
//! The arena is a plain `&mut self` data structure with no interior
//! mutability and no synchronisation. Sharing and reentrancy are the
//! facade's concern.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod registry;
pub mod slot;

// Public re-exports for the primary API surface.
pub use arena::SlotArena;
pub use config::{ArenaConfig, ConfigError};
pub use error::{ArenaError, CloseMisuse};
pub use handle::Handle;
pub use registry::{IdRange, IdRegistry};
pub use slot::{ParentLink, Slot, SlotTable};
