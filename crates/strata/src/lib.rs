//! Strata: nestable diagnostic scopes backed by a generational handle arena.
//!
//! A caller opens a [`Scope`], optionally naming it, attaching a context,
//! and nesting it under a parent. The scope holds a cheap handle into a
//! [`ScopeArena`] and closes itself when dropped. Handles detect when the
//! slot they name has been recycled, so a child whose parent closed simply
//! reports no parent instead of resolving to an unrelated scope.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let arena = ScopeArena::new(ArenaConfig {
//!     enabled: true,
//!     ..ArenaConfig::default()
//! })?;
//! let request = arena.open_labeled("request");
//! let db = request.child("db");
//! assert_eq!(db.path(), "request::db");
//!
//! drop(request);
//! assert!(db.parent().is_none());
//! assert_eq!(db.label(), "db");
//! # Ok::<(), strata::ConfigError>(())
//! ```
//!
//! Opening never fails: an exhausted or disabled arena hands back the
//! fallback scope, which is always valid and labelled `"Fallback"`. Only
//! misuse of [`Scope::close`] is reported as an error.
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `strata-arena` | `SlotArena`, `IdRegistry`, `Handle`, config |
//! | [`types`] | `strata-core` | `SlotIndex`, `Generation`, label rules |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod error;
pub mod scope;
pub mod scope_arena;
pub mod sink;

/// The slot arena, id registry and handles (`strata-arena`).
pub use strata_arena as arena;

/// Slot identifiers and label rules (`strata-core`).
pub use strata_core as types;

pub use context::ScopeContext;
pub use error::ScopeError;
pub use scope::{Scope, ScopeBuilder, ScopeView};
pub use scope_arena::ScopeArena;
pub use sink::{Level, LogSink, Record, Sink};
pub use strata_arena::{ArenaConfig, ConfigError, Handle};

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArenaConfig, Level, Scope, ScopeArena, ScopeContext, ScopeError, ScopeView, Sink,
    };
}
