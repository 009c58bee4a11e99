//! Core types for the Strata scope arena.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! strongly-typed slot identifiers shared by the arena and the facade, and
//! the label rules every scope follows.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod label;

pub use id::{Generation, SlotIndex};
pub use label::{resolve_label, short_type_name, ANONYMOUS_LABEL, FALLBACK_LABEL, PATH_SEPARATOR};
