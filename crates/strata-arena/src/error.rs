//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use crate::handle::Handle;

/// Errors that can occur during arena operations.
///
/// Only writes fail. Reads through a stale handle silently return
/// fallback values instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Every id below the configured bound is in use.
    Exhausted {
        /// The exclusive id bound that was reached.
        limit: u32,
    },
    /// The arena was configured with `enabled = false`.
    Disabled,
    /// A release was requested that can never succeed.
    InvalidOperation {
        /// The handle passed to the release.
        handle: Handle,
        /// Why the release was rejected.
        misuse: CloseMisuse,
    },
}

/// Why a release was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseMisuse {
    /// The handle names the permanent fallback slot.
    Fallback,
    /// The slot was already released, possibly reused since.
    Stale,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted { limit } => {
                write!(f, "id space exhausted: all ids below {limit} are allocated")
            }
            Self::Disabled => write!(f, "arena is disabled"),
            Self::InvalidOperation { handle, misuse } => match misuse {
                CloseMisuse::Fallback => {
                    write!(f, "cannot close the fallback scope ({handle})")
                }
                CloseMisuse::Stale => {
                    write!(f, "cannot close an already-closed scope ({handle})")
                }
            },
        }
    }
}

impl Error for ArenaError {}
