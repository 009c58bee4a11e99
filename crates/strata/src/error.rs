//! Facade error types.

use std::error::Error;
use std::fmt;

use strata_arena::{ArenaError, CloseMisuse};

/// Errors surfaced by [`Scope::close`](crate::Scope::close) and
/// [`ScopeArena::teardown`](crate::ScopeArena::teardown).
///
/// Opening a scope never fails visibly: it degrades to the fallback scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// The arena rejected the operation.
    Arena(ArenaError),
    /// The arena was already being mutated further up the call stack.
    Reentrant,
}

impl ScopeError {
    /// Whether this is a close of the fallback scope or a double close.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::Arena(ArenaError::InvalidOperation { .. }))
    }

    /// Whether this is specifically a close of an already-closed scope.
    pub fn is_double_close(&self) -> bool {
        matches!(
            self,
            Self::Arena(ArenaError::InvalidOperation {
                misuse: CloseMisuse::Stale,
                ..
            })
        )
    }
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena(err) => write!(f, "scope arena error: {err}"),
            Self::Reentrant => write!(f, "scope arena is already borrowed by an enclosing call"),
        }
    }
}

impl Error for ScopeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Arena(err) => Some(err),
            Self::Reentrant => None,
        }
    }
}

impl From<ArenaError> for ScopeError {
    fn from(err: ArenaError) -> Self {
        Self::Arena(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_arena::Handle;

    #[test]
    fn source_chains_to_arena_error() {
        let err = ScopeError::from(ArenaError::Exhausted { limit: 4 });
        let source = err.source().expect("source");
        assert_eq!(
            source.to_string(),
            "id space exhausted: all ids below 4 are allocated"
        );
        assert!(ScopeError::Reentrant.source().is_none());
    }

    #[test]
    fn classifies_close_misuse() {
        let stale = ScopeError::Arena(ArenaError::InvalidOperation {
            handle: Handle::FALLBACK,
            misuse: CloseMisuse::Stale,
        });
        let fallback = ScopeError::Arena(ArenaError::InvalidOperation {
            handle: Handle::FALLBACK,
            misuse: CloseMisuse::Fallback,
        });
        assert!(stale.is_invalid_operation());
        assert!(stale.is_double_close());
        assert!(fallback.is_invalid_operation());
        assert!(!fallback.is_double_close());
        assert!(!ScopeError::Reentrant.is_invalid_operation());
    }
}
