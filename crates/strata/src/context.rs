//! Opaque caller context attached to a scope.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use strata_core::short_type_name;

/// A shared, type-erased reference attached to a scope.
///
/// Remembers the short name of the concrete type so a scope opened with a
/// context but no label can be labelled after it.
#[derive(Clone)]
pub struct ScopeContext {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

impl ScopeContext {
    /// Wrap an owned value.
    pub fn new<T: Any>(value: T) -> Self {
        Self::from_rc(Rc::new(value))
    }

    /// Wrap an already shared value without cloning it.
    pub fn from_rc<T: Any>(value: Rc<T>) -> Self {
        Self {
            value,
            type_name: short_type_name::<T>(),
        }
    }

    /// Short name of the wrapped type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the value as `T`, if that is its type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Get a shared reference to the value as `T`, if that is its type.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.value).downcast::<T>().ok()
    }

    /// Whether both contexts wrap the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for ScopeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeContext")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
