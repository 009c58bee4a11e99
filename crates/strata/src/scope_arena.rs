//! Shared, single-threaded scope arena.
//!
//! [`ScopeArena`] wraps a [`SlotArena`] in `Rc<RefCell<..>>` so every scope
//! can reach the arena it came from. Cloning is cheap and all clones see the
//! same slots. The type is `!Send`: sharing across threads is out of scope.
//!
//! Mutations use `try_borrow_mut`. A call that arrives while the arena is
//! already mutably borrowed is reentrant and is rejected (closes) or
//! degraded to the fallback scope (opens). Contexts freed by a close are
//! dropped only after the borrow is released, and sinks are called with no
//! borrow held, so neither may trip the guard.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::Level;
use smallvec::SmallVec;
use strata_arena::{ArenaConfig, ArenaError, ConfigError, Handle, SlotArena};
use strata_core::{resolve_label, FALLBACK_LABEL, PATH_SEPARATOR};

use crate::context::ScopeContext;
use crate::error::ScopeError;
use crate::scope::{Scope, ScopeBuilder, ScopeView};
use crate::sink::{LogSink, Record, Sink};

struct Shared {
    slots: RefCell<SlotArena<ScopeContext>>,
    sink: Rc<dyn Sink>,
}

/// Cheaply cloneable handle to one arena of scopes.
#[derive(Clone)]
pub struct ScopeArena {
    shared: Rc<Shared>,
}

impl ScopeArena {
    /// Create an arena emitting through the default [`LogSink`].
    pub fn new(config: ArenaConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, LogSink::default())
    }

    /// Create an arena emitting through `sink`.
    pub fn with_sink(config: ArenaConfig, sink: impl Sink + 'static) -> Result<Self, ConfigError> {
        let slots = SlotArena::new(config)?;
        Ok(Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(slots),
                sink: Rc::new(sink),
            }),
        })
    }

    /// Start building a scope with a parent, label or context.
    pub fn scope(&self) -> ScopeBuilder<'_> {
        ScopeBuilder::new(self)
    }

    /// Open an unlabeled root scope.
    pub fn open(&self) -> Scope {
        self.scope().open()
    }

    /// Open a root scope with `label`.
    pub fn open_labeled(&self, label: &str) -> Scope {
        self.scope().label(label).open()
    }

    /// Open a root scope labelled after its context's type.
    pub fn open_with_context(&self, context: ScopeContext) -> Scope {
        self.scope().context(context).open()
    }

    /// Open a root scope with both a label and a context.
    pub fn open_with(&self, label: &str, context: ScopeContext) -> Scope {
        self.scope().label(label).context(context).open()
    }

    /// Open a short-lived labelled scope, emit one message, and close it.
    pub fn emit_labeled(&self, level: Level, label: &str, message: impl fmt::Display) {
        let scope = self.open_labeled(label);
        scope.emit(level, message);
    }

    /// One-shot emission from a scope labelled after `context`'s type.
    pub fn emit_with_context(
        &self,
        level: Level,
        context: ScopeContext,
        message: impl fmt::Display,
    ) {
        let scope = self.open_with_context(context);
        scope.emit(level, message);
    }

    /// One-shot emission from a scope with both a label and a context.
    pub fn emit_with(
        &self,
        level: Level,
        label: &str,
        context: ScopeContext,
        message: impl fmt::Display,
    ) {
        let scope = self.open_with(label, context);
        scope.emit(level, message);
    }

    /// Close every open scope at once.
    ///
    /// Every outstanding scope reads as closed afterwards, and dropping it
    /// is a no-op. Returns how many scopes were closed.
    pub fn teardown(&self) -> Result<usize, ScopeError> {
        let (closed, contexts) = {
            let mut slots = self
                .shared
                .slots
                .try_borrow_mut()
                .map_err(|_| ScopeError::Reentrant)?;
            let closed = slots.open_count();
            (closed, slots.reset())
        };
        drop(contexts);
        log::debug!(target: LogSink::DEFAULT_TARGET, "arena teardown closed {closed} scopes");
        Ok(closed)
    }

    /// Number of open scopes, not counting the fallback scope.
    pub fn open_count(&self) -> usize {
        self.shared.slots.try_borrow().map_or(0, |s| s.open_count())
    }

    /// Number of slots the arena has grown to, including the fallback slot.
    pub fn slot_count(&self) -> usize {
        self.shared.slots.try_borrow().map_or(1, |s| s.slot_count())
    }

    /// Whether the arena hands out scopes at all.
    pub fn is_enabled(&self) -> bool {
        self.shared
            .slots
            .try_borrow()
            .is_ok_and(|s| s.config().enabled)
    }

    /// Whether `self` and `other` are the same arena.
    pub fn same_arena(&self, other: &ScopeArena) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Run `f` against the slot arena, for diagnostics and tests.
    ///
    /// Returns `None` if the arena is currently mutably borrowed.
    pub fn inspect<R>(&self, f: impl FnOnce(&SlotArena<ScopeContext>) -> R) -> Option<R> {
        self.shared.slots.try_borrow().ok().map(|s| f(&s))
    }

    pub(crate) fn open_raw(
        &self,
        label: Option<&str>,
        context: Option<ScopeContext>,
        parent: Handle,
    ) -> Scope {
        let label = resolve_label(label, context.as_ref().map(ScopeContext::type_name));
        let mut context = context;

        let outcome = match self.shared.slots.try_borrow_mut() {
            Ok(mut slots) => match slots.check_available() {
                Ok(()) => slots
                    .allocate(label, context.take(), parent)
                    .map_err(ScopeError::from),
                Err(err) => Err(err.into()),
            },
            Err(_) => Err(ScopeError::Reentrant),
        };

        match outcome {
            Ok(handle) => Scope::open(ScopeView::new(self.clone(), handle)),
            Err(ScopeError::Arena(ArenaError::Disabled)) => Scope::default(),
            Err(err) => {
                log::debug!(
                    target: LogSink::DEFAULT_TARGET,
                    "scope open degraded to fallback: {err}"
                );
                // Stay attached so emission reaches this arena's sink and
                // children can still open once ids free up.
                Scope::open(ScopeView::new(self.clone(), Handle::FALLBACK))
            }
        }
    }

    pub(crate) fn close_handle(&self, handle: Handle) -> Result<(), ScopeError> {
        let context = {
            let mut slots = self
                .shared
                .slots
                .try_borrow_mut()
                .map_err(|_| ScopeError::Reentrant)?;
            slots.release(handle)?
        };
        drop(context);
        Ok(())
    }

    pub(crate) fn is_valid(&self, handle: Handle) -> bool {
        handle.is_fallback()
            || self
                .shared
                .slots
                .try_borrow()
                .is_ok_and(|s| handle.is_valid(&*s))
    }

    pub(crate) fn label(&self, handle: Handle) -> String {
        match self.shared.slots.try_borrow() {
            Ok(slots) => handle.label(&*slots).to_owned(),
            Err(_) => FALLBACK_LABEL.to_owned(),
        }
    }

    pub(crate) fn context(&self, handle: Handle) -> Option<ScopeContext> {
        let slots = self.shared.slots.try_borrow().ok()?;
        handle.context(&*slots).cloned()
    }

    pub(crate) fn resolve_parent(&self, handle: Handle, include_fallback: bool) -> Option<Handle> {
        match self.shared.slots.try_borrow() {
            Ok(slots) => handle.resolve_parent(&*slots, include_fallback),
            Err(_) => include_fallback.then_some(Handle::FALLBACK),
        }
    }

    pub(crate) fn path(&self, handle: Handle) -> String {
        let Ok(slots) = self.shared.slots.try_borrow() else {
            return FALLBACK_LABEL.to_owned();
        };
        let depth = slots.config().max_path_depth;
        let mut chain: SmallVec<[Handle; 8]> = SmallVec::new();
        let mut cursor = Some(handle);
        while let Some(h) = cursor {
            if chain.len() == depth {
                break;
            }
            chain.push(h);
            cursor = h.resolve_parent(&*slots, false);
        }
        let labels: Vec<&str> = chain.iter().rev().map(|h| h.label(&*slots)).collect();
        labels.join(PATH_SEPARATOR)
    }

    pub(crate) fn emit(&self, handle: Handle, level: Level, message: &dyn fmt::Display) {
        let label = self.label(handle);
        let path = self.path(handle);
        let sink = Rc::clone(&self.shared.sink);
        sink.emit(&Record {
            level,
            label: &label,
            path: &path,
            message,
        });
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(SlotArena::default()),
                sink: Rc::new(LogSink::default()),
            }),
        }
    }
}

impl fmt::Debug for ScopeArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeArena")
            .field("open", &self.open_count())
            .field("slots", &self.slot_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_arena::CloseMisuse;

    fn arena() -> ScopeArena {
        ScopeArena::new(ArenaConfig {
            enabled: true,
            ..ArenaConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn open_while_borrowed_degrades_to_fallback() {
        let arena = arena();
        let guard = arena.shared.slots.borrow_mut();
        let scope = arena.open_labeled("inner");
        assert!(scope.is_fallback());
        drop(guard);
        assert_eq!(arena.open_count(), 0);
        assert!(scope.arena().is_some_and(|a| a.same_arena(&arena)));
        assert!(scope.child("later").is_open());
    }

    #[test]
    fn close_while_borrowed_is_reentrant() {
        let arena = arena();
        let mut scope = arena.open_labeled("outer");
        let handle = scope.handle();
        {
            let _guard = arena.shared.slots.borrow_mut();
            assert_eq!(arena.close_handle(handle), Err(ScopeError::Reentrant));
        }
        assert!(scope.is_open());
        assert_eq!(scope.close(), Ok(()));
    }

    #[test]
    fn reads_while_borrowed_degrade() {
        let arena = arena();
        let scope = arena.open_labeled("outer");
        let _guard = arena.shared.slots.borrow_mut();
        assert_eq!(scope.label(), FALLBACK_LABEL);
        assert!(scope.context().is_none());
        assert!(scope.parent().is_none());
        assert_eq!(scope.path(), FALLBACK_LABEL);
        assert_eq!(arena.open_count(), 0);
    }

    #[test]
    fn teardown_closes_everything() {
        let arena = arena();
        let a = arena.open_labeled("a");
        let b = a.child("b");
        assert_eq!(arena.teardown(), Ok(2));
        assert!(!a.is_open());
        assert!(!b.is_open());
        assert_eq!(arena.open_count(), 0);
        // Closing after teardown is a double close.
        let mut a = a;
        let err = a.close().unwrap_err();
        assert_eq!(
            err,
            ScopeError::Arena(ArenaError::InvalidOperation {
                handle: a.handle(),
                misuse: CloseMisuse::Stale,
            })
        );
    }

    #[test]
    fn clones_share_slots() {
        let arena = arena();
        let other = arena.clone();
        let _s = arena.open_labeled("s");
        assert_eq!(other.open_count(), 1);
        assert!(arena.same_arena(&other));
        assert!(!arena.same_arena(&ScopeArena::default()));
    }

    #[test]
    fn inspect_exposes_registry() {
        let arena = arena();
        let _a = arena.open();
        let _b = arena.open();
        let ranges = arena.inspect(|s| s.registry().range_count()).unwrap();
        assert_eq!(ranges, 1);
    }
}
