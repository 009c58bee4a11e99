//! Scopes, read-only scope views, and the scope builder.
//!
//! A [`Scope`] owns exactly one slot for its lifetime and closes it when
//! dropped. A [`ScopeView`] names a slot without owning it; it is what
//! [`ScopeView::parent`] hands back, so resolving a parent never closes it.
//!
//! ```text
//!             open()                  close() / drop
//! (Unopened) ───────▶  Open  ───────────────────────▶  Closed
//!     │                                                  ▲
//!     └── id space exhausted / disabled ─▶ fallback ─────┘ (forever valid)
//! ```

use std::fmt;
use std::ops::Deref;

use log::Level;
use strata_arena::{ArenaError, CloseMisuse, Handle};
use strata_core::FALLBACK_LABEL;

use crate::context::ScopeContext;
use crate::error::ScopeError;
use crate::scope_arena::ScopeArena;
use crate::sink::{LogSink, Record, Sink};

/// Non-owning view of a scope.
///
/// Every read re-validates the handle and silently degrades to fallback
/// values once the scope has closed. `ScopeView::default()` is the fallback
/// scope and needs no arena.
#[derive(Clone, Default)]
pub struct ScopeView {
    arena: Option<ScopeArena>,
    handle: Handle,
}

impl ScopeView {
    pub(crate) fn new(arena: ScopeArena, handle: Handle) -> Self {
        Self {
            arena: Some(arena),
            handle,
        }
    }

    /// The fallback view.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// The underlying handle.
    pub fn handle(&self) -> Handle {
        self.handle
    }

    /// The arena this scope belongs to. `None` for a fallback scope that
    /// was never opened in an arena.
    pub fn arena(&self) -> Option<&ScopeArena> {
        self.arena.as_ref()
    }

    /// Whether this is the fallback scope.
    pub fn is_fallback(&self) -> bool {
        self.handle.is_fallback()
    }

    /// Whether this is a real scope that has not been closed yet.
    pub fn is_open(&self) -> bool {
        !self.is_fallback() && self.is_valid()
    }

    /// Whether reads return this scope's own values. Always true for the
    /// fallback scope.
    pub fn is_valid(&self) -> bool {
        match &self.arena {
            Some(arena) => arena.is_valid(self.handle),
            None => self.handle.is_fallback(),
        }
    }

    /// The scope's label, or `"Fallback"` once closed.
    pub fn label(&self) -> String {
        match &self.arena {
            Some(arena) => arena.label(self.handle),
            None => FALLBACK_LABEL.to_owned(),
        }
    }

    /// The scope's context, or `None` once closed.
    pub fn context(&self) -> Option<ScopeContext> {
        self.arena.as_ref()?.context(self.handle)
    }

    /// The parent scope, or `None` if there is none or it has closed.
    pub fn parent(&self) -> Option<ScopeView> {
        self.resolve_parent(false)
    }

    /// The parent scope, falling back to the fallback scope.
    pub fn parent_or_fallback(&self) -> ScopeView {
        self.resolve_parent(true).unwrap_or_default()
    }

    /// Resolve the parent one hop up, optionally reporting the fallback
    /// scope as a parent.
    pub fn resolve_parent(&self, include_fallback: bool) -> Option<ScopeView> {
        let Some(arena) = &self.arena else {
            return include_fallback.then(ScopeView::default);
        };
        let parent = arena.resolve_parent(self.handle, include_fallback)?;
        Some(ScopeView::new(arena.clone(), parent))
    }

    /// Labels from the outermost live ancestor down to this scope, joined
    /// with `::`.
    pub fn path(&self) -> String {
        match &self.arena {
            Some(arena) => arena.path(self.handle),
            None => FALLBACK_LABEL.to_owned(),
        }
    }

    /// Open a child scope labelled `label`.
    pub fn child(&self, label: &str) -> Scope {
        match &self.arena {
            Some(arena) => arena.scope().parent(self).label(label).open(),
            None => Scope::default(),
        }
    }

    /// Open a child scope carrying `context`.
    pub fn child_with_context(&self, label: Option<&str>, context: ScopeContext) -> Scope {
        let Some(arena) = &self.arena else {
            return Scope::default();
        };
        let builder = arena.scope().parent(self).context(context);
        match label {
            Some(label) => builder.label(label).open(),
            None => builder.open(),
        }
    }

    /// Emit `message` at `level` through the arena's sink.
    ///
    /// A fallback scope with no arena emits through a default [`LogSink`].
    pub fn emit(&self, level: Level, message: impl fmt::Display) {
        match &self.arena {
            Some(arena) => arena.emit(self.handle, level, &message),
            None => LogSink::default().emit(&Record {
                level,
                label: FALLBACK_LABEL,
                path: FALLBACK_LABEL,
                message: &message,
            }),
        }
    }

    /// Emit at [`Level::Error`].
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message);
    }

    /// Emit at [`Level::Warn`].
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::Warn, message);
    }

    /// Emit at [`Level::Info`].
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message);
    }

    /// Emit at [`Level::Debug`].
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message);
    }

    /// Emit at [`Level::Trace`].
    pub fn trace(&self, message: impl fmt::Display) {
        self.emit(Level::Trace, message);
    }
}

impl fmt::Debug for ScopeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeView")
            .field("handle", &self.handle)
            .field("label", &self.label())
            .finish()
    }
}

/// An open scope, closed exactly once: explicitly through
/// [`close`](Scope::close) or implicitly on drop.
///
/// Derefs to [`ScopeView`] for all read accessors.
#[derive(Default)]
pub struct Scope {
    view: ScopeView,
    closed: bool,
}

impl Scope {
    pub(crate) fn open(view: ScopeView) -> Self {
        Self {
            view,
            closed: false,
        }
    }

    /// The fallback scope. Closing it is an error; dropping it is a no-op.
    pub fn fallback() -> Self {
        Self::default()
    }

    /// A non-owning view of this scope.
    pub fn view(&self) -> &ScopeView {
        &self.view
    }

    /// Close the scope and free its slot.
    ///
    /// Fails with an invalid-operation error for the fallback scope and
    /// for a scope that is already closed, and with
    /// [`ScopeError::Reentrant`] if the arena is busy.
    pub fn close(&mut self) -> Result<(), ScopeError> {
        let Some(arena) = &self.view.arena else {
            return Err(ScopeError::Arena(ArenaError::InvalidOperation {
                handle: self.view.handle,
                misuse: CloseMisuse::Fallback,
            }));
        };
        arena.close_handle(self.view.handle)?;
        self.closed = true;
        Ok(())
    }
}

impl Deref for Scope {
    type Target = ScopeView;

    fn deref(&self) -> &ScopeView {
        &self.view
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.closed || self.view.is_fallback() {
            return;
        }
        match self.close() {
            Ok(()) => {}
            // Already closed by an arena teardown.
            Err(err) if err.is_double_close() => {}
            Err(err) => {
                log::warn!(
                    target: LogSink::DEFAULT_TARGET,
                    "failed to close scope {} on drop: {err}",
                    self.view.handle
                );
            }
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("handle", &self.view.handle)
            .field("label", &self.view.label())
            .field("closed", &self.closed)
            .finish()
    }
}

/// Builder for a scope with an optional parent, label and context.
#[must_use]
pub struct ScopeBuilder<'a> {
    arena: &'a ScopeArena,
    parent: Handle,
    label: Option<String>,
    context: Option<ScopeContext>,
}

impl<'a> ScopeBuilder<'a> {
    pub(crate) fn new(arena: &'a ScopeArena) -> Self {
        Self {
            arena,
            parent: Handle::FALLBACK,
            label: None,
            context: None,
        }
    }

    /// Nest the new scope under `parent`.
    ///
    /// A parent from a different arena, or one that is already closed, is
    /// ignored and the scope becomes a root.
    pub fn parent(mut self, parent: &ScopeView) -> Self {
        self.parent = match parent.arena() {
            Some(owner) if owner.same_arena(self.arena) => parent.handle(),
            _ => Handle::FALLBACK,
        };
        self
    }

    /// Label the scope. Blank labels are replaced by the context's type
    /// name, or `"Anonymous"`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach an opaque context.
    pub fn context(mut self, context: ScopeContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Open the scope. Never fails: an exhausted, disabled or busy arena
    /// yields the fallback scope.
    pub fn open(self) -> Scope {
        self.arena
            .open_raw(self.label.as_deref(), self.context, self.parent)
    }
}
