//! Output sinks for scope emission.
//!
//! The arena never writes through a sink itself. Only the explicit
//! emission methods on [`ScopeView`](crate::ScopeView) do.

use std::fmt;

pub use log::Level;

/// One emitted message, borrowed for the duration of the sink call.
pub struct Record<'a> {
    /// Severity.
    pub level: Level,
    /// Label of the emitting scope.
    pub label: &'a str,
    /// Ancestor labels joined with `::`, ending with `label`.
    pub path: &'a str,
    /// The message body.
    pub message: &'a dyn fmt::Display,
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("level", &self.level)
            .field("path", &self.path)
            .field("message", &self.message.to_string())
            .finish()
    }
}

/// Destination for emitted records.
///
/// Called with no arena borrow held, so a sink may open and close scopes.
pub trait Sink {
    /// Deliver one record.
    fn emit(&self, record: &Record<'_>);
}

impl<F> Sink for F
where
    F: Fn(&Record<'_>),
{
    fn emit(&self, record: &Record<'_>) {
        self(record)
    }
}

/// Default sink: forwards to the [`log`] facade as `[path] message`.
#[derive(Clone, Debug)]
pub struct LogSink {
    target: &'static str,
}

impl LogSink {
    /// Log target used by [`LogSink::default`].
    pub const DEFAULT_TARGET: &'static str = "strata";

    /// A sink logging under `target`.
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    /// The log target.
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TARGET)
    }
}

impl Sink for LogSink {
    fn emit(&self, record: &Record<'_>) {
        log::log!(target: self.target, record.level, "[{}] {}", record.path, record.message);
    }
}
