//! Test utilities and mock sinks for Strata development.
//!
//! Provides a [`RecordingSink`] that captures emitted records, arena
//! fixtures with small id spaces, and [`DropProbe`], a context whose drop
//! can be observed.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use strata::{ArenaConfig, Level, Record, ScopeArena, Sink};

/// One record captured by [`RecordingSink`], with owned fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Emission {
    pub level: Level,
    pub label: String,
    pub path: String,
    pub message: String,
}

/// Sink that stores every record it receives.
///
/// Clones share storage, so keep one clone for assertions and hand the
/// other to the arena.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<Emission>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Emission> {
        self.records.borrow().clone()
    }

    /// Just the `[path] message` lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .map(|e| format!("[{}] {}", e.path, e.message))
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl Sink for RecordingSink {
    fn emit(&self, record: &Record<'_>) {
        self.records.borrow_mut().push(Emission {
            level: record.level,
            label: record.label.to_owned(),
            path: record.path.to_owned(),
            message: record.message.to_string(),
        });
    }
}

/// An enabled config with ids `1..max_id` available.
pub fn config_with_limit(max_id: u32) -> ArenaConfig {
    ArenaConfig {
        max_id,
        enabled: true,
        ..ArenaConfig::default()
    }
}

/// An enabled arena with the default id space, recording into the returned sink.
pub fn recording_arena() -> (ScopeArena, RecordingSink) {
    arena_with_limit(ArenaConfig::DEFAULT_MAX_ID)
}

/// An enabled arena with ids `1..max_id`, recording into the returned sink.
pub fn arena_with_limit(max_id: u32) -> (ScopeArena, RecordingSink) {
    let sink = RecordingSink::new();
    let arena = ScopeArena::with_sink(config_with_limit(max_id), sink.clone())
        .expect("test config is valid");
    (arena, sink)
}

/// Context value that counts how often it has been dropped and can run a
/// callback from its `Drop` impl.
pub struct DropProbe {
    drops: Rc<Cell<usize>>,
    on_drop: Option<Box<dyn FnOnce()>>,
}

impl DropProbe {
    pub fn new() -> (Self, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (
            Self {
                drops: Rc::clone(&drops),
                on_drop: None,
            },
            drops,
        )
    }

    /// Run `f` when the probe is dropped.
    pub fn on_drop(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_drop = Some(Box::new(f));
        self
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
        if let Some(f) = self.on_drop.take() {
            f();
        }
    }
}
