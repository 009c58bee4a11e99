//! Emission through custom sinks: levels, labels and ancestor paths.

use strata::prelude::*;
use strata::LogSink;
use strata_test_utils::{arena_with_limit, recording_arena, DropProbe, Emission};

#[test]
fn emits_path_label_and_level() {
    let (arena, sink) = recording_arena();
    let request = arena.open_labeled("request");
    let db = request.child("db");
    db.warn("slow query");
    request.error(format_args!("status {}", 500));

    assert_eq!(
        sink.records(),
        vec![
            Emission {
                level: Level::Warn,
                label: "db".into(),
                path: "request::db".into(),
                message: "slow query".into(),
            },
            Emission {
                level: Level::Error,
                label: "request".into(),
                path: "request".into(),
                message: "status 500".into(),
            },
        ]
    );
}

#[test]
fn level_helpers_map_to_levels() {
    let (arena, sink) = recording_arena();
    let scope = arena.open_labeled("s");
    scope.error("e");
    scope.warn("w");
    scope.info("i");
    scope.debug("d");
    scope.trace("t");
    let levels: Vec<Level> = sink.records().iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![Level::Error, Level::Warn, Level::Info, Level::Debug, Level::Trace]
    );
}

#[test]
fn path_skips_closed_ancestors() {
    let (arena, sink) = recording_arena();
    let a = arena.open_labeled("a");
    let b = a.child("b");
    let c = b.child("c");
    drop(b);
    c.info("orphan");
    assert_eq!(sink.lines(), vec!["[c] orphan".to_string()]);
    drop(a);
}

#[test]
fn path_is_capped_at_max_depth() {
    let sink = strata_test_utils::RecordingSink::new();
    let arena = ScopeArena::with_sink(
        ArenaConfig {
            max_path_depth: 2,
            enabled: true,
            ..ArenaConfig::default()
        },
        sink.clone(),
    )
    .unwrap();
    let a = arena.open_labeled("a");
    let b = a.child("b");
    let c = b.child("c");
    assert_eq!(c.path(), "b::c");
    c.info("deep");
    assert_eq!(sink.lines(), vec!["[b::c] deep".to_string()]);
}

#[test]
fn emit_labeled_opens_and_closes() {
    let (arena, sink) = recording_arena();
    arena.emit_labeled(Level::Info, "oneshot", "done");
    assert_eq!(sink.lines(), vec!["[oneshot] done".to_string()]);
    assert_eq!(arena.open_count(), 0);
}

#[test]
fn closed_scope_emits_as_fallback() {
    let (arena, sink) = recording_arena();
    let scope = arena.open_labeled("gone");
    let view = scope.view().clone();
    drop(scope);
    view.info("late");
    assert_eq!(sink.lines(), vec!["[Fallback] late".to_string()]);
}

#[test]
fn fallback_without_arena_uses_log_sink() {
    // No logger is installed; this must simply not panic.
    Scope::default().info("nowhere");
    assert_eq!(LogSink::default().target(), "strata");
}

#[test]
fn exhausted_scope_emits_through_arena_sink() {
    let (arena, sink) = arena_with_limit(2);
    let _a = arena.open_labeled("a");
    let degraded = arena.open_labeled("b");
    assert!(degraded.is_fallback());
    degraded.warn("still delivered");
    assert_eq!(
        sink.records(),
        vec![Emission {
            level: Level::Warn,
            label: "Fallback".into(),
            path: "Fallback".into(),
            message: "still delivered".into(),
        }]
    );
}

#[test]
fn one_shot_helpers_with_context() {
    let (arena, sink) = recording_arena();
    let (probe, drops) = DropProbe::new();
    arena.emit_with_context(Level::Info, ScopeContext::new(probe), "typed");
    assert_eq!(drops.get(), 1);

    arena.emit_with(Level::Debug, "job", ScopeContext::new(7u32), "both");
    arena.emit_with(Level::Debug, " ", ScopeContext::new(7u32), "blank");

    let records = sink.records();
    assert_eq!(
        sink.lines(),
        vec![
            "[DropProbe] typed".to_string(),
            "[job] both".to_string(),
            "[u32] blank".to_string(),
        ]
    );
    assert_eq!(records[1].level, Level::Debug);
    assert_eq!(arena.open_count(), 0);
}
