//! End-to-end runs driven through the host hooks

use ccsplit::splits::NOT_LOADED;
use ccsplit::{
    ConditionTable, MemoryStore, RunState, SplitEvent, SplitType, Splitter, SplitterConfig,
    SplitterError, TimerStatus,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Stand-in for a game variable the host updates each tick
#[derive(Clone, Default)]
struct Var(Arc<AtomicI64>);

impl Var {
    fn set(&self, value: i64) {
        self.0.store(value, Ordering::SeqCst);
    }

    fn get(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

fn splitter(table: ConditionTable, store: &MemoryStore) -> Splitter {
    Splitter::new(
        SplitterConfig::default(),
        Box::new(table),
        Box::new(store.clone()),
    )
}

// Completing the only goal stops the run, so the fail split is reached
// on a second run; see test_fail_keeps_sequential_completion for one run.
#[test]
fn test_goal_run_then_failed_run() {
    init_logging();
    let x = Var::default();
    let (a, b) = (x.clone(), x.clone());
    let table = ConditionTable::new()
        .with("x>=10", move || Ok(a.get() >= 10))
        .with("x<0", move || Ok(b.get() < 0));

    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(
            r#"{
                "name": "Reach ten",
                "splits": [
                    { "name": "ten", "type": "sequential", "condition": "x>=10" },
                    { "name": "oops", "type": "fail", "condition": "x<0" }
                ]
            }"#,
        )
        .unwrap();
    splitter.on_reset(true);

    for value in 0..=10 {
        x.set(value);
        splitter.on_logic_tick();
    }
    // ticks 1..=11 carried x = 0..=10
    assert_eq!(splitter.splits()[0].completed, Some(11));
    assert_eq!(splitter.state(), RunState::StoppedComplete);

    // restart and fail on the way up
    splitter.on_reset(true);
    x.set(5);
    splitter.on_logic_tick();
    x.set(-1);
    splitter.on_logic_tick();

    assert_eq!(splitter.state(), RunState::Failed);
    assert!(splitter.state().is_failed());
    assert_eq!(splitter.splits()[0].completed, None);
    assert_eq!(splitter.splits()[0].best, Some(11));
    assert_eq!(splitter.splits()[1].completed, Some(2));
    assert_eq!(splitter.on_draw().status, TimerStatus::Failed);

    // stopped: later ticks change nothing
    x.set(20);
    assert!(splitter.on_logic_tick().is_none());
    assert_eq!(splitter.display_tick(), 2);
}

#[test]
fn test_fail_keeps_sequential_completion() {
    let x = Var::default();
    let (a, b) = (x.clone(), x.clone());
    let table = ConditionTable::new()
        .with("x>=10", move || Ok(a.get() >= 10))
        .with("x<0", move || Ok(b.get() < 0));

    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    // the trailing manual split keeps the run open after the sequential one
    splitter
        .import_json(
            r#"{ "splits": [
                { "type": "sequential", "condition": "x>=10" },
                { "type": "fail", "condition": "x<0" },
                { "name": "finish" }
            ] }"#,
        )
        .unwrap();
    splitter.on_reset(true);

    for value in [0, 4, 9, 10, 10, -1] {
        x.set(value);
        splitter.on_logic_tick();
    }

    assert_eq!(splitter.splits()[0].completed, Some(4));
    assert_eq!(splitter.splits()[0].best, Some(4));
    assert_eq!(splitter.splits()[1].completed, Some(6));
    assert_eq!(splitter.state(), RunState::Failed);
    assert_eq!(splitter.display_tick(), 6);
}

#[test]
fn test_fail_wins_over_completion_on_same_tick() {
    let x = Var::default();
    let (a, b) = (x.clone(), x.clone());
    let table = ConditionTable::new()
        .with("x>=10", move || Ok(a.get() >= 10))
        .with("x>=20", move || Ok(b.get() >= 20));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    let sink = seen.clone();
    splitter.on_event(Box::new(move |event: &SplitEvent| sink.lock().push(event.clone())));
    splitter
        .import_json(
            r#"{ "splits": [
                { "type": "individual", "condition": "x>=10" },
                { "type": "fail", "condition": "x>=20" }
            ] }"#,
        )
        .unwrap();
    splitter.on_reset(true);
    let saves = store.save_count();

    x.set(25);
    let report = splitter.on_logic_tick().unwrap();
    assert_eq!(report.completed, vec![0]);
    assert_eq!(report.failed, vec![1]);
    assert!(report.run_complete);

    assert_eq!(splitter.state(), RunState::Failed);
    assert_eq!(splitter.on_draw().status, TimerStatus::Failed);
    assert_eq!(store.save_count(), saves + 1);

    let events = seen.lock().clone();
    assert!(events.contains(&SplitEvent::RunFailed { index: 1, tick: 1 }));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SplitEvent::RunComplete { .. })));
}

#[test]
fn test_fail_before_goal() {
    let x = Var::default();
    let (a, b) = (x.clone(), x.clone());
    let table = ConditionTable::new()
        .with("x>=10", move || Ok(a.get() >= 10))
        .with("x<0", move || Ok(b.get() < 0));

    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(
            r#"{ "splits": [
                { "type": "sequential", "condition": "x>=10" },
                { "type": "fail", "condition": "x<0" }
            ] }"#,
        )
        .unwrap();
    splitter.on_reset(true);

    x.set(-5);
    let report = splitter.on_logic_tick().unwrap();
    assert_eq!(report.failed, vec![1]);
    assert!(!report.run_complete);
    assert_eq!(splitter.state(), RunState::Failed);
    assert_eq!(splitter.splits()[0].completed, None);
}

#[test]
fn test_consequential_same_tick() {
    let a = Var::default();
    let b = Var::default();
    let (ra, rb) = (a.clone(), b.clone());
    let table = ConditionTable::new()
        .with("a", move || Ok(ra.get() > 0))
        .with("b", move || Ok(rb.get() > 0));

    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(r#"{ "splits": [{ "condition": "a" }, { "condition": "b" }] }"#)
        .unwrap();
    assert!(splitter
        .splits()
        .iter()
        .all(|s| s.split_type == SplitType::Consequential));

    splitter.on_reset(true);
    splitter.on_logic_tick();
    splitter.on_logic_tick();
    b.set(1);
    splitter.on_logic_tick();

    assert_eq!(splitter.splits()[0].completed, Some(3));
    assert_eq!(splitter.splits()[1].completed, Some(3));
    assert_eq!(splitter.state(), RunState::StoppedComplete);
}

#[test]
fn test_manual_splits_in_order() {
    let store = MemoryStore::new();
    let mut splitter = splitter(ConditionTable::new(), &store);
    splitter
        .import_json(r#"{ "splits": [{ "name": "one" }, { "name": "two" }, { "name": "three" }] }"#)
        .unwrap();
    splitter.on_reset(true);

    let input = splitter.input();
    input.request_split();
    input.request_split();
    input.request_split();
    splitter.on_logic_tick();
    assert_eq!(splitter.splits()[0].completed, Some(1));
    assert_eq!(splitter.splits()[1].completed, None);

    splitter.on_logic_tick();
    input.request_split();
    splitter.on_logic_tick();
    assert_eq!(splitter.splits()[1].completed, Some(3));

    input.request_split();
    splitter.on_logic_tick();
    assert_eq!(splitter.splits()[2].completed, Some(4));
    assert_eq!(splitter.state(), RunState::StoppedComplete);
}

#[test]
fn test_unsplit_only_latest_manual() {
    let store = MemoryStore::new();
    let mut splitter = splitter(ConditionTable::new(), &store);
    splitter
        .import_json(r#"{ "splits": [{ "name": "one" }, { "name": "two" }, { "name": "three" }] }"#)
        .unwrap();
    splitter.on_reset(true);

    let input = splitter.input();
    input.request_split();
    splitter.on_logic_tick();
    input.request_split();
    splitter.on_logic_tick();

    input.request_unsplit();
    splitter.on_logic_tick();
    assert_eq!(splitter.splits()[0].completed, Some(1));
    assert_eq!(splitter.splits()[1].completed, None);

    // the freed split completes again on the next request
    input.request_split();
    splitter.on_logic_tick();
    assert_eq!(splitter.splits()[1].completed, Some(4));
}

#[test]
fn test_unsplit_noop_does_not_persist() {
    let x = Var::default();
    let rx = x.clone();
    let table = ConditionTable::new().with("x>0", move || Ok(rx.get() > 0));
    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(r#"{ "splits": [{ "type": "individual", "condition": "x>0" }, { "name": "m" }] }"#)
        .unwrap();
    splitter.on_reset(true);

    x.set(1);
    splitter.on_logic_tick();
    let saves = store.save_count();
    let before: Vec<_> = splitter.splits().iter().map(|s| (s.completed, s.best)).collect();

    splitter.input().request_unsplit();
    splitter.on_logic_tick();

    let after: Vec<_> = splitter.splits().iter().map(|s| (s.completed, s.best)).collect();
    assert_eq!(before, after);
    assert_eq!(store.save_count(), saves);
}

#[test]
fn test_best_across_runs() {
    let x = Var::default();
    let rx = x.clone();
    let table = ConditionTable::new().with("x>0", move || Ok(rx.get() > 0));
    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(r#"{ "splits": [{ "type": "individual", "condition": "x>0" }] }"#)
        .unwrap();

    for (run, finish_at) in [5_i64, 3, 8].into_iter().enumerate() {
        splitter.on_reset(true);
        x.set(0);
        for tick in 1..=finish_at {
            if tick == finish_at {
                x.set(1);
            }
            splitter.on_logic_tick();
        }
        assert_eq!(splitter.splits()[0].completed, Some(finish_at as u64), "run {}", run);
    }

    assert_eq!(splitter.splits()[0].best, Some(3));
    assert_eq!(splitter.splits()[0].prev_best, Some(3));
    assert_eq!(splitter.on_draw().rows[0].delta.as_deref(), Some("+0.17"));

    let stored = store.document().unwrap();
    assert_eq!(stored.splits[0].best, Some(serde_json::json!(3)));
}

#[test]
fn test_empty_import_shows_no_splits() {
    let store = MemoryStore::new();
    let mut splitter = splitter(ConditionTable::new(), &store);
    splitter
        .import_json(r#"{ "name": "Nothing here", "splits": [] }"#)
        .unwrap();

    assert_eq!(splitter.schema().name, NOT_LOADED);
    splitter.on_reset(true);
    splitter.on_logic_tick();
    assert_eq!(splitter.state(), RunState::Running);

    let view = splitter.on_draw();
    assert!(view.rows.is_empty());
    assert_eq!(view.message.as_deref(), Some(NOT_LOADED));
    assert_eq!(view.timer, "0.03");
}

#[test]
fn test_invalid_import_reports_error() {
    let store = MemoryStore::new();
    let mut splitter = splitter(ConditionTable::new(), &store);

    let err = splitter.import_json(r#"{ "splits": "none" }"#).unwrap_err();
    assert!(matches!(err, SplitterError::SchemaInvalid(_)));
    let err = splitter
        .import_json(r#"{ "splits": [{ "icon": [1, 2, 3] }] }"#)
        .unwrap_err();
    assert!(err.is_schema_error());

    // tick arithmetic is signed, so bests past i64::MAX are refused
    let err = splitter
        .import_json(r#"{ "splits": [{ "name": "m", "best": 9223372036854775808 }] }"#)
        .unwrap_err();
    assert!(matches!(err, SplitterError::SchemaInvalid(_)));

    assert!(!splitter.schema().is_loaded());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_export_round_trip_through_splitter() {
    let table = ConditionTable::new()
        .with("a", || Ok(false))
        .with("b", || Ok(false));
    let source = r#"{
        "name": "Round trip",
        "splits": [
            { "name": "c", "condition": "a", "best": 40 },
            { "name": "s", "type": "sequential", "condition": "b", "icon": [2, 3, "sheet.png"] },
            { "name": "m", "best": 90 },
            { "type": "fail", "condition": "a" }
        ]
    }"#;

    let store = MemoryStore::new();
    let mut first = splitter(table.clone(), &store);
    first.import_json(source).unwrap();
    let exported = first.export_json().unwrap();

    let mut second = splitter(table, &MemoryStore::new());
    second.import_json(&exported).unwrap();

    for (a, b) in first.splits().iter().zip(second.splits()) {
        assert_eq!(a.split_type, b.split_type);
        assert_eq!(a.condition, b.condition);
        assert_eq!(a.icon, b.icon);
        assert_eq!(a.best, b.best);
    }
    assert_eq!(second.export_document(), first.export_document());
}

#[test]
fn test_events_follow_the_run() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let store = MemoryStore::new();
    let mut splitter = splitter(ConditionTable::new(), &store);
    let sink = seen.clone();
    splitter.on_event(Box::new(move |event: &SplitEvent| sink.lock().push(event.clone())));
    splitter
        .import_json(r#"{ "splits": [{ "name": "only" }] }"#)
        .unwrap();

    splitter.on_reset(true);
    splitter.input().request_split();
    splitter.on_logic_tick();
    splitter.input().request_unsplit();
    splitter.on_logic_tick();
    splitter.input().request_stop();
    splitter.on_logic_tick();

    let events = seen.lock().clone();
    assert_eq!(
        events,
        vec![
            SplitEvent::RunStarted,
            SplitEvent::Split { index: 0, name: Some("only".to_string()), tick: 1 },
            SplitEvent::RunComplete { tick: 1 },
            SplitEvent::Unsplit { index: 0, name: Some("only".to_string()) },
            SplitEvent::RunStopped { tick: 2 },
        ]
    );
    assert_eq!(splitter.state(), RunState::StoppedManual);
}

#[test]
fn test_panicking_condition_does_not_stop_ticks() {
    init_logging();
    let x = Var::default();
    let rx = x.clone();
    let table = ConditionTable::new()
        .with("broken", || -> ccsplit::Result<bool> { panic!("field missing") })
        .with("x>0", move || Ok(rx.get() > 0));
    let store = MemoryStore::new();
    let mut splitter = splitter(table, &store);
    splitter
        .import_json(
            r#"{ "splits": [
                { "type": "individual", "condition": "broken" },
                { "type": "individual", "condition": "x>0" }
            ] }"#,
        )
        .unwrap();
    splitter.on_reset(true);

    splitter.on_logic_tick();
    x.set(1);
    splitter.on_logic_tick();

    assert_eq!(splitter.splits()[0].completed, None);
    assert_eq!(splitter.splits()[1].completed, Some(2));
    assert_eq!(splitter.state(), RunState::Running);
}

#[test]
fn test_file_store_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = SplitterConfig::default().with_store_path(dir.path().join("splits.json"));

    {
        let mut splitter = Splitter::from_config(config.clone(), Box::new(ConditionTable::new()));
        splitter
            .import_json(r#"{ "name": "Saved", "splits": [{ "name": "m" }] }"#)
            .unwrap();
        splitter.on_reset(true);
        splitter.input().request_split();
        splitter.on_logic_tick();
    }

    let reloaded = Splitter::from_config(config, Box::new(ConditionTable::new()));
    assert_eq!(reloaded.schema().name, "Saved");
    assert_eq!(reloaded.splits()[0].best, Some(1));
    assert_eq!(reloaded.splits()[0].completed, None);
}

#[cfg(feature = "rhai-scripting")]
mod scripted {
    use super::*;
    use ccsplit::RhaiConditions;

    #[test]
    fn test_rhai_conditions_drive_run() {
        init_logging();
        let conditions = RhaiConditions::new();
        let vars = conditions.variables();
        vars.set("cookies", 0.0_f64);
        vars.set("buildings", 0_i64);

        let store = MemoryStore::new();
        let mut splitter = Splitter::new(
            SplitterConfig::default(),
            Box::new(conditions),
            Box::new(store.clone()),
        );
        splitter
            .import_json(
                r#"{
                    "name": "Million",
                    "splits": [
                        { "name": "First building", "type": "individual", "condition": "buildings >= 1" },
                        { "name": "Thousand", "type": "sequential", "condition": "cookies >= 1000.0" },
                        { "name": "Million", "type": "sequential", "condition": "cookies >= 1000000.0" },
                        { "type": "fail", "condition": "cookies < 0.0" }
                    ]
                }"#,
            )
            .unwrap();
        splitter.on_reset(true);

        // a chain of sequential splits can all complete on one tick
        vars.set("cookies", 2_000_000.0_f64);
        splitter.on_logic_tick();
        assert_eq!(splitter.splits()[1].completed, Some(1));
        assert_eq!(splitter.splits()[2].completed, Some(1));
        assert_eq!(splitter.state(), RunState::Running);

        vars.set("buildings", 3_i64);
        splitter.on_logic_tick();
        assert_eq!(splitter.splits()[0].completed, Some(2));
        assert_eq!(splitter.state(), RunState::StoppedComplete);
        assert_eq!(splitter.on_draw().timer, "0.07");
        assert!(store.document().is_some());
    }

    #[test]
    fn test_rhai_rejects_bad_expression() {
        let mut splitter = Splitter::from_config(
            SplitterConfig::default(),
            Box::new(RhaiConditions::new()),
        );
        let err = splitter
            .import_json(r#"{ "splits": [{ "condition": "cookies >=" }] }"#)
            .unwrap_err();
        assert!(err.is_schema_error());
        assert!(!splitter.schema().is_loaded());
    }

    #[test]
    fn test_rhai_unset_variable_never_completes() {
        let conditions = RhaiConditions::new();
        let mut splitter = Splitter::from_config(SplitterConfig::default(), Box::new(conditions));
        splitter
            .import_json(r#"{ "splits": [{ "type": "individual", "condition": "golden > 0" }] }"#)
            .unwrap();
        splitter.on_reset(true);
        splitter.on_logic_tick();
        assert_eq!(splitter.splits()[0].completed, None);
        assert_eq!(splitter.state(), RunState::Running);
    }
}
