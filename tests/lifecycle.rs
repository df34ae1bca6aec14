//! Scope lifecycle as seen by the report sinks.

use std::{
    collections::HashSet,
    io,
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use scope_report::{
    Condition, Config, ConsistencyError, ExecutionContext, Parent, ScopeKind,
    SinkKind,
    sink::{Call, Recorder},
};

/// [`io::Write`] collecting everything logged through `tracing`.
#[derive(Clone, Default)]
struct Logs(Arc<Mutex<Vec<u8>>>);

impl Logs {
    fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for Logs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = Logs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}

#[test]
fn ids_are_unique_and_stable() {
    let mut ctx = ExecutionContext::default();
    let mut ids = HashSet::new();

    assert!(ids.insert(ctx.start_suite("S").unwrap()));
    for s in 0..5 {
        assert!(ids.insert(ctx.start_script(format!("script{s}")).unwrap()));
        for g in 0..3 {
            assert!(ids.insert(ctx.start_group(format!("group{g}")).unwrap()));
            for t in 0..4 {
                let id = ctx.start_test_case(format!("tc{t}")).unwrap();
                assert!(ids.insert(id));
            }
        }
    }
    _ = ctx.finish_all().unwrap();

    assert_eq!(ids.len(), 1 + 5 * (1 + 3 * (1 + 4)));
    for id in ids {
        assert_eq!(ctx.snapshot(id).unwrap().id, id);
    }
}

#[test]
fn reopening_auto_finishes_once() {
    let rec = Recorder::new();
    let mut ctx =
        ExecutionContext::default().with_sink(SinkKind::Txt, rec.clone());
    _ = ctx.start_script("A").unwrap();
    _ = ctx.start_group("G").unwrap();
    let first = ctx.start_test_case("first").unwrap();
    let second = ctx.start_test_case("second").unwrap();
    _ = ctx.finish_test_case().unwrap();

    assert_eq!(ctx.current_test_case(), None);
    for id in [first, second] {
        let statuses = rec.count(
            |c| matches!(c, Call::SetStatus { id: i, .. } if *i == id),
        );
        assert_eq!(statuses, 1, "test case {id} finished {statuses} times");
    }
    assert!(ctx.conditions().is_empty());
}

#[test]
fn every_scope_is_announced_and_resolved_once_per_sink() {
    let sinks = [
        (SinkKind::Xml, Recorder::new()),
        (SinkKind::Html, Recorder::new()),
        (SinkKind::Junit, Recorder::new()),
        (SinkKind::Txt, Recorder::new()),
    ];
    let mut ctx = ExecutionContext::default();
    for (kind, rec) in &sinks {
        ctx.register_sink(*kind, rec.clone());
    }

    let suite = ctx.start_suite("S").unwrap();
    let script = ctx.start_script("A").unwrap();
    let group = ctx.start_group("G").unwrap();
    let case = ctx.start_test_case("tc").unwrap();
    _ = ctx.log_step("open page");
    _ = ctx.finish_all().unwrap();

    for (kind, rec) in &sinks {
        for id in [suite, script, group, case] {
            let added = rec.count(
                |c| matches!(c, Call::AddScope { id: i, .. } if *i == id),
            );
            let resolved = rec.count(
                |c| matches!(c, Call::SetStatus { id: i, .. } if *i == id),
            );
            let summarized = rec.count(
                |c| matches!(c, Call::AddStatistics { id: i, .. } if *i == id),
            );
            assert_eq!((added, resolved, summarized), (1, 1, 1), "{kind} {id}");
        }
        assert_eq!(rec.steps_of(case), ["open page"], "{kind}");
        // Every call is followed by a save.
        assert_eq!(rec.saves() * 2, rec.calls().len(), "{kind}");
    }

    let calls = sinks[0].1.calls();
    assert_eq!(
        calls[0],
        Call::AddScope {
            parent: Parent::Root,
            kind: ScopeKind::Suite,
            name: "S".into(),
            id: suite,
        },
    );
}

#[test]
fn disabled_sinks_receive_nothing() {
    let enabled = Recorder::new();
    let disabled = Recorder::new();
    let mut ctx =
        ExecutionContext::new(Config::default().with_sinks([SinkKind::Junit]))
            .with_sink(SinkKind::Junit, enabled.clone())
            .with_sink(SinkKind::Html, disabled.clone());

    _ = ctx.start_script("A").unwrap();
    _ = ctx.log_step("click");
    _ = ctx.finish_script().unwrap();

    assert!(!enabled.calls().is_empty());
    assert!(disabled.calls().is_empty());
    assert_eq!(ctx.sinks().active(), 1);
}

#[test]
fn broken_sink_degrades_without_stopping_the_run() {
    let broken = Recorder::failing_after(3);
    let healthy = Recorder::new();
    let mut ctx = ExecutionContext::default()
        .with_sink(SinkKind::Xml, broken.clone())
        .with_sink(SinkKind::Txt, healthy.clone());

    _ = ctx.start_suite("S").unwrap();
    _ = ctx.start_script("A").unwrap();
    _ = ctx.start_test_case("tc").unwrap();
    _ = ctx.finish_all().unwrap();

    let failures = ctx
        .conditions()
        .iter()
        .filter(|c| c.is_sink_failure())
        .collect::<Vec<_>>();
    assert_eq!(failures.len(), 1);
    assert!(matches!(
        failures[0],
        Condition::SinkWriteFailure { sink: SinkKind::Xml, .. },
    ));
    assert!(ctx.sinks().is_degraded(SinkKind::Xml));
    assert_eq!(broken.calls().len(), 4);
    assert_eq!(
        healthy.count(|c| matches!(c, Call::SetStatus { .. })),
        3,
    );
}

#[test]
fn underflow_is_logged() {
    let (result, logs) = with_logs(|| {
        let mut ctx = ExecutionContext::default();
        _ = ctx.start_suite("S").unwrap();
        _ = ctx.finish_group().unwrap();
        ctx.conditions().to_vec()
    });

    assert_eq!(result, [Condition::ScopeUnderflow(ScopeKind::Group)]);
    assert!(logs.contains("scope started"), "{logs}");
    assert!(logs.contains("nothing to finish"), "{logs}");
}

#[test]
fn script_outliving_its_suite_is_inconsistent() {
    let (result, logs) = with_logs(|| {
        let mut ctx = ExecutionContext::default();
        let suite = ctx.start_suite("S").unwrap();
        let script = ctx.start_script("A").unwrap();
        _ = ctx.finish_suite().unwrap();
        (suite, script, ctx.finish_script())
    });
    let (suite, script, finished) = result;

    assert_eq!(
        finished.unwrap_err(),
        ConsistencyError::ParentFinished {
            kind: ScopeKind::Script,
            child: script,
            parent: suite,
        },
    );
    assert!(
        logs.contains("suite finished while its script is still open"),
        "{logs}",
    );
}

#[test]
fn contexts_sharing_a_sink_never_reuse_ids() {
    let shared = Recorder::new();
    let mut a =
        ExecutionContext::default().with_sink(SinkKind::Txt, shared.clone());
    let mut b =
        ExecutionContext::default().with_sink(SinkKind::Txt, shared.clone());

    let suite_a = a.start_suite("worker-a").unwrap();
    let suite_b = b.start_suite("worker-b").unwrap();
    let script_b = b.start_script("B").unwrap();
    let script_a = a.start_script("A").unwrap();
    _ = a.finish_all().unwrap();
    _ = b.finish_all().unwrap();

    let ids = [suite_a, suite_b, script_a, script_b];
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    for id in ids {
        let added = shared
            .count(|c| matches!(c, Call::AddScope { id: i, .. } if *i == id));
        assert_eq!(added, 1, "{id} announced {added} times");
    }

    assert!(a.snapshot(suite_b).is_none());
    assert!(b.snapshot(suite_a).is_none());
    assert_eq!(a.snapshot(suite_a).unwrap().name, "worker-a");
    assert_eq!(b.snapshot(suite_b).unwrap().name, "worker-b");
}

#[test]
fn contexts_run_in_parallel_workers() {
    let handles = (0..4)
        .map(|w| {
            let rec = Recorder::new();
            let mut ctx = ExecutionContext::default()
                .with_sink(SinkKind::Txt, rec.clone());
            thread::spawn(move || {
                _ = ctx.start_suite(format!("worker{w}")).unwrap();
                _ = ctx.start_script("A").unwrap();
                _ = ctx.start_test_case("tc").unwrap();
                _ = ctx.finish_all().unwrap();
                rec.calls().len()
            })
        })
        .collect::<Vec<_>>();

    for h in handles {
        assert_eq!(h.join().unwrap(), 2 * (3 + 3 * 2));
    }
}
