//! Integration tests for tier scheduling.
//!
//! These tests drive a `TierLoader` end to end with fake loaders and a
//! recording observer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tierload::{
    ConfigError, Diagnostic, DiagnosticKind, ErrorPolicy, EventKind, LifecycleEvent, LoadError,
    LoadRequest, LoadSettings, LoadSignals, Loader, LoaderConfig, LoaderFn, RuntimeError,
    TierLoader,
};
use tokio::sync::{broadcast, mpsc};

// =============================================================================
// Helpers
// =============================================================================

type Seen = Arc<Mutex<Vec<(String, EventKind)>>>;

fn record(tiers: &TierLoader) -> Seen {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    tiers.lifecycle_fn(move |ev: &LifecycleEvent| {
        sink.lock().unwrap().push((ev.id.to_string(), ev.kind));
    });
    seen
}

fn position(seen: &[(String, EventKind)], id: &str, kind: EventKind) -> usize {
    seen.iter()
        .position(|(i, k)| i == id && *k == kind)
        .unwrap_or_else(|| panic!("no {kind} event for {id}: {seen:?}"))
}

fn terminal_count(seen: &[(String, EventKind)], id: &str) -> usize {
    seen.iter()
        .filter(|(i, k)| i == id && k.is_terminal())
        .count()
}

fn drain(rx: &mut broadcast::Receiver<Diagnostic>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    while let Ok(d) = rx.try_recv() {
        out.push(d);
    }
    out
}

fn instant() -> Arc<dyn Loader> {
    LoaderFn::arc("instant", |_req: LoadRequest| async {
        Ok::<(), LoadError>(())
    })
}

/// Hands every load request to the test, which completes it by hand.
struct Manual {
    tx: mpsc::UnboundedSender<(String, LoadSignals)>,
}

impl Manual {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<(String, LoadSignals)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl Loader for Manual {
    fn load(&self, request: LoadRequest, signals: LoadSignals) {
        signals.started();
        let _ = self.tx.send((request.id.to_string(), signals));
    }
}

// =============================================================================
// End-to-end ordering
// =============================================================================

#[tokio::test]
async fn test_two_tiers_all_succeed_in_order() {
    let tiers = TierLoader::new([("a", 1), ("b", 1), ("c", 2)], instant()).unwrap();
    let seen = record(&tiers);
    let finished = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&finished);

    let report = tiers
        .start(move || {
            f.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(report.tiers_completed, 2);
    assert_eq!(finished.load(Ordering::SeqCst), 1);

    let seen = seen.lock().unwrap();
    let c_loading = position(&seen, "c", EventKind::Loading);
    assert!(position(&seen, "a", EventKind::Success) < c_loading);
    assert!(position(&seen, "b", EventKind::Success) < c_loading);
    for id in ["a", "b", "c"] {
        assert!(position(&seen, id, EventKind::Loading) < position(&seen, id, EventKind::Success));
        assert_eq!(terminal_count(&seen, id), 1);
    }
}

#[tokio::test]
async fn test_next_tier_waits_for_every_sibling() {
    let (loader, mut loads) = Manual::new();
    let tiers = TierLoader::new([("a", 1), ("b", 1), ("c", 2), ("d", 2)], loader).unwrap();
    let (ev_tx, mut events) = mpsc::unbounded_channel();
    tiers.lifecycle_fn(move |ev: &LifecycleEvent| {
        let _ = ev_tx.send((ev.id.to_string(), ev.kind));
    });

    let handle = tiers.start(|| {}).unwrap();

    let mut first = vec![loads.recv().await.unwrap(), loads.recv().await.unwrap()];
    first.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(first[0].0, "a");
    assert_eq!(first[1].0, "b");

    first[0].1.succeeded();
    loop {
        let (id, kind) = events.recv().await.unwrap();
        if id == "a" && kind.is_terminal() {
            break;
        }
    }
    tokio::task::yield_now().await;
    assert!(loads.try_recv().is_err(), "tier 1 started before b finished");

    first[1].1.failed("boom");
    let mut second = vec![loads.recv().await.unwrap(), loads.recv().await.unwrap()];
    second.sort_by(|x, y| x.0.cmp(&y.0));
    assert_eq!(second[0].0, "c");
    assert_eq!(second[1].0, "d");
    for (_, signals) in &second {
        signals.succeeded();
    }

    let report = handle.wait().await.unwrap();
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.network_errors, 1);
}

// =============================================================================
// Construction
// =============================================================================

#[tokio::test]
async fn test_bad_priority_rejected_without_events() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = LoaderFn::arc("count", move |_req: LoadRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), LoadError>(()) }
    });

    let err = TierLoader::new([("x", "bad")], loader).err().unwrap();

    assert!(matches!(err, ConfigError::NotNumeric { ref id, .. } if id == "x"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_start_twice_loads_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = LoaderFn::arc("count", move |_req: LoadRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), LoadError>(()) }
    });
    let tiers = TierLoader::new([("a", 1), ("b", 1), ("c", 2)], loader).unwrap();
    let finished = Arc::new(AtomicUsize::new(0));

    let f1 = Arc::clone(&finished);
    let first = tiers.start(move || {
        f1.fetch_add(1, Ordering::SeqCst);
    });
    let f2 = Arc::clone(&finished);
    assert!(tiers
        .start(move || {
            f2.fetch_add(1, Ordering::SeqCst);
        })
        .is_none());

    first.unwrap().wait().await.unwrap();
    assert!(tiers.start(|| {}).is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Timeouts and late signals
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_silent_loader_times_out_and_tier_advances() {
    let (loader, mut loads) = Manual::new();
    let tiers = TierLoader::builder([("slow", 1), ("next", 2)], loader)
        .with_resource_settings("slow", LoadSettings::new().with_timeout(50))
        .build()
        .unwrap();
    let seen = record(&tiers);
    let mut diagnostics = tiers.diagnostics();

    let handle = tiers.start(|| {}).unwrap();

    let (_, slow) = loads.recv().await.unwrap();
    let (id, next) = loads.recv().await.unwrap();
    assert_eq!(id, "next");
    assert!(slow.is_closed());
    next.succeeded();

    let report = handle.wait().await.unwrap();
    assert_eq!(report.timed_out, 1);
    assert_eq!(report.succeeded, 1);

    slow.succeeded();
    {
        let seen = seen.lock().unwrap();
        assert_eq!(terminal_count(&seen, "slow"), 1);
        assert!(position(&seen, "slow", EventKind::Timeout) < position(&seen, "next", EventKind::Loading));
    }

    let late: Vec<_> = drain(&mut diagnostics)
        .into_iter()
        .filter(|d| d.kind == DiagnosticKind::LateSignal)
        .collect();
    assert_eq!(late.len(), 1);
    assert_eq!(late[0].id.as_deref(), Some("slow"));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_cancels_request_token() {
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&tokens);
    let loader = LoaderFn::arc("hang", move |req: LoadRequest| {
        sink.lock().unwrap().push(req.cancel.clone());
        async move {
            req.cancel.cancelled().await;
            Ok::<(), LoadError>(())
        }
    });
    let tiers = TierLoader::builder([("hang", 1)], loader)
        .with_settings(LoadSettings::new().with_timeout("25"))
        .build()
        .unwrap();
    let seen = record(&tiers);

    let started = tokio::time::Instant::now();
    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.timed_out, 1);
    assert!(started.elapsed() >= Duration::from_millis(25));
    assert_eq!(terminal_count(&seen.lock().unwrap(), "hang"), 1);
    let tokens = tokens.lock().unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_cancelled());
}

#[tokio::test]
async fn test_duplicate_success_yields_one_terminal_event() {
    struct Twice;
    impl Loader for Twice {
        fn load(&self, _request: LoadRequest, signals: LoadSignals) {
            signals.started();
            signals.succeeded();
            signals.succeeded();
        }
    }

    let tiers = TierLoader::new([("a", 1)], Arc::new(Twice)).unwrap();
    let seen = record(&tiers);
    let mut diagnostics = tiers.diagnostics();

    tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(terminal_count(&seen.lock().unwrap(), "a"), 1);
    assert!(drain(&mut diagnostics)
        .iter()
        .any(|d| d.kind == DiagnosticKind::LateSignal && d.reason.as_deref() == Some("succeeded")));
}

#[tokio::test]
async fn test_invalid_timeout_is_settings_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let loader = LoaderFn::arc("count", move |_req: LoadRequest| {
        counter.fetch_add(1, Ordering::SeqCst);
        async { Ok::<(), LoadError>(()) }
    });
    let tiers = TierLoader::builder([("bad", 1), ("ok", 1)], loader)
        .with_resource_settings("bad", LoadSettings::new().with_timeout("soon"))
        .build()
        .unwrap();
    let seen = record(&tiers);

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.settings_errors, 1);
    assert_eq!(report.succeeded, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let seen = seen.lock().unwrap();
    assert!(!seen.iter().any(|(id, k)| id == "bad" && *k == EventKind::Loading));
    position(&seen, "bad", EventKind::SettingsError);
}

// =============================================================================
// Observer isolation and error policy
// =============================================================================

#[tokio::test]
async fn test_observer_panic_does_not_stop_tiers() {
    let tiers = TierLoader::new([("a", 1), ("b", 2)], instant()).unwrap();
    let mut diagnostics = tiers.diagnostics();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    tiers.lifecycle_fn(move |ev: &LifecycleEvent| {
        counter.fetch_add(1, Ordering::SeqCst);
        if &*ev.id == "a" {
            panic!("observer bug");
        }
    });

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.succeeded, 2);
    assert_eq!(hits.load(Ordering::SeqCst), 4);
    let panics: Vec<_> = drain(&mut diagnostics)
        .into_iter()
        .filter(|d| d.kind == DiagnosticKind::ObserverPanicked)
        .collect();
    assert_eq!(panics.len(), 2);
    assert!(panics.iter().all(|d| d.id.as_deref() == Some("a")));
}

fn failing_first() -> Arc<dyn Loader> {
    LoaderFn::arc("fail-first", |req: LoadRequest| async move {
        if &*req.id == "a" {
            return Err(LoadError::transport("refused"));
        }
        Ok(())
    })
}

#[tokio::test]
async fn test_abort_on_error_skips_later_tiers() {
    let tiers = TierLoader::builder([("a", 1), ("b", 1), ("c", 2)], failing_first())
        .with_config(LoaderConfig::default().with_error_policy(ErrorPolicy::AbortOnError))
        .build()
        .unwrap();
    let seen = record(&tiers);
    let mut diagnostics = tiers.diagnostics();
    let finished = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&finished);

    let err = tiers
        .start(move || {
            f.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap()
        .wait()
        .await
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Aborted { tier: 0, priority: 1, ref failed } if failed == &["a"]));
    assert_eq!(err.as_label(), "runtime_aborted");
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    let seen = seen.lock().unwrap();
    assert_eq!(terminal_count(&seen, "b"), 1);
    assert!(seen.iter().all(|(id, _)| id != "c"));
    let kinds: Vec<_> = drain(&mut diagnostics).into_iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::Aborted));
    assert!(!kinds.contains(&DiagnosticKind::Finished));
}

#[tokio::test]
async fn test_continue_runs_every_tier() {
    let tiers = TierLoader::new([("a", 1), ("b", 1), ("c", 2)], failing_first()).unwrap();
    let seen = record(&tiers);
    let mut diagnostics = tiers.diagnostics();
    let finished = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&finished);

    let report = tiers
        .start(move || {
            f.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap()
        .wait()
        .await
        .unwrap();

    assert_eq!(report.network_errors, 1);
    assert_eq!(report.succeeded, 2);
    assert_eq!(finished.load(Ordering::SeqCst), 1);
    position(&seen.lock().unwrap(), "c", EventKind::Success);

    let kinds: Vec<_> = drain(&mut diagnostics).into_iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::TierStarted,
            DiagnosticKind::TierFinished,
            DiagnosticKind::TierStarted,
            DiagnosticKind::TierFinished,
            DiagnosticKind::Finished,
        ]
    );
}
