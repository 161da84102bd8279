//! Integration tests for `FsLoader`.

use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tierload::{EventKind, FsLoader, LifecycleEvent, LoadSettings, TierLoader};
use tokio::sync::mpsc;

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(dir.path().join("lib")).unwrap();
    std::fs::write(dir.path().join("lib/core.js"), b"export const core = 1;").unwrap();
    std::fs::write(dir.path().join("main.js"), b"main()").unwrap();
    std::fs::write(dir.path().join("big.js"), vec![b'x'; 2048]).unwrap();
    dir
}

fn record(tiers: &TierLoader) -> Arc<Mutex<Vec<(String, EventKind, String)>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    tiers.lifecycle_fn(move |ev: &LifecycleEvent| {
        if ev.is_terminal() {
            sink.lock()
                .unwrap()
                .push((ev.id.to_string(), ev.kind, ev.message.to_string()));
        }
    });
    seen
}

#[tokio::test]
async fn test_reads_files_in_tier_order() {
    let dir = fixture();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let loader = Arc::new(FsLoader::new(dir.path()).with_sink(tx));
    let tiers = TierLoader::new([("main.js", 2), ("lib/core.js", 1)], loader).unwrap();
    let seen = record(&tiers);

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.succeeded, 2);
    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert_eq!(&*first.id, "lib/core.js");
    assert_eq!(first.bytes, b"export const core = 1;");
    assert_eq!(&*second.id, "main.js");
    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].0, "lib/core.js");
    assert_eq!(seen[1].0, "main.js");
}

#[tokio::test]
async fn test_missing_file_is_network_error() {
    let dir = fixture();
    let loader = Arc::new(FsLoader::new(dir.path()));
    let tiers = TierLoader::new([("missing.js", 1), ("main.js", 1)], loader).unwrap();
    let seen = record(&tiers);

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.network_errors, 1);
    assert_eq!(report.succeeded, 1);
    let seen = seen.lock().unwrap();
    let missing = seen.iter().find(|(id, ..)| id == "missing.js").unwrap();
    assert_eq!(missing.1, EventKind::NetworkError);
    assert!(missing.2.contains("missing.js"));
}

#[tokio::test]
async fn test_max_bytes_rejects_large_files() {
    let dir = fixture();
    let loader = Arc::new(FsLoader::new(dir.path()));
    let tiers = TierLoader::builder([("big.js", 1), ("main.js", 1)], loader)
        .with_settings(LoadSettings::new().with_attr("max_bytes", "1024"))
        .build()
        .unwrap();
    let seen = record(&tiers);

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.network_errors, 1);
    let seen = seen.lock().unwrap();
    let big = seen.iter().find(|(id, ..)| id == "big.js").unwrap();
    assert_eq!(big.1, EventKind::NetworkError);
    assert!(big.2.contains("max_bytes=1024"));
}

#[tokio::test]
async fn test_escaping_ids_fail_without_reading() {
    let dir = fixture();
    let loader = Arc::new(FsLoader::new(dir.path().join("lib")));
    let tiers = TierLoader::new([("../main.js", 1)], loader).unwrap();
    let seen = record(&tiers);

    let report = tiers.start(|| {}).unwrap().wait().await.unwrap();

    assert_eq!(report.network_errors, 1);
    assert!(seen.lock().unwrap()[0].2.contains("escapes loader root"));
}
