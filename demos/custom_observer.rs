//! # Example: custom_observer
//!
//! Demonstrates how to build and attach a custom lifecycle observer.
//!
//! Shows how to:
//! - Implement the [`Observe`] trait.
//! - Inspect [`LifecycleEvent`] / [`EventKind`] to collect per-tier timings.
//! - Read the diagnostics side channel next to the event stream.
//!
//! ## Run
//! ```bash
//! cargo run --example custom_observer
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tierload::{
    DiagnosticKind, EventKind, LifecycleEvent, LoadError, LoadRequest, LoaderFn, Observe,
    TierLoader,
};

/// Records how long each resource took, grouped by tier.
struct Timings {
    started: Mutex<BTreeMap<String, Instant>>,
    done: Mutex<BTreeMap<usize, Vec<(String, Duration, EventKind)>>>,
}

#[async_trait::async_trait]
impl Observe for Timings {
    async fn on_event(&self, ev: &LifecycleEvent) {
        if ev.kind == EventKind::Loading {
            self.started.lock().unwrap().insert(ev.id.to_string(), Instant::now());
            return;
        }
        let Some(t0) = self.started.lock().unwrap().remove(&*ev.id) else {
            return;
        };
        self.done
            .lock()
            .unwrap()
            .entry(ev.tier)
            .or_default()
            .push((ev.id.to_string(), t0.elapsed(), ev.kind));
    }

    fn name(&self) -> &str {
        "timings"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loader = LoaderFn::arc("fake-net", |req: LoadRequest| async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        if req.id.ends_with(".map") {
            return Err(LoadError::transport("404 not found"));
        }
        Ok(())
    });

    let timings = Arc::new(Timings {
        started: Mutex::new(BTreeMap::new()),
        done: Mutex::new(BTreeMap::new()),
    });

    let tiers = TierLoader::builder(
        [("vendor.js", 0), ("vendor.js.map", 0), ("app.js", 1)],
        loader,
    )
    .with_observer(timings.clone())
    .build()?;

    let mut diagnostics = tiers.diagnostics();
    let printer = tokio::spawn(async move {
        while let Ok(d) = diagnostics.recv().await {
            println!("[diag] {:?} tier={:?} reason={:?}", d.kind, d.tier, d.reason);
            if d.kind == DiagnosticKind::Finished {
                break;
            }
        }
    });

    if let Some(run) = tiers.start(|| {}) {
        run.wait().await?;
    }
    printer.await?;

    for (tier, rows) in timings.done.lock().unwrap().iter() {
        for (id, took, kind) in rows {
            println!("tier {tier}: {id:<14} {kind:<14} {took:?}");
        }
    }
    Ok(())
}
