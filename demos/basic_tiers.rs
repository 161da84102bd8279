//! # Example: basic_tiers
//!
//! Loads five fake resources in three priority tiers.
//!
//! Shows how to:
//! - Build a [`TierLoader`] from a priority map.
//! - Wrap an async closure as a loader with [`LoaderFn`].
//! - Watch lifecycle events and wait for the run report.
//!
//! ## Flow
//! ```text
//! tier 0 (prio 1): polyfills.js, runtime.js   ──► barrier
//! tier 1 (prio 5): app.js                      ──► barrier
//! tier 2 (prio 9): analytics.js, chat.js       ──► barrier ──► on_finish()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_tiers
//! ```

use std::time::Duration;

use tierload::{LoadError, LoadRequest, LoaderFn, TierLoader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let loader = LoaderFn::arc("fake-net", |req: LoadRequest| async move {
        // Longer ids take longer to "download".
        tokio::time::sleep(Duration::from_millis(20 * req.id.len() as u64)).await;
        Ok::<(), LoadError>(())
    });

    let tiers = TierLoader::new(
        [
            ("app.js", 5),
            ("analytics.js", 9),
            ("polyfills.js", 1),
            ("chat.js", 9),
            ("runtime.js", 1),
        ],
        loader,
    )?;

    for (n, tier) in tiers.tiers().iter().enumerate() {
        println!("tier {n} (priority {}): {:?}", tier.priority(), tier.ids().collect::<Vec<_>>());
    }

    tiers.lifecycle_fn(|ev| println!("[event] tier={} {:<8} {}", ev.tier, ev.kind, ev.id));

    let Some(run) = tiers.start(|| println!("[done] every tier loaded")) else {
        return Ok(());
    };
    let report = run.wait().await?;
    println!("report: {report:?}");
    Ok(())
}
