//! # Example: abort_on_error
//!
//! Compares the two [`ErrorPolicy`] modes on the same failing map.
//!
//! ## Flow
//! ```text
//! tier 0: config.json ✗  styles.css ✓ ──► barrier
//!   Continue     ──► tier 1 runs, on_finish fires
//!   AbortOnError ──► RuntimeError::Aborted, tier 1 skipped, no on_finish
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example abort_on_error
//! ```

use tierload::{ErrorPolicy, LoadError, LoadRequest, LoaderConfig, LoaderFn, TierLoader};

async fn run(policy: ErrorPolicy) -> Result<(), Box<dyn std::error::Error>> {
    let loader = LoaderFn::arc("flaky", |req: LoadRequest| async move {
        if req.id.starts_with("config") {
            return Err(LoadError::transport("connection reset"));
        }
        Ok(())
    });

    let tiers = TierLoader::builder(
        [("config.json", 1), ("styles.css", 1), ("app.js", 2)],
        loader,
    )
    .with_config(LoaderConfig::default().with_error_policy(policy))
    .build()?;
    tiers.lifecycle_fn(|ev| println!("  [event] {} {}", ev.kind, ev.id));

    println!("policy {policy:?}:");
    let Some(handle) = tiers.start(|| println!("  [done] finish callback")) else {
        return Ok(());
    };
    match handle.wait().await {
        Ok(report) => println!("  finished: {} ok, {} failed", report.succeeded, report.failed()),
        Err(e) => println!("  stopped: {} ({})", e.as_label(), e.as_message()),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(ErrorPolicy::Continue).await?;
    run(ErrorPolicy::AbortOnError).await?;
    Ok(())
}
