//! # Example: timeouts
//!
//! One resource never answers; its timeout releases the tier barrier.
//!
//! Shows how to:
//! - Set a default timeout with [`LoadSettings::with_timeout`].
//! - Override settings for a single resource.
//! - Let the loader stop work through the request's cancellation token.
//!
//! ## Flow
//! ```text
//! tier 0: fast.js  ──► SUCCESS
//!         hang.js  ──► (no signal) ... 200ms ──► token cancelled ──► TIMEOUT
//! tier 1: late.js  ──► SUCCESS (starts only after the timeout)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=tierload=debug cargo run --example timeouts
//! ```

use std::time::Duration;

use tierload::{LoadError, LoadRequest, LoadSettings, LoaderFn, TierLoader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let loader = LoaderFn::arc("maybe-hang", |req: LoadRequest| async move {
        if &*req.id == "hang.js" {
            req.cancel.cancelled().await;
            println!("[loader] {} cancelled", req.id);
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(30)).await;
        Ok::<(), LoadError>(())
    });

    let tiers = TierLoader::builder([("fast.js", 1), ("hang.js", 1), ("late.js", 2)], loader)
        .with_settings(LoadSettings::new().with_timeout(5_000))
        .with_resource_settings("hang.js", LoadSettings::new().with_timeout("200"))
        .build()?;

    tiers.lifecycle_fn(|ev| {
        if ev.error {
            println!("[event] {} {} ({})", ev.kind, ev.id, ev.message);
        } else {
            println!("[event] {} {}", ev.kind, ev.id);
        }
    });

    if let Some(run) = tiers.start(|| println!("[done]")) {
        let report = run.wait().await?;
        println!("timed out: {}", report.timed_out);
    }
    Ok(())
}
