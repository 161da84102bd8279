//! # Example: fs_loader
//!
//! Loads script files from a directory with [`FsLoader`], in priority order.
//!
//! Shows how to:
//! - Point [`FsLoader`] at a root directory.
//! - Receive file contents on the sink channel.
//! - Limit file sizes with the `max_bytes` attribute.
//!
//! ## Run
//! ```bash
//! cargo run --example fs_loader
//! cargo run --example fs_loader --features logging
//! ```

use std::sync::Arc;

use tierload::{FsLoader, LoadSettings, TierLoader};
use tokio::sync::mpsc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
        .init();

    let dir = std::env::temp_dir().join(format!("tierload-demo-{}", std::process::id()));
    tokio::fs::create_dir_all(dir.join("lib")).await?;
    tokio::fs::write(dir.join("lib/core.js"), "export const core = 1;\n").await?;
    tokio::fs::write(dir.join("main.js"), "import { core } from './lib/core.js';\n").await?;
    tokio::fs::write(dir.join("huge.js"), "x".repeat(4096)).await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let loader = Arc::new(FsLoader::new(&dir).with_sink(tx));

    let tiers = TierLoader::builder(
        [("lib/core.js", 0), ("main.js", 1), ("huge.js", 2), ("missing.js", 2)],
        loader,
    )
    .with_settings(LoadSettings::new().with_timeout(1_000).with_attr("max_bytes", "1024"))
    .build()?;

    #[cfg(feature = "logging")]
    tiers.lifecycle(Arc::new(tierload::LogWriter::new()));
    #[cfg(not(feature = "logging"))]
    tiers.lifecycle_fn(|ev| println!("[event] {} {} {}", ev.kind, ev.id, ev.message));

    if let Some(run) = tiers.start(|| println!("[done]")) {
        let report = run.wait().await?;
        println!("report: {report:?}");
    }

    while let Ok(res) = rx.try_recv() {
        println!("{} => {} bytes", res.id, res.bytes.len());
    }
    tokio::fs::remove_dir_all(&dir).await?;
    Ok(())
}
