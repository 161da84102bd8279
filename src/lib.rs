//! # tierload
//!
//! **tierload** loads a set of resources in priority tiers on tokio.
//!
//! Resources sharing a priority form a tier and load concurrently. The next tier
//! starts only after every resource of the current one reported a terminal
//! outcome. A single observer sees one `LOADING` event when a load starts and
//! exactly one terminal event per resource; a completion callback runs once at
//! the end.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   [(id, priority), ...]          Arc<dyn Loader>         LoadSettings
//!            │                           │              (default + overrides)
//!            ▼                           │                      │
//! ┌─────────────────────┐                │                      │
//! │    PriorityIndex    │                │                      │
//! │ tier0 < tier1 < ... │                │                      │
//! └──────────┬──────────┘                │                      │
//!            ▼                           ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TierLoader (public handle)                                       │
//! │  - ObserverSlot (single, replaceable observer)                    │
//! │  - DiagnosticBus (broadcast side channel)                         │
//! │  - started flag (start() runs once)                               │
//! └──────────────────────────────┬────────────────────────────────────┘
//!                                ▼  start(on_finish)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TierScheduler (cursor over tiers, one JoinSet barrier per tier)  │
//! └──────┬──────────────────┬──────────────────┬──────────────────────┘
//!        ▼                  ▼                  ▼
//!     ┌────────────┐     ┌────────────┐     ┌────────────┐
//!     │  LoadTask  │     │  LoadTask  │     │  LoadTask  │
//!     │ (timeout + │     │            │     │            │
//!     │  signals)  │     │            │     │            │
//!     └─────┬──────┘     └─────┬──────┘     └─────┬──────┘
//!           │ LOADING / SUCCESS / TIMEOUT / NETWORK_ERROR / SETTINGS_ERROR
//!           ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  LifecycleBus ──► Observe::on_event (awaited, panics isolated)    │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle of one resource
//! ```text
//! LoadTask::run()
//!   ├─► settings.timeout() invalid ──► SETTINGS_ERROR, done
//!   ├─► loader.load(request, signals)
//!   ├─► select (biased):
//!   │     ├─ started         ──► LOADING (once)
//!   │     ├─ succeeded       ──► SUCCESS, done
//!   │     ├─ failed(reason)  ──► NETWORK_ERROR, done
//!   │     ├─ signals dropped ──► NETWORK_ERROR, done
//!   │     └─ timer           ──► cancel token, TIMEOUT, done
//!   └─► later signals ──► LateSignal diagnostic
//! ```
//!
//! ## Features
//! | Area            | Description                                              | Key types / traits                         |
//! |-----------------|----------------------------------------------------------|--------------------------------------------|
//! | **Handle**      | Build from a priority map, observe, start once.          | [`TierLoader`], [`RunHandle`]              |
//! | **Tiers**       | Coerce priorities and group them into ordered tiers.     | [`PriorityIndex`], [`Tier`]                |
//! | **Loaders**     | Plug in the code that actually fetches a resource.       | [`Loader`], [`LoaderFn`], [`FsLoader`]     |
//! | **Observers**   | Receive lifecycle events.                                | [`Observe`], [`ObserverFn`]                |
//! | **Diagnostics** | Tier boundaries, late signals, isolated observer panics. | [`Diagnostic`], [`DiagnosticKind`]         |
//! | **Errors**      | Typed configuration, load and run errors.                | [`ConfigError`], [`LoadError`], [`RuntimeError`] |
//! | **Configuration** | Error escalation and channel sizing.                   | [`LoaderConfig`], [`ErrorPolicy`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tierload::{LoadError, LoadRequest, LoadSettings, LoaderFn, TierLoader};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = LoaderFn::arc("sleepy", |req: LoadRequest| async move {
//!         tokio::time::sleep(Duration::from_millis(5)).await;
//!         println!("loaded {}", req.id);
//!         Ok::<(), LoadError>(())
//!     });
//!
//!     let tiers = TierLoader::builder([("core.js", 1), ("ui.js", 2), ("ads.js", 2)], loader)
//!         .with_settings(LoadSettings::new().with_timeout(1_000))
//!         .build()?;
//!
//!     tiers.lifecycle_fn(|ev| println!("{:>14} {}", ev.kind, ev.id));
//!
//!     if let Some(run) = tiers.start(|| println!("all tiers loaded")) {
//!         let report = run.wait().await?;
//!         assert_eq!(report.tiers_completed, 2);
//!     }
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod diagnostics;
mod error;
mod events;
mod loaders;
mod observers;
mod policies;
mod priority;
mod settings;

// ---- Public re-exports ----

pub use config::LoaderConfig;
pub use core::{RunHandle, RunReport, TierLoader, TierLoaderBuilder};
pub use diagnostics::{Diagnostic, DiagnosticBus, DiagnosticKind};
pub use error::{ConfigError, LoadError, RuntimeError};
pub use events::{EventKind, LifecycleBus, LifecycleEvent};
pub use loaders::{FsLoader, LoadRequest, LoadSignals, LoadedResource, Loader, LoaderFn};
pub use observers::{Observe, ObserverFn};
pub use policies::ErrorPolicy;
pub use priority::{PriorityEntry, PriorityIndex, PriorityValue, Tier};
pub use settings::LoadSettings;

/// Timeout values accept the same shapes as priorities (milliseconds).
pub type TimeoutValue = PriorityValue;

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
