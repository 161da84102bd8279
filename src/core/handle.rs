//! # TierLoader: the public entry point.
//!
//! A [`TierLoader`] owns a validated [`PriorityIndex`], the injected [`Loader`],
//! per-resource settings and the observer slot. It can be started once.
//!
//! ## State
//! ```text
//! new/build ──► { started: false, observer: None }
//!                   │  lifecycle(obs)   (any number of times, before or after start)
//!                   ▼
//!              start(on_finish) ──► started: true ──► tokio::spawn(TierScheduler::run)
//!                   │                                   └─► RunHandle
//!              start(..) again  ──► None (no side effects)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tierload::{LifecycleEvent, LoadError, LoadRequest, LoaderFn, ObserverFn, TierLoader};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = LoaderFn::arc("noop", |_req: LoadRequest| async {
//!         Ok::<(), LoadError>(())
//!     });
//!     let tiers = TierLoader::new([("a.js", 1), ("b.js", 1), ("c.js", 2)], loader)?;
//!     tiers.lifecycle(ObserverFn::arc("print", |ev: &LifecycleEvent| {
//!         println!("{} {}", ev.id, ev.kind);
//!     }));
//!
//!     let handle = tiers.start(|| println!("done")).expect("first start");
//!     let report = handle.wait().await?;
//!     assert_eq!(report.succeeded, 3);
//!     assert!(tiers.start(|| {}).is_none());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    config::LoaderConfig,
    diagnostics::{Diagnostic, DiagnosticBus},
    error::{ConfigError, RuntimeError},
    events::{LifecycleBus, LifecycleEvent, ObserverSlot},
    loaders::Loader,
    observers::{Observe, ObserverFn},
    priority::{PriorityIndex, PriorityValue, Tier},
    settings::SettingsTable,
};

use super::builder::TierLoaderBuilder;
use super::scheduler::{RunReport, TierScheduler};

/// Priority-tiered resource loader.
pub struct TierLoader {
    index: Arc<PriorityIndex>,
    loader: Arc<dyn Loader>,
    settings: Arc<SettingsTable>,
    cfg: LoaderConfig,
    slot: Arc<ObserverSlot>,
    diagnostics: DiagnosticBus,
    started: AtomicBool,
}

impl TierLoader {
    /// Builds a loader with default settings and configuration.
    ///
    /// ### Errors
    /// Returns a [`ConfigError`] if any priority fails to coerce or an id repeats.
    pub fn new<I, K, V>(map: I, loader: Arc<dyn Loader>) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorityValue>,
    {
        Self::builder(map, loader).build()
    }

    /// Starts a [`TierLoaderBuilder`].
    pub fn builder<I, K, V>(map: I, loader: Arc<dyn Loader>) -> TierLoaderBuilder
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PriorityValue>,
    {
        TierLoaderBuilder::new(map, loader)
    }

    pub(crate) fn from_parts(
        index: PriorityIndex,
        loader: Arc<dyn Loader>,
        settings: SettingsTable,
        cfg: LoaderConfig,
    ) -> Self {
        let diagnostics = DiagnosticBus::new(cfg.diagnostics_capacity_clamped());
        Self {
            index: Arc::new(index),
            loader,
            settings: Arc::new(settings),
            cfg,
            slot: Arc::new(ObserverSlot::default()),
            diagnostics,
            started: AtomicBool::new(false),
        }
    }

    /// Registers the lifecycle observer, replacing any previous one.
    ///
    /// Replacing while a run is in flight is allowed; events already being
    /// delivered may still reach the previous observer.
    pub fn lifecycle(&self, observer: Arc<dyn Observe>) -> &Self {
        if let Some(prev) = self.slot.replace(Some(observer)) {
            debug!(previous = prev.name(), "observer replaced");
        }
        self
    }

    /// Registers a closure as the lifecycle observer.
    pub fn lifecycle_fn<F>(&self, f: F) -> &Self
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.lifecycle(ObserverFn::arc("lifecycle_fn", f))
    }

    /// Starts loading; `on_finish` runs once after the last tier completes.
    ///
    /// Returns `None` if the loader was already started; the second call has no
    /// other effect and `on_finish` is dropped uncalled.
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime.
    pub fn start<F>(&self, on_finish: F) -> Option<RunHandle>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            debug!("start ignored: already started");
            return None;
        }

        let bus = LifecycleBus::new(Arc::clone(&self.slot), self.diagnostics.clone());
        let scheduler = TierScheduler::new(
            Arc::clone(&self.index),
            Arc::clone(&self.loader),
            Arc::clone(&self.settings),
            bus,
            self.cfg.error_policy,
        );
        debug!(
            tiers = self.index.len(),
            resources = self.index.resource_count(),
            policy = ?self.cfg.error_policy,
            "load started"
        );
        Some(RunHandle {
            join: tokio::spawn(scheduler.run(on_finish)),
        })
    }

    /// True once [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Tiers in load order.
    pub fn tiers(&self) -> &[Tier] {
        self.index.tiers()
    }

    /// The validated priority index.
    pub fn index(&self) -> &PriorityIndex {
        &self.index
    }

    /// Subscribes to diagnostics published after this call.
    ///
    /// Subscribe before [`start`](Self::start) to see a complete run.
    pub fn diagnostics(&self) -> broadcast::Receiver<Diagnostic> {
        self.diagnostics.subscribe()
    }
}

/// Handle to a started run.
///
/// Dropping it does not stop the run.
pub struct RunHandle {
    join: JoinHandle<Result<RunReport, RuntimeError>>,
}

impl RunHandle {
    /// Waits for the run to end.
    ///
    /// ### Errors
    /// - [`RuntimeError::Aborted`] when `AbortOnError` stopped the run;
    /// - [`RuntimeError::Join`] when the scheduler task panicked.
    pub async fn wait(self) -> Result<RunReport, RuntimeError> {
        self.join.await.map_err(|e| RuntimeError::Join {
            reason: e.to_string(),
        })?
    }

    /// True once the run has ended, successfully or not.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}
