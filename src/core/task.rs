//! # Load one resource.
//!
//! A [`LoadTask`] wraps one [`Loader::load`] call: it validates the resource's
//! timeout, translates loader signals into lifecycle events, and enforces that
//! exactly one terminal event is emitted.
//!
//! ## Event flow
//! ```text
//! Invalid timeout:
//!   settings.timeout() → Err → SETTINGS_ERROR            (loader never called)
//!
//! Success:
//!   loader.load() → started → LOADING → succeeded → SUCCESS
//!
//! Failure:
//!   loader.load() → [started → LOADING] → failed(reason) → NETWORK_ERROR
//!
//! Timeout:
//!   timer fires first → cancel request token → TIMEOUT
//!
//! Loader dropped its signals without a terminal one:
//!   channel closed → NETWORK_ERROR
//! ```
//!
//! ## Rules
//! - **Exactly one** terminal event; `run()` returns right after publishing it.
//! - Loader signals win over the timer when both are ready (`biased` select).
//! - The channel is closed before the terminal event is published; signals
//!   still buffered or sent later are reported as `LateSignal` diagnostics.
//! - A repeated `started` signal is ignored.

use std::future::pending;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use tokio::{select, sync::mpsc, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::diagnostics::Diagnostic;
use crate::error::LoadError;
use crate::events::{EventKind, LifecycleBus, LifecycleEvent};
use crate::loaders::{LoadRequest, LoadSignals, Loader, Signal};
use crate::settings::LoadSettings;

const DROPPED_SIGNALS: &str = "loader dropped its signals without completing";

/// One resource load inside a tier.
pub(crate) struct LoadTask {
    id: Arc<str>,
    tier: usize,
    settings: Arc<LoadSettings>,
    loader: Arc<dyn Loader>,
    bus: LifecycleBus,
}

impl LoadTask {
    pub(crate) fn new(
        id: Arc<str>,
        tier: usize,
        settings: Arc<LoadSettings>,
        loader: Arc<dyn Loader>,
        bus: LifecycleBus,
    ) -> Self {
        Self {
            id,
            tier,
            settings,
            loader,
            bus,
        }
    }

    pub(crate) fn id(&self) -> &Arc<str> {
        &self.id
    }

    /// Runs the load to its terminal event and returns its outcome.
    pub(crate) async fn run(self) -> Result<(), LoadError> {
        let timeout = match self.settings.timeout() {
            Ok(timeout) => timeout,
            Err(err) => {
                let err = LoadError::Settings(err);
                self.finish(&Err(err.clone())).await;
                return Err(err);
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let signals = LoadSignals::new(
            Arc::clone(&self.id),
            tx,
            self.bus.diagnostics().clone(),
        );
        let request = LoadRequest {
            id: Arc::clone(&self.id),
            settings: Arc::clone(&self.settings),
            cancel: cancel.clone(),
        };

        let loader = Arc::clone(&self.loader);
        if let Err(panic_err) =
            std::panic::catch_unwind(AssertUnwindSafe(|| loader.load(request, signals)))
        {
            let reason = panic_reason(&*panic_err);
            warn!(id = %self.id, loader = loader.name(), %reason, "loader panicked on start");
            rx.close();
            self.drain_late(&mut rx);
            let res = Err(LoadError::transport(format!("loader panicked: {reason}")));
            self.finish(&res).await;
            return res;
        }

        let timer = async move {
            match timeout {
                Some(d) => {
                    time::sleep(d).await;
                    d
                }
                None => pending::<Duration>().await,
            }
        };
        tokio::pin!(timer);

        let mut started = false;
        let res = loop {
            select! {
                biased;
                signal = rx.recv() => match signal {
                    Some(Signal::Started) if started => {
                        debug!(id = %self.id, "duplicate start signal ignored");
                    }
                    Some(Signal::Started) => {
                        started = true;
                        self.emit(LifecycleEvent::new(
                            EventKind::Loading,
                            Arc::clone(&self.id),
                            Arc::clone(&self.settings),
                        )
                        .with_message("loading"))
                        .await;
                    }
                    Some(Signal::Succeeded) => break Ok(()),
                    Some(Signal::Failed(reason)) => break Err(LoadError::Transport { reason }),
                    None => break Err(LoadError::transport(DROPPED_SIGNALS)),
                },
                d = &mut timer => {
                    cancel.cancel();
                    break Err(LoadError::Timeout { timeout: d });
                }
            }
        };

        rx.close();
        self.drain_late(&mut rx);
        self.finish(&res).await;
        res
    }

    /// Publishes the terminal event for `res`.
    async fn finish(&self, res: &Result<(), LoadError>) {
        let (kind, message) = match res {
            Ok(()) => (EventKind::Success, "loaded".to_string()),
            Err(e) => (e.event_kind(), e.to_string()),
        };
        debug!(id = %self.id, tier = self.tier, %kind, "resource settled");
        self.emit(
            LifecycleEvent::new(kind, Arc::clone(&self.id), Arc::clone(&self.settings))
                .with_message(message),
        )
        .await;
    }

    async fn emit(&self, event: LifecycleEvent) {
        self.bus.notify(event.with_tier(self.tier)).await;
    }

    /// Reports signals that were buffered when the channel closed.
    fn drain_late(&self, rx: &mut mpsc::UnboundedReceiver<Signal>) {
        while let Ok(signal) = rx.try_recv() {
            debug!(id = %self.id, signal = signal.as_str(), "late loader signal discarded");
            self.bus
                .diagnostics()
                .publish(Diagnostic::late_signal(&self.id, signal.as_str()));
        }
    }
}

fn panic_reason(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
