//! # Loader contract.
//!
//! A [`Loader`] performs the actual transfer of one resource. The scheduler calls
//! [`Loader::load`] once per resource and then waits for signals on the
//! [`LoadSignals`] handle it passed in:
//!
//! - `started()`: optional, at most once is meaningful;
//! - `succeeded()` or `failed(reason)`: exactly one is expected.
//!
//! ## Rules
//! - The first terminal signal wins. Anything after it (and any signal after a
//!   timeout fired) is dropped and reported as a
//!   [`LateSignal`](crate::DiagnosticKind::LateSignal) diagnostic.
//! - Dropping every clone of [`LoadSignals`] without a terminal signal fails the
//!   resource with `NETWORK_ERROR`.
//! - [`LoadRequest::cancel`] is cancelled when the resource times out. Honouring
//!   it is best-effort; the scheduler has already stopped waiting.
//!
//! ## Example
//! ```rust
//! use tierload::{LoadRequest, LoadSignals, Loader};
//!
//! struct Instant;
//!
//! impl Loader for Instant {
//!     fn load(&self, _request: LoadRequest, signals: LoadSignals) {
//!         signals.started();
//!         signals.succeeded();
//!     }
//! }
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticBus};
use crate::settings::LoadSettings;

/// Capability that loads one resource.
pub trait Loader: Send + Sync + 'static {
    /// Starts loading `request.id`; completion is reported through `signals`.
    ///
    /// Must not block. Long work belongs in a spawned task that owns `signals`.
    fn load(&self, request: LoadRequest, signals: LoadSignals);

    /// Human-readable name (for logs).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// What to load.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    /// Resource identifier.
    pub id: Arc<str>,
    /// Settings for this resource; `attrs` are meant for the loader.
    pub settings: Arc<LoadSettings>,
    /// Cancelled when the scheduler stops waiting on this resource.
    pub cancel: CancellationToken,
}

/// Signal sent by a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Signal {
    Started,
    Succeeded,
    Failed(String),
}

impl Signal {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Signal::Started => "started",
            Signal::Succeeded => "succeeded",
            Signal::Failed(_) => "failed",
        }
    }
}

/// Cloneable handle a loader uses to report progress.
#[derive(Debug, Clone)]
pub struct LoadSignals {
    id: Arc<str>,
    tx: mpsc::UnboundedSender<Signal>,
    diagnostics: DiagnosticBus,
}

impl LoadSignals {
    pub(crate) fn new(
        id: Arc<str>,
        tx: mpsc::UnboundedSender<Signal>,
        diagnostics: DiagnosticBus,
    ) -> Self {
        Self {
            id,
            tx,
            diagnostics,
        }
    }

    /// Reports that the load has started.
    pub fn started(&self) {
        self.send(Signal::Started);
    }

    /// Reports success.
    pub fn succeeded(&self) {
        self.send(Signal::Succeeded);
    }

    /// Reports failure.
    pub fn failed(&self, reason: impl Into<String>) {
        self.send(Signal::Failed(reason.into()));
    }

    /// True once the scheduler no longer listens (resource finished or timed out).
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resource identifier these signals belong to.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn send(&self, signal: Signal) {
        let name = signal.as_str();
        if self.tx.send(signal).is_err() {
            debug!(id = %self.id, signal = name, "late loader signal discarded");
            self.diagnostics
                .publish(Diagnostic::late_signal(&self.id, name));
        }
    }
}
