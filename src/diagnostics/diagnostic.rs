//! # Side-channel records.
//!
//! A [`Diagnostic`] reports something about the load sequence that is not a
//! resource lifecycle event: tier boundaries, isolated observer faults, signals
//! that arrived after a resource had already finished, and the end of a run.
//!
//! ## Example
//! ```rust
//! use tierload::{Diagnostic, DiagnosticKind};
//!
//! let d = Diagnostic::new(DiagnosticKind::LateSignal)
//!     .with_id("app.js")
//!     .with_reason("succeeded");
//!
//! assert_eq!(d.kind, DiagnosticKind::LateSignal);
//! assert_eq!(d.id.as_deref(), Some("app.js"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::events::LifecycleEvent;

static DIAGNOSTIC_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A tier was launched.
    ///
    /// Sets `tier`, `priority`, `reason` (comma-separated ids).
    TierStarted,

    /// Every resource of a tier produced its terminal event.
    ///
    /// Sets `tier`, `priority`, `reason` (failed ids, if any).
    TierFinished,

    /// The observer panicked while handling an event; the event was isolated.
    ///
    /// Sets `id`, `tier`, `observer`, `reason` (panic message).
    ObserverPanicked,

    /// A loader signal arrived after its resource had finished and was dropped.
    ///
    /// Sets `id`, `reason` (signal name).
    LateSignal,

    /// Remaining tiers were skipped because of a failure.
    ///
    /// Sets `tier`, `priority`, `reason`.
    Aborted,

    /// Every tier completed; the finish callback is about to run.
    Finished,
}

/// Side-channel record with optional metadata.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Monotonic sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Classification.
    pub kind: DiagnosticKind,
    /// Resource identifier, if applicable.
    pub id: Option<Arc<str>>,
    /// Tier index, if applicable.
    pub tier: Option<usize>,
    /// Tier priority, if applicable.
    pub priority: Option<i64>,
    /// Observer name (for `ObserverPanicked`).
    pub observer: Option<Arc<str>>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
}

impl Diagnostic {
    /// Creates a diagnostic of the given kind with the next sequence number.
    pub fn new(kind: DiagnosticKind) -> Self {
        Self {
            seq: DIAGNOSTIC_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            id: None,
            tier: None,
            priority: None,
            observer: None,
            reason: None,
        }
    }

    #[inline]
    pub fn with_id(mut self, id: impl Into<Arc<str>>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[inline]
    pub fn with_tier(mut self, tier: usize, priority: i64) -> Self {
        self.tier = Some(tier);
        self.priority = Some(priority);
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an observer panic record for the event that triggered it.
    pub fn observer_panicked(observer: &str, event: &LifecycleEvent, info: String) -> Self {
        let mut d = Diagnostic::new(DiagnosticKind::ObserverPanicked)
            .with_id(Arc::clone(&event.id))
            .with_reason(info);
        d.tier = Some(event.tier);
        d.observer = Some(Arc::from(observer));
        d
    }

    /// Creates a late-signal record.
    pub fn late_signal(id: &Arc<str>, signal: &'static str) -> Self {
        Diagnostic::new(DiagnosticKind::LateSignal)
            .with_id(Arc::clone(id))
            .with_reason(signal)
    }
}
