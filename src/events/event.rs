//! # Lifecycle events emitted per resource.
//!
//! [`EventKind`] fixes the `code`/`kind` pairs:
//!
//! | code | kind            | terminal | error |
//! |------|-----------------|----------|-------|
//! | 1    | `Loading`       | no       | no    |
//! | 2    | `Success`       | yes      | no    |
//! | 3    | `Timeout`       | yes      | yes   |
//! | 4    | `NetworkError`  | yes      | yes   |
//! | 5    | `SettingsError` | yes      | yes   |
//!
//! ## Ordering guarantees
//! - Per resource: zero or one `Loading`, then exactly one terminal event, last.
//! - Each event has a globally unique sequence number (`seq`) that increases
//!   monotonically; use it to restore emission order across a tier.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tierload::{EventKind, LifecycleEvent, LoadSettings};
//!
//! let ev = LifecycleEvent::new(EventKind::Timeout, "app.js", Arc::new(LoadSettings::new()))
//!     .with_message("timed out after 50ms");
//!
//! assert!(ev.finished);
//! assert!(ev.error);
//! assert_eq!(ev.code, 3);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::settings::LoadSettings;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Loader reported that the load has started (non-terminal).
    Loading,
    /// Resource loaded.
    Success,
    /// Resource did not complete before its timeout.
    Timeout,
    /// Loader reported a failure, or dropped its signals without completing.
    NetworkError,
    /// Resource settings are malformed; the loader was never invoked.
    SettingsError,
}

impl EventKind {
    /// Numeric code of this kind.
    pub fn code(self) -> u8 {
        match self {
            EventKind::Loading => 1,
            EventKind::Success => 2,
            EventKind::Timeout => 3,
            EventKind::NetworkError => 4,
            EventKind::SettingsError => 5,
        }
    }

    /// True for every kind except [`EventKind::Loading`].
    pub fn is_terminal(self) -> bool {
        !matches!(self, EventKind::Loading)
    }

    /// True for terminal failures.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            EventKind::Timeout | EventKind::NetworkError | EventKind::SettingsError
        )
    }

    /// Upper-case name (`LOADING`, `SUCCESS`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Loading => "LOADING",
            EventKind::Success => "SUCCESS",
            EventKind::Timeout => "TIMEOUT",
            EventKind::NetworkError => "NETWORK_ERROR",
            EventKind::SettingsError => "SETTINGS_ERROR",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Lifecycle event for one resource.
///
/// `finished`, `error` and `code` are derived from `kind` at construction.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Resource identifier.
    pub id: Arc<str>,
    /// Settings the resource was loaded with.
    pub settings: Arc<LoadSettings>,
    /// Index of the tier the resource belongs to.
    pub tier: usize,
    /// True for the resource's terminal event.
    pub finished: bool,
    /// True for terminal failures.
    pub error: bool,
    /// Numeric code of `kind`.
    pub code: u8,
    /// Event classification.
    pub kind: EventKind,
    /// Human-readable detail.
    pub message: Arc<str>,
}

impl LifecycleEvent {
    /// Creates an event of the given kind with the current timestamp and next sequence number.
    pub fn new(kind: EventKind, id: impl Into<Arc<str>>, settings: Arc<LoadSettings>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            id: id.into(),
            settings,
            tier: 0,
            finished: kind.is_terminal(),
            error: kind.is_error(),
            code: kind.code(),
            kind,
            message: Arc::from(""),
        }
    }

    /// Attaches a human-readable message.
    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches the tier index.
    #[inline]
    pub fn with_tier(mut self, tier: usize) -> Self {
        self.tier = tier;
        self
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self.kind, EventKind::Success)
    }
}
