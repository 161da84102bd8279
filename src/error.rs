//! Error types used by the tierload scheduler, its tasks and its configuration.
//!
//! This module defines three error enums:
//!
//! - [`ConfigError`]: malformed priority maps, settings overrides or timeouts.
//! - [`LoadError`]: the failure side of a single resource load.
//! - [`RuntimeError`]: failures of the whole load sequence.
//!
//! All of them provide helper methods (`as_label`, `as_message`) for logging.

use std::time::Duration;
use thiserror::Error;

use crate::events::EventKind;

/// # Errors raised while building a loader.
///
/// Construction fails synchronously with one of these. A malformed timeout is the
/// exception: it is reported per resource as a `SETTINGS_ERROR` lifecycle event
/// and only carried here as the cause.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Priority value is neither numeric nor a numeric string.
    #[error("priority must be number-like; got {value:?} for {id:?}")]
    NotNumeric {
        /// Resource identifier.
        id: String,
        /// Offending value, rendered.
        value: String,
    },

    /// Priority value is a float that is NaN or infinite.
    #[error("priority of {id:?} is not a finite number")]
    NotFinite {
        /// Resource identifier.
        id: String,
    },

    /// Priority value does not fit into an `i64`.
    #[error("priority {value} of {id:?} is out of range")]
    OutOfRange {
        /// Resource identifier.
        id: String,
        /// Offending value, rendered.
        value: String,
    },

    /// The same resource identifier appeared twice in the input.
    #[error("duplicate resource id {id:?}")]
    DuplicateId {
        /// Resource identifier.
        id: String,
    },

    /// A settings override names a resource that is not in the priority map.
    #[error("settings override for unknown resource {id:?}")]
    UnknownResource {
        /// Resource identifier.
        id: String,
    },

    /// `timeout` does not coerce to a non-negative integer.
    #[error("timeout must be a non-negative integer of milliseconds; got {value:?}")]
    InvalidTimeout {
        /// Offending value, rendered.
        value: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tierload::ConfigError;
    ///
    /// let err = ConfigError::DuplicateId { id: "a.js".into() };
    /// assert_eq!(err.as_label(), "config_duplicate_id");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::NotNumeric { .. } => "config_not_numeric",
            ConfigError::NotFinite { .. } => "config_not_finite",
            ConfigError::OutOfRange { .. } => "config_out_of_range",
            ConfigError::DuplicateId { .. } => "config_duplicate_id",
            ConfigError::UnknownResource { .. } => "config_unknown_resource",
            ConfigError::InvalidTimeout { .. } => "config_invalid_timeout",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::NotNumeric { id, value } => format!("not numeric: {id}={value}"),
            ConfigError::NotFinite { id } => format!("not finite: {id}"),
            ConfigError::OutOfRange { id, value } => format!("out of range: {id}={value}"),
            ConfigError::DuplicateId { id } => format!("duplicate: {id}"),
            ConfigError::UnknownResource { id } => format!("unknown resource: {id}"),
            ConfigError::InvalidTimeout { value } => format!("invalid timeout: {value}"),
        }
    }
}

/// # Why a single resource did not load.
///
/// Every variant completes the resource's slot in its tier. Whether it also stops
/// the remaining tiers is decided by [`ErrorPolicy`](crate::ErrorPolicy).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The loader did not signal completion before the resource's timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// The loader reported a failure.
    #[error("load failed: {reason}")]
    Transport {
        /// Reason reported by the loader.
        reason: String,
    },

    /// The resource's settings are malformed; the loader was never invoked.
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),
}

impl LoadError {
    /// Shorthand for [`LoadError::Transport`].
    pub fn transport(reason: impl Into<String>) -> Self {
        LoadError::Transport {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tierload::LoadError;
    /// use std::time::Duration;
    ///
    /// let err = LoadError::Timeout { timeout: Duration::from_millis(50) };
    /// assert_eq!(err.as_label(), "load_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LoadError::Timeout { .. } => "load_timeout",
            LoadError::Transport { .. } => "load_transport",
            LoadError::Settings(_) => "load_settings",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LoadError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            LoadError::Transport { reason } => format!("error: {reason}"),
            LoadError::Settings(err) => format!("settings: {}", err.as_message()),
        }
    }

    /// Terminal lifecycle kind this error is reported as.
    pub fn event_kind(&self) -> EventKind {
        match self {
            LoadError::Timeout { .. } => EventKind::Timeout,
            LoadError::Transport { .. } => EventKind::NetworkError,
            LoadError::Settings(_) => EventKind::SettingsError,
        }
    }
}

/// # Errors that end a whole load sequence.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// A tier finished with failures under [`ErrorPolicy::AbortOnError`](crate::ErrorPolicy::AbortOnError);
    /// the remaining tiers were skipped.
    #[error("aborted after tier {tier} (priority {priority}); failed: {failed:?}")]
    Aborted {
        /// Index of the tier that failed.
        tier: usize,
        /// Priority shared by that tier.
        priority: i64,
        /// Resources of that tier that ended with an error.
        failed: Vec<String>,
    },

    /// The scheduler task itself was cancelled or panicked.
    #[error("scheduler task failed: {reason}")]
    Join {
        /// Join error reported by the runtime.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use tierload::RuntimeError;
    ///
    /// let err = RuntimeError::Aborted { tier: 0, priority: 1, failed: vec!["a.js".into()] };
    /// assert_eq!(err.as_label(), "runtime_aborted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Aborted { .. } => "runtime_aborted",
            RuntimeError::Join { .. } => "runtime_join",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Aborted {
                tier,
                priority,
                failed,
            } => format!("aborted at tier {tier} (priority {priority}); failed={failed:?}"),
            RuntimeError::Join { reason } => format!("join: {reason}"),
        }
    }
}
