//! # Per-load settings.
//!
//! [`LoadSettings`] travels with every load request and every lifecycle event.
//!
//! - `timeout`: milliseconds, number-like; `0` or absent means unbounded. A value
//!   that does not coerce to a non-negative integer fails only the resource it
//!   belongs to, with a `SETTINGS_ERROR` event.
//! - `attrs`: loader-specific attributes, passed through verbatim.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tierload::LoadSettings;
//!
//! let settings = LoadSettings::new()
//!     .with_timeout(250)
//!     .with_attr("charset", "utf-8");
//!
//! assert_eq!(settings.timeout(), Ok(Some(Duration::from_millis(250))));
//! assert_eq!(settings.attr("charset"), Some("utf-8"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::priority::PriorityValue;

/// Settings applied to one resource load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSettings {
    /// Raw timeout in milliseconds (validated lazily, per resource).
    pub timeout: Option<PriorityValue>,
    /// Loader attributes, uninterpreted by the scheduler.
    pub attrs: BTreeMap<String, String>,
}

impl LoadSettings {
    /// Empty settings: no timeout, no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns settings with the given raw timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: impl Into<PriorityValue>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    /// Returns settings with one more attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Looks up an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Validated timeout.
    ///
    /// - `Ok(None)` → absent or `0` (no timeout)
    /// - `Ok(Some(d))` → positive timeout
    /// - `Err(InvalidTimeout)` → not number-like, or negative
    pub fn timeout(&self) -> Result<Option<Duration>, ConfigError> {
        let Some(raw) = &self.timeout else {
            return Ok(None);
        };
        let invalid = || ConfigError::InvalidTimeout {
            value: raw.to_string(),
        };
        let ms = raw.coerce().map_err(|_| invalid())?;
        let ms = u64::try_from(ms).map_err(|_| invalid())?;
        Ok((ms > 0).then(|| Duration::from_millis(ms)))
    }
}

/// Default settings plus per-resource replacements.
///
/// An override replaces the default entirely for its resource; nothing is merged.
#[derive(Debug, Clone, Default)]
pub(crate) struct SettingsTable {
    default: Arc<LoadSettings>,
    overrides: HashMap<String, Arc<LoadSettings>>,
}

impl SettingsTable {
    pub(crate) fn new(default: LoadSettings) -> Self {
        Self {
            default: Arc::new(default),
            overrides: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, id: String, settings: LoadSettings) {
        self.overrides.insert(id, Arc::new(settings));
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.overrides.keys().map(String::as_str)
    }

    pub(crate) fn for_id(&self, id: &str) -> Arc<LoadSettings> {
        self.overrides
            .get(id)
            .map_or_else(|| Arc::clone(&self.default), Arc::clone)
    }
}
