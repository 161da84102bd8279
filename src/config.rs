//! # Loader-wide configuration.
//!
//! Provides [`LoaderConfig`], the settings shared by every resource of one
//! [`TierLoader`](crate::TierLoader). Per-resource knobs (timeout, attrs) live in
//! [`LoadSettings`](crate::LoadSettings) instead.
//!
//! ## Sentinel values
//! - `diagnostics_capacity = 0` → clamped to 1

use crate::policies::ErrorPolicy;

/// Configuration for a loader run.
///
/// ## Field semantics
/// - `error_policy`: what a terminal error means for later tiers
/// - `diagnostics_capacity`: diagnostics ring buffer size (min 1; clamped)
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Escalation policy for terminal errors.
    pub error_policy: ErrorPolicy,

    /// Capacity of the diagnostics broadcast channel.
    ///
    /// Receivers that lag more than this many records observe `Lagged` and skip
    /// older ones.
    pub diagnostics_capacity: usize,
}

impl LoaderConfig {
    /// Returns the diagnostics capacity clamped to a minimum of 1.
    #[inline]
    pub fn diagnostics_capacity_clamped(&self) -> usize {
        self.diagnostics_capacity.max(1)
    }

    /// Returns a config with the given error policy.
    #[must_use]
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

impl Default for LoaderConfig {
    /// Default configuration:
    ///
    /// - `error_policy = ErrorPolicy::Continue`
    /// - `diagnostics_capacity = 256`
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::default(),
            diagnostics_capacity: 256,
        }
    }
}
