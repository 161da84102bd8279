//! # Error escalation policy.
//!
//! [`ErrorPolicy`] decides what a terminal error means for the rest of the run.
//!
//! - [`ErrorPolicy::Continue`] errors are informational; every tier runs (default).
//! - [`ErrorPolicy::AbortOnError`] the tier that saw an error still runs to its
//!   barrier (siblings are never cut short), then the remaining tiers are skipped.
//!
//! ```text
//! tier 0: a ✓  b ✗  ──► barrier ──► Continue     → tier 1 starts
//!                                └► AbortOnError → RuntimeError::Aborted, no finish callback
//! ```

/// Policy controlling whether a terminal error stops the remaining tiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Keep going; errors are reported through events only (default).
    #[default]
    Continue,
    /// Skip the remaining tiers once a tier completes with any error.
    AbortOnError,
}

impl ErrorPolicy {
    /// True if a failed tier ends the run.
    #[inline]
    pub fn aborts(self) -> bool {
        matches!(self, ErrorPolicy::AbortOnError)
    }
}
