//! Run policies.
//!
//! ## Contents
//! - [`ErrorPolicy`] whether a terminal error ends the run (continue / abort)
//!
//! ## Defaults
//! - `ErrorPolicy::Continue`: siblings and later tiers always run, errors are
//!   only reported.

mod escalation;

pub use escalation::ErrorPolicy;
