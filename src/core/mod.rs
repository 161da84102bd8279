//! Runtime core: tier scheduling and the public handle.
//!
//! The public API from this module is [`TierLoader`] (with its builder),
//! [`RunHandle`] and [`RunReport`].
//!
//! Internal modules:
//! - [`scheduler`]: walks the tiers, one join-set barrier per tier;
//! - [`task`]: runs a single resource load with timeout and event translation;
//! - [`handle`]: owns the observer slot and starts the run once;
//! - [`builder`]: validates the map and settings overrides.

mod builder;
mod handle;
mod scheduler;
mod task;

pub use builder::TierLoaderBuilder;
pub use handle::{RunHandle, TierLoader};
pub use scheduler::RunReport;
