//! Priority parsing and the tier structure.
//!
//! ## Contents
//! - [`PriorityValue`] number-like input (integer, float or numeric string)
//! - [`PriorityEntry`] one `(id, priority)` pair after coercion
//! - [`Tier`] maximal run of entries sharing one priority
//! - [`PriorityIndex`] the ordered, immutable tier sequence
//!
//! ## Quick wiring
//! ```text
//! [(id, value), ...] ──► PriorityIndex::build()
//!                              ├─ coerce every value     (ConfigError on failure)
//!                              ├─ stable sort ascending
//!                              └─ partition into tiers   (one linear scan)
//!                                        │
//!                                        ▼
//!                     core::TierScheduler walks tiers in order
//! ```

mod index;
mod value;

pub use index::{PriorityEntry, PriorityIndex, Tier};
pub use value::PriorityValue;
