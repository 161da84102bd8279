//! Lifecycle events: types and the single-observer bus.
//!
//! ## Contents
//! - [`EventKind`], [`LifecycleEvent`] event classification and payload
//! - [`LifecycleBus`] forwards events to the registered observer, isolating faults
//!
//! ## Quick reference
//! - **Publisher**: `core::task::LoadTask` (one per resource).
//! - **Consumer**: the observer registered through
//!   [`TierLoader::lifecycle`](crate::TierLoader::lifecycle).

mod bus;
mod event;

pub(crate) use bus::ObserverSlot;
pub use bus::LifecycleBus;
pub use event::{EventKind, LifecycleEvent};
