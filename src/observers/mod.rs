//! # Lifecycle observers.
//!
//! This module provides the [`Observe`] trait and the built-in implementations.
//!
//! ## Architecture
//! ```text
//! LoadTask ── notify(LifecycleEvent) ──► LifecycleBus ──► Observe::on_event(&LifecycleEvent)
//!                                            │                  (single slot)
//!                                            └─ panic ──► DiagnosticBus (ObserverPanicked)
//! ```
//!
//! ## Provided implementations
//! - [`ObserverFn`] wraps a closure.
//! - [`LogWriter`] (feature `logging`) writes events as `tracing` records.

#[cfg(feature = "logging")]
mod log;
mod observer;
mod observer_fn;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::Observe;
pub use observer_fn::ObserverFn;
