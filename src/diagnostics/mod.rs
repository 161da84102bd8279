//! Diagnostics side channel.
//!
//! Lifecycle events go to the single observer. Everything else a caller may want
//! to know about (observer faults, late loader signals, tier boundaries, aborts)
//! is published here, on a broadcast bus that any number of receivers can watch.
//!
//! ## Contents
//! - [`DiagnosticKind`], [`Diagnostic`] record classification and metadata
//! - [`DiagnosticBus`] thin wrapper over `tokio::sync::broadcast`

mod bus;
mod diagnostic;

pub use bus::DiagnosticBus;
pub use diagnostic::{Diagnostic, DiagnosticKind};
