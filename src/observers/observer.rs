//! # Observe: the lifecycle event sink
//!
//! The [`Observe`] trait is the caller's hook into resource lifecycles. A loader
//! holds at most one observer at a time; it receives every [`LifecycleEvent`]
//! of every resource, in tier order.
//!
//! ## Contract
//! - Called inline by the emitting task and awaited before the task proceeds, so a
//!   terminal event is observed before the tier barrier can release.
//! - A panic inside `on_event` is caught and reported as an
//!   [`ObserverPanicked`](crate::DiagnosticKind::ObserverPanicked) diagnostic; it
//!   never stops the load sequence.
//! - Keep it short: a slow observer delays the tier it is observing.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use async_trait::async_trait;
//! use tierload::{LifecycleEvent, Observe};
//!
//! #[derive(Default)]
//! struct Failures(AtomicUsize);
//!
//! #[async_trait]
//! impl Observe for Failures {
//!     async fn on_event(&self, event: &LifecycleEvent) {
//!         if event.error {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &str { "failures" }
//! }
//!
//! let obs: Arc<dyn Observe> = Arc::new(Failures::default());
//! assert_eq!(obs.name(), "failures");
//! ```

use async_trait::async_trait;

use crate::events::LifecycleEvent;

/// Contract for lifecycle observers.
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single lifecycle event.
    async fn on_event(&self, event: &LifecycleEvent);

    /// Human-readable name (for logs and diagnostics).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
