//! # Lifecycle bus: single-subscriber event sink.
//!
//! [`LifecycleBus`] forwards every [`LifecycleEvent`] to the one observer held in
//! the shared [`ObserverSlot`], and keeps the scheduler insulated from it.
//!
//! ## Architecture
//! ```text
//! LoadTask 1 ──┐
//! LoadTask 2 ──┼──► LifecycleBus::notify(event)
//! LoadTask N ──┘          │
//!                         ├─ slot empty        → event dropped
//!                         ├─ observer returns  → done
//!                         └─ observer panics   → caught (catch_unwind)
//!                                               ├─► tracing::error!
//!                                               └─► DiagnosticBus (ObserverPanicked)
//! ```
//!
//! ## Rules
//! - **Awaited inline**: `notify()` returns after the observer has handled the
//!   event, so emission order per resource is observation order.
//! - **Isolation**: an observer panic never reaches the caller of `notify()`.
//! - **Replaceable slot**: `notify()` snapshots the current observer before
//!   awaiting it. Replacing the observer while events are in flight means a
//!   late event may reach either the old or the new one.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave the observer's own
//! state inconsistent if it panics while holding a lock.

use std::sync::{Arc, PoisonError, RwLock};

use futures::FutureExt;
use tracing::error;

use crate::diagnostics::{Diagnostic, DiagnosticBus};
use crate::observers::Observe;

use super::event::LifecycleEvent;

/// Single mutable observer slot, shared by the loader handle and its bus.
#[derive(Default)]
pub(crate) struct ObserverSlot {
    inner: RwLock<Option<Arc<dyn Observe>>>,
}

impl ObserverSlot {
    /// Replaces the observer, returning the previous one.
    pub(crate) fn replace(&self, observer: Option<Arc<dyn Observe>>) -> Option<Arc<dyn Observe>> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, observer)
    }

    /// Snapshot of the current observer.
    pub(crate) fn current(&self) -> Option<Arc<dyn Observe>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Forwards lifecycle events to the registered observer.
///
/// Cheap to clone; every task of a run holds one.
#[derive(Clone)]
pub struct LifecycleBus {
    slot: Arc<ObserverSlot>,
    diagnostics: DiagnosticBus,
}

impl LifecycleBus {
    pub(crate) fn new(slot: Arc<ObserverSlot>, diagnostics: DiagnosticBus) -> Self {
        Self { slot, diagnostics }
    }

    /// Delivers `event` to the current observer, if any.
    pub async fn notify(&self, event: LifecycleEvent) {
        let Some(observer) = self.slot.current() else {
            return;
        };

        let fut = observer.on_event(&event);
        if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let info = panic_message(&*panic_err);
            error!(
                observer = observer.name(),
                id = %event.id,
                kind = %event.kind,
                %info,
                "observer panicked; event isolated"
            );
            self.diagnostics
                .publish(Diagnostic::observer_panicked(observer.name(), &event, info));
        }
    }

    /// Side channel used for isolated faults.
    pub fn diagnostics(&self) -> &DiagnosticBus {
        &self.diagnostics
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
