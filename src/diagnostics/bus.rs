//! # Broadcast bus for diagnostics.
//!
//! [`DiagnosticBus`] is a thin wrapper around [`tokio::sync::broadcast`]. Tasks,
//! the scheduler and the lifecycle bus publish into it; callers subscribe through
//! [`TierLoader::diagnostics`](crate::TierLoader::diagnostics).
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks and never fails.
//! - **Bounded capacity**: one ring buffer shared by all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` items.
//! - **No persistence**: records are lost if nobody is subscribed at send time.

use tokio::sync::broadcast;

use super::diagnostic::Diagnostic;

/// Broadcast channel for diagnostics.
///
/// Cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct DiagnosticBus {
    tx: broadcast::Sender<Diagnostic>,
}

impl DiagnosticBus {
    /// Creates a new bus with the given channel capacity (minimum 1, clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Diagnostic>(capacity);
        Self { tx }
    }

    /// Publishes a record to all active receivers; dropped if there are none.
    pub fn publish(&self, d: Diagnostic) {
        let _ = self.tx.send(d);
    }

    /// Creates a receiver that observes records sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Diagnostic> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    #[tokio::test]
    async fn test_subscriber_sees_later_records_only() {
        let bus = DiagnosticBus::new(0);
        bus.publish(Diagnostic::new(DiagnosticKind::Finished));

        let mut rx = bus.subscribe();
        bus.publish(Diagnostic::new(DiagnosticKind::TierStarted).with_tier(0, 1));

        let d = rx.recv().await.unwrap();
        assert_eq!(d.kind, DiagnosticKind::TierStarted);
        assert_eq!(d.priority, Some(1));
        assert!(rx.try_recv().is_err());
    }
}
