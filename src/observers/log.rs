//! # LogWriter: simple event logger
//!
//! A minimal observer that writes incoming [`LifecycleEvent`]s as `tracing`
//! records at `info` (success/loading) or `warn` (errors). Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO [loading] id="app.js" tier=0
//! INFO [success] id="app.js" tier=0
//! WARN [timeout] id="slow.js" tier=1 msg="timed out after 50ms"
//! WARN [network-error] id="gone.js" tier=1 msg="load failed: not found"
//! WARN [settings-error] id="bad.js" tier=2 msg="invalid settings: ..."
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{EventKind, LifecycleEvent};
use crate::observers::Observe;

/// Event writer observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Observe for LogWriter {
    async fn on_event(&self, e: &LifecycleEvent) {
        match e.kind {
            EventKind::Loading => {
                info!("[loading] id={:?} tier={}", e.id, e.tier);
            }
            EventKind::Success => {
                info!("[success] id={:?} tier={}", e.id, e.tier);
            }
            EventKind::Timeout => {
                warn!("[timeout] id={:?} tier={} msg={:?}", e.id, e.tier, e.message);
            }
            EventKind::NetworkError => {
                warn!(
                    "[network-error] id={:?} tier={} msg={:?}",
                    e.id, e.tier, e.message
                );
            }
            EventKind::SettingsError => {
                warn!(
                    "[settings-error] id={:?} tier={} msg={:?}",
                    e.id, e.tier, e.message
                );
            }
        }
    }

    fn name(&self) -> &str {
        "LogWriter"
    }
}
