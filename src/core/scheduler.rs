//! # TierScheduler: tier-by-tier execution.
//!
//! Walks the [`PriorityIndex`] with an explicit cursor. Each tier is launched as
//! a set of concurrent [`LoadTask`]s on a [`JoinSet`]; the join set is the tier
//! barrier.
//!
//! ## Flow
//! ```text
//! run(on_all_done)
//!   loop {
//!     cursor exhausted? ──► publish Finished ──► on_all_done() ──► Ok(report)
//!     ├─► publish TierStarted
//!     ├─► spawn LoadTask for every resource of the tier
//!     ├─► barrier: join every task (outstanding → 0)
//!     ├─► publish TierFinished
//!     └─► failed && AbortOnError? ──► publish Aborted ──► Err(Aborted)
//!   }
//! ```
//!
//! ## Rules
//! - Tiers run **strictly sequentially**, in ascending priority.
//! - Within a tier there is no ordering between tasks.
//! - Errors never cut siblings short; under `AbortOnError` they only stop the
//!   tiers that follow.
//! - `on_all_done` runs at most once, after the last terminal event of the last tier.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{LoadError, RuntimeError};
use crate::events::{EventKind, LifecycleBus};
use crate::loaders::Loader;
use crate::policies::ErrorPolicy;
use crate::priority::{PriorityIndex, Tier};
use crate::settings::SettingsTable;

use super::task::LoadTask;

/// Summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tiers whose barrier released.
    pub tiers_completed: usize,
    /// Resources that ended with `SUCCESS`.
    pub succeeded: usize,
    /// Resources that ended with `TIMEOUT`.
    pub timed_out: usize,
    /// Resources that ended with `NETWORK_ERROR`.
    pub network_errors: usize,
    /// Resources that ended with `SETTINGS_ERROR`.
    pub settings_errors: usize,
}

impl RunReport {
    /// Resources that ended with any error.
    pub fn failed(&self) -> usize {
        self.timed_out + self.network_errors + self.settings_errors
    }

    /// Resources that reached a terminal event.
    pub fn settled(&self) -> usize {
        self.succeeded + self.failed()
    }

    fn record(&mut self, res: &Result<(), LoadError>) {
        match res {
            Ok(()) => self.succeeded += 1,
            Err(e) => match e.event_kind() {
                EventKind::Timeout => self.timed_out += 1,
                EventKind::SettingsError => self.settings_errors += 1,
                _ => self.network_errors += 1,
            },
        }
    }
}

/// Drives one load sequence over an immutable tier index.
pub(crate) struct TierScheduler {
    index: Arc<PriorityIndex>,
    loader: Arc<dyn Loader>,
    settings: Arc<SettingsTable>,
    bus: LifecycleBus,
    policy: ErrorPolicy,
}

impl TierScheduler {
    pub(crate) fn new(
        index: Arc<PriorityIndex>,
        loader: Arc<dyn Loader>,
        settings: Arc<SettingsTable>,
        bus: LifecycleBus,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            index,
            loader,
            settings,
            bus,
            policy,
        }
    }

    /// Runs every tier, then `on_all_done`.
    pub(crate) async fn run<F>(self, on_all_done: F) -> Result<RunReport, RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut report = RunReport::default();
        let mut cursor = 0usize;
        let index = Arc::clone(&self.index);

        while let Some(tier) = index.tiers().get(cursor) {
            let failed = self.run_tier(cursor, tier, &mut report).await?;

            if !failed.is_empty() && self.policy.aborts() {
                warn!(
                    tier = cursor,
                    priority = tier.priority(),
                    ?failed,
                    "tier failed; skipping remaining tiers"
                );
                self.diagnostics(
                    Diagnostic::new(DiagnosticKind::Aborted)
                        .with_tier(cursor, tier.priority())
                        .with_reason(format!("failed: {}", failed.join(","))),
                );
                return Err(RuntimeError::Aborted {
                    tier: cursor,
                    priority: tier.priority(),
                    failed,
                });
            }
            cursor += 1;
        }

        debug!(tiers = report.tiers_completed, "all tiers completed");
        self.diagnostics(Diagnostic::new(DiagnosticKind::Finished));
        on_all_done();
        Ok(report)
    }

    /// Launches one tier and waits for its barrier; returns ids that failed.
    async fn run_tier(
        &self,
        cursor: usize,
        tier: &Tier,
        report: &mut RunReport,
    ) -> Result<Vec<String>, RuntimeError> {
        let ids: Vec<&str> = tier.ids().collect();
        debug!(tier = cursor, priority = tier.priority(), ?ids, "tier started");
        self.diagnostics(
            Diagnostic::new(DiagnosticKind::TierStarted)
                .with_tier(cursor, tier.priority())
                .with_reason(ids.join(",")),
        );

        let mut set = JoinSet::new();
        for entry in tier.entries() {
            let task = LoadTask::new(
                entry.shared_id(),
                cursor,
                self.settings.for_id(entry.id()),
                Arc::clone(&self.loader),
                self.bus.clone(),
            );
            set.spawn(async move {
                let id = Arc::clone(task.id());
                (id, task.run().await)
            });
        }

        let mut outstanding = tier.len();
        let mut failed = Vec::new();
        while let Some(joined) = set.join_next().await {
            let (id, res) = joined.map_err(|e| RuntimeError::Join {
                reason: e.to_string(),
            })?;
            outstanding -= 1;
            debug!(tier = cursor, %id, outstanding, "resource joined");
            report.record(&res);
            if res.is_err() {
                failed.push(id.to_string());
            }
        }

        report.tiers_completed += 1;
        let mut finished =
            Diagnostic::new(DiagnosticKind::TierFinished).with_tier(cursor, tier.priority());
        if !failed.is_empty() {
            finished = finished.with_reason(format!("failed: {}", failed.join(",")));
        }
        self.diagnostics(finished);
        Ok(failed)
    }

    fn diagnostics(&self, d: Diagnostic) {
        self.bus.diagnostics().publish(d);
    }
}
