//! Attachment reclamation
//!
//! After a save, any owned attachment the old document referenced and the new
//! one does not is deleted. Deletions run concurrently and every one of them is
//! allowed to settle: a failure is logged and counted, never propagated, and
//! leaves at worst an orphaned object for a later pass.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::domain::OwnedDomain;
use super::extract::{referenced_attachments_in, AttachmentSet};
use super::storage::StorageClient;

/// What a reclamation would do, computed without touching storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReclaimPlan {
    /// Referenced before the edit, not after
    pub removed: AttachmentSet,
    /// Removed URLs on the owned domain; these get deleted
    pub targets: Vec<String>,
    /// Removed URLs hosted elsewhere; never deleted
    pub skipped: Vec<String>,
}

impl ReclaimPlan {
    pub fn compute(old: &str, new: &str, domain: &OwnedDomain) -> Self {
        let before = referenced_attachments_in(old);
        let after = referenced_attachments_in(new);

        let removed: AttachmentSet = before.difference(&after).cloned().collect();
        let (targets, skipped): (Vec<String>, Vec<String>) =
            removed.iter().cloned().partition(|url| domain.owns(url));

        Self {
            removed,
            targets,
            skipped,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Outcome of one deletion attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DeletionOutcome {
    Deleted,
    /// Storage reported the object missing; counts as success
    AlreadyGone,
    Failed(String),
}

impl DeletionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeletionOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    pub url: String,
    pub outcome: DeletionOutcome,
}

/// Aggregate result of a reclamation, for logging and telemetry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReclaimReport {
    /// Size of the removed set before domain filtering
    pub removed: usize,
    pub skipped: Vec<String>,
    pub results: Vec<DeletionResult>,
}

impl ReclaimReport {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionResult> {
        self.results.iter().filter(|r| !r.outcome.is_success())
    }
}

/// Deletes attachments dropped by an edit
#[derive(Clone)]
pub struct AttachmentReclaimer {
    storage: Arc<dyn StorageClient>,
    domain: OwnedDomain,
}

impl AttachmentReclaimer {
    pub fn new(storage: Arc<dyn StorageClient>, domain: OwnedDomain) -> Self {
        Self { storage, domain }
    }

    pub fn domain(&self) -> &OwnedDomain {
        &self.domain
    }

    pub fn plan(&self, old: &str, new: &str) -> ReclaimPlan {
        ReclaimPlan::compute(old, new, &self.domain)
    }

    /// Compute the removed set for `(old, new)` and delete it
    ///
    /// Holds no state between calls: the same pair always yields the same
    /// deletion attempts.
    pub async fn reclaim(&self, old: &str, new: &str) -> ReclaimReport {
        let plan = self.plan(old, new);
        self.execute(plan).await
    }

    /// Delete every target in `plan` concurrently and wait for all to settle
    pub async fn execute(&self, plan: ReclaimPlan) -> ReclaimReport {
        for url in &plan.skipped {
            debug!(url = %url, domain = %self.domain.host(), "Reclaim: skipping foreign attachment");
        }

        let deletions = plan.targets.iter().map(|url| self.delete_one(url));
        let results = join_all(deletions).await;

        let report = ReclaimReport {
            removed: plan.removed.len(),
            skipped: plan.skipped,
            results,
        };

        if report.removed > 0 {
            info!(
                removed = report.removed,
                targeted = report.attempted(),
                skipped = report.skipped.len(),
                succeeded = report.succeeded(),
                failed = report.failed(),
                "Reclaim: attachment cleanup settled"
            );
        }
        report
    }

    async fn delete_one(&self, url: &str) -> DeletionResult {
        debug!(url = %url, "Reclaim: deleting attachment");
        let outcome = match self.storage.delete_object(url).await {
            Ok(()) => DeletionOutcome::Deleted,
            Err(e) if e.is_already_deleted() => {
                debug!(url = %url, "Reclaim: attachment already gone");
                DeletionOutcome::AlreadyGone
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Reclaim: failed to delete attachment");
                DeletionOutcome::Failed(e.to_string())
            }
        };
        DeletionResult {
            url: url.to_string(),
            outcome,
        }
    }

    /// Run reclamation on a background task
    pub fn spawn(&self, old: String, new: String) -> JoinHandle<ReclaimReport> {
        let reclaimer = self.clone();
        tokio::spawn(async move { reclaimer.reclaim(&old, &new).await })
    }
}

/// Await `save`, then reclaim attachments only if it succeeded
///
/// Reclamation runs in the background; its handle is returned alongside the
/// save result. A failed save returns its error and deletes nothing.
pub async fn reclaim_after_save<F, T, E>(
    reclaimer: &AttachmentReclaimer,
    old: String,
    new: String,
    save: F,
) -> Result<(T, JoinHandle<ReclaimReport>), E>
where
    F: Future<Output = Result<T, E>>,
{
    let saved = save.await?;
    Ok((saved, reclaimer.spawn(old, new)))
}
