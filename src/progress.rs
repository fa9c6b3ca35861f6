// src/progress.rs
use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::data::{JobKind, JobStatus};
use crate::error::{JobError, StoreError};
use crate::reconcile::scrape_time;
use crate::store::{ScrapeJob, Store};

/// Progress reporting used by long-running stages.
/// The job tracker implements this to persist counters; tests and one-off
/// callers can pass `NullProgress`.
#[async_trait]
pub trait Progress: Send {
    /// Called at the start of a stage with the number of items (if known).
    async fn begin(&mut self, _stage: JobKind, _total: usize) {}

    /// One item (island, commodity, crew, flag) made it into storage.
    async fn item_done(&mut self, _item: &str) {}

    /// One item failed; the stage carries on with the next.
    async fn item_failed(&mut self, _item: &str, _error: &str) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Owns one job row for the duration of a run and writes it back after
/// every counted item.
pub struct JobTracker<'a> {
    store: &'a dyn Store,
    job: ScrapeJob,
}

impl<'a> JobTracker<'a> {
    pub fn new(store: &'a dyn Store, job: ScrapeJob) -> Self {
        Self { store, job }
    }

    pub fn job(&self) -> &ScrapeJob {
        &self.job
    }

    pub fn into_job(self) -> ScrapeJob {
        self.job
    }

    // A lost counter update is not worth failing the item over.
    async fn persist(&mut self) {
        if let Err(e) = self.store.save_job(&self.job).await {
            warn!(job_id = self.job.id, error = %e, "could not save job counters");
        }
    }

    /// A whole stage of a composite run failed; count it once and move on.
    pub async fn stage_failed(&mut self, stage: JobKind, err: &JobError) {
        self.job.items_failed += 1;
        error!(job_id = self.job.id, ocean = %self.job.ocean, %stage, error = %err, "stage failed");
        self.persist().await;
    }

    pub async fn fail(&mut self, message: String) -> Result<(), StoreError> {
        self.job.status = JobStatus::Failed;
        self.job.ended_at = Some(scrape_time());
        self.job.error = Some(message);
        self.store.save_job(&self.job).await
    }

    /// Mark completed unless already finalized.
    pub async fn complete(&mut self) -> Result<(), StoreError> {
        if !self.job.is_running() {
            return Ok(());
        }
        self.job.status = JobStatus::Completed;
        self.job.ended_at = Some(scrape_time());
        self.store.save_job(&self.job).await
    }
}

#[async_trait]
impl Progress for JobTracker<'_> {
    async fn begin(&mut self, stage: JobKind, total: usize) {
        info!(job_id = self.job.id, ocean = %self.job.ocean, %stage, total, "stage started");
    }

    async fn item_done(&mut self, _item: &str) {
        self.job.items_processed += 1;
        self.persist().await;
    }

    async fn item_failed(&mut self, item: &str, error: &str) {
        self.job.items_failed += 1;
        warn!(job_id = self.job.id, ocean = %self.job.ocean, item, error, "item failed");
        self.persist().await;
    }
}
