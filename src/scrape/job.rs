// src/scrape/job.rs
//
// One scrape run for one ocean. Items are processed one after another; a
// failing item is counted and logged, never fatal. Only an unusable listing
// page (fetch/parse failure or zero rows) fails a single-kind job. A
// `daily_full` run counts a failed stage once and moves to the next stage.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::urls::Urls;
use crate::config::Config;
use crate::core::Fetch;
use crate::data::{JobKind, Ocean};
use crate::error::{JobError, StoreError};
use crate::progress::{JobTracker, Progress};
use crate::reconcile::{CrewObservation, FlagObservation, scrape_time};
use crate::specs::fame::FameEntry;
use crate::specs::islands::IslandPage;
use crate::specs::{crews, fame, flags, islands, tax_rates};
use crate::store::{ScrapeJob, Store};

/// Stages of a `daily_full` run, in order.
pub const DAILY_STAGES: [JobKind; 4] = [JobKind::Islands, JobKind::TaxRates, JobKind::CrewFame, JobKind::FlagFame];

#[derive(Clone)]
pub struct Scraper {
    fetch: Arc<dyn Fetch>,
    store: Arc<dyn Store>,
    urls: Urls,
    island_ids: RangeInclusive<u64>,
}

impl Scraper {
    pub fn new(cfg: &Config, fetch: Arc<dyn Fetch>, store: Arc<dyn Store>) -> Self {
        Self { fetch, store, urls: Urls::new(&cfg.host), island_ids: cfg.island_ids() }
    }

    /// Create the job row, run it to the end and return the finalized row.
    /// Only storage failures on the job row itself surface as `Err`.
    pub async fn run_job(&self, ocean: Ocean, kind: JobKind) -> Result<ScrapeJob, StoreError> {
        let job = self.store.create_job(ocean, kind, scrape_time()).await?;
        info!(job_id = job.id, %ocean, %kind, "job started");
        let mut tracker = JobTracker::new(self.store.as_ref(), job);

        if kind.is_composite() {
            for stage in DAILY_STAGES {
                if let Err(e) = self.run_stage(ocean, stage, &mut tracker).await {
                    tracker.stage_failed(stage, &e).await;
                }
            }
        } else if let Err(e) = self.run_stage(ocean, kind, &mut tracker).await {
            warn!(job_id = tracker.job().id, %ocean, %kind, error = %e, "job failed");
            tracker.fail(e.to_string()).await?;
        }

        tracker.complete().await?;
        let job = tracker.into_job();
        info!(
            job_id = job.id,
            %ocean,
            %kind,
            status = %job.status,
            processed = job.items_processed,
            failed = job.items_failed,
            "job finished"
        );
        Ok(job)
    }

    /// Run one stage without a job row. A composite kind stops at its first failing stage.
    pub async fn run_stage(&self, ocean: Ocean, kind: JobKind, progress: &mut dyn Progress) -> Result<(), JobError> {
        match kind {
            JobKind::Islands => self.islands(ocean, progress).await,
            JobKind::TaxRates => self.tax_rates(ocean, progress).await,
            JobKind::CrewFame | JobKind::CrewInfo => self.crews(ocean, kind, progress).await,
            JobKind::FlagFame => self.flags(ocean, progress).await,
            JobKind::BattleInfo => self.battles(ocean, progress).await,
            JobKind::DailyFull => {
                self.islands(ocean, progress).await?;
                self.tax_rates(ocean, progress).await?;
                self.crews(ocean, JobKind::CrewFame, progress).await?;
                self.flags(ocean, progress).await
            }
        }
    }

    /* ---------------- islands ---------------- */

    /// Configured id range, plus any ids the list page links to outside it.
    async fn island_ids(&self, ocean: Ocean) -> Vec<u64> {
        let mut ids: BTreeSet<u64> = self.island_ids.clone().collect();
        let url = self.urls.island_list(ocean);
        match self.fetch.fetch(&url).await {
            Ok(html) => ids.extend(islands::parse_list(&html).into_iter().filter_map(|s| s.game_id)),
            Err(e) => debug!(%ocean, error = %e, "island list unavailable, using id range"),
        }
        ids.into_iter().collect()
    }

    async fn islands(&self, ocean: Ocean, progress: &mut dyn Progress) -> Result<(), JobError> {
        let at = scrape_time();
        let ids = self.island_ids(ocean).await;
        progress.begin(JobKind::Islands, ids.len()).await;

        for id in ids {
            match self.island(ocean, id, at).await {
                Ok(true) => progress.item_done(&id.to_string()).await,
                Ok(false) => debug!(%ocean, island = id, "uncolonized, skipped"),
                Err(e) => progress.item_failed(&id.to_string(), &e.to_string()).await,
            }
        }
        Ok(())
    }

    /// `Ok(false)` for an uncolonized island.
    async fn island(&self, ocean: Ocean, id: u64, at: DateTime<Utc>) -> Result<bool, JobError> {
        let html = self.fetch.fetch(&self.urls.island(ocean, id)).await?;
        match islands::parse_info(&html, id)? {
            IslandPage::Uncolonized => Ok(false),
            IslandPage::Colonized(info) => {
                self.store.apply_island(ocean, &info, at).await?;
                Ok(true)
            }
        }
    }

    /* ---------------- tax rates ---------------- */

    async fn tax_rates(&self, ocean: Ocean, progress: &mut dyn Progress) -> Result<(), JobError> {
        let at = scrape_time();
        let url = self.urls.tax_rates(ocean);
        let html = self.fetch.fetch(&url).await?;
        let rates = tax_rates::parse(&html);
        if rates.is_empty() {
            return Err(JobError::EmptyListing { what: "tax rates", url });
        }

        progress.begin(JobKind::TaxRates, rates.len()).await;
        for rate in &rates {
            match self.store.apply_tax_rate(ocean, rate, at).await {
                Ok(()) => progress.item_done(&rate.commodity).await,
                Err(e) => progress.item_failed(&rate.commodity, &e.to_string()).await,
            }
        }
        Ok(())
    }

    /* ---------------- crews ---------------- */

    async fn listing(&self, url: String, what: &'static str, parse: fn(&str) -> Vec<FameEntry>) -> Result<Vec<FameEntry>, JobError> {
        let html = self.fetch.fetch(&url).await?;
        let entries = parse(&html);
        if entries.is_empty() {
            return Err(JobError::EmptyListing { what, url });
        }
        Ok(entries)
    }

    /// `crew_fame` and `crew_info` walk the same listing; `stage` is what gets reported.
    async fn crews(&self, ocean: Ocean, stage: JobKind, progress: &mut dyn Progress) -> Result<(), JobError> {
        let at = scrape_time();
        let entries = self.listing(self.urls.crew_fame(ocean), "crews", fame::parse_crews).await?;

        progress.begin(stage, entries.len()).await;
        for entry in entries {
            let id = entry.game_id.to_string();
            match self.crew(ocean, entry, at).await {
                Ok(()) => progress.item_done(&id).await,
                Err(e) => progress.item_failed(&id, &e.to_string()).await,
            }
        }
        Ok(())
    }

    async fn crew(&self, ocean: Ocean, entry: FameEntry, at: DateTime<Utc>) -> Result<(), JobError> {
        let html = self.fetch.fetch(&self.urls.crew(ocean, entry.game_id)).await?;
        let info = crews::parse_info(&html, entry.game_id)?;

        // Battle stats are a bonus: the crew is recorded without them.
        let battle = match self.fetch.fetch(&self.urls.crew_battle(ocean, entry.game_id)).await {
            Ok(page) => {
                let mut totals = crews::parse_battle(&page);
                totals.rank = totals.rank.or(info.rank);
                Some(totals)
            }
            Err(e) => {
                warn!(%ocean, crew = entry.game_id, error = %e, "battle page unavailable");
                None
            }
        };

        let obs = CrewObservation { entry, info, battle };
        self.store.apply_crew(ocean, &obs, at).await?;
        Ok(())
    }

    /* ---------------- battles ---------------- */

    async fn battles(&self, ocean: Ocean, progress: &mut dyn Progress) -> Result<(), JobError> {
        let at = scrape_time();
        let ids = self.store.active_crews(ocean).await?;

        progress.begin(JobKind::BattleInfo, ids.len()).await;
        for id in ids {
            match self.battle(ocean, id, at).await {
                Ok(()) => progress.item_done(&id.to_string()).await,
                Err(e) => progress.item_failed(&id.to_string(), &e.to_string()).await,
            }
        }
        Ok(())
    }

    async fn battle(&self, ocean: Ocean, id: u64, at: DateTime<Utc>) -> Result<(), JobError> {
        let html = self.fetch.fetch(&self.urls.crew_battle(ocean, id)).await?;
        let totals = crews::parse_battle(&html);
        self.store.apply_battle(ocean, id, &totals, at).await?;
        Ok(())
    }

    /* ---------------- flags ---------------- */

    async fn flags(&self, ocean: Ocean, progress: &mut dyn Progress) -> Result<(), JobError> {
        let at = scrape_time();
        let entries = self.listing(self.urls.flag_fame(ocean), "flags", fame::parse_flags).await?;

        progress.begin(JobKind::FlagFame, entries.len()).await;
        for entry in entries {
            let id = entry.game_id.to_string();
            match self.flag(ocean, entry, at).await {
                Ok(()) => progress.item_done(&id).await,
                Err(e) => progress.item_failed(&id, &e.to_string()).await,
            }
        }
        Ok(())
    }

    async fn flag(&self, ocean: Ocean, entry: FameEntry, at: DateTime<Utc>) -> Result<(), JobError> {
        let html = self.fetch.fetch(&self.urls.flag(ocean, entry.game_id)).await?;
        let info = flags::parse_info(&html, entry.game_id)?;
        self.store.apply_flag(ocean, &FlagObservation { entry, info }, at).await?;
        Ok(())
    }
}
