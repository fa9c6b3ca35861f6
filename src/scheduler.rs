// src/scheduler.rs
//
// Timers. The daily full run fires on startup (if enabled) and then at a
// local wall-clock time; every batch runs all oceans concurrently and is
// awaited before the next trigger is computed, so batches never overlap.
// The market poller runs on its own fixed interval, same rule.
//
// Shutdown: stop firing, give in-flight work `grace` to finish, abort the
// rest. Aborted jobs stay `running` in storage.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::core::Fetch;
use crate::data::{JobKind, Ocean};
use crate::error::ConfigError;
use crate::poller::MarketPoller;
use crate::scrape::{Scraper, Urls};
use crate::store::Store;

/// First instant after `now` whose wall-clock time in `tz` is `at`.
/// A time skipped by a DST jump fires an hour later; a repeated one fires on
/// its first occurrence.
pub fn next_daily(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut day = now.with_timezone(&tz).date_naive();
    loop {
        let local = day.and_time(at);
        let fire = tz
            .from_local_datetime(&local)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(local + chrono::Duration::hours(1))).earliest());
        if let Some(fire) = fire {
            let fire = fire.with_timezone(&Utc);
            if fire > now {
                return fire;
            }
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => return now + chrono::Duration::days(1),
        }
    }
}

pub struct Scheduler {
    scraper: Scraper,
    poller: Option<(MarketPoller, Duration)>,
    oceans: Vec<Ocean>,
    daily_at: NaiveTime,
    tz: Tz,
    run_on_startup: bool,
    grace: Duration,
}

impl Scheduler {
    pub fn new(cfg: &Config, fetch: Arc<dyn Fetch>, store: Arc<dyn Store>) -> Result<Self, ConfigError> {
        let oceans = cfg.ocean_list()?;
        let poller = cfg.market_poll_interval().map(|every| {
            let p = MarketPoller::new(Arc::clone(&fetch), Arc::clone(&store), Urls::new(&cfg.host), oceans.clone());
            (p, every)
        });
        Ok(Self {
            scraper: Scraper::new(cfg, fetch, store),
            poller,
            oceans,
            daily_at: cfg.daily_time()?,
            tz: cfg.tz()?,
            run_on_startup: cfg.run_on_startup,
            grace: cfg.shutdown_grace(),
        })
    }

    /// Run until `shutdown` turns true (or its sender is dropped).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut tasks = JoinSet::new();

        tasks.spawn(daily_loop(
            self.scraper.clone(),
            self.oceans.clone(),
            self.daily_at,
            self.tz,
            self.run_on_startup,
            shutdown.clone(),
        ));
        if let Some((poller, every)) = self.poller {
            tasks.spawn(market_loop(poller, every, shutdown.clone()));
        }

        while !*shutdown.borrow_and_update() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }

        info!(grace_secs = self.grace.as_secs(), "shutting down, waiting for running batches");
        let drained = tokio::time::timeout(self.grace, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!(error = %e, "scheduler task ended abnormally");
                }
            }
        })
        .await;
        if drained.is_err() {
            warn!("grace period over, abandoning running batches");
            tasks.abort_all();
        }
    }
}

/// Full run of every ocean, concurrently. Waits for all of them.
pub async fn run_daily_batch(scraper: &Scraper, oceans: &[Ocean]) {
    info!(oceans = oceans.len(), "daily batch started");
    let mut runs = JoinSet::new();
    for &ocean in oceans {
        let scraper = scraper.clone();
        runs.spawn(async move { (ocean, scraper.run_job(ocean, JobKind::DailyFull).await) });
    }
    while let Some(res) = runs.join_next().await {
        match res {
            Ok((ocean, Err(e))) => error!(%ocean, error = %e, "daily job could not be recorded"),
            Ok((_, Ok(_))) => {}
            Err(e) => error!(error = %e, "daily job task panicked"),
        }
    }
    info!("daily batch finished");
}

fn stopping(shutdown: &watch::Receiver<bool>) -> bool {
    *shutdown.borrow()
}

async fn daily_loop(
    scraper: Scraper,
    oceans: Vec<Ocean>,
    at: NaiveTime,
    tz: Tz,
    run_on_startup: bool,
    mut shutdown: watch::Receiver<bool>,
) {
    if run_on_startup && !stopping(&shutdown) {
        run_daily_batch(&scraper, &oceans).await;
    }
    while !stopping(&shutdown) {
        let next = next_daily(Utc::now(), at, tz);
        info!(next = %next.with_timezone(&tz), "next daily batch scheduled");
        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        tokio::select! {
            _ = tokio::time::sleep(wait) => run_daily_batch(&scraper, &oceans).await,
            changed = shutdown.changed() => if changed.is_err() { break },
        }
    }
}

async fn market_loop(poller: MarketPoller, every: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticks = tokio::time::interval(every);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    while !stopping(&shutdown) {
        tokio::select! {
            _ = ticks.tick() => {
                if let Err(e) = poller.run().await {
                    error!(error = %e, "market import failed");
                }
            }
            changed = shutdown.changed() => if changed.is_err() { break },
        }
    }
}
