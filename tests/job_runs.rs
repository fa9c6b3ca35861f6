// tests/job_runs.rs
mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::*;
use yoweb_scrape::data::{JobKind, JobStatus};
use yoweb_scrape::error::JobError;
use yoweb_scrape::progress::{NullProgress, Progress};
use yoweb_scrape::reconcile::BattleCounts;
use yoweb_scrape::scrape::Scraper;
use yoweb_scrape::store::{MemoryStore, SqliteStore, Store};

fn scraper(pages: &Arc<Pages>, store: &Arc<MemoryStore>) -> Scraper {
    Scraper::new(&config(), pages.clone(), store.clone())
}

/// Records the stage of every `begin` call.
#[derive(Default)]
struct Stages(Vec<JobKind>);

#[async_trait]
impl Progress for Stages {
    async fn begin(&mut self, stage: JobKind, _total: usize) {
        self.0.push(stage);
    }
}

fn five_crews(pages: &Pages) {
    let u = urls();
    let rows: Vec<(u64, &str, &str)> = vec![
        (101, "Alpha", "Illustrious"),
        (102, "Bravo", "Renowned"),
        (103, "Charlie", "Noted"),
        (104, "Delta", "Rumored"),
        (105, "Echo", "Obscure"),
    ];
    pages.set(u.crew_fame(OCEAN), fame_page("crew", &rows));
    for (id, name, _) in &rows {
        pages.set(u.crew(OCEAN, *id), crew_page(name, Some((900, "Armada"))));
        pages.set(u.crew_battle(OCEAN, *id), battle_page(10, 5));
    }
}

#[tokio::test]
async fn one_failing_crew_does_not_stop_the_rest() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    pages.remove(&urls().crew(OCEAN, 103));

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::CrewFame).await.unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!((job.items_processed, job.items_failed), (4, 1));
    assert_eq!(store.active_crews(OCEAN).await.unwrap(), vec![101, 102, 104, 105]);

    // counters were written back, not just returned
    let stored = store.job(job.id).await.unwrap().unwrap();
    assert_eq!(stored, job);
}

#[tokio::test]
async fn storage_failure_is_isolated_too() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    store.reject_crew(102);

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::CrewInfo).await.unwrap();
    assert_eq!((job.items_processed, job.items_failed), (4, 1));
    assert_eq!(job.status, JobStatus::Completed);
}

#[tokio::test]
async fn missing_battle_page_still_records_crew() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    pages.remove(&urls().crew_battle(OCEAN, 101));

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::CrewFame).await.unwrap();
    assert_eq!((job.items_processed, job.items_failed), (5, 0));
    assert!(store.battle_records(OCEAN, 101).await.unwrap().is_empty());
    assert_eq!(store.battle_records(OCEAN, 102).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_listing_fails_the_job() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().crew_fame(OCEAN), fame_page("crew", &[]));

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::CrewFame).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.ended_at.is_some());
    assert!(job.error.as_deref().unwrap().contains("no crews found"));
}

#[tokio::test]
async fn unreachable_listing_fails_the_job() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::TaxRates).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error.as_deref().unwrap().contains("404"));
}

#[tokio::test]
async fn stage_without_a_job_row() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().tax_rates(OCEAN), tax_page(&[]));

    let err = scraper(&pages, &store).run_stage(OCEAN, JobKind::TaxRates, &mut NullProgress).await.unwrap_err();
    assert!(matches!(err, JobError::EmptyListing { what: "tax rates", .. }));
    assert_eq!(store.job(1).await.unwrap(), None);
}

#[tokio::test]
async fn crew_info_reports_its_own_stage() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);

    let mut stages = Stages::default();
    scraper(&pages, &store).run_stage(OCEAN, JobKind::CrewInfo, &mut stages).await.unwrap();
    assert_eq!(stages.0, vec![JobKind::CrewInfo]);
}

#[tokio::test]
async fn daily_full_stage_stops_at_first_error() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    // island pages missing: counted per item; tax page missing: the stage fails

    let mut stages = Stages::default();
    let err = scraper(&pages, &store).run_stage(OCEAN, JobKind::DailyFull, &mut stages).await.unwrap_err();
    assert!(matches!(err, JobError::Fetch(_)), "{err:?}");
    assert_eq!(stages.0, vec![JobKind::Islands]);
    assert!(!pages.requested().iter().any(|u| u.ends_with("top_fame_97.html")));
    assert!(store.active_crews(OCEAN).await.unwrap().is_empty());
}

#[tokio::test]
async fn daily_full_stage_runs_every_step_in_order() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    pages.set(urls().tax_rates(OCEAN), tax_page(&[("Iron", 12)]));
    pages.set(urls().flag_fame(OCEAN), fame_page("flag", &[(900, "Armada", "Renowned")]));
    pages.set(urls().flag(OCEAN, 900), flag_page("Armada"));

    let mut stages = Stages::default();
    scraper(&pages, &store).run_stage(OCEAN, JobKind::DailyFull, &mut stages).await.unwrap();
    assert_eq!(stages.0, vec![JobKind::Islands, JobKind::TaxRates, JobKind::CrewFame, JobKind::FlagFame]);
    assert_eq!(store.active_crews(OCEAN).await.unwrap().len(), 5);
}

#[tokio::test]
async fn sqlite_job_row_matches_the_returned_job() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(SqliteStore::connect("sqlite::memory:").await.unwrap());
    pages.set(urls().tax_rates(OCEAN), tax_page(&[("Iron", 12)]));

    let s = Scraper::new(&config(), pages.clone(), store.clone());
    let job = s.run_job(OCEAN, JobKind::TaxRates).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(store.job(job.id).await.unwrap(), Some(job));
}

#[tokio::test]
async fn tax_rates_are_snapshotted() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().tax_rates(OCEAN), tax_page(&[("Iron", 12), ("Wood", 7), ("Hemp", 3)]));

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::TaxRates).await.unwrap();
    assert_eq!((job.status, job.items_processed), (JobStatus::Completed, 3));

    let tables = store.snapshot();
    assert_eq!(tables.tax_rates.len(), 3);
    assert_eq!(tables.commodities.len(), 3);
}

#[tokio::test]
async fn islands_skip_uncolonized_without_counting() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    let u = urls();
    pages.set(u.island(OCEAN, 1), island_page("Turtle Island", 57, Some(("Darkseid", 77, "Black Flag Inc"))));
    pages.set(u.island(OCEAN, 2), UNCOLONIZED);
    // island 3 is missing: one failure

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::Islands).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!((job.items_processed, job.items_failed), (1, 1));

    let tables = store.snapshot();
    let island = &tables.islands[&(OCEAN, 1)];
    assert_eq!(island.archipelago.as_deref(), Some("Diamond"));
    assert_eq!(island.governor_flag, Some(77));
    assert!(tables.flags.contains_key(&(OCEAN, 77)));
    assert_eq!(tables.island_commodities.len(), 2);

    let history = store.governance_history(OCEAN, 1).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].value.governor_name.as_deref(), Some("Darkseid"));
}

#[tokio::test]
async fn battle_info_walks_active_crews() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    let s = scraper(&pages, &store);
    s.run_job(OCEAN, JobKind::CrewFame).await.unwrap();
    // snapshots are keyed by millisecond
    tokio::time::sleep(Duration::from_millis(5)).await;

    for id in 101..=105 {
        pages.set(urls().crew_battle(OCEAN, id), battle_page(13, 5));
    }
    let job = s.run_job(OCEAN, JobKind::BattleInfo).await.unwrap();
    assert_eq!((job.items_processed, job.items_failed), (5, 0));

    let records = store.battle_records(OCEAN, 101).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].daily, BattleCounts { wins: 10, losses: 5 });
    assert_eq!(records[1].daily, BattleCounts { wins: 3, losses: 0 });
}

#[tokio::test]
async fn daily_full_counts_failed_stages_and_finishes() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    five_crews(&pages);
    // no islands, no tax page, no flag list

    let job = scraper(&pages, &store).run_job(OCEAN, JobKind::DailyFull).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.error, None);
    // 3 island pages + tax stage + flag stage failed; 5 crews done
    assert_eq!((job.items_processed, job.items_failed), (5, 5));

    let requested = pages.requested();
    let tax = requested.iter().position(|u| u.ends_with("taxrates.wm")).unwrap();
    let crews = requested.iter().position(|u| u.ends_with("top_fame_97.html")).unwrap();
    let flags = requested.iter().position(|u| u.ends_with("top_fame_112.html")).unwrap();
    assert!(tax < crews && crews < flags);
}
