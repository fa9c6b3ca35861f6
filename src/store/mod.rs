// src/store/mod.rs
//! Durable state the pipeline writes into.
//!
//! The `Store` trait is the whole storage surface the core needs: one
//! transactional `apply_*` per parsed entity, job bookkeeping, the market
//! replace, and a handful of ordered reads used by `battle_info` and tests.
//! Every `apply_*` loads the state it needs, asks `reconcile` for a plan and
//! executes it inside a single transaction; a failure leaves nothing behind.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::data::{JobKind, Ocean};
use crate::error::StoreError;
use crate::reconcile::{CrewObservation, FlagObservation, Governance};
use crate::specs::crews::BattleTotals;
use crate::specs::islands::IslandInfo;
use crate::specs::tax_rates::TaxRate;

pub mod memory;
pub mod model;
mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use model::{BattleRecord, HistoryInterval, MarketOrder, RowCounts, ScrapeJob};
pub use sqlite::SqliteStore;

pub type Result<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    /* -------- reconcile -------- */

    async fn apply_island(&self, ocean: Ocean, info: &IslandInfo, at: DateTime<Utc>) -> Result<()>;

    async fn apply_tax_rate(&self, ocean: Ocean, rate: &TaxRate, at: DateTime<Utc>) -> Result<()>;

    async fn apply_crew(&self, ocean: Ocean, obs: &CrewObservation, at: DateTime<Utc>) -> Result<()>;

    /// Battle snapshot for a crew that is already stored.
    async fn apply_battle(&self, ocean: Ocean, crew_id: u64, totals: &BattleTotals, at: DateTime<Utc>) -> Result<()>;

    async fn apply_flag(&self, ocean: Ocean, obs: &FlagObservation, at: DateTime<Utc>) -> Result<()>;

    /* -------- jobs -------- */

    /// Insert a job row in `running` state.
    async fn create_job(&self, ocean: Ocean, kind: JobKind, started_at: DateTime<Utc>) -> Result<ScrapeJob>;

    /// Persist status, counters and error of an existing job row.
    async fn save_job(&self, job: &ScrapeJob) -> Result<()>;

    async fn job(&self, id: i64) -> Result<Option<ScrapeJob>>;

    /* -------- market -------- */

    /// Delete every market order and insert `orders`, atomically. Returns rows inserted.
    async fn replace_market_orders(&self, orders: &[MarketOrder]) -> Result<usize>;

    async fn market_orders(&self) -> Result<Vec<MarketOrder>>;

    /* -------- reads -------- */

    /// Game ids of active crews in the ocean, ascending.
    async fn active_crews(&self, ocean: Ocean) -> Result<Vec<u64>>;

    /// Battle snapshots of one crew, oldest first.
    async fn battle_records(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<BattleRecord>>;

    /// Flag membership intervals of one crew (`None`: independent), oldest first.
    async fn crew_flag_history(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<HistoryInterval<Option<u64>>>>;

    async fn governance_history(&self, ocean: Ocean, island_id: u64) -> Result<Vec<HistoryInterval<Governance>>>;

    async fn row_counts(&self) -> Result<RowCounts>;
}
