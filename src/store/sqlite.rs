// src/store/sqlite.rs
//! SQLite backend.
//!
//! Each `apply_*` runs in one transaction: resolve foreign refs by
//! find-or-create, upsert the entity, load the state `reconcile` needs,
//! then execute the plan. Snapshot inserts use `ON CONFLICT DO NOTHING`
//! against the unique indexes in `schema`, so replays are no-ops.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use super::model::{BattleRecord, HistoryInterval, MarketOrder, RowCounts, ScrapeJob};
use super::{Result, Store, schema};
use crate::config::consts::MARKET_BATCH;
use crate::data::{CommodityCategory, CrewRank, JobKind, JobStatus, Ocean};
use crate::error::{StoreError, UnknownVariant};
use crate::reconcile::{self, BattleCounts, CrewObservation, FlagObservation, Governance, Interval};
use crate::specs::crews::BattleTotals;
use crate::specs::islands::IslandInfo;
use crate::specs::tax_rates::TaxRate;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database at `url` and create the schema.
    ///
    /// The pool holds a single connection: SQLite serializes writers anyway, and
    /// an in-memory database only lives as long as its one connection.
    pub async fn connect(url: &str) -> Result<Self> {
        let mut opts = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(10));
        let memory = url.contains(":memory:") || url.contains("mode=memory");
        if !memory {
            opts = opts.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await?;

        let store = Self::new(pool);
        store.init().await?;
        Ok(store)
    }

    /// Create tables and indexes that don't exist yet.
    pub async fn init(&self) -> Result<()> {
        for stmt in schema::STATEMENTS {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/* ---------------- conversions ---------------- */

fn ms(t: DateTime<Utc>) -> i64 {
    t.timestamp_millis()
}

fn from_ms(v: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(v)
        .ok_or_else(|| StoreError::Corrupt(UnknownVariant { kind: "timestamp", value: v.to_string() }))
}

fn opt_ms(v: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    v.map(from_ms).transpose()
}

fn key(v: u64) -> Result<i64> {
    i64::try_from(v).map_err(|_| StoreError::Rejected(format!("external id {v} out of range")))
}

fn game_id(v: i64) -> u64 {
    u64::try_from(v).unwrap_or_default()
}

/* ---------------- find-or-create helpers ---------------- */

/// Stub-create a flag seen only as a reference; existing rows are left alone.
async fn ensure_flag(conn: &mut SqliteConnection, ocean: Ocean, id: u64, name: &str, at: DateTime<Utc>) -> Result<i64> {
    sqlx::query(
        "INSERT INTO flags (ocean, game_id, name, active, first_seen_at, last_seen_at)
         VALUES (?, ?, ?, 1, ?, ?)
         ON CONFLICT (ocean, game_id) DO NOTHING",
    )
    .bind(ocean.as_str())
    .bind(key(id)?)
    .bind(name)
    .bind(ms(at))
    .bind(ms(at))
    .execute(&mut *conn)
    .await?;

    let row_id = sqlx::query_scalar("SELECT id FROM flags WHERE ocean = ? AND game_id = ?")
        .bind(ocean.as_str())
        .bind(key(id)?)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row_id)
}

async fn archipelago_id(conn: &mut SqliteConnection, ocean: Ocean, name: &str) -> Result<i64> {
    sqlx::query("INSERT INTO archipelagos (ocean, name) VALUES (?, ?) ON CONFLICT (ocean, name) DO NOTHING")
        .bind(ocean.as_str())
        .bind(name)
        .execute(&mut *conn)
        .await?;
    let row_id = sqlx::query_scalar("SELECT id FROM archipelagos WHERE ocean = ? AND name = ?")
        .bind(ocean.as_str())
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row_id)
}

async fn commodity_id(conn: &mut SqliteConnection, name: &str) -> Result<i64> {
    sqlx::query("INSERT INTO commodities (name, category) VALUES (?, ?) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .bind(CommodityCategory::default().as_str())
        .execute(&mut *conn)
        .await?;
    let row_id = sqlx::query_scalar("SELECT id FROM commodities WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row_id)
}

async fn previous_battle(conn: &mut SqliteConnection, crew_row: i64, at: DateTime<Utc>) -> Result<Option<BattleCounts>> {
    let prev: Option<(i64, i64)> = sqlx::query_as(
        "SELECT total_wins, total_losses FROM crew_battle_records
         WHERE crew_id = ? AND scraped_at < ?
         ORDER BY scraped_at DESC LIMIT 1",
    )
    .bind(crew_row)
    .bind(ms(at))
    .fetch_optional(&mut *conn)
    .await?;
    Ok(prev.map(|(wins, losses)| BattleCounts { wins, losses }))
}

async fn insert_battle(conn: &mut SqliteConnection, crew_row: i64, plan: &reconcile::BattlePlan, at: DateTime<Utc>) -> Result<()> {
    sqlx::query(
        "INSERT INTO crew_battle_records
            (crew_id, scraped_at, crew_rank, total_wins, total_losses, daily_wins, daily_losses)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT (crew_id, scraped_at) DO NOTHING",
    )
    .bind(crew_row)
    .bind(ms(at))
    .bind(plan.rank.map(CrewRank::as_str))
    .bind(plan.total.wins)
    .bind(plan.total.losses)
    .bind(plan.daily.wins)
    .bind(plan.daily.losses)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

type JobRow = (i64, String, String, String, i64, Option<i64>, u32, u32, Option<String>);

fn job_from_row(row: JobRow) -> Result<ScrapeJob> {
    let (id, ocean, kind, status, started_at, ended_at, items_processed, items_failed, error) = row;
    Ok(ScrapeJob {
        id,
        ocean: ocean.parse()?,
        kind: kind.parse()?,
        status: status.parse()?,
        started_at: from_ms(started_at)?,
        ended_at: opt_ms(ended_at)?,
        items_processed,
        items_failed,
        error,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn apply_island(&self, ocean: Ocean, info: &IslandInfo, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let archipelago = match &info.archipelago {
            Some(name) => Some(archipelago_id(&mut tx, ocean, name).await?),
            None => None,
        };
        let governor_flag = match &info.governor_flag {
            Some(f) => Some(ensure_flag(&mut tx, ocean, f.game_id, &f.name, at).await?),
            None => None,
        };

        let island_row: i64 = sqlx::query_scalar(
            "INSERT INTO islands
                (ocean, game_id, name, size, colonized, population, archipelago_id,
                 governor_flag_id, governor_name, first_seen_at, last_seen_at)
             VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (ocean, game_id) DO UPDATE SET
                name = excluded.name,
                size = excluded.size,
                colonized = 1,
                population = CASE WHEN excluded.population > 0 THEN excluded.population ELSE population END,
                archipelago_id = COALESCE(excluded.archipelago_id, archipelago_id),
                governor_flag_id = excluded.governor_flag_id,
                governor_name = excluded.governor_name,
                last_seen_at = excluded.last_seen_at
             RETURNING id",
        )
        .bind(ocean.as_str())
        .bind(key(info.game_id)?)
        .bind(&info.name)
        .bind(info.size.as_str())
        .bind(info.population)
        .bind(archipelago)
        .bind(governor_flag)
        .bind(info.governor_name.as_deref())
        .bind(ms(at))
        .bind(ms(at))
        .fetch_one(&mut *tx)
        .await?;

        let open: Option<(Option<i64>, Option<String>)> = sqlx::query_as(
            "SELECT f.game_id, h.governor_name
             FROM island_governance_history h LEFT JOIN flags f ON f.id = h.flag_id
             WHERE h.island_id = ? AND h.ended_at IS NULL",
        )
        .bind(island_row)
        .fetch_optional(&mut *tx)
        .await?;
        let open = open.map(|(flag, governor_name)| Governance { flag_game_id: flag.map(game_id), governor_name });

        let plan = reconcile::plan_island(info, open.as_ref());

        if let Some(population) = plan.population {
            sqlx::query(
                "INSERT INTO island_populations (island_id, scraped_at, population) VALUES (?, ?, ?)
                 ON CONFLICT (island_id, scraped_at) DO NOTHING",
            )
            .bind(island_row)
            .bind(ms(at))
            .bind(population)
            .execute(&mut *tx)
            .await?;
        }

        if let Interval::Start(next) = &plan.governance {
            sqlx::query("UPDATE island_governance_history SET ended_at = ? WHERE island_id = ? AND ended_at IS NULL")
                .bind(ms(at))
                .bind(island_row)
                .execute(&mut *tx)
                .await?;
            sqlx::query(
                "INSERT INTO island_governance_history (island_id, flag_id, governor_name, started_at)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(island_row)
            .bind(governor_flag)
            .bind(next.governor_name.as_deref())
            .bind(ms(at))
            .execute(&mut *tx)
            .await?;
        }

        for name in &info.exports {
            let commodity = commodity_id(&mut tx, name).await?;
            sqlx::query(
                "INSERT INTO island_commodities (island_id, commodity_id, confirmed) VALUES (?, ?, 1)
                 ON CONFLICT (island_id, commodity_id) DO NOTHING",
            )
            .bind(island_row)
            .bind(commodity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(%ocean, island = info.game_id, "island applied");
        Ok(())
    }

    async fn apply_tax_rate(&self, ocean: Ocean, rate: &TaxRate, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let commodity = commodity_id(&mut tx, &rate.commodity).await?;
        sqlx::query(
            "INSERT INTO commodity_tax_rates (commodity_id, ocean, scraped_at, tax_rate) VALUES (?, ?, ?, ?)
             ON CONFLICT (commodity_id, ocean, scraped_at) DO NOTHING",
        )
        .bind(commodity)
        .bind(ocean.as_str())
        .bind(ms(at))
        .bind(rate.rate)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_crew(&self, ocean: Ocean, obs: &CrewObservation, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let flag_row = match &obs.info.flag {
            Some(f) => Some(ensure_flag(&mut tx, ocean, f.game_id, &f.name, at).await?),
            None => None,
        };

        let crew_row: i64 = sqlx::query_scalar(
            "INSERT INTO crews (ocean, game_id, name, active, flag_id, first_seen_at, last_seen_at)
             VALUES (?, ?, ?, 1, ?, ?, ?)
             ON CONFLICT (ocean, game_id) DO UPDATE SET
                name = excluded.name,
                active = 1,
                flag_id = excluded.flag_id,
                last_seen_at = excluded.last_seen_at
             RETURNING id",
        )
        .bind(ocean.as_str())
        .bind(key(obs.entry.game_id)?)
        .bind(obs.name())
        .bind(flag_row)
        .bind(ms(at))
        .bind(ms(at))
        .fetch_one(&mut *tx)
        .await?;

        let open: Option<(Option<i64>,)> = sqlx::query_as(
            "SELECT f.game_id
             FROM crew_flag_history h LEFT JOIN flags f ON f.id = h.flag_id
             WHERE h.crew_id = ? AND h.left_at IS NULL",
        )
        .bind(crew_row)
        .fetch_optional(&mut *tx)
        .await?;
        let open = open.map(|(flag,)| flag.map(game_id));
        let previous = previous_battle(&mut tx, crew_row, at).await?;

        let plan = reconcile::plan_crew(obs, open, previous);

        if let Interval::Start(_) = plan.flag_history {
            sqlx::query("UPDATE crew_flag_history SET left_at = ? WHERE crew_id = ? AND left_at IS NULL")
                .bind(ms(at))
                .bind(crew_row)
                .execute(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO crew_flag_history (crew_id, flag_id, joined_at) VALUES (?, ?, ?)")
                .bind(crew_row)
                .bind(flag_row)
                .bind(ms(at))
                .execute(&mut *tx)
                .await?;
        }

        let (fame, rank) = plan.fame;
        sqlx::query(
            "INSERT INTO crew_fame_records (crew_id, scraped_at, fame_level, rank) VALUES (?, ?, ?, ?)
             ON CONFLICT (crew_id, scraped_at) DO NOTHING",
        )
        .bind(crew_row)
        .bind(ms(at))
        .bind(fame.as_str())
        .bind(rank)
        .execute(&mut *tx)
        .await?;

        if let Some(battle) = &plan.battle {
            insert_battle(&mut tx, crew_row, battle, at).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn apply_battle(&self, ocean: Ocean, crew_id: u64, totals: &BattleTotals, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let crew_row: i64 = sqlx::query_scalar("SELECT id FROM crews WHERE ocean = ? AND game_id = ?")
            .bind(ocean.as_str())
            .bind(key(crew_id)?)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| StoreError::NotFound { what: "crew", key: format!("{ocean}/{crew_id}") })?;

        let previous = previous_battle(&mut tx, crew_row, at).await?;
        let plan = reconcile::plan_battle(totals, previous);
        insert_battle(&mut tx, crew_row, &plan, at).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_flag(&self, ocean: Ocean, obs: &FlagObservation, at: DateTime<Utc>) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let flag_row: i64 = sqlx::query_scalar(
            "INSERT INTO flags (ocean, game_id, name, active, first_seen_at, last_seen_at)
             VALUES (?, ?, ?, 1, ?, ?)
             ON CONFLICT (ocean, game_id) DO UPDATE SET
                name = excluded.name,
                active = 1,
                last_seen_at = excluded.last_seen_at
             RETURNING id",
        )
        .bind(ocean.as_str())
        .bind(key(obs.entry.game_id)?)
        .bind(obs.name())
        .bind(ms(at))
        .bind(ms(at))
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO flag_fame_records (flag_id, scraped_at, fame_level, rank) VALUES (?, ?, ?, ?)
             ON CONFLICT (flag_id, scraped_at) DO NOTHING",
        )
        .bind(flag_row)
        .bind(ms(at))
        .bind(obs.entry.fame.as_str())
        .bind(obs.entry.rank)
        .execute(&mut *tx)
        .await?;

        for (kind, level) in &obs.info.reputations {
            sqlx::query(
                "INSERT INTO flag_reputation_records (flag_id, scraped_at, reputation_type, fame_level)
                 VALUES (?, ?, ?, ?)
                 ON CONFLICT (flag_id, scraped_at, reputation_type) DO NOTHING",
            )
            .bind(flag_row)
            .bind(ms(at))
            .bind(kind.as_str())
            .bind(level.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn create_job(&self, ocean: Ocean, kind: JobKind, started_at: DateTime<Utc>) -> Result<ScrapeJob> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO scrape_jobs (ocean, job_type, status, started_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(ocean.as_str())
        .bind(kind.as_str())
        .bind(JobStatus::Running.as_str())
        .bind(ms(started_at))
        .fetch_one(&self.pool)
        .await?;

        Ok(ScrapeJob {
            id,
            ocean,
            kind,
            status: JobStatus::Running,
            started_at,
            ended_at: None,
            items_processed: 0,
            items_failed: 0,
            error: None,
        })
    }

    async fn save_job(&self, job: &ScrapeJob) -> Result<()> {
        let done = sqlx::query(
            "UPDATE scrape_jobs SET status = ?, ended_at = ?, items_processed = ?, items_failed = ?, error_message = ?
             WHERE id = ?",
        )
        .bind(job.status.as_str())
        .bind(job.ended_at.map(ms))
        .bind(job.items_processed)
        .bind(job.items_failed)
        .bind(job.error.as_deref())
        .bind(job.id)
        .execute(&self.pool)
        .await?;

        if done.rows_affected() == 0 {
            return Err(StoreError::NotFound { what: "job", key: job.id.to_string() });
        }
        Ok(())
    }

    async fn job(&self, id: i64) -> Result<Option<ScrapeJob>> {
        let row: Option<JobRow> = sqlx::query_as(
            "SELECT id, ocean, job_type, status, started_at, ended_at, items_processed, items_failed, error_message
             FROM scrape_jobs WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(job_from_row).transpose()
    }

    async fn replace_market_orders(&self, orders: &[MarketOrder]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM market_orders").execute(&mut *tx).await?;

        for batch in orders.chunks(MARKET_BATCH) {
            let mut insert: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO market_orders
                    (ocean, island_name, commodity_name, shop_name, buy_price, buy_quantity,
                     sell_price, sell_quantity, imported_at) ",
            );
            insert.push_values(batch, |mut row, o| {
                row.push_bind(o.ocean.as_str())
                    .push_bind(o.island.clone())
                    .push_bind(o.commodity.clone())
                    .push_bind(o.shop.clone())
                    .push_bind(o.buy_price)
                    .push_bind(o.buy_qty)
                    .push_bind(o.sell_price)
                    .push_bind(o.sell_qty)
                    .push_bind(ms(o.imported_at));
            });
            insert.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(orders.len())
    }

    async fn market_orders(&self) -> Result<Vec<MarketOrder>> {
        let rows: Vec<(String, String, String, String, i64, i64, i64, i64, i64)> = sqlx::query_as(
            "SELECT ocean, island_name, commodity_name, shop_name, buy_price, buy_quantity,
                    sell_price, sell_quantity, imported_at
             FROM market_orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(ocean, island, commodity, shop, buy_price, buy_qty, sell_price, sell_qty, imported_at)| -> Result<MarketOrder> {
                Ok(MarketOrder {
                    ocean: ocean.parse()?,
                    island,
                    commodity,
                    shop,
                    buy_price,
                    buy_qty,
                    sell_price,
                    sell_qty,
                    imported_at: from_ms(imported_at)?,
                })
            })
            .collect()
    }

    async fn active_crews(&self, ocean: Ocean) -> Result<Vec<u64>> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT game_id FROM crews WHERE ocean = ? AND active = 1 ORDER BY game_id")
            .bind(ocean.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().map(game_id).collect())
    }

    async fn battle_records(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<BattleRecord>> {
        let rows: Vec<(i64, Option<String>, i64, i64, i64, i64)> = sqlx::query_as(
            "SELECT b.scraped_at, b.crew_rank, b.total_wins, b.total_losses, b.daily_wins, b.daily_losses
             FROM crew_battle_records b JOIN crews c ON c.id = b.crew_id
             WHERE c.ocean = ? AND c.game_id = ?
             ORDER BY b.scraped_at",
        )
        .bind(ocean.as_str())
        .bind(key(crew_id)?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(at, rank, total_wins, total_losses, daily_wins, daily_losses)| -> Result<BattleRecord> {
                Ok(BattleRecord {
                    scraped_at: from_ms(at)?,
                    rank: rank.as_deref().map(str::parse).transpose()?,
                    total: BattleCounts { wins: total_wins, losses: total_losses },
                    daily: BattleCounts { wins: daily_wins, losses: daily_losses },
                })
            })
            .collect()
    }

    async fn crew_flag_history(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<HistoryInterval<Option<u64>>>> {
        let rows: Vec<(Option<i64>, i64, Option<i64>)> = sqlx::query_as(
            "SELECT f.game_id, h.joined_at, h.left_at
             FROM crew_flag_history h
             JOIN crews c ON c.id = h.crew_id
             LEFT JOIN flags f ON f.id = h.flag_id
             WHERE c.ocean = ? AND c.game_id = ?
             ORDER BY h.joined_at, h.id",
        )
        .bind(ocean.as_str())
        .bind(key(crew_id)?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(flag, joined, left)| -> Result<HistoryInterval<Option<u64>>> {
                Ok(HistoryInterval { value: flag.map(game_id), started_at: from_ms(joined)?, ended_at: opt_ms(left)? })
            })
            .collect()
    }

    async fn governance_history(&self, ocean: Ocean, island_id: u64) -> Result<Vec<HistoryInterval<Governance>>> {
        let rows: Vec<(Option<i64>, Option<String>, i64, Option<i64>)> = sqlx::query_as(
            "SELECT f.game_id, h.governor_name, h.started_at, h.ended_at
             FROM island_governance_history h
             JOIN islands i ON i.id = h.island_id
             LEFT JOIN flags f ON f.id = h.flag_id
             WHERE i.ocean = ? AND i.game_id = ?
             ORDER BY h.started_at, h.id",
        )
        .bind(ocean.as_str())
        .bind(key(island_id)?)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(flag, governor_name, started, ended)| -> Result<HistoryInterval<Governance>> {
                Ok(HistoryInterval {
                    value: Governance { flag_game_id: flag.map(game_id), governor_name },
                    started_at: from_ms(started)?,
                    ended_at: opt_ms(ended)?,
                })
            })
            .collect()
    }

    async fn row_counts(&self) -> Result<RowCounts> {
        let mut n = [0u64; 14];
        for (slot, table) in n.iter_mut().zip(schema::COUNTED) {
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&self.pool)
                .await?;
            *slot = u64::try_from(count).unwrap_or_default();
        }
        let [
            islands,
            archipelagos,
            commodities,
            island_commodities,
            populations,
            governance,
            tax_rates,
            crews,
            crew_fame,
            crew_battles,
            crew_flags,
            flags,
            flag_fame,
            flag_reputations,
        ] = n;
        Ok(RowCounts {
            islands,
            archipelagos,
            commodities,
            island_commodities,
            populations,
            governance,
            tax_rates,
            crews,
            crew_fame,
            crew_battles,
            crew_flags,
            flags,
            flag_fame,
            flag_reputations,
        })
    }
}
