// src/store/memory.rs
//! In-process backend for tests and dry runs.
//!
//! Same semantics as the SQLite backend: every `apply_*` works on a copy of
//! the tables and swaps it in only when the whole entity succeeded.
//! `reject_crew` makes writes for one crew fail, to exercise per-item isolation.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{BattleRecord, HistoryInterval, MarketOrder, RowCounts, ScrapeJob};
use super::{Result, Store};
use crate::data::{CommodityCategory, FameLevel, IslandSize, JobKind, JobStatus, Ocean, ReputationType};
use crate::error::StoreError;
use crate::reconcile::{self, BattleCounts, CrewObservation, FlagObservation, Governance, Interval};
use crate::specs::crews::BattleTotals;
use crate::specs::islands::IslandInfo;
use crate::specs::tax_rates::TaxRate;

type Key = (Ocean, u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandRow {
    pub name: String,
    pub size: IslandSize,
    pub population: u32,
    pub archipelago: Option<String>,
    pub governor_flag: Option<u64>,
    pub governor_name: Option<String>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    pub name: String,
    pub active: bool,
    /// Current flag; always `None` for flags themselves.
    pub flag: Option<u64>,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl EntityRow {
    fn new(name: &str, flag: Option<u64>, at: DateTime<Utc>) -> Self {
        Self { name: s!(name), active: true, flag, first_seen_at: at, last_seen_at: at }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tables {
    pub islands: BTreeMap<Key, IslandRow>,
    pub archipelagos: BTreeSet<(Ocean, String)>,
    pub commodities: BTreeMap<String, CommodityCategory>,
    pub island_commodities: BTreeSet<(Key, String)>,
    pub populations: BTreeMap<(Key, DateTime<Utc>), u32>,
    pub governance: BTreeMap<Key, Vec<HistoryInterval<Governance>>>,
    pub tax_rates: BTreeMap<(String, Ocean, DateTime<Utc>), u32>,
    pub crews: BTreeMap<Key, EntityRow>,
    pub crew_fame: BTreeMap<(Key, DateTime<Utc>), (FameLevel, Option<u32>)>,
    pub crew_battles: BTreeMap<Key, BTreeMap<DateTime<Utc>, BattleRecord>>,
    pub crew_flags: BTreeMap<Key, Vec<HistoryInterval<Option<u64>>>>,
    pub flags: BTreeMap<Key, EntityRow>,
    pub flag_fame: BTreeMap<(Key, DateTime<Utc>), (FameLevel, Option<u32>)>,
    pub flag_reputations: BTreeMap<(Key, DateTime<Utc>, ReputationType), FameLevel>,
    pub jobs: BTreeMap<i64, ScrapeJob>,
    pub market: Vec<MarketOrder>,
}

impl Tables {
    fn ensure_flag(&mut self, ocean: Ocean, id: u64, name: &str, at: DateTime<Utc>) {
        self.flags.entry((ocean, id)).or_insert_with(|| EntityRow::new(name, None, at));
    }

    fn commodity(&mut self, name: &str) {
        self.commodities.entry(s!(name)).or_default();
    }

    fn previous_battle(&self, key: Key, at: DateTime<Utc>) -> Option<BattleCounts> {
        self.crew_battles
            .get(&key)
            .and_then(|m| m.range(..at).next_back())
            .map(|(_, r)| r.total)
    }

    fn insert_battle(&mut self, key: Key, plan: reconcile::BattlePlan, at: DateTime<Utc>) {
        self.crew_battles
            .entry(key)
            .or_default()
            .entry(at)
            .or_insert(BattleRecord { scraped_at: at, rank: plan.rank, total: plan.total, daily: plan.daily });
    }
}

/// Close the open interval (if any) at `at` and open `value` at `at`.
fn rotate<T>(history: &mut Vec<HistoryInterval<T>>, value: T, at: DateTime<Utc>) {
    for open in history.iter_mut().filter(|h| h.is_open()) {
        open.ended_at = Some(at);
    }
    history.push(HistoryInterval { value, started_at: at, ended_at: None });
}

fn open_value<T: Clone>(history: Option<&Vec<HistoryInterval<T>>>) -> Option<T> {
    history?.iter().find(|h| h.is_open()).map(|h| h.value.clone())
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    rejected_crews: Mutex<HashSet<u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later write touching crew `game_id` fails.
    pub fn reject_crew(&self, game_id: u64) {
        lock(&self.rejected_crews).insert(game_id);
    }

    /// Copy of the current tables.
    pub fn snapshot(&self) -> Tables {
        lock(&self.tables).clone()
    }

    fn check_crew(&self, game_id: u64) -> Result<()> {
        if lock(&self.rejected_crews).contains(&game_id) {
            return Err(StoreError::Rejected(format!("crew {game_id} rejected")));
        }
        Ok(())
    }

    /// Run `f` against a copy of the tables; keep the copy only on success.
    fn transact<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut guard = lock(&self.tables);
        let mut work = guard.clone();
        let out = f(&mut work)?;
        *guard = work;
        Ok(out)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&lock(&self.tables))
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn apply_island(&self, ocean: Ocean, info: &IslandInfo, at: DateTime<Utc>) -> Result<()> {
        let key = (ocean, info.game_id);
        self.transact(|t| {
            if let Some(name) = &info.archipelago {
                t.archipelagos.insert((ocean, name.clone()));
            }
            if let Some(f) = &info.governor_flag {
                t.ensure_flag(ocean, f.game_id, &f.name, at);
            }

            let row = t.islands.entry(key).or_insert_with(|| IslandRow {
                name: info.name.clone(),
                size: info.size,
                population: 0,
                archipelago: None,
                governor_flag: None,
                governor_name: None,
                first_seen_at: at,
                last_seen_at: at,
            });
            row.name = info.name.clone();
            row.size = info.size;
            if info.population > 0 {
                row.population = info.population;
            }
            if info.archipelago.is_some() {
                row.archipelago = info.archipelago.clone();
            }
            row.governor_flag = info.governor_flag.as_ref().map(|f| f.game_id);
            row.governor_name = info.governor_name.clone();
            row.last_seen_at = at;

            let plan = reconcile::plan_island(info, open_value(t.governance.get(&key)).as_ref());
            if let Some(population) = plan.population {
                t.populations.entry((key, at)).or_insert(population);
            }
            if let Interval::Start(next) = plan.governance {
                rotate(t.governance.entry(key).or_default(), next, at);
            }
            for name in &info.exports {
                t.commodity(name);
                t.island_commodities.insert((key, name.clone()));
            }
            Ok(())
        })
    }

    async fn apply_tax_rate(&self, ocean: Ocean, rate: &TaxRate, at: DateTime<Utc>) -> Result<()> {
        self.transact(|t| {
            t.commodity(&rate.commodity);
            t.tax_rates.entry((rate.commodity.clone(), ocean, at)).or_insert(rate.rate);
            Ok(())
        })
    }

    async fn apply_crew(&self, ocean: Ocean, obs: &CrewObservation, at: DateTime<Utc>) -> Result<()> {
        self.check_crew(obs.entry.game_id)?;
        let key = (ocean, obs.entry.game_id);
        self.transact(|t| {
            if let Some(f) = &obs.info.flag {
                t.ensure_flag(ocean, f.game_id, &f.name, at);
            }
            let row = t.crews.entry(key).or_insert_with(|| EntityRow::new(obs.name(), None, at));
            row.name = s!(obs.name());
            row.active = true;
            row.flag = obs.flag_game_id();
            row.last_seen_at = at;

            let plan = reconcile::plan_crew(obs, open_value(t.crew_flags.get(&key)), t.previous_battle(key, at));
            if let Interval::Start(next) = plan.flag_history {
                rotate(t.crew_flags.entry(key).or_default(), next, at);
            }
            t.crew_fame.entry((key, at)).or_insert(plan.fame);
            if let Some(battle) = plan.battle {
                t.insert_battle(key, battle, at);
            }
            Ok(())
        })
    }

    async fn apply_battle(&self, ocean: Ocean, crew_id: u64, totals: &BattleTotals, at: DateTime<Utc>) -> Result<()> {
        self.check_crew(crew_id)?;
        let key = (ocean, crew_id);
        self.transact(|t| {
            if !t.crews.contains_key(&key) {
                return Err(StoreError::NotFound { what: "crew", key: format!("{ocean}/{crew_id}") });
            }
            let plan = reconcile::plan_battle(totals, t.previous_battle(key, at));
            t.insert_battle(key, plan, at);
            Ok(())
        })
    }

    async fn apply_flag(&self, ocean: Ocean, obs: &FlagObservation, at: DateTime<Utc>) -> Result<()> {
        let key = (ocean, obs.entry.game_id);
        self.transact(|t| {
            let row = t.flags.entry(key).or_insert_with(|| EntityRow::new(obs.name(), None, at));
            row.name = s!(obs.name());
            row.active = true;
            row.last_seen_at = at;

            t.flag_fame.entry((key, at)).or_insert((obs.entry.fame, obs.entry.rank));
            for (kind, level) in &obs.info.reputations {
                t.flag_reputations.entry((key, at, *kind)).or_insert(*level);
            }
            Ok(())
        })
    }

    async fn create_job(&self, ocean: Ocean, kind: JobKind, started_at: DateTime<Utc>) -> Result<ScrapeJob> {
        self.transact(|t| {
            let id = t.jobs.keys().next_back().map_or(1, |last| last + 1);
            let job = ScrapeJob {
                id,
                ocean,
                kind,
                status: JobStatus::Running,
                started_at,
                ended_at: None,
                items_processed: 0,
                items_failed: 0,
                error: None,
            };
            t.jobs.insert(id, job.clone());
            Ok(job)
        })
    }

    async fn save_job(&self, job: &ScrapeJob) -> Result<()> {
        self.transact(|t| match t.jobs.get_mut(&job.id) {
            Some(stored) => {
                *stored = job.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { what: "job", key: job.id.to_string() }),
        })
    }

    async fn job(&self, id: i64) -> Result<Option<ScrapeJob>> {
        Ok(self.read(|t| t.jobs.get(&id).cloned()))
    }

    async fn replace_market_orders(&self, orders: &[MarketOrder]) -> Result<usize> {
        self.transact(|t| {
            t.market.clear();
            for order in orders {
                if !order.is_storable() {
                    return Err(StoreError::Rejected(format!("market order with empty name: {order:?}")));
                }
                t.market.push(order.clone());
            }
            Ok(orders.len())
        })
    }

    async fn market_orders(&self) -> Result<Vec<MarketOrder>> {
        Ok(self.read(|t| t.market.clone()))
    }

    async fn active_crews(&self, ocean: Ocean) -> Result<Vec<u64>> {
        Ok(self.read(|t| {
            t.crews
                .iter()
                .filter(|((o, _), row)| *o == ocean && row.active)
                .map(|((_, id), _)| *id)
                .collect()
        }))
    }

    async fn battle_records(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<BattleRecord>> {
        Ok(self.read(|t| {
            t.crew_battles.get(&(ocean, crew_id)).map(|m| m.values().copied().collect()).unwrap_or_default()
        }))
    }

    async fn crew_flag_history(&self, ocean: Ocean, crew_id: u64) -> Result<Vec<HistoryInterval<Option<u64>>>> {
        Ok(self.read(|t| t.crew_flags.get(&(ocean, crew_id)).cloned().unwrap_or_default()))
    }

    async fn governance_history(&self, ocean: Ocean, island_id: u64) -> Result<Vec<HistoryInterval<Governance>>> {
        Ok(self.read(|t| t.governance.get(&(ocean, island_id)).cloned().unwrap_or_default()))
    }

    async fn row_counts(&self) -> Result<RowCounts> {
        Ok(self.read(|t| RowCounts {
            islands: t.islands.len() as u64,
            archipelagos: t.archipelagos.len() as u64,
            commodities: t.commodities.len() as u64,
            island_commodities: t.island_commodities.len() as u64,
            populations: t.populations.len() as u64,
            governance: t.governance.values().map(Vec::len).sum::<usize>() as u64,
            tax_rates: t.tax_rates.len() as u64,
            crews: t.crews.len() as u64,
            crew_fame: t.crew_fame.len() as u64,
            crew_battles: t.crew_battles.values().map(BTreeMap::len).sum::<usize>() as u64,
            crew_flags: t.crew_flags.values().map(Vec::len).sum::<usize>() as u64,
            flags: t.flags.len() as u64,
            flag_fame: t.flag_fame.len() as u64,
            flag_reputations: t.flag_reputations.len() as u64,
        }))
    }
}
