// src/reconcile.rs
//
// Pure merge decisions. Given one parsed observation and the slice of stored
// state it touches, decide which writes to make. Storage backends call these
// inside their per-entity transaction and then execute the returned plan.
//
// Invariants the plans uphold:
// - Replaying an identical observation at an identical timestamp plans nothing
//   new: snapshot writes are keyed by (entity, scraped_at) and interval plans
//   come back `Unchanged`.
// - An interval change closes the open interval and opens the next one at the
//   same timestamp, so history never has gaps or overlaps.
// - Daily battle counts are measured against the snapshot immediately before
//   this one; with no earlier snapshot every cumulative count is new.

use chrono::{DateTime, SubsecRound, Utc};

use crate::data::{CrewRank, FameLevel};
use crate::specs::crews::{BattleTotals, CrewInfo};
use crate::specs::fame::FameEntry;
use crate::specs::flags::FlagInfo;
use crate::specs::islands::IslandInfo;

/// Timestamp for one stage of a job, truncated to what storage keeps.
pub fn scrape_time() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/* ---------------- Intervals ---------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interval<T> {
    Unchanged,
    /// Close whatever interval is open at the scrape time, then open `T` at the same time.
    Start(T),
}

/// `open` is the value of the currently open interval (`None`: no interval open).
pub fn plan_interval<T: PartialEq + Clone>(open: Option<&T>, observed: &T) -> Interval<T> {
    match open {
        Some(current) if current == observed => Interval::Unchanged,
        _ => Interval::Start(observed.clone()),
    }
}

/* ---------------- Islands ---------------- */

/// Who governs an island: the ruling flag (by game id) and the governor's name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Governance {
    pub flag_game_id: Option<u64>,
    pub governor_name: Option<String>,
}

impl Governance {
    pub fn observed(info: &IslandInfo) -> Self {
        Self {
            flag_game_id: info.governor_flag.as_ref().map(|f| f.game_id),
            governor_name: info.governor_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IslandPlan {
    /// Population snapshot; skipped when the page showed none.
    pub population: Option<u32>,
    pub governance: Interval<Governance>,
}

pub fn plan_island(info: &IslandInfo, open_governance: Option<&Governance>) -> IslandPlan {
    IslandPlan {
        population: (info.population > 0).then_some(info.population),
        governance: plan_interval(open_governance, &Governance::observed(info)),
    }
}

/* ---------------- Battle records ---------------- */

/// Cumulative PvP counts of one stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BattleCounts {
    pub wins: i64,
    pub losses: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattlePlan {
    pub rank: Option<CrewRank>,
    pub total: BattleCounts,
    pub daily: BattleCounts,
}

/// `previous` must be the latest snapshot strictly before this scrape.
pub fn plan_battle(totals: &BattleTotals, previous: Option<BattleCounts>) -> BattlePlan {
    let total = BattleCounts { wins: i64::from(totals.wins), losses: i64::from(totals.losses) };
    let daily = match previous {
        Some(prev) => BattleCounts { wins: total.wins - prev.wins, losses: total.losses - prev.losses },
        None => total,
    };
    BattlePlan { rank: totals.rank, total, daily }
}

/* ---------------- Crews ---------------- */

/// Everything the crews stage learned about one crew.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewObservation {
    pub entry: FameEntry,
    pub info: CrewInfo,
    /// `None` when the battle page couldn't be fetched; the crew is still recorded.
    pub battle: Option<BattleTotals>,
}

impl CrewObservation {
    pub fn name(&self) -> &str {
        if self.info.name.is_empty() { &self.entry.name } else { &self.info.name }
    }

    pub fn flag_game_id(&self) -> Option<u64> {
        self.info.flag.as_ref().map(|f| f.game_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewPlan {
    pub flag_history: Interval<Option<u64>>,
    pub fame: (FameLevel, Option<u32>),
    pub battle: Option<BattlePlan>,
}

/// `open_flag`: `None` when no membership interval is open, `Some(None)` when
/// the open interval records the crew as independent.
pub fn plan_crew(
    obs: &CrewObservation,
    open_flag: Option<Option<u64>>,
    previous_battle: Option<BattleCounts>,
) -> CrewPlan {
    CrewPlan {
        flag_history: plan_interval(open_flag.as_ref(), &obs.flag_game_id()),
        fame: (obs.entry.fame, obs.entry.rank),
        battle: obs.battle.as_ref().map(|b| plan_battle(b, previous_battle)),
    }
}

/* ---------------- Flags ---------------- */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagObservation {
    pub entry: FameEntry,
    pub info: FlagInfo,
}

impl FlagObservation {
    pub fn name(&self) -> &str {
        if self.info.name.is_empty() { &self.entry.name } else { &self.info.name }
    }
}
