// src/store/model.rs
use chrono::{DateTime, Duration, Utc};

use crate::data::{CrewRank, JobKind, JobStatus, Ocean};
use crate::reconcile::BattleCounts;
use crate::specs::market::MarketRow;

/// One invocation of a scrape task for one ocean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeJob {
    pub id: i64,
    pub ocean: Ocean,
    pub kind: JobKind,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub items_processed: u32,
    pub items_failed: u32,
    pub error: Option<String>,
}

impl ScrapeJob {
    pub fn is_running(&self) -> bool {
        self.status == JobStatus::Running
    }

    /// Wall time so far for a running job.
    pub fn duration(&self) -> Duration {
        self.ended_at.unwrap_or_else(Utc::now) - self.started_at
    }

    /// Percentage of attempted items that succeeded; 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        percent(i64::from(self.items_processed), i64::from(self.items_failed))
    }
}

/// A stored battle snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleRecord {
    pub scraped_at: DateTime<Utc>,
    pub rank: Option<CrewRank>,
    pub total: BattleCounts,
    pub daily: BattleCounts,
}

impl BattleRecord {
    pub fn total_battles(&self) -> i64 {
        self.total.wins + self.total.losses
    }

    pub fn win_rate(&self) -> f64 {
        percent(self.total.wins, self.total.losses)
    }

    pub fn daily_win_rate(&self) -> f64 {
        percent(self.daily.wins, self.daily.losses)
    }

    pub fn has_activity(&self) -> bool {
        self.daily.wins > 0 || self.daily.losses > 0
    }
}

fn percent(good: i64, bad: i64) -> f64 {
    let total = good + bad;
    if total == 0 { 0.0 } else { good as f64 / total as f64 * 100.0 }
}

/// One row of an interval history. `T` is the tracked value
/// (flag game id for crews, governance for islands).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryInterval<T> {
    pub value: T,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl<T> HistoryInterval<T> {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketOrder {
    pub ocean: Ocean,
    pub island: String,
    pub commodity: String,
    pub shop: String,
    pub buy_price: i64,
    pub buy_qty: i64,
    pub sell_price: i64,
    pub sell_qty: i64,
    pub imported_at: DateTime<Utc>,
}

impl MarketOrder {
    pub fn from_row(ocean: Ocean, row: MarketRow, imported_at: DateTime<Utc>) -> Self {
        Self {
            ocean,
            island: row.island,
            commodity: row.commodity,
            shop: row.shop,
            buy_price: row.buy_price,
            buy_qty: row.buy_qty,
            sell_price: row.sell_price,
            sell_qty: row.sell_qty,
            imported_at,
        }
    }

    /// The storage-level constraint both backends enforce.
    pub(crate) fn is_storable(&self) -> bool {
        !self.island.trim().is_empty() && !self.commodity.trim().is_empty() && !self.shop.trim().is_empty()
    }
}

/// Row totals per table, for checking that replays write nothing new.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub islands: u64,
    pub archipelagos: u64,
    pub commodities: u64,
    pub island_commodities: u64,
    pub populations: u64,
    pub governance: u64,
    pub tax_rates: u64,
    pub crews: u64,
    pub crew_fame: u64,
    pub crew_battles: u64,
    pub crew_flags: u64,
    pub flags: u64,
    pub flag_fame: u64,
    pub flag_reputations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn job(processed: u32, failed: u32) -> ScrapeJob {
        ScrapeJob {
            id: 1,
            ocean: Ocean::Emerald,
            kind: JobKind::CrewFame,
            status: JobStatus::Completed,
            started_at: Utc.with_ymd_and_hms(2025, 1, 1, 3, 30, 0).unwrap(),
            ended_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 3, 45, 0).unwrap()),
            items_processed: processed,
            items_failed: failed,
            error: None,
        }
    }

    #[test]
    fn job_helpers() {
        let j = job(3, 1);
        assert_eq!(j.success_rate(), 75.0);
        assert_eq!(j.duration(), Duration::minutes(15));
        assert!(!j.is_running());
        assert_eq!(job(0, 0).success_rate(), 0.0);
    }

    #[test]
    fn battle_helpers() {
        let r = BattleRecord {
            scraped_at: Utc::now(),
            rank: None,
            total: BattleCounts { wins: 30, losses: 10 },
            daily: BattleCounts { wins: 0, losses: 0 },
        };
        assert_eq!(r.total_battles(), 40);
        assert_eq!(r.win_rate(), 75.0);
        assert_eq!(r.daily_win_rate(), 0.0);
        assert!(!r.has_activity());
    }
}
