// src/specs/crews.rs
//! Parsing *spec* for crew pages.
//!
//! - `crew/info.wm?crewid=N`: crew name in the `<font><b>` heading, flag link
//!   (`flag/info.wm?flagid=`) when affiliated, and a `battleinfo.wm` link whose
//!   text is the crew's current rank ("Sea Lords").
//! - `crew/battleinfo.wm?crewid=N`: one row per period; cells 4 and 5 are PvP
//!   wins and losses. Totals are the sums over all data rows.

use crate::core::html::{anchors, blocks_ci, is_header_row, leaf_tables, normalize_markup, row_cells, strip_tags, to_lower};
use crate::core::sanitize::leading_count;
use crate::data::CrewRank;
use crate::error::ParseError;

use super::{FlagRef, first_flag_link, heading_name};

const WINS_CELL: usize = 4;
const LOSSES_CELL: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewInfo {
    pub game_id: u64,
    pub name: String,
    /// `None` means the crew is independent.
    pub flag: Option<FlagRef>,
    pub rank: Option<CrewRank>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BattleTotals {
    pub wins: u32,
    pub losses: u32,
    pub rank: Option<CrewRank>,
}

pub fn parse_info(html: &str, game_id: u64) -> Result<CrewInfo, ParseError> {
    let page = normalize_markup(html);
    let name = heading_name(&page).ok_or(ParseError::Missing { page: "crew", field: "name" })?;
    let rank = anchors(&page)
        .into_iter()
        .filter(|a| to_lower(&a.href).contains("battleinfo.wm"))
        .find_map(|a| CrewRank::find_in(&a.text));

    Ok(CrewInfo { game_id, name, flag: first_flag_link(&page), rank })
}

pub fn parse_battle(html: &str) -> BattleTotals {
    let page = normalize_markup(html);
    let mut totals = BattleTotals::default();
    for table in leaf_tables(&page) {
        for row in blocks_ci(table, "tr") {
            if is_header_row(row) {
                continue;
            }
            let cells = row_cells(row);
            if cells.len() <= LOSSES_CELL {
                continue;
            }
            totals.wins += leading_count(&cells[WINS_CELL]).unwrap_or(0);
            totals.losses += leading_count(&cells[LOSSES_CELL]).unwrap_or(0);
        }
    }
    totals.rank = CrewRank::find_in(&strip_tags(&page));
    totals
}
