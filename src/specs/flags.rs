// src/specs/flags.rs
//! Parsing *spec* for the flag detail page (`flag/info.wm?flagid=N`).
//!
//! Name sits in the `<font><b>` heading. Reputations are label/value rows:
//! `<tr><td>Conqueror:</td><td><font>Distinguished</font></td></tr>`.

use crate::core::html::{blocks_ci, leaf_tables, normalize_markup, row_cells};
use crate::data::{FameLevel, ReputationType};
use crate::error::ParseError;

use super::heading_name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagInfo {
    pub game_id: u64,
    pub name: String,
    /// Only the tracks present on the page, in page order.
    pub reputations: Vec<(ReputationType, FameLevel)>,
}

impl FlagInfo {
    pub fn reputation(&self, kind: ReputationType) -> Option<FameLevel> {
        self.reputations.iter().find(|(k, _)| *k == kind).map(|(_, f)| *f)
    }
}

pub fn parse_info(html: &str, game_id: u64) -> Result<FlagInfo, ParseError> {
    let page = normalize_markup(html);
    let name = heading_name(&page).ok_or(ParseError::Missing { page: "flag", field: "name" })?;

    let mut reputations = Vec::new();
    for table in leaf_tables(&page) {
        for row in blocks_ci(table, "tr") {
            let cells = row_cells(row);
            let [label, value, ..] = cells.as_slice() else { continue };
            let Ok(kind) = label.trim_end_matches(':').parse::<ReputationType>() else { continue };
            if reputations.iter().any(|(k, _)| *k == kind) {
                continue;
            }
            if let Some(level) = FameLevel::find_in(value) {
                reputations.push((kind, level));
            }
        }
    }

    Ok(FlagInfo { game_id, name, reputations })
}
