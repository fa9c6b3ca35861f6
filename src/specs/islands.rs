// src/specs/islands.rs
//! Parsing *spec* for Islands.
//!
//! Two pages:
//! - `island/info.wm?islandid=N`: one island. Name in `<font size="+1">`, then
//!   free-text lines (`Population: 57`, `Located in the Diamond archipelago.`,
//!   `Governor: <a pirate.wm>`), a `Ruled by <a flag/info.wm?flagid=…>` link and
//!   an `Exports: Wood, Iron, Stone` line. Uncolonized islands serve a fixed
//!   "Shiver me timbers" notice instead; that is a distinct result, not an error.
//! - `island/info.wm?showAll=true`: every colonized island, one nested
//!   `<center>` block each, used to discover island ids.

use crate::config::consts::UNCOLONIZED_MARKER;
use crate::core::html::{
    anchors, attr_value, blocks_ci, inner_after_open_tag, layout_lines, normalize_markup, query_param, strip_tags,
    to_lower,
};
use crate::core::sanitize::{leading_count, normalize_ws};
use crate::data::IslandSize;
use crate::error::ParseError;

use super::{FlagRef, first_flag_link};

const PAGE: &str = "island";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IslandInfo {
    pub game_id: u64,
    pub name: String,
    pub size: IslandSize,
    /// 0 when the page doesn't state it.
    pub population: u32,
    pub archipelago: Option<String>,
    pub governor_name: Option<String>,
    pub governor_flag: Option<FlagRef>,
    pub exports: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IslandPage {
    Uncolonized,
    Colonized(IslandInfo),
}

/// One block of the `showAll` list page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IslandSummary {
    pub game_id: Option<u64>,
    pub name: String,
    pub population: u32,
    pub archipelago: Option<String>,
}

pub fn is_uncolonized(html: &str) -> bool {
    html.contains(UNCOLONIZED_MARKER)
}

/// Parse an island detail page.
pub fn parse_info(html: &str, game_id: u64) -> Result<IslandPage, ParseError> {
    if is_uncolonized(html) {
        return Ok(IslandPage::Uncolonized);
    }

    let page = normalize_markup(html);
    let name = title_font(&page).ok_or(ParseError::Missing { page: PAGE, field: "name" })?;
    let lines = layout_lines(&page);
    let flat = lines.iter().filter(|l| !l.is_empty()).cloned().collect::<Vec<_>>().join(" ");

    Ok(IslandPage::Colonized(IslandInfo {
        game_id,
        name,
        size: size_from_text(&flat),
        population: population(&flat),
        archipelago: archipelago(&flat),
        governor_name: governor_name(&page),
        governor_flag: first_flag_link(&page),
        exports: exports(&lines),
    }))
}

/// Parse the `showAll` list page. Blocks without a name are skipped.
pub fn parse_list(html: &str) -> Vec<IslandSummary> {
    let page = normalize_markup(html);
    let mut out = Vec::new();
    for outer in blocks_ci(&page, "center") {
        let inner = inner_after_open_tag(outer);
        let mut candidates: Vec<&str> = blocks_ci(&inner, "center").collect();
        if candidates.is_empty() {
            candidates.push(outer);
        }
        for block in candidates {
            let Some(font) = blocks_ci(block, "font").next() else { continue };
            let name = strip_tags(inner_after_open_tag(font));
            if name.is_empty() {
                continue;
            }
            let text = strip_tags(block);
            out.push(IslandSummary {
                game_id: anchors(block).iter().find_map(|a| query_param(&a.href, "islandid")),
                name,
                population: population(&text),
                archipelago: archipelago(&text),
            });
        }
    }
    out
}

/* ---------------- helpers ---------------- */

/// `<font size="+1">Name</font>`, at any depth of `<font>` nesting.
fn title_font(html: &str) -> Option<String> {
    for block in blocks_ci(html, "font") {
        let opener_end = block.find('>').map(|e| e + 1).unwrap_or(block.len());
        let inner = inner_after_open_tag(block);
        if attr_value(&block[..opener_end], "size").is_some_and(|v| v.trim() == "+1") {
            let name = strip_tags(&inner);
            if !name.is_empty() {
                return Some(name);
            }
        }
        if let Some(name) = title_font(&inner) {
            return Some(name);
        }
    }
    None
}

/// Digits after "Population", separators allowed: `Population: 1,234` → 1234.
fn population(text: &str) -> u32 {
    let lc = to_lower(text);
    let Some(idx) = lc.find("population") else { return 0 };
    let rest = text[idx + "population".len()..].trim_start_matches(|c: char| c == ':' || c.is_whitespace());
    leading_count(rest).unwrap_or(0)
}

/// Text between "located in the" and "archipelago".
fn archipelago(text: &str) -> Option<String> {
    let lc = to_lower(text);
    let start = lc.find("located in the ")? + "located in the ".len();
    let end = lc[start..].find(" archipelago")? + start;
    let name = normalize_ws(&text[start..end]);
    (!name.is_empty()).then_some(name)
}

fn size_from_text(text: &str) -> IslandSize {
    let lc = to_lower(text);
    if lc.contains("large island") {
        IslandSize::Large
    } else if lc.contains("medium island") {
        IslandSize::Medium
    } else if lc.contains("outpost") {
        IslandSize::Outpost
    } else {
        IslandSize::Unknown
    }
}

/// First `pirate.wm` link after the "Governor:" label.
fn governor_name(html: &str) -> Option<String> {
    let from = to_lower(html).find("governor:")?;
    anchors(&html[from..])
        .into_iter()
        .find(|a| to_lower(&a.href).contains("pirate.wm") && !a.text.is_empty())
        .map(|a| a.text)
}

/// Comma-separated list after "Exports:". The list may wrap over `<br>`s; it
/// ends at a blank line, at the next `Label:` line, or at a "Colonized
/// islands" heading, whichever comes first.
fn exports(lines: &[String]) -> Vec<String> {
    let Some((start, idx)) = lines
        .iter()
        .enumerate()
        .find_map(|(n, l)| to_lower(l).find("exports:").map(|i| (n, i)))
    else {
        return Vec::new();
    };

    let mut section = lines[start][idx + "exports:".len()..].to_string();
    for line in &lines[start + 1..] {
        if line.is_empty() || line.contains(':') {
            break;
        }
        section.push(',');
        section.push_str(line);
    }
    if let Some(cut) = to_lower(&section).find("colonized islands") {
        section.truncate(cut);
    }
    section
        .split(',')
        .map(normalize_ws)
        .filter(|c| !c.is_empty())
        .collect()
}
