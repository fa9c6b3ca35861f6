// src/specs/mod.rs
//! # Page “specs” module
//!
//! This module hosts the **page-specific parsing specifications** for the yoweb
//! pages of one ocean. Each spec focuses on a single page/endpoint and encodes
//! *where the ground truth lives in the markup* and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure parsing** of page bodies (`&str` in, typed records out). No I/O.
//! - **Tolerant extraction** using `core::html` helpers (case-insensitive,
//!   nesting-aware tag blocks, anchor/attribute scanning, visible-text lines).
//!   Bodies go through `normalize_markup` first, so omitted `</td>`/`</tr>`
//!   and unclosed `<font>` wrappers don't derail the block scanner.
//! - **Light shaping** into small record structs (`IslandInfo`, `FameEntry`, …)
//!   that the reconciler consumes.
//!
//! ## What does **not** live here
//! - **Fetching** (`core::net`) and **URL building** (`scrape::urls`).
//! - **Persistence or delta logic**: that is `reconcile` + `store`.
//! - **Job accounting**: parse failures are returned, the job runner counts them.
//!
//! ## Typical call chain
//! ```text
//! scrape::job → Fetch::fetch(url) → specs::<page>::parse*(body)
//!                                 ↘ record(s) → reconcile → store
//! ```
//!
//! ## Conventions & invariants
//! - Missing optional fields yield zero values / `None`; missing sections yield
//!   empty collections. Only a structurally required field (e.g. an island's
//!   name) raises `ParseError`.
//! - Rows without an external id or a display name are dropped silently.
//! - Keyword enums (fame, rank) are matched case-insensitively, highest first.
//!
//! ## Current specs
//! - `islands` – island detail page (and the `showAll` list page).
//! - `tax_rates` – commodity tax table.
//! - `fame` – crew and flag fame rankings.
//! - `crews` – crew detail and battle-info pages.
//! - `flags` – flag detail page with reputations.
//! - `market` – buy/sell CSV export.
//!
//! ## Testing notes
//! Every spec is tested **offline** against captured page shapes.
pub mod islands;
pub mod tax_rates;
pub mod fame;
pub mod crews;
pub mod flags;
pub mod market;

/// `(game id, display name)` of a flag linked from another page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagRef {
    pub game_id: u64,
    pub name: String,
}

/// First `flag/info.wm?flagid=` link of a fragment, if any.
pub(crate) fn first_flag_link(html: &str) -> Option<FlagRef> {
    crate::core::html::anchors(html).into_iter().find_map(|a| {
        let game_id = crate::core::html::query_param(&a.href, "flagid")?;
        (game_id > 0).then_some(FlagRef { game_id, name: a.text })
    })
}

/// Name from the page's structural heading: `<font><b>…</b></font>`, else
/// `<h1>`/`<h2>`/`<title>` that isn't the site banner.
pub(crate) fn heading_name(html: &str) -> Option<String> {
    use crate::core::html::{blocks_ci, inner_after_open_tag, strip_tags};

    for font in blocks_ci(html, "font") {
        if let Some(b) = blocks_ci(font, "b").next() {
            let text = strip_tags(inner_after_open_tag(b));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    for tag in ["h1", "h2", "title"] {
        for block in blocks_ci(html, tag) {
            let text = strip_tags(inner_after_open_tag(block));
            if !text.is_empty() && !text.to_ascii_lowercase().contains("puzzle pirates") {
                return Some(text);
            }
        }
    }
    None
}
