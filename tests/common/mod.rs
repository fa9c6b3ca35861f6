// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use yoweb_scrape::config::Config;
use yoweb_scrape::core::Fetch;
use yoweb_scrape::data::Ocean;
use yoweb_scrape::error::FetchError;
use yoweb_scrape::scrape::Urls;

/// Canned pages by URL; anything else is a 404.
#[derive(Default)]
pub struct Pages {
    pages: Mutex<HashMap<String, String>>,
    requested: Mutex<Vec<String>>,
}

impl Pages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), body.into());
    }

    pub fn remove(&self, url: &str) {
        self.pages.lock().unwrap().remove(url);
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for Pages {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::new(url, "HTTP 404 Not Found"))
    }
}

pub fn config() -> Config {
    Config {
        oceans: vec!["emerald".into()],
        island_id_first: 1,
        island_id_last: 3,
        market_poll_minutes: 0,
        ..Config::default()
    }
}

pub fn urls() -> Urls {
    Urls::new(&Config::default().host)
}

pub const OCEAN: Ocean = Ocean::Emerald;

/* ---------------- page builders ---------------- */

pub fn fame_page(kind: &str, rows: &[(u64, &str, &str)]) -> String {
    let key = if kind == "flag" { "flagid" } else { "crewid" };
    let mut html = String::from("<html><body><table><tr><th>Rank</th><th>Name</th><th>Fame</th></tr>");
    for (i, (id, name, fame)) in rows.iter().enumerate() {
        html.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"/yoweb/{kind}/info.wm?{key}={id}\">{name}</a></td><td>{fame}</td></tr>",
            i + 1
        ));
    }
    html.push_str("</table></body></html>");
    html
}

pub fn crew_page(name: &str, flag: Option<(u64, &str)>) -> String {
    let flag_link = flag
        .map(|(id, n)| format!("<a href=\"/yoweb/flag/info.wm?flagid={id}\">{n}</a>"))
        .unwrap_or_default();
    format!(
        "<html><body><table><tr><td width=\"246\"><font><b>{name}</b></font>{flag_link}</td></tr></table>\
         <a href=\"/yoweb/crew/battleinfo.wm?crewid=1&classic=false\">Blaggards</a></body></html>"
    )
}

pub fn battle_page(wins: u32, losses: u32) -> String {
    format!(
        "<html><body><table><tr><th>Date</th></tr>\
         <tr><td>2025-01-01</td><td>1</td><td>1</td><td>0</td><td>{wins}</td><td>{losses}</td><td>1:00</td></tr>\
         </table></body></html>"
    )
}

pub fn flag_page(name: &str) -> String {
    format!(
        "<html><body><font><b>{name}</b></font><table>\
         <tr><td>Conqueror:</td><td>Noted</td></tr><tr><td>Magnate:</td><td>Renowned</td></tr>\
         </table></body></html>"
    )
}

pub fn island_page(name: &str, population: u32, governor: Option<(&str, u64, &str)>) -> String {
    let governor = governor
        .map(|(who, flag_id, flag)| {
            format!(
                "Governor: <a href=\"/yoweb/pirate.wm?target={who}\">{who}</a><br>\
                 Ruled by <a href=\"/yoweb/flag/info.wm?flagid={flag_id}\">{flag}</a><br>"
            )
        })
        .unwrap_or_default();
    format!(
        "<html><body><center><font size=\"+1\">{name}</font><br>Population: {population}<br>\
         Located in the Diamond archipelago.<br>{governor}Exports: Wood, Iron<br></center></body></html>"
    )
}

pub const UNCOLONIZED: &str = "<html><body>Shiver me timbers: The island is uncolonized.</body></html>";

pub fn tax_page(rows: &[(&str, u32)]) -> String {
    let mut html = String::from("<html><body><table><tr><td><table><tr><th>Commodity</th><th>Tax</th></tr>");
    for (name, rate) in rows {
        html.push_str(&format!("<tr><td>{name}</td><td>{rate}</td></tr>"));
    }
    html.push_str("</table></td></tr></table></body></html>");
    html
}

pub const MARKET_CSV: &str = "Island,Commodity,Shop,Buy,BuyQty,Sell,SellQty\n\
    \"Maia-Insel\",\"Sugar cane\",\"Ferklstall\",\"4\",\"100\",\"0\",\"0\"\n\
    \"Chachapoya-Insel\",\"Iron\",\"Deinsklave's Schmiede-Laden\",\"12\",\"0\",\"40\",\"450\"\n\
    \"Maia-Insel\",\"Emeralds\",\"Ferklnachschub\",\"abc\",\"0\",\"470\",\"4\"\n\
    \"Maia-Insel\",\"Emeralds\",\"Ferklnachschub\",\"0\",\"0\",\"470\",\"4\"\n";
