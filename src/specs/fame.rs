// src/specs/fame.rs
//! Parsing *spec* for the fame rankings (`ratings/top_fame_97.html` for crews,
//! `ratings/top_fame_112.html` for flags).
//!
//! Data rows carry three cells: rank, a link whose query holds the external id
//! (`crewid=` / `flagid=`), and the fame keyword. Header rows use `<th>`.

use crate::core::html::{
    anchors, blocks_ci, inner_after_open_tag, is_header_row, leaf_tables, normalize_markup, query_param, strip_tags,
};
use crate::data::FameLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FameEntry {
    pub game_id: u64,
    pub name: String,
    pub fame: FameLevel,
    pub rank: Option<u32>,
}

pub fn parse_crews(html: &str) -> Vec<FameEntry> {
    parse(html, "crewid")
}

pub fn parse_flags(html: &str) -> Vec<FameEntry> {
    parse(html, "flagid")
}

fn parse(html: &str, id_key: &str) -> Vec<FameEntry> {
    let page = normalize_markup(html);
    let mut out = Vec::new();
    for table in leaf_tables(&page) {
        for row in blocks_ci(table, "tr") {
            if is_header_row(row) {
                continue;
            }
            let cells: Vec<&str> = blocks_ci(row, "td").collect();
            if cells.len() < 3 {
                continue;
            }
            let Some((game_id, name)) = anchors(cells[1])
                .into_iter()
                .find_map(|a| query_param(&a.href, id_key).map(|id| (id, a.text)))
            else {
                continue;
            };
            if game_id == 0 || name.is_empty() {
                continue;
            }
            // Unknown keyword: keep the row at the bottom of the scale.
            let fame = FameLevel::find_in(&strip_tags(inner_after_open_tag(cells[2])))
                .unwrap_or(FameLevel::Obscure);
            let rank = strip_tags(inner_after_open_tag(cells[0])).parse().ok();
            out.push(FameEntry { game_id, name, fame, rank });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crew_list() {
        let html = r#"<html><body>
            <table>
                <tr><th>Rank</th><th>Crew</th><th>Fame</th></tr>
                <tr><td>1</td><td><a href="/yoweb/crew/info.wm?crewid=12345">Best Crew</a></td><td>Illustrious</td></tr>
                <tr><td>2</td><td><a href="/yoweb/crew/info.wm?crewid=67890">Second Crew</a></td><td>Renowned</td></tr>
                <tr><td>3</td><td><a href="/yoweb/crew/info.wm?crewid=11111">Third Crew</a></td><td>Obscure</td></tr>
            </table>
        </body></html>"#;
        let got = parse_crews(html);
        assert_eq!(got.len(), 3);
        assert_eq!(
            got[0],
            FameEntry { game_id: 12345, name: s!("Best Crew"), fame: FameLevel::Illustrious, rank: Some(1) }
        );
        assert_eq!(got[1].fame, FameLevel::Renowned);
        assert_eq!(got[2].game_id, 11111);
        assert_eq!(got[2].rank, Some(3));
    }

    #[test]
    fn every_fame_keyword() {
        let mut html = s!("<table><tr><th>Rank</th><th>Crew</th><th>Fame</th></tr>");
        for (i, level) in FameLevel::ALL.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>{n}</td><td><a href=\"/yoweb/crew/info.wm?crewid={n}\">C{n}</a></td><td>{}</td></tr>",
                level.as_str().to_uppercase(),
                n = i + 1
            ));
        }
        html.push_str("</table>");
        let got: Vec<FameLevel> = parse_crews(&html).into_iter().map(|e| e.fame).collect();
        assert_eq!(got, FameLevel::ALL.to_vec());
    }

    #[test]
    fn flag_list_uses_flagid() {
        let html = r#"<table>
            <tr><td>1</td><td><a href="/yoweb/flag/info.wm?flagid=11111">Top Flag</a></td><td>Illustrious</td></tr>
            <tr><td>2</td><td><a href="/yoweb/flag/info.wm?flagid=22222">Second Flag</a></td><td>Eminent</td></tr>
            <tr><td>3</td><td><a href="/yoweb/crew/info.wm?crewid=5">A Crew</a></td><td>Noted</td></tr>
        </table>"#;
        let got = parse_flags(html);
        assert_eq!(got.len(), 2);
        assert_eq!(got[1].name, "Second Flag");
        assert_eq!(got[1].fame, FameLevel::Eminent);
        assert!(parse_crews(html).iter().all(|e| e.game_id == 5));
    }

    #[test]
    fn rows_without_end_tags() {
        let html = r#"<table>
            <tr><th>Rank<th>Crew<th>Fame
            <tr><td>1<td><a href="/yoweb/crew/info.wm?crewid=1">One</a><td>Noted
            <tr><td>2<td><a href="/yoweb/crew/info.wm?crewid=2">Two</a><td>Renowned
            <tr><td>3<td><a href="/yoweb/crew/info.wm?crewid=3">Three</a><td>Obscure
        </table>"#;
        let got = parse_crews(html);
        let ids: Vec<u64> = got.iter().map(|e| e.game_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(got[1].fame, FameLevel::Renowned);
        assert_eq!(got[2].rank, Some(3));
    }

    #[test]
    fn one_cell_left_open_mid_table() {
        let html = r#"<table>
            <tr><td>1</td><td><a href="/yoweb/crew/info.wm?crewid=1">One</a></td><td>Noted</td></tr>
            <tr><td>2<td><a href="/yoweb/crew/info.wm?crewid=2">Two</a></td><td>Noted</td></tr>
            <tr><td>3</td><td><a href="/yoweb/crew/info.wm?crewid=3">Three</a></td><td>Noted</td></tr>
        </table>"#;
        let ids: Vec<u64> = parse_crews(html).iter().map(|e| e.game_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn rows_without_id_or_name_are_dropped() {
        let html = r#"<table>
            <tr><td>1</td><td><a href="/yoweb/crew/info.wm?crewid=0">Zero</a></td><td>Noted</td></tr>
            <tr><td>2</td><td><a href="/yoweb/crew/info.wm?crewid=7"></a></td><td>Noted</td></tr>
            <tr><td>3</td><td>No link</td><td>Noted</td></tr>
        </table>"#;
        assert!(parse_crews(html).is_empty());
        assert!(parse_flags("<table><tr><th>Rank</th><th>Flag</th><th>Fame</th></tr></table>").is_empty());
    }
}
