// src/specs/tax_rates.rs
//! Parsing *spec* for the commodity tax table (`econ/taxrates.wm`).
//!
//! The page wraps its data in a layout table; the rows live in the nested
//! table: `<tr><td>Commodity</td><td>12</td></tr>`, header rows use `<th>`.

use crate::core::html::{blocks_ci, is_header_row, leaf_tables, normalize_markup, row_cells};
use crate::core::sanitize::digits_only;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxRate {
    pub commodity: String,
    pub rate: u32,
}

/// Every `(commodity, value)` row. Rows whose value has no digits are dropped.
pub fn parse(html: &str) -> Vec<TaxRate> {
    let page = normalize_markup(html);
    let mut out = Vec::new();
    for table in leaf_tables(&page) {
        for row in blocks_ci(table, "tr") {
            if is_header_row(row) {
                continue;
            }
            let cells = row_cells(row);
            if cells.len() < 2 || cells[0].is_empty() {
                continue;
            }
            if let Ok(rate) = digits_only(&cells[1]).parse::<u32>() {
                out.push(TaxRate { commodity: cells[0].clone(), rate });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_table_rows() {
        let html = r#"<html><body><center><table><tr><td>
            <table>
                <tr><th>Commodity</th><th>Tax Rate</th></tr>
                <tr><td>Iron</td><td>12</td></tr>
                <tr><td>Small cannon balls</td><td>1,050 PoE</td></tr>
                <tr><td>Broken</td><td>n/a</td></tr>
            </table>
        </td></tr></table></center></body></html>"#;
        let rates = parse(html);
        assert_eq!(
            rates,
            vec![
                TaxRate { commodity: s!("Iron"), rate: 12 },
                TaxRate { commodity: s!("Small cannon balls"), rate: 1050 },
            ]
        );
    }

    #[test]
    fn nested_rows_without_end_tags() {
        let html = "<center><table><tr><td><table>\
            <tr><th>Commodity<th>Tax Rate\
            <tr><td>Iron<td>12\
            <tr><td>Hemp<td>3\
            </table></table></center>";
        let rates = parse(html);
        assert_eq!(
            rates,
            vec![TaxRate { commodity: s!("Iron"), rate: 12 }, TaxRate { commodity: s!("Hemp"), rate: 3 }]
        );
    }

    #[test]
    fn header_only_and_empty_pages() {
        let header_only = "<center><table><tr><td><table><tr><th>Commodity</th><th>Tax Rate</th></tr></table></td></tr></table></center>";
        assert!(parse(header_only).is_empty());
        assert!(parse("<html><body></body></html>").is_empty());
        assert!(parse("<body><center>no table here</center></body>").is_empty());
    }
}
