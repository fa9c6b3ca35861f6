// src/specs/market.rs
//! Parsing *spec* for the buy/sell CSV export (`econ/buysell.wm`).
//!
//! One header line, then exactly seven fields per record:
//! `island, commodity, shop, buy price, buy qty, sell price, sell qty`.
//! Bad records never abort the file; they come back in `rejected` with the
//! source line so the caller can log them.

use crate::config::consts::MARKET_FIELDS;
use crate::csv::parse_rows;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketRow {
    pub island: String,
    pub commodity: String,
    pub shop: String,
    pub buy_price: i64,
    pub buy_qty: i64,
    pub sell_price: i64,
    pub sell_qty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MarketParse {
    pub rows: Vec<MarketRow>,
    pub rejected: Vec<RejectedRow>,
}

pub fn parse(text: &str) -> MarketParse {
    let mut out = MarketParse::default();
    for (line, fields) in parse_rows(text, ',').into_iter().skip(1) {
        match parse_record(&fields) {
            Ok(row) => out.rows.push(row),
            Err(reason) => out.rejected.push(RejectedRow { line, reason }),
        }
    }
    out
}

pub fn parse_record(fields: &[String]) -> Result<MarketRow, String> {
    if fields.len() != MARKET_FIELDS {
        return Err(s!("expected {MARKET_FIELDS} fields, got {}", fields.len()));
    }
    let text = |i: usize, what: &str| -> Result<String, String> {
        let v = fields[i].trim();
        if v.is_empty() { Err(format!("empty {what}")) } else { Ok(s!(v)) }
    };
    let int = |i: usize, what: &str| -> Result<i64, String> {
        let v = fields[i].trim();
        v.parse().map_err(|_| format!("invalid {what} {v:?}"))
    };

    Ok(MarketRow {
        island: text(0, "island")?,
        commodity: text(1, "commodity")?,
        shop: text(2, "shop")?,
        buy_price: int(3, "buy price")?,
        buy_qty: int(4, "buy quantity")?,
        sell_price: int(5, "sell price")?,
        sell_qty: int(6, "sell quantity")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| s!(*c)).collect()
    }

    #[test]
    fn records() {
        let row = parse_record(&rec(&["Maia-Insel", "Sugar cane", "Ferklstall", "4", "100", "0", "0"])).unwrap();
        assert_eq!(row.island, "Maia-Insel");
        assert_eq!((row.buy_price, row.buy_qty, row.sell_price, row.sell_qty), (4, 100, 0, 0));

        let row = parse_record(&rec(&[" Maia-Insel ", " Wood ", " Test Shop ", " 10 ", " 50 ", " 30 ", " 0 "])).unwrap();
        assert_eq!(row.commodity, "Wood");
        assert_eq!(row.shop, "Test Shop");
        assert_eq!(row.sell_price, 30);
    }

    #[test]
    fn bad_records() {
        assert!(parse_record(&rec(&["a", "b", "c", "1", "2", "3"])).is_err());
        assert!(parse_record(&rec(&["a", "b", "c", "1", "2", "3", "4", "5"])).is_err());
        assert!(parse_record(&rec(&["", "b", "c", "1", "2", "3", "4"])).is_err());
        assert!(parse_record(&rec(&["a", "b", "c", "x", "2", "3", "4"])).is_err());
    }

    #[test]
    fn file_skips_header_and_keeps_going() {
        let text = "Island,Commodity,Shop,Buy,BuyQty,Sell,SellQty\n\
                    \"Maia-Insel\",\"Sugar cane\",\"Ferklstall\",\"4\",\"100\",\"0\",\"0\"\n\
                    \"Chachapoya-Insel\",\"Iron\",\"Deinsklave's Schmiede-Laden\",\"12\",\"0\",\"40\",\"450\"\n\
                    \"Maia-Insel\",\"Emeralds\",\"Ferklnachschub\",\"abc\",\"0\",\"470\",\"4\"\n\
                    \"Maia-Insel\",\"Emeralds\",\"Ferklnachschub\",\"0\",\"0\",\"470\",\"4\"\n";
        let parsed = parse(text);
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].line, 4);
        assert_eq!(parsed.rows[1].shop, "Deinsklave's Schmiede-Laden");
    }
}
