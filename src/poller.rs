// src/poller.rs
//
// Market CSV import. Every configured ocean is fetched and parsed; the rows
// of all oceans then replace the whole market table in one transaction.
// An ocean that can't be fetched is skipped. If no ocean yields a row the
// table is left untouched.

use std::sync::Arc;

use tracing::{info, warn};

use crate::core::Fetch;
use crate::data::Ocean;
use crate::error::StoreError;
use crate::reconcile::scrape_time;
use crate::scrape::Urls;
use crate::specs::market;
use crate::store::{MarketOrder, Store};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollSummary {
    /// Rows written; 0 when the import was skipped.
    pub imported: usize,
    pub rejected: usize,
    pub failed_oceans: Vec<Ocean>,
}

#[derive(Clone)]
pub struct MarketPoller {
    fetch: Arc<dyn Fetch>,
    store: Arc<dyn Store>,
    urls: Urls,
    oceans: Vec<Ocean>,
}

impl MarketPoller {
    pub fn new(fetch: Arc<dyn Fetch>, store: Arc<dyn Store>, urls: Urls, oceans: Vec<Ocean>) -> Self {
        Self { fetch, store, urls, oceans }
    }

    pub async fn run(&self) -> Result<PollSummary, StoreError> {
        info!(oceans = self.oceans.len(), "market import started");
        let imported_at = scrape_time();
        let mut summary = PollSummary::default();
        let mut orders: Vec<MarketOrder> = Vec::new();

        for &ocean in &self.oceans {
            let url = self.urls.market(ocean);
            let text = match self.fetch.fetch(&url).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(%ocean, error = %e, "market fetch failed, ocean skipped");
                    summary.failed_oceans.push(ocean);
                    continue;
                }
            };

            let parsed = market::parse(&text);
            for bad in &parsed.rejected {
                warn!(%ocean, line = bad.line, reason = %bad.reason, "market row skipped");
            }
            summary.rejected += parsed.rejected.len();
            info!(%ocean, rows = parsed.rows.len(), "market rows fetched");
            orders.extend(parsed.rows.into_iter().map(|row| MarketOrder::from_row(ocean, row, imported_at)));
        }

        if orders.is_empty() {
            warn!("no market rows from any ocean, import skipped");
            return Ok(summary);
        }

        summary.imported = self.store.replace_market_orders(&orders).await?;
        info!(imported = summary.imported, "market import finished");
        Ok(summary)
    }
}
