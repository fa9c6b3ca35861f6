// tests/market_import.rs
mod common;

use std::sync::Arc;

use chrono::Utc;
use common::*;
use yoweb_scrape::data::Ocean;
use yoweb_scrape::poller::MarketPoller;
use yoweb_scrape::store::{MarketOrder, MemoryStore, SqliteStore, Store};

fn poller(pages: &Arc<Pages>, store: Arc<dyn Store>, oceans: &[Ocean]) -> MarketPoller {
    MarketPoller::new(pages.clone(), store, urls(), oceans.to_vec())
}

#[tokio::test]
async fn good_rows_land_bad_rows_are_counted() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().market(OCEAN), MARKET_CSV);

    let summary = poller(&pages, store.clone(), &[OCEAN]).run().await.unwrap();
    assert_eq!((summary.imported, summary.rejected), (3, 1));
    assert!(summary.failed_oceans.is_empty());

    let orders = store.market_orders().await.unwrap();
    assert_eq!(orders.len(), 3);
    assert_eq!(orders[1].shop, "Deinsklave's Schmiede-Laden");
    assert_eq!((orders[1].sell_price, orders[1].sell_qty), (40, 450));
    assert!(orders.iter().all(|o| o.ocean == OCEAN));
}

#[tokio::test]
async fn import_time_is_millisecond_precise() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().market(OCEAN), MARKET_CSV);
    poller(&pages, store.clone(), &[OCEAN]).run().await.unwrap();

    let orders = store.market_orders().await.unwrap();
    assert!(orders.iter().all(|o| o.imported_at.timestamp_subsec_nanos() % 1_000_000 == 0));
}

#[tokio::test]
async fn unreachable_ocean_is_skipped() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().market(Ocean::Emerald), MARKET_CSV);

    let summary = poller(&pages, store.clone(), &[Ocean::Emerald, Ocean::Obsidian]).run().await.unwrap();
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.failed_oceans, vec![Ocean::Obsidian]);
}

#[tokio::test]
async fn nothing_fetched_keeps_previous_rows() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    pages.set(urls().market(OCEAN), MARKET_CSV);
    let p = poller(&pages, store.clone(), &[OCEAN]);
    p.run().await.unwrap();

    pages.remove(&urls().market(OCEAN));
    let summary = p.run().await.unwrap();
    assert_eq!(summary.imported, 0);
    assert_eq!(summary.failed_oceans, vec![OCEAN]);
    assert_eq!(store.market_orders().await.unwrap().len(), 3);
}

#[tokio::test]
async fn each_import_replaces_the_table() {
    let pages = Arc::new(Pages::new());
    let store = Arc::new(MemoryStore::new());
    let p = poller(&pages, store.clone(), &[OCEAN]);

    pages.set(urls().market(OCEAN), MARKET_CSV);
    p.run().await.unwrap();
    pages.set(
        urls().market(OCEAN),
        "Island,Commodity,Shop,Buy,BuyQty,Sell,SellQty\n\"Maia-Insel\",\"Iron\",\"Shop\",\"1\",\"1\",\"2\",\"2\"\n",
    );
    p.run().await.unwrap();

    let orders = store.market_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].commodity, "Iron");
}

fn order(island: &str) -> MarketOrder {
    MarketOrder {
        ocean: OCEAN,
        island: island.into(),
        commodity: "Iron".into(),
        shop: "Smithy".into(),
        buy_price: 12,
        buy_qty: 0,
        sell_price: 40,
        sell_qty: 450,
        imported_at: Utc::now(),
    }
}

#[tokio::test]
async fn sqlite_replace_is_all_or_nothing() {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
    assert_eq!(store.replace_market_orders(&[order("Alpha"), order("Beta")]).await.unwrap(), 2);

    // the blank island violates the table's constraint halfway through
    let bad = [order("Gamma"), order("  "), order("Delta")];
    assert!(store.replace_market_orders(&bad).await.is_err());

    let kept: Vec<String> = store.market_orders().await.unwrap().into_iter().map(|o| o.island).collect();
    assert_eq!(kept, vec!["Alpha", "Beta"]);
}

#[tokio::test]
async fn memory_replace_is_all_or_nothing() {
    let store = MemoryStore::new();
    store.replace_market_orders(&[order("Alpha")]).await.unwrap();
    assert!(store.replace_market_orders(&[order("Gamma"), order("")]).await.is_err());

    let kept = store.market_orders().await.unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].island, "Alpha");
}
