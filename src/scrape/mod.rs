// src/scrape/mod.rs
mod job;
mod urls;

pub use job::{DAILY_STAGES, Scraper};
pub use urls::Urls;
