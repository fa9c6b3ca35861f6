// src/config/consts.rs

// Net config
pub const HOST: &str = "puzzlepirates.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const REQUEST_INTERVAL_MS: u64 = 1_000; // be polite: one request per second per host
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Storage
pub const DATABASE_URL: &str = "sqlite://yoweb.db?mode=rwc";

// Crawl
pub const OCEANS: &[&str] = &["emerald", "meridian", "cerulean", "obsidian"];
pub const ISLAND_ID_FIRST: u64 = 0;
pub const ISLAND_ID_LAST: u64 = 120;
pub const UNCOLONIZED_MARKER: &str = "Shiver me timbers: The island is uncolonized.";

// Schedule
pub const DAILY_AT: &str = "03:30";
pub const TIME_ZONE: &str = "America/Los_Angeles";
pub const SHUTDOWN_GRACE_SECS: u64 = 30;
pub const MARKET_POLL_MINUTES: u64 = 60;

// Config sources
pub const CONFIG_FILE: &str = "yoweb_scrape";
pub const CONFIG_ENV_VAR: &str = "YOWEB_CONFIG";
pub const CONFIG_ENV_PREFIX: &str = "YOWEB";
pub const LOG_ENV_VAR: &str = "YOWEB_LOG";

// Market import
pub const MARKET_FIELDS: usize = 7;
pub const MARKET_BATCH: usize = 100;
