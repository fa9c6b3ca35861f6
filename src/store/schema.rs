// src/store/schema.rs
//
// SQLite schema. Timestamps are UTC unix milliseconds. The unique indexes are
// what make snapshot inserts idempotent; the partial indexes on open
// intervals keep at most one open history row per entity.

pub const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS archipelagos (
        id    INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean TEXT NOT NULL,
        name  TEXT NOT NULL,
        UNIQUE (ocean, name)
    )",
    "CREATE TABLE IF NOT EXISTS flags (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean         TEXT NOT NULL,
        game_id       INTEGER NOT NULL,
        name          TEXT NOT NULL,
        active        INTEGER NOT NULL DEFAULT 1,
        first_seen_at INTEGER NOT NULL,
        last_seen_at  INTEGER NOT NULL,
        UNIQUE (ocean, game_id)
    )",
    "CREATE TABLE IF NOT EXISTS islands (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean            TEXT NOT NULL,
        game_id          INTEGER NOT NULL,
        name             TEXT NOT NULL,
        size             TEXT NOT NULL,
        colonized        INTEGER NOT NULL,
        population       INTEGER NOT NULL,
        archipelago_id   INTEGER REFERENCES archipelagos (id),
        governor_flag_id INTEGER REFERENCES flags (id),
        governor_name    TEXT,
        first_seen_at    INTEGER NOT NULL,
        last_seen_at     INTEGER NOT NULL,
        UNIQUE (ocean, game_id)
    )",
    "CREATE TABLE IF NOT EXISTS island_populations (
        island_id  INTEGER NOT NULL REFERENCES islands (id),
        scraped_at INTEGER NOT NULL,
        population INTEGER NOT NULL,
        UNIQUE (island_id, scraped_at)
    )",
    "CREATE TABLE IF NOT EXISTS island_governance_history (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        island_id     INTEGER NOT NULL REFERENCES islands (id),
        flag_id       INTEGER REFERENCES flags (id),
        governor_name TEXT,
        started_at    INTEGER NOT NULL,
        ended_at      INTEGER
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS island_governance_open
        ON island_governance_history (island_id) WHERE ended_at IS NULL",
    "CREATE TABLE IF NOT EXISTS commodities (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        name     TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS island_commodities (
        island_id    INTEGER NOT NULL REFERENCES islands (id),
        commodity_id INTEGER NOT NULL REFERENCES commodities (id),
        confirmed    INTEGER NOT NULL,
        UNIQUE (island_id, commodity_id)
    )",
    "CREATE TABLE IF NOT EXISTS commodity_tax_rates (
        commodity_id INTEGER NOT NULL REFERENCES commodities (id),
        ocean        TEXT NOT NULL,
        scraped_at   INTEGER NOT NULL,
        tax_rate     INTEGER NOT NULL,
        UNIQUE (commodity_id, ocean, scraped_at)
    )",
    "CREATE TABLE IF NOT EXISTS crews (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean         TEXT NOT NULL,
        game_id       INTEGER NOT NULL,
        name          TEXT NOT NULL,
        active        INTEGER NOT NULL DEFAULT 1,
        flag_id       INTEGER REFERENCES flags (id),
        first_seen_at INTEGER NOT NULL,
        last_seen_at  INTEGER NOT NULL,
        UNIQUE (ocean, game_id)
    )",
    "CREATE TABLE IF NOT EXISTS crew_fame_records (
        crew_id    INTEGER NOT NULL REFERENCES crews (id),
        scraped_at INTEGER NOT NULL,
        fame_level TEXT NOT NULL,
        rank       INTEGER,
        UNIQUE (crew_id, scraped_at)
    )",
    "CREATE TABLE IF NOT EXISTS crew_battle_records (
        crew_id      INTEGER NOT NULL REFERENCES crews (id),
        scraped_at   INTEGER NOT NULL,
        crew_rank    TEXT,
        total_wins   INTEGER NOT NULL,
        total_losses INTEGER NOT NULL,
        daily_wins   INTEGER NOT NULL,
        daily_losses INTEGER NOT NULL,
        UNIQUE (crew_id, scraped_at)
    )",
    "CREATE TABLE IF NOT EXISTS crew_flag_history (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        crew_id   INTEGER NOT NULL REFERENCES crews (id),
        flag_id   INTEGER REFERENCES flags (id),
        joined_at INTEGER NOT NULL,
        left_at   INTEGER
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS crew_flag_open
        ON crew_flag_history (crew_id) WHERE left_at IS NULL",
    "CREATE TABLE IF NOT EXISTS flag_fame_records (
        flag_id    INTEGER NOT NULL REFERENCES flags (id),
        scraped_at INTEGER NOT NULL,
        fame_level TEXT NOT NULL,
        rank       INTEGER,
        UNIQUE (flag_id, scraped_at)
    )",
    "CREATE TABLE IF NOT EXISTS flag_reputation_records (
        flag_id         INTEGER NOT NULL REFERENCES flags (id),
        scraped_at      INTEGER NOT NULL,
        reputation_type TEXT NOT NULL,
        fame_level      TEXT NOT NULL,
        UNIQUE (flag_id, scraped_at, reputation_type)
    )",
    "CREATE TABLE IF NOT EXISTS scrape_jobs (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean           TEXT NOT NULL,
        job_type        TEXT NOT NULL,
        status          TEXT NOT NULL,
        started_at      INTEGER NOT NULL,
        ended_at        INTEGER,
        items_processed INTEGER NOT NULL DEFAULT 0,
        items_failed    INTEGER NOT NULL DEFAULT 0,
        error_message   TEXT
    )",
    "CREATE TABLE IF NOT EXISTS market_orders (
        id             INTEGER PRIMARY KEY AUTOINCREMENT,
        ocean          TEXT NOT NULL,
        island_name    TEXT NOT NULL CHECK (length(trim(island_name)) > 0),
        commodity_name TEXT NOT NULL CHECK (length(trim(commodity_name)) > 0),
        shop_name      TEXT NOT NULL CHECK (length(trim(shop_name)) > 0),
        buy_price      INTEGER NOT NULL,
        buy_quantity   INTEGER NOT NULL,
        sell_price     INTEGER NOT NULL,
        sell_quantity  INTEGER NOT NULL,
        imported_at    INTEGER NOT NULL
    )",
];

/// Tables reported by `row_counts`, in `RowCounts` field order.
pub const COUNTED: &[&str] = &[
    "islands",
    "archipelagos",
    "commodities",
    "island_commodities",
    "island_populations",
    "island_governance_history",
    "commodity_tax_rates",
    "crews",
    "crew_fame_records",
    "crew_battle_records",
    "crew_flag_history",
    "flags",
    "flag_fame_records",
    "flag_reputation_records",
];
