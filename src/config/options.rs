// src/config/options.rs
use std::time::Duration;

use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;

use super::consts::*;
use crate::data::Ocean;
use crate::error::ConfigError;

/// Runtime options. Every field has a default from `consts`, so an empty
/// config file (or none at all) yields a working setup.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub oceans: Vec<String>,
    pub host: String,
    pub user_agent: String,
    pub request_interval_ms: u64,
    pub request_timeout_secs: u64,
    pub island_id_first: u64,
    pub island_id_last: u64,
    /// Local wall-clock time of the daily full run, `HH:MM`.
    pub daily_at: String,
    /// IANA zone name the daily trigger is evaluated in.
    pub time_zone: String,
    pub run_on_startup: bool,
    pub shutdown_grace_secs: u64,
    /// 0 disables the market poller.
    pub market_poll_minutes: u64,
    /// Plain-text copy of the log output, if set.
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: s!(DATABASE_URL),
            oceans: OCEANS.iter().map(|o| s!(*o)).collect(),
            host: s!(HOST),
            user_agent: s!(USER_AGENT),
            request_interval_ms: REQUEST_INTERVAL_MS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            island_id_first: ISLAND_ID_FIRST,
            island_id_last: ISLAND_ID_LAST,
            daily_at: s!(DAILY_AT),
            time_zone: s!(TIME_ZONE),
            run_on_startup: true,
            shutdown_grace_secs: SHUTDOWN_GRACE_SECS,
            market_poll_minutes: MARKET_POLL_MINUTES,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Sources, later overriding earlier:
    /// 1. `yoweb_scrape.yaml` in the current directory (if present)
    /// 2. the file given by `path` (required when passed)
    /// 3. the file named by `YOWEB_CONFIG` (required when set)
    /// 4. `YOWEB__*` environment variables, e.g. `YOWEB__DATABASE_URL`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(p) = path {
            builder = builder.add_source(File::new(p, FileFormat::Yaml).required(true));
        }
        if let Ok(p) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&p, FileFormat::Yaml).required(true));
        }

        let cfg: Config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("oceans")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every derived value once so later accessors can't surprise callers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ocean_list()?;
        self.daily_time()?;
        self.tz()?;
        if self.island_id_first > self.island_id_last {
            return Err(ConfigError::Invalid {
                key: "island_id_first",
                message: s!("{} > island_id_last {}", self.island_id_first, self.island_id_last),
            });
        }
        Ok(())
    }

    pub fn ocean_list(&self) -> Result<Vec<Ocean>, ConfigError> {
        let mut out = Vec::with_capacity(self.oceans.len());
        for name in &self.oceans {
            let ocean: Ocean = name.parse()?;
            if !out.contains(&ocean) {
                out.push(ocean);
            }
        }
        if out.is_empty() {
            return Err(ConfigError::Invalid { key: "oceans", message: s!("no oceans configured") });
        }
        Ok(out)
    }

    pub fn daily_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.daily_at.trim(), "%H:%M").map_err(|e| ConfigError::Invalid {
            key: "daily_at",
            message: s!("{:?}: {e}", self.daily_at),
        })
    }

    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.time_zone.trim().parse::<Tz>().map_err(|e| ConfigError::Invalid {
            key: "time_zone",
            message: e.to_string(),
        })
    }

    pub fn request_interval(&self) -> Duration { Duration::from_millis(self.request_interval_ms) }
    pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
    pub fn shutdown_grace(&self) -> Duration { Duration::from_secs(self.shutdown_grace_secs) }

    pub fn market_poll_interval(&self) -> Option<Duration> {
        (self.market_poll_minutes > 0).then(|| Duration::from_secs(self.market_poll_minutes * 60))
    }

    pub fn island_ids(&self) -> std::ops::RangeInclusive<u64> {
        self.island_id_first..=self.island_id_last
    }
}
