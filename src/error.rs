// src/error.rs
//! Error taxonomy shared by the pipeline layers.
//!
//! Item-level errors (`FetchError`, `ParseError`, `StoreError`) are swallowed
//! at the item boundary by the job runner and turned into counters plus a log
//! line. `JobError` is what a whole stage or job kind reports.

use thiserror::Error;

/// Transport failure, timeout, or non-2xx response. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("fetch {url} failed: {cause}")]
pub struct FetchError {
    pub url: String,
    pub cause: String,
}

impl FetchError {
    pub fn new(url: impl Into<String>, cause: impl ToString) -> Self {
        Self { url: url.into(), cause: cause.to_string() }
    }
}

/// A structurally required field could not be found or converted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{page}: missing {field}")]
    Missing { page: &'static str, field: &'static str },

    #[error("{page}: bad {field} {value:?}")]
    Invalid { page: &'static str, field: &'static str, value: String },
}

/// A write or read against storage failed; aborts one entity's transaction.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{what} {key} not found")]
    NotFound { what: &'static str, key: String },

    #[error("corrupt stored value: {0}")]
    Corrupt(#[from] UnknownVariant),

    #[error("write rejected: {0}")]
    Rejected(String),
}

/// A stored or configured label that maps to no enum variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no {what} found at {url}")]
    EmptyListing { what: &'static str, url: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),

    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl From<UnknownVariant> for ConfigError {
    fn from(e: UnknownVariant) -> Self {
        ConfigError::Invalid { key: e.kind, message: e.to_string() }
    }
}
