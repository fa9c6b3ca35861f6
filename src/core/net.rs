// src/core/net.rs
//
// Polite HTTP GET. One request at a time per host, spaced by a fixed interval.
// No retries: a failed fetch is reported once and the caller moves on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::error::FetchError;

/// Anything that can turn a URL into a page body.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

type Slot = Arc<AsyncMutex<Option<Instant>>>;

/// Per-host spacing gate. Holding the returned guard is holding the host's
/// only in-flight slot; drop it after stamping the request time.
pub struct RateGate {
    interval: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self { interval, slots: Mutex::new(HashMap::new()) }
    }

    fn slot(&self, host: &str) -> Slot {
        let mut slots = match self.slots.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(slots.entry(s!(host)).or_default())
    }

    /// Wait for the host's slot, then until `interval` has passed since its last request.
    pub async fn acquire(&self, host: &str) -> OwnedMutexGuard<Option<Instant>> {
        let guard = self.slot(host).lock_owned().await;
        if let Some(prev) = *guard {
            let wait = self.interval.saturating_sub(prev.elapsed());
            if !wait.is_zero() {
                tokio::time::sleep(wait).await;
            }
        }
        guard
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
    gate: RateGate,
}

impl HttpFetcher {
    pub fn new(cfg: &Config) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .user_agent(cfg.user_agent.as_str())
            .build()?;
        Ok(Self { client, gate: RateGate::new(cfg.request_interval()) })
    }

    async fn get(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await.map_err(|e| FetchError::new(url, e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP {status}")));
        }
        resp.text().await.map_err(|e| FetchError::new(url, e))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::new(url, e))?;
        let host = parsed.host_str().unwrap_or_default();

        let mut last = self.gate.acquire(host).await;
        debug!(url, "GET");
        let result = self.get(url).await;
        *last = Some(Instant::now());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn same_host_is_spaced() {
        let gate = RateGate::new(Duration::from_secs(1));
        let t0 = Instant::now();

        let mut g = gate.acquire("emerald.puzzlepirates.com").await;
        *g = Some(Instant::now());
        drop(g);

        let _g = gate.acquire("emerald.puzzlepirates.com").await;
        assert!(t0.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn hosts_are_independent() {
        let gate = RateGate::new(Duration::from_secs(1));
        let t0 = Instant::now();

        let mut g = gate.acquire("emerald.puzzlepirates.com").await;
        *g = Some(Instant::now());
        drop(g);

        let _g = gate.acquire("meridian.puzzlepirates.com").await;
        assert!(t0.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn bad_url_is_a_fetch_error() {
        let fetcher = HttpFetcher::new(&Config::default()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err.url, "not a url");
    }
}
