// src/ingest/providers/http.rs
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::histogram;
use reqwest::Client;

use super::parse_feed;
use crate::config::FetchConfig;
use crate::ingest::types::{FeedFetcher, FetchedFeed};

/// Fetches a feed over HTTP(S) and parses it.
pub struct HttpFeedFetcher {
    client: Client,
}

impl HttpFeedFetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&cfg.user_agent)
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building feed http client")?;
        Ok(Self { client })
    }

    async fn fetch_and_parse(&self, locator: &str) -> Result<FetchedFeed> {
        let body = self
            .client
            .get(locator)
            .send()
            .await
            .with_context(|| format!("GET {locator}"))?
            .error_for_status()
            .with_context(|| format!("GET {locator}"))?
            .bytes()
            .await
            .with_context(|| format!("reading body of {locator}"))?;

        parse_feed(&body).with_context(|| format!("parsing {locator}"))
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedFeed> {
        let t0 = Instant::now();
        let res = self.fetch_and_parse(locator).await;
        let outcome = if res.is_ok() { "ok" } else { "error" };
        histogram!("feed_fetch_ms", "outcome" => outcome)
            .record(t0.elapsed().as_secs_f64() * 1_000.0);

        if let Ok(feed) = &res {
            tracing::debug!(source = locator, entries = feed.entries.len(), "feed fetched");
        }
        res
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
