// src/ingest/providers/fixture.rs
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::parse_feed;
use crate::ingest::types::{FeedFetcher, FetchedFeed};

/// Serves feed documents from memory, keyed by locator. Unknown locators fail
/// like an unreachable host would.
#[derive(Default)]
pub struct FixtureFetcher {
    docs: HashMap<String, String>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: &str, xml: &str) -> Self {
        self.docs.insert(locator.to_string(), xml.to_string());
        self
    }
}

#[async_trait]
impl FeedFetcher for FixtureFetcher {
    async fn fetch(&self, locator: &str) -> Result<FetchedFeed> {
        let xml = self
            .docs
            .get(locator)
            .ok_or_else(|| anyhow!("no fixture for {locator}"))?;
        parse_feed(xml.as_bytes())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
