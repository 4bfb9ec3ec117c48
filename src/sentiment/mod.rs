// src/sentiment/mod.rs
//! Sentiment scoring behind one trait, with a factory that picks the
//! provider from configuration.

pub mod google;
pub mod lexicon;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{SentimentConfig, SentimentProvider};

pub use google::GoogleNlClient;
pub use lexicon::LexiconSentiment;

/// Polarity in [-1, 1] and non-negative intensity of a text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub score: f64,
    pub magnitude: f64,
}

impl Sentiment {
    /// Both components rounded to two decimals.
    pub fn rounded(self) -> Self {
        Self {
            score: round2(self.score),
            magnitude: round2(self.magnitude),
        }
    }
}

#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn score(&self, text: &str) -> Result<Sentiment>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

pub type DynSentiment = Arc<dyn SentimentAnalyzer>;

/// Fails every call; entries with a title then count as entry failures.
pub struct DisabledSentiment;

#[async_trait]
impl SentimentAnalyzer for DisabledSentiment {
    async fn score(&self, _text: &str) -> Result<Sentiment> {
        Err(anyhow!("sentiment scoring is disabled"))
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

pub fn build_sentiment(cfg: &SentimentConfig) -> Result<DynSentiment> {
    match cfg.provider {
        SentimentProvider::Google => {
            let key = cfg
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| anyhow!("google sentiment selected but no api key configured"))?;
            Ok(Arc::new(GoogleNlClient::new(
                key,
                cfg.endpoint.as_deref(),
                cfg.timeout_secs,
            )?))
        }
        SentimentProvider::Lexicon => Ok(Arc::new(LexiconSentiment::new())),
        SentimentProvider::Disabled => Ok(Arc::new(DisabledSentiment)),
    }
}
