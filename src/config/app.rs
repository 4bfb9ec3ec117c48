// src/config/app.rs
use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

const ENV_PATH: &str = "INGESTOR_CONFIG_PATH";
pub const ENV_SENTIMENT_KEY: &str = "GOOGLE_NL_API_KEY";
pub const ENV_FIRESTORE_PROJECT: &str = "FIRESTORE_PROJECT_ID";
pub const ENV_FIRESTORE_TOKEN: &str = "FIRESTORE_ACCESS_TOKEN";

fn default_window_secs() -> u64 {
    3600
}
fn default_concurrency() -> usize {
    4
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_user_agent() -> String {
    concat!("news-feed-ingestor/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_collection() -> String {
    "articles".to_string()
}
fn env_placeholder() -> Option<String> {
    Some("ENV".to_string())
}

/// How record identifiers are generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Fresh UUID v4 per record and run.
    #[default]
    Random,
    /// Unix seconds of the publication time; re-runs merge into the same document.
    PublishTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentProvider {
    #[default]
    Google,
    Lexicon,
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default)]
    pub provider: SentimentProvider,
    /// "ENV" means: read from GOOGLE_NL_API_KEY
    #[serde(default = "env_placeholder")]
    pub api_key: Option<String>,
    /// Base URL override for the sentiment API.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            provider: SentimentProvider::default(),
            api_key: env_placeholder(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Firestore,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,
    /// "ENV" means: read from FIRESTORE_PROJECT_ID
    #[serde(default = "env_placeholder")]
    pub project_id: Option<String>,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// "ENV" means: read from FIRESTORE_ACCESS_TOKEN
    #[serde(default = "env_placeholder")]
    pub access_token: Option<String>,
    /// Base URL override (emulator).
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            project_id: env_placeholder(),
            collection: default_collection(),
            access_token: env_placeholder(),
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Entries published longer ago than this are skipped. At most one day.
    #[serde(default = "default_window_secs")]
    pub freshness_window_secs: u64,
    /// Feed sources processed at the same time.
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub sink: SinkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            freshness_window_secs: default_window_secs(),
            max_concurrency: default_concurrency(),
            id_strategy: IdStrategy::default(),
            fetch: FetchConfig::default(),
            sentiment: SentimentConfig::default(),
            sink: SinkConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from an explicit TOML or JSON file and resolve secrets.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let cfg: AppConfig = if is_json {
            serde_json::from_str(&data).context("parsing json config")?
        } else {
            toml::from_str(&data).context("parsing toml config")?
        };
        Ok(cfg.finalize()?)
    }

    /// Load using env var + fallbacks:
    /// 1) $INGESTOR_CONFIG_PATH
    /// 2) config/ingestor.toml
    /// 3) config/ingestor.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_PATH} points to non-existent path"));
            }
            return Self::load_from_file(&pb);
        }
        for candidate in ["config/ingestor.toml", "config/ingestor.json"] {
            let pb = PathBuf::from(candidate);
            if pb.exists() {
                return Self::load_from_file(&pb);
            }
        }
        Ok(Self::default().finalize()?)
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.freshness_window_secs as i64)
    }

    /// Validate numbers and resolve "ENV" placeholders of the selected providers.
    pub fn finalize(mut self) -> Result<Self, PipelineError> {
        if self.freshness_window_secs == 0 || self.freshness_window_secs > 86_400 {
            return Err(PipelineError::Config(format!(
                "freshness_window_secs must be within 1..=86400, got {}",
                self.freshness_window_secs
            )));
        }
        if self.max_concurrency == 0 {
            self.max_concurrency = 1;
        }

        if self.sentiment.provider == SentimentProvider::Google {
            self.sentiment.api_key =
                Some(require(self.sentiment.api_key.take(), ENV_SENTIMENT_KEY, "sentiment.api_key")?);
        }

        if self.sink.kind == SinkKind::Firestore {
            self.sink.project_id =
                Some(require(self.sink.project_id.take(), ENV_FIRESTORE_PROJECT, "sink.project_id")?);
            self.sink.access_token = Some(require(
                self.sink.access_token.take(),
                ENV_FIRESTORE_TOKEN,
                "sink.access_token",
            )?);
            if self.sink.collection.trim().is_empty() {
                return Err(PipelineError::Config("sink.collection is empty".into()));
            }
        }

        Ok(self)
    }
}

/// Literal value, or the env var when the value is the "ENV" placeholder.
fn require(value: Option<String>, var: &str, key: &str) -> Result<String, PipelineError> {
    let resolved = match value {
        Some(v) if v.trim().eq_ignore_ascii_case("env") => env::var(var).ok(),
        other => other,
    };
    resolved
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PipelineError::Config(format!("missing {key} (set {var})")))
}
