// src/pipeline.rs
//! One aggregation-and-persist cycle over explicitly constructed
//! collaborators. Build a [`Pipeline`] once, call [`Pipeline::run_cycle`]
//! per trigger, drop it when the process ends.

use std::sync::Arc;

use anyhow::Result;
use metrics::gauge;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::ingest::{
    self, normalize::EntryNormalizer, providers::HttpFeedFetcher, types::FeedFetcher,
};
use crate::sanitize::TagStripper;
use crate::sentiment::build_sentiment;
use crate::sink::{build_sink, persist_all, DynSink};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub sources_total: usize,
    pub sources_failed: usize,
    pub entries_seen: usize,
    pub entries_stale: usize,
    pub entries_failed: usize,
    pub persisted: usize,
    pub persist_failed: usize,
}

pub struct Pipeline {
    fetcher: Arc<dyn FeedFetcher>,
    normalizer: Arc<EntryNormalizer>,
    sink: DynSink,
    sources: Vec<String>,
    max_concurrency: usize,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        normalizer: EntryNormalizer,
        sink: DynSink,
        sources: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            normalizer: Arc::new(normalizer),
            sink,
            sources,
            max_concurrency: 4,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    /// Production wiring: HTTP fetcher, tag stripper, configured sentiment and sink.
    pub fn from_config(cfg: &AppConfig, sources: Vec<String>) -> Result<Self> {
        let fetcher = Arc::new(HttpFeedFetcher::new(&cfg.fetch)?);
        let sentiment = build_sentiment(&cfg.sentiment)?;
        let sink = build_sink(&cfg.sink)?;
        let normalizer = EntryNormalizer::new(Arc::new(TagStripper), sentiment)
            .with_window(cfg.freshness_window())
            .with_id_strategy(cfg.id_strategy);

        tracing::info!(
            sources = sources.len(),
            sentiment = ?cfg.sentiment.provider,
            sink = ?cfg.sink.kind,
            "pipeline configured"
        );
        Ok(Self::new(fetcher, normalizer, sink, sources).with_concurrency(cfg.max_concurrency))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Fetch, normalize and persist. Fails only when every source failed.
    pub async fn run_cycle(&self) -> Result<RunReport, PipelineError> {
        if self.sources.is_empty() {
            tracing::warn!("no feed sources configured; nothing to do");
        }

        let agg = ingest::run_once(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.normalizer),
            &self.sources,
            self.max_concurrency,
        )
        .await;

        gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

        if agg.sources_total > 0 && agg.sources_failed == agg.sources_total {
            return Err(PipelineError::AllSourcesFailed {
                count: agg.sources_total,
            });
        }

        let mut report = RunReport {
            sources_total: agg.sources_total,
            sources_failed: agg.sources_failed,
            entries_seen: agg.entries_seen,
            entries_stale: agg.entries_stale,
            entries_failed: agg.entries_failed,
            ..Default::default()
        };

        let persisted = persist_all(self.sink.as_ref(), agg.entries).await;
        report.persisted = persisted.persisted;
        report.persist_failed = persisted.failed;

        tracing::info!("{} articles added", report.persisted);
        Ok(report)
    }
}
