// src/ingest/mod.rs
pub mod config;
pub mod dates;
pub mod media;
pub mod normalize;
pub mod providers;
pub mod types;

use std::sync::Arc;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::PipelineError;
use crate::ingest::normalize::{EntryNormalizer, NormalizedEntry};
use crate::ingest::types::FeedFetcher;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_entries_total", "Raw entries returned by fetchers.");
        describe_counter!("feed_kept_total", "Entries normalized and kept.");
        describe_counter!(
            "feed_stale_total",
            "Entries skipped for a missing or stale date."
        );
        describe_counter!(
            "feed_entry_errors_total",
            "Entries dropped because normalization failed."
        );
        describe_counter!("feed_source_errors_total", "Feed fetch/parse errors.");
        describe_counter!("sink_upserts_total", "Records written to the sink.");
        describe_counter!("sink_errors_total", "Failed sink writes.");
        describe_histogram!(
            "feed_fetch_ms",
            "Feed fetch + parse time in milliseconds, labelled by outcome."
        );
        describe_gauge!(
            "pipeline_last_run_ts",
            "Unix ts when the pipeline last ran."
        );
    });
}

/// What one source contributed.
#[derive(Debug, Default)]
pub struct SourceOutcome {
    pub entries: Vec<NormalizedEntry>,
    pub seen: usize,
    pub stale: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct AggregateOutcome {
    pub entries: Vec<NormalizedEntry>,
    pub sources_total: usize,
    pub sources_failed: usize,
    pub entries_seen: usize,
    pub entries_stale: usize,
    pub entries_failed: usize,
}

/// Fetch one source and normalize its entries in order. A failed entry is
/// logged and counted; only the fetch itself can fail the source.
pub async fn collect_source(
    fetcher: &dyn FeedFetcher,
    normalizer: &EntryNormalizer,
    locator: &str,
) -> Result<SourceOutcome, PipelineError> {
    let feed = fetcher
        .fetch(locator)
        .await
        .map_err(|source| PipelineError::Source {
            locator: locator.to_string(),
            source,
        })?;

    let mut out = SourceOutcome {
        seen: feed.entries.len(),
        ..Default::default()
    };
    counter!("feed_entries_total").increment(out.seen as u64);

    for entry in &feed.entries {
        match normalizer.normalize(entry, &feed.channel).await {
            Ok(Some(n)) => out.entries.push(n),
            Ok(None) => out.stale += 1,
            Err(e) => {
                out.failed += 1;
                tracing::warn!(
                    error = ?e,
                    source = locator,
                    title = entry.title.as_deref().unwrap_or_default(),
                    "entry skipped"
                );
            }
        }
    }

    counter!("feed_kept_total").increment(out.entries.len() as u64);
    counter!("feed_stale_total").increment(out.stale as u64);
    counter!("feed_entry_errors_total").increment(out.failed as u64);
    Ok(out)
}

/// Run every source once, at most `max_concurrency` at a time.
/// Results are concatenated in source-list order.
pub async fn run_once(
    fetcher: Arc<dyn FeedFetcher>,
    normalizer: Arc<EntryNormalizer>,
    sources: &[String],
    max_concurrency: usize,
) -> AggregateOutcome {
    ensure_metrics_described();

    let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks = JoinSet::new();
    for (idx, locator) in sources.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let normalizer = Arc::clone(&normalizer);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            // Semaphore is never closed.
            let _permit = permits.acquire_owned().await.ok();
            let res = collect_source(fetcher.as_ref(), &normalizer, &locator).await;
            (idx, res)
        });
    }

    let mut slots: Vec<Option<Result<SourceOutcome, PipelineError>>> =
        sources.iter().map(|_| None).collect();
    let mut out = AggregateOutcome {
        sources_total: sources.len(),
        ..Default::default()
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, res)) => slots[idx] = Some(res),
            Err(e) => {
                out.sources_failed += 1;
                counter!("feed_source_errors_total").increment(1);
                tracing::error!(error = ?e, "feed source task aborted");
            }
        }
    }

    for res in slots.into_iter().flatten() {
        match res {
            Ok(mut src) => {
                out.entries_seen += src.seen;
                out.entries_stale += src.stale;
                out.entries_failed += src.failed;
                out.entries.append(&mut src.entries);
            }
            Err(e) => {
                out.sources_failed += 1;
                counter!("feed_source_errors_total").increment(1);
                tracing::warn!(error = %e, "feed source failed");
            }
        }
    }

    tracing::info!(
        target: "ingest",
        sources = out.sources_total,
        failed_sources = out.sources_failed,
        seen = out.entries_seen,
        kept = out.entries.len(),
        stale = out.entries_stale,
        failed_entries = out.entries_failed,
        "aggregation finished"
    );
    out
}
