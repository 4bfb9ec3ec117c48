// src/sink/mod.rs
pub mod firestore;
pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use metrics::counter;

use crate::config::{SinkConfig, SinkKind};
use crate::ingest::normalize::NormalizedEntry;

pub use firestore::FirestoreSink;
pub use memory::MemorySink;

pub type Fields = BTreeMap<String, FieldValue>;

/// Typed document value, close to what document stores accept.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    String(String),
    Double(f64),
    Timestamp(DateTime<Utc>),
    Map(Fields),
}

impl From<Option<String>> for FieldValue {
    fn from(v: Option<String>) -> Self {
        v.map(FieldValue::String).unwrap_or(FieldValue::Null)
    }
}

#[async_trait::async_trait]
pub trait DocumentSink: Send + Sync {
    /// Create the document or merge `fields` into it; keys not in `fields` are kept.
    async fn upsert(&self, id: &str, fields: &Fields) -> Result<()>;
    fn name(&self) -> &'static str;
}

pub type DynSink = Arc<dyn DocumentSink>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PersistOutcome {
    pub persisted: usize,
    pub failed: usize,
}

/// Upsert every entry once. A failed write is logged with the entry title
/// and does not stop the remaining writes.
pub async fn persist_all(sink: &dyn DocumentSink, entries: Vec<NormalizedEntry>) -> PersistOutcome {
    let mut out = PersistOutcome::default();
    for entry in entries {
        let fields = entry.to_fields();
        match sink.upsert(&entry.id, &fields).await {
            Ok(()) => {
                out.persisted += 1;
                counter!("sink_upserts_total").increment(1);
            }
            Err(e) => {
                out.failed += 1;
                counter!("sink_errors_total").increment(1);
                tracing::error!(
                    error = ?e,
                    id = %entry.id,
                    title = entry.title.as_deref().unwrap_or_default(),
                    sink = sink.name(),
                    "upsert failed"
                );
            }
        }
    }
    out
}

pub fn build_sink(cfg: &SinkConfig) -> Result<DynSink> {
    match cfg.kind {
        SinkKind::Firestore => {
            let project = cfg
                .project_id
                .as_deref()
                .ok_or_else(|| anyhow!("firestore sink needs a project id"))?;
            let token = cfg
                .access_token
                .as_deref()
                .ok_or_else(|| anyhow!("firestore sink needs an access token"))?;
            Ok(Arc::new(FirestoreSink::new(
                project,
                &cfg.collection,
                token,
                cfg.endpoint.as_deref(),
                cfg.timeout_secs,
            )?))
        }
        SinkKind::Memory => Ok(Arc::new(MemorySink::new())),
    }
}
