// src/sink/firestore.rs
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::SecondsFormat;
use reqwest::Client;
use serde_json::{json, Map, Value};

use super::{DocumentSink, FieldValue, Fields};

const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";
const MAX_ATTEMPTS: u8 = 8;
const BASE_BACKOFF_MS: u64 = 500;

/// Delay before attempt `attempt + 1`: 500ms, 1s, 2s, ... (attempt starts at 1).
fn backoff(attempt: u8) -> Duration {
    let shift = u32::from(attempt.saturating_sub(1)).min(u32::from(MAX_ATTEMPTS));
    Duration::from_millis(BASE_BACKOFF_MS << shift)
}

/// Firestore REST sink. A PATCH with an update mask listing every written
/// leaf field is a merge-write: fields outside the mask are left untouched.
#[derive(Clone)]
pub struct FirestoreSink {
    client: Client,
    collection_url: String,
    token: String,
    max_retries: u8,
}

impl FirestoreSink {
    pub fn new(
        project: &str,
        collection: &str,
        token: &str,
        endpoint: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building firestore http client")?;
        let base = endpoint.unwrap_or(DEFAULT_ENDPOINT).trim_end_matches('/');
        Ok(Self {
            client,
            collection_url: format!(
                "{base}/v1/projects/{project}/databases/(default)/documents/{collection}"
            ),
            token: token.to_string(),
            max_retries: 3,
        })
    }

    /// Attempts per document, clamped to `1..=MAX_ATTEMPTS`.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.clamp(1, MAX_ATTEMPTS);
        self
    }

    pub fn document_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

#[async_trait::async_trait]
impl DocumentSink for FirestoreSink {
    async fn upsert(&self, id: &str, fields: &Fields) -> Result<()> {
        let body = json!({ "fields": encode_fields(fields) });
        let mask: Vec<(&str, String)> = mask_paths(fields)
            .into_iter()
            .map(|p| ("updateMask.fieldPaths", p))
            .collect();
        let url = self.document_url(id);

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .patch(&url)
                .bearer_auth(&self.token)
                .query(&mask)
                .json(&body)
                .send()
                .await;

            let retryable = match res {
                Ok(rsp) => {
                    let status = rsp.status();
                    if status.is_success() {
                        return Ok(());
                    }
                    if !status.is_server_error() || attempt >= self.max_retries {
                        let text = rsp.text().await.unwrap_or_default();
                        return Err(anyhow!(
                            "firestore PATCH {id} HTTP {status}: {}",
                            text.chars().take(200).collect::<String>()
                        ));
                    }
                    status.to_string()
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        return Err(anyhow!("firestore PATCH {id} failed: {e}"));
                    }
                    e.to_string()
                }
            };

            tracing::debug!(attempt, id, reason = %retryable, "firestore upsert retry");
            tokio::time::sleep(backoff(attempt)).await;
        }
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

/// Firestore `Value` JSON for a whole field map.
pub fn encode_fields(fields: &Fields) -> Value {
    let mut out = Map::with_capacity(fields.len());
    for (k, v) in fields {
        out.insert(k.clone(), encode_value(v));
    }
    Value::Object(out)
}

pub fn encode_value(v: &FieldValue) -> Value {
    match v {
        FieldValue::Null => json!({ "nullValue": null }),
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Double(x) => json!({ "doubleValue": x }),
        FieldValue::Timestamp(t) => {
            json!({ "timestampValue": t.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Map(m) => json!({ "mapValue": { "fields": encode_fields(m) } }),
    }
}

/// Dotted paths of every leaf, so nested maps merge key by key.
pub fn mask_paths(fields: &Fields) -> Vec<String> {
    let mut out = Vec::new();
    collect_paths(fields, "", &mut out);
    out
}

fn collect_paths(fields: &Fields, prefix: &str, out: &mut Vec<String>) {
    for (k, v) in fields {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match v {
            FieldValue::Map(m) if !m.is_empty() => collect_paths(m, &path, out),
            _ => out.push(path),
        }
    }
}
