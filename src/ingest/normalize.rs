// src/ingest/normalize.rs
//! # Entry Normalizer
//! Turns one raw feed entry into the record that gets persisted, or into
//! nothing when the entry has no fresh date.
//!
//! Errors from the sanitizer and the sentiment provider are not handled
//! here; the aggregator decides what a failed entry means for the run.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::IdStrategy;
use crate::ingest::dates::{default_freshness_window, resolve_date};
use crate::ingest::media::resolve_media;
use crate::ingest::types::{Channel, RawEntry};
use crate::sanitize::Sanitizer;
use crate::sentiment::DynSentiment;
use crate::sink::{FieldValue, Fields};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedEntry {
    pub id: String,
    pub title: Option<String>,
    /// Plain text, never markup.
    pub summary: String,
    pub link: Option<String>,
    pub pubdate: DateTime<Local>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_magnitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    pub feed: Channel,
}

impl NormalizedEntry {
    /// Document fields for the sink, without `id`. Missing title/link are
    /// written as nulls; missing sentiment and media keys are left out.
    pub fn to_fields(&self) -> Fields {
        let mut f = Fields::new();
        f.insert("title".into(), FieldValue::from(self.title.clone()));
        f.insert("summary".into(), FieldValue::String(self.summary.clone()));
        f.insert("link".into(), FieldValue::from(self.link.clone()));
        f.insert(
            "pubdate".into(),
            FieldValue::Timestamp(self.pubdate.with_timezone(&Utc)),
        );
        if let Some(score) = self.sentiment_score {
            f.insert("sentiment_score".into(), FieldValue::Double(score));
        }
        if let Some(magnitude) = self.sentiment_magnitude {
            f.insert("sentiment_magnitude".into(), FieldValue::Double(magnitude));
        }
        if let Some(image) = &self.image {
            f.insert("image".into(), FieldValue::String(image.clone()));
        }
        if let Some(video) = &self.video {
            f.insert("video".into(), FieldValue::String(video.clone()));
        }
        f.insert("feed".into(), FieldValue::Map(channel_fields(&self.feed)));
        f
    }
}

fn channel_fields(ch: &Channel) -> Fields {
    let mut f = Fields::new();
    f.insert("title".into(), FieldValue::from(ch.title.clone()));
    f.insert("link".into(), FieldValue::from(ch.link.clone()));
    f.insert("language".into(), FieldValue::from(ch.language.clone()));
    f.insert(
        "updated_date".into(),
        ch.updated_at
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)))
            .unwrap_or(FieldValue::Null),
    );
    f
}

pub struct EntryNormalizer {
    sanitizer: Arc<dyn Sanitizer>,
    sentiment: DynSentiment,
    window: Duration,
    id_strategy: IdStrategy,
}

impl EntryNormalizer {
    pub fn new(sanitizer: Arc<dyn Sanitizer>, sentiment: DynSentiment) -> Self {
        Self {
            sanitizer,
            sentiment,
            window: default_freshness_window(),
            id_strategy: IdStrategy::default(),
        }
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Normalize against the wall clock at the moment of the call.
    pub async fn normalize(
        &self,
        entry: &RawEntry,
        channel: &Channel,
    ) -> Result<Option<NormalizedEntry>> {
        self.normalize_at(entry, channel, Local::now()).await
    }

    pub async fn normalize_at(
        &self,
        entry: &RawEntry,
        channel: &Channel,
        now: DateTime<Local>,
    ) -> Result<Option<NormalizedEntry>> {
        let Some(pubdate) = resolve_date(entry, now, self.window)? else {
            return Ok(None);
        };

        let id = match self.id_strategy {
            IdStrategy::Random => Uuid::new_v4().simple().to_string(),
            IdStrategy::PublishTime => pubdate.timestamp().to_string(),
        };

        let summary = self
            .sanitizer
            .sanitize(entry.summary.as_deref().unwrap_or_default())?;

        let (sentiment_score, sentiment_magnitude) = match entry.title.as_deref() {
            Some(title) if !title.is_empty() => {
                let text = format!("{title}\n{summary}");
                let s = self.sentiment.score(&text).await?.rounded();
                tracing::debug!(
                    title,
                    score = s.score,
                    magnitude = s.magnitude,
                    provider = self.sentiment.provider_name(),
                    "sentiment"
                );
                (Some(s.score), Some(s.magnitude))
            }
            _ => (None, None),
        };

        let media = resolve_media(&entry.enclosures, &entry.links);

        Ok(Some(NormalizedEntry {
            id,
            title: entry.title.clone(),
            summary,
            link: entry.link.clone(),
            pubdate,
            sentiment_score,
            sentiment_magnitude,
            image: media.image,
            video: media.video,
            feed: channel.clone(),
        }))
    }
}
