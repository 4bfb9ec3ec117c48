// tests/ingest_normalize.rs
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{Duration, Local};
use news_feed_ingestor::sanitize::{Sanitizer, TagStripper};
use news_feed_ingestor::sentiment::{Sentiment, SentimentAnalyzer};
use news_feed_ingestor::{Channel, EntryNormalizer, MediaRef, RawEntry, RawTime};

#[derive(Default)]
struct RecordingSentiment {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl SentimentAnalyzer for RecordingSentiment {
    async fn score(&self, text: &str) -> Result<Sentiment> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(Sentiment {
            score: 0.123,
            magnitude: 1.987,
        })
    }
    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

struct FailingSentiment;

#[async_trait]
impl SentimentAnalyzer for FailingSentiment {
    async fn score(&self, _text: &str) -> Result<Sentiment> {
        bail!("quota exceeded")
    }
    fn provider_name(&self) -> &'static str {
        "failing"
    }
}

fn fresh() -> Option<RawTime> {
    Some(RawTime::from(Local::now() - Duration::minutes(10)))
}

fn channel() -> Channel {
    Channel {
        title: Some("Wire".into()),
        link: Some("http://wire.test/".into()),
        language: Some("en".into()),
        updated_at: None,
    }
}

#[test]
fn sanitizer_drops_script_and_keeps_text() {
    let out = TagStripper.sanitize("<script>x</script>hello").unwrap();
    assert!(!out.contains('<') && !out.contains('>'));
    assert!(out.contains("hello"));
}

#[tokio::test]
async fn fresh_entry_becomes_a_full_record() {
    let sentiment = Arc::new(RecordingSentiment::default());
    let n = EntryNormalizer::new(Arc::new(TagStripper), sentiment.clone());
    let entry = RawEntry {
        title: Some("A".into()),
        summary: Some("<b>B</b>".into()),
        link: Some("http://x/a".into()),
        published_parsed: fresh(),
        enclosures: vec![],
        links: vec![MediaRef::new("image/jpeg", "http://x/i.jpg")],
        ..Default::default()
    };

    let rec = n.normalize(&entry, &channel()).await.unwrap().expect("fresh");
    assert_eq!(rec.title.as_deref(), Some("A"));
    assert_eq!(rec.summary, "B");
    assert_eq!(rec.link.as_deref(), Some("http://x/a"));
    assert_eq!(rec.image.as_deref(), Some("http://x/i.jpg"));
    assert!(rec.video.is_none());
    assert_eq!(rec.sentiment_score, Some(0.12));
    assert_eq!(rec.sentiment_magnitude, Some(1.99));
    assert_eq!(rec.feed, channel());
    assert!(!rec.id.is_empty());

    // Sentiment sees the title and the sanitized summary, not markup.
    let calls = sentiment.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with('A'));
    assert!(calls[0].ends_with('B'));
    assert!(!calls[0].contains("<b>"));
}

#[tokio::test]
async fn no_title_means_no_sentiment_fields() {
    let sentiment = Arc::new(RecordingSentiment::default());
    let n = EntryNormalizer::new(Arc::new(TagStripper), sentiment.clone());

    for title in [None, Some(String::new())] {
        let entry = RawEntry {
            title,
            summary: Some("body".into()),
            published_parsed: fresh(),
            ..Default::default()
        };
        let rec = n.normalize(&entry, &channel()).await.unwrap().unwrap();
        assert!(rec.sentiment_score.is_none());
        assert!(rec.sentiment_magnitude.is_none());

        let fields = rec.to_fields();
        assert!(!fields.contains_key("sentiment_score"));
        assert!(!fields.contains_key("sentiment_magnitude"));

        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("sentiment_score").is_none());
    }
    assert!(sentiment.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_summary_is_empty_text() {
    let n = EntryNormalizer::new(
        Arc::new(TagStripper),
        Arc::new(RecordingSentiment::default()),
    );
    let entry = RawEntry {
        title: Some("t".into()),
        published_parsed: fresh(),
        ..Default::default()
    };
    let rec = n.normalize(&entry, &channel()).await.unwrap().unwrap();
    assert_eq!(rec.summary, "");
}

#[tokio::test]
async fn stale_entry_has_no_side_effects() {
    let sentiment = Arc::new(RecordingSentiment::default());
    let n = EntryNormalizer::new(Arc::new(TagStripper), sentiment.clone());
    let entry = RawEntry {
        title: Some("old".into()),
        published_parsed: Some(RawTime::from(Local::now() - Duration::hours(5))),
        ..Default::default()
    };
    assert!(n.normalize(&entry, &channel()).await.unwrap().is_none());
    assert!(sentiment.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn sentiment_failure_propagates() {
    let n = EntryNormalizer::new(Arc::new(TagStripper), Arc::new(FailingSentiment));
    let entry = RawEntry {
        title: Some("t".into()),
        published_parsed: fresh(),
        ..Default::default()
    };
    let err = n.normalize(&entry, &channel()).await.unwrap_err();
    assert!(err.to_string().contains("quota"));
}

#[tokio::test]
async fn each_record_gets_its_own_id() {
    let n = EntryNormalizer::new(
        Arc::new(TagStripper),
        Arc::new(RecordingSentiment::default()),
    );
    let entry = RawEntry {
        published_parsed: fresh(),
        ..Default::default()
    };
    let a = n.normalize(&entry, &channel()).await.unwrap().unwrap();
    let b = n.normalize(&entry, &channel()).await.unwrap().unwrap();
    assert_ne!(a.id, b.id);
}
