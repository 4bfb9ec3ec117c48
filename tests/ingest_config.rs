// tests/ingest_config.rs
use std::fs;

use news_feed_ingestor::config::{AppConfig, IdStrategy, SentimentProvider, SinkKind};
use news_feed_ingestor::ingest::config::load_sources_from;
use serial_test::serial;
use tempfile::tempdir;

#[test]
fn toml_and_json_source_lists_agree() {
    let dir = tempdir().unwrap();
    let toml_p = dir.path().join("feeds.toml");
    let json_p = dir.path().join("feeds.json");
    fs::write(
        &toml_p,
        "feeds = [\"http://a/rss\", \" http://b/rss \", \"\", \"http://a/rss\"]\n",
    )
    .unwrap();
    fs::write(&json_p, r#"{"feeds": ["http://a/rss", "http://b/rss"]}"#).unwrap();

    let from_toml = load_sources_from(&toml_p).unwrap();
    let from_json = load_sources_from(&json_p).unwrap();
    assert_eq!(from_toml, vec!["http://a/rss", "http://b/rss"]);
    assert_eq!(from_toml, from_json);
}

#[test]
fn bare_json_array_is_accepted() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("feeds.json");
    fs::write(&p, r#"["http://only/rss"]"#).unwrap();
    assert_eq!(load_sources_from(&p).unwrap(), vec!["http://only/rss"]);
}

#[test]
fn shipped_feed_list_loads() {
    let list = load_sources_from(std::path::Path::new("config/feeds.toml")).unwrap();
    assert!(!list.is_empty());
    assert!(list.iter().all(|l| l.starts_with("http")));
}

#[test]
#[serial]
fn env_placeholders_resolve_for_selected_providers() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("ingestor.toml");
    fs::write(
        &p,
        r#"
freshness_window_secs = 7200
id_strategy = "publish_time"

[sentiment]
provider = "google"
api_key = "ENV"

[sink]
kind = "firestore"
project_id = "ENV"
access_token = "ENV"
collection = "news"
"#,
    )
    .unwrap();

    std::env::set_var("GOOGLE_NL_API_KEY", "k-123");
    std::env::set_var("FIRESTORE_PROJECT_ID", "proj");
    std::env::set_var("FIRESTORE_ACCESS_TOKEN", "tok");
    let cfg = AppConfig::load_from_file(&p).unwrap();
    std::env::remove_var("GOOGLE_NL_API_KEY");
    std::env::remove_var("FIRESTORE_PROJECT_ID");
    std::env::remove_var("FIRESTORE_ACCESS_TOKEN");

    assert_eq!(cfg.freshness_window(), chrono::Duration::hours(2));
    assert_eq!(cfg.id_strategy, IdStrategy::PublishTime);
    assert_eq!(cfg.sentiment.provider, SentimentProvider::Google);
    assert_eq!(cfg.sentiment.api_key.as_deref(), Some("k-123"));
    assert_eq!(cfg.sink.kind, SinkKind::Firestore);
    assert_eq!(cfg.sink.project_id.as_deref(), Some("proj"));
    assert_eq!(cfg.sink.collection, "news");
}

#[test]
#[serial]
fn missing_credentials_fail_at_load() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("ingestor.json");
    fs::write(&p, r#"{"sink": {"kind": "memory"}}"#).unwrap();

    std::env::remove_var("GOOGLE_NL_API_KEY");
    let err = AppConfig::load_from_file(&p).unwrap_err();
    assert!(format!("{err:#}").contains("GOOGLE_NL_API_KEY"));
}

#[test]
#[serial]
fn offline_config_needs_no_env() {
    let dir = tempdir().unwrap();
    let p = dir.path().join("ingestor.json");
    fs::write(
        &p,
        r#"{"max_concurrency": 8, "sentiment": {"provider": "lexicon"}, "sink": {"kind": "memory"}}"#,
    )
    .unwrap();
    let cfg = AppConfig::load_from_file(&p).unwrap();
    assert_eq!(cfg.max_concurrency, 8);
    assert_eq!(cfg.freshness_window_secs, 3600);
}
