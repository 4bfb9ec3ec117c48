// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "FEEDS_CONFIG_PATH";

/// Feed locators from a TOML (`feeds = [...]`) or JSON file. The extension
/// picks the format; a file without one is tried as JSON, then TOML.
pub fn load_sources_from(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed sources from {}", path.display()))?;
    let format = path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase);
    let parsed = match format.as_deref() {
        Some("toml") => parse_toml(&content),
        Some("json") => parse_json(&content),
        _ => parse_json(&content).or_else(|_| parse_toml(&content)),
    };
    parsed.with_context(|| format!("unsupported feed sources format in {}", path.display()))
}

/// `$FEEDS_CONFIG_PATH`, else `config/feeds.toml`, else `config/feeds.json`.
/// No file at all is an empty list, not an error.
pub fn load_sources_default() -> Result<Vec<String>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("{ENV_PATH} points to non-existent path"));
        }
        return load_sources_from(&pb);
    }
    match ["config/feeds.toml", "config/feeds.json"]
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
    {
        Some(p) => load_sources_from(&p),
        None => Ok(Vec::new()),
    }
}

#[derive(serde::Deserialize)]
struct FeedList {
    feeds: Vec<String>,
}

fn parse_toml(s: &str) -> Result<Vec<String>> {
    let v: FeedList = toml::from_str(s)?;
    Ok(clean_list(v.feeds))
}

fn parse_json(s: &str) -> Result<Vec<String>> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum JsonFeeds {
        Bare(Vec<String>),
        Wrapped(FeedList),
    }
    let v = match serde_json::from_str::<JsonFeeds>(s)? {
        JsonFeeds::Bare(v) => v,
        JsonFeeds::Wrapped(w) => w.feeds,
    };
    Ok(clean_list(v))
}

/// Trim, drop empties and repeats; first occurrence keeps its position.
fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(items.len());
    for it in items {
        let t = it.trim();
        if !t.is_empty() && seen.insert(t.to_string()) {
            out.push(t.to_string());
        }
    }
    out
}
