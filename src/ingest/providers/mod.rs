// src/ingest/providers/mod.rs
pub mod fixture;
pub mod http;

use anyhow::{Context, Result};
use chrono::Local;
use feed_rs::model::{Entry, Link};

use crate::ingest::types::{Channel, FetchedFeed, MediaRef, RawEntry, RawTime};

pub use fixture::FixtureFetcher;
pub use http::HttpFeedFetcher;

/// Parse an RSS 2.0, RSS 1.0 (RDF) or Atom document into channel + raw entries.
pub fn parse_feed(bytes: &[u8]) -> Result<FetchedFeed> {
    let feed = feed_rs::parser::parse(bytes).context("parsing feed document")?;

    let channel = Channel {
        title: feed.title.map(|t| t.content),
        link: primary_link(&feed.links),
        language: feed.language,
        updated_at: feed.updated.map(|t| t.with_timezone(&Local)),
    };

    let entries = feed.entries.into_iter().map(raw_entry).collect();
    Ok(FetchedFeed { channel, entries })
}

fn raw_entry(e: Entry) -> RawEntry {
    // RSS <enclosure> and media:* elements land in `media`; Atom uses rel="enclosure" links.
    let mut enclosures = Vec::new();
    for media in &e.media {
        for c in &media.content {
            if let Some(url) = &c.url {
                let kind = c
                    .content_type
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                enclosures.push(MediaRef::new(kind, url.to_string()));
            }
        }
    }
    enclosures.extend(
        e.links
            .iter()
            .filter(|l| is_rel(l, "enclosure"))
            .map(media_ref),
    );

    let link = primary_link(&e.links);

    RawEntry {
        title: e.title.map(|t| t.content),
        summary: e
            .summary
            .map(|t| t.content)
            .or_else(|| e.content.and_then(|c| c.body)),
        link,
        updated_parsed: e.updated.map(RawTime::from),
        published_parsed: e.published.map(RawTime::from),
        enclosures,
        links: e.links.iter().map(media_ref).collect(),
    }
}

/// The page link: no `rel` or `rel="alternate"`, else whatever comes first.
/// RSS feeds often put `<atom:link rel="self">` ahead of `<link>`.
fn primary_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.is_none() || is_rel(l, "alternate"))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
}

fn is_rel(l: &Link, rel: &str) -> bool {
    l.rel.as_deref().is_some_and(|r| r.eq_ignore_ascii_case(rel))
}

fn media_ref(l: &Link) -> MediaRef {
    MediaRef::new(l.media_type.clone().unwrap_or_default(), l.href.clone())
}
