// src/ingest/media.rs
use crate::ingest::types::MediaRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaLinks {
    pub image: Option<String>,
    pub video: Option<String>,
}

/// Pick image/video references from an entry.
///
/// Only one list is consulted: `enclosures` when it has any item, otherwise
/// `links`. Every item is scanned, so the last match of each kind wins.
pub fn resolve_media(enclosures: &[MediaRef], links: &[MediaRef]) -> MediaLinks {
    let candidates = if enclosures.is_empty() {
        links
    } else {
        enclosures
    };

    let mut out = MediaLinks::default();
    for item in candidates {
        if item.kind.contains("image") {
            out.image = Some(item.href.clone());
        }
        if item.kind.contains("video") {
            out.video = Some(item.href.clone());
        }
    }
    out
}
