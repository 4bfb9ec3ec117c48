// src/sanitize.rs
use anyhow::Result;
use once_cell::sync::OnceCell;
use regex::Regex;

/// Turns free text that may carry markup into plain text.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, text: &str) -> Result<String>;
}

/// Strips tags, drops `<script>`/`<style>` bodies, decodes entities and folds whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagStripper;

impl Sanitizer for TagStripper {
    fn sanitize(&self, text: &str) -> Result<String> {
        Ok(strip_markup(text))
    }
}

pub fn strip_markup(s: &str) -> String {
    static RE_BLOCKS: OnceCell<Regex> = OnceCell::new();
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();
    static RE_WS: OnceCell<Regex> = OnceCell::new();

    let re_blocks = RE_BLOCKS.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</\s*(script|style)\s*>").unwrap()
    });
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)<!--.*?-->|</?[a-z!][^>]*>").unwrap());
    let re_ws = RE_WS.get_or_init(|| Regex::new(r"\s+").unwrap());

    // 1) Remove executable/style blocks together with their bodies
    let out = re_blocks.replace_all(s, " ");

    // 2) Strip tags
    let out = re_tags.replace_all(&out, " ");

    // 3) Entity decode; encoded markup (&lt;b&gt;) becomes real tags here, strip again
    let out = html_escape::decode_html_entities(&out).to_string();
    let out = re_blocks.replace_all(&out, " ");
    let out = re_tags.replace_all(&out, " ");

    // 4) Collapse whitespace (incl. nbsp)
    let out = out.replace('\u{00A0}', " ");
    re_ws.replace_all(&out, " ").trim().to_string()
}
