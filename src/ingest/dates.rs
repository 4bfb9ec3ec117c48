// src/ingest/dates.rs
use chrono::{DateTime, Duration, Local};

use crate::error::{PipelineError, Result};
use crate::ingest::types::RawEntry;

/// Entries older than this are dropped unless configured otherwise.
pub fn default_freshness_window() -> Duration {
    Duration::hours(1)
}

/// Pick the entry's publication time and apply the freshness window.
///
/// `updated_parsed` wins over `published_parsed`. `Ok(None)` means "skip this
/// entry": it has no date at all, or the date is older than `window` at `now`.
/// Future dates are kept only up to one window ahead. A date whose fields do not form a real
/// instant is an error, not a skip.
pub fn resolve_date(
    entry: &RawEntry,
    now: DateTime<Local>,
    window: Duration,
) -> Result<Option<DateTime<Local>>> {
    let (field, raw) = match (entry.updated_parsed, entry.published_parsed) {
        (Some(t), _) => ("updated_parsed", t),
        (None, Some(t)) => ("published_parsed", t),
        (None, None) => return Ok(None),
    };

    let pubdate = raw.to_local().ok_or_else(|| PipelineError::MalformedDate {
        field,
        value: raw.to_string(),
    })?;

    Ok(is_fresh(pubdate, now, window).then_some(pubdate))
}

/// `pubdate` lies within `window` of `now`, in either direction.
#[inline]
pub fn is_fresh(pubdate: DateTime<Local>, now: DateTime<Local>, window: Duration) -> bool {
    let elapsed = now.signed_duration_since(pubdate);
    elapsed <= window && elapsed >= -window
}
