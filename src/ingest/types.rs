// src/ingest/types.rs
use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Broken-down calendar time as handed over by a feed parser, always in UTC.
/// Fields are not validated on construction; see [`RawTime::to_local`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl RawTime {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Concrete local timestamp, or `None` when the fields do not name a real instant.
    pub fn to_local(&self) -> Option<DateTime<Local>> {
        let naive = NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(
            self.hour,
            self.minute,
            self.second,
        )?;
        Some(Utc.from_utc_datetime(&naive).with_timezone(&Local))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RawTime {
    fn from(dt: DateTime<Tz>) -> Self {
        let utc = dt.with_timezone(&Utc);
        Self::new(
            utc.year(),
            utc.month(),
            utc.day(),
            utc.hour(),
            utc.minute(),
            utc.second(),
        )
    }
}

impl fmt::Display for RawTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// One enclosure or link of an entry. `kind` is the MIME-like type, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub href: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl MediaRef {
    pub fn new(kind: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            kind: kind.into(),
        }
    }
}

/// One unprocessed item of a parsed feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub updated_parsed: Option<RawTime>,
    pub published_parsed: Option<RawTime>,
    #[serde(default)]
    pub enclosures: Vec<MediaRef>,
    #[serde(default)]
    pub links: Vec<MediaRef>,
}

/// Metadata of a feed source as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub title: Option<String>,
    pub link: Option<String>,
    pub language: Option<String>,
    pub updated_at: Option<DateTime<Local>>,
}

#[derive(Debug, Clone, Default)]
pub struct FetchedFeed {
    pub channel: Channel,
    pub entries: Vec<RawEntry>,
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<FetchedFeed>;
    fn name(&self) -> &'static str;
}
