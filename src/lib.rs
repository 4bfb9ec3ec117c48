// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod pipeline;
pub mod sanitize;
pub mod sentiment;
pub mod sink;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::error::PipelineError;
pub use crate::ingest::types::{Channel, FetchedFeed, MediaRef, RawEntry, RawTime};
pub use crate::ingest::normalize::{EntryNormalizer, NormalizedEntry};
pub use crate::pipeline::{Pipeline, RunReport};
