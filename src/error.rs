// src/error.rs
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A structured date is present on the entry but does not form a real date/time.
    #[error("malformed {field}: {value}")]
    MalformedDate { field: &'static str, value: String },

    #[error("feed source {locator} failed: {source}")]
    Source {
        locator: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("all {count} feed sources failed")]
    AllSourcesFailed { count: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
