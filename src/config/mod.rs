// src/config/mod.rs
pub mod app;

pub use app::{
    AppConfig, FetchConfig, IdStrategy, SentimentConfig, SentimentProvider, SinkConfig, SinkKind,
};
