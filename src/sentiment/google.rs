// src/sentiment/google.rs
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Sentiment, SentimentAnalyzer};

const DEFAULT_ENDPOINT: &str = "https://language.googleapis.com";

/// Cloud Natural Language `documents:analyzeSentiment` over REST.
pub struct GoogleNlClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl GoogleNlClient {
    /// `endpoint`: base URL override (tests, emulators); defaults to the public API.
    pub fn new(api_key: String, endpoint: Option<&str>, timeout_secs: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("news-feed-ingestor/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("building sentiment http client")?;
        let base = endpoint.unwrap_or(DEFAULT_ENDPOINT).trim_end_matches('/');
        Ok(Self {
            http,
            url: format!("{base}/v1/documents:analyzeSentiment"),
            api_key,
        })
    }
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Req<'a> {
    document: Document<'a>,
    encoding_type: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Resp {
    document_sentiment: DocumentSentiment,
}

// The API leaves out zero-valued fields.
#[derive(Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f64,
    #[serde(default)]
    magnitude: f64,
}

#[async_trait]
impl SentimentAnalyzer for GoogleNlClient {
    async fn score(&self, text: &str) -> Result<Sentiment> {
        let req = Req {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };

        let resp = self
            .http
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await
            .context("analyzeSentiment request")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!(
                "analyzeSentiment HTTP {status}: {}",
                body.chars().take(200).collect::<String>()
            );
        }

        let body: Resp = resp.json().await.context("decoding analyzeSentiment body")?;
        Ok(Sentiment {
            score: body.document_sentiment.score,
            magnitude: body.document_sentiment.magnitude,
        })
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }
}
