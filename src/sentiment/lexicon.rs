// src/sentiment/lexicon.rs
use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::{Sentiment, SentimentAnalyzer};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Squashes the raw sum into (-1, 1); larger alpha flattens the curve.
const ALPHA: f64 = 15.0;
/// Lexicon weights run from -5 to 5.
const MAX_WEIGHT: f64 = 5.0;

/// Offline scorer: word lexicon with simple negation handling.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// A negator within the previous 1..=3 tokens flips the sign of a word.
    pub fn score_text(&self, text: &str) -> Sentiment {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut sum = 0i32;
        let mut intensity = 0i32;

        for i in 0..tokens.len() {
            let base = self.word_score(&tokens[i]);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(&tokens[i - k]));
            sum += if negated { -base } else { base };
            intensity += base.abs();
        }

        let sum = f64::from(sum);
        let score = if sum == 0.0 {
            0.0
        } else {
            sum / (sum * sum + ALPHA).sqrt()
        };
        Sentiment {
            score,
            magnitude: f64::from(intensity) / MAX_WEIGHT,
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentiment {
    async fn score(&self, text: &str) -> Result<Sentiment> {
        Ok(self.score_text(text))
    }
    fn provider_name(&self) -> &'static str {
        "lexicon"
    }
}

/// Lower-cased alphanumeric tokens; inner apostrophes are kept ("isn't").
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '\u{2019}'))
        .map(|t| t.trim_matches(|c| c == '\'' || c == '\u{2019}'))
        .filter(|t| !t.is_empty())
        .map(|t| t.replace('\u{2019}', "'").to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "didn't"
            | "without"
    )
}
