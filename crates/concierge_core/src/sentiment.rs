use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::tokenize::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Normalizes whatever a pre-trained classifier emits: class indices
    /// ("0"/"1"/"2") or text labels in any casing.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "0" | "negative" => Some(Self::Negative),
            "1" | "neutral" => Some(Self::Neutral),
            "2" | "positive" => Some(Self::Positive),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub label: SentimentLabel,
    pub confidence: f32,
}

/// The boundary behind which the pre-trained classifier lives. The core only
/// ever calls `predict`; how the backend was trained or serialized is its own
/// business, so backends are swappable without touching retrieval code.
pub trait SentimentModel: Send + Sync {
    fn predict(&self, text: &str) -> Result<SentimentPrediction, SentimentError>;

    fn model_name(&self) -> &str;
}

impl SentimentModel for Box<dyn SentimentModel> {
    fn predict(&self, text: &str) -> Result<SentimentPrediction, SentimentError> {
        (**self).predict(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// On-disk lexicon format for [`LexiconSentimentModel`].
#[derive(Debug, Deserialize)]
struct LexiconArtifact {
    positive: Vec<String>,
    negative: Vec<String>,
}

/// Keyword-counting backend so the whole pipeline runs offline with no model
/// files. Counts positive and negative lexicon hits; confidence is the
/// winning side's share of all hits.
#[derive(Debug, Clone)]
pub struct LexiconSentimentModel {
    positive: HashSet<String>,
    negative: HashSet<String>,
    name: String,
}

const BUILTIN_POSITIVE: &[&str] = &[
    "amazing", "awesome", "best", "clean", "crispy", "delicious", "excellent", "fantastic",
    "fresh", "friendly", "generous", "good", "great", "love", "loved", "lovely", "perfect",
    "polite", "quick", "tasty", "warm", "wonderful",
];

const BUILTIN_NEGATIVE: &[&str] = &[
    "awful", "bad", "bland", "burnt", "cold", "dirty", "disappointing", "greasy", "hate",
    "horrible", "late", "mediocre", "overpriced", "raw", "rude", "salty", "slow", "soggy",
    "stale", "terrible", "undercooked", "worst",
];

impl LexiconSentimentModel {
    pub fn builtin() -> Self {
        Self {
            positive: BUILTIN_POSITIVE.iter().map(|w| w.to_string()).collect(),
            negative: BUILTIN_NEGATIVE.iter().map(|w| w.to_string()).collect(),
            name: "builtin-lexicon".to_string(),
        }
    }

    /// Loads the lexicon artifact from disk. A missing file is reported as
    /// its own failure kind before any prediction is attempted.
    pub fn load(path: &Path) -> Result<Self, SentimentError> {
        if !path.exists() {
            return Err(SentimentError::ArtifactMissing(path.to_path_buf()));
        }
        let text =
            fs::read_to_string(path).map_err(|e| SentimentError::ArtifactMalformed(e.to_string()))?;
        let artifact: LexiconArtifact = serde_json::from_str(&text)
            .map_err(|e| SentimentError::ArtifactMalformed(e.to_string()))?;

        if artifact.positive.is_empty() || artifact.negative.is_empty() {
            return Err(SentimentError::ArtifactMalformed(
                "lexicon must list both positive and negative terms".to_string(),
            ));
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "lexicon".to_string());

        Ok(Self {
            positive: artifact
                .positive
                .iter()
                .map(|w| w.to_ascii_lowercase())
                .collect(),
            negative: artifact
                .negative
                .iter()
                .map(|w| w.to_ascii_lowercase())
                .collect(),
            name,
        })
    }
}

impl SentimentModel for LexiconSentimentModel {
    fn predict(&self, text: &str) -> Result<SentimentPrediction, SentimentError> {
        // Sentiment cares about every word, so stop words stay in.
        let tokens = Tokenizer::new(false).tokenize(text);
        if tokens.is_empty() {
            return Err(SentimentError::EmptyInput);
        }

        let positive = tokens.iter().filter(|t| self.positive.contains(*t)).count() as f32;
        let negative = tokens.iter().filter(|t| self.negative.contains(*t)).count() as f32;

        let (label, confidence) = if positive > negative {
            (SentimentLabel::Positive, positive / (positive + negative))
        } else if negative > positive {
            (SentimentLabel::Negative, negative / (positive + negative))
        } else {
            (SentimentLabel::Neutral, 0.5)
        };

        Ok(SentimentPrediction { label, confidence })
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
