use serde::{Deserialize, Serialize};

/// Returned when no FAQ entry clears the similarity threshold.
pub const DEFAULT_FALLBACK_ANSWER: &str = "I couldn't find a close FAQ match.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Hit,
    Miss,
}

/// A runner-up question surfaced alongside the best match, for
/// "did you mean" style suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub question: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalMatch {
    pub entry_index: Option<usize>,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub score: f32,
    pub decision: Decision,
    pub candidates: Vec<Candidate>,
}

impl RetrievalMatch {
    pub fn miss(score: f32, candidates: Vec<Candidate>) -> Self {
        Self {
            entry_index: None,
            question: None,
            answer: None,
            score,
            decision: Decision::Miss,
            candidates,
        }
    }

    pub fn answer_or_fallback(&self) -> &str {
        self.answer.as_deref().unwrap_or(DEFAULT_FALLBACK_ANSWER)
    }
}
