use serde::{Deserialize, Serialize};

/// Question-scaffolding words stripped before indexing. Sorted for binary
/// search; what matters is that the index and query sides agree, not that the
/// list is exhaustive.
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "can", "could", "do", "does",
    "for", "from", "had", "has", "have", "how", "i", "if", "in", "is", "it", "its", "me", "my",
    "of", "on", "or", "our", "please", "shall", "should", "so", "tell", "that", "the", "their",
    "them", "there", "they", "this", "to", "us", "was", "we", "were", "what", "when", "where",
    "which", "who", "will", "with", "would", "you", "your",
];

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Lowercase, strip punctuation, collapse whitespace. Used as the
/// deduplication key when synthesizing corpus entries.
pub fn normalize(text: &str) -> String {
    text.to_ascii_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tokenization rules shared by index build and query embedding. The two
/// sides must use the same instance; the index stores its tokenizer so a
/// query can never be split differently from the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenizer {
    strip_stop_words: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            strip_stop_words: true,
        }
    }
}

impl Tokenizer {
    pub fn new(strip_stop_words: bool) -> Self {
        Self { strip_stop_words }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_ascii_lowercase()
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .filter(|t| !(self.strip_stop_words && is_stop_word(t)))
            .map(str::to_string)
            .collect()
    }
}
