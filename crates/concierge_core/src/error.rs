use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading the FAQ corpus. All of these are fatal to startup:
/// no partial corpus is ever accepted.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("FAQ source not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error reading FAQ source: {0}")]
    Io(#[from] io::Error),

    #[error("FAQ source is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("FAQ source must be a JSON array of records or a hotel document object")]
    UnsupportedRoot,

    #[error("entry {index}: missing or empty '{field}' field")]
    EmptyField { index: usize, field: &'static str },
}

/// Failures on the sentiment path. Kept separate from [`CorpusError`] so the
/// caller never confuses a broken model artifact with a broken FAQ file.
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("sentiment artifact not found: {0}")]
    ArtifactMissing(PathBuf),

    #[error("sentiment artifact is malformed: {0}")]
    ArtifactMalformed(String),

    #[error("cannot score an empty review")]
    EmptyInput,
}
