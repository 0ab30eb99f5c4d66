use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::index::TfidfIndex;
use crate::store::Corpus;

/// A corpus and its built index, persisted together so building and querying
/// can happen in separate processes. The pair is immutable once written; a
/// changed corpus means a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub corpus: Corpus,
    pub index: TfidfIndex,
    pub built_at: DateTime<Utc>,
}

impl IndexSnapshot {
    pub fn new(corpus: Corpus, index: TfidfIndex) -> Self {
        Self {
            corpus,
            index,
            built_at: Utc::now(),
        }
    }
}

pub fn save_snapshot(path: &Path, snapshot: &IndexSnapshot) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).context("serialize index snapshot")?;
    writer.flush().context("flush snapshot")
}

pub fn load_snapshot(path: &Path) -> Result<IndexSnapshot> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).context("parse index snapshot")
}
