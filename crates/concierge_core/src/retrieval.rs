use serde::{Deserialize, Serialize};

use crate::index::{SparseVector, TfidfIndex};
use crate::model::{Candidate, Decision, RetrievalMatch};
use crate::store::Corpus;
use crate::tokenize::Tokenizer;

pub const DEFAULT_THRESHOLD: f32 = 0.2;
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Minimum cosine similarity for a match; strictly below falls back.
    pub threshold: f32,
    /// How many runner-up questions to surface alongside the best match.
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Cosine similarity between two sparse vectors, 0.0 whenever either side has
/// zero magnitude so an all-stop-word text never produces NaN.
pub fn cosine_sparse(a: &SparseVector, b: &SparseVector) -> f32 {
    if a.norm == 0.0 || b.norm == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let (mut i, mut j) = (0, 0);
    while i < a.weights.len() && j < b.weights.len() {
        let (ta, wa) = a.weights[i];
        let (tb, wb) = b.weights[j];
        if ta == tb {
            dot += wa * wb;
            i += 1;
            j += 1;
        } else if ta < tb {
            i += 1;
        } else {
            j += 1;
        }
    }

    (dot / (a.norm * b.norm)).clamp(0.0, 1.0)
}

/// Scores the query against every entry vector, best first. The sort is
/// stable, so entries with equal scores keep their corpus order and the
/// lowest original index wins ties.
pub fn rank(query: &SparseVector, index: &TfidfIndex) -> Vec<(usize, f32)> {
    let mut scored: Vec<(usize, f32)> = index
        .vectors()
        .iter()
        .enumerate()
        .map(|(i, v)| (i, cosine_sparse(query, v)))
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
}

pub fn top_k(query: &SparseVector, index: &TfidfIndex, k: usize) -> Vec<(usize, f32)> {
    let mut ranked = rank(query, index);
    ranked.truncate(k);
    ranked
}

/// Answers a query against a fixed corpus and index. Pure function of its
/// inputs: repeated calls return identical results.
pub fn answer(
    query: &str,
    index: &TfidfIndex,
    corpus: &Corpus,
    config: &RetrieverConfig,
) -> RetrievalMatch {
    let query_vector = index.embed_query(query);
    let ranked = rank(&query_vector, index);

    let Some(&(best_index, best_score)) = ranked.first() else {
        return RetrievalMatch::miss(0.0, Vec::new());
    };

    let candidates: Vec<Candidate> = ranked
        .iter()
        .skip(1)
        .take(config.top_k)
        .map(|&(i, score)| Candidate {
            question: corpus.entries[i].question.clone(),
            score,
        })
        .collect();

    if best_score < config.threshold {
        return RetrievalMatch::miss(best_score, candidates);
    }

    let entry = &corpus.entries[best_index];
    RetrievalMatch {
        entry_index: Some(best_index),
        question: Some(entry.question.clone()),
        answer: Some(entry.answer.clone()),
        score: best_score,
        decision: Decision::Hit,
        candidates,
    }
}

/// Bundles a corpus with its index so callers hold one value. The index is
/// built once in `new` and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FaqRetriever {
    corpus: Corpus,
    index: TfidfIndex,
    config: RetrieverConfig,
}

impl FaqRetriever {
    pub fn new(corpus: Corpus, config: RetrieverConfig) -> Self {
        Self::with_tokenizer(corpus, Tokenizer::default(), config)
    }

    pub fn with_tokenizer(corpus: Corpus, tokenizer: Tokenizer, config: RetrieverConfig) -> Self {
        let index = TfidfIndex::build(&corpus, tokenizer);
        Self {
            corpus,
            index,
            config,
        }
    }

    /// Reassembles a retriever from a previously built corpus and index,
    /// e.g. one loaded from a snapshot file.
    pub fn from_parts(corpus: Corpus, index: TfidfIndex, config: RetrieverConfig) -> Self {
        Self {
            corpus,
            index,
            config,
        }
    }

    pub fn answer(&self, query: &str) -> RetrievalMatch {
        answer(query, &self.index, &self.corpus, &self.config)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn index(&self) -> &TfidfIndex {
        &self.index
    }

    pub fn config(&self) -> RetrieverConfig {
        self.config
    }

    pub fn index_size(&self) -> usize {
        self.corpus.len()
    }
}
