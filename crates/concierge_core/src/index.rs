use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::Corpus;
use crate::tokenize::Tokenizer;

/// A TF-IDF weighted document vector. Weights are (term id, weight) pairs
/// sorted by term id; the L2 norm is precomputed for cosine scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    pub weights: Vec<(usize, f32)>,
    pub norm: f32,
}

impl SparseVector {
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// TF-IDF index over the questions of a corpus. Built exactly once per corpus
/// snapshot; read-only afterwards, so it can be shared across threads freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfIndex {
    tokenizer: Tokenizer,
    vocab: HashMap<String, usize>,
    idf: Vec<f32>,
    vectors: Vec<SparseVector>,
}

impl TfidfIndex {
    /// Tokenizes every question, assigns vocabulary ids in first-seen order,
    /// computes smoothed IDF weights and one sparse vector per entry.
    ///
    /// `idf = ln((1 + N) / (1 + df)) + 1`, so a term occurring in every
    /// document still carries a positive weight and nothing divides by zero.
    pub fn build(corpus: &Corpus, tokenizer: Tokenizer) -> Self {
        if corpus.is_empty() {
            tracing::warn!("building index over an empty corpus; every query will miss");
        }

        let docs: Vec<Vec<String>> = corpus
            .entries
            .iter()
            .map(|e| tokenizer.tokenize(&e.question))
            .collect();

        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<u32> = Vec::new();
        for tokens in &docs {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens {
                let id = match vocab.get(token) {
                    Some(&id) => id,
                    None => {
                        let id = vocab.len();
                        vocab.insert(token.clone(), id);
                        df.push(0);
                        id
                    }
                };
                if seen.insert(id) {
                    df[id] += 1;
                }
            }
        }

        let n = docs.len() as f32;
        let idf: Vec<f32> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        let vectors: Vec<SparseVector> = docs
            .par_iter()
            .map(|tokens| weigh(tokens, &vocab, &idf))
            .collect();

        tracing::debug!(
            entries = vectors.len(),
            vocabulary = vocab.len(),
            "built TF-IDF index"
        );

        Self {
            tokenizer,
            vocab,
            idf,
            vectors,
        }
    }

    /// Projects a query into the index's vector space using the identical
    /// tokenization rules. Terms outside the corpus vocabulary are dropped.
    pub fn embed_query(&self, query: &str) -> SparseVector {
        weigh(&self.tokenizer.tokenize(query), &self.vocab, &self.idf)
    }

    pub fn vectors(&self) -> &[SparseVector] {
        &self.vectors
    }

    pub fn tokenizer(&self) -> Tokenizer {
        self.tokenizer
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn doc_count(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn weigh(tokens: &[String], vocab: &HashMap<String, usize>, idf: &[f32]) -> SparseVector {
    let mut tf: HashMap<usize, f32> = HashMap::new();
    for token in tokens {
        if let Some(&id) = vocab.get(token) {
            *tf.entry(id).or_insert(0.0) += 1.0;
        }
    }

    let mut weights: Vec<(usize, f32)> = tf
        .into_iter()
        .map(|(id, count)| (id, count * idf[id]))
        .collect();
    weights.sort_unstable_by_key(|&(id, _)| id);

    let norm = weights.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    SparseVector { weights, norm }
}
