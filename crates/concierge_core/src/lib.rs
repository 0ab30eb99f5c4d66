pub mod coupons;
pub mod error;
pub mod eval;
pub mod index;
pub mod model;
pub mod payments;
pub mod policy;
pub mod retrieval;
pub mod router;
pub mod sentiment;
pub mod storage;
pub mod store;
pub mod tokenize;

pub use coupons::{create_free_coupon, Coupon, DEFAULT_COUPON_VALIDITY_DAYS};
pub use error::{CorpusError, SentimentError};
pub use eval::{evaluate_cases, EvalCase, EvalOutcome, EvalSummary, DEFAULT_REQUIRED_PASS_RATE};
pub use index::{SparseVector, TfidfIndex};
pub use model::{Candidate, Decision, FaqEntry, RetrievalMatch, DEFAULT_FALLBACK_ANSWER};
pub use payments::{calc_refund, Refund, DEFAULT_REFUND_PERCENT};
pub use policy::{
    decide_action, positivity, ActionDecision, ReviewAction, NEGATIVE_THRESHOLD,
    POSITIVE_THRESHOLD,
};
pub use retrieval::{
    answer, cosine_sparse, rank, top_k, FaqRetriever, RetrieverConfig, DEFAULT_THRESHOLD,
    DEFAULT_TOP_K,
};
pub use router::{detect_intent, Intent, ReplyKind, Router, RouterReply};
pub use sentiment::{LexiconSentimentModel, SentimentLabel, SentimentModel, SentimentPrediction};
pub use storage::{load_snapshot, save_snapshot, IndexSnapshot};
pub use store::Corpus;
pub use tokenize::{normalize, Tokenizer};
