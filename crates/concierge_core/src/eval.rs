use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::model::Decision;
use crate::retrieval::FaqRetriever;

pub const DEFAULT_REQUIRED_PASS_RATE: f32 = 0.85;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalCase {
    pub case_id: String,
    pub question: String,
    pub expected_decision: Decision,
    /// When set, the matched entry's question must equal this text exactly.
    pub expected_question: Option<String>,
    pub min_similarity: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalOutcome {
    pub case_id: String,
    pub passed: bool,
    pub actual_decision: Decision,
    pub actual_question: Option<String>,
    pub actual_answer: Option<String>,
    pub score: f32,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f32,
    pub outcomes: Vec<EvalOutcome>,
}

impl EvalSummary {
    pub fn meets(&self, required_pass_rate: f32) -> bool {
        self.pass_rate >= required_pass_rate
    }
}

fn case_passes(
    case: &EvalCase,
    actual_decision: Decision,
    actual_question: Option<&str>,
    score: f32,
) -> bool {
    if case.expected_decision != actual_decision {
        return false;
    }

    if let Some(expected) = case.expected_question.as_deref() {
        if actual_question != Some(expected) {
            return false;
        }
    }

    if let Some(min_similarity) = case.min_similarity {
        if score < min_similarity {
            return false;
        }
    }

    true
}

pub fn evaluate_cases(retriever: &FaqRetriever, cases: &[EvalCase]) -> EvalSummary {
    let mut outcomes = Vec::with_capacity(cases.len());

    for case in cases {
        let start = Instant::now();
        let result = retriever.answer(&case.question);
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let passed = case_passes(
            case,
            result.decision,
            result.question.as_deref(),
            result.score,
        );

        outcomes.push(EvalOutcome {
            case_id: case.case_id.clone(),
            passed,
            actual_decision: result.decision,
            actual_question: result.question,
            actual_answer: result.answer,
            score: result.score,
            latency_ms,
        });
    }

    let total = outcomes.len();
    let passed = outcomes.iter().filter(|o| o.passed).count();
    let failed = total.saturating_sub(passed);
    let pass_rate = if total == 0 {
        0.0
    } else {
        passed as f32 / total as f32
    };

    EvalSummary {
        total,
        passed,
        failed,
        pass_rate,
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FaqEntry;
    use crate::retrieval::RetrieverConfig;
    use crate::store::Corpus;

    fn retriever() -> FaqRetriever {
        let corpus = Corpus::from_entries(vec![
            FaqEntry::new("What time is check-in?", "Check-in starts at 3:00 PM."),
            FaqEntry::new("Is breakfast included?", "Yes, from 7 to 10 AM."),
        ]);
        FaqRetriever::new(corpus, RetrieverConfig::default())
    }

    fn case(id: &str, question: &str, expected: Decision) -> EvalCase {
        EvalCase {
            case_id: id.to_string(),
            question: question.to_string(),
            expected_decision: expected,
            expected_question: None,
            min_similarity: None,
        }
    }

    #[test]
    fn summary_counts_hits_and_misses() {
        let cases = vec![
            case("hit", "when can I check in", Decision::Hit),
            case("miss", "do you have a pool", Decision::Miss),
        ];
        let summary = evaluate_cases(&retriever(), &cases);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 0);
        assert!((summary.pass_rate - 1.0).abs() < 1e-6);
        assert!(summary.meets(DEFAULT_REQUIRED_PASS_RATE));
    }

    #[test]
    fn wrong_decision_fails_the_case() {
        let cases = vec![case("wrong", "do you have a pool", Decision::Hit)];
        let summary = evaluate_cases(&retriever(), &cases);
        assert_eq!(summary.failed, 1);
        assert!(!summary.meets(DEFAULT_REQUIRED_PASS_RATE));
    }

    #[test]
    fn expected_question_must_match() {
        let mut mismatched = case("q", "when can I check in", Decision::Hit);
        mismatched.expected_question = Some("Is breakfast included?".to_string());
        let summary = evaluate_cases(&retriever(), &[mismatched]);
        assert_eq!(summary.passed, 0);
    }

    #[test]
    fn min_similarity_is_enforced() {
        let mut strict = case("strict", "when can I check in", Decision::Hit);
        strict.min_similarity = Some(0.999);
        let summary = evaluate_cases(&retriever(), &[strict]);
        assert_eq!(summary.passed, 0);
    }

    #[test]
    fn empty_case_list_has_zero_pass_rate() {
        let summary = evaluate_cases(&retriever(), &[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
