use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::coupons::{create_free_coupon, Coupon, DEFAULT_COUPON_VALIDITY_DAYS};
use crate::error::SentimentError;
use crate::model::RetrievalMatch;
use crate::policy::{decide_action, positivity, ActionDecision, ReviewAction};
use crate::retrieval::FaqRetriever;
use crate::sentiment::{SentimentModel, SentimentPrediction};

/// Restaurant vocabulary that marks a message as review-shaped.
const REVIEW_KEYWORDS: &[&str] = &[
    "food", "dish", "meal", "restaurant", "breakfast", "lunch", "dinner", "pizza", "burger",
    "pasta", "fries", "soup", "salad", "dessert", "service", "waiter", "chef", "taste", "portion",
    "ambience", "ambiance", "fresh", "cold", "stale",
];

/// Opinion vocabulary; a review needs an opinion, not just a food word.
const OPINION_KEYWORDS: &[&str] = &[
    "good", "great", "amazing", "awesome", "delicious", "tasty", "love", "loved", "excellent",
    "bad", "terrible", "awful", "disappointed", "hate", "overpriced", "ok", "okay", "mediocre",
    "cold", "stale", "undercooked", "burnt", "salty", "sweet", "bland", "fresh", "friendly",
    "rude",
];

fn rating_pattern() -> &'static Regex {
    static RATING: OnceLock<Regex> = OnceLock::new();
    RATING.get_or_init(|| {
        Regex::new(r"\b[1-5]\s*/\s*5\b|\b[1-5]\s*star").expect("rating pattern compiles")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Faq,
    Review,
}

/// Guesses whether free text is a restaurant review or a hotel question.
/// A review needs restaurant vocabulary plus either an opinion word or some
/// length; an explicit rating ("4/5", "5 stars") is always a review.
pub fn detect_intent(text: &str) -> Intent {
    let t = text.trim().to_lowercase();
    if t.is_empty() {
        return Intent::Faq;
    }

    let rating_like = rating_pattern().is_match(&t);
    let review_hit = REVIEW_KEYWORDS.iter().any(|k| t.contains(k));
    let opinion_hit = OPINION_KEYWORDS.iter().any(|k| t.contains(k));
    let longish = t.split_whitespace().count() >= 6;

    if (review_hit && (opinion_hit || longish)) || rating_like {
        Intent::Review
    } else {
        Intent::Faq
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Retrieval,
    Review,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouterReply {
    pub kind: ReplyKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<RetrievalMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<ActionDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
}

/// Dispatches guest input to the retrieval or sentiment path and tags the
/// reply with which path produced it.
pub struct Router<S> {
    retriever: FaqRetriever,
    sentiment: S,
}

impl<S: SentimentModel> Router<S> {
    pub fn new(retriever: FaqRetriever, sentiment: S) -> Self {
        Self {
            retriever,
            sentiment,
        }
    }

    pub fn retriever(&self) -> &FaqRetriever {
        &self.retriever
    }

    pub fn handle(&self, input: &str) -> Result<RouterReply, SentimentError> {
        match detect_intent(input) {
            Intent::Faq => Ok(self.handle_question(input)),
            Intent::Review => self.handle_review(input),
        }
    }

    pub fn handle_question(&self, question: &str) -> RouterReply {
        let result = self.retriever.answer(question);
        let kind = match result.answer {
            Some(_) => ReplyKind::Retrieval,
            None => ReplyKind::None,
        };

        let mut text = result.answer_or_fallback().to_string();
        if result.answer.is_none() && !result.candidates.is_empty() {
            text.push_str("\nDid you mean:");
            for candidate in &result.candidates {
                text.push_str(&format!(
                    "\n- {} (sim={:.2})",
                    candidate.question, candidate.score
                ));
            }
        }

        RouterReply {
            kind,
            text,
            retrieval: Some(result),
            sentiment: None,
            action: None,
            coupon: None,
        }
    }

    pub fn handle_review(&self, review: &str) -> Result<RouterReply, SentimentError> {
        let prediction = self.sentiment.predict(review)?;
        let decision = decide_action(prediction.label, positivity(&prediction));

        let (text, coupon) = match decision.action {
            ReviewAction::FreeCoupon => {
                let coupon = create_free_coupon(DEFAULT_COUPON_VALIDITY_DAYS);
                let text = format!(
                    "{}\nYour coupon: {} (valid until {}).",
                    decision.message, coupon.code, coupon.expires
                );
                (text, Some(coupon))
            }
            ReviewAction::Refund15 => (
                format!(
                    "{}\nShare your order amount and we will compute the 15% refund.",
                    decision.message
                ),
                None,
            ),
            ReviewAction::None => (decision.message.clone(), None),
        };

        Ok(RouterReply {
            kind: ReplyKind::Review,
            text,
            retrieval: None,
            sentiment: Some(prediction),
            action: Some(decision),
            coupon,
        })
    }
}
