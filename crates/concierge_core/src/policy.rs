use serde::{Deserialize, Serialize};

use crate::sentiment::{SentimentLabel, SentimentPrediction};

/// Positivity at or above this earns a free meal coupon.
pub const POSITIVE_THRESHOLD: f32 = 0.70;
/// Positivity at or below this triggers the 15% refund offer.
pub const NEGATIVE_THRESHOLD: f32 = 0.30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Refund15,
    FreeCoupon,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDecision {
    pub action: ReviewAction,
    pub message: String,
}

/// Collapses a prediction onto a single negative-to-positive axis in [0, 1]:
/// 0 is a confident negative, 1 a confident positive.
pub fn positivity(prediction: &SentimentPrediction) -> f32 {
    match prediction.label {
        SentimentLabel::Positive => prediction.confidence,
        SentimentLabel::Negative => 1.0 - prediction.confidence,
        SentimentLabel::Neutral => 0.5,
    }
}

pub fn decide_action(label: SentimentLabel, score: f32) -> ActionDecision {
    if label == SentimentLabel::Negative && score <= NEGATIVE_THRESHOLD {
        return ActionDecision {
            action: ReviewAction::Refund15,
            message: format!("Negative ({score:.2}). We're sorry, a 15% refund is on its way."),
        };
    }
    if label == SentimentLabel::Positive && score >= POSITIVE_THRESHOLD {
        return ActionDecision {
            action: ReviewAction::FreeCoupon,
            message: format!(
                "Positive ({score:.2}). Thanks for the kind words, enjoy a free meal coupon."
            ),
        };
    }
    ActionDecision {
        action: ReviewAction::None,
        message: format!("{label} ({score:.2})."),
    }
}
