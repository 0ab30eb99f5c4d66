use serde::{Deserialize, Serialize};

pub const DEFAULT_REFUND_PERCENT: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    pub refund_percent: f64,
    pub refund_amount: f64,
}

/// Computes a partial refund, rounded to cents.
pub fn calc_refund(amount_dollars: f64, percent: f64) -> Refund {
    let refund_amount = (amount_dollars * (percent / 100.0) * 100.0).round() / 100.0;
    Refund {
        refund_percent: percent,
        refund_amount,
    }
}
