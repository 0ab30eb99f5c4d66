use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_COUPON_VALIDITY_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub expires: NaiveDate,
    pub percent_off: u8,
}

/// Issues a single-use free meal coupon, generated locally.
pub fn create_free_coupon(days_valid: i64) -> Coupon {
    let id = Uuid::new_v4().simple().to_string();
    let code = format!("MEAL-{}", id[..8].to_uppercase());
    let expires = (Utc::now() + Duration::days(days_valid)).date_naive();
    Coupon {
        code,
        expires,
        percent_off: 100,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coupon_has_expected_shape() {
        let coupon = create_free_coupon(DEFAULT_COUPON_VALIDITY_DAYS);
        assert!(coupon.code.starts_with("MEAL-"));
        assert_eq!(coupon.code.len(), "MEAL-".len() + 8);
        assert_eq!(coupon.percent_off, 100);
        assert!(coupon.expires > Utc::now().date_naive());
    }

    #[test]
    fn codes_are_unique() {
        let a = create_free_coupon(30);
        let b = create_free_coupon(30);
        assert_ne!(a.code, b.code);
    }
}
