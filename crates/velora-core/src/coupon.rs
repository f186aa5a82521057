//! # Coupon Engine
//!
//! Eligibility checks and discount clamping for coupons.
//!
//! ## The Discount Clamp
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     How a discount is computed                          │
//! │                                                                         │
//! │  Percentage coupon (value = 20, max_discount = $30):                   │
//! │     raw   = subtotal × 20%                                             │
//! │     final = min(raw, max_discount)                                     │
//! │     e.g.  $200 × 20% = $40 → capped at $30                             │
//! │                                                                         │
//! │  Fixed coupon (value = $15):                                           │
//! │     final = min($15, subtotal)     ← total never goes negative         │
//! │                                                                         │
//! │  Either way, nothing applies unless:                                   │
//! │     status == Active                                                   │
//! │     starts_at <= now <= ends_at                                        │
//! │     used_count < usage_limit (when set)                                │
//! │     subtotal >= min_order                                              │
//! │     cart shares a category with applicable_categories (when set)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::Money;
use crate::types::{Coupon, CouponStatus, CouponType, ProductCategory};

// =============================================================================
// Rejection Reasons
// =============================================================================

/// Why a coupon could not be applied.
///
/// Typed so the frontend can show a precise message instead of a generic
/// "invalid coupon".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    /// Coupon exists but has been deactivated by an admin.
    #[error("Coupon is not active")]
    Inactive,

    /// Current time is before the coupon's start date.
    #[error("Coupon is not valid yet")]
    NotStarted,

    /// Current time is past the coupon's end date.
    #[error("Coupon has expired")]
    Expired,

    /// All allowed redemptions have been used.
    #[error("Coupon usage limit reached")]
    UsageLimitReached,

    /// Subtotal is below the coupon's minimum order value.
    #[error("Order subtotal must be at least {required} to use this coupon")]
    BelowMinimum { required: Money },

    /// None of the cart's categories are covered by the coupon.
    #[error("Coupon does not apply to any item in the cart")]
    CategoryMismatch,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Checks eligibility and returns the clamped discount for `subtotal`.
///
/// `cart_categories` are the categories present in the cart, used when the
/// coupon restricts itself to specific categories. The discount is never
/// larger than the subtotal.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use velora_core::coupon::evaluate;
/// use velora_core::money::Money;
/// use velora_core::types::{Coupon, CouponStatus, CouponType};
///
/// let coupon = Coupon {
///     id: "c1".into(),
///     code: "SAVE10".into(),
///     coupon_type: CouponType::Percentage,
///     value: 10,
///     min_order_cents: 0,
///     max_discount_cents: None,
///     usage_limit: None,
///     used_count: 0,
///     status: CouponStatus::Active,
///     starts_at: Utc::now() - chrono::Duration::days(1),
///     ends_at: Utc::now() + chrono::Duration::days(1),
///     applicable_categories: vec![],
///     created_at: Utc::now(),
/// };
///
/// // 10% off a $50.00 subtotal is $5.00
/// let discount = evaluate(&coupon, Money::from_cents(5000), &[], Utc::now()).unwrap();
/// assert_eq!(discount.cents(), 500);
/// ```
pub fn evaluate(
    coupon: &Coupon,
    subtotal: Money,
    cart_categories: &[ProductCategory],
    now: DateTime<Utc>,
) -> Result<Money, CouponRejection> {
    check_eligibility(coupon, subtotal, cart_categories, now)?;
    Ok(discount_amount(coupon, subtotal))
}

/// Eligibility checks only, in the order the storefront reports them.
pub fn check_eligibility(
    coupon: &Coupon,
    subtotal: Money,
    cart_categories: &[ProductCategory],
    now: DateTime<Utc>,
) -> Result<(), CouponRejection> {
    if coupon.status != CouponStatus::Active {
        return Err(CouponRejection::Inactive);
    }
    if now < coupon.starts_at {
        return Err(CouponRejection::NotStarted);
    }
    if now > coupon.ends_at {
        return Err(CouponRejection::Expired);
    }
    if coupon.is_exhausted() {
        return Err(CouponRejection::UsageLimitReached);
    }
    if subtotal.cents() < coupon.min_order_cents {
        return Err(CouponRejection::BelowMinimum {
            required: Money::from_cents(coupon.min_order_cents),
        });
    }
    if !coupon.applicable_categories.is_empty()
        && !cart_categories
            .iter()
            .any(|c| coupon.applicable_categories.contains(c))
    {
        return Err(CouponRejection::CategoryMismatch);
    }
    Ok(())
}

/// The clamped discount, assuming eligibility already passed.
///
/// Percentage: `min(subtotal × value%, max_discount)`.
/// Fixed: `min(value, subtotal)`.
/// Both are additionally capped at the subtotal so a total can never go
/// negative.
pub fn discount_amount(coupon: &Coupon, subtotal: Money) -> Money {
    let raw = match coupon.coupon_type {
        // value is a whole percent; 10 → 1000 bps
        CouponType::Percentage => subtotal.percentage_bps(coupon.value as u32 * 100),
        CouponType::Fixed => Money::from_cents(coupon.value),
    };

    let capped = match coupon.max_discount_cents {
        Some(max) => raw.min(Money::from_cents(max)),
        None => raw,
    };

    capped.min(subtotal)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(coupon_type: CouponType, value: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: "c1".to_string(),
            code: "TEST".to_string(),
            coupon_type,
            value,
            min_order_cents: 0,
            max_discount_cents: None,
            usage_limit: None,
            used_count: 0,
            status: CouponStatus::Active,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            applicable_categories: vec![],
            created_at: now,
        }
    }

    #[test]
    fn test_save10_on_fifty_dollars() {
        // SAVE10: 10% off, no cap. $50 subtotal → $5.00 off
        let c = coupon(CouponType::Percentage, 10);
        let discount = evaluate(&c, Money::from_cents(5000), &[], Utc::now()).unwrap();
        assert_eq!(discount.cents(), 500);
    }

    #[test]
    fn test_welcome20_capped_at_max_discount() {
        // WELCOME20: 20% off, max $30. $200 subtotal
        // → capped at $30.00, not $40.00
        let mut c = coupon(CouponType::Percentage, 20);
        c.max_discount_cents = Some(3000);
        let discount = evaluate(&c, Money::from_cents(20000), &[], Utc::now()).unwrap();
        assert_eq!(discount.cents(), 3000);
    }

    #[test]
    fn test_fixed_coupon_never_exceeds_subtotal() {
        // Fixed $15 off a $9 order discounts $9, not $15
        let c = coupon(CouponType::Fixed, 1500);
        let discount = evaluate(&c, Money::from_cents(900), &[], Utc::now()).unwrap();
        assert_eq!(discount.cents(), 900);
    }

    #[test]
    fn test_below_minimum_leaves_total_unchanged() {
        // Subtotal below min_order → no discount at all
        let mut c = coupon(CouponType::Fixed, 500);
        c.min_order_cents = 2000;
        let err = evaluate(&c, Money::from_cents(1999), &[], Utc::now()).unwrap_err();
        assert_eq!(
            err,
            CouponRejection::BelowMinimum {
                required: Money::from_cents(2000)
            }
        );

        // At exactly the minimum it applies
        let discount = evaluate(&c, Money::from_cents(2000), &[], Utc::now()).unwrap();
        assert_eq!(discount.cents(), 500);
    }

    #[test]
    fn test_date_window() {
        let mut c = coupon(CouponType::Percentage, 10);
        let now = Utc::now();

        c.starts_at = now + Duration::days(1);
        c.ends_at = now + Duration::days(2);
        assert_eq!(
            evaluate(&c, Money::from_cents(1000), &[], now).unwrap_err(),
            CouponRejection::NotStarted
        );

        c.starts_at = now - Duration::days(2);
        c.ends_at = now - Duration::days(1);
        assert_eq!(
            evaluate(&c, Money::from_cents(1000), &[], now).unwrap_err(),
            CouponRejection::Expired
        );
    }

    #[test]
    fn test_usage_limit() {
        let mut c = coupon(CouponType::Percentage, 10);
        c.usage_limit = Some(5);
        c.used_count = 5;
        assert_eq!(
            evaluate(&c, Money::from_cents(1000), &[], Utc::now()).unwrap_err(),
            CouponRejection::UsageLimitReached
        );
    }

    #[test]
    fn test_inactive_coupon() {
        let mut c = coupon(CouponType::Percentage, 10);
        c.status = CouponStatus::Inactive;
        assert_eq!(
            evaluate(&c, Money::from_cents(1000), &[], Utc::now()).unwrap_err(),
            CouponRejection::Inactive
        );
    }

    #[test]
    fn test_category_restriction() {
        let mut c = coupon(CouponType::Percentage, 10);
        c.applicable_categories = vec![ProductCategory::Serum];

        // Cart with no serum → rejected
        assert_eq!(
            evaluate(
                &c,
                Money::from_cents(1000),
                &[ProductCategory::Mask],
                Utc::now()
            )
            .unwrap_err(),
            CouponRejection::CategoryMismatch
        );

        // Cart containing a serum → applies
        let discount = evaluate(
            &c,
            Money::from_cents(1000),
            &[ProductCategory::Mask, ProductCategory::Serum],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(discount.cents(), 100);
    }

    #[test]
    fn test_unrestricted_coupon_ignores_categories() {
        let c = coupon(CouponType::Percentage, 10);
        let discount = evaluate(&c, Money::from_cents(1000), &[], Utc::now()).unwrap();
        assert_eq!(discount.cents(), 100);
    }
}
