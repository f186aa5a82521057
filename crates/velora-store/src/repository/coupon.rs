//! # Coupon Repository
//!
//! Coupon lookup, admin CRUD, and checkout validation.
//!
//! Redemption itself happens inside order creation so the `used_count`
//! bump and the stock decrement land in the same write; this repository
//! only answers "would this code apply, and for how much" — the preview
//! the cart shows before checkout.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use velora_core::coupon::evaluate;
use velora_core::listing::{ListQuery, Listing, PageResult, SortDirection};
use velora_core::validation;
use velora_core::{Coupon, CouponStatus, CouponType, Money, ProductCategory};

use crate::error::{StoreError, StoreResult};
use crate::StoreInner;

// =============================================================================
// Query
// =============================================================================

/// Criteria for the admin coupon list. Text matches the code.
#[derive(Debug, Clone, Default)]
pub struct CouponQuery {
    list: ListQuery,
    status: Option<CouponStatus>,
}

impl CouponQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.list = self.list.with_text(text);
        self
    }

    pub fn with_status(mut self, status: Option<CouponStatus>) -> Self {
        self.status = status;
        self.list.reset_page();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.list = self.list.with_page(page);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.list = self.list.with_page_size(page_size);
        self
    }

    fn matches(&self, coupon: &Coupon) -> bool {
        self.list.matches_text([coupon.code.as_str()])
            && self.status.map_or(true, |s| coupon.status == s)
    }
}

// =============================================================================
// Write Payload
// =============================================================================

/// Fields for creating a coupon from the admin dashboard.
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub coupon_type: CouponType,
    pub value: i64,
    pub min_order_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub usage_limit: Option<u32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub applicable_categories: Vec<ProductCategory>,
}

/// Partial update from the admin edit form. The code itself is fixed once
/// created; orders reference it as a string snapshot.
#[derive(Debug, Clone, Default)]
pub struct UpdateCoupon {
    pub value: Option<i64>,
    pub min_order_cents: Option<i64>,
    pub max_discount_cents: Option<Option<i64>>,
    pub usage_limit: Option<Option<u32>>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub applicable_categories: Option<Vec<ProductCategory>>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for coupon operations.
#[derive(Clone)]
pub struct CouponRepository {
    store: Arc<StoreInner>,
}

impl CouponRepository {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        CouponRepository { store }
    }

    /// Admin coupon list, newest first.
    pub async fn list(&self, query: &CouponQuery) -> StoreResult<PageResult<Coupon>> {
        self.store.simulate_latency().await;

        debug!(text = ?query.list.text(), status = ?query.status, "Listing coupons");

        let coupons = self.store.coupons.read().await;
        Ok(Listing::of(&coupons)
            .filter(|c| query.matches(c))
            .sort_by(|a, b| a.created_at.cmp(&b.created_at), SortDirection::Desc)
            .page(query.list.page(), query.list.page_size()))
    }

    pub async fn get(&self, id: &str) -> StoreResult<Coupon> {
        self.store.simulate_latency().await;

        let coupons = self.store.coupons.read().await;
        coupons
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("coupon", id))
    }

    /// Looks a coupon up by its code, case-insensitively.
    pub async fn find_by_code(&self, code: &str) -> StoreResult<Coupon> {
        self.store.simulate_latency().await;

        let coupons = self.store.coupons.read().await;
        coupons
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(code.trim()))
            .cloned()
            .ok_or_else(|| StoreError::not_found("coupon", code))
    }

    /// Every coupon. Dashboard aggregations use this.
    pub async fn all(&self) -> StoreResult<Vec<Coupon>> {
        self.store.simulate_latency().await;
        Ok(self.store.coupons.read().await.clone())
    }

    /// Checkout preview: the discount this code would give for a cart
    /// with `subtotal` and `categories`, without redeeming anything.
    pub async fn preview(
        &self,
        code: &str,
        subtotal: Money,
        categories: &[ProductCategory],
    ) -> StoreResult<Money> {
        let coupon = self.find_by_code(code).await?;
        let discount = evaluate(&coupon, subtotal, categories, Utc::now())?;
        debug!(code = %coupon.code, discount = %discount, "Coupon preview");
        Ok(discount)
    }

    /// Creates a coupon. Codes are stored uppercase and must be unique.
    pub async fn create(&self, new: NewCoupon) -> StoreResult<Coupon> {
        self.store.simulate_latency().await;

        validation::validate_coupon_code(&new.code)?;
        if new.coupon_type == CouponType::Percentage {
            validation::validate_percentage(new.value)?;
        } else {
            validation::validate_price_cents(new.value)?;
        }

        let code = new.code.trim().to_uppercase();
        let mut coupons = self.store.coupons.write().await;
        if coupons.iter().any(|c| c.code == code) {
            return Err(StoreError::duplicate("code", code));
        }

        let coupon = Coupon {
            id: Uuid::new_v4().to_string(),
            code,
            coupon_type: new.coupon_type,
            value: new.value,
            min_order_cents: new.min_order_cents,
            max_discount_cents: new.max_discount_cents,
            usage_limit: new.usage_limit,
            used_count: 0,
            status: CouponStatus::Active,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            applicable_categories: new.applicable_categories,
            created_at: Utc::now(),
        };

        info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon created");

        coupons.push(coupon.clone());
        Ok(coupon)
    }

    /// Partial update. `used_count` is untouched; redemption history is
    /// not something the edit form can rewrite.
    pub async fn update(&self, id: &str, update: UpdateCoupon) -> StoreResult<Coupon> {
        self.store.simulate_latency().await;

        let mut coupons = self.store.coupons.write().await;
        let coupon = coupons
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("coupon", id))?;

        if let Some(value) = update.value {
            if coupon.coupon_type == CouponType::Percentage {
                validation::validate_percentage(value)?;
            } else {
                validation::validate_price_cents(value)?;
            }
            coupon.value = value;
        }
        if let Some(min) = update.min_order_cents {
            coupon.min_order_cents = min;
        }
        if let Some(max) = update.max_discount_cents {
            coupon.max_discount_cents = max;
        }
        if let Some(limit) = update.usage_limit {
            coupon.usage_limit = limit;
        }
        if let Some(starts) = update.starts_at {
            coupon.starts_at = starts;
        }
        if let Some(ends) = update.ends_at {
            coupon.ends_at = ends;
        }
        if let Some(categories) = update.applicable_categories {
            coupon.applicable_categories = categories;
        }

        info!(coupon_id = %id, "Coupon updated");
        Ok(coupon.clone())
    }

    /// Activates or deactivates a coupon (the admin toggle).
    pub async fn set_status(&self, id: &str, status: CouponStatus) -> StoreResult<Coupon> {
        self.store.simulate_latency().await;

        let mut coupons = self.store.coupons.write().await;
        let coupon = coupons
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("coupon", id))?;

        coupon.status = status;
        info!(coupon_id = %id, status = ?status, "Coupon status changed");
        Ok(coupon.clone())
    }

    /// Removes a coupon outright. Historical orders keep the code as a
    /// string snapshot, so nothing dangles.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.store.simulate_latency().await;

        let mut coupons = self.store.coupons.write().await;
        let before = coupons.len();
        coupons.retain(|c| c.id != id);
        if coupons.len() == before {
            return Err(StoreError::not_found("coupon", id));
        }

        info!(coupon_id = %id, "Coupon deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
