//! # Admin Coupon Service
//!
//! Coupon management for the dashboard, plus the standalone code check
//! the coupon form's "test" button uses.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use velora_core::{CouponStatus, CouponType, Money};
use velora_store::{CouponQuery, NewCoupon, Store, UpdateCoupon};

use crate::dto::{CouponDto, Paginated};
use crate::error::{ApiError, ApiResult};

/// Raw listing parameters from the admin coupon table.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CouponListRequest {
    /// Matches the coupon code
    pub search: String,
    /// "active" | "inactive" | "all"
    pub status: String,
    pub page: u32,
}

/// Create form payload.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CouponForm {
    pub code: String,
    /// "percentage" | "fixed"
    #[serde(rename = "type")]
    pub coupon_type: String,
    pub value: i64,
    pub min_order_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub usage_limit: Option<u32>,
    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub ends_at: DateTime<Utc>,
    /// Category slugs; empty means the coupon applies to everything
    pub applicable_categories: Vec<String>,
}

/// Edit form payload. Only present fields change; code and type are
/// fixed once created.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CouponUpdateForm {
    pub value: Option<i64>,
    pub min_order_cents: Option<i64>,
    pub max_discount_cents: Option<Option<i64>>,
    pub usage_limit: Option<Option<u32>>,
    #[ts(as = "Option<String>")]
    pub starts_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub ends_at: Option<DateTime<Utc>>,
    pub applicable_categories: Option<Vec<String>>,
}

/// Dashboard coupon management.
#[derive(Clone)]
pub struct CouponService {
    store: Store,
    page_size: u32,
}

impl CouponService {
    pub fn new(store: Store, page_size: u32) -> Self {
        CouponService { store, page_size }
    }

    pub async fn list(&self, request: &CouponListRequest) -> ApiResult<Paginated<CouponDto>> {
        let mut query = CouponQuery::new()
            .with_page_size(self.page_size)
            .with_text(request.search.clone());

        query = match request.status.trim() {
            "" | "all" => query,
            "active" => query.with_status(Some(CouponStatus::Active)),
            "inactive" => query.with_status(Some(CouponStatus::Inactive)),
            other => return Err(ApiError::validation(format!("Unknown status: {}", other))),
        };

        query = query.with_page(request.page.max(1));

        let page = self.store.coupons().list(&query).await?;
        Ok(Paginated::from_page(page, CouponDto::from))
    }

    pub async fn create(&self, form: CouponForm) -> ApiResult<CouponDto> {
        let coupon_type = match form.coupon_type.trim() {
            "percentage" => CouponType::Percentage,
            "fixed" => CouponType::Fixed,
            other => {
                return Err(ApiError::validation(format!("Unknown coupon type: {}", other)));
            }
        };

        if form.ends_at <= form.starts_at {
            return Err(ApiError::validation("End date must be after start date"));
        }

        let categories = parse_categories(&form.applicable_categories)?;

        let coupon = self
            .store
            .coupons()
            .create(NewCoupon {
                code: form.code,
                coupon_type,
                value: form.value,
                min_order_cents: form.min_order_cents,
                max_discount_cents: form.max_discount_cents,
                usage_limit: form.usage_limit,
                starts_at: form.starts_at,
                ends_at: form.ends_at,
                applicable_categories: categories,
            })
            .await?;
        Ok(CouponDto::from(coupon))
    }

    pub async fn update(&self, id: &str, form: CouponUpdateForm) -> ApiResult<CouponDto> {
        if let (Some(starts), Some(ends)) = (form.starts_at, form.ends_at) {
            if ends <= starts {
                return Err(ApiError::validation("End date must be after start date"));
            }
        }

        let categories = match &form.applicable_categories {
            Some(slugs) => Some(parse_categories(slugs)?),
            None => None,
        };

        let coupon = self
            .store
            .coupons()
            .update(
                id,
                UpdateCoupon {
                    value: form.value,
                    min_order_cents: form.min_order_cents,
                    max_discount_cents: form.max_discount_cents,
                    usage_limit: form.usage_limit,
                    starts_at: form.starts_at,
                    ends_at: form.ends_at,
                    applicable_categories: categories,
                },
            )
            .await?;
        Ok(CouponDto::from(coupon))
    }

    /// The admin enable/disable toggle.
    pub async fn set_active(&self, id: &str, active: bool) -> ApiResult<CouponDto> {
        let status = if active {
            CouponStatus::Active
        } else {
            CouponStatus::Inactive
        };
        Ok(CouponDto::from(self.store.coupons().set_status(id, status).await?))
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        Ok(self.store.coupons().delete(id).await?)
    }

    /// Dry-run check of a code against a hypothetical subtotal. Returns
    /// the discount in cents. There is no cart here, so category
    /// restrictions are treated as satisfied.
    pub async fn check(&self, code: &str, subtotal_cents: i64) -> ApiResult<i64> {
        let discount = self
            .store
            .coupons()
            .preview(
                code,
                Money::from_cents(subtotal_cents),
                &velora_core::ProductCategory::ALL,
            )
            .await?;
        Ok(discount.cents())
    }
}

/// Parses and dedupes category slugs from a form.
fn parse_categories(slugs: &[String]) -> ApiResult<Vec<velora_core::ProductCategory>> {
    let mut categories = Vec::new();
    for slug in slugs {
        let category = slug
            .parse()
            .map_err(|_| ApiError::validation(format!("Unknown category: {}", slug)))?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use velora_store::StoreConfig;

    fn service() -> CouponService {
        CouponService::new(
            Store::new(StoreConfig::for_tests()),
            velora_core::DEFAULT_PAGE_SIZE,
        )
    }

    fn form(code: &str) -> CouponForm {
        let now = Utc::now();
        CouponForm {
            code: code.to_string(),
            coupon_type: "percentage".to_string(),
            value: 15,
            min_order_cents: 0,
            max_discount_cents: None,
            usage_limit: None,
            starts_at: now,
            ends_at: now + chrono::Duration::days(14),
            applicable_categories: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let svc = service();
        let created = svc.create(form("autumn15")).await.unwrap();
        assert_eq!(created.code, "AUTUMN15");

        let page = svc
            .list(&CouponListRequest {
                search: "autumn".to_string(),
                ..CouponListRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_inverted_window() {
        let svc = service();
        let mut bad = form("BACKWARDS");
        bad.ends_at = bad.starts_at - chrono::Duration::days(1);
        let err = svc.create(bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_check_clamps() {
        let svc = service();
        // WELCOME20 caps at $30
        assert_eq!(svc.check("WELCOME20", 20000).await.unwrap(), 3000);
        // FLAT5 below its minimum is a coupon error, not zero
        let err = svc.check("FLAT5", 100).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CouponError);
    }

    #[tokio::test]
    async fn test_update_value_and_window() {
        let svc = service();
        let created = svc.create(form("editme10")).await.unwrap();

        let updated = svc
            .update(
                &created.id,
                CouponUpdateForm {
                    value: Some(20),
                    max_discount_cents: Some(Some(1500)),
                    ..CouponUpdateForm::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.value, 20);
        assert_eq!(updated.max_discount_cents, Some(1500));
        assert_eq!(updated.code, "EDITME10");

        let now = Utc::now();
        let err = svc
            .update(
                &created.id,
                CouponUpdateForm {
                    starts_at: Some(now),
                    ends_at: Some(now - chrono::Duration::days(1)),
                    ..CouponUpdateForm::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_toggle_then_delete() {
        let svc = service();
        let created = svc.create(form("TEMP10")).await.unwrap();

        let toggled = svc.set_active(&created.id, false).await.unwrap();
        assert_eq!(toggled.status, CouponStatus::Inactive);

        svc.delete(&created.id).await.unwrap();
        assert_eq!(
            svc.delete(&created.id).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
