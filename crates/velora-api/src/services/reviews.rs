//! # Review Service
//!
//! The customer-facing submission form and the admin moderation queue.
//! Reviews enter as `Pending` and only surface on the storefront once an
//! admin approves them.

use serde::Deserialize;
use tracing::info;
use ts_rs::TS;

use velora_core::ReviewStatus;
use velora_store::{NewReview, ReviewQuery, Store};

use crate::dto::{Paginated, ReviewDto};
use crate::error::{ApiError, ApiResult};

/// Raw listing parameters from the moderation table.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewListRequest {
    /// Matches customer name and comment text
    pub search: String,
    /// "pending" | "approved" | "rejected" | "all"
    pub status: String,
    /// Exact star rating, 0 means any
    pub rating: u8,
    pub page: u32,
}

/// What a visitor types into the review form on a product page.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    pub product_id: String,
    pub customer_name: String,
    pub rating: u8,
    pub comment: String,
}

/// Review submission and moderation.
#[derive(Clone)]
pub struct ReviewService {
    store: Store,
    page_size: u32,
}

impl ReviewService {
    pub fn new(store: Store, page_size: u32) -> Self {
        ReviewService { store, page_size }
    }

    pub async fn list(&self, request: &ReviewListRequest) -> ApiResult<Paginated<ReviewDto>> {
        let mut query = ReviewQuery::new()
            .with_page_size(self.page_size)
            .with_text(request.search.clone());

        let status = request.status.trim();
        if !status.is_empty() && !status.eq_ignore_ascii_case("all") {
            let parsed = parse_status(status)?;
            query = query.with_status(Some(parsed));
        }
        if request.rating > 0 {
            query = query.with_rating(Some(request.rating));
        }
        query = query.with_page(request.page.max(1));

        let page = self.store.reviews().list(&query).await?;
        Ok(Paginated::from_page(page, ReviewDto::from))
    }

    pub async fn get(&self, id: &str) -> ApiResult<ReviewDto> {
        Ok(ReviewDto::from(self.store.reviews().get(id).await?))
    }

    /// Approved reviews for one product page, newest first.
    pub async fn for_product(&self, product_id: &str) -> ApiResult<Vec<ReviewDto>> {
        let reviews = self.store.reviews().approved_for_product(product_id).await?;
        Ok(reviews.into_iter().map(ReviewDto::from).collect())
    }

    /// Storefront submission. Lands in the moderation queue.
    pub async fn submit(&self, form: ReviewForm) -> ApiResult<ReviewDto> {
        let name = form.customer_name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Name is required"));
        }
        let comment = form.comment.trim();
        if comment.is_empty() {
            return Err(ApiError::validation("Comment is required"));
        }

        let review = self
            .store
            .reviews()
            .submit(NewReview {
                product_id: form.product_id,
                customer_name: name.to_string(),
                rating: form.rating,
                comment: comment.to_string(),
            })
            .await?;

        info!(review_id = %review.id, "Review submitted for moderation");
        Ok(ReviewDto::from(review))
    }

    /// Admin verdict. Each pending review gets exactly one.
    pub async fn moderate(&self, id: &str, verdict: &str) -> ApiResult<ReviewDto> {
        let verdict = match verdict.trim().to_ascii_lowercase().as_str() {
            "approved" | "approve" => ReviewStatus::Approved,
            "rejected" | "reject" => ReviewStatus::Rejected,
            other => {
                return Err(ApiError::validation(format!("Unknown verdict: {}", other)));
            }
        };
        Ok(ReviewDto::from(self.store.reviews().moderate(id, verdict).await?))
    }

    /// How many reviews are waiting on a verdict.
    pub async fn pending_count(&self) -> ApiResult<usize> {
        let all = self.store.reviews().all().await?;
        Ok(all.iter().filter(|r| r.status == ReviewStatus::Pending).count())
    }
}

fn parse_status(raw: &str) -> ApiResult<ReviewStatus> {
    match raw.to_ascii_lowercase().as_str() {
        "pending" => Ok(ReviewStatus::Pending),
        "approved" => Ok(ReviewStatus::Approved),
        "rejected" => Ok(ReviewStatus::Rejected),
        other => Err(ApiError::validation(format!("Unknown review status: {}", other))),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use velora_store::StoreConfig;

    fn service() -> ReviewService {
        ReviewService::new(
            Store::new(StoreConfig::for_tests()),
            velora_core::DEFAULT_PAGE_SIZE,
        )
    }

    async fn any_product_id(store: &Store) -> String {
        store.products().all().await.unwrap()[0].id.clone()
    }

    #[tokio::test]
    async fn test_submit_requires_name_and_comment() {
        let svc = service();
        let product_id = any_product_id(&svc.store).await;

        let err = svc
            .submit(ReviewForm {
                product_id: product_id.clone(),
                customer_name: "   ".to_string(),
                rating: 4,
                comment: "Nice texture".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let review = svc
            .submit(ReviewForm {
                product_id,
                customer_name: "  Ploy T.  ".to_string(),
                rating: 4,
                comment: "Nice texture".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(review.customer_name, "Ploy T.");
        assert_eq!(review.status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn test_moderate_accepts_verb_and_participle() {
        let svc = service();
        let pending = svc
            .list(&ReviewListRequest {
                status: "pending".to_string(),
                ..ReviewListRequest::default()
            })
            .await
            .unwrap();
        assert!(pending.data.len() >= 2);

        let approved = svc.moderate(&pending.data[0].id, "approve").await.unwrap();
        assert_eq!(approved.status, ReviewStatus::Approved);
        let rejected = svc.moderate(&pending.data[1].id, "Rejected").await.unwrap();
        assert_eq!(rejected.status, ReviewStatus::Rejected);
    }

    #[tokio::test]
    async fn test_unknown_verdict_and_status_rejected() {
        let svc = service();
        let err = svc.moderate("whatever", "maybe").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = svc
            .list(&ReviewListRequest {
                status: "published".to_string(),
                ..ReviewListRequest::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_pending_count_tracks_moderation() {
        let svc = service();
        let before = svc.pending_count().await.unwrap();
        assert!(before > 0);

        let pending = svc
            .list(&ReviewListRequest {
                status: "pending".to_string(),
                ..ReviewListRequest::default()
            })
            .await
            .unwrap();
        svc.moderate(&pending.data[0].id, "approved").await.unwrap();

        assert_eq!(svc.pending_count().await.unwrap(), before - 1);
    }
}
