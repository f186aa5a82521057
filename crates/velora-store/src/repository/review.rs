//! # Review Repository
//!
//! Review submission, the admin moderation queue, and the approved
//! reviews shown on product pages.
//!
//! ## Moderation
//! ```text
//! submit ──► Pending ──► Approved  (visible on storefront,
//!               │                   refreshes customer avg_rating)
//!               └──────► Rejected  (hidden permanently)
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use velora_core::listing::{ListQuery, Listing, PageResult, SortDirection};
use velora_core::validation;
use velora_core::{Review, ReviewStatus};

use crate::error::{StoreError, StoreResult};
use crate::StoreInner;

// =============================================================================
// Query
// =============================================================================

/// Criteria for the admin review list. Text matches the reviewer name
/// and the comment body.
#[derive(Debug, Clone, Default)]
pub struct ReviewQuery {
    list: ListQuery,
    status: Option<ReviewStatus>,
    rating: Option<u8>,
    product_id: Option<String>,
}

impl ReviewQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.list = self.list.with_text(text);
        self
    }

    pub fn with_status(mut self, status: Option<ReviewStatus>) -> Self {
        self.status = status;
        self.list.reset_page();
        self
    }

    /// Exact star-rating filter.
    pub fn with_rating(mut self, rating: Option<u8>) -> Self {
        self.rating = rating;
        self.list.reset_page();
        self
    }

    pub fn with_product(mut self, product_id: Option<String>) -> Self {
        self.product_id = product_id;
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

    fn matches(&self, review: &Review) -> bool {
        self.list
            .matches_text([review.customer_name.as_str(), review.comment.as_str()])
            && self.status.map_or(true, |s| review.status == s)
            && self.rating.map_or(true, |r| review.rating == r)
            && self
                .product_id
                .as_deref()
                .map_or(true, |id| review.product_id == id)
    }
}

// =============================================================================
// Write Payload
// =============================================================================

/// A shopper-submitted review. Always enters the queue as `Pending`.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product_id: String,
    pub customer_name: String,
    pub rating: u8,
    pub comment: String,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for review operations.
#[derive(Clone)]
pub struct ReviewRepository {
    store: Arc<StoreInner>,
}

impl ReviewRepository {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        ReviewRepository { store }
    }

    /// Admin review list, newest first.
    pub async fn list(&self, query: &ReviewQuery) -> StoreResult<PageResult<Review>> {
        self.store.simulate_latency().await;

        debug!(text = ?query.list.text(), status = ?query.status, "Listing reviews");

        let reviews = self.store.reviews.read().await;
        Ok(Listing::of(&reviews)
            .filter(|r| query.matches(r))
            .sort_by(|a, b| a.created_at.cmp(&b.created_at), SortDirection::Desc)
            .page(query.list.page(), query.list.page_size()))
    }

    pub async fn get(&self, id: &str) -> StoreResult<Review> {
        self.store.simulate_latency().await;

        let reviews = self.store.reviews.read().await;
        reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("review", id))
    }

    /// Every review. Dashboard aggregations use this.
    pub async fn all(&self) -> StoreResult<Vec<Review>> {
        self.store.simulate_latency().await;
        Ok(self.store.reviews.read().await.clone())
    }

    /// Approved reviews for a product page, newest first.
    pub async fn approved_for_product(&self, product_id: &str) -> StoreResult<Vec<Review>> {
        self.store.simulate_latency().await;

        let reviews = self.store.reviews.read().await;
        Ok(Listing::of(&reviews)
            .filter(|r| r.product_id == product_id && r.status == ReviewStatus::Approved)
            .sort_by(|a, b| a.created_at.cmp(&b.created_at), SortDirection::Desc)
            .collect_all())
    }

    /// Submits a review into the moderation queue.
    pub async fn submit(&self, new: NewReview) -> StoreResult<Review> {
        self.store.simulate_latency().await;

        validation::validate_rating(new.rating)?;

        // the product must exist, active or not
        {
            let products = self.store.products.read().await;
            if !products.iter().any(|p| p.id == new.product_id) {
                return Err(StoreError::not_found("product", &new.product_id));
            }
        }

        let review = Review {
            id: Uuid::new_v4().to_string(),
            product_id: new.product_id,
            customer_name: new.customer_name,
            rating: new.rating,
            comment: new.comment,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        };

        info!(review_id = %review.id, rating = review.rating, "Review submitted");

        self.store.reviews.write().await.push(review.clone());
        Ok(review)
    }

    /// Approves or rejects a pending review.
    ///
    /// Approving refreshes the reviewer's mean rating when the name
    /// matches a customer record.
    pub async fn moderate(&self, id: &str, verdict: ReviewStatus) -> StoreResult<Review> {
        self.store.simulate_latency().await;

        let mut customers = self.store.customers.write().await;
        let mut reviews = self.store.reviews.write().await;

        let review = reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("review", id))?;

        // Only pending reviews sit in the queue; a second verdict on the
        // same review is a stale admin tab.
        if review.status != ReviewStatus::Pending {
            return Err(StoreError::InvalidTransition {
                entity: "review".to_string(),
                id: review.id.clone(),
                from: format!("{:?}", review.status).to_lowercase(),
                to: format!("{:?}", verdict).to_lowercase(),
            });
        }

        if let Some(r) = reviews.iter_mut().find(|r| r.id == id) {
            r.status = verdict;
        }

        if verdict == ReviewStatus::Approved {
            if let Some(customer) = customers
                .iter_mut()
                .find(|c| c.name == review.customer_name)
            {
                let ratings: Vec<f64> = reviews
                    .iter()
                    .filter(|r| {
                        r.customer_name == customer.name && r.status == ReviewStatus::Approved
                    })
                    .map(|r| r.rating as f64)
                    .collect();
                if !ratings.is_empty() {
                    customer.avg_rating = ratings.iter().sum::<f64>() / ratings.len() as f64;
                }
            }
        }

        info!(review_id = %id, verdict = ?verdict, "Review moderated");

        let updated = reviews
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("review", id))?;
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
