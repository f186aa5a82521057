//! # Catalog Service
//!
//! The storefront's read surface: product listings, product pages,
//! favorites and the recently-viewed shelf.
//!
//! ## Filter Sentinels
//! The UI sends `"all"` (or an empty string) to mean "no filter"; both
//! map to `None` before the query reaches the store. Unknown filter
//! values are a validation error rather than a silent no-match.

use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;
use ts_rs::TS;

use velora_core::listing::SortDirection;
use velora_core::{validation, ProductCategory, SkinType};
use velora_store::{ProductQuery, ProductSort, Store};

use crate::dto::{Paginated, ProductDto, ReviewDto};
use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// How many related products a product page shows.
const RELATED_LIMIT: usize = 4;

// =============================================================================
// Request
// =============================================================================

/// Raw listing parameters as the storefront sends them.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductListRequest {
    /// Free-text search; empty means no filter
    pub search: String,
    /// Category slug or "all"
    pub category: String,
    /// Skin type or "all"
    pub skin_type: String,
    /// "newest" | "name" | "price-asc" | "price-desc"
    pub sort: String,
    /// 1-indexed page
    pub page: u32,
}

impl ProductListRequest {
    fn to_query(&self, page_size: u32) -> ApiResult<ProductQuery> {
        let mut query = ProductQuery::storefront()
            .with_page_size(page_size)
            .with_text(validation::validate_search_query(&self.search)?);

        query = query.with_category(parse_filter::<ProductCategory>("category", &self.category)?);
        query = query.with_skin_type(parse_filter::<SkinType>("skin type", &self.skin_type)?);

        query = match self.sort.trim() {
            "" | "newest" => query.with_sort(ProductSort::Created, SortDirection::Desc),
            "name" => query.with_sort(ProductSort::Name, SortDirection::Asc),
            "price-asc" => query.with_sort(ProductSort::Price, SortDirection::Asc),
            "price-desc" => query.with_sort(ProductSort::Price, SortDirection::Desc),
            other => {
                return Err(ApiError::validation(format!("Unknown sort option: {}", other)));
            }
        };

        // page is applied last: the criteria setters above reset it
        Ok(query.with_page(self.page.max(1)))
    }
}

/// Parses a filter value, treating "" and "all" as absent.
fn parse_filter<T: FromStr>(label: &str, raw: &str) -> ApiResult<Option<T>> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .map_err(|_| ApiError::validation(format!("Unknown {}: {}", label, raw)))
}

// =============================================================================
// Response
// =============================================================================

/// Everything a product page needs in one call.
#[derive(Debug, Clone, serde::Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: ProductDto,
    /// Approved reviews, newest first.
    pub reviews: Vec<ReviewDto>,
    /// Mean approved rating, 0.0 when unreviewed.
    pub avg_rating: f64,
    /// Active products from the same category, excluding this one.
    pub related: Vec<ProductDto>,
    pub is_favorite: bool,
}

/// One entry in the category navigation, with its live product count.
#[derive(Debug, Clone, serde::Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub slug: String,
    pub product_count: usize,
}

// =============================================================================
// Service
// =============================================================================

/// Storefront catalog reads.
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    session: SessionStore,
    page_size: u32,
}

impl CatalogService {
    pub fn new(store: Store, session: SessionStore, page_size: u32) -> Self {
        CatalogService {
            store,
            session,
            page_size,
        }
    }

    /// The main catalog listing: active products, filtered, sorted, paged.
    pub async fn list_products(&self, request: &ProductListRequest) -> ApiResult<Paginated<ProductDto>> {
        let query = request.to_query(self.page_size)?;
        let page = self.store.products().list(&query).await?;
        Ok(Paginated::from_page(page, ProductDto::from))
    }

    /// Category navigation with per-category counts of active products.
    pub async fn categories(&self) -> ApiResult<Vec<CategorySummary>> {
        let products = self.store.products().all().await?;
        Ok(ProductCategory::ALL
            .iter()
            .map(|&category| CategorySummary {
                slug: category.as_str().to_string(),
                product_count: products
                    .iter()
                    .filter(|p| {
                        p.category == category
                            && p.status == velora_core::ProductStatus::Active
                    })
                    .count(),
            })
            .collect())
    }

    /// Product page payload. Also records the visit in the
    /// recently-viewed shelf.
    pub async fn get_product(&self, id: &str) -> ApiResult<ProductDetail> {
        let product = self.store.products().get(id).await?;
        let reviews = self.store.reviews().approved_for_product(id).await?;

        let avg_rating = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|r| r.rating as f64).sum::<f64>() / reviews.len() as f64
        };

        let related_page = self
            .store
            .products()
            .list(
                &ProductQuery::storefront()
                    .with_category(Some(product.category))
                    .with_page_size(velora_core::MAX_PAGE_SIZE),
            )
            .await?;
        let related: Vec<ProductDto> = related_page
            .items
            .into_iter()
            .filter(|p| p.id != product.id)
            .take(RELATED_LIMIT)
            .map(ProductDto::from)
            .collect();

        self.session.record_view(&product.id);
        debug!(product_id = %product.id, reviews = reviews.len(), "Product page loaded");

        Ok(ProductDetail {
            is_favorite: self.session.is_favorite(&product.id),
            product: ProductDto::from(product),
            reviews: reviews.into_iter().map(ReviewDto::from).collect(),
            avg_rating,
            related,
        })
    }

    /// Toggles a product in the favorites list. Returns the new state.
    pub async fn toggle_favorite(&self, product_id: &str) -> ApiResult<bool> {
        // make sure the id is real before persisting it
        self.store.products().get(product_id).await?;
        Ok(self.session.toggle_favorite(product_id))
    }

    /// The shopper's favorited products, skipping any that have since
    /// been deactivated.
    pub async fn favorites(&self) -> ApiResult<Vec<ProductDto>> {
        let mut out = Vec::new();
        for id in self.session.favorites() {
            if let Ok(product) = self.store.products().get(&id).await {
                if product.is_active() {
                    out.push(ProductDto::from(product));
                }
            }
        }
        Ok(out)
    }

    /// Recently-viewed shelf, most recent first.
    pub async fn recently_viewed(&self) -> ApiResult<Vec<ProductDto>> {
        let mut out = Vec::new();
        for id in self.session.recently_viewed() {
            if let Ok(product) = self.store.products().get(&id).await {
                if product.is_active() {
                    out.push(ProductDto::from(product));
                }
            }
        }
        Ok(out)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
