//! # Admin Product Service
//!
//! Product CRUD and inventory management for the dashboard. Unlike the
//! catalog, this surface sees inactive products and can filter on
//! status and stock.

use serde::Deserialize;
use ts_rs::TS;

use velora_core::listing::SortDirection;
use velora_core::{LocalizedName, ProductStatus, SkinType};
use velora_store::{NewProduct, ProductQuery, ProductSort, Store, UpdateProduct};

use crate::dto::{Paginated, ProductDto};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// Raw listing parameters from the admin product table.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminProductListRequest {
    pub search: String,
    /// "active" | "inactive" | "all"
    pub status: String,
    /// Show only products at or below the low-stock threshold
    pub low_stock_only: bool,
    /// "newest" | "name" | "stock"
    pub sort: String,
    pub page: u32,
}

/// Create/update form payload.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name_en: String,
    pub name_th: Option<String>,
    pub name_kh: Option<String>,
    pub description: String,
    pub price_cents: i64,
    pub category: String,
    pub skin_type: String,
    pub image_url: String,
    pub stock: i64,
}

impl ProductForm {
    fn name(&self) -> LocalizedName {
        LocalizedName {
            en: self.name_en.trim().to_string(),
            th: self.name_th.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from),
            kh: self.name_kh.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(String::from),
        }
    }

    fn parsed_category(&self) -> ApiResult<velora_core::ProductCategory> {
        self.category
            .parse()
            .map_err(|_| ApiError::validation(format!("Unknown category: {}", self.category)))
    }

    fn parsed_skin_type(&self) -> ApiResult<SkinType> {
        self.skin_type
            .parse()
            .map_err(|_| ApiError::validation(format!("Unknown skin type: {}", self.skin_type)))
    }
}

// =============================================================================
// Service
// =============================================================================

/// Dashboard product management.
#[derive(Clone)]
pub struct AdminProductService {
    store: Store,
    page_size: u32,
}

impl AdminProductService {
    pub fn new(store: Store, page_size: u32) -> Self {
        AdminProductService { store, page_size }
    }

    pub async fn list(&self, request: &AdminProductListRequest) -> ApiResult<Paginated<ProductDto>> {
        let mut query = ProductQuery::new()
            .with_page_size(self.page_size)
            .with_text(request.search.clone());

        query = match request.status.trim() {
            "" | "all" => query,
            "active" => query.with_status(Some(ProductStatus::Active)),
            "inactive" => query.with_status(Some(ProductStatus::Inactive)),
            other => return Err(ApiError::validation(format!("Unknown status: {}", other))),
        };

        query = match request.sort.trim() {
            "" | "newest" => query.with_sort(ProductSort::Created, SortDirection::Desc),
            "name" => query.with_sort(ProductSort::Name, SortDirection::Asc),
            "stock" => query.with_sort(ProductSort::Stock, SortDirection::Asc),
            other => return Err(ApiError::validation(format!("Unknown sort option: {}", other))),
        };

        query = query.with_page(request.page.max(1));

        let page = self.store.products().list(&query).await?;
        let mut page = Paginated::from_page(page, ProductDto::from);
        if request.low_stock_only {
            // low-stock is a client-side toggle over the current page in
            // the dashboard, not a stored filter
            page.data
                .retain(|p| p.stock <= velora_core::LOW_STOCK_THRESHOLD);
        }
        Ok(page)
    }

    pub async fn get(&self, id: &str) -> ApiResult<ProductDto> {
        Ok(ProductDto::from(self.store.products().get(id).await?))
    }

    pub async fn create(&self, form: ProductForm) -> ApiResult<ProductDto> {
        let product = self
            .store
            .products()
            .create(NewProduct {
                name: form.name(),
                description: form.description.trim().to_string(),
                price_cents: form.price_cents,
                category: form.parsed_category()?,
                skin_type: form.parsed_skin_type()?,
                image_url: form.image_url.trim().to_string(),
                stock: form.stock,
            })
            .await?;
        Ok(ProductDto::from(product))
    }

    pub async fn update(&self, id: &str, form: ProductForm) -> ApiResult<ProductDto> {
        let product = self
            .store
            .products()
            .update(
                id,
                UpdateProduct {
                    name: Some(form.name()),
                    description: Some(form.description.trim().to_string()),
                    price_cents: Some(form.price_cents),
                    category: Some(form.parsed_category()?),
                    skin_type: Some(form.parsed_skin_type()?),
                    image_url: Some(form.image_url.trim().to_string()),
                    status: None,
                },
            )
            .await?;
        Ok(ProductDto::from(product))
    }

    /// Soft delete. The product disappears from the storefront but stays
    /// resolvable for order history.
    pub async fn delete(&self, id: &str) -> ApiResult<ProductDto> {
        Ok(ProductDto::from(self.store.products().deactivate(id).await?))
    }

    /// Inventory recount to an absolute quantity.
    pub async fn set_stock(&self, id: &str, stock: i64) -> ApiResult<ProductDto> {
        Ok(ProductDto::from(self.store.products().set_stock(id, stock).await?))
    }

    /// Signed stock adjustment (restock or shrinkage).
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> ApiResult<ProductDto> {
        Ok(ProductDto::from(self.store.products().adjust_stock(id, delta).await?))
    }

    /// The low-stock alert list, lowest stock first.
    pub async fn low_stock(&self) -> ApiResult<Vec<ProductDto>> {
        let products = self.store.products().low_stock().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
