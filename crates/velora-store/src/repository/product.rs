//! # Product Repository
//!
//! Catalog reads plus the admin product CRUD and inventory operations.
//!
//! ## Listing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How a catalog query runs                             │
//! │                                                                         │
//! │  ProductQuery { text: "vitamin", category: Serum, page: 1 }            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Listing::of(products)                                                 │
//! │      .filter(status == Active)        ← storefront only sees active    │
//! │      .filter(name/description match)  ← any language                   │
//! │      .filter(category == Serum)                                        │
//! │      .sort_by(...)                                                     │
//! │      .page(1, page_size)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PageResult<Product>                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Soft Delete
//! `deactivate` flips the status to `Inactive` instead of removing the row,
//! so order items keep a resolvable `product_id`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use velora_core::listing::{ListQuery, Listing, PageResult, SortDirection};
use velora_core::validation;
use velora_core::{
    LocalizedName, Product, ProductCategory, ProductStatus, SkinType, LOW_STOCK_THRESHOLD,
};

use crate::error::{StoreError, StoreResult};
use crate::StoreInner;

// =============================================================================
// Query
// =============================================================================

/// Sort key for product listings. Direction lives on the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Creation time. The storefront default ("newest") pairs this
    /// with descending.
    #[default]
    Created,
    /// English display name, alphabetical.
    Name,
    Price,
    Stock,
}

/// Criteria for a product listing. All filters AND together.
///
/// Setters for filter criteria reset the page to 1; only `with_page`
/// moves it.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    list: ListQuery,
    category: Option<ProductCategory>,
    skin_type: Option<SkinType>,
    status: Option<ProductStatus>,
    min_price_cents: Option<i64>,
    max_price_cents: Option<i64>,
    in_stock_only: bool,
    sort: ProductSort,
    direction: SortDirection,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storefront view: active products only, newest first.
    pub fn storefront() -> Self {
        Self {
            status: Some(ProductStatus::Active),
            direction: SortDirection::Desc,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.list = self.list.with_text(text);
        self
    }

    /// `None` clears the filter (the "all categories" tab).
    pub fn with_category(mut self, category: Option<ProductCategory>) -> Self {
        self.category = category;
        self.list.reset_page();
        self
    }

    pub fn with_skin_type(mut self, skin_type: Option<SkinType>) -> Self {
        self.skin_type = skin_type;
        self.list.reset_page();
        self
    }

    pub fn with_status(mut self, status: Option<ProductStatus>) -> Self {
        self.status = status;
        self.list.reset_page();
        self
    }

    /// Inclusive price bounds in cents. `None` on either side leaves that
    /// side open.
    pub fn with_price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price_cents = min;
        self.max_price_cents = max;
        self.list.reset_page();
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock_only = true;
        self.list.reset_page();
        self
    }

    pub fn with_sort(mut self, sort: ProductSort, direction: SortDirection) -> Self {
        self.sort = sort;
        self.direction = direction;
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

    fn matches(&self, product: &Product) -> bool {
        self.list.matches_text(
            product
                .name
                .values()
                .chain(std::iter::once(product.description.as_str())),
        ) && self.category.map_or(true, |c| product.category == c)
            && self
                .skin_type
                .map_or(true, |s| product.skin_type.suits(s))
            && self.status.map_or(true, |s| product.status == s)
            && self
                .min_price_cents
                .map_or(true, |min| product.price_cents >= min)
            && self
                .max_price_cents
                .map_or(true, |max| product.price_cents <= max)
            && (!self.in_stock_only || product.stock > 0)
    }

    fn compare(&self, a: &Product, b: &Product) -> std::cmp::Ordering {
        match self.sort {
            ProductSort::Created => a.created_at.cmp(&b.created_at),
            ProductSort::Name => a.name.en.to_lowercase().cmp(&b.name.en.to_lowercase()),
            ProductSort::Price => a.price_cents.cmp(&b.price_cents),
            ProductSort::Stock => a.stock.cmp(&b.stock),
        }
    }
}

// =============================================================================
// Write Payloads
// =============================================================================

/// Fields for creating a product from the admin dashboard.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: LocalizedName,
    pub description: String,
    pub price_cents: i64,
    pub category: ProductCategory,
    pub skin_type: SkinType,
    pub image_url: String,
    pub stock: i64,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<LocalizedName>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<ProductCategory>,
    pub skin_type: Option<SkinType>,
    pub image_url: Option<String>,
    pub status: Option<ProductStatus>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog and inventory operations.
#[derive(Clone)]
pub struct ProductRepository {
    store: Arc<StoreInner>,
}

impl ProductRepository {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        ProductRepository { store }
    }

    /// Runs a product listing through filter → sort → paginate.
    pub async fn list(&self, query: &ProductQuery) -> StoreResult<PageResult<Product>> {
        self.store.simulate_latency().await;

        debug!(
            text = ?query.list.text(),
            category = ?query.category,
            page = query.list.page(),
            "Listing products"
        );

        let products = self.store.products.read().await;
        Ok(Listing::of(&products)
            .filter(|p| query.matches(p))
            .sort_by(|a, b| query.compare(a, b), query.direction)
            .page(query.list.page(), query.list.page_size()))
    }

    /// Fetches a product by ID.
    pub async fn get(&self, id: &str) -> StoreResult<Product> {
        self.store.simulate_latency().await;

        let products = self.store.products.read().await;
        products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("product", id))
    }

    /// Every product regardless of status. Dashboard aggregations use this.
    pub async fn all(&self) -> StoreResult<Vec<Product>> {
        self.store.simulate_latency().await;
        Ok(self.store.products.read().await.clone())
    }

    /// Active products at or below the low-stock threshold, lowest first.
    /// Out-of-stock products are included.
    pub async fn low_stock(&self) -> StoreResult<Vec<Product>> {
        self.store.simulate_latency().await;

        let products = self.store.products.read().await;
        Ok(Listing::of(&products)
            .filter(|p| p.is_active() && p.stock <= LOW_STOCK_THRESHOLD)
            .sort_by(|a, b| a.stock.cmp(&b.stock), SortDirection::Asc)
            .collect_all())
    }

    /// Creates a product and returns it.
    pub async fn create(&self, new: NewProduct) -> StoreResult<Product> {
        self.store.simulate_latency().await;

        validation::validate_product_name(&new.name.en)?;
        validation::validate_price_cents(new.price_cents)?;
        validation::validate_stock(new.stock)?;

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            price_cents: new.price_cents,
            category: new.category,
            skin_type: new.skin_type,
            image_url: new.image_url,
            stock: new.stock,
            status: ProductStatus::Active,
            created_at: now,
            updated_at: now,
        };

        info!(product_id = %product.id, name = %product.name.en, "Product created");

        self.store.products.write().await.push(product.clone());
        Ok(product)
    }

    /// Applies a partial update and returns the updated product.
    pub async fn update(&self, id: &str, update: UpdateProduct) -> StoreResult<Product> {
        self.store.simulate_latency().await;

        if let Some(name) = &update.name {
            validation::validate_product_name(&name.en)?;
        }
        if let Some(price) = update.price_cents {
            validation::validate_price_cents(price)?;
        }

        let mut products = self.store.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        if let Some(name) = update.name {
            product.name = name;
        }
        if let Some(description) = update.description {
            product.description = description;
        }
        if let Some(price) = update.price_cents {
            product.price_cents = price;
        }
        if let Some(category) = update.category {
            product.category = category;
        }
        if let Some(skin_type) = update.skin_type {
            product.skin_type = skin_type;
        }
        if let Some(image_url) = update.image_url {
            product.image_url = image_url;
        }
        if let Some(status) = update.status {
            product.status = status;
        }
        product.updated_at = Utc::now();

        info!(product_id = %id, "Product updated");
        Ok(product.clone())
    }

    /// Soft delete: hides the product from the storefront but keeps the
    /// record for order history.
    pub async fn deactivate(&self, id: &str) -> StoreResult<Product> {
        self.update(
            id,
            UpdateProduct {
                status: Some(ProductStatus::Inactive),
                ..UpdateProduct::default()
            },
        )
        .await
    }

    /// Adjusts stock by a signed delta. Fails with `InsufficientStock`
    /// if the result would go negative; stock never does.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<Product> {
        self.store.simulate_latency().await;

        let mut products = self.store.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        let next = product.stock + delta;
        if next < 0 {
            return Err(StoreError::InsufficientStock {
                product: product.name.en.clone(),
                available: product.stock,
                requested: -delta,
            });
        }

        product.stock = next;
        product.updated_at = Utc::now();

        info!(product_id = %id, delta, stock = product.stock, "Stock adjusted");
        Ok(product.clone())
    }

    /// Sets stock to an absolute quantity (inventory recount).
    pub async fn set_stock(&self, id: &str, stock: i64) -> StoreResult<Product> {
        self.store.simulate_latency().await;

        validation::validate_stock(stock)?;

        let mut products = self.store.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("product", id))?;

        product.stock = stock;
        product.updated_at = Utc::now();

        info!(product_id = %id, stock, "Stock set");
        Ok(product.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
