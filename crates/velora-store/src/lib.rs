//! # Velora Store
//!
//! In-memory data layer for the Velora shop.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                velora-api                   │
//! │        (services, auth, DTO mapping)        │
//! └──────────────────────┬──────────────────────┘
//!                        │
//! ┌──────────────────────▼──────────────────────┐
//! │               velora-store                  │
//! │   Store ──► repositories ──► RwLock<Vec<T>> │
//! └──────────────────────┬──────────────────────┘
//!                        │
//! ┌──────────────────────▼──────────────────────┐
//! │               velora-core                   │
//! │      (pure types, money, listing, coupon)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! There is deliberately no database behind this crate. Collections live in
//! [`tokio::sync::RwLock`]-guarded vectors, seeded once at construction, and
//! every repository call sleeps for a configurable latency so callers behave
//! the same way they would against a real backend. All state is lost on
//! restart.

pub mod error;
pub mod repository;

mod seed;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use velora_core::{Coupon, Customer, Order, Product, Review};

pub use error::{StoreError, StoreResult};
pub use repository::coupon::{CouponQuery, CouponRepository, NewCoupon, UpdateCoupon};
pub use repository::customer::{CustomerQuery, CustomerRepository, CustomerSort};
pub use repository::order::{CreateOrder, CreateOrderItem, OrderQuery, OrderRepository, OrderSort};
pub use repository::product::{
    NewProduct, ProductQuery, ProductRepository, ProductSort, UpdateProduct,
};
pub use repository::review::{NewReview, ReviewQuery, ReviewRepository};

/// Default simulated round-trip latency per repository call.
pub const DEFAULT_LATENCY_MS: u64 = 80;

/// Construction options for [`Store`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Sleep applied at the top of every repository call.
    pub latency: Duration,
    /// Whether to load the demo catalog. Disable for tests that want an
    /// empty store.
    pub seed: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(DEFAULT_LATENCY_MS),
            seed: true,
        }
    }
}

impl StoreConfig {
    /// Seeded store with no artificial latency. What the test suites use.
    pub fn for_tests() -> Self {
        Self {
            latency: Duration::ZERO,
            seed: true,
        }
    }

    /// Empty store with no artificial latency.
    pub fn empty() -> Self {
        Self {
            latency: Duration::ZERO,
            seed: false,
        }
    }
}

/// Shared mutable state behind every repository handle.
pub(crate) struct StoreInner {
    latency: Duration,
    pub(crate) products: RwLock<Vec<Product>>,
    pub(crate) orders: RwLock<Vec<Order>>,
    pub(crate) coupons: RwLock<Vec<Coupon>>,
    pub(crate) customers: RwLock<Vec<Customer>>,
    pub(crate) reviews: RwLock<Vec<Review>>,
}

impl StoreInner {
    pub(crate) async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Handle to the in-memory store. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        let data = if config.seed {
            seed::seed_data()
        } else {
            seed::SeedData {
                products: vec![],
                coupons: vec![],
                customers: vec![],
                orders: vec![],
                reviews: vec![],
            }
        };

        info!(
            products = data.products.len(),
            orders = data.orders.len(),
            coupons = data.coupons.len(),
            customers = data.customers.len(),
            reviews = data.reviews.len(),
            latency_ms = config.latency.as_millis() as u64,
            "Store initialized"
        );

        Self {
            inner: Arc::new(StoreInner {
                latency: config.latency,
                products: RwLock::new(data.products),
                orders: RwLock::new(data.orders),
                coupons: RwLock::new(data.coupons),
                customers: RwLock::new(data.customers),
                reviews: RwLock::new(data.reviews),
            }),
        }
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(Arc::clone(&self.inner))
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(Arc::clone(&self.inner))
    }

    pub fn coupons(&self) -> CouponRepository {
        CouponRepository::new(Arc::clone(&self.inner))
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(Arc::clone(&self.inner))
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(Arc::clone(&self.inner))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
