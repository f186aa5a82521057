//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         VELORA API                              │
//! │                                                                 │
//! │   The service layer frontends talk to. Wraps the in-memory      │
//! │   store with per-surface services, session state, JWT auth      │
//! │   and JSON-shaped DTOs (camelCase, TypeScript bindings via      │
//! │   ts-rs).                                                       │
//! │                                                                 │
//! │   ┌──────────────┐     ┌──────────────┐                         │
//! │   │  Storefront  │     │    Admin     │                         │
//! │   └──────┬───────┘     └──────┬───────┘                         │
//! │          │                    │                                 │
//! │          ▼                    ▼                                 │
//! │   catalog/checkout     products/orders/coupons                  │
//! │   auth/reviews         customers/dashboard/reviews              │
//! │          │                    │                                 │
//! │          └────────┬───────────┘                                 │
//! │                   ▼                                             │
//! │            velora-store  ──►  velora-core                       │
//! └─────────────────────────────────────────────────────────────────┘

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod services;
pub mod session;

pub use config::{ApiConfig, ConfigError};
pub use dto::{
    AuthResponse, CartDto, CartItemDto, CouponDto, CustomerDto, OrderDto, OrderItemDto,
    PageInfo, Paginated, ProductDto, ReviewDto, UserDto,
};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use session::SessionStore;

use tracing::info;

use velora_store::Store;

use services::auth::AuthService;
use services::catalog::CatalogService;
use services::checkout::{CartState, CheckoutService};
use services::coupons::CouponService;
use services::customers::CustomerService;
use services::dashboard::DashboardService;
use services::orders::OrderService;
use services::products::AdminProductService;
use services::reviews::ReviewService;

/// The fully wired application: one store, one session, every service.
///
/// Cloning is cheap and shares all state, so a handler layer can hold one
/// `Velora` per connection without duplicating the catalog.
#[derive(Clone)]
pub struct Velora {
    pub auth: AuthService,
    pub catalog: CatalogService,
    pub checkout: CheckoutService,
    pub coupons: CouponService,
    pub customers: CustomerService,
    pub dashboard: DashboardService,
    pub orders: OrderService,
    pub products: AdminProductService,
    pub reviews: ReviewService,
    store: Store,
    session: SessionStore,
}

impl Velora {
    /// Wires every service against a fresh seeded store.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let store = Store::new(config.store_config());
        let session = SessionStore::new();
        let cart = CartState::new();
        let page_size = config.page_size;

        let app = Velora {
            auth: AuthService::new(store.clone(), session.clone(), config)?,
            catalog: CatalogService::new(store.clone(), session.clone(), page_size),
            checkout: CheckoutService::new(store.clone(), cart),
            coupons: CouponService::new(store.clone(), page_size),
            customers: CustomerService::new(store.clone(), page_size),
            dashboard: DashboardService::new(store.clone()),
            orders: OrderService::new(store.clone(), page_size),
            products: AdminProductService::new(store.clone(), page_size),
            reviews: ReviewService::new(store.clone(), page_size),
            store,
            session,
        };
        info!("Velora services initialized");
        Ok(app)
    }

    /// Configuration from environment variables, defaults where unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ApiConfig::load()?;
        Self::new(&config).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }

    /// Direct store access, for callers that need repository-level
    /// operations the services do not expose.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> Velora {
        let config = ApiConfig {
            latency_ms: 0,
            ..ApiConfig::default()
        };
        Velora::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let app = app();
        let twin = app.clone();

        let page = app
            .products
            .list(&Default::default())
            .await
            .unwrap();
        let id = page.data[0].id.clone();

        app.store().products().set_stock(&id, 1).await.unwrap();
        let seen = twin.store().products().get(&id).await.unwrap();
        assert_eq!(seen.stock, 1);
    }

    #[tokio::test]
    async fn test_storefront_to_dashboard_roundtrip() {
        let app = app();

        let listing = app.catalog.list_products(&Default::default()).await.unwrap();
        let product = listing
            .data
            .iter()
            .find(|p| p.in_stock)
            .expect("seeded catalog has stock");

        app.checkout.add_to_cart(&product.id, 1).await.unwrap();
        let order = app
            .checkout
            .checkout(services::checkout::CheckoutForm {
                customer_id: None,
                customer_name: "Integration Shopper".to_string(),
            })
            .await
            .unwrap();

        let stats = app.dashboard.stats().await.unwrap();
        assert!(stats.recent_orders.iter().any(|o| o.id == order.id));
    }
}
