//! # Cart & Checkout Service
//!
//! One cart per session, held behind a mutex so concurrent handlers see a
//! consistent view. All price math lives in `velora_core::cart`; this layer
//! fetches live product data, keeps the coupon code on the cart, and turns
//! a checkout into an order.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};
use ts_rs::TS;

use velora_core::{Cart, CartTotals, ProductStatus};
use velora_store::{CreateOrder, CreateOrderItem, Store};

use crate::dto::{CartDto, OrderDto};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Cart state
// =============================================================================

/// Shared handle to the session cart.
///
/// Cloning shares the underlying cart. Lock poisoning only happens if a
/// panic occurs while holding the lock, which indicates a bug.
#[derive(Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Checkout form
// =============================================================================

/// What the checkout page collects. Guests leave `customer_id` empty.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutForm {
    pub customer_id: Option<String>,
    pub customer_name: String,
}

// =============================================================================
// Service
// =============================================================================

/// Cart mutation and order placement.
#[derive(Clone)]
pub struct CheckoutService {
    store: Store,
    cart: CartState,
}

impl CheckoutService {
    pub fn new(store: Store, cart: CartState) -> Self {
        CheckoutService { store, cart }
    }

    /// Current cart with totals. A coupon that has become invalid since it
    /// was applied (expired, exhausted, subtotal dropped below minimum) is
    /// silently ignored for totals but stays on the cart so the UI can show
    /// why the discount vanished.
    pub async fn get_cart(&self) -> ApiResult<CartDto> {
        let (snapshot, code) =
            self.cart.with_cart(|cart| (cart.clone(), cart.coupon_code.clone()));

        let totals = match code {
            Some(code) => self.totals_for(&snapshot, &code).await,
            None => snapshot.totals(),
        };
        Ok(CartDto::from_cart(&snapshot, totals))
    }

    async fn totals_for(&self, cart: &Cart, code: &str) -> CartTotals {
        match self.store.coupons().find_by_code(code).await {
            Ok(coupon) => match cart.totals_with_coupon(&coupon, Utc::now()) {
                Ok(totals) => totals,
                Err(rejection) => {
                    debug!(code = %code, reason = %rejection, "Applied coupon no longer valid");
                    cart.totals()
                }
            },
            Err(_) => {
                warn!(code = %code, "Cart references a coupon that no longer exists");
                cart.totals()
            }
        }
    }

    /// Adds a product to the cart after checking it is active and in stock
    /// for the requested quantity plus whatever is already in the cart.
    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> ApiResult<CartDto> {
        let product = self.store.products().get(product_id).await?;
        if product.status != ProductStatus::Active {
            return Err(ApiError::not_found("product", product_id));
        }

        let already = self.cart.with_cart(|cart| {
            cart.items
                .iter()
                .find(|i| i.product_id == product_id)
                .map_or(0, |i| i.quantity)
        });
        if !product.can_fulfill(already + quantity) {
            return Err(ApiError::new(
                crate::error::ErrorCode::InsufficientStock,
                format!("Only {} left in stock", product.stock),
            ));
        }

        self.cart.with_cart_mut(|cart| cart.add_item(&product, quantity))?;
        debug!(product_id = %product_id, quantity, "Added to cart");
        self.get_cart().await
    }

    pub async fn update_quantity(&self, product_id: &str, quantity: i64) -> ApiResult<CartDto> {
        if quantity > 0 {
            let product = self.store.products().get(product_id).await?;
            if !product.can_fulfill(quantity) {
                return Err(ApiError::new(
                    crate::error::ErrorCode::InsufficientStock,
                    format!("Only {} left in stock", product.stock),
                ));
            }
        }
        self.cart
            .with_cart_mut(|cart| cart.update_quantity(product_id, quantity))?;
        self.get_cart().await
    }

    pub async fn remove_item(&self, product_id: &str) -> ApiResult<CartDto> {
        self.cart.with_cart_mut(|cart| cart.remove_item(product_id))?;
        self.get_cart().await
    }

    pub async fn clear_cart(&self) -> ApiResult<CartDto> {
        self.cart.with_cart_mut(|cart| cart.clear());
        self.get_cart().await
    }

    /// Validates a coupon against the current cart and, if it holds, stores
    /// the code on the cart. Totals from here on include the discount.
    pub async fn apply_coupon(&self, code: &str) -> ApiResult<CartDto> {
        let (subtotal, categories, empty) = self
            .cart
            .with_cart(|cart| (cart.subtotal(), cart.categories(), cart.is_empty()));
        if empty {
            return Err(ApiError::new(
                crate::error::ErrorCode::CartError,
                "Cannot apply a coupon to an empty cart",
            ));
        }

        let discount = self.store.coupons().preview(code, subtotal, &categories).await?;

        let stored = self.store.coupons().find_by_code(code).await?.code;
        self.cart.with_cart_mut(|cart| cart.coupon_code = Some(stored.clone()));
        info!(code = %stored, discount = %discount, "Coupon applied to cart");
        self.get_cart().await
    }

    pub async fn remove_coupon(&self) -> ApiResult<CartDto> {
        self.cart.with_cart_mut(|cart| cart.coupon_code = None);
        self.get_cart().await
    }

    /// Places the order and empties the cart. Stock checks, coupon
    /// redemption and customer aggregates all happen inside the store in
    /// one write, so a failure leaves the cart untouched.
    pub async fn checkout(&self, form: CheckoutForm) -> ApiResult<OrderDto> {
        let name = form.customer_name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Customer name is required"));
        }

        let (items, coupon_code) = self.cart.with_cart(|cart| {
            let items = cart
                .items
                .iter()
                .map(|i| CreateOrderItem {
                    product_id: i.product_id.clone(),
                    quantity: i.quantity,
                })
                .collect::<Vec<_>>();
            (items, cart.coupon_code.clone())
        });

        let order = self
            .store
            .orders()
            .create(CreateOrder {
                customer_id: form.customer_id,
                customer_name: name.to_string(),
                items,
                coupon_code,
            })
            .await?;

        self.cart.with_cart_mut(|cart| cart.clear());
        info!(order_id = %order.id, total = order.total_cents, "Checkout complete");
        Ok(OrderDto::from(order))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
