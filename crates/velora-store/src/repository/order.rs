//! # Order Repository
//!
//! Order creation and lifecycle management.
//!
//! ## Order Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Creating an order                                    │
//! │                                                                         │
//! │  CreateOrder { items, coupon_code, customer }                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Validate: at least one item, sane quantities                       │
//! │  2. Resolve products, check stock for EVERY line first                 │
//! │  3. Snapshot name + unit price into OrderItems (frozen)                │
//! │  4. Evaluate coupon against subtotal → clamped discount                │
//! │  5. Decrement stock, bump coupon used_count                            │
//! │  6. Bump customer aggregates (total_orders, total_spent)               │
//! │  7. Push the order, status = Pending                                   │
//! │                                                                         │
//! │  Any failure before step 5 leaves every collection untouched.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All collection locks are taken in the [`StoreInner`] declaration order
//! (products, orders, coupons, customers, reviews) so multi-collection
//! operations cannot deadlock each other.
//!
//! [`StoreInner`]: crate::StoreInner

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use velora_core::coupon;
use velora_core::listing::{ListQuery, Listing, PageResult, SortDirection};
use velora_core::validation;
use velora_core::{Money, Order, OrderItem, OrderStatus, ProductCategory};

use crate::error::{StoreError, StoreResult};
use crate::StoreInner;

// =============================================================================
// Query
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSort {
    /// Creation time. Admin default pairs this with descending.
    #[default]
    Created,
    Total,
}

/// Criteria for the admin order list. Text matches the order ID and the
/// customer name.
#[derive(Debug, Clone, Default)]
pub struct OrderQuery {
    list: ListQuery,
    status: Option<OrderStatus>,
    sort: OrderSort,
    direction: SortDirection,
}

impl OrderQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admin view default: newest orders first.
    pub fn newest_first() -> Self {
        Self {
            direction: SortDirection::Desc,
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.list = self.list.with_text(text);
        self
    }

    /// `None` is the "all statuses" tab.
    pub fn with_status(mut self, status: Option<OrderStatus>) -> Self {
        self.status = status;
        self.list.reset_page();
        self
    }

    pub fn with_sort(mut self, sort: OrderSort, direction: SortDirection) -> Self {
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

    fn matches(&self, order: &Order) -> bool {
        self.list
            .matches_text([order.id.as_str(), order.customer_name.as_str()])
            && self.status.map_or(true, |s| order.status == s)
    }

    fn compare(&self, a: &Order, b: &Order) -> std::cmp::Ordering {
        match self.sort {
            OrderSort::Created => a.created_at.cmp(&b.created_at),
            OrderSort::Total => a.total_cents.cmp(&b.total_cents),
        }
    }
}

// =============================================================================
// Write Payloads
// =============================================================================

/// One requested line in a new order.
#[derive(Debug, Clone)]
pub struct CreateOrderItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Payload for placing an order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// Known customer record, if the shopper is signed in.
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub items: Vec<CreateOrderItem>,
    pub coupon_code: Option<String>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for order operations.
#[derive(Clone)]
pub struct OrderRepository {
    store: Arc<StoreInner>,
}

impl OrderRepository {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        OrderRepository { store }
    }

    pub async fn list(&self, query: &OrderQuery) -> StoreResult<PageResult<Order>> {
        self.store.simulate_latency().await;

        debug!(
            text = ?query.list.text(),
            status = ?query.status,
            page = query.list.page(),
            "Listing orders"
        );

        let orders = self.store.orders.read().await;
        Ok(Listing::of(&orders)
            .filter(|o| query.matches(o))
            .sort_by(|a, b| query.compare(a, b), query.direction)
            .page(query.list.page(), query.list.page_size()))
    }

    pub async fn get(&self, id: &str) -> StoreResult<Order> {
        self.store.simulate_latency().await;

        let orders = self.store.orders.read().await;
        orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("order", id))
    }

    /// Every order. Dashboard aggregations use this.
    pub async fn all(&self) -> StoreResult<Vec<Order>> {
        self.store.simulate_latency().await;
        Ok(self.store.orders.read().await.clone())
    }

    /// The `n` most recently placed orders, newest first.
    pub async fn recent(&self, n: usize) -> StoreResult<Vec<Order>> {
        self.store.simulate_latency().await;

        let orders = self.store.orders.read().await;
        let mut recent = Listing::of(&orders)
            .sort_by(|a, b| a.created_at.cmp(&b.created_at), SortDirection::Desc)
            .collect_all();
        recent.truncate(n);
        Ok(recent)
    }

    /// Places an order: snapshots prices, applies the coupon, decrements
    /// stock, bumps customer aggregates. The new order starts `Pending`.
    ///
    /// Stock for every line is verified before anything is written, so a
    /// failed order leaves products, coupons and customers untouched.
    pub async fn create(&self, new: CreateOrder) -> StoreResult<Order> {
        self.store.simulate_latency().await;

        if new.items.is_empty() {
            return Err(StoreError::EmptyOrder);
        }
        for item in &new.items {
            validation::validate_quantity(item.quantity).map_err(StoreError::Validation)?;
        }

        // Lock order: products → orders → coupons → customers.
        let mut products = self.store.products.write().await;
        let mut orders = self.store.orders.write().await;
        let mut coupons = self.store.coupons.write().await;
        let mut customers = self.store.customers.write().await;

        // Resolve every line and verify stock before mutating anything.
        let mut line_items: Vec<OrderItem> = Vec::with_capacity(new.items.len());
        let mut categories: Vec<ProductCategory> = Vec::new();
        for line in &new.items {
            let product = products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| StoreError::not_found("product", &line.product_id))?;

            if !product.can_fulfill(line.quantity) {
                return Err(StoreError::InsufficientStock {
                    product: product.name.en.clone(),
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            if !categories.contains(&product.category) {
                categories.push(product.category);
            }
            line_items.push(OrderItem {
                product_id: product.id.clone(),
                name_snapshot: product.name.en.clone(),
                unit_price_cents: product.price_cents,
                quantity: line.quantity,
                line_total_cents: product.price_cents * line.quantity,
            });
        }

        let subtotal_cents: i64 = line_items.iter().map(|i| i.line_total_cents).sum();
        let now = Utc::now();

        // Coupon is evaluated against the snapshot subtotal. An unknown
        // code is NotFound; an ineligible one is CouponRejected.
        let mut discount_cents = 0;
        let mut applied_code = None;
        if let Some(code) = &new.coupon_code {
            let coupon = coupons
                .iter_mut()
                .find(|c| c.code.eq_ignore_ascii_case(code))
                .ok_or_else(|| StoreError::not_found("coupon", code))?;

            let discount =
                coupon::evaluate(coupon, Money::from_cents(subtotal_cents), &categories, now)?;
            discount_cents = discount.cents();
            coupon.used_count += 1;
            applied_code = Some(coupon.code.clone());
        }

        // All checks passed; now mutate.
        for item in &line_items {
            if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock -= item.quantity;
                product.updated_at = now;
            }
        }

        if let Some(customer_id) = &new.customer_id {
            match customers.iter_mut().find(|c| &c.id == customer_id) {
                Some(customer) => {
                    customer.total_orders += 1;
                    customer.total_spent_cents += subtotal_cents - discount_cents;
                }
                // Stale session id: place the order as a guest
                None => warn!(customer_id = %customer_id, "Order for unknown customer"),
            }
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: new.customer_id,
            customer_name: new.customer_name,
            status: OrderStatus::Pending,
            subtotal_cents,
            discount_cents,
            total_cents: subtotal_cents - discount_cents,
            coupon_code: applied_code,
            items: line_items,
            created_at: now,
            updated_at: now,
        };

        info!(
            order_id = %order.id,
            customer = %order.customer_name,
            total_cents = order.total_cents,
            items = order.items.len(),
            "Order placed"
        );

        orders.push(order.clone());
        Ok(order)
    }

    /// Moves an order to `next`, enforcing the status state machine.
    ///
    /// Cancelling restocks every line item and unwinds the customer's
    /// aggregates, since the order never shipped.
    pub async fn update_status(&self, id: &str, next: OrderStatus) -> StoreResult<Order> {
        self.store.simulate_latency().await;

        let mut products = self.store.products.write().await;
        let mut orders = self.store.orders.write().await;
        let customers = &self.store.customers;

        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| StoreError::not_found("order", id))?;

        if !order.status.can_transition_to(next) {
            return Err(StoreError::InvalidTransition {
                entity: "order".to_string(),
                id: order.id.clone(),
                from: order.status.to_string(),
                to: next.to_string(),
            });
        }

        let now = Utc::now();
        if next == OrderStatus::Cancelled {
            for item in &order.items {
                if let Some(product) = products.iter_mut().find(|p| p.id == item.product_id) {
                    product.stock += item.quantity;
                    product.updated_at = now;
                }
            }
            if let Some(customer_id) = &order.customer_id {
                let mut customers = customers.write().await;
                if let Some(customer) = customers.iter_mut().find(|c| &c.id == customer_id) {
                    customer.total_orders = customer.total_orders.saturating_sub(1);
                    customer.total_spent_cents -= order.total_cents;
                }
            }
        }

        info!(order_id = %id, from = %order.status, to = %next, "Order status changed");

        order.status = next;
        order.updated_at = now;
        Ok(order.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::product::ProductQuery;
    use crate::{Store, StoreConfig};

    async fn store_and_product_id() -> (Store, String) {
        let store = Store::new(StoreConfig::for_tests());
        let page = store
            .products()
            .list(&ProductQuery::storefront().in_stock_only())
            .await
            .unwrap();
        let id = page.items[0].id.clone();
        (store, id)
    }

    fn order_for(product_id: &str, quantity: i64) -> CreateOrder {
        CreateOrder {
            customer_id: None,
            customer_name: "Walk-in Shopper".to_string(),
            items: vec![CreateOrderItem {
                product_id: product_id.to_string(),
                quantity,
            }],
            coupon_code: None,
        }
    }

    #[tokio::test]
    async fn test_create_snapshots_and_decrements_stock() {
        let (store, product_id) = store_and_product_id().await;
        let before = store.products().get(&product_id).await.unwrap();

        let order = store
            .orders()
            .create(order_for(&product_id, 2))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items[0].unit_price_cents, before.price_cents);
        assert_eq!(order.subtotal_cents, before.price_cents * 2);
        assert_eq!(order.total_cents, order.subtotal_cents);

        let after = store.products().get(&product_id).await.unwrap();
        assert_eq!(after.stock, before.stock - 2);
    }

    #[tokio::test]
    async fn test_empty_order_rejected() {
        let store = Store::new(StoreConfig::for_tests());
        let err = store
            .orders()
            .create(CreateOrder {
                customer_id: None,
                customer_name: "Nobody".to_string(),
                items: vec![],
                coupon_code: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::EmptyOrder));
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_store_untouched() {
        let (store, product_id) = store_and_product_id().await;
        let before = store.products().get(&product_id).await.unwrap();
        let order_count = store.orders().all().await.unwrap().len();
        let uses_before = store
            .coupons()
            .find_by_code("SAVE10")
            .await
            .unwrap()
            .used_count;

        let mut request = order_for(&product_id, before.stock + 1);
        request.coupon_code = Some("SAVE10".to_string());
        let err = store.orders().create(request).await.unwrap_err();
        assert!(matches!(err, StoreError::InsufficientStock { .. }));

        // nothing was written
        let after = store.products().get(&product_id).await.unwrap();
        assert_eq!(after.stock, before.stock);
        assert_eq!(store.orders().all().await.unwrap().len(), order_count);
        let save10 = store.coupons().find_by_code("SAVE10").await.unwrap();
        assert_eq!(save10.used_count, uses_before);
    }

    #[tokio::test]
    async fn test_coupon_applied_and_counted() {
        let (store, product_id) = store_and_product_id().await;
        let uses_before = store
            .coupons()
            .find_by_code("SAVE10")
            .await
            .unwrap()
            .used_count;

        let mut request = order_for(&product_id, 1);
        request.coupon_code = Some("save10".to_string()); // case-insensitive

        let order = store.orders().create(request).await.unwrap();
        assert_eq!(order.coupon_code.as_deref(), Some("SAVE10"));
        // SAVE10 is 10%, rounded half-up
        let expected = (order.subtotal_cents * 10 + 50) / 100;
        assert_eq!(order.discount_cents, expected);
        assert_eq!(order.total_cents, order.subtotal_cents - expected);

        let coupon = store.coupons().find_by_code("SAVE10").await.unwrap();
        assert_eq!(coupon.used_count, uses_before + 1);
    }

    #[tokio::test]
    async fn test_unknown_coupon_is_not_found() {
        let (store, product_id) = store_and_product_id().await;
        let mut request = order_for(&product_id, 1);
        request.coupon_code = Some("BOGUS99".to_string());
        let err = store.orders().create(request).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_status_state_machine() {
        let (store, product_id) = store_and_product_id().await;
        let order = store
            .orders()
            .create(order_for(&product_id, 1))
            .await
            .unwrap();

        // Pending cannot skip to Shipped
        let err = store
            .orders()
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));

        let order = store
            .orders()
            .update_status(&order.id, OrderStatus::Processing)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Processing);
        let order = store
            .orders()
            .update_status(&order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        let order = store
            .orders()
            .update_status(&order.id, OrderStatus::Delivered)
            .await
            .unwrap();

        // Delivered is terminal
        let err = store
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_cancel_restocks() {
        let (store, product_id) = store_and_product_id().await;
        let before = store.products().get(&product_id).await.unwrap();

        let order = store
            .orders()
            .create(order_for(&product_id, 3))
            .await
            .unwrap();
        assert_eq!(
            store.products().get(&product_id).await.unwrap().stock,
            before.stock - 3
        );

        store
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(
            store.products().get(&product_id).await.unwrap().stock,
            before.stock
        );
    }

    #[tokio::test]
    async fn test_customer_aggregates_follow_orders() {
        let store = Store::new(StoreConfig::for_tests());
        let customers = store.customers().all().await.unwrap();
        let customer = customers[0].clone();
        let page = store
            .products()
            .list(&ProductQuery::storefront().in_stock_only())
            .await
            .unwrap();

        let order = store
            .orders()
            .create(CreateOrder {
                customer_id: Some(customer.id.clone()),
                customer_name: customer.name.clone(),
                items: vec![CreateOrderItem {
                    product_id: page.items[0].id.clone(),
                    quantity: 1,
                }],
                coupon_code: None,
            })
            .await
            .unwrap();

        let updated = store.customers().get(&customer.id).await.unwrap();
        assert_eq!(updated.total_orders, customer.total_orders + 1);
        assert_eq!(
            updated.total_spent_cents,
            customer.total_spent_cents + order.total_cents
        );

        // cancelling unwinds the aggregates
        store
            .orders()
            .update_status(&order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        let reverted = store.customers().get(&customer.id).await.unwrap();
        assert_eq!(reverted.total_orders, customer.total_orders);
        assert_eq!(reverted.total_spent_cents, customer.total_spent_cents);
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_text() {
        let store = Store::new(StoreConfig::for_tests());
        let page = store
            .orders()
            .list(
                &OrderQuery::newest_first()
                    .with_status(Some(OrderStatus::Delivered))
                    .with_page_size(100),
            )
            .await
            .unwrap();
        assert!(!page.items.is_empty());
        assert!(page
            .items
            .iter()
            .all(|o| o.status == OrderStatus::Delivered));

        let page = store
            .orders()
            .list(&OrderQuery::newest_first().with_text("mai chan"))
            .await
            .unwrap();
        assert!(page.items.iter().all(|o| o.customer_name == "Mai Chan"));
        assert!(!page.items.is_empty());
    }
}
