//! # Dashboard Service
//!
//! The admin landing page numbers. Everything is computed from the live
//! collections on each call, so the figures always agree with the tables
//! behind them: cancelled orders never count toward revenue, and pending
//! counts shrink the moment a verdict lands.

use serde::Serialize;
use ts_rs::TS;

use velora_core::{Money, OrderStatus, ReviewStatus};
use velora_store::Store;

use crate::dto::{OrderDto, ProductDto};
use crate::error::ApiResult;

const TOP_PRODUCT_LIMIT: usize = 5;
const RECENT_ORDER_LIMIT: usize = 5;

// =============================================================================
// DTOs
// =============================================================================

/// One row in the "top products" widget.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub units_sold: i64,
    pub revenue_cents: i64,
}

/// Order counts per status, in pipeline order.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

/// Everything the admin landing page renders.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub revenue_cents: i64,
    pub revenue: String,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub total_customers: usize,
    pub total_products: usize,
    pub pending_reviews: usize,
    pub status_breakdown: Vec<StatusCount>,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<ProductDto>,
    pub recent_orders: Vec<OrderDto>,
}

// =============================================================================
// Service
// =============================================================================

/// Computes the admin overview.
#[derive(Clone)]
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub fn new(store: Store) -> Self {
        DashboardService { store }
    }

    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        let orders = self.store.orders().all().await?;
        let products = self.store.products().all().await?;
        let customers = self.store.customers().all().await?;
        let reviews = self.store.reviews().all().await?;

        let revenue_cents: i64 = orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_cents)
            .sum();

        let status_breakdown = OrderStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: orders.iter().filter(|o| o.status == status).count(),
            })
            .collect();

        let top_products = top_products(&orders, &products);

        let low_stock = self
            .store
            .products()
            .low_stock()
            .await?
            .into_iter()
            .map(ProductDto::from)
            .collect();

        let recent_orders = self
            .store
            .orders()
            .recent(RECENT_ORDER_LIMIT)
            .await?
            .into_iter()
            .map(OrderDto::from)
            .collect();

        Ok(DashboardStats {
            revenue_cents,
            revenue: Money::from_cents(revenue_cents).to_string(),
            total_orders: orders.len(),
            pending_orders: orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            total_customers: customers.len(),
            total_products: products.len(),
            pending_reviews: reviews
                .iter()
                .filter(|r| r.status == ReviewStatus::Pending)
                .count(),
            status_breakdown,
            top_products,
            low_stock,
            recent_orders,
        })
    }
}

/// Units and revenue per product across non-cancelled orders, best sellers
/// first. Ties break on revenue.
fn top_products(
    orders: &[velora_core::Order],
    products: &[velora_core::Product],
) -> Vec<TopProduct> {
    let mut tally: Vec<TopProduct> = Vec::new();

    for order in orders.iter().filter(|o| o.status != OrderStatus::Cancelled) {
        for item in &order.items {
            match tally.iter_mut().find(|t| t.product_id == item.product_id) {
                Some(entry) => {
                    entry.units_sold += item.quantity;
                    entry.revenue_cents += item.unit_price_cents * item.quantity;
                }
                None => {
                    let name = products
                        .iter()
                        .find(|p| p.id == item.product_id)
                        .map(|p| p.name.en.clone())
                        .unwrap_or_else(|| item.name_snapshot.clone());
                    tally.push(TopProduct {
                        product_id: item.product_id.clone(),
                        name,
                        units_sold: item.quantity,
                        revenue_cents: item.unit_price_cents * item.quantity,
                    });
                }
            }
        }
    }

    tally.sort_by(|a, b| {
        b.units_sold
            .cmp(&a.units_sold)
            .then(b.revenue_cents.cmp(&a.revenue_cents))
    });
    tally.truncate(TOP_PRODUCT_LIMIT);
    tally
}

// =============================================================================
// Unit Tests
// =============================================================================
