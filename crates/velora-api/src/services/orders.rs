//! # Admin Order Service
//!
//! The dashboard's order table and the status workflow buttons.

use serde::Deserialize;
use ts_rs::TS;

use velora_core::listing::SortDirection;
use velora_core::OrderStatus;
use velora_store::{OrderQuery, OrderSort, Store};

use crate::dto::{OrderDto, Paginated};
use crate::error::{ApiError, ApiResult};

/// Raw listing parameters from the admin order table.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderListRequest {
    /// Matches order id and customer name
    pub search: String,
    /// Status name or "all"
    pub status: String,
    /// "newest" | "oldest" | "total"
    pub sort: String,
    pub page: u32,
}

/// Dashboard order management.
#[derive(Clone)]
pub struct OrderService {
    store: Store,
    page_size: u32,
}

impl OrderService {
    pub fn new(store: Store, page_size: u32) -> Self {
        OrderService { store, page_size }
    }

    pub async fn list(&self, request: &OrderListRequest) -> ApiResult<Paginated<OrderDto>> {
        let mut query = OrderQuery::newest_first()
            .with_page_size(self.page_size)
            .with_text(request.search.clone());

        let status = request.status.trim();
        if !status.is_empty() && !status.eq_ignore_ascii_case("all") {
            let parsed: OrderStatus = status
                .parse()
                .map_err(|_| ApiError::validation(format!("Unknown status: {}", status)))?;
            query = query.with_status(Some(parsed));
        }

        query = match request.sort.trim() {
            "" | "newest" => query.with_sort(OrderSort::Created, SortDirection::Desc),
            "oldest" => query.with_sort(OrderSort::Created, SortDirection::Asc),
            "total" => query.with_sort(OrderSort::Total, SortDirection::Desc),
            other => return Err(ApiError::validation(format!("Unknown sort option: {}", other))),
        };

        query = query.with_page(request.page.max(1));

        let page = self.store.orders().list(&query).await?;
        Ok(Paginated::from_page(page, OrderDto::from))
    }

    pub async fn get(&self, id: &str) -> ApiResult<OrderDto> {
        Ok(OrderDto::from(self.store.orders().get(id).await?))
    }

    /// Advances an order along its lifecycle, or cancels it. The store
    /// enforces the state machine and handles restocking on cancel.
    pub async fn update_status(&self, id: &str, status: &str) -> ApiResult<OrderDto> {
        let next: OrderStatus = status
            .parse()
            .map_err(|_| ApiError::validation(format!("Unknown status: {}", status)))?;
        Ok(OrderDto::from(self.store.orders().update_status(id, next).await?))
    }

    /// Most recent orders for the dashboard's activity card.
    pub async fn recent(&self, limit: usize) -> ApiResult<Vec<OrderDto>> {
        let orders = self.store.orders().recent(limit).await?;
        Ok(orders.into_iter().map(OrderDto::from).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
