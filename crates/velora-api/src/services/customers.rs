//! # Admin Customer Service
//!
//! The dashboard's customer table. Aggregates on each row are maintained
//! by the order and review flows, so this service is read-mostly.

use serde::Deserialize;
use ts_rs::TS;

use velora_core::listing::SortDirection;
use velora_core::{CustomerStatus, SkinType};
use velora_store::{CustomerQuery, CustomerSort, Store};

use crate::dto::{CustomerDto, Paginated};
use crate::error::{ApiError, ApiResult};

/// Raw listing parameters from the admin customer table.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerListRequest {
    /// Matches name and email
    pub search: String,
    /// Skin type or "all"
    pub skin_type: String,
    /// "newest" | "name" | "orders" | "spent"
    pub sort: String,
    pub page: u32,
}

/// Dashboard customer management.
#[derive(Clone)]
pub struct CustomerService {
    store: Store,
    page_size: u32,
}

impl CustomerService {
    pub fn new(store: Store, page_size: u32) -> Self {
        CustomerService { store, page_size }
    }

    pub async fn list(&self, request: &CustomerListRequest) -> ApiResult<Paginated<CustomerDto>> {
        let mut query = CustomerQuery::newest_first()
            .with_page_size(self.page_size)
            .with_text(request.search.clone());

        let skin = request.skin_type.trim();
        if !skin.is_empty() && !skin.eq_ignore_ascii_case("all") {
            let parsed: SkinType = skin
                .parse()
                .map_err(|_| ApiError::validation(format!("Unknown skin type: {}", skin)))?;
            query = query.with_skin_type(Some(parsed));
        }

        query = match request.sort.trim() {
            "" | "newest" => query.with_sort(CustomerSort::Created, SortDirection::Desc),
            "name" => query.with_sort(CustomerSort::Name, SortDirection::Asc),
            "orders" => query.with_sort(CustomerSort::TotalOrders, SortDirection::Desc),
            "spent" => query.with_sort(CustomerSort::TotalSpent, SortDirection::Desc),
            other => return Err(ApiError::validation(format!("Unknown sort option: {}", other))),
        };

        query = query.with_page(request.page.max(1));

        let page = self.store.customers().list(&query).await?;
        Ok(Paginated::from_page(page, CustomerDto::from))
    }

    pub async fn get(&self, id: &str) -> ApiResult<CustomerDto> {
        Ok(CustomerDto::from(self.store.customers().get(id).await?))
    }

    /// Enable/disable a customer account.
    pub async fn set_active(&self, id: &str, active: bool) -> ApiResult<CustomerDto> {
        let status = if active {
            CustomerStatus::Active
        } else {
            CustomerStatus::Inactive
        };
        Ok(CustomerDto::from(self.store.customers().set_status(id, status).await?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use velora_store::StoreConfig;

    fn service() -> CustomerService {
        CustomerService::new(
            Store::new(StoreConfig::for_tests()),
            velora_core::DEFAULT_PAGE_SIZE,
        )
    }

    #[tokio::test]
    async fn test_search_by_email_fragment() {
        let svc = service();
        let page = svc
            .list(&CustomerListRequest {
                search: "lina.vong".to_string(),
                ..CustomerListRequest::default()
            })
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].name, "Lina Vong");
    }

    #[tokio::test]
    async fn test_sort_by_spend() {
        let svc = service();
        let page = svc
            .list(&CustomerListRequest {
                sort: "spent".to_string(),
                ..CustomerListRequest::default()
            })
            .await
            .unwrap();
        assert!(page
            .data
            .windows(2)
            .all(|w| w[0].total_spent_cents >= w[1].total_spent_cents));
    }

    #[tokio::test]
    async fn test_set_active() {
        let svc = service();
        let page = svc.list(&CustomerListRequest::default()).await.unwrap();
        let id = page.data[0].id.clone();

        let updated = svc.set_active(&id, false).await.unwrap();
        assert_eq!(updated.status, CustomerStatus::Inactive);
        let updated = svc.set_active(&id, true).await.unwrap();
        assert_eq!(updated.status, CustomerStatus::Active);
    }
}
