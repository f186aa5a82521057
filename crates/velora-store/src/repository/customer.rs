//! # Customer Repository
//!
//! Admin customer list and the aggregate fields other repositories
//! maintain (orders bump spend, approved reviews refresh the mean rating).

use std::sync::Arc;

use tracing::{debug, info};

use velora_core::listing::{ListQuery, Listing, PageResult, SortDirection};
use velora_core::{Customer, CustomerStatus, SkinType};

use crate::error::{StoreError, StoreResult};
use crate::StoreInner;

// =============================================================================
// Query
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerSort {
    /// Signup time. Admin default pairs this with descending.
    #[default]
    Created,
    Name,
    TotalOrders,
    TotalSpent,
}

/// Criteria for the admin customer list. Text matches name and email.
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
    list: ListQuery,
    skin_type: Option<SkinType>,
    status: Option<CustomerStatus>,
    sort: CustomerSort,
    direction: SortDirection,
}

impl CustomerQuery {
    pub fn new() -> Self {
        Self::default()
    }

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

    pub fn with_skin_type(mut self, skin_type: Option<SkinType>) -> Self {
        self.skin_type = skin_type;
        self.list.reset_page();
        self
    }

    pub fn with_status(mut self, status: Option<CustomerStatus>) -> Self {
        self.status = status;
        self.list.reset_page();
        self
    }

    pub fn with_sort(mut self, sort: CustomerSort, direction: SortDirection) -> Self {
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

    fn matches(&self, customer: &Customer) -> bool {
        self.list
            .matches_text([customer.name.as_str(), customer.email.as_str()])
            // exact match here, unlike products: a customer's skin type is
            // a profile fact, not a formulation claim
            && self.skin_type.map_or(true, |s| customer.skin_type == s)
            && self.status.map_or(true, |s| customer.status == s)
    }

    fn compare(&self, a: &Customer, b: &Customer) -> std::cmp::Ordering {
        match self.sort {
            CustomerSort::Created => a.created_at.cmp(&b.created_at),
            CustomerSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            CustomerSort::TotalOrders => a.total_orders.cmp(&b.total_orders),
            CustomerSort::TotalSpent => a.total_spent_cents.cmp(&b.total_spent_cents),
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for customer operations.
#[derive(Clone)]
pub struct CustomerRepository {
    store: Arc<StoreInner>,
}

impl CustomerRepository {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        CustomerRepository { store }
    }

    pub async fn list(&self, query: &CustomerQuery) -> StoreResult<PageResult<Customer>> {
        self.store.simulate_latency().await;

        debug!(text = ?query.list.text(), skin_type = ?query.skin_type, "Listing customers");

        let customers = self.store.customers.read().await;
        Ok(Listing::of(&customers)
            .filter(|c| query.matches(c))
            .sort_by(|a, b| query.compare(a, b), query.direction)
            .page(query.list.page(), query.list.page_size()))
    }

    pub async fn get(&self, id: &str) -> StoreResult<Customer> {
        self.store.simulate_latency().await;

        let customers = self.store.customers.read().await;
        customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("customer", id))
    }

    /// Case-insensitive email lookup, used by sign-in.
    pub async fn find_by_email(&self, email: &str) -> StoreResult<Customer> {
        self.store.simulate_latency().await;

        let customers = self.store.customers.read().await;
        customers
            .iter()
            .find(|c| c.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
            .ok_or_else(|| StoreError::not_found("customer", email))
    }

    /// Every customer. Dashboard aggregations use this.
    pub async fn all(&self) -> StoreResult<Vec<Customer>> {
        self.store.simulate_latency().await;
        Ok(self.store.customers.read().await.clone())
    }

    /// Activates or deactivates a customer account.
    pub async fn set_status(&self, id: &str, status: CustomerStatus) -> StoreResult<Customer> {
        self.store.simulate_latency().await;

        let mut customers = self.store.customers.write().await;
        let customer = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::not_found("customer", id))?;

        customer.status = status;
        info!(customer_id = %id, status = ?status, "Customer status changed");
        Ok(customer.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};

    fn repo() -> CustomerRepository {
        Store::new(StoreConfig::for_tests()).customers()
    }

    #[tokio::test]
    async fn test_text_matches_name_or_email() {
        let repo = repo();
        let page = repo
            .list(&CustomerQuery::newest_first().with_text("sokha"))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Sokha Pich");

        let page = repo
            .list(&CustomerQuery::newest_first().with_text("example.com"))
            .await
            .unwrap();
        assert_eq!(page.items.len(), page.total_unfiltered);
    }

    #[tokio::test]
    async fn test_skin_type_filter_is_exact() {
        let repo = repo();
        let page = repo
            .list(&CustomerQuery::newest_first().with_skin_type(Some(SkinType::Dry)))
            .await
            .unwrap();
        assert!(page.items.iter().all(|c| c.skin_type == SkinType::Dry));
        assert!(!page.items.is_empty());
    }

    #[tokio::test]
    async fn test_sort_by_total_spent_desc() {
        let repo = repo();
        let page = repo
            .list(
                &CustomerQuery::new()
                    .with_sort(CustomerSort::TotalSpent, SortDirection::Desc)
                    .with_page_size(100),
            )
            .await
            .unwrap();
        assert!(page
            .items
            .windows(2)
            .all(|w| w[0].total_spent_cents >= w[1].total_spent_cents));
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repo = repo();
        let customer = repo.find_by_email(" MAI.CHAN@example.com ").await.unwrap();
        assert_eq!(customer.name, "Mai Chan");

        assert!(repo.find_by_email("nobody@example.com").await.is_err());
    }

    #[tokio::test]
    async fn test_set_status() {
        let repo = repo();
        let customer = repo.find_by_email("dara.kim@example.com").await.unwrap();
        let updated = repo
            .set_status(&customer.id, CustomerStatus::Inactive)
            .await
            .unwrap();
        assert_eq!(updated.status, CustomerStatus::Inactive);
    }
}
