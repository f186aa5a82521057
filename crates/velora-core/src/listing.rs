//! # Listing Pipeline
//!
//! The shared filter → sort → paginate pipeline behind every list screen.
//!
//! ## Why One Pipeline?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              Every list screen is the same shape                        │
//! │                                                                         │
//! │   Catalog page        Admin orders        Admin coupons    ...          │
//! │        │                   │                   │                        │
//! │        └───────────────────┴───────────────────┘                        │
//! │                            │                                            │
//! │                            ▼                                            │
//! │   ┌──────────────────────────────────────────────────────────────┐     │
//! │   │  Listing::of(items)                                          │     │
//! │   │      .filter(text match)      ← all filters AND together     │     │
//! │   │      .filter(category == ..)                                 │     │
//! │   │      .filter(price in range)                                 │     │
//! │   │      .sort_by(cmp, direction) ← stable, ties keep order      │     │
//! │   │      .page(page, page_size)   ← 1-indexed, clamped           │     │
//! │   └──────────────────────────────────────────────────────────────┘     │
//! │                            │                                            │
//! │                            ▼                                            │
//! │   PageResult { items, total, total_unfiltered, page, page_size }       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Policies
//! - Filters only ever narrow: the result is a subset of the input.
//! - Sorting changes order, never membership.
//! - `page` is clamped to >= 1; a page past the end is empty, not an error.
//! - Changing any criterion on a [`ListQuery`] resets the page to 1.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Sort Direction
// =============================================================================

/// Direction applied to whatever comparator a listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Applies the direction to an ascending ordering.
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

// =============================================================================
// List Query
// =============================================================================

/// The criteria every list screen shares: text search plus pagination.
///
/// Entity-specific queries (category filters, price ranges, ...) embed one
/// of these and add their own fields.
///
/// ## Page Reset Policy
/// Changing the text resets `page` to 1, matching the storefront behavior
/// where editing any filter jumps back to the first page. Entity queries
/// call [`ListQuery::reset_page`] from their own criterion setters.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListQuery {
    text: Option<String>,
    page: u32,
    page_size: u32,
}

impl ListQuery {
    /// A query with no text filter, page 1, default page size.
    pub fn new() -> Self {
        ListQuery {
            text: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Sets the case-insensitive text filter and resets to page 1.
    ///
    /// An empty or whitespace-only string clears the filter (the
    /// "no filter" sentinel the UI sends).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        self.text = if text.is_empty() { None } else { Some(text) };
        self.reset_page();
        self
    }

    /// Sets the 1-indexed page, clamped to >= 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size, clamped to 1..=MAX_PAGE_SIZE.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Jumps back to the first page. Called whenever a criterion changes.
    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// The active text filter, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether the text filter matches any of the given fields.
    ///
    /// No text filter matches everything; otherwise a case-insensitive
    /// substring match across the fields.
    pub fn matches_text<'a>(&self, fields: impl IntoIterator<Item = &'a str>) -> bool {
        match &self.text {
            None => true,
            Some(needle) => text_matches(needle, fields),
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery::new()
    }
}

/// Case-insensitive substring match across one or more fields.
pub fn text_matches<'a>(needle: &str, fields: impl IntoIterator<Item = &'a str>) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

// =============================================================================
// Page Result
// =============================================================================

/// The visible slice of a listing plus the counts the UI needs.
///
/// `total` drives "page X of Y"; `total_unfiltered` drives "N of M" labels.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageResult<T> {
    /// The records on the requested page, in sorted order.
    pub items: Vec<T>,
    /// Count of records matching the filters (across all pages).
    pub total: usize,
    /// Count of the full unfiltered collection.
    pub total_unfiltered: usize,
    /// The 1-indexed page this slice came from.
    pub page: u32,
    pub page_size: u32,
}

impl<T> PageResult<T> {
    /// Number of pages needed for all matching records.
    pub fn total_pages(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.total as u64).div_ceil(self.page_size as u64)) as u32
    }

    /// Converts the page's items, keeping counts intact. Used to turn
    /// domain entities into DTOs without re-counting.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            total_unfiltered: self.total_unfiltered,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

// =============================================================================
// Listing Builder
// =============================================================================

/// Builder that applies filters, then a stable sort, then pagination.
///
/// Borrows the input; nothing is cloned until the final page slice.
///
/// ## Usage
/// ```rust
/// use velora_core::listing::{Listing, SortDirection};
///
/// let prices = [10, 30, 20, 5];
/// let result = Listing::of(&prices)
///     .filter(|p| *p >= 10)
///     .sort_by(|a, b| a.cmp(b), SortDirection::Asc)
///     .page(1, 10);
///
/// assert_eq!(result.items, vec![10, 20, 30]);
/// assert_eq!(result.total, 3);
/// assert_eq!(result.total_unfiltered, 4);
/// ```
pub struct Listing<'a, T> {
    total_unfiltered: usize,
    selected: Vec<&'a T>,
}

impl<'a, T> Listing<'a, T> {
    /// Starts a listing over the full collection.
    pub fn of(items: &'a [T]) -> Self {
        Listing {
            total_unfiltered: items.len(),
            selected: items.iter().collect(),
        }
    }

    /// Keeps only records matching the predicate. Successive calls AND
    /// together; there is no OR/group logic.
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool) -> Self {
        self.selected.retain(|item| predicate(item));
        self
    }

    /// Sorts by an ascending comparator plus a direction.
    ///
    /// The sort is stable: records that compare equal keep their original
    /// relative order, in both directions.
    pub fn sort_by(
        mut self,
        compare: impl Fn(&T, &T) -> Ordering,
        direction: SortDirection,
    ) -> Self {
        self.selected
            .sort_by(|a, b| direction.apply(compare(a, b)));
        self
    }

    /// Slices out the requested page and clones it into the result.
    ///
    /// `page` is 1-indexed and clamped to >= 1; `page_size` is clamped to
    /// 1..=MAX_PAGE_SIZE. A page past the end yields an empty slice with
    /// the counts still correct.
    pub fn page(self, page: u32, page_size: u32) -> PageResult<T>
    where
        T: Clone,
    {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let start = (page as usize - 1).saturating_mul(page_size as usize);
        let items: Vec<T> = self
            .selected
            .iter()
            .skip(start)
            .take(page_size as usize)
            .map(|item| (*item).clone())
            .collect();

        PageResult {
            items,
            total: self.selected.len(),
            total_unfiltered: self.total_unfiltered,
            page,
            page_size,
        }
    }

    /// All matching records without pagination. Used by aggregations
    /// (dashboard stats) that need the full filtered set.
    pub fn collect_all(self) -> Vec<T>
    where
        T: Clone,
    {
        self.selected.into_iter().cloned().collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        price: i64,
        category: &'static str,
    }

    fn fixtures() -> Vec<Item> {
        vec![
            Item { name: "Vitamin C Serum", price: 30, category: "serum" },
            Item { name: "Gentle Cleanser", price: 10, category: "cleanser" },
            Item { name: "Niacinamide Serum", price: 20, category: "serum" },
            Item { name: "Clay Mask", price: 20, category: "mask" },
        ]
    }

    #[test]
    fn test_sort_by_price_ascending() {
        let items = [10i64, 30, 20];
        let result = Listing::of(&items)
            .sort_by(|a, b| a.cmp(b), SortDirection::Asc)
            .page(1, 10);
        assert_eq!(result.items, vec![10, 20, 30]);
    }

    #[test]
    fn test_filters_and_together() {
        // Filters AND together
        let items = fixtures();
        let result = Listing::of(&items)
            .filter(|i| i.category == "serum")
            .filter(|i| text_matches("vitamin", [i.name]))
            .page(1, 10);

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "Vitamin C Serum");
        assert_eq!(result.total, 1);
        assert_eq!(result.total_unfiltered, 4);
    }

    #[test]
    fn test_filtered_is_subset() {
        let items = fixtures();
        let filtered = Listing::of(&items)
            .filter(|i| i.price >= 20)
            .collect_all();
        assert!(filtered.iter().all(|f| items.contains(f)));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = fixtures();
        let once = Listing::of(&items).filter(|i| i.price >= 20).collect_all();
        let twice = Listing::of(&once).filter(|i| i.price >= 20).collect_all();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_pagination_is_a_partition() {
        // 25 items at page_size 10 → pages of [10, 10, 5]
        let items: Vec<i64> = (0..25).collect();
        let mut reconstructed = Vec::new();
        let mut sizes = Vec::new();
        for page in 1..=3 {
            let result = Listing::of(&items).page(page, 10);
            sizes.push(result.items.len());
            assert_eq!(result.total_pages(), 3);
            reconstructed.extend(result.items);
        }
        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(reconstructed, items);
    }

    #[test]
    fn test_sort_never_changes_membership() {
        let items = fixtures();
        let by_name: Vec<&'static str> = Listing::of(&items)
            .filter(|i| i.price >= 20)
            .sort_by(|a, b| a.name.cmp(b.name), SortDirection::Asc)
            .collect_all()
            .into_iter()
            .map(|i| i.name)
            .collect();
        let by_price: Vec<&'static str> = Listing::of(&items)
            .filter(|i| i.price >= 20)
            .sort_by(|a, b| a.price.cmp(&b.price), SortDirection::Desc)
            .collect_all()
            .into_iter()
            .map(|i| i.name)
            .collect();

        let mut a = by_name.clone();
        let mut b = by_price.clone();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
        assert_ne!(by_name, by_price); // order did change
    }

    #[test]
    fn test_stable_sort_keeps_tie_order() {
        let items = fixtures();
        // Two items at price 20; they must keep catalog order.
        let names: Vec<&'static str> = Listing::of(&items)
            .sort_by(|a, b| a.price.cmp(&b.price), SortDirection::Asc)
            .collect_all()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(
            names,
            vec!["Gentle Cleanser", "Niacinamide Serum", "Clay Mask", "Vitamin C Serum"]
        );
    }

    #[test]
    fn test_page_clamped_and_out_of_range_empty() {
        let items: Vec<i64> = (0..5).collect();

        // page 0 is treated as page 1
        let result = Listing::of(&items).page(0, 2);
        assert_eq!(result.page, 1);
        assert_eq!(result.items, vec![0, 1]);

        // page far past the end is empty but keeps counts
        let result = Listing::of(&items).page(99, 2);
        assert!(result.items.is_empty());
        assert_eq!(result.total, 5);
        assert_eq!(result.total_pages(), 3);
    }

    #[test]
    fn test_list_query_text_resets_page() {
        let query = ListQuery::new().with_page(4).with_text("serum");
        assert_eq!(query.page(), 1);
        assert_eq!(query.text(), Some("serum"));

        // Empty text is the "no filter" sentinel
        let query = ListQuery::new().with_text("   ");
        assert_eq!(query.text(), None);
    }

    #[test]
    fn test_text_match_case_insensitive() {
        assert!(text_matches("VITAMIN", ["Vitamin C Serum"]));
        assert!(text_matches("serum", ["Vitamin C Serum", "irrelevant"]));
        assert!(!text_matches("retinol", ["Vitamin C Serum"]));
    }

    #[test]
    fn test_total_pages_empty() {
        let items: Vec<i64> = vec![];
        let result = Listing::of(&items).page(1, 10);
        assert_eq!(result.total_pages(), 0);
        assert!(result.items.is_empty());
    }
}
