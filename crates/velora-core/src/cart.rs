//! # Cart
//!
//! Pure cart math: items, quantity rules, and coupon-aware totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Operations                                   │
//! │                                                                         │
//! │  Storefront Action            Cart Change                               │
//! │  ─────────────────            ───────────                               │
//! │                                                                         │
//! │  Click "Add to Cart" ───────► add_item (merge by product id)           │
//! │  Change quantity ───────────► update_quantity (0 removes)              │
//! │  Click remove ──────────────► remove_item                              │
//! │  Apply coupon code ─────────► totals_with_discount                     │
//! │  Checkout ──────────────────► clear (after the order is placed)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `product_id` (adding the same product merges).
//! - Quantity is always 1..=MAX_ITEM_QUANTITY.
//! - At most MAX_CART_ITEMS unique items.
//! - Prices are frozen at add time (snapshot pattern): a later price
//!   change in the catalog does not reprice an open cart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::coupon::{evaluate, CouponRejection};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Coupon, Product, ProductCategory};
use crate::validation;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// An item in the shopping cart.
///
/// `product_id` references the catalog; everything else is a frozen copy
/// of the product at the moment it was added.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product ID (UUID)
    pub product_id: String,

    /// Product name (English) at time of adding (frozen)
    pub name: String,

    /// Price in cents at time of adding (frozen)
    pub unit_price_cents: i64,

    /// Category at time of adding; drives coupon category checks
    pub category: ProductCategory,

    /// Image shown in the mini-cart
    pub image_url: String,

    /// Quantity in cart
    pub quantity: i64,

    /// When this item was added to cart
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.en.clone(),
            unit_price_cents: product.price_cents,
            category: product.category,
            image_url: product.image_url.clone(),
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart
    pub items: Vec<CartItem>,

    /// Coupon code the shopper has entered, if any
    pub coupon_code: Option<String>,

    /// When the cart was created/last cleared
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            coupon_code: None,
            created_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validation::validate_quantity(quantity)?;

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        Ok(())
    }

    /// Updates the quantity of an item. Quantity 0 removes the item;
    /// negative quantities are rejected.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        validation::validate_quantity(quantity)?;

        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(product_id.to_string())),
        }
    }

    /// Removes an item from the cart by product ID.
    pub fn remove_item(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items and forgets any entered coupon code.
    pub fn clear(&mut self) {
        self.items.clear();
        self.coupon_code = None;
        self.created_at = Utc::now();
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Calculates the subtotal (before any discount).
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.items.iter().map(|i| i.line_total_cents()).sum())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct categories present in the cart, for coupon checks.
    pub fn categories(&self) -> Vec<ProductCategory> {
        let mut cats: Vec<ProductCategory> = Vec::new();
        for item in &self.items {
            if !cats.contains(&item.category) {
                cats.push(item.category);
            }
        }
        cats
    }

    /// Totals with no coupon applied.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: subtotal.cents(),
            discount_cents: 0,
            total_cents: subtotal.cents(),
        }
    }

    /// Totals with a coupon evaluated against the cart.
    ///
    /// A rejected coupon is an error, not silently zero, so the UI can
    /// tell the shopper why their code did nothing.
    pub fn totals_with_coupon(
        &self,
        coupon: &Coupon,
        now: DateTime<Utc>,
    ) -> Result<CartTotals, CouponRejection> {
        let subtotal = self.subtotal();
        let discount = evaluate(coupon, subtotal, &self.categories(), now)?;
        let total = subtotal.saturating_sub(discount);
        Ok(CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            total_cents: total.cents(),
        })
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for API responses.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CouponStatus, CouponType, LocalizedName, ProductStatus, SkinType};
    use chrono::Duration;

    fn test_product(id: &str, price_cents: i64, category: ProductCategory) -> Product {
        Product {
            id: id.to_string(),
            name: LocalizedName::english(format!("Product {}", id)),
            description: String::new(),
            price_cents,
            category,
            skin_type: SkinType::All,
            image_url: String::new(),
            stock: 100,
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn percent_coupon(value: i64) -> Coupon {
        let now = Utc::now();
        Coupon {
            id: "c1".to_string(),
            code: "SAVE".to_string(),
            coupon_type: CouponType::Percentage,
            value,
            min_order_cents: 0,
            max_discount_cents: None,
            usage_limit: None,
            used_count: 0,
            status: CouponStatus::Active,
            starts_at: now - Duration::days(1),
            ends_at: now + Duration::days(1),
            applicable_categories: vec![],
            created_at: now,
        }
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1", 1899, ProductCategory::Serum);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 3798);
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();
        let product = test_product("1", 1899, ProductCategory::Serum);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.item_count(), 1); // still one unique item
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        let product = test_product("1", 1899, ProductCategory::Serum);

        cart.add_item(&product, 2).unwrap();
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_quantity_cap() {
        let mut cart = Cart::new();
        let product = test_product("1", 1899, ProductCategory::Serum);

        let err = cart.add_item(&product, MAX_ITEM_QUANTITY + 1).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }

    #[test]
    fn test_cart_rejects_non_positive_quantities() {
        let mut cart = Cart::new();
        let product = test_product("p1", 2999, ProductCategory::Serum);

        assert!(matches!(
            cart.add_item(&product, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.add_item(&product, -3),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());

        cart.add_item(&product, 2).unwrap();
        assert!(matches!(
            cart.update_quantity("p1", -1),
            Err(CoreError::Validation(_))
        ));
        // the failed update left the quantity alone
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 5998);
    }

    #[test]
    fn test_cart_remove_missing_item() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.remove_item("nope").unwrap_err(),
            CoreError::NotInCart(_)
        ));
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1000, ProductCategory::Serum);

        cart.add_item(&product, 1).unwrap();
        product.price_cents = 9999; // catalog price change after adding

        assert_eq!(cart.subtotal().cents(), 1000);
    }

    #[test]
    fn test_totals_with_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 5000, ProductCategory::Serum), 1)
            .unwrap();

        let totals = cart
            .totals_with_coupon(&percent_coupon(10), Utc::now())
            .unwrap();
        assert_eq!(totals.subtotal_cents, 5000);
        assert_eq!(totals.discount_cents, 500);
        assert_eq!(totals.total_cents, 4500);
    }

    #[test]
    fn test_totals_with_rejected_coupon() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 1000, ProductCategory::Mask), 1)
            .unwrap();

        let mut coupon = percent_coupon(10);
        coupon.applicable_categories = vec![ProductCategory::Serum];

        let err = cart
            .totals_with_coupon(&coupon, Utc::now())
            .unwrap_err();
        assert_eq!(err, CouponRejection::CategoryMismatch);
    }

    #[test]
    fn test_cart_categories_deduped() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 1000, ProductCategory::Serum), 1)
            .unwrap();
        cart.add_item(&test_product("2", 1000, ProductCategory::Serum), 1)
            .unwrap();
        cart.add_item(&test_product("3", 1000, ProductCategory::Mask), 1)
            .unwrap();

        assert_eq!(
            cart.categories(),
            vec![ProductCategory::Serum, ProductCategory::Mask]
        );
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(&test_product("1", 1000, ProductCategory::Serum), 1)
            .unwrap();
        cart.coupon_code = Some("SAVE".to_string());

        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.coupon_code.is_none());
    }
}
