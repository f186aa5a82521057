//! # Domain Types
//!
//! Core domain types used throughout Velora.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │     Coupon      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name (en/th/kh)│   │  customer_name  │   │  code           │       │
//! │  │  category       │   │  status         │   │  type + value   │       │
//! │  │  price_cents    │   │  total_cents    │   │  usage limits   │       │
//! │  │  stock          │   │  items[]        │   │  date window    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Customer     │   │     Review      │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  email          │   │  product_id     │                             │
//! │  │  skin_type      │   │  rating (1-5)   │                             │
//! │  │  aggregates     │   │  status         │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Status Fields Are Enums
//! The original storefront kept order and review statuses as free-form
//! strings. Here every status is a typed enum, and order status changes
//! go through [`OrderStatus::can_transition_to`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Localized Name
// =============================================================================

/// Product display name in the three storefront languages.
///
/// English is the canonical value; Thai and Khmer fall back to English
/// when a translation is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LocalizedName {
    pub en: String,
    pub th: Option<String>,
    pub kh: Option<String>,
}

impl LocalizedName {
    /// Creates a name with only the English value set.
    pub fn english(en: impl Into<String>) -> Self {
        LocalizedName {
            en: en.into(),
            th: None,
            kh: None,
        }
    }

    /// All present values, English first. Used by the text filter so a
    /// search matches any language the shopper typed in.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.en.as_str())
            .chain(self.th.as_deref())
            .chain(self.kh.as_deref())
    }
}

// =============================================================================
// Product Category
// =============================================================================

/// The six skincare categories the catalog is organized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Cleanser,
    Toner,
    Serum,
    Moisturizer,
    Sunscreen,
    Mask,
}

impl ProductCategory {
    /// All categories, in display order.
    pub const ALL: [ProductCategory; 6] = [
        ProductCategory::Cleanser,
        ProductCategory::Toner,
        ProductCategory::Serum,
        ProductCategory::Moisturizer,
        ProductCategory::Sunscreen,
        ProductCategory::Mask,
    ];

    /// Lowercase slug as used in filter query strings.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Cleanser => "cleanser",
            ProductCategory::Toner => "toner",
            ProductCategory::Serum => "serum",
            ProductCategory::Moisturizer => "moisturizer",
            ProductCategory::Sunscreen => "sunscreen",
            ProductCategory::Mask => "mask",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cleanser" => Ok(ProductCategory::Cleanser),
            "toner" => Ok(ProductCategory::Toner),
            "serum" => Ok(ProductCategory::Serum),
            "moisturizer" => Ok(ProductCategory::Moisturizer),
            "sunscreen" => Ok(ProductCategory::Sunscreen),
            "mask" => Ok(ProductCategory::Mask),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

// =============================================================================
// Skin Type
// =============================================================================

/// Skin type a product is formulated for (or a customer reports having).
///
/// `All` on a product means it suits every skin type, so it matches any
/// skin-type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SkinType {
    Normal,
    Oily,
    Dry,
    Combination,
    Sensitive,
    All,
}

impl SkinType {
    /// Whether a product with this skin type satisfies a shopper filter.
    pub fn suits(&self, wanted: SkinType) -> bool {
        *self == SkinType::All || *self == wanted
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkinType::Normal => "normal",
            SkinType::Oily => "oily",
            SkinType::Dry => "dry",
            SkinType::Combination => "combination",
            SkinType::Sensitive => "sensitive",
            SkinType::All => "all",
        };
        f.write_str(s)
    }
}

impl FromStr for SkinType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(SkinType::Normal),
            "oily" => Ok(SkinType::Oily),
            "dry" => Ok(SkinType::Dry),
            "combination" => Ok(SkinType::Combination),
            "sensitive" => Ok(SkinType::Sensitive),
            "all" => Ok(SkinType::All),
            other => Err(format!("unknown skin type: {}", other)),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// Whether a product is visible in the storefront.
///
/// Deleting a product from the admin dashboard sets `Inactive`
/// (soft delete) so historical orders keep a valid reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Inactive,
}

/// A product in the skincare catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name in en/th/kh.
    pub name: LocalizedName,

    /// Long-form description shown on the product page.
    pub description: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Catalog category.
    pub category: ProductCategory,

    /// Skin type this product is formulated for.
    pub skin_type: SkinType,

    /// Image URL for the product card.
    pub image_url: String,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Visibility status (soft delete).
    pub status: ProductStatus,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether the product is visible in the storefront.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.is_active() && self.stock >= quantity
    }
}

// =============================================================================
// Order
// =============================================================================

/// The lifecycle status of an order.
///
/// ## State Machine
/// ```text
/// Pending ──► Processing ──► Shipped ──► Delivered
///    │             │
///    └─────────────┴──► Cancelled
/// ```
/// Delivered and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order. Used by dashboard breakdowns.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Whether an order in this status may move to `next`.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

/// A line item in an order.
/// Uses snapshot pattern to freeze product data at time of purchase.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderItem {
    pub product_id: String,
    /// Product name (English) at time of purchase (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of purchase (frozen).
    pub unit_price_cents: i64,
    /// Quantity purchased.
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
}

impl OrderItem {
    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    /// Customer record this order belongs to, when known.
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    /// Coupon code redeemed against this order, if any.
    pub coupon_code: Option<String>,
    pub items: Vec<OrderItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Returns the order total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total quantity of units across all line items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// How a coupon's `value` field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `value` is a whole percentage (10 = 10% off).
    Percentage,
    /// `value` is an amount in cents taken off the subtotal.
    Fixed,
}

/// Whether a coupon can currently be redeemed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CouponStatus {
    Active,
    Inactive,
}

/// A discount coupon.
///
/// ## Invariant
/// `used_count <= usage_limit` whenever a limit is set. Redemption goes
/// through the store layer, which refuses exhausted coupons.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Coupon {
    pub id: String,
    /// Redemption code, stored uppercase. Matched case-insensitively.
    pub code: String,
    pub coupon_type: CouponType,
    /// Percentage (whole percent) or fixed amount in cents, per `coupon_type`.
    pub value: i64,
    /// Minimum subtotal required to redeem.
    pub min_order_cents: i64,
    /// Cap on the computed discount. None means uncapped.
    pub max_discount_cents: Option<i64>,
    /// Maximum number of redemptions. None means unlimited.
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub status: CouponStatus,
    #[ts(as = "String")]
    pub starts_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub ends_at: DateTime<Utc>,
    /// When non-empty, the cart must contain at least one product from
    /// these categories.
    pub applicable_categories: Vec<ProductCategory>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Whether `now` falls inside the coupon's validity window.
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        now >= self.starts_at && now <= self.ends_at
    }

    /// Whether the usage limit has been reached.
    pub fn is_exhausted(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.used_count >= limit,
            None => false,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

/// A storefront customer with lifetime aggregates.
///
/// `total_orders`, `total_spent_cents` and `avg_rating` are maintained by
/// the store layer as orders complete and reviews are approved, not
/// entered by hand.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub skin_type: SkinType,
    pub total_orders: u32,
    pub total_spent_cents: i64,
    /// Mean rating across this customer's approved reviews, 0.0 when none.
    pub avg_rating: f64,
    pub status: CustomerStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// Returns lifetime spend as Money.
    #[inline]
    pub fn total_spent(&self) -> Money {
        Money::from_cents(self.total_spent_cents)
    }
}

// =============================================================================
// Review
// =============================================================================

/// Moderation status of a product review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Submitted, awaiting moderation. Not shown on the storefront.
    Pending,
    /// Visible on the product page.
    Approved,
    /// Hidden permanently.
    Rejected,
}

/// A product review submitted by a shopper.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub customer_name: String,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for cat in ProductCategory::ALL {
            let parsed: ProductCategory = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
        assert!("shampoo".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_skin_type_suits() {
        assert!(SkinType::All.suits(SkinType::Oily));
        assert!(SkinType::Dry.suits(SkinType::Dry));
        assert!(!SkinType::Dry.suits(SkinType::Oily));
    }

    #[test]
    fn test_order_status_transitions() {
        use OrderStatus::*;

        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));

        // No skipping ahead or going backwards
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Shipped.can_transition_to(Processing));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Processing));

        assert!(Delivered.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Processing.is_terminal());
    }

    #[test]
    fn test_coupon_window_and_exhaustion() {
        let now = Utc::now();
        let coupon = Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            coupon_type: CouponType::Percentage,
            value: 10,
            min_order_cents: 0,
            max_discount_cents: None,
            usage_limit: Some(2),
            used_count: 2,
            status: CouponStatus::Active,
            starts_at: now - chrono::Duration::days(1),
            ends_at: now + chrono::Duration::days(1),
            applicable_categories: vec![],
            created_at: now,
        };

        assert!(coupon.is_within_window(now));
        assert!(!coupon.is_within_window(now + chrono::Duration::days(2)));
        assert!(coupon.is_exhausted());
    }

    #[test]
    fn test_localized_name_values() {
        let mut name = LocalizedName::english("Vitamin C Serum");
        assert_eq!(name.values().count(), 1);
        name.th = Some("เซรั่มวิตามินซี".to_string());
        assert_eq!(name.values().count(), 2);
    }

    #[test]
    fn test_product_can_fulfill() {
        let product = Product {
            id: "p1".to_string(),
            name: LocalizedName::english("Gentle Cleanser"),
            description: String::new(),
            price_cents: 1299,
            category: ProductCategory::Cleanser,
            skin_type: SkinType::All,
            image_url: String::new(),
            stock: 3,
            status: ProductStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.can_fulfill(3));
        assert!(!product.can_fulfill(4));

        let inactive = Product {
            status: ProductStatus::Inactive,
            ..product
        };
        assert!(!inactive.can_fulfill(1));
    }
}
