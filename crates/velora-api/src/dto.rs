//! # DTOs
//!
//! The camelCase payloads the frontend receives. Domain entities stay
//! snake_case inside the workspace; everything crossing to TypeScript
//! goes through this module so the wire shape is in one place.
//!
//! ## Paginated Envelope
//! ```json
//! {
//!   "data": [ ... ],
//!   "pagination": { "page": 1, "limit": 10, "total": 24, "totalPages": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use velora_core::cart::{Cart, CartItem, CartTotals};
use velora_core::listing::PageResult;
use velora_core::{
    Coupon, CouponStatus, CouponType, Customer, CustomerStatus, LocalizedName, Money, Order,
    OrderItem, OrderStatus, Product, ProductCategory, ProductStatus, Review, ReviewStatus,
    SkinType,
};

// =============================================================================
// Pagination
// =============================================================================

/// Pagination metadata attached to every listing response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub limit: u32,
    /// Records matching the active filters, across all pages.
    pub total: usize,
    pub total_pages: u32,
}

/// A page of DTOs plus its pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    /// Wraps a page result, converting each record into its DTO.
    pub fn from_page<U>(page: PageResult<U>, convert: impl FnMut(U) -> T) -> Self {
        let info = PageInfo {
            page: page.page,
            limit: page.page_size,
            total: page.total,
            total_pages: page.total_pages(),
        };
        Paginated {
            data: page.items.into_iter().map(convert).collect(),
            pagination: info,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: LocalizedName,
    pub description: String,
    pub price_cents: i64,
    /// Formatted price ("$12.99") so every surface renders it the same way.
    pub price: String,
    pub category: ProductCategory,
    pub skin_type: SkinType,
    pub image_url: String,
    pub stock: i64,
    pub in_stock: bool,
    pub status: ProductStatus,
    #[ts(as = "String")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            price: p.price().to_string(),
            in_stock: p.stock > 0,
            id: p.id,
            name: p.name,
            description: p.description,
            price_cents: p.price_cents,
            category: p.category,
            skin_type: p.skin_type,
            image_url: p.image_url,
            stock: p.stock,
            status: p.status,
            created_at: p.created_at,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<OrderItem> for OrderItemDto {
    fn from(i: OrderItem) -> Self {
        OrderItemDto {
            product_id: i.product_id,
            name: i.name_snapshot,
            unit_price_cents: i.unit_price_cents,
            quantity: i.quantity,
            line_total_cents: i.line_total_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: String,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub status: OrderStatus,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub total: String,
    pub coupon_code: Option<String>,
    pub items: Vec<OrderItemDto>,
    #[ts(as = "String")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[ts(as = "String")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderDto {
    fn from(o: Order) -> Self {
        OrderDto {
            total: o.total().to_string(),
            id: o.id,
            customer_id: o.customer_id,
            customer_name: o.customer_name,
            status: o.status,
            subtotal_cents: o.subtotal_cents,
            discount_cents: o.discount_cents,
            total_cents: o.total_cents,
            coupon_code: o.coupon_code,
            items: o.items.into_iter().map(OrderItemDto::from).collect(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CouponDto {
    pub id: String,
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub value: i64,
    pub min_order_cents: i64,
    pub max_discount_cents: Option<i64>,
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    pub status: CouponStatus,
    #[ts(as = "String")]
    pub starts_at: chrono::DateTime<chrono::Utc>,
    #[ts(as = "String")]
    pub ends_at: chrono::DateTime<chrono::Utc>,
    pub applicable_categories: Vec<ProductCategory>,
}

impl From<Coupon> for CouponDto {
    fn from(c: Coupon) -> Self {
        CouponDto {
            id: c.id,
            code: c.code,
            coupon_type: c.coupon_type,
            value: c.value,
            min_order_cents: c.min_order_cents,
            max_discount_cents: c.max_discount_cents,
            usage_limit: c.usage_limit,
            used_count: c.used_count,
            status: c.status,
            starts_at: c.starts_at,
            ends_at: c.ends_at,
            applicable_categories: c.applicable_categories,
        }
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub skin_type: SkinType,
    pub total_orders: u32,
    pub total_spent_cents: i64,
    pub total_spent: String,
    pub avg_rating: f64,
    pub status: CustomerStatus,
    #[ts(as = "String")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Customer> for CustomerDto {
    fn from(c: Customer) -> Self {
        CustomerDto {
            total_spent: c.total_spent().to_string(),
            id: c.id,
            name: c.name,
            email: c.email,
            skin_type: c.skin_type,
            total_orders: c.total_orders,
            total_spent_cents: c.total_spent_cents,
            avg_rating: c.avg_rating,
            status: c.status,
            created_at: c.created_at,
        }
    }
}

// =============================================================================
// Review
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: String,
    pub product_id: String,
    pub customer_name: String,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    #[ts(as = "String")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        ReviewDto {
            id: r.id,
            product_id: r.product_id,
            customer_name: r.customer_name,
            rating: r.rating,
            comment: r.comment,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub category: ProductCategory,
    pub image_url: String,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<CartItem> for CartItemDto {
    fn from(i: CartItem) -> Self {
        CartItemDto {
            line_total_cents: i.line_total_cents(),
            product_id: i.product_id,
            name: i.name,
            unit_price_cents: i.unit_price_cents,
            category: i.category,
            image_url: i.image_url,
            quantity: i.quantity,
        }
    }
}

/// Cart totals with the applied coupon, if any.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartDto {
    pub items: Vec<CartItemDto>,
    pub coupon_code: Option<String>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub total: String,
}

impl CartDto {
    pub fn from_cart(cart: &Cart, totals: CartTotals) -> Self {
        CartDto {
            items: cart
                .items
                .iter()
                .cloned()
                .map(CartItemDto::from)
                .collect(),
            coupon_code: cart.coupon_code.clone(),
            item_count: totals.item_count,
            total_quantity: totals.total_quantity,
            subtotal_cents: totals.subtotal_cents,
            discount_cents: totals.discount_cents,
            total_cents: totals.total_cents,
            total: Money::from_cents(totals.total_cents).to_string(),
        }
    }
}

// =============================================================================
// Auth
// =============================================================================

/// The signed-in user payload stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub skin_type: Option<SkinType>,
}

/// What sign-in returns: a bearer token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use velora_core::listing::Listing;

    #[test]
    fn test_paginated_envelope() {
        let items: Vec<i64> = (0..25).collect();
        let page = Listing::of(&items).page(2, 10);
        let dto = Paginated::from_page(page, |n| n * 2);

        assert_eq!(dto.data.len(), 10);
        assert_eq!(dto.data[0], 20);
        assert_eq!(dto.pagination.page, 2);
        assert_eq!(dto.pagination.limit, 10);
        assert_eq!(dto.pagination.total, 25);
        assert_eq!(dto.pagination.total_pages, 3);
    }

    #[test]
    fn test_product_dto_camel_case() {
        let product = Product {
            id: "p1".to_string(),
            name: LocalizedName::english("Vitamin C Serum"),
            description: String::new(),
            price_cents: 2999,
            category: ProductCategory::Serum,
            skin_type: SkinType::All,
            image_url: String::new(),
            stock: 0,
            status: ProductStatus::Active,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let dto = ProductDto::from(product);
        assert_eq!(dto.price, "$29.99");
        assert!(!dto.in_stock);

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("priceCents").is_some());
        assert!(json.get("skinType").is_some());
        assert!(json.get("price_cents").is_none());
    }

    #[test]
    fn test_coupon_dto_type_field() {
        let now = chrono::Utc::now();
        let coupon = Coupon {
            id: "c1".to_string(),
            code: "SAVE10".to_string(),
            coupon_type: CouponType::Percentage,
            value: 10,
            min_order_cents: 0,
            max_discount_cents: None,
            usage_limit: None,
            used_count: 0,
            status: CouponStatus::Active,
            starts_at: now,
            ends_at: now,
            applicable_categories: vec![],
            created_at: now,
        };

        let json = serde_json::to_value(CouponDto::from(coupon)).unwrap();
        assert_eq!(json["type"], "percentage");
    }
}
