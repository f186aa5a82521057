//! # Seed Data
//!
//! Populates the store with the demo catalog at construction time.
//!
//! There is no external database to load from: every collection starts
//! from this module and resets when the process restarts. The data is
//! shaped to exercise every screen — all six categories, a product that is
//! out of stock, a handful below the low-stock threshold, orders in every
//! status, expired and exhausted coupons, and reviews awaiting moderation.
//!
//! Customer aggregates (`total_orders`, `total_spent_cents`, `avg_rating`)
//! are computed here from the seeded orders and reviews rather than typed
//! in, so the dashboard numbers always reconcile.

use chrono::{Duration, Utc};
use uuid::Uuid;

use velora_core::{
    Coupon, CouponStatus, CouponType, Customer, CustomerStatus, LocalizedName, Order, OrderItem,
    OrderStatus, Product, ProductCategory, ProductStatus, Review, ReviewStatus, SkinType,
};

/// Everything the store starts with.
pub(crate) struct SeedData {
    pub products: Vec<Product>,
    pub coupons: Vec<Coupon>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub reviews: Vec<Review>,
}

/// Catalog rows: (en, th, category, skin type, price cents, stock, days ago).
#[rustfmt::skip]
const CATALOG: &[(&str, Option<&str>, ProductCategory, SkinType, i64, i64, i64)] = &[
    ("Gentle Foaming Cleanser",      Some("โฟมล้างหน้าสูตรอ่อนโยน"), ProductCategory::Cleanser,    SkinType::Sensitive,  1299, 64, 40),
    ("Tea Tree Purifying Cleanser",  None,                            ProductCategory::Cleanser,    SkinType::Oily,       1499, 38, 39),
    ("Rice Water Cream Cleanser",    Some("ครีมล้างหน้าน้ำข้าว"),     ProductCategory::Cleanser,    SkinType::Dry,        1599,  7, 38),
    ("Micellar Cleansing Water",     None,                            ProductCategory::Cleanser,    SkinType::All,         999, 80, 37),
    ("Rose Petal Toner",             None,                            ProductCategory::Toner,       SkinType::Normal,     1399, 45, 36),
    ("Witch Hazel Clarifying Toner", None,                            ProductCategory::Toner,       SkinType::Oily,       1199, 22, 35),
    ("Hydrating Essence Toner",      Some("โทนเนอร์เอสเซนส์"),        ProductCategory::Toner,       SkinType::Dry,        1899, 51, 34),
    ("PHA Mild Exfoliating Toner",   None,                            ProductCategory::Toner,       SkinType::Sensitive,  2099,  9, 33),
    ("Vitamin C Brightening Serum",  Some("เซรั่มวิตามินซี"),         ProductCategory::Serum,       SkinType::All,        2999, 55, 32),
    ("Niacinamide 10% Serum",        None,                            ProductCategory::Serum,       SkinType::Oily,       2499, 72, 31),
    ("Hyaluronic Acid Serum",        None,                            ProductCategory::Serum,       SkinType::Dry,        2299, 30, 30),
    ("Retinol Night Serum",          None,                            ProductCategory::Serum,       SkinType::Normal,     3499,  0, 29),
    ("Aloe Soothing Gel Cream",      None,                            ProductCategory::Moisturizer, SkinType::Sensitive,  1699, 47, 28),
    ("Ceramide Barrier Cream",       Some("ครีมเซราไมด์"),            ProductCategory::Moisturizer, SkinType::Dry,        2599, 26, 27),
    ("Oil-Free Gel Moisturizer",     None,                            ProductCategory::Moisturizer, SkinType::Oily,       1999, 58, 26),
    ("Snail Mucin Repair Cream",     None,                            ProductCategory::Moisturizer, SkinType::All,        2799,  5, 25),
    ("Daily Mineral Sunscreen SPF50",None,                            ProductCategory::Sunscreen,   SkinType::All,        2199, 90, 24),
    ("Matte Finish Sunscreen SPF30", None,                            ProductCategory::Sunscreen,   SkinType::Oily,       1799, 41, 23),
    ("Tinted Sunscreen SPF40",       None,                            ProductCategory::Sunscreen,   SkinType::Normal,     2399, 18, 22),
    ("After-Sun Recovery Lotion",    None,                            ProductCategory::Sunscreen,   SkinType::Sensitive,  1599, 12, 21),
    ("Green Clay Detox Mask",        None,                            ProductCategory::Mask,        SkinType::Oily,       1499, 33, 20),
    ("Overnight Sleeping Mask",      Some("สลีปปิ้งมาส์ก"),           ProductCategory::Mask,        SkinType::Dry,        2099, 28, 19),
    ("Honey Hydration Sheet Mask",   None,                            ProductCategory::Mask,        SkinType::All,         399, 150, 18),
    ("Charcoal Pore Strip Mask",     None,                            ProductCategory::Mask,        SkinType::Combination,  899,  8, 17),
];

fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn build_products() -> Vec<Product> {
    let now = Utc::now();
    CATALOG
        .iter()
        .map(|&(en, th, category, skin_type, price_cents, stock, days_ago)| {
            let created = now - Duration::days(days_ago);
            Product {
                id: Uuid::new_v4().to_string(),
                name: LocalizedName {
                    en: en.to_string(),
                    th: th.map(|s| s.to_string()),
                    kh: None,
                },
                description: format!(
                    "{} — a {} formulated for {} skin.",
                    en,
                    category,
                    skin_type
                ),
                price_cents,
                category,
                skin_type,
                image_url: format!("/images/products/{}.jpg", slugify(en)),
                stock,
                status: ProductStatus::Active,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

fn build_coupons() -> Vec<Coupon> {
    let now = Utc::now();
    let month = Duration::days(30);

    let base = |code: &str, coupon_type: CouponType, value: i64| Coupon {
        id: Uuid::new_v4().to_string(),
        code: code.to_string(),
        coupon_type,
        value,
        min_order_cents: 0,
        max_discount_cents: None,
        usage_limit: None,
        used_count: 0,
        status: CouponStatus::Active,
        starts_at: now - month,
        ends_at: now + month,
        applicable_categories: vec![],
        created_at: now - month,
    };

    vec![
        // 10% off anything, no cap
        base("SAVE10", CouponType::Percentage, 10),
        // 20% off, capped at $30
        Coupon {
            max_discount_cents: Some(3000),
            ..base("WELCOME20", CouponType::Percentage, 20)
        },
        // 25% off serums only
        Coupon {
            applicable_categories: vec![ProductCategory::Serum],
            ..base("SERUM25", CouponType::Percentage, 25)
        },
        // Flat $5 off orders of $25+
        Coupon {
            min_order_cents: 2500,
            ..base("FLAT5", CouponType::Fixed, 500)
        },
        // Launch promo, nearly used up
        Coupon {
            usage_limit: Some(100),
            used_count: 99,
            ..base("LAUNCH50", CouponType::Percentage, 50)
        },
        // Last season's code, kept for the admin history view
        Coupon {
            starts_at: now - Duration::days(120),
            ends_at: now - Duration::days(60),
            ..base("SPRING15", CouponType::Percentage, 15)
        },
    ]
}

/// Customer rows: (name, email, skin type, days ago).
const CUSTOMERS: &[(&str, &str, SkinType, i64)] = &[
    ("Mai Chan", "mai.chan@example.com", SkinType::Dry, 90),
    ("Sokha Pich", "sokha.pich@example.com", SkinType::Oily, 75),
    ("Lina Vong", "lina.vong@example.com", SkinType::Sensitive, 60),
    ("Dara Kim", "dara.kim@example.com", SkinType::Combination, 45),
    ("Nita Sao", "nita.sao@example.com", SkinType::Normal, 30),
    ("Chanthy Ros", "chanthy.ros@example.com", SkinType::All, 14),
];

fn build_customers() -> Vec<Customer> {
    let now = Utc::now();
    CUSTOMERS
        .iter()
        .map(|&(name, email, skin_type, days_ago)| Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            skin_type,
            total_orders: 0,
            total_spent_cents: 0,
            avg_rating: 0.0,
            status: CustomerStatus::Active,
            created_at: now - Duration::days(days_ago),
        })
        .collect()
}

/// Order rows: (customer idx, [(product idx, qty)], status, days ago, coupon).
#[rustfmt::skip]
const ORDERS: &[(usize, &[(usize, i64)], OrderStatus, i64, Option<&str>)] = &[
    (0, &[(8, 1), (10, 1)],        OrderStatus::Delivered,  25, Some("SAVE10")),
    (1, &[(1, 2), (9, 1)],         OrderStatus::Delivered,  20, None),
    (2, &[(0, 1), (12, 1), (22, 3)], OrderStatus::Shipped,  10, None),
    (3, &[(20, 1), (23, 2)],       OrderStatus::Processing,  6, None),
    (0, &[(16, 1)],                OrderStatus::Delivered,   5, None),
    (4, &[(6, 1), (13, 1)],        OrderStatus::Pending,     2, None),
    (5, &[(17, 2)],                OrderStatus::Cancelled,   4, None),
    (1, &[(4, 1), (21, 1)],        OrderStatus::Pending,     1, None),
];

fn build_orders(products: &[Product], customers: &[Customer], coupons: &[Coupon]) -> Vec<Order> {
    let now = Utc::now();
    ORDERS
        .iter()
        .map(|&(customer_idx, lines, status, days_ago, coupon_code)| {
            let customer = &customers[customer_idx];
            let items: Vec<OrderItem> = lines
                .iter()
                .map(|&(product_idx, quantity)| {
                    let product = &products[product_idx];
                    OrderItem {
                        product_id: product.id.clone(),
                        name_snapshot: product.name.en.clone(),
                        unit_price_cents: product.price_cents,
                        quantity,
                        line_total_cents: product.price_cents * quantity,
                    }
                })
                .collect();

            let subtotal: i64 = items.iter().map(|i| i.line_total_cents).sum();
            let discount = coupon_code
                .and_then(|code| coupons.iter().find(|c| c.code == code))
                .map(|c| {
                    velora_core::coupon::discount_amount(
                        c,
                        velora_core::Money::from_cents(subtotal),
                    )
                    .cents()
                })
                .unwrap_or(0);

            let created = now - Duration::days(days_ago);
            Order {
                id: Uuid::new_v4().to_string(),
                customer_id: Some(customer.id.clone()),
                customer_name: customer.name.clone(),
                status,
                subtotal_cents: subtotal,
                discount_cents: discount,
                total_cents: subtotal - discount,
                coupon_code: coupon_code.map(|c| c.to_string()),
                items,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

/// Review rows: (product idx, customer idx, rating, comment, status, days ago).
#[rustfmt::skip]
const REVIEWS: &[(usize, usize, u8, &str, ReviewStatus, i64)] = &[
    (8, 0, 5, "Noticeably brighter skin after two weeks.",      ReviewStatus::Approved, 22),
    (10, 0, 4, "Very hydrating, a little sticky at first.",     ReviewStatus::Approved, 21),
    (9, 1, 5, "Cleared up my T-zone without drying me out.",    ReviewStatus::Approved, 15),
    (0, 2, 4, "Gentle enough for my reactive skin.",            ReviewStatus::Approved,  8),
    (16, 0, 5, "No white cast at all. Repurchasing.",           ReviewStatus::Pending,   3),
    (20, 3, 3, "Does the job but the jar is small.",            ReviewStatus::Pending,   2),
    (12, 2, 2, "Pilled under sunscreen for me.",                ReviewStatus::Rejected,  6),
    (22, 4, 5, "Best value sheet mask I've tried.",             ReviewStatus::Approved,  1),
];

fn build_reviews(products: &[Product], customers: &[Customer]) -> Vec<Review> {
    let now = Utc::now();
    REVIEWS
        .iter()
        .map(|&(product_idx, customer_idx, rating, comment, status, days_ago)| Review {
            id: Uuid::new_v4().to_string(),
            product_id: products[product_idx].id.clone(),
            customer_name: customers[customer_idx].name.to_string(),
            rating,
            comment: comment.to_string(),
            status,
            created_at: now - Duration::days(days_ago),
        })
        .collect()
}

/// Folds order and review history into the customer aggregate fields and
/// coupon usage counters.
fn apply_aggregates(
    customers: &mut [Customer],
    coupons: &mut [Coupon],
    orders: &[Order],
    reviews: &[Review],
) {
    for coupon in coupons.iter_mut() {
        coupon.used_count += orders
            .iter()
            .filter(|o| o.coupon_code.as_deref() == Some(coupon.code.as_str()))
            .count() as u32;
    }

    for customer in customers.iter_mut() {
        for order in orders {
            if order.customer_id.as_deref() == Some(customer.id.as_str())
                && order.status != OrderStatus::Cancelled
            {
                customer.total_orders += 1;
                customer.total_spent_cents += order.total_cents;
            }
        }

        let ratings: Vec<f64> = reviews
            .iter()
            .filter(|r| r.customer_name == customer.name && r.status == ReviewStatus::Approved)
            .map(|r| r.rating as f64)
            .collect();
        if !ratings.is_empty() {
            customer.avg_rating = ratings.iter().sum::<f64>() / ratings.len() as f64;
        }
    }
}

pub(crate) fn seed_data() -> SeedData {
    let products = build_products();
    let mut coupons = build_coupons();
    let mut customers = build_customers();
    let orders = build_orders(&products, &customers, &coupons);
    let reviews = build_reviews(&products, &customers);
    apply_aggregates(&mut customers, &mut coupons, &orders, &reviews);

    SeedData {
        products,
        coupons,
        customers,
        orders,
        reviews,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_covers_every_category() {
        let data = seed_data();
        for category in ProductCategory::ALL {
            assert!(
                data.products.iter().any(|p| p.category == category),
                "no product seeded for {}",
                category
            );
        }
    }

    #[test]
    fn test_seed_orders_reference_seeded_products() {
        let data = seed_data();
        for order in &data.orders {
            for item in &order.items {
                assert!(data.products.iter().any(|p| p.id == item.product_id));
            }
            assert_eq!(
                order.subtotal_cents,
                order.items.iter().map(|i| i.line_total_cents).sum::<i64>()
            );
            assert_eq!(order.total_cents, order.subtotal_cents - order.discount_cents);
        }
    }

    #[test]
    fn test_seed_aggregates_reconcile() {
        let data = seed_data();
        let mai = data
            .customers
            .iter()
            .find(|c| c.email == "mai.chan@example.com")
            .unwrap();

        let expected: i64 = data
            .orders
            .iter()
            .filter(|o| {
                o.customer_id.as_deref() == Some(mai.id.as_str())
                    && o.status != OrderStatus::Cancelled
            })
            .map(|o| o.total_cents)
            .sum();
        assert_eq!(mai.total_spent_cents, expected);
        assert!(mai.total_orders >= 2);
        assert!(mai.avg_rating > 0.0);

        let save10 = data.coupons.iter().find(|c| c.code == "SAVE10").unwrap();
        let redemptions = data
            .orders
            .iter()
            .filter(|o| o.coupon_code.as_deref() == Some("SAVE10"))
            .count() as u32;
        assert_eq!(save10.used_count, redemptions);
    }

    #[test]
    fn test_seed_has_moderation_queue_and_low_stock() {
        let data = seed_data();
        assert!(data
            .reviews
            .iter()
            .any(|r| r.status == ReviewStatus::Pending));
        assert!(data.products.iter().any(|p| p.stock == 0));
        assert!(data
            .products
            .iter()
            .any(|p| p.stock > 0 && p.stock <= velora_core::LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Vitamin C Brightening Serum"), "vitamin-c-brightening-serum");
        assert_eq!(slugify("Daily Mineral Sunscreen SPF50"), "daily-mineral-sunscreen-spf50");
    }
}
