//! # velora-core: Pure Business Logic for Velora
//!
//! This crate is the **heart** of the Velora storefront. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Velora Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Frontend (Next.js storefront + admin)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    velora-api (service facade)                  │   │
//! │  │    get_products, get_admin_orders, create_coupon, admin_login  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ velora-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐         │   │
//! │  │   │  types   │ │ listing  │ │  coupon  │ │   cart   │         │   │
//! │  │   │ Product  │ │ filter/  │ │ eligib./ │ │  totals  │         │   │
//! │  │   │ Order …  │ │ sort/page│ │  clamp   │ │ snapshot │         │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘         │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO COLLECTIONS • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 velora-store (in-memory data layer)             │   │
//! │  │          Seeded collections, repositories, simulated I/O        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Order, Coupon, Customer, Review)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`listing`] - The shared filter/sort/paginate pipeline
//! - [`coupon`] - Coupon eligibility and discount clamping
//! - [`cart`] - Cart math with frozen-price snapshots
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Collection, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use velora_core::listing::{Listing, SortDirection};
//! use velora_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let price = Money::from_cents(2999); // $29.99
//!
//! // A 10% discount in basis points
//! let discount = price.percentage_bps(1000);
//! assert_eq!(discount.cents(), 300);
//!
//! // The listing pipeline behind every list screen
//! let prices = [10, 30, 20];
//! let page = Listing::of(&prices)
//!     .sort_by(|a, b| a.cmp(b), SortDirection::Asc)
//!     .page(1, 10);
//! assert_eq!(page.items, vec![10, 20, 30]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod coupon;
pub mod error;
pub mod listing;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use velora_core::Money` instead of
// `use velora_core::money::Money`

pub use cart::{Cart, CartItem, CartTotals};
pub use coupon::CouponRejection;
pub use error::{CoreError, CoreResult, ValidationError};
pub use listing::{ListQuery, Listing, PageResult, SortDirection};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for every list screen.
///
/// Matches the storefront's grid (two rows of five) and the admin tables.
/// Callers can override per request up to [`MAX_PAGE_SIZE`].
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on requested page size.
///
/// Prevents a single request from cloning the whole catalog.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Maximum unique items allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart.
///
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Stock level at or below which a product shows up in the admin
/// low-stock report.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
