//! # Services
//!
//! One service per frontend surface. Storefront services (catalog,
//! checkout, auth) take the shopper's session into account; admin
//! services operate on the full collections and expect an admin token
//! to have been validated upstream.
//!
//! Request structs here accept the raw strings the UI sends ("all",
//! "price-asc", "") and translate them into typed store queries, so the
//! sentinel rules live in exactly one place per entity.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod coupons;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod reviews;
