//! # Repositories
//!
//! One repository per collection, all backed by the shared [`StoreInner`].
//!
//! Every public method starts with the configured latency sleep, so the
//! service layer above experiences the same async round trip it would get
//! from a remote backend. Reads take the collection's read lock; mutations
//! take the write lock for the whole operation so invariants (stock >= 0,
//! `used_count <= usage_limit`, order status transitions) hold without a
//! second check.
//!
//! List methods take an entity query struct that embeds
//! [`velora_core::listing::ListQuery`] and feed it through the shared
//! [`velora_core::listing::Listing`] pipeline.
//!
//! [`StoreInner`]: crate::StoreInner

pub mod coupon;
pub mod customer;
pub mod order;
pub mod product;
pub mod review;
