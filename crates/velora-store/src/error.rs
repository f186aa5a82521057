//! # Store Error Types
//!
//! Error types for collection operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Collection miss / invariant breach                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in velora-api) ← Serialized for the frontend                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use velora_core::{CouponRejection, ValidationError};

/// Collection operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found in its collection.
    ///
    /// ## When This Occurs
    /// - ID doesn't exist
    /// - Product was soft-deleted and the caller asked for active only
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique value collision.
    ///
    /// ## When This Occurs
    /// - Creating a coupon with an existing code
    /// - Registering a customer email twice
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// Not enough stock to fulfill a line item.
    ///
    /// Stock never goes below zero; an order that would do so is refused
    /// as a whole.
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// Status change not allowed by the entity's state machine.
    ///
    /// ## When This Occurs
    /// - Order skipping ahead (Pending → Shipped) or leaving a terminal state
    /// - Re-moderating a review that already has a verdict
    #[error("{entity} {id} cannot move from {from} to {to}")]
    InvalidTransition {
        entity: String,
        id: String,
        from: String,
        to: String,
    },

    /// Order submitted with no line items.
    #[error("Order must contain at least one item")]
    EmptyOrder,

    /// Coupon exists but cannot be redeemed right now.
    #[error("Coupon rejected: {0}")]
    CouponRejected(#[from] CouponRejection),

    /// Write payload failed a business rule check.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::not_found("Product", "p-123");
        assert_eq!(err.to_string(), "Product not found: p-123");

        let err = StoreError::InsufficientStock {
            product: "Vitamin C Serum".to_string(),
            available: 2,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Vitamin C Serum: available 2, requested 5"
        );
    }

    #[test]
    fn test_coupon_rejection_wraps() {
        let err: StoreError = CouponRejection::Expired.into();
        assert_eq!(err.to_string(), "Coupon rejected: Coupon has expired");
    }
}
