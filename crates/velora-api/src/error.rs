//! # API Error Type
//!
//! Unified error type returned by every service method.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Velora                                 │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  api.listProducts()                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Method                                                  │  │
//! │  │  ApiResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store miss? ────── StoreError::NotFound ────────┐              │  │
//! │  │         │                                        ▼              │  │
//! │  │  Bad input? ─────── CoreError::Validation ──── ApiError ───────►│  │
//! │  │         │                                        ▲              │  │
//! │  │  Coupon fails? ──── CouponRejection ─────────────┘              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  catch (e) {                                                            │
//! │    // e.code = "NOT_FOUND", e.message = "product not found: ..."        │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use ts_rs::TS;

use velora_core::{CoreError, CouponRejection};
use velora_store::StoreError;

/// Error returned to the frontend from service methods.
///
/// ## Serialization
/// ```json
/// { "code": "NOT_FOUND", "message": "product not found: abc-123" }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Missing or invalid credentials/token
    Unauthorized,

    /// Operation conflicts with domain rules (state machine, duplicates)
    BusinessLogic,

    /// Coupon exists but cannot be applied
    CouponError,

    /// Not enough stock to fulfill the request
    InsufficientStock,

    /// Cart operation failed
    CartError,

    /// Unexpected internal error
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            StoreError::Duplicate { field, value } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("{} '{}' already exists", field, value),
            ),
            StoreError::InsufficientStock {
                product,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product, available, requested
                ),
            ),
            StoreError::InvalidTransition {
                entity,
                id,
                from,
                to,
            } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("{} {} cannot move from {} to {}", entity, id, from, to),
            ),
            StoreError::EmptyOrder => {
                ApiError::new(ErrorCode::ValidationError, "Order must contain at least one item")
            }
            StoreError::CouponRejected(rejection) => rejection.into(),
            StoreError::Validation(err) => ApiError::validation(err.to_string()),
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("product", &id),
            CoreError::NotInCart(id) => {
                ApiError::new(ErrorCode::CartError, format!("Product not in cart: {}", id))
            }
            CoreError::CartTooLarge { max } => ApiError::new(
                ErrorCode::CartError,
                format!("Cart cannot hold more than {} distinct items", max),
            ),
            CoreError::QuantityTooLarge { requested, max } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            CoreError::InvalidStatusTransition { order_id, from, to } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Order {} cannot move from {} to {}", order_id, from, to),
            ),
            CoreError::Validation(err) => ApiError::validation(err.to_string()),
        }
    }
}

impl From<velora_core::ValidationError> for ApiError {
    fn from(err: velora_core::ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Coupon rejections carry their storefront-facing message verbatim.
impl From<CouponRejection> for ApiError {
    fn from(rejection: CouponRejection) -> Self {
        ApiError::new(ErrorCode::CouponError, rejection.to_string())
    }
}

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_code_and_message() {
        let err = ApiError::not_found("product", "p-1");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "product not found: p-1");
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ApiError = StoreError::EmptyOrder.into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = StoreError::InsufficientStock {
            product: "Serum".to_string(),
            available: 1,
            requested: 3,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_coupon_rejection_mapping() {
        let err: ApiError = CouponRejection::Expired.into();
        assert_eq!(err.code, ErrorCode::CouponError);
        assert_eq!(err.message, "Coupon has expired");
    }
}
