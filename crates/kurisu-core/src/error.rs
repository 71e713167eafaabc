//! # Error Types
//!
//! Domain-specific error types for kurisu-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kurisu-core errors (this file)                                        │
//! │  ├── CoreError        - Cart and seller rule violations                │
//! │  └── ValidationError  - Form input validation failures                 │
//! │                                                                         │
//! │  kurisu-storefront errors (separate crate)                             │
//! │  └── StorefrontError  - Config, session, source, cart file failures    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StorefrontError → caller          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The facet filter has no entry here: it is total over well-typed input.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Product is deactivated and cannot be bought.
    #[error("Product {0} is not available for sale")]
    ProductInactive(i64),

    /// Cart has exceeded maximum allowed distinct items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// The cart total would not fit in the money type.
    #[error("Cart total too large after adding product {product_id}")]
    TotalTooLarge { product_id: i64 },

    /// Cart operation referenced a product that is not in the cart.
    #[error("Product {0} not in cart")]
    NotInCart(i64),

    /// User may not perform the operation on this product.
    ///
    /// ## When This Occurs
    /// - A client account tries to publish a product
    /// - A seller edits a product owned by another seller
    #[error("User {user_id} may not {action} product {product_id}")]
    PermissionDenied {
        user_id: i64,
        product_id: i64,
        action: &'static str,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed email, malformed price).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Two fields that must agree do not.
    #[error("{field} does not match {other}")]
    Mismatch { field: String, other: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(
            err.to_string(),
            "Quantity 1200 exceeds maximum allowed (999)"
        );

        let err = CoreError::PermissionDenied {
            user_id: 7,
            product_id: 42,
            action: "modify",
        };
        assert_eq!(err.to_string(), "User 7 may not modify product 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Mismatch {
            field: "repeat_password".to_string(),
            other: "password".to_string(),
        };
        assert_eq!(err.to_string(), "repeat_password does not match password");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
