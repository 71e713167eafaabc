//! # Storefront Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Error Categories                          │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Catalog       │  │     Persistence         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Source         │  │  CartStoreFailed        │ │
//! │  │  ConfigLoad     │  │  Unavailable    │  │  Serialization          │ │
//! │  │  ConfigSave     │  │  Unauthenticated│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Core(CoreError) wraps business-rule failures from kurisu-core.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kurisu_core::CoreError;
use thiserror::Error;

/// Result type alias for storefront operations.
pub type StorefrontResult<T> = Result<T, StorefrontError>;

#[derive(Debug, Error)]
pub enum StorefrontError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid storefront configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Catalog Errors
    // =========================================================================
    /// No session, or the session has no token.
    #[error("Not signed in")]
    Unauthenticated,

    /// The catalog backend could not answer.
    #[error("Catalog source unavailable: {0}")]
    SourceUnavailable(String),

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    #[error("Cart store failed at {path}: {reason}")]
    CartStoreFailed { path: String, reason: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Business Rules
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for StorefrontError {
    fn from(err: serde_json::Error) -> Self {
        StorefrontError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for StorefrontError {
    fn from(err: toml::de::Error) -> Self {
        StorefrontError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StorefrontError {
    fn from(err: toml::ser::Error) -> Self {
        StorefrontError::ConfigSaveFailed(err.to_string())
    }
}

impl From<kurisu_core::ValidationError> for StorefrontError {
    fn from(err: kurisu_core::ValidationError) -> Self {
        StorefrontError::Core(err.into())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StorefrontError {
    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorefrontError::SourceUnavailable(_))
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StorefrontError::InvalidConfig(_)
                | StorefrontError::ConfigLoadFailed(_)
                | StorefrontError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert!(StorefrontError::SourceUnavailable("502".into()).is_retryable());
        assert!(!StorefrontError::Unauthenticated.is_retryable());
        assert!(!StorefrontError::Core(CoreError::ProductNotFound(1)).is_retryable());

        assert!(StorefrontError::InvalidConfig("x".into()).is_config_error());
        assert!(StorefrontError::ConfigLoadFailed("x".into()).is_config_error());
        assert!(!StorefrontError::Unauthenticated.is_config_error());
    }

    #[test]
    fn test_core_errors_display_transparently() {
        let err: StorefrontError = CoreError::ProductNotFound(42).into();
        assert_eq!(err.to_string(), CoreError::ProductNotFound(42).to_string());
    }

    #[test]
    fn test_cart_store_display() {
        let err = StorefrontError::CartStoreFailed {
            path: "/tmp/cart.json".into(),
            reason: "permission denied".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cart store failed at /tmp/cart.json: permission denied"
        );
    }
}
