//! # Validation Module
//!
//! Input validation for the seller, signup and cart forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Same rules, typed errors, before anything is sent                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend columns                                              │
//! │  ├── NOT NULL, UNIQUE                                                  │
//! │  └── VARCHAR(120) / VARCHAR(200) widths mirrored below                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Column width for names, manufacturers, collections and characters.
pub const SHORT_TEXT_MAX: usize = 120;

/// Column width for anime series titles.
pub const SERIES_MAX: usize = 200;

/// Highest accepted price, in cents (€1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Minimum password length accepted at signup.
pub const PASSWORD_MIN: usize = 8;

// =============================================================================
// Generic Helpers
// =============================================================================

/// Trims and requires a non-empty value no longer than `max` characters.
pub fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    check_max_len(field, value, max)?;
    Ok(value.to_string())
}

/// Trims an optional value; blank becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<Option<String>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => {
            check_max_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
        None => Ok(None),
    }
}

fn check_max_len(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a product name (required, at most 120 characters).
///
/// ## Example
/// ```rust
/// use kurisu_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Rem 1/7 Scale").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    require_text("name", name, SHORT_TEXT_MAX)
}

/// Validates a product description (required, no length cap).
pub fn validate_description(description: &str) -> ValidationResult<String> {
    require_text("description", description, usize::MAX)
}

/// Validates a price in cents.
///
/// Zero is allowed (giveaways), negatives are not. The ceiling keeps any cart
/// of at most `MAX_CART_ITEMS` lines of `MAX_ITEM_QUANTITY` well inside `i64`.
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a cart quantity (1..=999).
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Account Validators
// =============================================================================

/// Validates a user name (required, at most 120 characters).
pub fn validate_user_name(user_name: &str) -> ValidationResult<String> {
    require_text("user_name", user_name, SHORT_TEXT_MAX)
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@` with a non-empty local part
/// - Domain contains a `.` that is neither first nor last
/// - No whitespace, at most 120 characters
///
/// Returns the trimmed, lowercased address.
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = require_text("email", email, SHORT_TEXT_MAX)?;
    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must look like name@example.com".to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let domain_ok = !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, _)| !head.is_empty())
        && !domain.ends_with('.');

    if local.is_empty() || !domain_ok {
        return Err(invalid());
    }

    Ok(email.to_lowercase())
}

/// Validates a new password.
///
/// ## Rules
/// - At least 8 characters
/// - At least one uppercase letter, one lowercase letter and one digit
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: PASSWORD_MIN,
        });
    }

    let missing = if !password.chars().any(|c| c.is_uppercase()) {
        Some("an uppercase letter")
    } else if !password.chars().any(|c| c.is_lowercase()) {
        Some("a lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("a digit")
    } else {
        None
    };

    match missing {
        Some(what) => Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: format!("must contain {}", what),
        }),
        None => Ok(()),
    }
}

/// Checks the "repeat password" field of the signup form.
pub fn validate_password_confirmation(password: &str, repeated: &str) -> ValidationResult<()> {
    if password != repeated {
        return Err(ValidationError::Mismatch {
            field: "repeat_password".to_string(),
            other: "password".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert_eq!(validate_product_name("  Saber Alter ").unwrap(), "Saber Alter");
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(121)).is_err());
        assert!(validate_product_name(&"あ".repeat(120)).is_ok());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("collection", Some("  "), 120).unwrap(), None);
        assert_eq!(optional_text("collection", None, 120).unwrap(), None);
        assert_eq!(
            optional_text("collection", Some(" figma "), 120).unwrap(),
            Some("figma".to_string())
        );
        assert!(optional_text("anime_series", Some(&"x".repeat(201)), SERIES_MAX).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { max: MAX_PRICE_CENTS, .. })
        ));
        assert!(validate_price_cents(i64::MAX).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" Okabe@FutureGadget.Lab ").unwrap(),
            "okabe@futuregadget.lab"
        );
        for bad in ["", "okabe", "@lab.jp", "okabe@", "okabe@lab", "okabe@.jp", "okabe@lab.", "a b@lab.jp", "a@b@lab.jp"] {
            assert!(validate_email(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("ElPsyKongroo1").is_ok());

        assert!(matches!(
            validate_password("Ab1"),
            Err(ValidationError::TooShort { min: 8, .. })
        ));
        assert!(validate_password("elpsykongroo1").is_err());
        assert!(validate_password("ELPSYKONGROO1").is_err());
        assert!(validate_password("ElPsyKongroo").is_err());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("Secret123", "Secret123").is_ok());
        assert!(matches!(
            validate_password_confirmation("Secret123", "Secret124"),
            Err(ValidationError::Mismatch { .. })
        ));
    }
}
