//! # Seller Product Management
//!
//! Accounts, ownership rules and the create/edit forms sellers use to manage
//! their listings.
//!
//! ## Who May Do What
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Permissions                                     │
//! │                                                                         │
//! │                       Client    Seller (owner)   Seller (other)         │
//! │  View active product    ✅          ✅               ✅                 │
//! │  View inactive product  ❌          ✅               ❌                 │
//! │  Create product         ❌          ✅               ✅                 │
//! │  Edit / toggle status   ❌          ✅               ❌                 │
//! │  Edit technical detail  ❌          ✅               ❌                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, TechnicalDetail};
use crate::validation::{
    optional_text, require_text, validate_description, validate_email, validate_password,
    validate_password_confirmation, validate_price_cents, validate_product_name,
    validate_user_name, ValidationResult, SERIES_MAX, SHORT_TEXT_MAX,
};

// =============================================================================
// Accounts
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shopper account.
    Client,
    /// Account that can publish products.
    Seller,
}

/// A signed-in account as returned by the backend's login endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl Role {
    /// Maps the backend's role row id. Row 1 is the client role; every other
    /// row grants selling.
    pub fn from_rol_id(rol_id: i64) -> Role {
        if rol_id == 1 {
            Role::Client
        } else {
            Role::Seller
        }
    }
}

impl User {
    pub fn is_seller(&self) -> bool {
        self.role == Role::Seller
    }
}

/// The signup form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignupForm {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub repeat_password: String,
}

impl SignupForm {
    /// Validates every field, returning a normalised copy.
    pub fn validate(&self) -> ValidationResult<SignupForm> {
        let email = validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_password_confirmation(&self.password, &self.repeat_password)?;

        Ok(SignupForm {
            user_name: validate_user_name(&self.user_name)?,
            first_name: require_text("first_name", &self.first_name, SHORT_TEXT_MAX)?,
            last_name: require_text("last_name", &self.last_name, SHORT_TEXT_MAX)?,
            email,
            password: self.password.clone(),
            repeat_password: self.repeat_password.clone(),
        })
    }
}

/// The "edit profile" form.
///
/// Leaving the password blank keeps the current one; the strength and
/// repeat checks only run when a new password is typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdateForm {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Avatar as a URL or data URL.
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub repeat_password: String,
}

/// A validated profile edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub img: Option<String>,
    /// `None` keeps the current password.
    pub password: Option<String>,
}

impl ProfileUpdateForm {
    pub fn validate(&self) -> ValidationResult<ProfileUpdate> {
        let password = if self.password.is_empty() {
            None
        } else {
            validate_password_confirmation(&self.password, &self.repeat_password)?;
            validate_password(&self.password)?;
            Some(self.password.clone())
        };

        Ok(ProfileUpdate {
            user_name: validate_user_name(&self.user_name)?,
            first_name: require_text("first_name", &self.first_name, SHORT_TEXT_MAX)?,
            last_name: require_text("last_name", &self.last_name, SHORT_TEXT_MAX)?,
            email: validate_email(&self.email)?,
            img: self
                .img
                .as_deref()
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .map(str::to_string),
            password,
        })
    }
}

// =============================================================================
// Ownership Rules
// =============================================================================

/// True when `user` owns `product` and is a seller.
pub fn can_manage(user: &User, product: &Product) -> bool {
    user.is_seller() && product.owner_id == user.id
}

/// Inactive products are visible only to their owner.
pub fn is_visible_to(product: &Product, viewer: Option<&User>) -> bool {
    product.is_active || viewer.is_some_and(|u| u.id == product.owner_id)
}

fn ensure_can_manage(user: &User, product: &Product, action: &'static str) -> CoreResult<()> {
    if can_manage(user, product) {
        Ok(())
    } else {
        Err(CoreError::PermissionDenied {
            user_id: user.id,
            product_id: product.id,
            action,
        })
    }
}

/// Activates or deactivates a listing.
pub fn set_status(user: &User, product: &mut Product, active: bool) -> CoreResult<()> {
    ensure_can_manage(user, product, "change status of")?;
    product.is_active = active;
    Ok(())
}

// =============================================================================
// Product Drafts
// =============================================================================

/// The create/edit product form as typed by the seller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    /// Price as typed, e.g. "24.99".
    pub price: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub video: Option<String>,
    /// New listings are active unless the seller unticks the box.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A validated draft, ready to send to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub images: Vec<String>,
    pub video: Option<String>,
    pub owner_id: i64,
    pub is_active: bool,
}

impl ProductDraft {
    /// Validates the draft on behalf of `seller`.
    ///
    /// `existing_names` are the names already in the catalog; the backend
    /// rejects duplicates, so the form does too (case-insensitive, trimmed).
    pub fn validate<'a>(
        &self,
        seller: &User,
        existing_names: impl IntoIterator<Item = &'a str>,
    ) -> CoreResult<NewProduct> {
        if !seller.is_seller() {
            return Err(CoreError::PermissionDenied {
                user_id: seller.id,
                product_id: 0,
                action: "create",
            });
        }

        let name = validate_product_name(&self.name)?;
        let description = validate_description(&self.description)?;
        let price = Money::parse_decimal(&self.price)?;
        validate_price_cents(price.cents())?;

        let folded = name.to_lowercase();
        if existing_names
            .into_iter()
            .any(|n| n.trim().to_lowercase() == folded)
        {
            return Err(ValidationError::NotAllowed {
                field: "name".to_string(),
                allowed: vec!["a name not already in the catalog".to_string()],
            }
            .into());
        }

        Ok(NewProduct {
            name,
            description,
            price_cents: price.cents(),
            images: self
                .images
                .iter()
                .map(|i| i.trim())
                .filter(|i| !i.is_empty())
                .map(str::to_string)
                .collect(),
            video: self
                .video
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            owner_id: seller.id,
            is_active: self.is_active.unwrap_or(true),
        })
    }

    /// Applies an edit to an existing listing the seller owns.
    ///
    /// The name uniqueness check is the backend's job on update.
    pub fn apply_to(&self, seller: &User, product: &mut Product) -> CoreResult<()> {
        ensure_can_manage(seller, product, "modify")?;
        let validated = self.validate(seller, std::iter::empty::<&str>())?;

        product.name = validated.name;
        product.description = validated.description;
        product.price_cents = validated.price_cents;
        product.images = validated.images;
        product.video = validated.video;
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
        Ok(())
    }
}

// =============================================================================
// Technical Detail Patch
// =============================================================================

/// A partial technical-detail edit.
///
/// Only fields that are present overwrite; a present blank string clears the
/// field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TechnicalDetailPatch {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub anime_series: Option<String>,
    #[serde(default)]
    pub character: Option<String>,
}

impl TechnicalDetailPatch {
    /// Validates field widths against the backend columns.
    pub fn validate(&self) -> ValidationResult<()> {
        self.normalised().map(|_| ())
    }

    /// Builds a fresh detail record (the create case).
    pub fn into_detail(self) -> ValidationResult<TechnicalDetail> {
        let mut detail = TechnicalDetail::default();
        self.merge(&mut detail)?;
        Ok(detail)
    }

    /// Merges this patch into an existing detail the seller owns.
    pub fn apply_to(
        &self,
        seller: &User,
        product: &Product,
        detail: &mut TechnicalDetail,
    ) -> CoreResult<()> {
        ensure_can_manage(seller, product, "edit details of")?;
        self.merge(detail)?;
        Ok(())
    }

    /// Trims and width-checks every present field. The outer `None` means
    /// "not in the patch", the inner one "clear the field".
    fn normalised(&self) -> ValidationResult<[Option<Option<String>>; 4]> {
        let check = |field: &str, value: &Option<String>, max: usize| {
            value
                .as_deref()
                .map(|v| optional_text(field, Some(v), max))
                .transpose()
        };

        Ok([
            check("manufacturer", &self.manufacturer, SHORT_TEXT_MAX)?,
            check("collection", &self.collection, SHORT_TEXT_MAX)?,
            check("anime_series", &self.anime_series, SERIES_MAX)?,
            check("character", &self.character, SHORT_TEXT_MAX)?,
        ])
    }

    /// All-or-nothing: `detail` is untouched when any field is invalid.
    fn merge(&self, detail: &mut TechnicalDetail) -> ValidationResult<()> {
        let values = self.normalised()?;
        let targets = [
            &mut detail.manufacturer,
            &mut detail.collection,
            &mut detail.anime_series,
            &mut detail.character,
        ];
        for (value, target) in values.into_iter().zip(targets) {
            if let Some(value) = value {
                *target = value;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
