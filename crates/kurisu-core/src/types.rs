//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Product      │   │ TechnicalDetail │   │  AnnotatedProduct   │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id (i64)       │◄──│  manufacturer?  │   │  product            │   │
//! │  │  name           │1:1│  collection?    │──►│  detail?            │   │
//! │  │  price_cents    │   │  anime_series?  │   │                     │   │
//! │  │  images[]       │   │  character?     │   │                     │   │
//! │  │  is_active      │   └─────────────────┘   └─────────────────────┘   │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Products are keyed by the integer id the backend assigns. Technical
//! details carry no identity of their own: they are looked up by product id.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::facets::FacetCategory;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product listed in the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier assigned by the backend.
    pub id: i64,

    /// Display name shown on catalog cards.
    pub name: String,

    /// Long description for the product detail page.
    #[serde(default)]
    pub description: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Image references, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,

    /// Optional showcase video reference.
    #[serde(default)]
    pub video: Option<String>,

    /// Seller that owns this listing.
    #[serde(default)]
    pub owner_id: i64,

    /// Whether the product is listed (sellers can deactivate).
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Creates an active product with no media and no owner.
    pub fn new(id: i64, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id,
            name: name.into(),
            description: String::new(),
            price_cents,
            images: Vec::new(),
            video: None,
            owner_id: 0,
            is_active: true,
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Cover image, if any.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

// =============================================================================
// Technical Detail
// =============================================================================

/// Optional collector metadata attached to a product.
///
/// Every field is independently nullable; the backend stores whatever the
/// seller filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TechnicalDetail {
    pub manufacturer: Option<String>,
    pub collection: Option<String>,
    pub anime_series: Option<String>,
    pub character: Option<String>,
}

impl TechnicalDetail {
    pub fn with_manufacturer(mut self, value: impl Into<String>) -> Self {
        self.manufacturer = Some(value.into());
        self
    }

    pub fn with_collection(mut self, value: impl Into<String>) -> Self {
        self.collection = Some(value.into());
        self
    }

    pub fn with_anime_series(mut self, value: impl Into<String>) -> Self {
        self.anime_series = Some(value.into());
        self
    }

    pub fn with_character(mut self, value: impl Into<String>) -> Self {
        self.character = Some(value.into());
        self
    }

    /// Returns the field backing the given facet category.
    pub fn value(&self, category: FacetCategory) -> Option<&str> {
        let field = match category {
            FacetCategory::Series => &self.anime_series,
            FacetCategory::Characters => &self.character,
            FacetCategory::Manufacturers => &self.manufacturer,
            FacetCategory::Collections => &self.collection,
        };
        field.as_deref()
    }
}

// =============================================================================
// Annotated Product
// =============================================================================

/// A product joined with its technical detail (absent if none was fetched).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnnotatedProduct {
    pub product: Product,
    pub detail: Option<TechnicalDetail>,
}

impl AnnotatedProduct {
    pub fn new(product: Product, detail: Option<TechnicalDetail>) -> Self {
        AnnotatedProduct { product, detail }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
