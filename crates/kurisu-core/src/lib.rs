//! # kurisu-core: Pure Business Logic for the Kurisu Storefront
//!
//! This crate is the **heart** of the storefront. It contains the catalog,
//! cart and seller rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kurisu Storefront Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser Storefront                           │   │
//! │  │    Catalog UI ──► Filters ──► Product Detail ──► Cart UI        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kurisu-storefront                            │   │
//! │  │    load_catalog, CatalogState, CartStore, Session               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kurisu-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  facets   │  │   cart    │  │  seller   │  │   │
//! │  │   │  Product  │  │ FacetSet  │  │   Cart    │  │   User    │  │   │
//! │  │   │  Detail   │  │ Selection │  │ CartItem  │  │  Drafts   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, TechnicalDetail, AnnotatedProduct)
//! - [`facets`] - Catalog facet derivation and filtering
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Customer cart with frozen prices
//! - [`seller`] - Seller product management rules
//! - [`error`] - Domain error types
//! - [`validation`] - Form input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kurisu_core::facets::{apply_filter, derive_facets, toggle_selection};
//! use kurisu_core::{AnnotatedProduct, FacetCategory, FacetSelection, Product, TechnicalDetail};
//!
//! let products = vec![Product::new(1, "Naruto Figure", 2999)];
//! let annotated = vec![AnnotatedProduct::new(
//!     products[0].clone(),
//!     Some(TechnicalDetail::default().with_anime_series("Naruto")),
//! )];
//!
//! let facets = derive_facets(&annotated);
//! assert_eq!(facets.series, vec!["Naruto".to_string()]);
//!
//! let selection = toggle_selection(&FacetSelection::default(), FacetCategory::Series, "Naruto");
//! assert_eq!(apply_filter(&products, &annotated, &selection).len(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod facets;
pub mod money;
pub mod seller;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use facets::{FacetCategory, FacetSelection, FacetSet};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;
