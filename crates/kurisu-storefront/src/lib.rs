//! # kurisu-storefront: The Storefront Around the Core
//!
//! Loads the catalog, holds the shopper's filter and cart state, and carries
//! the signed-in session. Business rules live in `kurisu-core`.
//!
//! ## Module Organization
//! - [`source`] - `CatalogSource` trait and the in-memory catalog
//! - [`catalog`] - `load_catalog` and the filterable `CatalogState`
//! - [`cart_store`] - Saved cart and the shared `CartState`
//! - [`session`] - Signed-in account and bearer token
//! - [`config`] - `StorefrontConfig` (TOML + environment)
//! - [`cli`] - Argument parsing and logging setup for `kurisu-catalog`
//! - [`error`] - Storefront error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kurisu_storefront::{load_catalog, CatalogState, InMemoryCatalog, StorefrontConfig};
//! use kurisu_core::FacetCategory;
//!
//! let config = StorefrontConfig::load_or_default(None);
//! let source = InMemoryCatalog::from_json(&fixture)?;
//!
//! let mut state = CatalogState::new(load_catalog(&source, &config).await?);
//! state.toggle(FacetCategory::Series, "Naruto");
//! println!("{} figures", state.visible_products().len());
//! ```

pub mod cart_store;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod session;
pub mod source;

pub use cart_store::{CartState, CartStore};
pub use catalog::{load_catalog, CatalogSnapshot, CatalogState};
pub use config::StorefrontConfig;
pub use error::{StorefrontError, StorefrontResult};
pub use session::Session;
pub use source::{CatalogFixture, CatalogSource, InMemoryCatalog, ProductRecord};
