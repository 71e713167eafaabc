//! # Cart Persistence
//!
//! Keeps the shopper's cart between visits.
//!
//! ## Thread Safety
//! `CartState` wraps the cart in `Arc<Mutex<T>>`: handlers may run
//! concurrently, but only one may change the cart at a time.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup ──► CartStore::load() ──► CartState::new(cart)                 │
//! │                                          │                              │
//! │  "Add to cart" ──► with_cart_mut(|c| c.add_item(..)) ──► store.save()   │
//! │                                                                         │
//! │  navbar badge ──► with_cart(|c| c.total_quantity())                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use kurisu_core::Cart;
use tracing::{debug, info};

use crate::error::{StorefrontError, StorefrontResult};

/// Reads and writes the cart as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CartStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved cart. A missing file is an empty cart; a file whose
    /// total no longer fits in `Money` is rejected.
    pub fn load(&self) -> StorefrontResult<Cart> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No saved cart, starting empty");
            return Ok(Cart::new());
        }

        let contents = std::fs::read_to_string(&self.path).map_err(|e| self.failed(e))?;
        let cart: Cart = serde_json::from_str(&contents)?;
        cart.checked_subtotal()?;
        debug!(path = ?self.path, items = cart.item_count(), "Cart loaded");
        Ok(cart)
    }

    pub fn save(&self, cart: &Cart) -> StorefrontResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.failed(e))?;
        }

        let contents = serde_json::to_string_pretty(cart)?;
        std::fs::write(&self.path, contents).map_err(|e| self.failed(e))?;

        info!(path = ?self.path, items = cart.item_count(), "Cart saved");
        Ok(())
    }

    /// Deletes the saved cart (after checkout).
    pub fn remove(&self) -> StorefrontResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.failed(e)),
        }
    }

    fn failed(&self, err: std::io::Error) -> StorefrontError {
        StorefrontError::CartStoreFailed {
            path: self.path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Shared handle to the current cart.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Writes the current cart through `store`.
    pub fn persist(&self, store: &CartStore) -> StorefrontResult<()> {
        self.with_cart(|cart| store.save(cart))
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new(Cart::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurisu_core::{CoreError, Product};

    fn figure(id: i64, price_cents: i64) -> Product {
        let mut product = Product::new(id, format!("Figure {}", id), price_cents);
        product.images = vec![format!("https://img.kurisu.shop/{}.webp", id)];
        product
    }

    #[test]
    fn test_missing_file_is_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::new(dir.path().join("cart.json"));

        assert!(store.load().unwrap().is_empty());
        assert!(store.remove().is_ok());
    }

    #[test]
    fn test_save_and_reload_keeps_frozen_prices() {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::new(dir.path().join("profile").join("cart.json"));
        let state = CartState::default();

        let mut product = figure(1, 2500);
        state
            .with_cart_mut(|cart| cart.add_item(&product, 2))
            .unwrap();
        state.persist(&store).unwrap();

        product.price_cents = 9900;
        let reloaded = CartState::new(store.load().unwrap());
        reloaded.with_cart_mut(|cart| cart.add_item(&product, 1)).unwrap();

        reloaded.with_cart(|cart| {
            assert_eq!(cart.item_count(), 1);
            assert_eq!(cart.total_quantity(), 3);
            assert_eq!(cart.subtotal().cents(), 7500);
            assert_eq!(cart.items[0].image, "https://img.kurisu.shop/1.webp");
        });

        store.remove().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::new(dir.path().join("cart.json"));
        std::fs::write(store.path(), "not json").unwrap();

        assert!(matches!(store.load(), Err(StorefrontError::Serialization(_))));
    }

    #[test]
    fn test_edited_file_with_huge_total_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::new(dir.path().join("cart.json"));
        let state = CartState::default();
        state
            .with_cart_mut(|cart| cart.add_item(&figure(1, 1000), 1))
            .unwrap();
        state.persist(&store).unwrap();

        let mut saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        saved["items"][0]["unitPriceCents"] = serde_json::json!(i64::MAX);
        saved["items"][0]["quantity"] = serde_json::json!(2);
        std::fs::write(store.path(), saved.to_string()).unwrap();

        assert!(matches!(
            store.load(),
            Err(StorefrontError::Core(CoreError::TotalTooLarge { product_id: 1 }))
        ));
    }

    #[test]
    fn test_clones_share_the_same_cart() {
        let state = CartState::default();
        let handle = state.clone();

        handle
            .with_cart_mut(|cart| cart.add_item(&figure(7, 100), 1))
            .unwrap();
        assert_eq!(state.with_cart(Cart::total_quantity), 1);

        let err = state.with_cart_mut(|cart| cart.remove_item(8)).unwrap_err();
        assert!(matches!(err, CoreError::NotInCart(8)));
    }
}
