//! # Cart
//!
//! The shopper's cart. Pure data: persistence lives in kurisu-storefront.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Shopper Action           Method                  Cart Change           │
//! │  ──────────────           ──────                  ───────────           │
//! │                                                                         │
//! │  "Add to cart" ──────────► add_item() ──────────► push or qty += n      │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► items[i].qty = n     │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► items.remove(i)      │
//! │                                                                         │
//! │  Checkout / Empty ───────► clear() ─────────────► items.clear()        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::validate_quantity;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// An item in the shopping cart.
///
/// Name, price and cover image are frozen when the item is added so the cart
/// stays consistent if the seller edits the listing afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// Cover image at time of adding, empty when the product had none.
    #[serde(default)]
    pub image: String,
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            image: product.cover_image().unwrap_or_default().to_string(),
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    fn line_total_checked(&self) -> Option<Money> {
        self.unit_price().checked_multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product_id` (adding the same product increases quantity)
/// - Every quantity is within 1..=MAX_ITEM_QUANTITY
/// - At most MAX_CART_ITEMS distinct items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds a product or increases its quantity if already present.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if !product.is_active {
            return Err(CoreError::ProductInactive(product.id));
        }
        validate_quantity(quantity)?;

        let existing = self.position(product.id);
        let (unit_price, new_qty) = match existing {
            Some(idx) => {
                let item = &self.items[idx];
                let new_qty = item.quantity + quantity;
                if new_qty > MAX_ITEM_QUANTITY {
                    return Err(CoreError::QuantityTooLarge {
                        requested: new_qty,
                        max: MAX_ITEM_QUANTITY,
                    });
                }
                (item.unit_price(), new_qty)
            }
            None => {
                if self.items.len() >= MAX_CART_ITEMS {
                    return Err(CoreError::CartTooLarge {
                        max: MAX_CART_ITEMS,
                    });
                }
                (product.price(), quantity)
            }
        };
        self.ensure_total_fits(product.id, unit_price, new_qty)?;

        match existing {
            Some(idx) => self.items[idx].quantity = new_qty,
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        Ok(())
    }

    /// Sets the quantity of a cart line. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_item(product_id);
        }
        validate_quantity(quantity)?;

        let idx = self
            .position(product_id)
            .ok_or(CoreError::NotInCart(product_id))?;
        self.ensure_total_fits(product_id, self.items[idx].unit_price(), quantity)?;
        self.items[idx].quantity = quantity;
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: i64) -> CoreResult<()> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        if self.items.len() == initial_len {
            Err(CoreError::NotInCart(product_id))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities (the navbar badge).
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Subtotal that reports overflow instead of panicking. Use it on carts
    /// that did not go through `add_item`, e.g. one read back from disk.
    pub fn checked_subtotal(&self) -> CoreResult<Money> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            item.line_total_checked()
                .and_then(|line| acc.checked_add(line))
                .ok_or(CoreError::TotalTooLarge {
                    product_id: item.product_id,
                })
        })
    }

    fn position(&self, product_id: i64) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    /// Checks that the cart total stays representable once `product_id`'s line
    /// is `unit_price × quantity`.
    fn ensure_total_fits(&self, product_id: i64, unit_price: Money, quantity: i64) -> CoreResult<()> {
        let mut total = unit_price.checked_multiply_quantity(quantity);
        for item in self.items.iter().filter(|i| i.product_id != product_id) {
            total = total.and_then(|t| t.checked_add(item.line_total_checked()?));
        }

        match total {
            Some(_) => Ok(()),
            None => Err(CoreError::TotalTooLarge { product_id }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
