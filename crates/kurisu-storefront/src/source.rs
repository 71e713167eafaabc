//! # Catalog Sources
//!
//! Where products and their technical details come from.
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CatalogSource                                     │
//! │                                                                         │
//! │   active_products() ──────► GET /products (active only)                 │
//! │   technical_detail(id) ───► GET /products/<id>/technical-details        │
//! │                                                                         │
//! │   ┌──────────────────────┐                                              │
//! │   │ InMemoryCatalog      │  fixtures, the CLI, tests; also applies the  │
//! │   │                      │  seller rules the backend enforces           │
//! │   └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use kurisu_core::seller::{self, NewProduct, TechnicalDetailPatch, User};
use kurisu_core::validation::validate_price_cents;
use kurisu_core::{CoreError, Money, Product, TechnicalDetail, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StorefrontError, StorefrontResult};

/// Read access to the catalog backend.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Every product currently listed for sale.
    async fn active_products(&self) -> StorefrontResult<Vec<Product>>;

    /// The technical detail for one product, `None` when it has none.
    async fn technical_detail(&self, product_id: i64) -> StorefrontResult<Option<TechnicalDetail>>;
}

// =============================================================================
// Fixture Format
// =============================================================================

/// A technical detail as the backend serializes it, keyed by product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailRecord {
    pub product_id: i64,
    #[serde(flatten)]
    pub detail: TechnicalDetail,
}

/// A product as the backend serializes it.
///
/// The price is a float column, there is a single nullable image and a
/// nullable `status` that means active when missing. Fields the storefront
/// does not use (`url`, `review`, `user`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub status: Option<bool>,
}

impl TryFrom<ProductRecord> for Product {
    type Error = ValidationError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let price = Money::from_backend_float(record.price)?;
        validate_price_cents(price.cents())?;

        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        Ok(Product {
            id: record.id,
            name: record.name,
            description: record.description.unwrap_or_default(),
            price_cents: price.cents(),
            images: non_blank(record.img).into_iter().collect(),
            video: non_blank(record.video),
            owner_id: record.user_id,
            is_active: record.status.unwrap_or(true),
        })
    }
}

impl From<&Product> for ProductRecord {
    fn from(product: &Product) -> Self {
        ProductRecord {
            id: product.id,
            name: product.name.clone(),
            description: Some(product.description.clone()),
            img: product.cover_image().map(str::to_string),
            video: product.video.clone(),
            price: product.price_cents as f64 / 100.0,
            user_id: product.owner_id,
            status: Some(product.is_active),
        }
    }
}

/// A catalog dump: `{"products": [...], "technical_details": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    pub products: Vec<ProductRecord>,
    #[serde(default)]
    pub technical_details: Vec<DetailRecord>,
}

// =============================================================================
// InMemoryCatalog
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    details: HashMap<i64, TechnicalDetail>,
    unavailable: HashSet<i64>,
}

impl InMemoryCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        InMemoryCatalog {
            products,
            ..Default::default()
        }
    }

    pub fn with_detail(mut self, product_id: i64, detail: TechnicalDetail) -> Self {
        self.details.insert(product_id, detail);
        self
    }

    /// Makes detail lookups for `product_id` fail as if the backend were down.
    pub fn with_unavailable_detail(mut self, product_id: i64) -> Self {
        self.unavailable.insert(product_id);
        self
    }

    /// Builds a catalog from a backend dump. A product with an unusable
    /// price fails the whole fixture.
    pub fn from_fixture(fixture: CatalogFixture) -> StorefrontResult<Self> {
        let products = fixture
            .products
            .into_iter()
            .map(|record| {
                let id = record.id;
                Product::try_from(record).inspect_err(|e| {
                    warn!(product_id = id, error = %e, "Rejected product record");
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let details = fixture
            .technical_details
            .into_iter()
            .map(|r| (r.product_id, r.detail))
            .collect();

        Ok(InMemoryCatalog {
            products,
            details,
            unavailable: HashSet::new(),
        })
    }

    pub fn from_json(json: &str) -> StorefrontResult<Self> {
        let fixture: CatalogFixture = serde_json::from_str(json)?;
        info!(
            products = fixture.products.len(),
            details = fixture.technical_details.len(),
            "Loaded catalog fixture"
        );
        Self::from_fixture(fixture)
    }

    /// Looks up a single product as `viewer` would see it.
    ///
    /// Inactive products are reported as not found to everyone but their
    /// owner.
    pub fn product(&self, product_id: i64, viewer: Option<&User>) -> StorefrontResult<Product> {
        self.products
            .iter()
            .find(|p| p.id == product_id && seller::is_visible_to(p, viewer))
            .cloned()
            .ok_or_else(|| CoreError::ProductNotFound(product_id).into())
    }

    /// A seller's own listings, active or not.
    pub fn products_owned_by(&self, owner: &User) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.owner_id == owner.id)
            .cloned()
            .collect()
    }

    /// Publishes a validated listing and returns it with its new id.
    pub fn insert_product(&mut self, new: NewProduct) -> Product {
        let id = self.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Product {
            id,
            name: new.name,
            description: new.description,
            price_cents: new.price_cents,
            images: new.images,
            video: new.video,
            owner_id: new.owner_id,
            is_active: new.is_active,
        };
        info!(product_id = id, owner_id = product.owner_id, "Product created");
        self.products.push(product.clone());
        product
    }

    /// Activates or deactivates one of `owner`'s listings.
    pub fn set_status(&mut self, owner: &User, product_id: i64, active: bool) -> StorefrontResult<()> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;
        seller::set_status(owner, product, active)?;
        debug!(product_id, active, "Product status changed");
        Ok(())
    }

    /// Creates or partially updates the technical detail of one of `owner`'s
    /// listings.
    pub fn patch_detail(
        &mut self,
        owner: &User,
        product_id: i64,
        patch: &TechnicalDetailPatch,
    ) -> StorefrontResult<TechnicalDetail> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == product_id)
            .ok_or(CoreError::ProductNotFound(product_id))?;

        let mut detail = self.details.get(&product_id).cloned().unwrap_or_default();
        patch.apply_to(owner, product, &mut detail)?;
        self.details.insert(product_id, detail.clone());
        Ok(detail)
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn active_products(&self) -> StorefrontResult<Vec<Product>> {
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn technical_detail(&self, product_id: i64) -> StorefrontResult<Option<TechnicalDetail>> {
        if self.unavailable.contains(&product_id) {
            return Err(StorefrontError::SourceUnavailable(format!(
                "technical details for product {}",
                product_id
            )));
        }
        Ok(self.details.get(&product_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurisu_core::seller::{ProductDraft, Role};

    fn seller_user(id: i64) -> User {
        User {
            id,
            user_name: format!("seller{}", id),
            email: format!("seller{}@kurisu.shop", id),
            role: Role::Seller,
        }
    }

    fn owned(id: i64, owner: i64, active: bool) -> Product {
        let mut product = Product::new(id, format!("Figure {}", id), 1000);
        product.owner_id = owner;
        product.is_active = active;
        product
    }

    #[tokio::test]
    async fn test_active_products_hides_inactive() {
        let catalog = InMemoryCatalog::new(vec![owned(1, 5, true), owned(2, 5, false)]);

        let ids: Vec<i64> = catalog
            .active_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();

        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn test_technical_detail_lookup() {
        let catalog = InMemoryCatalog::new(vec![owned(1, 5, true), owned(2, 5, true)])
            .with_detail(1, TechnicalDetail::default().with_manufacturer("Alter"))
            .with_unavailable_detail(2);

        assert_eq!(
            catalog.technical_detail(1).await.unwrap(),
            Some(TechnicalDetail::default().with_manufacturer("Alter"))
        );
        assert_eq!(catalog.technical_detail(3).await.unwrap(), None);

        let err = catalog.technical_detail(2).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_fixture_parsing() {
        let catalog = InMemoryCatalog::from_json(
            r#"{
                "products": [
                    {"id": 1, "name": "Rem", "description": null, "img": "rem.webp",
                     "video": null, "price": 129.0, "url": null, "review": null,
                     "user_id": 5, "user": {"id": 5}, "status": null},
                    {"id": 2, "name": "Ram", "description": "Maid", "img": "",
                     "video": "", "price": 24.99, "user_id": 5, "status": false}
                ],
                "technical_details": [
                    {"id": 30, "product_id": 1, "anime_series": "Re:Zero", "character": "Rem",
                     "manufacturer": null, "collection": null}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.details[&1].anime_series.as_deref(), Some("Re:Zero"));

        let rem = &catalog.products[0];
        assert_eq!(rem.price_cents, 12900);
        assert_eq!(rem.images, vec!["rem.webp"]);
        assert_eq!(rem.owner_id, 5);
        assert!(rem.is_active);
        assert!(rem.description.is_empty());

        let ram = &catalog.products[1];
        assert_eq!(ram.price_cents, 2499);
        assert!(ram.images.is_empty());
        assert_eq!(ram.video, None);
        assert!(!ram.is_active);

        assert!(InMemoryCatalog::from_json("{").is_err());
    }

    #[test]
    fn test_fixture_rejects_unusable_prices() {
        for price in ["-1.0", "1e30", "1000000.01"] {
            let json = format!(
                r#"{{"products": [{{"id": 1, "name": "Rem", "price": {}, "user_id": 5}}]}}"#,
                price
            );
            assert!(
                matches!(
                    InMemoryCatalog::from_json(&json),
                    Err(StorefrontError::Core(CoreError::Validation(_)))
                ),
                "price {} should be rejected",
                price
            );
        }
    }

    #[test]
    fn test_product_record_from_product() {
        let mut product = owned(3, 5, false);
        product.images = vec!["cover.webp".to_string(), "back.webp".to_string()];

        let record = ProductRecord::from(&product);
        assert_eq!(record.price, 10.0);
        assert_eq!(record.img.as_deref(), Some("cover.webp"));
        assert_eq!(record.status, Some(false));

        let back = Product::try_from(record).unwrap();
        assert_eq!(back.images, vec!["cover.webp"]);
        assert_eq!(back.price_cents, product.price_cents);
        assert!(!back.is_active);
    }

    #[test]
    fn test_inactive_product_visible_only_to_owner() {
        let catalog = InMemoryCatalog::new(vec![owned(1, 5, false)]);

        assert!(catalog.product(1, Some(&seller_user(5))).is_ok());
        assert!(matches!(
            catalog.product(1, Some(&seller_user(6))),
            Err(StorefrontError::Core(CoreError::ProductNotFound(1)))
        ));
        assert!(catalog.product(1, None).is_err());
    }

    #[test]
    fn test_seller_publishes_and_manages_listing() {
        let mut catalog = InMemoryCatalog::new(vec![owned(4, 9, true)]);
        let owner = seller_user(5);

        let draft = ProductDraft {
            name: "Kurisu Makise 1/7".to_string(),
            description: "Lab coat version".to_string(),
            price: "129.00".to_string(),
            ..Default::default()
        };
        let names: Vec<String> = catalog.products.iter().map(|p| p.name.clone()).collect();
        let new = draft.validate(&owner, names.iter().map(String::as_str)).unwrap();
        let product = catalog.insert_product(new);
        assert_eq!(product.id, 5);

        catalog.set_status(&owner, 5, false).unwrap();
        assert!(catalog.set_status(&seller_user(9), 5, true).is_err());
        assert_eq!(catalog.products_owned_by(&owner).len(), 1);

        let patch = TechnicalDetailPatch {
            anime_series: Some("Steins;Gate".to_string()),
            ..Default::default()
        };
        let detail = catalog.patch_detail(&owner, 5, &patch).unwrap();
        assert_eq!(detail.anime_series.as_deref(), Some("Steins;Gate"));

        assert!(matches!(
            catalog.patch_detail(&seller_user(9), 5, &patch),
            Err(StorefrontError::Core(CoreError::PermissionDenied { .. }))
        ));
        assert!(catalog.patch_detail(&owner, 99, &patch).is_err());
    }
}
