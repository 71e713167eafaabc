//! # Catalog Loading and Filter State
//!
//! ## Loading
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        load_catalog()                                   │
//! │                                                                         │
//! │  active_products() ──► [p1, p2, p3, ...]                               │
//! │                           │                                             │
//! │                           ▼  (at most detail_concurrency in flight)     │
//! │        technical_detail(p1)  technical_detail(p2)  technical_detail(p3) │
//! │              │ Ok(Some)            │ Err ──► warn!, None    │ Ok(None)  │
//! │              ▼                     ▼                        ▼           │
//! │        [AnnotatedProduct, ...] in product order                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed detail fetch never fails the load: the product simply has no
//! details and drops out as soon as a filter is active.

use futures_util::stream::{self, StreamExt};
use kurisu_core::facets::{self, FacetCategory, FacetSelection, FacetSet};
use kurisu_core::{AnnotatedProduct, Product};
use tracing::{debug, info, warn};

use crate::config::StorefrontConfig;
use crate::error::StorefrontResult;
use crate::source::CatalogSource;

/// Products plus their annotations, as fetched once at page load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub annotated: Vec<AnnotatedProduct>,
}

/// Fetches the active catalog and every product's technical detail.
pub async fn load_catalog<S>(source: &S, config: &StorefrontConfig) -> StorefrontResult<CatalogSnapshot>
where
    S: CatalogSource + ?Sized,
{
    let products = source.active_products().await?;
    let concurrency = config.catalog.detail_concurrency.max(1);
    debug!(products = products.len(), concurrency, "Fetching technical details");

    let details: Vec<_> = stream::iter(products.iter())
        .map(move |product| async move {
            match source.technical_detail(product.id).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(product_id = product.id, error = %e, "Technical details unavailable");
                    None
                }
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    let annotated: Vec<AnnotatedProduct> = products
        .iter()
        .cloned()
        .zip(details)
        .map(|(product, detail)| AnnotatedProduct::new(product, detail))
        .collect();

    info!(
        products = products.len(),
        with_details = annotated.iter().filter(|a| a.detail.is_some()).count(),
        "Catalog loaded"
    );

    Ok(CatalogSnapshot { products, annotated })
}

/// The catalog page: a loaded snapshot plus the shopper's checked filters.
///
/// Facets and the visible list are recomputed from scratch on every call.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    snapshot: CatalogSnapshot,
    selection: FacetSelection,
}

impl CatalogState {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        CatalogState {
            snapshot,
            selection: FacetSelection::default(),
        }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    /// Replaces the snapshot after a reload. The selection is kept.
    pub fn replace_snapshot(&mut self, snapshot: CatalogSnapshot) {
        self.snapshot = snapshot;
    }

    pub fn facets(&self) -> FacetSet {
        facets::derive_facets(&self.snapshot.annotated)
    }

    pub fn visible_products(&self) -> Vec<Product> {
        facets::apply_filter(
            &self.snapshot.products,
            &self.snapshot.annotated,
            &self.selection,
        )
    }

    /// Checks or unchecks one filter value.
    pub fn toggle(&mut self, category: FacetCategory, value: &str) {
        self.selection = facets::toggle_selection(&self.selection, category, value);
        debug!(%category, value, active = self.selection.active_count(), "Filter toggled");
    }

    pub fn clear_filters(&mut self) {
        self.selection.clear();
    }

    /// Number of checked filter values (the "Clear (n)" badge).
    pub fn active_filter_count(&self) -> usize {
        self.selection.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryCatalog;
    use kurisu_core::TechnicalDetail;

    fn catalog() -> InMemoryCatalog {
        let mut inactive = Product::new(4, "Hidden", 100);
        inactive.is_active = false;

        InMemoryCatalog::new(vec![
            Product::new(1, "Naruto Uzumaki", 2999),
            Product::new(2, "Ichigo Kurosaki", 3499),
            Product::new(3, "Mystery Box", 999),
            inactive,
            Product::new(5, "Sasuke Uchiha", 2999),
        ])
        .with_detail(
            1,
            TechnicalDetail::default()
                .with_anime_series("Naruto")
                .with_manufacturer("Bandai"),
        )
        .with_detail(
            2,
            TechnicalDetail::default()
                .with_anime_series("Bleach")
                .with_manufacturer("Good Smile"),
        )
        .with_detail(4, TechnicalDetail::default().with_anime_series("Secret"))
        .with_detail(5, TechnicalDetail::default().with_anime_series("Naruto"))
        .with_unavailable_detail(5)
    }

    #[tokio::test]
    async fn test_load_catalog_annotates_in_product_order() {
        let snapshot = load_catalog(&catalog(), &StorefrontConfig::default())
            .await
            .unwrap();

        let ids: Vec<i64> = snapshot.annotated.iter().map(|a| a.product.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 5]);
        assert_eq!(snapshot.products.len(), 4);

        // 3 has no detail, 5 failed to load
        assert!(snapshot.annotated[2].detail.is_none());
        assert!(snapshot.annotated[3].detail.is_none());
    }

    #[tokio::test]
    async fn test_load_catalog_with_single_request_in_flight() {
        let mut config = StorefrontConfig::default();
        config.catalog.detail_concurrency = 1;

        let sequential = load_catalog(&catalog(), &config).await.unwrap();
        let parallel = load_catalog(&catalog(), &StorefrontConfig::default())
            .await
            .unwrap();

        assert_eq!(sequential, parallel);
    }

    #[tokio::test]
    async fn test_catalog_state_filtering() {
        let snapshot = load_catalog(&catalog(), &StorefrontConfig::default())
            .await
            .unwrap();
        let mut state = CatalogState::new(snapshot);

        let facets = state.facets();
        assert_eq!(facets.series, vec!["Bleach", "Naruto"]);
        assert_eq!(facets.manufacturers, vec!["Bandai", "Good Smile"]);
        assert_eq!(state.visible_products().len(), 4);

        state.toggle(FacetCategory::Series, "Naruto");
        state.toggle(FacetCategory::Series, "Bleach");
        assert_eq!(state.active_filter_count(), 2);
        let ids: Vec<i64> = state.visible_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);

        state.toggle(FacetCategory::Manufacturers, "Bandai");
        let ids: Vec<i64> = state.visible_products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        state.clear_filters();
        assert_eq!(state.active_filter_count(), 0);
        assert_eq!(state.visible_products(), state.snapshot().products);
    }

    #[tokio::test]
    async fn test_reload_keeps_selection() {
        let mut state = CatalogState::default();
        state.toggle(FacetCategory::Collections, "figma");
        assert!(state.visible_products().is_empty());

        let snapshot = load_catalog(&catalog(), &StorefrontConfig::default())
            .await
            .unwrap();
        state.replace_snapshot(snapshot);

        assert_eq!(state.active_filter_count(), 1);
        assert!(state.visible_products().is_empty());
    }
}
