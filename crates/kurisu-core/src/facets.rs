//! # Catalog Facets
//!
//! Derives the filter facets shown in the catalog sidebar and narrows the
//! product list to the shopper's selection.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Facet Pipeline                             │
//! │                                                                         │
//! │  products ──┐                                                           │
//! │             ├──► annotate() ──► [AnnotatedProduct] ──┬─► derive_facets()│
//! │  details ───┘                                        │      │           │
//! │                                                      │      ▼           │
//! │                                                      │   FacetSet       │
//! │                                                      │   (sidebar)      │
//! │                                                      │                  │
//! │  FacetSelection ◄── toggle_selection() ◄── checkbox  │                  │
//! │        │                                             │                  │
//! │        └────────────────────► apply_filter() ◄───────┘                  │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                              visible products                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Matching Rule
//! A product is kept when, for every category with a non-empty selection,
//! its detail value for that category is one of the selected values.
//! Categories with nothing selected do not constrain. A product with no
//! technical detail is dropped as soon as anything is selected.
//!
//! Everything here is a pure function of its arguments. Derived values are
//! recomputed by the caller whenever inputs change.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{AnnotatedProduct, Product, TechnicalDetail};

// =============================================================================
// Facet Category
// =============================================================================

/// A filterable technical-detail attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FacetCategory {
    /// Anime series (`anime_series`).
    Series,
    /// Character depicted (`character`).
    Characters,
    /// Figure maker (`manufacturer`).
    Manufacturers,
    /// Product line (`collection`).
    Collections,
}

impl FacetCategory {
    /// Every category, in sidebar order.
    pub const ALL: [FacetCategory; 4] = [
        FacetCategory::Series,
        FacetCategory::Characters,
        FacetCategory::Manufacturers,
        FacetCategory::Collections,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FacetCategory::Series => "series",
            FacetCategory::Characters => "characters",
            FacetCategory::Manufacturers => "manufacturers",
            FacetCategory::Collections => "collections",
        }
    }
}

impl fmt::Display for FacetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacetCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "series" | "anime_series" => Ok(FacetCategory::Series),
            "characters" | "character" => Ok(FacetCategory::Characters),
            "manufacturers" | "manufacturer" => Ok(FacetCategory::Manufacturers),
            "collections" | "collection" => Ok(FacetCategory::Collections),
            _ => Err(ValidationError::NotAllowed {
                field: "facet category".to_string(),
                allowed: FacetCategory::ALL
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Facet Set
// =============================================================================

/// The values available for filtering, one sorted list per category.
///
/// Lists never contain duplicates or empty strings and are sorted ascending
/// by UTF-16 code units, the order a browser's default `Array.sort` gives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FacetSet {
    pub series: Vec<String>,
    pub characters: Vec<String>,
    pub manufacturers: Vec<String>,
    pub collections: Vec<String>,
}

impl FacetSet {
    pub fn get(&self, category: FacetCategory) -> &[String] {
        match category {
            FacetCategory::Series => &self.series,
            FacetCategory::Characters => &self.characters,
            FacetCategory::Manufacturers => &self.manufacturers,
            FacetCategory::Collections => &self.collections,
        }
    }

    /// True when no product carried any usable detail.
    pub fn is_empty(&self) -> bool {
        FacetCategory::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

// =============================================================================
// Facet Selection
// =============================================================================

/// The shopper's currently checked filter values.
///
/// Order within a category is insertion order, but it carries no meaning:
/// equality compares each category as a set of values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FacetSelection {
    #[serde(default)]
    pub series: Vec<String>,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub manufacturers: Vec<String>,
    #[serde(default)]
    pub collections: Vec<String>,
}

impl FacetSelection {
    pub fn values(&self, category: FacetCategory) -> &[String] {
        match category {
            FacetCategory::Series => &self.series,
            FacetCategory::Characters => &self.characters,
            FacetCategory::Manufacturers => &self.manufacturers,
            FacetCategory::Collections => &self.collections,
        }
    }

    fn values_mut(&mut self, category: FacetCategory) -> &mut Vec<String> {
        match category {
            FacetCategory::Series => &mut self.series,
            FacetCategory::Characters => &mut self.characters,
            FacetCategory::Manufacturers => &mut self.manufacturers,
            FacetCategory::Collections => &mut self.collections,
        }
    }

    pub fn contains(&self, category: FacetCategory, value: &str) -> bool {
        self.values(category).iter().any(|v| v == value)
    }

    /// True when no category has anything selected.
    pub fn is_empty(&self) -> bool {
        FacetCategory::ALL.iter().all(|c| self.values(*c).is_empty())
    }

    /// Total number of checked values across all categories.
    pub fn active_count(&self) -> usize {
        FacetCategory::ALL.iter().map(|c| self.values(*c).len()).sum()
    }

    /// Unchecks everything.
    pub fn clear(&mut self) {
        for category in FacetCategory::ALL {
            self.values_mut(category).clear();
        }
    }

    /// Tests a product's detail against this selection.
    ///
    /// An empty selection matches everything, including products without
    /// details. Otherwise a missing detail never matches.
    pub fn matches(&self, detail: Option<&TechnicalDetail>) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(detail) = detail else {
            return false;
        };

        FacetCategory::ALL.iter().all(|&category| {
            let selected = self.values(category);
            selected.is_empty()
                || detail
                    .value(category)
                    .is_some_and(|value| selected.iter().any(|s| s == value))
        })
    }

    fn as_sets(&self) -> [BTreeSet<&str>; 4] {
        FacetCategory::ALL.map(|c| self.values(c).iter().map(String::as_str).collect())
    }
}

impl PartialEq for FacetSelection {
    fn eq(&self, other: &Self) -> bool {
        self.as_sets() == other.as_sets()
    }
}

impl Eq for FacetSelection {}

// =============================================================================
// Pipeline Operations
// =============================================================================

/// Joins products with their technical details by product id.
///
/// Output order follows `products`. Products without an entry in `details`
/// get `None`.
pub fn annotate(
    products: &[Product],
    details: &HashMap<i64, TechnicalDetail>,
) -> Vec<AnnotatedProduct> {
    products
        .iter()
        .map(|p| AnnotatedProduct::new(p.clone(), details.get(&p.id).cloned()))
        .collect()
}

/// Collects the distinct, non-empty detail values per category.
///
/// Products without a detail and empty fields are skipped.
pub fn derive_facets(annotated: &[AnnotatedProduct]) -> FacetSet {
    let mut buckets: [BTreeSet<&str>; 4] = Default::default();

    for detail in annotated.iter().filter_map(|a| a.detail.as_ref()) {
        for (bucket, category) in buckets.iter_mut().zip(FacetCategory::ALL) {
            if let Some(value) = detail.value(category).filter(|v| !v.is_empty()) {
                bucket.insert(value);
            }
        }
    }

    let [series, characters, manufacturers, collections] = buckets.map(|bucket| {
        let mut values: Vec<String> = bucket.into_iter().map(str::to_string).collect();
        values.sort_by(|a, b| utf16_order(a, b));
        values
    });

    FacetSet {
        series,
        characters,
        manufacturers,
        collections,
    }
}

/// Compares by UTF-16 code units. Differs from `str`'s byte order only for
/// characters above U+FFFF against characters in U+E000..=U+FFFF.
pub fn utf16_order(a: &str, b: &str) -> std::cmp::Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Narrows the catalog to the selection.
///
/// With nothing selected this returns `products` unchanged. Otherwise the
/// result is drawn from `annotated`, in `annotated` order.
pub fn apply_filter(
    products: &[Product],
    annotated: &[AnnotatedProduct],
    selection: &FacetSelection,
) -> Vec<Product> {
    if selection.is_empty() {
        return products.to_vec();
    }

    annotated
        .iter()
        .filter(|a| selection.matches(a.detail.as_ref()))
        .map(|a| a.product.clone())
        .collect()
}

/// Checks or unchecks `value` in `category`, returning the new selection.
///
/// A present value is removed; an absent one is appended. The input is left
/// untouched.
pub fn toggle_selection(
    selection: &FacetSelection,
    category: FacetCategory,
    value: &str,
) -> FacetSelection {
    let mut next = selection.clone();
    let values = next.values_mut(category);

    if values.iter().any(|v| v == value) {
        values.retain(|v| v != value);
    } else {
        values.push(value.to_string());
    }

    next
}

// =============================================================================
// Unit Tests
// =============================================================================
