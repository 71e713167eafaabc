//! # Command-Line Plumbing
//!
//! Argument parsing, logging setup and report rendering for the
//! `kurisu-catalog` binary, kept here so they can be tested.

use std::path::PathBuf;

use kurisu_core::FacetCategory;
use tracing_subscriber::EnvFilter;

use crate::catalog::CatalogState;
use crate::error::{StorefrontError, StorefrontResult};

pub const USAGE: &str = "usage: kurisu-catalog <catalog.json> [category=value ...]";

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info,kurisu=debug";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogArgs {
    pub fixture: PathBuf,
    pub filters: Vec<(FacetCategory, String)>,
}

/// Parses `<catalog.json> [category=value ...]` (program name excluded).
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> StorefrontResult<CatalogArgs> {
    let (fixture, rest) = args
        .split_first()
        .ok_or_else(|| StorefrontError::InvalidConfig(USAGE.to_string()))?;

    let filters = rest
        .iter()
        .map(|arg| {
            let arg = arg.as_ref();
            let (category, value) = arg.split_once('=').ok_or_else(|| {
                StorefrontError::InvalidConfig(format!("expected category=value, got {:?}", arg))
            })?;
            let value = value.trim();
            if value.is_empty() {
                return Err(StorefrontError::InvalidConfig(format!(
                    "empty value in {:?}",
                    arg
                )));
            }
            Ok((category.parse::<FacetCategory>()?, value.to_string()))
        })
        .collect::<StorefrontResult<Vec<_>>>()?;

    Ok(CatalogArgs {
        fixture: PathBuf::from(fixture.as_ref()),
        filters,
    })
}

/// Builds the log filter from a `RUST_LOG` value.
pub fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// A stderr subscriber whose verbosity is decided by `filter` alone.
pub fn subscriber(filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

/// Facets followed by the visible products.
pub fn render_report(state: &CatalogState) -> String {
    let mut lines = vec!["Facets".to_string()];
    let facets = state.facets();
    for category in FacetCategory::ALL {
        lines.push(format!(
            "  {:<14} {}",
            category.as_str(),
            facets.get(category).join(", ")
        ));
    }

    let visible = state.visible_products();
    lines.push(String::new());
    lines.push(format!(
        "Products ({} of {}, {} filters active)",
        visible.len(),
        state.snapshot().products.len(),
        state.active_filter_count()
    ));
    for product in &visible {
        lines.push(format!(
            "  #{:<5} {:<40} {}",
            product.id,
            product.name,
            product.price()
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use kurisu_core::{AnnotatedProduct, CoreError, Product, TechnicalDetail, ValidationError};
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_parse_args_collects_filters() {
        let args = parse_args(&["dump.json", "series=Naruto", "Manufacturer= Bandai "]).unwrap();

        assert_eq!(args.fixture, PathBuf::from("dump.json"));
        assert_eq!(
            args.filters,
            vec![
                (FacetCategory::Series, "Naruto".to_string()),
                (FacetCategory::Manufacturers, "Bandai".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_args_errors() {
        let none: [&str; 0] = [];
        assert!(matches!(
            parse_args(&none),
            Err(StorefrontError::InvalidConfig(msg)) if msg == USAGE
        ));
        assert!(matches!(
            parse_args(&["dump.json", "Naruto"]),
            Err(StorefrontError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_args(&["dump.json", "series= "]),
            Err(StorefrontError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_args(&["dump.json", "scale=1/7"]),
            Err(StorefrontError::Core(CoreError::Validation(
                ValidationError::NotAllowed { .. }
            )))
        ));
    }

    #[test]
    fn test_rust_log_controls_verbosity() {
        assert_eq!(
            log_filter(Some("error")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("kurisu=loud")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );

        let quiet = subscriber(log_filter(Some("error")));
        assert_eq!(
            tracing::Subscriber::max_level_hint(&quiet),
            Some(LevelFilter::ERROR)
        );
    }

    #[test]
    fn test_render_report() {
        let naruto = Product::new(1, "Naruto Uzumaki", 2999);
        let mystery = Product::new(2, "Mystery Box", 999);
        let snapshot = CatalogSnapshot {
            products: vec![naruto.clone(), mystery.clone()],
            annotated: vec![
                AnnotatedProduct::new(
                    naruto,
                    Some(TechnicalDetail::default().with_anime_series("Naruto")),
                ),
                AnnotatedProduct::new(mystery, None),
            ],
        };
        let mut state = CatalogState::new(snapshot);

        let report = render_report(&state);
        assert!(report.contains("Products (2 of 2, 0 filters active)"));
        assert!(report.contains("Naruto Uzumaki"));

        state.toggle(FacetCategory::Series, "Naruto");
        let report = render_report(&state);
        assert!(report.contains("Products (1 of 2, 1 filters active)"));
        assert!(!report.contains("Mystery Box"));
    }
}
