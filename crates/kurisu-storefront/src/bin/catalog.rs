//! # kurisu-catalog
//!
//! Prints the facets and filtered product list for a catalog dump.
//!
//! ```text
//! kurisu-catalog <catalog.json> [category=value ...]
//!
//! kurisu-catalog dump.json series=Naruto series=Bleach manufacturers=Bandai
//! ```

use std::process::ExitCode;

use kurisu_storefront::cli::{self, CatalogArgs};
use kurisu_storefront::{load_catalog, CatalogState, InMemoryCatalog, StorefrontConfig, StorefrontError};
use tracing::{error, info};
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match cli::parse_args(&args) {
        Ok(args) => run(args).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "kurisu-catalog failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Default: INFO, debug for kurisu crates. Override with `RUST_LOG`.
fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").ok();
    cli::subscriber(cli::log_filter(rust_log.as_deref())).init();
}

async fn run(args: CatalogArgs) -> Result<(), StorefrontError> {
    let config = StorefrontConfig::load_or_default(None);
    info!(path = ?args.fixture, "Reading catalog dump");

    let json = std::fs::read_to_string(&args.fixture).map_err(|e| {
        StorefrontError::SourceUnavailable(format!("{}: {}", args.fixture.display(), e))
    })?;
    let source = InMemoryCatalog::from_json(&json)?;

    let mut state = CatalogState::new(load_catalog(&source, &config).await?);
    for (category, value) in &args.filters {
        state.toggle(*category, value);
    }

    println!("{}", cli::render_report(&state));
    Ok(())
}
