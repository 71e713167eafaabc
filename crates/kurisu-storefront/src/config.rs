//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KURISU_BACKEND_URL=https://api.kurisu.shop                         │
//! │     KURISU_DETAIL_CONCURRENCY=16                                       │
//! │     KURISU_CART_PATH=/var/lib/kurisu/cart.json                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kurisu-storefront/storefront.toml (Linux)                │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [backend]
//! url = "https://api.kurisu.shop"
//!
//! [catalog]
//! detail_concurrency = 8
//!
//! [cart]
//! path = "/home/okabe/.local/share/kurisu-storefront/cart.json"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{StorefrontError, StorefrontResult};

const CONFIG_FILE: &str = "storefront.toml";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("shop", "kurisu", "kurisu-storefront")
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the shop API.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

fn default_backend_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: default_backend_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Maximum technical-detail requests in flight while loading the catalog.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

fn default_detail_concurrency() -> usize {
    8
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSettings {
    /// Where the shopper's cart is saved between sessions.
    #[serde(default = "default_cart_path")]
    pub path: PathBuf,
}

fn default_cart_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("cart.json"))
        .unwrap_or_else(|| PathBuf::from("cart.json"))
}

impl Default for CartSettings {
    fn default() -> Self {
        CartSettings {
            path: default_cart_path(),
        }
    }
}

// =============================================================================
// StorefrontConfig
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub cart: CartSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> StorefrontResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| StorefrontError::ConfigLoadFailed(e.to_string()))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> StorefrontResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| StorefrontError::ConfigSaveFailed("No config path available".into()))?;

        let io_err = |e: std::io::Error| StorefrontError::ConfigSaveFailed(e.to_string());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(io_err)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    pub fn validate(&self) -> StorefrontResult<()> {
        let url = &self.backend.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(StorefrontError::InvalidConfig(format!(
                "Backend URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.catalog.detail_concurrency == 0 {
            return Err(StorefrontError::InvalidConfig(
                "detail_concurrency must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("KURISU_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = url;
        }

        if let Ok(value) = std::env::var("KURISU_DETAIL_CONCURRENCY") {
            match value.parse::<usize>() {
                Ok(n) => self.catalog.detail_concurrency = n,
                Err(_) => warn!(value = %value, "Ignoring non-numeric KURISU_DETAIL_CONCURRENCY"),
            }
        }

        if let Ok(path) = std::env::var("KURISU_CART_PATH") {
            self.cart.path = PathBuf::from(path);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Backend base URL without a trailing slash.
    pub fn backend_url(&self) -> &str {
        self.backend.url.trim_end_matches('/')
    }
}
