use std::env;
use std::path::PathBuf;

use assess_core::cache::{CacheError, DEFAULT_OFFLINE_FALLBACK, Manifest, Origin};

use crate::cache::CacheSettings;
use crate::postal_lookup::{DEFAULT_POSTAL_API, PostalLookupConfig};

pub const DEFAULT_DB_URL: &str = "sqlite://assess.sqlite3";
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// Site-wide settings, read from `ASSESS_*` environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    pub db_url: String,
    pub origin: String,
    pub cache_version: String,
    pub offline_fallback: String,
    pub dataset_path: Option<PathBuf>,
    pub postal_api: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.into(),
            origin: DEFAULT_ORIGIN.into(),
            cache_version: DEFAULT_CACHE_VERSION.into(),
            offline_fallback: DEFAULT_OFFLINE_FALLBACK.into(),
            dataset_path: None,
            postal_api: DEFAULT_POSTAL_API.into(),
        }
    }
}

impl SiteConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            db_url: var("ASSESS_DB_URL").unwrap_or(defaults.db_url),
            origin: var("ASSESS_ORIGIN").unwrap_or(defaults.origin),
            cache_version: var("ASSESS_CACHE_VERSION").unwrap_or(defaults.cache_version),
            offline_fallback: var("ASSESS_OFFLINE_FALLBACK").unwrap_or(defaults.offline_fallback),
            dataset_path: var("ASSESS_DATASET").map(PathBuf::from),
            postal_api: var("ASSESS_POSTAL_API").unwrap_or(defaults.postal_api),
        }
    }

    /// Cache settings for the bundled manifest.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidOrigin` if `origin` is not an http(s) URL.
    pub fn cache_settings(&self) -> Result<CacheSettings, CacheError> {
        let origin = Origin::parse(&self.origin)?;
        Ok(
            CacheSettings::new(origin, self.cache_version.clone(), Manifest::bundled())
                .with_offline_fallback(self.offline_fallback.clone()),
        )
    }

    #[must_use]
    pub fn postal_lookup(&self) -> PostalLookupConfig {
        PostalLookupConfig {
            base_url: self.postal_api.clone(),
        }
    }
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
