use std::path::Path;
use std::sync::Arc;

use assess_core::model::AssessmentDataset;
use storage::repository::Storage;

use crate::Clock;
use crate::assessment_service::AssessmentService;
use crate::cache::{CacheController, Fetcher, HttpFetcher};
use crate::config::SiteConfig;
use crate::error::AppServicesError;
use crate::postal_lookup::PostalLookupService;

/// Assembles app-facing services from a `SiteConfig`.
#[derive(Clone)]
pub struct AppServices {
    assessment: Arc<AssessmentService>,
    cache_controller: Arc<CacheController>,
    postal_lookup: Arc<PostalLookupService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization, dataset loading
    /// or cache configuration fails.
    pub async fn new_sqlite(config: &SiteConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(&config.db_url).await?;
        Self::from_storage(config, clock, storage, Arc::new(HttpFetcher::new()))
    }

    /// Build services over an existing storage handle.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the dataset or cache settings are invalid.
    pub fn from_storage(
        config: &SiteConfig,
        clock: Clock,
        storage: Storage,
        fetcher: Arc<dyn Fetcher>,
    ) -> Result<Self, AppServicesError> {
        let dataset = Arc::new(load_dataset(config.dataset_path.as_deref())?);
        let assessment = Arc::new(AssessmentService::new(
            clock,
            dataset,
            Arc::clone(&storage.local),
        ));
        let cache_controller = Arc::new(CacheController::new(
            config.cache_settings()?,
            Arc::clone(&storage.caches),
            fetcher,
        ));
        let postal_lookup = Arc::new(PostalLookupService::new(config.postal_lookup()));

        Ok(Self {
            assessment,
            cache_controller,
            postal_lookup,
        })
    }

    #[must_use]
    pub fn assessment(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessment)
    }

    #[must_use]
    pub fn cache_controller(&self) -> Arc<CacheController> {
        Arc::clone(&self.cache_controller)
    }

    #[must_use]
    pub fn postal_lookup(&self) -> Arc<PostalLookupService> {
        Arc::clone(&self.postal_lookup)
    }
}

fn load_dataset(path: Option<&Path>) -> Result<AssessmentDataset, AppServicesError> {
    let Some(path) = path else {
        return Ok(AssessmentDataset::bundled()?);
    };
    let raw = std::fs::read_to_string(path).map_err(|source| AppServicesError::DatasetFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(AssessmentDataset::from_json(&raw)?)
}
