//! Install / activate / fetch lifecycle of the offline cache.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;

use assess_core::cache::{
    CacheName, CachedResponse, DEFAULT_OFFLINE_FALLBACK, FetchRequest, Manifest, Origin,
    cache_key,
};
use storage::repository::CacheStorage;

use super::fetcher::Fetcher;
use crate::error::CacheControllerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed; this controller will never serve as the active one.
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub origin: Origin,
    pub version: String,
    pub manifest: Manifest,
    /// Site path served for failed document requests.
    pub offline_fallback: String,
}

impl CacheSettings {
    #[must_use]
    pub fn new(origin: Origin, version: impl Into<String>, manifest: Manifest) -> Self {
        Self {
            origin,
            version: version.into(),
            manifest,
            offline_fallback: DEFAULT_OFFLINE_FALLBACK.to_owned(),
        }
    }

    #[must_use]
    pub fn with_offline_fallback(mut self, path: impl Into<String>) -> Self {
        self.offline_fallback = path.into();
        self
    }

    #[must_use]
    pub fn bucket(&self) -> CacheName {
        CacheName::for_version(&self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub bucket: CacheName,
    pub cached: Vec<String>,
    /// `(url, reason)` for every manifest entry that could not be stored.
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    pub deleted: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Cache,
    Network,
    /// The network failed and the cached offline document was served instead.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub response: CachedResponse,
    pub source: FetchSource,
}

/// Keeps one versioned bucket of the manifest and answers requests cache-first.
pub struct CacheController {
    settings: CacheSettings,
    bucket: CacheName,
    caches: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: Mutex<WorkerState>,
}

impl CacheController {
    #[must_use]
    pub fn new(
        settings: CacheSettings,
        caches: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let bucket = settings.bucket();
        Self {
            settings,
            bucket,
            caches,
            fetcher,
            state: Mutex::new(WorkerState::Parsed),
        }
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn bucket(&self) -> &CacheName {
        &self.bucket
    }

    #[must_use]
    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    /// Precache every manifest URL into the current bucket.
    ///
    /// Entries are fetched independently; a failed entry is logged and
    /// reported but never aborts the install.
    ///
    /// # Errors
    ///
    /// Returns `CacheControllerError::InvalidState` unless the worker is
    /// `Parsed`. A manifest that does not resolve or a bucket that cannot be
    /// opened leaves the worker `Redundant` and returns the cause.
    pub async fn install(&self) -> Result<InstallReport, CacheControllerError> {
        self.transition("install", WorkerState::Parsed, WorkerState::Installing)?;
        info!(bucket = %self.bucket, urls = self.settings.manifest.len(), "installing offline cache");

        let urls = match self.settings.manifest.resolve(&self.settings.origin) {
            Ok(urls) => urls,
            Err(err) => {
                self.set_state(WorkerState::Redundant);
                return Err(err.into());
            }
        };
        if let Err(err) = self.caches.open(&self.bucket).await {
            self.set_state(WorkerState::Redundant);
            return Err(err.into());
        }

        let results = join_all(urls.into_iter().map(|url| self.precache(url))).await;

        let mut report = InstallReport {
            bucket: self.bucket.clone(),
            cached: Vec::new(),
            failed: Vec::new(),
        };
        for (url, result) in results {
            match result {
                Ok(()) => report.cached.push(url),
                Err(reason) => {
                    warn!(%url, %reason, "failed to precache");
                    report.failed.push((url, reason));
                }
            }
        }

        self.set_state(WorkerState::Installed);
        info!(
            bucket = %self.bucket,
            cached = report.cached.len(),
            failed = report.failed.len(),
            "offline cache installed"
        );
        Ok(report)
    }

    /// Delete every other bucket this application owns, leaving only the current one.
    ///
    /// # Errors
    ///
    /// Returns `CacheControllerError::InvalidState` unless the worker is
    /// `Installed`, or `CacheControllerError::Storage` if buckets cannot be
    /// listed or deleted. A storage failure returns the worker to `Installed`.
    pub async fn activate(&self) -> Result<ActivateReport, CacheControllerError> {
        self.transition("activate", WorkerState::Installed, WorkerState::Activating)?;

        match self.purge_stale().await {
            Ok(deleted) => {
                self.set_state(WorkerState::Activated);
                info!(bucket = %self.bucket, deleted = deleted.len(), "offline cache activated");
                Ok(ActivateReport { deleted })
            }
            Err(err) => {
                self.set_state(WorkerState::Installed);
                Err(err)
            }
        }
    }

    /// Answer a request: cache first, then network, then the offline document.
    ///
    /// Only GET requests consult or populate the cache, and only status 200
    /// responses are stored.
    ///
    /// # Errors
    ///
    /// Returns `CacheControllerError::Fetch` when the network fails and no
    /// fallback applies.
    pub async fn handle_fetch(
        &self,
        request: &FetchRequest,
    ) -> Result<FetchOutcome, CacheControllerError> {
        let key = request.cache_key();

        if request.is_get() {
            match self.caches.match_any(&key).await {
                Ok(Some(response)) => {
                    debug!(%key, "cache hit");
                    return Ok(FetchOutcome {
                        response,
                        source: FetchSource::Cache,
                    });
                }
                Ok(None) => debug!(%key, "cache miss"),
                Err(err) => warn!(%key, error = %err, "cache lookup failed"),
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if request.is_get() && response.is_cacheable() {
                    if let Err(err) = self.store(&key, &response).await {
                        warn!(%key, error = %err, "failed to cache response");
                    }
                }
                Ok(FetchOutcome {
                    response,
                    source: FetchSource::Network,
                })
            }
            Err(err) => {
                if request.is_document() {
                    if let Some(response) = self.offline_document().await? {
                        debug!(%key, "serving offline fallback");
                        return Ok(FetchOutcome {
                            response,
                            source: FetchSource::Fallback,
                        });
                    }
                }
                Err(err.into())
            }
        }
    }

    async fn precache(&self, url: Url) -> (String, Result<(), String>) {
        let request = FetchRequest::get(url);
        let result = self.precache_one(&request).await;
        (request.url.to_string(), result)
    }

    async fn precache_one(&self, request: &FetchRequest) -> Result<(), String> {
        let response = self
            .fetcher
            .fetch(request)
            .await
            .map_err(|err| err.to_string())?;
        if !response.is_cacheable() {
            return Err(format!("unexpected status {}", response.status));
        }
        self.caches
            .put(&self.bucket, &request.cache_key(), &response)
            .await
            .map_err(|err| err.to_string())
    }

    async fn purge_stale(&self) -> Result<Vec<String>, CacheControllerError> {
        let mut deleted = Vec::new();
        for name in self.caches.bucket_names().await? {
            let stale = CacheName::is_owned(&name) && name != self.bucket.as_str();
            if stale && self.caches.delete_bucket(&name).await? {
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    async fn store(&self, key: &str, response: &CachedResponse) -> Result<(), CacheControllerError> {
        self.caches.open(&self.bucket).await?;
        self.caches.put(&self.bucket, key, response).await?;
        Ok(())
    }

    async fn offline_document(&self) -> Result<Option<CachedResponse>, CacheControllerError> {
        let url = self.settings.origin.join(&self.settings.offline_fallback)?;
        Ok(self.caches.match_any(&cache_key(&url)).await?)
    }

    fn transition(
        &self,
        operation: &'static str,
        from: WorkerState,
        to: WorkerState,
    ) -> Result<(), CacheControllerError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state != from {
            return Err(CacheControllerError::InvalidState {
                operation,
                state: *state,
            });
        }
        *state = to;
        Ok(())
    }

    fn set_state(&self, to: WorkerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}
