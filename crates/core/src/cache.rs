//! Domain types for the offline cache: bucket names, the precache manifest,
//! intercepted requests and stored responses.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Prefix shared by every bucket this application owns.
pub const CACHE_PREFIX: &str = "assess-cache-";

/// Path served when a document request fails with nothing cached.
pub const DEFAULT_OFFLINE_FALLBACK: &str = "/";

const BUNDLED_MANIFEST: &str = include_str!("../resources/precache.txt");

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CacheError {
    #[error("invalid origin {origin}: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("cannot resolve {path} against the origin: {reason}")]
    InvalidPath { path: String, reason: String },
}

//
// ─── BUCKET NAMES ──────────────────────────────────────────────────────────────
//

/// Versioned bucket name: `CACHE_PREFIX` followed by the deploy version tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheName(String);

impl CacheName {
    #[must_use]
    pub fn for_version(version: &str) -> Self {
        Self(format!("{CACHE_PREFIX}{version}"))
    }

    /// A bucket name exactly as found in storage, whatever its owner.
    #[must_use]
    pub fn from_raw(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for buckets created by any version of this application.
    #[must_use]
    pub fn is_owned(name: &str) -> bool {
        name.starts_with(CACHE_PREFIX)
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── ORIGIN + MANIFEST ─────────────────────────────────────────────────────────
//

/// Site origin that manifest paths and fallbacks are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(Url);

impl Origin {
    /// # Errors
    ///
    /// Returns `CacheError::InvalidOrigin` for anything that is not an
    /// absolute http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, CacheError> {
        let invalid = |reason: String| CacheError::InvalidOrigin {
            origin: raw.to_owned(),
            reason,
        };
        let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("missing host".to_owned()));
        }
        Ok(Self(url))
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Resolve a site-relative path.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidPath` if the joined URL cannot be built.
    pub fn join(&self, path: &str) -> Result<Url, CacheError> {
        self.0.join(path).map_err(|e| CacheError::InvalidPath {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Whether `url` belongs to this origin.
    #[must_use]
    pub fn owns(&self, url: &Url) -> bool {
        url.origin() == self.0.origin()
    }
}

/// The static list of paths guaranteed to be attempted at install time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    paths: Vec<String>,
}

impl Manifest {
    /// One path per line; blank lines and `#` comments are skipped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let paths = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect();
        Self { paths }
    }

    #[must_use]
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_MANIFEST)
    }

    #[must_use]
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resolve every path against `origin`, in manifest order.
    ///
    /// # Errors
    ///
    /// Returns the first path that cannot be resolved.
    pub fn resolve(&self, origin: &Origin) -> Result<Vec<Url>, CacheError> {
        self.paths.iter().map(|path| origin.join(path)).collect()
    }
}

//
// ─── REQUESTS + RESPONSES ──────────────────────────────────────────────────────
//

/// What the page intends to do with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destination {
    /// A navigation that renders an HTML page.
    Document,
    Asset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: String,
    pub url: Url,
    pub destination: Destination,
}

impl FetchRequest {
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_owned(),
            url,
            destination: Destination::Asset,
        }
    }

    #[must_use]
    pub fn document(url: Url) -> Self {
        Self {
            destination: Destination::Document,
            ..Self::get(url)
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    #[must_use]
    pub fn is_document(&self) -> bool {
        self.destination == Destination::Document
    }

    /// Key a bucket stores this request under. Fragments never reach the network.
    #[must_use]
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

#[must_use]
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    #[must_use]
    pub fn new(status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Only plain 200 responses are written to a bucket.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }
}
