//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use assess_core::cache::CacheError;
use assess_core::model::DatasetError;
use assess_core::wizard::WizardError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::cache::WorkerState;

/// Errors emitted by `AssessmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("stored results are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("stored completion time is malformed: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// Errors emitted by a `Fetcher`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("unsupported request method {0}")]
    InvalidMethod(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("network unavailable: {0}")]
    Offline(String),
}

/// Errors emitted by `CacheController`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheControllerError {
    #[error("cannot {operation} while the worker is {state}")]
    InvalidState {
        operation: &'static str,
        state: WorkerState,
    },
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors emitted by `PostalLookupService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PostalLookupError {
    #[error("{0} is not a valid postal code")]
    InvalidCode(String),
    #[error("postal lookup failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("no post office found for {0}")]
    NotFound(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("cannot read dataset {path}: {source}")]
    DatasetFile {
        path: PathBuf,
        source: std::io::Error,
    },
}
