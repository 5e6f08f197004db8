#![forbid(unsafe_code)]

pub mod app_services;
pub mod assessment_service;
pub mod cache;
pub mod config;
pub mod error;
pub mod postal_lookup;

pub use assess_core::Clock;

pub use app_services::AppServices;
pub use assessment_service::{AssessmentResults, AssessmentService};
pub use cache::{CacheController, CacheSettings, Fetcher, HttpFetcher, WorkerState};
pub use config::SiteConfig;
pub use error::{
    AppServicesError, AssessmentServiceError, CacheControllerError, FetchError, PostalLookupError,
};
pub use postal_lookup::{PostalLookupConfig, PostalLookupService};
