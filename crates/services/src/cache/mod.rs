mod controller;
mod fetcher;

pub use controller::{
    ActivateReport, CacheController, CacheSettings, FetchOutcome, FetchSource, InstallReport,
    WorkerState,
};
pub use fetcher::{Fetcher, HttpFetcher};
