use chrono::NaiveDate;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::models::{SeriesPoint, SeriesTopic};

pub mod oecd_client;
pub mod static_source;
pub mod stats_nz_client;

pub use oecd_client::{OecdClient, ProbeOutcome};
pub use static_source::StaticSeriesPoint;
pub use stats_nz_client::StatsNzClient;

/// Reasons a live lookup produced no usable figure
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("no data link found on {url}")]
    NoDataLink { url: String },

    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    #[error("table has {rows} usable rows, need at least 2")]
    EmptyTable { rows: usize },

    #[error("non-numeric value '{value}' in column '{column}'")]
    NonNumeric { column: String, value: String },

    #[error("previous value is zero, percentage change undefined")]
    ZeroBaseline,

    #[error("malformed table: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Best-effort source of the latest point of a published series
#[async_trait::async_trait]
pub trait LatestSeriesPointFetcher: Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Look up the point published for `month`. Failures yield `None`.
    async fn fetch_point(&self, topic: &SeriesTopic, month: NaiveDate) -> Option<SeriesPoint>;
}

/// Tries fetchers in order, each across every candidate month
pub struct FetcherChain {
    fetchers: Vec<Box<dyn LatestSeriesPointFetcher>>,
}

impl FetcherChain {
    pub fn new() -> Self {
        Self { fetchers: Vec::new() }
    }

    pub fn then<F>(mut self, fetcher: F) -> Self
    where
        F: LatestSeriesPointFetcher + 'static,
    {
        self.fetchers.push(Box::new(fetcher));
        self
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// First point any fetcher returns for any of `months`
    pub async fn resolve(&self, topic: &SeriesTopic, months: &[NaiveDate]) -> Option<SeriesPoint> {
        for fetcher in &self.fetchers {
            for &month in months {
                debug!("🔎 {} trying {}", fetcher.name(), month.format("%Y-%m"));
                if let Some(point) = fetcher.fetch_point(topic, month).await {
                    return Some(point);
                }
            }
        }
        None
    }
}

impl Default for FetcherChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared HTTP client with a per-request timeout
pub fn http_client(timeout_secs: u64) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("bytemind-indices/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
