use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// Corporate tax attributes for one target country
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTaxProfile {
    pub country: String,
    pub corporate_tax_rate: f64,
    pub compliance_hours: u32,
    pub source: String,
}

/// One row of the TEFI output table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TefiRow {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Corporate Tax Rate")]
    pub corporate_tax_rate: f64,
    #[serde(rename = "Compliance Hours")]
    pub compliance_hours: u32,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Raw Friction")]
    pub raw_friction: f64,
    #[serde(rename = "TEFI Score (0-100)")]
    pub tefi_score: f64,
    #[serde(rename = "Last Updated")]
    pub last_updated: String,
}

impl TefiRow {
    /// Header row, matching the serde field names
    pub const COLUMNS: [&'static str; 7] = [
        "Country",
        "Corporate Tax Rate",
        "Compliance Hours",
        "Source",
        "Raw Friction",
        "TEFI Score (0-100)",
        "Last Updated",
    ];
}

/// Full TEFI result for one run
#[derive(Debug, Clone)]
pub struct TefiTable {
    pub rows: Vec<TefiRow>,
    pub last_updated: NaiveDate,
}

impl TefiTable {
    /// Look up a row by country name
    pub fn row(&self, country: &str) -> Option<&TefiRow> {
        self.rows.iter().find(|r| r.country == country)
    }
}

/// Qualitative effect of a metric on the resilience score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Positive,
    Negative,
}

impl Impact {
    /// Zero counts as non-negative
    pub fn from_sign(value: f64) -> Self {
        if value < 0.0 {
            Impact::Negative
        } else {
            Impact::Positive
        }
    }
}

/// One row of the SME resilience metric table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResilienceMetric {
    #[serde(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value (%)")]
    pub value: f64,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Impact on Resilience")]
    pub impact: Impact,
}

impl ResilienceMetric {
    /// Header row, matching the serde field names
    pub const COLUMNS: [&'static str; 4] = ["Metric", "Value (%)", "Source", "Impact on Resilience"];
}

/// Metric table paired with the score computed from it
#[derive(Debug, Clone)]
pub struct SmeReport {
    pub metrics: Vec<ResilienceMetric>,
    pub resilience_score: f64,
    pub last_updated: NaiveDate,
}

/// Where an observation came from
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    Live { label: String },
    StaticFallback { label: String },
}

impl Provenance {
    pub fn label(&self) -> &str {
        match self {
            Provenance::Live { label } | Provenance::StaticFallback { label } => label,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::StaticFallback { .. })
    }
}

/// A single numeric point of a published series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub value: f64,
    /// First day of the month the value describes
    pub period: NaiveDate,
    pub provenance: Provenance,
}

/// Description of the series a fetcher should look for
#[derive(Debug, Clone)]
pub struct SeriesTopic {
    /// Slug used in release page URLs, e.g. `electronic-card-transactions`
    pub release_slug: String,
    /// Preferred substring in a data link's href or text
    pub keyword: String,
    /// Secondary substring accepted when no keyword link exists
    pub fallback_marker: String,
    /// CSV column holding the numeric series
    pub value_column: String,
    /// Short label used in provenance strings
    pub source_label: String,
}

impl SeriesTopic {
    /// Stats NZ electronic card transactions release
    pub fn electronic_card_transactions() -> Self {
        Self {
            release_slug: "electronic-card-transactions".to_string(),
            keyword: "electronic-card-transactions".to_string(),
            fallback_marker: "machine-readable".to_string(),
            value_column: "Data_value".to_string(),
            source_label: "Stats NZ ECT".to_string(),
        }
    }
}

/// Configuration for the index builders
#[derive(Debug, Clone)]
pub struct Config {
    pub output_dir: PathBuf,
    pub stats_nz_base_url: String,
    pub oecd_api_base_url: String,
    pub probe_timeout_secs: u64,
    pub fetch_timeout_secs: u64,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("data"),
            stats_nz_base_url: "https://www.stats.govt.nz/information-releases".to_string(),
            oecd_api_base_url: "https://stats.oecd.org/SDMX-JSON/data/CTS_CIT".to_string(),
            probe_timeout_secs: 5,
            fetch_timeout_secs: 10,
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let defaults = Config::default();

        Ok(Config {
            output_dir: std::env::var("INDICES_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            stats_nz_base_url: std::env::var("STATS_NZ_BASE_URL")
                .unwrap_or(defaults.stats_nz_base_url),
            oecd_api_base_url: std::env::var("OECD_API_BASE_URL")
                .unwrap_or(defaults.oecd_api_base_url),
            probe_timeout_secs: parse_env("PROBE_TIMEOUT_SECS")?
                .unwrap_or(defaults.probe_timeout_secs),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.fetch_timeout_secs),
            offline: parse_env("INDICES_OFFLINE")?.unwrap_or(defaults.offline),
        })
    }
}

fn parse_env<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(None),
    }
}
