//! NZ SME Resilience Index
//!
//! Combines the latest retail spending change with two business demography
//! growth rates into one heuristic score. The score is deliberately not
//! clamped to [0, 100].

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::{FetcherChain, StaticSeriesPoint, StatsNzClient};
use crate::models::{Config, Impact, ResilienceMetric, SeriesPoint, SeriesTopic, SmeReport};
use crate::output;
use crate::utils::{round_to, ReleaseCalendar};

/// Enterprise count growth, Business Demography at February 2025
pub const ENTERPRISE_GROWTH_YOY: f64 = 0.5;
/// Employee count growth, Business Demography at February 2025
pub const EMPLOYMENT_GROWTH_YOY: f64 = -2.2;

const DEMOGRAPHY_SOURCE: &str = "Stats NZ Demography (Feb 2025)";

pub const METRICS_FILE: &str = "nz_sme_resilience.csv";
pub const SCORE_FILE: &str = "nz_sme_score.txt";

/// `50 + spending*10 + enterprise*5 + employment*2`, rounded to 1 decimal
pub fn resilience_score(spending_pct: f64, enterprise_pct: f64, employment_pct: f64) -> f64 {
    let score = 50.0 + spending_pct * 10.0 + enterprise_pct * 5.0 + employment_pct * 2.0;
    round_to(score, 1)
}

/// Three-row breakdown behind the score
pub fn metric_table(spending: &SeriesPoint) -> Vec<ResilienceMetric> {
    vec![
        ResilienceMetric {
            metric: "Retail Spending Trend (Monthly)".to_string(),
            value: spending.value,
            source: spending.provenance.label().to_string(),
            impact: Impact::from_sign(spending.value),
        },
        ResilienceMetric {
            metric: "Enterprise Growth (YoY)".to_string(),
            value: ENTERPRISE_GROWTH_YOY,
            source: DEMOGRAPHY_SOURCE.to_string(),
            impact: Impact::Positive,
        },
        ResilienceMetric {
            metric: "Employment Growth (YoY)".to_string(),
            value: EMPLOYMENT_GROWTH_YOY,
            source: DEMOGRAPHY_SOURCE.to_string(),
            impact: Impact::Negative,
        },
    ]
}

/// Builds the SME resilience report from a chain of spending sources
pub struct SmeBuilder {
    chain: FetcherChain,
    topic: SeriesTopic,
    fallback: StaticSeriesPoint,
}

impl SmeBuilder {
    /// Live Stats NZ lookups followed by the verified fallback, or the
    /// fallback alone when offline
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut chain = FetcherChain::new();
        if config.offline {
            info!("📴 Offline mode, skipping Stats NZ lookups");
        } else {
            chain = chain.then(StatsNzClient::new(&config.stats_nz_base_url, config.fetch_timeout_secs)?);
        }
        Ok(Self::with_chain(chain))
    }

    /// Use `chain` for live lookups; the verified fallback always follows it
    pub fn with_chain(chain: FetcherChain) -> Self {
        debug!("🔗 {} live spending source(s) ahead of the static fallback", chain.len());
        let fallback = StaticSeriesPoint::ect_january_2026();
        Self {
            chain: chain.then(fallback.clone()),
            topic: SeriesTopic::electronic_card_transactions(),
            fallback,
        }
    }

    /// Latest retail spending change. Never fails.
    pub async fn acquire_spending_trend(&self, today: NaiveDate) -> SeriesPoint {
        let months = ReleaseCalendar::candidate_months(today);
        let point = match self.chain.resolve(&self.topic, &months).await {
            Some(point) => point,
            None => self.fallback.point(),
        };

        if point.provenance.is_fallback() {
            warn!("⚠️ No live spending figure, using {:+.1}% ({})", point.value, point.provenance.label());
        }
        point
    }

    pub async fn build(&self, as_of: NaiveDate) -> SmeReport {
        let spending = self.acquire_spending_trend(as_of).await;
        let score = resilience_score(spending.value, ENTERPRISE_GROWTH_YOY, EMPLOYMENT_GROWTH_YOY);
        info!("📊 Resilience score: {}/100", score);

        SmeReport {
            metrics: metric_table(&spending),
            resilience_score: score,
            last_updated: as_of,
        }
    }
}

/// Build the SME report and write the metric table and score file.
///
/// Both files are staged before either replaces its target, so a failed
/// run leaves the previous pair in place.
pub async fn run(config: &Config, as_of: NaiveDate) -> Result<SmeReport> {
    let report = SmeBuilder::from_config(config)?.build(as_of).await;

    let metrics = output::stage_csv(
        &config.output_dir.join(METRICS_FILE),
        &ResilienceMetric::COLUMNS,
        &report.metrics,
    )?;
    let score = output::stage_text(
        &config.output_dir.join(SCORE_FILE),
        &format!("{:.1}", report.resilience_score),
    )?;

    for file in [&metrics, &score] {
        info!("💾 Saving {}", file.target().display());
    }
    output::commit_all(vec![metrics, score])?;

    Ok(report)
}
