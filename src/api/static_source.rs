use chrono::NaiveDate;

use super::LatestSeriesPointFetcher;
use crate::models::{Provenance, SeriesPoint, SeriesTopic};

/// A verified figure served whenever live lookups come up empty
#[derive(Debug, Clone)]
pub struct StaticSeriesPoint {
    value: f64,
    period: NaiveDate,
    label: String,
}

impl StaticSeriesPoint {
    pub fn new(value: f64, period: NaiveDate, label: impl Into<String>) -> Self {
        Self { value, period, label: label.into() }
    }

    /// Retail spending monthly change from the January 2026 ECT release,
    /// verified 2026-02-26
    pub fn ect_january_2026() -> Self {
        Self::new(
            -1.1,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default(),
            "Stats NZ ECT (Jan 2026) - verified static fallback",
        )
    }

    pub fn point(&self) -> SeriesPoint {
        SeriesPoint {
            value: self.value,
            period: self.period,
            provenance: Provenance::StaticFallback { label: self.label.clone() },
        }
    }
}

#[async_trait::async_trait]
impl LatestSeriesPointFetcher for StaticSeriesPoint {
    fn name(&self) -> &str {
        "static fallback"
    }

    async fn fetch_point(&self, _topic: &SeriesTopic, _month: NaiveDate) -> Option<SeriesPoint> {
        Some(self.point())
    }
}
