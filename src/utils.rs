use chrono::{Datelike, Months, NaiveDate};

/// Release calendar helpers for monthly statistical publications
pub struct ReleaseCalendar;

impl ReleaseCalendar {
    /// Months to try for a monthly release, newest first.
    ///
    /// Releases lag by one to two months, so the previous calendar month is
    /// tried first and the month before that second. Each entry is the first
    /// day of its month.
    pub fn candidate_months(today: NaiveDate) -> Vec<NaiveDate> {
        let Some(month_start) = today.with_day(1) else {
            return Vec::new();
        };

        (1..=2)
            .filter_map(|back| month_start.checked_sub_months(Months::new(back)))
            .collect()
    }

    /// `january-2026` style slug used in release page URLs
    pub fn month_slug(month: NaiveDate) -> String {
        format!("{}-{}", month.format("%B").to_string().to_lowercase(), month.year())
    }

    /// `Jan 2026` style label used in provenance strings
    pub fn month_label(month: NaiveDate) -> String {
        month.format("%b %Y").to_string()
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
