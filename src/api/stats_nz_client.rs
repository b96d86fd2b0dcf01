//! Stats NZ information-release scraper
//!
//! Each monthly release lives at a predictable page URL. The page links the
//! CSV export for the series; the export's last two observations give the
//! latest monthly percentage change.

use chrono::NaiveDate;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use super::{http_client, LatestSeriesPointFetcher, SourceError};
use crate::models::{Provenance, SeriesPoint, SeriesTopic};
use crate::utils::{round_to, ReleaseCalendar};

/// Live fetcher for Stats NZ monthly releases
pub struct StatsNzClient {
    client: Client,
    base_url: String,
}

impl StatsNzClient {
    /// Create a client rooted at the information-releases index
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Release page URL, e.g. `.../electronic-card-transactions-january-2026/`
    pub fn release_url(&self, topic: &SeriesTopic, month: NaiveDate) -> String {
        format!(
            "{}/{}-{}/",
            self.base_url,
            topic.release_slug,
            ReleaseCalendar::month_slug(month)
        )
    }

    /// Fetch the release page for `month`, follow its data link and compute
    /// the latest percentage change
    pub async fn fetch_release(
        &self,
        topic: &SeriesTopic,
        month: NaiveDate,
    ) -> Result<SeriesPoint, SourceError> {
        let page_url = self.release_url(topic, month);
        debug!("🌐 GET {}", page_url);
        let html = self.get_text(&page_url).await?;

        let href = select_data_link(&html, topic)
            .ok_or_else(|| SourceError::NoDataLink { url: page_url.clone() })?;
        let data_url = Url::parse(&page_url)?.join(&href)?;
        debug!("📄 Data link: {}", data_url);

        let payload = self.get_bytes(data_url.as_str()).await?;
        let value = latest_change(&payload, &topic.value_column)?;

        Ok(SeriesPoint {
            value,
            period: month,
            provenance: Provenance::Live {
                label: format!(
                    "{} ({}) - live",
                    topic.source_label,
                    ReleaseCalendar::month_label(month)
                ),
            },
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        Ok(self.get(url).await?.text().await?)
    }

    /// Raw body, so malformed encodings reach the CSV reader instead of
    /// being replaced during decoding
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        Ok(self.get(url).await?.bytes().await?.to_vec())
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl LatestSeriesPointFetcher for StatsNzClient {
    fn name(&self) -> &str {
        "Stats NZ"
    }

    async fn fetch_point(&self, topic: &SeriesTopic, month: NaiveDate) -> Option<SeriesPoint> {
        match self.fetch_release(topic, month).await {
            Ok(point) => {
                info!("✅ {} {}: {:+.2}%", topic.source_label, ReleaseCalendar::month_label(month), point.value);
                Some(point)
            }
            Err(e) => {
                warn!("⚠️ {} {} unavailable: {}", topic.source_label, ReleaseCalendar::month_label(month), e);
                None
            }
        }
    }
}

/// Pick the CSV link for `topic` out of a release page.
///
/// Links mentioning the topic keyword win; otherwise any CSV link marked
/// with the fallback marker is taken.
pub fn select_data_link(html: &str, topic: &SeriesTopic) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").ok()?;

    let links: Vec<(String, String)> = document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            if !is_data_file(href) {
                return None;
            }
            let text = anchor.text().collect::<String>().to_lowercase();
            Some((href.to_string(), text))
        })
        .collect();

    let find = |needle: &str| {
        let needle = needle.to_lowercase();
        links
            .iter()
            .find(|(href, text)| href.to_lowercase().contains(&needle) || text.contains(&needle))
            .map(|(href, _)| href.clone())
    };

    find(&topic.keyword).or_else(|| find(&topic.fallback_marker))
}

fn is_data_file(href: &str) -> bool {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.to_lowercase().ends_with(".csv")
}

/// Percentage change between the last two values of `column`
pub fn latest_change(payload: impl AsRef<[u8]>, column: &str) -> Result<f64, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(payload.as_ref());

    let index = reader
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| SourceError::MissingColumn { column: column.to_string() })?;

    let mut cells = Vec::new();
    for record in reader.records() {
        let record = record?;
        match record.get(index) {
            Some(cell) if !cell.is_empty() => cells.push(cell.to_string()),
            _ => {}
        }
    }

    if cells.len() < 2 {
        return Err(SourceError::EmptyTable { rows: cells.len() });
    }

    let parse = |raw: &str| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| SourceError::NonNumeric { column: column.to_string(), value: raw.to_string() })
    };
    let previous = parse(&cells[cells.len() - 2])?;
    let latest = parse(&cells[cells.len() - 1])?;

    percentage_change(latest, previous).ok_or(SourceError::ZeroBaseline)
}

/// `(latest - previous) / previous * 100`, rounded to 2 decimals.
/// `None` when `previous` is zero.
pub fn percentage_change(latest: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let change = (latest - previous) / previous * 100.0;
    change.is_finite().then(|| round_to(change, 2))
}
