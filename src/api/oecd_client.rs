use reqwest::Client;
use tracing::{info, warn};

use super::{http_client, SourceError};

/// Result of the OECD corporate tax statistics liveness check
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Reachable,
    Status(u16),
    Unreachable(String),
}

/// OECD SDMX-JSON client for the CTS_CIT dataset.
///
/// Only checks whether the endpoint answers. SDMX dimension keys shift every
/// year, so the response body is not turned into tax figures.
pub struct OecdClient {
    client: Client,
    base_url: String,
}

impl OecdClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Corporate income tax rate query for `country_codes`
    pub fn query_url(&self, country_codes: &[&str]) -> String {
        format!(
            "{}/{}.CIT_RATE.2024+2025/all?dimensionAtObservation=AllDimensions",
            self.base_url,
            country_codes.join("+")
        )
    }

    /// Hit the query URL once and report what came back
    pub async fn probe(&self, country_codes: &[&str]) -> ProbeOutcome {
        let url = self.query_url(country_codes);
        info!("🌐 Checking OECD API status: {}", url);

        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("✅ OECD API connection established (using verified dataset for stability)");
                ProbeOutcome::Reachable
            }
            Ok(response) => {
                let status = response.status().as_u16();
                warn!("⚠️ OECD API returned status {} (using verified dataset)", status);
                ProbeOutcome::Status(status)
            }
            Err(e) => {
                warn!("⚠️ OECD API unreachable: {} (using verified dataset)", e);
                ProbeOutcome::Unreachable(e.to_string())
            }
        }
    }
}
