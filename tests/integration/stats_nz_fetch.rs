//! Live spending-trend acquisition against a mocked Stats NZ site

use test_log::test;
use pretty_assertions::assert_eq;
use assert_matches::assert_matches;
use chrono::NaiveDate;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bytemind_indices::api::{FetcherChain, SourceError, StatsNzClient};
use bytemind_indices::indices::SmeBuilder;
use bytemind_indices::models::{Provenance, SeriesTopic};
use crate::common::fixtures::{ect_csv, release_page, release_page_without_data};
use crate::common::logging::{log_test_data, log_test_step};
use crate::common::UNREACHABLE_BASE_URL;

const SEP_PAGE: &str = "/information-releases/electronic-card-transactions-september-2026/";
const AUG_PAGE: &str = "/information-releases/electronic-card-transactions-august-2026/";
const SEP_CSV: &str = "/assets/electronic-card-transactions-september-2026-csv.csv";
const AUG_CSV: &str = "/assets/electronic-card-transactions-august-2026-csv.csv";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

async fn mount(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn builder_for(server: &MockServer) -> SmeBuilder {
    let base = format!("{}/information-releases", server.uri());
    let client = StatsNzClient::new(&base, 2).unwrap();
    SmeBuilder::with_chain(FetcherChain::new().then(client))
}

#[test(tokio::test)]
async fn test_latest_month_is_used_when_published() {
    log_test_step("Previous month release available");
    let server = MockServer::start().await;
    mount(&server, SEP_PAGE, release_page(SEP_CSV)).await;
    mount(&server, SEP_CSV, ect_csv(&["98.5", "100.0", "102.0"])).await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;
    log_test_data("Spending point", &point);

    assert_eq!(point.value, 2.0);
    assert_eq!(point.period, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    assert_eq!(point.provenance, Provenance::Live { label: "Stats NZ ECT (Sep 2026) - live".to_string() });
}

#[test(tokio::test)]
async fn test_publication_lag_falls_back_one_month() {
    log_test_step("Previous month not yet published");
    let server = MockServer::start().await;
    mount(&server, AUG_PAGE, release_page(AUG_CSV)).await;
    mount(&server, AUG_CSV, ect_csv(&["200.0", "197.8"])).await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;

    assert_eq!(point.value, -1.1);
    assert_eq!(point.period, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
    assert!(!point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_relative_and_absolute_links_resolve() {
    let server = MockServer::start().await;
    let absolute = format!("{}{}", server.uri(), SEP_CSV);
    mount(&server, SEP_PAGE, release_page(&absolute)).await;
    mount(&server, SEP_CSV, ect_csv(&["50", "55"])).await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;
    assert_eq!(point.value, 10.0);
}

#[test(tokio::test)]
async fn test_both_months_missing_uses_static_fallback() {
    log_test_step("Both release pages return 404");
    let server = MockServer::start().await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;

    assert_eq!(point.value, -1.1);
    assert!(point.provenance.is_fallback());
    assert!(point.provenance.label().contains("verified static fallback"));
}

#[test(tokio::test)]
async fn test_unreachable_host_uses_static_fallback() {
    let client = StatsNzClient::new(UNREACHABLE_BASE_URL, 2).unwrap();
    let builder = SmeBuilder::with_chain(FetcherChain::new().then(client));

    let point = builder.acquire_spending_trend(run_date()).await;

    assert_eq!(point.value, -1.1);
    assert!(point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_page_without_data_link_uses_static_fallback() {
    let server = MockServer::start().await;
    mount(&server, SEP_PAGE, release_page_without_data()).await;
    mount(&server, AUG_PAGE, release_page_without_data()).await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;
    assert!(point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_bad_tables_degrade_to_next_candidate() {
    log_test_step("Non-numeric September table, zero-baseline August table");
    let server = MockServer::start().await;
    mount(&server, SEP_PAGE, release_page(SEP_CSV)).await;
    mount(&server, SEP_CSV, ect_csv(&["101.2", "S"])).await;
    mount(&server, AUG_PAGE, release_page(AUG_CSV)).await;
    mount(&server, AUG_CSV, ect_csv(&["0", "14.0"])).await;

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;
    assert_eq!(point.value, -1.1);
    assert!(point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_slow_upstream_times_out_to_static_fallback() {
    log_test_step("Release pages respond after the client timeout");
    let server = MockServer::start().await;
    for page in [SEP_PAGE, AUG_PAGE] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(release_page(SEP_CSV))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
    }

    let base = format!("{}/information-releases", server.uri());
    let client = StatsNzClient::new(&base, 1).unwrap();
    let builder = SmeBuilder::with_chain(FetcherChain::new().then(client));

    let point = builder.acquire_spending_trend(run_date()).await;

    assert_eq!(point.value, -1.1);
    assert!(point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_undecodable_table_uses_static_fallback() {
    let server = MockServer::start().await;
    mount(&server, SEP_PAGE, release_page(SEP_CSV)).await;
    Mock::given(method("GET"))
        .and(path(SEP_CSV))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"Period,Data_value\n2026.08,100.0\n2026.09,\xff\xfe\n".to_vec()))
        .mount(&server)
        .await;

    let base = format!("{}/information-releases", server.uri());
    let client = StatsNzClient::new(&base, 2).unwrap();
    let sep = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    assert_matches!(
        client.fetch_release(&SeriesTopic::electronic_card_transactions(), sep).await,
        Err(SourceError::Csv(_))
    );

    let point = builder_for(&server).acquire_spending_trend(run_date()).await;
    assert_eq!(point.value, -1.1);
    assert!(point.provenance.is_fallback());
}

#[test(tokio::test)]
async fn test_fetch_release_reports_failure_reason() {
    let server = MockServer::start().await;
    mount(&server, SEP_PAGE, release_page_without_data()).await;
    mount(&server, AUG_PAGE, release_page(AUG_CSV)).await;
    mount(&server, AUG_CSV, "".to_string()).await;

    let base = format!("{}/information-releases", server.uri());
    let client = StatsNzClient::new(&base, 2).unwrap();
    let topic = SeriesTopic::electronic_card_transactions();

    let sep = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
    let aug = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
    let jul = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

    assert_matches!(client.fetch_release(&topic, sep).await, Err(SourceError::NoDataLink { .. }));
    assert_matches!(client.fetch_release(&topic, aug).await, Err(SourceError::MissingColumn { .. }));
    assert_matches!(client.fetch_release(&topic, jul).await, Err(SourceError::Status { status: 404, .. }));
}
