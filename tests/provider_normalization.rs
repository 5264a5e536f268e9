//! Behavior-driven tests for the provider aggregation route
//!
//! These tests verify HOW rows from three differently shaped providers end up
//! as one canonical row set, and how the TTL cache in front of them behaves.

use pricedash_core::{
    normalizer_for, region_for_country, CacheMode, RetryConfig, SourceErrorKind,
};
use pricedash_tests::*;
use std::time::Duration;
use time::macros::datetime;

const COMTRADE: &str = r#"{"data": [
    {"period": "202509", "reporterDesc": "Brazil", "cmdCode": "1701",
     "cmdDesc": "Cane or beet sugar", "flowCode": "X",
     "primaryValue": 12750000.0, "netWgt": 25000000.0},
    {"period": "202509", "reporterDesc": "India", "cmdCode": "1006",
     "flowCode": "X", "primaryValue": 1000.0, "netWgt": null}
]}"#;

const WORLD_BANK: &str = r#"[
    {"page": 1, "pages": 1, "per_page": 50, "total": 2},
    [
        {"indicator": {"id": "PWHEAMT", "value": "Wheat, US HRW"},
         "country": {"id": "1W", "value": "World"}, "date": "2025M09", "value": 231.4},
        {"indicator": {"id": "PWHEAMT", "value": "Wheat, US HRW"},
         "country": {"id": "1W", "value": "World"}, "date": "2025M08", "value": null}
    ]
]"#;

const FAO: &str = r#"{"series": [
    {"commodity": "Maize (white) - Wholesale", "country": "Kenya",
     "currency": "KES", "unit": "Kg",
     "observations": [{"date": "2025-08-01", "price": 41.2}, {"date": "2025-09-01", "price": 43.0}]}
]}"#;

fn client() -> RoutedHttpClient {
    RoutedHttpClient::default()
        .route("https://comtrade.test", HttpResponse::ok_json(COMTRADE))
        .route("https://worldbank.test", HttpResponse::ok_json(WORLD_BANK))
        .route("https://fao.test", HttpResponse::ok_json(FAO))
}

fn aggregator(client: Arc<RoutedHttpClient>, clock: Arc<ManualClock>) -> Aggregator {
    Aggregator::new(client, CacheStore::with_clock(Duration::from_secs(600), clock))
        .with_retry(RetryConfig::no_retry())
        .with_feed(ProviderFeed::for_provider(ProviderId::Comtrade, "https://comtrade.test"))
        .with_feed(ProviderFeed::for_provider(ProviderId::WorldBank, "https://worldbank.test"))
        .with_feed(ProviderFeed::for_provider(ProviderId::Fao, "https://fao.test"))
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(datetime!(2025-09-15 06:00 UTC)))
}

// =============================================================================
// Normalization
// =============================================================================

#[tokio::test]
async fn when_all_providers_answer_system_merges_rows_in_feed_order() {
    // Given: Three providers with their native payloads
    let aggregator = aggregator(Arc::new(client()), clock());

    // When: The aggregator fetches
    let batch = aggregator.fetch().await.expect("all feeds answer");

    // Then: Rows arrive in feed order, in canonical shape
    let products: Vec<_> = batch.records.iter().map(|r| r.product.as_str()).collect();
    assert_eq!(products, vec!["Sugar", "Wheat", "Maize (white)", "Maize (white)"]);
    assert_eq!(batch.source_chain, vec!["comtrade", "worldbank", "fao"]);

    let wheat = &batch.records[1];
    assert_eq!(wheat.region, "Global");
    assert_eq!(wheat.incoterm, "FOB");
    assert_eq!(wheat.date.to_string(), "2025-09-01");

    let maize = &batch.records[3];
    assert_eq!(maize.currency, "KES");
    assert_eq!(maize.incoterm, "EXW");
    assert_eq!(maize.region, "Africa");

    // And: Unmappable rows are reported, not silently lost
    assert_eq!(batch.warnings.len(), 2, "{:?}", batch.warnings);
    assert!(batch.warnings.iter().any(|w| w.starts_with("comtrade")));
    assert!(batch.warnings.iter().any(|w| w.starts_with("worldbank")));
}

#[tokio::test]
async fn when_normalized_rows_feed_the_pipeline_system_derives_a_regional_view() {
    // Given: Aggregated provider rows
    let batch = aggregator(Arc::new(client()), clock())
        .fetch()
        .await
        .expect("all feeds answer");

    // When: The dashboard view is derived from them
    let view = DerivedView::compute(&batch.records, &FilterState::new());

    // Then: The latest date's regions are all represented
    let regions: Vec<_> = view.regional.iter().map(|bar| bar.region.as_str()).collect();
    assert_eq!(regions, vec!["South America", "Global", "Africa"]);
    assert_eq!(view.latest_date.map(|d| d.to_string()).as_deref(), Some("2025-09-01"));
}

#[test]
fn when_provider_body_has_wrong_shape_system_reports_invalid_response() {
    for provider in ProviderId::ALL {
        let error = normalizer_for(provider)
            .normalize("\"not a payload\"")
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidResponse, "{provider}");
    }
}

#[test]
fn when_country_is_unknown_system_assigns_other_region() {
    assert_eq!(region_for_country("Brazil"), "South America");
    assert_eq!(region_for_country(" world "), "Global");
    assert_eq!(region_for_country("Narnia"), "Other");
}

// =============================================================================
// Failure isolation
// =============================================================================

#[tokio::test]
async fn when_one_provider_is_down_system_serves_the_others_with_a_warning() {
    // Given: The FAO feed answers 503
    let client = client().route("https://fao.test", HttpResponse::with_status(503, ""));
    let aggregator = aggregator(Arc::new(client), clock());

    // When: The aggregator fetches
    let batch = aggregator.fetch().await.expect("two feeds still answer");

    // Then: FAO rows are missing and the outage is a warning
    assert_eq!(batch.source_chain, vec!["comtrade", "worldbank"]);
    assert!(batch.warnings.iter().any(|w| w.contains("fao") && w.contains("503")));
}

#[tokio::test]
async fn when_every_provider_is_down_system_reports_data_unavailable() {
    let aggregator = aggregator(Arc::new(RoutedHttpClient::default()), clock());

    let error = aggregator.fetch().await.expect_err("nothing answers");

    assert_eq!(error.kind(), SourceErrorKind::Unavailable);
    assert_eq!(error.code(), "source.unavailable");
}

// =============================================================================
// Cache
// =============================================================================

#[tokio::test]
async fn when_cache_is_fresh_system_does_not_call_providers_again() {
    // Given: One completed fetch
    let client = Arc::new(client());
    let clock = clock();
    let aggregator = aggregator(client.clone(), clock.clone());
    aggregator.fetch().await.expect("first fetch");
    assert_eq!(client.calls(), 3);

    // When: The next fetch happens inside the TTL
    clock.advance(Duration::from_secs(599));
    let cached = aggregator.fetch().await.expect("cached fetch");

    // Then: The cached rows are served without network calls
    assert!(cached.cache_hit);
    assert_eq!(cached.records.len(), 4);
    assert_eq!(client.calls(), 3);

    // And: Once the TTL elapses the providers are called again
    clock.advance(Duration::from_secs(1));
    let fresh = aggregator.fetch().await.expect("refetch");
    assert!(!fresh.cache_hit);
    assert_eq!(client.calls(), 6);
}

#[tokio::test]
async fn when_refresh_mode_is_set_system_refetches_and_updates_the_cache() {
    let client = Arc::new(client());
    let clock = clock();
    let warm = aggregator(client.clone(), clock.clone());
    warm.fetch().await.expect("first fetch");

    let refreshing = Aggregator::new(client.clone(), warm.cache().clone())
        .with_mode(CacheMode::Refresh)
        .with_feed(ProviderFeed::for_provider(ProviderId::Fao, "https://fao.test"));
    let batch = refreshing.fetch().await.expect("refresh fetch");

    assert!(!batch.cache_hit);
    assert_eq!(client.calls(), 4);

    // The shared cache now holds the refreshed rows.
    let cached = warm.fetch().await.expect("cached fetch");
    assert!(cached.cache_hit);
    assert_eq!(cached.records.len(), 2);
}
