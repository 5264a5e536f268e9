//! Shared fixtures for the behavior tests.

pub use pricedash_core::{
    Aggregator, CacheStore, Dashboard, DataStatus, DerivedView, FilterChoice, FilterField,
    FilterState, HttpClient, HttpError, HttpRequest, HttpResponse, ManualClock, PriceRecord,
    ProviderFeed, ProviderId, RecordSource, TradeDate,
};
pub use std::sync::Arc;

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// A record with only date, product and price set.
pub fn record(date: &str, product: &str, price: f64) -> PriceRecord {
    PriceRecord::new(TradeDate::parse(date).expect("fixture date"), product, price)
        .expect("fixture record")
}

/// A small two-product, three-region row set spanning three months.
pub fn sample_rows() -> Vec<PriceRecord> {
    vec![
        record("2025-07-01", "Wheat", 220.0)
            .with_region("Europe")
            .with_country("France")
            .with_incoterm("FOB")
            .with_currency("USD"),
        record("2025-08-01", "Wheat", 255.0)
            .with_region("Europe")
            .with_country("France")
            .with_incoterm("FOB")
            .with_currency("USD"),
        record("2025-09-01", "Wheat", 275.0)
            .with_region("Europe")
            .with_country("France")
            .with_incoterm("FOB")
            .with_currency("USD"),
        record("2025-09-01", "Sugar", 510.0)
            .with_region("Asia")
            .with_country("India")
            .with_incoterm("CIF")
            .with_currency("USD"),
        record("2025-08-01", "Sugar", 490.0)
            .with_region("South America")
            .with_country("Brazil")
            .with_incoterm("FOB")
            .with_currency("USD"),
    ]
}

/// Transport answering by exact URL and counting every request.
#[derive(Default)]
pub struct RoutedHttpClient {
    routes: HashMap<String, HttpResponse>,
    calls: Mutex<usize>,
}

impl RoutedHttpClient {
    pub fn route(mut self, url: &str, response: HttpResponse) -> Self {
        self.routes.insert(url.to_owned(), response);
        self
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("lock")
    }
}

impl HttpClient for RoutedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        *self.calls.lock().expect("lock") += 1;
        let response = self
            .routes
            .get(&request.url)
            .cloned()
            .ok_or_else(|| HttpError::non_retryable(format!("no route for {}", request.url)));
        Box::pin(async move { response })
    }
}
