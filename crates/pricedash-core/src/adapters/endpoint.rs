use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::{into_batch, parse_rows};
use crate::data_source::{RecordBatch, RecordSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};

/// Polls the dashboard REST endpoint that serves canonical rows.
#[derive(Clone)]
pub struct EndpointSource {
    http_client: Arc<dyn HttpClient>,
    url: String,
    timeout_ms: u64,
}

impl EndpointSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), url)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http_client,
            url: url.into(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RecordSource for EndpointSource {
    fn label(&self) -> String {
        String::from("endpoint")
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(&self.url).with_timeout_ms(self.timeout_ms);
            let response = self
                .http_client
                .execute(request)
                .await
                .map_err(|error| SourceError::from_transport("endpoint", &error))?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "endpoint returned status {}",
                    response.status
                )));
            }

            let decoded = parse_rows(&response.body)?;
            log::debug!(
                "endpoint {} returned {} rows, {} skipped",
                self.url,
                decoded.records.len(),
                decoded.skipped
            );
            Ok(into_batch(decoded, self.label()))
        })
    }
}
