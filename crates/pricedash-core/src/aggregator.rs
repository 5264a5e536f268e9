//! Provider aggregation behind a TTL cache.
//!
//! The aggregator fetches every configured [`ProviderFeed`], normalizes each
//! payload, concatenates the rows in feed order and caches the result. One
//! failing provider only produces a warning; the fetch fails when all of
//! them do.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheMode, CacheStore};
use crate::data_source::{NormalizedBatch, RecordBatch, RecordSource, SourceError};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::normalize::{normalizer_for, Normalizer};
use crate::retry::RetryConfig;
use crate::ProviderId;

/// Cache key of the combined provider rows.
pub const CACHE_KEY: &str = "provider_rows";

/// Default lifetime of the combined rows.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

/// One provider endpoint plus the normalizer for its payload.
#[derive(Clone)]
pub struct ProviderFeed {
    normalizer: Arc<dyn Normalizer>,
    url: String,
    auth: HttpAuth,
}

impl ProviderFeed {
    pub fn new(normalizer: Arc<dyn Normalizer>, url: impl Into<String>) -> Self {
        Self {
            normalizer,
            url: url.into(),
            auth: HttpAuth::None,
        }
    }

    pub fn for_provider(provider: ProviderId, url: impl Into<String>) -> Self {
        Self::new(normalizer_for(provider), url)
    }

    pub fn with_auth(mut self, auth: HttpAuth) -> Self {
        self.auth = auth;
        self
    }

    pub fn provider(&self) -> ProviderId {
        self.normalizer.provider()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Record source that merges every provider feed into one row set.
pub struct Aggregator {
    feeds: Vec<ProviderFeed>,
    http_client: Arc<dyn HttpClient>,
    cache: CacheStore<RecordBatch>,
    mode: CacheMode,
    retry: RetryConfig,
    timeout_ms: u64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(
            Arc::new(ReqwestHttpClient::new()),
            CacheStore::new(DEFAULT_CACHE_TTL),
        )
    }
}

impl Aggregator {
    pub fn new(http_client: Arc<dyn HttpClient>, cache: CacheStore<RecordBatch>) -> Self {
        Self {
            feeds: Vec::new(),
            http_client,
            cache,
            mode: CacheMode::Use,
            retry: RetryConfig::default(),
            timeout_ms: 10_000,
        }
    }

    pub fn with_feed(mut self, feed: ProviderFeed) -> Self {
        self.feeds.push(feed);
        self
    }

    pub fn with_mode(mut self, mode: CacheMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn feeds(&self) -> &[ProviderFeed] {
        &self.feeds
    }

    pub fn cache(&self) -> &CacheStore<RecordBatch> {
        &self.cache
    }

    async fn fetch_feed(&self, feed: &ProviderFeed) -> Result<NormalizedBatch, SourceError> {
        let provider = feed.provider();
        let mut attempt = 0;

        loop {
            let request = HttpRequest::get(&feed.url)
                .with_auth(&feed.auth)
                .with_timeout_ms(self.timeout_ms);

            let (retryable, error) = match self.http_client.execute(request).await {
                Ok(response) if response.is_success() => {
                    return feed.normalizer.normalize(&response.body);
                }
                Ok(response) => (
                    self.retry.should_retry_status(response.status),
                    SourceError::unavailable(format!(
                        "{provider} returned status {}",
                        response.status
                    )),
                ),
                Err(error) => (
                    error.retryable(),
                    SourceError::from_transport(provider.as_str(), &error),
                ),
            };

            if !retryable || attempt >= self.retry.max_retries {
                return Err(error);
            }

            let delay = self.retry.delay_for_attempt(attempt);
            log::warn!("{provider} fetch failed ({error}); retry {} in {delay:?}", attempt + 1);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn collect(&self) -> Result<RecordBatch, SourceError> {
        if self.feeds.is_empty() {
            return Err(SourceError::invalid_request(
                "no provider feeds are configured",
            ));
        }

        let mut batch = RecordBatch::default();
        let mut failures = Vec::new();

        for feed in &self.feeds {
            let provider = feed.provider();
            match self.fetch_feed(feed).await {
                Ok(normalized) => {
                    log::debug!(
                        "{provider}: {} rows normalized, {} skipped",
                        normalized.records.len(),
                        normalized.skipped
                    );
                    if normalized.skipped > 0 {
                        batch.warnings.push(format!(
                            "{provider}: skipped {} rows that could not be mapped",
                            normalized.skipped
                        ));
                    }
                    batch.records.extend(normalized.records);
                    batch.source_chain.push(provider.as_str().to_owned());
                }
                Err(error) => {
                    log::warn!("{provider} feed failed: {error}");
                    batch.warnings.push(format!("{provider}: {error}"));
                    failures.push(format!("{provider}: {}", error.message()));
                }
            }
        }

        if failures.len() == self.feeds.len() {
            return Err(SourceError::unavailable(format!(
                "all provider feeds failed: {}",
                failures.join("; ")
            )));
        }

        Ok(batch)
    }
}

impl RecordSource for Aggregator {
    fn label(&self) -> String {
        String::from("providers")
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.mode == CacheMode::Use {
                if let Some(cached) = self.cache.get(CACHE_KEY).await {
                    log::debug!("serving {} provider rows from cache", cached.records.len());
                    return Ok(RecordBatch {
                        warnings: Vec::new(),
                        ..cached.with_cache_hit(true)
                    });
                }
            }

            let batch = self.collect().await?;
            if self.mode != CacheMode::Bypass {
                self.cache.put(CACHE_KEY, batch.clone(), None).await;
            }
            log::info!(
                "aggregated {} rows from {}",
                batch.records.len(),
                batch.source_chain.join(",")
            );
            Ok(batch)
        })
    }
}
