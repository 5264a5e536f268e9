//! Environment configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PRICEDASH_ENDPOINT` | unset |
//! | `PRICEDASH_POLL_SECS` | `60` |
//! | `PRICEDASH_CACHE_TTL_SECS` | `600` (`0` disables the cache) |
//! | `PRICEDASH_TIMEOUT_MS` | `10000` |
//! | `PRICEDASH_COMTRADE_URL` | UN Comtrade monthly HS query |
//! | `PRICEDASH_WORLDBANK_URL` | World Bank commodity indicator query |
//! | `PRICEDASH_FAO_URL` | FAO FPMA series query |
//! | `PRICEDASH_COMTRADE_KEY` | unset |
//!
//! Empty values count as unset.

use std::sync::Arc;
use std::time::Duration;

use crate::aggregator::{Aggregator, ProviderFeed};
use crate::cache::CacheStore;
use crate::http_client::{HttpAuth, HttpClient, ReqwestHttpClient};
use crate::{ProviderId, ValidationError};

pub const ENDPOINT_VAR: &str = "PRICEDASH_ENDPOINT";
pub const POLL_SECS_VAR: &str = "PRICEDASH_POLL_SECS";
pub const CACHE_TTL_SECS_VAR: &str = "PRICEDASH_CACHE_TTL_SECS";
pub const TIMEOUT_MS_VAR: &str = "PRICEDASH_TIMEOUT_MS";
pub const COMTRADE_URL_VAR: &str = "PRICEDASH_COMTRADE_URL";
pub const WORLDBANK_URL_VAR: &str = "PRICEDASH_WORLDBANK_URL";
pub const FAO_URL_VAR: &str = "PRICEDASH_FAO_URL";
pub const COMTRADE_KEY_VAR: &str = "PRICEDASH_COMTRADE_KEY";

/// Header carrying the Comtrade subscription key.
pub const COMTRADE_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const COMTRADE_BASE: &str = "https://comtradeapi.un.org/data/v1/get/C/M/HS";
const WORLDBANK_BASE: &str = "https://api.worldbank.org/v2/country/WLD/indicator/PSUGAISA";
const FAO_BASE: &str = "https://fpma.fao.org/giews/fpmat4/api/v1/series";

/// `base?key=value&...` with every value percent-encoded.
pub fn provider_url(base: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return base.to_owned();
    }

    let query = params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}

/// Default feed URL for a provider.
pub fn default_provider_url(provider: ProviderId) -> String {
    match provider {
        ProviderId::Comtrade => provider_url(
            COMTRADE_BASE,
            &[
                ("reporterCode", "all"),
                ("cmdCode", "0901,1001,1005,1006,1201,1701"),
                ("flowCode", "X,M"),
            ],
        ),
        ProviderId::WorldBank => provider_url(
            WORLDBANK_BASE,
            &[("format", "json"), ("frequency", "M"), ("per_page", "120")],
        ),
        ProviderId::Fao => provider_url(FAO_BASE, &[("format", "json")]),
    }
}

/// Runtime settings for record sources and polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub endpoint: Option<String>,
    pub poll_interval: Duration,
    pub cache_ttl: Duration,
    pub timeout_ms: u64,
    pub comtrade_url: String,
    pub worldbank_url: String,
    pub fao_url: String,
    pub comtrade_key: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            poll_interval: Duration::from_secs(60),
            cache_ttl: Duration::from_secs(600),
            timeout_ms: 10_000,
            comtrade_url: default_provider_url(ProviderId::Comtrade),
            worldbank_url: default_provider_url(ProviderId::WorldBank),
            fao_url: default_provider_url(ProviderId::Fao),
            comtrade_key: None,
        }
    }
}

impl DashboardConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// [`ValidationError::InvalidConfig`] for non-numeric durations, a zero
    /// poll interval or a zero timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let poll_secs = parse_number(POLL_SECS_VAR, get(POLL_SECS_VAR), 60, false)?;
        let cache_ttl_secs = parse_number(CACHE_TTL_SECS_VAR, get(CACHE_TTL_SECS_VAR), 600, true)?;
        let timeout_ms = parse_number(TIMEOUT_MS_VAR, get(TIMEOUT_MS_VAR), 10_000, false)?;

        Ok(Self {
            endpoint: get(ENDPOINT_VAR),
            poll_interval: Duration::from_secs(poll_secs),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            timeout_ms,
            comtrade_url: get(COMTRADE_URL_VAR).unwrap_or(defaults.comtrade_url),
            worldbank_url: get(WORLDBANK_URL_VAR).unwrap_or(defaults.worldbank_url),
            fao_url: get(FAO_URL_VAR).unwrap_or(defaults.fao_url),
            comtrade_key: get(COMTRADE_KEY_VAR),
        })
    }

    pub fn provider_url(&self, provider: ProviderId) -> &str {
        match provider {
            ProviderId::Comtrade => &self.comtrade_url,
            ProviderId::WorldBank => &self.worldbank_url,
            ProviderId::Fao => &self.fao_url,
        }
    }

    /// Feed for `provider`; Comtrade carries the subscription key when set.
    pub fn feed(&self, provider: ProviderId) -> ProviderFeed {
        let feed = ProviderFeed::for_provider(provider, self.provider_url(provider));
        match (&self.comtrade_key, provider) {
            (Some(key), ProviderId::Comtrade) => {
                feed.with_auth(HttpAuth::header(COMTRADE_KEY_HEADER, key.as_str()))
            }
            _ => feed,
        }
    }

    /// Aggregator over every provider, backed by reqwest.
    pub fn aggregator(&self) -> Aggregator {
        self.aggregator_with_client(Arc::new(ReqwestHttpClient::new()))
    }

    pub fn aggregator_with_client(&self, http_client: Arc<dyn HttpClient>) -> Aggregator {
        let cache = if self.cache_ttl.is_zero() {
            CacheStore::disabled()
        } else {
            CacheStore::new(self.cache_ttl)
        };

        ProviderId::ALL.iter().fold(
            Aggregator::new(http_client, cache).with_timeout_ms(self.timeout_ms),
            |aggregator, provider| aggregator.with_feed(self.feed(*provider)),
        )
    }
}

fn parse_number(
    name: &'static str,
    raw: Option<String>,
    default: u64,
    allow_zero: bool,
) -> Result<u64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.parse::<u64>() {
        Ok(0) if !allow_zero => Err(ValidationError::InvalidConfig { name, value: raw }),
        Ok(value) => Ok(value),
        Err(_) => Err(ValidationError::InvalidConfig { name, value: raw }),
    }
}
