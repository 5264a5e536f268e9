//! # Pricedash Core
//!
//! Domain types, derivations and record sources for the pricedash commodity
//! price dashboard.
//!
//! ## Overview
//!
//! - **Canonical price rows** with lenient decoding of upstream JSON
//! - **Derivation pipeline** turning rows plus filters into option lists,
//!   KPIs, chart series and a regional snapshot
//! - **Record sources** for a dashboard endpoint, a file, memory, or the
//!   provider aggregator
//! - **Provider normalizers** and a TTL cache behind the aggregator
//! - **Dashboard state** owning the snapshot, filters and derived view
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Endpoint, file and in-memory record sources |
//! | [`aggregator`] | Multi-provider record source with caching |
//! | [`cache`] | TTL cache and clocks |
//! | [`config`] | Environment configuration |
//! | [`dashboard`] | Snapshot + filter state owner |
//! | [`data_source`] | Record source trait and errors |
//! | [`domain`] | Price records, dates and filters |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`format`] | Price and percent display strings |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Provider payload normalizers |
//! | [`pipeline`] | Pure derivation functions |
//! | [`retry`] | Retry and backoff policy |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pricedash_core::{Dashboard, EndpointSource, FilterChoice, FilterField};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut dashboard = Dashboard::new(EndpointSource::new("https://dash.example/api/prices"));
//!     dashboard.refresh().await?;
//!     dashboard.set_filter(FilterField::Product, FilterChoice::exact("Sugar"));
//!
//!     let kpis = &dashboard.view().kpis;
//!     println!("last {} ({:+.2}% MoM)", kpis.last, kpis.mom_change);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Watch    │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Dashboard     │────▶│ Derivation       │
//! │ (snapshot+state)│     │ Pipeline (pure)  │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Record Source   │────▶│ Aggregator       │
//! │ (endpoint/file) │     │ cache+normalizers│
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Derivations never fail. Fetches return [`SourceError`]:
//!
//! ```rust
//! use pricedash_core::{SourceError, SourceErrorKind};
//!
//! fn describe(error: &SourceError) -> &'static str {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => "data unavailable, try again later",
//!         SourceErrorKind::InvalidResponse => "upstream sent something unexpected",
//!         _ => "request could not be made",
//!     }
//! }
//! ```

pub mod adapters;
pub mod aggregator;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod format;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod retry;
pub mod source;

// Record sources
pub use adapters::{EndpointSource, FileSource, MemorySource};
pub use aggregator::{Aggregator, ProviderFeed};

// Caching
pub use cache::{CacheMode, CacheStore, Clock, ManualClock, SystemClock};

// Configuration
pub use config::DashboardConfig;

// Dashboard state
pub use dashboard::{Dashboard, DataStatus, RefreshSummary};

// Record source trait and types
pub use data_source::{NormalizedBatch, RecordBatch, RecordSource, SourceError, SourceErrorKind};

// Domain models
pub use domain::{FilterChoice, FilterField, FilterState, PriceRecord, TradeDate};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ValidationError};

// Formatting
pub use format::{format_percent, format_price};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
    StaticHttpClient,
};

// Normalizers
pub use normalize::{
    normalizer_for, region_for_country, ComtradeNormalizer, FaoNormalizer, Normalizer,
    WorldBankNormalizer,
};

// Derivations
pub use pipeline::{
    compute_kpis, extract_options, filter_and_sort, latest_regional_snapshot, pivot_by_product,
    ChartSeries, DerivedView, KpiSummary, OptionLists, RegionalBar, SeriesRow,
    DATE_PRODUCT_KEY,
};

// Retry logic
pub use retry::{Backoff, RetryConfig};

// Source identifiers
pub use source::ProviderId;
