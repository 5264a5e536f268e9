//! Dashboard state: the latest record snapshot, the active filters and the
//! view derived from both.
//!
//! Every change (a refresh, a filter, the display currency) re-derives the
//! view immediately, so [`Dashboard::view`] never serves stale derivations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::cache::{Clock, SystemClock};
use crate::data_source::{RecordBatch, RecordSource, SourceError};
use crate::pipeline::DerivedView;
use crate::{FilterChoice, FilterField, FilterState, PriceRecord};

/// Whether the dashboard has data to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DataStatus {
    /// Nothing fetched yet.
    #[default]
    Empty,
    Ready {
        #[serde(with = "time::serde::rfc3339")]
        fetched_at: OffsetDateTime,
        record_count: usize,
    },
    /// The last refresh failed; the previous snapshot (if any) is still shown.
    Unavailable { message: String },
}

impl DataStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}

/// What a successful refresh brought in, minus the rows themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
    pub record_count: usize,
    pub source_chain: Vec<String>,
    pub cache_hit: bool,
    pub warnings: Vec<String>,
}

/// Owns one record source and everything derived from it.
pub struct Dashboard<S: RecordSource> {
    source: S,
    records: Arc<[PriceRecord]>,
    filters: FilterState,
    status: DataStatus,
    view: DerivedView,
    clock: Arc<dyn Clock>,
}

impl<S: RecordSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            records: Arc::from(Vec::new()),
            filters: FilterState::new(),
            status: DataStatus::Empty,
            view: DerivedView::default(),
            clock,
        }
    }

    /// Start from `filters` instead of the unfiltered state.
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        self.filters = filters;
        self.rederive();
        self
    }

    /// Fetch the full row set and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the source's [`SourceError`]. The previous snapshot stays in
    /// place and [`status`](Self::status) becomes [`DataStatus::Unavailable`].
    pub async fn refresh(&mut self) -> Result<RefreshSummary, SourceError> {
        match self.source.fetch().await {
            Ok(batch) => Ok(self.replace_snapshot(batch)),
            Err(error) => {
                log::warn!("refresh from {} failed: {error}", self.source.label());
                self.status = DataStatus::Unavailable {
                    message: error.message().to_owned(),
                };
                Err(error)
            }
        }
    }

    fn replace_snapshot(&mut self, batch: RecordBatch) -> RefreshSummary {
        let RecordBatch {
            records,
            source_chain,
            cache_hit,
            warnings,
        } = batch;

        let record_count = records.len();
        self.records = Arc::from(records);
        self.status = DataStatus::Ready {
            fetched_at: self.clock.now(),
            record_count,
        };
        self.rederive();
        log::info!(
            "refreshed {record_count} rows from {}",
            self.source.label()
        );

        RefreshSummary {
            record_count,
            source_chain,
            cache_hit,
            warnings,
        }
    }

    pub fn set_filter(&mut self, field: FilterField, choice: FilterChoice) {
        self.filters.set(field, choice);
        self.rederive();
    }

    /// Reset every selector to `Any`; the display currency is kept.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.rederive();
    }

    pub fn set_display_currency(&mut self, currency: Option<String>) {
        self.filters.display_currency = currency;
    }

    fn rederive(&mut self) {
        self.view = DerivedView::compute(&self.records, &self.filters);
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// The unfiltered snapshot; clones share storage.
    pub fn records(&self) -> Arc<[PriceRecord]> {
        Arc::clone(&self.records)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn status(&self) -> &DataStatus {
        &self.status
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Currency for display: the explicit choice, else the first filtered
    /// row's currency.
    pub fn display_currency(&self) -> &str {
        self.filters
            .display_currency
            .as_deref()
            .or_else(|| self.view.records.first().map(|record| record.currency.as_str()))
            .unwrap_or("")
    }
}
