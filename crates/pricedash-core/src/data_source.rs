//! Record source contract.
//!
//! A [`RecordSource`] answers one question: "what is the complete current
//! set of price rows?". Polling cadence belongs to the caller; caching and
//! retry belong to the source.
//!
//! | Source | Where rows come from |
//! |--------|----------------------|
//! | [`EndpointSource`](crate::adapters::EndpointSource) | dashboard REST endpoint |
//! | [`FileSource`](crate::adapters::FileSource) | local JSON file |
//! | [`MemorySource`](crate::adapters::MemorySource) | fixed in-process rows |
//! | [`Aggregator`](crate::aggregator::Aggregator) | external providers, normalized and cached |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::http_client::HttpError;
use crate::{PriceRecord, ProviderId};

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Transport failure or non-success status; worth retrying later.
    Unavailable,
    /// The upstream answered with something that is not a row set.
    InvalidResponse,
    InvalidRequest,
    Internal,
}

/// Structured error returned by record sources and provider feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    /// Map a transport error, prefixing the message with the caller's label.
    pub fn from_transport(label: &str, error: &HttpError) -> Self {
        let message = format!("{label} transport error: {}", error.message());
        if error.retryable() {
            Self::unavailable(message)
        } else {
            Self::internal(message)
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// One complete row set plus how it was obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    pub records: Vec<PriceRecord>,
    /// Labels of the sources that contributed rows, in order.
    pub source_chain: Vec<String>,
    pub cache_hit: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RecordBatch {
    pub fn new(records: Vec<PriceRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source_chain: vec![source.into()],
            cache_hit: false,
            warnings: Vec::new(),
        }
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Rows decoded from a single payload, plus how many were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedBatch {
    pub provider: Option<ProviderId>,
    pub records: Vec<PriceRecord>,
    /// Payload rows that could not be mapped onto [`PriceRecord`].
    pub skipped: usize,
}

/// Anything that can produce the current complete row set.
///
/// Implementations must be `Send + Sync`; the dashboard and the CLI share
/// them across tasks.
pub trait RecordSource: Send + Sync {
    /// Short label used in envelopes and logs.
    fn label(&self) -> String;

    /// Fetch the full current row set.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the rows cannot be obtained; callers
    /// surface this as "data unavailable".
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>>;
}

impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    fn label(&self) -> String {
        (**self).label()
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>> {
        (**self).fetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_keep_retryability() {
        let retryable = SourceError::from_transport("endpoint", &HttpError::new("timeout"));
        assert_eq!(retryable.kind(), SourceErrorKind::Unavailable);
        assert!(retryable.retryable());
        assert!(retryable.message().starts_with("endpoint transport error"));

        let fatal =
            SourceError::from_transport("endpoint", &HttpError::non_retryable("bad url"));
        assert_eq!(fatal.kind(), SourceErrorKind::Internal);
        assert!(!fatal.retryable());
    }

    #[test]
    fn display_includes_stable_code() {
        let error = SourceError::invalid_response("not json");
        assert_eq!(error.to_string(), "not json (source.invalid_response)");
    }
}
