use std::future::Future;
use std::pin::Pin;

use crate::data_source::{RecordBatch, RecordSource, SourceError};
use crate::PriceRecord;

/// Serves a fixed row set; useful for demos and offline runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<PriceRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<PriceRecord>) -> Self {
        Self { records }
    }
}

impl RecordSource for MemorySource {
    fn label(&self) -> String {
        String::from("memory")
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move { Ok(RecordBatch::new(self.records.clone(), self.label())) })
    }
}
