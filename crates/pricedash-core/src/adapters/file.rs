use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use super::{into_batch, parse_rows};
use crate::data_source::{RecordBatch, RecordSource, SourceError};

/// Reads a row set saved as JSON on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileSource {
    fn label(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<RecordBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let body = tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|error| {
                    let message = format!("cannot read {}: {error}", self.path.display());
                    if error.kind() == ErrorKind::NotFound {
                        SourceError::invalid_request(message)
                    } else {
                        SourceError::unavailable(message)
                    }
                })?;

            let decoded = parse_rows(&body)?;
            Ok(into_batch(decoded, self.label()))
        })
    }
}
