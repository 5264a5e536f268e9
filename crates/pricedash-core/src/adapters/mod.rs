//! Record sources for rows that already have the canonical shape.

mod endpoint;
mod file;
mod memory;

pub use endpoint::EndpointSource;
pub use file::FileSource;
pub use memory::MemorySource;

use serde_json::Value;

use crate::data_source::{NormalizedBatch, RecordBatch, SourceError};
use crate::PriceRecord;

/// Decode a dashboard row set: a bare array, or one wrapped under `data` or
/// `rows`.
///
/// Rows that do not decode, or that carry a negative or non-finite price, are
/// skipped and counted. Only a body without a row array is an error.
pub fn parse_rows(body: &str) -> Result<NormalizedBatch, SourceError> {
    let payload: Value = serde_json::from_str(body).map_err(|e| {
        SourceError::invalid_response(format!("response is not a price row set: {e}"))
    })?;

    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(mut object) => {
            let wrapped = object.remove("data").or_else(|| object.remove("rows"));
            match wrapped {
                Some(Value::Array(rows)) => rows,
                _ => {
                    return Err(SourceError::invalid_response(
                        "response is not a price row set: expected a `data` or `rows` array",
                    ))
                }
            }
        }
        _ => {
            return Err(SourceError::invalid_response(
                "response is not a price row set: expected an array",
            ))
        }
    };

    let total = rows.len();
    let records: Vec<PriceRecord> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<PriceRecord>(row) {
            Ok(record) => match record.validate() {
                Ok(()) => Some(record),
                Err(error) => {
                    log::debug!("dropping {} row on {}: {error}", record.product, record.date);
                    None
                }
            },
            Err(error) => {
                log::debug!("dropping undecodable row: {error}");
                None
            }
        })
        .collect();

    Ok(NormalizedBatch {
        provider: None,
        skipped: total - records.len(),
        records,
    })
}

/// Wrap decoded rows for `source`, with a warning when any row was dropped.
pub(crate) fn into_batch(decoded: NormalizedBatch, source: String) -> RecordBatch {
    let skipped = decoded.skipped;
    let batch = RecordBatch::new(decoded.records, source.as_str());
    if skipped == 0 {
        return batch;
    }

    let warning = format!("{source}: skipped {skipped} invalid rows");
    log::warn!("{warning}");
    batch.with_warning(warning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    #[test]
    fn accepts_bare_and_wrapped_arrays() {
        let bare = r#"[{"date":"2025-09-01","product":"Sugar","price":510}]"#;
        let data = r#"{"data":[{"date":"2025-09-01","product":"Sugar","price":510}]}"#;
        let rows = r#"{"rows":[{"date":"2025-09-01","product":"Sugar","price":510}]}"#;

        for body in [bare, data, rows] {
            let parsed = parse_rows(body).expect("should decode");
            assert_eq!(parsed.records.len(), 1);
            assert_eq!(parsed.records[0].product, "Sugar");
            assert_eq!(parsed.skipped, 0);
        }
    }

    #[test]
    fn rejects_bodies_without_a_row_array() {
        for body in ["{}", "not json", r#"{"data":{"product":"Sugar"}}"#, "42"] {
            let error = parse_rows(body).expect_err("must fail");
            assert_eq!(error.kind(), SourceErrorKind::InvalidResponse, "{body}");
        }
    }

    #[test]
    fn bad_rows_are_skipped_and_good_rows_kept() {
        let parsed = parse_rows(
            r#"[
                {"date":"2025-09-01","product":"Sugar","price":510},
                {"date":"Sept 2025","product":"Corn","price":260},
                {"product":"Wheat","price":220}
            ]"#,
        )
        .expect("row array decodes");

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].product, "Sugar");
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn negative_prices_are_skipped() {
        let parsed = parse_rows(
            r#"{"rows":[
                {"date":"2025-09-01","product":"Sugar","price":-5},
                {"date":"2025-09-01","product":"Corn","price":260}
            ]}"#,
        )
        .expect("row array decodes");

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].product, "Corn");
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn skipped_rows_become_a_batch_warning() {
        let parsed = parse_rows(r#"[{"date":"2025-09-01","product":"Sugar","price":-5}]"#)
            .expect("row array decodes");
        let batch = into_batch(parsed, String::from("endpoint"));

        assert!(batch.records.is_empty());
        assert_eq!(batch.warnings, vec!["endpoint: skipped 1 invalid rows"]);
    }
}
