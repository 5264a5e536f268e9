use pricedash_core::Envelope;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Columns printed for row tables, in order.
const RECORD_COLUMNS: [&str; 8] = [
    "date", "product", "price", "currency", "unit", "incoterm", "region", "country",
];

/// Prints envelopes and keeps the strict-mode tally.
#[derive(Debug)]
pub struct Renderer {
    format: OutputFormat,
    pretty: bool,
    strict: bool,
    error_count: usize,
}

impl Renderer {
    pub fn new(format: OutputFormat, pretty: bool, strict: bool) -> Self {
        Self {
            format,
            pretty,
            strict,
            error_count: 0,
        }
    }

    /// Print one envelope.
    ///
    /// # Errors
    ///
    /// [`CliError::StrictModeViolation`] after printing, when strict mode is
    /// on and the envelope carries warnings or errors.
    pub fn emit(&mut self, envelope: &Envelope<Value>) -> Result<(), CliError> {
        render(envelope, self.format, self.pretty)?;
        self.error_count += envelope.errors.len();

        if self.strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
            return Err(CliError::StrictModeViolation {
                warning_count: envelope.meta.warnings.len(),
                error_count: envelope.errors.len(),
            });
        }

        Ok(())
    }

    /// Fetch errors across every emitted envelope.
    pub fn error_count(&self) -> usize {
        self.error_count
    }
}

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => println!("{}", envelope.to_json(pretty)?),
        OutputFormat::Ndjson => println!("{}", envelope.to_json(false)?),
        OutputFormat::Table => render_table(envelope)?,
    }

    Ok(())
}

fn render_table(envelope: &Envelope<Value>) -> Result<(), CliError> {
    println!("request_id  : {}", envelope.meta.request_id);
    println!("generated_at: {}", envelope.meta.generated_at);
    println!("sources     : {}", envelope.meta.source_chain.join(","));
    println!("latency_ms  : {}", envelope.meta.latency_ms);
    println!("cache_hit   : {}", envelope.meta.cache_hit);

    if !envelope.meta.warnings.is_empty() {
        println!("warnings:");
        for warning in &envelope.meta.warnings {
            println!("  - {warning}");
        }
    }

    match envelope.data.get("records").and_then(Value::as_array) {
        Some(records) => {
            for line in record_table(records) {
                println!("{line}");
            }
        }
        None => {
            println!("data:");
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                println!("  {line}");
            }
        }
    }

    if !envelope.errors.is_empty() {
        println!("errors:");
        for error in &envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }

    Ok(())
}

/// Left-aligned columns padded to the widest cell.
fn record_table(records: &[Value]) -> Vec<String> {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            RECORD_COLUMNS
                .iter()
                .map(|column| cell(record.get(*column)))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = RECORD_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    let mut lines = vec![format_row(RECORD_COLUMNS.to_vec())];
    lines.extend(
        rows.iter()
            .map(|row| format_row(row.iter().map(String::as_str).collect())),
    );
    lines
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(price) => format!("{price:.2}"),
            None => number.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricedash_core::{EnvelopeError, EnvelopeMeta};
    use serde_json::json;

    #[test]
    fn record_table_aligns_columns() {
        let lines = record_table(&[
            json!({"date": "2025-09-01", "product": "Sugar", "price": 510.0, "currency": "USD"}),
            json!({"date": "2025-09-01", "product": "Corn", "price": 260.5}),
        ]);

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date        product  price"));
        assert!(lines[1].starts_with("2025-09-01  Sugar    510.00  USD"));
        assert!(lines[2].ends_with("260.50"));
    }

    #[test]
    fn strict_mode_fails_after_printing_warnings() {
        let mut meta = EnvelopeMeta::new(vec![String::from("memory")], 0, false);
        meta.push_warning("fao: skipped 2 rows that could not be mapped");
        let envelope = Envelope::success(meta, json!({}));

        let mut renderer = Renderer::new(OutputFormat::Ndjson, false, true);
        let err = renderer.emit(&envelope).expect_err("strict must fail");
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn error_count_accumulates_across_envelopes() {
        let envelope = Envelope::with_errors(
            EnvelopeMeta::new(vec![String::from("endpoint")], 0, false),
            json!({}),
            vec![EnvelopeError::new("source.unavailable", "endpoint returned status 503")],
        );

        let mut renderer = Renderer::new(OutputFormat::Ndjson, false, false);
        renderer.emit(&envelope).expect("not strict");
        renderer.emit(&envelope).expect("not strict");
        assert_eq!(renderer.error_count(), 2);
    }
}
