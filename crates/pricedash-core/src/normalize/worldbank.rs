use serde::Deserialize;

use super::{build_record, leading_label, parse_period, region_for_country, Normalizer};
use crate::data_source::{NormalizedBatch, SourceError};
use crate::{PriceRecord, ProviderId};

/// World Bank monthly commodity benchmarks (`[meta, rows]` API shape).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldBankNormalizer;

#[derive(Debug, Deserialize)]
struct WorldBankResponse(serde_json::Value, Option<Vec<WorldBankRow>>);

#[derive(Debug, Deserialize)]
struct WorldBankLabel {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct WorldBankRow {
    indicator: Option<WorldBankLabel>,
    country: Option<WorldBankLabel>,
    date: Option<String>,
    value: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
}

impl Normalizer for WorldBankNormalizer {
    fn provider(&self) -> ProviderId {
        ProviderId::WorldBank
    }

    fn normalize(&self, body: &str) -> Result<NormalizedBatch, SourceError> {
        let WorldBankResponse(_meta, rows) = serde_json::from_str(body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse world bank response: {e}"))
        })?;

        let rows = rows.unwrap_or_default();
        let total = rows.len();
        let records: Vec<_> = rows.into_iter().filter_map(normalize_row).collect();

        Ok(NormalizedBatch {
            provider: Some(ProviderId::WorldBank),
            skipped: total - records.len(),
            records,
        })
    }
}

fn normalize_row(row: WorldBankRow) -> Option<PriceRecord> {
    let date = parse_period(row.date.as_deref()?)?;
    let price = row.value?;
    let indicator = row.indicator?;
    let product = leading_label(&indicator.value, &[","]);
    let country = row
        .country
        .map(|label| label.value)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| String::from("World"));

    Some(
        build_record(date, product, price)?
            .with_unit(row.unit.unwrap_or_default())
            .with_currency("USD")
            .with_incoterm("FOB")
            .with_region(region_for_country(&country))
            .with_country(country)
            .with_source(ProviderId::WorldBank.as_str()),
    )
}
