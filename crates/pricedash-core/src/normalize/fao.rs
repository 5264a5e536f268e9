use serde::Deserialize;

use super::{build_record, leading_label, parse_period, region_for_country, Normalizer};
use crate::data_source::{NormalizedBatch, SourceError};
use crate::{PriceRecord, ProviderId};

/// FAO food price monitoring series; domestic market prices quoted ex works.
#[derive(Debug, Clone, Copy, Default)]
pub struct FaoNormalizer;

#[derive(Debug, Deserialize)]
struct FaoResponse {
    #[serde(default)]
    series: Vec<FaoSeries>,
}

#[derive(Debug, Deserialize)]
struct FaoSeries {
    #[serde(default)]
    commodity: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    currency: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    observations: Vec<FaoObservation>,
}

#[derive(Debug, Deserialize)]
struct FaoObservation {
    date: Option<String>,
    price: Option<f64>,
}

impl Normalizer for FaoNormalizer {
    fn provider(&self) -> ProviderId {
        ProviderId::Fao
    }

    fn normalize(&self, body: &str) -> Result<NormalizedBatch, SourceError> {
        let response: FaoResponse = serde_json::from_str(body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse fao response: {e}"))
        })?;

        let mut batch = NormalizedBatch {
            provider: Some(ProviderId::Fao),
            ..NormalizedBatch::default()
        };
        for series in &response.series {
            for observation in &series.observations {
                match normalize_observation(series, observation) {
                    Some(record) => batch.records.push(record),
                    None => batch.skipped += 1,
                }
            }
        }
        Ok(batch)
    }
}

fn normalize_observation(series: &FaoSeries, observation: &FaoObservation) -> Option<PriceRecord> {
    let date = parse_period(observation.date.as_deref()?)?;
    let product = leading_label(&series.commodity, &[" - "]);

    Some(
        build_record(date, product, observation.price?)?
            .with_unit(series.unit.as_str())
            .with_currency(series.currency.as_str())
            .with_incoterm("EXW")
            .with_region(region_for_country(&series.country))
            .with_country(series.country.as_str())
            .with_source(ProviderId::Fao.as_str()),
    )
}
