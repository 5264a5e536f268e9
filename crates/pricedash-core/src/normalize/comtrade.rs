use serde::Deserialize;
use serde_json::Value;

use super::{build_record, leading_label, parse_period, region_for_country, Normalizer};
use crate::data_source::{NormalizedBatch, SourceError};
use crate::{PriceRecord, ProviderId};

/// UN Comtrade trade flows turned into unit values (USD per tonne).
#[derive(Debug, Clone, Copy, Default)]
pub struct ComtradeNormalizer;

#[derive(Debug, Deserialize)]
struct ComtradeResponse {
    #[serde(default)]
    data: Vec<ComtradeRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComtradeRow {
    #[serde(default)]
    period: Value,
    reporter_desc: Option<String>,
    cmd_code: Option<String>,
    cmd_desc: Option<String>,
    flow_code: Option<String>,
    primary_value: Option<f64>,
    /// Net weight in kilograms.
    net_wgt: Option<f64>,
}

impl Normalizer for ComtradeNormalizer {
    fn provider(&self) -> ProviderId {
        ProviderId::Comtrade
    }

    fn normalize(&self, body: &str) -> Result<NormalizedBatch, SourceError> {
        let response: ComtradeResponse = serde_json::from_str(body).map_err(|e| {
            SourceError::invalid_response(format!("failed to parse comtrade response: {e}"))
        })?;

        let total = response.data.len();
        let records: Vec<_> = response.data.into_iter().filter_map(normalize_row).collect();

        Ok(NormalizedBatch {
            provider: Some(ProviderId::Comtrade),
            skipped: total - records.len(),
            records,
        })
    }
}

fn normalize_row(row: ComtradeRow) -> Option<PriceRecord> {
    let period = match &row.period {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    let date = parse_period(&period)?;

    let weight_kg = row.net_wgt.filter(|weight| *weight > 0.0)?;
    let price = row.primary_value? / weight_kg * 1000.0;

    let product = row
        .cmd_code
        .as_deref()
        .and_then(hs_label)
        .map(str::to_owned)
        .or_else(|| {
            row.cmd_desc
                .as_deref()
                .map(|desc| leading_label(desc, &[";", ","]).to_owned())
        })
        .unwrap_or_default();

    let incoterm = match row.flow_code.as_deref() {
        Some("X") => "FOB",
        Some("M") => "CIF",
        _ => "",
    };
    let country = row.reporter_desc.unwrap_or_default();

    Some(
        build_record(date, &product, price)?
            .with_unit("t")
            .with_currency("USD")
            .with_incoterm(incoterm)
            .with_region(region_for_country(&country))
            .with_country(country)
            .with_source(ProviderId::Comtrade.as_str()),
    )
}

/// Dashboard names for the HS headings the dashboard tracks.
fn hs_label(code: &str) -> Option<&'static str> {
    let heading = code.get(..4)?;
    Some(match heading {
        "0901" => "Coffee",
        "1001" => "Wheat",
        "1005" => "Corn",
        "1006" => "Rice",
        "1201" => "Soybeans",
        "1701" => "Sugar",
        "1801" => "Cocoa",
        "5201" => "Cotton",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceErrorKind;

    const BODY: &str = r#"{
        "count": 3,
        "data": [
            {"period": "202509", "reporterDesc": "Brazil", "cmdCode": "1701",
             "cmdDesc": "Cane or beet sugar; solid", "flowCode": "X",
             "primaryValue": 12750000.0, "netWgt": 25000000.0},
            {"period": 202509, "reporterDesc": "China", "cmdCode": "0713",
             "cmdDesc": "Dried leguminous vegetables; shelled", "flowCode": "M",
             "primaryValue": 900000.0, "netWgt": 1500000.0},
            {"period": "202509", "reporterDesc": "India", "cmdCode": "1006",
             "flowCode": "X", "primaryValue": 1000.0, "netWgt": 0}
        ]
    }"#;

    #[test]
    fn computes_unit_value_per_tonne() {
        let batch = ComtradeNormalizer.normalize(BODY).expect("should normalize");
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.skipped, 1);

        let sugar = &batch.records[0];
        assert_eq!(sugar.product, "Sugar");
        assert_eq!(sugar.price, 510.0);
        assert_eq!(sugar.unit, "t");
        assert_eq!(sugar.currency, "USD");
        assert_eq!(sugar.incoterm, "FOB");
        assert_eq!(sugar.country, "Brazil");
        assert_eq!(sugar.region, "South America");
        assert_eq!(sugar.source, "comtrade");
        assert_eq!(sugar.date.to_string(), "2025-09-01");
    }

    #[test]
    fn falls_back_to_description_and_maps_imports_to_cif() {
        let batch = ComtradeNormalizer.normalize(BODY).expect("should normalize");
        let pulses = &batch.records[1];
        assert_eq!(pulses.product, "Dried leguminous vegetables");
        assert_eq!(pulses.incoterm, "CIF");
        assert_eq!(pulses.region, "Asia");
        assert_eq!(pulses.price, 600.0);
    }

    #[test]
    fn rejects_non_comtrade_body() {
        let error = ComtradeNormalizer.normalize("[1,2,3]").expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidResponse);
    }
}
