use std::collections::{BTreeMap, HashSet};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::{PriceRecord, TradeDate};

const DATE_KEY: &str = "date";

/// Column key used for a product literally named `date`.
pub const DATE_PRODUCT_KEY: &str = "date (product)";

/// One chart row: a date plus the price of every product observed on it.
///
/// Serializes flat, e.g. `{"date":"2025-09-01","Corn":260.0,"Sugar":510.0}`.
/// A `date` entry in `values` is never written; [`pivot_by_product`] files
/// that product under [`DATE_PRODUCT_KEY`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeriesRow {
    pub date: TradeDate,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl SeriesRow {
    pub fn get(&self, product: &str) -> Option<f64> {
        self.values.get(column_key(product)).copied()
    }
}

impl Serialize for SeriesRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(DATE_KEY, &self.date)?;
        for (product, price) in &self.values {
            if product != DATE_KEY {
                map.serialize_entry(product, price)?;
            }
        }
        map.end()
    }
}

fn column_key(product: &str) -> &str {
    if product == DATE_KEY {
        DATE_PRODUCT_KEY
    } else {
        product
    }
}

/// Wide, sparse trend table with one column per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Column keys in first-occurrence order, matching the keys of `rows`.
    pub products: Vec<String>,
    pub rows: Vec<SeriesRow>,
}

/// Pivot rows into one entry per date, ascending.
///
/// Missing date/product cells stay absent. When two rows share a date and
/// product the later one wins; prices are never averaged here.
pub fn pivot_by_product(records: &[PriceRecord]) -> ChartSeries {
    let mut by_date: BTreeMap<TradeDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut seen = HashSet::new();
    let mut products = Vec::new();

    for record in records {
        let key = column_key(&record.product);
        if seen.insert(key) {
            products.push(key.to_owned());
        }
        by_date
            .entry(record.date)
            .or_default()
            .insert(key.to_owned(), record.price);
    }

    let rows = by_date
        .into_iter()
        .map(|(date, values)| SeriesRow { date, values })
        .collect();

    ChartSeries { products, rows }
}
