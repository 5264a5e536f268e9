use serde::{Deserialize, Deserializer, Serialize};

use crate::{FilterField, TradeDate, ValidationError};

/// Canonical price row shared by every record source and provider normalizer.
///
/// Label fields are free-form; missing labels decode as empty strings and a
/// missing price decodes as `0`. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub date: TradeDate,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub currency: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub incoterm: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub region: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
}

impl PriceRecord {
    pub fn new(
        date: TradeDate,
        product: impl Into<String>,
        price: f64,
    ) -> Result<Self, ValidationError> {
        validate_price(price)?;
        Ok(Self {
            date,
            product: product.into(),
            unit: String::new(),
            currency: String::new(),
            incoterm: String::new(),
            region: String::new(),
            country: String::new(),
            source: String::new(),
            price,
        })
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_incoterm(mut self, incoterm: impl Into<String>) -> Self {
        self.incoterm = incoterm.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Label addressed by a filter selector.
    pub fn field(&self, field: FilterField) -> &str {
        match field {
            FilterField::Product => &self.product,
            FilterField::Region => &self.region,
            FilterField::Country => &self.country,
            FilterField::Incoterm => &self.incoterm,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_price(self.price)
    }
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::NonFiniteValue { field: "price" });
    }
    if price < 0.0 {
        return Err(ValidationError::NegativeValue { field: "price" });
    }
    Ok(())
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}
