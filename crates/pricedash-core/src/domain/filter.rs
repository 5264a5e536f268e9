use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{PriceRecord, ValidationError};

/// Record label a filter selector applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Product,
    Region,
    Country,
    Incoterm,
}

impl FilterField {
    pub const ALL: [Self; 4] = [Self::Product, Self::Region, Self::Country, Self::Incoterm];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Region => "region",
            Self::Country => "country",
            Self::Incoterm => "incoterm",
        }
    }
}

impl Display for FilterField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(Self::Product),
            "region" => Ok(Self::Region),
            "country" => Ok(Self::Country),
            "incoterm" => Ok(Self::Incoterm),
            other => Err(ValidationError::InvalidFilterField {
                value: other.to_owned(),
            }),
        }
    }
}

/// A single selector value: the "no filter" sentinel or an exact label.
///
/// Serialized as JSON `null` for [`FilterChoice::Any`] and as the label
/// string otherwise, so option lists stay free of magic strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FilterChoice {
    #[default]
    Any,
    Exact(String),
}

impl FilterChoice {
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Exact(value.into())
    }

    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Exact, case-sensitive comparison; `Any` matches everything.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(expected) => expected == value,
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Exact(value) => Some(value.as_str()),
        }
    }
}

impl Display for FilterChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => f.write_str("All"),
            Self::Exact(value) => f.write_str(value),
        }
    }
}

impl From<Option<String>> for FilterChoice {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Any, Self::Exact)
    }
}

impl Serialize for FilterChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.as_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FilterChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.into())
    }
}

/// Active dashboard filters.
///
/// The four selectors are independent; `display_currency` only affects
/// formatting and never removes rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub product: FilterChoice,
    #[serde(default)]
    pub region: FilterChoice,
    #[serde(default)]
    pub country: FilterChoice,
    #[serde(default)]
    pub incoterm: FilterChoice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_currency: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: FilterField, choice: FilterChoice) -> Self {
        self.set(field, choice);
        self
    }

    pub fn with_display_currency(mut self, currency: impl Into<String>) -> Self {
        self.display_currency = Some(currency.into());
        self
    }

    pub fn get(&self, field: FilterField) -> &FilterChoice {
        match field {
            FilterField::Product => &self.product,
            FilterField::Region => &self.region,
            FilterField::Country => &self.country,
            FilterField::Incoterm => &self.incoterm,
        }
    }

    pub fn set(&mut self, field: FilterField, choice: FilterChoice) {
        let slot = match field {
            FilterField::Product => &mut self.product,
            FilterField::Region => &mut self.region,
            FilterField::Country => &mut self.country,
            FilterField::Incoterm => &mut self.incoterm,
        };
        *slot = choice;
    }

    /// Reset every selector to `Any`; the display currency is kept.
    pub fn clear(&mut self) {
        for field in FilterField::ALL {
            self.set(field, FilterChoice::Any);
        }
    }

    pub fn is_unfiltered(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.get(*field).is_any())
    }

    pub fn matches(&self, record: &PriceRecord) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.get(*field).matches(record.field(*field)))
    }
}
