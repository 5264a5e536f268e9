use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// External trade-data providers the aggregator knows how to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Comtrade,
    WorldBank,
    Fao,
}

impl ProviderId {
    pub const ALL: [Self; 3] = [Self::Comtrade, Self::WorldBank, Self::Fao];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comtrade => "comtrade",
            Self::WorldBank => "worldbank",
            Self::Fao => "fao",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "comtrade" => Ok(Self::Comtrade),
            "worldbank" | "world_bank" => Ok(Self::WorldBank),
            "fao" => Ok(Self::Fao),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
