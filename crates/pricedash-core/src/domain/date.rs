use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Month};

use crate::ValidationError;

/// Calendar date of a price observation, day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(Date);

impl TradeDate {
    /// Parse an ISO 8601 calendar date (`YYYY-MM-DD`).
    ///
    /// A full timestamp such as `2025-09-01T00:00:00Z` is accepted and
    /// truncated to its date part.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let date_part = match trimmed.get(10..11) {
            Some("T") | Some(" ") => &trimmed[..10],
            _ => trimmed,
        };

        Date::parse(date_part, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDate {
            value: format!("{year:04}-{month:02}-{day:02}"),
        };
        let month = Month::try_from(month).map_err(|_| invalid())?;
        Date::from_calendar_date(year, month, day)
            .map(Self)
            .map_err(|_| invalid())
    }

    /// First day of the given month; providers report monthly periods.
    pub fn first_of_month(year: i32, month: u8) -> Result<Self, ValidationError> {
        Self::from_ymd(year, month, 1)
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }
}

impl Display for TradeDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_calendar_date() {
        let parsed = TradeDate::parse("2025-09-01").expect("must parse");
        assert_eq!(parsed.to_string(), "2025-09-01");
    }

    #[test]
    fn truncates_full_timestamp_to_date() {
        let parsed = TradeDate::parse("2025-09-01T13:45:00Z").expect("must parse");
        assert_eq!(parsed, TradeDate::from_ymd(2025, 9, 1).expect("valid"));
    }

    #[test]
    fn rejects_malformed_dates() {
        for input in ["2025-13-01", "2025/09/01", "", "Sept 2025"] {
            let err = TradeDate::parse(input).expect_err("must fail");
            assert!(matches!(err, ValidationError::InvalidDate { .. }), "{input}");
        }
    }

    #[test]
    fn orders_as_calendar_dates() {
        let earlier = TradeDate::parse("2024-12-31").expect("valid");
        let later = TradeDate::parse("2025-01-01").expect("valid");
        assert!(earlier < later);
    }
}
