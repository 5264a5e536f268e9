//! # Provider Normalizers
//!
//! Each external trade-data provider has its own payload shape. A
//! [`Normalizer`] maps one provider's response body onto canonical
//! [`PriceRecord`]s; adding a provider means adding an implementation, never
//! touching the existing ones.
//!
//! | Provider | Normalizer | Prices |
//! |----------|------------|--------|
//! | UN Comtrade | [`ComtradeNormalizer`] | unit value of trade flows, USD/t |
//! | World Bank | [`WorldBankNormalizer`] | monthly benchmark prices, USD |
//! | FAO FPMA | [`FaoNormalizer`] | domestic market prices, local currency |
//!
//! Rows that cannot be mapped are skipped and counted in
//! [`NormalizedBatch::skipped`]; only an undecodable body is an error.

mod comtrade;
mod fao;
mod worldbank;

use std::sync::Arc;

pub use comtrade::ComtradeNormalizer;
pub use fao::FaoNormalizer;
pub use worldbank::WorldBankNormalizer;

use crate::data_source::{NormalizedBatch, SourceError};
use crate::{PriceRecord, ProviderId, TradeDate};

/// Maps one provider's payload onto canonical rows.
pub trait Normalizer: Send + Sync {
    fn provider(&self) -> ProviderId;

    /// # Errors
    ///
    /// [`SourceError::invalid_response`] when the body does not have the
    /// provider's shape at all.
    fn normalize(&self, body: &str) -> Result<NormalizedBatch, SourceError>;
}

/// Default normalizer for a provider.
pub fn normalizer_for(provider: ProviderId) -> Arc<dyn Normalizer> {
    match provider {
        ProviderId::Comtrade => Arc::new(ComtradeNormalizer),
        ProviderId::WorldBank => Arc::new(WorldBankNormalizer),
        ProviderId::Fao => Arc::new(FaoNormalizer),
    }
}

/// Dashboard region for a country name as the providers spell it.
pub fn region_for_country(country: &str) -> &'static str {
    match country.trim().to_lowercase().as_str() {
        "world" | "global" => "Global",
        "china" | "india" | "japan" | "thailand" | "viet nam" | "vietnam" | "indonesia"
        | "pakistan" | "bangladesh" | "philippines" | "malaysia" | "rep. of korea"
        | "korea" | "south korea" | "türkiye" | "turkey" | "saudi arabia"
        | "united arab emirates" => "Asia",
        "germany" | "france" | "netherlands" | "spain" | "italy" | "poland" | "ukraine"
        | "russian federation" | "russia" | "united kingdom" | "belgium" | "romania" => "Europe",
        "kenya" | "nigeria" | "ethiopia" | "egypt" | "south africa" | "ghana" | "uganda"
        | "united rep. of tanzania" | "tanzania" | "morocco" | "côte d'ivoire" => "Africa",
        "usa" | "united states" | "united states of america" | "canada" | "mexico"
        | "guatemala" => "North America",
        "brazil" | "argentina" | "colombia" | "peru" | "chile" | "paraguay" | "uruguay"
        | "bolivia" | "ecuador" => "South America",
        "australia" | "new zealand" => "Oceania",
        _ => "Other",
    }
}

/// Parse a provider period: `YYYY`, `YYYYMM`, `YYYYMmm`, `YYYY-MM` or a full
/// ISO date. Monthly and yearly periods map to their first day.
pub(crate) fn parse_period(text: &str) -> Option<TradeDate> {
    let text = text.trim();
    if !text.is_ascii() {
        return None;
    }

    let (year, month) = match text.len() {
        4 => (text, "1"),
        6 => (&text[..4], &text[4..]),
        7 if matches!(&text[4..5], "M" | "m" | "-") => (&text[..4], &text[5..]),
        _ => return TradeDate::parse(text).ok(),
    };

    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    TradeDate::first_of_month(year, month).ok()
}

/// Leading label of a provider description: `"Sugar, world"` → `"Sugar"`.
pub(crate) fn leading_label<'a>(text: &'a str, separators: &[&str]) -> &'a str {
    let cut = separators
        .iter()
        .filter_map(|separator| text.find(*separator))
        .min()
        .unwrap_or(text.len());
    text[..cut].trim()
}

/// Build a record, or `None` when the price is negative or not finite.
pub(crate) fn build_record(
    date: TradeDate,
    product: &str,
    price: f64,
) -> Option<PriceRecord> {
    PriceRecord::new(date, product, price).ok()
}
