//! # Domain Models
//!
//! Canonical types shared by every record source and by the derivation
//! pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PriceRecord`] | One observed price for a product/market/date |
//! | [`TradeDate`] | Day-granularity calendar date |
//! | [`FilterState`] | The dashboard's active selectors |
//! | [`FilterChoice`] | `Any` sentinel or an exact label |
//! | [`FilterField`] | Which record label a selector addresses |
//!
//! Records are never mutated after ingestion; derived views are rebuilt from
//! the snapshot instead.

mod date;
mod filter;
mod record;

pub use date::TradeDate;
pub use filter::{FilterChoice, FilterField, FilterState};
pub use record::PriceRecord;
