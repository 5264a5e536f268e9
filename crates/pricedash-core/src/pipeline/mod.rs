//! # Derivation Pipeline
//!
//! Pure, synchronous transforms from a record snapshot plus [`FilterState`]
//! to everything the dashboard renders.
//!
//! ```text
//! records ──▶ filter_and_sort ──┬──▶ compute_kpis
//!    │                          ├──▶ pivot_by_product
//!    │                          └──▶ latest_regional_snapshot
//!    └──────▶ extract_options   (always over the unfiltered set)
//! ```
//!
//! None of these functions fail: empty input, a single record and zero
//! prices all have defined fallbacks. [`DerivedView::compute`] runs the whole
//! pipeline in one call.
//!
//! [`FilterState`]: crate::FilterState

mod filter;
mod kpi;
mod options;
mod regional;
mod series;
mod view;

pub use filter::filter_and_sort;
pub use kpi::{compute_kpis, KpiSummary};
pub use options::{extract_options, OptionLists};
pub use regional::{latest_date, latest_regional_snapshot, RegionalBar};
pub use series::{pivot_by_product, ChartSeries, SeriesRow, DATE_PRODUCT_KEY};
pub use view::DerivedView;
