use serde::{Deserialize, Serialize};

use super::{
    compute_kpis, extract_options, filter_and_sort, latest_regional_snapshot, pivot_by_product,
    ChartSeries, KpiSummary, OptionLists, RegionalBar,
};
use crate::{FilterState, PriceRecord, TradeDate};

/// Everything the dashboard renders for one (records, filters) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedView {
    /// Filtered rows, ascending by date.
    pub records: Vec<PriceRecord>,
    pub options: OptionLists,
    pub kpis: KpiSummary,
    pub series: ChartSeries,
    pub regional: Vec<RegionalBar>,
    pub latest_date: Option<TradeDate>,
}

impl DerivedView {
    pub fn compute(records: &[PriceRecord], filters: &FilterState) -> Self {
        let filtered = filter_and_sort(records, filters);

        Self {
            options: extract_options(records),
            kpis: compute_kpis(&filtered),
            series: pivot_by_product(&filtered),
            regional: latest_regional_snapshot(&filtered),
            latest_date: filtered.last().map(|record| record.date),
            records: filtered,
        }
    }
}
