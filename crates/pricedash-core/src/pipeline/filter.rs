use crate::{FilterState, PriceRecord};

/// Rows matching every active selector, ascending by calendar date.
///
/// The sort is stable: rows sharing a date keep their input order.
pub fn filter_and_sort(records: &[PriceRecord], filters: &FilterState) -> Vec<PriceRecord> {
    let mut selected: Vec<PriceRecord> = records
        .iter()
        .filter(|record| filters.matches(record))
        .cloned()
        .collect();
    selected.sort_by_key(|record| record.date);
    selected
}
