use serde::{Deserialize, Serialize};

use crate::PriceRecord;

/// Summary statistics behind the dashboard's KPI cards.
///
/// Every field is `0` for an empty selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub last: f64,
    pub previous: f64,
    /// Percent change from `previous` to `last`.
    pub mom_change: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// KPIs over a date-sorted selection (see [`filter_and_sort`]).
///
/// "Month over month" compares the last two rows in sort order, whatever
/// their actual spacing. With fewer than two rows `previous` falls back to
/// `last`, and the change is `0` whenever either price is zero.
///
/// [`filter_and_sort`]: crate::pipeline::filter_and_sort
pub fn compute_kpis(sorted: &[PriceRecord]) -> KpiSummary {
    let Some(last_record) = sorted.last() else {
        return KpiSummary::default();
    };

    let last = last_record.price;
    let previous = sorted
        .len()
        .checked_sub(2)
        .map_or(last, |index| sorted[index].price);
    let mom_change = if last != 0.0 && previous != 0.0 {
        (last - previous) / previous * 100.0
    } else {
        0.0
    };

    let (sum, min, max) = sorted.iter().fold(
        (0.0_f64, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), record| (sum + record.price, min.min(record.price), max.max(record.price)),
    );

    KpiSummary {
        last,
        previous,
        mom_change,
        average: sum / sorted.len() as f64,
        min,
        max,
        count: sorted.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::row;

    #[test]
    fn empty_selection_is_all_zero() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis, KpiSummary::default());
        assert_eq!(kpis.last, 0.0);
        assert_eq!(kpis.mom_change, 0.0);
        assert_eq!(kpis.average, 0.0);
        assert_eq!(kpis.min, 0.0);
        assert_eq!(kpis.max, 0.0);
    }

    #[test]
    fn single_record_has_no_change() {
        let kpis = compute_kpis(&[row("2025-09-01", "A", 42.5)]);
        assert_eq!(kpis.last, 42.5);
        assert_eq!(kpis.previous, 42.5);
        assert_eq!(kpis.mom_change, 0.0);
        assert_eq!(kpis.average, 42.5);
        assert_eq!(kpis.min, 42.5);
        assert_eq!(kpis.max, 42.5);
        assert_eq!(kpis.count, 1);
    }

    #[test]
    fn three_month_series() {
        let records = vec![
            row("2025-07-01", "A", 220.0),
            row("2025-08-01", "A", 255.0),
            row("2025-09-01", "A", 275.0),
        ];

        let kpis = compute_kpis(&records);
        assert_eq!(kpis.last, 275.0);
        assert_eq!(kpis.previous, 255.0);
        assert!((kpis.mom_change - 7.843_137).abs() < 1e-4, "{}", kpis.mom_change);
        assert_eq!(kpis.average, 250.0);
        assert_eq!(kpis.min, 220.0);
        assert_eq!(kpis.max, 275.0);
    }

    #[test]
    fn zero_previous_price_yields_zero_change() {
        let records = vec![row("2025-08-01", "A", 0.0), row("2025-09-01", "A", 10.0)];
        let kpis = compute_kpis(&records);
        assert_eq!(kpis.mom_change, 0.0);
        assert_eq!(kpis.min, 0.0);
        assert_eq!(kpis.max, 10.0);
    }

    #[test]
    fn zero_last_price_yields_zero_change() {
        let records = vec![row("2025-08-01", "A", 10.0), row("2025-09-01", "A", 0.0)];
        assert_eq!(compute_kpis(&records).mom_change, 0.0);
    }
}
