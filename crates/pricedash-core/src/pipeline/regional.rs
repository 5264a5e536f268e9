use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{PriceRecord, TradeDate};

/// Mean price of one region on the latest observed date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalBar {
    pub region: String,
    pub price: f64,
}

pub fn latest_date(records: &[PriceRecord]) -> Option<TradeDate> {
    records.iter().map(|record| record.date).max()
}

/// Per-region mean over the rows of the most recent date.
///
/// Regions appear in first-occurrence order within that date's rows.
pub fn latest_regional_snapshot(records: &[PriceRecord]) -> Vec<RegionalBar> {
    let Some(latest) = latest_date(records) else {
        return Vec::new();
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();

    for record in records.iter().filter(|record| record.date == latest) {
        let region = record.region.as_str();
        match index.get(region) {
            Some(&slot) => {
                groups[slot].1 += record.price;
                groups[slot].2 += 1;
            }
            None => {
                index.insert(region, groups.len());
                groups.push((region, record.price, 1));
            }
        }
    }

    groups
        .into_iter()
        .map(|(region, sum, count)| RegionalBar {
            region: region.to_owned(),
            price: sum / count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::row;

    #[test]
    fn averages_regions_on_latest_date_only() {
        let records = vec![
            row("2025-08-01", "A", 999.0).with_region("Asia"),
            row("2025-09-01", "A", 100.0).with_region("Asia"),
            row("2025-09-01", "B", 200.0).with_region("Asia"),
        ];

        assert_eq!(
            latest_regional_snapshot(&records),
            vec![RegionalBar {
                region: String::from("Asia"),
                price: 150.0,
            }]
        );
    }

    #[test]
    fn keeps_first_occurrence_region_order() {
        let records = vec![
            row("2025-09-01", "A", 10.0).with_region("Europe"),
            row("2025-09-01", "A", 20.0).with_region("Asia"),
            row("2025-09-01", "A", 30.0).with_region("Europe"),
        ];

        let bars = latest_regional_snapshot(&records);
        let regions: Vec<_> = bars.iter().map(|bar| bar.region.as_str()).collect();
        assert_eq!(regions, vec!["Europe", "Asia"]);
        assert_eq!(bars[0].price, 20.0);
        assert_eq!(bars[1].price, 20.0);
    }

    #[test]
    fn empty_selection_has_no_bars() {
        assert!(latest_regional_snapshot(&[]).is_empty());
        assert_eq!(latest_date(&[]), None);
    }
}
