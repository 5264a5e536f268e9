use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{FilterChoice, FilterField, PriceRecord};

/// Selectable values per filter control, each list led by [`FilterChoice::Any`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLists {
    pub product: Vec<FilterChoice>,
    pub region: Vec<FilterChoice>,
    pub country: Vec<FilterChoice>,
    pub incoterm: Vec<FilterChoice>,
}

impl OptionLists {
    pub fn for_field(&self, field: FilterField) -> &[FilterChoice] {
        match field {
            FilterField::Product => &self.product,
            FilterField::Region => &self.region,
            FilterField::Country => &self.country,
            FilterField::Incoterm => &self.incoterm,
        }
    }
}

/// Distinct non-empty labels per field in first-occurrence order.
///
/// Must be given the unfiltered record set so that choosing one filter never
/// hides the options of another.
pub fn extract_options(records: &[PriceRecord]) -> OptionLists {
    OptionLists {
        product: distinct_values(records, FilterField::Product),
        region: distinct_values(records, FilterField::Region),
        country: distinct_values(records, FilterField::Country),
        incoterm: distinct_values(records, FilterField::Incoterm),
    }
}

fn distinct_values(records: &[PriceRecord], field: FilterField) -> Vec<FilterChoice> {
    let mut seen = HashSet::new();
    let mut values = vec![FilterChoice::Any];
    for record in records {
        let value = record.field(field);
        if !value.is_empty() && seen.insert(value) {
            values.push(FilterChoice::exact(value));
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::fixtures::row;

    #[test]
    fn keeps_first_occurrence_order_without_duplicates_or_blanks() {
        let records = vec![
            row("2025-09-01", "Sugar", 510.0).with_country("Brazil"),
            row("2025-09-01", "Corn", 260.0).with_country(""),
            row("2025-08-01", "Sugar", 500.0).with_country("India"),
            row("2025-08-01", "", 10.0).with_country("Brazil"),
        ];

        let options = extract_options(&records);
        assert_eq!(
            options.product,
            vec![
                FilterChoice::Any,
                FilterChoice::exact("Sugar"),
                FilterChoice::exact("Corn"),
            ]
        );
        assert_eq!(
            options.for_field(FilterField::Country),
            &[
                FilterChoice::Any,
                FilterChoice::exact("Brazil"),
                FilterChoice::exact("India"),
            ]
        );
        assert_eq!(options.incoterm, vec![FilterChoice::Any]);
    }

    #[test]
    fn empty_input_still_offers_the_sentinel() {
        let options = extract_options(&[]);
        for field in FilterField::ALL {
            assert_eq!(options.for_field(field), &[FilterChoice::Any]);
        }
    }
}
