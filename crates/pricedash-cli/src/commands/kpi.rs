use pricedash_core::{format_percent, format_price, Dashboard, KpiSummary, RecordSource, TradeDate};
use serde::Serialize;

use crate::cli::FilterArgs;
use crate::error::CliError;

use super::{refresh_result, CommandResult};

#[derive(Debug, Serialize)]
struct KpiResponseData<'a> {
    kpis: &'a KpiSummary,
    currency: &'a str,
    latest_date: Option<TradeDate>,
    display: KpiDisplay,
}

/// Card strings as the dashboard shows them.
#[derive(Debug, PartialEq, Serialize)]
struct KpiDisplay {
    last: String,
    previous: String,
    mom_change: String,
    average: String,
    min: String,
    max: String,
}

impl KpiDisplay {
    fn new(kpis: &KpiSummary, currency: &str) -> Self {
        Self {
            last: format_price(kpis.last, currency),
            previous: format_price(kpis.previous, currency),
            mom_change: format_percent(kpis.mom_change),
            average: format_price(kpis.average, currency),
            min: format_price(kpis.min, currency),
            max: format_price(kpis.max, currency),
        }
    }
}

pub async fn run(
    args: &FilterArgs,
    source: Box<dyn RecordSource>,
) -> Result<CommandResult, CliError> {
    let mut dashboard = Dashboard::new(source).with_filters(args.filter_state());
    refresh_result(&mut dashboard, |dashboard| {
        let view = dashboard.view();
        let currency = dashboard.display_currency();
        let data = KpiResponseData {
            kpis: &view.kpis,
            currency,
            latest_date: view.latest_date,
            display: KpiDisplay::new(&view.kpis, currency),
        };
        Ok(serde_json::to_value(data)?)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_use_currency_and_sign() {
        let kpis = KpiSummary {
            last: 275.0,
            previous: 255.0,
            mom_change: 7.843_137,
            average: 250.0,
            min: 220.0,
            max: 275.0,
            count: 3,
        };

        let display = KpiDisplay::new(&kpis, "USD");
        assert_eq!(display.last, "$275.00");
        assert_eq!(display.mom_change, "+7.84%");
        assert_eq!(display.min, "$220.00");
    }
}
