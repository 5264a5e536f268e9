use std::time::Duration;

use pricedash_core::{Dashboard, DashboardConfig, DataStatus, DerivedView, RecordSource};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output::Renderer;

use super::refresh_result;

#[derive(Debug, Serialize)]
struct WatchTick<'a> {
    tick: u64,
    status: &'a DataStatus,
    #[serde(flatten)]
    view: &'a DerivedView,
}

/// Poll until `--iterations` is reached or Ctrl-C, one envelope per poll.
///
/// A failed poll is printed like any other; the previous snapshot stays on
/// screen and the next tick tries again.
pub async fn run(
    args: &WatchArgs,
    source: Box<dyn RecordSource>,
    config: &DashboardConfig,
    renderer: &mut Renderer,
) -> Result<(), CliError> {
    let period = args
        .interval_secs
        .map(Duration::from_secs)
        .unwrap_or(config.poll_interval);
    let mut dashboard = Dashboard::new(source).with_filters(args.filters.filter_state());
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "watching {} every {}s",
        dashboard.source().label(),
        period.as_secs()
    );

    let mut tick = 0_u64;
    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                log::info!("interrupted after {tick} polls");
                return Ok(());
            }
        }

        tick += 1;
        let result = refresh_result(&mut dashboard, |dashboard| {
            Ok(serde_json::to_value(WatchTick {
                tick,
                status: dashboard.status(),
                view: dashboard.view(),
            })?)
        })
        .await?;
        renderer.emit(&result.into_envelope())?;

        if args.iterations.is_some_and(|limit| tick >= limit) {
            return Ok(());
        }
    }
}
