use pricedash_core::{Dashboard, RecordSource};

use crate::cli::FilterArgs;
use crate::error::CliError;

use super::{refresh_result, CommandResult};

pub async fn run(
    args: &FilterArgs,
    source: Box<dyn RecordSource>,
) -> Result<CommandResult, CliError> {
    let mut dashboard = Dashboard::new(source).with_filters(args.filter_state());
    refresh_result(&mut dashboard, |dashboard| {
        Ok(serde_json::to_value(dashboard.view())?)
    })
    .await
}
