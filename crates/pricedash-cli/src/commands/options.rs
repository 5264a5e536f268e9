use pricedash_core::{Dashboard, RecordSource};

use crate::error::CliError;

use super::{refresh_result, CommandResult};

/// Option lists never depend on filters, so none are applied.
pub async fn run(source: Box<dyn RecordSource>) -> Result<CommandResult, CliError> {
    let mut dashboard = Dashboard::new(source);
    refresh_result(&mut dashboard, |dashboard| {
        Ok(serde_json::to_value(&dashboard.view().options)?)
    })
    .await
}
