use std::time::Instant;

use pricedash_core::{CacheMode, DashboardConfig, EnvelopeError, PriceRecord, RecordSource};
use serde::Serialize;

use crate::cli::{AggregateArgs, Cli};
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

#[derive(Debug, Serialize)]
struct AggregateResponseData {
    count: usize,
    records: Vec<PriceRecord>,
}

pub async fn run(
    cli: &Cli,
    args: &AggregateArgs,
    config: &DashboardConfig,
) -> Result<CommandResult, CliError> {
    let mode = if args.refresh {
        CacheMode::Refresh
    } else {
        CacheMode::Use
    };
    let aggregator = config.aggregator().with_mode(mode);

    let started = Instant::now();
    let outcome = aggregator.fetch().await;
    let latency_ms = elapsed_ms(started);

    let mut result = match outcome {
        Ok(batch) => {
            let data = serde_json::to_value(AggregateResponseData {
                count: batch.records.len(),
                records: batch.records,
            })?;
            CommandResult::ok(data, batch.source_chain)
                .with_warnings(batch.warnings)
                .with_cache_hit(batch.cache_hit)
        }
        Err(error) => {
            let data = serde_json::to_value(AggregateResponseData {
                count: 0,
                records: Vec::new(),
            })?;
            CommandResult::ok(data, vec![aggregator.label()])
                .with_errors(vec![EnvelopeError::from(&error)])
        }
    }
    .with_latency(latency_ms);

    if cli.file.is_some() || cli.url.is_some() {
        result = result.with_warning("aggregate always reads the providers; --file/--url ignored");
    }

    Ok(result)
}
