mod aggregate;
mod kpi;
mod options;
mod view;
mod watch;

use std::time::Instant;

use pricedash_core::{
    Dashboard, DashboardConfig, EndpointSource, Envelope, EnvelopeError, EnvelopeMeta,
    FileSource, RecordSource,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Renderer;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    pub source_chain: Vec<String>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<String>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            cache_hit: false,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }

    pub fn into_envelope(self) -> Envelope<Value> {
        let CommandResult {
            data,
            warnings,
            errors,
            latency_ms,
            cache_hit,
            source_chain,
        } = self;

        let mut meta = EnvelopeMeta::new(source_chain, latency_ms, cache_hit);
        for warning in warnings {
            meta.push_warning(warning);
        }
        Envelope::with_errors(meta, data, errors)
    }
}

pub async fn run(cli: &Cli, renderer: &mut Renderer) -> Result<(), CliError> {
    let config = load_config(cli)?;

    let result = match &cli.command {
        Command::View(args) => view::run(args, record_source(cli, &config)?).await?,
        Command::Kpi(args) => kpi::run(args, record_source(cli, &config)?).await?,
        Command::Options => options::run(record_source(cli, &config)?).await?,
        Command::Aggregate(args) => aggregate::run(cli, args, &config).await?,
        Command::Watch(args) => {
            return watch::run(args, record_source(cli, &config)?, &config, renderer).await;
        }
    };

    renderer.emit(&result.into_envelope())
}

/// Environment configuration with CLI overrides applied.
fn load_config(cli: &Cli) -> Result<DashboardConfig, CliError> {
    let mut config = DashboardConfig::from_env()?;
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    Ok(config)
}

/// The record source picked by `--file`, `--url`, `--providers` or
/// `PRICEDASH_ENDPOINT`, in that order.
fn record_source(
    cli: &Cli,
    config: &DashboardConfig,
) -> Result<Box<dyn RecordSource>, CliError> {
    if let Some(path) = &cli.file {
        return Ok(Box::new(FileSource::new(path.clone())));
    }
    if cli.providers {
        return Ok(Box::new(config.aggregator()));
    }

    let url = cli.url.as_ref().or(config.endpoint.as_ref()).ok_or_else(|| {
        CliError::Command(String::from(
            "no record source: pass --file, --url or --providers, or set PRICEDASH_ENDPOINT",
        ))
    })?;
    Ok(Box::new(
        EndpointSource::new(url.as_str()).with_timeout_ms(config.timeout_ms),
    ))
}

/// Refresh once and build the result from the dashboard afterwards.
///
/// A failed fetch is not a command error: the envelope carries it and `data`
/// is derived from whatever snapshot the dashboard still holds.
pub(crate) async fn refresh_result<S, F>(
    dashboard: &mut Dashboard<S>,
    data: F,
) -> Result<CommandResult, CliError>
where
    S: RecordSource,
    F: FnOnce(&Dashboard<S>) -> Result<Value, CliError>,
{
    let started = Instant::now();
    let outcome = dashboard.refresh().await;
    let latency_ms = elapsed_ms(started);
    let data = data(&*dashboard)?;

    Ok(match outcome {
        Ok(summary) => CommandResult::ok(data, summary.source_chain)
            .with_warnings(summary.warnings)
            .with_cache_hit(summary.cache_hit)
            .with_latency(latency_ms),
        Err(error) => CommandResult::ok(data, vec![dashboard.source().label()])
            .with_errors(vec![EnvelopeError::from(&error)])
            .with_latency(latency_ms),
    })
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricedash_core::{MemorySource, PriceRecord, TradeDate};
    use serde_json::json;

    #[tokio::test]
    async fn refresh_result_reports_the_source_chain() {
        let record = PriceRecord::new(
            TradeDate::parse("2025-09-01").expect("valid date"),
            "Sugar",
            510.0,
        )
        .expect("valid record");
        let mut dashboard = Dashboard::new(MemorySource::new(vec![record]));

        let result = refresh_result(&mut dashboard, |dashboard| {
            Ok(json!({ "count": dashboard.view().kpis.count }))
        })
        .await
        .expect("memory source never fails");

        assert_eq!(result.source_chain, vec!["memory"]);
        assert_eq!(result.data["count"], 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn into_envelope_moves_warnings_into_meta() {
        let envelope = CommandResult::ok(json!([]), vec![String::from("file:prices.json")])
            .with_warning("worldbank: skipped 1 rows that could not be mapped")
            .with_cache_hit(true)
            .into_envelope();

        assert_eq!(envelope.meta.warnings.len(), 1);
        assert!(envelope.meta.cache_hit);
        assert!(envelope.errors.is_empty());
    }
}
