//! CLI argument definitions for pricedash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `view` | Full derived view for the active filters |
//! | `kpi` | KPI cards with formatted values |
//! | `options` | Filter option lists |
//! | `aggregate` | Run the provider aggregator and print its rows |
//! | `watch` | Poll the record source and print one envelope per tick |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings and errors as failures |
//! | `--verbose` | `false` | Debug logging for pricedash crates |
//! | `--timeout-ms` | `PRICEDASH_TIMEOUT_MS` | HTTP timeout in ms |
//! | `--file` / `--url` / `--providers` | `PRICEDASH_ENDPOINT` | Record source |
//!
//! # Examples
//!
//! ```bash
//! pricedash --file prices.json view --product Sugar --pretty
//! pricedash --url https://dash.example/api/prices kpi --region Asia --currency EUR
//! pricedash --providers watch --interval-secs 30 --format ndjson
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use pricedash_core::{FilterChoice, FilterField, FilterState};

/// Commodity price dashboard from the command line.
#[derive(Debug, Parser)]
#[command(
    name = "pricedash",
    author,
    version,
    about = "Commodity price dashboard CLI",
    long_about = "pricedash fetches commodity price rows from a dashboard endpoint, a local \
JSON file or external trade-data providers and derives filter options, KPI cards, chart \
series and a regional snapshot.\n\
\n\
Use 'pricedash <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Debug-level logging for pricedash crates (RUST_LOG still wins).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// HTTP timeout in milliseconds; overrides PRICEDASH_TIMEOUT_MS.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Read rows from a local JSON file.
    #[arg(long, global = true, conflicts_with_all = ["url", "providers"])]
    pub file: Option<PathBuf>,

    /// Fetch rows from a dashboard endpoint.
    #[arg(long, global = true, conflicts_with = "providers")]
    pub url: Option<String>,

    /// Fetch rows from the external providers through the aggregator.
    #[arg(long, global = true, default_value_t = false)]
    pub providers: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full derived view: rows, options, KPIs, series, regional.
    ///
    /// # Examples
    ///
    ///   pricedash --file prices.json view
    ///   pricedash --file prices.json view --product Sugar --incoterm FOB
    View(FilterArgs),

    /// Print KPI cards with display strings.
    ///
    /// # Examples
    ///
    ///   pricedash kpi --product Wheat --currency USD
    Kpi(FilterArgs),

    /// Print the option lists for every filter control.
    Options,

    /// Fetch, normalize and merge rows from every provider feed.
    ///
    /// # Examples
    ///
    ///   pricedash aggregate
    ///   pricedash aggregate --refresh --format table
    Aggregate(AggregateArgs),

    /// Poll the record source and print one envelope per tick.
    ///
    /// # Examples
    ///
    ///   pricedash --url https://dash.example/api/prices watch --iterations 3
    ///   pricedash --providers watch --interval-secs 30 --region Asia
    Watch(WatchArgs),
}

/// Dashboard selectors; `All` (any case) means no filter.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub product: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub country: Option<String>,

    #[arg(long)]
    pub incoterm: Option<String>,

    /// Currency used for display strings.
    #[arg(long)]
    pub currency: Option<String>,
}

impl FilterArgs {
    pub fn filter_state(&self) -> FilterState {
        let mut state = FilterState::new();
        for (field, value) in [
            (FilterField::Product, &self.product),
            (FilterField::Region, &self.region),
            (FilterField::Country, &self.country),
            (FilterField::Incoterm, &self.incoterm),
        ] {
            state.set(field, choice(value.as_deref()));
        }

        state.display_currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|currency| !currency.is_empty())
            .map(str::to_ascii_uppercase);
        state
    }
}

fn choice(value: Option<&str>) -> FilterChoice {
    match value.map(str::trim) {
        None | Some("") => FilterChoice::Any,
        Some(value) if value.eq_ignore_ascii_case("all") => FilterChoice::Any,
        Some(value) => FilterChoice::exact(value),
    }
}

/// Arguments for the `aggregate` command.
#[derive(Debug, Args)]
pub struct AggregateArgs {
    /// Skip the cached rows and refetch every provider.
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

/// Arguments for the `watch` command.
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Seconds between polls; defaults to PRICEDASH_POLL_SECS.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_secs: Option<u64>,

    /// Stop after this many polls; runs until Ctrl-C otherwise.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub iterations: Option<u64>,
}
