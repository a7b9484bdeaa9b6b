//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_report::SvgReportAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_date, read_windows, validate_backtest_config, validate_indicator_config,
};
use crate::domain::error::SmatrendError;
use crate::domain::metrics::Metrics;
use crate::domain::price::PriceSeries;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT_DIR: &str = "out";

#[derive(Parser, Debug)]
#[command(name = "smatrend", about = "Moving-average trend-following backtester")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ticker: Option<String>,
    pub start_date: Option<String>,
    pub source: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Yahoo,
}

/// Which reports to write and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub output_dir: PathBuf,
    pub charts: bool,
    pub table: bool,
}

impl Cli {
    /// Initialize logging based on verbosity level.
    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .finish();

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("warning: failed to set tracing subscriber: {e}");
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    cli.init_logging();

    match cli.command {
        Command::Backtest {
            config,
            ticker,
            start_date,
            source,
            data_dir,
            output_dir,
            dry_run,
        } => {
            let overrides = Overrides {
                ticker,
                start_date,
                source,
                data_dir,
                output_dir,
            };
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides)
            }
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SmatrendError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: SmatrendError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestConfig, SmatrendError> {
    let ticker = overrides
        .ticker
        .clone()
        .or_else(|| adapter.get_string("backtest", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SmatrendError::ConfigMissing {
            section: "backtest".into(),
            key: "ticker".into(),
        })?;

    let start_str = overrides
        .start_date
        .clone()
        .or_else(|| adapter.get_string("backtest", "start_date"));
    let start_date: NaiveDate = parse_date(start_str.as_deref(), "start_date")?;

    validate_indicator_config(adapter)?;
    let windows = read_windows(adapter)?;

    Ok(BacktestConfig {
        ticker,
        start_date,
        windows,
    })
}

pub fn resolve_source(
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<SourceKind, SmatrendError> {
    let source = overrides
        .source
        .clone()
        .or_else(|| adapter.get_string("backtest", "source"))
        .unwrap_or_else(|| "csv".to_string());

    match source.trim().to_lowercase().as_str() {
        "csv" => Ok(SourceKind::Csv),
        "yahoo" => Ok(SourceKind::Yahoo),
        other => Err(SmatrendError::ConfigInvalid {
            section: "backtest".into(),
            key: "source".into(),
            reason: format!("unknown source '{}', expected csv or yahoo", other),
        }),
    }
}

pub fn resolve_reports(adapter: &dyn ConfigPort, overrides: &Overrides) -> ReportSettings {
    ReportSettings {
        output_dir: overrides
            .output_dir
            .clone()
            .or_else(|| adapter.get_path("report", "output_dir"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        charts: adapter.get_bool("report", "charts", true),
        table: adapter.get_bool("report", "table", true),
    }
}

pub fn build_data_port(
    kind: SourceKind,
    adapter: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<Box<dyn DataPort>, SmatrendError> {
    match kind {
        SourceKind::Csv => {
            let dir = overrides
                .data_dir
                .clone()
                .or_else(|| adapter.get_path("backtest", "data_dir"))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
            Ok(Box::new(CsvAdapter::new(dir)))
        }
        #[cfg(feature = "yahoo")]
        SourceKind::Yahoo => Ok(Box::new(
            crate::adapters::yahoo_adapter::YahooAdapter::new()?,
        )),
        #[cfg(not(feature = "yahoo"))]
        SourceKind::Yahoo => Err(SmatrendError::ConfigInvalid {
            section: "backtest".into(),
            key: "source".into(),
            reason: "yahoo feature is required for source = yahoo".into(),
        }),
    }
}

pub fn build_reporters(settings: &ReportSettings) -> Vec<Box<dyn ReportPort>> {
    let mut reporters: Vec<Box<dyn ReportPort>> = Vec::new();
    if settings.charts {
        reporters.push(Box::new(SvgReportAdapter::new()));
    }
    if settings.table {
        reporters.push(Box::new(CsvReportAdapter::new()));
    }
    reporters
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct PipelineOutput {
    pub result: BacktestResult,
    pub metrics: Metrics,
    pub written: Vec<PathBuf>,
}

/// Fetch, compute, and render. Any failure aborts before reports are written.
/// An empty history is not a failure: it runs through with empty outputs.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    bt_config: &BacktestConfig,
    reporters: &[Box<dyn ReportPort>],
    output_dir: &Path,
) -> Result<PipelineOutput, SmatrendError> {
    // Stage 1: Fetch price history
    let points = data_port.fetch_prices(&bt_config.ticker, bt_config.start_date)?;
    if points.is_empty() {
        warn!(ticker = %bt_config.ticker, start = %bt_config.start_date, "no price history in range");
    }
    let series = PriceSeries::new(bt_config.ticker.clone(), points)?;
    info!(ticker = %bt_config.ticker, bars = series.len(), "price history ready");

    // Stage 2: Indicators, positions, intervals, returns
    let result = backtest_engine::run_backtest(&series, &bt_config.windows)?;

    // Stage 3: Metrics
    let metrics = Metrics::compute(&result);

    // Stage 4: Reports
    let mut written = Vec::new();
    for reporter in reporters {
        written.extend(reporter.write(&result, &metrics, output_dir)?);
    }

    Ok(PipelineOutput {
        result,
        metrics,
        written,
    })
}

pub fn print_summary(result: &BacktestResult, metrics: &Metrics) {
    eprintln!("\n=== {} ===", result.ticker());
    if let Some((first, last)) = result.series.date_range() {
        eprintln!("Period:           {} to {} ({} bars)", first, last, result.len());
    }
    eprintln!("Market Return:    {:.2}%", metrics.market_return * 100.0);
    eprintln!("Strategy Return:  {:.2}%", metrics.strategy_return * 100.0);
    eprintln!(
        "Annualized:       {:.2}% market, {:.2}% strategy",
        metrics.annualized_market_return * 100.0,
        metrics.annualized_strategy_return * 100.0
    );
    eprintln!(
        "Max Drawdown:     -{:.1}% market, -{:.1}% strategy",
        metrics.market_max_drawdown * 100.0,
        metrics.strategy_max_drawdown * 100.0
    );
    eprintln!(
        "Intervals:        {} long, {} short",
        metrics.long_intervals, metrics.short_intervals
    );
    eprintln!(
        "Days:             {} long, {} short, {} flat ({:.1}% exposure)",
        metrics.days_long,
        metrics.days_short,
        metrics.days_flat,
        metrics.exposure * 100.0
    );
}

fn run_backtest(config_path: &Path, overrides: &Overrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let source = match resolve_source(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_port = match build_data_port(source, &adapter, overrides) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let settings = resolve_reports(&adapter, overrides);
    let reporters = build_reporters(&settings);

    eprintln!(
        "Running backtest: {} from {} (SMA {}/{}/{})",
        bt_config.ticker,
        bt_config.start_date,
        bt_config.windows.fast,
        bt_config.windows.medium,
        bt_config.windows.slow
    );

    let output = match run_backtest_pipeline(
        data_port.as_ref(),
        &bt_config,
        &reporters,
        &settings.output_dir,
    ) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    print_summary(&output.result, &output.metrics);
    for path in &output.written {
        eprintln!("Wrote: {}", path.display());
    }
    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = match build_backtest_config(&adapter, overrides) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let source = match resolve_source(&adapter, overrides) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let settings = resolve_reports(&adapter, overrides);

    eprintln!("Config validated successfully");
    eprintln!("\nBacktest:");
    eprintln!("  ticker:     {}", bt_config.ticker);
    eprintln!("  start_date: {}", bt_config.start_date);
    eprintln!("  source:     {:?}", source);
    eprintln!("\nIndicators:");
    eprintln!("  fast:   SMA{}", bt_config.windows.fast);
    eprintln!("  medium: SMA{}", bt_config.windows.medium);
    eprintln!("  slow:   SMA{}", bt_config.windows.slow);
    eprintln!("\nReports:");
    eprintln!("  output_dir: {}", settings.output_dir.display());
    eprintln!("  charts:     {}", settings.charts);
    eprintln!("  table:      {}", settings.table);

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(e);
    }
    if let Err(e) = validate_indicator_config(&adapter) {
        return fail(e);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
