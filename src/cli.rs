//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    validate_backtest_config, validate_data_config, validate_indicator_config,
};
use crate::domain::error::BacktesterError;
use crate::domain::frame::{IndicatorFrame, IndicatorParams};
use crate::domain::indicator::IndicatorType;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{ColumnMapping, DataPort};
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "pastperfect", about = "EMA crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overrides [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show dataset size and how many windows a run would evaluate
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Backtest {
            config,
            data,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, data.as_deref())
            } else {
                run_backtest_command(&config, data.as_deref())
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, data } => run_info(&config, data.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, BacktesterError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Validate every section the backtest command reads.
pub fn validate_all(
    config: &dyn ConfigPort,
    has_data_override: bool,
) -> Result<(), BacktesterError> {
    validate_data_config(config, has_data_override)?;
    validate_backtest_config(config)?;
    validate_indicator_config(config)?;
    Ok(())
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, BacktesterError> {
    let cooldown = config.get_count("backtest", "cooldown", 0)?;
    let cooldown = u32::try_from(cooldown)
        .map_err(|_| BacktesterError::invalid("backtest", "cooldown", "cooldown is too large"))?;

    Ok(BacktestConfig {
        take_profit_pct: config.require_double("backtest", "take_profit")?,
        stop_loss_pct: config.require_double("backtest", "stop_loss")?,
        initial_deposit: config.get_double("backtest", "initial_deposit", 0.0)?,
        transaction_fee_pct: config.get_double("backtest", "transaction_fee", 0.0)?,
        fetch_data_start_row: config.get_count(
            "backtest",
            "fetch_data_start_row",
            BacktestConfig::DEFAULT_START_ROW,
        )?,
        limit: config.get_count("backtest", "limit", BacktestConfig::DEFAULT_LIMIT)?,
        cooldown,
        display_intermediate_data: config.get_bool("backtest", "display_intermediate_data", false)?,
    })
}

pub fn build_indicator_params(config: &dyn ConfigPort) -> Result<IndicatorParams, BacktesterError> {
    let defaults = IndicatorParams::default();
    Ok(IndicatorParams {
        ema_fast: config.get_count("indicators", "ema_fast", defaults.ema_fast)?,
        ema_slow: config.get_count("indicators", "ema_slow", defaults.ema_slow)?,
        rsi_period: config.get_count("indicators", "rsi", defaults.rsi_period)?,
    })
}

pub fn build_column_mapping(config: &dyn ConfigPort) -> Result<ColumnMapping, BacktesterError> {
    let defaults = ColumnMapping::default();
    let column = |key: &str, default: String| {
        config
            .get_string("data", key)
            .map(|s| s.trim().to_string())
            .unwrap_or(default)
    };

    Ok(ColumnMapping {
        reversed: config.get_bool("data", "reversed", defaults.reversed)?,
        open: column("open", defaults.open),
        high: column("high", defaults.high),
        low: column("low", defaults.low),
        close: column("close", defaults.close),
        volume: column("volume", defaults.volume),
    })
}

pub fn resolve_data_path(
    data_override: Option<&Path>,
    config: &dyn ConfigPort,
) -> Result<PathBuf, BacktesterError> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    config
        .get_string("data", "path")
        .map(|p| PathBuf::from(p.trim()))
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| BacktesterError::missing("data", "path"))
}

/// Load, augment with indicators, replay, report.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    mapping: &ColumnMapping,
    params: &IndicatorParams,
    bt_config: &BacktestConfig,
    report: &mut dyn ReportPort,
) -> Result<BacktestResult, BacktesterError> {
    let bars = data_port.fetch_bars(mapping)?;
    info!("Loaded {} bars", bars.len());

    let frame = IndicatorFrame::build(&bars, params);
    warn_on_warmup_overlap(params, bt_config);

    run_backtest(&frame, bt_config, report)
}

fn warn_on_warmup_overlap(params: &IndicatorParams, bt_config: &BacktestConfig) {
    let first_signal_row = (bt_config.fetch_data_start_row + bt_config.limit).saturating_sub(2);
    if first_signal_row < params.warmup_rows() {
        warn!(
            first_signal_row,
            warmup_rows = params.warmup_rows(),
            "first window ends inside the indicator warm-up region; early bars cannot signal"
        );
    }
}

fn run_backtest_command(config_path: &Path, data_override: Option<&Path>) -> Result<(), BacktesterError> {
    let config = load_config(config_path)?;
    validate_all(&config, data_override.is_some())?;

    let bt_config = build_backtest_config(&config)?;
    let params = build_indicator_params(&config)?;
    let mapping = build_column_mapping(&config)?;
    let data_path = resolve_data_path(data_override, &config)?;

    info!("Loading prices from {}", data_path.display());
    let data_port = CsvAdapter::new(data_path);
    let mut report = ConsoleReport::stdout();

    run_backtest_pipeline(&data_port, &mapping, &params, &bt_config, &mut report)?;
    Ok(())
}

fn run_dry_run(config_path: &Path, data_override: Option<&Path>) -> Result<(), BacktesterError> {
    let config = load_config(config_path)?;
    validate_all(&config, data_override.is_some())?;

    let bt_config = build_backtest_config(&config)?;
    let params = build_indicator_params(&config)?;
    let mapping = build_column_mapping(&config)?;
    let data_path = resolve_data_path(data_override, &config)?;

    info!("Config validated successfully");
    info!(
        "Data: {} (open={}, high={}, low={}, close={}, volume={}, reversed={})",
        data_path.display(),
        mapping.open,
        mapping.high,
        mapping.low,
        mapping.close,
        mapping.volume,
        mapping.reversed
    );
    info!(
        "Indicators: {} / {}, {}",
        IndicatorType::Ema(params.ema_fast),
        IndicatorType::Ema(params.ema_slow),
        IndicatorType::Rsi(params.rsi_period)
    );
    info!(
        "Backtest: tp {}%, sl {}%, fee {}%, deposit {}, start row {}, limit {}, cooldown {}",
        bt_config.take_profit_pct,
        bt_config.stop_loss_pct,
        bt_config.transaction_fee_pct,
        bt_config.initial_deposit,
        bt_config.fetch_data_start_row,
        bt_config.limit,
        bt_config.cooldown
    );
    warn_on_warmup_overlap(&params, &bt_config);
    info!("Dry run complete: configuration is valid");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), BacktesterError> {
    let config = load_config(config_path)?;
    validate_all(&config, false)?;
    info!("Configuration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, data_override: Option<&Path>) -> Result<(), BacktesterError> {
    let config = load_config(config_path)?;
    validate_data_config(&config, data_override.is_some())?;
    let bt_config = build_backtest_config(&config)?;
    let params = build_indicator_params(&config)?;
    let mapping = build_column_mapping(&config)?;
    let data_path = resolve_data_path(data_override, &config)?;

    let bars = CsvAdapter::new(data_path.clone()).fetch_bars(&mapping)?;
    let frame = IndicatorFrame::build(&bars, &params);

    println!(
        "{}: {} rows, {} windows (start row {}, limit {})",
        data_path.display(),
        frame.len(),
        frame.window_count(bt_config.fetch_data_start_row, bt_config.limit),
        bt_config.fetch_data_start_row,
        bt_config.limit
    );
    Ok(())
}
