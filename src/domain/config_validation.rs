//! Configuration validation.
//!
//! Validates all config fields before any data is loaded.

use crate::domain::error::BacktesterError;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    validate_thresholds(config)?;
    validate_initial_deposit(config)?;
    validate_transaction_fee(config)?;
    validate_window(config)?;
    validate_cooldown(config)?;
    config.get_bool("backtest", "display_intermediate_data", false)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let fast = validate_period(config, "ema_fast", 9)?;
    let slow = validate_period(config, "ema_slow", 21)?;
    validate_period(config, "rsi", 14)?;

    if fast >= slow {
        return Err(BacktesterError::invalid(
            "indicators",
            "ema_fast",
            "ema_fast must be shorter than ema_slow",
        ));
    }
    Ok(())
}

/// `path_override` stands in for `[data] path` when given on the command line.
pub fn validate_data_config(
    config: &dyn ConfigPort,
    has_path_override: bool,
) -> Result<(), BacktesterError> {
    if !has_path_override {
        match config.get_string("data", "path") {
            Some(p) if !p.trim().is_empty() => {}
            _ => return Err(BacktesterError::missing("data", "path")),
        }
    }

    config.get_bool("data", "reversed", false)?;

    for key in ["open", "high", "low", "close", "volume"] {
        if let Some(column) = config.get_string("data", key) {
            if column.trim().is_empty() {
                return Err(BacktesterError::invalid(
                    "data",
                    key,
                    "column name must not be empty",
                ));
            }
        }
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    for key in ["take_profit", "stop_loss"] {
        let value = config.require_double("backtest", key)?;
        if !value.is_finite() || value < 0.0 {
            return Err(BacktesterError::invalid(
                "backtest",
                key,
                format!("{key} must be a non-negative percentage"),
            ));
        }
    }
    Ok(())
}

fn validate_initial_deposit(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let value = config.get_double("backtest", "initial_deposit", 0.0)?;
    if !value.is_finite() || value < 0.0 {
        return Err(BacktesterError::invalid(
            "backtest",
            "initial_deposit",
            "initial_deposit must be non-negative",
        ));
    }
    Ok(())
}

fn validate_transaction_fee(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let value = config.get_double("backtest", "transaction_fee", 0.0)?;
    if !(0.0..100.0).contains(&value) {
        return Err(BacktesterError::invalid(
            "backtest",
            "transaction_fee",
            "transaction_fee must be in [0, 100)",
        ));
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    config.get_count("backtest", "fetch_data_start_row", 100)?;
    let limit = config.get_count("backtest", "limit", 100)?;
    if limit < 2 {
        return Err(BacktesterError::invalid(
            "backtest",
            "limit",
            "limit must be at least 2",
        ));
    }
    Ok(())
}

fn validate_cooldown(config: &dyn ConfigPort) -> Result<(), BacktesterError> {
    let cooldown = config.get_count("backtest", "cooldown", 0)?;
    if u32::try_from(cooldown).is_err() {
        return Err(BacktesterError::invalid(
            "backtest",
            "cooldown",
            "cooldown is too large",
        ));
    }
    Ok(())
}

fn validate_period(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, BacktesterError> {
    let period = config.get_count("indicators", key, default)?;
    if period == 0 {
        return Err(BacktesterError::invalid(
            "indicators",
            key,
            format!("{key} must be at least 1"),
        ));
    }
    Ok(period)
}
