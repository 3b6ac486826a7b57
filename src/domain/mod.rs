//! Core domain types and simulation logic.

pub mod ohlcv;
pub mod indicator;
pub mod frame;
pub mod window;
pub mod signal;
pub mod order;
pub mod account;
pub mod execution;
pub mod metrics;
pub mod backtest;
pub mod config_validation;
pub mod error;
