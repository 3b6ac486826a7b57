//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktesterError;
use crate::domain::metrics::Efficiency;
use crate::domain::order::Order;

/// Running state after one backtest step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot<'a> {
    pub bars_tested: usize,
    pub open_orders: &'a [Order],
    pub deposit: f64,
    pub profit_count: u32,
    pub loss_count: u32,
    pub efficiency: Efficiency,
}

/// Port for streaming progress and the final summary of a run.
pub trait ReportPort {
    /// Called after every step when intermediate display is enabled.
    fn progress(&mut self, snapshot: &ProgressSnapshot<'_>) -> Result<(), BacktesterError>;

    fn summary(&mut self, result: &BacktestResult) -> Result<(), BacktesterError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReport;

impl ReportPort for NullReport {
    fn progress(&mut self, _snapshot: &ProgressSnapshot<'_>) -> Result<(), BacktesterError> {
        Ok(())
    }

    fn summary(&mut self, _result: &BacktestResult) -> Result<(), BacktesterError> {
        Ok(())
    }
}
