//! Backtest driver: the windowed replay loop.
//!
//! Each step settles open orders against the window's last close, then either
//! burns one bar of cooldown or opens an order for the step's signal. When the
//! windows run out, [`Backtest::finish`] unwinds whatever is still open at its
//! entry price.

use tracing::{debug, info, warn};

use super::account::{AccountState, OrderBook, OUTCOME_COUNT_BIAS};
use super::error::BacktesterError;
use super::execution::{liquidate, open_order, settle_orders, ExecutionParams};
use super::frame::IndicatorFrame;
use super::metrics::Efficiency;
use super::order::{Order, Settlement};
use super::signal::{generate_signal, Signal};
use super::window::Window;
use crate::ports::report_port::{ProgressSnapshot, ReportPort};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub initial_deposit: f64,
    pub transaction_fee_pct: f64,
    /// First row of the first window; skips the indicator warm-up region.
    pub fetch_data_start_row: usize,
    /// Window length in rows.
    pub limit: usize,
    /// Bars during which no new order may be opened after one was.
    pub cooldown: u32,
    pub display_intermediate_data: bool,
}

impl BacktestConfig {
    pub const DEFAULT_START_ROW: usize = 100;
    pub const DEFAULT_LIMIT: usize = 100;

    /// Config with the given thresholds and defaults for everything else.
    pub fn new(take_profit_pct: f64, stop_loss_pct: f64) -> Self {
        BacktestConfig {
            take_profit_pct,
            stop_loss_pct,
            initial_deposit: 0.0,
            transaction_fee_pct: 0.0,
            fetch_data_start_row: Self::DEFAULT_START_ROW,
            limit: Self::DEFAULT_LIMIT,
            cooldown: 0,
            display_intermediate_data: false,
        }
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams {
            take_profit_pct: self.take_profit_pct,
            stop_loss_pct: self.stop_loss_pct,
            transaction_fee_pct: self.transaction_fee_pct,
        }
    }
}

/// What happened during a single step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    pub settled: Vec<Settlement>,
    pub opened: Option<Order>,
    /// A cooldown bar was consumed, so no order could be opened.
    pub cooldown_skipped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub bars_tested: usize,
    pub initial_deposit: f64,
    pub final_deposit: f64,
    /// Biased counters, as used by the efficiency figures.
    pub profit_count: u32,
    pub loss_count: u32,
    pub settlements: Vec<Settlement>,
    /// Orders still open at the end, returned at entry price.
    pub liquidated: Vec<Order>,
    pub efficiency: Efficiency,
}

impl BacktestResult {
    pub fn deposit_change(&self) -> f64 {
        self.final_deposit - self.initial_deposit
    }

    pub fn trades_settled(&self) -> usize {
        self.settlements.len()
    }

    /// Settled wins, without the counter bias.
    pub fn wins(&self) -> u32 {
        self.profit_count.saturating_sub(OUTCOME_COUNT_BIAS)
    }

    pub fn losses(&self) -> u32 {
        self.loss_count.saturating_sub(OUTCOME_COUNT_BIAS)
    }
}

/// One backtest run. Owns its account and order book; build a new one per run.
#[derive(Debug, Clone)]
pub struct Backtest {
    config: BacktestConfig,
    params: ExecutionParams,
    account: AccountState,
    book: OrderBook,
    bars_tested: usize,
    settlements: Vec<Settlement>,
}

impl Backtest {
    pub fn new(config: BacktestConfig) -> Self {
        let params = config.execution_params();
        let account = AccountState::new(config.initial_deposit);
        Backtest {
            config,
            params,
            account,
            book: OrderBook::new(),
            bars_tested: 0,
            settlements: Vec::new(),
        }
    }

    pub fn account(&self) -> &AccountState {
        &self.account
    }

    pub fn order_book(&self) -> &OrderBook {
        &self.book
    }

    pub fn bars_tested(&self) -> usize {
        self.bars_tested
    }

    pub fn efficiency(&self) -> Efficiency {
        Efficiency::from_account(
            &self.account,
            self.params.take_profit_rate(),
            self.params.stop_loss_rate(),
        )
    }

    pub fn snapshot(&self) -> ProgressSnapshot<'_> {
        ProgressSnapshot {
            bars_tested: self.bars_tested,
            open_orders: self.book.orders(),
            deposit: self.account.deposit,
            profit_count: self.account.profit_count,
            loss_count: self.account.loss_count,
            efficiency: self.efficiency(),
        }
    }

    /// Advance by one window. `signal` is what the signal function produced
    /// for this same window.
    pub fn step(&mut self, window: &Window, signal: Option<Signal>) -> StepOutcome {
        let settled = self.settle(window);
        StepOutcome {
            settled,
            ..self.open(window, signal)
        }
    }

    /// First half of a step: count the bar and settle open orders against the
    /// window's last close.
    pub fn settle(&mut self, window: &Window) -> Vec<Settlement> {
        self.bars_tested += 1;

        let Some(price) = window.last_close() else {
            return Vec::new();
        };

        let settled = settle_orders(&mut self.book, &mut self.account, price, self.params.fee_rate());
        self.settlements.extend_from_slice(&settled);
        settled
    }

    /// Second half of a step: burn a cooldown bar, or open an order for
    /// `signal`. The returned `settled` is always empty.
    pub fn open(&mut self, window: &Window, signal: Option<Signal>) -> StepOutcome {
        if window.rows.is_empty() {
            return StepOutcome::default();
        }

        if self.account.cooldown_remaining > 0 {
            self.account.cooldown_remaining -= 1;
            return StepOutcome {
                cooldown_skipped: true,
                ..StepOutcome::default()
            };
        }

        let opened = signal.map(|signal| {
            self.account.cooldown_remaining = self.config.cooldown;
            debug!(bar = window.end() - 1, signal = %signal.signal_type, price = signal.price, "signal");
            open_order(&mut self.book, &mut self.account, &signal, &self.params)
        });

        StepOutcome {
            opened,
            ..StepOutcome::default()
        }
    }

    /// Unwind open orders at entry price and produce the final figures.
    pub fn finish(mut self) -> BacktestResult {
        let efficiency = self.efficiency();
        let liquidated = liquidate(&mut self.book, &mut self.account);

        BacktestResult {
            bars_tested: self.bars_tested,
            initial_deposit: self.account.initial_deposit,
            final_deposit: self.account.deposit,
            profit_count: self.account.profit_count,
            loss_count: self.account.loss_count,
            settlements: self.settlements,
            liquidated,
            efficiency,
        }
    }
}

/// Run the EMA-crossover strategy over `frame`.
pub fn run_backtest(
    frame: &IndicatorFrame,
    config: &BacktestConfig,
    report: &mut dyn ReportPort,
) -> Result<BacktestResult, BacktesterError> {
    run_backtest_with(frame, config, report, generate_signal)
}

/// Run with a caller-supplied signal function in place of the crossover.
pub fn run_backtest_with<F>(
    frame: &IndicatorFrame,
    config: &BacktestConfig,
    report: &mut dyn ReportPort,
    signal_fn: F,
) -> Result<BacktestResult, BacktesterError>
where
    F: Fn(&Window) -> Option<Signal>,
{
    let windows = frame.window_count(config.fetch_data_start_row, config.limit);
    if windows == 0 {
        warn!(
            rows = frame.len(),
            start_row = config.fetch_data_start_row,
            limit = config.limit,
            "series too short for a single window"
        );
    }
    info!(rows = frame.len(), windows, "running backtest");

    let mut backtest = Backtest::new(config.clone());

    for window in frame.windows(config.fetch_data_start_row, config.limit) {
        let signal = signal_fn(&window);
        backtest.settle(&window);

        // Reported before the step's own order is opened.
        if config.display_intermediate_data {
            report.progress(&backtest.snapshot())?;
        }

        backtest.open(&window, signal);
    }

    let result = backtest.finish();
    info!(
        bars = result.bars_tested,
        settled = result.trades_settled(),
        wins = result.wins(),
        losses = result.losses(),
        liquidated = result.liquidated.len(),
        deposit = result.final_deposit,
        change = result.deposit_change(),
        "backtest complete"
    );
    report.summary(&result)?;
    Ok(result)
}
