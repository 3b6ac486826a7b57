#![allow(dead_code)]

use pastperfect::domain::backtest::BacktestResult;
use pastperfect::domain::error::BacktesterError;
use pastperfect::domain::frame::IndicatorRow;
pub use pastperfect::domain::ohlcv::PriceBar;
use pastperfect::domain::signal::{Signal, SignalType};
use pastperfect::ports::data_port::{ColumnMapping, DataPort};
use pastperfect::ports::report_port::{ProgressSnapshot, ReportPort};

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(bars: Vec<PriceBar>) -> Self {
        Self { bars, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            bars: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self, mapping: &ColumnMapping) -> Result<Vec<PriceBar>, BacktesterError> {
        if let Some(reason) = &self.error {
            return Err(BacktesterError::DataFormat {
                reason: reason.clone(),
            });
        }
        let mut bars = self.bars.clone();
        if mapping.reversed {
            bars.reverse();
        }
        Ok(bars)
    }
}

/// Keeps every progress line and the final summary.
#[derive(Default)]
pub struct RecordingReport {
    pub progress: Vec<(usize, usize, f64)>,
    pub summary: Option<BacktestResult>,
}

impl ReportPort for RecordingReport {
    fn progress(&mut self, snapshot: &ProgressSnapshot<'_>) -> Result<(), BacktesterError> {
        self.progress.push((
            snapshot.bars_tested,
            snapshot.open_orders.len(),
            snapshot.deposit,
        ));
        Ok(())
    }

    fn summary(&mut self, result: &BacktestResult) -> Result<(), BacktesterError> {
        self.summary = Some(result.clone());
        Ok(())
    }
}

pub fn row(close: f64, ema_fast: f64, ema_slow: f64) -> IndicatorRow {
    IndicatorRow {
        bar: PriceBar::flat(close),
        ema_fast: Some(ema_fast),
        ema_slow: Some(ema_slow),
        rsi: None,
    }
}

pub fn flat_rows(closes: &[f64]) -> Vec<IndicatorRow> {
    closes
        .iter()
        .map(|&close| IndicatorRow {
            bar: PriceBar::flat(close),
            ema_fast: None,
            ema_slow: None,
            rsi: None,
        })
        .collect()
}

/// Fast EMA below slow before row `k`, above from row `k` on.
pub fn single_bullish_cross(n: usize, k: usize) -> Vec<IndicatorRow> {
    (0..n)
        .map(|i| {
            if i < k {
                row(100.0 + i as f64, 1.0, 2.0)
            } else {
                row(100.0 + i as f64, 3.0, 2.0)
            }
        })
        .collect()
}

pub fn buy(price: f64) -> Option<Signal> {
    Some(Signal {
        signal_type: SignalType::Buy,
        price,
    })
}

pub fn sell(price: f64) -> Option<Signal> {
    Some(Signal {
        signal_type: SignalType::Sell,
        price,
    })
}

/// Oscillating closes; EMAs of different lengths cross a few times per cycle.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + 10.0 * (i as f64 / 5.0).sin() + i as f64 * 0.05)
        .collect()
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .map(|&c| PriceBar {
            open: c,
            high: c + 1.0,
            low: c - 1.0,
            close: c,
            volume: 1000.0,
        })
        .collect()
}

pub fn csv_from_closes(closes: &[f64]) -> String {
    let mut out = String::from("open,high,low,close,volume\n");
    for c in closes {
        out.push_str(&format!("{c},{},{},{c},1000\n", c + 1.0, c - 1.0));
    }
    out
}
