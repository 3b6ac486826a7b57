//! Indicator-augmented price series.
//!
//! Indicators are computed once over the whole series before any windowing,
//! so every derived value at row `i` depends only on rows `0..=i`.

use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::PriceBar;
use crate::domain::window::WindowIter;

/// Indicator window lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            ema_fast: 9,
            ema_slow: 21,
            rsi_period: 14,
        }
    }
}

impl IndicatorParams {
    /// Number of leading rows where at least one derived column is undefined.
    pub fn warmup_rows(&self) -> usize {
        self.ema_fast
            .max(self.ema_slow)
            .max(self.rsi_period)
            .saturating_sub(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub bar: PriceBar,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorRow {
    pub fn close(&self) -> f64 {
        self.bar.close
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

impl IndicatorFrame {
    pub fn build(bars: &[PriceBar], params: &IndicatorParams) -> Self {
        let ema_fast = calculate_ema(bars, params.ema_fast);
        let ema_slow = calculate_ema(bars, params.ema_slow);
        let rsi = calculate_rsi(bars, params.rsi_period);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                bar: *bar,
                ema_fast: ema_fast.get(i),
                ema_slow: ema_slow.get(i),
                rsi: rsi.get(i),
            })
            .collect();

        IndicatorFrame { rows }
    }

    /// Frame over precomputed rows, e.g. indicator values from another source.
    pub fn from_rows(rows: Vec<IndicatorRow>) -> Self {
        IndicatorFrame { rows }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sliding windows of `limit` rows, step 1, starting at `start_row`.
    pub fn windows(&self, start_row: usize, limit: usize) -> WindowIter<'_> {
        WindowIter::new(&self.rows, start_row, limit)
    }

    /// How many windows `windows(start_row, limit)` will yield.
    pub fn window_count(&self, start_row: usize, limit: usize) -> usize {
        (self.rows.len() + 1).saturating_sub(start_row + limit)
    }
}
