//! RSI (Relative Strength Index) over closes.
//!
//! Gains and losses are smoothed with Wilder's recursion, alpha = 1/n:
//! avg[i] = alpha * x[i] + (1 - alpha) * avg[i-1], starting from zero. The
//! change into bar 0 has no predecessor and counts as 0.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first (n-1) bars are `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Rsi(period);
    if period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: vec![None; bars.len()],
        };
    }

    let alpha = 1.0 / period as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut values = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = match i.checked_sub(1) {
            Some(prev) => bar.close - bars[prev].close,
            None => 0.0,
        };
        let gain = if change > 0.0 { change } else { 0.0 };
        let loss = if change < 0.0 { -change } else { 0.0 };

        avg_gain = gain * alpha + avg_gain * (1.0 - alpha);
        avg_loss = loss * alpha + avg_loss * (1.0 - alpha);

        values.push((i + 1 >= period).then(|| rsi_from_averages(avg_gain, avg_loss)));
    }

    IndicatorSeries {
        indicator_type,
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices.iter().map(|&close| PriceBar::flat(close)).collect()
    }

    #[test]
    fn rsi_empty_bars() {
        let series = calculate_rsi(&[], 14);
        assert!(series.values.is_empty());
    }

    #[test]
    fn rsi_single_bar() {
        let series = calculate_rsi(&make_bars(&[100.0]), 14);
        assert_eq!(series.values, vec![None]);
    }

    #[test]
    fn rsi_warmup_period() {
        let prices: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        assert_eq!(series.values.len(), 15);
        for i in 0..13 {
            assert!(series.values[i].is_none(), "bar {} should be warm-up", i);
        }
        assert!(series.values[13].is_some(), "bar 13 should be valid");
        assert!(series.values[14].is_some());
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        let rsi = series.get(14).unwrap();
        assert!((rsi - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        let rsi = series.get(14).unwrap();
        assert!(rsi.abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_in_range() {
        let prices: Vec<f64> = (1..=40)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let series = calculate_rsi(&make_bars(&prices), 14);

        for rsi in series.values.iter().flatten() {
            assert!((0.0..=100.0).contains(rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_hand_computed_period_2() {
        // changes 0 (first bar), +2, -1, +3; alpha = 0.5
        // avg gain: 0, 1, 0.5, 1.75   avg loss: 0, 0, 0.5, 0.25
        let series = calculate_rsi(&make_bars(&[10.0, 12.0, 11.0, 14.0]), 2);

        assert_eq!(
            series.values,
            vec![None, Some(100.0), Some(50.0), Some(87.5)]
        );
    }

    #[test]
    fn rsi_hand_computed_period_3() {
        // changes 0, +1, -1, +2; alpha = 1/3
        // bar 2: gain 2/9, loss 1/3 -> RS 2/3
        // bar 3: gain 22/27, loss 2/9 -> RS 11/3
        let series = calculate_rsi(&make_bars(&[10.0, 11.0, 10.0, 12.0]), 3);

        assert!(series.get(1).is_none());
        assert!((series.get(2).unwrap() - 40.0).abs() < 1e-9);
        assert!((series.get(3).unwrap() - (100.0 - 300.0 / 14.0)).abs() < 1e-9);
    }

    #[test]
    fn rsi_first_bar_has_no_change() {
        let series = calculate_rsi(&make_bars(&[100.0, 90.0]), 1);
        assert_eq!(series.values, vec![Some(100.0), Some(0.0)]);
    }

    #[test]
    fn rsi_zero_period() {
        let series = calculate_rsi(&make_bars(&[100.0, 101.0]), 0);
        assert_eq!(series.values, vec![None, None]);
        assert_eq!(series.indicator_type, IndicatorType::Rsi(0));
    }
}
