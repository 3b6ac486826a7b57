//! Exponential Moving Average over closes.
//!
//! alpha = 2/(n+1). The recursion starts from the first close,
//! EMA[0] = C[0], then EMA[i] = C[i]*alpha + EMA[i-1]*(1-alpha).
//! Warmup: the recursion runs from bar 0 but the first (n-1) values are
//! reported as `None`.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let indicator_type = IndicatorType::Ema(period);
    if period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: vec![None; bars.len()],
        };
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut ema = None;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let next = match ema {
                None => bar.close,
                Some(prev) => bar.close * alpha + prev * (1.0 - alpha),
            };
            ema = Some(next);
            (i + 1 >= period).then_some(next)
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}
