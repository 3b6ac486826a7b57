//! OHLCV bar representation.

/// One row of the canonical price series, oldest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Bar with every price field set to `close`. Handy for synthetic series.
    pub fn flat(close: f64) -> Self {
        PriceBar {
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_bar_uses_close_everywhere() {
        let bar = PriceBar::flat(42.5);
        assert_eq!(bar.open, 42.5);
        assert_eq!(bar.high, 42.5);
        assert_eq!(bar.low, 42.5);
        assert_eq!(bar.close, 42.5);
        assert_eq!(bar.volume, 0.0);
    }
}
