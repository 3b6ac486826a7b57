//! Price data access port trait.

use crate::domain::error::BacktesterError;
use crate::domain::ohlcv::PriceBar;

/// Source column names for each canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    /// Source rows are newest-first and must be reversed.
    pub reversed: bool,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping {
            open: "open".into(),
            high: "high".into(),
            low: "low".into(),
            close: "close".into(),
            volume: "volume".into(),
            reversed: false,
        }
    }
}

pub trait DataPort {
    /// Load the full series, oldest bar first.
    fn fetch_bars(&self, mapping: &ColumnMapping) -> Result<Vec<PriceBar>, BacktesterError>;
}
