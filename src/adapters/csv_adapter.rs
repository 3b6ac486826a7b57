//! CSV file data adapter.
//!
//! Columns are located by header name through a [`ColumnMapping`]; every other
//! column is ignored.

use crate::domain::error::BacktesterError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::{ColumnMapping, DataPort};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Header positions of the five canonical columns.
struct ColumnIndex {
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, mapping: &ColumnMapping) -> Result<Self, BacktesterError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| BacktesterError::DataFormat {
                    reason: format!("missing column '{}'", name),
                })
        };

        Ok(ColumnIndex {
            open: find(&mapping.open)?,
            high: find(&mapping.high)?,
            low: find(&mapping.low)?,
            close: find(&mapping.close)?,
            volume: find(&mapping.volume)?,
        })
    }
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    column: &str,
    row: usize,
) -> Result<f64, BacktesterError> {
    let raw = record.get(index).ok_or_else(|| BacktesterError::DataFormat {
        reason: format!("row {}: missing value for '{}'", row, column),
    })?;
    raw.parse().map_err(|_| BacktesterError::DataFormat {
        reason: format!("row {}: non-numeric value '{}' in '{}'", row, raw, column),
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self, mapping: &ColumnMapping) -> Result<Vec<PriceBar>, BacktesterError> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to read {}: {}", self.path.display(), e),
            )
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| BacktesterError::DataFormat {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = ColumnIndex::resolve(headers, mapping)?;

        let mut bars = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            // Header is line 1.
            let row = i + 2;
            let record = result.map_err(|e| BacktesterError::DataFormat {
                reason: format!("CSV parse error: {}", e),
            })?;

            bars.push(PriceBar {
                open: parse_field(&record, columns.open, &mapping.open, row)?,
                high: parse_field(&record, columns.high, &mapping.high, row)?,
                low: parse_field(&record, columns.low, &mapping.low, row)?,
                close: parse_field(&record, columns.close, &mapping.close, row)?,
                volume: parse_field(&record, columns.volume, &mapping.volume, row)?,
            });
        }

        if mapping.reversed {
            bars.reverse();
        }
        Ok(bars)
    }
}
