//! Sliding windows over an indicator frame.

use crate::domain::frame::IndicatorRow;

/// An owned copy of `limit` consecutive rows. Mutating it never touches the
/// frame it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Offset of the first row in the source frame.
    pub start: usize,
    pub rows: Vec<IndicatorRow>,
}

impl Window {
    /// Exclusive end offset in the source frame.
    pub fn end(&self) -> usize {
        self.start + self.rows.len()
    }

    pub fn last(&self) -> Option<&IndicatorRow> {
        self.rows.last()
    }

    /// `(previous, current)`: the final two rows.
    pub fn last_two(&self) -> Option<(&IndicatorRow, &IndicatorRow)> {
        match self.rows.as_slice() {
            [.., previous, current] => Some((previous, current)),
            _ => None,
        }
    }

    pub fn last_close(&self) -> Option<f64> {
        self.last().map(IndicatorRow::close)
    }
}

/// Yields `[start_row + q, start_row + q + limit)` for `q = 0, 1, ...` until
/// the window would run past the end of the series. Once exhausted it stays
/// exhausted; build a new iterator to replay.
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    rows: &'a [IndicatorRow],
    start_row: usize,
    limit: usize,
    query_number: usize,
}

impl<'a> WindowIter<'a> {
    pub fn new(rows: &'a [IndicatorRow], start_row: usize, limit: usize) -> Self {
        WindowIter {
            rows,
            start_row,
            limit,
            query_number: 0,
        }
    }

    /// Number of windows produced so far.
    pub fn query_number(&self) -> usize {
        self.query_number
    }
}

impl Iterator for WindowIter<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let start = self.start_row + self.query_number;
        let end = start + self.limit;
        if end > self.rows.len() {
            return None;
        }

        self.query_number += 1;
        Some(Window {
            start,
            rows: self.rows[start..end].to_vec(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.rows.len() + 1)
            .saturating_sub(self.start_row + self.query_number + self.limit);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for WindowIter<'_> {}

impl std::iter::FusedIterator for WindowIter<'_> {}
