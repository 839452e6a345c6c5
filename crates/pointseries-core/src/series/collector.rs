use std::sync::Mutex;

use super::{ResultRow, RowOrder, TimeSeries};

/// Thread-safe accumulator for rows produced by concurrent workers.
///
/// Rows are keyed by their image's catalog position, so the finished series
/// does not depend on which worker finished first.
#[derive(Debug)]
pub struct TimeSeriesCollector {
    time_column: String,
    value_column: String,
    rows: Mutex<Vec<(usize, ResultRow)>>,
}

impl TimeSeriesCollector {
    pub fn new(time_column: &str, value_column: &str) -> Self {
        Self {
            time_column: time_column.to_string(),
            value_column: value_column.to_string(),
            rows: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, catalog_index: usize, row: ResultRow) {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((catalog_index, row));
    }

    pub fn size(&self) -> usize {
        self.rows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Consume the collector into an ordered series.
    pub fn finish(self, order: RowOrder) -> TimeSeries {
        let mut rows = self
            .rows
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rows.sort_by_key(|(index, _)| *index);
        if order == RowOrder::Chronological {
            rows.sort_by_key(|(_, row)| row.timestamp);
        }
        TimeSeries {
            time_column: self.time_column,
            value_column: self.value_column,
            rows: rows.into_iter().map(|(_, row)| row).collect(),
        }
    }
}
