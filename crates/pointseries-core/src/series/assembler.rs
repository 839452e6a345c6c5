use chrono::NaiveDateTime;

use super::{ResultRow, TimeFormat};

/// Pairs reduced values with their image's acquisition time.
#[derive(Clone, Copy, Debug)]
pub struct FeatureAssembler {
    format: TimeFormat,
}

impl FeatureAssembler {
    pub fn new(format: TimeFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> TimeFormat {
        self.format
    }

    pub fn assemble(&self, timestamp: NaiveDateTime, value: f64) -> ResultRow {
        ResultRow {
            timestamp,
            time: self.format.format(&timestamp),
            value,
        }
    }
}
