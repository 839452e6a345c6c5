//! Result rows and the time series they are collected into.

mod assembler;
mod collector;

pub use assembler::FeatureAssembler;
pub use collector::TimeSeriesCollector;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::consts::{DATE_FORMAT, DATE_TIME_FORMAT};
use crate::record::TemporalResolution;

/// How acquisition timestamps are rendered in the time column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `YYYY-MM-DD`
    Date,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
}

impl TimeFormat {
    pub fn for_resolution(resolution: TemporalResolution) -> Self {
        match resolution {
            TemporalResolution::Daily => Self::Date,
            TemporalResolution::SubDaily => Self::DateTime,
        }
    }

    pub fn pattern(&self) -> &'static str {
        match self {
            Self::Date => DATE_FORMAT,
            Self::DateTime => DATE_TIME_FORMAT,
        }
    }

    /// Default name of the time column.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::DateTime => "time",
        }
    }

    pub fn format(&self, t: &NaiveDateTime) -> String {
        t.format(self.pattern()).to_string()
    }
}

impl std::fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "Date"),
            Self::DateTime => write!(f, "Date-time"),
        }
    }
}

/// Output row order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// The collection's iteration order
    #[default]
    Catalog,
    /// Ascending acquisition time; ties keep catalog order
    Chronological,
}

impl std::fmt::Display for RowOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog => write!(f, "Catalog"),
            Self::Chronological => write!(f, "Chronological"),
        }
    }
}

/// One observation that survived null filtering.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultRow {
    pub timestamp: NaiveDateTime,
    /// `timestamp` rendered with the series' time format
    pub time: String,
    pub value: f64,
}

/// The assembled table: a time column and one value column.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    pub time_column: String,
    pub value_column: String,
    pub rows: Vec<ResultRow>,
}

impl TimeSeries {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.value)
    }
}
