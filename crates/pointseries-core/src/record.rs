use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::geometry::GeoTransform;

/// One band of one image: raw stored values, row-major, shape = (rows, cols).
#[derive(Clone, Debug)]
pub struct Band {
    pub data: Array2<f64>,
    /// Sentinel marking pixels with no valid measurement
    pub nodata: Option<f64>,
}

impl Band {
    pub fn new(data: Array2<f64>) -> Self {
        Self { data, nodata: None }
    }

    pub fn with_nodata(data: Array2<f64>, nodata: f64) -> Self {
        Self {
            data,
            nodata: Some(nodata),
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Value at (row, col), or `None` for masked pixels.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        let v = self.data[[row, col]];
        if is_valid(v, self.nodata) {
            Some(v)
        } else {
            None
        }
    }
}

#[inline]
pub fn is_valid(value: f64, nodata: Option<f64>) -> bool {
    if value.is_nan() {
        return false;
    }
    match nodata {
        Some(nd) => value != nd,
        None => true,
    }
}

/// Per-acquisition catalog metadata. Pixel data is read separately, band by
/// band, through the owning collection.
#[derive(Clone, Debug)]
pub struct ImageRecord {
    pub id: String,
    /// Acquisition start (`system:time_start`), UTC
    pub time_start: NaiveDateTime,
    /// Numeric catalog properties, e.g. `CLOUDY_PIXEL_PERCENTAGE`
    pub properties: BTreeMap<String, f64>,
    pub transform: GeoTransform,
}

impl ImageRecord {
    pub fn property(&self, name: &str) -> Option<f64> {
        self.properties.get(name).copied()
    }
}

/// Native temporal resolution of a collection; selects the timestamp format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalResolution {
    #[default]
    Daily,
    SubDaily,
}

impl std::fmt::Display for TemporalResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::SubDaily => write!(f, "Sub-daily"),
        }
    }
}
