//! Spatial reduction of a band to one statistic over the query geometry.

pub mod null_filter;

pub use null_filter::NullFilter;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeriesError};
use crate::geometry::{GeoTransform, Geometry};
use crate::record::Band;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    #[default]
    Mean,
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "Mean"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReductionSpec {
    pub statistic: Statistic,
    pub geometry: Geometry,
    /// Nominal pixel size in meters
    pub scale: f64,
    /// Safety cap on the number of pixels one reduction may touch
    pub max_pixels: u64,
}

impl ReductionSpec {
    pub fn mean(geometry: Geometry, scale: f64, max_pixels: u64) -> Self {
        Self {
            statistic: Statistic::Mean,
            geometry,
            scale,
            max_pixels,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SeriesError::Configuration(format!(
                "scale must be a positive number of meters, got {}",
                self.scale
            )));
        }
        if self.max_pixels == 0 {
            return Err(SeriesError::Configuration(
                "max_pixels must be at least 1".into(),
            ));
        }
        let implied = self.geometry.cell_count(self.scale);
        if implied > self.max_pixels {
            return Err(SeriesError::TooManyPixels {
                count: implied,
                max: self.max_pixels,
            });
        }
        Ok(())
    }
}

/// Reduce `band` over the reduction geometry.
///
/// Pixels whose centers fall inside the footprint are aggregated; when the
/// footprint is finer than the native grid, the pixel under the geometry's
/// anchor is used. Returns `Ok(None)` when no valid pixel is covered.
pub fn reduce_band(
    band: &Band,
    transform: &GeoTransform,
    spec: &ReductionSpec,
) -> Result<Option<f64>> {
    spec.validate()?;

    let footprint = spec.geometry.footprint(spec.scale);
    let (rows, cols) = transform.window(&footprint);
    let visited = (rows.len() * cols.len()) as u64;
    if visited > spec.max_pixels {
        return Err(SeriesError::TooManyPixels {
            count: visited,
            max: spec.max_pixels,
        });
    }

    if visited == 0 {
        let anchor = spec.geometry.anchor();
        return Ok(transform
            .pixel_at(anchor.lon, anchor.lat)
            .and_then(|(row, col)| band.value(row, col)));
    }

    match spec.statistic {
        Statistic::Mean => {
            let mut sum = 0.0f64;
            let mut count = 0usize;
            for row in rows {
                for col in cols.clone() {
                    if let Some(v) = band.value(row, col) {
                        sum += v;
                        count += 1;
                    }
                }
            }
            Ok((count > 0).then(|| sum / count as f64))
        }
    }
}
