use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{DateRange, QualityFilter};
use crate::consts::{DEFAULT_CLOUD_PROPERTY, DEFAULT_DIFFUSE_FRACTION, DEFAULT_MAX_PIXELS};
use crate::derived::{DerivedVariableSpec, EvaluationOrder, Variable};
use crate::error::{Result, SeriesError};
use crate::export::ExportTarget;
use crate::geometry::{Geometry, Point};
use crate::reduce::ReductionSpec;
use crate::retry::RetryPolicy;
use crate::series::{RowOrder, TimeFormat};

/// Everything one pipeline run needs. Fixed for the lifetime of the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Collection manifest to read imagery from
    pub collection: PathBuf,
    /// First acquisition day, inclusive
    pub start_date: NaiveDate,
    /// Last acquisition day, exclusive
    pub end_date: NaiveDate,
    /// Keep images whose `cloud_property` is below this percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_threshold: Option<f64>,
    #[serde(default = "default_cloud_property")]
    pub cloud_property: String,
    /// Nominal reduction resolution in meters
    pub scale: f64,
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
    /// Diffuse-fraction weight `f` for the blended albedo
    #[serde(default = "default_diffuse_fraction")]
    pub diffuse_fraction: f64,
    /// Reduce over a square of this size (meters) instead of the point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_buffer_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<TimeFormat>,
    #[serde(default)]
    pub order: RowOrder,
    /// Worker threads for per-image evaluation (default: one per core)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    pub point: Point,
    pub variable: Variable,
    pub export: ExportConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_cloud_property() -> String {
    DEFAULT_CLOUD_PROPERTY.to_string()
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_diffuse_fraction() -> f64 {
    DEFAULT_DIFFUSE_FRACTION
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory export folders are created under
    #[serde(default = "default_export_root")]
    pub root: PathBuf,
    pub folder: String,
    pub description: String,
}

fn default_export_root() -> PathBuf {
    PathBuf::from("exports")
}

impl PipelineConfig {
    /// Parse and validate a TOML config.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(contents)
            .map_err(|e| SeriesError::Configuration(format!("invalid pipeline config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.point.validate()?;
        self.date_range()?;
        self.reduction_spec().validate()?;
        self.derived_spec()?;
        if let Some(t) = self.cloud_threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(SeriesError::Configuration(format!(
                    "cloud_threshold {t} outside [0, 100]"
                )));
            }
        }
        if let Some(buffer) = self.region_buffer_m {
            if !buffer.is_finite() || buffer <= 0.0 {
                return Err(SeriesError::Configuration(format!(
                    "region_buffer_m must be positive, got {buffer}"
                )));
            }
        }
        if self.workers == Some(0) {
            return Err(SeriesError::Configuration(
                "workers must be at least 1".into(),
            ));
        }
        if self.export.description.trim().is_empty() {
            return Err(SeriesError::Configuration(
                "export.description must not be empty".into(),
            ));
        }
        self.retry.validate()
    }

    pub fn date_range(&self) -> Result<DateRange> {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn geometry(&self) -> Geometry {
        match self.region_buffer_m {
            Some(size) => Geometry::Region(self.point.square(size)),
            None => Geometry::Point(self.point),
        }
    }

    pub fn reduction_spec(&self) -> ReductionSpec {
        ReductionSpec::mean(self.geometry(), self.scale, self.max_pixels)
    }

    pub fn derived_spec(&self) -> Result<DerivedVariableSpec> {
        let spec = DerivedVariableSpec::new(self.variable.clone())
            .with_diffuse_fraction(self.diffuse_fraction)?;
        Ok(match self.evaluation {
            Some(order) => spec.with_evaluation(order),
            None => spec,
        })
    }

    pub fn quality_filter(&self) -> Option<QualityFilter> {
        self.cloud_threshold.map(|threshold| QualityFilter {
            property: self.cloud_property.clone(),
            threshold,
        })
    }

    pub fn export_target(&self) -> ExportTarget {
        ExportTarget {
            folder: self.export.folder.clone(),
            description: self.export.description.clone(),
        }
    }
}
