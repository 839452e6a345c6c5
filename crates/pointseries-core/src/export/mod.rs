//! Export sink seam and the local CSV implementation.

pub mod csv_sink;

pub use csv_sink::CsvExporter;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::retry::RetryPolicy;
use crate::series::TimeSeries;

/// Where an exported table goes: `<folder>/<description>.csv` under the
/// sink's root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportTarget {
    pub folder: String,
    pub description: String,
}

/// Persists a finished time series.
pub trait Exporter: Send + Sync {
    fn name(&self) -> &str;

    /// Write the series and return the artifact location.
    fn export(&self, series: &TimeSeries, target: &ExportTarget) -> Result<PathBuf>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    /// Nothing to write; a diagnostic was emitted instead
    SkippedEmpty,
}

/// Hand `series` to `exporter`, unless it is empty.
pub fn export_series(
    exporter: &dyn Exporter,
    series: &TimeSeries,
    target: &ExportTarget,
    retry: &RetryPolicy,
) -> Result<ExportOutcome> {
    if series.is_empty() {
        warn!(
            "No {} data available for the specified location and time range.",
            series.value_column
        );
        return Ok(ExportOutcome::SkippedEmpty);
    }

    let path = retry.run("export", || exporter.export(series, target))?;
    info!(
        sink = exporter.name(),
        path = %path.display(),
        rows = series.size(),
        "Exported time series"
    );
    Ok(ExportOutcome::Written {
        path,
        rows: series.size(),
    })
}
