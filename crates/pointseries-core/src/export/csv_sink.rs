use std::path::{Path, PathBuf};

use crate::error::{Result, SeriesError};
use crate::series::TimeSeries;

use super::{ExportTarget, Exporter};

/// Writes `<root>/<folder>/<description>.csv` with a header row.
#[derive(Clone, Debug)]
pub struct CsvExporter {
    root: PathBuf,
}

impl CsvExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, target: &ExportTarget) -> PathBuf {
        self.root
            .join(&target.folder)
            .join(format!("{}.csv", target.description))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Exporter for CsvExporter {
    fn name(&self) -> &str {
        "csv"
    }

    fn export(&self, series: &TimeSeries, target: &ExportTarget) -> Result<PathBuf> {
        if target.description.trim().is_empty() {
            return Err(SeriesError::Configuration(
                "export description must not be empty".into(),
            ));
        }
        let path = self.path_for(target);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([series.time_column.as_str(), series.value_column.as_str()])?;
        for row in &series.rows {
            writer.write_record([row.time.as_str(), row.value.to_string().as_str()])?;
        }
        writer.flush()?;
        Ok(path)
    }
}
