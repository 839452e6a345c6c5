#[allow(dead_code)]
mod common;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use pointseries_core::error::{Result, SeriesError};
use pointseries_core::export::{export_series, CsvExporter, ExportOutcome, ExportTarget, Exporter};
use pointseries_core::retry::RetryPolicy;
use pointseries_core::series::{FeatureAssembler, TimeFormat, TimeSeries};

use common::datetime;

fn series(format: TimeFormat, column: &str, rows: &[(&str, f64)]) -> TimeSeries {
    let assembler = FeatureAssembler::new(format);
    TimeSeries {
        time_column: format.column_name().to_string(),
        value_column: column.to_string(),
        rows: rows
            .iter()
            .map(|(t, v)| assembler.assemble(datetime(t), *v))
            .collect(),
    }
}

fn target(folder: &str, description: &str) -> ExportTarget {
    ExportTarget {
        folder: folder.into(),
        description: description.into(),
    }
}

/// Fails with a transient error `failures` times, then succeeds.
struct FlakyExporter {
    failures: u32,
    calls: AtomicU32,
}

impl Exporter for FlakyExporter {
    fn name(&self) -> &str {
        "flaky"
    }

    fn export(&self, _series: &TimeSeries, target: &ExportTarget) -> Result<PathBuf> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(SeriesError::BackendUnavailable("sink busy".into()));
        }
        Ok(PathBuf::from(&target.description))
    }
}

fn fast_retry(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts: attempts,
        initial_backoff_ms: 1,
    }
}

#[test]
fn test_csv_layout() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let s = series(
        TimeFormat::Date,
        "LAI",
        &[("2024-06-03 10:00:00", 2.25), ("2024-06-05 10:00:00", -0.118)],
    );

    let outcome = export_series(&exporter, &s, &target("LAI", "LAI_TimeSeries"), &RetryPolicy::none())
        .unwrap();
    let path = dir.path().join("LAI").join("LAI_TimeSeries.csv");
    assert_eq!(
        outcome,
        ExportOutcome::Written {
            path: path.clone(),
            rows: 2
        }
    );

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "date,LAI\n2024-06-03,2.25\n2024-06-05,-0.118\n");
}

#[test]
fn test_csv_date_time_column() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let s = series(
        TimeFormat::DateTime,
        "clear_sky_index",
        &[("2024-07-01 12:00:00", 0.75)],
    );
    let path = exporter
        .export(&s, &target("Atmospheric_Transmissivity", "ClearSkyIndexTimeSeries"))
        .unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(text, "time,clear_sky_index\n2024-07-01 12:00:00,0.75\n");
}

#[test]
fn test_empty_series_not_exported() {
    let exporter = FlakyExporter {
        failures: 0,
        calls: AtomicU32::new(0),
    };
    let s = series(TimeFormat::Date, "albedo", &[]);
    let outcome =
        export_series(&exporter, &s, &target("albedo", "albedo_time_series"), &RetryPolicy::none())
            .unwrap();
    assert_eq!(outcome, ExportOutcome::SkippedEmpty);
    assert_eq!(exporter.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_transient_export_failure_retried() {
    let exporter = FlakyExporter {
        failures: 2,
        calls: AtomicU32::new(0),
    };
    let s = series(TimeFormat::Date, "albedo", &[("2023-01-01 00:00:00", 0.2)]);
    let outcome = export_series(&exporter, &s, &target("albedo", "a"), &fast_retry(3)).unwrap();
    assert!(matches!(outcome, ExportOutcome::Written { rows: 1, .. }));
    assert_eq!(exporter.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_retries_exhausted() {
    let exporter = FlakyExporter {
        failures: 10,
        calls: AtomicU32::new(0),
    };
    let s = series(TimeFormat::Date, "albedo", &[("2023-01-01 00:00:00", 0.2)]);
    let err = export_series(&exporter, &s, &target("albedo", "a"), &fast_retry(2)).unwrap_err();
    assert!(matches!(err, SeriesError::BackendUnavailable(_)));
    assert_eq!(exporter.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_empty_description_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = CsvExporter::new(dir.path());
    let s = series(TimeFormat::Date, "LAI", &[("2024-06-03 10:00:00", 1.0)]);
    let err = exporter.export(&s, &target("LAI", "  ")).unwrap_err();
    assert!(matches!(err, SeriesError::Configuration(_)));
}

#[test]
fn test_non_transient_error_not_retried() {
    let calls = AtomicU32::new(0);
    let err = fast_retry(5)
        .run("op", || -> Result<()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SeriesError::Configuration("bad".into()))
        })
        .unwrap_err();
    assert!(matches!(err, SeriesError::Configuration(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
