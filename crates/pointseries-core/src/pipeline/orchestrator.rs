use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::catalog::{CollectionQuery, ImageCollection, SelectedImage};
use crate::consts::PARALLEL_IMAGE_THRESHOLD;
use crate::derived::{DerivedVariableSpec, EvaluationOrder};
use crate::error::{Result, SeriesError};
use crate::export::{export_series, ExportOutcome, Exporter};
use crate::record::Band;
use crate::reduce::{reduce_band, NullFilter, ReductionSpec};
use crate::retry::RetryPolicy;
use crate::series::{FeatureAssembler, TimeFormat, TimeSeries, TimeSeriesCollector};

use super::config::PipelineConfig;
use super::types::{CancelToken, NoOpReporter, PipelineStage, ProgressReporter};

/// Outcome of one pipeline run, before export.
#[derive(Clone, Debug)]
pub struct PipelineRun {
    pub series: TimeSeries,
    /// Images the query matched
    pub matched: usize,
    /// Matched images dropped for an undefined value
    pub dropped: usize,
}

/// Run the pipeline without progress reporting or cancellation.
pub fn run_pipeline(
    config: &PipelineConfig,
    collection: &dyn ImageCollection,
) -> Result<PipelineRun> {
    run_pipeline_reported(
        config,
        collection,
        Arc::new(NoOpReporter),
        &CancelToken::new(),
    )
}

/// Query, derive, reduce, filter and collect, with a thread-safe progress
/// reporter. Returns once every in-flight image has finished.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    collection: &dyn ImageCollection,
    reporter: Arc<dyn ProgressReporter>,
    cancel: &CancelToken,
) -> Result<PipelineRun> {
    config.validate()?;
    let spec = config.derived_spec()?;
    let reduction = config.reduction_spec();
    let geometry = reduction.geometry;

    reporter.begin_stage(PipelineStage::Querying, None);
    let mut query =
        CollectionQuery::new(config.date_range()?, &geometry).select(spec.input_bands());
    if let Some(filter) = config.quality_filter() {
        query = query.with_quality_filter(filter);
    }
    let selected: Vec<SelectedImage> = query.apply(collection)?.collect();
    let matched = selected.len();
    info!(
        collection = collection.name(),
        matched,
        total = collection.records().len(),
        geometry = %geometry,
        "Collection filtered"
    );
    reporter.finish_stage();

    let format = config
        .time_format
        .unwrap_or_else(|| TimeFormat::for_resolution(collection.temporal_resolution()));
    let assembler = FeatureAssembler::new(format);
    let collector = TimeSeriesCollector::new(format.column_name(), spec.output_name());
    let null_filter = NullFilter::new();
    let done = AtomicUsize::new(0);

    reporter.begin_stage(PipelineStage::Reducing, Some(matched));
    let process = |image: &SelectedImage| -> Result<()> {
        if cancel.is_cancelled() {
            return Err(SeriesError::Cancelled);
        }
        let value = evaluate_image(image, &spec, &reduction, &config.retry)?;
        if let Some(v) = null_filter.admit(&image.record.id, value) {
            debug!(image = %image.record.id, value = v, "Image reduced");
            collector.push(image.index, assembler.assemble(image.record.time_start, v));
        }
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(())
    };

    if matched >= PARALLEL_IMAGE_THRESHOLD {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers.unwrap_or(0))
            .build()
            .map_err(|e| SeriesError::Configuration(format!("worker pool: {e}")))?;
        pool.install(|| selected.par_iter().try_for_each(process))?;
    } else {
        selected.iter().try_for_each(process)?;
    }
    reporter.finish_stage();

    if cancel.is_cancelled() {
        return Err(SeriesError::Cancelled);
    }

    reporter.begin_stage(PipelineStage::Collecting, None);
    let series = collector.finish(config.order);
    let dropped = null_filter.dropped();
    info!(
        rows = series.size(),
        dropped,
        column = %series.value_column,
        order = %config.order,
        "Time series assembled"
    );
    reporter.finish_stage();

    Ok(PipelineRun {
        series,
        matched,
        dropped,
    })
}

/// Run the pipeline and hand the result to `exporter`. An empty series is
/// reported, not exported.
pub fn run_and_export(
    config: &PipelineConfig,
    collection: &dyn ImageCollection,
    exporter: &dyn Exporter,
    reporter: Arc<dyn ProgressReporter>,
    cancel: &CancelToken,
) -> Result<(PipelineRun, ExportOutcome)> {
    let run = run_pipeline_reported(config, collection, reporter.clone(), cancel)?;

    reporter.begin_stage(PipelineStage::Exporting, None);
    let outcome = export_series(
        exporter,
        &run.series,
        &config.export_target(),
        &config.retry,
    )?;
    reporter.finish_stage();
    Ok((run, outcome))
}

/// Derive and reduce one image to a single value, `None` when undefined.
fn evaluate_image(
    image: &SelectedImage,
    spec: &DerivedVariableSpec,
    reduction: &ReductionSpec,
    retry: &RetryPolicy,
) -> Result<Option<f64>> {
    let transform = &image.record.transform;
    let read = |band: &str| -> Result<Band> { retry.run("read_band", || image.read_band(band)) };

    match spec.evaluation {
        EvaluationOrder::PerPixel => {
            let inputs = spec
                .input_bands()
                .into_iter()
                .map(read)
                .collect::<Result<Vec<_>>>()?;
            let derived = spec.derive_band(&inputs)?;
            reduce_band(&derived, transform, reduction)
        }
        EvaluationOrder::PerReducedScalar => {
            let reduced = spec
                .input_bands()
                .into_iter()
                .map(|name| reduce_band(&read(name)?, transform, reduction))
                .collect::<Result<Vec<_>>>()?;
            Ok(spec.evaluate_reduced(&reduced))
        }
    }
}
