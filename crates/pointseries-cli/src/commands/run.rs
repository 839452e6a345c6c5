use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use pointseries_core::catalog::ManifestCollection;
use pointseries_core::export::CsvExporter;
use pointseries_core::geometry::Point;
use pointseries_core::pipeline::config::PipelineConfig;
use pointseries_core::pipeline::{run_and_export, CancelToken, Preset};
use pointseries_core::series::RowOrder;
use tracing::debug;

use super::PresetArg;
use crate::progress::BarReporter;
use crate::summary::{print_outcome, print_run_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum OrderArg {
    Catalog,
    Chronological,
}

#[derive(Args)]
pub struct RunArgs {
    /// Pipeline config file (TOML); other flags are ignored when given
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source collection and variable
    #[arg(long, value_enum, default_value = "sentinel2-lai")]
    pub preset: PresetArg,

    /// Collection manifest (TOML)
    #[arg(long)]
    pub collection: Option<PathBuf>,

    /// Longitude of the point, decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Latitude of the point, decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day, exclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Keep images with cloud cover below this percentage
    #[arg(long)]
    pub cloud_threshold: Option<f64>,

    /// Reduction scale in meters
    #[arg(long)]
    pub scale: Option<f64>,

    /// Pixel-count safety cap for one reduction
    #[arg(long)]
    pub max_pixels: Option<u64>,

    /// Diffuse-fraction weight for blended albedo (0-1)
    #[arg(long, default_value = "0.5")]
    pub diffuse_fraction: f64,

    /// Reduce over a square of this size in meters instead of the point
    #[arg(long)]
    pub buffer: Option<f64>,

    /// Output row order
    #[arg(long, value_enum, default_value = "catalog")]
    pub order: OrderArg,

    /// Worker threads (default: one per core)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Export root directory
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Export folder under the root
    #[arg(long)]
    pub folder: Option<String>,

    /// Export file name, without extension
    #[arg(long)]
    pub description: Option<String>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        PipelineConfig::from_toml_str(&contents).context("Invalid pipeline config")?
    } else {
        build_config_from_args(args)?
    };

    debug!(?config, "Resolved pipeline config");
    print_run_summary(&config);

    let collection = ManifestCollection::open(&config.collection).with_context(|| {
        format!("Failed to open collection {}", config.collection.display())
    })?;
    let exporter = CsvExporter::new(config.export.root.clone());
    let reporter = Arc::new(BarReporter::new());

    let (run, outcome) = run_and_export(
        &config,
        &collection,
        &exporter,
        reporter.clone(),
        &CancelToken::new(),
    )?;
    reporter.finish("Done");

    print_outcome(&run, &outcome);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<PipelineConfig> {
    let preset = Preset::from(args.preset);
    let Some(collection) = args.collection.clone() else {
        bail!("--collection is required when no --config is given");
    };

    let (default_start, default_end) = preset.default_dates();
    let default_point = preset.default_point();
    let point = Point::new(
        args.lon.unwrap_or(default_point.lon),
        args.lat.unwrap_or(default_point.lat),
    );

    let mut config = preset.config(
        collection,
        point,
        args.start.unwrap_or(default_start),
        args.end.unwrap_or(default_end),
    );
    if args.cloud_threshold.is_some() {
        config.cloud_threshold = args.cloud_threshold;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(max_pixels) = args.max_pixels {
        config.max_pixels = max_pixels;
    }
    config.diffuse_fraction = args.diffuse_fraction;
    config.region_buffer_m = args.buffer;
    config.order = match args.order {
        OrderArg::Catalog => RowOrder::Catalog,
        OrderArg::Chronological => RowOrder::Chronological,
    };
    config.workers = args.workers;
    if let Some(ref root) = args.out_dir {
        config.export.root = root.clone();
    }
    if let Some(ref folder) = args.folder {
        config.export.folder = folder.clone();
    }
    if let Some(ref description) = args.description {
        config.export.description = description.clone();
    }

    config.validate().context("Invalid pipeline options")?;
    Ok(config)
}
