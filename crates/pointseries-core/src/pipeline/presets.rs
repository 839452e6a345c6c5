//! Ready-made configurations for the supported source collections.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::consts::{DEFAULT_CLOUD_PROPERTY, DEFAULT_DIFFUSE_FRACTION, DEFAULT_MAX_PIXELS};
use crate::derived::Variable;
use crate::geometry::Point;
use crate::retry::RetryPolicy;
use crate::series::RowOrder;

use super::config::{ExportConfig, PipelineConfig};

/// Calendar date usable in `const` items; an invalid literal fails the build.
const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid preset date"),
    }
}

const S2_START: NaiveDate = ymd(2024, 6, 1);
const MODIS_START: NaiveDate = ymd(2023, 1, 1);
const ERA5_START: NaiveDate = ymd(2024, 7, 1);
const EXAMPLE_END: NaiveDate = ymd(2024, 7, 11);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Sentinel-2 surface reflectance → LAI at 10 m
    Sentinel2Lai,
    /// MODIS MCD43A3 black/white-sky blend at 500 m
    ModisAlbedo,
    /// MODIS MCD43A3 black-sky albedo at 500 m
    ModisAlbedoBsa,
    /// ERA5-Land hourly clear-sky index at 1 km
    Era5ClearSky,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Self::Sentinel2Lai,
        Self::ModisAlbedo,
        Self::ModisAlbedoBsa,
        Self::Era5ClearSky,
    ];

    /// Catalog identifier of the source collection.
    pub fn collection_id(&self) -> &'static str {
        match self {
            Self::Sentinel2Lai => "COPERNICUS/S2_SR",
            Self::ModisAlbedo | Self::ModisAlbedoBsa => "MODIS/006/MCD43A3",
            Self::Era5ClearSky => "ECMWF/ERA5_LAND/HOURLY",
        }
    }

    pub fn variable(&self) -> Variable {
        match self {
            Self::Sentinel2Lai => Variable::lai(),
            Self::ModisAlbedo => Variable::blended_albedo(),
            Self::ModisAlbedoBsa => Variable::single_albedo(),
            Self::Era5ClearSky => Variable::clear_sky_index(),
        }
    }

    pub fn scale(&self) -> f64 {
        match self {
            Self::Sentinel2Lai => 10.0,
            Self::ModisAlbedo | Self::ModisAlbedoBsa => 500.0,
            Self::Era5ClearSky => 1000.0,
        }
    }

    pub fn cloud_threshold(&self) -> Option<f64> {
        match self {
            Self::Sentinel2Lai => Some(20.0),
            _ => None,
        }
    }

    pub fn export(&self) -> ExportConfig {
        let (folder, description) = match self {
            Self::Sentinel2Lai => ("LAI", "LAI_TimeSeries"),
            Self::ModisAlbedo => ("albedo", "albedo_time_series"),
            Self::ModisAlbedoBsa => ("albedo", "bsa_albedo_time_series"),
            Self::Era5ClearSky => ("Atmospheric_Transmissivity", "ClearSkyIndexTimeSeries"),
        };
        ExportConfig {
            root: PathBuf::from("exports"),
            folder: folder.to_string(),
            description: description.to_string(),
        }
    }

    /// Example site for the preset.
    pub fn default_point(&self) -> Point {
        match self {
            Self::Sentinel2Lai | Self::ModisAlbedo | Self::ModisAlbedoBsa => {
                Point::new(11.19001, 46.130962)
            }
            Self::Era5ClearSky => Point::new(-74.0060, 40.7128),
        }
    }

    /// Example date range for the preset, end exclusive.
    pub fn default_dates(&self) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Sentinel2Lai => (S2_START, EXAMPLE_END),
            Self::ModisAlbedo | Self::ModisAlbedoBsa => (MODIS_START, EXAMPLE_END),
            Self::Era5ClearSky => (ERA5_START, EXAMPLE_END),
        }
    }

    /// Full config for this preset at the given site and dates.
    pub fn config(
        &self,
        collection: PathBuf,
        point: Point,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> PipelineConfig {
        PipelineConfig {
            collection,
            start_date,
            end_date,
            cloud_threshold: self.cloud_threshold(),
            cloud_property: DEFAULT_CLOUD_PROPERTY.to_string(),
            scale: self.scale(),
            max_pixels: DEFAULT_MAX_PIXELS,
            diffuse_fraction: DEFAULT_DIFFUSE_FRACTION,
            region_buffer_m: None,
            evaluation: None,
            time_format: None,
            order: RowOrder::default(),
            workers: None,
            point,
            variable: self.variable(),
            export: self.export(),
            retry: RetryPolicy::default(),
        }
    }

    /// Config at the preset's example site and dates.
    pub fn default_config(&self, collection: PathBuf) -> PipelineConfig {
        let (start, end) = self.default_dates();
        self.config(collection, self.default_point(), start, end)
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentinel2Lai => write!(f, "Sentinel-2 LAI"),
            Self::ModisAlbedo => write!(f, "MODIS blended albedo"),
            Self::ModisAlbedoBsa => write!(f, "MODIS black-sky albedo"),
            Self::Era5ClearSky => write!(f, "ERA5-Land clear-sky index"),
        }
    }
}
