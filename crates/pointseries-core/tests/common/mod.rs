use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use ndarray::Array2;

use pointseries_core::catalog::MemoryCollection;
use pointseries_core::geometry::{GeoTransform, Point};
use pointseries_core::pipeline::config::PipelineConfig;
use pointseries_core::pipeline::Preset;
use pointseries_core::record::{Band, ImageRecord, TemporalResolution};

pub const GRID_SIZE: usize = 20;

/// 20x20 grid of 0.001° pixels covering lon 11.18–11.20, lat 46.12–46.14.
pub fn site_grid() -> GeoTransform {
    GeoTransform::new(11.18, 46.14, 0.001, -0.001, GRID_SIZE, GRID_SIZE)
}

/// A point inside `site_grid`.
pub fn site_point() -> Point {
    Point::new(11.19001, 46.130962)
}

pub fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid test datetime")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn record(id: &str, time_start: &str, properties: &[(&str, f64)]) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        time_start: datetime(time_start),
        properties: properties
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
        transform: site_grid(),
    }
}

pub fn uniform(value: f64) -> Band {
    Band::new(Array2::from_elem((GRID_SIZE, GRID_SIZE), value))
}

/// Sentinel-2-like collection. Each entry: (time_start, red, nir, cloud %).
pub fn s2_collection(images: &[(&str, f64, f64, f64)]) -> MemoryCollection {
    let mut c = MemoryCollection::new("COPERNICUS/S2_SR", ["B4", "B8"], TemporalResolution::Daily);
    for (i, (t, red, nir, cloud)) in images.iter().enumerate() {
        c.push(
            record(
                &format!("s2_{i}"),
                t,
                &[("CLOUDY_PIXEL_PERCENTAGE", *cloud)],
            ),
            vec![("B4", uniform(*red)), ("B8", uniform(*nir))],
        )
        .expect("bands are in schema");
    }
    c
}

/// MODIS-like albedo collection. Each entry: (time_start, bsa, wsa); a
/// `None` leaves the band without data for that image.
pub fn modis_collection(images: &[(&str, Option<f64>, Option<f64>)]) -> MemoryCollection {
    let mut c = MemoryCollection::new(
        "MODIS/006/MCD43A3",
        ["Albedo_BSA_shortwave", "Albedo_WSA_shortwave"],
        TemporalResolution::Daily,
    );
    for (i, (t, bsa, wsa)) in images.iter().enumerate() {
        let mut bands = Vec::new();
        if let Some(v) = bsa {
            bands.push(("Albedo_BSA_shortwave", uniform(*v)));
        }
        if let Some(v) = wsa {
            bands.push(("Albedo_WSA_shortwave", uniform(*v)));
        }
        c.push(record(&format!("modis_{i}"), t, &[]), bands)
            .expect("bands are in schema");
    }
    c
}

/// ERA5-like hourly collection. Each entry: (time_start, net, downward).
pub fn era5_collection(images: &[(&str, f64, f64)]) -> MemoryCollection {
    let mut c = MemoryCollection::new(
        "ECMWF/ERA5_LAND/HOURLY",
        [
            "surface_net_solar_radiation",
            "surface_solar_radiation_downwards",
        ],
        TemporalResolution::SubDaily,
    );
    for (i, (t, net, down)) in images.iter().enumerate() {
        c.push(
            record(&format!("era5_{i}"), t, &[]),
            vec![
                ("surface_net_solar_radiation", uniform(*net)),
                ("surface_solar_radiation_downwards", uniform(*down)),
            ],
        )
        .expect("bands are in schema");
    }
    c
}

/// Preset config pointed at the test site, with the given dates.
pub fn config_for(preset: Preset, start: &str, end: &str) -> PipelineConfig {
    preset.config(
        PathBuf::from("unused/manifest.toml"),
        site_point(),
        date(start),
        date(end),
    )
}
