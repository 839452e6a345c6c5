//! Collections described by a TOML manifest next to their band rasters.
//!
//! ```toml
//! name = "COPERNICUS/S2_SR"
//! temporal_resolution = "daily"
//! bands = ["B4", "B8"]
//!
//! [band_options.B4]
//! nodata = 0
//!
//! [[images]]
//! id = "20240603T102021"
//! time_start = "2024-06-03T10:20:21"
//! properties = { CLOUDY_PIXEL_PERCENTAGE = 12.5 }
//! grid = { origin_lon = 11.18, origin_lat = 46.14, pixel_width = 0.0001, pixel_height = -0.0001, cols = 64, rows = 64 }
//! bands = { B4 = "20240603/B4.png", B8 = "20240603/B8.png" }
//! ```
//!
//! Band files are single-channel 8- or 16-bit gray rasters. Stored values
//! are read raw (`value * scale + offset`, identity by default); the
//! collection's own fixed-point encodings are undone by the derived-variable
//! formulas.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use image::DynamicImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SeriesError};
use crate::geometry::GeoTransform;
use crate::record::{Band, ImageRecord, TemporalResolution};

use super::ImageCollection;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub temporal_resolution: TemporalResolution,
    pub bands: Vec<String>,
    #[serde(default)]
    pub band_options: BTreeMap<String, BandOptions>,
    #[serde(default)]
    pub images: Vec<ManifestImage>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BandOptions {
    /// Raw stored value marking missing pixels
    pub nodata: Option<f64>,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub offset: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for BandOptions {
    fn default() -> Self {
        Self {
            nodata: None,
            scale: 1.0,
            offset: 0.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ManifestImage {
    pub id: String,
    pub time_start: NaiveDateTime,
    #[serde(default)]
    pub properties: BTreeMap<String, f64>,
    pub grid: GeoTransform,
    /// Band name → raster path, relative to the manifest directory
    #[serde(default)]
    pub bands: BTreeMap<String, PathBuf>,
}

impl Manifest {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(SeriesError::InvalidManifest(format!(
                "collection '{}' declares no bands",
                self.name
            )));
        }
        for name in self.band_options.keys() {
            if !self.bands.contains(name) {
                return Err(SeriesError::InvalidManifest(format!(
                    "options given for undeclared band '{name}'"
                )));
            }
        }
        let mut ids = HashSet::with_capacity(self.images.len());
        for image in &self.images {
            if !ids.insert(image.id.as_str()) {
                return Err(SeriesError::InvalidManifest(format!(
                    "duplicate image id '{}' in '{}'",
                    image.id, self.name
                )));
            }
            image.grid.validate()?;
            for band in image.bands.keys() {
                if !self.bands.contains(band) {
                    return Err(SeriesError::MissingBand {
                        band: band.clone(),
                        collection: self.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Collection backed by a manifest file and band rasters on disk.
///
/// A declared band with no file listed for an image reads back fully masked.
#[derive(Clone, Debug)]
pub struct ManifestCollection {
    manifest: Manifest,
    base_dir: PathBuf,
    records: Vec<ImageRecord>,
}

impl ManifestCollection {
    pub fn open(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let manifest = Manifest::from_toml_str(&contents)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        info!(
            collection = %manifest.name,
            images = manifest.images.len(),
            bands = ?manifest.bands,
            "Opened collection manifest"
        );
        Self::from_manifest(manifest, base_dir)
    }

    /// Wrap an already-parsed manifest; raster paths resolve against
    /// `base_dir`.
    pub fn from_manifest(manifest: Manifest, base_dir: PathBuf) -> Result<Self> {
        manifest.validate()?;
        let records = manifest
            .images
            .iter()
            .map(|img| ImageRecord {
                id: img.id.clone(),
                time_start: img.time_start,
                properties: img.properties.clone(),
                transform: img.grid,
            })
            .collect();
        Ok(Self {
            manifest,
            base_dir,
            records,
        })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    fn image_entry(&self, index: usize) -> Result<&ManifestImage> {
        self.manifest.images.get(index).ok_or_else(|| {
            SeriesError::InvalidManifest(format!(
                "no image at position {index} in '{}'",
                self.manifest.name
            ))
        })
    }
}

impl ImageCollection for ManifestCollection {
    fn name(&self) -> &str {
        &self.manifest.name
    }

    fn band_names(&self) -> &[String] {
        &self.manifest.bands
    }

    fn temporal_resolution(&self) -> TemporalResolution {
        self.manifest.temporal_resolution
    }

    fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    fn read_band(&self, index: usize, band: &str) -> Result<Band> {
        if !self.has_band(band) {
            return Err(SeriesError::MissingBand {
                band: band.to_string(),
                collection: self.manifest.name.clone(),
            });
        }
        let entry = self.image_entry(index)?;
        let options = self
            .manifest
            .band_options
            .get(band)
            .cloned()
            .unwrap_or_default();

        let Some(relative) = entry.bands.get(band) else {
            debug!(image = %entry.id, band, "No raster listed, band fully masked");
            let shape = (entry.grid.rows, entry.grid.cols);
            return Ok(Band::new(Array2::from_elem(shape, f64::NAN)));
        };

        let path = self.base_dir.join(relative);
        let raw = load_raster(&path)?;
        Ok(decode_band(raw, &options))
    }
}

/// Load a single-channel 8- or 16-bit gray raster as raw stored values.
///
/// Any other pixel layout is rejected rather than converted, since a
/// conversion would rescale or mix the stored values.
pub fn load_raster(path: &Path) -> Result<Array2<f64>> {
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut data = Array2::<f64>::zeros((h, w));

    match img {
        DynamicImage::ImageLuma8(gray) => {
            for (col, row, pixel) in gray.enumerate_pixels() {
                data[[row as usize, col as usize]] = pixel.0[0] as f64;
            }
        }
        DynamicImage::ImageLuma16(gray) => {
            for (col, row, pixel) in gray.enumerate_pixels() {
                data[[row as usize, col as usize]] = pixel.0[0] as f64;
            }
        }
        other => {
            return Err(SeriesError::InvalidManifest(format!(
                "{} is {:?}, expected a single-channel 8- or 16-bit gray raster",
                path.display(),
                other.color()
            )));
        }
    }

    Ok(data)
}

/// Apply no-data masking and the linear decoding to raw stored values.
fn decode_band(mut raw: Array2<f64>, options: &BandOptions) -> Band {
    let nodata = options.nodata;
    raw.mapv_inplace(|v| match nodata {
        Some(nd) if v == nd => f64::NAN,
        _ => v * options.scale + options.offset,
    });
    Band::new(raw)
}
