use std::collections::{HashMap, HashSet};

use ndarray::Array2;

use crate::error::{Result, SeriesError};
use crate::record::{Band, ImageRecord, TemporalResolution};

use super::ImageCollection;

/// Collection held entirely in memory.
///
/// A schema band with no stored raster for an image reads back fully masked,
/// the same as an acquisition with no valid pixels for that band.
#[derive(Clone, Debug)]
pub struct MemoryCollection {
    name: String,
    band_names: Vec<String>,
    resolution: TemporalResolution,
    records: Vec<ImageRecord>,
    ids: HashSet<String>,
    rasters: HashMap<(usize, String), Band>,
}

impl MemoryCollection {
    pub fn new<I, S>(name: &str, band_names: I, resolution: TemporalResolution) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            band_names: band_names.into_iter().map(Into::into).collect(),
            resolution,
            records: Vec::new(),
            ids: HashSet::new(),
            rasters: HashMap::new(),
        }
    }

    /// Append an image with its band rasters. Bands outside the schema and
    /// ids already in the collection are rejected.
    pub fn push(&mut self, record: ImageRecord, bands: Vec<(&str, Band)>) -> Result<()> {
        if self.ids.contains(&record.id) {
            return Err(SeriesError::InvalidManifest(format!(
                "duplicate image id '{}' in collection '{}'",
                record.id, self.name
            )));
        }
        if let Some((name, _)) = bands.iter().find(|(name, _)| !self.has_band(name)) {
            return Err(SeriesError::MissingBand {
                band: name.to_string(),
                collection: self.name.clone(),
            });
        }
        let index = self.records.len();
        for (name, band) in bands {
            self.rasters.insert((index, name.to_string()), band);
        }
        self.ids.insert(record.id.clone());
        self.records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ImageCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn band_names(&self) -> &[String] {
        &self.band_names
    }

    fn temporal_resolution(&self) -> TemporalResolution {
        self.resolution
    }

    fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    fn read_band(&self, index: usize, band: &str) -> Result<Band> {
        if !self.has_band(band) {
            return Err(SeriesError::MissingBand {
                band: band.to_string(),
                collection: self.name.clone(),
            });
        }
        let record = self.records.get(index).ok_or_else(|| {
            SeriesError::InvalidManifest(format!(
                "no image at position {index} in collection '{}'",
                self.name
            ))
        })?;
        match self.rasters.get(&(index, band.to_string())) {
            Some(b) => Ok(b.clone()),
            None => {
                let shape = (record.transform.rows, record.transform.cols);
                Ok(Band::new(Array2::from_elem(shape, f64::NAN)))
            }
        }
    }
}
