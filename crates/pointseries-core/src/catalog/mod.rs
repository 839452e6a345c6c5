//! Image collections: the catalog seam the pipeline reads imagery through.

pub mod manifest;
pub mod memory;
pub mod query;

pub use manifest::ManifestCollection;
pub use memory::MemoryCollection;
pub use query::{CollectionQuery, DateRange, QualityFilter, QueryResult, SelectedImage};

use crate::error::Result;
use crate::record::{Band, ImageRecord, TemporalResolution};

/// A time-ordered collection of images sharing one band schema.
///
/// Implementors own the pixel storage; the pipeline only ever sees record
/// metadata and the individual bands it asks for.
pub trait ImageCollection: Send + Sync {
    /// Catalog identifier, e.g. `COPERNICUS/S2_SR`.
    fn name(&self) -> &str;

    /// Band names every image in the collection carries.
    fn band_names(&self) -> &[String];

    fn temporal_resolution(&self) -> TemporalResolution;

    /// Image metadata in catalog iteration order.
    fn records(&self) -> &[ImageRecord];

    /// Read one band of the image at `index` in `records()`. Asking for a
    /// band outside the schema is a `MissingBand` error.
    fn read_band(&self, index: usize, band: &str) -> Result<Band>;

    fn has_band(&self, band: &str) -> bool {
        self.band_names().iter().any(|b| b == band)
    }
}
