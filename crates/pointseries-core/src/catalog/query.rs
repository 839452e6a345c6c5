use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SeriesError};
use crate::geometry::{BoundingBox, Geometry};
use crate::record::{Band, ImageRecord};

use super::ImageCollection;

/// Calendar date range, start inclusive, end exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SeriesError::Configuration(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        let start = self.start.and_time(chrono::NaiveTime::MIN);
        let end = self.end.and_time(chrono::NaiveTime::MIN);
        *t >= start && *t < end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Keep images whose `property` is strictly below `threshold`. Images that
/// lack the property are dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityFilter {
    pub property: String,
    pub threshold: f64,
}

impl QualityFilter {
    pub fn admits(&self, record: &ImageRecord) -> bool {
        record
            .property(&self.property)
            .is_some_and(|v| v < self.threshold)
    }
}

/// Date, bounds, quality and band selection over a collection.
#[derive(Clone, Debug)]
pub struct CollectionQuery {
    pub date_range: DateRange,
    pub bounds: BoundingBox,
    pub quality: Option<QualityFilter>,
    pub bands: Vec<String>,
}

impl CollectionQuery {
    pub fn new(date_range: DateRange, geometry: &Geometry) -> Self {
        Self {
            date_range,
            bounds: geometry.bounds(),
            quality: None,
            bands: Vec::new(),
        }
    }

    pub fn with_quality_filter(mut self, filter: QualityFilter) -> Self {
        self.quality = Some(filter);
        self
    }

    pub fn select<I, S>(mut self, bands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bands = bands.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, record: &ImageRecord) -> bool {
        self.date_range.contains(&record.time_start)
            && record.transform.footprint().intersects(&self.bounds)
            && self.quality.as_ref().is_none_or(|q| q.admits(record))
    }

    /// Validate the band selection against the collection schema and return
    /// a lazy iterator over the matching images.
    pub fn apply<'a>(&'a self, collection: &'a dyn ImageCollection) -> Result<QueryResult<'a>> {
        for band in &self.bands {
            if !collection.has_band(band) {
                return Err(SeriesError::MissingBand {
                    band: band.clone(),
                    collection: collection.name().to_string(),
                });
            }
        }
        debug!(
            collection = collection.name(),
            bands = ?self.bands,
            range = %self.date_range,
            "Query validated"
        );
        Ok(QueryResult {
            query: self,
            collection,
            inner: collection.records().iter().enumerate(),
        })
    }
}

/// Lazy, band-restricted view of the images a query matched.
pub struct QueryResult<'a> {
    query: &'a CollectionQuery,
    collection: &'a dyn ImageCollection,
    inner: std::iter::Enumerate<std::slice::Iter<'a, ImageRecord>>,
}

impl<'a> Iterator for QueryResult<'a> {
    type Item = SelectedImage<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, record) in self.inner.by_ref() {
            if self.query.matches(record) {
                return Some(SelectedImage {
                    index,
                    record,
                    collection: self.collection,
                    bands: &self.query.bands,
                });
            }
        }
        None
    }
}

/// One matched image, with access restricted to the selected bands.
#[derive(Clone, Copy)]
pub struct SelectedImage<'a> {
    /// Position in the collection's iteration order
    pub index: usize,
    pub record: &'a ImageRecord,
    collection: &'a dyn ImageCollection,
    bands: &'a [String],
}

impl<'a> SelectedImage<'a> {
    pub fn read_band(&self, band: &str) -> Result<Band> {
        if !self.bands.iter().any(|b| b == band) {
            return Err(SeriesError::MissingBand {
                band: band.to_string(),
                collection: self.collection.name().to_string(),
            });
        }
        let data = self.collection.read_band(self.index, band)?;
        let (rows, cols) = (self.record.transform.rows, self.record.transform.cols);
        if data.rows() != rows || data.cols() != cols {
            return Err(SeriesError::BandShapeMismatch {
                image: self.record.id.clone(),
                band: band.to_string(),
                rows,
                cols,
                actual_rows: data.rows(),
                actual_cols: data.cols(),
            });
        }
        Ok(data)
    }
}
