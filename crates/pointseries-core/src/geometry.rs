//! Query geometries and the north-up pixel grid images are sampled on.
//!
//! All coordinates are decimal degrees (longitude, latitude). Distances given
//! in meters are converted to degrees with a spherical approximation, which is
//! accurate enough for footprints of a few kilometers.

use serde::{Deserialize, Serialize};

use crate::consts::METERS_PER_DEGREE;
use crate::error::{Result, SeriesError};

/// A geographic location in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(SeriesError::Configuration(format!(
                "longitude {} outside [-180, 180]",
                self.lon
            )));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(SeriesError::Configuration(format!(
                "latitude {} outside [-90, 90]",
                self.lat
            )));
        }
        Ok(())
    }

    /// Square of side `size_m` meters centered on this point.
    pub fn square(&self, size_m: f64) -> BoundingBox {
        let (half_lon, half_lat) = meters_to_degrees(size_m / 2.0, self.lat);
        BoundingBox {
            west: self.lon - half_lon,
            south: self.lat - half_lat,
            east: self.lon + half_lon,
            north: self.lat + half_lat,
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lon, self.lat)
    }
}

/// Axis-aligned box in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west <= other.east
            && other.west <= self.east
            && self.south <= other.north
            && other.south <= self.north
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.west + self.east) / 2.0,
            (self.south + self.north) / 2.0,
        )
    }

    /// Width and height in meters, measured at the box's central latitude.
    pub fn size_m(&self) -> (f64, f64) {
        let lat = self.center().lat;
        let width = (self.east - self.west) * METERS_PER_DEGREE * lat.to_radians().cos();
        let height = (self.north - self.south) * METERS_PER_DEGREE;
        (width.abs(), height.abs())
    }
}

/// The geometry a reduction is evaluated over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    Region(BoundingBox),
}

impl Geometry {
    /// Degree-space extent used for catalog bounds filtering.
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Self::Point(p) => BoundingBox {
                west: p.lon,
                south: p.lat,
                east: p.lon,
                north: p.lat,
            },
            Self::Region(b) => *b,
        }
    }

    /// Location used when the footprint is finer than one native pixel.
    pub fn anchor(&self) -> Point {
        match self {
            Self::Point(p) => *p,
            Self::Region(b) => b.center(),
        }
    }

    /// Number of `scale`-sized cells the geometry covers.
    pub fn cell_count(&self, scale: f64) -> u64 {
        match self {
            Self::Point(_) => 1,
            Self::Region(b) => {
                let (w, h) = b.size_m();
                let cols = (w / scale).ceil().max(1.0);
                let rows = (h / scale).ceil().max(1.0);
                (cols * rows) as u64
            }
        }
    }

    /// Area sampled by a reduction at `scale` meters per pixel.
    pub fn footprint(&self, scale: f64) -> BoundingBox {
        match self {
            Self::Point(p) => p.square(scale),
            Self::Region(b) => *b,
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Point(p) => write!(f, "Point {p}"),
            Self::Region(b) => write!(
                f,
                "Region [{:.6}, {:.6}, {:.6}, {:.6}]",
                b.west, b.south, b.east, b.north
            ),
        }
    }
}

/// Convert a distance in meters to (degrees of longitude, degrees of latitude)
/// at the given latitude.
pub fn meters_to_degrees(meters: f64, lat: f64) -> (f64, f64) {
    let dlat = meters / METERS_PER_DEGREE;
    let cos_lat = lat.to_radians().cos().max(1e-6);
    (dlat / cos_lat, dlat)
}

/// North-up pixel grid of an image.
///
/// ```text
/// lon = origin_lon + col * pixel_width
/// lat = origin_lat + row * pixel_height   (pixel_height < 0)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// Longitude of the upper-left corner
    pub origin_lon: f64,
    /// Latitude of the upper-left corner
    pub origin_lat: f64,
    /// Pixel width in degrees (positive)
    pub pixel_width: f64,
    /// Pixel height in degrees (negative for north-up)
    pub pixel_height: f64,
    pub cols: usize,
    pub rows: usize,
}

impl GeoTransform {
    pub fn new(
        origin_lon: f64,
        origin_lat: f64,
        pixel_width: f64,
        pixel_height: f64,
        cols: usize,
        rows: usize,
    ) -> Self {
        Self {
            origin_lon,
            origin_lat,
            pixel_width,
            pixel_height,
            cols,
            rows,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.pixel_width > 0.0) || !(self.pixel_height < 0.0) {
            return Err(SeriesError::InvalidManifest(format!(
                "grid must be north-up with pixel_width > 0 and pixel_height < 0, got {} / {}",
                self.pixel_width, self.pixel_height
            )));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(SeriesError::InvalidManifest(
                "grid has zero rows or columns".into(),
            ));
        }
        Ok(())
    }

    /// Center of pixel (row, col).
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        let lon = self.origin_lon + (col as f64 + 0.5) * self.pixel_width;
        let lat = self.origin_lat + (row as f64 + 0.5) * self.pixel_height;
        (lon, lat)
    }

    /// Pixel (row, col) containing the location, if it lies on the grid.
    pub fn pixel_at(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let col = ((lon - self.origin_lon) / self.pixel_width).floor();
        let row = ((lat - self.origin_lat) / self.pixel_height).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((row as usize, col as usize))
    }

    /// Inclusive-exclusive row and column ranges whose pixel centers fall
    /// inside `bbox`, clipped to the grid.
    pub fn window(&self, bbox: &BoundingBox) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let col_start = ((bbox.west - self.origin_lon) / self.pixel_width - 0.5).ceil();
        let col_end = ((bbox.east - self.origin_lon) / self.pixel_width - 0.5).floor() + 1.0;
        let row_start = ((bbox.north - self.origin_lat) / self.pixel_height - 0.5).ceil();
        let row_end = ((bbox.south - self.origin_lat) / self.pixel_height - 0.5).floor() + 1.0;

        let clip = |v: f64, max: usize| v.clamp(0.0, max as f64) as usize;
        let rows = clip(row_start, self.rows)..clip(row_end, self.rows);
        let cols = clip(col_start, self.cols)..clip(col_end, self.cols);
        (rows, cols)
    }

    pub fn footprint(&self) -> BoundingBox {
        let east = self.origin_lon + self.cols as f64 * self.pixel_width;
        let south = self.origin_lat + self.rows as f64 * self.pixel_height;
        BoundingBox {
            west: self.origin_lon,
            south,
            east,
            north: self.origin_lat,
        }
    }
}
