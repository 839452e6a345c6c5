/// Slope of the empirical NDVI → LAI relationship.
pub const LAI_NDVI_SLOPE: f64 = 3.618;

/// Intercept of the empirical NDVI → LAI relationship.
pub const LAI_NDVI_INTERCEPT: f64 = 0.118;

/// Fixed-point scale factor of MODIS MCD43A3 albedo bands.
pub const ALBEDO_SCALE_FACTOR: f64 = 0.001;

/// Default diffuse-fraction weight for blending black- and white-sky albedo.
pub const DEFAULT_DIFFUSE_FRACTION: f64 = 0.5;

/// Default pixel-count safety cap for a single reduction.
pub const DEFAULT_MAX_PIXELS: u64 = 1_000_000_000;

/// Meters per degree of latitude on the spherical approximation.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Default catalog property used for the cloud-cover quality filter.
pub const DEFAULT_CLOUD_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Timestamp format for daily composites.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for sub-daily (e.g. hourly reanalysis) collections.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Minimum image count before per-image work is fanned out across the pool.
pub const PARALLEL_IMAGE_THRESHOLD: usize = 4;

/// Default number of attempts for a backend call (first try included).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Backoff before the first retry; doubled on every further attempt.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 100;
