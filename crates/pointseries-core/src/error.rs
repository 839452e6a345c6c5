use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Band '{band}' not found in collection '{collection}'")]
    MissingBand { band: String, collection: String },

    #[error("Reduction covers {count} pixels, exceeding max_pixels = {max}")]
    TooManyPixels { count: u64, max: u64 },

    #[error("Band '{band}' of image '{image}' is {actual_rows}x{actual_cols}, expected {rows}x{cols}")]
    BandShapeMismatch {
        image: String,
        band: String,
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Invalid collection manifest: {0}")]
    InvalidManifest(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Pipeline run cancelled")]
    Cancelled,

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SeriesError {
    /// Whether the error is a transient backend condition worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::BackendUnavailable(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted
                    | std::io::ErrorKind::TimedOut
                    | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeriesError>;
