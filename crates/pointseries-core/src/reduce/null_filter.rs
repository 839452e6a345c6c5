use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Drops observations whose value could not be computed. No imputation.
#[derive(Debug, Default)]
pub struct NullFilter {
    dropped: AtomicUsize,
}

impl NullFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass a defined, finite value through; count and drop anything else.
    pub fn admit(&self, image_id: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(v) if v.is_finite() => Some(v),
            _ => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(image = image_id, "Dropped image with undefined value");
                None
            }
        }
    }

    /// Number of observations dropped so far.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
