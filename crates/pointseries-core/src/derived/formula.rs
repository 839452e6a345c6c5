//! Empirical and band-ratio formulas, evaluated on scalars.
//!
//! Every function that can be undefined returns `None` instead of a NaN or an
//! infinity, so callers can drop the observation.

use crate::consts::{ALBEDO_SCALE_FACTOR, LAI_NDVI_INTERCEPT, LAI_NDVI_SLOPE};

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red)`
///
/// In [-1, 1] for non-negative reflectances. Undefined when `NIR + Red = 0`.
pub fn ndvi(nir: f64, red: f64) -> Option<f64> {
    let sum = nir + red;
    if sum == 0.0 || !sum.is_finite() {
        return None;
    }
    finite((nir - red) / sum)
}

/// Leaf Area Index from NDVI: `NDVI * 3.618 - 0.118`.
///
/// Not clamped; values outside the physically plausible range pass through.
pub fn lai_from_ndvi(ndvi: f64) -> f64 {
    ndvi * LAI_NDVI_SLOPE - LAI_NDVI_INTERCEPT
}

pub fn lai(nir: f64, red: f64) -> Option<f64> {
    ndvi(nir, red).map(lai_from_ndvi)
}

/// Blue-sky albedo approximated as a blend of black-sky (direct) and
/// white-sky (diffuse) albedo, scaled out of the stored fixed-point encoding:
///
/// `(f * BSA + (1 - f) * WSA) * 0.001`
pub fn blended_albedo(bsa: f64, wsa: f64, diffuse_fraction: f64) -> Option<f64> {
    finite((diffuse_fraction * bsa + (1.0 - diffuse_fraction) * wsa) * ALBEDO_SCALE_FACTOR)
}

/// `BSA * 0.001`
pub fn single_albedo(bsa: f64) -> Option<f64> {
    finite(bsa * ALBEDO_SCALE_FACTOR)
}

/// Clear-sky index: net over downward surface solar radiation.
///
/// Undefined when no radiation reaches the surface (night-time hours).
pub fn clear_sky_index(net: f64, downward: f64) -> Option<f64> {
    if downward == 0.0 {
        return None;
    }
    finite(net / downward)
}

#[inline]
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_inputs_are_undefined() {
        assert_eq!(ndvi(f64::NAN, 0.1), None);
        assert_eq!(single_albedo(f64::NAN), None);
        assert_eq!(clear_sky_index(1.0, f64::NAN), None);
    }
}
