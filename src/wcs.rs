//! Tangent-plane WCS frame construction
//!
//! Builds the coordinate metadata describing the simulated pointing: a
//! gnomonic (TAN) projection with the reference pixel at the image center
//! and the RA axis scale negated, since right ascension increases toward
//! decreasing pixel x under the standard sky convention. Pure function of
//! the pointing and geometry; no pixel data involved.

use serde::{Deserialize, Serialize};

/// World Coordinate System parameters for one simulated image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WcsFrame {
    /// Reference pixel (x, y), image center
    pub crpix: [f64; 2],
    /// Reference sky coordinate (RA, Dec) in degrees
    pub crval: [f64; 2],
    /// Pixel scale per axis in degrees/pixel, RA axis negated
    pub cdelt: [f64; 2],
    /// Axis projection types
    pub ctype: [String; 2],
    /// Coordinate units per axis
    pub cunit: [String; 2],
}

impl WcsFrame {
    /// Build the frame for a pointing at (ra, dec) degrees over a
    /// width x height image with the given plate scale in arcsec/pixel.
    pub fn build(
        ra_deg: f64,
        dec_deg: f64,
        width: usize,
        height: usize,
        pixel_scale_arcsec: f64,
    ) -> Self {
        let pixel_scale_deg = pixel_scale_arcsec / 3600.0;
        Self {
            crpix: [width as f64 / 2.0, height as f64 / 2.0],
            crval: [ra_deg, dec_deg],
            cdelt: [-pixel_scale_deg, pixel_scale_deg],
            ctype: ["RA---TAN".to_string(), "DEC--TAN".to_string()],
            cunit: ["deg".to_string(), "deg".to_string()],
        }
    }
}
