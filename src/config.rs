//! Simulation configuration for the synthetic image generator
//!
//! A [`SimulationConfig`] bundles the detector characteristics and the field
//! statistics used by every stage of the pipeline. Values are immutable for
//! the duration of one image generation and are validated up front so that a
//! bad configuration fails before any pixel is touched.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Detector and field-statistics configuration
///
/// Units follow detector convention: electron counts for signal levels,
/// ADU for the digitized output, arcseconds per pixel for the plate scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Image height in pixels
    pub height: usize,
    /// Image width in pixels
    pub width: usize,
    /// Plate scale in arcsec/pixel
    pub pixel_scale: f64,
    /// Gain in electrons per ADU
    pub gain: f64,
    /// Read noise in electrons (standard deviation)
    pub read_noise: f64,
    /// Dark current in electrons/pixel/second (informational, not simulated)
    pub dark_current: f64,
    /// Sky background level in electrons/pixel
    pub sky_background: f64,
    /// Saturation ceiling in ADU
    pub saturation_level: f64,
    /// Stars per square arcminute
    pub star_density: f64,
    /// Galaxies per square arcminute
    pub galaxy_density: f64,
    /// Cosmic ray hits per pixel per hour
    pub cosmic_ray_rate: f64,
    /// Master random seed
    pub seed: u64,
    /// Telescope identifiers available for pass-through metadata
    pub telescopes: Vec<String>,
    /// Instrument identifiers available for pass-through metadata
    pub instruments: Vec<String>,
    /// Filter identifiers available for pass-through metadata
    pub filters: Vec<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            height: 2048,
            width: 2048,
            pixel_scale: 0.25,
            gain: 1.5,
            read_noise: 5.0,
            dark_current: 0.01,
            sky_background: 1000.0,
            saturation_level: 65000.0,
            star_density: 100.0,
            galaxy_density: 10.0,
            cosmic_ray_rate: 0.1,
            seed: 42,
            telescopes: string_vec(&["HST", "JWST", "VLT", "Gemini", "Keck"]),
            instruments: string_vec(&["WFC3", "NIRCam", "FORS2", "GMOS", "DEIMOS"]),
            filters: string_vec(&["F606W", "F814W", "F160W", "F110W", "g", "r", "i", "z"]),
        }
    }
}

fn string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl SimulationConfig {
    /// Validate all numeric parameters, failing fast before any stage runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height == 0 || self.width == 0 {
            return Err(ConfigError::InvalidDimensions {
                height: self.height,
                width: self.width,
            });
        }
        if !(self.pixel_scale.is_finite() && self.pixel_scale > 0.0) {
            return Err(ConfigError::InvalidPixelScale(self.pixel_scale));
        }
        if !(self.gain.is_finite() && self.gain > 0.0) {
            return Err(ConfigError::InvalidGain(self.gain));
        }
        if !(self.read_noise.is_finite() && self.read_noise >= 0.0) {
            return Err(ConfigError::InvalidReadNoise(self.read_noise));
        }
        if !(self.sky_background.is_finite() && self.sky_background >= 0.0) {
            return Err(ConfigError::InvalidSkyBackground(self.sky_background));
        }
        if !(self.star_density.is_finite() && self.star_density >= 0.0) {
            return Err(ConfigError::InvalidDensity {
                name: "star",
                value: self.star_density,
            });
        }
        if !(self.galaxy_density.is_finite() && self.galaxy_density >= 0.0) {
            return Err(ConfigError::InvalidDensity {
                name: "galaxy",
                value: self.galaxy_density,
            });
        }
        if !(self.cosmic_ray_rate.is_finite() && self.cosmic_ray_rate >= 0.0) {
            return Err(ConfigError::InvalidCosmicRayRate(self.cosmic_ray_rate));
        }
        if !(self.saturation_level.is_finite()
            && self.saturation_level > 0.0
            && self.saturation_level <= u16::MAX as f64)
        {
            return Err(ConfigError::InvalidSaturationLevel {
                value: self.saturation_level,
            });
        }
        Ok(())
    }

    /// Pixel scale converted to degrees per pixel
    pub fn pixel_scale_deg(&self) -> f64 {
        self.pixel_scale / 3600.0
    }

    /// Field area in square arcminutes
    ///
    /// Computed as `(height * scale_deg) * (width * scale_deg) * 3600` with
    /// the scale in degrees per pixel.
    pub fn field_area_sq_arcmin(&self) -> f64 {
        let scale_deg = self.pixel_scale_deg();
        (self.height as f64 * scale_deg) * (self.width as f64 * scale_deg) * 3600.0
    }

    /// Total pixel count of the canvas
    pub fn total_pixels(&self) -> usize {
        self.height * self.width
    }
}
