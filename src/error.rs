//! Error types for synthetic image generation
//!
//! Configuration problems are caught before any stage runs; generation
//! problems are raised per image and never retried internally.

use thiserror::Error;

/// Errors raised while validating a [`crate::SimulationConfig`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("image dimensions must be positive, got {height}x{width}")]
    InvalidDimensions { height: usize, width: usize },

    #[error("pixel scale must be positive and finite, got {0} arcsec/pixel")]
    InvalidPixelScale(f64),

    #[error("gain must be positive and finite, got {0} e-/ADU")]
    InvalidGain(f64),

    #[error("read noise must be non-negative and finite, got {0} e-")]
    InvalidReadNoise(f64),

    #[error("sky background must be non-negative and finite, got {0} e-/pixel")]
    InvalidSkyBackground(f64),

    #[error("{name} density must be non-negative and finite, got {value}")]
    InvalidDensity { name: &'static str, value: f64 },

    #[error("cosmic ray rate must be non-negative and finite, got {0} hits/pixel/hour")]
    InvalidCosmicRayRate(f64),

    #[error("saturation level must be in (0, {max}] ADU, got {value}", max = u16::MAX)]
    InvalidSaturationLevel { value: f64 },
}

/// Errors raised while generating a single image
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("degenerate {profile} stamp: {parameter} = {value}")]
    DegenerateStamp {
        profile: &'static str,
        parameter: &'static str,
        value: f64,
    },

    #[error("exposure time must be non-negative and finite, got {0} s")]
    InvalidExposure(f64),

    #[error("distribution parameter out of range: {0}")]
    Distribution(String),
}

/// Top-level error type for the generation engine
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
