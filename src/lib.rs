//! Synthetic astronomical image generation
//!
//! This crate procedurally generates calibrated detector images containing
//! realistic sky background, stellar point sources, Sersic-profile galaxies,
//! cosmic-ray tracks and read noise, together with the tangent-plane WCS
//! metadata for the simulated pointing. Generation is fully deterministic
//! under a seeded random generator: a fixed seed, configuration and request
//! reproduce the output bit for bit.
//!
//! Serialization of the pixel array and header assembly are the caller's
//! concern; the pipeline hands back a quantized [`ndarray::Array2`] and a
//! [`WcsFrame`] parameter set.

pub mod catalog;
pub mod config;
pub mod error;
pub mod image_proc;
pub mod pipeline;
pub mod wcs;

// Re-exports for easier access
pub use catalog::{magnitude_to_flux, GalaxyEntry, StarEntry};
pub use config::SimulationConfig;
pub use error::{ConfigError, Error, GenerationError};
pub use pipeline::{derive_image_seed, ImagePipeline, ObservationRequest, SyntheticImage};
pub use wcs::WcsFrame;
