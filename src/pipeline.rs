//! Image synthesis pipeline orchestration
//!
//! The pipeline owns the seeded random generator and runs the stages in a
//! strict order: zero canvas, sky background, stars, galaxies, cosmic rays,
//! read noise, detector response, WCS. The draw order is part of the
//! reproducibility contract: for a fixed seed and fixed inputs the output
//! pixel array is bit-identical across runs.

use log::{debug, info};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{generate_galaxies, generate_stars};
use crate::config::SimulationConfig;
use crate::error::{Error, GenerationError};
use crate::image_proc::{
    apply_detector_response, apply_read_noise, apply_sky_background, composite_stamp,
    inject_cosmic_rays, render_gaussian_stamp, render_sersic_stamp,
};
use crate::wcs::WcsFrame;

/// Per-image observation request
///
/// Identifier fields are pass-through metadata for the external header
/// collaborator; only the pointing and exposure time feed the numerical
/// stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRequest {
    /// Target right ascension in degrees
    pub ra_deg: f64,
    /// Target declination in degrees
    pub dec_deg: f64,
    /// Exposure time in seconds
    pub exposure_s: f64,
    /// Telescope identifier
    pub telescope: String,
    /// Instrument identifier
    pub instrument: String,
    /// Filter identifier
    pub filter: String,
}

impl ObservationRequest {
    /// Create a request with explicit pointing and the default 300 s exposure
    pub fn pointing(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            exposure_s: 300.0,
            telescope: String::new(),
            instrument: String::new(),
            filter: String::new(),
        }
    }

    /// Draw a randomized request from the generator
    ///
    /// Pointing is uniform over the sky (RA in [0, 360), Dec in [-90, 90));
    /// identifiers are chosen uniformly from the configured pools. Draw
    /// order: ra, dec, telescope, instrument, filter. Callers decide whether
    /// these draws precede the image draws.
    pub fn randomized(rng: &mut StdRng, config: &SimulationConfig) -> Self {
        let ra_deg = rng.gen_range(0.0..360.0);
        let dec_deg = rng.gen_range(-90.0..90.0);
        let telescope = pick_identifier(rng, &config.telescopes);
        let instrument = pick_identifier(rng, &config.instruments);
        let filter = pick_identifier(rng, &config.filters);

        Self {
            ra_deg,
            dec_deg,
            exposure_s: 300.0,
            telescope,
            instrument,
            filter,
        }
    }
}

fn pick_identifier(rng: &mut StdRng, pool: &[String]) -> String {
    pool.choose(rng).cloned().unwrap_or_default()
}

/// Final pipeline output: quantized pixels plus coordinate metadata
///
/// Handed to the external serialization collaborator, which assembles the
/// full header and persists the image container.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticImage {
    /// Quantized detector image in ADU, bounded by the saturation level
    pub pixels: Array2<u16>,
    /// Tangent-plane projection parameters for the pointing
    pub wcs: WcsFrame,
}

/// Derive an independent per-image seed from a master seed
///
/// Splitmix-style mixing so batch images stay reproducible independently of
/// generation order, allowing a caller to parallelize across images without
/// perturbing any single image's draw sequence.
pub fn derive_image_seed(master_seed: u64, image_index: u64) -> u64 {
    let mut z = master_seed.wrapping_add(image_index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic synthetic image generation pipeline
///
/// Owns the seeded generator for the duration of each call; the engine is
/// single-threaded and synchronous with no I/O. All stochastic draws flow
/// through the owned generator in the documented stage order.
pub struct ImagePipeline {
    config: SimulationConfig,
    rng: StdRng,
}

impl ImagePipeline {
    /// Create a pipeline seeded from the configuration, validating the
    /// configuration up front
    pub fn new(config: SimulationConfig) -> Result<Self, Error> {
        let seed = config.seed;
        Self::with_seed(config, seed)
    }

    /// Create a pipeline with an explicit seed (e.g. a derived batch
    /// sub-seed), validating the configuration up front
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Access the validated configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Draw a randomized observation request from the pipeline's generator
    pub fn random_request(&mut self) -> ObservationRequest {
        ObservationRequest::randomized(&mut self.rng, &self.config)
    }

    /// Generate one synthetic image for the given request
    ///
    /// Stage sequence: zero canvas, sky background, stars, galaxies, cosmic
    /// rays, read noise, detector response, WCS. Failures propagate
    /// synchronously; nothing is retried.
    pub fn generate(&mut self, request: &ObservationRequest) -> Result<SyntheticImage, Error> {
        if !(request.exposure_s.is_finite() && request.exposure_s >= 0.0) {
            return Err(GenerationError::InvalidExposure(request.exposure_s).into());
        }

        let config = &self.config;
        info!(
            "generating {}x{} image at RA={:.6} Dec={:.6} exposure={}s",
            config.width, config.height, request.ra_deg, request.dec_deg, request.exposure_s
        );

        let mut canvas = Array2::<f64>::zeros((config.height, config.width));

        apply_sky_background(&mut canvas, config.sky_background, &mut self.rng);

        let stars = generate_stars(&mut self.rng, config);
        debug!("rendering {} stars", stars.len());
        for star in &stars {
            let stamp = render_gaussian_stamp(star.fwhm_px, star.flux_e)?;
            composite_stamp(&mut canvas, &stamp, star.x, star.y);
        }

        let galaxies = generate_galaxies(&mut self.rng, config);
        debug!("rendering {} galaxies", galaxies.len());
        for galaxy in &galaxies {
            let stamp = render_sersic_stamp(
                galaxy.r_eff_px,
                galaxy.axis_ratio,
                galaxy.position_angle_deg,
                galaxy.sersic_index,
                galaxy.flux_e,
            )?;
            composite_stamp(&mut canvas, &stamp, galaxy.x, galaxy.y);
        }

        let hits = inject_cosmic_rays(
            &mut canvas,
            config.cosmic_ray_rate,
            request.exposure_s,
            &mut self.rng,
        );
        debug!("injected {hits} cosmic ray hits");

        apply_read_noise(&mut canvas, config.read_noise, &mut self.rng);

        let pixels = apply_detector_response(&canvas, config.gain, config.saturation_level);
        let wcs = WcsFrame::build(
            request.ra_deg,
            request.dec_deg,
            config.width,
            config.height,
            config.pixel_scale,
        );

        Ok(SyntheticImage { pixels, wcs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn tiny_config() -> SimulationConfig {
        SimulationConfig {
            height: 128,
            width: 128,
            star_density: 50.0,
            galaxy_density: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = SimulationConfig {
            gain: 0.0,
            ..tiny_config()
        };
        let result = ImagePipeline::new(config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidGain(_)))
        ));
    }

    #[test]
    fn test_negative_exposure_rejected() {
        let mut pipeline = ImagePipeline::new(tiny_config()).unwrap();
        let mut request = ObservationRequest::pointing(10.0, 20.0);
        request.exposure_s = -1.0;
        assert!(matches!(
            pipeline.generate(&request),
            Err(Error::Generation(GenerationError::InvalidExposure(_)))
        ));
    }

    #[test]
    fn test_output_dimensions_and_wcs() {
        let mut pipeline = ImagePipeline::new(tiny_config()).unwrap();
        let request = ObservationRequest::pointing(83.5, -5.25);
        let image = pipeline.generate(&request).unwrap();

        assert_eq!(image.pixels.dim(), (128, 128));
        assert_eq!(image.wcs.crval, [83.5, -5.25]);
        assert_eq!(image.wcs.crpix, [64.0, 64.0]);
    }

    #[test]
    fn test_saturation_invariant() {
        let config = SimulationConfig {
            saturation_level: 1000.0,
            ..tiny_config()
        };
        let mut pipeline = ImagePipeline::new(config).unwrap();
        let image = pipeline
            .generate(&ObservationRequest::pointing(0.0, 0.0))
            .unwrap();
        assert!(image.pixels.iter().all(|&v| v <= 1000));
    }

    #[test]
    fn test_derive_image_seed_distinct() {
        let master = 42;
        let s0 = derive_image_seed(master, 0);
        let s1 = derive_image_seed(master, 1);
        let s2 = derive_image_seed(master, 2);
        assert_ne!(s0, s1);
        assert_ne!(s1, s2);
        assert_ne!(s0, s2);
        // Stable across calls
        assert_eq!(s1, derive_image_seed(master, 1));
    }

    #[test]
    fn test_random_request_in_bounds() {
        let mut pipeline = ImagePipeline::new(tiny_config()).unwrap();
        for _ in 0..50 {
            let request = pipeline.random_request();
            assert!(request.ra_deg >= 0.0 && request.ra_deg < 360.0);
            assert!(request.dec_deg >= -90.0 && request.dec_deg < 90.0);
            assert!(!request.telescope.is_empty());
            assert!(!request.instrument.is_empty());
            assert!(!request.filter.is_empty());
        }
    }
}
