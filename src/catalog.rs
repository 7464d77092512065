//! Random source catalog generation
//!
//! Derives the per-image lists of stars and galaxies from the configured
//! surface densities and the field geometry. Counts follow Poisson statistics
//! on the field area; per-source parameters are drawn in a fixed order so a
//! given seed always reproduces the same catalog.
//!
//! Draw order per star: x, y, magnitude tier, magnitude, FWHM.
//! Draw order per galaxy: x, y, magnitude, effective radius, axis ratio,
//! position angle, Sersic index.

use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::config::SimulationConfig;
use crate::image_proc::noise::{exponential_draw, poisson_count};

/// Photometric zeropoint for magnitude-to-flux conversion
pub const ZEROPOINT: f64 = 25.0;

/// Margin in pixels kept between stars and the image edges
const STAR_MARGIN_PX: f64 = 50.0;

/// Margin in pixels kept between galaxy centers and the image edges
const GALAXY_MARGIN_PX: f64 = 100.0;

/// A simulated point source
#[derive(Debug, Clone, PartialEq)]
pub struct StarEntry {
    /// Sub-pixel x position (column)
    pub x: f64,
    /// Sub-pixel y position (row)
    pub y: f64,
    /// Total flux in electrons
    pub flux_e: f64,
    /// Full width at half maximum of the PSF in pixels
    pub fwhm_px: f64,
}

/// A simulated extended source with a Sersic light profile
#[derive(Debug, Clone, PartialEq)]
pub struct GalaxyEntry {
    /// Sub-pixel x position (column)
    pub x: f64,
    /// Sub-pixel y position (row)
    pub y: f64,
    /// Total flux in electrons
    pub flux_e: f64,
    /// Effective (half-light) radius in pixels
    pub r_eff_px: f64,
    /// Projected minor/major axis ratio, in (0, 1]
    pub axis_ratio: f64,
    /// Position angle in degrees, [0, 180)
    pub position_angle_deg: f64,
    /// Sersic index (1.0 exponential disk, 4.0 de Vaucouleurs)
    pub sersic_index: f64,
}

/// Convert an astronomical magnitude to flux in electrons
///
/// Uses `flux = 10^((ZEROPOINT - magnitude) / 2.5)` with a floor of one
/// electron. Strictly decreasing in magnitude above the floor.
pub fn magnitude_to_flux(magnitude: f64) -> f64 {
    let flux = 10f64.powf((ZEROPOINT - magnitude) / 2.5);
    flux.max(1.0)
}

/// Draw a stellar magnitude from a two-tier luminosity function
///
/// 10% of stars are bright (uniform in [12, 18]), the rest faint
/// (uniform in [18, 25]).
fn stellar_magnitude(rng: &mut StdRng) -> f64 {
    if rng.gen::<f64>() < 0.1 {
        rng.gen_range(12.0..18.0)
    } else {
        rng.gen_range(18.0..25.0)
    }
}

/// Draw a uniform position along one axis, keeping `margin` pixels clear of
/// both edges. Falls back to the full axis when the margin does not fit, so
/// exactly one value is always drawn.
fn uniform_with_margin(rng: &mut StdRng, extent: usize, margin: f64) -> f64 {
    let extent = extent as f64;
    if extent > 2.0 * margin {
        rng.gen_range(margin..extent - margin)
    } else {
        rng.gen_range(0.0..extent)
    }
}

/// Generate the stellar catalog for one image
///
/// Star count is Poisson-distributed on `star_density * field_area`; the
/// FWHM draw (Normal mean 2.0, std 0.3) is floored at 1.0 pixel.
pub fn generate_stars(rng: &mut StdRng, config: &SimulationConfig) -> Vec<StarEntry> {
    let num_stars = poisson_count(rng, config.star_density * config.field_area_sq_arcmin());

    let fwhm_dist: Normal<f64> = Normal::new(2.0, 0.3).expect("valid FWHM distribution");

    let mut stars = Vec::with_capacity(num_stars);
    for _ in 0..num_stars {
        let x = uniform_with_margin(rng, config.width, STAR_MARGIN_PX);
        let y = uniform_with_margin(rng, config.height, STAR_MARGIN_PX);
        let magnitude = stellar_magnitude(rng);
        let fwhm_px = fwhm_dist.sample(rng).max(1.0);

        stars.push(StarEntry {
            x,
            y,
            flux_e: magnitude_to_flux(magnitude),
            fwhm_px,
        });
    }
    stars
}

/// Generate the galaxy catalog for one image
///
/// Galaxy count is Poisson-distributed on `galaxy_density * field_area`.
/// Effective radius is exponential (scale 3.0) plus one pixel; the Sersic
/// index is 1.0 with probability 0.7 and 4.0 otherwise.
pub fn generate_galaxies(rng: &mut StdRng, config: &SimulationConfig) -> Vec<GalaxyEntry> {
    let num_galaxies = poisson_count(rng, config.galaxy_density * config.field_area_sq_arcmin());

    let mut galaxies = Vec::with_capacity(num_galaxies);
    for _ in 0..num_galaxies {
        let x = uniform_with_margin(rng, config.width, GALAXY_MARGIN_PX);
        let y = uniform_with_margin(rng, config.height, GALAXY_MARGIN_PX);
        let magnitude = rng.gen_range(18.0..27.0);
        let r_eff_px = exponential_draw(rng, 3.0) + 1.0;
        let axis_ratio = rng.gen_range(0.3..1.0);
        let position_angle_deg = rng.gen_range(0.0..180.0);
        let sersic_index = if rng.gen::<f64>() < 0.7 { 1.0 } else { 4.0 };

        galaxies.push(GalaxyEntry {
            x,
            y,
            flux_e: magnitude_to_flux(magnitude),
            r_eff_px,
            axis_ratio,
            position_angle_deg,
            sersic_index,
        });
    }
    galaxies
}
