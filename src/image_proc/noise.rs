//! Background and detector noise models
//!
//! The sky background is a per-pixel Poisson draw (shot noise is embedded in
//! the draw itself rather than added separately); read noise is independent
//! zero-mean Gaussian noise layered on top at the end of the pipeline.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Exp, Normal, Poisson};

/// Draw a Poisson-distributed count, short-circuiting to zero for a
/// non-positive mean (`Poisson::new` rejects mean <= 0, and a zero mean must
/// deterministically produce zero without consuming a draw).
pub(crate) fn poisson_count(rng: &mut StdRng, mean: f64) -> usize {
    if mean <= 0.0 {
        return 0;
    }
    let dist = Poisson::new(mean).expect("positive finite Poisson mean");
    dist.sample(rng) as usize
}

/// Draw from an exponential distribution parameterized by its scale (mean).
///
/// `rand_distr::Exp` takes the rate lambda, so scale s maps to rate 1/s.
pub(crate) fn exponential_draw(rng: &mut StdRng, scale: f64) -> f64 {
    let dist = Exp::new(1.0 / scale).expect("positive finite exponential rate");
    dist.sample(rng)
}

/// Add a Poisson-distributed sky background to every pixel
///
/// First stage to touch the canvas. Each pixel receives an independent
/// Poisson draw with mean `sky_level` electrons; a zero level leaves the
/// canvas untouched without consuming any draws.
pub fn apply_sky_background(canvas: &mut Array2<f64>, sky_level: f64, rng: &mut StdRng) {
    if sky_level <= 0.0 {
        return;
    }
    let dist = Poisson::new(sky_level).expect("positive finite sky level");
    canvas.mapv_inplace(|value| value + dist.sample(&mut *rng));
}

/// Add zero-mean Gaussian read noise to every pixel
///
/// Standard deviation is `read_noise` electrons, independent of the Poisson
/// shot noise already embedded by the background and source stages.
pub fn apply_read_noise(canvas: &mut Array2<f64>, read_noise: f64, rng: &mut StdRng) {
    if read_noise <= 0.0 {
        return;
    }
    let dist = Normal::new(0.0, read_noise).expect("non-negative finite read noise");
    canvas.mapv_inplace(|value| value + dist.sample(&mut *rng));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    #[test]
    fn test_sky_background_mean() {
        let mut canvas = Array2::<f64>::zeros((200, 200));
        let mut rng = StdRng::seed_from_u64(42);
        apply_sky_background(&mut canvas, 1000.0, &mut rng);

        let mean = canvas.mean().unwrap();
        assert_relative_eq!(mean, 1000.0, epsilon = 2.0);

        // Poisson variance equals the mean
        let std = canvas.std(0.0);
        assert_relative_eq!(std, 1000.0_f64.sqrt(), epsilon = 1.0);
    }

    #[test]
    fn test_sky_background_zero_level_is_noop() {
        let mut canvas = Array2::<f64>::zeros((10, 10));
        let mut rng = StdRng::seed_from_u64(1);
        apply_sky_background(&mut canvas, 0.0, &mut rng);
        assert!(canvas.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sky_background_deterministic() {
        let mut canvas1 = Array2::<f64>::zeros((20, 20));
        let mut canvas2 = Array2::<f64>::zeros((20, 20));
        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        apply_sky_background(&mut canvas1, 500.0, &mut rng1);
        apply_sky_background(&mut canvas2, 500.0, &mut rng2);
        assert_eq!(canvas1, canvas2);
    }

    #[test]
    fn test_read_noise_statistics() {
        let mut canvas = Array2::<f64>::zeros((200, 200));
        let mut rng = StdRng::seed_from_u64(17);
        apply_read_noise(&mut canvas, 5.0, &mut rng);

        let mean = canvas.mean().unwrap();
        let std = canvas.std(0.0);
        assert_relative_eq!(mean, 0.0, epsilon = 0.1);
        assert_relative_eq!(std, 5.0, epsilon = 0.1);
    }

    #[test]
    fn test_read_noise_additive() {
        let mut canvas = Array2::<f64>::from_elem((50, 50), 100.0);
        let mut rng = StdRng::seed_from_u64(23);
        apply_read_noise(&mut canvas, 2.0, &mut rng);
        let mean = canvas.mean().unwrap();
        assert_relative_eq!(mean, 100.0, epsilon = 0.5);
    }

    #[test]
    fn test_poisson_count_zero_mean() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(poisson_count(&mut rng, 0.0), 0);
        assert_eq!(poisson_count(&mut rng, -5.0), 0);
    }

    #[test]
    fn test_poisson_count_mean() {
        let mut rng = StdRng::seed_from_u64(31);
        let n = 10_000;
        let total: usize = (0..n).map(|_| poisson_count(&mut rng, 3.0)).sum();
        assert_relative_eq!(total as f64 / n as f64, 3.0, epsilon = 0.1);
    }

    #[test]
    fn test_exponential_draw_mean() {
        let mut rng = StdRng::seed_from_u64(37);
        let n = 10_000;
        let total: f64 = (0..n).map(|_| exponential_draw(&mut rng, 3.0)).sum();
        assert_relative_eq!(total / n as f64, 3.0, epsilon = 0.15);
    }
}
