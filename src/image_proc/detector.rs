//! Detector response: electrons to ADU with saturation
//!
//! Terminal transform of the pipeline. The electron canvas is divided by the
//! gain, clamped to the saturation ceiling, and rounded to an unsigned
//! integer raster ready for the external serialization collaborator.

use ndarray::Array2;

/// Convert an electron canvas to a quantized ADU image
///
/// Every pixel is divided by `gain` (electrons per ADU), clamped to
/// `[0, saturation_level]` and rounded to the nearest integer. The clamp is
/// the only place negative values (from read noise) can appear, so the
/// output always satisfies `0 <= pixel <= saturation_level`.
pub fn apply_detector_response(
    canvas: &Array2<f64>,
    gain: f64,
    saturation_level: f64,
) -> Array2<u16> {
    canvas.mapv(|electrons| {
        let adu = electrons / gain;
        adu.clamp(0.0, saturation_level).round() as u16
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_division() {
        let mut canvas = Array2::<f64>::zeros((2, 2));
        canvas[[0, 0]] = 150.0;
        canvas[[0, 1]] = 300.0;
        let adu = apply_detector_response(&canvas, 1.5, 65000.0);
        assert_eq!(adu[[0, 0]], 100);
        assert_eq!(adu[[0, 1]], 200);
        assert_eq!(adu[[1, 0]], 0);
    }

    #[test]
    fn test_saturation_clamp() {
        let mut canvas = Array2::<f64>::zeros((1, 3));
        canvas[[0, 0]] = 1.0e9;
        canvas[[0, 1]] = 65000.0 * 1.5;
        canvas[[0, 2]] = 65001.0 * 1.5;
        let adu = apply_detector_response(&canvas, 1.5, 65000.0);
        assert_eq!(adu[[0, 0]], 65000);
        assert_eq!(adu[[0, 1]], 65000);
        assert_eq!(adu[[0, 2]], 65000);
    }

    #[test]
    fn test_negative_electrons_clamp_to_zero() {
        // Read noise can push pixels below zero before quantization
        let canvas = Array2::<f64>::from_elem((3, 3), -12.0);
        let adu = apply_detector_response(&canvas, 1.5, 65000.0);
        assert!(adu.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rounding() {
        let mut canvas = Array2::<f64>::zeros((1, 2));
        canvas[[0, 0]] = 10.4; // 10.4 ADU at gain 1.0
        canvas[[0, 1]] = 10.6;
        let adu = apply_detector_response(&canvas, 1.0, 65000.0);
        assert_eq!(adu[[0, 0]], 10);
        assert_eq!(adu[[0, 1]], 11);
    }
}
