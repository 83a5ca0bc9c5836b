use ndarray::{Array2, ArrayView1, Axis};
use std::f64::consts::PI;

use super::constants::PHASOR_SENTINEL;
use super::error::SignalError;
use super::signal::Signal;

/// The phasor representation of a signal: per-pixel mean intensity and the (G, S)
/// coordinates at one harmonic.
///
/// Pixels whose phasor is undefined carry [`PHASOR_SENTINEL`] in `real` and `imag`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasorImage {
    pub mean: Array2<f64>,
    pub real: Array2<f64>,
    pub imag: Array2<f64>,
}

impl PhasorImage {
    /// Create a PhasorImage from its three components
    ///
    /// All three arrays must share a shape.
    pub fn new(
        mean: Array2<f64>,
        real: Array2<f64>,
        imag: Array2<f64>,
    ) -> Result<Self, SignalError> {
        if mean.shape() != real.shape() || mean.shape() != imag.shape() {
            return Err(SignalError::ShapeMismatch(
                mean.shape().to_vec(),
                real.shape().to_vec(),
                imag.shape().to_vec(),
            ));
        }
        Ok(Self { mean, real, imag })
    }

    pub fn dim(&self) -> (usize, usize) {
        self.mean.dim()
    }

    /// Number of pixels whose phasor is the sentinel
    pub fn count_undefined(&self) -> usize {
        self.real
            .iter()
            .zip(self.imag.iter())
            .filter(|(g, s)| g.is_nan() || s.is_nan())
            .count()
    }
}

/// Project a single lane of samples onto the given harmonic.
/// Returns (mean, real, imag)
fn project_lane(lane: ArrayView1<f64>, table: &[(f64, f64)]) -> (f64, f64, f64) {
    let mut total: f64 = 0.0;
    let mut g: f64 = 0.0;
    let mut s: f64 = 0.0;
    for (&x, &(cos, sin)) in lane.iter().zip(table) {
        total += x;
        g += x * cos;
        s += x * sin;
    }
    let mean = total / lane.len() as f64;
    if total == 0.0 || !total.is_finite() {
        return (mean, PHASOR_SENTINEL, PHASOR_SENTINEL);
    }
    (mean, g / total, s / total)
}

/// Compute the phasor image of a signal by discrete Fourier projection along the
/// signal's phase axis.
///
/// For a lane of `N` samples `x_k` at harmonic `h`:
///
/// ```text
/// mean = Σx / N
/// G = Σ x_k cos(2πhk/N) / Σx
/// S = Σ x_k sin(2πhk/N) / Σx
/// ```
///
/// Lanes with zero or non-finite total intensity get the sentinel for G and S. The
/// harmonic must satisfy `1 <= h < N`.
pub fn phasor_from_signal(signal: &Signal, harmonic: usize) -> Result<PhasorImage, SignalError> {
    let n = signal.n_samples();
    if harmonic == 0 || harmonic >= n {
        return Err(SignalError::InvalidHarmonic(harmonic, n));
    }

    let table: Vec<(f64, f64)> = (0..n)
        .map(|k| {
            let angle = 2.0 * PI * (harmonic * k) as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect();

    let projected = signal
        .data()
        .map_axis(Axis(signal.axis()), |lane| project_lane(lane, &table));

    spdlog::debug!(
        "Projected signal of shape {:?} along axis {} at harmonic {}",
        signal.data().shape(),
        signal.axis(),
        harmonic
    );

    Ok(PhasorImage {
        mean: projected.mapv(|(m, _, _)| m),
        real: projected.mapv(|(_, g, _)| g),
        imag: projected.mapv(|(_, _, s)| s),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    /// Cosine signal with a known modulation and phase; its discrete phasor is exact
    fn cosine_signal(amplitude: f64, modulation: f64, phase: f64, n: usize) -> Array3<f64> {
        Array3::from_shape_fn((2, 3, n), |(_, _, k)| {
            let angle = 2.0 * PI * k as f64 / n as f64;
            amplitude * (1.0 + modulation * (angle - phase).cos())
        })
    }

    #[test]
    fn test_cosine_projection() {
        let n = 16;
        let (m, phi): (f64, f64) = (0.6, 0.7);
        let signal = Signal::new(cosine_signal(50.0, m, phi, n), 80.0e6, 2).unwrap();
        let image = phasor_from_signal(&signal, 1).unwrap();

        assert_eq!(image.dim(), (2, 3));
        // A cosine of modulation m and phase phi projects to (m/2)·e^{iφ}
        for ((mean, g), s) in image.mean.iter().zip(image.real.iter()).zip(image.imag.iter()) {
            assert!((mean - 50.0).abs() < 1e-9);
            assert!((g - 0.5 * m * phi.cos()).abs() < 1e-12);
            assert!((s - 0.5 * m * phi.sin()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_projection_on_first_axis() {
        let data = Array3::from_shape_fn((8, 2, 2), |(k, _, _)| {
            1.0 + (2.0 * PI * k as f64 / 8.0).cos()
        });
        let signal = Signal::new(data, 80.0e6, 0).unwrap();
        let image = phasor_from_signal(&signal, 1).unwrap();
        assert_eq!(image.dim(), (2, 2));
        for g in image.real.iter() {
            assert!((g - 0.5).abs() < 1e-12);
        }
        for s in image.imag.iter() {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_intensity_is_sentinel() {
        let mut data = cosine_signal(10.0, 0.5, 0.3, 8);
        data.slice_mut(ndarray::s![0, 1, ..]).fill(0.0);
        let signal = Signal::new(data, 80.0e6, 2).unwrap();
        let image = phasor_from_signal(&signal, 1).unwrap();

        assert_eq!(image.mean[[0, 1]], 0.0);
        assert!(image.real[[0, 1]].is_nan());
        assert!(image.imag[[0, 1]].is_nan());
        assert!(!image.real[[1, 1]].is_nan());
        assert_eq!(image.count_undefined(), 1);
    }

    #[test]
    fn test_bad_harmonic() {
        let signal = Signal::new(Array3::ones((2, 2, 4)), 80.0e6, 2).unwrap();
        assert_eq!(
            phasor_from_signal(&signal, 0).unwrap_err(),
            SignalError::InvalidHarmonic(0, 4)
        );
        assert_eq!(
            phasor_from_signal(&signal, 4).unwrap_err(),
            SignalError::InvalidHarmonic(4, 4)
        );
    }

    #[test]
    fn test_image_shape_check() {
        let ok = PhasorImage::new(array![[1.0]], array![[0.5]], array![[0.2]]);
        assert!(ok.is_ok());
        let bad = PhasorImage::new(array![[1.0]], array![[0.5, 0.1]], array![[0.2]]);
        assert!(matches!(bad, Err(SignalError::ShapeMismatch(..))));
    }
}
