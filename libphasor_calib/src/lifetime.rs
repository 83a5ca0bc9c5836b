use ndarray::{Array2, ArrayView2, Zip};
use std::f64::consts::PI;

use super::constants::PHASOR_SENTINEL;
use super::error::CalibrationError;

/// Angular frequency ω = 2πf
pub fn angular_frequency(frequency: f64) -> f64 {
    2.0 * PI * frequency
}

/// Phasor coordinates (G, S) of a single-exponential decay with lifetime τ at
/// frequency f:
///
/// ```text
/// G = 1 / (1 + (ωτ)²)
/// S = ωτ / (1 + (ωτ)²)
/// ```
///
/// Frequency and lifetime must be in reciprocal units (Hz and s, MHz and µs, ...).
pub fn phasor_from_lifetime(frequency: f64, lifetime: f64) -> (f64, f64) {
    let wt = angular_frequency(frequency) * lifetime;
    let denom = 1.0 + wt * wt;
    (1.0 / denom, wt / denom)
}

/// Modulation M = √(G² + S²)
pub fn phasor_modulation(g: f64, s: f64) -> f64 {
    g.hypot(s)
}

/// Four-quadrant phase angle φ of a phasor
pub fn phasor_phase(g: f64, s: f64) -> f64 {
    s.atan2(g)
}

/// Apparent single-exponential lifetimes of every pixel.
///
/// Returns `(phase_lifetime, modulation_lifetime)` where
///
/// ```text
/// τφ = tan(φ) / ω
/// τM = √(1/M² − 1) / ω
/// ```
///
/// Sentinel pixels stay sentinel. A modulation of zero gives an infinite
/// modulation lifetime; a modulation above one has no real lifetime and gives the
/// sentinel.
pub fn apparent_lifetime(
    real: ArrayView2<f64>,
    imag: ArrayView2<f64>,
    frequency: f64,
) -> Result<(Array2<f64>, Array2<f64>), CalibrationError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(CalibrationError::InvalidFrequency(frequency));
    }
    if real.shape() != imag.shape() {
        return Err(CalibrationError::ShapeMismatch {
            name_a: "real",
            shape_a: real.shape().to_vec(),
            name_b: "imag",
            shape_b: imag.shape().to_vec(),
        });
    }
    let omega = angular_frequency(frequency);
    let mut phase_lifetime = Array2::<f64>::zeros(real.raw_dim());
    let mut modulation_lifetime = Array2::<f64>::zeros(real.raw_dim());
    Zip::from(&mut phase_lifetime)
        .and(&mut modulation_lifetime)
        .and(&real)
        .and(&imag)
        .for_each(|tp, tm, &g, &s| {
            if g.is_nan() || s.is_nan() {
                *tp = PHASOR_SENTINEL;
                *tm = PHASOR_SENTINEL;
                return;
            }
            *tp = phasor_phase(g, s).tan() / omega;
            let m2 = g * g + s * s;
            *tm = if m2 > 1.0 {
                PHASOR_SENTINEL
            } else {
                (1.0 / m2 - 1.0).sqrt() / omega
            };
        });
    Ok((phase_lifetime, modulation_lifetime))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_zero_lifetime() {
        assert_eq!(phasor_from_lifetime(80.0e6, 0.0), (1.0, 0.0));
    }

    #[test]
    fn test_lifetime_on_semicircle() {
        // Single-exponential phasors lie on the universal semicircle
        let (g, s) = phasor_from_lifetime(80.0e6, 4.2e-9);
        assert!((g * g + s * s - g).abs() < 1e-12);
        let wt = angular_frequency(80.0e6) * 4.2e-9;
        assert!((phasor_phase(g, s) - wt.atan()).abs() < 1e-12);
        assert!((phasor_modulation(g, s) - 1.0 / (1.0 + wt * wt).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_apparent_lifetime_recovers_tau() {
        let freq = 80.0e6;
        let tau = 2.5e-9;
        let (g, s) = phasor_from_lifetime(freq, tau);
        let real = array![[g, f64::NAN], [1.0, g]];
        let imag = array![[s, 0.1], [0.0, s]];
        let (tp, tm) = apparent_lifetime(real.view(), imag.view(), freq).unwrap();

        assert!((tp[[0, 0]] - tau).abs() < 1e-15);
        assert!((tm[[0, 0]] - tau).abs() < 1e-15);
        assert!(tp[[0, 1]].is_nan() && tm[[0, 1]].is_nan());
        assert_eq!(tp[[1, 0]], 0.0);
        assert_eq!(tm[[1, 0]], 0.0);
    }

    #[test]
    fn test_apparent_lifetime_rejects_bad_input() {
        let a = array![[0.5]];
        let b = array![[0.5, 0.5]];
        assert!(matches!(
            apparent_lifetime(a.view(), a.view(), 0.0),
            Err(CalibrationError::InvalidFrequency(_))
        ));
        assert!(matches!(
            apparent_lifetime(a.view(), b.view(), 80.0e6),
            Err(CalibrationError::ShapeMismatch { .. })
        ));
    }
}
