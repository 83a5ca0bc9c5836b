//! Phasor calibration against a reference of known lifetime.
//!
//! The measurement system adds a constant phase delay and a modulation loss to every
//! phasor. Both are recovered from a reference sample whose lifetime is known:
//!
//! ```text
//! ωτ        = 2π · frequency · harmonic · lifetime
//! φ_theory  = atan(ωτ)
//! M_theory  = 1 / √(1 + (ωτ)²)
//! φ_observed = atan2(⟨S⟩, ⟨G⟩)
//! M_observed = ⟨√(G² + S²)⟩
//!
//! phase_shift     = φ_theory − φ_observed
//! amplitude_scale = M_theory / M_observed
//! ```
//!
//! and are then applied to every pixel as a single complex multiplication,
//! `G' + iS' = (G + iS) · amplitude_scale · e^{i·phase_shift}`.
use ndarray::{Array2, ArrayView2, Zip};
use serde::{Deserialize, Serialize};

use super::constants::DEFAULT_HARMONIC;
use super::error::CalibrationError;
use super::lifetime::angular_frequency;
use super::numeric::PhasorFloat;
use super::phasor::PhasorImage;

/// How reference pixels are weighted when averaging the observed phasor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceWeighting {
    /// Weight each pixel by its mean intensity
    #[default]
    Intensity,
    /// Every usable pixel counts once
    Uniform,
}

/// Phase and amplitude correction of a measurement system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParameters {
    /// Radians added to every phasor angle
    pub phase_shift: f64,
    /// Factor applied to every phasor modulation
    pub amplitude_scale: f64,
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self {
            phase_shift: 0.0,
            amplitude_scale: 1.0,
        }
    }
}

impl CalibrationParameters {
    /// Parameters entered by hand rather than derived from a reference.
    ///
    /// The phase shift must be finite and the amplitude scale positive and finite.
    pub fn manual(phase_shift: f64, amplitude_scale: f64) -> Result<Self, CalibrationError> {
        if !phase_shift.is_finite() || !(amplitude_scale.is_finite() && amplitude_scale > 0.0) {
            return Err(CalibrationError::InvalidParameters(
                phase_shift,
                amplitude_scale,
            ));
        }
        Ok(Self {
            phase_shift,
            amplitude_scale,
        })
    }

    /// Derive the parameters from a reference PhasorImage projected at `harmonic`
    pub fn from_reference(
        reference: &PhasorImage,
        frequency: f64,
        lifetime: f64,
        harmonic: usize,
        weighting: ReferenceWeighting,
    ) -> Result<Self, CalibrationError> {
        derive_calibration_with(
            reference.mean.view(),
            reference.real.view(),
            reference.imag.view(),
            frequency,
            lifetime,
            harmonic,
            weighting,
        )
    }

    /// The parameters that undo this calibration
    pub fn inverse(&self) -> Self {
        Self {
            phase_shift: -self.phase_shift,
            amplitude_scale: 1.0 / self.amplitude_scale,
        }
    }
}

fn check_shapes(
    name_a: &'static str,
    a: &[usize],
    name_b: &'static str,
    b: &[usize],
) -> Result<(), CalibrationError> {
    if a != b {
        return Err(CalibrationError::ShapeMismatch {
            name_a,
            shape_a: a.to_vec(),
            name_b,
            shape_b: b.to_vec(),
        });
    }
    Ok(())
}

fn check_acquisition(
    frequency: f64,
    lifetime: f64,
    harmonic: usize,
) -> Result<(), CalibrationError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(CalibrationError::InvalidFrequency(frequency));
    }
    if !(lifetime.is_finite() && lifetime >= 0.0) {
        return Err(CalibrationError::InvalidLifetime(lifetime));
    }
    if harmonic < 1 {
        return Err(CalibrationError::InvalidHarmonic(harmonic));
    }
    Ok(())
}

/// Derive calibration parameters from an intensity-weighted reference measurement
/// projected at the fundamental harmonic.
///
/// See [`derive_calibration_with`].
pub fn derive_calibration<T: PhasorFloat>(
    reference_mean: ArrayView2<T>,
    reference_real: ArrayView2<T>,
    reference_imag: ArrayView2<T>,
    frequency: f64,
    lifetime: f64,
) -> Result<CalibrationParameters, CalibrationError> {
    derive_calibration_with(
        reference_mean,
        reference_real,
        reference_imag,
        frequency,
        lifetime,
        DEFAULT_HARMONIC,
        ReferenceWeighting::Intensity,
    )
}

/// Derive calibration parameters from a reference measurement of known lifetime.
///
/// The reference phasor must have been projected at `harmonic`; the theoretical
/// phasor is evaluated at `frequency · harmonic`.
///
/// Pixels whose G or S is the sentinel, or whose mean intensity is not a positive
/// finite number, are excluded from the observed average. Intensity weights are
/// normalised by the brightest usable pixel, so very bright references do not
/// overflow. A lifetime of zero describes an ideal scatterer (phase 0, modulation 1).
///
/// Fails with `DegenerateReference` if no pixel survives the filter, the observed
/// average is not finite, or the observed modulation is zero.
pub fn derive_calibration_with<T: PhasorFloat>(
    reference_mean: ArrayView2<T>,
    reference_real: ArrayView2<T>,
    reference_imag: ArrayView2<T>,
    frequency: f64,
    lifetime: f64,
    harmonic: usize,
    weighting: ReferenceWeighting,
) -> Result<CalibrationParameters, CalibrationError> {
    check_shapes(
        "reference_mean",
        reference_mean.shape(),
        "reference_real",
        reference_real.shape(),
    )?;
    check_shapes(
        "reference_mean",
        reference_mean.shape(),
        "reference_imag",
        reference_imag.shape(),
    )?;
    check_acquisition(frequency, lifetime, harmonic)?;

    let wt = angular_frequency(frequency * harmonic as f64) * lifetime;
    let phi_theory = wt.atan();
    let m_theory = 1.0 / (1.0 + wt * wt).sqrt();

    let usable = |mean: f64, g: f64, s: f64| {
        !(g.is_nan() || s.is_nan()) && mean.is_finite() && mean > 0.0
    };

    let mut max_mean: f64 = 0.0;
    Zip::from(&reference_mean)
        .and(&reference_real)
        .and(&reference_imag)
        .for_each(|&mean, &g, &s| {
            let (mean, g, s) = (mean.to_f64(), g.to_f64(), s.to_f64());
            if usable(mean, g, s) {
                max_mean = max_mean.max(mean);
            }
        });
    if max_mean <= 0.0 {
        return Err(CalibrationError::DegenerateReference(
            "no reference pixel has a defined phasor and positive intensity",
        ));
    }

    let mut total_weight: f64 = 0.0;
    let mut sum_real: f64 = 0.0;
    let mut sum_imag: f64 = 0.0;
    let mut sum_modulation: f64 = 0.0;
    let mut n_used: usize = 0;
    Zip::from(&reference_mean)
        .and(&reference_real)
        .and(&reference_imag)
        .for_each(|&mean, &g, &s| {
            let (mean, g, s) = (mean.to_f64(), g.to_f64(), s.to_f64());
            if !usable(mean, g, s) {
                return;
            }
            let w = match weighting {
                ReferenceWeighting::Intensity => mean / max_mean,
                ReferenceWeighting::Uniform => 1.0,
            };
            total_weight += w;
            sum_real += w * g;
            sum_imag += w * s;
            sum_modulation += w * g.hypot(s);
            n_used += 1;
        });

    if !(total_weight.is_finite() && sum_real.is_finite() && sum_imag.is_finite())
        || !sum_modulation.is_finite()
    {
        return Err(CalibrationError::DegenerateReference(
            "observed reference phasor average is not finite",
        ));
    }

    let phi_observed = (sum_imag / total_weight).atan2(sum_real / total_weight);
    let m_observed = sum_modulation / total_weight;
    if m_observed == 0.0 {
        return Err(CalibrationError::DegenerateReference(
            "observed reference modulation is zero",
        ));
    }

    let params = CalibrationParameters {
        phase_shift: phi_theory - phi_observed,
        amplitude_scale: m_theory / m_observed,
    };
    spdlog::debug!(
        "Derived calibration from {} of {} reference pixels at harmonic {} -- phase shift: {} amplitude scale: {}",
        n_used,
        reference_mean.len(),
        harmonic,
        params.phase_shift,
        params.amplitude_scale
    );
    Ok(params)
}

/// Rotate every phasor by `phase_shift` and scale it by `amplitude_scale`.
///
/// Works on single or double precision coordinates; the arithmetic is done in
/// double precision. A pixel whose G or S is the sentinel comes out as the sentinel
/// in both outputs; no arithmetic is done on it.
pub fn apply<T: PhasorFloat>(
    real: ArrayView2<T>,
    imag: ArrayView2<T>,
    phase_shift: f64,
    amplitude_scale: f64,
) -> Result<(Array2<T>, Array2<T>), CalibrationError> {
    check_shapes("real", real.shape(), "imag", imag.shape())?;

    let c = amplitude_scale * phase_shift.cos();
    let d = amplitude_scale * phase_shift.sin();
    let mut real_out = Array2::from_elem(real.raw_dim(), T::sentinel());
    let mut imag_out = Array2::from_elem(imag.raw_dim(), T::sentinel());
    Zip::from(&mut real_out)
        .and(&mut imag_out)
        .and(&real)
        .and(&imag)
        .for_each(|g_out, s_out, &g, &s| {
            let (g, s) = (g.to_f64(), s.to_f64());
            if g.is_nan() || s.is_nan() {
                *g_out = T::sentinel();
                *s_out = T::sentinel();
            } else {
                *g_out = T::from_f64(g * c - s * d);
                *s_out = T::from_f64(g * d + s * c);
            }
        });

    Ok((real_out, imag_out))
}

/// Derive calibration parameters from the reference and apply them to
/// `real`/`imag` in one call.
///
/// Every input is validated before anything is computed.
pub fn calibrate<T: PhasorFloat>(
    real: ArrayView2<T>,
    imag: ArrayView2<T>,
    reference_mean: ArrayView2<T>,
    reference_real: ArrayView2<T>,
    reference_imag: ArrayView2<T>,
    frequency: f64,
    lifetime: f64,
) -> Result<(Array2<T>, Array2<T>), CalibrationError> {
    check_shapes("real", real.shape(), "imag", imag.shape())?;
    let params = derive_calibration(
        reference_mean,
        reference_real,
        reference_imag,
        frequency,
        lifetime,
    )?;
    apply(real, imag, params.phase_shift, params.amplitude_scale)
}

impl PhasorImage {
    /// Apply calibration parameters to this image. The mean intensity is unchanged.
    pub fn calibrated(&self, params: &CalibrationParameters) -> Result<Self, CalibrationError> {
        let (real, imag) = apply(
            self.real.view(),
            self.imag.view(),
            params.phase_shift,
            params.amplitude_scale,
        )?;
        Ok(Self {
            mean: self.mean.clone(),
            real,
            imag,
        })
    }
}
