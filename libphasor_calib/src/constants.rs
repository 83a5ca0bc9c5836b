/// Marks a pixel with an undefined phasor (e.g. zero intensity)
pub const PHASOR_SENTINEL: f64 = f64::NAN;

/// Fewest samples along the phase axis for which a phasor is defined
pub const MIN_SIGNAL_SAMPLES: usize = 3;

/// Fundamental harmonic
pub const DEFAULT_HARMONIC: usize = 1;
