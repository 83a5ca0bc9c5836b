use std::fmt::Debug;

/// Floating point types that phasor coordinates can be stored in.
///
/// Values are widened to `f64` for arithmetic and narrowed back on output.
pub trait PhasorFloat: Copy + Debug + PartialOrd + Send + Sync {
    fn to_f64(self) -> f64;

    fn from_f64(value: f64) -> Self;

    /// The undefined-phasor marker in this type
    fn sentinel() -> Self {
        Self::from_f64(f64::NAN)
    }
}

impl PhasorFloat for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl PhasorFloat for f64 {
    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}
