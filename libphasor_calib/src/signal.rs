use ndarray::{Array3, ArrayView3};

use super::constants::MIN_SIGNAL_SAMPLES;
use super::error::SignalError;

/// A 3-dimensional intensity signal sampled over a time/phase axis at a fixed
/// modulation frequency.
///
/// The phase axis is always named explicitly; there is no default axis.
#[derive(Debug, Clone)]
pub struct Signal {
    data: Array3<f64>,
    frequency: f64,
    axis: usize,
}

impl Signal {
    /// Create a new Signal
    ///
    /// Fails if the axis does not exist, holds fewer than three samples, or if the
    /// frequency is not a positive finite number.
    pub fn new(data: Array3<f64>, frequency: f64, axis: usize) -> Result<Self, SignalError> {
        if axis >= data.ndim() {
            return Err(SignalError::InvalidAxis(axis));
        }
        let samples = data.shape()[axis];
        if samples < MIN_SIGNAL_SAMPLES {
            return Err(SignalError::TooFewSamples(samples));
        }
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(SignalError::InvalidFrequency(frequency));
        }
        Ok(Self {
            data,
            frequency,
            axis,
        })
    }

    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Number of samples along the phase axis
    pub fn n_samples(&self) -> usize {
        self.data.shape()[self.axis]
    }
}
