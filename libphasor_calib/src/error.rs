use std::path::PathBuf;
use thiserror::Error;

use super::constants::MIN_SIGNAL_SAMPLES;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    #[error("Phasor arrays do not share a shape -- {name_a}: {shape_a:?} {name_b}: {shape_b:?}")]
    ShapeMismatch {
        name_a: &'static str,
        shape_a: Vec<usize>,
        name_b: &'static str,
        shape_b: Vec<usize>,
    },
    #[error("Reference measurement is degenerate and cannot be used for calibration: {0}")]
    DegenerateReference(&'static str),
    #[error("Invalid modulation frequency {0}; frequency must be positive and finite")]
    InvalidFrequency(f64),
    #[error("Invalid reference lifetime {0}; lifetime must be non-negative and finite")]
    InvalidLifetime(f64),
    #[error("Invalid harmonic {0}; harmonic must be at least 1")]
    InvalidHarmonic(usize),
    #[error("Invalid calibration parameters -- phase shift: {0} amplitude scale: {1}")]
    InvalidParameters(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("Signal has no axis {0}; signals are 3-dimensional")]
    InvalidAxis(usize),
    #[error("Signal axis has {0} samples; at least {min} are required", min=MIN_SIGNAL_SAMPLES)]
    TooFewSamples(usize),
    #[error("Invalid signal frequency {0}; frequency must be positive and finite")]
    InvalidFrequency(f64),
    #[error("Invalid harmonic {0} for a signal with {1} samples")]
    InvalidHarmonic(usize, usize),
    #[error("Phasor image arrays do not share a shape -- mean: {0:?} real: {1:?} imag: {2:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>, Vec<usize>),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CursorError {
    #[error("Invalid cursor radius ({0}, {1}); radii must be positive and finite")]
    InvalidRadius(f64, f64),
    #[error("Cursor was given real and imag arrays with different shapes -- real: {0:?} imag: {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config has an invalid frequency {0}")]
    BadFrequency(f64),
    #[error("Config has an invalid harmonic {0}; harmonic must be at least 1")]
    BadHarmonic(usize),
    #[error("Config has invalid calibration settings: {0}")]
    BadCalibration(#[from] CalibrationError),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to set up logging: {0}")]
    SpdlogError(#[from] spdlog::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Calibration error: {0}")]
    CalibrationError(#[from] CalibrationError),
    #[error("Processor failed due to Signal error: {0}")]
    SignalError(#[from] SignalError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor requires a reference measurement for reference calibration")]
    MissingReference,
    #[error("Reference signal frequency {1} does not match sample frequency {0}")]
    FrequencyMismatch(f64, f64),
}
