use serde::{Deserialize, Serialize};
use std::path::Path;

use super::calibration::{CalibrationParameters, ReferenceWeighting};
use super::constants::DEFAULT_HARMONIC;
use super::error::{CalibrationError, ConfigError};

fn default_harmonic() -> usize {
    DEFAULT_HARMONIC
}

/// How raw phasors are calibrated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Leave the phasors as measured
    None,
    /// Derive the correction from a reference measurement of known lifetime
    Reference {
        lifetime: f64,
        #[serde(default)]
        weighting: ReferenceWeighting,
    },
    /// Use a phase shift and modulation factor entered by hand
    Manual {
        phase_shift: f64,
        amplitude_scale: f64,
    },
}

/// Structure representing the processing configuration. Contains acquisition and
/// calibration information.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub frequency: f64,
    #[serde(default = "default_harmonic")]
    pub harmonic: usize,
    pub calibration: CalibrationMode,
}

impl Default for Config {
    /// Generate a new Config object. The frequency is left invalid and must be set
    fn default() -> Self {
        Self {
            frequency: 0.0,
            harmonic: DEFAULT_HARMONIC,
            calibration: CalibrationMode::None,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Write the configuration to a YAML file, replacing any existing file
    pub fn write_config_file(&self, config_path: &Path) -> Result<(), ConfigError> {
        let yaml_str = serde_yaml::to_string(self)?;
        std::fs::write(config_path, yaml_str)?;
        Ok(())
    }

    /// Check that every field holds a usable value
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(ConfigError::BadFrequency(self.frequency));
        }
        if self.harmonic < 1 {
            return Err(ConfigError::BadHarmonic(self.harmonic));
        }
        match self.calibration {
            CalibrationMode::None => (),
            CalibrationMode::Reference { lifetime, .. } => {
                if !(lifetime.is_finite() && lifetime >= 0.0) {
                    return Err(CalibrationError::InvalidLifetime(lifetime).into());
                }
            }
            CalibrationMode::Manual {
                phase_shift,
                amplitude_scale,
            } => {
                CalibrationParameters::manual(phase_shift, amplitude_scale)?;
            }
        }
        Ok(())
    }

    pub fn needs_reference(&self) -> bool {
        matches!(self.calibration, CalibrationMode::Reference { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reference_mode() {
        let yaml = "frequency: 80.0e6\ncalibration:\n  mode: reference\n  lifetime: 4.2e-9\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.harmonic, 1);
        assert_eq!(
            config.calibration,
            CalibrationMode::Reference {
                lifetime: 4.2e-9,
                weighting: ReferenceWeighting::Intensity
            }
        );
        assert!(config.needs_reference());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_manual_mode() {
        let yaml = "frequency: 80.0\nharmonic: 2\ncalibration:\n  mode: manual\n  phase_shift: -0.3\n  amplitude_scale: 1.1\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.harmonic, 2);
        assert!(!config.needs_reference());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::BadFrequency(_))
        ));

        let mut config = Config {
            frequency: 80.0e6,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.harmonic = 0;
        assert!(matches!(config.validate(), Err(ConfigError::BadHarmonic(0))));

        config.harmonic = 1;
        config.calibration = CalibrationMode::Manual {
            phase_shift: 0.1,
            amplitude_scale: -2.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadCalibration(
                CalibrationError::InvalidParameters(..)
            ))
        ));

        config.calibration = CalibrationMode::Reference {
            lifetime: -1.0,
            weighting: ReferenceWeighting::Uniform,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadCalibration(
                CalibrationError::InvalidLifetime(_)
            ))
        ));
    }

    #[test]
    fn test_config_file() {
        let path = std::env::temp_dir()
            .join(format!("phasor_calib_test_config_{}.yml", std::process::id()));
        let config = Config {
            frequency: 80.0e6,
            harmonic: 1,
            calibration: CalibrationMode::Reference {
                lifetime: 4.2e-9,
                weighting: ReferenceWeighting::Uniform,
            },
        };
        config.write_config_file(&path).unwrap();
        let loaded = Config::read_config_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_file() {
        let path = std::env::temp_dir()
            .join(format!("phasor_calib_does_not_exist_{}.yml", std::process::id()));
        assert!(matches!(
            Config::read_config_file(&path),
            Err(ConfigError::BadFilePath(_))
        ));
    }
}
