use super::calibration::CalibrationParameters;
use super::config::{CalibrationMode, Config};
use super::error::ProcessorError;
use super::phasor::{phasor_from_signal, PhasorImage};
use super::signal::Signal;

/// Resolve the calibration parameters requested by the config.
///
/// Returns None if the config asks for no calibration.
pub fn resolve_parameters(
    config: &Config,
    reference: Option<&PhasorImage>,
) -> Result<Option<CalibrationParameters>, ProcessorError> {
    match config.calibration {
        CalibrationMode::None => Ok(None),
        CalibrationMode::Manual {
            phase_shift,
            amplitude_scale,
        } => Ok(Some(CalibrationParameters::manual(
            phase_shift,
            amplitude_scale,
        )?)),
        CalibrationMode::Reference {
            lifetime,
            weighting,
        } => {
            let reference = reference.ok_or(ProcessorError::MissingReference)?;
            let undefined = reference.count_undefined();
            if undefined > 0 {
                spdlog::warn!(
                    "{} of {} reference pixels have an undefined phasor and will be excluded",
                    undefined,
                    reference.mean.len()
                );
            }
            Ok(Some(CalibrationParameters::from_reference(
                reference,
                config.frequency,
                lifetime,
                config.harmonic,
                weighting,
            )?))
        }
    }
}

/// Calibrate one phasor image as described by the config.
///
/// A reference image is required when the config uses reference calibration and is
/// ignored otherwise.
pub fn process_image(
    config: &Config,
    image: &PhasorImage,
    reference: Option<&PhasorImage>,
) -> Result<PhasorImage, ProcessorError> {
    config.validate()?;
    let (rows, cols) = image.dim();
    spdlog::info!("Processing {}x{} phasor image...", rows, cols);

    let calibrated = match resolve_parameters(config, reference)? {
        Some(params) => {
            spdlog::info!(
                "Applying calibration -- phase shift: {:.6} rad amplitude scale: {:.6}",
                params.phase_shift,
                params.amplitude_scale
            );
            image.calibrated(&params)?
        }
        None => {
            spdlog::info!("No calibration requested, phasors are left as measured.");
            image.clone()
        }
    };

    spdlog::info!("Done processing phasor image.");
    Ok(calibrated)
}

/// Project a signal (and optionally its reference) into phasor space and calibrate it.
///
/// The signal's own frequency is used for calibration; if it differs from the
/// configured frequency a warning is logged. The reference must have been acquired at
/// the same frequency as the sample.
pub fn process_signal(
    config: &Config,
    signal: &Signal,
    reference_signal: Option<&Signal>,
) -> Result<PhasorImage, ProcessorError> {
    config.validate()?;
    let config = if signal.frequency() != config.frequency {
        spdlog::warn!(
            "Signal frequency {} differs from configured frequency {}; using the signal frequency",
            signal.frequency(),
            config.frequency
        );
        Config {
            frequency: signal.frequency(),
            ..config.clone()
        }
    } else {
        config.clone()
    };

    let image = phasor_from_signal(signal, config.harmonic)?;
    let reference = match reference_signal {
        Some(reference_signal) if config.needs_reference() => {
            if reference_signal.frequency() != signal.frequency() {
                return Err(ProcessorError::FrequencyMismatch(
                    signal.frequency(),
                    reference_signal.frequency(),
                ));
            }
            Some(phasor_from_signal(reference_signal, config.harmonic)?)
        }
        Some(_) => {
            spdlog::warn!("Reference signal given but not used by the calibration mode");
            None
        }
        None => None,
    };

    process_image(&config, &image, reference.as_ref())
}
