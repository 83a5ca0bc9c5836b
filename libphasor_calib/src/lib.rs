//! # phasor_calib
//!
//! phasor_calib is a small library for fluorescence lifetime phasor analysis, written in
//! Rust. It takes microscope signals sampled over a time/phase axis, projects them into
//! phasor space, and corrects the resulting (G, S) coordinates for the phase delay and
//! modulation loss of the instrument using a reference sample of known lifetime.
//!
//! ## Installation
//!
//! In the future we may deploy to crates.io, but currently the only method of install is
//! from source. Add the library to a `Cargo.toml` by path:
//!
//! ```toml
//! [dependencies]
//! libphasor_calib = { path = "/path/to/phasor_calib/libphasor_calib" }
//! ```
//!
//! ## Overview
//!
//! - [`signal::Signal`] holds a 3-dimensional intensity array, its modulation frequency,
//! and the axis along which it was sampled.
//! - [`phasor::phasor_from_signal`] projects a Signal onto one harmonic, producing a
//! [`phasor::PhasorImage`] of mean intensity, real (G) and imaginary (S) coordinates.
//! - [`calibration::derive_calibration`] computes the phase shift and amplitude scale
//! from a reference image and its known lifetime; [`calibration::apply`] applies them;
//! [`calibration::calibrate`] does both.
//! - [`lifetime`] has the single-exponential helpers (theoretical phasor of a lifetime,
//! apparent phase and modulation lifetimes).
//! - [`cursor::PhasorCursor`] maps an elliptical region of the phasor plot back onto the
//! pixels of the image.
//! - [`process::process_image`] and [`process::process_signal`] run the calibration
//! described by a [`config::Config`].
//!
//! The calibration functions accept `f32` or `f64` coordinates (see
//! [`numeric::PhasorFloat`]); the arithmetic is always done in `f64`.
//!
//! Pixels whose phasor is undefined (e.g. zero intensity) carry `NaN`
//! ([`constants::PHASOR_SENTINEL`]). This is never an error; every operation passes the
//! sentinel through untouched.
//!
//! ## Configuration
//!
//! Configurations are YAML files. The format is as follows:
//!
//! ```yml
//! frequency: 80000000.0
//! harmonic: 1
//! calibration:
//!   mode: reference
//!   lifetime: 4.2e-9
//!   weighting: intensity
//! ```
//!
//! - `frequency`: the modulation frequency of the acquisition. Any unit may be used as
//! long as `lifetime` is in the reciprocal unit (Hz and s, MHz and µs).
//! - `harmonic`: the harmonic to project onto. Defaults to 1.
//! - `calibration`: one of
//!   - `mode: none`
//!   - `mode: reference` with `lifetime` and an optional `weighting` (`intensity` or
//!   `uniform`)
//!   - `mode: manual` with `phase_shift` (radians) and `amplitude_scale`
//!
//! ## Logging
//!
//! The library logs through [spdlog-rs](https://github.com/SpriteOvO/spdlog-rs). Use
//! [`logging::init_file_logger`] to send the log to a file.
pub mod calibration;
pub mod config;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod lifetime;
pub mod logging;
pub mod numeric;
pub mod phasor;
pub mod process;
pub mod signal;
