//! Unified error types for the sensor core.
//!
//! The signal path itself never fails: stalled sensors, chatter and noise
//! are absorbed by timeouts and filters (see [`crate::sensors`]).  What can
//! fail is setup, i.e. a calibration set that makes no physical sense or a
//! peripheral that refuses to initialise.  Both funnel into [`Error`].
//! All variants are `Copy` so they can be returned from init paths without
//! allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The supplied [`SensorConfig`](crate::config::SensorConfig) was rejected.
    Config(ConfigError),
    /// Timer, GPIO or ADC initialisation failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Reasons a calibration set is refused by `SensorConfig::validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Tick period is zero or longer than one minute.
    TickPeriodOutOfRange,
    /// A pulses-per-rotation constant is zero.
    ZeroPulsesPerRotation,
    /// A silence timeout is zero ticks.
    ZeroSilenceTimeout,
    /// A minimum pulse interval is not shorter than its silence timeout,
    /// so no edge could ever qualify.
    MinPulseExceedsTimeout,
    /// The brake debounce window is zero ticks.
    ZeroDebounceWindow,
    /// The temperature sampling interval is zero ticks.
    ZeroTemperatureInterval,
    /// NTC parameters are non-positive or not finite.
    InvalidThermistor,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickPeriodOutOfRange => write!(f, "tick period out of range"),
            Self::ZeroPulsesPerRotation => write!(f, "pulses per rotation must be non-zero"),
            Self::ZeroSilenceTimeout => write!(f, "silence timeout must be non-zero"),
            Self::MinPulseExceedsTimeout => {
                write!(f, "minimum pulse interval must be below the silence timeout")
            }
            Self::ZeroDebounceWindow => write!(f, "brake debounce window must be non-zero"),
            Self::ZeroTemperatureInterval => {
                write!(f, "temperature sampling interval must be non-zero")
            }
            Self::InvalidThermistor => write!(f, "thermistor parameters invalid"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
