//! Calibration parameters for the sensor core.
//!
//! Every scaling constant lives here rather than in the engines: pulses per
//! rotation, silence timeouts and the debounce window depend on the sensor
//! fitted and on the Time Base period, so they are supplied at
//! [`init`](crate::sensors::init) time.  Durations are stored in ticks
//! because that is the only time reference the tick handler has; use
//! [`SensorConfig::ms_to_ticks`] to derive them from wall-clock figures.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Microseconds in one minute.
const US_PER_MINUTE: u32 = 60_000_000;

/// How pulse edges reach the tick handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// Line levels are sampled on every tick and edges are detected by
    /// comparing against the previous sample.
    Polled,
    /// GPIO interrupts latch edges (and the PAS phase) as they happen; the
    /// tick handler drains the latches.
    Latched,
}

/// NTC thermistor in a voltage divider against a fixed resistor to ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermistorParams {
    /// Resistance at 25 °C (Ohm).
    pub r25_ohm: f32,
    /// Beta coefficient (K).
    pub beta: f32,
    /// Fixed divider resistor (Ohm).
    pub divider_ohm: f32,
    /// Full-scale ADC count.
    pub adc_max: u16,
}

impl Default for ThermistorParams {
    fn default() -> Self {
        Self {
            r25_ohm: 10_000.0,
            beta: 3950.0,
            divider_ohm: 10_000.0,
            adc_max: 4095,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    // --- Time Base ---
    /// Period of the Time Base interrupt (microseconds).
    pub tick_period_us: u32,
    /// Edge capture strategy for the PAS and speed lines.
    pub capture: CaptureMode,

    // --- PAS ---
    /// Pulses emitted on the primary channel per crank revolution.
    pub pas_pulses_per_rotation: u16,
    /// Ticks without a qualifying edge before cadence drops to zero.
    pub pas_timeout_ticks: u32,
    /// Edges closer than this to the previous one are noise (0 = off).
    pub pas_min_pulse_ticks: u32,
    /// Swap forward/backward for sensors mounted mirrored.
    pub pas_invert_direction: bool,

    // --- Speed sensor ---
    /// Magnets (pulses) per wheel revolution.
    pub speed_pulses_per_rotation: u16,
    /// Ticks without an edge before the wheel is considered stopped.
    pub speed_timeout_ticks: u32,
    /// Edges closer than this to the previous one are noise (0 = off).
    pub speed_min_pulse_ticks: u32,

    // --- Brake ---
    /// Consecutive ticks a new level must persist before it is accepted.
    pub brake_debounce_ticks: u16,
    /// Brake lever switch pulls the line low when pulled.
    pub brake_active_low: bool,

    // --- Temperature ---
    /// Ticks between temperature conversions.
    pub temperature_interval_ticks: u32,
    pub thermistor: ThermistorParams,
}

impl Default for SensorConfig {
    fn default() -> Self {
        // 500 µs tick: 2000 ticks per second.
        let tick_period_us = 500;
        Self {
            tick_period_us,
            capture: CaptureMode::Polled,

            // BBSHD internal PAS: 24 pulses per crank turn. 500 ms of
            // silence is about 5 rpm.
            pas_pulses_per_rotation: 24,
            pas_timeout_ticks: ms_to_ticks(500, tick_period_us),
            pas_min_pulse_ticks: 0,
            pas_invert_direction: false,

            // Single spoke magnet; 4 s of silence is walking pace on a
            // 29" wheel.
            speed_pulses_per_rotation: 1,
            speed_timeout_ticks: ms_to_ticks(4000, tick_period_us),
            speed_min_pulse_ticks: ms_to_ticks(20, tick_period_us),

            brake_debounce_ticks: debounce_window(10, tick_period_us),
            brake_active_low: true,

            temperature_interval_ticks: ms_to_ticks(1000, tick_period_us),
            thermistor: ThermistorParams::default(),
        }
    }
}

const fn ms_to_ticks(ms: u32, tick_period_us: u32) -> u32 {
    ms.saturating_mul(1000) / tick_period_us
}

/// Debounce window in ticks, saturated to the `u16` counter and never 0.
fn debounce_window(ms: u32, tick_period_us: u32) -> u16 {
    u16::try_from(ms_to_ticks(ms, tick_period_us))
        .unwrap_or(u16::MAX)
        .max(1)
}

impl SensorConfig {
    /// Time Base ticks in one minute.  Numerator of every rate formula.
    pub const fn ticks_per_minute(&self) -> u32 {
        US_PER_MINUTE / self.tick_period_us
    }

    /// Convert a wall-clock duration into whole ticks (rounded down).
    pub const fn ms_to_ticks(&self, ms: u32) -> u32 {
        ms_to_ticks(ms, self.tick_period_us)
    }

    /// Reject calibration sets the engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_us == 0 || self.tick_period_us > US_PER_MINUTE {
            return Err(ConfigError::TickPeriodOutOfRange);
        }
        if self.pas_pulses_per_rotation == 0 || self.speed_pulses_per_rotation == 0 {
            return Err(ConfigError::ZeroPulsesPerRotation);
        }
        if self.pas_timeout_ticks == 0 || self.speed_timeout_ticks == 0 {
            return Err(ConfigError::ZeroSilenceTimeout);
        }
        if self.pas_min_pulse_ticks >= self.pas_timeout_ticks
            || self.speed_min_pulse_ticks >= self.speed_timeout_ticks
        {
            return Err(ConfigError::MinPulseExceedsTimeout);
        }
        if self.brake_debounce_ticks == 0 {
            return Err(ConfigError::ZeroDebounceWindow);
        }
        if self.temperature_interval_ticks == 0 {
            return Err(ConfigError::ZeroTemperatureInterval);
        }
        let t = &self.thermistor;
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(t.r25_ohm) || !positive(t.beta) || !positive(t.divider_ohm) || t.adc_max == 0
        {
            return Err(ConfigError::InvalidThermistor);
        }
        Ok(())
    }
}
