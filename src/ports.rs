//! Port traits: the boundary between the signal-processing core and the
//! timer/GPIO/ADC peripherals of a particular board.
//!
//! ```text
//!   Peripheral driver ──▶ Port trait ──▶ SensorCore / TemperatureSampler
//! ```
//!
//! The engines in [`crate::sensors`] never touch registers.  A target
//! provides one implementation of each trait (see `drivers` for ESP-IDF,
//! [`PinLines`] for any `embedded-hal` board) and tests provide mocks.

use embedded_hal::digital::InputPin;

use crate::drivers::hw_init::HwInitError;

// ───────────────────────────────────────────────────────────────
// Time Base
// ───────────────────────────────────────────────────────────────

/// A periodic interrupt source.  Every expiry must end up in
/// [`sensors::on_timer_tick`](crate::sensors::on_timer_tick).
pub trait TickSource {
    /// Configure and start the periodic tick.
    fn start_periodic(&mut self, period_us: u32) -> Result<(), HwInitError>;

    /// Stop ticking.  Sensor state freezes; accessors keep the last values.
    fn stop(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Digital inputs
// ───────────────────────────────────────────────────────────────

/// Electrical levels of every digital sensor line at one instant.
/// `true` = high.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineLevels {
    /// PAS primary channel (the pulse reference).
    pub pas_primary: bool,
    /// PAS secondary channel (phase discriminant).
    pub pas_secondary: bool,
    pub speed: bool,
    pub brake: bool,
}

/// Reads the level of every sensor line.  Called once per tick from the
/// Time Base handler, so implementations must not block.
pub trait LineSampler {
    fn sample(&mut self) -> LineLevels;
}

/// [`LineSampler`] over four `embedded-hal` input pins.
///
/// A failed pin read is mapped to the safe reading: low (no edge) for the
/// pulse lines and *activated* for the brake.
pub struct PinLines<A, B, S, K> {
    pub pas_primary: A,
    pub pas_secondary: B,
    pub speed: S,
    pub brake: K,
    brake_active_low: bool,
}

impl<A, B, S, K> PinLines<A, B, S, K>
where
    A: InputPin,
    B: InputPin,
    S: InputPin,
    K: InputPin,
{
    pub fn new(pas_primary: A, pas_secondary: B, speed: S, brake: K, brake_active_low: bool) -> Self {
        Self {
            pas_primary,
            pas_secondary,
            speed,
            brake,
            brake_active_low,
        }
    }
}

impl<A, B, S, K> LineSampler for PinLines<A, B, S, K>
where
    A: InputPin,
    B: InputPin,
    S: InputPin,
    K: InputPin,
{
    fn sample(&mut self) -> LineLevels {
        // Primary is read last so the secondary level is never older than
        // the primary level it is compared against.
        let pas_secondary = self.pas_secondary.is_high().unwrap_or(false);
        let pas_primary = self.pas_primary.is_high().unwrap_or(false);
        let speed = self.speed.is_high().unwrap_or(false);
        // Active level on error.
        let brake = self.brake.is_high().unwrap_or(!self.brake_active_low);
        LineLevels {
            pas_primary,
            pas_secondary,
            speed,
            brake,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Analog input
// ───────────────────────────────────────────────────────────────

/// Two-phase analog conversion: start, then collect on a later poll.
/// Converters that complete synchronously simply return the result on the
/// first [`read_result`](AnalogSource::read_result) after a start.
pub trait AnalogSource {
    fn start_conversion(&mut self);

    /// Raw count of the last started conversion, `None` while it is still
    /// running or if it failed.
    fn read_result(&mut self) -> Option<u16>;
}
