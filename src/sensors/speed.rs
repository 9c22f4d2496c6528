//! Wheel speed sensor (spoke magnet + reed/Hall switch).
//!
//! Same period-to-rate conversion as the PAS engine, one channel, no
//! direction.  The rate is the only motion state kept: "moving" is defined
//! as `rate != 0`, so the two readings can never disagree.  While a rate is
//! established it is clamped to at least 1; when the silence timeout
//! expires it is forced to 0.
//!
//! The first edge after standstill only arms the engine.  The wheel is
//! reported moving from the second edge inside the timeout window, when a
//! period exists to derive a rate from.

use super::pas::rate_per_minute;
use super::time_base::elapsed;
use crate::config::SensorConfig;

#[derive(Debug, Clone, Copy)]
pub struct SpeedEngine {
    ticks_per_minute: u32,
    pulses_per_rotation: u16,
    timeout_ticks: u32,
    min_pulse_ticks: u32,

    pulse_counter: u16,
    last_edge: Option<u32>,
    ticks_per_minute_rate: u16,
}

impl SpeedEngine {
    /// `config` must have passed [`SensorConfig::validate`].
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            ticks_per_minute: config.ticks_per_minute(),
            pulses_per_rotation: config.speed_pulses_per_rotation,
            timeout_ticks: config.speed_timeout_ticks,
            min_pulse_ticks: config.speed_min_pulse_ticks,
            pulse_counter: 0,
            last_edge: None,
            ticks_per_minute_rate: 0,
        }
    }

    /// Apply a sensor edge seen at tick `now`.  Returns `false` if it was
    /// rejected as a bounce.
    pub fn record_edge(&mut self, now: u32) -> bool {
        if let Some(last) = self.last_edge {
            let since = elapsed(now, last);
            if since < self.min_pulse_ticks {
                return false;
            }
            if since > 0 {
                self.ticks_per_minute_rate =
                    rate_per_minute(self.ticks_per_minute, since, self.pulses_per_rotation).max(1);
            }
        }
        self.pulse_counter = self.pulse_counter.wrapping_add(1);
        self.last_edge = Some(now);
        true
    }

    /// Silence check, run once per tick before that tick's edges.
    pub fn age(&mut self, now: u32) {
        if let Some(last) = self.last_edge {
            if elapsed(now, last) > self.timeout_ticks {
                self.last_edge = None;
                self.ticks_per_minute_rate = 0;
            }
        }
    }

    pub fn pulse_counter(&self) -> u16 {
        self.pulse_counter
    }

    pub fn is_moving(&self) -> bool {
        self.ticks_per_minute_rate != 0
    }

    /// Sensor revolutions per minute; 0 whenever [`is_moving`](Self::is_moving) is false.
    pub fn ticks_per_minute(&self) -> u16 {
        self.ticks_per_minute_rate
    }
}
