//! Pedal-assist sensor: pedaling direction and crank cadence.
//!
//! The PAS ring carries two Hall channels offset by a quarter pulse.  On a
//! rising edge of the primary channel the secondary channel is already high
//! when the crank turns forward and still low when it turns backward, so
//! its level at that instant is the direction.
//!
//! Cadence comes from the tick distance between the two most recent
//! qualifying edges:
//!
//! ```text
//!                ticks_per_minute
//! rpm = ─────────────────────────────────   (floor, saturating)
//!        elapsed_ticks × pulses_per_rotation
//! ```
//!
//! Once no edge has been seen for more than the silence timeout the crank
//! is considered stopped: cadence reads 0 and direction [`Direction::None`].

use serde::{Deserialize, Serialize};

use super::time_base::elapsed;
use crate::config::SensorConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    /// Crank stopped (silence timeout) or never moved.
    #[default]
    None,
}

/// `ticks_per_minute / (elapsed × pulses_per_rotation)`, floored and
/// saturated.  Shared with the speed engine.  `elapsed` must be non-zero.
pub(crate) fn rate_per_minute(ticks_per_minute: u32, elapsed_ticks: u32, pulses_per_rotation: u16) -> u16 {
    let divisor = u64::from(elapsed_ticks) * u64::from(pulses_per_rotation);
    let rate = u64::from(ticks_per_minute) / divisor;
    u16::try_from(rate).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, Copy)]
pub struct PasEngine {
    ticks_per_minute: u32,
    pulses_per_rotation: u16,
    timeout_ticks: u32,
    min_pulse_ticks: u32,
    invert: bool,

    pulse_counter: u16,
    /// Tick of the last qualifying edge; `None` once it is older than the
    /// silence timeout.
    last_edge: Option<u32>,
    cadence_rpm: u16,
    direction: Direction,
}

impl PasEngine {
    /// `config` must have passed [`SensorConfig::validate`].
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            ticks_per_minute: config.ticks_per_minute(),
            pulses_per_rotation: config.pas_pulses_per_rotation,
            timeout_ticks: config.pas_timeout_ticks,
            min_pulse_ticks: config.pas_min_pulse_ticks,
            invert: config.pas_invert_direction,
            pulse_counter: 0,
            last_edge: None,
            cadence_rpm: 0,
            direction: Direction::None,
        }
    }

    /// Apply a rising edge on the primary channel seen at tick `now`.
    /// `secondary_high` is the secondary channel level captured with the
    /// edge.  Returns `false` if the edge was rejected as noise.
    pub fn record_edge(&mut self, now: u32, secondary_high: bool) -> bool {
        let since = self.last_edge.map(|last| elapsed(now, last));

        if let Some(since) = since {
            if since < self.min_pulse_ticks {
                return false;
            }
            // Two edges within one tick: keep the previous cadence.
            if since > 0 {
                self.cadence_rpm =
                    rate_per_minute(self.ticks_per_minute, since, self.pulses_per_rotation);
            }
        }

        self.pulse_counter = self.pulse_counter.wrapping_add(1);
        self.direction = if secondary_high != self.invert {
            Direction::Forward
        } else {
            Direction::Backward
        };
        self.last_edge = Some(now);
        true
    }

    /// Silence check, run once per tick before that tick's edges.
    pub fn age(&mut self, now: u32) {
        if let Some(last) = self.last_edge {
            if elapsed(now, last) > self.timeout_ticks {
                self.last_edge = None;
                self.cadence_rpm = 0;
                self.direction = Direction::None;
            }
        }
    }

    /// Free-running count of qualifying edges; wraps.  Not reset by the
    /// silence timeout.
    pub fn pulse_counter(&self) -> u16 {
        self.pulse_counter
    }

    pub fn cadence_rpm(&self) -> u16 {
        self.cadence_rpm
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_pedaling_forwards(&self) -> bool {
        self.direction == Direction::Forward
    }

    pub fn is_pedaling_backwards(&self) -> bool {
        self.direction == Direction::Backward
    }
}
