//! Mock hardware for integration tests.
//!
//! [`MockPin`]s share their level with the test through an `Rc<Cell<_>>`,
//! so a test can move a line while the [`PinLines`] sampler owns the pin.
//! [`Bench`] wires them into a [`SensorCore`] and offers pulse-train helpers
//! in Time Base ticks.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use bbshd_sensors::config::SensorConfig;
use bbshd_sensors::ports::{AnalogSource, LineSampler, PinLines};
use bbshd_sensors::sensors::{SensorCore, SensorSnapshot};
use embedded_hal::digital::{ErrorType, InputPin};

// ── MockPin ───────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPin(Rc<Cell<bool>>);

#[allow(dead_code)]
impl MockPin {
    pub fn set(&self, high: bool) {
        self.0.set(high);
    }

    pub fn get(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

// ── Bench ─────────────────────────────────────────────────────

pub struct Bench {
    pub core: SensorCore,
    lines: PinLines<MockPin, MockPin, MockPin, MockPin>,
    pub pas_a: MockPin,
    pub pas_b: MockPin,
    pub speed: MockPin,
    pub brake: MockPin,
}

#[allow(dead_code)]
impl Bench {
    pub fn new(config: &SensorConfig) -> Self {
        let pas_a = MockPin::default();
        let pas_b = MockPin::default();
        let speed = MockPin::default();
        let brake = MockPin::default();
        // Released lever: idle level is the inactive one.
        brake.set(config.brake_active_low);
        let lines = PinLines::new(
            pas_a.clone(),
            pas_b.clone(),
            speed.clone(),
            brake.clone(),
            config.brake_active_low,
        );
        let mut bench = Self {
            core: SensorCore::new(config),
            lines,
            pas_a,
            pas_b,
            speed,
            brake,
        };
        // Power-up sample: seeds the edge detectors with the idle levels.
        bench.tick();
        bench
    }

    /// Run one Time Base tick with the current pin levels.
    pub fn tick(&mut self) {
        let levels = self.lines.sample();
        self.core.on_tick(&levels);
    }

    pub fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// One PAS pulse: primary rises on this tick with the secondary at
    /// `secondary_high`, then both lines return low on the next tick.
    /// Consumes two ticks.
    pub fn pas_pulse(&mut self, secondary_high: bool) {
        self.pas_b.set(secondary_high);
        self.pas_a.set(true);
        self.tick();
        self.pas_a.set(false);
        self.pas_b.set(false);
        self.tick();
    }

    /// PAS pulses with rising edges exactly `period` ticks apart
    /// (`period >= 2`).  Leaves the Time Base just after the last edge.
    pub fn pas_train(&mut self, pulses: u32, period: u32, secondary_high: bool) {
        for i in 0..pulses {
            if i > 0 {
                self.ticks(period - 2);
            }
            self.pas_pulse(secondary_high);
        }
    }

    /// Speed pulses `period` ticks apart (`period >= 2`).
    pub fn speed_train(&mut self, pulses: u32, period: u32) {
        for i in 0..pulses {
            if i > 0 {
                self.ticks(period - 2);
            }
            self.speed.set(true);
            self.tick();
            self.speed.set(false);
            self.tick();
        }
    }

    /// Drive the brake line to the pulled (`true`) or released level.
    pub fn set_brake(&mut self, pulled: bool, active_low: bool) {
        self.brake.set(pulled != active_low);
    }

    pub fn snap(&self) -> SensorSnapshot {
        self.core.snapshot()
    }
}

// ── ScriptedAdc ───────────────────────────────────────────────

/// Converter that returns queued results one per started conversion,
/// completing `latency` polls after the start.
pub struct ScriptedAdc {
    pub results: VecDeque<Option<u16>>,
    latency: u32,
    in_flight: Option<u32>,
    pub starts: u32,
}

#[allow(dead_code)]
impl ScriptedAdc {
    pub fn new(latency: u32) -> Self {
        Self {
            results: VecDeque::new(),
            latency,
            in_flight: None,
            starts: 0,
        }
    }

    pub fn queue(&mut self, raw: Option<u16>) {
        self.results.push_back(raw);
    }
}

impl AnalogSource for ScriptedAdc {
    fn start_conversion(&mut self) {
        self.starts += 1;
        self.in_flight = Some(self.latency);
    }

    fn read_result(&mut self) -> Option<u16> {
        let remaining = self.in_flight?;
        if remaining > 0 {
            self.in_flight = Some(remaining - 1);
            return None;
        }
        self.in_flight = None;
        self.results.pop_front().flatten()
    }
}
