//! Sensor subsystem: the engines and the aggregating [`SensorCore`].
//!
//! ```text
//!  GPIO ISR ──▶ capture latches ─┐
//!                                ▼
//!  Timer ISR ──▶ on_timer_tick ──▶ SensorCore::on_tick
//!                                   ├─ TimeBase::advance
//!                                   ├─ PasEngine    (age, edges)
//!                                   ├─ SpeedEngine  (age, edges)
//!                                   └─ BrakeInput   (debounce)
//!
//!  Main loop ──▶ TemperatureSampler::poll ──▶ atomic
//!  Main loop ──▶ snapshot() / cadence_rpm() / brake_is_activated() ...
//! ```
//!
//! The core is owned by a `critical_section::Mutex`.  The timer handler
//! mutates it inside one critical section per tick; readers copy it out
//! inside one critical section, so a reader never sees the speed rate of
//! one tick paired with the moving flag of another.  On a single core the
//! critical section only masks interrupts for a few instructions.

pub mod brake;
pub mod capture;
pub mod monitor;
pub mod pas;
pub mod speed;
pub mod temperature;
pub mod time_base;

use core::cell::RefCell;

use critical_section::Mutex;
use log::info;
use serde::Serialize;

use crate::config::SensorConfig;
use crate::error::Result;
use crate::ports::{LineLevels, LineSampler};
use brake::BrakeInput;
use capture::{EdgeCapture, TickInput};
use pas::{Direction, PasEngine};
use speed::SpeedEngine;
use time_base::TimeBase;

/// A consistent copy of every sensor reading at one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SensorSnapshot {
    /// Time Base tick the snapshot was taken at.
    pub tick: u32,
    /// Free-running PAS pulse count (wraps).
    pub pas_pulse_counter: u16,
    /// Crank cadence (rpm), 0 when not pedaling.
    pub cadence_rpm: u16,
    pub pedaling: Direction,
    /// Free-running speed sensor pulse count (wraps).
    pub speed_pulse_counter: u16,
    /// Wheel rate (sensor revolutions per minute), 0 when not moving.
    pub speed_ticks_per_minute: u16,
    pub brake_activated: bool,
    /// Latest temperature reading (°C).
    pub temperature_c: i16,
}

impl SensorSnapshot {
    pub fn is_pedaling_forwards(&self) -> bool {
        self.pedaling == Direction::Forward
    }

    pub fn is_pedaling_backwards(&self) -> bool {
        self.pedaling == Direction::Backward
    }

    pub fn is_moving(&self) -> bool {
        self.speed_ticks_per_minute != 0
    }
}

/// All tick-driven sensor state.
pub struct SensorCore {
    time_base: TimeBase,
    capture: EdgeCapture,
    pas: PasEngine,
    speed: SpeedEngine,
    brake: BrakeInput,
}

impl SensorCore {
    /// Validate `config`, then build.
    pub fn try_new(config: &SensorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Build without validation.  `config` must pass
    /// [`SensorConfig::validate`]: a zero tick period or zero pulses per
    /// rotation panics on the rate division.
    pub fn new(config: &SensorConfig) -> Self {
        Self::with_parts(
            config,
            TimeBase::new(),
            EdgeCapture::new(config.capture, config.brake_active_low),
        )
    }

    /// Build with an explicit tick origin and capture front end.
    pub fn with_parts(config: &SensorConfig, time_base: TimeBase, capture: EdgeCapture) -> Self {
        Self {
            time_base,
            capture,
            pas: PasEngine::new(config),
            speed: SpeedEngine::new(config),
            brake: BrakeInput::new(config.brake_debounce_ticks),
        }
    }

    /// One Time Base tick with freshly sampled line levels.
    pub fn on_tick(&mut self, levels: &LineLevels) {
        let input = self.capture.capture(levels);
        self.apply(input);
    }

    /// One Time Base tick with already captured edges.
    pub fn apply(&mut self, input: TickInput) {
        let now = self.time_base.advance();

        self.pas.age(now);
        for _ in 0..input.pas_edges {
            self.pas.record_edge(now, input.pas_secondary_high);
        }

        self.speed.age(now);
        for _ in 0..input.speed_edges {
            self.speed.record_edge(now);
        }

        self.brake.update(input.brake_pulled);
    }

    pub fn now(&self) -> u32 {
        self.time_base.now()
    }

    pub fn pas(&self) -> &PasEngine {
        &self.pas
    }

    pub fn speed(&self) -> &SpeedEngine {
        &self.speed
    }

    pub fn brake(&self) -> &BrakeInput {
        &self.brake
    }

    /// Copy of the tick-driven readings.  `temperature_c` is left at 0;
    /// [`snapshot`] fills it from the temperature sampler.
    pub fn snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            tick: self.time_base.now(),
            pas_pulse_counter: self.pas.pulse_counter(),
            cadence_rpm: self.pas.cadence_rpm(),
            pedaling: self.pas.direction(),
            speed_pulse_counter: self.speed.pulse_counter(),
            speed_ticks_per_minute: self.speed.ticks_per_minute(),
            brake_activated: self.brake.is_activated(),
            temperature_c: 0,
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Firmware-wide instance
// ═══════════════════════════════════════════════════════════════

static CORE: Mutex<RefCell<Option<SensorCore>>> = Mutex::new(RefCell::new(None));

/// Validate `config` and install a fresh sensor core.  Until this is
/// called every accessor reads the stopped/zero state.  Calling it again
/// resets all sensor state.
pub fn init(config: &SensorConfig) -> Result<()> {
    let core = SensorCore::try_new(config)?;
    critical_section::with(|cs| CORE.borrow_ref_mut(cs).replace(core));
    info!(
        "sensors: init tick={}us pas={}ppr/{}t speed={}ppr/{}t brake={}t capture={:?}",
        config.tick_period_us,
        config.pas_pulses_per_rotation,
        config.pas_timeout_ticks,
        config.speed_pulses_per_rotation,
        config.speed_timeout_ticks,
        config.brake_debounce_ticks,
        config.capture,
    );
    Ok(())
}

/// Time Base interrupt body.  Samples the lines and runs one tick.
/// Does nothing before [`init`].
pub fn on_timer_tick<L: LineSampler + ?Sized>(lines: &mut L) {
    let levels = lines.sample();
    critical_section::with(|cs| {
        if let Some(core) = CORE.borrow_ref_mut(cs).as_mut() {
            core.on_tick(&levels);
        }
    });
}

/// Current tick count (0 before [`init`]).
pub fn now() -> u32 {
    critical_section::with(|cs| CORE.borrow_ref(cs).as_ref().map_or(0, SensorCore::now))
}

/// Consistent copy of every reading.
pub fn snapshot() -> SensorSnapshot {
    let mut snap = critical_section::with(|cs| {
        CORE.borrow_ref(cs)
            .as_ref()
            .map(SensorCore::snapshot)
            .unwrap_or_default()
    });
    snap.temperature_c = temperature::published();
    snap
}

pub fn cadence_rpm() -> u16 {
    snapshot().cadence_rpm
}

pub fn pas_pulse_counter() -> u16 {
    snapshot().pas_pulse_counter
}

pub fn is_pedaling_forwards() -> bool {
    snapshot().is_pedaling_forwards()
}

pub fn is_pedaling_backwards() -> bool {
    snapshot().is_pedaling_backwards()
}

pub fn speed_is_moving() -> bool {
    snapshot().is_moving()
}

pub fn speed_ticks_per_minute() -> u16 {
    snapshot().speed_ticks_per_minute
}

pub fn brake_is_activated() -> bool {
    snapshot().brake_activated
}

/// Latest temperature (°C).  Lock-free.
pub fn temperature() -> i16 {
    temperature::published()
}
