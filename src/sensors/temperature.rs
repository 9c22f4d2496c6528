//! Motor/controller NTC temperature sampler.
//!
//! The thermistor sits in a voltage divider with a fixed resistor and is
//! read through an [`AnalogSource`].  The simplified Beta (Steinhart-Hart)
//! equation converts resistance to temperature.
//!
//! Temperature changes slowly, so it is not tied to the Time Base tick.
//! [`TemperatureSampler::poll`] is called from the main loop; it uses the
//! tick counter only to pace conversions at its own interval.  The result
//! is published to a single atomic so any context can read it without a
//! critical section.

use core::sync::atomic::{AtomicI16, Ordering};

use heapless::HistoryBuffer;
use log::warn;

use super::time_base::elapsed;
use crate::config::{SensorConfig, ThermistorParams};
use crate::ports::AnalogSource;

/// Reading reported for a shorted or open divider (ADC at a rail).
pub const RAIL_CELSIUS: i16 = -40;

const T25_K: f32 = 298.15;
const KELVIN_OFFSET: f32 = 273.15;

static TEMPERATURE_C: AtomicI16 = AtomicI16::new(0);

/// Last published temperature (°C).  0 before the first conversion.
pub fn published() -> i16 {
    TEMPERATURE_C.load(Ordering::Relaxed)
}

/// Raw ADC count to whole degrees Celsius.  `None` when the divider is
/// open or shorted (count at a rail) and no temperature can be derived.
pub fn adc_to_celsius(raw: u16, params: &ThermistorParams) -> Option<i16> {
    let ratio = f32::from(raw) / f32::from(params.adc_max);
    if ratio <= 0.003 || ratio >= 0.997 {
        return None;
    }
    let r_ntc = params.divider_ohm * ratio / (1.0 - ratio);
    let inv_t = (1.0 / T25_K) + (1.0 / params.beta) * (r_ntc / params.r25_ohm).ln();
    if inv_t <= 0.0 {
        return None;
    }
    let celsius = (1.0 / inv_t) - KELVIN_OFFSET;
    Some(celsius.round().clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16)
}

/// Paced two-phase sampler with an `N`-point moving average (`N = 1`
/// stores every conversion as-is).
pub struct TemperatureSampler<A, const N: usize> {
    adc: A,
    params: ThermistorParams,
    interval_ticks: u32,
    /// Tick the running (or last) conversion was started.
    started_at: Option<u32>,
    pending: bool,
    history: HistoryBuffer<i16, N>,
    latest: i16,
}

impl<A: AnalogSource, const N: usize> TemperatureSampler<A, N> {
    pub fn new(adc: A, config: &SensorConfig) -> Self {
        Self {
            adc,
            params: config.thermistor,
            interval_ticks: config.temperature_interval_ticks,
            started_at: None,
            pending: false,
            history: HistoryBuffer::new(),
            latest: 0,
        }
    }

    /// Advance the sampler at tick `now`.  Starts a conversion when one is
    /// due and collects it on a later poll.  Returns the newly stored
    /// reading, if this poll stored one.
    ///
    /// A conversion that has not completed within one interval is
    /// abandoned and restarted; the previous reading is kept meanwhile.
    pub fn poll(&mut self, now: u32) -> Option<i16> {
        if self.pending {
            if let Some(raw) = self.adc.read_result() {
                self.pending = false;
                return Some(self.store(raw));
            }
            let started = self.started_at.unwrap_or(now);
            if elapsed(now, started) < self.interval_ticks {
                return None;
            }
            warn!("temperature: conversion did not complete, restarting");
            self.pending = false;
        }

        let due = self
            .started_at
            .is_none_or(|started| elapsed(now, started) >= self.interval_ticks);
        if due {
            self.adc.start_conversion();
            self.pending = true;
            self.started_at = Some(now);
        }
        None
    }

    /// Most recent stored reading (°C).
    pub fn latest(&self) -> i16 {
        self.latest
    }

    /// A rail reading publishes [`RAIL_CELSIUS`] as-is and restarts the
    /// average.  The fault value is never averaged.
    fn store(&mut self, raw: u16) -> i16 {
        self.latest = match adc_to_celsius(raw, &self.params) {
            Some(celsius) => {
                self.history.write(celsius);
                let sum: i32 = self.history.as_slice().iter().map(|&c| i32::from(c)).sum();
                (sum / self.history.len() as i32) as i16
            }
            None => {
                warn!("temperature: ADC at rail (raw={}), sensor open or shorted", raw);
                self.history.clear();
                RAIL_CELSIUS
            }
        };
        TEMPERATURE_C.store(self.latest, Ordering::Relaxed);
        self.latest
    }
}
