//! Sensor core bring-up firmware.
//!
//! Starts the Time Base and runs the main-context half of the sensor core:
//! temperature sampling and change logging.  The motor control loop that
//! consumes the readings links against the library and reads them through
//! the `sensors` accessors.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  esp_timer (Time Base) ──▶ sensors::on_timer_tick            │
//! │  GPIO ISR (latched)    ──▶ capture latches                   │
//! │                                                              │
//! │  main loop ──▶ TemperatureSampler::poll                      │
//! │            ──▶ sensors::snapshot ──▶ SensorMonitor (log)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::info;

use bbshd_sensors::adapters::hardware::BoardAdc;
use bbshd_sensors::config::{CaptureMode, SensorConfig};
use bbshd_sensors::drivers::{hw_init, hw_timer::HwTickTimer};
use bbshd_sensors::ports::TickSource;
use bbshd_sensors::sensors::{self, monitor::SensorMonitor, temperature::TemperatureSampler};

/// Main loop period.
const LOOP_MS: u32 = 10;
/// Status line period, in loop iterations.
const STATUS_EVERY: u32 = 100;
/// Temperature moving-average depth.
const TEMP_FILTER_LEN: usize = 4;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("bbshd-sensors v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals()?;

    let config = SensorConfig::default();
    if config.capture == CaptureMode::Latched {
        hw_init::init_isr_service()?;
    }

    // ── 3. Sensor core + Time Base ────────────────────────────
    sensors::init(&config)?;
    let mut timer = HwTickTimer::new();
    timer.start_periodic(config.tick_period_us)?;

    let mut temperature: TemperatureSampler<_, TEMP_FILTER_LEN> =
        TemperatureSampler::new(BoardAdc::new(), &config);
    let mut monitor = SensorMonitor::new();

    info!("System ready. Entering main loop.");

    // ── 4. Main loop ──────────────────────────────────────────
    let mut iteration: u32 = 0;
    loop {
        temperature.poll(sensors::now());

        let snap = sensors::snapshot();
        monitor.update(&snap);

        iteration = iteration.wrapping_add(1);
        if iteration % STATUS_EVERY == 0 {
            info!(
                "cadence={}rpm pas={:?} speed={}/min brake={} temp={}C",
                snap.cadence_rpm,
                snap.pedaling,
                snap.speed_ticks_per_minute,
                snap.brake_activated,
                snap.temperature_c,
            );
        }

        FreeRtos::delay_ms(LOOP_MS);
    }
}
