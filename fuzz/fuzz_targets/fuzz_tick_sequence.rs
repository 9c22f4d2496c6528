//! Fuzz target: `SensorCore` tick sequences
//!
//! Derives a calibration from the first bytes, then feeds one tick per
//! remaining byte through the polled line path and checks after every tick:
//! - No panics (rate maths, counter and tick wraparound)
//! - Moving flag and speed rate agree
//! - A crank with no direction reports no cadence
//! - Pulse counters only ever step by the edges seen on that tick
//!
//! cargo fuzz run fuzz_tick_sequence

#![no_main]

use bbshd_sensors::config::SensorConfig;
use bbshd_sensors::ports::LineLevels;
use bbshd_sensors::sensors::SensorCore;
use bbshd_sensors::sensors::capture::EdgeCapture;
use bbshd_sensors::sensors::time_base::TimeBase;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    let config = SensorConfig {
        tick_period_us: 100 + u32::from(data[0]) * 40,
        pas_pulses_per_rotation: u16::from(data[1] % 64) + 1,
        pas_timeout_ticks: u32::from(data[2]) + 1,
        pas_min_pulse_ticks: u32::from(data[3] % 4),
        speed_timeout_ticks: u32::from(data[4]) + 1,
        speed_min_pulse_ticks: 0,
        brake_debounce_ticks: u16::from(data[5] % 16) + 1,
        ..SensorConfig::default()
    };
    if config.validate().is_err() {
        return;
    }

    // Start close to the wrap point so long inputs cross it.
    let start = u32::MAX - u32::from(data[0]);
    let mut core = SensorCore::with_parts(
        &config,
        TimeBase::starting_at(start),
        EdgeCapture::polled(config.brake_active_low),
    );

    for &byte in &data[6..] {
        let levels = LineLevels {
            pas_primary: byte & 0x01 != 0,
            pas_secondary: byte & 0x02 != 0,
            speed: byte & 0x04 != 0,
            brake: byte & 0x08 != 0,
        };
        let before = core.snapshot();
        core.on_tick(&levels);
        let s = core.snapshot();

        assert_eq!(s.tick, before.tick.wrapping_add(1));
        assert_eq!(s.is_moving(), s.speed_ticks_per_minute != 0);
        if !s.is_pedaling_forwards() && !s.is_pedaling_backwards() {
            assert_eq!(s.cadence_rpm, 0, "stopped crank with a cadence");
        }
        assert!(s.pas_pulse_counter.wrapping_sub(before.pas_pulse_counter) <= 1);
        assert!(s.speed_pulse_counter.wrapping_sub(before.speed_pulse_counter) <= 1);
    }
});
