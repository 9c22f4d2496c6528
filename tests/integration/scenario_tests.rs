//! End-to-end scenarios: mock pins → PinLines → SensorCore.

use super::mock_hw::Bench;

use bbshd_sensors::config::SensorConfig;
use bbshd_sensors::ports::LineLevels;
use bbshd_sensors::sensors::SensorCore;
use bbshd_sensors::sensors::capture::{EdgeCapture, EdgeLatch, PasLatch};
use bbshd_sensors::sensors::pas::Direction;
use bbshd_sensors::sensors::time_base::TimeBase;

/// 5 ms Time Base, 2 s silence timeout, 2 PAS pulses per crank turn,
/// 10-tick brake window.
fn five_ms_config() -> SensorConfig {
    SensorConfig {
        tick_period_us: 5_000,
        pas_pulses_per_rotation: 2,
        pas_timeout_ticks: 400,
        speed_pulses_per_rotation: 1,
        speed_timeout_ticks: 400,
        speed_min_pulse_ticks: 0,
        brake_debounce_ticks: 10,
        brake_active_low: true,
        ..SensorConfig::default()
    }
}

// ── Cadence ───────────────────────────────────────────────────

#[test]
fn two_edges_500ms_apart_is_60rpm_then_stops() {
    let mut bench = Bench::new(&five_ms_config());

    bench.pas_train(2, 100, true);
    let s = bench.snap();
    assert_eq!(s.cadence_rpm, 60);
    assert!(s.is_pedaling_forwards());
    assert!(!s.is_pedaling_backwards());

    // One tick past the edge already; 399 more = 400 since the edge.
    bench.ticks(399);
    assert_eq!(bench.snap().cadence_rpm, 60, "exactly at the threshold");

    bench.tick();
    let s = bench.snap();
    assert_eq!(s.cadence_rpm, 0);
    assert_eq!(s.pedaling, Direction::None);
    assert!(!s.is_pedaling_forwards() && !s.is_pedaling_backwards());
    assert_eq!(s.pas_pulse_counter, 2, "timeout leaves the counter alone");
}

#[test]
fn default_calibration_reads_realistic_cadence() {
    // 24 pulses per turn at 500 µs: 60 rpm is one edge every ~83 ticks.
    let mut bench = Bench::new(&SensorConfig::default());
    bench.pas_train(5, 83, true);
    assert_eq!(bench.snap().cadence_rpm, 60);
    bench.pas_train(2, 28, true);
    // 120000 / (28 * 24) = 178.5
    assert_eq!(bench.snap().cadence_rpm, 178);
}

#[test]
fn direction_follows_phase_at_every_edge() {
    let mut bench = Bench::new(&five_ms_config());
    let phases = [true, true, false, true, false, false, true];
    for &secondary_high in &phases {
        bench.pas_pulse(secondary_high);
        let s = bench.snap();
        assert_eq!(s.is_pedaling_forwards(), secondary_high);
        assert_eq!(s.is_pedaling_backwards(), !secondary_high);
        bench.ticks(20);
    }
    assert_eq!(bench.snap().pas_pulse_counter, phases.len() as u16);
}

#[test]
fn held_primary_is_one_edge() {
    let mut bench = Bench::new(&five_ms_config());
    bench.pas_b.set(true);
    bench.pas_a.set(true);
    bench.ticks(50);
    assert_eq!(bench.snap().pas_pulse_counter, 1);
}

// ── Speed ─────────────────────────────────────────────────────

#[test]
fn moving_flag_and_rate_always_agree() {
    let mut bench = Bench::new(&five_ms_config());
    let check = |b: &Bench| {
        let s = b.snap();
        assert_eq!(s.is_moving(), s.speed_ticks_per_minute != 0);
    };

    check(&bench);
    bench.speed_train(1, 2);
    check(&bench);
    assert!(!bench.snap().is_moving(), "one edge only arms the engine");

    bench.ticks(98);
    bench.speed_train(1, 2);
    check(&bench);
    // 12000 / 100
    assert_eq!(bench.snap().speed_ticks_per_minute, 120);

    for _ in 0..450 {
        bench.tick();
        check(&bench);
    }
    assert!(!bench.snap().is_moving());
    assert_eq!(bench.snap().speed_pulse_counter, 2);
}

// ── Brake ─────────────────────────────────────────────────────

#[test]
fn brake_bounce_then_hold() {
    let mut bench = Bench::new(&five_ms_config());

    bench.set_brake(true, true);
    bench.ticks(3);
    bench.set_brake(false, true);
    bench.ticks(2);
    assert!(!bench.snap().brake_activated);

    bench.set_brake(true, true);
    for _ in 0..9 {
        bench.tick();
        assert!(!bench.snap().brake_activated);
    }
    bench.tick();
    assert!(bench.snap().brake_activated, "tenth consecutive tick commits");
}

#[test]
fn brake_release_needs_full_window() {
    let mut bench = Bench::new(&five_ms_config());
    bench.set_brake(true, true);
    bench.ticks(10);
    assert!(bench.snap().brake_activated);

    bench.set_brake(false, true);
    bench.ticks(9);
    assert!(bench.snap().brake_activated);
    bench.tick();
    assert!(!bench.snap().brake_activated);
}

// ── Latched capture ───────────────────────────────────────────

#[test]
fn latched_edges_use_phase_captured_at_the_edge() {
    static PAS: PasLatch = PasLatch::new();
    static SPEED: EdgeLatch = EdgeLatch::new();

    let config = five_ms_config();
    let mut core = SensorCore::with_parts(
        &config,
        TimeBase::new(),
        EdgeCapture::latched(&PAS, &SPEED, config.brake_active_low),
    );
    // Lines as seen at tick time disagree with the phase at the edge;
    // the latch must win.
    let levels = LineLevels {
        pas_primary: false,
        pas_secondary: false,
        speed: false,
        brake: true,
    };

    PAS.record(true);
    core.on_tick(&levels);
    for _ in 0..99 {
        core.on_tick(&levels);
    }
    PAS.record(true);
    SPEED.record();
    core.on_tick(&levels);

    let s = core.snapshot();
    assert!(s.is_pedaling_forwards());
    assert_eq!(s.cadence_rpm, 60);
    assert_eq!(s.speed_pulse_counter, 1);
    assert!(!s.brake_activated);
}
