//! Temperature sampler against a converter with real conversion latency.

use super::mock_hw::ScriptedAdc;

use bbshd_sensors::config::{SensorConfig, ThermistorParams};
use bbshd_sensors::sensors::temperature::{TemperatureSampler, adc_to_celsius};

fn config(interval: u32) -> SensorConfig {
    SensorConfig {
        temperature_interval_ticks: interval,
        ..SensorConfig::default()
    }
}

#[test]
fn slow_converter_result_is_collected_later() {
    let mut adc = ScriptedAdc::new(3);
    adc.queue(Some(2048));
    let mut s: TemperatureSampler<_, 1> = TemperatureSampler::new(adc, &config(100));

    assert_eq!(s.poll(0), None);
    assert_eq!(s.poll(1), None);
    assert_eq!(s.poll(2), None);
    assert_eq!(s.poll(3), None);
    assert_eq!(s.poll(4), Some(25));
    assert_eq!(s.latest(), 25);
}

#[test]
fn each_cycle_overwrites_previous() {
    let p = ThermistorParams::default();
    let mut adc = ScriptedAdc::new(0);
    adc.queue(Some(2048));
    adc.queue(Some(1500));
    let mut s: TemperatureSampler<_, 1> = TemperatureSampler::new(adc, &config(10));

    s.poll(0);
    assert_eq!(s.poll(1), Some(25));
    for t in 2..10 {
        assert_eq!(s.poll(t), None);
    }
    s.poll(10);
    assert_eq!(s.poll(11), adc_to_celsius(1500, &p));
    assert_ne!(s.latest(), 25);
}

#[test]
fn pacing_survives_tick_wrap() {
    let mut adc = ScriptedAdc::new(0);
    for _ in 0..3 {
        adc.queue(Some(2048));
    }
    let mut s: TemperatureSampler<_, 1> = TemperatureSampler::new(adc, &config(10));
    let start = u32::MAX - 4;
    s.poll(start);
    s.poll(start.wrapping_add(1));
    let mut stored = 0;
    for i in 2..=11u32 {
        if s.poll(start.wrapping_add(i)).is_some() {
            stored += 1;
        }
    }
    // Next conversion starts at start+10 and is collected at start+11.
    assert_eq!(stored, 1);
}
