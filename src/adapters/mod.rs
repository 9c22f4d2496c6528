//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter    | Implements     | Connects to         |
//! |------------|----------------|---------------------|
//! | `hardware` | LineSampler    | ESP32 GPIO levels   |
//! |            | AnalogSource   | ESP32 ADC1 oneshot  |
//!
//! `TickSource` is implemented by `drivers::hw_timer::HwTickTimer`, and
//! `ports::PinLines` covers any board with `embedded-hal` input pins.

pub mod hardware;
