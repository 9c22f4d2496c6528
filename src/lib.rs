//! BBSHD sensor acquisition core.
//!
//! Turns the raw pulse, switch and analog signals of a mid-drive e-bike
//! motor controller into cadence, pedaling direction, wheel speed, brake
//! state and temperature for the control loop.  All ESP-IDF-specific code
//! is guarded by `#[cfg(target_os = "espidf")]` within each module; the
//! signal processing in [`sensors`] is pure and host-testable.

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod ports;
pub mod sensors;

pub use config::SensorConfig;
pub use error::{Error, Result};
pub use sensors::SensorSnapshot;
