//! Peripheral initialisation and the Time Base timer.

pub mod hw_init;
pub mod hw_timer;
