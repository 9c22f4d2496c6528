//! GPIO / peripheral pin assignments for the controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pedal-assist sensor (dual-channel Hall, open collector)
// ---------------------------------------------------------------------------

/// PAS primary channel: the pulse reference (rising edges are counted).
pub const PAS_PRIMARY_GPIO: i32 = 4;
/// PAS secondary channel: a quarter pulse out of phase with the primary.
pub const PAS_SECONDARY_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Wheel speed sensor (spoke magnet, reed or Hall)
// ---------------------------------------------------------------------------

pub const SPEED_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Brake lever switch (active-low with pull-up)
// ---------------------------------------------------------------------------

pub const BRAKE_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Temperature (ADC1)
// ---------------------------------------------------------------------------

/// NTC thermistor: 10 kΩ @ 25 °C, voltage divider to ADC.
/// ADC1 channel 8 (GPIO 9 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 9;
pub const TEMP_ADC_CHANNEL: u32 = 8;
