//! Hardware adapter: bridges the board's GPIO and ADC to the port traits.
//!
//! The only code that knows which pin carries which signal.  On non-espidf
//! targets the underlying `hw_init` calls are simulation stubs.

use crate::drivers::hw_init;
use crate::pins;
use crate::ports::{AnalogSource, LineLevels, LineSampler};

// ── LineSampler ───────────────────────────────────────────────

/// Direct register reads of the four sensor lines.  Zero-sized, so the
/// timer callback can build one per tick.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoardLines;

impl BoardLines {
    pub const fn new() -> Self {
        Self
    }
}

impl LineSampler for BoardLines {
    fn sample(&mut self) -> LineLevels {
        // Secondary before primary, see `PinLines::sample`.
        let pas_secondary = hw_init::gpio_read(pins::PAS_SECONDARY_GPIO);
        let pas_primary = hw_init::gpio_read(pins::PAS_PRIMARY_GPIO);
        LineLevels {
            pas_primary,
            pas_secondary,
            speed: hw_init::gpio_read(pins::SPEED_GPIO),
            brake: hw_init::gpio_read(pins::BRAKE_GPIO),
        }
    }
}

// ── AnalogSource ──────────────────────────────────────────────

/// Temperature channel on ADC1.  The oneshot driver converts synchronously,
/// so the conversion runs in `read_result`.
#[derive(Debug, Default)]
pub struct BoardAdc {
    requested: bool,
}

impl BoardAdc {
    pub const fn new() -> Self {
        Self { requested: false }
    }
}

impl AnalogSource for BoardAdc {
    fn start_conversion(&mut self) {
        self.requested = true;
    }

    fn read_result(&mut self) -> Option<u16> {
        if !core::mem::take(&mut self.requested) {
            return None;
        }
        hw_init::adc1_read(pins::TEMP_ADC_CHANNEL)
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_lines_idle_high() {
        let l = BoardLines::new().sample();
        assert!(l.pas_primary && l.pas_secondary && l.speed && l.brake);
    }

    #[test]
    fn adc_needs_a_start() {
        let mut adc = BoardAdc::new();
        assert_eq!(adc.read_result(), None);
        adc.start_conversion();
        // Host stub has no converter.
        assert_eq!(adc.read_result(), None);
        assert!(!adc.requested);
    }
}
