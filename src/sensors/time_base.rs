//! Tick counter owned by the Time Base interrupt.
//!
//! The counter is the only clock the sensor core has.  It wraps at
//! `u32::MAX`; every consumer measures intervals with [`elapsed`], which is
//! modular and therefore correct across the wrap.

/// Ticks between `since` and `now`, correct across counter wrap-around.
#[inline]
pub const fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeBase {
    ticks: u32,
}

impl TimeBase {
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Start counting from an arbitrary value (used to exercise wrap-around).
    pub const fn starting_at(ticks: u32) -> Self {
        Self { ticks }
    }

    /// Count one tick and return the new value.  Called exactly once per
    /// Time Base interrupt.
    #[inline]
    pub fn advance(&mut self) -> u32 {
        self.ticks = self.ticks.wrapping_add(1);
        self.ticks
    }

    pub const fn now(&self) -> u32 {
        self.ticks
    }
}
