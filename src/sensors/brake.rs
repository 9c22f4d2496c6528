//! Brake lever switch debouncer.
//!
//! Integrating debounce over Time Base ticks: a raw level that differs from
//! the stable one must be seen on `window` consecutive ticks before it is
//! committed.  Any tick agreeing with the stable level cancels the pending
//! change.  Detection latency is exactly `window` ticks.

#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window: u16,
    raw: bool,
    stable: bool,
    /// Consecutive ticks the raw level has disagreed with `stable`.
    pending: u16,
}

impl Debouncer {
    pub const fn new(window: u16, initial: bool) -> Self {
        Self {
            window,
            raw: initial,
            stable: initial,
            pending: 0,
        }
    }

    /// Feed one tick's raw level.  Returns `true` when the stable level
    /// changed on this tick.
    pub fn update(&mut self, raw: bool) -> bool {
        self.raw = raw;
        if raw == self.stable {
            self.pending = 0;
            return false;
        }
        self.pending = self.pending.saturating_add(1);
        if self.pending >= self.window {
            self.stable = raw;
            self.pending = 0;
            return true;
        }
        false
    }

    pub fn raw(&self) -> bool {
        self.raw
    }

    pub fn stable(&self) -> bool {
        self.stable
    }
}

/// Debounced brake-activated flag.  Input is already polarity-corrected
/// (`true` = lever pulled).
#[derive(Debug, Clone, Copy)]
pub struct BrakeInput {
    debouncer: Debouncer,
}

impl BrakeInput {
    pub const fn new(window: u16) -> Self {
        Self {
            debouncer: Debouncer::new(window, false),
        }
    }

    pub fn update(&mut self, pulled: bool) -> bool {
        self.debouncer.update(pulled)
    }

    pub fn is_activated(&self) -> bool {
        self.debouncer.stable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(d: &mut Debouncer, level: bool, ticks: u16) {
        for _ in 0..ticks {
            d.update(level);
        }
    }

    #[test]
    fn short_pulse_is_ignored() {
        let mut d = Debouncer::new(10, false);
        feed(&mut d, true, 9);
        assert!(!d.stable());
        assert!(d.raw());
        d.update(false);
        feed(&mut d, true, 9);
        assert!(!d.stable());
    }

    #[test]
    fn exact_window_commits() {
        let mut d = Debouncer::new(10, false);
        feed(&mut d, true, 9);
        assert!(d.update(true), "tenth tick commits");
        assert!(d.stable());
        assert!(!d.update(true));
    }

    #[test]
    fn release_is_debounced_too() {
        let mut d = Debouncer::new(3, true);
        d.update(false);
        d.update(false);
        assert!(d.stable());
        d.update(false);
        assert!(!d.stable());
    }

    #[test]
    fn window_of_one_follows_raw() {
        let mut d = Debouncer::new(1, false);
        assert!(d.update(true));
        assert!(d.update(false));
    }

    #[test]
    fn bounce_sequence_from_lever() {
        // high 3, low 2, high 10 with a 10-tick window
        let mut brake = BrakeInput::new(10);
        for _ in 0..3 {
            brake.update(true);
        }
        for _ in 0..2 {
            brake.update(false);
        }
        for i in 0..10 {
            assert!(!brake.is_activated(), "tick {i} of the stable run");
            brake.update(true);
        }
        assert!(brake.is_activated());
    }
}
