//! Pulse edge capture for the PAS and speed lines.
//!
//! Two strategies, selected by [`CaptureMode`]:
//!
//! - **Polled**: the Time Base handler samples every line once per tick and
//!   an [`EdgeDetector`] per line turns level changes into rising edges.
//!   The PAS secondary channel is sampled in the same read as the primary.
//! - **Latched**: GPIO interrupts call [`pas_edge_isr`] / [`speed_edge_isr`]
//!   on each rising edge.  The PAS handler captures the secondary level at
//!   the instant of the edge, which removes the up-to-one-tick skew of
//!   polling.  The tick handler drains the latches.
//!
//! Either way the result is a [`TickInput`] consumed by the engines on the
//! next tick.

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::config::CaptureMode;
use crate::ports::LineLevels;

// ── Polled ────────────────────────────────────────────────────

/// Rising-edge detector over successive samples of one line.
///
/// The first sample only seeds the detector: a line already high at boot
/// (pull-up with a parked sensor) is a level, not a transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    last_level: Option<bool>,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { last_level: None }
    }

    /// Detector that treats `level` as the previous sample.
    pub const fn seeded(level: bool) -> Self {
        Self { last_level: Some(level) }
    }

    /// Feed the current level; `true` on a low→high transition.
    pub fn rising(&mut self, level: bool) -> bool {
        let edge = level && self.last_level == Some(false);
        self.last_level = Some(level);
        edge
    }
}

// ── Latched (ISR side) ────────────────────────────────────────

/// Edge counter written from a GPIO ISR and drained by the tick handler.
pub struct EdgeLatch {
    count: AtomicU8,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            count: AtomicU8::new(0),
        }
    }

    /// Record one edge.  Lock-free; saturates if the tick handler stalls.
    pub fn record(&self) {
        let _ = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |n| n.checked_add(1));
    }

    /// Number of edges since the last call, clearing the latch.
    pub fn take(&self) -> u8 {
        self.count.swap(0, Ordering::AcqRel)
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// PAS primary-edge latch that also holds the secondary channel level
/// captured with the most recent edge.
pub struct PasLatch {
    edges: EdgeLatch,
    secondary_high: AtomicBool,
}

impl PasLatch {
    pub const fn new() -> Self {
        Self {
            edges: EdgeLatch::new(),
            secondary_high: AtomicBool::new(false),
        }
    }

    pub fn record(&self, secondary_high: bool) {
        // Phase first: a drain that sees the count also sees this level.
        self.secondary_high.store(secondary_high, Ordering::Release);
        self.edges.record();
    }

    /// `(edges, secondary level of the latest edge)`, clearing the latch.
    pub fn take(&self) -> (u8, bool) {
        let edges = self.edges.take();
        (edges, self.secondary_high.load(Ordering::Acquire))
    }
}

impl Default for PasLatch {
    fn default() -> Self {
        Self::new()
    }
}

static PAS_LATCH: PasLatch = PasLatch::new();
static SPEED_LATCH: EdgeLatch = EdgeLatch::new();

/// GPIO ISR entry for a rising edge on the PAS primary channel.
/// `secondary_high` must be read inside the same ISR, before returning.
pub fn pas_edge_isr(secondary_high: bool) {
    PAS_LATCH.record(secondary_high);
}

/// GPIO ISR entry for a speed sensor edge.
pub fn speed_edge_isr() {
    SPEED_LATCH.record();
}

// ── Tick side ─────────────────────────────────────────────────

/// Everything the engines need from one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Qualifying-edge candidates on the PAS primary channel.
    pub pas_edges: u8,
    /// Secondary channel level captured with the PAS edge(s).
    pub pas_secondary_high: bool,
    pub speed_edges: u8,
    /// Polarity-corrected brake level (`true` = lever pulled).
    pub brake_pulled: bool,
}

enum Source {
    Polled {
        pas: EdgeDetector,
        speed: EdgeDetector,
    },
    Latched {
        pas: &'static PasLatch,
        speed: &'static EdgeLatch,
    },
}

/// Turns raw line levels (and ISR latches) into a [`TickInput`].
pub struct EdgeCapture {
    source: Source,
    brake_active_low: bool,
}

impl EdgeCapture {
    pub fn new(mode: CaptureMode, brake_active_low: bool) -> Self {
        match mode {
            CaptureMode::Polled => Self::polled(brake_active_low),
            CaptureMode::Latched => Self::latched(&PAS_LATCH, &SPEED_LATCH, brake_active_low),
        }
    }

    pub fn polled(brake_active_low: bool) -> Self {
        Self {
            source: Source::Polled {
                pas: EdgeDetector::new(),
                speed: EdgeDetector::new(),
            },
            brake_active_low,
        }
    }

    /// Drain the given latches instead of the global ISR latches.
    ///
    /// Edges latched before this point (boot, or a previous core) are
    /// discarded so they never reach the new engines.
    pub fn latched(pas: &'static PasLatch, speed: &'static EdgeLatch, brake_active_low: bool) -> Self {
        let _ = pas.take();
        let _ = speed.take();
        Self {
            source: Source::Latched { pas, speed },
            brake_active_low,
        }
    }

    pub fn capture(&mut self, levels: &LineLevels) -> TickInput {
        let brake_pulled = levels.brake != self.brake_active_low;
        match &mut self.source {
            Source::Polled { pas, speed } => TickInput {
                pas_edges: u8::from(pas.rising(levels.pas_primary)),
                pas_secondary_high: levels.pas_secondary,
                speed_edges: u8::from(speed.rising(levels.speed)),
                brake_pulled,
            },
            Source::Latched { pas, speed } => {
                let (pas_edges, pas_secondary_high) = pas.take();
                TickInput {
                    pas_edges,
                    pas_secondary_high,
                    speed_edges: speed.take(),
                    brake_pulled,
                }
            }
        }
    }
}
