//! Main-loop change detector over successive [`SensorSnapshot`]s.
//!
//! The tick handler never logs.  The main loop feeds each snapshot it reads
//! into a [`SensorMonitor`], which reports what changed since the previous
//! one and logs it.

use heapless::Vec;
use log::info;

use super::SensorSnapshot;
use super::pas::Direction;

/// A state change observed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorEvent {
    BrakeEngaged,
    BrakeReleased,
    PedalingStarted(Direction),
    PedalingReversed(Direction),
    PedalingStopped,
    MotionStarted,
    MotionStopped,
}

/// Upper bound of events one update can produce (brake + pedaling + motion).
pub const MAX_EVENTS: usize = 3;

#[derive(Debug, Default)]
pub struct SensorMonitor {
    last: Option<SensorSnapshot>,
}

impl SensorMonitor {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Compare `snap` with the previous snapshot.  The first call only
    /// records a baseline (against a stopped, released state).
    pub fn update(&mut self, snap: &SensorSnapshot) -> Vec<SensorEvent, MAX_EVENTS> {
        let prev = self.last.replace(*snap).unwrap_or_default();
        let mut events = Vec::new();

        if snap.brake_activated != prev.brake_activated {
            let e = if snap.brake_activated {
                SensorEvent::BrakeEngaged
            } else {
                SensorEvent::BrakeReleased
            };
            let _ = events.push(e);
        }

        match (prev.pedaling, snap.pedaling) {
            (a, b) if a == b => {}
            (Direction::None, d) => {
                let _ = events.push(SensorEvent::PedalingStarted(d));
            }
            (_, Direction::None) => {
                let _ = events.push(SensorEvent::PedalingStopped);
            }
            (_, d) => {
                let _ = events.push(SensorEvent::PedalingReversed(d));
            }
        }

        if snap.is_moving() != prev.is_moving() {
            let e = if snap.is_moving() {
                SensorEvent::MotionStarted
            } else {
                SensorEvent::MotionStopped
            };
            let _ = events.push(e);
        }

        for e in &events {
            info!("sensors: {:?} (tick {})", e, snap.tick);
        }
        events
    }
}
