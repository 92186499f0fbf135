//! Light event types

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Visual behavior of a light event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// Constant color for the whole duration
    Solid,
    /// Ramp from the color down to black
    Fade,
    /// Rapid on/off flashing
    Strobe,
    /// Blackout (used by gap fillers)
    Dark,
}

/// A timed, colored light event on one output track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightEvent {
    /// Start position in ticks
    pub start_tick: u32,

    /// Duration in ticks (always > 0 after overlap resolution)
    pub duration_ticks: u32,

    /// Output track index
    pub track: usize,

    /// Event color
    pub color: Color,

    /// Visual behavior
    pub kind: EventKind,
}

impl LightEvent {
    /// End position in ticks (exclusive)
    pub fn end_tick(&self) -> u32 {
        self.start_tick.saturating_add(self.duration_ticks)
    }

    /// True when this event overlaps `other` on the same track
    pub fn overlaps(&self, other: &LightEvent) -> bool {
        self.track == other.track
            && self.start_tick < other.end_tick()
            && other.start_tick < self.end_tick()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: u32, dur: u32, track: usize) -> LightEvent {
        LightEvent {
            start_tick: start,
            duration_ticks: dur,
            track,
            color: Color::WHITE,
            kind: EventKind::Solid,
        }
    }

    #[test]
    fn test_end_tick() {
        assert_eq!(event(100, 50, 0).end_tick(), 150);
    }

    #[test]
    fn test_overlap_same_track() {
        let a = event(0, 100, 0);
        let b = event(50, 100, 0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_adjacent_events_do_not_overlap() {
        let a = event(0, 100, 0);
        let b = event(100, 100, 0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_different_tracks_never_overlap() {
        let a = event(0, 100, 0);
        let b = event(0, 100, 1);
        assert!(!a.overlaps(&b));
    }
}
