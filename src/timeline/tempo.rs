//! Tempo mapping between milliseconds and ticks
//!
//! Audio analysis produces millisecond timestamps; events live on the
//! tick grid. The map is piecewise-constant: each change sets the tempo
//! from its tick until the next change.

use serde::{Deserialize, Serialize};

use super::TICKS_PER_QUARTER;
use crate::error::EngineError;

/// A tempo change at a tick position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    /// Tick at which this tempo takes effect
    pub tick: u32,
    /// Tempo in beats per minute
    pub bpm: f32,
}

/// Piecewise-constant tempo map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TempoMap {
    changes: Vec<TempoChange>,
}

impl Default for TempoMap {
    fn default() -> Self {
        Self::constant(120.0)
    }
}

impl TempoMap {
    /// Map with a single tempo for the whole timeline
    pub fn constant(bpm: f32) -> Self {
        Self {
            changes: vec![TempoChange { tick: 0, bpm }],
        }
    }

    /// Map from a list of tempo changes
    ///
    /// Changes are sorted by tick. A change at tick 0 is required so the
    /// map covers the whole timeline.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidInput` if the list is empty, no change
    /// sits at tick 0, or any tempo is non-positive.
    pub fn from_changes(mut changes: Vec<TempoChange>) -> Result<Self, EngineError> {
        if changes.is_empty() {
            return Err(EngineError::InvalidInput(
                "Tempo map requires at least one change".to_string(),
            ));
        }
        if changes.iter().any(|c| c.bpm <= 0.0 || !c.bpm.is_finite()) {
            return Err(EngineError::InvalidInput(
                "Tempo values must be positive and finite".to_string(),
            ));
        }
        changes.sort_by_key(|c| c.tick);
        if changes[0].tick != 0 {
            return Err(EngineError::InvalidInput(format!(
                "First tempo change must be at tick 0, got {}",
                changes[0].tick
            )));
        }
        Ok(Self { changes })
    }

    /// Tempo in effect at `tick`
    pub fn bpm_at(&self, tick: u32) -> f32 {
        self.changes
            .iter()
            .rev()
            .find(|c| c.tick <= tick)
            .map(|c| c.bpm)
            .unwrap_or(120.0)
    }

    /// Convert a tick position to milliseconds
    pub fn tick_to_ms(&self, tick: u32) -> f32 {
        let mut ms = 0.0f64;
        for (i, change) in self.changes.iter().enumerate() {
            let segment_end = self
                .changes
                .get(i + 1)
                .map(|c| c.tick.min(tick))
                .unwrap_or(tick);
            if change.tick >= tick {
                break;
            }
            let ticks_in_segment = (segment_end - change.tick) as f64;
            ms += ticks_in_segment * ms_per_tick(change.bpm);
        }
        ms as f32
    }

    /// Convert a millisecond position to the nearest tick
    pub fn ms_to_tick(&self, ms: f32) -> u32 {
        let target = ms as f64;
        let mut elapsed = 0.0f64;
        let mut tick = 0u32;

        for (i, change) in self.changes.iter().enumerate() {
            let per_tick = ms_per_tick(change.bpm);
            match self.changes.get(i + 1) {
                Some(next) => {
                    let segment_ticks = (next.tick - change.tick) as f64;
                    let segment_ms = segment_ticks * per_tick;
                    if elapsed + segment_ms >= target {
                        let ticks_in = (target - elapsed) / per_tick;
                        return tick + ticks_in.round() as u32;
                    }
                    elapsed += segment_ms;
                    tick = next.tick;
                }
                None => {
                    let ticks_in = (target - elapsed) / per_tick;
                    return tick + ticks_in.max(0.0).round() as u32;
                }
            }
        }
        tick
    }
}

/// Snap a tick position to the nearest multiple of `grid`
pub fn quantize_tick(tick: u32, grid: u32) -> u32 {
    if grid == 0 {
        return tick;
    }
    let rem = tick % grid;
    if rem * 2 >= grid {
        tick - rem + grid
    } else {
        tick - rem
    }
}

fn ms_per_tick(bpm: f32) -> f64 {
    60_000.0 / (bpm as f64 * TICKS_PER_QUARTER as f64)
}
