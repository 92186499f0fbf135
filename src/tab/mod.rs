//! Tablature event extraction
//!
//! Distills an in-memory tablature track into the per-beat facts the
//! generator consumes. File-format parsing lives upstream; callers hand
//! this module an already-built [`TabTrack`].

use serde::{Deserialize, Serialize};

/// Velocity at or above which a note counts as accented
pub const ACCENT_VELOCITY: u8 = 95;

/// A fretted note inside a tablature beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabNote {
    /// String index, 0 = highest string
    pub string: u8,
    /// Fret number
    pub fret: u8,
    /// MIDI-style velocity (0-127)
    pub velocity: u8,
}

/// One beat of a tablature track
///
/// A beat with no notes is a rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabBeat {
    /// Start position in ticks
    pub tick: u32,
    /// Duration in ticks
    pub duration_ticks: u32,
    /// Notes sounding on this beat (empty = rest)
    pub notes: Vec<TabNote>,
    /// Explicit accent marking on the beat
    pub accented: bool,
}

/// An in-memory tablature track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabTrack {
    /// Track name
    pub name: String,
    /// Beats in tick order
    pub beats: Vec<TabBeat>,
}

/// Per-beat tablature facts consumed by the generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabEventInfo {
    /// Start position in ticks
    pub tick: u32,

    /// Duration in ticks
    pub duration_ticks: u32,

    /// Number of notes on the beat (0 for rests)
    pub note_count: usize,

    /// Highest note velocity on the beat (0 for rests)
    pub max_velocity: u8,

    /// Lowest string index sounding on the beat, if any
    pub lowest_string: Option<u8>,

    /// Beat is accented (explicit marking or any note at accent velocity)
    pub accented: bool,

    /// Two or more notes sound together
    pub is_chord: bool,

    /// No notes sound on this beat
    pub is_rest: bool,
}

/// Extract per-beat facts from a tablature track
///
/// Beats are emitted in tick order, rests included — the generator
/// decides what to do with them. Out-of-order input is sorted rather
/// than rejected, matching how editors hand over tracks mid-edit.
pub fn extract_tab_events(track: &TabTrack) -> Vec<TabEventInfo> {
    let mut infos: Vec<TabEventInfo> = track
        .beats
        .iter()
        .map(|beat| {
            let max_velocity = beat.notes.iter().map(|n| n.velocity).max().unwrap_or(0);
            TabEventInfo {
                tick: beat.tick,
                duration_ticks: beat.duration_ticks,
                note_count: beat.notes.len(),
                max_velocity,
                lowest_string: beat.notes.iter().map(|n| n.string).min(),
                accented: beat.accented || max_velocity >= ACCENT_VELOCITY,
                is_chord: beat.notes.len() >= 2,
                is_rest: beat.notes.is_empty(),
            }
        })
        .collect();

    infos.sort_by_key(|info| info.tick);

    log::debug!(
        "Extracted {} tab events from track '{}' ({} rests)",
        infos.len(),
        track.name,
        infos.iter().filter(|i| i.is_rest).count()
    );

    infos
}
