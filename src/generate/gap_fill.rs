//! Gap filling
//!
//! Optionally fills silences between consecutive same-track events.
//! Only gaps at least `min_gap_ticks` wide qualify; narrow slivers are
//! left alone so the show keeps its rhythm. Callers re-run overlap
//! resolution afterwards — fillers are ordinary events and must honor
//! the same invariants.

use crate::config::GenerationSettings;
use crate::timeline::color::Color;
use crate::timeline::event::{EventKind, LightEvent};

/// Brightness factor applied to fade fillers
const FADE_FILL_DIM: f32 = 0.5;

/// Gap filling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapFillMode {
    /// Leave gaps alone
    None,
    /// Stretch the earlier event across the gap
    Extend,
    /// Insert a dimmed fade event into the gap
    Fade,
    /// Insert a blackout event into the gap
    Dark,
}

/// Fill qualifying gaps between consecutive same-track events
///
/// Events are grouped per track; each gap of at least
/// `settings.min_gap_ticks` is handled per the policy. Input order does
/// not matter; output is unsorted (resolution sorts it).
pub fn fill_gaps(mut events: Vec<LightEvent>, settings: &GenerationSettings) -> Vec<LightEvent> {
    if settings.gap_fill == GapFillMode::None || events.len() < 2 {
        return events;
    }

    events.sort_by(|a, b| (a.track, a.start_tick).cmp(&(b.track, b.start_tick)));

    let mut fillers: Vec<LightEvent> = Vec::new();
    let mut filled_by_extension = 0usize;

    for i in 0..events.len() - 1 {
        let next = events[i + 1];
        let current = &mut events[i];
        if current.track != next.track {
            continue;
        }

        let end = current.end_tick();
        if next.start_tick <= end {
            continue;
        }
        let gap = next.start_tick - end;
        if gap < settings.min_gap_ticks {
            continue;
        }

        match settings.gap_fill {
            GapFillMode::Extend => {
                current.duration_ticks = next.start_tick - current.start_tick;
                filled_by_extension += 1;
            }
            GapFillMode::Fade => fillers.push(LightEvent {
                start_tick: end,
                duration_ticks: gap,
                track: current.track,
                color: current.color.scaled(FADE_FILL_DIM),
                kind: EventKind::Fade,
            }),
            GapFillMode::Dark => fillers.push(LightEvent {
                start_tick: end,
                duration_ticks: gap,
                track: current.track,
                color: Color::BLACK,
                kind: EventKind::Dark,
            }),
            GapFillMode::None => unreachable!(),
        }
    }

    log::debug!(
        "Gap fill ({:?}): {} fillers inserted, {} events extended",
        settings.gap_fill,
        fillers.len(),
        filled_by_extension
    );

    events.extend(fillers);
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: u32, dur: u32, track: usize) -> LightEvent {
        LightEvent {
            start_tick: start,
            duration_ticks: dur,
            track,
            color: Color::rgb(200, 100, 0),
            kind: EventKind::Solid,
        }
    }

    fn settings(mode: GapFillMode) -> GenerationSettings {
        GenerationSettings {
            gap_fill: mode,
            min_gap_ticks: 500,
            ..Default::default()
        }
    }

    #[test]
    fn test_none_leaves_events_alone() {
        let events = vec![event(0, 100, 0), event(2000, 100, 0)];
        let filled = fill_gaps(events.clone(), &settings(GapFillMode::None));
        assert_eq!(filled, events);
    }

    #[test]
    fn test_extend_stretches_across_gap() {
        let events = vec![event(0, 100, 0), event(2000, 100, 0)];
        let filled = fill_gaps(events, &settings(GapFillMode::Extend));

        assert_eq!(filled.len(), 2);
        assert_eq!(filled[0].duration_ticks, 2000);
        assert_eq!(filled[0].end_tick(), filled[1].start_tick);
    }

    #[test]
    fn test_fade_inserts_dimmed_filler() {
        let events = vec![event(0, 100, 0), event(2000, 100, 0)];
        let filled = fill_gaps(events, &settings(GapFillMode::Fade));

        assert_eq!(filled.len(), 3);
        let filler = filled.iter().find(|e| e.kind == EventKind::Fade).unwrap();
        assert_eq!(filler.start_tick, 100);
        assert_eq!(filler.duration_ticks, 1900);
        assert_eq!(filler.color, Color::rgb(200, 100, 0).scaled(0.5));
    }

    #[test]
    fn test_dark_inserts_blackout() {
        let events = vec![event(0, 100, 0), event(2000, 100, 0)];
        let filled = fill_gaps(events, &settings(GapFillMode::Dark));

        let filler = filled.iter().find(|e| e.kind == EventKind::Dark).unwrap();
        assert_eq!(filler.color, Color::BLACK);
    }

    #[test]
    fn test_narrow_gap_not_filled() {
        // 300-tick gap, below the 500 threshold
        let events = vec![event(0, 100, 0), event(400, 100, 0)];
        let filled = fill_gaps(events, &settings(GapFillMode::Dark));
        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn test_cross_track_gap_not_filled() {
        let events = vec![event(0, 100, 0), event(2000, 100, 1)];
        let filled = fill_gaps(events, &settings(GapFillMode::Fade));
        assert_eq!(filled.len(), 2);
    }

    #[test]
    fn test_multiple_gaps_on_one_track() {
        let events = vec![event(0, 100, 0), event(1000, 100, 0), event(2000, 100, 0)];
        let filled = fill_gaps(events, &settings(GapFillMode::Dark));
        assert_eq!(
            filled.iter().filter(|e| e.kind == EventKind::Dark).count(),
            2
        );
    }
}
