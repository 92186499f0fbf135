//! Rule-based light-event generation
//!
//! Turns analysis results and/or tablature facts into a non-overlapping
//! list of timed, colored light events. The pipeline is the same for
//! every mode:
//!
//! 1. The selected mode emits candidates (tick, duration, energy, ...)
//! 2. The duration policy and quantization grid shape each candidate
//! 3. Candidates are classified (solid/fade/strobe), colored and
//!    distributed across tracks
//! 4. Overlap resolution enforces the core invariant: no two same-track
//!    events overlap and every event meets the minimum duration
//! 5. Optional gap filling inserts filler events, then resolution re-runs

pub mod classify;
pub mod color;
pub mod gap_fill;
pub mod modes;
pub mod overlap;

use crate::analysis::AudioAnalysis;
use crate::config::GenerationSettings;
use crate::error::EngineError;
use crate::tab::TabEventInfo;
use crate::timeline::event::LightEvent;
use crate::timeline::tempo::{quantize_tick, TempoMap};

pub use color::ColorMode;
pub use gap_fill::GapFillMode;
pub use modes::Candidate;

/// Generation mode: which source drives candidate emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// One candidate per non-rest tablature beat
    Tablature,
    /// Sustained high-energy audio regions
    Energy,
    /// Detected beats only
    Beats,
    /// Tablature beats merged with audio onsets
    Combined,
    /// Bar-level sections with a repeating pattern
    Sections,
}

/// How candidates are assigned to output tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackDistribution {
    /// Everything on track 0
    SingleTrack,
    /// Cycle through tracks in candidate order
    RoundRobin,
    /// Dominant spectral band picks the track
    ByBand,
    /// Tablature string picks the track (falls back to round-robin for
    /// candidates without string information)
    ByString,
}

/// How each event's duration is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Fixed length in ticks
    Fixed(u32),
    /// The candidate's own source duration (note length, beat interval,
    /// energy-run span)
    NoteLength,
    /// Extend to the next candidate's start
    ToNext,
}

/// Inputs to event generation
///
/// Each mode validates that the input it needs is present.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerationInput<'a> {
    /// Audio analysis results, if audio was analyzed
    pub analysis: Option<&'a AudioAnalysis>,

    /// Extracted tablature facts, if a track was supplied
    pub tab_events: Option<&'a [TabEventInfo]>,
}

/// Generate a resolved light-event list
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` when settings are inconsistent or
/// the selected mode's required input is missing.
pub fn generate_events(
    input: GenerationInput<'_>,
    tempo: &TempoMap,
    settings: &GenerationSettings,
) -> Result<Vec<LightEvent>, EngineError> {
    settings.validate().map_err(EngineError::InvalidInput)?;

    let candidates = emit_candidates(input, tempo, settings)?;
    if candidates.is_empty() {
        log::debug!("Mode {:?} produced no candidates", settings.mode);
        return Ok(Vec::new());
    }

    log::debug!(
        "Mode {:?}: {} candidates before shaping",
        settings.mode,
        candidates.len()
    );

    let shaped = shape_candidates(candidates, settings);
    let total_ticks = shaped
        .iter()
        .map(|c| c.tick + c.duration_ticks)
        .max()
        .unwrap_or(0);

    let kinds = classify::classify_all(&shaped, settings);
    let colors = color::assign_colors(&shaped, settings, total_ticks);

    let events: Vec<LightEvent> = shaped
        .iter()
        .enumerate()
        .map(|(i, c)| LightEvent {
            start_tick: c.tick,
            duration_ticks: c.duration_ticks,
            track: assign_track(c, i, settings),
            color: colors[i],
            kind: kinds[i],
        })
        .collect();

    let mut resolved = overlap::resolve_overlaps(events, settings.min_duration_ticks);

    if settings.gap_fill != gap_fill::GapFillMode::None {
        let filled = gap_fill::fill_gaps(resolved, settings);
        resolved = overlap::resolve_overlaps(filled, settings.min_duration_ticks);
    }

    log::debug!("Generated {} events after resolution", resolved.len());
    Ok(resolved)
}

/// Dispatch candidate emission to the selected mode
fn emit_candidates(
    input: GenerationInput<'_>,
    tempo: &TempoMap,
    settings: &GenerationSettings,
) -> Result<Vec<Candidate>, EngineError> {
    let need_analysis = || {
        input.analysis.ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "Mode {:?} requires audio analysis",
                settings.mode
            ))
        })
    };

    match settings.mode {
        GenerationMode::Tablature => {
            let tab = input.tab_events.ok_or_else(|| {
                EngineError::InvalidInput("Tablature mode requires tab events".to_string())
            })?;
            Ok(modes::candidates_from_tablature(tab))
        }
        GenerationMode::Energy => Ok(modes::candidates_from_energy(
            need_analysis()?,
            tempo,
            settings,
        )),
        GenerationMode::Beats => Ok(modes::candidates_from_beats(need_analysis()?, tempo)),
        GenerationMode::Combined => {
            if input.tab_events.is_none() && input.analysis.is_none() {
                return Err(EngineError::InvalidInput(
                    "Combined mode requires tab events, audio analysis, or both".to_string(),
                ));
            }
            Ok(modes::candidates_combined(
                input.tab_events.unwrap_or(&[]),
                input.analysis,
                settings,
            ))
        }
        GenerationMode::Sections => Ok(modes::candidates_from_sections(need_analysis()?, tempo)),
    }
}

/// Apply the duration policy and quantization grid
fn shape_candidates(mut candidates: Vec<Candidate>, settings: &GenerationSettings) -> Vec<Candidate> {
    candidates.sort_by_key(|c| c.tick);

    let next_ticks: Vec<Option<u32>> = (0..candidates.len())
        .map(|i| candidates.get(i + 1).map(|c| c.tick))
        .collect();

    for (i, c) in candidates.iter_mut().enumerate() {
        c.duration_ticks = match settings.duration_policy {
            DurationPolicy::Fixed(ticks) => ticks,
            DurationPolicy::NoteLength => c.duration_ticks,
            DurationPolicy::ToNext => match next_ticks[i] {
                Some(next) if next > c.tick => next - c.tick,
                _ => c.duration_ticks,
            },
        }
        .max(1);

        if let Some(grid) = settings.quantize_grid {
            c.tick = quantize_tick(c.tick, grid);
        }
    }

    candidates
}

/// Pick an output track for a candidate
fn assign_track(candidate: &Candidate, index: usize, settings: &GenerationSettings) -> usize {
    let tracks = settings.track_count;
    match settings.distribution {
        TrackDistribution::SingleTrack => 0,
        TrackDistribution::RoundRobin => index % tracks,
        TrackDistribution::ByBand => {
            candidate.band * tracks / crate::analysis::NUM_BANDS.max(1)
        }
        TrackDistribution::ByString => match candidate.string {
            Some(string) => string as usize % tracks,
            None => index % tracks,
        },
    }
    .min(tracks - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::color::Color;

    fn candidate(tick: u32, duration: u32) -> Candidate {
        Candidate {
            tick,
            duration_ticks: duration,
            energy: 0.5,
            flux: 0.1,
            velocity: 64,
            band: 1,
            bands: [0.0; 7],
            string: None,
        }
    }

    fn tab_settings() -> GenerationSettings {
        GenerationSettings {
            mode: GenerationMode::Tablature,
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_inputs_rejected() {
        let tempo = TempoMap::constant(120.0);

        let result = generate_events(GenerationInput::default(), &tempo, &tab_settings());
        assert!(result.is_err());

        let settings = GenerationSettings {
            mode: GenerationMode::Energy,
            ..Default::default()
        };
        assert!(generate_events(GenerationInput::default(), &tempo, &settings).is_err());

        let settings = GenerationSettings {
            mode: GenerationMode::Combined,
            ..Default::default()
        };
        assert!(generate_events(GenerationInput::default(), &tempo, &settings).is_err());
    }

    #[test]
    fn test_empty_tab_yields_empty_list() {
        let tempo = TempoMap::constant(120.0);
        let input = GenerationInput {
            analysis: None,
            tab_events: Some(&[]),
        };
        let events = generate_events(input, &tempo, &tab_settings()).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_shape_fixed_duration() {
        let settings = GenerationSettings {
            duration_policy: DurationPolicy::Fixed(240),
            ..Default::default()
        };
        let shaped = shape_candidates(vec![candidate(0, 960), candidate(960, 960)], &settings);
        assert!(shaped.iter().all(|c| c.duration_ticks == 240));
    }

    #[test]
    fn test_shape_to_next() {
        let settings = GenerationSettings {
            duration_policy: DurationPolicy::ToNext,
            ..Default::default()
        };
        let shaped = shape_candidates(
            vec![candidate(0, 100), candidate(480, 100), candidate(720, 100)],
            &settings,
        );
        assert_eq!(shaped[0].duration_ticks, 480);
        assert_eq!(shaped[1].duration_ticks, 240);
        // Last candidate keeps its own duration
        assert_eq!(shaped[2].duration_ticks, 100);
    }

    #[test]
    fn test_shape_quantizes_starts() {
        let settings = GenerationSettings {
            quantize_grid: Some(240),
            ..Default::default()
        };
        let shaped = shape_candidates(vec![candidate(130, 960)], &settings);
        assert_eq!(shaped[0].tick, 240);
    }

    #[test]
    fn test_track_assignment_bounds() {
        let settings = GenerationSettings {
            distribution: TrackDistribution::ByBand,
            track_count: 3,
            ..Default::default()
        };
        for band in 0..7 {
            let mut c = candidate(0, 100);
            c.band = band;
            assert!(assign_track(&c, 0, &settings) < 3);
        }
    }

    #[test]
    fn test_by_string_distribution() {
        let settings = GenerationSettings {
            distribution: TrackDistribution::ByString,
            track_count: 4,
            ..Default::default()
        };
        let mut c = candidate(0, 100);
        c.string = Some(5);
        assert_eq!(assign_track(&c, 9, &settings), 1);
        c.string = None;
        assert_eq!(assign_track(&c, 9, &settings), 1); // falls back to index
    }

    #[test]
    fn test_generated_events_carry_palette_colors() {
        use crate::generate::color::ColorMode;
        use crate::tab::TabEventInfo;

        let tab: Vec<TabEventInfo> = (0..4)
            .map(|i| TabEventInfo {
                tick: i * 960,
                duration_ticks: 480,
                note_count: 1,
                max_velocity: 80,
                lowest_string: Some(0),
                accented: false,
                is_chord: false,
                is_rest: false,
            })
            .collect();

        let palette = vec![Color::rgb(255, 0, 0), Color::rgb(0, 0, 255)];
        let settings = GenerationSettings {
            mode: GenerationMode::Tablature,
            color_mode: ColorMode::Alternating,
            palette: palette.clone(),
            ..Default::default()
        };
        let tempo = TempoMap::constant(120.0);
        let input = GenerationInput {
            analysis: None,
            tab_events: Some(&tab),
        };

        let events = generate_events(input, &tempo, &settings).unwrap();
        assert_eq!(events.len(), 4);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.color, palette[i % 2]);
        }
    }
}
