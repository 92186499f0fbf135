//! Candidate emission for the five generation modes
//!
//! Each mode turns its source material into [`Candidate`]s: raw timed
//! proposals carrying the signal facts (energy, flux, velocity, band)
//! that classification, coloring and track distribution consume later.

use crate::analysis::{AudioAnalysis, NUM_BANDS};
use crate::config::GenerationSettings;
use crate::tab::TabEventInfo;
use crate::timeline::tempo::TempoMap;
use crate::timeline::TICKS_PER_QUARTER;

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// A raw event proposal produced by a generation mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Start position in ticks
    pub tick: u32,

    /// Source duration in ticks (note length, beat interval or
    /// energy-run span; the duration policy may override it)
    pub duration_ticks: u32,

    /// Normalized energy in [0.0, 1.0]
    pub energy: f32,

    /// Normalized spectral flux in [0.0, 1.0]
    pub flux: f32,

    /// MIDI-style velocity (0-127)
    pub velocity: u8,

    /// Dominant frequency band (index into the 7-band split)
    pub band: usize,

    /// Band energies backing the SpectralBands color mode
    pub bands: [f32; NUM_BANDS],

    /// Source tablature string, when the candidate came from tab
    pub string: Option<u8>,
}

/// One candidate per non-rest tablature beat
///
/// Energy tracks note velocity; accents max out the flux channel so
/// accented beats classify as strobes when the threshold allows.
pub fn candidates_from_tablature(tab: &[TabEventInfo]) -> Vec<Candidate> {
    tab.iter()
        .filter(|info| !info.is_rest)
        .map(|info| {
            let energy = info.max_velocity as f32 / 127.0;
            let band = info.lowest_string.unwrap_or(0) as usize % NUM_BANDS;
            let mut bands = [0.0f32; NUM_BANDS];
            bands[band] = energy;
            Candidate {
                tick: info.tick,
                duration_ticks: info.duration_ticks.max(1),
                energy,
                flux: if info.accented { 1.0 } else { 0.0 },
                velocity: info.max_velocity,
                band,
                bands,
                string: info.lowest_string,
            }
        })
        .collect()
}

/// Sustained high-energy regions of the analysis
///
/// Consecutive frames above `mean_energy * energy_threshold_factor`
/// merge into a single candidate spanning the run.
pub fn candidates_from_energy(
    analysis: &AudioAnalysis,
    tempo: &TempoMap,
    settings: &GenerationSettings,
) -> Vec<Candidate> {
    let mean = analysis.mean_energy();
    if mean <= EPSILON {
        return Vec::new();
    }
    let threshold = mean * settings.energy_threshold_factor;
    let max_energy = analysis.max_energy().max(EPSILON);
    let max_flux = analysis.max_flux().max(EPSILON);

    let mut candidates = Vec::new();
    let mut run_start: Option<usize> = None;

    for i in 0..=analysis.points.len() {
        let above = analysis
            .points
            .get(i)
            .map(|p| p.energy >= threshold)
            .unwrap_or(false);

        match (run_start, above) {
            (None, true) => run_start = Some(i),
            (Some(start), false) => {
                candidates.push(run_candidate(
                    analysis, tempo, start, i, max_energy, max_flux,
                ));
                run_start = None;
            }
            _ => {}
        }
    }

    log::debug!(
        "Energy mode: {} runs above threshold {:.5}",
        candidates.len(),
        threshold
    );
    candidates
}

/// Beat-flagged frames only
///
/// Each beat spans to the next beat; the last one gets a quarter note.
pub fn candidates_from_beats(analysis: &AudioAnalysis, tempo: &TempoMap) -> Vec<Candidate> {
    let max_energy = analysis.max_energy().max(EPSILON);
    let max_flux = analysis.max_flux().max(EPSILON);

    let beats: Vec<_> = analysis.beat_points().collect();
    beats
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let tick = tempo.ms_to_tick(point.time_ms);
            let duration = beats
                .get(i + 1)
                .map(|next| tempo.ms_to_tick(next.time_ms).saturating_sub(tick))
                .filter(|&d| d > 0)
                .unwrap_or(TICKS_PER_QUARTER);
            Candidate {
                tick,
                duration_ticks: duration,
                energy: point.energy / max_energy,
                flux: point.spectrum.flux / max_flux,
                velocity: (point.energy / max_energy * 127.0) as u8,
                band: dominant_band(&point.spectrum.bands),
                bands: point.spectrum.bands,
                string: None,
            }
        })
        .collect()
}

/// Tablature beats merged with audio onsets
///
/// Duplicates inside the merge window collapse to the stronger
/// candidate. Either source may be absent.
pub fn candidates_combined(
    tab: &[TabEventInfo],
    analysis: Option<&AudioAnalysis>,
    settings: &GenerationSettings,
) -> Vec<Candidate> {
    let mut candidates = candidates_from_tablature(tab);

    if let Some(analysis) = analysis {
        let max_strength = analysis
            .onsets
            .iter()
            .map(|o| o.strength)
            .fold(0.0f32, f32::max)
            .max(EPSILON);

        for (i, onset) in analysis.onsets.iter().enumerate() {
            let duration = analysis
                .onsets
                .get(i + 1)
                .map(|next| next.tick.saturating_sub(onset.tick))
                .filter(|&d| d > 0)
                .unwrap_or(TICKS_PER_QUARTER);
            let energy = onset.strength / max_strength;

            // Pull the onset frame's spectrum for coloring
            let frame = (onset.time_ms / analysis.hop_ms.max(EPSILON)) as usize;
            let bands = analysis
                .points
                .get(frame)
                .map(|p| p.spectrum.bands)
                .unwrap_or([0.0; NUM_BANDS]);

            candidates.push(Candidate {
                tick: onset.tick,
                duration_ticks: duration,
                energy,
                flux: energy,
                velocity: (energy * 127.0) as u8,
                band: onset.band,
                bands,
                string: None,
            });
        }
    }

    candidates.sort_by_key(|c| c.tick);

    // Collapse near-coincident candidates, keeping the stronger one
    let mut merged: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match merged.last_mut() {
            Some(last) if candidate.tick - last.tick < settings.merge_window_ticks => {
                if candidate.energy > last.energy {
                    *last = candidate;
                }
            }
            _ => merged.push(candidate),
        }
    }

    log::debug!("Combined mode: {} candidates after merge", merged.len());
    merged
}

/// Bar-level sections with a repeating pattern
///
/// The timeline splits into 4-beat bars. Bars at or above the mean bar
/// energy emit a quarter-note chase (four candidates); quieter bars emit
/// a single full-bar wash.
pub fn candidates_from_sections(analysis: &AudioAnalysis, tempo: &TempoMap) -> Vec<Candidate> {
    if analysis.points.is_empty() {
        return Vec::new();
    }

    let bar_ticks = 4 * TICKS_PER_QUARTER;
    let total_ticks = tempo.ms_to_tick(analysis.duration_ms);
    if total_ticks == 0 {
        return Vec::new();
    }
    let num_bars = total_ticks.div_ceil(bar_ticks);

    // Mean energy and strongest spectrum per bar
    let mut bars: Vec<(f32, [f32; NUM_BANDS])> = Vec::with_capacity(num_bars as usize);
    for bar in 0..num_bars {
        let start_ms = tempo.tick_to_ms(bar * bar_ticks);
        let end_ms = tempo.tick_to_ms((bar + 1) * bar_ticks);

        let mut sum = 0.0f32;
        let mut count = 0usize;
        let mut best = 0.0f32;
        let mut best_bands = [0.0f32; NUM_BANDS];
        for point in &analysis.points {
            if point.time_ms >= start_ms && point.time_ms < end_ms {
                sum += point.energy;
                count += 1;
                if point.energy > best {
                    best = point.energy;
                    best_bands = point.spectrum.bands;
                }
            }
        }
        let mean = if count > 0 { sum / count as f32 } else { 0.0 };
        bars.push((mean, best_bands));
    }

    let global_mean =
        bars.iter().map(|(e, _)| e).sum::<f32>() / bars.len() as f32;
    let max_bar = bars.iter().map(|(e, _)| *e).fold(0.0f32, f32::max).max(EPSILON);

    let mut candidates = Vec::new();
    for (bar, &(bar_energy, bands)) in bars.iter().enumerate() {
        if bar_energy <= EPSILON {
            continue; // silent bar stays dark
        }
        let bar_start = bar as u32 * bar_ticks;
        let energy = bar_energy / max_bar;
        let band = dominant_band(&bands);

        if bar_energy >= global_mean {
            // Active bar: quarter-note chase
            for sub in 0..4u32 {
                candidates.push(Candidate {
                    tick: bar_start + sub * TICKS_PER_QUARTER,
                    duration_ticks: TICKS_PER_QUARTER,
                    energy,
                    flux: 0.0,
                    velocity: (energy * 127.0) as u8,
                    band,
                    bands,
                    string: None,
                });
            }
        } else {
            // Quiet bar: full-bar wash
            candidates.push(Candidate {
                tick: bar_start,
                duration_ticks: bar_ticks,
                energy,
                flux: 0.0,
                velocity: (energy * 127.0) as u8,
                band,
                bands,
                string: None,
            });
        }
    }

    log::debug!(
        "Sections mode: {} bars, {} candidates",
        num_bars,
        candidates.len()
    );
    candidates
}

/// Build a candidate spanning frames `[start, end)` of an energy run
fn run_candidate(
    analysis: &AudioAnalysis,
    tempo: &TempoMap,
    start: usize,
    end: usize,
    max_energy: f32,
    max_flux: f32,
) -> Candidate {
    let points = &analysis.points[start..end];
    let run_energy = points.iter().map(|p| p.energy).fold(0.0f32, f32::max);
    let run_flux = points.iter().map(|p| p.spectrum.flux).fold(0.0f32, f32::max);

    let start_tick = tempo.ms_to_tick(points[0].time_ms);
    let end_tick = tempo.ms_to_tick(points[points.len() - 1].time_ms + analysis.hop_ms);
    let energy = run_energy / max_energy;

    Candidate {
        tick: start_tick,
        duration_ticks: end_tick.saturating_sub(start_tick).max(1),
        energy,
        flux: run_flux / max_flux,
        velocity: (energy * 127.0) as u8,
        band: dominant_band(&points[0].spectrum.bands),
        bands: points[0].spectrum.bands,
        string: None,
    }
}

/// Index of the strongest band
fn dominant_band(bands: &[f32; NUM_BANDS]) -> usize {
    bands
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
