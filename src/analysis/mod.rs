//! Audio analysis pipeline
//!
//! Turns raw PCM (or, as a fallback, cached waveform min/max segments)
//! into a frame-by-frame energy/spectrum profile with beats, onsets and
//! transients marked. Results are rebuilt wholesale per call; nothing is
//! updated incrementally.
//!
//! ```no_run
//! use lumen_gen::analysis::analyze_samples;
//! use lumen_gen::config::AnalysisConfig;
//! use lumen_gen::timeline::tempo::TempoMap;
//!
//! let samples: Vec<f32> = vec![]; // mono, normalized to [-1.0, 1.0]
//! let tempo = TempoMap::constant(120.0);
//! let analysis = analyze_samples(&samples, 44100, &AnalysisConfig::default(), &tempo)?;
//! println!("{} onsets over {:.1} ms", analysis.onsets.len(), analysis.duration_ms);
//! # Ok::<(), lumen_gen::EngineError>(())
//! ```

pub mod beat;
pub mod envelope;
pub mod fft;
pub mod onset;
pub mod spectral;

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::EngineError;
use crate::timeline::tempo::TempoMap;

pub use envelope::WaveformSegment;
pub use spectral::{SpectralEnergy, NUM_BANDS};

/// One analysis frame: energy, peak and spectral features plus the
/// detection flags set by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioEnergyPoint {
    /// Frame start time in milliseconds
    pub time_ms: f32,

    /// Frame energy (total spectral energy, or envelope amplitude in
    /// fallback mode)
    pub energy: f32,

    /// Largest absolute sample value in the frame
    pub peak: f32,

    /// Frame is a detected beat
    pub is_beat: bool,

    /// Frame energy jumped sharply over the previous frame
    pub is_transient: bool,

    /// Frame is a detected onset
    pub is_onset: bool,

    /// Spectral features of the frame
    pub spectrum: SpectralEnergy,
}

/// A detected onset with timeline position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Onset {
    /// Onset time in milliseconds
    pub time_ms: f32,

    /// Onset position on the tick grid
    pub tick: u32,

    /// Flux relative to the detection threshold (>= 1.0)
    pub strength: f32,

    /// Dominant frequency band (index into the 7-band split)
    pub band: usize,
}

/// Complete analysis of one piece of audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioAnalysis {
    /// Per-frame analysis points in time order
    pub points: Vec<AudioEnergyPoint>,

    /// Detected onsets in time order
    pub onsets: Vec<Onset>,

    /// Audio duration in milliseconds
    pub duration_ms: f32,

    /// Milliseconds between frame starts
    pub hop_ms: f32,
}

impl AudioAnalysis {
    /// Mean frame energy (0.0 for an empty analysis)
    pub fn mean_energy(&self) -> f32 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.energy).sum::<f32>() / self.points.len() as f32
    }

    /// Largest frame energy (0.0 for an empty analysis)
    pub fn max_energy(&self) -> f32 {
        self.points.iter().map(|p| p.energy).fold(0.0, f32::max)
    }

    /// Largest frame flux (0.0 for an empty analysis)
    pub fn max_flux(&self) -> f32 {
        self.points.iter().map(|p| p.spectrum.flux).fold(0.0, f32::max)
    }

    /// Frames flagged as beats
    pub fn beat_points(&self) -> impl Iterator<Item = &AudioEnergyPoint> {
        self.points.iter().filter(|p| p.is_beat)
    }
}

/// Analyze raw PCM samples
///
/// Runs the full pipeline: Hann-windowed STFT, per-frame band/centroid/
/// flux features, beat detection on the energy curve, flux-based onset
/// detection and transient marking.
///
/// # Arguments
///
/// * `samples` - Mono samples normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `config` - Analysis parameters
/// * `tempo` - Tempo map used to place onsets on the tick grid
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` for empty samples, a zero sample
/// rate or invalid config.
pub fn analyze_samples(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
    tempo: &TempoMap,
) -> Result<AudioAnalysis, EngineError> {
    config.validate().map_err(EngineError::InvalidInput)?;
    if samples.is_empty() {
        return Err(EngineError::InvalidInput("Empty audio samples".to_string()));
    }
    if sample_rate == 0 {
        return Err(EngineError::InvalidInput("Invalid sample rate".to_string()));
    }

    let duration_ms = samples.len() as f32 / sample_rate as f32 * 1000.0;
    let hop_ms = config.hop_size as f32 / sample_rate as f32 * 1000.0;

    log::debug!(
        "Analyzing {} samples at {} Hz ({:.1} ms)",
        samples.len(),
        sample_rate,
        duration_ms
    );

    let spectrogram = fft::compute_spectrogram(samples, config.window_size, config.hop_size)?;
    if spectrogram.is_empty() {
        return Ok(AudioAnalysis {
            points: Vec::new(),
            onsets: Vec::new(),
            duration_ms,
            hop_ms,
        });
    }

    let mut frames = Vec::with_capacity(spectrogram.len());
    for (i, magnitudes) in spectrogram.iter().enumerate() {
        let prev = if i > 0 {
            Some(spectrogram[i - 1].as_slice())
        } else {
            None
        };
        frames.push(SpectralEnergy::compute(
            magnitudes,
            prev,
            sample_rate,
            config.window_size,
        ));
    }

    let peaks: Vec<f32> = (0..frames.len())
        .map(|i| {
            let start = i * config.hop_size;
            let end = (start + config.window_size).min(samples.len());
            samples[start..end]
                .iter()
                .fold(0.0f32, |acc, &s| acc.max(s.abs()))
        })
        .collect();

    Ok(assemble(frames, peaks, hop_ms, duration_ms, config, tempo))
}

/// Analyze cached waveform min/max segments
///
/// Fallback for when raw PCM is unavailable: segment amplitudes stand in
/// for frame energies and a fixed band profile stands in for the
/// spectrum. Beat, onset and transient marking run unchanged.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` for an empty segment list or a
/// non-positive duration.
pub fn analyze_envelope(
    segments: &[WaveformSegment],
    duration_ms: f32,
    config: &AnalysisConfig,
    tempo: &TempoMap,
) -> Result<AudioAnalysis, EngineError> {
    config.validate().map_err(EngineError::InvalidInput)?;
    if segments.is_empty() {
        return Err(EngineError::InvalidInput(
            "Empty waveform segment list".to_string(),
        ));
    }
    if duration_ms <= 0.0 || !duration_ms.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "Duration must be positive, got {}",
            duration_ms
        )));
    }

    let hop_ms = duration_ms / segments.len() as f32;
    log::debug!(
        "Envelope fallback: {} segments over {:.1} ms ({:.1} ms per segment)",
        segments.len(),
        duration_ms,
        hop_ms
    );

    let (peaks, frames): (Vec<f32>, Vec<SpectralEnergy>) =
        envelope::synthesize_frames(segments).into_iter().unzip();

    Ok(assemble(frames, peaks, hop_ms, duration_ms, config, tempo))
}

/// Run detection over per-frame features and assemble the result
fn assemble(
    frames: Vec<SpectralEnergy>,
    peaks: Vec<f32>,
    hop_ms: f32,
    duration_ms: f32,
    config: &AnalysisConfig,
    tempo: &TempoMap,
) -> AudioAnalysis {
    let energies: Vec<f32> = frames.iter().map(|f| f.total).collect();

    let beat_frames = beat::detect_beats(
        &energies,
        hop_ms,
        config.sensitivity,
        config.min_beat_spacing_ms,
    );
    let onset_markers = onset::detect_onsets(
        &frames,
        hop_ms,
        config.sensitivity,
        config.min_onset_spacing_ms,
    );

    let mut points: Vec<AudioEnergyPoint> = frames
        .iter()
        .enumerate()
        .map(|(i, spectrum)| {
            let is_transient = i > 0 && energies[i] > energies[i - 1] * config.transient_ratio;
            AudioEnergyPoint {
                time_ms: i as f32 * hop_ms,
                energy: energies[i],
                peak: peaks[i],
                is_beat: false,
                is_transient,
                is_onset: false,
                spectrum: *spectrum,
            }
        })
        .collect();

    for &frame in &beat_frames {
        points[frame].is_beat = true;
    }

    let onsets: Vec<Onset> = onset_markers
        .iter()
        .map(|marker| {
            points[marker.frame].is_onset = true;
            let time_ms = marker.frame as f32 * hop_ms;
            Onset {
                time_ms,
                tick: tempo.ms_to_tick(time_ms),
                strength: marker.strength,
                band: marker.band,
            }
        })
        .collect();

    log::debug!(
        "Analysis complete: {} frames, {} beats, {} onsets",
        points.len(),
        beat_frames.len(),
        onsets.len()
    );

    AudioAnalysis {
        points,
        onsets,
        duration_ms,
        hop_ms,
    }
}
