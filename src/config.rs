//! Configuration parameters for audio analysis and event generation

use crate::generate::{DurationPolicy, GapFillMode, GenerationMode, TrackDistribution};
use crate::generate::color::ColorMode;
use crate::timeline::color::Color;

/// Audio analysis configuration parameters
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    // STFT parameters
    /// FFT window size in samples (default: 2048)
    ///
    /// Must be a power of two. 1024, 2048 and 4096 are the supported
    /// operating points; larger windows trade time resolution for
    /// frequency resolution.
    pub window_size: usize,

    /// Hop size between frames in samples (default: 512, i.e. 75% overlap)
    pub hop_size: usize,

    // Detection
    /// Detection sensitivity in [0.0, 1.0] (default: 0.5)
    ///
    /// Feeds the adaptive onset threshold: `mean_flux * (1 + sensitivity * 2)`.
    /// Higher values demand stronger flux peaks, producing fewer onsets.
    pub sensitivity: f32,

    /// Minimum spacing between detected beats in milliseconds (default: 100.0)
    pub min_beat_spacing_ms: f32,

    /// Minimum spacing between detected onsets in milliseconds (default: 50.0)
    pub min_onset_spacing_ms: f32,

    /// Energy ratio over the previous frame above which a frame is
    /// marked as a transient (default: 1.8)
    pub transient_ratio: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 2048,
            hop_size: 512,
            sensitivity: 0.5,
            min_beat_spacing_ms: 100.0,
            min_onset_spacing_ms: 50.0,
            transient_ratio: 1.8,
        }
    }
}

impl AnalysisConfig {
    /// Validate parameters, returning a message describing the first problem
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 || !self.window_size.is_power_of_two() {
            return Err(format!(
                "Window size must be a power of two, got {}",
                self.window_size
            ));
        }
        if self.hop_size == 0 {
            return Err("Hop size must be > 0".to_string());
        }
        if self.hop_size > self.window_size {
            return Err(format!(
                "Hop size ({}) must not exceed window size ({})",
                self.hop_size, self.window_size
            ));
        }
        if !(0.0..=1.0).contains(&self.sensitivity) {
            return Err(format!(
                "Sensitivity must be in [0.0, 1.0], got {}",
                self.sensitivity
            ));
        }
        Ok(())
    }
}

/// Event generation settings
///
/// Controls which generation mode runs, how candidates are distributed
/// across tracks, how they are colored and classified, and how the final
/// event list is cleaned up (overlap resolution, gap filling).
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Generation mode (default: Combined)
    pub mode: GenerationMode,

    /// How events are distributed across output tracks (default: RoundRobin)
    pub distribution: TrackDistribution,

    /// Number of output tracks (default: 4)
    pub track_count: usize,

    /// Color assignment mode (default: SpectralBands)
    pub color_mode: ColorMode,

    /// Base color for Single / EnergyGradient / VelocityMapped modes
    pub base_color: Color,

    /// Palette for Alternating / PaletteRandom modes
    pub palette: Vec<Color>,

    /// Normalized spectral-flux threshold above which an event becomes a
    /// strobe (default: 0.6)
    pub strobe_flux_threshold: f32,

    /// Normalized energy threshold below which an event becomes a fade
    /// (default: 0.25)
    pub fade_energy_threshold: f32,

    /// Multiplier on mean frame energy used by the Energy mode to accept
    /// a frame as a candidate (default: 1.2)
    pub energy_threshold_factor: f32,

    /// Event duration policy (default: NoteLength)
    pub duration_policy: DurationPolicy,

    /// Minimum event duration in ticks; shorter events are dropped during
    /// overlap resolution (default: 60, a 64th note at 960 PPQ)
    pub min_duration_ticks: u32,

    /// Optional quantization grid in ticks; event starts snap to the
    /// nearest multiple when set (default: None)
    pub quantize_grid: Option<u32>,

    /// Gap filling policy (default: None)
    pub gap_fill: GapFillMode,

    /// Minimum gap width in ticks that qualifies for filling (default: 960)
    pub min_gap_ticks: u32,

    /// Merge window in ticks for deduplicating Combined-mode candidates
    /// (default: 120)
    pub merge_window_ticks: u32,

    /// Seed for the PaletteRandom color mode; a fixed seed makes
    /// generation reproducible (default: 0)
    pub seed: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Combined,
            distribution: TrackDistribution::RoundRobin,
            track_count: 4,
            color_mode: ColorMode::SpectralBands,
            base_color: Color::rgb(255, 255, 255),
            palette: vec![
                Color::rgb(255, 0, 0),
                Color::rgb(0, 255, 0),
                Color::rgb(0, 0, 255),
                Color::rgb(255, 200, 0),
            ],
            strobe_flux_threshold: 0.6,
            fade_energy_threshold: 0.25,
            energy_threshold_factor: 1.2,
            duration_policy: DurationPolicy::NoteLength,
            min_duration_ticks: 60,
            quantize_grid: None,
            gap_fill: GapFillMode::None,
            min_gap_ticks: 960,
            merge_window_ticks: 120,
            seed: 0,
        }
    }
}

impl GenerationSettings {
    /// Validate parameters, returning a message describing the first problem
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.track_count == 0 {
            return Err("Track count must be > 0".to_string());
        }
        if self.min_duration_ticks == 0 {
            return Err("Minimum duration must be > 0 ticks".to_string());
        }
        if let Some(grid) = self.quantize_grid {
            if grid == 0 {
                return Err("Quantization grid must be > 0 ticks".to_string());
            }
        }
        if self.palette.is_empty()
            && matches!(self.color_mode, ColorMode::Alternating | ColorMode::PaletteRandom)
        {
            return Err(format!(
                "Color mode {:?} requires a non-empty palette",
                self.color_mode
            ));
        }
        Ok(())
    }
}
