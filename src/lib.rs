//! # Lumen Gen
//!
//! An audio/tablature-driven stage-light event generation engine,
//! providing spectral audio analysis, beat/onset detection and
//! rule-based generation of non-overlapping colored light events.
//!
//! ## Features
//!
//! - **Spectral analysis**: Hann-windowed FFT with 7-band bucketing,
//!   spectral flux and centroid per frame
//! - **Beat & onset detection**: adaptive-threshold energy peaks and
//!   flux maxima with enforced minimum spacing
//! - **Tablature extraction**: per-beat note/accent facts from an
//!   in-memory tab track
//! - **Event generation**: five modes, seven color mappings,
//!   solid/fade/strobe classification, overlap resolution and gap
//!   filling over a 960-PPQ tick timeline
//!
//! ## Quick Start
//!
//! ```no_run
//! use lumen_gen::{generate_light_show, AnalysisConfig, GenerationSettings};
//! use lumen_gen::timeline::tempo::TempoMap;
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//! let tempo = TempoMap::constant(120.0);
//!
//! let events = generate_light_show(
//!     &samples,
//!     sample_rate,
//!     None,
//!     &tempo,
//!     &AnalysisConfig::default(),
//!     &GenerationSettings::default(),
//! )?;
//!
//! println!("Generated {} light events", events.len());
//! # Ok::<(), lumen_gen::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! The generation pipeline follows this flow:
//!
//! ```text
//! Audio/Tab Input → Analysis / Extraction → Candidates → Classify + Color
//!                 → Overlap Resolution → Gap Fill → Event List
//! ```
//!
//! Analysis results are rebuilt wholesale per call; there is no
//! incremental update path.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod generate;
pub mod io;
pub mod tab;
pub mod timeline;

// Re-export main types
pub use analysis::{analyze_envelope, analyze_samples, AudioAnalysis, AudioEnergyPoint, Onset};
pub use config::{AnalysisConfig, GenerationSettings};
pub use error::EngineError;
pub use generate::{generate_events, GenerationInput, GenerationMode};
pub use tab::{extract_tab_events, TabEventInfo, TabTrack};
pub use timeline::color::Color;
pub use timeline::event::{EventKind, LightEvent};

use timeline::tempo::TempoMap;

/// Analyze audio, extract tablature and generate a light show in one call
///
/// Convenience wrapper over [`analyze_samples`], [`extract_tab_events`]
/// and [`generate_events`]. The selected generation mode decides which
/// of the two inputs it actually uses; analysis always runs so modes
/// that need audio have it.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100 or 48000)
/// * `tab_track` - Optional tablature track to extract events from
/// * `tempo` - Tempo map relating milliseconds to ticks
/// * `analysis_config` - Analysis parameters
/// * `settings` - Generation settings
///
/// # Errors
///
/// Returns `EngineError` if analysis fails or the selected mode's
/// required input is missing.
pub fn generate_light_show(
    samples: &[f32],
    sample_rate: u32,
    tab_track: Option<&TabTrack>,
    tempo: &TempoMap,
    analysis_config: &AnalysisConfig,
    settings: &GenerationSettings,
) -> Result<Vec<LightEvent>, EngineError> {
    let analysis = analyze_samples(samples, sample_rate, analysis_config, tempo)?;
    let tab_events = tab_track.map(extract_tab_events);

    generate_events(
        GenerationInput {
            analysis: Some(&analysis),
            tab_events: tab_events.as_deref(),
        },
        tempo,
        settings,
    )
}
