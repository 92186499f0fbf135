//! Synthetic envelope analysis fallback
//!
//! When raw PCM is unavailable the editor still caches a per-segment
//! min/max waveform for drawing. This module synthesizes analysis frames
//! from those segments: segment amplitude stands in for frame energy and
//! a fixed low-weighted band profile stands in for the spectrum, so the
//! beat/onset/transient machinery downstream runs unchanged.

use serde::{Deserialize, Serialize};

use super::spectral::{SpectralEnergy, BAND_EDGES_HZ, NUM_BANDS};

/// Fixed band profile for synthetic spectra, weighted toward the low
/// bands (percussive assumption). Sums to 1.0.
const BAND_PROFILE: [f32; NUM_BANDS] = [0.35, 0.25, 0.15, 0.10, 0.07, 0.05, 0.03];

/// One cached waveform segment: the min and max sample value over the
/// segment's span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSegment {
    /// Minimum sample value in the segment
    pub min: f32,
    /// Maximum sample value in the segment
    pub max: f32,
}

impl WaveformSegment {
    /// Peak-to-peak half amplitude of the segment
    pub fn amplitude(&self) -> f32 {
        ((self.max - self.min) * 0.5).max(0.0)
    }

    /// Largest absolute sample value in the segment
    pub fn peak(&self) -> f32 {
        self.min.abs().max(self.max.abs())
    }
}

/// Synthesize per-frame spectral features from waveform segments
///
/// Returns one `(peak, SpectralEnergy)` pair per segment. Flux is the
/// positive amplitude delta between consecutive segments; the centroid
/// is the profile-weighted band center for non-silent segments.
pub fn synthesize_frames(segments: &[WaveformSegment]) -> Vec<(f32, SpectralEnergy)> {
    let centroid = profile_centroid_hz();
    let mut prev_amplitude = 0.0f32;

    segments
        .iter()
        .map(|segment| {
            let amplitude = segment.amplitude();
            let mut bands = [0.0f32; NUM_BANDS];
            for (band, weight) in BAND_PROFILE.iter().enumerate() {
                bands[band] = amplitude * weight;
            }

            let flux = (amplitude - prev_amplitude).max(0.0);
            prev_amplitude = amplitude;

            let spectrum = SpectralEnergy {
                bands,
                total: amplitude,
                centroid_hz: if amplitude > 0.0 { centroid } else { 0.0 },
                flux,
            };
            (segment.peak(), spectrum)
        })
        .collect()
}

/// Profile-weighted mean of the band center frequencies
fn profile_centroid_hz() -> f32 {
    BAND_PROFILE
        .iter()
        .enumerate()
        .map(|(band, &w)| w * (BAND_EDGES_HZ[band] + BAND_EDGES_HZ[band + 1]) * 0.5)
        .sum()
}
