//! Spectral-flux onset detection
//!
//! Onsets are local maxima of the spectral flux curve that clear an
//! adaptive threshold derived from the mean flux:
//!
//! ```text
//! threshold = mean_flux * (1 + sensitivity * 2)
//! ```
//!
//! Candidates closer together than the minimum spacing collapse to the
//! stronger one, so reported onsets are strictly increasing in time and
//! spaced at least the minimum apart.

use super::spectral::{SpectralEnergy, NUM_BANDS};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// A detected onset, positioned by analysis frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OnsetMarker {
    /// Frame index the onset falls on
    pub frame: usize,

    /// Flux relative to the adaptive threshold (>= 1.0)
    pub strength: f32,

    /// Band with the largest positive energy delta at the onset
    pub band: usize,
}

/// Detect onsets in a sequence of per-frame spectral features
///
/// # Arguments
///
/// * `frames` - Per-frame spectral features (flux already computed)
/// * `hop_ms` - Milliseconds between frame starts
/// * `sensitivity` - Detection sensitivity in [0.0, 1.0]
/// * `min_spacing_ms` - Minimum time between reported onsets
///
/// # Returns
///
/// Onset markers sorted by frame, spaced >= `min_spacing_ms` apart
pub fn detect_onsets(
    frames: &[SpectralEnergy],
    hop_ms: f32,
    sensitivity: f32,
    min_spacing_ms: f32,
) -> Vec<OnsetMarker> {
    if frames.len() < 3 {
        return Vec::new();
    }

    let flux: Vec<f32> = frames.iter().map(|f| f.flux).collect();

    // Frame 0 carries no flux by construction; exclude it from the mean
    let mean_flux = flux[1..].iter().sum::<f32>() / (flux.len() - 1) as f32;
    if mean_flux <= EPSILON {
        log::debug!("Flux curve is flat, no onsets");
        return Vec::new();
    }

    let threshold = mean_flux * (1.0 + sensitivity * 2.0);
    let min_spacing_frames = (min_spacing_ms / hop_ms).ceil().max(1.0) as usize;

    log::debug!(
        "Detecting onsets: {} frames, mean flux={:.5}, threshold={:.5}, min spacing={} frames",
        frames.len(),
        mean_flux,
        threshold,
        min_spacing_frames
    );

    let mut onsets: Vec<OnsetMarker> = Vec::new();

    for i in 1..flux.len() - 1 {
        let value = flux[i];
        // Local maximum above threshold; >= on the right handles plateaus
        if value <= threshold || value <= flux[i - 1] || value < flux[i + 1] {
            continue;
        }

        let candidate = OnsetMarker {
            frame: i,
            strength: value / threshold,
            band: dominant_band(&frames[i - 1], &frames[i]),
        };

        match onsets.last() {
            Some(last) if i - last.frame < min_spacing_frames => {
                // Too close to the previous onset: keep the stronger one
                if candidate.strength > last.strength {
                    *onsets.last_mut().unwrap() = candidate;
                }
            }
            _ => onsets.push(candidate),
        }
    }

    log::debug!("Detected {} onsets", onsets.len());
    onsets
}

/// Band with the largest positive energy delta between two frames
fn dominant_band(prev: &SpectralEnergy, curr: &SpectralEnergy) -> usize {
    let mut best = 0;
    let mut best_delta = f32::NEG_INFINITY;
    for band in 0..NUM_BANDS {
        let delta = curr.bands[band] - prev.bands[band];
        if delta > best_delta {
            best_delta = delta;
            best = band;
        }
    }
    best
}
