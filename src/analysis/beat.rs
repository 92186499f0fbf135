//! Energy-peak beat detection
//!
//! Beats are local maxima of the frame energy curve that clear an
//! adaptive threshold computed over a sliding local window, with a
//! minimum inter-beat spacing (100 ms by default). The local window
//! keeps the threshold honest across quiet verses and loud choruses.

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Local averaging window for the adaptive threshold, in milliseconds
const THRESHOLD_WINDOW_MS: f32 = 1500.0;

/// Detect beats in a frame energy curve
///
/// # Arguments
///
/// * `energies` - Per-frame energy values
/// * `hop_ms` - Milliseconds between frame starts
/// * `sensitivity` - Detection sensitivity in [0.0, 1.0]
/// * `min_spacing_ms` - Minimum time between reported beats
///
/// # Returns
///
/// Frame indices of detected beats, sorted, spaced >= `min_spacing_ms`
pub fn detect_beats(
    energies: &[f32],
    hop_ms: f32,
    sensitivity: f32,
    min_spacing_ms: f32,
) -> Vec<usize> {
    if energies.len() < 3 || hop_ms <= 0.0 {
        return Vec::new();
    }

    let max_energy = energies.iter().copied().fold(0.0f32, f32::max);
    if max_energy <= EPSILON {
        log::debug!("Energy curve is silent, no beats");
        return Vec::new();
    }

    let half_window = ((THRESHOLD_WINDOW_MS / hop_ms) as usize / 2).max(1);
    let min_spacing_frames = (min_spacing_ms / hop_ms).ceil().max(1.0) as usize;
    let factor = 1.0 + sensitivity;

    log::debug!(
        "Detecting beats: {} frames, threshold window=±{} frames, min spacing={} frames",
        energies.len(),
        half_window,
        min_spacing_frames
    );

    let mut beats: Vec<(usize, f32)> = Vec::new();

    for i in 1..energies.len() - 1 {
        let value = energies[i];
        // Local maximum; >= on the right handles plateaus
        if value <= energies[i - 1] || value < energies[i + 1] {
            continue;
        }

        let lo = i.saturating_sub(half_window);
        let hi = (i + half_window + 1).min(energies.len());
        let local_mean = energies[lo..hi].iter().sum::<f32>() / (hi - lo) as f32;

        if value <= local_mean * factor {
            continue;
        }

        match beats.last() {
            Some(&(last_idx, last_val)) if i - last_idx < min_spacing_frames => {
                // Within the spacing window: the stronger peak wins
                if value > last_val {
                    *beats.last_mut().unwrap() = (i, value);
                }
            }
            _ => beats.push((i, value)),
        }
    }

    log::debug!("Detected {} beats", beats.len());
    beats.into_iter().map(|(i, _)| i).collect()
}
