//! Spectral features: band energies, centroid, flux
//!
//! Per-frame features derived from the magnitude spectrum. The band
//! split is the classic 7-band EQ layout over 20-20000 Hz.

use serde::{Deserialize, Serialize};

/// Numerical stability epsilon
const EPSILON: f32 = 1e-10;

/// Number of frequency bands
pub const NUM_BANDS: usize = 7;

/// Band edges in Hz: sub-bass, bass, low-mid, mid, high-mid, presence, brilliance
pub const BAND_EDGES_HZ: [f32; NUM_BANDS + 1] =
    [20.0, 60.0, 250.0, 500.0, 2000.0, 4000.0, 6000.0, 20000.0];

/// Spectral features of one analysis frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectralEnergy {
    /// Per-band energies (sqrt of summed squared magnitudes)
    pub bands: [f32; NUM_BANDS],

    /// Total energy (sqrt of summed squared magnitudes over all bins)
    pub total: f32,

    /// Magnitude-weighted mean frequency in Hz
    pub centroid_hz: f32,

    /// Sum of positive magnitude deltas against the previous frame
    /// (0.0 for the first frame)
    pub flux: f32,
}

impl SpectralEnergy {
    /// Silent frame
    pub fn silent() -> Self {
        Self {
            bands: [0.0; NUM_BANDS],
            total: 0.0,
            centroid_hz: 0.0,
            flux: 0.0,
        }
    }

    /// Compute features for a magnitude frame
    ///
    /// `prev` is the previous frame's magnitudes for flux computation;
    /// `None` for the first frame.
    pub fn compute(
        magnitudes: &[f32],
        prev: Option<&[f32]>,
        sample_rate: u32,
        window_size: usize,
    ) -> Self {
        Self {
            bands: band_energies(magnitudes, sample_rate, window_size),
            total: total_energy(magnitudes),
            centroid_hz: spectral_centroid(magnitudes, sample_rate, window_size),
            flux: prev.map(|p| spectral_flux(p, magnitudes)).unwrap_or(0.0),
        }
    }
}

/// Bucket a magnitude spectrum into the 7 fixed bands
///
/// Band energy is the sqrt of the summed squared magnitudes of the bins
/// whose center frequency falls inside the band.
pub fn band_energies(magnitudes: &[f32], sample_rate: u32, window_size: usize) -> [f32; NUM_BANDS] {
    let mut sums = [0.0f32; NUM_BANDS];
    let bin_hz = sample_rate as f32 / window_size as f32;

    for (i, &mag) in magnitudes.iter().enumerate() {
        let freq = i as f32 * bin_hz;
        if freq < BAND_EDGES_HZ[0] || freq >= BAND_EDGES_HZ[NUM_BANDS] {
            continue;
        }
        // Bands are few; a linear scan beats a binary search here
        for band in 0..NUM_BANDS {
            if freq < BAND_EDGES_HZ[band + 1] {
                sums[band] += mag * mag;
                break;
            }
        }
    }

    let mut bands = [0.0f32; NUM_BANDS];
    for (band, &sum) in sums.iter().enumerate() {
        bands[band] = sum.sqrt();
    }
    bands
}

/// Total frame energy: sqrt of summed squared magnitudes
pub fn total_energy(magnitudes: &[f32]) -> f32 {
    magnitudes.iter().map(|&m| m * m).sum::<f32>().sqrt()
}

/// Magnitude-weighted mean frequency in Hz
///
/// Returns 0.0 for a silent frame.
pub fn spectral_centroid(magnitudes: &[f32], sample_rate: u32, window_size: usize) -> f32 {
    let bin_hz = sample_rate as f32 / window_size as f32;

    let mut weighted = 0.0f32;
    let mut total = 0.0f32;
    for (i, &mag) in magnitudes.iter().enumerate() {
        weighted += i as f32 * bin_hz * mag;
        total += mag;
    }

    if total > EPSILON {
        weighted / total
    } else {
        0.0
    }
}

/// Spectral flux: sum of positive bin-wise magnitude deltas
///
/// Half-wave rectified so decays contribute nothing; onsets show up as
/// flux spikes. Frames of unequal length are compared over the shorter
/// prefix.
pub fn spectral_flux(prev: &[f32], curr: &[f32]) -> f32 {
    prev.iter()
        .zip(curr.iter())
        .map(|(&p, &c)| (c - p).max(0.0))
        .sum()
}
