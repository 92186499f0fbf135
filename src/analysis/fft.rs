//! Windowed FFT spectrogram computation
//!
//! Short-time Fourier transform over Hann-windowed frames. The window
//! size is configurable (1024/2048/4096 are the canonical sizes); the
//! hop defaults to a quarter window, i.e. 75% overlap.
//!
//! Magnitude output per frame has exactly `window_size / 2` bins (the
//! positive-frequency half; bin `i` sits at `i * sample_rate / window_size` Hz).

use crate::error::EngineError;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Hann window coefficients of length `n`
pub fn hann_window(n: usize) -> Vec<f32> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| {
            let t = 2.0 * std::f32::consts::PI * i as f32 / (n - 1) as f32;
            0.5 * (1.0 - t.cos())
        })
        .collect()
}

/// Compute a magnitude spectrogram over Hann-windowed frames
///
/// # Arguments
///
/// * `samples` - Audio samples (mono, normalized to [-1.0, 1.0])
/// * `window_size` - FFT window size (power of two)
/// * `hop_size` - Samples between frame starts
///
/// # Returns
///
/// One magnitude vector per frame; each has `window_size / 2` bins.
/// Samples shorter than one window produce an empty spectrogram.
///
/// # Errors
///
/// Returns `EngineError::InvalidInput` for a zero or non-power-of-two
/// window, or a zero hop.
pub fn compute_spectrogram(
    samples: &[f32],
    window_size: usize,
    hop_size: usize,
) -> Result<Vec<Vec<f32>>, EngineError> {
    if window_size == 0 || !window_size.is_power_of_two() {
        return Err(EngineError::InvalidInput(format!(
            "Window size must be a power of two, got {}",
            window_size
        )));
    }
    if hop_size == 0 {
        return Err(EngineError::InvalidInput(
            "Hop size must be > 0".to_string(),
        ));
    }

    if samples.len() < window_size {
        log::warn!(
            "Audio shorter than one window ({} < {}), spectrogram is empty",
            samples.len(),
            window_size
        );
        return Ok(Vec::new());
    }

    let num_frames = (samples.len() - window_size) / hop_size + 1;
    let window = hann_window(window_size);

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(window_size);
    let mut scratch = vec![Complex::new(0.0f32, 0.0); fft.get_inplace_scratch_len()];

    log::debug!(
        "Computing spectrogram: {} samples, window={}, hop={}, {} frames",
        samples.len(),
        window_size,
        hop_size,
        num_frames
    );

    let mut frames = Vec::with_capacity(num_frames);
    let mut buffer = vec![Complex::new(0.0f32, 0.0); window_size];

    for frame_idx in 0..num_frames {
        let start = frame_idx * hop_size;
        for (i, (&sample, &w)) in samples[start..start + window_size]
            .iter()
            .zip(window.iter())
            .enumerate()
        {
            buffer[i] = Complex::new(sample * w, 0.0);
        }

        fft.process_with_scratch(&mut buffer, &mut scratch);

        // Positive-frequency half only
        let magnitudes: Vec<f32> = buffer[..window_size / 2]
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect();
        frames.push(magnitudes);
    }

    Ok(frames)
}
