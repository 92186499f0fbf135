//! Audio input
//!
//! WAV loading for feeding the analyzer. Multi-channel files are
//! downmixed to mono by channel averaging; integer formats are scaled to
//! [-1.0, 1.0]. Anything beyond WAV is the host application's problem.

use std::path::Path;

use crate::error::EngineError;

/// Decoded mono audio
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Mono samples normalized to [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioData {
    /// Audio duration in milliseconds
    pub fn duration_ms(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32 * 1000.0
    }
}

/// Load a WAV file as normalized mono samples
///
/// # Errors
///
/// Returns `EngineError::DecodingError` when the file cannot be opened
/// or parsed, or `EngineError::InvalidInput` for zero-channel files.
pub fn load_wav(path: &Path) -> Result<AudioData, EngineError> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| EngineError::DecodingError(format!("{}: {}", path.display(), e)))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        return Err(EngineError::InvalidInput(
            "WAV file reports zero channels".to_string(),
        ));
    }

    log::debug!(
        "Loading {}: {} Hz, {} channels, {:?} {} bit",
        path.display(),
        spec.sample_rate,
        spec.channels,
        spec.sample_format,
        spec.bits_per_sample
    );

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| EngineError::DecodingError(e.to_string()))?,
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / max_value))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| EngineError::DecodingError(e.to_string()))?
        }
    };

    Ok(AudioData {
        samples: downmix(&samples, spec.channels as usize),
        sample_rate: spec.sample_rate,
    })
}

/// Average interleaved channels into mono
fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(downmix(&samples, 1), samples);
    }

    #[test]
    fn test_downmix_stereo_averages() {
        let samples = vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&samples, 2), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_downmix_trailing_partial_frame() {
        // Odd sample count with stereo: the final lone sample averages
        // with itself rather than panicking
        let samples = vec![1.0, 0.0, 0.8];
        assert_eq!(downmix(&samples, 2), vec![0.5, 0.8]);
    }

    #[test]
    fn test_missing_file_is_decoding_error() {
        let result = load_wav(Path::new("/nonexistent/file.wav"));
        assert!(matches!(result, Err(EngineError::DecodingError(_))));
    }

    #[test]
    fn test_duration_ms() {
        let audio = AudioData {
            samples: vec![0.0; 44100],
            sample_rate: 44100,
        };
        assert!((audio.duration_ms() - 1000.0).abs() < 0.01);
    }
}
