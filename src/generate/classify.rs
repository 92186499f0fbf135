//! Event-type classification
//!
//! Maps each candidate's signal facts to a visual behavior. Strobes need
//! a sharp spectral change, fades suit low-energy material, everything
//! else stays solid.

use crate::config::GenerationSettings;
use crate::timeline::event::EventKind;

use super::modes::Candidate;

/// Classify one candidate
///
/// Order matters: the strobe test wins over the fade test so an accented
/// quiet hit still strobes.
pub fn classify(candidate: &Candidate, settings: &GenerationSettings) -> EventKind {
    if candidate.flux >= settings.strobe_flux_threshold {
        EventKind::Strobe
    } else if candidate.energy <= settings.fade_energy_threshold {
        EventKind::Fade
    } else {
        EventKind::Solid
    }
}

/// Classify a candidate list
pub fn classify_all(candidates: &[Candidate], settings: &GenerationSettings) -> Vec<EventKind> {
    let kinds: Vec<EventKind> = candidates
        .iter()
        .map(|c| classify(c, settings))
        .collect();

    log::debug!(
        "Classified {} candidates: {} strobe, {} fade, {} solid",
        kinds.len(),
        kinds.iter().filter(|&&k| k == EventKind::Strobe).count(),
        kinds.iter().filter(|&&k| k == EventKind::Fade).count(),
        kinds.iter().filter(|&&k| k == EventKind::Solid).count(),
    );
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::NUM_BANDS;

    fn candidate(energy: f32, flux: f32) -> Candidate {
        Candidate {
            tick: 0,
            duration_ticks: 480,
            energy,
            flux,
            velocity: (energy * 127.0) as u8,
            band: 0,
            bands: [0.0; NUM_BANDS],
            string: None,
        }
    }

    #[test]
    fn test_high_flux_is_strobe() {
        let settings = GenerationSettings::default();
        assert_eq!(classify(&candidate(0.9, 0.8), &settings), EventKind::Strobe);
    }

    #[test]
    fn test_low_energy_is_fade() {
        let settings = GenerationSettings::default();
        assert_eq!(classify(&candidate(0.1, 0.1), &settings), EventKind::Fade);
    }

    #[test]
    fn test_strobe_wins_over_fade() {
        let settings = GenerationSettings::default();
        // Quiet but sharply accented
        assert_eq!(classify(&candidate(0.1, 0.9), &settings), EventKind::Strobe);
    }

    #[test]
    fn test_middle_ground_is_solid() {
        let settings = GenerationSettings::default();
        assert_eq!(classify(&candidate(0.5, 0.2), &settings), EventKind::Solid);
    }

    #[test]
    fn test_thresholds_move_the_boundary() {
        let strict = GenerationSettings {
            strobe_flux_threshold: 1.1, // unreachable
            fade_energy_threshold: 0.0,
            ..Default::default()
        };
        assert_eq!(classify(&candidate(0.1, 0.9), &strict), EventKind::Solid);
    }
}
