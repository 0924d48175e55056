//! Harmonic spectrum data for additive synthesis.
//!
//! A spectrum holds twelve amplitude bins and twelve phase bins. Bin `i`
//! describes harmonic `i + 1` of the fundamental. Phases are expressed in
//! radians but are driven by the editor's phase buttons, which step each
//! bin through quarter turns rather than exposing a continuous dial.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{TimbreError, TimbreResult};
use crate::HARMONIC_BINS;

/// Tolerance when snapping a stored radian value back to a quarter turn.
const PHASE_SNAP_TOLERANCE: f64 = 0.1;

/// Quarter-turn phase offset for a harmonic bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStep {
    /// 0 radians.
    #[default]
    Zero,
    /// π/2 radians.
    Quarter,
    /// π radians.
    Half,
    /// 3π/2 radians.
    ThreeQuarter,
}

impl PhaseStep {
    /// Phase offset in radians.
    pub fn radians(self) -> f64 {
        match self {
            PhaseStep::Zero => 0.0,
            PhaseStep::Quarter => FRAC_PI_2,
            PhaseStep::Half => PI,
            PhaseStep::ThreeQuarter => 3.0 * FRAC_PI_2,
        }
    }

    /// The next step in the button cycle 0 → π/2 → π → 3π/2 → 0.
    pub fn next(self) -> PhaseStep {
        match self {
            PhaseStep::Zero => PhaseStep::Quarter,
            PhaseStep::Quarter => PhaseStep::Half,
            PhaseStep::Half => PhaseStep::ThreeQuarter,
            PhaseStep::ThreeQuarter => PhaseStep::Zero,
        }
    }

    /// Snaps a radian value to its quarter turn, within a 0.1 tolerance.
    ///
    /// Values within tolerance of a full turn snap to [`PhaseStep::Zero`].
    /// Returns `None` for values that match no quarter turn, e.g. data
    /// written by hand into a saved document.
    pub fn from_radians(radians: f64) -> Option<PhaseStep> {
        let steps = [
            PhaseStep::Zero,
            PhaseStep::Quarter,
            PhaseStep::Half,
            PhaseStep::ThreeQuarter,
        ];
        for step in steps {
            if (radians - step.radians()).abs() < PHASE_SNAP_TOLERANCE {
                return Some(step);
            }
        }
        if (radians - TAU).abs() < PHASE_SNAP_TOLERANCE {
            return Some(PhaseStep::Zero);
        }
        None
    }
}

/// Per-color harmonic amplitudes and phase offsets.
///
/// `coeffs[i]` is the amplitude of harmonic `i + 1` in [0, 1];
/// `phases[i]` is its phase offset in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicSpectrum {
    /// Harmonic amplitudes in [0, 1].
    pub coeffs: [f64; HARMONIC_BINS],
    /// Phase offsets in radians, quantized to quarter turns by the UI.
    /// Documents saved before phase editing existed omit this field.
    #[serde(default)]
    pub phases: [f64; HARMONIC_BINS],
}

impl Default for HarmonicSpectrum {
    fn default() -> Self {
        HarmonicSpectrum::sine()
    }
}

impl HarmonicSpectrum {
    /// A pure sine spectrum: H1 at full amplitude, everything else silent.
    pub fn sine() -> Self {
        let mut coeffs = [0.0; HARMONIC_BINS];
        coeffs[0] = 1.0;
        HarmonicSpectrum {
            coeffs,
            phases: [0.0; HARMONIC_BINS],
        }
    }

    /// Builds a spectrum from amplitude values, clamping each into [0, 1].
    pub fn from_coeffs(coeffs: [f64; HARMONIC_BINS]) -> Self {
        let mut spectrum = HarmonicSpectrum {
            coeffs,
            phases: [0.0; HARMONIC_BINS],
        };
        for c in spectrum.coeffs.iter_mut() {
            *c = c.clamp(0.0, 1.0);
        }
        spectrum
    }

    /// Rehydrates a spectrum from persisted numeric sequences.
    ///
    /// Saved documents store `coeffs` and `phases` as plain arrays; this is
    /// the boundary where they re-enter the fixed-length representation.
    /// Amplitudes are clamped into [0, 1]; phases are kept as stored.
    ///
    /// # Errors
    ///
    /// Returns an error when either sequence has the wrong length or
    /// contains a non-finite value.
    pub fn from_slices(coeffs: &[f64], phases: &[f64]) -> TimbreResult<Self> {
        if coeffs.len() != HARMONIC_BINS {
            return Err(TimbreError::sequence_length(
                "coeffs",
                HARMONIC_BINS,
                coeffs.len(),
            ));
        }
        if phases.len() != HARMONIC_BINS {
            return Err(TimbreError::sequence_length(
                "phases",
                HARMONIC_BINS,
                phases.len(),
            ));
        }
        for &value in coeffs {
            if !value.is_finite() {
                return Err(TimbreError::non_finite("coeffs", value));
            }
        }
        for &value in phases {
            if !value.is_finite() {
                return Err(TimbreError::non_finite("phases", value));
            }
        }

        let mut spectrum = HarmonicSpectrum {
            coeffs: [0.0; HARMONIC_BINS],
            phases: [0.0; HARMONIC_BINS],
        };
        for (slot, &value) in spectrum.coeffs.iter_mut().zip(coeffs) {
            *slot = value.clamp(0.0, 1.0);
        }
        spectrum.phases.copy_from_slice(phases);
        Ok(spectrum)
    }

    /// Sets one bin's amplitude, clamped into [0, 1].
    ///
    /// Out-of-range bin indices are ignored.
    pub fn set_coeff(&mut self, bin: usize, value: f64) {
        if let Some(slot) = self.coeffs.get_mut(bin) {
            *slot = value.clamp(0.0, 1.0);
        }
    }

    /// Advances one bin's phase button to the next quarter turn.
    ///
    /// Returns the `(old, new)` radian pair so the caller can start a
    /// waveform transition between the two settings. Stored values that
    /// match no quarter turn restart the cycle at π/2. Out-of-range bin
    /// indices return `None`.
    pub fn cycle_phase(&mut self, bin: usize) -> Option<(f64, f64)> {
        let slot = self.phases.get_mut(bin)?;
        let old = *slot;
        let next = PhaseStep::from_radians(old)
            .unwrap_or(PhaseStep::Zero)
            .next();
        *slot = next.radians();
        Some((old, next.radians()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_sine() {
        let spectrum = HarmonicSpectrum::default();
        assert_eq!(spectrum.coeffs[0], 1.0);
        assert!(spectrum.coeffs[1..].iter().all(|&c| c == 0.0));
        assert!(spectrum.phases.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_phase_step_cycle() {
        let mut step = PhaseStep::Zero;
        let mut seen = vec![step];
        for _ in 0..3 {
            step = step.next();
            seen.push(step);
        }
        assert_eq!(
            seen,
            vec![
                PhaseStep::Zero,
                PhaseStep::Quarter,
                PhaseStep::Half,
                PhaseStep::ThreeQuarter,
            ]
        );
        assert_eq!(step.next(), PhaseStep::Zero);
    }

    #[test]
    fn test_phase_snap_tolerance() {
        assert_eq!(PhaseStep::from_radians(0.05), Some(PhaseStep::Zero));
        assert_eq!(PhaseStep::from_radians(PI + 0.09), Some(PhaseStep::Half));
        assert_eq!(PhaseStep::from_radians(TAU - 0.01), Some(PhaseStep::Zero));
        assert_eq!(PhaseStep::from_radians(1.0), None);
    }

    #[test]
    fn test_cycle_phase_returns_transition_pair() {
        let mut spectrum = HarmonicSpectrum::sine();
        let (old, new) = spectrum.cycle_phase(0).unwrap();
        assert_eq!(old, 0.0);
        assert_eq!(new, FRAC_PI_2);
        assert_eq!(spectrum.phases[0], FRAC_PI_2);

        let (old, new) = spectrum.cycle_phase(0).unwrap();
        assert_eq!(old, FRAC_PI_2);
        assert_eq!(new, PI);
    }

    #[test]
    fn test_cycle_phase_out_of_range_bin() {
        let mut spectrum = HarmonicSpectrum::sine();
        assert_eq!(spectrum.cycle_phase(HARMONIC_BINS), None);
    }

    #[test]
    fn test_from_slices_validates_length() {
        let short = vec![1.0; 7];
        let phases = vec![0.0; HARMONIC_BINS];
        let err = HarmonicSpectrum::from_slices(&short, &phases).unwrap_err();
        assert_eq!(err, TimbreError::sequence_length("coeffs", 12, 7));
    }

    #[test]
    fn test_from_slices_rejects_non_finite() {
        let mut coeffs = vec![0.0; HARMONIC_BINS];
        coeffs[3] = f64::NAN;
        let phases = vec![0.0; HARMONIC_BINS];
        assert!(HarmonicSpectrum::from_slices(&coeffs, &phases).is_err());
    }

    #[test]
    fn test_from_slices_clamps_amplitudes() {
        let coeffs = vec![1.5; HARMONIC_BINS];
        let phases = vec![0.0; HARMONIC_BINS];
        let spectrum = HarmonicSpectrum::from_slices(&coeffs, &phases).unwrap();
        assert!(spectrum.coeffs.iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_set_coeff_clamps_and_ignores_bad_bin() {
        let mut spectrum = HarmonicSpectrum::sine();
        spectrum.set_coeff(2, 1.7);
        assert_eq!(spectrum.coeffs[2], 1.0);
        spectrum.set_coeff(2, -0.5);
        assert_eq!(spectrum.coeffs[2], 0.0);
        spectrum.set_coeff(99, 0.5); // no panic
    }

    #[test]
    fn test_serde_round_trip() {
        let mut spectrum = HarmonicSpectrum::sine();
        spectrum.set_coeff(4, 0.25);
        spectrum.cycle_phase(4);

        let json = serde_json::to_string(&spectrum).unwrap();
        let back: HarmonicSpectrum = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spectrum);
    }
}
