//! ADSR envelope parameters.
//!
//! Stage times are seconds, bounded by [`MAX_ADSR_TIME_SECONDS`]; sustain
//! is a level in [0, 1]. The envelope editor works in absolute marker
//! times (seconds from note start), so this module also owns the
//! derivation from markers back to stage durations.

use serde::{Deserialize, Serialize};

use crate::error::{TimbreError, TimbreResult};

/// Maximum attack/decay/release time in seconds.
pub const MAX_ADSR_TIME_SECONDS: f64 = 2.5;

/// Minimum separation enforced between absolute stage markers.
pub const MIN_STAGE_GAP_SECONDS: f64 = 0.01;

/// ADSR envelope parameters for one timbre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdsrParams {
    /// Attack time in seconds [0, 2.5].
    pub attack: f64,
    /// Decay time in seconds [0, 2.5].
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    /// Release time in seconds [0, 2.5].
    pub release: f64,
}

impl Default for AdsrParams {
    fn default() -> Self {
        AdsrParams {
            attack: 0.1,
            decay: 0.2,
            sustain: 0.8,
            release: 0.3,
        }
    }
}

impl AdsrParams {
    /// Creates parameters with each field clamped into its valid range.
    pub fn new(attack: f64, decay: f64, sustain: f64, release: f64) -> Self {
        AdsrParams {
            attack: attack.clamp(0.0, MAX_ADSR_TIME_SECONDS),
            decay: decay.clamp(0.0, MAX_ADSR_TIME_SECONDS),
            sustain: sustain.clamp(0.0, 1.0),
            release: release.clamp(0.0, MAX_ADSR_TIME_SECONDS),
        }
    }

    /// Derives stage durations from absolute marker times.
    ///
    /// `attack_end`, `decay_end`, and `release_end` are seconds from note
    /// start. Markers are pushed apart so each stage keeps at least
    /// [`MIN_STAGE_GAP_SECONDS`] of room, preserving their order; the
    /// resulting durations are clamped like [`AdsrParams::new`].
    ///
    /// # Errors
    ///
    /// Returns [`TimbreError::NonFiniteAdsr`] when the derivation produces
    /// NaN or infinite durations (e.g. a drag handler fed bad geometry).
    /// Callers should keep their previous envelope values in that case.
    pub fn from_absolute_times(
        attack_end: f64,
        decay_end: f64,
        release_end: f64,
        sustain: f64,
    ) -> TimbreResult<Self> {
        let decay_end = decay_end.max(attack_end + MIN_STAGE_GAP_SECONDS);
        let release_end = release_end.max(decay_end + MIN_STAGE_GAP_SECONDS);

        let attack = attack_end;
        let decay = decay_end - attack_end;
        let release = release_end - decay_end;

        if !attack.is_finite() || !decay.is_finite() || !release.is_finite() {
            return Err(TimbreError::NonFiniteAdsr {
                attack,
                decay,
                release,
            });
        }

        Ok(AdsrParams::new(attack, decay, sustain, release))
    }

    /// Sustain level after the normalized-amplitude read clamp.
    ///
    /// The stored sustain may exceed the synthesized waveform's peak when
    /// coefficients were lowered after the envelope was edited; reads clamp
    /// it against the current ceiling.
    pub fn sustain_within(&self, amplitude_ceiling: f64) -> f64 {
        self.sustain.min(amplitude_ceiling.max(0.0))
    }
}
