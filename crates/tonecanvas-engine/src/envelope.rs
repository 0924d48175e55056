//! Envelope-driven note fill animation.
//!
//! While a note sounds, its body fills according to the color's ADSR
//! envelope: rising through the attack, easing to the sustain level
//! through the decay, holding, then draining through the release.
//!
//! Fill levels are computed from the note's start time on a canonical
//! timeline, never accumulated frame by frame, so a dropped frame or an
//! odd tick cadence cannot bend the envelope shape. Stage boundaries land
//! exactly where the ADSR times put them.

use std::collections::HashMap;

use tonecanvas_timbre::{AdsrParams, NoteColor};

use crate::animation::NoteId;

/// Fallback stage durations when an ADSR time sits at zero. The fill
/// still animates, just fast enough to read as immediate.
const MIN_ATTACK_SECONDS: f64 = 0.01;
const MIN_DECAY_SECONDS: f64 = 0.1;
const MIN_RELEASE_SECONDS: f64 = 0.5;

/// Which envelope stage a note's fill is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPhase {
    /// Rising toward full.
    Attack,
    /// Easing down toward the sustain level.
    Decay,
    /// Holding at the sustain level.
    Sustain,
    /// Draining after release.
    Release,
}

#[derive(Debug, Clone)]
struct FillState {
    color: NoteColor,
    adsr: AdsrParams,
    started_at: f64,
    fill_level: f64,
    phase: FillPhase,
    release_started_at: Option<f64>,
    release_start_level: f64,
}

impl FillState {
    fn attack_duration(&self) -> f64 {
        if self.adsr.attack > 0.0 {
            self.adsr.attack
        } else {
            MIN_ATTACK_SECONDS
        }
    }

    fn decay_duration(&self) -> f64 {
        if self.adsr.decay > 0.0 {
            self.adsr.decay
        } else {
            MIN_DECAY_SECONDS
        }
    }

    fn release_duration(&self) -> f64 {
        if self.adsr.release > 0.0 {
            self.adsr.release
        } else {
            MIN_RELEASE_SECONDS
        }
    }

    /// Fill level and phase at `now`, straight from the timeline.
    fn level_at(&self, now: f64) -> (f64, FillPhase) {
        if let Some(release_start) = self.release_started_at {
            let progress = ((now - release_start) / self.release_duration()).clamp(0.0, 1.0);
            return (self.release_start_level * (1.0 - progress), FillPhase::Release);
        }

        let elapsed = (now - self.started_at).max(0.0);
        let attack = self.attack_duration();
        if elapsed < attack {
            return ((elapsed / attack).clamp(0.0, 1.0), FillPhase::Attack);
        }

        let decay = self.decay_duration();
        let into_decay = elapsed - attack;
        if into_decay < decay {
            let progress = into_decay / decay;
            return (
                1.0 - progress * (1.0 - self.adsr.sustain),
                FillPhase::Decay,
            );
        }

        (self.adsr.sustain, FillPhase::Sustain)
    }

    fn is_drained(&self, now: f64) -> bool {
        match self.release_started_at {
            Some(release_start) => now - release_start >= self.release_duration(),
            None => false,
        }
    }
}

/// Fill levels for every currently animated note.
#[derive(Debug, Default)]
pub struct EnvelopeAmplitudeModel {
    fills: HashMap<NoteId, FillState>,
}

impl EnvelopeAmplitudeModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fill for a note with a snapshot of its color's envelope.
    ///
    /// The snapshot is deliberate: editing the ADSR mid-note must not
    /// reshape fills already in flight. A repeated attack for the same id
    /// restarts its fill.
    pub fn note_attack(&mut self, id: NoteId, color: NoteColor, adsr: AdsrParams, now: f64) {
        self.fills.insert(
            id,
            FillState {
                color,
                adsr,
                started_at: now,
                fill_level: 0.0,
                phase: FillPhase::Attack,
                release_started_at: None,
                release_start_level: 0.0,
            },
        );
    }

    /// Begins the release stage, capturing the level reached so far.
    ///
    /// Releasing an unknown or already-releasing note does nothing.
    pub fn note_release(&mut self, id: &NoteId, now: f64) {
        if let Some(state) = self.fills.get_mut(id) {
            if state.release_started_at.is_none() {
                let (level, _) = state.level_at(now);
                state.release_start_level = level;
                state.release_started_at = Some(now);
                state.phase = FillPhase::Release;
            }
        }
    }

    /// Recomputes every fill for this frame and drops drained releases.
    pub fn tick(&mut self, now: f64) {
        self.fills.retain(|_, state| !state.is_drained(now));
        for state in self.fills.values_mut() {
            let (level, phase) = state.level_at(now);
            state.fill_level = level;
            state.phase = phase;
        }
    }

    /// Fill level of a note as of the last tick, in [0, 1].
    pub fn fill_level(&self, id: &NoteId) -> Option<f64> {
        self.fills.get(id).map(|state| state.fill_level)
    }

    /// Stage of a note's fill as of the last tick.
    pub fn fill_phase(&self, id: &NoteId) -> Option<FillPhase> {
        self.fills.get(id).map(|state| state.phase)
    }

    /// Colors with at least one animated fill, sorted and deduplicated.
    pub fn active_colors(&self) -> Vec<NoteColor> {
        let mut colors: Vec<NoteColor> =
            self.fills.values().map(|state| state.color.clone()).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    /// Whether any fill is animating.
    pub fn has_active_fills(&self) -> bool {
        !self.fills.is_empty()
    }

    /// Drops every fill, releases included. Used when playback stops.
    pub fn clear(&mut self) {
        self.fills.clear();
    }
}

/// Amplitude ceiling for envelope displays.
///
/// A non-positive waveform amplitude reads as full scale so a silent
/// spectrum does not pin every envelope to zero. With `dynamic` set the
/// ceiling follows the live tremolo multiplier, which is how the sustain
/// dial shows the level dipping as tremolo modulates.
pub fn envelope_peak(original_amplitude: f64, tremolo_multiplier: f64, dynamic: bool) -> f64 {
    let amplitude = if original_amplitude > 0.0 {
        original_amplitude
    } else {
        1.0
    };
    if dynamic {
        amplitude * tremolo_multiplier
    } else {
        amplitude
    }
}

/// Clamps a requested sustain level to an amplitude ceiling.
///
/// Returns the level to apply and whether clamping changed it.
pub fn clamp_sustain(requested: f64, ceiling: f64) -> (f64, bool) {
    let applied = requested.clamp(0.0, ceiling.max(0.0));
    (applied, applied != requested)
}
