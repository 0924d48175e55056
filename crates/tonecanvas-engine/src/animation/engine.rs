//! The modulation animation engine.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tonecanvas_timbre::{EffectParams, NoteColor, TremoloParams, VibratoParams};

use crate::audio::speed_to_frequency_hz;
use crate::events::VisualEffectChange;

use super::activity::{NoteActivity, NoteId};
use super::state::AnimationState;

/// Visual pitch offset at full vibrato span, in semitones.
pub const VIBRATO_MAX_OFFSET_SEMITONES: f64 = 0.5;

/// What one modulation channel wants painted this tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelFrame {
    /// Nothing to emit.
    Silent,
    /// These colors are animating; frame subject to throttling.
    Animate(Vec<NoteColor>),
    /// The channel just stopped; repaint these colors at rest. Never
    /// throttled, so notes are not left mid-wobble.
    Reset(Vec<NoteColor>),
}

/// Combined result of advancing both modulation channels.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Position repaints.
    pub vibrato: ChannelFrame,
    /// Brightness repaints.
    pub tremolo: ChannelFrame,
}

impl TickOutcome {
    /// Whether the tick produced nothing to emit.
    pub fn is_idle(&self) -> bool {
        self.vibrato == ChannelFrame::Silent && self.tremolo == ChannelFrame::Silent
    }
}

/// Oscillators and stop bookkeeping for one modulation effect.
#[derive(Debug, Default)]
struct EffectChannel {
    states: HashMap<NoteColor, AnimationState>,
    running: bool,
    /// Colors whose entry was removed since the last tick; they get one
    /// more repaint at rest so they do not freeze mid-offset.
    pending_reset: Vec<NoteColor>,
}

impl EffectChannel {
    fn set(&mut self, color: &NoteColor, enabled: bool, frequency_hz: f64, depth: f64, now: f64) {
        if !enabled {
            if self.states.remove(color).is_some() {
                self.pending_reset.push(color.clone());
            }
            return;
        }
        match self.states.entry(color.clone()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().retune(frequency_hz, depth),
            Entry::Vacant(vacant) => {
                vacant.insert(AnimationState::new(frequency_hz, depth, now));
            }
        }
    }

    fn sorted_colors(&self) -> Vec<NoteColor> {
        let mut colors: Vec<NoteColor> = self.states.keys().cloned().collect();
        colors.sort();
        colors
    }

    fn tick(&mut self, gate_open: bool, now: f64) -> ChannelFrame {
        let mut resets = std::mem::take(&mut self.pending_reset);

        if gate_open {
            if !self.running {
                self.running = true;
                // Coming out of idle: do not integrate the idle gap.
                for state in self.states.values_mut() {
                    state.rebase(now);
                }
            }
            for state in self.states.values_mut() {
                state.advance(now);
            }
            let mut colors = self.sorted_colors();
            colors.append(&mut resets);
            colors.sort();
            colors.dedup();
            return ChannelFrame::Animate(colors);
        }

        // Gate closed: freeze phases in place.
        for state in self.states.values_mut() {
            state.rebase(now);
        }
        if self.running {
            self.running = false;
            let mut colors = self.sorted_colors();
            colors.append(&mut resets);
            colors.sort();
            colors.dedup();
            ChannelFrame::Reset(colors)
        } else {
            // Anything disabled while the channel was quiet is already at
            // rest on screen.
            ChannelFrame::Silent
        }
    }
}

/// Phase oscillators for both modulation effects, gated by note activity.
#[derive(Debug, Default)]
pub struct AnimationPhaseEngine {
    vibrato: EffectChannel,
    tremolo: EffectChannel,
    activity: NoteActivity,
}

impl AnimationPhaseEngine {
    /// Creates an engine with no oscillators and quiet activity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live note and transport state.
    pub fn activity(&self) -> &NoteActivity {
        &self.activity
    }

    /// Mutable access for activity bookkeeping.
    pub fn activity_mut(&mut self) -> &mut NoteActivity {
        &mut self.activity
    }

    /// Installs, retunes, or removes a color's vibrato oscillator.
    ///
    /// Retuning preserves accumulated phase. Disabled parameters remove
    /// the oscillator and schedule one rest repaint.
    pub fn set_vibrato(&mut self, color: &NoteColor, params: &VibratoParams, now: f64) {
        self.vibrato.set(
            color,
            !params.is_disabled(),
            speed_to_frequency_hz(params.speed),
            params.span / 100.0 * VIBRATO_MAX_OFFSET_SEMITONES,
            now,
        );
    }

    /// Installs, retunes, or removes a color's tremolo oscillator.
    pub fn set_tremolo(&mut self, color: &NoteColor, params: &TremoloParams, now: f64) {
        self.tremolo.set(
            color,
            !params.is_disabled(),
            speed_to_frequency_hz(params.speed),
            params.span / 100.0,
            now,
        );
    }

    /// Routes a visual effect change to the matching oscillator map.
    /// Non-modulation payloads are ignored.
    pub fn apply_visual_change(&mut self, change: &VisualEffectChange, now: f64) {
        match &change.params {
            EffectParams::Vibrato(params) => self.set_vibrato(&change.color, params, now),
            EffectParams::Tremolo(params) => self.set_tremolo(&change.color, params, now),
            EffectParams::Reverb(_) | EffectParams::Delay(_) => {}
        }
    }

    fn vibrato_gate_open(&self) -> bool {
        !self.vibrato.states.is_empty()
            && (self.activity.playback_active()
                || self.activity.is_interacting()
                || self.activity.is_dialing())
    }

    fn tremolo_gate_open(&self) -> bool {
        !self.tremolo.states.is_empty()
            && (self.activity.has_sounding() || self.activity.is_dialing())
    }

    /// Advances both channels one frame.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let vibrato_open = self.vibrato_gate_open();
        let tremolo_open = self.tremolo_gate_open();
        TickOutcome {
            vibrato: self.vibrato.tick(vibrato_open, now),
            tremolo: self.tremolo.tick(tremolo_open, now),
        }
    }

    /// Current vertical offset for a color's notes, in semitones.
    ///
    /// Zero whenever the vibrato gate is closed or the color has no
    /// oscillator, so painters can query unconditionally.
    pub fn vibrato_y_offset(&self, color: &NoteColor) -> f64 {
        if !self.vibrato_gate_open() {
            return 0.0;
        }
        match self.vibrato.states.get(color) {
            Some(state) => -state.phase.sin() * state.depth,
            None => 0.0,
        }
    }

    /// Current amplitude multiplier for a color's notes, in [0, 1].
    ///
    /// The multiplier oscillates between the span fraction and one: a
    /// span of 40 dips to 0.4 of full amplitude and returns. One whenever
    /// the tremolo gate is closed or the color has no oscillator.
    /// Non-positive amplitudes fall back to full scale rather than
    /// silencing the note.
    pub fn tremolo_multiplier(&self, color: &NoteColor, original_amplitude: f64) -> f64 {
        if !self.tremolo_gate_open() {
            return 1.0;
        }
        let Some(state) = self.tremolo.states.get(color) else {
            return 1.0;
        };

        let original = if original_amplitude > 0.0 {
            original_amplitude
        } else {
            1.0
        };
        let maxima = original;
        let minima = original * state.depth;
        let centroid = (maxima + minima) / 2.0;
        let range = (maxima - minima) / 2.0;
        let current = centroid + state.phase.sin() * range;
        (current / original).clamp(0.0, 1.0)
    }

    /// Whether a color's tremolo is currently modulating amplitude.
    pub fn tremolo_engaged(&self, color: &NoteColor) -> bool {
        self.tremolo_gate_open() && self.tremolo.states.contains_key(color)
    }

    /// Whether a specific note should follow the modulation animation.
    ///
    /// `note_id` is `None` for the placement ghost. A dial drag previews
    /// on every note of the dialed color; otherwise placed notes animate
    /// while grabbed or while sounding during playback, and the ghost
    /// animates only during playback.
    pub fn should_animate_note(&self, color: &NoteColor, note_id: Option<&NoteId>) -> bool {
        let has_oscillator = self.vibrato.states.contains_key(color)
            || self.tremolo.states.contains_key(color);
        if !has_oscillator {
            return false;
        }
        if self.activity.dial_color() == Some(color) {
            return true;
        }
        match note_id {
            Some(id) => {
                self.activity.interacting_contains(id)
                    || (self.activity.playback_active() && self.activity.sounding_contains(id))
            }
            None => self.activity.playback_active() && self.activity.ghost_color() == Some(color),
        }
    }

    /// Colors with a vibrato oscillator installed.
    pub fn vibrato_colors(&self) -> Vec<NoteColor> {
        self.vibrato.sorted_colors()
    }

    /// Colors with a tremolo oscillator installed.
    pub fn tremolo_colors(&self) -> Vec<NoteColor> {
        self.tremolo.sorted_colors()
    }

    #[cfg(test)]
    pub(crate) fn vibrato_state(&self, color: &NoteColor) -> Option<&AnimationState> {
        self.vibrato.states.get(color)
    }

    #[cfg(test)]
    pub(crate) fn tremolo_state(&self, color: &NoteColor) -> Option<&AnimationState> {
        self.tremolo.states.get(color)
    }
}
