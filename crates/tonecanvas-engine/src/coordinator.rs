//! Front door wiring the engine's parts together.
//!
//! [`EffectsCoordinator`] owns one of everything: the parameter store,
//! the animation engine, the envelope model, the frame dispatcher, the
//! audio effect rack, and the per-color timbres with their synthesized
//! waveform buffers. The host forwards editor and transport events into
//! it, calls [`EffectsCoordinator::frame`] once per animation frame, and
//! subscribes to the [`EventHub`] for repaint and audio notifications.
//! Everything is single-threaded; per-frame queries like
//! [`EffectsCoordinator::vibrato_y_offset`] read state the preceding
//! `frame` call finished writing.

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use tonecanvas_timbre::{
    AdsrParams, EffectKind, EffectSet, EffectUpdate, FilterParams, HarmonicSpectrum,
    LegacyTimbreEffects, NoteColor, Timbre, TimbrePreset, TimbreResult,
};
use tracing::{debug, warn};

use crate::animation::{AnimationPhaseEngine, NoteId};
use crate::audio::{AudioBackend, EffectRack, NullBackend};
use crate::envelope::{clamp_sustain, envelope_peak, EnvelopeAmplitudeModel, FillPhase};
use crate::events::{EventHub, VisualEffectChange};
use crate::filter::overlay_curve;
use crate::paint::{PaintColumn, PitchRange, TimeMap};
use crate::store::EffectParameterStore;
use crate::sync::VisualSyncDispatcher;
use crate::waveform::{
    filtered_spectrum, synthesize, PhaseRange, PhaseTransition, WaveformBuffer, WAVEFORM_SAMPLES,
};

/// Tempo assumed until the host reports one.
pub const DEFAULT_TEMPO_BPM: f64 = 90.0;

/// Source of the engine's monotonic time in seconds.
///
/// The epoch is arbitrary; only differences matter. Implementations must
/// never run backwards within one coordinator's lifetime.
pub trait Clock: fmt::Debug {
    fn now_seconds(&self) -> f64;
}

/// Process-wide wall clock, the default for hosts that do not schedule
/// their own frames.
#[derive(Debug)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock advanced explicitly by the host.
///
/// Clones share the same underlying time, so an embedder keeps one clone
/// and feeds it the timestamps of its own frame scheduler while the
/// coordinator reads the other. Also the natural clock for tests.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to an absolute time.
    pub fn set(&self, now_seconds: f64) {
        self.now.set(now_seconds);
    }

    /// Moves the clock forward.
    pub fn advance(&self, delta_seconds: f64) {
        self.now.set(self.now.get() + delta_seconds);
    }
}

impl Clock for ManualClock {
    fn now_seconds(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug)]
struct ColorWaveform {
    /// Target buffer; during a transition the blend is derived from it.
    buffer: WaveformBuffer,
    transition: Option<PhaseTransition>,
}

/// Top-level engine facade. See the module docs for the frame protocol.
#[derive(Debug)]
pub struct EffectsCoordinator<B = NullBackend> {
    hub: EventHub,
    store: EffectParameterStore,
    animation: AnimationPhaseEngine,
    envelope: EnvelopeAmplitudeModel,
    dispatcher: VisualSyncDispatcher,
    rack: EffectRack<B>,
    clock: Box<dyn Clock>,
    timbres: HashMap<NoteColor, Timbre>,
    waveforms: HashMap<NoteColor, ColorWaveform>,
    phase_range: PhaseRange,
    columns: Vec<PaintColumn>,
    tempo: f64,
    time_map: Option<TimeMap>,
    pitch_view: Option<PitchRange>,
}

impl EffectsCoordinator<NullBackend> {
    /// Coordinator without an audio host, on the wall clock.
    pub fn new() -> Self {
        Self::with_backend(NullBackend)
    }
}

impl Default for EffectsCoordinator<NullBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: AudioBackend> EffectsCoordinator<B> {
    /// Coordinator on the wall clock.
    pub fn with_backend(backend: B) -> Self {
        Self::with_parts(backend, Box::new(WallClock::new()))
    }

    /// Coordinator on a host-supplied clock.
    pub fn with_clock(backend: B, clock: impl Clock + 'static) -> Self {
        Self::with_parts(backend, Box::new(clock))
    }

    fn with_parts(backend: B, clock: Box<dyn Clock>) -> Self {
        EffectsCoordinator {
            hub: EventHub::new(),
            store: EffectParameterStore::new(),
            animation: AnimationPhaseEngine::new(),
            envelope: EnvelopeAmplitudeModel::new(),
            dispatcher: VisualSyncDispatcher::new(),
            rack: EffectRack::new(backend),
            clock,
            timbres: HashMap::new(),
            waveforms: HashMap::new(),
            phase_range: PhaseRange::default(),
            columns: Vec::new(),
            tempo: DEFAULT_TEMPO_BPM,
            time_map: None,
            pitch_view: None,
        }
    }

    /// Notification channels for hosts to subscribe to.
    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// The wrapped audio backend.
    pub fn audio_backend(&self) -> &B {
        self.rack.backend()
    }

    /// Advances one animation frame.
    ///
    /// Phase accumulators move first, then envelope fills, then the
    /// dispatcher forwards whatever the tick produced. Completed phase
    /// transitions settle into their target buffers here.
    pub fn frame(&mut self) {
        let now = self.clock.now_seconds();
        for waveform in self.waveforms.values_mut() {
            if let Some(transition) = &waveform.transition {
                if transition.is_complete(now) {
                    waveform.transition = None;
                }
            }
        }
        let outcome = self.animation.tick(now);
        self.envelope.tick(now);
        self.dispatcher.dispatch(&outcome, &self.hub, now);
    }

    // ---- timbre and waveform ------------------------------------------

    /// Replaces a color's timbre, typically on document load.
    pub fn set_timbre(&mut self, color: &NoteColor, timbre: Timbre) {
        self.timbres.insert(color.clone(), timbre);
        self.resynthesize(color);
    }

    pub fn timbre(&self, color: &NoteColor) -> Option<&Timbre> {
        self.timbres.get(color)
    }

    /// Sets one harmonic slider. Leaves preset territory, so the active
    /// preset name is cleared.
    pub fn set_coeff(&mut self, color: &NoteColor, bin: usize, value: f64) {
        let timbre = self.timbres.entry(color.clone()).or_default();
        timbre.spectrum.set_coeff(bin, value);
        timbre.clear_preset();
        self.resynthesize(color);
    }

    /// Advances one bin's phase button and starts an animated morph from
    /// the currently displayed waveform to the new one. Out-of-range bins
    /// do nothing.
    pub fn cycle_bin_phase(&mut self, color: &NoteColor, bin: usize) {
        let now = self.clock.now_seconds();
        let from = self.waveform_at(color, now);
        let timbre = self.timbres.entry(color.clone()).or_default();
        if timbre.spectrum.cycle_phase(bin).is_none() {
            return;
        }
        timbre.clear_preset();
        let spectrum = filtered_spectrum(&timbre.spectrum, &timbre.filter);
        let to = synthesize(&spectrum, self.phase_range, WAVEFORM_SAMPLES);
        self.waveforms.insert(
            color.clone(),
            ColorWaveform {
                buffer: to.clone(),
                transition: Some(PhaseTransition::new(from, to, now)),
            },
        );
    }

    /// Applies a named preset to a color.
    ///
    /// # Errors
    ///
    /// Returns [`tonecanvas_timbre::TimbreError::UnknownPreset`] for a
    /// name outside the catalog; the timbre is untouched.
    pub fn apply_preset(&mut self, color: &NoteColor, name: &str) -> TimbreResult<()> {
        let preset = TimbrePreset::lookup(name)?;
        let timbre = self.timbres.entry(color.clone()).or_default();
        timbre.apply_preset(&preset);
        self.resynthesize(color);
        Ok(())
    }

    /// Replaces a color's filter settings and re-renders its waveform.
    pub fn set_filter(&mut self, color: &NoteColor, params: FilterParams) {
        self.timbres.entry(color.clone()).or_default().filter = params.clamped();
        self.resynthesize(color);
    }

    /// Filter response curve for drawing over the harmonic sliders, or
    /// `None` while the filter is bypassed.
    pub fn filter_overlay(&self, color: &NoteColor, resolution: usize) -> Option<Vec<f64>> {
        let timbre = self.timbres.get(color)?;
        overlay_curve(&timbre.filter, resolution)
    }

    /// Switches every color between the standard single-cycle view and
    /// the extended 1⅓-cycle view.
    pub fn set_extended_view(&mut self, extended: bool) {
        let range = if extended {
            PhaseRange::Extended
        } else {
            PhaseRange::Standard
        };
        if range == self.phase_range {
            return;
        }
        self.phase_range = range;
        let colors: Vec<NoteColor> = self.timbres.keys().cloned().collect();
        for color in colors {
            self.resynthesize(&color);
        }
    }

    pub fn phase_range(&self) -> PhaseRange {
        self.phase_range
    }

    /// The waveform to draw for a color right now, mid-transition blends
    /// included. Colors never configured render the default sine.
    pub fn waveform(&self, color: &NoteColor) -> WaveformBuffer {
        self.waveform_at(color, self.clock.now_seconds())
    }

    fn waveform_at(&self, color: &NoteColor, now: f64) -> WaveformBuffer {
        match self.waveforms.get(color) {
            Some(entry) => match &entry.transition {
                Some(transition) => transition.buffer_at(now),
                None => entry.buffer.clone(),
            },
            None => synthesize(&HarmonicSpectrum::sine(), self.phase_range, WAVEFORM_SAMPLES),
        }
    }

    fn resynthesize(&mut self, color: &NoteColor) {
        let timbre = self.timbres.entry(color.clone()).or_default();
        let spectrum = filtered_spectrum(&timbre.spectrum, &timbre.filter);
        let buffer = synthesize(&spectrum, self.phase_range, WAVEFORM_SAMPLES);
        self.waveforms.insert(
            color.clone(),
            ColorWaveform {
                buffer,
                transition: None,
            },
        );
    }

    fn original_amplitude(&self, color: &NoteColor) -> f64 {
        self.waveforms
            .get(color)
            .map(|entry| entry.buffer.calculated_amplitude)
            .unwrap_or(1.0)
    }

    // ---- effect parameters --------------------------------------------

    /// Seeds a color's effects from the historical per-timbre fields.
    pub fn register_legacy(&mut self, color: NoteColor, legacy: LegacyTimbreEffects) {
        self.store.register_legacy(color, legacy);
    }

    /// Current snapshot of all four effects for a color.
    pub fn effects(&mut self, color: &NoteColor) -> EffectSet {
        self.store.effects(color)
    }

    /// Applies one dial change: updates the store, notifies hub
    /// subscribers, and routes the new snapshot to the audio rack and,
    /// for the modulation effects, the animation engine.
    pub fn update_effect(&mut self, color: &NoteColor, update: EffectUpdate) {
        let kind = update.kind();
        self.store.update(color, update, &self.hub);
        self.route_effect(color, kind);
    }

    /// Pushes a color's stored parameters through the audio and
    /// animation paths without changing them. Called after loading a
    /// document so persisted effects come up live.
    pub fn refresh_effects(&mut self, color: &NoteColor) {
        for kind in EffectKind::ALL {
            self.route_effect(color, kind);
        }
    }

    fn route_effect(&mut self, color: &NoteColor, kind: EffectKind) {
        let params = self.store.params(color, kind);
        self.rack.apply(color, &params);
        if kind.is_modulation() {
            let now = self.clock.now_seconds();
            self.animation.apply_visual_change(
                &VisualEffectChange {
                    color: color.clone(),
                    params,
                },
                now,
            );
        }
    }

    /// Whether a backend node currently exists for this color and effect.
    pub fn has_audio_node(&self, color: &NoteColor, kind: EffectKind) -> bool {
        self.rack.has_node(color, kind)
    }

    // ---- notes and transport ------------------------------------------

    /// A voice started sounding this note.
    pub fn note_attack(&mut self, id: NoteId, color: NoteColor) {
        let now = self.clock.now_seconds();
        let adsr = self
            .timbres
            .get(&color)
            .map(|timbre| timbre.adsr)
            .unwrap_or_default();
        self.animation.activity_mut().note_attack(id.clone(), color.clone());
        self.envelope.note_attack(id, color, adsr, now);
    }

    /// The note's voice was released.
    pub fn note_release(&mut self, id: &NoteId) {
        let now = self.clock.now_seconds();
        self.animation.activity_mut().note_release(id);
        self.envelope.note_release(id, now);
    }

    /// The user grabbed a note on the grid.
    pub fn interaction_start(&mut self, id: NoteId, color: NoteColor) {
        self.animation.activity_mut().interaction_start(id, color);
    }

    pub fn interaction_end(&mut self, id: &NoteId) {
        self.animation.activity_mut().interaction_end(id);
    }

    /// The placement preview moved, possibly changing color.
    pub fn ghost_note_updated(&mut self, color: NoteColor) {
        self.animation.activity_mut().ghost_update(color);
    }

    pub fn ghost_note_cleared(&mut self) {
        self.animation.activity_mut().ghost_clear();
    }

    /// The user grabbed an effect dial, previewing that color's effects.
    pub fn dial_interaction_start(&mut self, color: NoteColor) {
        self.animation.activity_mut().dial_start(color);
    }

    pub fn dial_interaction_end(&mut self) {
        self.animation.activity_mut().dial_end();
    }

    /// Transport state from the host sequencer. A stop (not a pause)
    /// clears all envelope fills; the animation channels emit their own
    /// reset frames on the next tick.
    pub fn playback_state_changed(&mut self, is_playing: bool, is_paused: bool) {
        self.animation
            .activity_mut()
            .set_playback(is_playing && !is_paused);
        if !is_playing {
            self.envelope.clear();
        }
    }

    /// Spacebar audition of the selected color outside transport
    /// playback.
    pub fn spacebar_playback(&mut self, color: NoteColor, is_playing: bool) {
        self.animation
            .activity_mut()
            .set_audition(is_playing.then_some(color));
    }

    // ---- per-frame queries --------------------------------------------

    /// Vertical pitch offset for drawing a color's notes, in semitones.
    pub fn vibrato_y_offset(&self, color: &NoteColor) -> f64 {
        self.animation.vibrato_y_offset(color)
    }

    /// Brightness multiplier for drawing a color's waveform and fills.
    pub fn tremolo_multiplier(&self, color: &NoteColor) -> f64 {
        self.animation
            .tremolo_multiplier(color, self.original_amplitude(color))
    }

    /// Whether a color's display peak is oscillating right now.
    pub fn tremolo_engaged(&self, color: &NoteColor) -> bool {
        self.animation.tremolo_engaged(color)
    }

    /// Whether a note (or the ghost preview, with `None`) should wobble.
    pub fn should_animate_note(&self, color: &NoteColor, note_id: Option<&NoteId>) -> bool {
        self.animation.should_animate_note(color, note_id)
    }

    /// Envelope fill height for a sounding note, if it has one.
    pub fn envelope_fill_level(&self, id: &NoteId) -> Option<f64> {
        self.envelope.fill_level(id)
    }

    pub fn envelope_fill_phase(&self, id: &NoteId) -> Option<FillPhase> {
        self.envelope.fill_phase(id)
    }

    // ---- envelope editing ---------------------------------------------

    /// Display ceiling for the sustain handle: the synthesized peak,
    /// scaled by the live tremolo multiplier while tremolo is engaged.
    pub fn sustain_ceiling(&self, color: &NoteColor) -> f64 {
        let amplitude = self.original_amplitude(color);
        let multiplier = self.animation.tremolo_multiplier(color, amplitude);
        envelope_peak(amplitude, multiplier, self.animation.tremolo_engaged(color))
    }

    /// Stores a sustain level, clamped to the current ceiling, and
    /// returns what was actually stored.
    pub fn set_sustain(&mut self, color: &NoteColor, requested: f64) -> f64 {
        let ceiling = self.sustain_ceiling(color);
        let (applied, was_clamped) = clamp_sustain(requested, ceiling);
        if was_clamped {
            debug!(
                color = %color,
                requested,
                applied,
                "clamping sustain to the amplitude ceiling"
            );
        }
        self.timbres.entry(color.clone()).or_default().adsr.sustain = applied;
        applied
    }

    /// Replaces a color's envelope wholesale.
    pub fn set_adsr(&mut self, color: &NoteColor, adsr: AdsrParams) {
        self.timbres.entry(color.clone()).or_default().adsr = adsr;
    }

    /// Derives an envelope from dragged marker positions. Bad geometry
    /// is rejected, keeping the previous envelope; returns whether the
    /// update was applied.
    pub fn set_adsr_from_absolute_times(
        &mut self,
        color: &NoteColor,
        attack_end: f64,
        decay_end: f64,
        release_end: f64,
        sustain: f64,
    ) -> bool {
        match AdsrParams::from_absolute_times(attack_end, decay_end, release_end, sustain) {
            Ok(adsr) => {
                self.timbres.entry(color.clone()).or_default().adsr = adsr;
                true
            }
            Err(error) => {
                warn!(color = %color, %error, "ignoring envelope drag with bad geometry");
                false
            }
        }
    }

    // ---- paint geometry -----------------------------------------------

    /// Replaces the column layout the paint trail is drawn against.
    pub fn set_paint_columns(&mut self, columns: Vec<PaintColumn>) {
        self.columns = columns;
        self.time_map = None;
    }

    /// Records a tempo change; the time map is rebuilt lazily on the
    /// next lookup.
    pub fn tempo_changed(&mut self, tempo: f64) {
        self.tempo = tempo;
    }

    /// Playhead pixel position for a musical time, or `None` past the
    /// end of the grid.
    pub fn time_to_x(&mut self, time: f64) -> Option<f64> {
        let stale = match &self.time_map {
            Some(map) => map.is_stale(self.tempo),
            None => true,
        };
        if stale {
            self.time_map = Some(TimeMap::build(self.tempo, &self.columns));
        }
        self.time_map.as_ref().and_then(|map| map.time_to_x(time))
    }

    /// Sets the visible MIDI bounds used to place detected pitches.
    pub fn set_pitch_view(&mut self, range: PitchRange) {
        self.pitch_view = Some(range);
    }

    /// Canvas Y for a detected pitch, or `None` when it should not be
    /// drawn. Always `None` until a pitch view is set.
    pub fn midi_to_y(&self, midi: f64, canvas_height: f64) -> Option<f64> {
        self.pitch_view
            .and_then(|range| range.midi_to_y(midi, canvas_height))
    }
}
