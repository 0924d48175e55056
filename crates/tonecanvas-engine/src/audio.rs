//! Translation of percentage parameters into audio units, and the
//! lifecycle of per-color audio effect nodes.
//!
//! The engine itself never talks to an audio device. It translates dial
//! percentages into concrete units (Hz, cents, seconds, wet fractions)
//! and drives an [`AudioBackend`] implementation supplied by the host.
//! Node lifecycle is lazy: a node exists only while its effect is
//! audible, is updated in place while it lives, and is disposed the
//! moment its parameters fall silent.

use std::collections::HashSet;

use tonecanvas_timbre::{
    DelayParams, EffectKind, EffectParams, NoteColor, ReverbParams, TremoloParams, VibratoParams,
};
use tracing::debug;

/// Modulation rate at a speed dial of 100.
pub const MAX_MODULATION_RATE_HZ: f64 = 16.0;

/// Vibrato pitch depth at a span dial of 100.
pub const MAX_VIBRATO_DEPTH_CENTS: f64 = 50.0;

/// Maps a speed percentage to an oscillation rate.
pub fn speed_to_frequency_hz(speed: f64) -> f64 {
    (speed / 100.0) * MAX_MODULATION_RATE_HZ
}

/// Vibrato LFO settings in audio units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VibratoSettings {
    /// Oscillation rate in Hz.
    pub frequency_hz: f64,
    /// Pitch depth in cents.
    pub depth_cents: f64,
}

/// Tremolo LFO settings in audio units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TremoloSettings {
    /// Oscillation rate in Hz.
    pub frequency_hz: f64,
    /// Amplitude depth in [0, 1].
    pub depth: f64,
}

/// Reverb node settings in audio units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbSettings {
    /// Tail length in seconds.
    pub decay_seconds: f64,
    /// Wet mix in [0, 1].
    pub wet: f64,
}

/// Delay node settings in audio units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySettings {
    /// Echo spacing in seconds.
    pub delay_seconds: f64,
    /// Feedback in [0, 0.95].
    pub feedback: f64,
    /// Wet mix in [0, 1].
    pub wet: f64,
}

/// Translates vibrato percentages. `None` while the effect is disabled.
pub fn vibrato_settings(params: &VibratoParams) -> Option<VibratoSettings> {
    if params.is_disabled() {
        return None;
    }
    Some(VibratoSettings {
        frequency_hz: speed_to_frequency_hz(params.speed),
        depth_cents: params.span / 100.0 * MAX_VIBRATO_DEPTH_CENTS,
    })
}

/// Translates tremolo percentages. `None` while the effect is disabled.
pub fn tremolo_settings(params: &TremoloParams) -> Option<TremoloSettings> {
    if params.is_disabled() {
        return None;
    }
    Some(TremoloSettings {
        frequency_hz: speed_to_frequency_hz(params.speed),
        depth: params.span / 100.0,
    })
}

/// Translates reverb percentages. `None` while the effect is disabled.
///
/// Decay maps to 0.1 through 8 seconds; room size stretches the tail by
/// up to another 150%.
pub fn reverb_settings(params: &ReverbParams) -> Option<ReverbSettings> {
    if params.is_disabled() {
        return None;
    }
    let base_decay = ((params.decay / 100.0) * 8.0).max(0.1);
    let room_multiplier = 1.0 + (params.room_size / 100.0) * 1.5;
    Some(ReverbSettings {
        decay_seconds: base_decay * room_multiplier,
        wet: params.wet / 100.0,
    })
}

/// Translates delay percentages. `None` while the effect is disabled.
///
/// Time maps to 0.01 through 0.5 seconds; the floor keeps a near-zero
/// dial from degenerating into a comb filter. Feedback is capped below
/// unity so the echo tail always dies out.
pub fn delay_settings(params: &DelayParams) -> Option<DelaySettings> {
    if params.is_disabled() {
        return None;
    }
    Some(DelaySettings {
        delay_seconds: ((params.time / 100.0) * 0.5).max(0.01),
        feedback: (params.feedback / 100.0).min(0.95),
        wet: params.wet / 100.0,
    })
}

/// Settings for one of the node-based effects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeSettings {
    /// A reverb node.
    Reverb(ReverbSettings),
    /// A delay node.
    Delay(DelaySettings),
}

impl NodeSettings {
    /// Which effect type this node belongs to.
    pub fn kind(&self) -> EffectKind {
        match self {
            NodeSettings::Reverb(_) => EffectKind::Reverb,
            NodeSettings::Delay(_) => EffectKind::Delay,
        }
    }
}

/// Host-side audio integration point.
///
/// The engine calls these with already-translated units. Implementations
/// may assume `update_node` is only called for nodes they were asked to
/// create and have not yet been asked to dispose.
pub trait AudioBackend {
    /// Applies or removes a color's vibrato LFO.
    fn set_vibrato(&mut self, color: &NoteColor, settings: Option<&VibratoSettings>);
    /// Applies or removes a color's tremolo LFO.
    fn set_tremolo(&mut self, color: &NoteColor, settings: Option<&TremoloSettings>);
    /// Builds a new effect node for a color.
    fn create_node(&mut self, color: &NoteColor, settings: &NodeSettings);
    /// Retunes an existing effect node in place.
    fn update_node(&mut self, color: &NoteColor, settings: &NodeSettings);
    /// Tears down a color's effect node.
    fn dispose_node(&mut self, color: &NoteColor, kind: EffectKind);
}

/// Backend that discards everything. Used headless and in tests of code
/// that does not care about audio calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn set_vibrato(&mut self, _color: &NoteColor, _settings: Option<&VibratoSettings>) {}
    fn set_tremolo(&mut self, _color: &NoteColor, _settings: Option<&TremoloSettings>) {}
    fn create_node(&mut self, _color: &NoteColor, _settings: &NodeSettings) {}
    fn update_node(&mut self, _color: &NoteColor, _settings: &NodeSettings) {}
    fn dispose_node(&mut self, _color: &NoteColor, _kind: EffectKind) {}
}

/// Tracks which per-color nodes exist and keeps the backend in sync with
/// effect parameter state.
#[derive(Debug)]
pub struct EffectRack<B> {
    backend: B,
    nodes: HashSet<(NoteColor, EffectKind)>,
}

impl<B: AudioBackend> EffectRack<B> {
    /// Wraps a backend with empty node state.
    pub fn new(backend: B) -> Self {
        EffectRack {
            backend,
            nodes: HashSet::new(),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Routes a parameter snapshot to the audio path.
    ///
    /// Modulation effects always forward (as `None` when disabled); the
    /// node effects additionally require an audible configuration before
    /// a node is created, so a reverb with zero wet or a delay with zero
    /// time never allocates one.
    pub fn apply(&mut self, color: &NoteColor, params: &EffectParams) {
        match params {
            EffectParams::Vibrato(p) => {
                let settings = vibrato_settings(p);
                self.backend.set_vibrato(color, settings.as_ref());
            }
            EffectParams::Tremolo(p) => {
                let settings = tremolo_settings(p);
                self.backend.set_tremolo(color, settings.as_ref());
            }
            EffectParams::Reverb(p) => {
                let settings = reverb_settings(p)
                    .filter(|s| s.wet > 0.0)
                    .map(NodeSettings::Reverb);
                self.sync_node(color, EffectKind::Reverb, settings);
            }
            EffectParams::Delay(p) => {
                let settings = delay_settings(p)
                    .filter(|s| p.time > 0.0 && s.wet > 0.0)
                    .map(NodeSettings::Delay);
                self.sync_node(color, EffectKind::Delay, settings);
            }
        }
    }

    fn sync_node(&mut self, color: &NoteColor, kind: EffectKind, settings: Option<NodeSettings>) {
        let key = (color.clone(), kind);
        match settings {
            Some(settings) => {
                if self.nodes.contains(&key) {
                    self.backend.update_node(color, &settings);
                } else {
                    debug!(color = %color, effect = %kind, "creating audio effect node");
                    self.backend.create_node(color, &settings);
                    self.nodes.insert(key);
                }
            }
            None => {
                // Disabling an effect that has no node is a no-op, so a
                // repeated disable never reaches the backend.
                if self.nodes.remove(&key) {
                    debug!(color = %color, effect = %kind, "disposing audio effect node");
                    self.backend.dispose_node(color, kind);
                }
            }
        }
    }

    /// Whether a node currently exists for this color and effect.
    pub fn has_node(&self, color: &NoteColor, kind: EffectKind) -> bool {
        self.nodes.contains(&(color.clone(), kind))
    }
}
