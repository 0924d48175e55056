//! Per-color audio effect parameter types.
//!
//! Each note color carries an independent parameter set for each of the
//! four effect types. All user-facing values are percentages; the engine
//! translates them into audio units (Hz, seconds, wet fractions) when an
//! effect is actually applied. The effect set is a closed enum: there is
//! no string-keyed dispatch anywhere in the pipeline.

use serde::{Deserialize, Serialize};

/// The four user-facing effect types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Pitch oscillation.
    Vibrato,
    /// Amplitude oscillation.
    Tremolo,
    /// Reverberant tail.
    Reverb,
    /// Feedback echo.
    Delay,
}

impl EffectKind {
    /// All kinds, in the order they appear in the effects panel.
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Vibrato,
        EffectKind::Tremolo,
        EffectKind::Reverb,
        EffectKind::Delay,
    ];

    /// Whether this kind drives a visual modulation (vibrato/tremolo).
    ///
    /// Modulation kinds fan out to the animation engine in addition to the
    /// audio path; reverb and delay are audio-only.
    pub fn is_modulation(self) -> bool {
        matches!(self, EffectKind::Vibrato | EffectKind::Tremolo)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EffectKind::Vibrato => "vibrato",
            EffectKind::Tremolo => "tremolo",
            EffectKind::Reverb => "reverb",
            EffectKind::Delay => "delay",
        };
        f.write_str(name)
    }
}

/// Vibrato parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct VibratoParams {
    /// Oscillation speed percentage [0, 100], mapping to 0–16 Hz.
    #[serde(default)]
    pub speed: f64,
    /// Pitch depth percentage [0, 100], mapping to 0–50 cents in audio and
    /// up to half a semitone of visual offset.
    #[serde(default)]
    pub span: f64,
}

impl VibratoParams {
    /// A zero speed or span disables the effect entirely.
    pub fn is_disabled(&self) -> bool {
        self.speed <= 0.0 || self.span <= 0.0
    }

    /// Sets one field, clamped into [0, 100].
    pub fn set(&mut self, field: ModulationField, value: f64) {
        match field {
            ModulationField::Speed => self.speed = value.clamp(0.0, 100.0),
            ModulationField::Span => self.span = value.clamp(0.0, 100.0),
        }
    }
}

/// Tremolo parameters.
///
/// Span here sets the oscillation floor, not a symmetric depth: the
/// amplitude multiplier swings between `span%` of full amplitude and
/// 100%, so larger spans mean *shallower* dips. This intentionally
/// differs from the vibrato span semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TremoloParams {
    /// Oscillation speed percentage [0, 100], mapping to 0–16 Hz.
    #[serde(default)]
    pub speed: f64,
    /// Floor percentage [0, 100] the amplitude oscillates down to.
    #[serde(default)]
    pub span: f64,
}

impl TremoloParams {
    /// A zero speed or span disables the effect entirely.
    pub fn is_disabled(&self) -> bool {
        self.speed <= 0.0 || self.span <= 0.0
    }

    /// Sets one field, clamped into [0, 100].
    pub fn set(&mut self, field: ModulationField, value: f64) {
        match field {
            ModulationField::Speed => self.speed = value.clamp(0.0, 100.0),
            ModulationField::Span => self.span = value.clamp(0.0, 100.0),
        }
    }
}

/// Reverb parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverbParams {
    /// Tail length percentage [0, 100], mapping to 0.1–8 s.
    #[serde(default)]
    pub decay: f64,
    /// Room size percentage [0, 100], extending the tail up to +150%.
    #[serde(default)]
    pub room_size: f64,
    /// Wet mix percentage [0, 100].
    #[serde(default = "default_reverb_wet")]
    pub wet: f64,
}

fn default_reverb_wet() -> f64 {
    10.0
}

impl Default for ReverbParams {
    fn default() -> Self {
        ReverbParams {
            decay: 0.0,
            room_size: 0.0,
            wet: default_reverb_wet(),
        }
    }
}

impl ReverbParams {
    /// Disabled while both primary parameters sit at zero.
    pub fn is_disabled(&self) -> bool {
        self.decay <= 0.0 && self.room_size <= 0.0
    }

    /// Sets one field, clamped into [0, 100].
    pub fn set(&mut self, field: ReverbField, value: f64) {
        match field {
            ReverbField::Decay => self.decay = value.clamp(0.0, 100.0),
            ReverbField::RoomSize => self.room_size = value.clamp(0.0, 100.0),
            ReverbField::Wet => self.wet = value.clamp(0.0, 100.0),
        }
    }
}

/// Delay parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayParams {
    /// Delay time percentage [0, 100], mapping to 0.01–0.5 s.
    #[serde(default)]
    pub time: f64,
    /// Feedback percentage [0, 95].
    #[serde(default)]
    pub feedback: f64,
    /// Wet mix percentage [0, 100].
    #[serde(default = "default_delay_wet")]
    pub wet: f64,
}

fn default_delay_wet() -> f64 {
    15.0
}

impl Default for DelayParams {
    fn default() -> Self {
        DelayParams {
            time: 0.0,
            feedback: 0.0,
            wet: default_delay_wet(),
        }
    }
}

impl DelayParams {
    /// Disabled while both primary parameters sit at zero.
    pub fn is_disabled(&self) -> bool {
        self.time <= 0.0 && self.feedback <= 0.0
    }

    /// Sets one field, clamped into its range.
    pub fn set(&mut self, field: DelayField, value: f64) {
        match field {
            DelayField::Time => self.time = value.clamp(0.0, 100.0),
            DelayField::Feedback => self.feedback = value.clamp(0.0, 95.0),
            DelayField::Wet => self.wet = value.clamp(0.0, 100.0),
        }
    }
}

/// Addressable field of the two modulation effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModulationField {
    /// Oscillation speed.
    Speed,
    /// Modulation depth (see the per-effect span semantics).
    Span,
}

/// Addressable field of the reverb effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReverbField {
    /// Tail length.
    Decay,
    /// Room size.
    RoomSize,
    /// Wet mix.
    Wet,
}

/// Addressable field of the delay effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DelayField {
    /// Delay time.
    Time,
    /// Feedback amount.
    Feedback,
    /// Wet mix.
    Wet,
}

/// A single-field update routed through the effect registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectUpdate {
    /// Update one vibrato field.
    Vibrato {
        /// Which field changes.
        field: ModulationField,
        /// New percentage value.
        value: f64,
    },
    /// Update one tremolo field.
    Tremolo {
        /// Which field changes.
        field: ModulationField,
        /// New percentage value.
        value: f64,
    },
    /// Update one reverb field.
    Reverb {
        /// Which field changes.
        field: ReverbField,
        /// New percentage value.
        value: f64,
    },
    /// Update one delay field.
    Delay {
        /// Which field changes.
        field: DelayField,
        /// New percentage value.
        value: f64,
    },
}

impl EffectUpdate {
    /// The effect type this update addresses.
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectUpdate::Vibrato { .. } => EffectKind::Vibrato,
            EffectUpdate::Tremolo { .. } => EffectKind::Tremolo,
            EffectUpdate::Reverb { .. } => EffectKind::Reverb,
            EffectUpdate::Delay { .. } => EffectKind::Delay,
        }
    }
}

/// Full parameter snapshot for one effect type.
///
/// Notifications always carry one of these rather than a single changed
/// field, so consumers never observe partial state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectParams {
    /// Vibrato snapshot.
    Vibrato(VibratoParams),
    /// Tremolo snapshot.
    Tremolo(TremoloParams),
    /// Reverb snapshot.
    Reverb(ReverbParams),
    /// Delay snapshot.
    Delay(DelayParams),
}

impl EffectParams {
    /// The effect type of this snapshot.
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectParams::Vibrato(_) => EffectKind::Vibrato,
            EffectParams::Tremolo(_) => EffectKind::Tremolo,
            EffectParams::Reverb(_) => EffectKind::Reverb,
            EffectParams::Delay(_) => EffectKind::Delay,
        }
    }

    /// Whether the snapshot describes a disabled effect.
    pub fn is_disabled(&self) -> bool {
        match self {
            EffectParams::Vibrato(p) => p.is_disabled(),
            EffectParams::Tremolo(p) => p.is_disabled(),
            EffectParams::Reverb(p) => p.is_disabled(),
            EffectParams::Delay(p) => p.is_disabled(),
        }
    }
}

/// All four effect parameter sets for one color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EffectSet {
    /// Vibrato parameters.
    #[serde(default)]
    pub vibrato: VibratoParams,
    /// Tremolo parameters.
    #[serde(default)]
    pub tremolo: TremoloParams,
    /// Reverb parameters.
    #[serde(default)]
    pub reverb: ReverbParams,
    /// Delay parameters.
    #[serde(default)]
    pub delay: DelayParams,
}

impl EffectSet {
    /// Snapshot of one effect's full parameters.
    pub fn params(&self, kind: EffectKind) -> EffectParams {
        match kind {
            EffectKind::Vibrato => EffectParams::Vibrato(self.vibrato),
            EffectKind::Tremolo => EffectParams::Tremolo(self.tremolo),
            EffectKind::Reverb => EffectParams::Reverb(self.reverb),
            EffectKind::Delay => EffectParams::Delay(self.delay),
        }
    }

    /// Applies one field update, clamping the value into range.
    pub fn apply(&mut self, update: EffectUpdate) {
        match update {
            EffectUpdate::Vibrato { field, value } => self.vibrato.set(field, value),
            EffectUpdate::Tremolo { field, value } => self.tremolo.set(field, value),
            EffectUpdate::Reverb { field, value } => self.reverb.set(field, value),
            EffectUpdate::Delay { field, value } => self.delay.set(field, value),
        }
    }
}

/// Legacy per-timbre effect fields from old saved documents.
///
/// Before the effect registry existed, vibrato and tremolo lived on the
/// timbre itself, and tremolo was persisted under the historical spelling
/// `tremelo`. The registry migrates these on first touch of a color and
/// mirrors updates back in the same shape so old readers keep working.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LegacyTimbreEffects {
    /// Legacy vibrato field.
    #[serde(default)]
    pub vibrato: VibratoParams,
    /// Legacy tremolo field, persisted as "tremelo".
    #[serde(default, rename = "tremelo", alias = "tremolo")]
    pub tremolo: TremoloParams,
}
