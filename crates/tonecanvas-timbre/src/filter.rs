//! Parametric filter settings.
//!
//! The filter is described by a blend position that morphs the response
//! continuously from highpass through bandpass to lowpass, a cutoff along
//! the harmonic axis, a resonance peak amount, and a dry/wet mix. The
//! shape math itself lives in the engine; this module only owns the
//! parameter data and its derived display mode.

use serde::{Deserialize, Serialize};

/// Filter response family implied by the blend position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Blend at or below 0.
    Highpass,
    /// Blend strictly between 0 and 2.
    Bandpass,
    /// Blend at or above 2.
    Lowpass,
}

/// Parametric filter settings for one timbre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Whether the filter participates in synthesis at all.
    #[serde(default)]
    pub enabled: bool,
    /// Response morph position in [0, 2]: highpass(0) → bandpass(1) → lowpass(2).
    #[serde(default = "default_blend")]
    pub blend: f64,
    /// Cutoff position along the harmonic axis, in [1, 31].
    #[serde(default = "default_cutoff")]
    pub cutoff: f64,
    /// Resonance peak amount in [0, 100].
    #[serde(default)]
    pub resonance: f64,
    /// Dry/wet mix percentage in [0, 100]; 0 leaves the signal untouched.
    #[serde(default)]
    pub mix: f64,
}

fn default_blend() -> f64 {
    2.0
}
fn default_cutoff() -> f64 {
    16.0
}

impl Default for FilterParams {
    fn default() -> Self {
        FilterParams {
            enabled: false,
            blend: default_blend(),
            cutoff: default_cutoff(),
            resonance: 0.0,
            mix: 0.0,
        }
    }
}

impl FilterParams {
    /// Returns the settings with every field clamped into its range.
    pub fn clamped(mut self) -> Self {
        self.blend = self.blend.clamp(0.0, 2.0);
        self.cutoff = self.cutoff.clamp(1.0, 31.0);
        self.resonance = self.resonance.clamp(0.0, 100.0);
        self.mix = self.mix.clamp(0.0, 100.0);
        self
    }

    /// Filter family shown in the UI and persisted for display purposes.
    pub fn mode(&self) -> FilterMode {
        if self.blend <= 0.0 {
            FilterMode::Highpass
        } else if self.blend >= 2.0 {
            FilterMode::Lowpass
        } else {
            FilterMode::Bandpass
        }
    }

    /// Whether the filter currently alters the signal at all.
    pub fn is_bypassed(&self) -> bool {
        !self.enabled || self.mix <= 0.0
    }
}
