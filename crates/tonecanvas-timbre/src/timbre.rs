//! The per-color timbre aggregate.

use serde::{Deserialize, Serialize};

use crate::adsr::AdsrParams;
use crate::filter::FilterParams;
use crate::harmonics::HarmonicSpectrum;
use crate::preset::TimbrePreset;

/// Complete sound definition for one note color.
///
/// The spectrum is flattened during serialization so saved documents keep
/// `coeffs` and `phases` at the top level of each timbre object, matching
/// the historical document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timbre {
    /// Harmonic content.
    #[serde(flatten)]
    pub spectrum: HarmonicSpectrum,
    /// Envelope shape.
    #[serde(default)]
    pub adsr: AdsrParams,
    /// Filter settings.
    #[serde(default)]
    pub filter: FilterParams,
    /// Name of the preset this timbre was last set from. `None` once any
    /// bin or envelope value is edited away from the preset.
    #[serde(
        rename = "activePresetName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub active_preset: Option<String>,
}

impl Default for Timbre {
    fn default() -> Self {
        Timbre {
            spectrum: HarmonicSpectrum::sine(),
            adsr: AdsrParams::default(),
            filter: FilterParams::default(),
            active_preset: Some("sine".to_owned()),
        }
    }
}

impl Timbre {
    /// Replaces the spectrum and envelope from a preset.
    ///
    /// The filter resets to its defaults so an instrument preset always
    /// sounds the same regardless of what was dialed in before.
    pub fn apply_preset(&mut self, preset: &TimbrePreset) {
        self.spectrum = preset.spectrum.clone();
        self.adsr = preset.adsr;
        self.filter = FilterParams::default();
        self.active_preset = Some(preset.name.to_owned());
    }

    /// Marks the timbre as hand-edited.
    ///
    /// Call after any direct bin or envelope change so the UI stops
    /// highlighting a preset the sound no longer matches.
    pub fn clear_preset(&mut self) {
        self.active_preset = None;
    }
}
