//! Built-in timbre presets.
//!
//! Four basic waveforms plus four instrument-flavored presets. Each preset
//! is a harmonic spectrum paired with an ADSR envelope; applying one
//! replaces both on the target timbre.

use std::f64::consts::PI;

use crate::adsr::AdsrParams;
use crate::error::{TimbreError, TimbreResult};
use crate::harmonics::HarmonicSpectrum;
use crate::HARMONIC_BINS;

/// A named spectrum/envelope pair selectable from the preset strip.
#[derive(Debug, Clone, PartialEq)]
pub struct TimbrePreset {
    /// Stable preset identifier.
    pub name: &'static str,
    /// Harmonic content.
    pub spectrum: HarmonicSpectrum,
    /// Envelope shape.
    pub adsr: AdsrParams,
}

fn square_spectrum() -> HarmonicSpectrum {
    let mut coeffs = [0.0; HARMONIC_BINS];
    for bin in (0..HARMONIC_BINS).step_by(2) {
        let n = (bin + 1) as f64;
        coeffs[bin] = 1.0 / n;
    }
    HarmonicSpectrum::from_coeffs(coeffs)
}

fn sawtooth_spectrum() -> HarmonicSpectrum {
    let mut coeffs = [0.0; HARMONIC_BINS];
    for (bin, slot) in coeffs.iter_mut().enumerate() {
        *slot = 1.0 / (bin + 1) as f64;
    }
    HarmonicSpectrum::from_coeffs(coeffs)
}

fn triangle_spectrum() -> HarmonicSpectrum {
    let mut spectrum = HarmonicSpectrum::from_coeffs([0.0; HARMONIC_BINS]);
    for bin in (0..HARMONIC_BINS).step_by(2) {
        let n = bin + 1;
        spectrum.coeffs[bin] = 1.0 / (n * n) as f64;
        // The triangle series alternates harmonic sign. Coefficients are
        // magnitudes here, so a negative term becomes a half-turn phase.
        if (n - 1) / 2 % 2 == 1 {
            spectrum.phases[bin] = PI;
        }
    }
    spectrum
}

fn piano_spectrum() -> HarmonicSpectrum {
    let mut coeffs = [0.0; HARMONIC_BINS];
    for (bin, slot) in coeffs.iter_mut().enumerate() {
        let n = (bin + 1) as f64;
        *slot = (1.0 / (n * n)) * 0.85f64.powf(n);
    }
    HarmonicSpectrum::from_coeffs(coeffs)
}

fn marimba_spectrum() -> HarmonicSpectrum {
    let mut coeffs = [0.0; HARMONIC_BINS];
    coeffs[0] = 1.0;
    coeffs[3] = 0.5;
    coeffs[8] = 0.2;
    HarmonicSpectrum::from_coeffs(coeffs)
}

impl TimbrePreset {
    /// Pure fundamental.
    pub fn sine() -> Self {
        TimbrePreset {
            name: "sine",
            spectrum: HarmonicSpectrum::sine(),
            adsr: AdsrParams::default(),
        }
    }

    /// Odd harmonics at 1/n² with alternating sign.
    pub fn triangle() -> Self {
        TimbrePreset {
            name: "triangle",
            spectrum: triangle_spectrum(),
            adsr: AdsrParams::default(),
        }
    }

    /// Odd harmonics at 1/n.
    pub fn square() -> Self {
        TimbrePreset {
            name: "square",
            spectrum: square_spectrum(),
            adsr: AdsrParams::default(),
        }
    }

    /// All harmonics at 1/n.
    pub fn sawtooth() -> Self {
        TimbrePreset {
            name: "sawtooth",
            spectrum: sawtooth_spectrum(),
            adsr: AdsrParams::default(),
        }
    }

    /// Fast-decaying spectrum with a percussive envelope.
    pub fn piano() -> Self {
        TimbrePreset {
            name: "piano",
            spectrum: piano_spectrum(),
            adsr: AdsrParams::new(0.01, 0.8, 0.1, 1.0),
        }
    }

    /// Saw-like spectrum with a slow bowed envelope.
    pub fn strings() -> Self {
        TimbrePreset {
            name: "strings",
            spectrum: sawtooth_spectrum(),
            adsr: AdsrParams::new(0.4, 0.1, 0.9, 0.5),
        }
    }

    /// Square-like spectrum with a breath-shaped envelope.
    pub fn woodwind() -> Self {
        TimbrePreset {
            name: "woodwind",
            spectrum: square_spectrum(),
            adsr: AdsrParams::new(0.1, 0.2, 0.8, 0.3),
        }
    }

    /// Sparse inharmonic-feel spectrum with no sustain.
    pub fn marimba() -> Self {
        TimbrePreset {
            name: "marimba",
            spectrum: marimba_spectrum(),
            adsr: AdsrParams::new(0.01, 0.8, 0.0, 0.8),
        }
    }

    /// Resolves a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`TimbreError::UnknownPreset`] when no preset carries the
    /// given name.
    pub fn lookup(name: &str) -> TimbreResult<Self> {
        match name {
            "sine" => Ok(Self::sine()),
            "triangle" => Ok(Self::triangle()),
            "square" => Ok(Self::square()),
            "sawtooth" => Ok(Self::sawtooth()),
            "piano" => Ok(Self::piano()),
            "strings" => Ok(Self::strings()),
            "woodwind" => Ok(Self::woodwind()),
            "marimba" => Ok(Self::marimba()),
            other => Err(TimbreError::unknown_preset(other)),
        }
    }

    /// All preset names in display order.
    pub fn names() -> [&'static str; 8] {
        [
            "sine", "triangle", "square", "sawtooth", "piano", "strings", "woodwind", "marimba",
        ]
    }
}
