//! Additive waveform synthesis and phase-step transitions.
//!
//! A waveform buffer is one rendered cycle of the harmonic series, peak
//! normalized into [-1, 1]. The pre-normalization peak is kept alongside
//! the samples as the calculated amplitude, which later feeds envelope
//! height and tremolo scaling.
//!
//! Phase edits do not snap the displayed waveform; they start a short
//! transition that cross-fades the old rendering into the new one with an
//! ease-out curve.

use tonecanvas_timbre::{FilterParams, HarmonicSpectrum, HARMONIC_BINS};

use crate::filter::bin_gains;

/// Samples per rendered waveform cycle.
pub const WAVEFORM_SAMPLES: usize = 512;

/// Harmonics with coefficients below this contribute nothing audible and
/// are skipped during synthesis.
pub const COEFF_EPSILON: f64 = 0.001;

/// Duration of the cross-fade after a phase edit.
pub const PHASE_TRANSITION_SECONDS: f64 = 0.3;

/// How much of the cycle the waveform view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseRange {
    /// One full cycle (360 degrees).
    #[default]
    Standard,
    /// A third more than a cycle (480 degrees), so the wrap-around seam
    /// is visible while editing phases.
    Extended,
}

impl PhaseRange {
    /// Multiplier applied to the one-cycle phase sweep.
    pub fn multiplier(self) -> f64 {
        match self {
            PhaseRange::Standard => 1.0,
            PhaseRange::Extended => 4.0 / 3.0,
        }
    }
}

/// One rendered waveform cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformBuffer {
    /// Samples in [-1, 1]; length is whatever the synthesis call asked for.
    pub samples: Vec<f64>,
    /// Peak amplitude before normalization, capped at 1. Zero for a
    /// silent spectrum.
    pub calculated_amplitude: f64,
}

/// Renders `sample_count` samples of the spectrum across the given range.
///
/// The spectrum is borrowed and untouched; every call allocates a fresh
/// buffer. If the summed peak exceeds one, the samples are scaled back
/// into [-1, 1] and the unscaled peak is reported (capped at one) as the
/// calculated amplitude.
pub fn synthesize(
    spectrum: &HarmonicSpectrum,
    range: PhaseRange,
    sample_count: usize,
) -> WaveformBuffer {
    let mut samples = vec![0.0; sample_count];
    let sweep = range.multiplier() * std::f64::consts::TAU;
    let mut peak: f64 = 0.0;

    for (index, sample) in samples.iter_mut().enumerate() {
        let phase = (index as f64 / sample_count as f64) * sweep;
        let mut sum = 0.0;
        for bin in 0..HARMONIC_BINS {
            let coeff = spectrum.coeffs[bin];
            if coeff < COEFF_EPSILON {
                continue;
            }
            let harmonic = (bin + 1) as f64;
            sum += coeff * (harmonic * phase + spectrum.phases[bin]).sin();
        }
        peak = peak.max(sum.abs());
        *sample = sum;
    }

    if peak > 1.0 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }

    WaveformBuffer {
        samples,
        calculated_amplitude: peak.min(1.0),
    }
}

/// Spectrum with the filter's per-bin gains multiplied in.
///
/// Phases pass through untouched; only amplitudes change.
pub fn filtered_spectrum(spectrum: &HarmonicSpectrum, params: &FilterParams) -> HarmonicSpectrum {
    let gains = bin_gains(params);
    let mut filtered = spectrum.clone();
    for bin in 0..HARMONIC_BINS {
        filtered.coeffs[bin] = spectrum.coeffs[bin] * gains[bin];
    }
    filtered
}

/// In-flight cross-fade between two waveform renderings.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTransition {
    from: WaveformBuffer,
    to: WaveformBuffer,
    started_at: f64,
    duration: f64,
}

impl PhaseTransition {
    /// Starts a transition of the default duration.
    pub fn new(from: WaveformBuffer, to: WaveformBuffer, started_at: f64) -> Self {
        Self::with_duration(from, to, started_at, PHASE_TRANSITION_SECONDS)
    }

    /// Starts a transition of a custom duration. Durations at or below
    /// zero complete immediately.
    pub fn with_duration(
        from: WaveformBuffer,
        to: WaveformBuffer,
        started_at: f64,
        duration: f64,
    ) -> Self {
        PhaseTransition {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Eased progress in [0, 1] at the given time.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let linear = ((now - self.started_at) / self.duration).clamp(0.0, 1.0);
        1.0 - (1.0 - linear).powi(3)
    }

    /// Whether the transition has run its full duration.
    pub fn is_complete(&self, now: f64) -> bool {
        now - self.started_at >= self.duration
    }

    /// The rendering the transition settles on.
    pub fn target(&self) -> &WaveformBuffer {
        &self.to
    }

    /// The blended rendering at the given time.
    ///
    /// Once complete this returns the target buffer exactly, never an
    /// interpolation that is merely close to it. Endpoint buffers of
    /// mismatched lengths skip blending entirely.
    pub fn buffer_at(&self, now: f64) -> WaveformBuffer {
        let eased = self.progress(now);
        if eased >= 1.0 || self.from.samples.len() != self.to.samples.len() {
            return self.to.clone();
        }

        let mut samples = Vec::with_capacity(self.to.samples.len());
        let mut peak: f64 = 0.0;
        for (a, b) in self.from.samples.iter().zip(self.to.samples.iter()) {
            let blended = a + (b - a) * eased;
            peak = peak.max(blended.abs());
            samples.push(blended);
        }

        WaveformBuffer {
            samples,
            calculated_amplitude: peak.min(1.0),
        }
    }
}
