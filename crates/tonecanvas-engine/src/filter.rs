//! Parametric filter response evaluation.
//!
//! One continuous response curve serves both consumers: discrete per-bin
//! gains for synthesis and a dense sampled curve for the editor overlay.
//! The curve morphs highpass to bandpass to lowpass along a single blend
//! axis instead of exposing a filter-type switch.
//!
//! Per-bin gains honor the dry/wet mix; the overlay curve is always the
//! raw response so the drawn shape does not flatten as mix comes down.

use tonecanvas_timbre::{FilterParams, HARMONIC_BINS};

/// Stand-in ratio when a division by zero would occur at the extremes of
/// the position or cutoff range. Large enough to drive the slope term to
/// zero, finite so the curve stays NaN-free.
const DIV_GUARD_RATIO: f64 = 1e6;

/// Controls rolloff slope. The response uses `ratio^(2 * STEEPNESS)`.
const STEEPNESS: f64 = 4.0;

/// Raw filter response at a normalized position in [0, 1].
///
/// Position 0 is the fundamental end of the spectrum, position 1 the top
/// harmonic. Assumes `params` already lie within their documented ranges;
/// callers sampling user input should go through [`bin_gains`] or
/// [`overlay_curve`], which clamp first.
pub fn filter_gain(norm_pos: f64, params: &FilterParams) -> f64 {
    let norm_cutoff = (params.cutoff - 1.0) / 30.0;

    let lp_ratio = if norm_cutoff > 0.0 {
        norm_pos / norm_cutoff
    } else {
        norm_pos * DIV_GUARD_RATIO
    };
    let hp_ratio = if norm_pos > 0.0 {
        norm_cutoff / norm_pos
    } else {
        norm_cutoff * DIV_GUARD_RATIO
    };

    let lp = 1.0 / (1.0 + lp_ratio.powf(2.0 * STEEPNESS));
    let hp = 1.0 / (1.0 + hp_ratio.powf(2.0 * STEEPNESS));
    // At the cutoff both slopes sit at one half, so the product needs a
    // factor of four to bring the bandpass peak back to unity.
    let bp = lp * hp * 4.0;

    let blend = params.blend;
    let shape = if blend <= 1.0 {
        hp * (1.0 - blend) + bp * blend
    } else {
        bp * (2.0 - blend) + lp * (blend - 1.0)
    };

    let res_q = 1.0 - params.resonance / 105.0;
    let peak_width = (0.2 * res_q * res_q).max(0.01);
    let peak = (-((norm_pos - norm_cutoff) / peak_width).powi(2)).exp();
    let res_gain = (params.resonance / 100.0) * 0.6;

    (shape + peak * res_gain).min(1.0)
}

/// Blends a filter gain with unity according to the mix percentage.
///
/// Mix 0 leaves the signal untouched, mix 100 applies the full filter.
pub fn apply_mix(gain: f64, mix_percent: f64) -> f64 {
    let mix = (mix_percent / 100.0).clamp(0.0, 1.0);
    1.0 - mix + mix * gain
}

/// Mixed filter gain at the center of each harmonic bin.
///
/// Returns all-unity gains while the filter is bypassed (disabled or mix
/// at zero), so multiplying a spectrum by the result is always safe.
pub fn bin_gains(params: &FilterParams) -> [f64; HARMONIC_BINS] {
    let mut gains = [1.0; HARMONIC_BINS];
    if params.is_bypassed() {
        return gains;
    }

    let clamped = params.clamped();
    for (bin, gain) in gains.iter_mut().enumerate() {
        let norm_pos = (bin as f64 + 0.5) / HARMONIC_BINS as f64;
        *gain = apply_mix(filter_gain(norm_pos, &clamped), clamped.mix);
    }
    gains
}

/// Raw response sampled at `resolution` evenly spaced positions across
/// [0, 1], for drawing the editor overlay.
///
/// Returns `None` while the filter is bypassed; the overlay is not drawn
/// at all in that state rather than drawn flat.
pub fn overlay_curve(params: &FilterParams, resolution: usize) -> Option<Vec<f64>> {
    if params.is_bypassed() || resolution == 0 {
        return None;
    }

    let clamped = params.clamped();
    let last = (resolution - 1).max(1) as f64;
    let curve = (0..resolution)
        .map(|step| filter_gain(step as f64 / last, &clamped))
        .collect();
    Some(curve)
}
