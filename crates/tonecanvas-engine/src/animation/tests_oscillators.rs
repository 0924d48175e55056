//! Tests for oscillator phase math and the per-color query surface.

use super::*;
use pretty_assertions::assert_eq;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tonecanvas_timbre::{NoteColor, TremoloParams, VibratoParams};

fn blue() -> NoteColor {
    NoteColor::from("#4a90e2")
}

#[test]
fn test_phase_integrates_wall_clock_time() {
    let mut state = AnimationState::new(2.0, 1.0, 0.0);
    state.advance(0.25);
    // 2 Hz for a quarter second is half a cycle.
    assert!((state.phase - PI).abs() < 1e-12);
    assert_eq!(state.last_update, 0.25);
}

#[test]
fn test_phase_wraps_at_two_turns() {
    let mut state = AnimationState::new(1.0, 1.0, 0.0);
    state.advance(3.5);
    assert!((state.phase - 1.5 * TAU).abs() < 1e-9);
    assert!(state.phase < PHASE_WRAP);
}

#[test]
fn test_backwards_clock_contributes_nothing() {
    let mut state = AnimationState::new(1.0, 1.0, 0.0);
    state.advance(1.0);
    let before = state.phase;
    state.advance(0.5);
    assert_eq!(state.phase, before);
    assert_eq!(state.last_update, 0.5);
}

#[test]
fn test_rebase_freezes_without_advancing() {
    let mut state = AnimationState::new(4.0, 1.0, 0.0);
    state.advance(0.5);
    let frozen = state.phase;

    state.rebase(100.0);
    assert_eq!(state.phase, frozen);
    state.advance(100.0);
    assert_eq!(state.phase, frozen);
}

#[test]
fn test_retune_preserves_phase() {
    let mut state = AnimationState::new(4.0, 0.5, 0.0);
    state.advance(0.1);
    let mid_flight = state.phase;

    state.retune(9.0, 0.25);
    assert_eq!(state.phase, mid_flight);
    assert_eq!(state.frequency_hz, 9.0);
    assert_eq!(state.depth, 0.25);
}

#[test]
fn test_vibrato_offset_starts_upward() {
    let mut engine = AnimationPhaseEngine::new();
    engine.activity_mut().dial_start(blue());
    // Speed 25 maps to 4 Hz; full span swings half a semitone.
    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 25.0,
            span: 100.0,
        },
        0.0,
    );

    engine.tick(0.0);
    assert_eq!(engine.vibrato_y_offset(&blue()), 0.0);

    // A sixteenth of a second at 4 Hz is a quarter cycle.
    engine.tick(1.0 / 16.0);
    assert!((engine.vibrato_y_offset(&blue()) + VIBRATO_MAX_OFFSET_SEMITONES).abs() < 1e-12);
}

#[test]
fn test_vibrato_offset_is_zero_when_gate_closed() {
    let mut engine = AnimationPhaseEngine::new();
    engine.activity_mut().dial_start(blue());
    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 25.0,
            span: 100.0,
        },
        0.0,
    );
    engine.tick(1.0 / 16.0);

    engine.activity_mut().dial_end();
    assert_eq!(engine.vibrato_y_offset(&blue()), 0.0);

    // And zero for colors that never had an oscillator.
    engine.activity_mut().dial_start(blue());
    assert_eq!(engine.vibrato_y_offset(&NoteColor::from("#2d2d2d")), 0.0);
}

#[test]
fn test_tremolo_multiplier_swings_between_span_floor_and_full() {
    let mut engine = AnimationPhaseEngine::new();
    engine.activity_mut().set_audition(Some(blue()));
    engine.set_tremolo(
        &blue(),
        &TremoloParams {
            speed: 25.0,
            span: 40.0,
        },
        0.0,
    );

    engine.tick(0.0);
    // Phase zero sits at the centroid.
    assert!((engine.tremolo_multiplier(&blue(), 1.0) - 0.7).abs() < 1e-12);

    engine.tick(1.0 / 16.0);
    assert!((engine.tremolo_multiplier(&blue(), 1.0) - 1.0).abs() < 1e-12);

    // Half a cycle later the dip bottoms out at the span floor.
    engine.tick(3.0 / 16.0);
    assert!((engine.tremolo_multiplier(&blue(), 1.0) - 0.4).abs() < 1e-12);
}

#[test]
fn test_tremolo_multiplier_stays_in_bounds_over_a_sweep() {
    let mut engine = AnimationPhaseEngine::new();
    engine.activity_mut().set_audition(Some(blue()));
    engine.set_tremolo(
        &blue(),
        &TremoloParams {
            speed: 73.0,
            span: 15.0,
        },
        0.0,
    );

    for frame in 0..600 {
        engine.tick(frame as f64 / 60.0);
        let multiplier = engine.tremolo_multiplier(&blue(), 0.85);
        assert!(
            multiplier >= 0.15 - 1e-9 && multiplier <= 1.0,
            "frame {frame}: multiplier {multiplier} out of bounds"
        );
    }
}

#[test]
fn test_tremolo_multiplier_is_a_pure_ratio() {
    let mut engine = AnimationPhaseEngine::new();
    engine.activity_mut().set_audition(Some(blue()));
    engine.set_tremolo(
        &blue(),
        &TremoloParams {
            speed: 25.0,
            span: 50.0,
        },
        0.0,
    );
    engine.tick(0.02);

    let at_full = engine.tremolo_multiplier(&blue(), 1.0);
    let at_half = engine.tremolo_multiplier(&blue(), 0.5);
    assert!((at_full - at_half).abs() < 1e-12);

    // A silent waveform falls back to full scale instead of dividing by
    // zero.
    let at_zero = engine.tremolo_multiplier(&blue(), 0.0);
    assert!(at_zero.is_finite());
    assert!((at_zero - at_full).abs() < 1e-12);
}

#[test]
fn test_half_turn_vibrato_phase_crosses_rest() {
    let mut state = AnimationState::new(8.0, 1.0, 0.0);
    // An eighth of a second at 8 Hz is one full cycle.
    state.advance(0.125);
    assert!((state.phase - TAU).abs() < 1e-12);

    let mut quarter = AnimationState::new(8.0, 1.0, 0.0);
    quarter.advance(1.0 / 32.0);
    assert!((quarter.phase - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn test_disabled_params_remove_the_oscillator() {
    let mut engine = AnimationPhaseEngine::new();
    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 25.0,
            span: 60.0,
        },
        0.0,
    );
    assert!(engine.vibrato_state(&blue()).is_some());

    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 25.0,
            span: 0.0,
        },
        1.0,
    );
    assert!(engine.vibrato_state(&blue()).is_none());
    assert_eq!(engine.vibrato_colors(), Vec::<NoteColor>::new());
}
