//! Tests for animation gates, start/stop transitions, and frame output.

use super::*;
use pretty_assertions::assert_eq;
use tonecanvas_timbre::{
    EffectParams, NoteColor, TremoloParams, VibratoParams,
};

use crate::events::VisualEffectChange;

fn blue() -> NoteColor {
    NoteColor::from("#4a90e2")
}

fn red() -> NoteColor {
    NoteColor::from("#d66573")
}

fn engine_with_both(color: &NoteColor) -> AnimationPhaseEngine {
    let mut engine = AnimationPhaseEngine::new();
    engine.set_vibrato(
        color,
        &VibratoParams {
            speed: 50.0,
            span: 50.0,
        },
        0.0,
    );
    engine.set_tremolo(
        color,
        &TremoloParams {
            speed: 50.0,
            span: 50.0,
        },
        0.0,
    );
    engine
}

#[test]
fn test_oscillators_alone_do_not_animate() {
    let mut engine = engine_with_both(&blue());
    let outcome = engine.tick(0.1);
    assert!(outcome.is_idle());
    assert_eq!(outcome.vibrato, ChannelFrame::Silent);
    assert_eq!(outcome.tremolo, ChannelFrame::Silent);
}

#[test]
fn test_playback_opens_vibrato_but_not_tremolo() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue()]));
    // No note is sounding yet, so brightness stays put.
    assert_eq!(outcome.tremolo, ChannelFrame::Silent);
}

#[test]
fn test_sounding_note_opens_tremolo() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine
        .activity_mut()
        .note_attack(NoteId::from("note-1"), blue());

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.tremolo, ChannelFrame::Animate(vec![blue()]));
}

#[test]
fn test_audition_tone_counts_as_sounding() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_audition(Some(blue()));

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.tremolo, ChannelFrame::Animate(vec![blue()]));

    engine.activity_mut().set_audition(None);
    let outcome = engine.tick(0.2);
    assert_eq!(outcome.tremolo, ChannelFrame::Reset(vec![blue()]));
}

#[test]
fn test_interaction_opens_vibrato_without_playback() {
    let mut engine = engine_with_both(&blue());
    engine
        .activity_mut()
        .interaction_start(NoteId::from("note-1"), blue());

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue()]));
}

#[test]
fn test_dial_drag_opens_both_channels() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().dial_start(blue());

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue()]));
    assert_eq!(outcome.tremolo, ChannelFrame::Animate(vec![blue()]));
}

#[test]
fn test_stop_emits_one_reset_then_goes_silent() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine.tick(0.1);
    engine.tick(0.2);

    engine.activity_mut().set_playback(false);
    let outcome = engine.tick(0.3);
    assert_eq!(outcome.vibrato, ChannelFrame::Reset(vec![blue()]));

    let outcome = engine.tick(0.4);
    assert_eq!(outcome.vibrato, ChannelFrame::Silent);
}

#[test]
fn test_channels_stop_independently() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine
        .activity_mut()
        .note_attack(NoteId::from("note-1"), blue());
    engine.tick(0.1);

    engine.activity_mut().note_release(&NoteId::from("note-1"));
    let outcome = engine.tick(0.2);
    // Vibrato keeps running on playback; tremolo lost its last source.
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue()]));
    assert_eq!(outcome.tremolo, ChannelFrame::Reset(vec![blue()]));
}

#[test]
fn test_restart_does_not_integrate_the_idle_gap() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine.tick(0.0);
    engine.tick(0.1);
    let mid_flight = engine.vibrato_state(&blue()).unwrap().phase;
    assert!(mid_flight > 0.0);

    engine.activity_mut().set_playback(false);
    engine.tick(0.2);

    // A long pause, then playback resumes.
    engine.activity_mut().set_playback(true);
    engine.tick(60.0);
    let resumed = engine.vibrato_state(&blue()).unwrap().phase;
    assert_eq!(resumed, mid_flight);
}

#[test]
fn test_gate_closure_freezes_phase_in_place() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine.tick(0.0);
    engine.tick(0.25);
    let frozen = engine.vibrato_state(&blue()).unwrap().phase;

    engine.activity_mut().set_playback(false);
    engine.tick(0.5);
    engine.tick(0.75);
    assert_eq!(engine.vibrato_state(&blue()).unwrap().phase, frozen);
}

#[test]
fn test_param_update_preserves_phase_on_both_effects() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().dial_start(blue());
    engine.tick(0.0);
    engine.tick(0.13);
    let vibrato_phase = engine.vibrato_state(&blue()).unwrap().phase;
    let tremolo_phase = engine.tremolo_state(&blue()).unwrap().phase;

    engine.apply_visual_change(
        &VisualEffectChange {
            color: blue(),
            params: EffectParams::Vibrato(VibratoParams {
                speed: 90.0,
                span: 10.0,
            }),
        },
        0.14,
    );
    engine.apply_visual_change(
        &VisualEffectChange {
            color: blue(),
            params: EffectParams::Tremolo(TremoloParams {
                speed: 5.0,
                span: 95.0,
            }),
        },
        0.14,
    );

    assert_eq!(engine.vibrato_state(&blue()).unwrap().phase, vibrato_phase);
    assert_eq!(engine.tremolo_state(&blue()).unwrap().phase, tremolo_phase);
}

#[test]
fn test_disabling_the_only_color_yields_a_final_reset() {
    let mut engine = engine_with_both(&blue());
    engine.activity_mut().set_playback(true);
    engine.tick(0.0);
    engine.tick(0.1);

    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 50.0,
            span: 0.0,
        },
        0.15,
    );
    let outcome = engine.tick(0.2);
    // The oscillator map is empty, but the freshly disabled color still
    // gets one repaint at rest.
    assert_eq!(outcome.vibrato, ChannelFrame::Reset(vec![blue()]));
}

#[test]
fn test_disabling_one_of_two_colors_repaints_it_once() {
    let mut engine = engine_with_both(&blue());
    engine.set_vibrato(
        &red(),
        &VibratoParams {
            speed: 10.0,
            span: 10.0,
        },
        0.0,
    );
    engine.activity_mut().set_playback(true);
    engine.tick(0.1);

    engine.set_vibrato(
        &red(),
        &VibratoParams {
            speed: 10.0,
            span: 0.0,
        },
        0.15,
    );
    let outcome = engine.tick(0.2);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue(), red()]));

    let outcome = engine.tick(0.3);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue()]));
}

#[test]
fn test_disable_while_quiet_stays_silent() {
    let mut engine = engine_with_both(&blue());
    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 50.0,
            span: 0.0,
        },
        0.1,
    );
    let outcome = engine.tick(0.2);
    assert_eq!(outcome.vibrato, ChannelFrame::Silent);
}

#[test]
fn test_frame_colors_are_sorted_for_stable_output() {
    let mut engine = engine_with_both(&red());
    engine.set_vibrato(
        &blue(),
        &VibratoParams {
            speed: 10.0,
            span: 10.0,
        },
        0.0,
    );
    engine.activity_mut().set_playback(true);

    let outcome = engine.tick(0.1);
    assert_eq!(outcome.vibrato, ChannelFrame::Animate(vec![blue(), red()]));
}
