//! Tests for activity bookkeeping and per-note animation eligibility.

use super::*;
use pretty_assertions::assert_eq;
use tonecanvas_timbre::{NoteColor, VibratoParams};

fn blue() -> NoteColor {
    NoteColor::from("#4a90e2")
}

fn green() -> NoteColor {
    NoteColor::from("#68a03f")
}

fn note(id: &str) -> NoteId {
    NoteId::from(id)
}

fn engine_with_vibrato(color: &NoteColor) -> AnimationPhaseEngine {
    let mut engine = AnimationPhaseEngine::new();
    engine.set_vibrato(
        color,
        &VibratoParams {
            speed: 40.0,
            span: 40.0,
        },
        0.0,
    );
    engine
}

#[test]
fn test_sounding_set_tracks_attack_and_release() {
    let mut activity = NoteActivity::new();
    assert!(!activity.has_sounding());

    activity.note_attack(note("a"), blue());
    activity.note_attack(note("b"), green());
    assert!(activity.has_sounding());
    assert!(activity.sounding_contains(&note("a")));

    activity.note_release(&note("a"));
    assert!(!activity.sounding_contains(&note("a")));
    assert!(activity.has_sounding());
}

#[test]
fn test_playback_stop_clears_sounding_but_not_interaction() {
    let mut activity = NoteActivity::new();
    activity.set_playback(true);
    activity.note_attack(note("a"), blue());
    activity.interaction_start(note("b"), blue());

    activity.set_playback(false);
    assert!(!activity.has_sounding());
    assert!(activity.is_interacting());
    assert!(activity.interacting_contains(&note("b")));
}

#[test]
fn test_ghost_and_dial_are_single_slots() {
    let mut activity = NoteActivity::new();
    activity.ghost_update(blue());
    activity.ghost_update(green());
    assert_eq!(activity.ghost_color(), Some(&green()));

    activity.ghost_clear();
    assert_eq!(activity.ghost_color(), None);

    activity.dial_start(blue());
    assert!(activity.is_dialing());
    activity.dial_end();
    assert!(!activity.is_dialing());
}

#[test]
fn test_note_without_oscillator_never_animates() {
    let mut engine = engine_with_vibrato(&blue());
    engine.activity_mut().dial_start(green());
    // Green is being dialed but has no oscillator installed.
    assert!(!engine.should_animate_note(&green(), Some(&note("a"))));
    assert!(!engine.should_animate_note(&green(), None));
}

#[test]
fn test_dial_previews_every_note_of_the_color() {
    let mut engine = engine_with_vibrato(&blue());
    engine.activity_mut().dial_start(blue());

    assert!(engine.should_animate_note(&blue(), Some(&note("placed"))));
    assert!(engine.should_animate_note(&blue(), None));
}

#[test]
fn test_placed_note_animates_while_grabbed() {
    let mut engine = engine_with_vibrato(&blue());
    engine
        .activity_mut()
        .interaction_start(note("grabbed"), blue());

    assert!(engine.should_animate_note(&blue(), Some(&note("grabbed"))));
    assert!(!engine.should_animate_note(&blue(), Some(&note("other"))));
}

#[test]
fn test_placed_note_animates_while_sounding_during_playback() {
    let mut engine = engine_with_vibrato(&blue());
    engine.activity_mut().note_attack(note("a"), blue());
    // Sounding without the transport running is not enough.
    assert!(!engine.should_animate_note(&blue(), Some(&note("a"))));

    engine.activity_mut().set_playback(true);
    engine.activity_mut().note_attack(note("a"), blue());
    assert!(engine.should_animate_note(&blue(), Some(&note("a"))));
    assert!(!engine.should_animate_note(&blue(), Some(&note("b"))));
}

#[test]
fn test_ghost_animates_only_during_playback() {
    let mut engine = engine_with_vibrato(&blue());
    engine.activity_mut().ghost_update(blue());
    assert!(!engine.should_animate_note(&blue(), None));

    engine.activity_mut().set_playback(true);
    assert!(engine.should_animate_note(&blue(), None));

    // A ghost of a different color does not ride along.
    engine.activity_mut().ghost_update(green());
    assert!(!engine.should_animate_note(&blue(), None));
}
