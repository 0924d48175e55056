//! Envelope fill integration tests: stage progression on the shared
//! clock, release capture, fallbacks, and the sustain ceiling.

use tonecanvas_engine::envelope::FillPhase;
use tonecanvas_engine::{EffectsCoordinator, ManualClock, NoteId, NullBackend};
use tonecanvas_timbre::{AdsrParams, EffectUpdate, ModulationField, NoteColor};

fn blue() -> NoteColor {
    NoteColor::from("#4a90e2")
}

fn engine() -> (EffectsCoordinator<NullBackend>, ManualClock) {
    let clock = ManualClock::new();
    let engine = EffectsCoordinator::with_clock(NullBackend, clock.clone());
    (engine, clock)
}

fn note() -> NoteId {
    NoteId::new("n1")
}

#[test]
fn test_fill_walks_the_four_stages() {
    let (mut engine, clock) = engine();
    engine.set_adsr(&blue(), AdsrParams::new(0.4, 0.2, 0.6, 0.3));
    engine.note_attack(note(), blue());

    clock.set(0.2);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), Some(0.5));
    assert_eq!(engine.envelope_fill_phase(&note()), Some(FillPhase::Attack));

    clock.set(0.5);
    engine.frame();
    let level = engine.envelope_fill_level(&note()).unwrap();
    assert!((level - 0.8).abs() < 1e-9);
    assert_eq!(engine.envelope_fill_phase(&note()), Some(FillPhase::Decay));

    clock.set(2.0);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), Some(0.6));
    assert_eq!(engine.envelope_fill_phase(&note()), Some(FillPhase::Sustain));

    engine.note_release(&note());
    clock.set(2.15);
    engine.frame();
    let level = engine.envelope_fill_level(&note()).unwrap();
    assert!((level - 0.3).abs() < 1e-9);
    assert_eq!(
        engine.envelope_fill_phase(&note()),
        Some(FillPhase::Release)
    );

    // Past the release tail the fill is gone entirely.
    clock.set(2.5);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), None);
}

#[test]
fn test_attack_snapshot_ignores_later_envelope_edits() {
    let (mut engine, clock) = engine();
    engine.set_adsr(&blue(), AdsrParams::new(0.4, 0.2, 0.6, 0.3));
    engine.note_attack(note(), blue());

    // Shrinking the attack after the note started must not reshape the
    // fill already in flight.
    engine.set_adsr(&blue(), AdsrParams::new(0.01, 0.2, 0.6, 0.3));

    clock.set(0.2);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), Some(0.5));

    // The next attack picks up the edited envelope.
    engine.note_attack(NoteId::new("n2"), blue());
    clock.set(0.25);
    engine.frame();
    assert_eq!(
        engine.envelope_fill_phase(&NoteId::new("n2")),
        Some(FillPhase::Decay)
    );
}

#[test]
fn test_release_mid_attack_falls_from_the_captured_level() {
    let (mut engine, clock) = engine();
    engine.set_adsr(&blue(), AdsrParams::new(0.4, 0.2, 0.6, 0.3));
    engine.note_attack(note(), blue());

    clock.set(0.2);
    engine.frame();
    engine.note_release(&note());

    // Halfway through the release, half of the captured 0.5 remains.
    clock.set(0.35);
    engine.frame();
    let level = engine.envelope_fill_level(&note()).unwrap();
    assert!((level - 0.25).abs() < 1e-9);
}

#[test]
fn test_degenerate_durations_use_display_fallbacks() {
    let (mut engine, clock) = engine();
    // All-zero envelope: attack shows over 10 ms, decay over 100 ms,
    // and the fill then holds at the genuine zero sustain.
    engine.set_adsr(&blue(), AdsrParams::new(0.0, 0.0, 0.0, 0.0));
    engine.note_attack(note(), blue());

    clock.set(0.005);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), Some(0.5));

    clock.set(0.06);
    engine.frame();
    let level = engine.envelope_fill_level(&note()).unwrap();
    assert!((level - 0.5).abs() < 1e-9);
    assert_eq!(engine.envelope_fill_phase(&note()), Some(FillPhase::Decay));

    clock.set(0.2);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&note()), Some(0.0));
    assert_eq!(
        engine.envelope_fill_phase(&note()),
        Some(FillPhase::Sustain)
    );
}

#[test]
fn test_stopping_playback_clears_all_fills() {
    let (mut engine, clock) = engine();
    engine.playback_state_changed(true, false);
    engine.note_attack(NoteId::new("n1"), blue());
    engine.note_attack(NoteId::new("n2"), blue());

    clock.set(0.05);
    engine.frame();
    assert!(engine.envelope_fill_level(&NoteId::new("n1")).is_some());

    engine.playback_state_changed(false, false);
    clock.set(0.06);
    engine.frame();
    assert_eq!(engine.envelope_fill_level(&NoteId::new("n1")), None);
    assert_eq!(engine.envelope_fill_level(&NoteId::new("n2")), None);
}

#[test]
fn test_sustain_ceiling_is_static_without_tremolo() {
    let (mut engine, _clock) = engine();
    engine.set_coeff(&blue(), 0, 0.5);

    assert_eq!(engine.sustain_ceiling(&blue()), 0.5);
    assert_eq!(engine.set_sustain(&blue(), 0.9), 0.5);
    assert_eq!(engine.set_sustain(&blue(), 0.3), 0.3);
}

#[test]
fn test_sustain_ceiling_follows_the_live_tremolo_dip() {
    let (mut engine, _clock) = engine();
    engine.set_coeff(&blue(), 0, 0.5);
    engine.update_effect(
        &blue(),
        EffectUpdate::Tremolo {
            field: ModulationField::Speed,
            value: 25.0,
        },
    );
    engine.update_effect(
        &blue(),
        EffectUpdate::Tremolo {
            field: ModulationField::Span,
            value: 40.0,
        },
    );

    engine.dial_interaction_start(blue());
    engine.frame();

    // Phase zero sits at the oscillation midpoint: 70% of the peak.
    let ceiling = engine.sustain_ceiling(&blue());
    assert!((ceiling - 0.35).abs() < 1e-9);
    let applied = engine.set_sustain(&blue(), 0.9);
    assert!((applied - 0.35).abs() < 1e-9);

    // Letting go of the dial restores the static ceiling.
    engine.dial_interaction_end();
    assert_eq!(engine.sustain_ceiling(&blue()), 0.5);
}
