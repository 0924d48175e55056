//! Modulation phase animation.
//!
//! This module owns the per-color vibrato and tremolo oscillators, the
//! note activity bookkeeping that gates them, and the tick that advances
//! phases and decides what the painters need to repaint each frame.
//!
//! Oscillator phase is wall-clock driven: each tick integrates elapsed
//! time into phase, so animation speed is independent of frame rate, and
//! a parameter change mid-flight retunes the oscillator without resetting
//! its phase.

mod activity;
mod engine;
mod state;

#[cfg(test)]
mod tests_activity;
#[cfg(test)]
mod tests_gating;
#[cfg(test)]
mod tests_oscillators;

pub use activity::{NoteActivity, NoteId};
pub use engine::{AnimationPhaseEngine, ChannelFrame, TickOutcome, VIBRATO_MAX_OFFSET_SEMITONES};
pub use state::{AnimationState, PHASE_WRAP};
