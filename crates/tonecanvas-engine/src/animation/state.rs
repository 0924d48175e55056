//! One oscillator's phase accumulator.

use std::f64::consts::TAU;

/// Phase accumulator wrap point. A multiple of the sine period, so
/// wrapping never moves the oscillator.
pub const PHASE_WRAP: f64 = 2.0 * TAU;

/// Phase state of one color's oscillator for one modulation effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Oscillation rate in Hz.
    pub frequency_hz: f64,
    /// Effect-specific depth. Semitones of visual offset for vibrato, the
    /// span fraction of the amplitude floor for tremolo.
    pub depth: f64,
    /// Accumulated phase in radians, kept in [0, `PHASE_WRAP`).
    pub phase: f64,
    /// Timestamp of the last phase integration, in seconds.
    pub last_update: f64,
}

impl AnimationState {
    /// A fresh oscillator starting at phase zero.
    pub fn new(frequency_hz: f64, depth: f64, now: f64) -> Self {
        AnimationState {
            frequency_hz,
            depth,
            phase: 0.0,
            last_update: now,
        }
    }

    /// Changes rate and depth while keeping the accumulated phase, so a
    /// dial drag mid-oscillation never makes the note jump.
    pub fn retune(&mut self, frequency_hz: f64, depth: f64) {
        self.frequency_hz = frequency_hz;
        self.depth = depth;
    }

    /// Integrates elapsed wall-clock time into phase.
    ///
    /// A clock that moves backwards contributes nothing rather than
    /// unwinding the phase.
    pub fn advance(&mut self, now: f64) {
        let elapsed = (now - self.last_update).max(0.0);
        self.last_update = now;
        self.phase += self.frequency_hz * elapsed * TAU;
        if self.phase >= PHASE_WRAP {
            self.phase %= PHASE_WRAP;
        }
    }

    /// Moves the time reference to `now` without integrating the gap.
    ///
    /// Used when an oscillator is frozen by its gate or when animation
    /// restarts after idling, so the idle time never turns into a phase
    /// jump.
    pub fn rebase(&mut self, now: f64) {
        self.last_update = now;
    }
}
