//! ToneCanvas Effects Engine
//!
//! This crate implements the runtime half of the ToneCanvas timbre
//! system: waveform synthesis for the editor displays and the
//! animation/audio coordination for the per-color effects.
//!
//! # Overview
//!
//! Each note color owns a [`tonecanvas_timbre::Timbre`] plus a set of
//! four effects (vibrato, tremolo, reverb, delay). The engine turns
//! those into numbers the host draws and plays:
//!
//! - **Waveforms** - Additive synthesis of the 12-bin harmonic spectrum
//!   into a display buffer, with eased transitions when a bin's phase
//!   button is cycled
//! - **Filter shaping** - Blendable lowpass/bandpass/highpass gain
//!   curve applied to the spectrum and drawn as an overlay
//! - **Animation** - A shared frame clock driving per-color phase
//!   accumulators, gated by what is actually sounding
//! - **Envelopes** - Per-note ADSR fill levels for the grid display
//! - **Audio translation** - Dial percentages to Hz/cents/seconds, and
//!   lazy per-color effect node lifecycle behind [`AudioBackend`]
//! - **Paint geometry** - Musical time and detected pitch to canvas
//!   coordinates for the pitch-paint trail
//!
//! All state is single-threaded and frame-driven; nothing blocks. The
//! host calls [`EffectsCoordinator::frame`] from its animation-frame
//! scheduler and subscribes to the [`EventHub`] channels for repaints.
//!
//! # Example
//!
//! ```
//! use tonecanvas_engine::{EffectsCoordinator, ManualClock, NullBackend};
//! use tonecanvas_timbre::{EffectUpdate, ModulationField, NoteColor};
//!
//! let clock = ManualClock::new();
//! let mut engine = EffectsCoordinator::with_clock(NullBackend, clock.clone());
//! let blue = NoteColor::from("#4a90e2");
//!
//! engine.update_effect(&blue, EffectUpdate::Tremolo {
//!     field: ModulationField::Speed,
//!     value: 40.0,
//! });
//! engine.update_effect(&blue, EffectUpdate::Tremolo {
//!     field: ModulationField::Span,
//!     value: 60.0,
//! });
//!
//! // Grabbing a dial previews the effect even with nothing sounding.
//! engine.dial_interaction_start(blue.clone());
//! engine.frame();
//! assert!(engine.tremolo_engaged(&blue));
//!
//! clock.advance(0.1);
//! engine.frame();
//! let brightness = engine.tremolo_multiplier(&blue);
//! assert!((0.6..=1.0).contains(&brightness));
//! ```
//!
//! # Crate Structure
//!
//! - [`coordinator`] - [`EffectsCoordinator`] facade and the frame clock
//! - [`waveform`] - Harmonic synthesis and phase transitions
//! - [`filter`] - Parametric filter gain curve
//! - [`store`] - Effect parameter store and legacy migration
//! - [`animation`] - Phase accumulators, gating, and note activity
//! - [`envelope`] - Per-note envelope fill model
//! - [`audio`] - Unit translation and the [`AudioBackend`] contract
//! - [`paint`] - Pitch-paint time and pitch geometry
//! - [`sync`] - Frame throttling between animation and subscribers
//! - [`events`] - Subscription channels the host listens on

pub mod animation;
pub mod audio;
pub mod coordinator;
pub mod envelope;
pub mod events;
pub mod filter;
pub mod paint;
pub mod store;
pub mod sync;
pub mod waveform;

// Re-export main types at crate root
pub use animation::{AnimationPhaseEngine, ChannelFrame, NoteId, TickOutcome};
pub use audio::{AudioBackend, EffectRack, NullBackend};
pub use coordinator::{Clock, EffectsCoordinator, ManualClock, WallClock};
pub use envelope::EnvelopeAmplitudeModel;
pub use events::EventHub;
pub use store::EffectParameterStore;
pub use sync::VisualSyncDispatcher;
pub use waveform::{PhaseRange, WaveformBuffer};
