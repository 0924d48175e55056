//! Tonecanvas canonical timbre library
//!
//! This crate provides the parameter types, validation, and factory presets
//! for Tonecanvas timbres. A timbre is the complete sound definition of one
//! note color: twelve harmonic amplitude/phase bins for additive synthesis,
//! an ADSR envelope, and a parametric filter. Effect parameters (vibrato,
//! tremolo, reverb, delay) are modeled here as well so that the engine and
//! the persistence layer agree on ranges, defaults, and legacy field names.
//!
//! All types are plain data: no synthesis or animation happens in this
//! crate. Values are clamped into their documented ranges on write rather
//! than rejected, so a slider at the edge of its travel never produces an
//! error.
//!
//! # Example
//!
//! ```
//! use tonecanvas_timbre::{Timbre, TimbrePreset};
//!
//! let mut timbre = Timbre::default();
//! assert_eq!(timbre.spectrum.coeffs[0], 1.0); // default is a pure sine
//!
//! let square = TimbrePreset::lookup("square").unwrap();
//! timbre.apply_preset(&square);
//! assert!(timbre.spectrum.coeffs[2] > 0.0); // H3 present now
//! ```
//!
//! # Modules
//!
//! - [`adsr`]: ADSR envelope parameters and absolute-time derivation
//! - [`color`]: Note color keys and the stock palette
//! - [`effects`]: Per-color effect parameter types and update routing
//! - [`error`]: Error types for validation and rehydration
//! - [`filter`]: Parametric filter settings
//! - [`harmonics`]: Harmonic spectrum data and phase quantization
//! - [`preset`]: Factory presets (classic waveforms and instruments)
//! - [`timbre`]: The per-color timbre aggregate

pub mod adsr;
pub mod color;
pub mod effects;
pub mod error;
pub mod filter;
pub mod harmonics;
pub mod preset;
pub mod timbre;

/// Number of harmonic bins in a spectrum. Bin `i` holds harmonic `i + 1`,
/// so the twelve bins cover H1 through H12.
pub const HARMONIC_BINS: usize = 12;

// Re-export commonly used types at the crate root
pub use adsr::{AdsrParams, MAX_ADSR_TIME_SECONDS, MIN_STAGE_GAP_SECONDS};
pub use color::{NoteColor, DEFAULT_PALETTE};
pub use effects::{
    DelayField, DelayParams, EffectKind, EffectParams, EffectSet, EffectUpdate,
    LegacyTimbreEffects, ModulationField, ReverbField, ReverbParams, TremoloParams, VibratoParams,
};
pub use error::{TimbreError, TimbreResult};
pub use filter::{FilterMode, FilterParams};
pub use harmonics::{HarmonicSpectrum, PhaseStep};
pub use preset::TimbrePreset;
pub use timbre::Timbre;
