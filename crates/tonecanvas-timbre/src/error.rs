//! Error types for timbre validation and rehydration.

use thiserror::Error;

/// Errors produced while validating or rehydrating timbre data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimbreError {
    /// A persisted harmonic sequence has the wrong length.
    #[error("harmonic sequence for {name} has length {found}, expected {expected}")]
    SequenceLength {
        /// Which sequence was malformed ("coeffs" or "phases").
        name: &'static str,
        /// Expected number of entries.
        expected: usize,
        /// Number of entries actually present.
        found: usize,
    },

    /// A numeric value is NaN or infinite.
    #[error("non-finite value for {name}: {value}")]
    NonFinite {
        /// Name of the offending field.
        name: &'static str,
        /// The value that failed the check.
        value: f64,
    },

    /// A preset name does not exist in the factory catalog.
    #[error("unknown preset name: {0}")]
    UnknownPreset(String),

    /// ADSR absolute-time derivation produced non-finite stage durations.
    ///
    /// Callers should keep their previous envelope values when this occurs.
    #[error("ADSR derivation produced non-finite values (attack={attack}, decay={decay}, release={release})")]
    NonFiniteAdsr {
        /// Derived attack duration.
        attack: f64,
        /// Derived decay duration.
        decay: f64,
        /// Derived release duration.
        release: f64,
    },
}

impl TimbreError {
    /// Creates a wrong-length sequence error.
    pub fn sequence_length(name: &'static str, expected: usize, found: usize) -> Self {
        TimbreError::SequenceLength {
            name,
            expected,
            found,
        }
    }

    /// Creates a non-finite value error.
    pub fn non_finite(name: &'static str, value: f64) -> Self {
        TimbreError::NonFinite { name, value }
    }

    /// Creates an unknown-preset error.
    pub fn unknown_preset(name: impl Into<String>) -> Self {
        TimbreError::UnknownPreset(name.into())
    }
}

/// Result type alias for timbre operations.
pub type TimbreResult<T> = Result<T, TimbreError>;
