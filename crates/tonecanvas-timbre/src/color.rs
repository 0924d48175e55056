//! Note color keys.
//!
//! Every timbre, effect parameter set, and animation entry is keyed by the
//! color of the notes it belongs to. Colors are persisted as CSS hex
//! strings, so the key type wraps the string form directly.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The stock palette: blue, black, red, green.
pub const DEFAULT_PALETTE: [&str; 4] = ["#4a90e2", "#2d2d2d", "#d66573", "#68a03f"];

/// Identifier for one of the editor's note colors (e.g. `"#4a90e2"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteColor(String);

impl NoteColor {
    /// Creates a color key from its persisted string form.
    pub fn new(key: impl Into<String>) -> Self {
        NoteColor(key.into())
    }

    /// The persisted string form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The stock palette as owned keys.
    pub fn stock_palette() -> [NoteColor; 4] {
        DEFAULT_PALETTE.map(NoteColor::new)
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for NoteColor {
    fn from(key: &str) -> Self {
        NoteColor::new(key)
    }
}
