//! Note activity bookkeeping.
//!
//! Tracks which notes are sounding, being dragged, previewed as a ghost,
//! or auditioned, plus transport state. The animation gates read this to
//! decide whether the oscillators run at all, and per-note eligibility
//! reads it to decide which notes follow them.

use std::collections::HashMap;
use std::fmt;

use tonecanvas_timbre::NoteColor;

/// Identifier of a placed note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NoteId(String);

impl NoteId {
    /// Wraps a host-assigned note identifier.
    pub fn new(id: impl Into<String>) -> Self {
        NoteId(id.into())
    }

    /// The identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        NoteId::new(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Live note and transport state feeding the animation gates.
#[derive(Debug, Clone, Default)]
pub struct NoteActivity {
    sounding: HashMap<NoteId, NoteColor>,
    interacting: HashMap<NoteId, NoteColor>,
    ghost: Option<NoteColor>,
    dial: Option<NoteColor>,
    audition: Option<NoteColor>,
    playback_active: bool,
}

impl NoteActivity {
    /// Creates an all-quiet state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A note started sounding.
    pub fn note_attack(&mut self, id: NoteId, color: NoteColor) {
        self.sounding.insert(id, color);
    }

    /// A note stopped sounding.
    pub fn note_release(&mut self, id: &NoteId) {
        self.sounding.remove(id);
    }

    /// The user grabbed a note (drag or resize).
    pub fn interaction_start(&mut self, id: NoteId, color: NoteColor) {
        self.interacting.insert(id, color);
    }

    /// The user let go of a note.
    pub fn interaction_end(&mut self, id: &NoteId) {
        self.interacting.remove(id);
    }

    /// The placement ghost moved to (or appeared in) a color.
    pub fn ghost_update(&mut self, color: NoteColor) {
        self.ghost = Some(color);
    }

    /// The placement ghost left the canvas.
    pub fn ghost_clear(&mut self) {
        self.ghost = None;
    }

    /// An effect dial drag started for a color.
    pub fn dial_start(&mut self, color: NoteColor) {
        self.dial = Some(color);
    }

    /// The effect dial drag ended.
    pub fn dial_end(&mut self) {
        self.dial = None;
    }

    /// Spacebar audition tone started or stopped for a color.
    pub fn set_audition(&mut self, color: Option<NoteColor>) {
        self.audition = color;
    }

    /// Transport state changed.
    ///
    /// Stopping clears the sounding set: scheduled releases stop arriving
    /// once the transport halts, so entries would otherwise go stale.
    pub fn set_playback(&mut self, active: bool) {
        self.playback_active = active;
        if !active {
            self.sounding.clear();
        }
    }

    /// Whether the transport is running.
    pub fn playback_active(&self) -> bool {
        self.playback_active
    }

    /// Whether anything is producing sound right now, the audition tone
    /// included.
    pub fn has_sounding(&self) -> bool {
        !self.sounding.is_empty() || self.audition.is_some()
    }

    /// Whether any note is being dragged or resized.
    pub fn is_interacting(&self) -> bool {
        !self.interacting.is_empty()
    }

    /// Whether an effect dial drag is in flight.
    pub fn is_dialing(&self) -> bool {
        self.dial.is_some()
    }

    /// Color under dial preview, if any.
    pub fn dial_color(&self) -> Option<&NoteColor> {
        self.dial.as_ref()
    }

    /// Color of the placement ghost, if any.
    pub fn ghost_color(&self) -> Option<&NoteColor> {
        self.ghost.as_ref()
    }

    /// Whether this placed note is sounding.
    pub fn sounding_contains(&self, id: &NoteId) -> bool {
        self.sounding.contains_key(id)
    }

    /// Whether this placed note is being dragged or resized.
    pub fn interacting_contains(&self, id: &NoteId) -> bool {
        self.interacting.contains_key(id)
    }
}
