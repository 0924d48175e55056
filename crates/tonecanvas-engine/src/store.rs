//! Per-color effect parameter registry.
//!
//! The registry is the single writable home of effect parameters. Every
//! change flows through [`EffectParameterStore::update`], which clamps the
//! value, then notifies the audio path, visual consumers (for modulation
//! effects), and the persistence checkpoint channel. Consumers always
//! receive the full parameter snapshot for the changed effect, never a
//! single field.
//!
//! Colors are registered lazily: the first read or write of a color
//! creates its entry, folding in any legacy per-timbre vibrato/tremolo
//! values registered beforehand.

use std::collections::HashMap;

use tonecanvas_timbre::{
    EffectKind, EffectParams, EffectSet, EffectUpdate, LegacyTimbreEffects, NoteColor,
};
use tracing::debug;

use crate::events::{AudioEffectChange, EventHub, StateCheckpoint, VisualEffectChange};

/// Registry of effect parameters keyed by note color.
#[derive(Debug, Default)]
pub struct EffectParameterStore {
    entries: HashMap<NoteColor, EffectSet>,
    legacy_seed: HashMap<NoteColor, LegacyTimbreEffects>,
}

impl EffectParameterStore {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores legacy per-timbre modulation values to seed a color's entry
    /// when it is first touched.
    ///
    /// Call while loading an old document, before any reads or writes for
    /// the color. Seeds registered after the entry exists are discarded on
    /// the next touch; live values always win over a stale document.
    pub fn register_legacy(&mut self, color: NoteColor, legacy: LegacyTimbreEffects) {
        self.legacy_seed.insert(color, legacy);
    }

    fn ensure_entry(&mut self, color: &NoteColor) -> &mut EffectSet {
        let seed = self.legacy_seed.remove(color);
        self.entries.entry(color.clone()).or_insert_with(|| {
            let mut set = EffectSet::default();
            if let Some(legacy) = seed {
                debug!(color = %color, "seeding effects from legacy timbre fields");
                set.vibrato = legacy.vibrato;
                set.tremolo = legacy.tremolo;
            }
            set
        })
    }

    /// Applies one field update and fans out notifications.
    ///
    /// The audio channel always fires. Visual and checkpoint channels fire
    /// only for the modulation effects; reverb and delay have no visual
    /// counterpart and no legacy document mirror.
    pub fn update(&mut self, color: &NoteColor, update: EffectUpdate, hub: &EventHub) {
        let set = self.ensure_entry(color);
        set.apply(update);

        let kind = update.kind();
        let params = set.params(kind);
        let legacy = LegacyTimbreEffects {
            vibrato: set.vibrato,
            tremolo: set.tremolo,
        };

        hub.audio_effect_changed.emit(&AudioEffectChange {
            color: color.clone(),
            params,
        });
        if kind.is_modulation() {
            hub.visual_effect_changed.emit(&VisualEffectChange {
                color: color.clone(),
                params,
            });
            hub.checkpoint.emit(&StateCheckpoint {
                color: color.clone(),
                legacy,
            });
        }
    }

    /// Snapshot of one effect's parameters, creating the entry if needed.
    pub fn params(&mut self, color: &NoteColor, kind: EffectKind) -> EffectParams {
        self.ensure_entry(color).params(kind)
    }

    /// All four parameter sets for a color, creating the entry if needed.
    pub fn effects(&mut self, color: &NoteColor) -> EffectSet {
        *self.ensure_entry(color)
    }

    /// Read-only view of a color's entry, without creating one.
    pub fn peek(&self, color: &NoteColor) -> Option<&EffectSet> {
        self.entries.get(color)
    }

    /// Colors with a live entry.
    pub fn colors(&self) -> impl Iterator<Item = &NoteColor> {
        self.entries.keys()
    }
}
