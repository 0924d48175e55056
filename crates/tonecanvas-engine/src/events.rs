//! Typed event channels between the engine and its consumers.
//!
//! Every notification the engine produces travels over one of the named
//! channels on [`EventHub`]; there is no string-keyed event bus. Each
//! channel carries exactly one payload type, so a subscriber can never
//! receive a shape it did not ask for.
//!
//! Channels tolerate re-entrancy: a callback may subscribe or unsubscribe
//! (itself included) while an emit is in flight. Unsubscription takes
//! effect immediately in the sense that the retired callback is never
//! invoked again, even within the same emit.

use std::cell::{Cell, RefCell};
use std::fmt;

use tonecanvas_timbre::{EffectParams, LegacyTimbreEffects, NoteColor};

/// Handle returned by [`Channel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry<T> {
    id: u64,
    callback: Box<dyn FnMut(&T)>,
}

/// A single-payload-type broadcast channel.
pub struct Channel<T> {
    entries: RefCell<Vec<Entry<T>>>,
    retired: RefCell<Vec<u64>>,
    next_id: Cell<u64>,
}

impl<T> Default for Channel<T> {
    fn default() -> Self {
        Channel {
            entries: RefCell::new(Vec::new()),
            retired: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.entries.borrow().len())
            .finish()
    }
}

impl<T> Channel<T> {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for every future emit on this channel.
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            callback: Box::new(callback),
        });
        Subscription(id)
    }

    /// Retires a callback.
    ///
    /// The callback will not run again, including for the remainder of an
    /// emit currently in flight. Retiring an already-retired subscription
    /// is a no-op.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.retired.borrow_mut().push(subscription.0);
    }

    /// Delivers `payload` to every live subscriber.
    ///
    /// Subscribers added during the emit see only later emits. A nested
    /// emit on the same channel from inside a callback delivers to no one;
    /// the engine never nests same-channel emits.
    pub fn emit(&self, payload: &T) {
        let mut active = self.entries.take();
        for entry in active.iter_mut() {
            let skip = self.retired.borrow().iter().any(|&id| id == entry.id);
            if skip {
                continue;
            }
            (entry.callback)(payload);
        }

        // Fold in subscriptions and retirements made by the callbacks.
        let late = self.entries.take();
        active.extend(late);
        let retired = self.retired.take();
        if !retired.is_empty() {
            active.retain(|entry| !retired.contains(&entry.id));
        }
        *self.entries.borrow_mut() = active;
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let live = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| !self.retired.borrow().contains(&entry.id))
            .count();
        live
    }
}

/// An effect parameter change bound for the audio path.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEffectChange {
    /// Color whose parameters changed.
    pub color: NoteColor,
    /// Full snapshot of the changed effect's parameters.
    pub params: EffectParams,
}

/// An effect parameter change bound for visual consumers.
///
/// Emitted only for the modulation effects (vibrato and tremolo); reverb
/// and delay have no visual counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEffectChange {
    /// Color whose parameters changed.
    pub color: NoteColor,
    /// Full snapshot of the changed effect's parameters.
    pub params: EffectParams,
}

/// Animation frame naming the colors whose note positions need repainting.
#[derive(Debug, Clone, PartialEq)]
pub struct VibratoFrame {
    /// Colors to repaint. While animating these carry live offsets; the
    /// final frame after vibrato stops carries the same colors one last
    /// time so painters restore their rest positions.
    pub colors: Vec<NoteColor>,
}

/// Animation frame naming the colors whose note brightness needs repainting.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeFrame {
    /// Colors to repaint. The final frame after tremolo stops carries the
    /// same colors one last time so painters restore full brightness.
    pub colors: Vec<NoteColor>,
}

/// Persistence checkpoint carrying the legacy per-timbre mirror of the
/// modulation effects for one color.
#[derive(Debug, Clone, PartialEq)]
pub struct StateCheckpoint {
    /// Color whose legacy mirror changed.
    pub color: NoteColor,
    /// Vibrato/tremolo values in the historical document shape.
    pub legacy: LegacyTimbreEffects,
}

/// All engine notification channels.
#[derive(Debug, Default)]
pub struct EventHub {
    /// Parameter changes for the audio path (all four effect types).
    pub audio_effect_changed: Channel<AudioEffectChange>,
    /// Parameter changes for visual consumers (modulation effects only).
    pub visual_effect_changed: Channel<VisualEffectChange>,
    /// Per-frame vibrato repaint requests.
    pub vibrato_frame: Channel<VibratoFrame>,
    /// Per-frame tremolo brightness repaint requests.
    pub amplitude_frame: Channel<AmplitudeFrame>,
    /// Legacy-shape persistence checkpoints.
    pub checkpoint: Channel<StateCheckpoint>,
}

impl EventHub {
    /// Creates a hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }
}
