//! Frame-rate gate between the animation tick and visual subscribers.
//!
//! The engine may be ticked faster than displays can usefully repaint,
//! so redraw notifications are throttled to 60 fps. The two channels
//! stay independent end to end: a color with only vibrato active never
//! produces an amplitude frame, and vice versa. Reset frames skip the
//! throttle entirely so the repaint that returns notes to rest is never
//! the one that gets dropped.

use crate::animation::{ChannelFrame, TickOutcome};
use crate::events::{AmplitudeFrame, EventHub, VibratoFrame};
use tonecanvas_timbre::NoteColor;

/// Minimum spacing between animation emissions, one 60 fps frame.
pub const MIN_EMIT_INTERVAL_SECONDS: f64 = 1.0 / 60.0;

/// Throttles animation frames on their way to the event hub.
#[derive(Debug, Default)]
pub struct VisualSyncDispatcher {
    last_emit: Option<f64>,
}

impl VisualSyncDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards a tick's frames to the hub, subject to the throttle.
    ///
    /// Animate-only outcomes are dropped when the previous emission was
    /// less than a frame ago. An outcome containing a reset always goes
    /// through, along with whatever the other channel produced this
    /// tick.
    pub fn dispatch(&mut self, outcome: &TickOutcome, hub: &EventHub, now: f64) {
        let has_reset = matches!(outcome.vibrato, ChannelFrame::Reset(_))
            || matches!(outcome.tremolo, ChannelFrame::Reset(_));
        if !has_reset {
            if outcome.is_idle() {
                return;
            }
            if let Some(last) = self.last_emit {
                if now - last < MIN_EMIT_INTERVAL_SECONDS {
                    return;
                }
            }
        }

        if let Some(colors) = frame_colors(&outcome.vibrato) {
            hub.vibrato_frame.emit(&VibratoFrame {
                colors: colors.to_vec(),
            });
        }
        if let Some(colors) = frame_colors(&outcome.tremolo) {
            hub.amplitude_frame.emit(&AmplitudeFrame {
                colors: colors.to_vec(),
            });
        }
        self.last_emit = Some(now);
    }
}

fn frame_colors(frame: &ChannelFrame) -> Option<&[NoteColor]> {
    match frame {
        ChannelFrame::Silent => None,
        ChannelFrame::Animate(colors) | ChannelFrame::Reset(colors) => Some(colors),
    }
}
