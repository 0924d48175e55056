//! Geometry for the live pitch-paint trail.
//!
//! Painting happens in musical time against a column grid whose columns
//! have independent widths in both microbeats and pixels. [`TimeMap`]
//! caches the cumulative timing of those columns for one tempo so the
//! per-frame playhead lookup is a cheap scan; [`PitchRange`] maps a
//! detected MIDI pitch onto the visible canvas. Both return `None` for
//! positions that should not be drawn.

/// Seconds per microbeat at the given tempo.
///
/// A microbeat is half an eighth note, so a tempo of 120 BPM yields
/// 0.25 s per microbeat. Tempo is floored at 1 BPM to keep the division
/// finite.
pub fn microbeat_duration(tempo: f64) -> f64 {
    30.0 / tempo.max(1.0)
}

/// One grid column as the paint layer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintColumn {
    /// Width in microbeats. Zero for columns that occupy pixels but no
    /// musical time, such as measure separators.
    pub microbeats: f64,
    /// Width in pixels.
    pub pixel_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeMapEntry {
    start_time: f64,
    duration: f64,
    x: f64,
    width: f64,
}

/// Cumulative column timing for one tempo.
///
/// Built whenever the tempo or the column layout changes and then reused
/// across frames. [`TimeMap::is_stale`] lets the holder detect a tempo
/// change without rebuilding eagerly.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeMap {
    tempo: f64,
    entries: Vec<TimeMapEntry>,
}

impl TimeMap {
    /// Accumulates start times and pixel offsets across the columns.
    pub fn build(tempo: f64, columns: &[PaintColumn]) -> Self {
        let microbeat = microbeat_duration(tempo);
        let mut entries = Vec::with_capacity(columns.len());
        let mut time = 0.0;
        let mut x = 0.0;
        for column in columns {
            let duration = column.microbeats * microbeat;
            entries.push(TimeMapEntry {
                start_time: time,
                duration,
                x,
                width: column.pixel_width,
            });
            time += duration;
            x += column.pixel_width;
        }
        TimeMap { tempo, entries }
    }

    /// Whether this map was built for a different tempo.
    pub fn is_stale(&self, tempo: f64) -> bool {
        self.tempo != tempo
    }

    /// Total musical length of the mapped columns in seconds.
    pub fn total_duration(&self) -> f64 {
        self.entries
            .last()
            .map(|entry| entry.start_time + entry.duration)
            .unwrap_or(0.0)
    }

    /// Pixel position of a musical time, interpolated within the
    /// containing column. `None` before the first column or at/past the
    /// end of the last one.
    ///
    /// A time on a column boundary belongs to the later column, so
    /// zero-duration columns are stepped over and the playhead jumps
    /// across their pixels.
    pub fn time_to_x(&self, time: f64) -> Option<f64> {
        for entry in &self.entries {
            if time >= entry.start_time && time < entry.start_time + entry.duration {
                let fraction = if entry.duration > 0.0 {
                    (time - entry.start_time) / entry.duration
                } else {
                    0.0
                };
                return Some(entry.x + fraction * entry.width);
            }
        }
        None
    }
}

/// Absolute MIDI bounds of the visible pitch rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchRange {
    /// MIDI number of the topmost visible row.
    pub top_midi: f64,
    /// MIDI number of the bottommost visible row.
    pub bottom_midi: f64,
}

impl PitchRange {
    pub fn new(top_midi: f64, bottom_midi: f64) -> Self {
        PitchRange {
            top_midi,
            bottom_midi,
        }
    }

    /// Canvas Y for a detected pitch, continuous between rows so a
    /// glissando paints a smooth curve.
    ///
    /// `None` means do not draw: the detector's no-pitch sentinel
    /// (`midi <= 0`), a non-finite value, a degenerate range or canvas,
    /// or a pitch whose position lands outside the canvas.
    pub fn midi_to_y(&self, midi: f64, canvas_height: f64) -> Option<f64> {
        if !midi.is_finite() || midi <= 0.0 {
            return None;
        }
        let span = self.top_midi - self.bottom_midi;
        if span <= 0.0 || canvas_height <= 0.0 {
            return None;
        }
        let normalized = (self.top_midi - midi) / span;
        let y = normalized * canvas_height;
        if y < 0.0 || y > canvas_height {
            return None;
        }
        Some(y)
    }
}
