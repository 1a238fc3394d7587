use crate::rhythm::track::{RhythmTrack, SUSTAIN};

/// Beat bookkeeping for the active effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatCursor {
    /// Current beat, 0-indexed into the active track modulo its length.
    pub active_index: usize,
    /// Beat index at which the displayed effect's local clock was zeroed.
    pub anchor_index: usize,
}

/// A beat-symbol crossing reported by [`BeatMachine::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeatEvent {
    pub index: usize,
    pub symbol: char,
}

/// Converts continuous playback time into discrete beat-crossing events.
///
/// The cursor is lazily initialized: the first update adopts the floor of the
/// raw position as both active and anchor index and always fires, even for a
/// sustain symbol, so the initial animation gets bootstrapped. Afterwards the
/// machine scans every beat slot crossed since the previous call, skipping
/// sustains; when several non-sustain slots fall inside one frame only the
/// last one is dispatched.
#[derive(Clone, Debug, Default)]
pub struct BeatMachine {
    cursor: Option<BeatCursor>,
}

impl BeatMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<BeatCursor> {
        self.cursor
    }

    /// Anchor index, or 0 before the first update.
    pub fn anchor_index(&self) -> usize {
        self.cursor.map(|c| c.anchor_index).unwrap_or(0)
    }

    /// Zero the effect clock at the current active beat.
    ///
    /// Called by the session when a transition replaces or recolors the
    /// active effect; no-op before the first update.
    pub fn re_anchor(&mut self) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.anchor_index = cursor.active_index;
        }
    }

    /// Advance to `raw_position` on `track`, reporting the latest non-sustain
    /// crossing if any beat fired since the previous call.
    pub fn update(&mut self, track: &RhythmTrack, raw_position: f64) -> Option<BeatEvent> {
        let len = track.len();
        let j = (raw_position.floor().max(0.0) as usize) % len;

        let Some(cursor) = self.cursor.as_mut() else {
            self.cursor = Some(BeatCursor {
                active_index: j,
                anchor_index: j,
            });
            return Some(BeatEvent {
                index: j,
                symbol: track.symbol(j),
            });
        };

        let i_prev = cursor.active_index;
        // Wrapped around the cyclic boundary; shift so the scan range runs
        // forward exactly once per loop.
        let j_end = if j < i_prev { j + len } else { j };

        let mut fired = None;
        for k in (i_prev + 1)..=j_end {
            let idx = k % len;
            if track.symbol(idx) != SUSTAIN {
                cursor.active_index = idx;
                fired = Some(BeatEvent {
                    index: idx,
                    symbol: track.symbol(idx),
                });
            }
        }

        if let Some(event) = fired {
            tracing::debug!(index = event.index, symbol = %event.symbol, "beat crossed");
        }
        fired
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rhythm/beat.rs"]
mod tests;
