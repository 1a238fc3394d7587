use crate::foundation::error::{HuesError, HuesResult};

/// Beat symbol that causes no transition.
pub const SUSTAIN: char = '.';

/// Ordered sequence of beat symbols spread evenly over a fixed duration.
///
/// Immutable after construction; one symbol occupies one beat slot.
#[derive(Clone, Debug, PartialEq)]
pub struct RhythmTrack {
    symbols: Vec<char>,
    duration_seconds: f64,
}

impl RhythmTrack {
    pub fn new(symbols: &str, duration_seconds: f64) -> HuesResult<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(HuesError::rhythm("track must contain at least one symbol"));
        }
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(HuesError::rhythm(format!(
                "track duration must be finite and > 0, got {duration_seconds}"
            )));
        }
        Ok(Self {
            symbols,
            duration_seconds,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`; empty tracks are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Symbol at `index`, taken modulo the track length.
    pub fn symbol(&self, index: usize) -> char {
        self.symbols[index % self.symbols.len()]
    }

    /// Fractional beat position for a local time within this track's cycle.
    pub fn raw_position(&self, t_local: f64) -> f64 {
        (t_local / self.duration_seconds).rem_euclid(1.0) * (self.len() as f64)
    }

    /// Elapsed seconds since the beat at `anchor_index` was crossed.
    ///
    /// Always in `[0, duration)`; wraps correctly across the loop boundary.
    pub fn phase_time(&self, raw_position: f64, anchor_index: usize) -> f64 {
        let len = self.len() as f64;
        (raw_position - anchor_index as f64).rem_euclid(len) / len * self.duration_seconds
    }

    /// Beat slots from `from_index` (exclusive) to the next non-sustain
    /// symbol, scanning cyclically through one extra full cycle.
    ///
    /// `None` means the track is all sustain.
    pub fn next_nonsustain_distance(&self, from_index: usize) -> Option<usize> {
        let len = self.len();
        (1..=len).find(|k| self.symbol(from_index + k) != SUSTAIN)
    }
}

/// Which rhythm track is currently driving playback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackPhase {
    Buildup,
    Loop,
}

/// An optional single-pass buildup track followed by an indefinitely
/// repeating loop track.
///
/// Once elapsed time exceeds the buildup duration the timeline is permanently
/// in loop phase; `phase_at` is pure in `t`, and `t` is strictly increasing
/// over a session.
#[derive(Clone, Debug)]
pub struct PlaybackTimeline {
    loop_track: RhythmTrack,
    buildup: Option<RhythmTrack>,
}

impl PlaybackTimeline {
    pub fn new(loop_track: RhythmTrack, buildup: Option<RhythmTrack>) -> Self {
        Self { loop_track, buildup }
    }

    pub fn buildup_duration(&self) -> f64 {
        self.buildup
            .as_ref()
            .map(RhythmTrack::duration_seconds)
            .unwrap_or(0.0)
    }

    pub fn loop_track(&self) -> &RhythmTrack {
        &self.loop_track
    }

    pub fn track(&self, phase: TrackPhase) -> &RhythmTrack {
        match phase {
            TrackPhase::Buildup => self.buildup.as_ref().unwrap_or(&self.loop_track),
            TrackPhase::Loop => &self.loop_track,
        }
    }

    /// Map absolute session time to the active phase and the local time
    /// within that phase's track.
    pub fn phase_at(&self, t: f64) -> (TrackPhase, f64) {
        let buildup_duration = self.buildup_duration();
        if t < buildup_duration {
            (TrackPhase::Buildup, t)
        } else {
            (TrackPhase::Loop, t - buildup_duration)
        }
    }

    /// Beat-length lookahead used to size color-change transitions.
    ///
    /// In loop phase the scan wraps cyclically; in buildup phase it runs off
    /// the end of the buildup track and continues into the loop track instead
    /// of wrapping. `None` means every scanned slot is sustain.
    pub fn next_nonsustain_distance(
        &self,
        phase: TrackPhase,
        from_index: usize,
    ) -> Option<usize> {
        match (phase, &self.buildup) {
            (TrackPhase::Buildup, Some(buildup)) => {
                let tail = &buildup.symbols()[(from_index + 1).min(buildup.len())..];
                tail.iter()
                    .chain(self.loop_track.symbols())
                    .position(|&s| s != SUSTAIN)
                    .map(|p| p + 1)
            }
            _ => self.loop_track.next_nonsustain_distance(from_index),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/rhythm/track.rs"]
mod tests;
