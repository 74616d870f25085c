use std::collections::HashSet;
use std::fmt;

use crate::library::{TempoMap, Track};

/// One scheduled track placement within the generated playlist.
///
/// Offsets are workout-global seconds. The slot is "clipped" when
/// `end_seconds - start_seconds` is strictly less than the track's full
/// duration; `clip_end` then gives the playable span (from `clip_start`,
/// always 0).
#[derive(Debug, Clone)]
pub struct PlaylistSlot {
    pub track: Track,
    pub start_seconds: u32,
    pub end_seconds: u32,
    pub clip_start: u32,
    pub clip_end: u32,
    /// Up to a handful of tempo-ranked alternatives, precomputed for the
    /// substitution UI. Never contains the placed track itself.
    pub alternatives: Vec<Track>,
}

impl PlaylistSlot {
    /// Scheduled playing time of this slot in seconds.
    pub fn duration_seconds(&self) -> u32 {
        self.end_seconds - self.start_seconds
    }

    pub fn is_clipped(&self) -> bool {
        self.duration_seconds() < self.track.duration_seconds
    }
}

/// Degraded-but-successful decisions taken during generation.
///
/// These never abort generation; they are returned so callers can warn
/// the rider instead of silently playing a worse playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A placed track had no usable tempo estimate for a cadence block.
    UnknownTempo { block: usize, track_id: String },
    /// Every pool track was already used when the block started; reuse
    /// across blocks was permitted.
    PoolExhausted { block: usize },
    /// The block ran out of fresh candidates mid-fill and re-admitted
    /// already-placed tracks to stay gapless.
    ForcedReuse { block: usize },
    /// Nothing could fill the block's tail; the playlist has a silent gap.
    UnfilledGap { block: usize, seconds: u32 },
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::UnknownTempo { block, track_id } => {
                write!(f, "block {}: placed '{}' without tempo data", block + 1, track_id)
            }
            Fallback::PoolExhausted { block } => {
                write!(f, "block {}: all tracks already used, allowing reuse", block + 1)
            }
            Fallback::ForcedReuse { block } => {
                write!(f, "block {}: ran out of fresh tracks, reusing earlier picks", block + 1)
            }
            Fallback::UnfilledGap { block, seconds } => {
                write!(f, "block {}: {}s left unfilled (silent gap)", block + 1, seconds)
            }
        }
    }
}

/// The generated playlist: ordered slots covering the workout, plus the
/// source pool and tempo map retained for later substitution.
#[derive(Debug, Clone)]
pub struct GeneratedPlaylist {
    pub slots: Vec<PlaylistSlot>,
    /// Total workout duration in seconds (sum of block durations).
    pub total_duration: u32,
    pub workout_id: String,
    pub workout_name: String,
    pub source_tracks: Vec<Track>,
    pub tempos: TempoMap,
    /// Degraded decisions taken while generating, in block order.
    pub fallbacks: Vec<Fallback>,
}

impl GeneratedPlaylist {
    /// Ids of every track currently scheduled, for duplicate avoidance
    /// during substitution.
    pub fn track_ids(&self) -> HashSet<String> {
        self.slots.iter().map(|s| s.track.id.clone()).collect()
    }

    /// Swap the track at `slot_index`, leaving offsets untouched. This is
    /// the only mutation a live playlist sees.
    pub fn replace_track(&mut self, slot_index: usize, track: Track) {
        if let Some(slot) = self.slots.get_mut(slot_index) {
            slot.track = track;
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}
