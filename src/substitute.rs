//! Live track substitution with cadence-aware round-robin.
//!
//! One `Substituter` is created per generated playlist and owns a small
//! amount of session state: a memoized tempo ranking per cadence value,
//! a rotating cursor per cadence, and the set of track ids currently
//! scheduled anywhere in the live playlist. Repeated substitution
//! requests for the same cadence walk the ranked pool in a stable cycle,
//! which gives predictable "next best" behavior, deliberately different
//! from the allocator's randomized initial placement.
//!
//! Not designed for concurrent callers; a playback session issues one
//! substitution at a time.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::MatchingSettings;
use crate::library::{TempoMap, Track};
use crate::matcher;
use crate::playlist::GeneratedPlaylist;

/// A substitution result: the replacement track and its tempo estimate,
/// ready for immediate display.
#[derive(Debug, Clone)]
pub struct Substitution {
    pub track: Track,
    pub tempo: Option<u32>,
}

/// Aggregate substitution counters for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionStats {
    pub total: u32,
    /// `(track_id, count)` of the most-substituted-in track, if any.
    pub most_used: Option<(String, u32)>,
}

/// Cadence-aware substitution engine over a fixed track pool.
pub struct Substituter {
    pool: Vec<Track>,
    tempos: TempoMap,
    settings: MatchingSettings,
    /// Cadence -> full pool sorted by tempo score, built lazily and
    /// reused; the same cadence recurs across many blocks.
    rank_cache: HashMap<u32, Vec<Track>>,
    /// Cadence -> next position to consider in its ranked list.
    cursors: HashMap<u32, usize>,
    /// Cursor for cadence-less substitutions over the unranked pool.
    global_cursor: usize,
    usage: HashMap<String, u32>,
    in_playlist: HashSet<String>,
}

impl Substituter {
    pub fn new(pool: Vec<Track>, tempos: TempoMap, settings: MatchingSettings) -> Self {
        Self {
            pool,
            tempos,
            settings,
            rank_cache: HashMap::new(),
            cursors: HashMap::new(),
            global_cursor: 0,
            usage: HashMap::new(),
            in_playlist: HashSet::new(),
        }
    }

    /// Build a substituter for a live playlist, seeding the pool, tempo
    /// map and in-use id set from it.
    pub fn for_playlist(playlist: &GeneratedPlaylist, settings: MatchingSettings) -> Self {
        let mut sub = Self::new(playlist.source_tracks.clone(), playlist.tempos.clone(), settings);
        sub.in_playlist = playlist.track_ids();
        sub
    }

    /// Refresh the set of track ids currently scheduled in the playlist.
    /// Callers do this after every accepted substitution.
    pub fn set_playlist_tracks(&mut self, ids: impl IntoIterator<Item = String>) {
        self.in_playlist = ids.into_iter().collect();
        debug!("playlist now holds {} distinct tracks", self.in_playlist.len());
    }

    /// Next replacement for `current` at the given cadence.
    ///
    /// With a cadence, this scans the cadence's ranked pool from its
    /// rotating cursor for the first track that is neither `current` nor
    /// scheduled elsewhere in the playlist. If the scan wraps the whole
    /// list without finding one, the last-examined candidate is returned
    /// anyway: a user-initiated substitution never fails, duplicates are
    /// the explicit overflow policy. Without a cadence, a single global
    /// round-robin over the unranked pool is used.
    pub fn substitute(&mut self, current: &Track, cadence: Option<u32>) -> Substitution {
        if self.pool.is_empty() {
            warn!("substitution requested against an empty pool, keeping current");
            return Substitution {
                track: current.clone(),
                tempo: self.tempos.get(&current.id),
            };
        }

        let Some(cadence) = cadence else {
            return self.next_round_robin();
        };

        self.ensure_ranked(cadence);
        let ranked = &self.rank_cache[&cadence];

        let mut index = self.cursors.get(&cadence).copied().unwrap_or(0) % ranked.len();
        let mut attempts = 0;
        while (ranked[index].id == current.id || self.in_playlist.contains(&ranked[index].id))
            && attempts < ranked.len()
        {
            index = (index + 1) % ranked.len();
            attempts += 1;
        }

        let track = ranked[index].clone();
        self.cursors.insert(cadence, (index + 1) % ranked.len());
        *self.usage.entry(track.id.clone()).or_insert(0) += 1;

        debug!(
            "substituting '{}' with '{}' for cadence {} ({:?} BPM)",
            current.display(),
            track.display(),
            cadence,
            self.tempos.get(&track.id)
        );
        if track.id == current.id || self.in_playlist.contains(&track.id) {
            warn!("pool smaller than playlist, accepting duplicate '{}'", track.display());
        }

        let tempo = self.tempos.get(&track.id);
        Substitution { track, tempo }
    }

    /// Session counters for display.
    pub fn stats(&self) -> SubstitutionStats {
        SubstitutionStats {
            total: self.usage.values().sum(),
            most_used: self
                .usage
                .iter()
                .max_by_key(|&(_, count)| *count)
                .map(|(id, count)| (id.clone(), *count)),
        }
    }

    /// Drop all session state for a fresh playlist.
    pub fn reset(&mut self) {
        self.rank_cache.clear();
        self.cursors.clear();
        self.global_cursor = 0;
        self.usage.clear();
        self.in_playlist.clear();
        debug!("substitution state reset");
    }

    fn ensure_ranked(&mut self, cadence: u32) {
        if self.rank_cache.contains_key(&cadence) {
            return;
        }
        debug!("ranking {} tracks for cadence {cadence} RPM", self.pool.len());
        let mut sorted = self.pool.clone();
        sorted.sort_by_key(|t| matcher::score(self.tempos.get(&t.id), cadence, &self.settings));
        self.rank_cache.insert(cadence, sorted);
    }

    fn next_round_robin(&mut self) -> Substitution {
        // Cadence-less slots cycle the pool in its natural order; there
        // is no ranking to respect. Callers guarantee a non-empty pool.
        let index = self.global_cursor % self.pool.len();
        let track = self.pool[index].clone();
        self.global_cursor = (index + 1) % self.pool.len();
        *self.usage.entry(track.id.clone()).or_insert(0) += 1;
        let tempo = self.tempos.get(&track.id);
        Substitution { track, tempo }
    }
}
