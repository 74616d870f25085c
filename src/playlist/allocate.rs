use std::collections::HashSet;

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::config::MatchingSettings;
use crate::error::Error;
use crate::library::{TempoMap, Track};
use crate::matcher;
use crate::workout::Workout;

use super::model::{Fallback, GeneratedPlaylist, PlaylistSlot};

/// Generate a playlist for `workout` from the given pool.
///
/// Per block: the entire pool is ranked by tempo score against the
/// block's cadence (blocks without a cadence keep pool order, unscored),
/// tracks used by earlier blocks are filtered out where possible, and the
/// block's duration is filled by repeatedly drawing from the "good
/// enough" candidates at random. A track that fits whole is placed whole;
/// otherwise, a remainder of at least `min_clip_seconds` gets the track
/// clipped to exactly close the block, and anything shorter discards the
/// candidate.
///
/// Fails only on structurally malformed workouts. Every shortage of
/// eligible tracks degrades instead: reuse across blocks, mid-block
/// reuse, or (for sub-clip remainders) a silent gap, each recorded in
/// [`GeneratedPlaylist::fallbacks`].
///
/// The randomized tie-break keeps repeated generations of the same
/// workout from being identical; pass a seeded RNG for reproducibility.
pub fn generate(
    workout: &Workout,
    pool: &[Track],
    tempos: &TempoMap,
    settings: &MatchingSettings,
    rng: &mut impl Rng,
) -> Result<GeneratedPlaylist, Error> {
    workout.validate()?;

    let mut slots: Vec<PlaylistSlot> = Vec::new();
    let mut fallbacks: Vec<Fallback> = Vec::new();
    let mut used: HashSet<&str> = HashSet::new();
    let mut block_start: u32 = 0;

    for (block_index, block) in workout.blocks.iter().enumerate() {
        let cadence = block.cadence();
        debug!(
            "block {}: {}s {} at {:?} RPM",
            block_index + 1,
            block.duration_seconds(),
            block.kind_name(),
            cadence
        );

        // Rank the entire pool rather than filtering: even poor matches
        // stay eligible, just last. Zero-length tracks can never fill
        // time and are dropped here.
        let mut ranked: Vec<(&Track, u32)> = pool
            .iter()
            .filter(|t| t.duration_seconds > 0)
            .map(|t| {
                let track_score = match cadence {
                    Some(c) => matcher::score(tempos.get(&t.id), c, settings),
                    None => 0,
                };
                (t, track_score)
            })
            .collect();
        if cadence.is_some() {
            // Stable sort keeps pool order among equal scores.
            ranked.sort_by_key(|&(_, s)| s);
        }

        let mut candidates: Vec<(&Track, u32)> = ranked
            .iter()
            .copied()
            .filter(|(t, _)| !used.contains(t.id.as_str()))
            .collect();
        if candidates.is_empty() && !ranked.is_empty() {
            warn!(
                "block {}: all {} tracks already used, allowing reuse",
                block_index + 1,
                ranked.len()
            );
            fallbacks.push(Fallback::PoolExhausted { block: block_index });
            candidates = ranked.clone();
        }

        let mut remaining = block.duration_seconds();
        let mut cursor = block_start;
        let mut placed_here: HashSet<&str> = HashSet::new();
        let mut reuse_announced = false;

        while remaining > 0 {
            if candidates.is_empty() {
                if remaining >= settings.min_clip_seconds && !ranked.is_empty() {
                    // Re-admit tracks to stay gapless, preferring ones
                    // not already placed in this very block.
                    let refill: Vec<(&Track, u32)> = ranked
                        .iter()
                        .copied()
                        .filter(|(t, _)| !placed_here.contains(t.id.as_str()))
                        .collect();
                    candidates = if refill.is_empty() { ranked.clone() } else { refill };
                    if !reuse_announced {
                        warn!(
                            "block {}: ran out of fresh tracks with {}s left, reusing",
                            block_index + 1,
                            remaining
                        );
                        fallbacks.push(Fallback::ForcedReuse { block: block_index });
                        reuse_announced = true;
                    }
                    continue;
                }

                warn!(
                    "block {}: leaving {}s unfilled (silent gap)",
                    block_index + 1,
                    remaining
                );
                fallbacks.push(Fallback::UnfilledGap {
                    block: block_index,
                    seconds: remaining,
                });
                break;
            }

            // Randomized-within-tolerance selection: draw uniformly among
            // every candidate within the good-enough margin of the best
            // score, so repeated generations vary.
            let Some(best) = candidates.iter().map(|&(_, s)| s).min() else {
                break;
            };
            let good_enough: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|&(_, &(_, s))| s <= best.saturating_add(settings.good_enough_margin))
                .map(|(i, _)| i)
                .collect();
            let pick = good_enough
                .choose(rng)
                .copied()
                .unwrap_or_else(|| rng.random_range(0..candidates.len()));
            let (track, track_score) = candidates.remove(pick);

            if track.duration_seconds <= remaining {
                let alternatives = top_alternatives(&candidates, settings.max_alternatives);
                debug!(
                    "  placed '{}' whole ({}s, score {})",
                    track.display(),
                    track.duration_seconds,
                    track_score
                );
                slots.push(PlaylistSlot {
                    track: track.clone(),
                    start_seconds: cursor,
                    end_seconds: cursor + track.duration_seconds,
                    clip_start: 0,
                    clip_end: track.duration_seconds,
                    alternatives,
                });
                if cadence.is_some() && tempos.get(&track.id).is_none() {
                    fallbacks.push(Fallback::UnknownTempo {
                        block: block_index,
                        track_id: track.id.clone(),
                    });
                }
                cursor += track.duration_seconds;
                remaining -= track.duration_seconds;
                placed_here.insert(track.id.as_str());
            } else if remaining >= settings.min_clip_seconds {
                let alternatives = top_alternatives(&candidates, settings.max_alternatives);
                debug!(
                    "  placed '{}' clipped to {}s (score {})",
                    track.display(),
                    remaining,
                    track_score
                );
                slots.push(PlaylistSlot {
                    track: track.clone(),
                    start_seconds: cursor,
                    end_seconds: cursor + remaining,
                    clip_start: 0,
                    clip_end: remaining,
                    alternatives,
                });
                if cadence.is_some() && tempos.get(&track.id).is_none() {
                    fallbacks.push(Fallback::UnknownTempo {
                        block: block_index,
                        track_id: track.id.clone(),
                    });
                }
                cursor += remaining;
                remaining = 0;
                placed_here.insert(track.id.as_str());
            }
            // Too short a remainder to be worth a clip: the candidate is
            // dropped and the next one gets a look.
        }

        used.extend(placed_here);
        block_start += block.duration_seconds();
    }

    Ok(GeneratedPlaylist {
        slots,
        total_duration: workout.total_duration(),
        workout_id: workout.id.clone(),
        workout_name: workout.name.clone(),
        source_tracks: pool.to_vec(),
        tempos: tempos.clone(),
        fallbacks,
    })
}

/// The next-best candidates in ranked order, for the slot's substitution
/// shortlist. The placed track has already been removed from `candidates`.
fn top_alternatives(candidates: &[(&Track, u32)], max: usize) -> Vec<Track> {
    candidates.iter().take(max).map(|(t, _)| (*t).clone()).collect()
}
