//! Tempo matching: score a track tempo against a block cadence.
//!
//! Riders count pedal revolutions, not beats, so a 150 BPM song is exactly
//! as rideable at 75 RPM as a 75 BPM song. The scorer therefore treats
//! integer harmonics of the cadence as equally valid targets and must not
//! be fooled into preferring lower multiples.

use crate::config::MatchingSettings;

/// Harmonic multipliers considered when matching tempo to cadence.
pub const HARMONIC_MULTIPLIERS: [u32; 4] = [1, 2, 3, 4];

/// Score returned when a track has no usable tempo estimate. Large enough
/// to rank below every real match and every fallback, but not excluding:
/// tempo-less tracks still get placed when nothing better remains.
pub const UNKNOWN_TEMPO_SCORE: u32 = u32::MAX / 2;

/// Match quality of `tempo` against `target_cadence`, lower is better.
///
/// For each multiplier `m` in 1x-4x, a tempo within
/// `cadence*m ± tolerance*m` is a harmonic match scoring its plain
/// distance to `cadence*m`; the best such distance wins, with no penalty
/// for which multiplier matched. When no harmonic matches, the distance to
/// the cadence itself is returned plus one of two penalty tiers, so
/// near-misses still outrank wildly unrelated tempos and any harmonic
/// match outranks any fallback.
pub fn score(tempo: Option<u32>, target_cadence: u32, settings: &MatchingSettings) -> u32 {
    let Some(bpm) = tempo else {
        return UNKNOWN_TEMPO_SCORE;
    };

    let tolerance = target_cadence * settings.tolerance_percent / 100;
    let mut best: Option<u32> = None;

    for multiplier in HARMONIC_MULTIPLIERS {
        let target_bpm = target_cadence * multiplier;
        let match_tolerance = tolerance * multiplier;
        let distance = bpm.abs_diff(target_bpm);

        if distance <= match_tolerance && best.is_none_or(|b| distance < b) {
            best = Some(distance);
        }
    }

    if let Some(distance) = best {
        return distance;
    }

    // No harmonic matched: penalized fallback on raw distance to the
    // cadence, with a lighter tier for tempos within ±25% of the cadence.
    let distance = bpm.abs_diff(target_cadence);
    if bpm >= target_cadence * 75 / 100 && bpm <= target_cadence * 125 / 100 {
        distance + settings.near_miss_penalty
    } else {
        distance + settings.far_miss_penalty
    }
}
