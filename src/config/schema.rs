use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/spinmix/config.toml` or
/// `~/.config/spinmix/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SPINMIX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub matching: MatchingSettings,
    pub fade: FadeSettings,
    pub library: LibrarySettings,
    pub cache: CacheSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            matching: MatchingSettings::default(),
            fade: FadeSettings::default(),
            library: LibrarySettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

/// Tempo matching and playlist allocation tuning.
///
/// The defaults are empirically chosen: they were carried over unchanged
/// from field use rather than derived, so treat them as a matched set.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    /// Tolerance around each harmonic target, as a percentage of the
    /// block cadence. A track tempo within `cadence * m ± tolerance * m`
    /// counts as a harmonic match for multiplier `m`.
    pub tolerance_percent: u32,
    /// Score penalty for a track whose tempo misses every harmonic but
    /// still sits within ±25% of the cadence itself.
    pub near_miss_penalty: u32,
    /// Score penalty for a track whose tempo is unrelated to the cadence.
    pub far_miss_penalty: u32,
    /// Candidates within this many points of the best score are "good
    /// enough" and drawn from at random during allocation.
    pub good_enough_margin: u32,
    /// Minimum leftover block time (seconds) worth filling with a clipped
    /// track. Shorter remainders are left as a silent gap.
    pub min_clip_seconds: u32,
    /// How many alternative tracks to precompute per playlist slot.
    pub max_alternatives: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            tolerance_percent: 25,
            near_miss_penalty: 30_000,
            far_miss_penalty: 35_000,
            good_enough_margin: 5,
            min_clip_seconds: 30,
            max_alternatives: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FadeSettings {
    /// Total fade duration when switching tracks (milliseconds),
    /// split evenly between fade-out and fade-in.
    /// Set to 0 to switch immediately.
    pub fade_duration_ms: u64,
    /// Interval between volume steps (milliseconds).
    pub fade_interval_ms: u64,
}

impl Default for FadeSettings {
    fn default() -> Self {
        Self {
            fade_duration_ms: 800,
            fade_interval_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether to consult and update the persistent tempo cache.
    pub enabled: bool,
    /// Cache file path. Defaults to
    /// `$XDG_CACHE_HOME/spinmix/tempos.toml` when unset.
    pub path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}
