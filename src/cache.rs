//! Persistent tempo cache.
//!
//! Tempo estimates come from outside the crate (tagging tools, analysis
//! services) and are expensive to recompute, so they are cached on disk
//! across runs as a small TOML file. Entries are keyed by
//! `"artist|title"` rather than file path, which keeps estimates valid
//! when a library is moved or re-ripped. A negative BPM records a known
//! lookup miss so the same track is not re-queried every session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::CacheSettings;
use crate::error::Error;
use crate::library::{TempoMap, Track};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempoCache {
    /// `"artist|title"` -> BPM. Negative marks a known miss.
    #[serde(default)]
    tempos: BTreeMap<String, i32>,
}

impl TempoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a track: lowercased `"artist|title"`, so tag case
    /// differences between rips do not split entries.
    pub fn key_for(track: &Track) -> String {
        let artist = track.artist.as_deref().unwrap_or("").trim().to_lowercase();
        format!("{}|{}", artist, track.name.trim().to_lowercase())
    }

    /// Load the cache from `path`. A missing file is an empty cache, not
    /// an error; a present-but-unreadable file is.
    pub fn load(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            debug!("no tempo cache at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)?;
        let cache: Self = toml::from_str(&raw).map_err(|e| Error::Cache {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("loaded {} cached tempos from {}", cache.tempos.len(), path.display());
        Ok(cache)
    }

    /// Write the cache to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string(self).map_err(|e| Error::Cache {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, raw)?;
        debug!("saved {} tempos to {}", self.tempos.len(), path.display());
        Ok(())
    }

    /// Raw cached value for a track, including negative miss markers.
    pub fn get(&self, track: &Track) -> Option<i32> {
        self.tempos.get(&Self::key_for(track)).copied()
    }

    pub fn contains(&self, track: &Track) -> bool {
        self.tempos.contains_key(&Self::key_for(track))
    }

    /// Record an estimate for a track. Negative marks a known miss.
    pub fn record(&mut self, track: &Track, bpm: i32) {
        self.tempos.insert(Self::key_for(track), bpm);
    }

    /// Copy cached estimates into `tempos` for every track in `tracks`
    /// that has an entry. Miss markers are copied too, so the tempo map
    /// distinguishes "looked up, nothing found" from "never looked up".
    /// Returns how many tracks were covered.
    pub fn apply(&self, tracks: &[Track], tempos: &mut TempoMap) -> usize {
        let mut applied = 0;
        for track in tracks {
            if let Some(bpm) = self.get(track) {
                tempos.insert(track.id.clone(), bpm);
                applied += 1;
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.tempos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tempos.is_empty()
    }
}

/// Cache path from settings, or the XDG default when unset. `None` only
/// when the cache is disabled or no home directory can be determined.
pub fn resolve_cache_path(settings: &CacheSettings) -> Option<PathBuf> {
    if !settings.enabled {
        return None;
    }
    if let Some(path) = &settings.path {
        return Some(path.clone());
    }
    let path = default_cache_path();
    if path.is_none() {
        warn!("no cache path configured and no home directory found, cache disabled");
    }
    path
}

/// `$XDG_CACHE_HOME/spinmix/tempos.toml`, or `~/.cache/spinmix/tempos.toml`
/// when `XDG_CACHE_HOME` is not set.
pub fn default_cache_path() -> Option<PathBuf> {
    let cache_home = if let Some(xdg) = env::var_os("XDG_CACHE_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".cache"))
    } else {
        None
    };

    cache_home.map(|d| d.join("spinmix").join("tempos.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(artist: Option<&str>, name: &str) -> Track {
        Track {
            id: format!("/music/{name}.mp3"),
            name: name.into(),
            artist: artist.map(Into::into),
            duration_seconds: 200,
            uri: format!("file:///music/{name}.mp3"),
        }
    }

    #[test]
    fn keys_are_case_and_whitespace_insensitive() {
        let a = track(Some("The Band"), "Song One");
        let b = track(Some("  the band "), "song one");
        assert_eq!(TempoCache::key_for(&a), TempoCache::key_for(&b));
        assert_eq!(TempoCache::key_for(&a), "the band|song one");

        let no_artist = track(None, "Solo");
        assert_eq!(TempoCache::key_for(&no_artist), "|solo");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tempos.toml");

        let mut cache = TempoCache::new();
        cache.record(&track(Some("A"), "One"), 128);
        cache.record(&track(Some("B"), "Two"), -1);
        cache.save(&path).unwrap();

        let loaded = TempoCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(&track(Some("A"), "One")), Some(128));
        assert_eq!(loaded.get(&track(Some("B"), "Two")), Some(-1));
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TempoCache::load(&dir.path().join("absent.toml")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn malformed_file_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tempos.toml");
        std::fs::write(&path, "this is { not toml").unwrap();

        assert!(matches!(
            TempoCache::load(&path),
            Err(Error::Cache { .. })
        ));
    }

    #[test]
    fn apply_fills_the_tempo_map_including_miss_markers() {
        let mut cache = TempoCache::new();
        let hit = track(Some("A"), "Hit");
        let miss = track(Some("A"), "Miss");
        let unseen = track(Some("A"), "Unseen");
        cache.record(&hit, 140);
        cache.record(&miss, -1);

        let mut tempos = TempoMap::new();
        let applied = cache.apply(&[hit.clone(), miss.clone(), unseen.clone()], &mut tempos);

        assert_eq!(applied, 2);
        assert_eq!(tempos.get(&hit.id), Some(140));
        // The miss marker lands in the map as "known unknown".
        assert_eq!(tempos.get(&miss.id), None);
        assert!(tempos.contains(&miss.id));
        assert!(!tempos.contains(&unseen.id));
    }

    #[test]
    fn resolve_prefers_explicit_path_and_honors_disable() {
        let explicit = CacheSettings {
            enabled: true,
            path: Some(PathBuf::from("/tmp/custom.toml")),
        };
        assert_eq!(
            resolve_cache_path(&explicit),
            Some(PathBuf::from("/tmp/custom.toml"))
        );

        let disabled = CacheSettings { enabled: false, path: None };
        assert_eq!(resolve_cache_path(&disabled), None);
    }
}
