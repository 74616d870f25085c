use std::collections::HashMap;

/// One playable track from the pool.
///
/// Identity is `id`; two tracks with the same id are the same song no
/// matter where the structs came from. Tempo is looked up separately via
/// [`TempoMap`].
#[derive(Debug, Clone)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist: Option<String>,
    pub duration_seconds: u32,
    pub uri: String,
}

impl Track {
    /// "Artist - Title" label, or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        match self.artist.as_deref() {
            Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), self.name),
            _ => self.name.clone(),
        }
    }
}

/// Track id -> estimated tempo in BPM.
///
/// A missing entry or a negative stored value both mean "tempo unknown";
/// the negative sentinel survives round-trips through caches that cannot
/// represent absence.
#[derive(Debug, Clone, Default)]
pub struct TempoMap {
    entries: HashMap<String, i32>,
}

impl TempoMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tempo estimate. Negative values mark a known-unknown.
    pub fn insert(&mut self, id: impl Into<String>, bpm: i32) {
        self.entries.insert(id.into(), bpm);
    }

    /// Tempo for a track, or `None` when missing or marked unknown.
    pub fn get(&self, id: &str) -> Option<u32> {
        match self.entries.get(id) {
            Some(&bpm) if bpm >= 0 => Some(bpm as u32),
            _ => None,
        }
    }

    /// Whether any estimate (including an unknown marker) exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of tracks with a usable (non-negative) tempo.
    pub fn known_count(&self) -> usize {
        self.entries.values().filter(|&&bpm| bpm >= 0).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
