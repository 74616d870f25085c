use std::path::Path;

use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::ItemKey;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// Scan `dir` for audio files and build the track pool.
///
/// The local filesystem stands in for a remote catalog here: every track
/// gets a stable id (its path), a display name and artist from tags, and
/// a playable `file://` URI. Tempo is *not* read; estimates come from the
/// tempo cache or an external lookup service.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);
    if let Some(depth) = settings.max_depth {
        walker = walker.max_depth(depth);
    }

    for entry in walker.into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !(path.is_file() && is_audio_file(path, &settings.extensions)) {
            continue;
        }

        let default_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut name = default_name;
        let mut artist: Option<String> = None;
        let mut duration_seconds: u32 = 0;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration_seconds = tagged.properties().duration().as_secs() as u32;

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        name = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        tracks.push(Track {
            id: path.display().to_string(),
            name,
            artist,
            duration_seconds,
            uri: format!("file://{}", path.display()),
        });
    }

    tracks.sort_by(|a, b| a.display().to_lowercase().cmp(&b.display().to_lowercase()));
    debug!("scanned {} tracks under {}", tracks.len(), dir.display());
    tracks
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = vec!["mp3".to_string(), "ogg".to_string()];
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.flac"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_display_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let tracks = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].name, "A");
        assert_eq!(tracks[1].name, "b");
        // Unreadable files still get a pool entry; duration is just unknown.
        assert_eq!(tracks[0].duration_seconds, 0);
        assert!(tracks[0].uri.starts_with("file://"));
        assert_eq!(tracks[0].id, dir.path().join("A.ogg").display().to_string());
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("deeper");
        fs::create_dir(&sub).unwrap();
        fs::write(dir.path().join("top.mp3"), b"x").unwrap();
        fs::write(sub.join("nested.mp3"), b"x").unwrap();

        let mut settings = LibrarySettings::default();
        settings.max_depth = Some(1);
        let tracks = scan(dir.path(), &settings);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "top");
    }
}
