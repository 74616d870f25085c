use std::{env, path::Path, process::ExitCode};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use spinmix::cache::{self, TempoCache};
use spinmix::config::Settings;
use spinmix::library::{TempoMap, scan};
use spinmix::playlist::{self, GeneratedPlaylist};
use spinmix::workout;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let Some(workout_path) = env::args().nth(1) else {
        eprintln!("usage: spinmix <workout.zwo> [music-dir]");
        return ExitCode::from(2);
    };
    let music_dir = env::args().nth(2).unwrap_or("Music".to_string());

    match run(&workout_path, &music_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("spinmix: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(workout_path: &str, music_dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    settings.validate()?;

    let w = workout::parse_file(Path::new(workout_path))?;
    info!(
        "workout '{}': {} blocks, {}s total",
        w.name,
        w.blocks.len(),
        w.total_duration()
    );

    let tracks = scan(Path::new(music_dir), &settings.library);
    if tracks.is_empty() {
        return Err(format!("no audio files found under {music_dir}").into());
    }

    let mut tempos = TempoMap::new();
    if let Some(cache_path) = cache::resolve_cache_path(&settings.cache) {
        let tempo_cache = TempoCache::load(&cache_path)?;
        let covered = tempo_cache.apply(&tracks, &mut tempos);
        info!(
            "{} of {} tracks have cached tempo data ({} usable)",
            covered,
            tracks.len(),
            tempos.known_count()
        );
    }
    if tempos.known_count() == 0 {
        warn!("no tempo data available; cadence matching will be a coin toss");
    }

    // A fixed SPINMIX_SEED reproduces the exact same playlist; without it
    // every run shuffles within the good-enough candidates.
    let playlist = match env::var("SPINMIX_SEED").ok().and_then(|s| s.parse::<u64>().ok()) {
        Some(seed) => playlist::generate(
            &w,
            &tracks,
            &tempos,
            &settings.matching,
            &mut StdRng::seed_from_u64(seed),
        )?,
        None => playlist::generate(&w, &tracks, &tempos, &settings.matching, &mut rand::rng())?,
    };

    print_schedule(&playlist, &tempos);
    Ok(())
}

fn print_schedule(playlist: &GeneratedPlaylist, tempos: &TempoMap) {
    println!("{} ({})", playlist.workout_name, format_time(playlist.total_duration));
    for slot in &playlist.slots {
        let tempo = match tempos.get(&slot.track.id) {
            Some(bpm) => format!("{bpm} BPM"),
            None => "?".to_string(),
        };
        let clipped = if slot.is_clipped() { " [clipped]" } else { "" };
        println!(
            "  {} - {}  {}  ({}){}",
            format_time(slot.start_seconds),
            format_time(slot.end_seconds),
            slot.track.display(),
            tempo,
            clipped
        );
    }
    for fallback in &playlist.fallbacks {
        eprintln!("  warning: {fallback}");
    }
}

fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
