use std::thread;
use std::time::Duration;

use super::*;
use crate::config::FadeSettings;
use crate::error::Error;
use crate::library::{TempoMap, Track};
use crate::playlist::{GeneratedPlaylist, PlaylistSlot};

fn track(id: &str, duration_seconds: u32) -> Track {
    Track {
        id: id.into(),
        name: id.to_uppercase(),
        artist: None,
        duration_seconds,
        uri: format!("file:///music/{id}.mp3"),
    }
}

fn slot(id: &str, start: u32, end: u32) -> PlaylistSlot {
    PlaylistSlot {
        track: track(id, end - start),
        start_seconds: start,
        end_seconds: end,
        clip_start: 0,
        clip_end: end - start,
        alternatives: Vec::new(),
    }
}

/// Three slots with a silent gap between 90s and 120s.
fn playlist() -> GeneratedPlaylist {
    GeneratedPlaylist {
        slots: vec![slot("a", 0, 60), slot("b", 60, 90), slot("c", 120, 150)],
        total_duration: 150,
        workout_id: "w".into(),
        workout_name: "W".into(),
        source_tracks: Vec::new(),
        tempos: TempoMap::new(),
        fallbacks: Vec::new(),
    }
}

#[test]
fn slot_lookup_uses_half_open_ranges() {
    let p = playlist();
    assert_eq!(slot_index_at(&p, 0), Some(0));
    assert_eq!(slot_index_at(&p, 59), Some(0));
    assert_eq!(slot_index_at(&p, 60), Some(1));
    assert_eq!(slot_index_at(&p, 89), Some(1));
    // Silent gap.
    assert_eq!(slot_index_at(&p, 90), None);
    assert_eq!(slot_index_at(&p, 119), None);
    assert_eq!(slot_index_at(&p, 120), Some(2));
    // Past the end.
    assert_eq!(slot_index_at(&p, 150), None);
}

#[test]
fn advancer_reports_each_slot_change_exactly_once() {
    let p = playlist();
    let mut adv = SlotAdvancer::new();

    assert_eq!(adv.poll(&p, 0).map(|s| s.track.id.as_str()), Some("a"));
    // Same slot, no change reported.
    assert!(adv.poll(&p, 30).is_none());
    assert_eq!(adv.poll(&p, 60).map(|s| s.track.id.as_str()), Some("b"));
    // Entering the gap clears the live slot silently.
    assert!(adv.poll(&p, 95).is_none());
    assert_eq!(adv.current(), None);
    assert_eq!(adv.poll(&p, 120).map(|s| s.track.id.as_str()), Some("c"));
    // Workout over.
    assert!(adv.poll(&p, 200).is_none());
    assert_eq!(adv.current(), None);
}

#[test]
fn clip_position_offsets_into_the_clip() {
    let mut s = slot("a", 60, 90);
    assert_eq!(clip_position_seconds(&s, 60), 0);
    assert_eq!(clip_position_seconds(&s, 75), 15);

    s.clip_start = 10;
    assert_eq!(clip_position_seconds(&s, 75), 25);
}

#[test]
fn clock_accumulates_only_while_running() {
    let mut clock = WorkoutClock::new();
    assert!(!clock.is_running());
    assert_eq!(clock.elapsed(), Duration::ZERO);

    clock.start();
    assert!(clock.is_running());
    thread::sleep(Duration::from_millis(20));
    assert!(clock.elapsed() >= Duration::from_millis(15));

    clock.pause();
    let frozen = clock.elapsed();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(clock.elapsed(), frozen);

    clock.resume();
    thread::sleep(Duration::from_millis(20));
    assert!(clock.elapsed() > frozen);

    clock.reset();
    assert!(!clock.is_running());
    assert_eq!(clock.elapsed_seconds(), 0);
}

#[derive(Debug, PartialEq)]
enum Call {
    Play(String, u32),
    Volume(f32),
}

#[derive(Default)]
struct FakePlayer {
    calls: Vec<Call>,
}

impl PlayerControl for FakePlayer {
    fn play(&mut self, uri: &str, position_seconds: u32) -> Result<(), Error> {
        self.calls.push(Call::Play(uri.into(), position_seconds));
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), Error> {
        self.calls.push(Call::Volume(volume));
        Ok(())
    }
}

#[test]
fn fade_plan_splits_the_duration_into_even_steps() {
    let plan = FadePlan::new(&FadeSettings::default());
    // 800ms total, 400ms per side, 50ms steps.
    assert_eq!(plan.fade_out.len(), 8);
    assert_eq!(plan.fade_in.len(), 8);
    assert_eq!(plan.interval, Duration::from_millis(50));

    assert_eq!(*plan.fade_out.last().unwrap(), 0.0);
    assert_eq!(*plan.fade_in.last().unwrap(), 1.0);
    assert!(plan.fade_out.windows(2).all(|w| w[1] < w[0]));
    assert!(plan.fade_in.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn zero_duration_fades_are_instant() {
    let plan = FadePlan::new(&FadeSettings { fade_duration_ms: 0, fade_interval_ms: 50 });
    assert!(plan.is_instant());

    // Interval longer than half the duration also degenerates.
    let plan = FadePlan::new(&FadeSettings { fade_duration_ms: 80, fade_interval_ms: 50 });
    assert!(plan.is_instant());
}

#[test]
fn crossfade_ramps_down_switches_then_ramps_up() {
    let plan = FadePlan::new(&FadeSettings { fade_duration_ms: 4, fade_interval_ms: 1 });
    assert_eq!(plan.fade_out.len(), 2);

    let mut player = FakePlayer::default();
    crossfade(&mut player, &plan, "file:///next.mp3", 12).unwrap();

    assert_eq!(
        player.calls,
        vec![
            Call::Volume(0.5),
            Call::Volume(0.0),
            Call::Play("file:///next.mp3".into(), 12),
            Call::Volume(0.5),
            Call::Volume(1.0),
        ]
    );
}

#[test]
fn instant_plan_just_plays() {
    let plan = FadePlan::new(&FadeSettings { fade_duration_ms: 0, fade_interval_ms: 50 });
    let mut player = FakePlayer::default();
    crossfade(&mut player, &plan, "file:///next.mp3", 0).unwrap();
    assert_eq!(player.calls, vec![Call::Play("file:///next.mp3".into(), 0)]);
}
