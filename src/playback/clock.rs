use std::time::{Duration, Instant};

use tracing::debug;

use crate::playlist::{GeneratedPlaylist, PlaylistSlot};

/// Pause-aware workout clock.
///
/// Wall time only advances the workout while the clock is running;
/// pausing freezes the schedule so the playlist stays lined up with the
/// rider's actual position in the workout, not with when they started.
#[derive(Debug, Default)]
pub struct WorkoutClock {
    // Start time of the current running span and accumulated elapsed
    // from earlier spans, same split as pause handling in audio players.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl WorkoutClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the workout from zero.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started_at = Some(Instant::now());
        debug!("workout clock started");
    }

    pub fn pause(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
            debug!("workout clock paused at {:?}", self.accumulated);
        }
    }

    pub fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            debug!("workout clock resumed from {:?}", self.accumulated);
        }
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Workout time elapsed, excluding paused spans.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed().as_secs().min(u32::MAX as u64) as u32
    }

    /// Stop and clear the clock.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }
}

/// Index of the slot scheduled at `elapsed_seconds`, if any. `None`
/// during a silent gap or past the end of the workout.
pub fn slot_index_at(playlist: &GeneratedPlaylist, elapsed_seconds: u32) -> Option<usize> {
    playlist
        .slots
        .iter()
        .position(|s| elapsed_seconds >= s.start_seconds && elapsed_seconds < s.end_seconds)
}

/// Position within the slot's playable clip at `elapsed_seconds`, for
/// seeking the player when joining a slot mid-way.
pub fn clip_position_seconds(slot: &PlaylistSlot, elapsed_seconds: u32) -> u32 {
    slot.clip_start + elapsed_seconds.saturating_sub(slot.start_seconds)
}

/// Tracks which slot is live and reports when the schedule moves on.
///
/// Poll it with the clock's elapsed time; it returns a slot only on the
/// tick where the scheduled slot actually changes, so callers can start
/// the new track exactly once. Entering a silent gap or running past the
/// end reports nothing and clears the current slot.
#[derive(Debug, Default)]
pub struct SlotAdvancer {
    current: Option<usize>,
}

impl SlotAdvancer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// The newly due slot at `elapsed_seconds`, or `None` when the live
    /// slot is unchanged.
    pub fn poll<'a>(
        &mut self,
        playlist: &'a GeneratedPlaylist,
        elapsed_seconds: u32,
    ) -> Option<&'a PlaylistSlot> {
        let due = slot_index_at(playlist, elapsed_seconds);
        if due == self.current {
            return None;
        }
        self.current = due;
        due.map(|i| &playlist.slots[i])
    }

    /// Forget the live slot, e.g. after a manual substitution restarted
    /// playback out of band.
    pub fn reset(&mut self) {
        self.current = None;
    }
}
