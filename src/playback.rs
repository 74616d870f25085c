//! Playback-session helpers.
//!
//! The crate does not own an audio transport; the rider's player is an
//! external collaborator behind [`PlayerControl`]. What lives here is the
//! session plumbing around it: a pause-aware workout clock, slot lookup
//! and advancement against the generated schedule, and the crossfade
//! volume ramp used when switching tracks.

mod clock;
mod fade;

pub use clock::{SlotAdvancer, WorkoutClock, clip_position_seconds, slot_index_at};
pub use fade::{FadePlan, PlayerControl, crossfade};

#[cfg(test)]
mod tests;
