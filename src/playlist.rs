//! Playlist model and the allocation engine.
//!
//! `generate` turns a workout plus a track pool into an ordered,
//! time-stamped slot sequence; see [`allocate`](self::generate) for the
//! fill policy. Slots are mutated in place afterwards only by the
//! substitution engine.

mod allocate;
mod model;

pub use allocate::generate;
pub use model::{Fallback, GeneratedPlaylist, PlaylistSlot};
