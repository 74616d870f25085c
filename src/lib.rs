//! spinmix: cadence-matched playlist generation for structured cycling workouts.
//!
//! The crate takes a pool of music tracks (with externally supplied tempo
//! estimates), a parsed workout (timed blocks with optional target cadence)
//! and produces a gapless playlist whose songs line up with each block's
//! cadence, either directly or as a harmonic multiple. During playback,
//! individual slots can be swapped live through the substitution engine
//! without disturbing the schedule.
//!
//! Playback transport, remote catalogs and presentation are external
//! collaborators: the engines here are synchronous, in-memory transforms.

pub mod cache;
pub mod config;
pub mod error;
pub mod library;
pub mod matcher;
pub mod playback;
pub mod playlist;
pub mod substitute;
pub mod workout;

pub use error::Error;
pub use library::{TempoMap, Track};
pub use playlist::{Fallback, GeneratedPlaylist, PlaylistSlot, generate};
pub use substitute::{Substituter, Substitution};
pub use workout::{Workout, WorkoutBlock};
