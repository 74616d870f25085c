//! Workout model and `.zwo` workout-file parsing.
//!
//! A workout is an ordered list of timed blocks; the engines only care
//! about each block's duration and optional target cadence. Power targets,
//! text events and other presentation data in the source file are dropped
//! at parse time.

mod model;
mod zwo;

pub use model::{Workout, WorkoutBlock};
pub use zwo::{parse_file, parse_str};
