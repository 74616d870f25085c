//! Crate error types.
//!
//! Only structurally malformed input is a hard failure: a workout with no
//! blocks, a block with zero duration, an unreadable workout file. "Not
//! enough good matches" conditions (missing tempo data, exhausted track
//! pools) never error; they degrade and are reported as
//! [`Fallback`](crate::playlist::Fallback) diagnostics instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The workout contains no blocks; there is nothing to fill.
    #[error("workout has no blocks")]
    EmptyWorkout,

    /// A block declares a zero-second duration.
    #[error("workout block {index} has zero duration")]
    InvalidBlockDuration { index: usize },

    /// The workout file was read but is not a valid workout document.
    #[error("malformed workout file: {0}")]
    WorkoutParse(String),

    /// Low-level XML error while reading a workout file.
    #[error("workout XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The persistent tempo cache exists but cannot be parsed.
    #[error("invalid tempo cache at {path}: {message}")]
    Cache { path: PathBuf, message: String },

    /// An external player transport rejected a command.
    #[error("player transport error: {0}")]
    Player(String),
}
