//! Track pool and tempo data.
//!
//! `Track` and `TempoMap` are the two feeds every engine consumes. Tempo is
//! deliberately not part of the track: it is estimated by external services
//! and may be missing, so it lives in a separate id-keyed map with an
//! explicit unknown sentinel.

mod model;
mod scan;

pub use model::{TempoMap, Track};
pub use scan::scan;
