use crate::error::Error;

/// One timed segment of a workout.
///
/// Every variant carries the same two fields the playlist engines need:
/// the block length in seconds and an optional target cadence in RPM.
/// The kind is kept because callers display it and because interval
/// semantics differ at parse time, but the allocator treats all kinds
/// alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutBlock {
    Warmup { duration_seconds: u32, cadence: Option<u32> },
    SteadyState { duration_seconds: u32, cadence: Option<u32> },
    Cooldown { duration_seconds: u32, cadence: Option<u32> },
    Interval { duration_seconds: u32, cadence: Option<u32> },
    Ramp { duration_seconds: u32, cadence: Option<u32> },
    Freeride { duration_seconds: u32, cadence: Option<u32> },
}

impl WorkoutBlock {
    pub fn duration_seconds(&self) -> u32 {
        match *self {
            WorkoutBlock::Warmup { duration_seconds, .. }
            | WorkoutBlock::SteadyState { duration_seconds, .. }
            | WorkoutBlock::Cooldown { duration_seconds, .. }
            | WorkoutBlock::Interval { duration_seconds, .. }
            | WorkoutBlock::Ramp { duration_seconds, .. }
            | WorkoutBlock::Freeride { duration_seconds, .. } => duration_seconds,
        }
    }

    /// Target cadence in RPM; `None` means "no tempo preference".
    pub fn cadence(&self) -> Option<u32> {
        match *self {
            WorkoutBlock::Warmup { cadence, .. }
            | WorkoutBlock::SteadyState { cadence, .. }
            | WorkoutBlock::Cooldown { cadence, .. }
            | WorkoutBlock::Interval { cadence, .. }
            | WorkoutBlock::Ramp { cadence, .. }
            | WorkoutBlock::Freeride { cadence, .. } => cadence,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            WorkoutBlock::Warmup { .. } => "warmup",
            WorkoutBlock::SteadyState { .. } => "steady",
            WorkoutBlock::Cooldown { .. } => "cooldown",
            WorkoutBlock::Interval { .. } => "interval",
            WorkoutBlock::Ramp { .. } => "ramp",
            WorkoutBlock::Freeride { .. } => "freeride",
        }
    }
}

/// A parsed workout: ordered blocks plus file metadata.
#[derive(Debug, Clone)]
pub struct Workout {
    pub id: String,
    pub name: String,
    pub author: String,
    pub description: String,
    pub blocks: Vec<WorkoutBlock>,
}

impl Workout {
    /// Total workout length in seconds, clamped at `u32::MAX`.
    pub fn total_duration(&self) -> u32 {
        self.blocks
            .iter()
            .fold(0u32, |total, b| total.saturating_add(b.duration_seconds()))
    }

    /// Absolute start offset of block `index`, from the cumulative
    /// duration of all prior blocks.
    pub fn block_start_offset(&self, index: usize) -> u32 {
        self.blocks[..index]
            .iter()
            .fold(0u32, |total, b| total.saturating_add(b.duration_seconds()))
    }

    /// Structural validation. Only truly malformed input fails: an empty
    /// block list or a zero-length block.
    pub fn validate(&self) -> Result<(), Error> {
        if self.blocks.is_empty() {
            return Err(Error::EmptyWorkout);
        }
        for (index, block) in self.blocks.iter().enumerate() {
            if block.duration_seconds() == 0 {
                return Err(Error::InvalidBlockDuration { index });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(blocks: Vec<WorkoutBlock>) -> Workout {
        Workout {
            id: "w1".into(),
            name: "Test".into(),
            author: String::new(),
            description: String::new(),
            blocks,
        }
    }

    #[test]
    fn total_duration_and_offsets_accumulate_in_block_order() {
        let w = workout(vec![
            WorkoutBlock::Warmup { duration_seconds: 300, cadence: Some(85) },
            WorkoutBlock::SteadyState { duration_seconds: 600, cadence: Some(95) },
            WorkoutBlock::Cooldown { duration_seconds: 120, cadence: None },
        ]);

        assert_eq!(w.total_duration(), 1020);
        assert_eq!(w.block_start_offset(0), 0);
        assert_eq!(w.block_start_offset(1), 300);
        assert_eq!(w.block_start_offset(2), 900);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_zero_duration_blocks() {
        assert!(matches!(
            workout(vec![]).validate(),
            Err(Error::EmptyWorkout)
        ));

        let w = workout(vec![
            WorkoutBlock::Warmup { duration_seconds: 300, cadence: None },
            WorkoutBlock::Freeride { duration_seconds: 0, cadence: None },
        ]);
        assert!(matches!(
            w.validate(),
            Err(Error::InvalidBlockDuration { index: 1 })
        ));
    }
}
