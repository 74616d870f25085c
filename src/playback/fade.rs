use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::config::FadeSettings;
use crate::error::Error;

/// The external player transport the session drives.
///
/// Implementations wrap whatever the rider actually listens through; the
/// engines never touch audio directly. Volume is 0.0 to 1.0.
pub trait PlayerControl {
    fn play(&mut self, uri: &str, position_seconds: u32) -> Result<(), Error>;
    fn pause(&mut self) -> Result<(), Error>;
    fn resume(&mut self) -> Result<(), Error>;
    fn set_volume(&mut self, volume: f32) -> Result<(), Error>;
}

/// Precomputed crossfade volume ramp.
///
/// The configured fade duration is split evenly: the outgoing track is
/// stepped down to silence over the first half, the incoming one stepped
/// up over the second, one step per configured interval. A zero duration
/// (or an interval longer than the half) degenerates to an instant
/// switch.
#[derive(Debug, Clone, PartialEq)]
pub struct FadePlan {
    pub fade_out: Vec<f32>,
    pub fade_in: Vec<f32>,
    pub interval: Duration,
}

impl FadePlan {
    pub fn new(settings: &FadeSettings) -> Self {
        let half_ms = settings.fade_duration_ms / 2;
        let steps = if settings.fade_interval_ms == 0 {
            0
        } else {
            half_ms / settings.fade_interval_ms
        };

        let mut fade_out = Vec::with_capacity(steps as usize);
        let mut fade_in = Vec::with_capacity(steps as usize);
        for i in 1..=steps {
            let fraction = i as f32 / steps as f32;
            fade_out.push(1.0 - fraction);
            fade_in.push(fraction);
        }

        Self {
            fade_out,
            fade_in,
            interval: Duration::from_millis(settings.fade_interval_ms),
        }
    }

    pub fn is_instant(&self) -> bool {
        self.fade_out.is_empty()
    }
}

/// Fade the current track out, start `uri` at `position_seconds`, fade it
/// in. Blocks for the fade duration.
pub fn crossfade(
    player: &mut dyn PlayerControl,
    plan: &FadePlan,
    uri: &str,
    position_seconds: u32,
) -> Result<(), Error> {
    if plan.is_instant() {
        return player.play(uri, position_seconds);
    }

    debug!("crossfading to {uri} over {} steps", plan.fade_out.len() * 2);
    for &volume in &plan.fade_out {
        player.set_volume(volume)?;
        thread::sleep(plan.interval);
    }

    player.play(uri, position_seconds)?;

    for &volume in &plan.fade_in {
        player.set_volume(volume)?;
        thread::sleep(plan.interval);
    }
    Ok(())
}
