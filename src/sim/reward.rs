//! Reward shaping
//!
//! One scalar per tick, picked by precedence: crash, then pass, then alive.

use super::state::Bird;
use super::track::ObstacleTrack;
use crate::settings::Settings;

/// What happened during a tick, as far as rewards are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub collided: bool,
    /// Pipes passed this tick (normally 0 or 1)
    pub pipes_passed: u32,
}

/// Reward for a tick, given the state at the end of that tick
pub fn shape_reward(
    outcome: TickOutcome,
    bird: &Bird,
    track: &ObstacleTrack,
    settings: &Settings,
) -> f32 {
    if outcome.collided {
        crash_penalty(bird, track, settings)
    } else if outcome.pipes_passed > 0 {
        settings.reward_pass
    } else {
        settings.reward_alive
    }
}

/// Terminal reward in `[-1, 0]`, closer to 0 the nearer the bird was to the
/// next gap's center. Falls back to `reward_crash_max` with no pipe ahead.
pub fn crash_penalty(bird: &Bird, track: &ObstacleTrack, settings: &Settings) -> f32 {
    match track.next_pipe(settings) {
        Some(pipe) => {
            let max_dist = settings.height / 2.0;
            let distance = (bird.y - pipe.gap_center(settings)).abs();
            -(distance / max_dist).clamp(0.0, 1.0)
        }
        None => settings.reward_crash_max,
    }
}
