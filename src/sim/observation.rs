//! Observation encoding
//!
//! Field order and normalization are the contract with trained policies:
//!
//! | idx | value                                             | no pipe ahead |
//! |-----|---------------------------------------------------|---------------|
//! | 0   | bird y / height                                   |               |
//! | 1   | bird velocity / velocity_scale                    |               |
//! | 2   | max(next pipe x - bird x, 0) / width              | 1.0           |
//! | 3   | (next gap top - bird y) / height                  | 0.0           |
//! | 4   | (next gap bottom - bird y) / height               | 0.0           |

use serde::{Deserialize, Serialize};

use super::state::Bird;
use super::track::ObstacleTrack;
use crate::settings::Settings;

/// Number of observation components
pub const OBS_LEN: usize = 5;

/// Normalized 5-element state vector
///
/// Component 2 is clamped at zero while the bird is inside a pipe column.
/// The unclamped encoding dips to about -0.125 there, so policies trained
/// against it see a small difference on those ticks only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation(pub [f32; OBS_LEN]);

impl Observation {
    pub const LEN: usize = OBS_LEN;

    /// Nominal lower bounds of the observation space
    pub const LOW: [f32; Self::LEN] = [0.0, -2.0, 0.0, -1.0, -1.0];
    /// Nominal upper bounds of the observation space
    pub const HIGH: [f32; Self::LEN] = [1.0, 2.0, 1.0, 1.0, 1.0];

    /// Encode the post-motion, post-collision state
    pub fn encode(bird: &Bird, track: &ObstacleTrack, settings: &Settings) -> Self {
        let y = bird.y / settings.height;
        let vel = bird.velocity / settings.velocity_scale;

        match track.next_pipe(settings) {
            Some(pipe) => Self([
                y,
                vel,
                (pipe.x - settings.bird_x).max(0.0) / settings.width,
                (pipe.gap_top - bird.y) / settings.height,
                (pipe.gap_bottom(settings) - bird.y) / settings.height,
            ]),
            None => Self([y, vel, 1.0, 0.0, 0.0]),
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn bird_y(&self) -> f32 {
        self.0[0]
    }

    pub fn velocity(&self) -> f32 {
        self.0[1]
    }

    pub fn pipe_distance(&self) -> f32 {
        self.0[2]
    }

    pub fn gap_top_offset(&self) -> f32 {
        self.0[3]
    }

    pub fn gap_bottom_offset(&self) -> f32 {
        self.0[4]
    }
}

impl From<Observation> for [f32; OBS_LEN] {
    fn from(obs: Observation) -> Self {
        obs.0
    }
}

impl From<Observation> for Vec<f32> {
    fn from(obs: Observation) -> Self {
        obs.0.to_vec()
    }
}
