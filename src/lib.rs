//! Flappy RL - a side-scrolling flap-and-dodge game as an RL environment
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, rewards, observations)
//! - `settings`: Data-driven game constants
//! - `autopilot`: Built-in policies for headless runs
//! - `highscores`: Episode leaderboard

pub mod autopilot;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use autopilot::{EpisodeSummary, GapFollower, Policy, RandomPolicy, run_episode};
pub use error::{Result, SimError};
pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{Action, Observation, Session, SessionPhase, Snapshot, StepResult};

/// Default game constants
pub mod consts {
    /// Playfield dimensions (pixels, y = 0 at the top)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Downward acceleration added to velocity every tick (pixels/tick²)
    pub const GRAVITY: f32 = 0.5;
    /// Velocity a flap sets (not adds), before gravity is applied
    pub const FLAP_IMPULSE: f32 = -8.0;

    /// Bird body - fixed horizontal position, square hitbox
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_SIZE: f32 = 30.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_SPEED: f32 = 3.0;
    pub const PIPE_GAP: f32 = 120.0;
    /// Gap is kept at least this far from the ceiling and floor
    pub const GAP_MARGIN: f32 = 100.0;
    /// Horizontal travel between spawns (pixels)
    pub const SPAWN_DISTANCE: f32 = 270.0;

    /// Velocity divisor for the observation vector (maps typical velocities into ~[-2, 2])
    pub const VELOCITY_SCALE: f32 = 15.0;

    /// Rewards
    pub const REWARD_ALIVE: f32 = 0.1;
    pub const REWARD_PASS: f32 = 1.0;
    pub const REWARD_CRASH_MAX: f32 = -1.0;
}
