//! Game state and core simulation types

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::settings::Settings;

/// Agent action for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    #[default]
    Idle = 0,
    Flap = 1,
}

impl TryFrom<u8> for Action {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Action::Idle),
            1 => Ok(Action::Flap),
            other => Err(SimError::InvalidAction(other)),
        }
    }
}

impl From<Action> for u8 {
    fn from(action: Action) -> Self {
        action as u8
    }
}

/// Lifecycle of one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Freshly reset, no step taken yet
    Ready,
    /// At least one non-terminal step taken
    Running,
    /// Collision detected; only `reset()` leaves this phase
    Done,
}

/// The player's body. Only moves vertically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top edge (pixels, 0 = ceiling)
    pub y: f32,
    /// Pixels per tick, positive = falling
    pub velocity: f32,
}

impl Bird {
    pub fn new(y: f32) -> Self {
        Self { y, velocity: 0.0 }
    }

    /// Apply one tick of physics: flap override, then gravity, then move
    pub fn update(&mut self, action: Action, settings: &Settings) {
        if action == Action::Flap {
            self.velocity = settings.flap_impulse;
        }
        self.velocity += settings.gravity;
        self.y += self.velocity;
    }
}

/// A top/bottom pipe pair with a gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    /// Left edge
    pub x: f32,
    /// Top of the gap opening
    pub gap_top: f32,
    /// Set once the trailing edge has crossed the bird
    pub passed: bool,
}

impl PipePair {
    pub fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self, settings: &Settings) -> f32 {
        self.x + settings.pipe_width
    }

    /// Bottom of the gap opening
    #[inline]
    pub fn gap_bottom(&self, settings: &Settings) -> f32 {
        self.gap_top + settings.gap_height
    }

    /// Vertical center of the gap
    #[inline]
    pub fn gap_center(&self, settings: &Settings) -> f32 {
        self.gap_top + settings.gap_height / 2.0
    }
}

/// Per-session source of gap positions
///
/// Each session owns its own generator so parallel sessions never share state.
#[derive(Debug, Clone)]
pub struct GapRng {
    seed: u64,
    rng: Pcg32,
}

impl GapRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this generator was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform gap top in `[min_gap_top, max_gap_top]`
    pub fn next_gap_top(&mut self, settings: &Settings) -> f32 {
        let lo = settings.min_gap_top();
        let hi = settings.max_gap_top();
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..=hi)
    }
}
