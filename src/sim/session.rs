//! One simulation instance: reset/step state machine
//!
//! Each tick runs in a fixed order: bird physics, track update, collision
//! check, reward, observation. Nothing here reads rendering or wall-clock
//! state, so a session can run headless at any speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::check_collision;
use super::observation::Observation;
use super::reward::{TickOutcome, shape_reward};
use super::state::{Action, Bird, GapRng, PipePair, SessionPhase};
use super::track::ObstacleTrack;
use crate::error::{Result, SimError};
use crate::settings::Settings;

/// Result of a single `step()`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub score: u32,
}

/// Pipe as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub x: f32,
    pub width: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
    pub passed: bool,
}

/// Read-only view of a session after a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Top-left corner of the bird's hitbox
    pub bird_pos: Vec2,
    pub bird_size: f32,
    pub bird_velocity: f32,
    pub pipes: Vec<PipeView>,
    pub score: u32,
    pub tick: u64,
    pub phase: SessionPhase,
    pub playfield: Vec2,
}

/// A single game instance owning all of its mutable state
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    rng: GapRng,
    bird: Bird,
    track: ObstacleTrack,
    score: u32,
    phase: SessionPhase,
    /// Ticks since the last reset
    tick: u64,
    episode_reward: f32,
}

impl Session {
    /// Create a session with validated settings, already reset
    pub fn new(settings: Settings, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(settings, seed))
    }

    /// Create a session with default settings
    pub fn with_seed(seed: u64) -> Self {
        Self::build(Settings::default(), seed)
    }

    fn build(settings: Settings, seed: u64) -> Self {
        let mut session = Self {
            bird: Bird::new(settings.height / 2.0),
            settings,
            rng: GapRng::new(seed),
            track: ObstacleTrack::new(),
            score: 0,
            phase: SessionPhase::Ready,
            tick: 0,
            episode_reward: 0.0,
        };
        session.reset();
        session
    }

    /// Start a new episode. The gap generator keeps its stream, so successive
    /// episodes see different pipes.
    pub fn reset(&mut self) -> Observation {
        self.bird = Bird::new(self.settings.height / 2.0);
        self.track.clear();
        self.track.spawn(&self.settings, &mut self.rng);
        self.score = 0;
        self.tick = 0;
        self.episode_reward = 0.0;
        self.phase = SessionPhase::Ready;
        self.observation()
    }

    /// Replace the gap generator, then reset
    pub fn reseed(&mut self, seed: u64) -> Observation {
        log::debug!("Session reseeded with {seed}");
        self.rng = GapRng::new(seed);
        self.reset()
    }

    /// Advance one tick. Rejected once the episode is over.
    pub fn step(&mut self, action: Action) -> Result<StepResult> {
        if self.phase == SessionPhase::Done {
            return Err(SimError::EpisodeTerminated);
        }

        self.bird.update(action, &self.settings);
        let pipes_passed = self.track.advance(&self.settings, &mut self.rng);
        self.score += pipes_passed;

        let collided = check_collision(&self.bird, &self.track, &self.settings);
        let outcome = TickOutcome {
            collided,
            pipes_passed,
        };
        let reward = shape_reward(outcome, &self.bird, &self.track, &self.settings);

        self.tick += 1;
        self.episode_reward += reward;
        self.phase = if collided {
            log::debug!(
                "Episode over after {} ticks: score={} reward={:.2}",
                self.tick,
                self.score,
                self.episode_reward
            );
            SessionPhase::Done
        } else {
            SessionPhase::Running
        };

        Ok(StepResult {
            observation: self.observation(),
            reward,
            done: collided,
            score: self.score,
        })
    }

    /// Advance one tick from a raw integer action
    pub fn step_raw(&mut self, action: u8) -> Result<StepResult> {
        let action = Action::try_from(action)?;
        self.step(action)
    }

    /// Encode the current state
    pub fn observation(&self) -> Observation {
        Observation::encode(&self.bird, &self.track, &self.settings)
    }

    /// Renderer view of the current state
    pub fn snapshot(&self) -> Snapshot {
        let settings = &self.settings;
        Snapshot {
            bird_pos: Vec2::new(settings.bird_x, self.bird.y),
            bird_size: settings.bird_size,
            bird_velocity: self.bird.velocity,
            pipes: self
                .track
                .pipes()
                .iter()
                .map(|p| PipeView {
                    x: p.x,
                    width: settings.pipe_width,
                    gap_top: p.gap_top,
                    gap_bottom: p.gap_bottom(settings),
                    passed: p.passed,
                })
                .collect(),
            score: self.score,
            tick: self.tick,
            phase: self.phase,
            playfield: Vec2::new(settings.width, settings.height),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> &[PipePair] {
        self.track.pipes()
    }

    pub fn distance_since_spawn(&self) -> f32 {
        self.track.distance_since_spawn()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == SessionPhase::Done
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Sum of rewards since the last reset
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Seed of the current gap generator
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}
