//! Obstacle track: pipe spawning, scrolling, pass detection and pruning
//!
//! Pipes are stored in spawn order. All pipes scroll at the same speed, so
//! spawn order is also left-to-right order and the first unpassed pipe is the
//! next one the bird will meet.

use serde::{Deserialize, Serialize};

use super::state::{GapRng, PipePair};
use crate::settings::Settings;

/// Live pipes plus the spawn-distance accumulator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleTrack {
    pipes: Vec<PipePair>,
    /// Horizontal travel since the last spawn
    distance_since_spawn: f32,
}

impl ObstacleTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live pipes, leftmost first
    pub fn pipes(&self) -> &[PipePair] {
        &self.pipes
    }

    pub fn distance_since_spawn(&self) -> f32 {
        self.distance_since_spawn
    }

    /// Remove every pipe and zero the accumulator
    pub fn clear(&mut self) {
        self.pipes.clear();
        self.distance_since_spawn = 0.0;
    }

    /// Append a pipe at the right boundary with a freshly drawn gap
    pub fn spawn(&mut self, settings: &Settings, rng: &mut GapRng) {
        let gap_top = rng.next_gap_top(settings);
        self.pipes.push(PipePair::new(settings.width, gap_top));
        self.distance_since_spawn = 0.0;
        log::trace!("Spawned pipe with gap_top={gap_top}");
    }

    /// Advance one tick. Returns the number of pipes passed this tick.
    ///
    /// Order: scroll, spawn, mark passes, prune.
    pub fn advance(&mut self, settings: &Settings, rng: &mut GapRng) -> u32 {
        for pipe in &mut self.pipes {
            pipe.x -= settings.pipe_speed;
        }
        self.distance_since_spawn += settings.pipe_speed;

        // Accumulator restarts at zero, the overshoot is dropped
        if self.distance_since_spawn >= settings.spawn_distance {
            self.spawn(settings, rng);
        }

        let mut passed = 0;
        for pipe in &mut self.pipes {
            if !pipe.passed && pipe.right(settings) < settings.bird_x {
                pipe.passed = true;
                passed += 1;
            }
        }

        // Drop pipes whose trailing edge reached the left boundary
        let pipe_width = settings.pipe_width;
        self.pipes.retain(|p| p.x > -pipe_width);

        passed
    }

    /// First pipe whose trailing edge is at or ahead of the bird
    pub fn next_pipe(&self, settings: &Settings) -> Option<&PipePair> {
        self.pipes
            .iter()
            .find(|p| p.right(settings) >= settings.bird_x)
    }

    #[cfg(test)]
    pub(crate) fn pipes_mut(&mut self) -> &mut Vec<PipePair> {
        &mut self.pipes
    }
}
