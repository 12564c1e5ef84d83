//! Collision detection
//!
//! Axis-aligned boxes only. Overlap is strict: boxes that merely share an
//! edge do not collide. No epsilon anywhere.

use glam::Vec2;

use super::state::{Bird, PipePair};
use super::track::ObstacleTrack;
use crate::settings::Settings;

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Strict overlap test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// The bird's hitbox at its current position
pub fn bird_rect(bird: &Bird, settings: &Settings) -> Rect {
    Rect::new(settings.bird_x, bird.y, settings.bird_size, settings.bird_size)
}

/// Upper and lower obstacles of a pipe pair
///
/// The upper one spans ceiling to gap top; the lower one spans gap bottom
/// down a full playfield height, so it always reaches the floor.
pub fn pipe_rects(pipe: &PipePair, settings: &Settings) -> (Rect, Rect) {
    let top = Rect::new(pipe.x, 0.0, settings.pipe_width, pipe.gap_top);
    let bottom = Rect::new(
        pipe.x,
        pipe.gap_bottom(settings),
        settings.pipe_width,
        settings.height,
    );
    (top, bottom)
}

/// Check whether the bird left the playfield vertically
#[inline]
pub fn out_of_bounds(bird: &Bird, settings: &Settings) -> bool {
    bird.y < 0.0 || bird.y > settings.height
}

/// Check whether the bird (post-motion) hit a bound or any live pipe
pub fn check_collision(bird: &Bird, track: &ObstacleTrack, settings: &Settings) -> bool {
    if out_of_bounds(bird, settings) {
        return true;
    }

    let bird_box = bird_rect(bird, settings);
    track.pipes().iter().any(|pipe| {
        let (top, bottom) = pipe_rects(pipe, settings);
        bird_box.overlaps(&top) || bird_box.overlaps(&bottom)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with(pipes: &[PipePair]) -> ObstacleTrack {
        let mut track = ObstacleTrack::new();
        track.pipes_mut().extend_from_slice(pipes);
        track
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Shared edge only
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 20.0, 1.0, 1.0)));
    }

    #[test]
    fn test_bounds() {
        let settings = Settings::default();
        let track = ObstacleTrack::new();
        let at = |y| Bird { y, velocity: 0.0 };

        assert!(!check_collision(&at(0.0), &track, &settings));
        assert!(!check_collision(&at(600.0), &track, &settings));
        assert!(check_collision(&at(-0.5), &track, &settings));
        assert!(check_collision(&at(600.5), &track, &settings));
    }

    #[test]
    fn test_bird_inside_gap() {
        let settings = Settings::default();
        // Gap 200..320, bird box 250..280 at the same x as the pipe
        let track = track_with(&[PipePair::new(40.0, 200.0)]);
        let bird = Bird {
            y: 250.0,
            velocity: 0.0,
        };
        assert!(!check_collision(&bird, &track, &settings));
    }

    #[test]
    fn test_hits_top_pipe() {
        let settings = Settings::default();
        let track = track_with(&[PipePair::new(40.0, 200.0)]);
        let bird = Bird {
            y: 199.0,
            velocity: 0.0,
        };
        assert!(check_collision(&bird, &track, &settings));

        // Touching the gap top exactly is not an overlap
        let bird = Bird {
            y: 200.0,
            velocity: 0.0,
        };
        assert!(!check_collision(&bird, &track, &settings));
    }

    #[test]
    fn test_hits_bottom_pipe() {
        let settings = Settings::default();
        let track = track_with(&[PipePair::new(40.0, 200.0)]);
        // Bird bottom at 321 > gap bottom 320
        let bird = Bird {
            y: 291.0,
            velocity: 0.0,
        };
        assert!(check_collision(&bird, &track, &settings));

        let bird = Bird {
            y: 290.0,
            velocity: 0.0,
        };
        assert!(!check_collision(&bird, &track, &settings));
    }

    #[test]
    fn test_pipe_out_of_horizontal_reach() {
        let settings = Settings::default();
        // Bird spans x 50..80; pipe at 80..130 only touches
        let track = track_with(&[PipePair::new(80.0, 400.0)]);
        let bird = Bird {
            y: 100.0,
            velocity: 0.0,
        };
        assert!(!check_collision(&bird, &track, &settings));

        let track = track_with(&[PipePair::new(79.0, 400.0)]);
        assert!(check_collision(&bird, &track, &settings));
    }

    #[test]
    fn test_bottom_rect_reaches_floor() {
        let settings = Settings::default();
        let pipe = PipePair::new(0.0, 380.0);
        let (top, bottom) = pipe_rects(&pipe, &settings);
        assert_eq!(top.max.y, 380.0);
        assert_eq!(bottom.min.y, 500.0);
        assert!(bottom.max.y >= settings.height);
    }
}
