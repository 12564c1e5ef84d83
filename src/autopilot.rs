//! Built-in policies for headless runs
//!
//! A trained agent lives outside this crate; these are stand-ins for smoke
//! runs, benchmarks and demo traces. Policies only see the observation vector.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Action, Observation, Session, StepResult};

/// Maps an observation to an action
pub trait Policy {
    fn act(&mut self, obs: &Observation) -> Action;
}

impl<F: FnMut(&Observation) -> Action> Policy for F {
    fn act(&mut self, obs: &Observation) -> Action {
        self(obs)
    }
}

/// Heuristic that keeps the bird's top edge just above the next gap's bottom
#[derive(Debug, Clone, Copy)]
pub struct GapFollower {
    /// Flap once the gap bottom is closer than this below the bird (fraction of height)
    pub clearance: f32,
    /// Target height when no pipe is ahead (fraction of height)
    pub cruise_y: f32,
}

impl Default for GapFollower {
    fn default() -> Self {
        Self {
            // Bird size (0.05) plus room to rise without hitting the gap top
            clearance: 0.085,
            cruise_y: 0.5,
        }
    }
}

impl Policy for GapFollower {
    fn act(&mut self, obs: &Observation) -> Action {
        let has_pipe = obs.pipe_distance() < 1.0 || obs.gap_bottom_offset() != 0.0;
        let too_low = if has_pipe {
            obs.gap_bottom_offset() < self.clearance
        } else {
            obs.bird_y() > self.cruise_y
        };

        // Never flap while still rising
        if too_low && obs.velocity() >= 0.0 {
            Action::Flap
        } else {
            Action::Idle
        }
    }
}

/// Flaps with a fixed probability each tick
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
    flap_probability: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64, flap_probability: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            flap_probability: if flap_probability.is_nan() {
                0.0
            } else {
                flap_probability.clamp(0.0, 1.0)
            },
        }
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _obs: &Observation) -> Action {
        if self.rng.random_bool(self.flap_probability) {
            Action::Flap
        } else {
            Action::Idle
        }
    }
}

/// Outcome of one episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Seed of the session's gap generator
    pub seed: u64,
    pub score: u32,
    pub total_reward: f32,
    pub ticks: u64,
    /// Stopped by the tick limit rather than a crash
    pub truncated: bool,
}

/// Reset the session and play one episode to the end
pub fn run_episode(
    session: &mut Session,
    policy: &mut impl Policy,
    max_ticks: Option<u64>,
) -> Result<EpisodeSummary> {
    run_episode_with(session, policy, max_ticks, |_, _| {})
}

/// Like [`run_episode`], calling `on_step` after every tick
pub fn run_episode_with(
    session: &mut Session,
    policy: &mut impl Policy,
    max_ticks: Option<u64>,
    mut on_step: impl FnMut(&Session, &StepResult),
) -> Result<EpisodeSummary> {
    let mut obs = session.reset();
    let mut total_reward = 0.0;
    let mut done = false;

    while !done && max_ticks.is_none_or(|max| session.tick() < max) {
        let action = policy.act(&obs);
        let result = session.step(action)?;
        total_reward += result.reward;
        obs = result.observation;
        done = result.done;
        on_step(session, &result);
    }

    Ok(EpisodeSummary {
        seed: session.seed(),
        score: session.score(),
        total_reward,
        ticks: session.tick(),
        truncated: !done,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_closure_policy_falls() {
        let mut session = Session::with_seed(3);
        let mut idle = |_: &Observation| Action::Idle;
        let summary = run_episode(&mut session, &mut idle, None).unwrap();

        // Free fall from y=300 crosses the floor on tick 35
        assert_eq!(summary.ticks, 35);
        assert_eq!(summary.score, 0);
        assert!(!summary.truncated);
        assert!(session.is_done());
    }

    #[test]
    fn test_total_reward_matches_session() {
        let mut session = Session::with_seed(3);
        let mut policy = RandomPolicy::new(1, 0.1);
        let summary = run_episode(&mut session, &mut policy, Some(2000)).unwrap();
        assert_eq!(summary.total_reward, session.episode_reward());
        assert_eq!(summary.seed, 3);
    }

    #[test]
    fn test_gap_follower_outlives_free_fall() {
        for seed in 0..8 {
            let mut session = Session::with_seed(seed);
            let summary = run_episode(&mut session, &mut GapFollower::default(), Some(5000)).unwrap();
            // No pipe reaches the bird before tick ~107
            assert!(summary.ticks > 100, "seed {seed}: {summary:?}");
        }
    }

    #[test]
    fn test_gap_follower_flaps_below_gap() {
        let mut policy = GapFollower::default();
        // Gap bottom only 0.02 below the bird, falling
        let obs = Observation([0.5, 0.1, 0.3, -0.18, 0.02]);
        assert_eq!(policy.act(&obs), Action::Flap);
        // Same place, still rising
        let obs = Observation([0.5, -0.3, 0.3, -0.18, 0.02]);
        assert_eq!(policy.act(&obs), Action::Idle);
        // Well above the gap bottom
        let obs = Observation([0.3, 0.1, 0.3, 0.0, 0.2]);
        assert_eq!(policy.act(&obs), Action::Idle);
    }

    #[test]
    fn test_max_ticks_truncates() {
        let mut session = Session::with_seed(3);
        let summary = run_episode(&mut session, &mut GapFollower::default(), Some(20)).unwrap();
        assert_eq!(summary.ticks, 20);
        assert!(summary.truncated);
    }

    #[test]
    fn test_random_policy_reproducible() {
        let obs = Observation([0.5, 0.0, 1.0, 0.0, 0.0]);
        let mut a = RandomPolicy::new(9, 0.5);
        let mut b = RandomPolicy::new(9, 0.5);
        for _ in 0..100 {
            assert_eq!(a.act(&obs), b.act(&obs));
        }
    }

    #[test]
    fn test_on_step_sees_every_tick() {
        let mut session = Session::with_seed(4);
        let mut ticks = Vec::new();
        let summary = run_episode_with(
            &mut session,
            &mut GapFollower::default(),
            Some(50),
            |s, _| ticks.push(s.tick()),
        )
        .unwrap();
        assert_eq!(ticks.len() as u64, summary.ticks);
        assert_eq!(ticks.first(), Some(&1));
    }
}
