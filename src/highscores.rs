//! High score leaderboard
//!
//! Tracks the top 10 episodes, persisted as a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::autopilot::EpisodeSummary;
use crate::error::Result;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Pipes passed
    pub score: u32,
    /// Sum of rewards over the episode (tie-breaker)
    pub total_reward: f32,
    pub ticks: u64,
    /// Gap seed, to replay the episode
    pub seed: u64,
    /// Policy that played it
    pub policy: String,
}

impl HighScoreEntry {
    fn beats(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score
            || (self.score == other.score && self.total_reward > other.total_reward)
    }
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if an entry would make the leaderboard
    pub fn qualifies(&self, entry: &HighScoreEntry) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| entry.beats(e)).unwrap_or(true)
    }

    /// Add an episode if it qualifies.
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add(&mut self, summary: &EpisodeSummary, policy: &str) -> Option<usize> {
        let entry = HighScoreEntry {
            score: summary.score,
            total_reward: summary.total_reward,
            ticks: summary.ticks,
            seed: summary.seed,
            policy: policy.to_string(),
        };
        if !self.qualifies(&entry) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.beats(e));
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from a JSON file. A missing file is an empty board.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No high scores at {}, starting fresh", path.display());
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    /// Save to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(score: u32, total_reward: f32) -> EpisodeSummary {
        EpisodeSummary {
            seed: 1,
            score,
            total_reward,
            ticks: 100,
            truncated: false,
        }
    }

    #[test]
    fn test_sorted_best_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add(&summary(3, 20.0), "gap"), Some(1));
        assert_eq!(scores.add(&summary(7, 40.0), "gap"), Some(1));
        assert_eq!(scores.add(&summary(5, 30.0), "random"), Some(2));
        let order: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![7, 5, 3]);
        assert_eq!(scores.top_score(), Some(7));
    }

    #[test]
    fn test_reward_breaks_ties() {
        let mut scores = HighScores::new();
        scores.add(&summary(4, 10.0), "gap");
        assert_eq!(scores.add(&summary(4, 12.0), "gap"), Some(1));
        assert_eq!(scores.add(&summary(4, 11.0), "gap"), Some(2));
    }

    #[test]
    fn test_capacity() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u32 {
            scores.add(&summary(s, 0.0), "gap");
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // Worse than the last entry
        assert_eq!(scores.add(&summary(0, -1.0), "gap"), None);
        assert_eq!(scores.add(&summary(20, 0.0), "gap"), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(2));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let path = std::env::temp_dir().join("flappy_rl_no_such_scores.json");
        let scores = HighScores::load(&path).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("flappy_rl_scores_{}.json", std::process::id()));
        let mut scores = HighScores::new();
        scores.add(&summary(9, 55.5), "gap");
        scores.save(&path).unwrap();
        let loaded = HighScores::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.entries, scores.entries);
    }
}
