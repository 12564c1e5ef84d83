//! Error types for the simulation

use thiserror::Error;

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;

/// Simulation error types
///
/// Every variant is a caller error or an I/O failure at the edges;
/// stepping a valid session never fails.
#[derive(Debug, Error)]
pub enum SimError {
    /// Action outside {0, 1}
    #[error("Invalid action: {0} (expected 0 = idle or 1 = flap)")]
    InvalidAction(u8),

    /// `step()` called after the episode ended
    #[error("Episode terminated, call reset")]
    EpisodeTerminated,

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// File access (settings, leaderboard)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
