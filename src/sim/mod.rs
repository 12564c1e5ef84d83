//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Per-session seeded RNG only
//! - Pipes stored in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod observation;
pub mod reward;
pub mod session;
pub mod state;
pub mod track;

pub use collision::{Rect, check_collision};
pub use observation::Observation;
pub use reward::{TickOutcome, crash_penalty, shape_reward};
pub use session::{PipeView, Session, Snapshot, StepResult};
pub use state::{Action, Bird, GapRng, PipePair, SessionPhase};
pub use track::ObstacleTrack;
