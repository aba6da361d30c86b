//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta and screen size come in through `FrameContext`
//! - Randomness only through the passed-in `RandomSource`
//! - Obstacles iterate in spawn order
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use actor::{Actor, ActorVariant};
pub use collision::{check_collision, check_score};
pub use obstacle::{ObstaclePair, ObstacleStream, ObstacleVariant, SpawnTimer};
pub use state::{GameSession, RandomSource, SessionPhase, TerminationCause};
pub use tick::{FrameContext, TickInput, TickOutcome, autopilot_jumps, tick};
