//! Game session state and core simulation types

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorVariant};
use super::obstacle::{ObstacleStream, ObstacleVariant, SpawnTimer};
use crate::tuning::Tuning;

/// Uniform random integers, passed explicitly into the simulation
pub trait RandomSource {
    /// Uniform integer in the inclusive range `[min, max]`
    fn random_int(&mut self, min: i32, max: i32) -> i32;
}

impl RandomSource for Pcg32 {
    fn random_int(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.random_range(min..=max)
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCause {
    /// Actor left the space between the screen top and the ground
    OutOfBounds,
    /// Actor touched an obstacle
    Collision,
}

/// Session lifecycle. There is no way back from `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Running,
    Terminated {
        final_score: u32,
        cause: TerminationCause,
    },
}

/// One play-through, from actor spawn to termination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Balance values this session was created with
    pub tuning: Tuning,
    pub actor: Actor,
    pub obstacles: ObstacleStream,
    pub spawn_timer: SpawnTimer,
    /// Obstacles passed so far
    pub score: u32,
    pub phase: SessionPhase,
    /// Draw hitbox outlines
    pub debug_overlay: bool,
    /// Idle mode: the simulation flies the actor itself
    pub autopilot: bool,
    /// Frames simulated
    pub frames: u64,
}

impl GameSession {
    /// Start a session; `rng` only picks the cosmetic variants
    pub fn new(tuning: Tuning, rng: &mut dyn RandomSource) -> Self {
        let actor_variant = ActorVariant::from_index(rng.random_int(0, ActorVariant::COUNT - 1));
        let obstacle_variant =
            ObstacleVariant::from_index(rng.random_int(0, ObstacleVariant::COUNT - 1));

        let actor = Actor::new(
            Vec2::new(tuning.actor_start_x, tuning.actor_start_y),
            Vec2::splat(tuning.actor_size),
            actor_variant,
        );

        Self {
            actor,
            obstacles: ObstacleStream::new(&tuning, obstacle_variant),
            spawn_timer: SpawnTimer::new(tuning.spawn_interval),
            score: 0,
            phase: SessionPhase::Running,
            debug_overlay: false,
            autopilot: false,
            frames: 0,
            tuning,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Score the session ended with, if it has ended
    pub fn final_score(&self) -> Option<u32> {
        match self.phase {
            SessionPhase::Running => None,
            SessionPhase::Terminated { final_score, .. } => Some(final_score),
        }
    }

    /// Move to `Terminated`, freezing the current score. Returns the final score.
    pub fn terminate(&mut self, cause: TerminationCause) -> u32 {
        if let SessionPhase::Terminated { final_score, .. } = self.phase {
            return final_score;
        }
        log::info!(
            "Session over after {} frames: {:?}, score {}",
            self.frames,
            cause,
            self.score
        );
        self.phase = SessionPhase::Terminated {
            final_score: self.score,
            cause,
        };
        self.score
    }
}
