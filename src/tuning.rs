//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives here so a run can be
//! re-balanced from a JSON file without rebuilding.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Velocity delta applied per jump press (negative is up)
    pub jump_impulse: f32,
    /// Actor spawn position (top-left corner)
    pub actor_start_x: f32,
    pub actor_start_y: f32,
    /// Actor bounding box edge length
    pub actor_size: f32,

    /// Obstacle geometry
    pub pipe_width: f32,
    pub pipe_height: f32,
    /// Horizontal scroll speed (pixels/s)
    pub pipe_speed: f32,
    /// Seconds between spawns
    pub spawn_interval: f32,
    pub gap_multiplier: f32,
    pub gap_floor: f32,
    pub gap_margin: f32,

    /// Ground strip height at the bottom of the screen
    pub ground_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            actor_start_x: ACTOR_START_X,
            actor_start_y: ACTOR_START_Y,
            actor_size: ACTOR_SIZE,

            pipe_width: PIPE_WIDTH,
            pipe_height: PIPE_HEIGHT,
            pipe_speed: PIPE_SPEED,
            spawn_interval: SPAWN_INTERVAL,
            gap_multiplier: GAP_MULTIPLIER,
            gap_floor: GAP_FLOOR,
            gap_margin: GAP_MARGIN,

            ground_height: GROUND_HEIGHT,
        }
    }
}

impl Tuning {
    /// Vertical gap between the top and bottom rectangle of a pair
    pub fn gap_height(&self) -> f32 {
        (self.actor_size * self.gap_multiplier).max(self.gap_floor)
    }

    /// Replace values that would break the simulation with their defaults
    ///
    /// Sizes, speeds and intervals must be finite and positive; the gravity
    /// and jump values only need to be finite.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        fn positive(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value <= 0.0 {
                log::warn!("tuning: {name} = {value} is invalid, using {fallback}");
                *value = fallback;
            }
        }
        fn non_negative(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() || *value < 0.0 {
                log::warn!("tuning: {name} = {value} is invalid, using {fallback}");
                *value = fallback;
            }
        }
        fn finite(value: &mut f32, fallback: f32, name: &str) {
            if !value.is_finite() {
                log::warn!("tuning: {name} = {value} is invalid, using {fallback}");
                *value = fallback;
            }
        }

        finite(&mut self.gravity, defaults.gravity, "gravity");
        finite(&mut self.jump_impulse, defaults.jump_impulse, "jump_impulse");
        finite(&mut self.actor_start_x, defaults.actor_start_x, "actor_start_x");
        finite(&mut self.actor_start_y, defaults.actor_start_y, "actor_start_y");
        positive(&mut self.actor_size, defaults.actor_size, "actor_size");
        positive(&mut self.pipe_width, defaults.pipe_width, "pipe_width");
        positive(&mut self.pipe_height, defaults.pipe_height, "pipe_height");
        positive(&mut self.pipe_speed, defaults.pipe_speed, "pipe_speed");
        positive(&mut self.spawn_interval, defaults.spawn_interval, "spawn_interval");
        non_negative(&mut self.gap_multiplier, defaults.gap_multiplier, "gap_multiplier");
        non_negative(&mut self.gap_floor, defaults.gap_floor, "gap_floor");
        non_negative(&mut self.gap_margin, defaults.gap_margin, "gap_margin");
        non_negative(&mut self.ground_height, defaults.ground_height, "ground_height");

        self
    }
}
