//! The player-controlled actor and its hop physics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Cosmetic color of the actor (no gameplay effect)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ActorVariant {
    #[default]
    Red,
    Blue,
    Yellow,
}

impl ActorVariant {
    pub const COUNT: i32 = 3;

    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(Self::COUNT) {
            0 => ActorVariant::Red,
            1 => ActorVariant::Blue,
            _ => ActorVariant::Yellow,
        }
    }
}

/// The actor: an axis-aligned box that hops upward on input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Top-left corner
    pub pos: Vec2,
    /// Vertical velocity accumulated during the current frame
    pub vel_y: f32,
    pub size: Vec2,
    pub variant: ActorVariant,
}

impl Actor {
    pub fn new(pos: Vec2, size: Vec2, variant: ActorVariant) -> Self {
        Self {
            pos,
            vel_y: 0.0,
            size,
            variant,
        }
    }

    /// Bounding box used for collisions
    pub fn bbox(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Add a jump impulse. Impulses in the same frame stack with no cap.
    pub fn apply_impulse(&mut self, impulse: f32) {
        self.vel_y += impulse;
    }

    /// Advance one frame.
    ///
    /// Gravity and any impulses only live for the frame that produced them:
    /// the velocity is zeroed after moving, so the actor sinks at a steady
    /// `gravity * dt²` per frame instead of accelerating. Frame-rate dependent.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
        self.vel_y = 0.0;
    }

    /// True once the actor leaves the space between the screen top and the ground
    pub fn is_out_of_bounds(&self, screen_height: f32, ground_height: f32) -> bool {
        self.pos.y < 0.0 || self.pos.y + self.size.y > screen_height - ground_height
    }
}
