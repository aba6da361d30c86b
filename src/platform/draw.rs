//! Draw commands emitted by the game states
//!
//! States describe *what* to draw and where; the platform decides how.

use glam::Vec2;

use crate::Rect;
use crate::sim::{ActorVariant, ObstacleVariant};

/// Identity of a drawable sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteId {
    Background,
    Ground,
    Actor(ActorVariant),
    Obstacle(ObstacleVariant),
    GameOverBanner,
}

/// Outline colors for debug overlays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineColor {
    Actor,
    Obstacle,
}

/// A single draw request
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Sprite stretched over `rect`; `flip_y` mirrors it vertically
    Sprite {
        sprite: SpriteId,
        rect: Rect,
        flip_y: bool,
    },
    /// Rectangle outline (debug hitboxes)
    Outline { rect: Rect, color: OutlineColor },
    /// Text centered horizontally on `pos.x`, top at `pos.y`
    Text { text: String, pos: Vec2 },
}

/// Ordered list of draw commands for one frame (back to front)
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn sprite(&mut self, sprite: SpriteId, rect: Rect) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            rect,
            flip_y: false,
        });
    }

    pub fn sprite_flipped(&mut self, sprite: SpriteId, rect: Rect) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            rect,
            flip_y: true,
        });
    }

    pub fn outline(&mut self, rect: Rect, color: OutlineColor) {
        self.commands.push(DrawCommand::Outline { rect, color });
    }

    pub fn text(&mut self, text: impl Into<String>, pos: Vec2) {
        self.commands.push(DrawCommand::Text {
            text: text.into(),
            pos,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of sprite commands matching `pred`
    pub fn count_sprites(&self, pred: impl Fn(SpriteId) -> bool) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Sprite { sprite, .. } if pred(*sprite)))
            .count()
    }
}
