//! Skyhop - A side-scrolling gap-flying arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `app`: Top-level state machine (Play <-> Game Over)
//! - `platform`: Terminal/headless platform abstraction
//! - `settings`: Window and run settings
//! - `tuning`: Data-driven game balance

pub mod app;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Logical screen size (matches the classic portrait layout)
    pub const SCREEN_WIDTH: f32 = 288.0;
    pub const SCREEN_HEIGHT: f32 = 512.0;
    /// Target frame rate of the driver loop
    pub const TARGET_FPS: u32 = 60;
    /// Largest frame delta fed to the simulation (prevents tunneling after stalls)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Ground strip at the bottom of the screen
    pub const GROUND_HEIGHT: f32 = 112.0;

    /// Actor defaults
    pub const ACTOR_START_X: f32 = 60.0;
    pub const ACTOR_START_Y: f32 = 183.0;
    pub const ACTOR_SIZE: f32 = 34.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f32 = 2900.0;
    /// Velocity added per jump press (pixels/s, negative is up)
    pub const JUMP_IMPULSE: f32 = -1900.0;

    /// Obstacle defaults
    pub const PIPE_WIDTH: f32 = 52.0;
    pub const PIPE_HEIGHT: f32 = 320.0;
    pub const PIPE_SPEED: f32 = 120.0;
    pub const SPAWN_INTERVAL: f32 = 1.5;
    /// Gap is `max(actor height * multiplier, floor)`
    pub const GAP_MULTIPLIER: f32 = 3.0;
    pub const GAP_FLOOR: f32 = 100.0;
    /// Minimum distance between the gap and the screen top / ground
    pub const GAP_MARGIN: f32 = 24.0;
}

/// Axis-aligned rectangle in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}
