//! Platform abstraction layer
//!
//! Handles everything outside the simulation:
//! - Screen size and frame timing
//! - Input edges (presses, not held keys)
//! - Presenting draw commands
//! - Close requests

pub mod draw;
pub mod headless;
pub mod terminal;

pub use draw::{DrawCommand, DrawList, OutlineColor, SpriteId};
pub use headless::HeadlessPlatform;
pub use terminal::TerminalPlatform;

use anyhow::Result;
use glam::Vec2;

/// Input presses collected since the previous frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Jump presses (several presses in one frame all count)
    pub jumps: u32,
    /// Restart from the game-over screen
    pub restart: bool,
    pub toggle_debug: bool,
    pub toggle_autopilot: bool,
}

impl InputFrame {
    /// A frame with a single jump press (which also restarts after game over)
    pub fn jump() -> Self {
        Self {
            jumps: 1,
            restart: true,
            ..Default::default()
        }
    }
}

/// The rendering/platform collaborator driven by `app::run`
pub trait Platform {
    /// Current logical screen size, read every frame
    fn screen_size(&self) -> Vec2;

    /// Seconds elapsed since the previous frame
    fn frame_delta_seconds(&mut self) -> f32;

    /// Drain input presses since the previous call
    fn poll_input(&mut self) -> Result<InputFrame>;

    /// Show one frame. Platforms without assets treat draws as no-ops.
    fn present(&mut self, frame: &DrawList) -> Result<()>;

    /// True once the user asked to close the game
    fn should_close(&self) -> bool;
}
