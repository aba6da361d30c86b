//! Headless platform: fixed timestep, scripted input, no output
//!
//! Used by tests and `--headless` runs.

use std::collections::VecDeque;

use anyhow::Result;
use glam::Vec2;

use super::{DrawCommand, DrawList, InputFrame, Platform};

pub struct HeadlessPlatform {
    screen: Vec2,
    dt: f32,
    script: VecDeque<InputFrame>,
    max_frames: Option<u64>,
    assets_loaded: bool,
    /// Frames presented so far
    pub frames: u64,
    /// Sprite commands actually drawn (zero when assets are missing)
    pub sprites_drawn: u64,
    /// Copy of the most recent frame
    pub last_frame: DrawList,
}

impl HeadlessPlatform {
    pub fn new(screen: Vec2, dt: f32) -> Self {
        Self {
            screen,
            dt,
            script: VecDeque::new(),
            max_frames: None,
            assets_loaded: true,
            frames: 0,
            sprites_drawn: 0,
            last_frame: DrawList::new(),
        }
    }

    /// Close after presenting `frames` frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Simulate a platform whose sprites failed to load
    pub fn without_assets(mut self) -> Self {
        self.assets_loaded = false;
        self
    }

    /// Queue input for upcoming frames, one entry per frame
    pub fn script(mut self, frames: impl IntoIterator<Item = InputFrame>) -> Self {
        self.script.extend(frames);
        self
    }

    /// Change the reported screen size
    pub fn resize(&mut self, screen: Vec2) {
        self.screen = screen;
    }
}

impl Platform for HeadlessPlatform {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn frame_delta_seconds(&mut self) -> f32 {
        self.dt
    }

    fn poll_input(&mut self) -> Result<InputFrame> {
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        self.frames += 1;
        self.last_frame = frame.clone();
        if !self.assets_loaded {
            return Ok(());
        }
        self.sprites_drawn += frame
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Sprite { .. }))
            .count() as u64;
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.max_frames.is_some_and(|max| self.frames >= max)
    }
}
