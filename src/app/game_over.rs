//! Game-over screen: shows the final score and waits for a restart

use glam::Vec2;

use super::{AppState, PlayState, SessionConfig, Transition};
use crate::Rect;
use crate::platform::{DrawList, InputFrame, SpriteId};
use crate::sim::FrameContext;

const BANNER_SIZE: Vec2 = Vec2::new(192.0, 42.0);

pub struct GameOverState {
    final_score: u32,
    /// Settings for the session started on restart
    config: SessionConfig,
    restart_requested: bool,
}

impl GameOverState {
    pub fn new(final_score: u32, config: SessionConfig) -> Self {
        Self {
            final_score,
            config,
            restart_requested: false,
        }
    }

    pub fn final_score(&self) -> u32 {
        self.final_score
    }
}

impl AppState for GameOverState {
    fn name(&self) -> &'static str {
        "game_over"
    }

    fn init(&mut self) {
        log::info!("Game over, final score {}", self.final_score);
    }

    fn handle_input(&mut self, input: &InputFrame) -> Transition {
        self.restart_requested |= input.restart;
        Transition::None
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Transition {
        if !self.restart_requested {
            return Transition::None;
        }
        self.restart_requested = false;
        // The new session draws its variants from the shared generator
        Transition::Replace(Box::new(PlayState::new(self.config, &mut *ctx.rng)))
    }

    fn render(&self, screen: Vec2, out: &mut DrawList) {
        out.sprite(SpriteId::Background, Rect::new(0.0, 0.0, screen.x, screen.y));

        let banner = (screen - BANNER_SIZE) * 0.5;
        out.sprite(
            SpriteId::GameOverBanner,
            Rect::new(banner.x, banner.y, BANNER_SIZE.x, BANNER_SIZE.y),
        );

        out.text(
            format!("Score: {}", self.final_score),
            Vec2::new(screen.x / 2.0, screen.y - 50.0),
        );
        out.text("Space to play again", Vec2::new(screen.x / 2.0, screen.y - 30.0));
    }
}
