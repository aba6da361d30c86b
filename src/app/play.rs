//! Play state: runs one game session

use glam::Vec2;

use super::{AppState, GameOverState, SessionConfig, Transition};
use crate::Rect;
use crate::platform::{DrawList, InputFrame, OutlineColor, SpriteId};
use crate::sim::{FrameContext, GameSession, RandomSource, TickInput, TickOutcome, tick};

pub struct PlayState {
    config: SessionConfig,
    session: GameSession,
    /// Input collected by `handle_input`, consumed by the next `update`
    queued: TickInput,
}

impl PlayState {
    pub fn new(config: SessionConfig, rng: &mut dyn RandomSource) -> Self {
        let mut session = GameSession::new(config.tuning, rng);
        session.debug_overlay = config.debug_overlay;
        session.autopilot = config.autopilot;
        log::info!(
            "New session ({:?} actor, {:?} obstacles)",
            session.actor.variant,
            session.obstacles.variant()
        );
        Self {
            config,
            session,
            queued: TickInput::default(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }
}

impl AppState for PlayState {
    fn name(&self) -> &'static str {
        "play"
    }

    fn handle_input(&mut self, input: &InputFrame) -> Transition {
        self.queued.jumps += input.jumps;
        self.queued.toggle_debug ^= input.toggle_debug;
        self.queued.toggle_autopilot ^= input.toggle_autopilot;
        Transition::None
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Transition {
        let input = std::mem::take(&mut self.queued);
        match tick(&mut self.session, &input, ctx) {
            TickOutcome::Continue => Transition::None,
            TickOutcome::Terminated { final_score } => {
                // Carry the overlay/idle toggles into the next session
                let config = SessionConfig {
                    debug_overlay: self.session.debug_overlay,
                    autopilot: self.session.autopilot,
                    ..self.config
                };
                Transition::Replace(Box::new(GameOverState::new(final_score, config)))
            }
        }
    }

    fn render(&self, screen: Vec2, out: &mut DrawList) {
        let session = &self.session;
        let ground_height = session.tuning.ground_height;

        out.sprite(SpriteId::Background, Rect::new(0.0, 0.0, screen.x, screen.y));

        let sprite = SpriteId::Obstacle(session.obstacles.variant());
        for pair in session.obstacles.iter() {
            out.sprite_flipped(sprite, pair.top);
            out.sprite(sprite, pair.bottom);
        }

        out.sprite(
            SpriteId::Ground,
            Rect::new(0.0, screen.y - ground_height, screen.x, ground_height),
        );
        out.sprite(SpriteId::Actor(session.actor.variant), session.actor.bbox());

        out.text(session.score.to_string(), Vec2::new(screen.x / 2.0, 20.0));
        if session.autopilot {
            out.text("AUTO", Vec2::new(screen.x / 2.0, screen.y - ground_height / 2.0));
        }

        if session.debug_overlay {
            out.outline(session.actor.bbox(), OutlineColor::Actor);
            for pair in session.obstacles.iter() {
                out.outline(pair.top, OutlineColor::Obstacle);
                out.outline(pair.bottom, OutlineColor::Obstacle);
            }
        }
    }
}
