//! Per-frame session update
//!
//! Advances a `GameSession` by one frame in a fixed order: impulses,
//! physics, bounds, obstacle stream, collisions, scoring.

use glam::Vec2;

use super::collision::{check_collision, check_score};
use super::state::{GameSession, RandomSource, TerminationCause};

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump presses since the last frame
    pub jumps: u32,
    /// Toggle hitbox outlines
    pub toggle_debug: bool,
    /// Toggle idle mode (the simulation flies itself)
    pub toggle_autopilot: bool,
}

/// Everything a frame needs from the outside world
pub struct FrameContext<'a> {
    /// Seconds since the previous frame
    pub dt: f32,
    /// Current screen size (may change between frames)
    pub screen: Vec2,
    pub rng: &'a mut dyn RandomSource,
}

/// Result of advancing a session by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Terminated { final_score: u32 },
}

/// Pixels the actor's center may sink below the target before idle mode jumps
const AUTOPILOT_SLACK: f32 = 8.0;

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput, ctx: &mut FrameContext<'_>) -> TickOutcome {
    if let Some(final_score) = session.final_score() {
        return TickOutcome::Terminated { final_score };
    }

    if input.toggle_debug {
        session.debug_overlay = !session.debug_overlay;
        log::debug!("Debug overlay: {}", session.debug_overlay);
    }
    if input.toggle_autopilot {
        session.autopilot = !session.autopilot;
        log::info!("Idle mode: {}", session.autopilot);
    }

    session.frames += 1;
    let tuning = session.tuning;

    // Impulses queued this frame (plus the pilot's, in idle mode)
    let mut jumps = input.jumps;
    if session.autopilot {
        jumps += autopilot_jumps(session, ctx.screen);
    }
    for _ in 0..jumps {
        session.actor.apply_impulse(tuning.jump_impulse);
    }

    session.actor.integrate(ctx.dt, tuning.gravity);

    if session
        .actor
        .is_out_of_bounds(ctx.screen.y, tuning.ground_height)
    {
        let final_score = session.terminate(TerminationCause::OutOfBounds);
        return TickOutcome::Terminated { final_score };
    }

    session.obstacles.advance(ctx.dt, tuning.pipe_speed);
    session.obstacles.evict_offscreen();
    if session.spawn_timer.tick(ctx.dt) {
        session
            .obstacles
            .spawn(ctx.screen, tuning.ground_height, &mut *ctx.rng);
    }

    // Collisions first, then scoring, against the same obstacle positions
    if check_collision(&session.actor.bbox(), session.obstacles.iter()) {
        let final_score = session.terminate(TerminationCause::Collision);
        return TickOutcome::Terminated { final_score };
    }

    let passed = check_score(&session.actor, session.obstacles.iter_mut());
    if passed > 0 {
        session.score += passed;
        log::debug!("Score: {}", session.score);
    }

    TickOutcome::Continue
}

/// Jumps the idle-mode pilot wants this frame.
///
/// Aims the actor's center at the gap of the next obstacle it has not yet
/// cleared, or at the middle of the playfield when none is in view.
pub fn autopilot_jumps(session: &GameSession, screen: Vec2) -> u32 {
    let actor = &session.actor;
    let target = session
        .obstacles
        .iter()
        .find(|pair| pair.right() >= actor.pos.x)
        .map(|pair| pair.gap_center())
        .unwrap_or((screen.y - session.tuning.ground_height) / 2.0);

    u32::from(actor.center().y > target + AUTOPILOT_SLACK)
}
