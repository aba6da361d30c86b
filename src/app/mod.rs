//! Top-level application state machine
//!
//! One state is active at a time (Play or Game Over). States never touch the
//! machine directly: they return a `Transition` from `handle_input`/`update`
//! and the machine queues it as the pending change, applied at the start of
//! the next frame.

pub mod game_over;
pub mod play;

pub use game_over::GameOverState;
pub use play::PlayState;

use anyhow::Result;
use glam::Vec2;

use crate::platform::{DrawList, InputFrame, Platform};
use crate::settings::Settings;
use crate::sim::{FrameContext, RandomSource};
use crate::tuning::Tuning;

/// What a fresh Play state needs to start a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub tuning: Tuning,
    pub debug_overlay: bool,
    pub autopilot: bool,
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            tuning: settings.tuning,
            debug_overlay: settings.debug_overlay,
            autopilot: settings.autopilot,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

/// Change requested by the active state
pub enum Transition {
    None,
    /// Discard the active state and activate the new one
    Replace(Box<dyn AppState>),
    /// Suspend the active state beneath the new one
    Push(Box<dyn AppState>),
    /// Drop the active state and resume the one beneath it
    Pop,
    /// Stop the application
    Quit,
}

/// A top-level screen driven once per frame
pub trait AppState {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Called once when the state becomes active for the first time
    fn init(&mut self) {}

    /// Called when another state is pushed on top
    fn pause(&mut self) {}

    /// Called when the state above is popped
    fn resume(&mut self) {}

    fn handle_input(&mut self, input: &InputFrame) -> Transition;

    fn update(&mut self, ctx: &mut FrameContext<'_>) -> Transition;

    fn render(&self, screen: Vec2, out: &mut DrawList);
}

enum PendingChange {
    Replace {
        state: Box<dyn AppState>,
        reset_session: bool,
    },
    Pop,
}

/// Owns the active state (plus any suspended ones) and one pending change
#[derive(Default)]
pub struct StateMachine {
    /// Last entry is the active state
    states: Vec<Box<dyn AppState>>,
    pending: Option<PendingChange>,
    quit_requested: bool,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine whose first frame activates `state`
    pub fn with_initial(state: Box<dyn AppState>) -> Self {
        let mut machine = Self::new();
        machine.request_replace(state, true);
        machine
    }

    /// Queue `state` to become active at the next `apply_pending`.
    ///
    /// With `reset_session` the current state is dropped; otherwise it is
    /// paused and kept beneath the new one. A later request in the same
    /// frame overwrites an earlier one.
    pub fn request_replace(&mut self, state: Box<dyn AppState>, reset_session: bool) {
        if let Some(previous) = self.pending.take() {
            log::debug!("Dropping superseded request for {}", pending_name(&previous));
        }
        self.pending = Some(PendingChange::Replace {
            state,
            reset_session,
        });
    }

    /// Queue removal of the active state
    pub fn request_pop(&mut self) {
        self.pending = Some(PendingChange::Pop);
    }

    /// Ask the application to stop
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    /// Queue whatever a state returned
    pub fn submit(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Replace(state) => self.request_replace(state, true),
            Transition::Push(state) => self.request_replace(state, false),
            Transition::Pop => self.request_pop(),
            Transition::Quit => self.request_quit(),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the pending change, if any. Returns true if the active state changed.
    pub fn apply_pending(&mut self) -> bool {
        let Some(change) = self.pending.take() else {
            return false;
        };

        let from = self.active_name().unwrap_or("<none>");
        match change {
            PendingChange::Replace {
                mut state,
                reset_session,
            } => {
                if reset_session {
                    self.states.pop();
                } else if let Some(current) = self.states.last_mut() {
                    current.pause();
                }
                log::info!("State: {} -> {}", from, state.name());
                state.init();
                self.states.push(state);
            }
            PendingChange::Pop => {
                self.states.pop();
                if let Some(current) = self.states.last_mut() {
                    current.resume();
                }
                log::info!(
                    "State: {} popped, {} active",
                    from,
                    self.active_name().unwrap_or("<none>")
                );
            }
        }
        true
    }

    pub fn active(&self) -> Option<&dyn AppState> {
        self.states.last().map(|state| state.as_ref())
    }

    pub fn active_name(&self) -> Option<&'static str> {
        self.active().map(|state| state.name())
    }

    /// Number of states held (active plus suspended)
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// True after a quit request, or once there is nothing left to run
    pub fn is_ending(&self) -> bool {
        self.quit_requested || (self.states.is_empty() && self.pending.is_none())
    }

    /// One frame: apply the pending change, then input, update and render
    /// on the active state
    pub fn run_frame(&mut self, input: &InputFrame, ctx: &mut FrameContext<'_>, out: &mut DrawList) {
        self.apply_pending();

        let Some(state) = self.states.last_mut() else {
            return;
        };
        let on_input = state.handle_input(input);
        let on_update = state.update(ctx);
        state.render(ctx.screen, out);

        self.submit(on_input);
        self.submit(on_update);
    }
}

fn pending_name(change: &PendingChange) -> &'static str {
    match change {
        PendingChange::Replace { state, .. } => state.name(),
        PendingChange::Pop => "pop",
    }
}

/// Drive `machine` on `platform` until the platform closes or the machine
/// ends. Returns the number of frames run.
pub fn run<P, R>(machine: &mut StateMachine, platform: &mut P, rng: &mut R) -> Result<u64>
where
    P: Platform + ?Sized,
    R: RandomSource,
{
    let mut frames = 0;
    let mut draw_list = DrawList::new();

    while !platform.should_close() && !machine.is_ending() {
        let dt = platform.frame_delta_seconds();
        let input = platform.poll_input()?;
        if platform.should_close() {
            break;
        }

        let mut ctx = FrameContext {
            dt,
            screen: platform.screen_size(),
            rng: &mut *rng,
        };
        draw_list.clear();
        machine.run_frame(&input, &mut ctx, &mut draw_list);
        platform.present(&draw_list)?;
        frames += 1;
    }

    log::info!("Stopped after {frames} frames");
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::platform::{HeadlessPlatform, SpriteId};

    const DT: f32 = 1.0 / 60.0;
    const SCREEN: Vec2 = Vec2::new(288.0, 512.0);

    type Log = Rc<RefCell<Vec<String>>>;

    /// State that records its lifecycle and hands back a scripted transition
    struct Probe {
        name: &'static str,
        log: Log,
        next: Option<Transition>,
    }

    impl Probe {
        fn boxed(name: &'static str, log: &Log) -> Box<Self> {
            Box::new(Self {
                name,
                log: log.clone(),
                next: None,
            })
        }

        fn then(mut self: Box<Self>, next: Transition) -> Box<Self> {
            self.next = Some(next);
            self
        }

        fn record(&self, event: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, event));
        }
    }

    impl AppState for Probe {
        fn name(&self) -> &'static str {
            self.name
        }
        fn init(&mut self) {
            self.record("init");
        }
        fn pause(&mut self) {
            self.record("pause");
        }
        fn resume(&mut self) {
            self.record("resume");
        }
        fn handle_input(&mut self, _input: &InputFrame) -> Transition {
            self.record("input");
            Transition::None
        }
        fn update(&mut self, _ctx: &mut FrameContext<'_>) -> Transition {
            self.record("update");
            self.next.take().unwrap_or(Transition::None)
        }
        fn render(&self, _screen: Vec2, _out: &mut DrawList) {
            self.record("render");
        }
    }

    fn frame(machine: &mut StateMachine, rng: &mut Pcg32) {
        let mut ctx = FrameContext {
            dt: DT,
            screen: SCREEN,
            rng,
        };
        machine.run_frame(&InputFrame::default(), &mut ctx, &mut DrawList::new());
    }

    #[test]
    fn test_frame_protocol_order() {
        let log = Log::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        assert_eq!(machine.active_name(), None);

        frame(&mut machine, &mut rng);
        assert_eq!(
            *log.borrow(),
            vec!["a:init", "a:input", "a:update", "a:render"]
        );
    }

    #[test]
    fn test_replace_waits_for_next_frame() {
        let log = Log::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let first = Probe::boxed("a", &log).then(Transition::Replace(Probe::boxed("b", &log)));
        let mut machine = StateMachine::with_initial(first);

        // "a" requests the swap mid-frame; it stays active for the whole frame
        frame(&mut machine, &mut rng);
        assert_eq!(machine.active_name(), Some("a"));
        assert!(machine.has_pending());

        assert!(machine.apply_pending());
        assert_eq!(machine.active_name(), Some("b"));
        assert_eq!(machine.depth(), 1);
        assert!(!machine.apply_pending());
    }

    #[test]
    fn test_double_request_applies_last_only() {
        let log = Log::default();
        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        machine.apply_pending();

        machine.request_replace(Probe::boxed("b", &log), true);
        machine.request_replace(Probe::boxed("c", &log), true);
        assert_eq!(machine.active_name(), Some("a"));

        assert!(machine.apply_pending());
        assert_eq!(machine.active_name(), Some("c"));
        assert_eq!(machine.depth(), 1);
        assert!(!log.borrow().iter().any(|e| e.starts_with("b:")));
    }

    #[test]
    fn test_push_pauses_and_pop_resumes() {
        let log = Log::default();
        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        machine.apply_pending();

        machine.request_replace(Probe::boxed("b", &log), false);
        machine.apply_pending();
        assert_eq!(machine.depth(), 2);
        assert_eq!(machine.active_name(), Some("b"));

        machine.request_pop();
        machine.apply_pending();
        assert_eq!(machine.active_name(), Some("a"));
        assert_eq!(
            *log.borrow(),
            vec!["a:init", "a:pause", "b:init", "a:resume"]
        );
    }

    #[test]
    fn test_ending() {
        let log = Log::default();
        assert!(StateMachine::new().is_ending());

        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        assert!(!machine.is_ending());
        machine.apply_pending();
        assert!(!machine.is_ending());

        machine.submit(Transition::Quit);
        assert!(machine.is_ending());

        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        machine.apply_pending();
        machine.submit(Transition::Pop);
        machine.apply_pending();
        assert!(machine.is_ending());
    }

    #[test]
    fn test_run_stops_on_quit() {
        let log = Log::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut machine =
            StateMachine::with_initial(Probe::boxed("a", &log).then(Transition::Quit));
        let mut platform = HeadlessPlatform::new(SCREEN, DT).with_max_frames(100);

        let frames = run(&mut machine, &mut platform, &mut rng).unwrap();
        assert_eq!(frames, 1);
    }

    #[test]
    fn test_run_stops_on_platform_close() {
        let log = Log::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut machine = StateMachine::with_initial(Probe::boxed("a", &log));
        let mut platform = HeadlessPlatform::new(SCREEN, DT).with_max_frames(25);

        assert_eq!(run(&mut machine, &mut platform, &mut rng).unwrap(), 25);
        assert_eq!(platform.frames, 25);
    }

    #[test]
    fn test_play_game_over_play_cycle() {
        let mut rng = Pcg32::seed_from_u64(42);
        let config = SessionConfig {
            tuning: Tuning {
                spawn_interval: 1.0e6,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut machine = StateMachine::with_initial(Box::new(PlayState::new(config, &mut rng)));

        // No input: the actor sinks into the ground
        let mut platform = HeadlessPlatform::new(SCREEN, DT).with_max_frames(400);
        run(&mut machine, &mut platform, &mut rng).unwrap();
        assert!(machine.has_pending() || machine.active_name() == Some("game_over"));
        machine.apply_pending();
        assert_eq!(machine.active_name(), Some("game_over"));
        assert!(platform.last_frame.commands().iter().any(|cmd| matches!(
            cmd,
            crate::platform::DrawCommand::Text { text, .. } if text == "Score: 0"
        )));

        // Space restarts into a fresh session
        let mut platform = HeadlessPlatform::new(SCREEN, DT)
            .script([InputFrame::jump()])
            .with_max_frames(2);
        run(&mut machine, &mut platform, &mut rng).unwrap();
        assert_eq!(machine.active_name(), Some("play"));
        assert_eq!(machine.depth(), 1);
    }

    #[test]
    fn test_platform_resize_mid_session() {
        let mut rng = Pcg32::seed_from_u64(11);
        let config = SessionConfig {
            tuning: Tuning {
                gravity: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut machine = StateMachine::with_initial(Box::new(PlayState::new(config, &mut rng)));
        let mut platform = HeadlessPlatform::new(Vec2::new(1000.0, 512.0), DT);

        // Narrower, then wider than the first frames, with obstacles in flight
        let mut total = 0;
        for (width, frames) in [(1000.0, 100), (288.0, 100), (1500.0, 150)] {
            total += frames;
            platform.resize(Vec2::new(width, 512.0));
            platform = platform.with_max_frames(total);
            run(&mut machine, &mut platform, &mut rng).unwrap();
        }

        assert_eq!(platform.frames, 350);
        assert_eq!(machine.active_name(), Some("play"));
        assert!(!machine.has_pending());
        let obstacles = platform
            .last_frame
            .count_sprites(|s| matches!(s, SpriteId::Obstacle(_)));
        assert_eq!(obstacles, 2 * 3);
    }

    #[test]
    fn test_missing_assets_do_not_stop_the_game() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut machine =
            StateMachine::with_initial(Box::new(PlayState::new(SessionConfig::default(), &mut rng)));
        let mut platform = HeadlessPlatform::new(SCREEN, DT)
            .without_assets()
            .with_max_frames(30);

        assert_eq!(run(&mut machine, &mut platform, &mut rng).unwrap(), 30);
        assert_eq!(platform.sprites_drawn, 0);
        assert_eq!(machine.active_name(), Some("play"));
    }
}
