//! Skyhop entry point
//!
//! Parses the command line, loads settings and runs the state machine on the
//! terminal (or headless) platform.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use skyhop::Settings;
use skyhop::app::{self, PlayState, SessionConfig, StateMachine};
use skyhop::platform::{HeadlessPlatform, TerminalPlatform};

#[derive(Debug, Parser)]
#[command(name = "skyhop")]
#[command(about = "Side-scrolling gap-flying arcade game for the terminal")]
struct Cli {
    /// Settings file (JSON). Missing or invalid files fall back to defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Run this many frames without a terminal and print the outcome
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Start with the autopilot flying
    #[arg(long)]
    autopilot: bool,

    /// Start with hitbox outlines shown
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load_or_default(cli.config.as_deref());
    settings.autopilot |= cli.autopilot;
    settings.debug_overlay |= cli.debug;

    let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
    log::info!("{} starting with seed: {}", settings.title, seed);

    let mut rng = Pcg32::seed_from_u64(seed);
    let play = PlayState::new(SessionConfig::from(&settings), &mut rng);
    let mut machine = StateMachine::with_initial(Box::new(play));

    if let Some(frames) = cli.headless {
        let mut platform =
            HeadlessPlatform::new(settings.screen_size(), settings.frame_seconds())
                .with_max_frames(frames);
        let ran = app::run(&mut machine, &mut platform, &mut rng)?;
        println!(
            "ran {ran} frames, final state: {}",
            machine.active_name().unwrap_or("<none>")
        );
        return Ok(());
    }

    let mut platform = TerminalPlatform::new(settings.screen_size(), settings.target_fps)?;
    platform.enter(&settings.title)?;
    let result = app::run(&mut machine, &mut platform, &mut rng);
    // Restore the terminal before reporting any error
    platform.exit()?;
    result.map(|_| ())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
