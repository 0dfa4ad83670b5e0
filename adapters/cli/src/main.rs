#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Gridfire session.

mod config;
mod game;
mod input;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use gridfire_rendering::RecordingBackend;

use crate::{config::GameConfig, game::Game, input::ScriptedInput};

/// Rotation applied by the scripted input, as a fraction of full turn speed.
const SCRIPTED_TURN: f32 = 0.35;

/// Headless Gridfire driver.
#[derive(Debug, Parser)]
#[command(name = "gridfire", version, about = "Runs a headless Gridfire session")]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Seed overriding both agent placement and attack rolls.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Fire every this many ticks; zero never fires.
    #[arg(long, default_value_t = 60)]
    fire_every: u64,
}

/// Entry point for the Gridfire command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.spawning.seed = seed;
        config.behavior_seed = seed;
    }

    let mut game = Game::new(&config, RecordingBackend::new())?;
    println!("{}", game.banner());

    let input = ScriptedInput::new(args.fire_every, SCRIPTED_TURN);
    let dt = Duration::from_millis(args.tick_ms);
    for tick in 0..args.ticks {
        game.tick(dt, input.frame(tick))?;
    }

    let summary = game.summary();
    let timings = game.average_timings();
    log::info!(
        "per tick: sweep {:?}, behaviour {:?}, compose {:?}",
        timings.sweep,
        timings.behavior,
        timings.compose
    );
    println!(
        "{} ticks, {} games ({} won, {} lost), {} shots, {} kills, {} frames, {} sounds",
        summary.ticks,
        summary.games,
        summary.victories,
        summary.defeats,
        summary.shots,
        summary.kills,
        game.backend().frames().len(),
        game.backend().sounds().len()
    );
    Ok(())
}
