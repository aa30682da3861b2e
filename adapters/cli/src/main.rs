#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Mystery Escape experience.

mod scene;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use log::info;
use mystery_escape_core::config::GameConfig;
use mystery_escape_rendering::{
    Camera, Color, FrameInput, FrameReport, LogAudioSink, Presentation, RenderingBackend, Scene,
};
use mystery_escape_rendering_macroquad::MacroquadBackend;
use mystery_escape_world::{query, World};

use crate::{scene::populate_scene, session::Session};

/// Escape the haunted forest with all of your friends.
#[derive(Debug, Parser)]
#[command(name = "mystery-escape", version, about)]
struct Args {
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the procedural generators; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Print frame timing metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run the given number of ticks without a window and print a summary.
    #[arg(long, value_name = "TICKS")]
    headless_ticks: Option<u32>,
}

/// Entry point for the Mystery Escape command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let world = World::new(config, seed).context("invalid game configuration")?;
    info!("starting session with seed {seed:#x}");

    match args.headless_ticks {
        Some(ticks) => run_headless(world, ticks),
        None => run_windowed(world, &args),
    }
}

/// Reads the configuration file, falling back to the defaults.
fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid config file {}", path.display()))
}

fn parse_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(text).context("failed to parse TOML")?;
    config.validate()?;
    Ok(config)
}

fn run_headless(world: World, ticks: u32) -> Result<()> {
    let mut session = Session::new(world, LogAudioSink);
    let tick = query::config(session.world()).timing.tick();
    let start = FrameInput {
        confirm: true,
        ..FrameInput::default()
    };
    let _ = session.advance(Duration::ZERO, start);
    for _ in 0..ticks {
        let _ = session.advance(tick, FrameInput::default());
    }

    let world = session.world();
    println!(
        "phase: {:?}, score: {}, elapsed: {:.2}s, seed: {}",
        query::phase(world),
        query::score(world),
        query::elapsed(world).as_secs_f32(),
        query::seed(world),
    );
    Ok(())
}

fn run_windowed(world: World, args: &Args) -> Result<()> {
    let arena = &query::config(&world).arena;
    let camera = Camera::new(Vec2::new(arena.viewport_width, arena.viewport_height))?;
    let mut scene = Scene::new(query::welcome_banner(&world), camera);
    populate_scene(&world, &mut scene);

    let presentation = Presentation::new(
        "Mystery Escape",
        Color::from_rgb_u8(10, 20, 10),
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    let mut session = Session::new(world, LogAudioSink);
    backend.run(presentation, move |frame_dt, input, scene| {
        let simulation_start = Instant::now();
        let exit_requested = session.advance(frame_dt, input);
        let simulation = simulation_start.elapsed();

        let population_start = Instant::now();
        populate_scene(session.world(), scene);
        FrameReport {
            simulation,
            scene_population: population_start.elapsed(),
            exit_requested,
        }
    })
}
