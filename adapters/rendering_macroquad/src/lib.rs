#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Mystery Escape.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Sound cues are routed through
//! [`mystery_escape_rendering::AudioSink`] instead.
//!
//! Every element is drawn with primitive shapes; the overlays and HUD live in
//! the local `hud` module.

mod hud;

use anyhow::Result;
use macroquad::input::{get_char_pressed, is_key_down, is_key_pressed, KeyCode};
use mystery_escape_core::Phase;
use mystery_escape_rendering::{
    Color, FrameInput, FrameReport, Presentation, RenderingBackend, Scene, SpriteInstance,
    SpriteKind,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

/// Keys sampled on a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct KeyboardObservations {
    /// Arrow keys or `W`.
    up: bool,
    /// Arrow keys or `S`.
    down: bool,
    /// Arrow keys or `A`.
    left: bool,
    /// Arrow keys or `D`.
    right: bool,
    /// `Space` spends a trap.
    space: bool,
    /// `Enter` starts the game or submits the riddle.
    enter: bool,
    /// `Backspace` edits the riddle answer.
    backspace: bool,
    /// `Escape` pauses, resumes, or leaves.
    escape: bool,
    /// `R` restarts a finished session.
    restart: bool,
    /// Text typed on this frame.
    typed: Vec<char>,
}

impl KeyboardObservations {
    fn poll() -> Self {
        let held = |keys: &[KeyCode]| keys.iter().any(|key| is_key_down(*key));
        let mut typed = Vec::new();
        while let Some(character) = get_char_pressed() {
            typed.push(character);
        }

        Self {
            up: held(&[KeyCode::Up, KeyCode::W]),
            down: held(&[KeyCode::Down, KeyCode::S]),
            left: held(&[KeyCode::Left, KeyCode::A]),
            right: held(&[KeyCode::Right, KeyCode::D]),
            space: is_key_pressed(KeyCode::Space),
            enter: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            backspace: is_key_pressed(KeyCode::Backspace),
            escape: is_key_pressed(KeyCode::Escape),
            restart: is_key_pressed(KeyCode::R),
            typed,
        }
    }
}

/// Translates raw key observations into the frame input for the current phase.
///
/// Escape toggles pause while a session is running and quits otherwise. `R`
/// only restarts a finished session so it can still be typed into the riddle.
fn gather_frame_input(phase: Phase, keyboard: KeyboardObservations) -> FrameInput {
    let running = matches!(phase, Phase::Active(_) | Phase::Paused(_));

    FrameInput {
        up: keyboard.up,
        down: keyboard.down,
        left: keyboard.left,
        right: keyboard.right,
        use_trap: keyboard.space,
        confirm: keyboard.enter,
        backspace: keyboard.backspace,
        typed: keyboard
            .typed
            .into_iter()
            .filter(|character| !character.is_control())
            .collect(),
        pause: keyboard.escape && running,
        quit: keyboard.escape && !running,
        restart: keyboard.restart && phase.is_finished(),
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    scene_population: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    scene_population_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_scene_population: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);

        self.simulation_accum += breakdown.simulation;
        self.scene_population_accum += breakdown.scene_population;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames,
            avg_scene_population: self.scene_population_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.scene_population_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameReport + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let viewport = scene.camera.viewport();
        let mut config = macroquad::window::Conf {
            window_title,
            window_width: viewport.x.round() as i32,
            window_height: viewport.y.round() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardObservations::poll();
                let frame_input = gather_frame_input(scene.phase, keyboard);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let report = update_scene(frame_dt, frame_input, &mut scene);
                if report.exit_requested {
                    break;
                }

                let render_start = Instant::now();
                macroquad::window::clear_background(background);
                if !matches!(scene.phase, Phase::Menu) {
                    draw_sprites(&scene);
                    hud::draw_hud(&scene);
                }
                hud::draw_overlay(&scene);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: report.simulation,
                    scene_population: report.scene_population,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_scene_population,
                        avg_render,
                    }) = fps_metrics
                    {
                        println!(
                            "FPS: {:.2} (10s avg: {:.2}) | sim: {:>6.2}ms scene: {:>6.2}ms render: {:>6.2}ms",
                            per_second,
                            trailing_ten_seconds,
                            avg_simulation.as_secs_f64() * 1_000.0,
                            avg_scene_population.as_secs_f64() * 1_000.0,
                            avg_render.as_secs_f64() * 1_000.0,
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_sprites(scene: &Scene) {
    for sprite in scene.visible_sprites() {
        draw_sprite(scene, sprite);
    }
}

fn draw_sprite(scene: &Scene, sprite: &SpriteInstance) {
    let origin = scene.camera.to_screen(sprite.bounds.origin());
    let size = sprite.bounds.size();
    let color = to_macroquad_color(sprite_color(sprite.kind));

    match sprite.kind {
        SpriteKind::Tree => {
            let center = origin + size * 0.5;
            macroquad::shapes::draw_circle(center.x, center.y, size.x.min(size.y) * 0.5, color);
        }
        SpriteKind::Streetlight => {
            let center = origin + size * 0.5;
            macroquad::shapes::draw_circle(center.x, center.y, size.x * 0.15, color);
        }
        SpriteKind::Lane => {
            macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, color);
            macroquad::shapes::draw_line(
                origin.x,
                origin.y,
                origin.x + size.x,
                origin.y,
                2.0,
                to_macroquad_color(Color::from_rgb_u8(220, 220, 220)),
            );
        }
        _ => macroquad::shapes::draw_rectangle(origin.x, origin.y, size.x, size.y, color),
    }
}

/// Flat color used to draw each sprite kind.
fn sprite_color(kind: SpriteKind) -> Color {
    match kind {
        SpriteKind::Ground => Color::from_rgb_u8(34, 85, 34),
        SpriteKind::Tree => Color::from_rgb_u8(0, 60, 0),
        SpriteKind::Road => Color::from_rgb_u8(90, 90, 90),
        SpriteKind::Lot => Color::from_rgb_u8(60, 110, 60),
        SpriteKind::House => Color::from_rgb_u8(150, 75, 0),
        SpriteKind::Streetlight => Color::from_rgb_u8(255, 240, 150),
        SpriteKind::Exit => Color::from_rgb_u8(255, 215, 0),
        SpriteKind::Snack => Color::from_rgb_u8(139, 69, 19),
        SpriteKind::Trap => Color::from_rgb_u8(128, 128, 128),
        SpriteKind::Van => Color::from_rgb_u8(0, 200, 150),
        SpriteKind::Player { boosted: false } => Color::from_rgb_u8(101, 67, 33),
        SpriteKind::Player { boosted: true } => Color::from_rgb_u8(101, 67, 33).lighten(0.4),
        SpriteKind::Friend(_) => Color::from_rgb_u8(80, 120, 255),
        SpriteKind::Monster { stunned: false } => Color::from_rgb_u8(200, 0, 0),
        SpriteKind::Monster { stunned: true } => Color::from_rgb_u8(200, 0, 0).lighten(0.6),
        SpriteKind::Boss => Color::from_rgb_u8(120, 0, 120),
        SpriteKind::Obstacle => Color::from_rgb_u8(220, 60, 60),
        SpriteKind::Lane => Color::from_rgb_u8(50, 50, 50),
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
