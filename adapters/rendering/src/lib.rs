#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Mystery Escape adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use log::info;
use mystery_escape_core::{Event, FriendKind, Phase, Rect, Steering};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Whether the up direction is held.
    pub up: bool,
    /// Whether the down direction is held.
    pub down: bool,
    /// Whether the left direction is held.
    pub left: bool,
    /// Whether the right direction is held.
    pub right: bool,
    /// Whether a trap was requested on this frame.
    pub use_trap: bool,
    /// Whether the confirm key was pressed on this frame.
    pub confirm: bool,
    /// Whether the backspace key was pressed on this frame.
    pub backspace: bool,
    /// Characters typed on this frame, in order.
    pub typed: Vec<char>,
    /// Whether pause was toggled on this frame.
    pub pause: bool,
    /// Whether the player asked to quit.
    pub quit: bool,
    /// Whether the player asked to restart the session.
    pub restart: bool,
}

impl FrameInput {
    /// Direction keys held on this frame.
    #[must_use]
    pub const fn steering(&self) -> Steering {
        Steering {
            up: self.up,
            down: self.down,
            left: self.left,
            right: self.right,
        }
    }
}

/// Kind of sprite a backend should draw for a scene element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Walkable forest floor.
    Ground,
    /// Tree blocking movement.
    Tree,
    /// Drivable road.
    Road,
    /// Empty lot beside the roads.
    Lot,
    /// House standing on a lot.
    House,
    /// Streetlight placed on a road.
    Streetlight,
    /// Neighborhood exit leading to the highway.
    Exit,
    /// Snack granting a speed boost.
    Snack,
    /// Trap that can stun a monster.
    Trap,
    /// The van the player has to reach.
    Van,
    /// The player character.
    Player {
        /// Whether a snack boost is active.
        boosted: bool,
    },
    /// One of the friends.
    Friend(FriendKind),
    /// A forest monster.
    Monster {
        /// Whether the monster is stunned by a trap.
        stunned: bool,
    },
    /// The boss chasing the van.
    Boss,
    /// Car blocking a highway lane.
    Obstacle,
    /// Asphalt of a highway lane.
    Lane,
}

/// Sprite placed in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteInstance {
    /// What to draw.
    pub kind: SpriteKind,
    /// Area covered by the sprite in world units.
    pub bounds: Rect,
}

impl SpriteInstance {
    /// Creates a new sprite instance.
    #[must_use]
    pub const fn new(kind: SpriteKind, bounds: Rect) -> Self {
        Self { kind, bounds }
    }
}

/// Viewport following the player across an arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    viewport: Vec2,
    offset: Vec2,
}

impl Camera {
    /// Creates a camera with the provided viewport size, positioned at the origin.
    pub fn new(viewport: Vec2) -> Result<Self, RenderingError> {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }

        Ok(Self {
            viewport,
            offset: Vec2::ZERO,
        })
    }

    /// Size of the visible area in world units.
    #[must_use]
    pub const fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// World position shown at the top-left corner of the screen.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Centres the camera on `target` without showing anything outside `arena`.
    ///
    /// Arenas smaller than the viewport are pinned to their top-left corner.
    pub fn follow(&mut self, target: Vec2, arena: Rect) {
        let min = arena.origin();
        let max = (Vec2::new(arena.right(), arena.bottom()) - self.viewport).max(min);
        self.offset = (target - self.viewport * 0.5).clamp(min, max);
    }

    /// Converts a world position into screen space.
    #[must_use]
    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }

    /// Reports whether any part of `bounds` is on screen.
    #[must_use]
    pub fn is_visible(&self, bounds: &Rect) -> bool {
        Rect::new(self.offset, self.viewport).overlaps(bounds)
    }
}

/// Riddle shown while driving the highway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiddlePanel {
    /// Question asked to the player.
    pub prompt: String,
    /// Answer typed so far.
    pub answer: String,
}

/// Counters displayed on top of the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Hud {
    /// Current score.
    pub score: u32,
    /// Time spent playing.
    pub elapsed: Duration,
    /// Trap charges held by the player.
    pub traps: u32,
    /// Current courage.
    pub courage: f32,
    /// Courage the player starts with.
    pub courage_max: f32,
    /// Time left on the snack boost.
    pub boost_remaining: Duration,
    /// Friends that joined the caravan.
    pub friends_found: usize,
    /// Friends hidden in the forest.
    pub friends_total: usize,
    /// Distance left on the highway, while driving it.
    pub highway_remaining: Option<f32>,
    /// Riddle panel, while driving the highway.
    pub riddle: Option<RiddlePanel>,
}

/// Scene description combining the camera, sprites and HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Phase of the session, used to choose overlays.
    pub phase: Phase,
    /// Banner shown on the menu.
    pub banner: String,
    /// Camera through which sprites are viewed.
    pub camera: Camera,
    /// Sprites in draw order, expressed in world units.
    pub sprites: Vec<SpriteInstance>,
    /// Counters drawn above the sprites.
    pub hud: Hud,
}

impl Scene {
    /// Creates an empty scene for the menu.
    #[must_use]
    pub fn new<T>(banner: T, camera: Camera) -> Self
    where
        T: Into<String>,
    {
        Self {
            phase: Phase::Menu,
            banner: banner.into(),
            camera,
            sprites: Vec::new(),
            hud: Hud::default(),
        }
    }

    /// Sprites that intersect the camera viewport.
    pub fn visible_sprites(&self) -> impl Iterator<Item = &SpriteInstance> + '_ {
        self.sprites
            .iter()
            .filter(|sprite| self.camera.is_visible(&sprite.bounds))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Summary returned by the scene update closure for every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Time spent applying commands to the world.
    pub simulation: Duration,
    /// Time spent converting the world into the scene.
    pub scene_population: Duration,
    /// Whether the backend should close after this frame.
    pub exit_requested: bool,
}

/// Rendering backend capable of presenting Mystery Escape scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the real frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered. Returning a report with `exit_requested` closes the
    /// backend.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameReport + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewports must have a positive area.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}

/// Sound effects triggered by world events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A snack was eaten.
    Crunch,
    /// A trap was picked up.
    Pickup,
    /// A friend joined the caravan.
    Reunion,
    /// A monster caught the player.
    Scream,
    /// A trap snapped shut on a monster.
    Snap,
    /// The game was won.
    Fanfare,
    /// The game was lost.
    Defeat,
}

/// Maps a world event to the sound cue it should trigger, if any.
#[must_use]
pub fn sound_cue_for(event: &Event) -> Option<SoundCue> {
    match event {
        Event::SnackCollected => Some(SoundCue::Crunch),
        Event::TrapCollected => Some(SoundCue::Pickup),
        Event::FriendFound { .. } => Some(SoundCue::Reunion),
        Event::MonsterCollision { .. } => Some(SoundCue::Scream),
        Event::TrapUsed { .. } => Some(SoundCue::Snap),
        Event::Won { .. } => Some(SoundCue::Fanfare),
        Event::Lost { .. } => Some(SoundCue::Defeat),
        Event::TimeAdvanced { .. }
        | Event::PhaseChanged { .. }
        | Event::ObstacleSwerved { .. }
        | Event::RiddleSubmitted { .. }
        | Event::SessionRestarted { .. }
        | Event::QuitRequested => None,
    }
}

/// Destination for sound cues.
pub trait AudioSink {
    /// Plays the provided cue.
    fn play(&mut self, cue: SoundCue);

    /// Plays the cue associated with every event that has one.
    fn play_events(&mut self, events: &[Event]) {
        for cue in events.iter().filter_map(sound_cue_for) {
            self.play(cue);
        }
    }
}

/// Audio sink that records cues in the log instead of playing them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAudioSink;

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: SoundCue) {
        info!("sound cue {cue:?}");
    }
}
