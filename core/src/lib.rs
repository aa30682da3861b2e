#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Mystery Escape engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intent, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values that adapters
//! translate into sounds and presentation changes. Generators and movement
//! systems share the geometry in [`geometry`] and the tuning in [`config`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod geometry;

pub use config::{ConfigError, GameConfig};
pub use geometry::{CellCoord, Rect, Terrain, Tile, TileGrid};
pub use glam::Vec2;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Mystery Escape: find your friends and get out of the forest!";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the held directional input used by subsequent ticks.
    Steer {
        /// Directions currently held by the player.
        steering: Steering,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Spends a trap on the nearest monster in range.
    UseTrap,
    /// Starts the game from the menu or submits the riddle answer.
    Confirm,
    /// Deletes the last character of the riddle answer.
    Backspace,
    /// Appends a character to the riddle answer.
    TypeCharacter {
        /// Character typed by the player.
        character: char,
    },
    /// Pauses an active session or resumes a paused one.
    TogglePause,
    /// Discards the session and generates a fresh one.
    Restart,
    /// Requests that the hosting adapter shut down.
    Quit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that simulated time advanced by the provided delta.
    TimeAdvanced {
        /// Duration of simulated time that elapsed.
        dt: Duration,
    },
    /// Reports that the session moved between phases.
    PhaseChanged {
        /// Phase that was active before the transition.
        from: Phase,
        /// Phase that is active after the transition.
        to: Phase,
    },
    /// Announces that the player ate a snack and gained a speed boost.
    SnackCollected,
    /// Announces that the player picked up a trap.
    TrapCollected,
    /// Announces that a friend joined the caravan.
    FriendFound {
        /// Friend that was found.
        friend: FriendKind,
    },
    /// Reports that an active monster touched the unboosted player.
    MonsterCollision {
        /// Monster responsible for the collision.
        monster: MonsterId,
    },
    /// Reports that a trap stunned a monster.
    TrapUsed {
        /// Monster that was stunned.
        monster: MonsterId,
    },
    /// Reports that a highway obstacle swerved away from the vehicle.
    ObstacleSwerved {
        /// Lane the obstacle occupied before swerving.
        from_lane: u32,
        /// Lane the obstacle occupies after swerving.
        to_lane: u32,
    },
    /// Reports that a riddle answer was submitted.
    RiddleSubmitted {
        /// Whether the submitted answer solved the riddle.
        correct: bool,
    },
    /// Announces that the session was won.
    Won {
        /// Final score of the session.
        score: u32,
    },
    /// Announces that the session was lost.
    Lost {
        /// Reason the session ended.
        cause: LossCause,
    },
    /// Reports that a fresh session replaced the previous one.
    SessionRestarted {
        /// Seed used to generate the new session.
        seed: u64,
    },
    /// Requests that the hosting adapter shut down.
    QuitRequested,
}

/// Broad phase of a play session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Title screen awaiting confirmation.
    Menu,
    /// Simulation running the provided activity.
    Active(Activity),
    /// Simulation frozen while remembering the activity to resume.
    Paused(Activity),
    /// Session ended in defeat.
    GameOver(LossCause),
    /// Session ended in victory.
    Won,
}

impl Phase {
    /// Activity simulated by ticks, if any.
    #[must_use]
    pub const fn active_activity(self) -> Option<Activity> {
        match self {
            Self::Active(activity) => Some(activity),
            _ => None,
        }
    }

    /// Reports whether the session reached a terminal phase.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver(_) | Self::Won)
    }
}

/// Gameplay running inside an active or paused phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Activity {
    /// On foot in the provided stage.
    Playing(Stage),
    /// In the van along the provided route.
    Driving(Route),
}

/// On-foot stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Procedurally generated forest with friends and monsters.
    Forest,
    /// Suburban road network leading back to the van.
    Neighborhood,
}

/// Driving routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Boss chase through the neighborhood toward the highway exit.
    NeighborhoodChase,
    /// Lane-based highway escape ending with the riddle.
    Highway,
}

/// Reasons a session can be lost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LossCause {
    /// An active monster touched the unboosted player.
    CaughtByMonster,
    /// The courage meter drained to zero.
    OutOfCourage,
    /// The boss caught the player during the chase.
    CaughtByBoss,
}

/// Simulated time that only advances while the session is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameClock {
    now: Duration,
}

impl GameClock {
    /// Creates a clock starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current simulated instant measured from session start.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Deadline that falls `delay` after the current instant.
    #[must_use]
    pub fn deadline_after(&self, delay: Duration) -> Deadline {
        Deadline::at(self.now.saturating_add(delay))
    }
}

/// Instant on a [`GameClock`] after which a timed effect ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Deadline(Duration);

impl Deadline {
    /// Creates a deadline at the provided clock instant.
    #[must_use]
    pub const fn at(instant: Duration) -> Self {
        Self(instant)
    }

    /// Clock instant of the deadline.
    #[must_use]
    pub const fn instant(&self) -> Duration {
        self.0
    }

    /// Reports whether `now` has reached the deadline.
    #[must_use]
    pub fn has_passed(&self, now: Duration) -> bool {
        now >= self.0
    }

    /// Time left before the deadline, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Duration {
        self.0.saturating_sub(now)
    }
}

/// Cardinal directions used by random-walking monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward smaller y.
    Up,
    /// Toward larger y.
    Down,
    /// Toward smaller x.
    Left,
    /// Toward larger x.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit step along the direction.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Reports whether the direction moves along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Directional keys held by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Steering {
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
}

impl Steering {
    /// Steering with nothing held.
    pub const NONE: Steering = Steering {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Per-axis direction in `{-1, 0, 1}`.
    ///
    /// Right wins over left and down wins over up. The result is not
    /// normalised, so diagonal movement is faster than axial movement.
    #[must_use]
    pub fn vector(&self) -> Vec2 {
        let x = if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        };
        let y = if self.down {
            1.0
        } else if self.up {
            -1.0
        } else {
            0.0
        };
        Vec2::new(x, y)
    }
}

/// Friends waiting to be rescued, in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendKind {
    /// Always hungry.
    Shaggy,
    /// Finds the clues.
    Velma,
    /// Danger-prone.
    Daphne,
    /// Sets the traps.
    Fred,
}

impl FriendKind {
    /// Every friend in spawn order.
    pub const ALL: [FriendKind; 4] = [Self::Shaggy, Self::Velma, Self::Daphne, Self::Fred];

    /// Display name of the friend.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shaggy => "Shaggy",
            Self::Velma => "Velma",
            Self::Daphne => "Daphne",
            Self::Fred => "Fred",
        }
    }
}

/// Movement policy of a forest monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatrolType {
    /// Walks a cardinal direction and re-rolls it periodically.
    Random,
    /// Pursues the player when close, random-walks otherwise.
    Chase,
}

/// Identifier of a forest monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(u32);

impl MonsterId {
    /// Creates a new identifier wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying numeric identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of item scattered through the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Grants points and a temporary speed boost.
    Snack,
    /// Grants points and one trap charge.
    Trap,
}

/// Pickup lying in the forest until the player touches it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collectible {
    kind: CollectibleKind,
    bounds: Rect,
}

impl Collectible {
    /// Creates a collectible occupying `bounds`.
    #[must_use]
    pub const fn new(kind: CollectibleKind, bounds: Rect) -> Self {
        Self { kind, bounds }
    }

    /// Kind of the collectible.
    #[must_use]
    pub const fn kind(&self) -> CollectibleKind {
        self.kind
    }

    /// Area the player must overlap to pick it up.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }
}
