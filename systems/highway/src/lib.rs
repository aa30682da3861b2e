#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lane-based highway used for the final escape.
//!
//! The track is one dimensional: obstacles sit at a distance along the road in
//! one of several lanes, and the van advances along the same axis. Collision
//! boxes are expressed in a track-local frame where `x` is measured from the
//! left edge of the visible window and `y` from the top of the first lane.

use std::time::Duration;

use log::debug;
use mystery_escape_core::{
    config::{GameConfig, HighwayConfig},
    Deadline, GameClock, Rect, Steering,
};
use rand::{seq::SliceRandom, Rng};

/// Obstacle parked in a lane of the highway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    distance: f32,
    lane: u32,
}

impl Obstacle {
    /// Creates an obstacle at `distance` along the track in `lane`.
    #[must_use]
    pub const fn new(distance: f32, lane: u32) -> Self {
        Self { distance, lane }
    }

    /// Distance from the start of the track.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Lane currently occupied.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.lane
    }
}

/// Obstacle that changed lanes to avoid the van.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swerve {
    /// Lane before the swerve.
    pub from_lane: u32,
    /// Lane after the swerve.
    pub to_lane: u32,
}

/// Generated highway track.
#[derive(Clone, Debug, PartialEq)]
pub struct Highway {
    length: f32,
    lanes: u32,
    tile_length: f32,
    view_length: f32,
    vehicle_x: f32,
    obstacles: Vec<Obstacle>,
}

impl Highway {
    /// Creates a highway with explicit obstacles.
    #[must_use]
    pub fn new(config: &GameConfig, obstacles: Vec<Obstacle>) -> Self {
        let tile_length = config.arena.tile_length;
        Self {
            length: config.highway.length_tiles as f32 * tile_length,
            lanes: config.highway.lanes,
            tile_length,
            view_length: config.arena.viewport_width,
            vehicle_x: config.arena.viewport_width / 3.0,
            obstacles,
        }
    }

    /// Total track length in world units.
    #[must_use]
    pub const fn length(&self) -> f32 {
        self.length
    }

    /// Number of lanes.
    #[must_use]
    pub const fn lanes(&self) -> u32 {
        self.lanes
    }

    /// Obstacles ordered by distance.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Distance still to travel from `position` to the end of the track.
    #[must_use]
    pub fn remaining(&self, position: f32) -> f32 {
        (self.length - position).max(0.0)
    }

    /// Horizontal offset of the van inside the visible window.
    #[must_use]
    pub const fn vehicle_x(&self) -> f32 {
        self.vehicle_x
    }

    /// Track-local box of a van in `lane`.
    #[must_use]
    pub fn vehicle_bounds(&self, lane: u32) -> Rect {
        Rect::from_xywh(
            self.vehicle_x,
            lane as f32 * self.tile_length,
            2.0 * self.tile_length,
            self.tile_length,
        )
    }

    /// Track-local box of `obstacle` seen from `position`, if it is visible.
    #[must_use]
    pub fn obstacle_bounds(&self, obstacle: &Obstacle, position: f32) -> Option<Rect> {
        let relative = obstacle.distance - position;
        (relative >= 0.0 && relative < self.view_length).then(|| {
            Rect::from_xywh(
                relative,
                obstacle.lane as f32 * self.tile_length,
                2.0 * self.tile_length,
                self.tile_length,
            )
        })
    }

    /// Moves every visible obstacle touching `vehicle` into an adjacent lane.
    pub fn swerve_colliding<R: Rng + ?Sized>(
        &mut self,
        vehicle: Rect,
        position: f32,
        rng: &mut R,
    ) -> Vec<Swerve> {
        let mut swerves = Vec::new();
        let last_lane = self.lanes.saturating_sub(1);
        for index in 0..self.obstacles.len() {
            let Some(obstacle) = self.obstacles.get(index).copied() else {
                continue;
            };
            let hit = self
                .obstacle_bounds(&obstacle, position)
                .map_or(false, |bounds| bounds.overlaps(&vehicle));
            if !hit {
                continue;
            }

            let mut choices = Vec::with_capacity(2);
            if obstacle.lane > 0 {
                choices.push(obstacle.lane - 1);
            }
            if obstacle.lane < last_lane {
                choices.push(obstacle.lane + 1);
            }
            if let Some(&to_lane) = choices.choose(rng) {
                if let Some(slot) = self.obstacles.get_mut(index) {
                    slot.lane = to_lane;
                }
                swerves.push(Swerve {
                    from_lane: obstacle.lane,
                    to_lane,
                });
            }
        }
        swerves
    }
}

/// Generates a highway from `config` using `rng`.
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Highway {
    let settings = &config.highway;
    let tile = config.arena.tile_length;
    let length = settings.length_tiles as f32 * tile;
    let interval = settings.obstacle_interval_tiles.max(1) as f32 * tile;

    let mut obstacles = Vec::new();
    let mut distance = 0.0;
    while distance < length {
        if rng.gen_bool(f64::from(settings.obstacle_chance)) {
            obstacles.push(Obstacle::new(distance, rng.gen_range(0..settings.lanes.max(1))));
        }
        distance += interval;
    }

    debug!(
        "generated highway of {} tiles with {} obstacles",
        settings.length_tiles,
        obstacles.len()
    );
    Highway::new(config, obstacles)
}

/// Lane change in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneChange {
    target: u32,
    started: Duration,
    deadline: Deadline,
}

impl LaneChange {
    /// Lane the van is moving into.
    #[must_use]
    pub const fn target(&self) -> u32 {
        self.target
    }

    /// Fraction of the manoeuvre completed at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        let total = self.deadline.instant().saturating_sub(self.started);
        if total.is_zero() {
            return 1.0;
        }
        let done = now.saturating_sub(self.started);
        (done.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Van driving along the highway.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vehicle {
    position: f32,
    lane: u32,
    speed: f32,
    lane_change: Option<LaneChange>,
}

impl Vehicle {
    /// Creates a van at the start of the track in the configured start lane.
    #[must_use]
    pub fn new(settings: &HighwayConfig) -> Self {
        Self {
            position: 0.0,
            lane: settings.start_lane,
            speed: settings.initial_speed,
            lane_change: None,
        }
    }

    /// Distance travelled along the track.
    #[must_use]
    pub const fn position(&self) -> f32 {
        self.position
    }

    /// Lane occupied, ignoring a change in progress.
    #[must_use]
    pub const fn lane(&self) -> u32 {
        self.lane
    }

    /// Current speed in world units per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Lane change in progress, if any.
    #[must_use]
    pub const fn lane_change(&self) -> Option<LaneChange> {
        self.lane_change
    }

    /// Lane position interpolated through a change in progress, for drawing.
    #[must_use]
    pub fn visual_lane(&self, now: Duration) -> f32 {
        match self.lane_change {
            Some(change) => {
                let from = self.lane as f32;
                let to = change.target as f32;
                from + (to - from) * change.progress(now)
            }
            None => self.lane as f32,
        }
    }

    /// Advances the van by one tick.
    ///
    /// While a lane change is in progress the van holds its distance and
    /// ignores input. Otherwise it moves forward by its speed, left and right
    /// start a lane change, and up and down adjust the speed.
    pub fn drive(&mut self, steering: &Steering, clock: &GameClock, settings: &HighwayConfig) {
        if let Some(change) = self.lane_change {
            if change.deadline.has_passed(clock.now()) {
                self.lane = change.target;
                self.lane_change = None;
            }
            return;
        }

        self.position += self.speed;

        let target = if steering.left {
            self.lane.checked_sub(1)
        } else if steering.right && self.lane + 1 < settings.lanes {
            Some(self.lane + 1)
        } else {
            None
        };
        if let Some(target) = target {
            self.lane_change = Some(LaneChange {
                target,
                started: clock.now(),
                deadline: clock.deadline_after(settings.lane_change()),
            });
        }

        if steering.up {
            self.speed = (self.speed + settings.acceleration).min(settings.max_speed);
        } else if steering.down {
            self.speed = (self.speed - settings.acceleration).max(settings.min_speed);
        }
    }
}
