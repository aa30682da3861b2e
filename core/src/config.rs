//! Tuning surface for every generator and simulation rule.
//!
//! Every section implements [`Default`] with the canonical values and is
//! marked `#[serde(default)]`, so a TOML file only needs to list the knobs it
//! overrides.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Smallest forest, in tiles along either axis, that keeps every placement range non-empty.
pub const MIN_FOREST_TILES: u32 = 12;

/// Smallest neighborhood, in tiles along either axis, that keeps every road range non-empty.
pub const MIN_NEIGHBORHOOD_TILES: u32 = 18;

/// Aggregated configuration for a play session.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Arena dimensions and viewport.
    pub arena: ArenaConfig,
    /// Forest generation and placement.
    pub forest: ForestConfig,
    /// Neighborhood road network generation.
    pub neighborhood: NeighborhoodConfig,
    /// Highway track and vehicle handling.
    pub highway: HighwayConfig,
    /// Player movement, boost, courage, and traps.
    pub player: PlayerConfig,
    /// Friend caravan behaviour.
    pub friend: FriendConfig,
    /// Monster and boss behaviour.
    pub monster: MonsterConfig,
    /// Points awarded for each scoring action.
    pub scoring: ScoringConfig,
    /// Riddle that ends the highway sequence.
    pub riddle: RiddleConfig,
    /// Fixed-tick loop pacing.
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Checks that the configuration describes a playable session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let arena = &self.arena;
        if !(arena.tile_length > 0.0) {
            return Err(ConfigError::NonPositiveTileLength {
                tile_length: arena.tile_length,
            });
        }
        if arena.forest_columns < MIN_FOREST_TILES || arena.forest_rows < MIN_FOREST_TILES {
            return Err(ConfigError::ArenaTooSmall {
                arena: "forest",
                columns: arena.forest_columns,
                rows: arena.forest_rows,
                minimum: MIN_FOREST_TILES,
            });
        }
        if arena.neighborhood_columns < MIN_NEIGHBORHOOD_TILES
            || arena.neighborhood_rows < MIN_NEIGHBORHOOD_TILES
        {
            return Err(ConfigError::ArenaTooSmall {
                arena: "neighborhood",
                columns: arena.neighborhood_columns,
                rows: arena.neighborhood_rows,
                minimum: MIN_NEIGHBORHOOD_TILES,
            });
        }

        let forest = &self.forest;
        let neighborhood = &self.neighborhood;
        for (field, value, max) in [
            (
                "forest.player_start_column",
                forest.player_start_column,
                arena.forest_columns - 2,
            ),
            (
                "forest.player_start_row",
                forest.player_start_row,
                arena.forest_rows - 2,
            ),
            ("forest.van_column", forest.van_column, arena.forest_columns - 3),
            ("forest.van_row", forest.van_row, arena.forest_rows - 2),
            (
                "neighborhood.van_column",
                neighborhood.van_column,
                arena.neighborhood_columns - 2,
            ),
            (
                "neighborhood.player_column",
                neighborhood.player_column,
                arena.neighborhood_columns - 2,
            ),
        ] {
            if !(1..=max).contains(&value) {
                return Err(ConfigError::SpawnOutsideInterior { field, value, max });
            }
        }

        for (field, value) in [
            ("forest.coarse_factor", self.forest.coarse_factor),
            ("forest.path_stride", self.forest.path_stride),
            ("neighborhood.road_spacing", self.neighborhood.road_spacing),
            (
                "highway.obstacle_interval_tiles",
                self.highway.obstacle_interval_tiles,
            ),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroStride { field });
            }
        }

        for (field, value) in [
            ("forest.tree_chance", self.forest.tree_chance),
            (
                "neighborhood.junction_extension_chance",
                self.neighborhood.junction_extension_chance,
            ),
            ("neighborhood.house_chance", self.neighborhood.house_chance),
            (
                "neighborhood.streetlight_chance",
                self.neighborhood.streetlight_chance,
            ),
            ("highway.obstacle_chance", self.highway.obstacle_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { field, value });
            }
        }

        if self.forest.max_trees_per_cell == 0 {
            return Err(ConfigError::ZeroStride {
                field: "forest.max_trees_per_cell",
            });
        }
        if self.neighborhood.diagonal_min_length > self.neighborhood.diagonal_max_length {
            return Err(ConfigError::InvalidRange {
                field: "neighborhood.diagonal_length",
                min: self.neighborhood.diagonal_min_length as f32,
                max: self.neighborhood.diagonal_max_length as f32,
            });
        }

        let highway = &self.highway;
        if highway.lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if highway.start_lane >= highway.lanes {
            return Err(ConfigError::StartLaneOutOfRange {
                start_lane: highway.start_lane,
                lanes: highway.lanes,
            });
        }
        if !(highway.min_speed <= highway.max_speed) {
            return Err(ConfigError::InvalidRange {
                field: "highway.speed",
                min: highway.min_speed,
                max: highway.max_speed,
            });
        }
        if self.monster.min_turn_ms > self.monster.max_turn_ms {
            return Err(ConfigError::InvalidRange {
                field: "monster.turn_ms",
                min: self.monster.min_turn_ms as f32,
                max: self.monster.max_turn_ms as f32,
            });
        }
        if self.riddle.answer.trim().is_empty() {
            return Err(ConfigError::EmptyRiddleAnswer);
        }
        if self.timing.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// Tiles must have a positive side length.
    #[error("tile_length must be positive (received {tile_length})")]
    NonPositiveTileLength {
        /// Provided tile length.
        tile_length: f32,
    },
    /// An arena is too small for its placement ranges.
    #[error("{arena} must be at least {minimum}x{minimum} tiles (received {columns}x{rows})")]
    ArenaTooSmall {
        /// Name of the arena section.
        arena: &'static str,
        /// Configured column count.
        columns: u32,
        /// Configured row count.
        rows: u32,
        /// Smallest accepted size along either axis.
        minimum: u32,
    },
    /// A stride or count that divides the grid was zero.
    #[error("{field} must be greater than zero")]
    ZeroStride {
        /// Offending configuration key.
        field: &'static str,
    },
    /// A probability was outside `0.0..=1.0`.
    #[error("{field} must lie within 0.0..=1.0 (received {value})")]
    InvalidProbability {
        /// Offending configuration key.
        field: &'static str,
        /// Provided probability.
        value: f32,
    },
    /// A minimum exceeded its maximum.
    #[error("{field} minimum {min} exceeds maximum {max}")]
    InvalidRange {
        /// Offending configuration key.
        field: &'static str,
        /// Provided minimum.
        min: f32,
        /// Provided maximum.
        max: f32,
    },
    /// A spawn cell lies on the arena border or outside it.
    #[error("{field} must lie within 1..={max} (received {value})")]
    SpawnOutsideInterior {
        /// Offending configuration key.
        field: &'static str,
        /// Provided cell index.
        value: u32,
        /// Largest interior index that fits the spawned body.
        max: u32,
    },
    /// The highway needs at least one lane.
    #[error("highway must have at least one lane")]
    NoLanes,
    /// The starting lane does not exist.
    #[error("start lane {start_lane} is outside the {lanes} configured lanes")]
    StartLaneOutOfRange {
        /// Requested start lane.
        start_lane: u32,
        /// Configured lane count.
        lanes: u32,
    },
    /// The riddle could never be solved.
    #[error("riddle answer must not be empty")]
    EmptyRiddleAnswer,
    /// The simulation would never advance.
    #[error("tick rate must be greater than zero")]
    ZeroTickRate,
}

/// Arena dimensions shared by the generators and the camera.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Forest width in tiles.
    pub forest_columns: u32,
    /// Forest height in tiles.
    pub forest_rows: u32,
    /// Neighborhood width in tiles.
    pub neighborhood_columns: u32,
    /// Neighborhood height in tiles.
    pub neighborhood_rows: u32,
    /// Visible width of the play field in world units.
    pub viewport_width: f32,
    /// Visible height of the play field in world units.
    pub viewport_height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            tile_length: 50.0,
            forest_columns: 40,
            forest_rows: 30,
            neighborhood_columns: 60,
            neighborhood_rows: 40,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

/// Forest layout and placement parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Coarse grid cell size measured in tiles.
    pub coarse_factor: u32,
    /// Every `path_stride`-th coarse row and column is kept clear.
    pub path_stride: u32,
    /// Index of the first guaranteed path row and column.
    pub path_offset: u32,
    /// One clearing is carved per this many coarse cells.
    pub clearing_divisor: u32,
    /// Coarse cells whose origin lies within this many tiles of the start on both axes stay clear.
    pub start_clearance_tiles: f32,
    /// Coarse cells starting within this many tiles of the far edges stay clear.
    pub far_margin_tiles: f32,
    /// Probability that an eligible coarse cell receives trees.
    pub tree_chance: f32,
    /// Largest number of trees attempted per coarse cell.
    pub max_trees_per_cell: u32,
    /// Minimum spacing between tree origins along both axes, in tiles.
    pub tree_spacing_tiles: f32,
    /// Number of snacks scattered through the forest.
    pub snack_count: u32,
    /// Number of traps scattered through the forest.
    pub trap_count: u32,
    /// Number of friends waiting to be rescued.
    pub friend_count: u32,
    /// Number of monsters patrolling the forest.
    pub monster_count: u32,
    /// Monsters with an index below this value random-walk; the rest chase.
    pub random_monsters: u32,
    /// Near inset, in tiles, for collectible placement.
    pub collectible_inset_tiles: u32,
    /// Near inset, in tiles, for friend placement.
    pub friend_inset_tiles: u32,
    /// Near inset, in tiles, for monster placement.
    pub monster_inset_tiles: u32,
    /// Far inset, in tiles, shared by every placement.
    pub far_inset_tiles: u32,
    /// Monsters never spawn closer than this to the player start, in tiles.
    pub monster_start_clearance_tiles: f32,
    /// Rejection-sampling attempts before the deterministic fallback scan.
    pub max_placement_attempts: u32,
    /// Column of the player start tile.
    pub player_start_column: u32,
    /// Row of the player start tile.
    pub player_start_row: u32,
    /// Column of the van in the forest.
    pub van_column: u32,
    /// Row of the van in the forest.
    pub van_row: u32,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            coarse_factor: 3,
            path_stride: 3,
            path_offset: 2,
            clearing_divisor: 15,
            start_clearance_tiles: 6.0,
            far_margin_tiles: 3.0,
            tree_chance: 0.7,
            max_trees_per_cell: 2,
            tree_spacing_tiles: 1.5,
            snack_count: 10,
            trap_count: 5,
            friend_count: 4,
            monster_count: 5,
            random_monsters: 3,
            collectible_inset_tiles: 2,
            friend_inset_tiles: 8,
            monster_inset_tiles: 5,
            far_inset_tiles: 3,
            monster_start_clearance_tiles: 5.0,
            max_placement_attempts: 1_000,
            player_start_column: 2,
            player_start_row: 2,
            van_column: 2,
            van_row: 3,
        }
    }
}

/// Neighborhood road network parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NeighborhoodConfig {
    /// Distance in tiles between parallel grid roads.
    pub road_spacing: u32,
    /// Index of the first grid road along each axis.
    pub road_offset: u32,
    /// Number of short diagonal roads.
    pub diagonal_roads: u32,
    /// Shortest diagonal road, in tiles.
    pub diagonal_min_length: u32,
    /// Longest diagonal road, in tiles.
    pub diagonal_max_length: u32,
    /// Probability that a straight junction grows a stub downward.
    pub junction_extension_chance: f32,
    /// Probability that an eligible lot receives a house.
    pub house_chance: f32,
    /// Minimum spacing between houses along some axis, in tiles.
    pub house_spacing_tiles: u32,
    /// Probability that a road tile receives a streetlight.
    pub streetlight_chance: f32,
    /// Length of the road carved toward the fallback exit, in tiles.
    pub fallback_exit_length: u32,
    /// Column searched for the van parking spot.
    pub van_column: u32,
    /// Column where the player arrives from the forest.
    pub player_column: u32,
}

impl Default for NeighborhoodConfig {
    fn default() -> Self {
        Self {
            road_spacing: 6,
            road_offset: 3,
            diagonal_roads: 3,
            diagonal_min_length: 5,
            diagonal_max_length: 10,
            junction_extension_chance: 0.3,
            house_chance: 0.15,
            house_spacing_tiles: 3,
            streetlight_chance: 0.1,
            fallback_exit_length: 5,
            van_column: 5,
            player_column: 3,
        }
    }
}

/// Highway track and vehicle handling parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HighwayConfig {
    /// Track length in tiles.
    pub length_tiles: u32,
    /// Number of parallel lanes.
    pub lanes: u32,
    /// Spacing between obstacle slots, in tiles.
    pub obstacle_interval_tiles: u32,
    /// Probability that a slot holds an obstacle.
    pub obstacle_chance: f32,
    /// Lane the vehicle starts in.
    pub start_lane: u32,
    /// Initial vehicle speed in world units per tick.
    pub initial_speed: f32,
    /// Slowest vehicle speed.
    pub min_speed: f32,
    /// Fastest vehicle speed.
    pub max_speed: f32,
    /// Speed change per tick while accelerating or braking.
    pub acceleration: f32,
    /// Duration of a lane change in milliseconds.
    pub lane_change_ms: u64,
    /// Distance in tiles behind the player where the boss appears.
    pub boss_offset_tiles: f32,
}

impl HighwayConfig {
    /// Duration of a lane change.
    #[must_use]
    pub fn lane_change(&self) -> Duration {
        Duration::from_millis(self.lane_change_ms)
    }
}

impl Default for HighwayConfig {
    fn default() -> Self {
        Self {
            length_tiles: 200,
            lanes: 5,
            obstacle_interval_tiles: 3,
            obstacle_chance: 0.3,
            start_lane: 2,
            initial_speed: 5.0,
            min_speed: 3.0,
            max_speed: 10.0,
            acceleration: 0.1,
            lane_change_ms: 500,
            boss_offset_tiles: 10.0,
        }
    }
}

/// Player movement and courage parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base speed in world units per tick.
    pub speed: f32,
    /// Duration of a snack boost in milliseconds.
    pub boost_ms: u64,
    /// Upper bound of the courage meter.
    pub courage_max: f32,
    /// Monsters closer than this drain courage quickly.
    pub courage_fast_radius: f32,
    /// Monsters closer than this drain courage slowly.
    pub courage_slow_radius: f32,
    /// Courage lost per tick inside the fast radius.
    pub courage_fast_decay: f32,
    /// Courage lost per tick inside the slow radius.
    pub courage_slow_decay: f32,
    /// Courage regained per tick with no monster nearby.
    pub courage_regen: f32,
    /// Traps only reach monsters within this many tiles.
    pub trap_range_tiles: f32,
}

impl PlayerConfig {
    /// Duration of a snack boost.
    #[must_use]
    pub fn boost(&self) -> Duration {
        Duration::from_millis(self.boost_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 3.0,
            boost_ms: 5_000,
            courage_max: 100.0,
            courage_fast_radius: 100.0,
            courage_slow_radius: 200.0,
            courage_fast_decay: 1.0,
            courage_slow_decay: 0.5,
            courage_regen: 0.2,
            trap_range_tiles: 3.0,
        }
    }
}

/// Friend caravan parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FriendConfig {
    /// Speed in world units per tick.
    pub speed: f32,
    /// Friends hold position while within this many tiles of their target.
    pub follow_distance_tiles: f32,
}

impl Default for FriendConfig {
    fn default() -> Self {
        Self {
            speed: 2.5,
            follow_distance_tiles: 1.5,
        }
    }
}

/// Monster and boss parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    /// Speed in world units per tick.
    pub speed: f32,
    /// Duration of a trap stun in milliseconds.
    pub stun_ms: u64,
    /// Shortest interval between random direction changes in milliseconds.
    pub min_turn_ms: u64,
    /// Longest interval between random direction changes in milliseconds.
    pub max_turn_ms: u64,
    /// Chasing monsters pursue the player inside this radius.
    pub chase_radius: f32,
    /// Boss speed relative to a regular monster.
    pub boss_speed_factor: f32,
    /// Boss side length in tiles.
    pub boss_size_tiles: f32,
}

impl MonsterConfig {
    /// Duration of a trap stun.
    #[must_use]
    pub fn stun(&self) -> Duration {
        Duration::from_millis(self.stun_ms)
    }
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            stun_ms: 6_000,
            min_turn_ms: 1_000,
            max_turn_ms: 3_000,
            chase_radius: 200.0,
            boss_speed_factor: 1.2,
            boss_size_tiles: 2.0,
        }
    }
}

/// Points awarded by the session.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Points for finding a friend.
    pub friend: u32,
    /// Points for eating a snack.
    pub snack: u32,
    /// Points for picking up a trap.
    pub trap: u32,
    /// Points for solving the riddle.
    pub riddle: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            friend: 100,
            snack: 50,
            trap: 30,
            riddle: 1_000,
        }
    }
}

/// Riddle shown during the highway sequence.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiddleConfig {
    /// Prompt displayed to the player.
    pub prompt: String,
    /// Expected answer, compared case-insensitively.
    pub answer: String,
}

impl Default for RiddleConfig {
    fn default() -> Self {
        Self {
            prompt: "Are drop sets on leg day really needed?".to_owned(),
            answer: "no".to_owned(),
        }
    }
}

/// Fixed-tick loop pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Simulation ticks per second.
    pub tick_rate_hz: u32,
    /// Ticks the adapter may run in a single frame to catch up.
    pub max_catch_up_ticks: u32,
}

impl TimingConfig {
    /// Simulated duration of a single tick.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_catch_up_ticks: 5,
        }
    }
}
