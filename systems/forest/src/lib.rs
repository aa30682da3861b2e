#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural forest generator.
//!
//! The forest is a walled rectangle of tiles. A coarse grid of three-tile cells
//! reserves guaranteed paths and random clearings, and the remaining coarse
//! cells receive one or two trees. Snacks, traps, friends, and monsters are
//! then scattered by bounded rejection sampling so generation always
//! terminates, even in arenas with no free space.

pub mod placement;

use log::debug;
use mystery_escape_core::{
    config::GameConfig, CellCoord, Collectible, CollectibleKind, FriendKind, MonsterId,
    PatrolType, Rect, Terrain, Tile, TileGrid, Vec2,
};
use placement::PlacementRegion;
use rand::Rng;

/// Walkable forest arena with its static trees and remaining pickups.
#[derive(Clone, Debug, PartialEq)]
pub struct Forest {
    grid: TileGrid,
    trees: Vec<Rect>,
    collectibles: Vec<Collectible>,
    player_start: Vec2,
    van: Rect,
}

impl Forest {
    /// Tree rectangles, border included.
    #[must_use]
    pub fn trees(&self) -> &[Rect] {
        &self.trees
    }

    /// Pickups that have not been collected yet.
    #[must_use]
    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    /// Upper-left corner where the player starts.
    #[must_use]
    pub const fn player_start(&self) -> Vec2 {
        self.player_start
    }

    /// Area occupied by the van.
    #[must_use]
    pub const fn van(&self) -> Rect {
        self.van
    }

    /// Removes every pickup overlapped by `bounds` and reports their kinds.
    pub fn take_overlapping(&mut self, bounds: Rect) -> Vec<CollectibleKind> {
        let mut taken = Vec::new();
        self.collectibles.retain(|collectible| {
            if collectible.bounds().overlaps(&bounds) {
                taken.push(collectible.kind());
                false
            } else {
                true
            }
        });
        taken
    }
}

impl Terrain for Forest {
    fn tile_grid(&self) -> &TileGrid {
        &self.grid
    }

    fn obstacles(&self) -> &[Rect] {
        &self.trees
    }
}

/// Starting state of a friend waiting in the forest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FriendSpawn {
    /// Friend to spawn.
    pub kind: FriendKind,
    /// Upper-left corner of the friend's box.
    pub origin: Vec2,
}

/// Starting state of a forest monster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonsterSpawn {
    /// Identifier assigned to the monster.
    pub id: MonsterId,
    /// Upper-left corner of the monster's box.
    pub origin: Vec2,
    /// Movement policy of the monster.
    pub patrol: PatrolType,
}

/// Generated forest together with the characters placed in it.
#[derive(Clone, Debug, PartialEq)]
pub struct ForestLayout {
    /// Arena with trees and pickups.
    pub forest: Forest,
    /// Friends in rescue order.
    pub friends: Vec<FriendSpawn>,
    /// Monsters in identifier order.
    pub monsters: Vec<MonsterSpawn>,
}

/// Generates a complete forest layout from `config` using `rng`.
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> ForestLayout {
    let tile = config.arena.tile_length;
    let settings = &config.forest;
    let columns = config.arena.forest_columns;
    let rows = config.arena.forest_rows;
    let width = columns as f32 * tile;
    let height = rows as f32 * tile;

    let player_start = CellCoord::new(settings.player_start_column, settings.player_start_row)
        .origin(tile);
    let van = Rect::new(
        CellCoord::new(settings.van_column, settings.van_row).origin(tile),
        Vec2::new(2.0 * tile, tile),
    );
    let trees = generate_trees(config, rng, player_start, van);
    let grid = rasterize(columns, rows, tile, &trees);

    let clear_of_trees = |bounds: Rect| !trees.iter().any(|tree| tree.overlaps(&bounds));
    let attempts = settings.max_placement_attempts;
    let region = |near: u32| {
        PlacementRegion::inset(width, height, tile, near, settings.far_inset_tiles)
    };

    let mut collectibles = Vec::new();
    let pickup_size = Vec2::splat(tile * 0.5);
    let pickups = std::iter::repeat(CollectibleKind::Snack)
        .take(settings.snack_count as usize)
        .chain(std::iter::repeat(CollectibleKind::Trap).take(settings.trap_count as usize));
    for kind in pickups {
        let origin = placement::place(
            rng,
            region(settings.collectible_inset_tiles),
            pickup_size,
            tile,
            attempts,
            clear_of_trees,
        );
        collectibles.push(Collectible::new(kind, Rect::new(origin, pickup_size)));
    }

    let body = Vec2::splat(tile);
    let friends = FriendKind::ALL
        .iter()
        .copied()
        .cycle()
        .take(settings.friend_count as usize)
        .map(|kind| FriendSpawn {
            kind,
            origin: placement::place(
                rng,
                region(settings.friend_inset_tiles),
                body,
                tile,
                attempts,
                clear_of_trees,
            ),
        })
        .collect();

    let min_start_distance = settings.monster_start_clearance_tiles * tile;
    let monster_accept = |bounds: Rect| {
        clear_of_trees(bounds) && bounds.origin().distance(player_start) >= min_start_distance
    };
    let monsters: Vec<MonsterSpawn> = (0..settings.monster_count)
        .map(|index| MonsterSpawn {
            id: MonsterId::new(index),
            origin: placement::place(
                rng,
                region(settings.monster_inset_tiles),
                body,
                tile,
                attempts,
                monster_accept,
            ),
            patrol: if index < settings.random_monsters {
                PatrolType::Random
            } else {
                PatrolType::Chase
            },
        })
        .collect();

    debug!(
        "generated forest {columns}x{rows} with {} trees, {} pickups, {} monsters",
        trees.len(),
        collectibles.len(),
        monsters.len()
    );

    ForestLayout {
        forest: Forest {
            grid,
            trees,
            collectibles,
            player_start,
            van,
        },
        friends,
        monsters,
    }
}

/// Border plus scattered trees, keeping the start clearance and the van free.
fn generate_trees<R: Rng + ?Sized>(
    config: &GameConfig,
    rng: &mut R,
    player_start: Vec2,
    van: Rect,
) -> Vec<Rect> {
    let tile = config.arena.tile_length;
    let settings = &config.forest;
    let columns = config.arena.forest_columns;
    let rows = config.arena.forest_rows;
    let width = columns as f32 * tile;
    let height = rows as f32 * tile;

    let mut trees = border(columns, rows, tile);
    let paths = coarse_paths(config, rng);

    let cell_length = settings.coarse_factor as f32 * tile;
    let start_clearance = settings.start_clearance_tiles * tile;
    let far_margin = settings.far_margin_tiles * tile;
    let offset_span = (cell_length - tile).max(0.0) as u32;
    let spacing = settings.tree_spacing_tiles * tile;
    let start_cell = Rect::new(player_start, Vec2::splat(tile));

    for gx in 0..paths.columns {
        for gy in 0..paths.rows {
            if paths.is_path(gx, gy) {
                continue;
            }

            let real_x = gx as f32 * cell_length;
            let real_y = gy as f32 * cell_length;
            let away_from_start = (real_x - player_start.x).abs() > start_clearance
                || (real_y - player_start.y).abs() > start_clearance;
            let before_far_edge = real_x < width - far_margin && real_y < height - far_margin;
            if !(away_from_start && before_far_edge) {
                continue;
            }
            if !rng.gen_bool(f64::from(settings.tree_chance)) {
                continue;
            }

            let count = rng.gen_range(1..=settings.max_trees_per_cell);
            for _ in 0..count {
                let x = real_x + rng.gen_range(0..=offset_span) as f32;
                let y = real_y + rng.gen_range(0..=offset_span) as f32;
                let crowded = trees.iter().any(|tree| {
                    (tree.left() - x).abs() < spacing && (tree.top() - y).abs() < spacing
                });
                let candidate = Rect::from_xywh(x, y, tile, tile);
                let blocks_start = candidate.overlaps(&start_cell) || candidate.overlaps(&van);
                if !crowded && !blocks_start {
                    trees.push(candidate);
                }
            }
        }
    }

    trees
}

fn border(columns: u32, rows: u32, tile: f32) -> Vec<Rect> {
    let mut trees = Vec::new();
    for column in 0..columns {
        trees.push(Rect::new(CellCoord::new(column, 0).origin(tile), Vec2::splat(tile)));
        trees.push(Rect::new(
            CellCoord::new(column, rows.saturating_sub(1)).origin(tile),
            Vec2::splat(tile),
        ));
    }
    for row in 1..rows.saturating_sub(1) {
        trees.push(Rect::new(CellCoord::new(0, row).origin(tile), Vec2::splat(tile)));
        trees.push(Rect::new(
            CellCoord::new(columns.saturating_sub(1), row).origin(tile),
            Vec2::splat(tile),
        ));
    }
    trees
}

struct CoarsePaths {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl CoarsePaths {
    fn is_path(&self, column: u32, row: u32) -> bool {
        self.cells
            .get((row * self.columns + column) as usize)
            .copied()
            .unwrap_or(false)
    }

    fn mark(&mut self, column: u32, row: u32) {
        if column < self.columns && row < self.rows {
            if let Some(cell) = self.cells.get_mut((row * self.columns + column) as usize) {
                *cell = true;
            }
        }
    }
}

fn coarse_paths<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> CoarsePaths {
    let settings = &config.forest;
    let factor = settings.coarse_factor.max(1);
    let columns = config.arena.forest_columns / factor;
    let rows = config.arena.forest_rows / factor;
    let mut paths = CoarsePaths {
        columns,
        rows,
        cells: vec![false; (columns * rows) as usize],
    };

    let stride = settings.path_stride.max(1) as usize;
    let offset = settings.path_offset;
    for row in (offset..rows.saturating_sub(offset)).step_by(stride) {
        for column in 0..columns {
            paths.mark(column, row);
        }
    }
    for column in (offset..columns.saturating_sub(offset)).step_by(stride) {
        for row in 0..rows {
            paths.mark(column, row);
        }
    }

    let clearings = (columns * rows)
        .checked_div(settings.clearing_divisor)
        .unwrap_or(0);
    if columns >= 3 && rows >= 3 {
        for _ in 0..clearings {
            let cx = rng.gen_range(1..=columns - 2);
            let cy = rng.gen_range(1..=rows - 2);
            for column in cx - 1..=cx + 1 {
                for row in cy - 1..=cy + 1 {
                    paths.mark(column, row);
                }
            }
        }
    }

    paths
}

fn rasterize(columns: u32, rows: u32, tile: f32, trees: &[Rect]) -> TileGrid {
    let mut grid = TileGrid::filled(columns, rows, tile, Tile::Ground);
    for tree in trees {
        let first_column = (tree.left() / tile).floor().max(0.0) as u32;
        let first_row = (tree.top() / tile).floor().max(0.0) as u32;
        let last_column = (tree.right() / tile).ceil() as u32;
        let last_row = (tree.bottom() / tile).ceil() as u32;
        for row in first_row..last_row {
            for column in first_column..last_column {
                let cell = CellCoord::new(column, row);
                if grid.cell_rect(cell).overlaps(tree) {
                    grid.set(cell, Tile::Tree);
                }
            }
        }
    }
    grid
}
