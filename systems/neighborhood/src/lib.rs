#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Suburban road network generator.
//!
//! Roads are stamped on an all-lot grid as a regular lattice, perturbed with a
//! few short diagonal segments and downward junction stubs. Houses and
//! streetlights decorate the network, and the highway exit is the topmost road
//! tile adjacent to the right edge. The outermost ring of tiles is a verge that
//! never holds road, so every border cell stays impassable.

use log::{debug, warn};
use mystery_escape_core::{config::GameConfig, CellCoord, Rect, Terrain, Tile, TileGrid, Vec2};
use rand::Rng;

/// Generated neighborhood arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighborhood {
    grid: TileGrid,
    houses: Vec<CellCoord>,
    streetlights: Vec<CellCoord>,
    exit: CellCoord,
    van_spot: VanSpot,
}

impl Neighborhood {
    /// Reports whether the tile containing `point` is a road.
    #[must_use]
    pub fn is_road(&self, point: Vec2) -> bool {
        self.grid
            .cell_at(point)
            .and_then(|cell| self.grid.tile(cell))
            == Some(Tile::Road)
    }

    /// Upper-left tiles of every house.
    #[must_use]
    pub fn houses(&self) -> &[CellCoord] {
        &self.houses
    }

    /// Road tiles that carry a streetlight.
    #[must_use]
    pub fn streetlights(&self) -> &[CellCoord] {
        &self.streetlights
    }

    /// Tile leading onto the highway.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Area of the exit tile in world units.
    #[must_use]
    pub fn exit_bounds(&self) -> Rect {
        self.grid.cell_rect(self.exit)
    }

    /// Where the van is parked and the caravan arrives.
    #[must_use]
    pub const fn van_spot(&self) -> &VanSpot {
        &self.van_spot
    }
}

impl Terrain for Neighborhood {
    fn tile_grid(&self) -> &TileGrid {
        &self.grid
    }

    fn obstacles(&self) -> &[Rect] {
        &[]
    }
}

/// Parking spot of the van on the first road crossing the van column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VanSpot {
    van: Rect,
    player: Vec2,
    tile_length: f32,
}

impl VanSpot {
    /// Area occupied by the parked van.
    #[must_use]
    pub const fn van(&self) -> Rect {
        self.van
    }

    /// Upper-left corner where the player arrives.
    #[must_use]
    pub const fn player(&self) -> Vec2 {
        self.player
    }

    /// Upper-left corner of the friend at `index` in the caravan.
    ///
    /// Friends line up one tile apart to the left of the player and never
    /// leave the verge.
    #[must_use]
    pub fn trailing(&self, index: usize) -> Vec2 {
        let x = self.player.x - self.tile_length * (index as f32 + 1.0);
        Vec2::new(x.max(self.tile_length), self.player.y)
    }
}

/// Generates a neighborhood from `config` using `rng`.
pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Neighborhood {
    let tile = config.arena.tile_length;
    let columns = config.arena.neighborhood_columns;
    let rows = config.arena.neighborhood_rows;
    let settings = &config.neighborhood;

    let mut roads = RoadMap::new(columns, rows);
    roads.stamp_lattice(settings.road_offset, settings.road_spacing.max(1) as usize);
    roads.stamp_diagonals(
        rng,
        settings.diagonal_roads,
        settings.diagonal_min_length..=settings.diagonal_max_length,
    );
    roads.extend_junctions(rng, settings.junction_extension_chance);

    let houses = place_houses(&roads, rng, settings.house_chance, settings.house_spacing_tiles);
    let streetlights: Vec<CellCoord> = roads
        .iter_roads()
        .filter(|_| rng.gen_bool(f64::from(settings.streetlight_chance)))
        .collect();

    let exit = roads.locate_exit(settings.fallback_exit_length);
    let van_row = roads.van_row(settings.van_column, exit.row());
    let van_spot = VanSpot {
        van: Rect::new(
            CellCoord::new(settings.van_column, van_row).origin(tile),
            Vec2::new(2.0 * tile, tile),
        ),
        player: CellCoord::new(settings.player_column, van_row).origin(tile),
        tile_length: tile,
    };

    let grid = roads.into_grid(tile);
    debug!(
        "generated neighborhood {columns}x{rows}: {} houses, {} streetlights, exit {:?}",
        houses.len(),
        streetlights.len(),
        exit
    );

    Neighborhood {
        grid,
        houses,
        streetlights,
        exit,
        van_spot,
    }
}

struct RoadMap {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl RoadMap {
    fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            cells: vec![false; (columns * rows) as usize],
        }
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        (column < self.columns && row < self.rows).then(|| (row * self.columns + column) as usize)
    }

    fn is_road(&self, column: i64, row: i64) -> bool {
        let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
            return false;
        };
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    fn in_verge(&self, column: u32, row: u32) -> bool {
        column >= 1 && row >= 1 && column + 1 < self.columns && row + 1 < self.rows
    }

    fn stamp(&mut self, column: u32, row: u32) {
        if !self.in_verge(column, row) {
            return;
        }
        if let Some(cell) = self
            .index(column, row)
            .and_then(|index| self.cells.get_mut(index))
        {
            *cell = true;
        }
    }

    fn stamp_lattice(&mut self, offset: u32, spacing: usize) {
        for row in (offset..self.rows.saturating_sub(offset)).step_by(spacing) {
            for column in 0..self.columns {
                self.stamp(column, row);
            }
        }
        for column in (offset..self.columns.saturating_sub(offset)).step_by(spacing) {
            for row in 0..self.rows {
                self.stamp(column, row);
            }
        }
    }

    fn stamp_diagonals<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        count: u32,
        lengths: std::ops::RangeInclusive<u32>,
    ) {
        let max_column = self.columns.saturating_sub(12).max(6);
        let max_row = self.rows.saturating_sub(12).max(6);
        for _ in 0..count {
            let start_column = rng.gen_range(6..=max_column);
            let start_row = rng.gen_range(6..=max_row);
            let length = rng.gen_range(lengths.clone());
            for step in 0..length {
                let column = (start_column + step).min(self.columns.saturating_sub(2));
                let row = (start_row + step / 2).min(self.rows.saturating_sub(2));
                self.stamp(column, row);
            }
        }
    }

    fn extend_junctions<R: Rng + ?Sized>(&mut self, rng: &mut R, chance: f32) {
        for column in 1..self.columns.saturating_sub(1) {
            for row in 1..self.rows.saturating_sub(1) {
                let (x, y) = (i64::from(column), i64::from(row));
                let straight = self.is_road(x, y)
                    && self.is_road(x + 1, y)
                    && self.is_road(x - 1, y)
                    && !self.is_road(x, y + 1)
                    && !self.is_road(x, y - 1);
                if straight && rng.gen_bool(f64::from(chance)) {
                    self.stamp(column, row + 1);
                }
            }
        }
    }

    fn locate_exit(&mut self, fallback_length: u32) -> CellCoord {
        let column = self.columns.saturating_sub(2);
        if let Some(row) = (0..self.rows).find(|&row| self.is_road(column.into(), row.into())) {
            return CellCoord::new(column, row);
        }

        let row = self.rows / 2;
        warn!("no road reaches the right edge, carving exit at row {row}");
        for step in 0..fallback_length {
            self.stamp(column.saturating_sub(step), row);
        }
        CellCoord::new(column, row)
    }

    fn van_row(&mut self, van_column: u32, fallback_row: u32) -> u32 {
        if let Some(row) = (0..self.rows).find(|&row| self.is_road(van_column.into(), row.into())) {
            return row;
        }

        warn!("no road crosses column {van_column}, paving row {fallback_row}");
        for column in 0..self.columns {
            self.stamp(column, fallback_row);
        }
        fallback_row
    }

    fn iter_roads(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.columns).flat_map(move |column| {
            (0..self.rows)
                .filter(move |&row| self.is_road(column.into(), row.into()))
                .map(move |row| CellCoord::new(column, row))
        })
    }

    fn into_grid(self, tile_length: f32) -> TileGrid {
        let mut grid = TileGrid::filled(self.columns, self.rows, tile_length, Tile::Lot);
        for cell in self.iter_roads() {
            grid.set(cell, Tile::Road);
        }
        grid
    }
}

fn place_houses<R: Rng + ?Sized>(
    roads: &RoadMap,
    rng: &mut R,
    chance: f32,
    spacing: u32,
) -> Vec<CellCoord> {
    let mut houses: Vec<CellCoord> = Vec::new();
    for column in 1..roads.columns.saturating_sub(3) {
        for row in 1..roads.rows.saturating_sub(3) {
            let (x, y) = (i64::from(column), i64::from(row));
            if roads.is_road(x, y) || roads.is_road(x + 1, y) {
                continue;
            }

            let near_road = (-1..=2).any(|dx| (-1..=2).any(|dy| roads.is_road(x + dx, y + dy)));
            if !near_road || !rng.gen_bool(f64::from(chance)) {
                continue;
            }

            let crowded = houses.iter().any(|house| {
                house.column().abs_diff(column) < spacing && house.row().abs_diff(row) < spacing
            });
            if !crowded {
                houses.push(CellCoord::new(column, row));
            }
        }
    }
    houses
}
