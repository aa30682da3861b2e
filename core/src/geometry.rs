//! Continuous geometry and the discrete tile grid shared by every arena.

use glam::Vec2;

/// Axis-aligned rectangle expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    origin: Vec2,
    size: Vec2,
}

impl Rect {
    /// Creates a rectangle anchored at `origin` (upper-left corner) with the provided size.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from scalar components.
    #[must_use]
    pub const fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(width, height))
    }

    /// Upper-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Smallest x coordinate covered by the rectangle.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.origin.x
    }

    /// Smallest y coordinate covered by the rectangle.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.origin.y
    }

    /// Largest x coordinate covered by the rectangle.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.origin.x + self.size.x
    }

    /// Largest y coordinate covered by the rectangle.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    /// Geometric centre of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Reports whether the interiors of both rectangles intersect.
    ///
    /// Rectangles that merely share an edge do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Reports whether `other` lies entirely inside this rectangle, edges included.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns the same rectangle moved so that its origin sits at `origin`.
    #[must_use]
    pub const fn at(self, origin: Vec2) -> Self {
        Self::new(origin, self.size)
    }
}

/// Location of a single tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Upper-left corner of the tile in world units.
    #[must_use]
    pub fn origin(&self, tile_length: f32) -> Vec2 {
        Vec2::new(
            self.column as f32 * tile_length,
            self.row as f32 * tile_length,
        )
    }
}

/// Categorical contents of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Open forest floor.
    Ground,
    /// Forest tile covered by at least part of a tree.
    Tree,
    /// Paved neighborhood road.
    Road,
    /// Neighborhood lot, verge, or yard that vehicles avoid.
    Lot,
}

impl Tile {
    /// Reports whether entities may stand on the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Ground | Self::Road)
    }
}

/// Dense grid of tiles that maps continuous coordinates onto discrete cells.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Creates a grid where every cell holds `tile`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile_length: f32, tile: Tile) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tile_length,
            cells: vec![tile; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Rectangle spanning the whole grid.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.width(), self.height())
    }

    /// Converts a world position into the tile containing it.
    ///
    /// Returns `None` for positions outside the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<CellCoord> {
        if !(self.tile_length > 0.0) || !(point.x >= 0.0) || !(point.y >= 0.0) {
            return None;
        }

        let column = (point.x / self.tile_length).floor();
        let row = (point.y / self.tile_length).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }

    /// Returns the tile stored at `cell`, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Overwrites the tile at `cell`. Cells outside the grid are ignored.
    pub fn set(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = tile;
            }
        }
    }

    /// Reports whether the tile at `cell` is passable. Off-grid cells are impassable.
    #[must_use]
    pub fn is_passable_cell(&self, cell: CellCoord) -> bool {
        self.tile(cell).map_or(false, Tile::is_passable)
    }

    /// Reports whether the tile containing `point` is passable. Off-grid points are impassable.
    #[must_use]
    pub fn passable(&self, point: Vec2) -> bool {
        self.cell_at(point)
            .map_or(false, |cell| self.is_passable_cell(cell))
    }

    /// Rectangle covered by `cell` in world units.
    #[must_use]
    pub fn cell_rect(&self, cell: CellCoord) -> Rect {
        Rect::new(
            cell.origin(self.tile_length),
            Vec2::splat(self.tile_length),
        )
    }

    /// Iterates every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Static collision model implemented by every walkable arena.
pub trait Terrain {
    /// Tile layout backing the arena.
    fn tile_grid(&self) -> &TileGrid;

    /// Static rectangular obstacles that bodies may never overlap.
    fn obstacles(&self) -> &[Rect];

    /// Reports whether the tile containing `point` is passable.
    fn passable(&self, point: Vec2) -> bool {
        self.tile_grid().passable(point)
    }

    /// Reports whether a body occupying `bounds` would be legally placed.
    ///
    /// The box must stay inside the arena and must not overlap any obstacle.
    fn can_move_to(&self, bounds: Rect) -> bool {
        self.tile_grid().bounds().contains_rect(&bounds)
            && !self
                .obstacles()
                .iter()
                .any(|obstacle| obstacle.overlaps(&bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Walled {
        grid: TileGrid,
        obstacles: Vec<Rect>,
    }

    impl Terrain for Walled {
        fn tile_grid(&self) -> &TileGrid {
            &self.grid
        }

        fn obstacles(&self) -> &[Rect] {
            &self.obstacles
        }
    }

    fn walled() -> Walled {
        Walled {
            grid: TileGrid::filled(10, 8, 10.0, Tile::Ground),
            obstacles: vec![Rect::from_xywh(40.0, 40.0, 10.0, 10.0)],
        }
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::from_xywh(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn cell_at_uses_integer_division() {
        let grid = TileGrid::filled(4, 3, 50.0, Tile::Ground);
        assert_eq!(grid.cell_at(Vec2::new(49.9, 0.0)), Some(CellCoord::new(0, 0)));
        assert_eq!(grid.cell_at(Vec2::new(50.0, 149.0)), Some(CellCoord::new(1, 2)));
        assert_eq!(grid.cell_at(Vec2::new(200.0, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(-0.1, 0.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(f32::NAN, 0.0)), None);
    }

    #[test]
    fn off_grid_queries_are_impassable() {
        let grid = TileGrid::filled(4, 3, 50.0, Tile::Ground);
        assert!(grid.passable(Vec2::new(10.0, 10.0)));
        assert!(!grid.passable(Vec2::new(-1.0, 10.0)));
        assert!(!grid.passable(Vec2::new(10.0, 150.0)));
        assert!(!grid.is_passable_cell(CellCoord::new(4, 0)));
    }

    #[test]
    fn set_ignores_cells_outside_grid() {
        let mut grid = TileGrid::filled(2, 2, 1.0, Tile::Lot);
        grid.set(CellCoord::new(1, 1), Tile::Road);
        grid.set(CellCoord::new(5, 5), Tile::Road);
        let roads = grid.iter().filter(|(_, tile)| *tile == Tile::Road).count();
        assert_eq!(roads, 1);
        assert_eq!(grid.tile(CellCoord::new(1, 1)), Some(Tile::Road));
    }

    #[test]
    fn can_move_to_rejects_obstacle_overlap() {
        let terrain = walled();
        assert!(!terrain.can_move_to(Rect::from_xywh(35.0, 35.0, 10.0, 10.0)));
        assert!(terrain.can_move_to(Rect::from_xywh(30.0, 30.0, 10.0, 10.0)));
    }

    #[test]
    fn can_move_to_rejects_leaving_the_arena() {
        let terrain = walled();
        assert!(!terrain.can_move_to(Rect::from_xywh(-0.5, 0.0, 10.0, 10.0)));
        assert!(!terrain.can_move_to(Rect::from_xywh(90.5, 0.0, 10.0, 10.0)));
        assert!(terrain.can_move_to(Rect::from_xywh(90.0, 70.0, 10.0, 10.0)));
    }
}
