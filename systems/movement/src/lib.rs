#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Entity bodies and the movement rules that drive them.
//!
//! Every character is a [`Body`] plus per-kind state. How a body may move is
//! decided by a [`Footing`]: [`Obstructed`] keeps bodies clear of obstacles in
//! the forest, while [`RoadBound`] keeps their centre on road tiles in the
//! neighborhood. Both resolve movement one axis at a time so a body sliding
//! along a wall keeps moving along the open axis.

mod boss;
mod friend;
mod monster;
mod player;

pub use boss::Boss;
pub use friend::{advance_caravan, Friend};
pub use monster::{Monster, MonsterMode};
pub use player::Player;

use mystery_escape_core::{Rect, Terrain, Vec2};

/// Position, extent, and speed shared by every moving entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    origin: Vec2,
    size: Vec2,
    speed: f32,
}

impl Body {
    /// Creates a body with its upper-left corner at `origin`.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            origin,
            size,
            speed,
        }
    }

    /// Upper-left corner of the body.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Width and height of the body.
    #[must_use]
    pub const fn size(&self) -> Vec2 {
        self.size
    }

    /// Distance covered per tick at base speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Box currently occupied.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        Rect::new(self.origin, self.size)
    }

    /// Geometric centre of the body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Teleports the body without any collision checks.
    pub fn place_at(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    fn bounds_at(&self, origin: Vec2) -> Rect {
        Rect::new(origin, self.size)
    }

    fn center_at(&self, origin: Vec2) -> Vec2 {
        origin + self.size * 0.5
    }
}

/// Anything that occupies the play field.
pub trait Embodied {
    /// Shared body of the entity.
    fn body(&self) -> &Body;

    /// Box currently occupied by the entity.
    fn bounds(&self) -> Rect {
        self.body().bounds()
    }

    /// Reports whether two entities overlap.
    fn touches<O: Embodied + ?Sized>(&self, other: &O) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Axes on which a requested step was refused.
///
/// An axis with no requested displacement is never reported as blocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blocked {
    /// Horizontal displacement was refused.
    pub x: bool,
    /// Vertical displacement was refused.
    pub y: bool,
}

/// Movement rule applied to a body stepping across an arena.
pub trait Footing {
    /// Moves `body` by up to `delta`, committing each axis that is allowed.
    fn step(&self, body: &mut Body, delta: Vec2) -> Blocked;
}

/// Bodies must stay inside the arena and clear of every obstacle.
///
/// The horizontal step is tested and committed first, then the vertical step
/// is tested from the updated position.
#[derive(Clone, Copy, Debug)]
pub struct Obstructed<'a, T: ?Sized>(pub &'a T);

impl<T: Terrain + ?Sized> Footing for Obstructed<'_, T> {
    fn step(&self, body: &mut Body, delta: Vec2) -> Blocked {
        let mut blocked = Blocked::default();

        if delta.x != 0.0 {
            let next = Vec2::new(body.origin.x + delta.x, body.origin.y);
            if self.0.can_move_to(body.bounds_at(next)) {
                body.origin = next;
            } else {
                blocked.x = true;
            }
        }

        if delta.y != 0.0 {
            let next = Vec2::new(body.origin.x, body.origin.y + delta.y);
            if self.0.can_move_to(body.bounds_at(next)) {
                body.origin = next;
            } else {
                blocked.y = true;
            }
        }

        blocked
    }
}

/// Bodies keep their centre on passable tiles.
///
/// A full diagonal step is taken when its centre lands on a passable tile;
/// otherwise each axis is tried alone, horizontal first, which lets bodies cut
/// corners between crossing roads.
#[derive(Clone, Copy, Debug)]
pub struct RoadBound<'a, T: ?Sized>(pub &'a T);

impl<T: Terrain + ?Sized> Footing for RoadBound<'_, T> {
    fn step(&self, body: &mut Body, delta: Vec2) -> Blocked {
        let mut blocked = Blocked::default();
        if delta == Vec2::ZERO {
            return blocked;
        }

        let full = body.origin + delta;
        if self.0.passable(body.center_at(full)) {
            body.origin = full;
            return blocked;
        }

        if delta.x != 0.0 {
            let next = Vec2::new(full.x, body.origin.y);
            if self.0.passable(body.center_at(next)) {
                body.origin = next;
            } else {
                blocked.x = true;
            }
        }

        if delta.y != 0.0 {
            let next = Vec2::new(body.origin.x, full.y);
            if self.0.passable(body.center_at(next)) {
                body.origin = next;
            } else {
                blocked.y = true;
            }
        }

        blocked
    }
}

/// Unit vector from `from` toward `to`, or zero when they coincide.
fn heading(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mystery_escape_core::{CellCoord, Tile, TileGrid};

    struct Arena {
        grid: TileGrid,
        obstacles: Vec<Rect>,
    }

    impl Terrain for Arena {
        fn tile_grid(&self) -> &TileGrid {
            &self.grid
        }

        fn obstacles(&self) -> &[Rect] {
            &self.obstacles
        }
    }

    #[test]
    fn obstructed_slides_along_wall() {
        let arena = Arena {
            grid: TileGrid::filled(10, 10, 10.0, Tile::Ground),
            obstacles: vec![Rect::from_xywh(20.0, 0.0, 10.0, 100.0)],
        };
        let mut body = Body::new(Vec2::new(8.0, 50.0), Vec2::splat(10.0), 3.0);

        let blocked = Obstructed(&arena).step(&mut body, Vec2::new(3.0, 3.0));

        assert_eq!(blocked, Blocked { x: true, y: false });
        assert_eq!(body.origin(), Vec2::new(8.0, 53.0));
    }

    #[test]
    fn obstructed_stops_at_arena_edge() {
        let arena = Arena {
            grid: TileGrid::filled(10, 10, 10.0, Tile::Ground),
            obstacles: Vec::new(),
        };
        let mut body = Body::new(Vec2::new(1.0, 1.0), Vec2::splat(10.0), 3.0);

        let blocked = Obstructed(&arena).step(&mut body, Vec2::new(-3.0, -3.0));

        assert_eq!(blocked, Blocked { x: true, y: true });
        assert_eq!(body.origin(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn road_bound_cuts_corners_per_axis() {
        let mut grid = TileGrid::filled(5, 5, 10.0, Tile::Lot);
        for column in 0..5 {
            grid.set(CellCoord::new(column, 2), Tile::Road);
        }
        let arena = Arena {
            grid,
            obstacles: Vec::new(),
        };
        let mut body = Body::new(Vec2::new(10.0, 20.0), Vec2::splat(10.0), 3.0);

        let blocked = RoadBound(&arena).step(&mut body, Vec2::new(3.0, -6.0));

        assert_eq!(blocked, Blocked { x: false, y: true });
        assert_eq!(body.origin(), Vec2::new(13.0, 20.0));
    }

    #[test]
    fn heading_is_zero_when_on_target() {
        assert_eq!(heading(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
        assert_eq!(heading(Vec2::ZERO, Vec2::new(0.0, 5.0)), Vec2::new(0.0, 1.0));
    }
}
