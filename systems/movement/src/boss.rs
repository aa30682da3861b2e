use mystery_escape_core::{config::MonsterConfig, Terrain, Vec2};

use crate::{heading, Body, Embodied};

/// Chase antagonist that prefers roads but never stops.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Boss {
    body: Body,
}

impl Boss {
    /// Creates the boss at `origin`.
    #[must_use]
    pub fn new(origin: Vec2, tile_length: f32, config: &MonsterConfig) -> Self {
        Self {
            body: Body::new(
                origin,
                Vec2::splat(tile_length * config.boss_size_tiles),
                config.speed * config.boss_speed_factor,
            ),
        }
    }

    /// Moves toward `target`.
    ///
    /// The full step is taken when the boss's centre stays on a road,
    /// otherwise the horizontal step alone, otherwise the vertical step alone.
    /// With no road in reach the boss moves off-road at half speed.
    pub fn pursue<T: Terrain + ?Sized>(&mut self, target: Vec2, terrain: &T) {
        let origin = self.body.origin();
        let direction = heading(origin, target);
        if direction == Vec2::ZERO {
            return;
        }

        let full = origin + direction * self.body.speed();
        let candidates = [
            full,
            Vec2::new(full.x, origin.y),
            Vec2::new(origin.x, full.y),
        ];
        let next = candidates
            .into_iter()
            .find(|candidate| terrain.passable(self.body.center_at(*candidate)))
            .unwrap_or(origin + direction * self.body.speed() * 0.5);
        self.body.place_at(next);
    }
}

impl Embodied for Boss {
    fn body(&self) -> &Body {
        &self.body
    }
}
