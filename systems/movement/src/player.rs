use std::time::Duration;

use mystery_escape_core::{config::PlayerConfig, Deadline, GameClock, Steering, Vec2};

use crate::{Blocked, Body, Embodied, Footing};

/// The player character: a body with a courage meter and a snack boost.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    body: Body,
    courage: f32,
    courage_max: f32,
    boost: Option<Deadline>,
}

impl Player {
    /// Creates a player at `origin` with full courage.
    #[must_use]
    pub fn new(origin: Vec2, tile_length: f32, config: &PlayerConfig) -> Self {
        Self {
            body: Body::new(origin, Vec2::splat(tile_length), config.speed),
            courage: config.courage_max,
            courage_max: config.courage_max,
            boost: None,
        }
    }

    /// Current courage in `[0, max]`.
    #[must_use]
    pub const fn courage(&self) -> f32 {
        self.courage
    }

    /// Reports whether a snack boost is active.
    #[must_use]
    pub const fn is_boosted(&self) -> bool {
        self.boost.is_some()
    }

    /// Time left on the snack boost.
    #[must_use]
    pub fn boost_remaining(&self, now: Duration) -> Duration {
        self.boost
            .map_or(Duration::ZERO, |deadline| deadline.remaining(now))
    }

    /// Starts or refreshes the snack boost.
    pub fn activate_boost(&mut self, clock: &GameClock, duration: Duration) {
        self.boost = Some(clock.deadline_after(duration));
    }

    /// Teleports the player, e.g. when arriving in a new arena.
    pub fn place_at(&mut self, origin: Vec2) {
        self.body.place_at(origin);
    }

    /// Speed used by the next step: doubled while boosted.
    #[must_use]
    pub fn current_speed(&self) -> f32 {
        if self.is_boosted() {
            self.body.speed() * 2.0
        } else {
            self.body.speed()
        }
    }

    /// Expires the boost when due and walks in the held direction.
    pub fn walk<F: Footing + ?Sized>(
        &mut self,
        steering: &Steering,
        clock: &GameClock,
        footing: &F,
    ) -> Blocked {
        if self
            .boost
            .map_or(false, |deadline| deadline.has_passed(clock.now()))
        {
            self.boost = None;
        }

        let delta = steering.vector() * self.current_speed();
        footing.step(&mut self.body, delta)
    }

    /// Adjusts courage from the distance to the nearest threat.
    ///
    /// Returns `true` when courage is exhausted.
    pub fn update_courage<I>(&mut self, threats: I, config: &PlayerConfig) -> bool
    where
        I: IntoIterator<Item = Vec2>,
    {
        let origin = self.body.origin();
        let nearest = threats
            .into_iter()
            .map(|threat| threat.distance(origin))
            .fold(f32::INFINITY, f32::min);

        let change = if nearest < config.courage_fast_radius {
            -config.courage_fast_decay
        } else if nearest < config.courage_slow_radius {
            -config.courage_slow_decay
        } else {
            config.courage_regen
        };
        self.courage = (self.courage + change).clamp(0.0, self.courage_max);
        self.courage <= 0.0
    }
}

impl Embodied for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courage_regenerates_up_to_maximum() {
        let config = PlayerConfig::default();
        let mut player = Player::new(Vec2::ZERO, 50.0, &config);
        assert!(!player.update_courage(std::iter::empty(), &config));
        assert_eq!(player.courage(), 100.0);
    }

    #[test]
    fn courage_drains_by_distance_band() {
        let config = PlayerConfig::default();
        let mut player = Player::new(Vec2::ZERO, 50.0, &config);

        let _ = player.update_courage([Vec2::new(150.0, 0.0)], &config);
        assert_eq!(player.courage(), 99.5);

        let _ = player.update_courage([Vec2::new(400.0, 0.0), Vec2::new(0.0, 99.0)], &config);
        assert_eq!(player.courage(), 98.5);
    }
}
