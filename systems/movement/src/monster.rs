use std::time::Duration;

use mystery_escape_core::{
    config::MonsterConfig, Deadline, Direction, GameClock, MonsterId, PatrolType, Vec2,
};
use rand::{seq::SliceRandom, Rng};

use crate::{heading, Body, Embodied, Footing};

/// What a monster is doing this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonsterMode {
    /// Walking a cardinal direction.
    Patrolling,
    /// Heading straight for the player.
    Chasing,
    /// Frozen by a trap until the deadline.
    Stunned {
        /// Instant the stun wears off.
        until: Deadline,
    },
}

/// Forest monster with a patrol policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Monster {
    id: MonsterId,
    body: Body,
    patrol: PatrolType,
    direction: Direction,
    next_turn: Deadline,
    mode: MonsterMode,
}

impl Monster {
    /// Creates a patrolling monster walking `direction` until `next_turn`.
    #[must_use]
    pub fn new(
        id: MonsterId,
        origin: Vec2,
        tile_length: f32,
        patrol: PatrolType,
        direction: Direction,
        next_turn: Deadline,
        config: &MonsterConfig,
    ) -> Self {
        Self {
            id,
            body: Body::new(origin, Vec2::splat(tile_length), config.speed),
            patrol,
            direction,
            next_turn,
            mode: MonsterMode::Patrolling,
        }
    }

    /// Identifier of the monster.
    #[must_use]
    pub const fn id(&self) -> MonsterId {
        self.id
    }

    /// Patrol policy of the monster.
    #[must_use]
    pub const fn patrol(&self) -> PatrolType {
        self.patrol
    }

    /// Direction of the random walk.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current behaviour.
    #[must_use]
    pub const fn mode(&self) -> MonsterMode {
        self.mode
    }

    /// Reports whether a trap is holding the monster.
    #[must_use]
    pub const fn is_stunned(&self) -> bool {
        matches!(self.mode, MonsterMode::Stunned { .. })
    }

    /// Freezes the monster for `duration`.
    pub fn stun(&mut self, clock: &GameClock, duration: Duration) {
        self.mode = MonsterMode::Stunned {
            until: clock.deadline_after(duration),
        };
    }

    /// Advances the monster by one tick.
    ///
    /// A stunned monster stays put until its stun expires. A chasing monster
    /// heads straight for `player` while it is inside the chase radius; every
    /// other case is a random walk that re-rolls its direction on a timer and
    /// reverses along an axis whenever that axis is blocked.
    pub fn update<F, R>(
        &mut self,
        clock: &GameClock,
        player: Vec2,
        footing: &F,
        rng: &mut R,
        config: &MonsterConfig,
    ) where
        F: Footing + ?Sized,
        R: Rng + ?Sized,
    {
        let now = clock.now();
        if let MonsterMode::Stunned { until } = self.mode {
            if !until.has_passed(now) {
                return;
            }
            self.mode = MonsterMode::Patrolling;
        }

        if self.next_turn.has_passed(now) {
            if let Some(&direction) = Direction::ALL.choose(rng) {
                self.direction = direction;
            }
            let delay = rng.gen_range(config.min_turn_ms..=config.max_turn_ms);
            self.next_turn = clock.deadline_after(Duration::from_millis(delay));
        }

        let origin = self.body.origin();
        if self.patrol == PatrolType::Chase && origin.distance(player) < config.chase_radius {
            self.mode = MonsterMode::Chasing;
            let delta = heading(origin, player) * self.body.speed();
            let _ = footing.step(&mut self.body, delta);
            return;
        }

        self.mode = MonsterMode::Patrolling;
        let delta = self.direction.unit() * self.body.speed();
        let blocked = footing.step(&mut self.body, delta);
        let blocked_here = if self.direction.is_horizontal() {
            blocked.x
        } else {
            blocked.y
        };
        if blocked_here {
            self.direction = self.direction.reversed();
        }
    }
}

impl Embodied for Monster {
    fn body(&self) -> &Body {
        &self.body
    }
}
