use mystery_escape_core::{FriendKind, Vec2};

use crate::{heading, Body, Embodied, Footing};

/// A friend waiting in the forest or following the caravan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Friend {
    kind: FriendKind,
    body: Body,
    found: bool,
    follow_distance: f32,
}

impl Friend {
    /// Creates a friend that has not been found yet.
    #[must_use]
    pub fn new(
        kind: FriendKind,
        origin: Vec2,
        tile_length: f32,
        speed: f32,
        follow_distance: f32,
    ) -> Self {
        Self {
            kind,
            body: Body::new(origin, Vec2::splat(tile_length), speed),
            found: false,
            follow_distance,
        }
    }

    /// Which friend this is.
    #[must_use]
    pub const fn kind(&self) -> FriendKind {
        self.kind
    }

    /// Reports whether the friend joined the caravan.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.found
    }

    /// Marks the friend as found. Returns `false` if it already was.
    pub fn mark_found(&mut self) -> bool {
        !std::mem::replace(&mut self.found, true)
    }

    /// Teleports the friend, e.g. when arriving in a new arena.
    pub fn place_at(&mut self, origin: Vec2) {
        self.body.place_at(origin);
    }

    /// Moves toward `target` when farther than the follow distance.
    ///
    /// Friends that have not been found stay put.
    pub fn follow<F: Footing + ?Sized>(&mut self, target: Vec2, footing: &F) {
        if !self.found {
            return;
        }

        let origin = self.body.origin();
        if origin.distance(target) <= self.follow_distance {
            return;
        }

        let delta = heading(origin, target) * self.body.speed();
        let _ = footing.step(&mut self.body, delta);
    }
}

impl Embodied for Friend {
    fn body(&self) -> &Body {
        &self.body
    }
}

/// Moves every found friend along the caravan led from `leader`.
///
/// `order` lists indices into `friends` in the order they were found. The
/// first follows the leader and each next one follows the position its
/// predecessor held before moving this tick.
pub fn advance_caravan<F: Footing + ?Sized>(
    leader: Vec2,
    friends: &mut [Friend],
    order: &[usize],
    footing: &F,
) {
    let mut target = leader;
    for &index in order {
        let Some(friend) = friends.get_mut(index) else {
            continue;
        };
        let before = friend.body.origin();
        friend.follow(target, footing);
        target = before;
    }
}
