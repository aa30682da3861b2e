//! Per-activity tick handlers.
//!
//! Each handler advances the entities of one activity and reports the
//! transition it triggered, if any. The caller applies the transition so the
//! handlers never replace the arena they are borrowing.

use mystery_escape_core::{CollectibleKind, Event, LossCause};
use mystery_escape_system_movement::{advance_caravan, Embodied, Obstructed, RoadBound};

use crate::{Arena, World};

/// Transition requested by a tick handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    Lose(LossCause),
    EnterNeighborhood,
    EnterChase,
    EnterHighway,
}

pub(crate) fn forest(world: &mut World, out: &mut Vec<Event>) -> Option<Outcome> {
    let Arena::Forest(forest) = &mut world.arena else {
        return None;
    };

    let _ = world
        .player
        .walk(&world.steering, &world.clock, &Obstructed(&*forest));

    let target = world.player.body().origin();
    for monster in &mut world.monsters {
        monster.update(
            &world.clock,
            target,
            &Obstructed(&*forest),
            &mut world.rng,
            &world.config.monster,
        );
        if !monster.is_stunned() && !world.player.is_boosted() && monster.touches(&world.player) {
            out.push(Event::MonsterCollision {
                monster: monster.id(),
            });
            return Some(Outcome::Lose(LossCause::CaughtByMonster));
        }
    }

    let threats = world
        .monsters
        .iter()
        .filter(|monster| !monster.is_stunned())
        .map(|monster| monster.body().origin());
    if world.player.update_courage(threats, &world.config.player) {
        return Some(Outcome::Lose(LossCause::OutOfCourage));
    }

    let scoring = &world.config.scoring;
    for kind in forest.take_overlapping(world.player.bounds()) {
        match kind {
            CollectibleKind::Snack => {
                world
                    .player
                    .activate_boost(&world.clock, world.config.player.boost());
                world.score = world.score.saturating_add(scoring.snack);
                out.push(Event::SnackCollected);
            }
            CollectibleKind::Trap => {
                world.traps = world.traps.saturating_add(1);
                world.score = world.score.saturating_add(scoring.trap);
                out.push(Event::TrapCollected);
            }
        }
    }

    advance_caravan(
        world.player.body().origin(),
        &mut world.friends,
        &world.caravan,
        &Obstructed(&*forest),
    );

    for (index, friend) in world.friends.iter_mut().enumerate() {
        if friend.touches(&world.player) && friend.mark_found() {
            world.caravan.push(index);
            world.score = world.score.saturating_add(scoring.friend);
            out.push(Event::FriendFound {
                friend: friend.kind(),
            });
        }
    }

    let everyone_found = world.caravan.len() == world.friends.len();
    (everyone_found && world.player.bounds().overlaps(&world.van))
        .then_some(Outcome::EnterNeighborhood)
}

pub(crate) fn neighborhood(world: &mut World) -> Option<Outcome> {
    let Arena::Neighborhood { neighborhood, .. } = &world.arena else {
        return None;
    };

    let footing = RoadBound(neighborhood);
    let _ = world.player.walk(&world.steering, &world.clock, &footing);
    advance_caravan(
        world.player.body().origin(),
        &mut world.friends,
        &world.caravan,
        &footing,
    );

    world
        .player
        .bounds()
        .overlaps(&world.van)
        .then_some(Outcome::EnterChase)
}

pub(crate) fn chase(world: &mut World) -> Option<Outcome> {
    let Arena::Neighborhood { neighborhood, boss } = &mut world.arena else {
        return None;
    };

    let footing = RoadBound(&*neighborhood);
    let _ = world.player.walk(&world.steering, &world.clock, &footing);
    advance_caravan(
        world.player.body().origin(),
        &mut world.friends,
        &world.caravan,
        &footing,
    );

    if world.player.bounds().overlaps(&neighborhood.exit_bounds()) {
        return Some(Outcome::EnterHighway);
    }

    let boss = boss.as_mut()?;
    boss.pursue(world.player.body().origin(), &*neighborhood);
    boss.touches(&world.player)
        .then_some(Outcome::Lose(LossCause::CaughtByBoss))
}

pub(crate) fn highway(world: &mut World, out: &mut Vec<Event>) {
    let Arena::Highway { highway, vehicle } = &mut world.arena else {
        return;
    };

    vehicle.drive(&world.steering, &world.clock, &world.config.highway);
    let bounds = highway.vehicle_bounds(vehicle.lane());
    for swerve in highway.swerve_colliding(bounds, vehicle.position(), &mut world.rng) {
        out.push(Event::ObstacleSwerved {
            from_lane: swerve.from_lane,
            to_lane: swerve.to_lane,
        });
    }
}
