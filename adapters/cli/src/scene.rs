//! Conversion of world queries into the backend-agnostic scene.

use glam::Vec2;
use mystery_escape_core::{Activity, CollectibleKind, Phase, Rect, Route, Terrain, Tile};
use mystery_escape_rendering::{Hud, RiddlePanel, Scene, SpriteInstance, SpriteKind};
use mystery_escape_system_movement::Embodied;
use mystery_escape_world::{query, Arena, World};

/// Rebuilds `scene` from the current world state.
pub(crate) fn populate_scene(world: &World, scene: &mut Scene) {
    scene.phase = query::phase(world);
    scene.sprites.clear();

    match query::arena(world) {
        Arena::Forest(forest) => {
            push(scene, SpriteKind::Ground, forest.tile_grid().bounds());
            for tree in forest.trees() {
                push(scene, SpriteKind::Tree, *tree);
            }
            for collectible in forest.collectibles() {
                let kind = match collectible.kind() {
                    CollectibleKind::Snack => SpriteKind::Snack,
                    CollectibleKind::Trap => SpriteKind::Trap,
                };
                push(scene, kind, collectible.bounds());
            }
            push_van(world, scene);
            for monster in query::monsters(world) {
                let stunned = monster.is_stunned();
                push(scene, SpriteKind::Monster { stunned }, monster.bounds());
            }
            push_party(world, scene);
        }
        Arena::Neighborhood { neighborhood, boss } => {
            let grid = neighborhood.tile_grid();
            push(scene, SpriteKind::Lot, grid.bounds());
            for (cell, tile) in grid.iter() {
                if tile == Tile::Road {
                    push(scene, SpriteKind::Road, grid.cell_rect(cell));
                }
            }
            for &house in neighborhood.houses() {
                push(scene, SpriteKind::House, grid.cell_rect(house));
            }
            for &light in neighborhood.streetlights() {
                push(scene, SpriteKind::Streetlight, grid.cell_rect(light));
            }
            push(scene, SpriteKind::Exit, neighborhood.exit_bounds());
            if boss.is_none() {
                push_van(world, scene);
            }
            push_party(world, scene);
            if let Some(boss) = boss {
                push(scene, SpriteKind::Boss, boss.bounds());
            }
        }
        Arena::Highway { highway, vehicle } => {
            let config = query::config(world);
            let tile = config.arena.tile_length;
            let shift = Vec2::new(0.0, config.arena.viewport_height / 3.0);
            for lane in 0..highway.lanes() {
                let bounds = Rect::from_xywh(
                    0.0,
                    lane as f32 * tile,
                    config.arena.viewport_width,
                    tile,
                );
                push(scene, SpriteKind::Lane, shifted(bounds, shift));
            }
            for obstacle in highway.obstacles() {
                if let Some(bounds) = highway.obstacle_bounds(obstacle, vehicle.position()) {
                    push(scene, SpriteKind::Obstacle, shifted(bounds, shift));
                }
            }
            let lane_y = vehicle.visual_lane(query::now(world)) * tile;
            let van = highway.vehicle_bounds(vehicle.lane());
            let van = van.at(Vec2::new(van.left(), lane_y));
            push(scene, SpriteKind::Van, shifted(van, shift));
        }
    }

    scene.camera.follow(
        query::player(world).body().center(),
        query::arena_bounds(world),
    );
    scene.hud = hud(world);
}

fn push(scene: &mut Scene, kind: SpriteKind, bounds: Rect) {
    scene.sprites.push(SpriteInstance::new(kind, bounds));
}

fn shifted(bounds: Rect, shift: Vec2) -> Rect {
    bounds.at(bounds.origin() + shift)
}

fn push_van(world: &World, scene: &mut Scene) {
    if let Some(van) = query::van(world) {
        push(scene, SpriteKind::Van, van);
    }
}

/// Friends first so the player is drawn on top of the caravan.
fn push_party(world: &World, scene: &mut Scene) {
    for friend in query::friends(world) {
        push(scene, SpriteKind::Friend(friend.kind()), friend.bounds());
    }

    let player = query::player(world);
    let kind = if is_chasing(query::phase(world)) {
        SpriteKind::Van
    } else {
        SpriteKind::Player {
            boosted: player.is_boosted(),
        }
    };
    push(scene, kind, player.bounds());
}

fn is_chasing(phase: Phase) -> bool {
    match phase {
        Phase::Active(activity) | Phase::Paused(activity) => {
            activity == Activity::Driving(Route::NeighborhoodChase)
        }
        Phase::Menu | Phase::GameOver(_) | Phase::Won => false,
    }
}

fn hud(world: &World) -> Hud {
    let player = query::player(world);
    let config = query::config(world);
    let riddle = matches!(query::arena(world), Arena::Highway { .. }).then(|| RiddlePanel {
        prompt: query::riddle_prompt(world).to_owned(),
        answer: query::riddle_answer(world).to_owned(),
    });

    Hud {
        score: query::score(world),
        elapsed: query::elapsed(world),
        traps: query::traps(world),
        courage: player.courage(),
        courage_max: config.player.courage_max,
        boost_remaining: query::boost_remaining(world),
        friends_found: query::caravan(world).count(),
        friends_total: query::friends(world).len(),
        highway_remaining: query::highway_remaining(world),
        riddle,
    }
}
