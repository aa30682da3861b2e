use std::time::Duration;

use mystery_escape_core::{
    config::GameConfig, CellCoord, Deadline, Direction, FriendKind, GameClock, MonsterId, PatrolType, Rect,
    Steering, Terrain, Tile, TileGrid, Vec2,
};
use mystery_escape_system_movement::{
    advance_caravan, Boss, Embodied, Friend, Monster, MonsterMode, Obstructed, Player, RoadBound,
};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

const TILE: f32 = 50.0;

struct Field {
    grid: TileGrid,
    obstacles: Vec<Rect>,
}

impl Field {
    fn open() -> Self {
        Self {
            grid: TileGrid::filled(40, 30, TILE, Tile::Ground),
            obstacles: Vec::new(),
        }
    }

    fn with_obstacle(obstacle: Rect) -> Self {
        Self {
            obstacles: vec![obstacle],
            ..Self::open()
        }
    }
}

impl Terrain for Field {
    fn tile_grid(&self) -> &TileGrid {
        &self.grid
    }

    fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }
}

fn right() -> Steering {
    Steering {
        right: true,
        ..Steering::NONE
    }
}

#[test]
fn boost_doubles_speed_until_deadline() {
    let config = GameConfig::default();
    let field = Field::open();
    let mut clock = GameClock::new();
    let mut player = Player::new(Vec2::new(100.0, 100.0), TILE, &config.player);

    player.activate_boost(&clock, Duration::from_millis(5_000));
    let _ = player.walk(&right(), &clock, &Obstructed(&field));
    assert_eq!(player.body().origin().x, 106.0);

    clock.advance(Duration::from_millis(4_999));
    let _ = player.walk(&right(), &clock, &Obstructed(&field));
    assert_eq!(player.body().origin().x, 112.0);
    assert!(player.is_boosted());

    clock.advance(Duration::from_millis(1));
    let _ = player.walk(&right(), &clock, &Obstructed(&field));
    assert_eq!(player.body().origin().x, 115.0);
    assert!(!player.is_boosted());
}

#[test]
fn blocked_axis_leaves_open_axis_moving() {
    let config = GameConfig::default();
    let field = Field::with_obstacle(Rect::from_xywh(152.0, 0.0, 50.0, 1_000.0));
    let clock = GameClock::new();
    let mut player = Player::new(Vec2::new(100.0, 100.0), TILE, &config.player);
    let down_right = Steering {
        down: true,
        right: true,
        ..Steering::NONE
    };

    let blocked = player.walk(&down_right, &clock, &Obstructed(&field));

    assert!(blocked.x);
    assert!(!blocked.y);
    assert_eq!(player.body().origin(), Vec2::new(100.0, 103.0));
}

#[test]
fn courage_exhaustion_is_reported_and_clamped() {
    let config = GameConfig::default();
    let mut player = Player::new(Vec2::ZERO, TILE, &config.player);

    let mut exhausted_at = None;
    for tick in 0..150 {
        if player.update_courage([Vec2::new(10.0, 0.0)], &config.player) {
            exhausted_at = Some(tick);
            break;
        }
    }

    assert_eq!(exhausted_at, Some(99));
    assert_eq!(player.courage(), 0.0);
    assert!(player.update_courage([Vec2::new(10.0, 0.0)], &config.player));
    assert_eq!(player.courage(), 0.0);
}

#[test]
fn unfound_friend_stays_put() {
    let field = Field::open();
    let mut friend = Friend::new(FriendKind::Velma, Vec2::new(500.0, 500.0), TILE, 2.5, 75.0);

    friend.follow(Vec2::new(100.0, 100.0), &Obstructed(&field));

    assert_eq!(friend.body().origin(), Vec2::new(500.0, 500.0));
    assert!(friend.mark_found());
    assert!(!friend.mark_found());
}

#[test]
fn found_friend_closes_distance_but_keeps_its_spacing() {
    let field = Field::open();
    let mut friend = Friend::new(FriendKind::Fred, Vec2::new(300.0, 100.0), TILE, 2.5, 75.0);
    let _ = friend.mark_found();

    friend.follow(Vec2::new(100.0, 100.0), &Obstructed(&field));
    assert_eq!(friend.body().origin(), Vec2::new(297.5, 100.0));

    let mut close = Friend::new(FriendKind::Fred, Vec2::new(170.0, 100.0), TILE, 2.5, 75.0);
    let _ = close.mark_found();
    close.follow(Vec2::new(100.0, 100.0), &Obstructed(&field));
    assert_eq!(close.body().origin(), Vec2::new(170.0, 100.0));
}

#[test]
fn caravan_follows_positions_from_before_the_tick() {
    let field = Field::open();
    let mut friends = vec![
        Friend::new(FriendKind::Shaggy, Vec2::new(300.0, 100.0), TILE, 2.5, 75.0),
        Friend::new(FriendKind::Velma, Vec2::new(500.0, 100.0), TILE, 2.5, 75.0),
    ];
    for friend in &mut friends {
        let _ = friend.mark_found();
    }

    advance_caravan(Vec2::new(100.0, 100.0), &mut friends, &[1, 0], &Obstructed(&field));

    assert_eq!(friends[1].body().origin(), Vec2::new(497.5, 100.0));
    assert_eq!(friends[0].body().origin(), Vec2::new(302.5, 100.0));
}

#[test]
fn chasing_monster_closes_in_inside_radius() {
    let config = GameConfig::default();
    let field = Field::open();
    let clock = GameClock::new();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let player = Vec2::new(300.0, 300.0);
    let mut monster = Monster::new(
        MonsterId::new(3),
        Vec2::new(420.0, 410.0),
        TILE,
        PatrolType::Chase,
        Direction::Up,
        Deadline::at(Duration::ZERO),
        &config.monster,
    );
    let before = monster.body().origin().distance(player);

    monster.update(&clock, player, &Obstructed(&field), &mut rng, &config.monster);

    assert!(monster.body().origin().distance(player) < before);
    assert_eq!(monster.mode(), MonsterMode::Chasing);
}

#[test]
fn chasing_monster_walks_randomly_outside_radius() {
    let config = GameConfig::default();
    let field = Field::open();
    let clock = GameClock::new();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let start = Vec2::new(1_000.0, 800.0);
    let mut monster = Monster::new(
        MonsterId::new(4),
        start,
        TILE,
        PatrolType::Chase,
        Direction::Up,
        Deadline::at(Duration::ZERO),
        &config.monster,
    );

    monster.update(
        &clock,
        Vec2::new(100.0, 100.0),
        &Obstructed(&field),
        &mut rng,
        &config.monster,
    );

    let moved = monster.body().origin() - start;
    assert_eq!(moved, monster.direction().unit() * 1.5);
    assert_eq!(monster.mode(), MonsterMode::Patrolling);
}

#[test]
fn spawn_direction_holds_until_first_turn() {
    let config = GameConfig::default();
    let field = Field::open();
    let mut clock = GameClock::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let start = Vec2::new(600.0, 600.0);
    let mut monster = Monster::new(
        MonsterId::new(2),
        start,
        TILE,
        PatrolType::Random,
        Direction::Left,
        Deadline::at(Duration::from_secs(2)),
        &config.monster,
    );

    for _ in 0..10 {
        monster.update(&clock, Vec2::ZERO, &Obstructed(&field), &mut rng, &config.monster);
        clock.advance(Duration::from_millis(100));
    }

    assert_eq!(monster.direction(), Direction::Left);
    assert_eq!(monster.body().origin(), start + Vec2::new(-15.0, 0.0));
}

#[test]
fn random_monster_reverses_when_blocked() {
    let mut config = GameConfig::default();
    config.monster.min_turn_ms = 60_000;
    config.monster.max_turn_ms = 60_000;
    let clock = GameClock::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut monster = Monster::new(
        MonsterId::new(0),
        Vec2::new(500.0, 500.0),
        TILE,
        PatrolType::Random,
        Direction::Up,
        Deadline::at(Duration::ZERO),
        &config.monster,
    );
    let open = Field::open();
    monster.update(&clock, Vec2::ZERO, &Obstructed(&open), &mut rng, &config.monster);
    let direction = monster.direction();
    let origin = monster.body().origin();

    let wall = Rect::new(origin + direction.unit() * 51.0, Vec2::splat(TILE));
    let walled = Field::with_obstacle(wall);
    monster.update(&clock, Vec2::ZERO, &Obstructed(&walled), &mut rng, &config.monster);

    assert_eq!(monster.body().origin(), origin);
    assert_eq!(monster.direction(), direction.reversed());
}

#[test]
fn stunned_monster_holds_until_stun_expires() {
    let config = GameConfig::default();
    let field = Field::open();
    let mut clock = GameClock::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let start = Vec2::new(600.0, 600.0);
    let mut monster = Monster::new(
        MonsterId::new(1),
        start,
        TILE,
        PatrolType::Random,
        Direction::Left,
        Deadline::at(Duration::ZERO),
        &config.monster,
    );

    monster.stun(&clock, config.monster.stun());
    clock.advance(Duration::from_millis(5_999));
    monster.update(&clock, Vec2::ZERO, &Obstructed(&field), &mut rng, &config.monster);
    assert!(monster.is_stunned());
    assert_eq!(monster.body().origin(), start);

    clock.advance(Duration::from_millis(1));
    monster.update(&clock, Vec2::ZERO, &Obstructed(&field), &mut rng, &config.monster);
    assert!(!monster.is_stunned());
    assert_ne!(monster.body().origin(), start);
}

fn crossroads() -> Field {
    let mut grid = TileGrid::filled(20, 20, TILE, Tile::Lot);
    for index in 1..19 {
        grid.set(CellCoord::new(index, 5), Tile::Road);
        grid.set(CellCoord::new(5, index), Tile::Road);
    }
    Field {
        grid,
        obstacles: Vec::new(),
    }
}

#[test]
fn road_bound_player_stays_on_the_road() {
    let config = GameConfig::default();
    let roads = crossroads();
    let clock = GameClock::new();
    let mut player = Player::new(Vec2::new(100.0, 250.0), TILE, &config.player);
    let up = Steering {
        up: true,
        ..Steering::NONE
    };

    for _ in 0..20 {
        let _ = player.walk(&up, &clock, &RoadBound(&roads));
    }

    assert!(roads.passable(player.body().center()));
    assert_eq!(player.body().origin(), Vec2::new(100.0, 226.0));
}

#[test]
fn boss_prefers_roads_and_creeps_off_road() {
    let config = GameConfig::default();
    let roads = crossroads();
    let mut boss = Boss::new(Vec2::new(50.0, 225.0), TILE, &config.monster);

    boss.pursue(Vec2::new(900.0, 225.0), &roads);
    assert!(boss.body().origin().abs_diff_eq(Vec2::new(51.8, 225.0), 1e-3));

    let mut stranded = Boss::new(Vec2::new(700.0, 700.0), TILE, &config.monster);
    stranded.pursue(Vec2::new(700.0, 900.0), &roads);
    assert!(stranded
        .body()
        .origin()
        .abs_diff_eq(Vec2::new(700.0, 700.9), 1e-3));
}
