#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Mystery Escape.
//!
//! The [`World`] owns one play session: the phase, the active arena, every
//! entity, the score, and the seeded random source used by the generators.
//! Adapters mutate it exclusively through [`apply`] and read it through
//! [`query`].

mod riddle;
mod stages;

use std::time::Duration;

use log::{debug, info};
use mystery_escape_core::{
    config::GameConfig, Activity, Command, ConfigError, Deadline, Direction, Event, GameClock,
    LossCause, Phase, Rect, Route, Stage, Steering, Vec2, WELCOME_BANNER,
};
use mystery_escape_system_forest::{self as forest_gen, Forest};
use mystery_escape_system_highway::{self as highway_gen, Highway, Vehicle};
use mystery_escape_system_movement::{Boss, Embodied, Friend, Monster, Player};
use mystery_escape_system_neighborhood::{self as neighborhood_gen, Neighborhood};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use riddle::RiddleInput;
use stages::Outcome;

/// Arena that is active for the current phase.
#[derive(Clone, Debug, PartialEq)]
pub enum Arena {
    /// Procedurally generated forest.
    Forest(Forest),
    /// Suburban road network, with the boss once the chase has begun.
    Neighborhood {
        /// Generated road network.
        neighborhood: Neighborhood,
        /// Boss chasing the van, present during the chase.
        boss: Option<Boss>,
    },
    /// Lane track of the final escape.
    Highway {
        /// Generated track.
        highway: Highway,
        /// Van driven by the player.
        vehicle: Vehicle,
    },
}

/// Represents the authoritative Mystery Escape session state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    config: GameConfig,
    seed: u64,
    rng: ChaCha8Rng,
    phase: Phase,
    clock: GameClock,
    on_foot: Duration,
    steering: Steering,
    score: u32,
    traps: u32,
    arena: Arena,
    van: Rect,
    player: Player,
    friends: Vec<Friend>,
    caravan: Vec<usize>,
    monsters: Vec<Monster>,
    riddle: RiddleInput,
}

impl World {
    /// Creates a session in the menu, generating the forest from `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::generate(config, seed))
    }

    fn generate(config: GameConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tile = config.arena.tile_length;
        let layout = forest_gen::generate(&config, &mut rng);

        let player = Player::new(layout.forest.player_start(), tile, &config.player);
        let friends = layout
            .friends
            .iter()
            .map(|spawn| {
                Friend::new(
                    spawn.kind,
                    spawn.origin,
                    tile,
                    config.friend.speed,
                    config.friend.follow_distance_tiles * tile,
                )
            })
            .collect();
        let monsters = layout
            .monsters
            .iter()
            .map(|spawn| {
                let direction = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                let delay = rng
                    .gen_range(config.monster.min_turn_ms..=config.monster.max_turn_ms);
                Monster::new(
                    spawn.id,
                    spawn.origin,
                    tile,
                    spawn.patrol,
                    direction,
                    Deadline::at(Duration::from_millis(delay)),
                    &config.monster,
                )
            })
            .collect();

        debug!("generated session from seed {seed:#x}");
        Self {
            banner: WELCOME_BANNER,
            van: layout.forest.van(),
            arena: Arena::Forest(layout.forest),
            config,
            seed,
            rng,
            phase: Phase::Menu,
            clock: GameClock::new(),
            on_foot: Duration::ZERO,
            steering: Steering::NONE,
            score: 0,
            traps: 0,
            player,
            friends,
            caravan: Vec::new(),
            monsters,
            riddle: RiddleInput::default(),
        }
    }

    fn transition(&mut self, to: Phase, out_events: &mut Vec<Event>) {
        let from = self.phase;
        if from == to {
            return;
        }
        info!("phase {from:?} -> {to:?}");
        self.phase = to;
        out_events.push(Event::PhaseChanged { from, to });
    }

    fn lose(&mut self, cause: LossCause, out_events: &mut Vec<Event>) {
        self.transition(Phase::GameOver(cause), out_events);
        out_events.push(Event::Lost { cause });
    }

    fn tick(&mut self, activity: Activity, out_events: &mut Vec<Event>) {
        let outcome = match activity {
            Activity::Playing(Stage::Forest) => stages::forest(self, out_events),
            Activity::Playing(Stage::Neighborhood) => stages::neighborhood(self),
            Activity::Driving(Route::NeighborhoodChase) => stages::chase(self),
            Activity::Driving(Route::Highway) => {
                stages::highway(self, out_events);
                None
            }
        };

        match outcome {
            Some(Outcome::Lose(cause)) => self.lose(cause, out_events),
            Some(Outcome::EnterNeighborhood) => self.enter_neighborhood(out_events),
            Some(Outcome::EnterChase) => self.enter_chase(out_events),
            Some(Outcome::EnterHighway) => self.enter_highway(out_events),
            None => {}
        }
    }

    fn enter_neighborhood(&mut self, out_events: &mut Vec<Event>) {
        let neighborhood = neighborhood_gen::generate(&self.config, &mut self.rng);
        let spot = *neighborhood.van_spot();
        self.player.place_at(spot.player());
        for (position, &index) in self.caravan.iter().enumerate() {
            if let Some(friend) = self.friends.get_mut(index) {
                friend.place_at(spot.trailing(position));
            }
        }
        self.van = spot.van();
        self.monsters.clear();
        self.arena = Arena::Neighborhood {
            neighborhood,
            boss: None,
        };
        self.transition(
            Phase::Active(Activity::Playing(Stage::Neighborhood)),
            out_events,
        );
    }

    fn enter_chase(&mut self, out_events: &mut Vec<Event>) {
        let tile = self.config.arena.tile_length;
        let offset = Vec2::new(self.config.highway.boss_offset_tiles * tile, 0.0);
        let spawn = self.player.body().origin() - offset;
        if let Arena::Neighborhood { boss, .. } = &mut self.arena {
            *boss = Some(Boss::new(spawn, tile, &self.config.monster));
        }
        self.transition(
            Phase::Active(Activity::Driving(Route::NeighborhoodChase)),
            out_events,
        );
    }

    fn enter_highway(&mut self, out_events: &mut Vec<Event>) {
        let highway = highway_gen::generate(&self.config, &mut self.rng);
        self.arena = Arena::Highway {
            highway,
            vehicle: Vehicle::new(&self.config.highway),
        };
        self.riddle.clear();
        self.transition(Phase::Active(Activity::Driving(Route::Highway)), out_events);
    }

    fn use_trap(&mut self, out_events: &mut Vec<Event>) {
        if self.traps == 0 {
            return;
        }

        let origin = self.player.body().origin();
        let range = self.config.player.trap_range_tiles * self.config.arena.tile_length;
        let nearest = self
            .monsters
            .iter_mut()
            .filter(|monster| !monster.is_stunned())
            .map(|monster| (monster.body().origin().distance(origin), monster))
            .filter(|(distance, _)| *distance < range)
            .min_by(|(left, _), (right, _)| left.total_cmp(right));

        if let Some((_, monster)) = nearest {
            monster.stun(&self.clock, self.config.monster.stun());
            self.traps -= 1;
            debug!("trap stunned {:?}", monster.id());
            out_events.push(Event::TrapUsed {
                monster: monster.id(),
            });
        }
    }

    fn submit_answer(&mut self, out_events: &mut Vec<Event>) {
        let correct = self.riddle.submit(&self.config.riddle.answer);
        out_events.push(Event::RiddleSubmitted { correct });
        if correct {
            self.score = self.score.saturating_add(self.config.scoring.riddle);
            self.transition(Phase::Won, out_events);
            out_events.push(Event::Won { score: self.score });
        }
    }

    fn restart(&mut self, out_events: &mut Vec<Event>) {
        let from = self.phase;
        let seed = self.rng.next_u64();
        *self = Self::generate(self.config.clone(), seed);
        info!("session restarted with seed {seed:#x}");
        out_events.push(Event::SessionRestarted { seed });
        if from != Phase::Menu {
            out_events.push(Event::PhaseChanged {
                from,
                to: Phase::Menu,
            });
        }
    }

    fn on_highway(&self) -> bool {
        self.phase == Phase::Active(Activity::Driving(Route::Highway))
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Steer { steering } => world.steering = steering,
        Command::Tick { dt } => {
            let Some(activity) = world.phase.active_activity() else {
                return;
            };
            world.clock.advance(dt);
            if matches!(activity, Activity::Playing(_)) {
                world.on_foot = world.on_foot.saturating_add(dt);
            }
            out_events.push(Event::TimeAdvanced { dt });
            world.tick(activity, out_events);
        }
        Command::UseTrap => {
            if world.phase == Phase::Active(Activity::Playing(Stage::Forest)) {
                world.use_trap(out_events);
            }
        }
        Command::Confirm => {
            if world.phase == Phase::Menu {
                world.transition(Phase::Active(Activity::Playing(Stage::Forest)), out_events);
            } else if world.on_highway() {
                world.submit_answer(out_events);
            }
        }
        Command::Backspace => {
            if world.on_highway() {
                world.riddle.backspace();
            }
        }
        Command::TypeCharacter { character } => {
            if world.on_highway() {
                world.riddle.push(character);
            }
        }
        Command::TogglePause => match world.phase {
            Phase::Active(activity) => world.transition(Phase::Paused(activity), out_events),
            Phase::Paused(activity) => world.transition(Phase::Active(activity), out_events),
            Phase::Menu | Phase::GameOver(_) | Phase::Won => {}
        },
        Command::Restart => world.restart(out_events),
        Command::Quit => out_events.push(Event::QuitRequested),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use mystery_escape_core::{config::GameConfig, Phase, Rect, Terrain};
    use mystery_escape_system_movement::{Friend, Monster, Player};

    use super::{Arena, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the session was generated from.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Seed the session was generated from.
    #[must_use]
    pub fn seed(world: &World) -> u64 {
        world.seed
    }

    /// Current phase of the session.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world.phase
    }

    /// Arena active for the current phase.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Extent of the active arena in world units.
    ///
    /// The highway has no tile grid, so its extent is the visible window.
    #[must_use]
    pub fn arena_bounds(world: &World) -> Rect {
        match &world.arena {
            Arena::Forest(forest) => forest.tile_grid().bounds(),
            Arena::Neighborhood { neighborhood, .. } => neighborhood.tile_grid().bounds(),
            Arena::Highway { .. } => Rect::from_xywh(
                0.0,
                0.0,
                world.config.arena.viewport_width,
                world.config.arena.viewport_height,
            ),
        }
    }

    /// Simulated time spent on foot; driving does not count.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.on_foot
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Trap charges held by the player.
    #[must_use]
    pub fn traps(world: &World) -> u32 {
        world.traps
    }

    /// The player character.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Time left on the snack boost.
    #[must_use]
    pub fn boost_remaining(world: &World) -> Duration {
        world.player.boost_remaining(world.clock.now())
    }

    /// Every friend, found or not, in spawn order.
    #[must_use]
    pub fn friends(world: &World) -> &[Friend] {
        &world.friends
    }

    /// Found friends in the order they joined the caravan.
    pub fn caravan(world: &World) -> impl Iterator<Item = &Friend> + '_ {
        world
            .caravan
            .iter()
            .filter_map(|&index| world.friends.get(index))
    }

    /// Monsters roaming the forest.
    #[must_use]
    pub fn monsters(world: &World) -> &[Monster] {
        &world.monsters
    }

    /// Area occupied by the van, unless the player is already driving the highway.
    #[must_use]
    pub fn van(world: &World) -> Option<Rect> {
        match world.arena {
            Arena::Highway { .. } => None,
            _ => Some(world.van),
        }
    }

    /// Riddle prompt shown on the highway.
    #[must_use]
    pub fn riddle_prompt(world: &World) -> &str {
        &world.config.riddle.prompt
    }

    /// Answer typed so far.
    #[must_use]
    pub fn riddle_answer(world: &World) -> &str {
        world.riddle.as_str()
    }

    /// Distance left to the end of the highway, while driving it.
    #[must_use]
    pub fn highway_remaining(world: &World) -> Option<f32> {
        match &world.arena {
            Arena::Highway { highway, vehicle } => Some(highway.remaining(vehicle.position())),
            _ => None,
        }
    }

    /// Current instant of the session clock.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock.now()
    }
}

#[cfg(test)]
mod tests {
    use mystery_escape_core::{CollectibleKind, FriendKind, MonsterId, PatrolType, Terrain};
    use mystery_escape_system_movement::MonsterMode;

    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn started(seed: u64) -> (World, Vec<Event>) {
        let mut world = World::new(GameConfig::default(), seed).expect("valid config");
        let mut events = Vec::new();
        apply(&mut world, Command::Confirm, &mut events);
        (world, events)
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt: TICK }, &mut events);
        events
    }

    fn forest(world: &World) -> &Forest {
        match &world.arena {
            Arena::Forest(forest) => forest,
            other => panic!("expected forest, found {other:?}"),
        }
    }

    fn park_monsters(world: &mut World) {
        for monster in &mut world.monsters {
            monster.stun(&world.clock, Duration::from_secs(3_600));
        }
    }

    fn monster_at(world: &World, id: u32, origin: Vec2) -> Monster {
        Monster::new(
            MonsterId::new(id),
            origin,
            world.config.arena.tile_length,
            PatrolType::Random,
            Direction::Up,
            Deadline::at(Duration::ZERO),
            &world.config.monster,
        )
    }

    #[test]
    fn friend_is_found_once_and_scores_once() {
        let (mut world, _) = started(1);
        park_monsters(&mut world);
        let friend_origin = world.friends[0].body().origin();
        world.player.place_at(friend_origin);

        let events = tick(&mut world);
        assert!(events.contains(&Event::FriendFound {
            friend: FriendKind::Shaggy
        }));
        assert_eq!(world.caravan, vec![0]);
        let score = world.score;
        assert!(score >= 100);

        let events = tick(&mut world);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::FriendFound { .. })));
        assert_eq!(world.caravan, vec![0]);
        assert_eq!(world.score, score);
    }

    #[test]
    fn snack_grants_boost_and_points() {
        let (mut world, _) = started(2);
        park_monsters(&mut world);
        let snack = forest(&world)
            .collectibles()
            .iter()
            .find(|collectible| collectible.kind() == CollectibleKind::Snack)
            .map(|collectible| collectible.bounds().origin())
            .expect("a snack");
        world.player.place_at(snack);

        let events = tick(&mut world);

        assert!(events.contains(&Event::SnackCollected));
        assert!(world.player.is_boosted());
        assert!(world.score >= 50);
    }

    #[test]
    fn touching_an_active_monster_ends_the_game_once() {
        let (mut world, _) = started(3);
        let monster_origin = world.monsters[0].body().origin();
        world.player.place_at(monster_origin);
        world.monsters.truncate(1);

        let events = tick(&mut world);

        assert!(events.contains(&Event::MonsterCollision {
            monster: MonsterId::new(0)
        }));
        assert!(events.contains(&Event::Lost {
            cause: LossCause::CaughtByMonster
        }));
        assert_eq!(world.phase, Phase::GameOver(LossCause::CaughtByMonster));
        assert!(tick(&mut world).is_empty());
    }

    #[test]
    fn running_out_of_courage_is_reported_once() {
        let (mut world, _) = started(8);
        world.config.player.courage_fast_decay = 100.0;
        let origin = world.player.body().origin();
        world.monsters = vec![monster_at(&world, 0, origin + Vec2::new(90.0, 0.0))];

        let events = tick(&mut world);

        let losses = events
            .iter()
            .filter(|event| matches!(event, Event::Lost { .. }))
            .count();
        assert_eq!(losses, 1);
        assert_eq!(world.phase, Phase::GameOver(LossCause::OutOfCourage));
        assert!(tick(&mut world).is_empty());
    }

    #[test]
    fn boosted_player_shrugs_off_monsters() {
        let (mut world, _) = started(3);
        let monster_origin = world.monsters[0].body().origin();
        world.player.place_at(monster_origin);
        world.monsters.truncate(1);
        world.player.activate_boost(&world.clock, Duration::from_secs(5));

        let events = tick(&mut world);

        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::MonsterCollision { .. })));
        assert!(world.phase.active_activity().is_some());
    }

    #[test]
    fn trap_stuns_nearest_monster_in_range() {
        let (mut world, _) = started(4);
        world.traps = 1;
        let origin = world.player.body().origin();
        world.monsters = vec![
            monster_at(&world, 7, origin + Vec2::new(120.0, 0.0)),
            monster_at(&world, 8, origin + Vec2::new(60.0, 0.0)),
            monster_at(&world, 9, origin + Vec2::new(400.0, 0.0)),
        ];

        let mut events = Vec::new();
        apply(&mut world, Command::UseTrap, &mut events);

        assert_eq!(
            events,
            vec![Event::TrapUsed {
                monster: MonsterId::new(8)
            }]
        );
        assert_eq!(world.traps, 0);
        assert!(matches!(
            world.monsters[1].mode(),
            MonsterMode::Stunned { .. }
        ));
        assert!(!world.monsters[0].is_stunned());
        assert!(!world.monsters[2].is_stunned());
    }

    #[test]
    fn trap_without_target_is_kept() {
        let (mut world, _) = started(4);
        world.traps = 1;
        world.monsters.clear();

        let mut events = Vec::new();
        apply(&mut world, Command::UseTrap, &mut events);

        assert!(events.is_empty());
        assert_eq!(world.traps, 1);
    }

    #[test]
    fn caravan_at_van_enters_neighborhood_on_a_road() {
        let (mut world, _) = started(5);
        park_monsters(&mut world);
        for index in 0..world.friends.len() {
            let _ = world.friends[index].mark_found();
            world.caravan.push(index);
        }
        let van = world.van;
        world.player.place_at(van.origin());

        let events = tick(&mut world);

        assert!(events.contains(&Event::PhaseChanged {
            from: Phase::Active(Activity::Playing(Stage::Forest)),
            to: Phase::Active(Activity::Playing(Stage::Neighborhood)),
        }));
        let Arena::Neighborhood { neighborhood, boss } = &world.arena else {
            panic!("expected neighborhood");
        };
        assert!(boss.is_none());
        assert!(neighborhood.passable(world.van.center()));
        assert!(neighborhood.passable(world.player.body().center()));
        assert!(world.monsters.is_empty());
    }

    #[test]
    fn driving_to_the_exit_reaches_the_highway() {
        let (mut world, _) = started(6);
        let neighborhood = neighborhood_gen::generate(&world.config, &mut world.rng);
        let exit = neighborhood.exit_bounds().origin();
        world.arena = Arena::Neighborhood {
            neighborhood,
            boss: None,
        };
        world.phase = Phase::Active(Activity::Playing(Stage::Neighborhood));
        let van = world.van;
        world.van = Rect::new(world.player.body().origin(), van.size());

        let events = tick(&mut world);
        assert!(events.contains(&Event::PhaseChanged {
            from: Phase::Active(Activity::Playing(Stage::Neighborhood)),
            to: Phase::Active(Activity::Driving(Route::NeighborhoodChase)),
        }));
        assert!(matches!(
            world.arena,
            Arena::Neighborhood { boss: Some(_), .. }
        ));

        world.player.place_at(exit);
        let events = tick(&mut world);
        assert!(events.contains(&Event::PhaseChanged {
            from: Phase::Active(Activity::Driving(Route::NeighborhoodChase)),
            to: Phase::Active(Activity::Driving(Route::Highway)),
        }));
        assert!(matches!(world.arena, Arena::Highway { .. }));
    }

    #[test]
    fn boss_catching_the_player_ends_the_chase() {
        let (mut world, _) = started(7);
        let neighborhood = neighborhood_gen::generate(&world.config, &mut world.rng);
        let origin = neighborhood.van_spot().player();
        world.player.place_at(origin);
        world.arena = Arena::Neighborhood {
            neighborhood,
            boss: Some(Boss::new(origin, 50.0, &world.config.monster)),
        };
        world.phase = Phase::Active(Activity::Driving(Route::NeighborhoodChase));

        let events = tick(&mut world);

        assert!(events.contains(&Event::Lost {
            cause: LossCause::CaughtByBoss
        }));
        assert_eq!(world.phase, Phase::GameOver(LossCause::CaughtByBoss));
    }

    #[test]
    fn timer_counts_only_time_on_foot() {
        let (mut world, _) = started(8);
        park_monsters(&mut world);
        let _ = tick(&mut world);

        let mut events = Vec::new();
        world.enter_highway(&mut events);
        let _ = tick(&mut world);
        let _ = tick(&mut world);

        assert_eq!(query::elapsed(&world), TICK);
        assert_eq!(query::now(&world), TICK * 3);
    }

    #[test]
    fn answering_the_riddle_wins_the_game() {
        let (mut world, _) = started(9);
        let mut events = Vec::new();
        world.enter_highway(&mut events);
        world.score = 250;

        for character in "Yes".chars() {
            apply(&mut world, Command::TypeCharacter { character }, &mut events);
        }
        events.clear();
        apply(&mut world, Command::Confirm, &mut events);
        assert_eq!(events, vec![Event::RiddleSubmitted { correct: false }]);
        assert_eq!(world.riddle.as_str(), "");

        for character in "No".chars() {
            apply(&mut world, Command::TypeCharacter { character }, &mut events);
        }
        events.clear();
        apply(&mut world, Command::Confirm, &mut events);

        assert_eq!(
            events,
            vec![
                Event::RiddleSubmitted { correct: true },
                Event::PhaseChanged {
                    from: Phase::Active(Activity::Driving(Route::Highway)),
                    to: Phase::Won,
                },
                Event::Won { score: 1_250 },
            ]
        );
        assert_eq!(world.phase, Phase::Won);
    }
}
