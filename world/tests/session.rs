use std::time::Duration;

use mystery_escape_core::{
    config::GameConfig, Activity, Command, ConfigError, Event, Phase, Stage, Steering,
};
use mystery_escape_system_movement::Embodied;
use mystery_escape_world::{self as world, query, Arena, World};

const TICK: Duration = Duration::from_millis(16);

fn new_world(seed: u64) -> World {
    World::new(GameConfig::default(), seed).expect("default config is valid")
}

fn apply(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

#[test]
fn session_starts_in_the_menu_with_a_fresh_forest() {
    let world = new_world(11);

    assert_eq!(query::phase(&world), Phase::Menu);
    assert_eq!(query::score(&world), 0);
    assert_eq!(query::traps(&world), 0);
    assert_eq!(query::elapsed(&world), Duration::ZERO);
    assert_eq!(query::friends(&world).len(), 4);
    assert_eq!(query::monsters(&world).len(), 5);
    assert_eq!(query::caravan(&world).count(), 0);
    assert!(matches!(query::arena(&world), Arena::Forest(_)));
    assert!(query::van(&world).is_some());
    assert_eq!(query::highway_remaining(&world), None);
    assert!(!query::welcome_banner(&world).is_empty());
}

#[test]
fn invalid_configuration_is_rejected() {
    let mut config = GameConfig::default();
    config.timing.tick_rate_hz = 0;

    assert_eq!(
        World::new(config, 1).err(),
        Some(ConfigError::ZeroTickRate)
    );
}

#[test]
fn menu_ignores_ticks_until_confirmed() {
    let mut world = new_world(12);

    assert!(apply(&mut world, Command::Tick { dt: TICK }).is_empty());
    assert_eq!(query::elapsed(&world), Duration::ZERO);

    let events = apply(&mut world, Command::Confirm);
    let forest = Phase::Active(Activity::Playing(Stage::Forest));
    assert_eq!(
        events,
        vec![Event::PhaseChanged {
            from: Phase::Menu,
            to: forest,
        }]
    );

    let events = apply(&mut world, Command::Tick { dt: TICK });
    assert_eq!(events.first(), Some(&Event::TimeAdvanced { dt: TICK }));
    assert_eq!(query::elapsed(&world), TICK);
}

#[test]
fn pause_freezes_the_clock_and_resumes_the_same_activity() {
    let mut world = new_world(13);
    let _ = apply(&mut world, Command::Confirm);
    let forest = Activity::Playing(Stage::Forest);

    let events = apply(&mut world, Command::TogglePause);
    assert_eq!(
        events,
        vec![Event::PhaseChanged {
            from: Phase::Active(forest),
            to: Phase::Paused(forest),
        }]
    );

    let steering = Steering {
        right: true,
        ..Steering::NONE
    };
    let _ = apply(&mut world, Command::Steer { steering });
    let before = query::player(&world).body().origin();
    for _ in 0..10 {
        assert!(apply(&mut world, Command::Tick { dt: TICK }).is_empty());
    }
    assert_eq!(query::elapsed(&world), Duration::ZERO);
    assert_eq!(query::player(&world).body().origin(), before);

    let _ = apply(&mut world, Command::TogglePause);
    assert_eq!(query::phase(&world), Phase::Active(forest));
}

#[test]
fn pause_is_ignored_in_the_menu() {
    let mut world = new_world(14);

    assert!(apply(&mut world, Command::TogglePause).is_empty());
    assert_eq!(query::phase(&world), Phase::Menu);
}

#[test]
fn restart_regenerates_into_the_menu_with_a_new_seed() {
    let mut world = new_world(15);
    let _ = apply(&mut world, Command::Confirm);
    for _ in 0..30 {
        let _ = apply(&mut world, Command::Tick { dt: TICK });
    }

    let events = apply(&mut world, Command::Restart);

    let Some(Event::SessionRestarted { seed }) = events.first().cloned() else {
        panic!("expected a restart event, got {events:?}");
    };
    assert_ne!(seed, 15);
    assert_eq!(query::seed(&world), seed);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::PhaseChanged {
            to: Phase::Menu,
            ..
        }
    )));
    assert_eq!(query::phase(&world), Phase::Menu);
    assert_eq!(query::elapsed(&world), Duration::ZERO);
    assert_eq!(query::score(&world), 0);
}

#[test]
fn same_seed_and_commands_replay_identically() {
    let steering = Steering {
        down: true,
        right: true,
        ..Steering::NONE
    };
    let run = || {
        let mut world = new_world(16);
        let mut log = apply(&mut world, Command::Confirm);
        log.extend(apply(&mut world, Command::Steer { steering }));
        for _ in 0..200 {
            log.extend(apply(&mut world, Command::Tick { dt: TICK }));
        }
        (
            log,
            query::player(&world).body().origin(),
            query::monsters(&world)
                .iter()
                .map(|monster| monster.body().origin())
                .collect::<Vec<_>>(),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn different_seeds_generate_different_forests() {
    let first = new_world(17);
    let second = new_world(18);

    let (Arena::Forest(first), Arena::Forest(second)) =
        (query::arena(&first), query::arena(&second))
    else {
        panic!("sessions start in the forest");
    };
    assert_ne!(first.trees(), second.trees());
}

#[test]
fn quit_is_reported_in_any_phase() {
    let mut world = new_world(19);
    assert_eq!(apply(&mut world, Command::Quit), vec![Event::QuitRequested]);

    let _ = apply(&mut world, Command::Confirm);
    assert_eq!(apply(&mut world, Command::Quit), vec![Event::QuitRequested]);
}

#[test]
fn riddle_input_is_ignored_away_from_the_highway() {
    let mut world = new_world(20);
    let _ = apply(&mut world, Command::Confirm);

    for character in "no".chars() {
        assert!(apply(&mut world, Command::TypeCharacter { character }).is_empty());
    }
    assert!(apply(&mut world, Command::Confirm).is_empty());
    assert_eq!(query::riddle_answer(&world), "");
    assert_eq!(
        query::phase(&world),
        Phase::Active(Activity::Playing(Stage::Forest))
    );
}

#[test]
fn traps_are_not_spent_without_charges() {
    let mut world = new_world(21);
    let _ = apply(&mut world, Command::Confirm);

    assert!(apply(&mut world, Command::UseTrap).is_empty());
    assert_eq!(query::traps(&world), 0);
}
