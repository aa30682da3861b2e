//! Fixed-step driver translating frame input into world commands.

use std::time::Duration;

use log::{debug, info};
use mystery_escape_core::{Command, Event};
use mystery_escape_rendering::{AudioSink, FrameInput};
use mystery_escape_world::{self as world, query, World};

/// Owns the world and feeds it commands at a fixed tick rate.
#[derive(Debug)]
pub(crate) struct Session<A> {
    world: World,
    audio: A,
    tick: Duration,
    max_catch_up: u32,
    accumulator: Duration,
    events: Vec<Event>,
}

impl<A: AudioSink> Session<A> {
    pub(crate) fn new(world: World, audio: A) -> Self {
        let timing = &query::config(&world).timing;
        let tick = timing.tick();
        let max_catch_up = timing.max_catch_up_ticks.max(1);
        Self {
            world,
            audio,
            tick,
            max_catch_up,
            accumulator: Duration::ZERO,
            events: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies one frame of input and as many ticks as `frame_dt` covers.
    ///
    /// Returns `true` once the player asked to quit.
    pub(crate) fn advance(&mut self, frame_dt: Duration, input: FrameInput) -> bool {
        self.events.clear();
        for command in commands_for(&input) {
            self.apply(command);
        }

        self.accumulator += frame_dt;
        let mut ticks = 0;
        while self.accumulator >= self.tick && ticks < self.max_catch_up {
            self.accumulator -= self.tick;
            ticks += 1;
            self.apply(Command::Tick { dt: self.tick });
        }
        if self.accumulator >= self.tick {
            debug!(
                "dropping {:?} of simulation backlog after {ticks} ticks",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.audio.play_events(&self.events);
        for event in &self.events {
            match event {
                Event::Won { score } => info!("escaped with a score of {score}"),
                Event::Lost { cause } => info!("session lost: {cause:?}"),
                _ => {}
            }
        }
        self.events.contains(&Event::QuitRequested)
    }

    fn apply(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }
}

/// Commands requested by a frame of input, in application order.
///
/// Typed characters precede confirm so a fast answer is complete on submit.
fn commands_for(input: &FrameInput) -> Vec<Command> {
    let mut commands = Vec::new();
    if input.quit {
        commands.push(Command::Quit);
    }
    if input.restart {
        commands.push(Command::Restart);
    }
    if input.pause {
        commands.push(Command::TogglePause);
    }
    commands.extend(
        input
            .typed
            .iter()
            .map(|&character| Command::TypeCharacter { character }),
    );
    if input.backspace {
        commands.push(Command::Backspace);
    }
    if input.confirm {
        commands.push(Command::Confirm);
    }
    if input.use_trap {
        commands.push(Command::UseTrap);
    }
    commands.push(Command::Steer {
        steering: input.steering(),
    });
    commands
}
