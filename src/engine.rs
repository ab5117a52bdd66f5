use std::mem;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::snake::{is_reversal, Direction, Snake};
use crate::{Coords, TermInt};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndCause {
    Wall,
    SelfBite,
    /// Food was eaten and no free cell was left to put the next one on.
    BoardFull,
}

/// What a frame needs to draw. Owned, so the engine can keep mutating.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub grid_width: TermInt,
    pub grid_height: TermInt,
    pub head: Coords,
    /// Tail first, neck last.
    pub body: Vec<Coords>,
    pub food: Option<Coords>,
    pub score: u32,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickResult {
    /// Called before the tick interval elapsed; nothing changed.
    NoOp,
    Advanced(Snapshot),
    /// This tick ended the game.
    GameOver { score: u32, cause: EndCause },
    /// The game had already ended before this call.
    Ended,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Steer {
    Accepted,
    Rejected,
    Ended,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    width: TermInt,
    height: TermInt,
    score: u32,
    direction: Direction,
    pending_direction: Direction,
    end_cause: Option<EndCause>,
    last_update: Option<Instant>,
    snake: Snake,
    food: Option<Coords>,
}

impl GameState {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.end_cause
    }

    pub fn is_over(&self) -> bool {
        self.end_cause.is_some()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Coords> {
        self.food
    }
}

pub struct GameEngine<R: Rng = StdRng> {
    state: GameState,
    tick_interval: Duration,
    rng: R,
}

impl GameEngine<StdRng> {
    pub fn new(config: GameConfig) -> Self {
        GameEngine::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> GameEngine<R> {
    pub fn with_rng(config: GameConfig, mut rng: R) -> Self {
        let (width, height) = (config.width(), config.height());
        let snake = Snake::new((width / 2, height / 2));
        let food = place_food(&mut rng, width, height, &snake);

        info!(width, height, score = config.initial_score(), "new game");

        GameEngine {
            state: GameState {
                width,
                height,
                score: config.initial_score(),
                direction: Direction::Right,
                pending_direction: Direction::Right,
                end_cause: None,
                last_update: None,
                snake,
                food,
            },
            tick_interval: config.tick_interval(),
            rng,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Queues a turn for the next tick. Turning back onto the neck is
    /// rejected against the direction the snake is actually moving in, not
    /// against whatever is already queued.
    pub fn set_direction(&mut self, direction: Direction) -> Steer {
        if self.state.is_over() {
            return Steer::Ended;
        }

        if is_reversal(self.state.direction, direction) {
            debug!(current = ?self.state.direction, requested = ?direction, "reversal rejected");
            return Steer::Rejected;
        }

        self.state.pending_direction = direction;
        Steer::Accepted
    }

    /// Makes the next step due one full interval after `now`. Used when
    /// the host resumes from a pause.
    pub fn restart_clock(&mut self, now: Instant) {
        self.state.last_update = Some(now);
    }

    /// Advances the simulation by one step if at least one tick interval
    /// has passed since the previous step, otherwise leaves every field
    /// untouched. The first call after construction always steps.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        if self.state.is_over() {
            return TickResult::Ended;
        }

        if let Some(last) = self.state.last_update {
            if now.saturating_duration_since(last) < self.tick_interval {
                return TickResult::NoOp;
            }
        }

        self.state.last_update = Some(now);
        self.state.direction = self.state.pending_direction;

        let state = &mut self.state;
        state.snake = mem::take(&mut state.snake)
            .grow()
            .advance(state.direction)
            .trim(state.score as usize);

        if state.snake.hits_wall(state.width, state.height) {
            return self.finish(EndCause::Wall);
        }

        if state.snake.bites_itself() {
            return self.finish(EndCause::SelfBite);
        }

        if state.food == Some(state.snake.head()) {
            state.score += 1;
            state.food = place_food(&mut self.rng, state.width, state.height, &state.snake);
            debug!(score = state.score, food = ?state.food, "food eaten");

            if state.food.is_none() {
                return self.finish(EndCause::BoardFull);
            }
        }

        trace!(head = ?self.state.snake.head(), "tick");
        TickResult::Advanced(self.snapshot())
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            grid_width: state.width,
            grid_height: state.height,
            head: state.snake.head(),
            body: state.snake.body().iter().copied().collect(),
            food: state.food,
            score: state.score,
            direction: state.direction,
        }
    }

    fn finish(&mut self, cause: EndCause) -> TickResult {
        self.state.end_cause = Some(cause);
        info!(score = self.state.score, ?cause, "game over");
        TickResult::GameOver { score: self.state.score, cause }
    }
}

/// Picks a uniformly random interior cell the snake does not cover, or
/// `None` when the snake covers all of them.
fn place_food<R: Rng>(rng: &mut R, width: TermInt, height: TermInt, snake: &Snake) -> Option<Coords> {
    let free: Vec<Coords> = (1..height - 1)
        .flat_map(|y| (1..width - 1).map(move |x| (x, y)))
        .filter(|pos| !snake.occupies(*pos))
        .collect();

    free.choose(rng).copied()
}
