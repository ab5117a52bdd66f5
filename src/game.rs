use std::{thread::sleep, time::{Duration, Instant}};

use rand::Rng;
use tracing::info;

use crate::config::GameConfig;
use crate::engine::{EndCause, GameEngine, Snapshot, TickResult};
use crate::error::GameResult;
use crate::snake::Direction;
use crate::TermInt;

const POLL_INTERVAL_MS: u64 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Pause,
    Quit,
}

/// Answer to a blocking "press any key" prompt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ack {
    Continue,
    Quit,
}

/// What the caller should do once a game (or the intro) is done.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    PlayAgain,
    Quit,
}

pub trait InputSource {
    /// Never blocks. Yields at most one command per call, `None` when
    /// nothing is pending.
    fn poll_command(&mut self) -> GameResult<Option<Command>>;

    fn wait_for_ack(&mut self) -> GameResult<Ack>;
}

pub trait Renderer {
    /// Clears the screen and draws the border ring of an empty board.
    fn draw_board(&mut self, width: TermInt, height: TermInt) -> GameResult<()>;

    fn draw(&mut self, snapshot: &Snapshot) -> GameResult<()>;

    fn draw_game_over(&mut self, snapshot: &Snapshot, cause: EndCause) -> GameResult<()>;

    fn show_message(&mut self, lines: &[&str]) -> GameResult<()>;

    fn hide_message(&mut self) -> GameResult<()>;
}

pub struct SnakeGame<T> {
    term: T,
    config: GameConfig,
    paused: bool,
}

impl<T: InputSource + Renderer> SnakeGame<T> {
    pub fn new(term: T, config: GameConfig) -> Self {
        SnakeGame { term, config, paused: false }
    }

    pub fn show_intro(&mut self) -> GameResult<Flow> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.draw_board(self.config.width(), self.config.height())?;
        self.term.show_message(lines)?;
        let ack = self.term.wait_for_ack()?;
        self.term.hide_message()?;

        Ok(match ack {
            Ack::Continue => Flow::PlayAgain,
            Ack::Quit => Flow::Quit,
        })
    }

    pub fn play(&mut self) -> GameResult<Flow> {
        self.run(GameEngine::new(self.config))
    }

    /// Drives one game to its end: drain pending input into the engine,
    /// tick, draw whatever advanced. Returns early on a quit command.
    pub fn run<R: Rng>(&mut self, mut engine: GameEngine<R>) -> GameResult<Flow> {
        self.paused = false;
        self.term.draw_board(self.config.width(), self.config.height())?;
        self.term.draw(&engine.snapshot())?;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            while let Some(command) = self.term.poll_command()? {
                match command {
                    Command::Quit => {
                        info!("quit requested");
                        return Ok(Flow::Quit);
                    }
                    Command::Pause => self.toggle_pause(&mut engine)?,
                    Command::Steer(direction) => {
                        engine.set_direction(direction);
                    }
                }
            }

            if self.paused {
                continue;
            }

            match engine.tick(Instant::now()) {
                TickResult::NoOp => {}
                TickResult::Advanced(snapshot) => self.term.draw(&snapshot)?,
                TickResult::GameOver { cause, .. } => {
                    self.term.draw_game_over(&engine.snapshot(), cause)?;
                    break;
                }
                TickResult::Ended => break,
            }
        }

        Ok(match self.term.wait_for_ack()? {
            Ack::Continue => Flow::PlayAgain,
            Ack::Quit => Flow::Quit,
        })
    }

    fn toggle_pause<R: Rng>(&mut self, engine: &mut GameEngine<R>) -> GameResult<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
            engine.restart_clock(Instant::now());
        }

        self.paused = !self.paused;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[derive(Default)]
    struct ScriptedTerm {
        polls: VecDeque<Option<Command>>,
        acks: VecDeque<Ack>,
        boards: usize,
        frames: Vec<Snapshot>,
        game_over: Option<(Snapshot, EndCause)>,
        messages: Vec<String>,
        hidden: usize,
    }

    impl InputSource for ScriptedTerm {
        fn poll_command(&mut self) -> GameResult<Option<Command>> {
            Ok(self.polls.pop_front().flatten())
        }

        fn wait_for_ack(&mut self) -> GameResult<Ack> {
            Ok(self.acks.pop_front().unwrap_or(Ack::Continue))
        }
    }

    impl Renderer for ScriptedTerm {
        fn draw_board(&mut self, _width: TermInt, _height: TermInt) -> GameResult<()> {
            self.boards += 1;
            Ok(())
        }

        fn draw(&mut self, snapshot: &Snapshot) -> GameResult<()> {
            self.frames.push(snapshot.clone());
            Ok(())
        }

        fn draw_game_over(&mut self, snapshot: &Snapshot, cause: EndCause) -> GameResult<()> {
            self.game_over = Some((snapshot.clone(), cause));
            Ok(())
        }

        fn show_message(&mut self, lines: &[&str]) -> GameResult<()> {
            self.messages.push(lines[0].to_string());
            Ok(())
        }

        fn hide_message(&mut self) -> GameResult<()> {
            self.hidden += 1;
            Ok(())
        }
    }

    fn game(polls: Vec<Option<Command>>, acks: Vec<Ack>) -> (SnakeGame<ScriptedTerm>, GameEngine<StdRng>) {
        let config = GameConfig::new(8, 6, 0, 1).unwrap();
        let term = ScriptedTerm { polls: polls.into(), acks: acks.into(), ..Default::default() };
        let engine = GameEngine::with_rng(config, StdRng::seed_from_u64(1));
        (SnakeGame::new(term, config), engine)
    }

    #[test]
    fn runs_into_wall_without_input() {
        let (mut game, engine) = game(vec![], vec![Ack::Continue]);

        assert_eq!(game.run(engine).unwrap(), Flow::PlayAgain);

        let (snapshot, cause) = game.term.game_over.clone().unwrap();
        assert_eq!(cause, EndCause::Wall);
        assert_eq!(snapshot.head, (7, 3));
        assert_eq!(game.term.boards, 1);
        assert_eq!(game.term.frames[0].head, (4, 3));
    }

    #[test]
    fn steering_reaches_engine_before_first_tick() {
        let (mut game, engine) = game(vec![Some(Command::Steer(Direction::Up))], vec![Ack::Quit]);

        assert_eq!(game.run(engine).unwrap(), Flow::Quit);

        let (snapshot, cause) = game.term.game_over.clone().unwrap();
        assert_eq!(cause, EndCause::Wall);
        assert_eq!(snapshot.head, (4, 0));
    }

    #[test]
    fn quit_stops_game_immediately() {
        let (mut game, engine) = game(vec![Some(Command::Quit)], vec![]);

        assert_eq!(game.run(engine).unwrap(), Flow::Quit);
        assert!(game.term.game_over.is_none());
        assert_eq!(game.term.frames.len(), 1);
    }

    #[test]
    fn paused_game_does_not_advance() {
        let polls = vec![Some(Command::Pause), None, None, None, None, Some(Command::Quit)];
        let (mut game, engine) = game(polls, vec![]);

        assert_eq!(game.run(engine).unwrap(), Flow::Quit);
        assert_eq!(game.term.messages, vec!["Paused".to_string()]);
        assert_eq!(game.term.frames.len(), 1);
    }

    #[test]
    fn resuming_hides_pause_message() {
        let polls = vec![Some(Command::Pause), None, Some(Command::Pause)];
        let (mut game, engine) = game(polls, vec![Ack::Continue]);

        assert_eq!(game.run(engine).unwrap(), Flow::PlayAgain);
        assert_eq!(game.term.hidden, 1);
        assert!(game.term.game_over.is_some());
    }

    #[test]
    fn intro_honours_quit() {
        let (mut game, _) = game(vec![], vec![Ack::Quit]);

        assert_eq!(game.show_intro().unwrap(), Flow::Quit);
        assert_eq!(game.term.messages.len(), 1);
        assert_eq!(game.term.hidden, 1);
    }
}
