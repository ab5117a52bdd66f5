use crate::config::ConfigError;
use crate::TermInt;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("Invalid game configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Terminal error")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("Terminal is {width}x{height} but the game needs at least {needed_width}x{needed_height}.")]
    TerminalTooSmall {
        width: TermInt,
        height: TermInt,
        needed_width: TermInt,
        needed_height: TermInt,
    },
}

pub type GameResult<T> = std::result::Result<T, GameError>;
