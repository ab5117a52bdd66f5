pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod logger;
pub mod snake;
pub mod term;

pub type TermInt = u16;
pub type Coords = (u16, u16);
