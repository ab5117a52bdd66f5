use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use berry_snake::config::{self, GameConfig};
use berry_snake::game::{Flow, SnakeGame};
use berry_snake::term::TermManager;
use berry_snake::{logger, TermInt};

/// Snake on a fixed-size grid in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct SnakeArgs {
    /// Grid width in cells, border included
    #[arg(long, default_value_t = config::DEFAULT_WIDTH)]
    width: TermInt,

    /// Grid height in cells, border included
    #[arg(long, default_value_t = config::DEFAULT_HEIGHT)]
    height: TermInt,

    /// Starting score, which is also the body length the snake grows to
    #[arg(long, default_value_t = config::DEFAULT_INITIAL_SCORE)]
    initial_score: u32,

    /// Milliseconds between simulation steps
    #[arg(long, default_value_t = config::DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Write trace events to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = SnakeArgs::parse();
    logger::init(args.log_file.as_deref())?;

    let config = GameConfig::new(args.width, args.height, args.initial_score, args.tick_ms)
        .context("Refusing to start")?;
    info!(?config, "starting");

    let mut term = TermManager::new().context("Could not query terminal")?;
    term.check_fits(config.width(), config.height())?;
    term.setup().context("Could not set up terminal")?;

    let mut game = SnakeGame::new(term, config);
    if game.show_intro()? == Flow::Quit {
        return Ok(());
    }

    // Restoring the terminal happens when the game (and its TermManager) drops
    while game.play()? == Flow::PlayAgain {}

    info!("bye");
    Ok(())
}
