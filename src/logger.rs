use std::{fs::File, path::Path, sync::Mutex};

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt::time, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the tracing subscriber. The game owns the terminal while it
/// runs, so events only go somewhere when a log file is given; `RUST_LOG`
/// refines the filter as usual.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let path = match log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("Could not create log file {}", path.display()))?;

    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_timer(time::uptime())
                .with_writer(Mutex::new(file)),
        )
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env()?,
        )
        .try_init()?;

    Ok(())
}
