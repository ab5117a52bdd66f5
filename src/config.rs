use std::time::Duration;

use crate::TermInt;

pub const DEFAULT_WIDTH: TermInt = 32;
pub const DEFAULT_HEIGHT: TermInt = 16;
pub const DEFAULT_INITIAL_SCORE: u32 = 5;
pub const DEFAULT_TICK_MS: u64 = 500;

// The border ring takes the outermost row and column on each side
const MIN_GRID_SIDE: TermInt = 3;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid must be at least {min}x{min}, got {width}x{height}.")]
    GridTooSmall { width: TermInt, height: TermInt, min: TermInt },
    #[error("Tick interval must be greater than zero.")]
    ZeroTickInterval,
}

/// The four numbers a game is built from. Only constructible through
/// [`GameConfig::new`], so holding one means the values were checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    width: TermInt,
    height: TermInt,
    initial_score: u32,
    tick_interval: Duration,
}

impl GameConfig {
    pub fn new(
        width: TermInt,
        height: TermInt,
        initial_score: u32,
        tick_interval_ms: u64,
    ) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIDE || height < MIN_GRID_SIDE {
            return Err(ConfigError::GridTooSmall { width, height, min: MIN_GRID_SIDE });
        }

        if tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(GameConfig {
            width,
            height,
            initial_score,
            tick_interval: Duration::from_millis(tick_interval_ms),
        })
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn initial_score(&self) -> u32 {
        self.initial_score
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            initial_score: DEFAULT_INITIAL_SCORE,
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_smallest_grid() {
        let config = GameConfig::new(3, 3, 0, 1).unwrap();
        assert_eq!(config.width(), 3);
        assert_eq!(config.height(), 3);
        assert_eq!(config.initial_score(), 0);
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn rejects_narrow_or_short_grids() {
        assert_eq!(
            GameConfig::new(2, 10, 5, 100),
            Err(ConfigError::GridTooSmall { width: 2, height: 10, min: 3 })
        );
        assert!(matches!(
            GameConfig::new(10, 0, 5, 100),
            Err(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn rejects_zero_interval() {
        assert_eq!(GameConfig::new(10, 10, 5, 0), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn default_matches_constants() {
        let config = GameConfig::default();
        assert_eq!(
            config,
            GameConfig::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_INITIAL_SCORE, DEFAULT_TICK_MS)
                .unwrap()
        );
    }
}
