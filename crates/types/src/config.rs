//! Session configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    DEFAULT_COLS, DEFAULT_ROWS, DEFAULT_SHAPE_TYPE_COUNT, DEFAULT_SPEED_TABLE, LINES_PER_LEVEL,
    MAX_BLOCKS_PER_SHAPE, MAX_BOARD_SIDE, MAX_GENERATION_ATTEMPTS, MAX_SHAPE_SIZE,
    MIN_BLOCKS_PER_SHAPE, MIN_SHAPE_SIZE,
};

/// Gravity interval for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpeedStep {
    pub level: u32,
    pub interval_ms: u32,
}

impl SpeedStep {
    pub const fn new(level: u32, interval_ms: u32) -> Self {
        Self { level, interval_ms }
    }
}

/// Static configuration read once when a session starts.
///
/// Missing fields in a JSON document fall back to [`GameConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in cells
    pub cols: usize,
    /// Board height in cells
    pub rows: usize,
    /// Number of prototypes generated per round
    pub shape_type_count: u8,
    pub min_shape_size: usize,
    pub max_shape_size: usize,
    pub min_blocks: usize,
    pub max_blocks: usize,
    pub lines_per_level: u32,
    /// Gravity by level; must be non-empty and never get slower
    pub speed_table: Vec<SpeedStep>,
    /// Shape generator retry budget
    pub max_generation_attempts: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            shape_type_count: DEFAULT_SHAPE_TYPE_COUNT,
            min_shape_size: MIN_SHAPE_SIZE,
            max_shape_size: MAX_SHAPE_SIZE,
            min_blocks: MIN_BLOCKS_PER_SHAPE,
            max_blocks: MAX_BLOCKS_PER_SHAPE,
            lines_per_level: LINES_PER_LEVEL,
            speed_table: DEFAULT_SPEED_TABLE.to_vec(),
            max_generation_attempts: MAX_GENERATION_ATTEMPTS,
        }
    }
}

/// Reasons a [`GameConfig`] cannot start a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must have at least one row and one column (got {cols}x{rows})")]
    EmptyBoard { cols: usize, rows: usize },
    #[error("board {cols}x{rows} exceeds the {max}-cell limit per side")]
    BoardTooLarge { cols: usize, rows: usize, max: usize },
    #[error("shape size range {min}..={max} is empty or starts at zero")]
    InvalidShapeSize { min: usize, max: usize },
    #[error("shapes up to {size} cells wide do not fit a board {cols} columns wide")]
    ShapeWiderThanBoard { size: usize, cols: usize },
    #[error("block count range {min}..={max} is empty or starts at zero")]
    InvalidBlockRange { min: usize, max: usize },
    #[error("{min} blocks never fit a {size}x{size} shape")]
    UnreachableBlockCount { min: usize, size: usize },
    #[error("every allowed shape would be a tetromino (4 blocks only)")]
    NoLegalShapes,
    #[error("at least one piece type is required")]
    NoPieceTypes,
    #[error("lines per level must be positive")]
    ZeroLinesPerLevel,
    #[error("speed table is empty")]
    EmptySpeedTable,
    #[error("speed table entry for level {level} is zero or slower than the previous level")]
    SpeedTableNotDecreasing { level: u32 },
    #[error("speed table level {level} is out of order or repeated")]
    SpeedTableLevelsNotAscending { level: u32 },
    #[error("shape generator needs at least one attempt")]
    ZeroGenerationAttempts,
}

impl GameConfig {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `POLYTRIS_*` environment overrides on top of `self`.
    ///
    /// Unset or unparsable variables leave the field unchanged.
    pub fn with_env_overrides(mut self) -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
            env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        if let Some(cols) = parsed("POLYTRIS_COLS") {
            self.cols = cols;
        }
        if let Some(rows) = parsed("POLYTRIS_ROWS") {
            self.rows = rows;
        }
        if let Some(count) = parsed("POLYTRIS_TYPES") {
            self.shape_type_count = count;
        }
        if let Some(lines) = parsed("POLYTRIS_LINES_PER_LEVEL") {
            self.lines_per_level = lines;
        }
        self
    }

    /// Block count bounds for an `size x size` frame.
    ///
    /// The minimum is clamped into `1..=size²` first; the maximum is clamped
    /// to `size²` and never drops below the minimum.
    pub fn block_range(&self, size: usize) -> (usize, usize) {
        let max_possible = size * size;
        let min = self.min_blocks.min(max_possible).max(1);
        let max = self.max_blocks.min(max_possible).max(min);
        (min, max)
    }

    /// Check that a session can be built from this configuration.
    ///
    /// Rejects the combinations that would leave the shape generator with
    /// nothing legal to produce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::EmptyBoard {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if self.cols > MAX_BOARD_SIDE || self.rows > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                cols: self.cols,
                rows: self.rows,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.min_shape_size == 0 || self.min_shape_size > self.max_shape_size {
            return Err(ConfigError::InvalidShapeSize {
                min: self.min_shape_size,
                max: self.max_shape_size,
            });
        }
        if self.max_shape_size > self.cols {
            return Err(ConfigError::ShapeWiderThanBoard {
                size: self.max_shape_size,
                cols: self.cols,
            });
        }
        if self.min_blocks == 0 || self.min_blocks > self.max_blocks {
            return Err(ConfigError::InvalidBlockRange {
                min: self.min_blocks,
                max: self.max_blocks,
            });
        }
        let frame_cells = self.max_shape_size.checked_mul(self.max_shape_size);
        if frame_cells.map_or(true, |cells| self.min_blocks > cells) {
            return Err(ConfigError::UnreachableBlockCount {
                min: self.min_blocks,
                size: self.max_shape_size,
            });
        }
        // Every 4-cell connected shape is a tetromino.
        let has_legal_size = (self.min_shape_size..=self.max_shape_size).any(|size| {
            let (lo, hi) = self.block_range(size);
            lo != 4 || hi != 4
        });
        if !has_legal_size {
            return Err(ConfigError::NoLegalShapes);
        }
        if self.shape_type_count == 0 {
            return Err(ConfigError::NoPieceTypes);
        }
        if self.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        let Some(first) = self.speed_table.first() else {
            return Err(ConfigError::EmptySpeedTable);
        };
        if first.interval_ms == 0 {
            return Err(ConfigError::SpeedTableNotDecreasing { level: first.level });
        }
        for pair in self.speed_table.windows(2) {
            if pair[1].level <= pair[0].level {
                return Err(ConfigError::SpeedTableLevelsNotAscending {
                    level: pair[1].level,
                });
            }
            if pair[1].interval_ms == 0 || pair[1].interval_ms > pair[0].interval_ms {
                return Err(ConfigError::SpeedTableNotDecreasing {
                    level: pair[1].level,
                });
            }
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::ZeroGenerationAttempts);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{ "cols": 10, "rows": 20 }"#).unwrap();
        assert_eq!(config.cols, 10);
        assert_eq!(config.rows, 20);
        assert_eq!(config.shape_type_count, DEFAULT_SHAPE_TYPE_COUNT);
        assert_eq!(config.speed_table.len(), DEFAULT_SPEED_TABLE.len());
    }

    #[test]
    fn rejects_empty_board() {
        let config = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyBoard { .. })
        ));
    }

    #[test]
    fn rejects_unreachable_block_count() {
        let config = GameConfig {
            min_shape_size: 2,
            max_shape_size: 2,
            min_blocks: 5,
            max_blocks: 7,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::UnreachableBlockCount { min: 5, size: 2 })
        );
    }

    #[test]
    fn rejects_inverted_ranges() {
        let sizes = GameConfig {
            min_shape_size: 4,
            max_shape_size: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            sizes.validate(),
            Err(ConfigError::InvalidShapeSize { min: 4, max: 3 })
        ));

        let blocks = GameConfig {
            min_blocks: 6,
            max_blocks: 4,
            ..GameConfig::default()
        };
        assert!(matches!(
            blocks.validate(),
            Err(ConfigError::InvalidBlockRange { min: 6, max: 4 })
        ));
    }

    #[test]
    fn rejects_tetromino_only_configuration() {
        let config = GameConfig {
            min_blocks: 4,
            max_blocks: 4,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoLegalShapes));
    }

    #[test]
    fn block_range_clamps_to_frame() {
        let config = GameConfig::default();
        assert_eq!(config.block_range(3), (3, 7));
        assert_eq!(config.block_range(2), (3, 4));
        assert_eq!(config.block_range(1), (1, 1));

        let greedy = GameConfig {
            min_blocks: 12,
            max_blocks: 20,
            ..GameConfig::default()
        };
        assert_eq!(greedy.block_range(3), (9, 9));
        assert_eq!(greedy.block_range(4), (12, 16));
    }

    #[test]
    fn rejects_slower_speed_table_entry() {
        let config = GameConfig {
            speed_table: vec![SpeedStep::new(1, 500), SpeedStep::new(2, 600)],
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::SpeedTableNotDecreasing { level: 2 })
        );
    }

    #[test]
    fn rejects_empty_speed_table() {
        let config = GameConfig {
            speed_table: Vec::new(),
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptySpeedTable));
    }

    #[test]
    fn rejects_huge_board() {
        let config = GameConfig {
            cols: 1 << 40,
            rows: 1 << 40,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));

        let tall = GameConfig {
            rows: MAX_BOARD_SIDE + 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            tall.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));

        let edge = GameConfig {
            cols: MAX_BOARD_SIDE,
            rows: MAX_BOARD_SIDE,
            ..GameConfig::default()
        };
        assert_eq!(edge.validate(), Ok(()));
    }

    #[test]
    fn huge_shape_size_does_not_overflow() {
        let config = GameConfig {
            cols: 1 << 40,
            max_shape_size: 1 << 33,
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());

        let wide = GameConfig {
            cols: MAX_BOARD_SIDE,
            max_shape_size: usize::MAX,
            ..GameConfig::default()
        };
        assert!(matches!(
            wide.validate(),
            Err(ConfigError::ShapeWiderThanBoard { .. })
        ));
    }

    #[test]
    fn rejects_unsorted_speed_levels() {
        let unsorted = GameConfig {
            speed_table: vec![
                SpeedStep::new(1, 800),
                SpeedStep::new(3, 700),
                SpeedStep::new(2, 600),
            ],
            ..GameConfig::default()
        };
        assert_eq!(
            unsorted.validate(),
            Err(ConfigError::SpeedTableLevelsNotAscending { level: 2 })
        );

        let repeated = GameConfig {
            speed_table: vec![SpeedStep::new(1, 800), SpeedStep::new(1, 700)],
            ..GameConfig::default()
        };
        assert_eq!(
            repeated.validate(),
            Err(ConfigError::SpeedTableLevelsNotAscending { level: 1 })
        );
    }

    #[test]
    fn rejects_board_narrower_than_shapes() {
        let config = GameConfig {
            cols: 3,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ShapeWiderThanBoard { size: 4, cols: 3 })
        );
    }
}
