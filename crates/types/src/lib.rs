//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! Everything here is plain data: the cell encoding, the player commands,
//! the default tuning constants, and the [`GameConfig`] read once per session.
//!
//! # Board Encoding
//!
//! The board is a grid of [`Cell`] values:
//!
//! - `0` ([`EMPTY_CELL`]) is an empty cell
//! - `1..=N` is the type-id of the piece that locked into the cell
//!
//! Type-ids are assigned by the shape generator, one per prototype, so they
//! double as palette indices.
//!
//! # Default Tuning
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_COLS` | 14 | Board width |
//! | `DEFAULT_ROWS` | 25 | Board height |
//! | `MAX_BOARD_SIDE` | 1024 | Largest accepted width or height |
//! | `DEFAULT_SHAPE_TYPE_COUNT` | 10 | Prototypes generated per round |
//! | `MIN_SHAPE_SIZE` / `MAX_SHAPE_SIZE` | 3 / 4 | Side length N of a shape frame |
//! | `MIN_BLOCKS_PER_SHAPE` / `MAX_BLOCKS_PER_SHAPE` | 3 / 7 | Filled cells per shape |
//! | `LINES_PER_LEVEL` | 5 | Cleared lines per level |
//!
//! # Drop Intervals by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 800ms |
//! | 2 | 700ms |
//! | 5 | 430ms |
//! | 10 | 230ms |
//! | 20+ | 70ms |
//!
//! # Examples
//!
//! ```
//! use polytris_types::{GameAction, GameConfig, DEFAULT_COLS};
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//! assert_eq!(action.as_str(), "hardDrop");
//!
//! let config = GameConfig::default();
//! assert_eq!(config.cols, DEFAULT_COLS);
//! assert!(config.validate().is_ok());
//! ```

mod config;

pub use config::{ConfigError, GameConfig, SpeedStep};

/// Board width in cells
pub const DEFAULT_COLS: usize = 14;

/// Board height in cells
pub const DEFAULT_ROWS: usize = 25;

/// Largest accepted board side; keeps coordinates and screen math small.
pub const MAX_BOARD_SIDE: usize = 1024;

/// Number of piece prototypes generated for each round
pub const DEFAULT_SHAPE_TYPE_COUNT: u8 = 10;

/// Smallest side length of a generated shape frame
pub const MIN_SHAPE_SIZE: usize = 3;

/// Largest side length of a generated shape frame
pub const MAX_SHAPE_SIZE: usize = 4;

/// Fewest filled cells in a generated shape
pub const MIN_BLOCKS_PER_SHAPE: usize = 3;

/// Most filled cells in a generated shape
pub const MAX_BLOCKS_PER_SHAPE: usize = 7;

/// Cleared lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 5;

/// Retry budget for the shape generator before it falls back to a fixed shape
pub const MAX_GENERATION_ATTEMPTS: u32 = 1000;

/// Base points by number of lines cleared at once (index = lines)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Palette hues closer than this (degrees, circular) are re-rolled
pub const HUE_SEPARATION_DEG: u16 = 25;

/// Re-roll budget per palette entry
pub const HUE_ATTEMPTS: u32 = 10;

/// Fixed palette saturation (percent)
pub const PALETTE_SATURATION: u8 = 70;

/// Fixed palette lightness (percent)
pub const PALETTE_LIGHTNESS: u8 = 55;

/// Gravity intervals by level, fastest last.
///
/// Levels past the end of the table keep the last (fastest) interval.
pub const DEFAULT_SPEED_TABLE: [SpeedStep; 20] = [
    SpeedStep::new(1, 800),
    SpeedStep::new(2, 700),
    SpeedStep::new(3, 600),
    SpeedStep::new(4, 500),
    SpeedStep::new(5, 430),
    SpeedStep::new(6, 380),
    SpeedStep::new(7, 340),
    SpeedStep::new(8, 300),
    SpeedStep::new(9, 260),
    SpeedStep::new(10, 230),
    SpeedStep::new(11, 200),
    SpeedStep::new(12, 180),
    SpeedStep::new(13, 160),
    SpeedStep::new(14, 140),
    SpeedStep::new(15, 120),
    SpeedStep::new(16, 110),
    SpeedStep::new(17, 100),
    SpeedStep::new(18, 90),
    SpeedStep::new(19, 80),
    SpeedStep::new(20, 70),
];

/// A board cell: `0` is empty, anything else is the type-id that filled it.
pub type Cell = u8;

/// Value of an empty board cell
pub const EMPTY_CELL: Cell = 0;

/// Type-id of a piece prototype (`1..=count` within a session)
pub type PieceType = u8;

/// Player commands accepted by a game session
///
/// Each command is a zero-argument event. Commands that cannot be applied
/// (blocked move, blocked rotation, anything after game over) are silently
/// ignored by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Rotate piece 90° clockwise (no wall kicks)
    Rotate,
    /// Drop piece to its resting row and lock it
    HardDrop,
    /// Throw the session away and start a new round
    Reset,
}

impl GameAction {
    /// All commands, in declaration order
    pub const ALL: [GameAction; 6] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::Rotate,
        GameAction::HardDrop,
        GameAction::Reset,
    ];

    /// Parse a command from its camelCase name
    ///
    /// # Examples
    ///
    /// ```
    /// use polytris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("softDrop"), Some(GameAction::SoftDrop));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "moveLeft" => Some(GameAction::MoveLeft),
            "moveRight" => Some(GameAction::MoveRight),
            "softDrop" => Some(GameAction::SoftDrop),
            "rotate" => Some(GameAction::Rotate),
            "hardDrop" => Some(GameAction::HardDrop),
            "reset" => Some(GameAction::Reset),
            _ => None,
        }
    }

    /// Convert to the camelCase command name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::Rotate => "rotate",
            GameAction::HardDrop => "hardDrop",
            GameAction::Reset => "reset",
        }
    }
}
