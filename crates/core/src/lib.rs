//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and the
//! procedural shape generator. It has **no dependencies** on UI, timers, or
//! I/O, making it:
//!
//! - **Deterministic**: Same seed and config produce identical rounds
//! - **Testable**: Every rule is a plain function or a `&mut self` transition
//! - **Portable**: Can run in any environment (terminal, async actor, headless)
//!
//! # Module Structure
//!
//! - [`shape`]: Binary cell matrices, rotation, normalization, connectivity
//! - [`generator`]: Random connected polyominoes, classic tetrominoes excluded
//! - [`board`]: Fixed-size grid with pure line clearing
//! - [`collision`]: The single legality check for moves and lookahead
//! - [`piece`]: Piece catalog entries, live pieces, spawning
//! - [`scoring`]: Line scores, levels, gravity intervals
//! - [`palette`]: Per-round hue-separated colors
//! - [`game_state`]: The round state machine
//! - [`snapshot`]: Owned view for presentation
//!
//! # Game Rules
//!
//! - **Fresh pieces every round**: 10 shapes in 3x3 or 4x4 frames, 3-7 cells,
//!   never one of the seven tetrominoes under any rotation
//! - **Rotation**: 90° clockwise, rejected when blocked (no wall kicks)
//! - **Locking**: a piece locks as soon as gravity cannot move it down
//! - **Scoring**: 100/300/500/800 for 1-4 lines, times the level
//! - **Levels**: one level per 5 lines, starting at 1
//!
//! # Example
//!
//! ```
//! use polytris_core::GameState;
//! use polytris_types::{GameAction, GameConfig};
//!
//! let mut game = GameState::new(GameConfig::default(), 12345);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.board().filled_count() > 0);
//! assert!(game.take_last_event().is_some());
//! ```
//!
//! # Timing
//!
//! The core has no clock. A driver calls [`GameState::tick`] every
//! [`GameState::drop_interval_ms`] milliseconds and re-reads the interval
//! after each lock.

pub mod board;
pub mod collision;
pub mod game_state;
pub mod generator;
pub mod palette;
pub mod piece;
pub mod scoring;
pub mod shape;
pub mod snapshot;

pub use polytris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::{collide, drop_distance};
pub use game_state::{GameState, LockEvent, Phase};
pub use generator::{generate_shape_prototypes, is_forbidden_tetromino, ShapeGenerator};
pub use palette::{hue_distance, Hsl, Palette};
pub use piece::{create_piece, Piece, PieceProto};
pub use scoring::{drop_interval_ms, level_for_lines, line_score};
pub use shape::{shapes_equal, Shape};
pub use snapshot::GameSnapshot;
