//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It avoids
//! widget/layout libraries and renders into a plain framebuffer that is then
//! diffed and flushed to the terminal.
//!
//! - [`GameView`] turns a `GameSnapshot` into framebuffer cells (pure)
//! - [`TerminalRenderer`] owns the terminal and writes changed cells only
//!
//! Board cells are 2 columns wide by default to compensate for the usual
//! terminal glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use polytris_core as core;
pub use polytris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{BoardFrame, GameView, Overlay, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
