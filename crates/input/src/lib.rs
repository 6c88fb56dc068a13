//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] commands. Key
//! repeat comes from the terminal itself; every press is one command.

pub mod map;

pub use polytris_types as types;

pub use map::{handle_key_event, is_press, should_quit};
