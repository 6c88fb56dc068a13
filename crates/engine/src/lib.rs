//! Session drivers - where time meets the game state
//!
//! The core crate has no clock. This crate owns the single [`GameState`]
//! of a running game and decides when gravity ticks reach it:
//!
//! - [`Session`]: synchronous driver for a frame loop; the caller supplies
//!   `Instant`s and polls for due ticks
//! - [`spawn_session`]: tokio actor serialising commands and ticks on one task
//!
//! Both acquire a gravity timer when a round starts, replace it when the level
//! changes speed or the round is reset, and release it on game over.
//!
//! The terminal binary runs on [`Session`], since crossterm's blocking
//! `poll` already paces its loop. [`spawn_session`] is for hosts that are
//! already async, such as a network front end or a bot, which can drive a
//! game through [`SessionHandle`] and watch snapshots without a frame loop.
//!
//! [`GameState`]: polytris_core::GameState

pub mod runtime;
pub mod session;
pub mod timer;

pub use runtime::{spawn_session, spawn_state, SessionHandle};
pub use session::Session;
pub use timer::GravityTimer;
