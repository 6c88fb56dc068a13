//! Polytris (workspace facade crate).
//!
//! Falling-block puzzle where every round plays with a freshly generated
//! catalog of polyomino pieces. The implementation lives in dedicated crates
//! under `crates/`; this package re-exports them as
//! `polytris::{core,engine,input,term,types}` and ships the terminal runner.

pub use polytris_core as core;
pub use polytris_engine as engine;
pub use polytris_input as input;
pub use polytris_term as term;
pub use polytris_types as types;
