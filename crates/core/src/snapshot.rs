//! Owned, serializable view of a game for presentation layers.

use serde::Serialize;

use crate::game_state::GameState;
use crate::palette::Hsl;
use crate::piece::{Piece, PieceProto};
use crate::types::{Cell, PieceType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub cols: usize,
    pub rows: usize,
    /// Locked cells only
    pub board: Vec<Vec<Cell>>,
    /// Locked cells with the active piece drawn in
    pub display_board: Vec<Vec<Cell>>,
    pub active: Option<Piece>,
    pub ghost: Option<Piece>,
    pub next: Option<Piece>,
    pub prototypes: Vec<PieceProto>,
    /// Index `type_id - 1`
    pub palette: Vec<Hsl>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub game_over: bool,
    pub episode_id: u32,
    pub seed: u64,
}

impl GameSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let board = state.board();
        Self {
            cols: board.width(),
            rows: board.height(),
            board: board.to_rows(),
            display_board: state.display_board().to_rows(),
            active: state.active().cloned(),
            ghost: state.ghost(),
            next: state.next_piece().cloned(),
            prototypes: state.prototypes().to_vec(),
            palette: state.palette().colors().to_vec(),
            score: state.score(),
            level: state.level(),
            lines: state.lines(),
            drop_interval_ms: state.drop_interval_ms(),
            game_over: state.game_over(),
            episode_id: state.episode_id(),
            seed: state.seed(),
        }
    }

    /// Palette color for a type-id
    pub fn color(&self, kind: PieceType) -> Option<Hsl> {
        (kind as usize)
            .checked_sub(1)
            .and_then(|idx| self.palette.get(idx).copied())
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }
}
