//! Collision detection
//!
//! One pure check used for real moves and for lookahead (rotation, ghost
//! projection, spawn feasibility).

use crate::board::Board;
use crate::piece::Piece;
use crate::shape::Shape;

/// Whether `piece` offset by (dx, dy), optionally with `shape` in place of its
/// own, would hit a wall, the floor, or a filled cell.
///
/// Cells above the board (row < 0) never collide, which lets a piece spawn
/// partly in the hidden area.
pub fn collide(board: &Board, piece: &Piece, dx: i32, dy: i32, shape: Option<&Shape>) -> bool {
    let shape = shape.unwrap_or(&piece.shape);
    let ox = piece.x + dx;
    let oy = piece.y + dy;

    shape.filled_cells().any(|(lx, ly)| {
        let x = ox + lx as i32;
        let y = oy + ly as i32;
        if x < 0 || x as usize >= board.width() || y >= board.height() as i32 {
            return true;
        }
        y >= 0 && board.is_occupied(x, y)
    })
}

/// How many rows the piece can fall before it would collide.
pub fn drop_distance(board: &Board, piece: &Piece) -> i32 {
    let limit = board.height() as i32 - piece.y;
    let mut distance = 0;
    while distance < limit && !collide(board, piece, 0, distance + 1, None) {
        distance += 1;
    }
    distance
}
