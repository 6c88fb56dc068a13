//! Piece module - prototypes and falling pieces
//!
//! A [`PieceProto`] is one entry of the round's piece catalog. A [`Piece`] is a
//! live instance spawned from a prototype: it owns its own copy of the shape,
//! so rotating a piece never touches the catalog.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::generator::ShapeGenerator;
use crate::shape::Shape;
use crate::types::{GameConfig, PieceType};

/// Immutable catalog entry: a type-id and its shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceProto {
    pub kind: PieceType,
    pub shape: Shape,
}

impl PieceProto {
    pub fn new(kind: PieceType, shape: Shape) -> Self {
        Self { kind, shape }
    }
}

/// A falling (or queued) piece
///
/// `(x, y)` is the board position of the shape's local `(0, 0)` cell. `y` may be
/// negative while part of the frame is still above the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Piece {
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub kind: PieceType,
}

impl Piece {
    /// Create a piece at the spawn position for a board `cols` wide.
    ///
    /// Spawn column is `cols / 2 - size / 2` so shapes of different frame
    /// sizes stay centered; spawn row is always 0.
    pub fn spawn(proto: &PieceProto, cols: usize) -> Self {
        let x = (cols / 2) as i32 - (proto.shape.size() / 2) as i32;
        Self {
            shape: proto.shape.clone(),
            x,
            y: 0,
            kind: proto.kind,
        }
    }

    /// Copy of this piece translated by (dx, dy)
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self.clone()
        }
    }

    /// Copy of this piece with its shape rotated 90° clockwise
    pub fn rotated(&self) -> Self {
        Self {
            shape: self.shape.rotate(),
            ..self.clone()
        }
    }

    /// Absolute board coordinates of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(move |(dx, dy)| (self.x + dx as i32, self.y + dy as i32))
    }

    /// The prototype this piece was spawned from (shape in current orientation).
    pub fn proto(&self) -> PieceProto {
        PieceProto::new(self.kind, self.shape.clone())
    }
}

/// Spawn a piece from a uniformly chosen prototype.
///
/// An empty catalog falls back to one freshly generated shape with type-id 1;
/// a started session never hits that path.
pub fn create_piece<R: Rng + ?Sized>(
    rng: &mut R,
    prototypes: &[PieceProto],
    config: &GameConfig,
) -> Piece {
    match prototypes.choose(rng) {
        Some(proto) => Piece::spawn(proto, config.cols),
        None => {
            log::warn!("empty piece catalog, generating an ad hoc shape");
            let shape = ShapeGenerator::new(config).generate_legal_shape(rng);
            Piece::spawn(&PieceProto::new(1, shape), config.cols)
        }
    }
}
