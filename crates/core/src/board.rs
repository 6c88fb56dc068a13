//! Board module - manages the game grid
//!
//! The board is a `cols x rows` grid of [`Cell`] values, fixed for a session.
//! Uses a flat row-major vector so a row is a contiguous slice.
//! Coordinates: (x, y) where x ranges 0..cols (left to right), y ranges
//! 0..rows (top to bottom). Pieces may sit partly above the board (y < 0).

use crate::piece::Piece;
use crate::types::{Cell, EMPTY_CELL};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cols: usize,
    rows: usize,
    /// Flat array of cells, row-major order (y * cols + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty `cols x rows` board
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![EMPTY_CELL; cols * rows],
        }
    }

    /// Build a board from rows of cell values, top row first.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Self {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(cols * rows.len());
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), cols, "ragged board rows");
            cells.extend_from_slice(row);
        }
        Self {
            cols,
            rows: rows.len(),
            cells,
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.cols || y as usize >= self.rows {
            return None;
        }
        Some(y as usize * self.cols + x as usize)
    }

    /// Board width in cells
    pub fn width(&self) -> usize {
        self.cols
    }

    /// Board height in cells
    pub fn height(&self) -> usize {
        self.rows
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if cell != EMPTY_CELL)
    }

    /// One row as a slice. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.rows {
            return false;
        }
        self.row(y).iter().all(|&cell| cell != EMPTY_CELL)
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CELL).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy the grid out as nested rows
    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    /// Remove every full row and return the compacted board with the count.
    ///
    /// The surviving rows keep their relative order and sink to the bottom;
    /// one empty row is added at the top per cleared row. `self` is left
    /// untouched.
    pub fn clear_lines(&self) -> (Board, usize) {
        let kept: Vec<&[Cell]> = self
            .rows()
            .filter(|row| !row.iter().all(|&cell| cell != EMPTY_CELL))
            .collect();
        let cleared = self.rows - kept.len();

        let mut cells = Vec::with_capacity(self.cells.len());
        cells.resize(cleared * self.cols, EMPTY_CELL);
        for row in kept {
            cells.extend_from_slice(row);
        }

        let board = Board {
            cols: self.cols,
            rows: self.rows,
            cells,
        };
        (board, cleared)
    }

    /// Write a piece's filled cells into the board using its type-id.
    ///
    /// Cells above the board are skipped. Returns how many cells were written.
    pub fn lock_piece(&mut self, piece: &Piece) -> usize {
        let mut written = 0;
        for (x, y) in piece.cells() {
            if y < 0 {
                continue;
            }
            if self.set(x, y, piece.kind) {
                written += 1;
            }
        }
        written
    }

    /// Copy of the board with `piece` drawn on top; the board is unchanged.
    pub fn with_piece(&self, piece: &Piece) -> Board {
        let mut merged = self.clone();
        merged.lock_piece(piece);
        merged
    }
}
