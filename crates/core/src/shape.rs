//! Shape module - binary cell matrices and their geometry
//!
//! A shape is a `width x height` matrix of filled/empty cells in the piece's
//! local frame. Generated shapes are square (N x N) so that clockwise rotation
//! keeps the frame size; normalized shapes are cropped to their bounding box
//! and may be rectangular.
//!
//! Coordinates: (x, y) where x grows to the right and y grows downward,
//! matching the board.

use std::fmt;

use serde::Serialize;

/// A binary cell matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Shape {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Shape {
    /// Create an empty `width x height` shape
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Create an empty `n x n` shape
    pub fn square(n: usize) -> Self {
        Self::empty(n, n)
    }

    /// Build a shape from rows of 0/1 values.
    ///
    /// # Panics
    ///
    /// Panics if the rows have different lengths.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut cells = Vec::with_capacity(width * height);
        for row in rows {
            let row = row.as_ref();
            assert_eq!(row.len(), width, "ragged shape rows");
            cells.extend(row.iter().map(|&v| v != 0));
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Side length of the shape frame (the larger dimension).
    pub fn size(&self) -> usize {
        self.width.max(self.height)
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Whether the local cell (x, y) is filled. Out of range reads as empty.
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.index(x, y).map_or(false, |idx| self.cells[idx])
    }

    /// Fill or clear the local cell (x, y).
    /// Returns false if out of range
    pub fn set(&mut self, x: usize, y: usize, filled: bool) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = filled;
                true
            }
            None => false,
        }
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Iterate filled cells as local (x, y) offsets, row by row.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &filled)| filled)
            .map(move |(idx, _)| (idx % width, idx / width))
    }

    /// Rows as 0/1 values, for display and serialization.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width.max(1))
            .take(self.height)
            .map(|row| row.iter().map(|&c| c as u8).collect())
            .collect()
    }

    /// 90° clockwise rotation: `result[y][x] = input[h - 1 - x][y]`.
    ///
    /// A `w x h` shape becomes `h x w`; square shapes keep their frame.
    pub fn rotate(&self) -> Shape {
        let mut out = Shape::empty(self.height, self.width);
        for y in 0..out.height {
            for x in 0..out.width {
                let filled = self.is_filled(y, self.height - 1 - x);
                out.set(x, y, filled);
            }
        }
        out
    }

    /// Crop to the minimal bounding rectangle of the filled cells.
    ///
    /// An empty shape normalizes to a single empty cell.
    pub fn normalize(&self) -> Shape {
        let mut min_x = usize::MAX;
        let mut min_y = usize::MAX;
        let mut max_x = 0;
        let mut max_y = 0;
        for (x, y) in self.filled_cells() {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        if min_x == usize::MAX {
            return Shape::empty(1, 1);
        }

        let mut out = Shape::empty(max_x - min_x + 1, max_y - min_y + 1);
        for (x, y) in self.filled_cells() {
            out.set(x - min_x, y - min_y, true);
        }
        out
    }

    /// The four clockwise orientations, starting with `self`.
    pub fn rotations(&self) -> [Shape; 4] {
        let r1 = self.rotate();
        let r2 = r1.rotate();
        let r3 = r2.rotate();
        [self.clone(), r1, r2, r3]
    }

    /// Whether some rotation of `self` matches `other` after both are
    /// normalized.
    pub fn is_rotation_of(&self, other: &Shape) -> bool {
        let target = other.normalize();
        self.rotations()
            .iter()
            .any(|rotated| rotated.normalize() == target)
    }

    /// Whether the filled cells form one 4-connected component.
    ///
    /// An empty shape is not connected.
    pub fn is_connected(&self) -> bool {
        let Some(start) = self.filled_cells().next() else {
            return false;
        };

        let mut seen = vec![false; self.cells.len()];
        let mut stack = vec![start];
        let mut reached = 0;
        while let Some((x, y)) = stack.pop() {
            let Some(idx) = self.index(x, y) else {
                continue;
            };
            if seen[idx] || !self.cells[idx] {
                continue;
            }
            seen[idx] = true;
            reached += 1;
            if x > 0 {
                stack.push((x - 1, y));
            }
            if y > 0 {
                stack.push((x, y - 1));
            }
            stack.push((x + 1, y));
            stack.push((x, y + 1));
        }
        reached == self.filled_count()
    }
}

/// Cell-for-cell equality, false on any dimension mismatch.
pub fn shapes_equal(a: &Shape, b: &Shape) -> bool {
    a == b
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.is_filled(x, y) { "#" } else { "." })?;
            }
            if y + 1 < self.height {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_tromino() -> Shape {
        Shape::from_rows(&[[1, 0, 0], [1, 1, 0], [0, 0, 0]])
    }

    #[test]
    fn test_rotate_square_clockwise() {
        let shape = Shape::from_rows(&[[1, 1, 1], [0, 0, 1], [0, 0, 0]]);
        let rotated = shape.rotate();
        assert_eq!(
            rotated,
            Shape::from_rows(&[[0, 0, 1], [0, 0, 1], [0, 1, 1]])
        );
    }

    #[test]
    fn test_rotate_rectangle_swaps_dimensions() {
        let bar = Shape::from_rows(&[[1, 1, 1]]);
        let rotated = bar.rotate();
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 3);
        assert_eq!(rotated.filled_count(), 3);
    }

    #[test]
    fn test_rotate_does_not_mutate_input() {
        let shape = l_tromino();
        let before = shape.clone();
        let _ = shape.rotate();
        assert_eq!(shape, before);
    }

    #[test]
    fn test_normalize_crops_to_bounding_box() {
        let shape = Shape::from_rows(&[[0, 0, 0, 0], [0, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]]);
        let norm = shape.normalize();
        assert_eq!(norm, Shape::from_rows(&[[1, 1], [0, 1]]));
    }

    #[test]
    fn test_normalize_empty_is_single_zero() {
        let norm = Shape::square(4).normalize();
        assert_eq!(norm.width(), 1);
        assert_eq!(norm.height(), 1);
        assert!(norm.is_empty());
    }

    #[test]
    fn test_shapes_equal_requires_same_dimensions() {
        let a = Shape::from_rows(&[[1, 1]]);
        let b = Shape::from_rows(&[[1, 1, 0]]);
        assert!(!shapes_equal(&a, &b));
        assert!(shapes_equal(&a, &a.clone()));
    }

    #[test]
    fn test_is_connected() {
        assert!(l_tromino().is_connected());
        let diagonal = Shape::from_rows(&[[1, 0], [0, 1]]);
        assert!(!diagonal.is_connected());
        assert!(!Shape::square(3).is_connected());
    }

    #[test]
    fn test_is_rotation_of_ignores_frame_offset() {
        let a = Shape::from_rows(&[[0, 0, 0], [0, 1, 0], [0, 1, 1]]);
        let b = Shape::from_rows(&[[1, 1, 0], [1, 0, 0], [0, 0, 0]]);
        assert!(a.is_rotation_of(&b));
        assert!(!a.is_rotation_of(&Shape::from_rows(&[[1, 1, 1]])));
    }

    #[test]
    fn test_display() {
        assert_eq!(l_tromino().to_string(), "#..\n##.\n...");
    }

    #[test]
    fn test_to_rows() {
        assert_eq!(
            l_tromino().to_rows(),
            vec![vec![1, 0, 0], vec![1, 1, 0], vec![0, 0, 0]]
        );
    }
}
