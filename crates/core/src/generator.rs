//! Shape generator - random connected polyominoes, tetrominoes excluded
//!
//! Every round gets a fresh catalog of piece prototypes. Each prototype is
//! grown cell by cell inside an N x N frame so the result is always
//! 4-connected, then rejected if any rotation of it is one of the seven
//! classic tetrominoes.
//!
//! Generation is a bounded retry loop: after `max_generation_attempts` rejected
//! candidates the generator returns a fixed fallback shape instead of spinning
//! forever on a configuration with few (or no) legal shapes.

use std::sync::OnceLock;

use arrayvec::ArrayVec;
use log::{debug, trace, warn};
use rand::Rng;

use crate::piece::PieceProto;
use crate::shape::Shape;
use crate::types::{GameConfig, PieceType};

/// The seven classic tetrominoes, spawn orientation, 4x4 frames
const CLASSIC_TETROMINOES: [[[u8; 4]; 4]; 7] = [
    // I
    [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
    // Z
    [[0, 0, 0, 0], [1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    // S
    [[0, 0, 0, 0], [0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0]],
    // O
    [[0, 0, 0, 0], [0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0]],
    // T
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 1, 0, 0], [0, 0, 0, 0]],
    // L
    [[0, 0, 0, 0], [1, 1, 1, 0], [1, 0, 0, 0], [0, 0, 0, 0]],
    // J
    [[0, 0, 0, 0], [1, 1, 1, 0], [0, 0, 1, 0], [0, 0, 0, 0]],
];

/// Known-legal shapes used when the retry budget runs out, smallest first.
const FALLBACK_SHAPES: [[[u8; 3]; 3]; 9] = [
    // bent tromino
    [[1, 1, 0], [1, 0, 0], [0, 0, 0]],
    // straight tromino
    [[1, 1, 1], [0, 0, 0], [0, 0, 0]],
    // plus
    [[0, 1, 0], [1, 1, 1], [0, 1, 0]],
    // P
    [[1, 1, 0], [1, 1, 0], [1, 0, 0]],
    // U
    [[1, 0, 1], [1, 1, 1], [0, 0, 0]],
    // 2x3 block
    [[1, 1, 1], [1, 1, 1], [0, 0, 0]],
    [[1, 1, 1], [1, 1, 1], [1, 0, 0]],
    [[1, 1, 1], [1, 1, 1], [1, 1, 0]],
    [[1, 1, 1], [1, 1, 1], [1, 1, 1]],
];

const PLUS_FALLBACK: usize = 2;

const NEIGHBORS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Normalized classic tetrominoes, built once.
pub fn classic_tetrominoes() -> &'static [Shape] {
    static NORMALIZED: OnceLock<Vec<Shape>> = OnceLock::new();
    NORMALIZED.get_or_init(|| {
        CLASSIC_TETROMINOES
            .iter()
            .map(|rows| Shape::from_rows(rows).normalize())
            .collect()
    })
}

/// Whether any rotation of `shape` (normalized) is a classic tetromino.
pub fn is_forbidden_tetromino(shape: &Shape) -> bool {
    let forbidden = classic_tetrominoes();
    shape
        .rotations()
        .iter()
        .map(Shape::normalize)
        .any(|norm| forbidden.contains(&norm))
}

/// Grow one connected shape inside a `size x size` frame.
///
/// The cell target is drawn from `block_range` (already clamped to the frame).
/// The result may hold fewer cells than the target only if the frame filled
/// up first.
pub fn grow_connected_shape<R: Rng + ?Sized>(
    rng: &mut R,
    size: usize,
    block_range: (usize, usize),
) -> Shape {
    let (min_blocks, max_blocks) = block_range;
    let target = rng.gen_range(min_blocks..=max_blocks);

    let mut shape = Shape::square(size);
    let start = (rng.gen_range(0..size), rng.gen_range(0..size));
    shape.set(start.0, start.1, true);
    let mut filled = 1;

    let mut frontier = vec![start];
    while filled < target && !frontier.is_empty() {
        let idx = rng.gen_range(0..frontier.len());
        let (x, y) = frontier[idx];

        let open: ArrayVec<(usize, usize), 4> = NEIGHBORS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x.checked_add_signed(dx)?;
                let ny = y.checked_add_signed(dy)?;
                (nx < size && ny < size && !shape.is_filled(nx, ny)).then_some((nx, ny))
            })
            .collect();

        if open.is_empty() {
            frontier.swap_remove(idx);
            continue;
        }

        let (nx, ny) = open[rng.gen_range(0..open.len())];
        shape.set(nx, ny, true);
        filled += 1;
        frontier.push((nx, ny));
    }

    shape
}

/// Produces legal shapes for one configuration.
#[derive(Debug, Clone)]
pub struct ShapeGenerator {
    config: GameConfig,
    min_size: usize,
    max_size: usize,
}

impl ShapeGenerator {
    pub fn new(config: &GameConfig) -> Self {
        let min_size = config.min_shape_size.max(1);
        let max_size = config.max_shape_size.max(min_size);
        Self {
            config: config.clone(),
            min_size,
            max_size,
        }
    }

    /// Generate a connected, in-bounds shape that is not a tetromino.
    ///
    /// Falls back to [`ShapeGenerator::fallback_shape`] once the configured
    /// attempt budget is spent.
    pub fn generate_legal_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> Shape {
        let attempts = self.config.max_generation_attempts.max(1);
        for attempt in 1..=attempts {
            let size = rng.gen_range(self.min_size..=self.max_size);
            let range = self.config.block_range(size);
            let candidate = grow_connected_shape(rng, size, range);

            if candidate.filled_count() < range.0 {
                trace!("attempt {}: under-filled {}x{} candidate", attempt, size, size);
                continue;
            }
            if is_forbidden_tetromino(&candidate) {
                trace!("attempt {}: rejected tetromino\n{}", attempt, candidate);
                continue;
            }

            if attempt > 1 {
                debug!("legal shape found after {} attempts", attempt);
            }
            return candidate;
        }

        warn!(
            "no legal shape after {} attempts (sizes {}..={}, blocks {}..={}); using fallback",
            attempts,
            self.min_size,
            self.max_size,
            self.config.min_blocks,
            self.config.max_blocks
        );
        self.fallback_shape()
    }

    /// A fixed legal shape for when random generation gives up.
    ///
    /// Picks the first fallback whose cell count fits the configured block
    /// range and whose bounding box fits the largest frame; the plus pentomino
    /// otherwise. The shape sits in the top-left of a square frame at least
    /// `min_shape_size` wide.
    pub fn fallback_shape(&self) -> Shape {
        let pick = FALLBACK_SHAPES
            .iter()
            .map(|rows| Shape::from_rows(rows).normalize())
            .find(|shape| {
                let count = shape.filled_count();
                count >= self.config.min_blocks
                    && count <= self.config.max_blocks
                    && shape.size() <= self.max_size
            })
            .unwrap_or_else(|| Shape::from_rows(&FALLBACK_SHAPES[PLUS_FALLBACK]));

        let side = pick.size().max(self.min_size);
        let mut framed = Shape::square(side);
        for (x, y) in pick.filled_cells() {
            framed.set(x, y, true);
        }
        framed
    }

    /// Generate `count` prototypes with type-ids `1..=count`.
    pub fn generate_prototypes<R: Rng + ?Sized>(&self, rng: &mut R, count: PieceType) -> Vec<PieceProto> {
        (1..=count)
            .map(|kind| PieceProto::new(kind, self.generate_legal_shape(rng)))
            .collect()
    }
}

/// Generate this round's catalog using `config`.
pub fn generate_shape_prototypes<R: Rng + ?Sized>(
    rng: &mut R,
    config: &GameConfig,
) -> Vec<PieceProto> {
    let protos = ShapeGenerator::new(config).generate_prototypes(rng, config.shape_type_count);
    debug!("generated {} piece prototypes", protos.len());
    protos
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classic_tetrominoes_are_normalized() {
        let shapes = classic_tetrominoes();
        assert_eq!(shapes.len(), 7);
        for shape in shapes {
            assert_eq!(shape.filled_count(), 4);
            assert_eq!(shape, &shape.normalize());
        }
        // I is a 4x1 bar, O a 2x2 block.
        assert_eq!((shapes[0].width(), shapes[0].height()), (4, 1));
        assert_eq!((shapes[3].width(), shapes[3].height()), (2, 2));
    }

    #[test]
    fn test_forbidden_under_rotation() {
        // Vertical I in a different frame position.
        let vertical_i = Shape::from_rows(&[[0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0], [0, 0, 1, 0]]);
        assert!(is_forbidden_tetromino(&vertical_i));

        // T pointing up, 3x3 frame.
        let t_up = Shape::from_rows(&[[0, 1, 0], [1, 1, 1], [0, 0, 0]]);
        assert!(is_forbidden_tetromino(&t_up));

        // S rotated.
        let s_vertical = Shape::from_rows(&[[1, 0, 0], [1, 1, 0], [0, 1, 0]]);
        assert!(is_forbidden_tetromino(&s_vertical));
    }

    #[test]
    fn test_non_tetrominoes_allowed() {
        let plus = Shape::from_rows(&[[0, 1, 0], [1, 1, 1], [0, 1, 0]]);
        assert!(!is_forbidden_tetromino(&plus));

        let tromino = Shape::from_rows(&[[1, 1, 0], [1, 0, 0], [0, 0, 0]]);
        assert!(!is_forbidden_tetromino(&tromino));
    }

    #[test]
    fn test_grow_connected_shape_hits_target() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let shape = grow_connected_shape(&mut rng, 4, (5, 5));
            assert_eq!(shape.filled_count(), 5);
            assert!(shape.is_connected(), "disconnected:\n{}", shape);
        }
    }

    #[test]
    fn test_grow_connected_shape_can_fill_frame() {
        let mut rng = StdRng::seed_from_u64(3);
        let shape = grow_connected_shape(&mut rng, 3, (9, 9));
        assert_eq!(shape.filled_count(), 9);
    }

    #[test]
    fn test_generated_shapes_respect_bounds() {
        let config = GameConfig::default();
        let generator = ShapeGenerator::new(&config);
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..300 {
            let shape = generator.generate_legal_shape(&mut rng);
            let size = shape.width();
            assert_eq!(shape.width(), shape.height());
            assert!((config.min_shape_size..=config.max_shape_size).contains(&size));
            let (lo, hi) = config.block_range(size);
            assert!((lo..=hi).contains(&shape.filled_count()));
            assert!(shape.is_connected());
            assert!(!is_forbidden_tetromino(&shape));
        }
    }

    #[test]
    fn test_prototype_type_ids() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(9);
        let protos = generate_shape_prototypes(&mut rng, &config);
        let kinds: Vec<_> = protos.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, (1..=config.shape_type_count).collect::<Vec<_>>());
    }

    #[test]
    fn test_fallback_after_budget() {
        // 4-block shapes in a 2x2 frame are always the O piece.
        let config = GameConfig {
            min_shape_size: 2,
            max_shape_size: 2,
            min_blocks: 4,
            max_blocks: 4,
            max_generation_attempts: 5,
            ..GameConfig::default()
        };
        let generator = ShapeGenerator::new(&config);
        let mut rng = StdRng::seed_from_u64(1);
        let shape = generator.generate_legal_shape(&mut rng);

        assert_eq!(shape, generator.fallback_shape());
        assert!(shape.is_connected());
        assert!(!is_forbidden_tetromino(&shape));
    }

    #[test]
    fn test_fallback_prefers_block_range() {
        let config = GameConfig {
            min_blocks: 5,
            max_blocks: 5,
            ..GameConfig::default()
        };
        let fallback = ShapeGenerator::new(&config).fallback_shape();
        assert_eq!(fallback.filled_count(), 5);
        assert_eq!(fallback.width(), 3);

        let small = GameConfig::default();
        let fallback = ShapeGenerator::new(&small).fallback_shape();
        assert_eq!(fallback.filled_count(), 3);
        assert_eq!(fallback.width(), 3);
    }
}
