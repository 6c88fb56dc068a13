//! Game state module - manages the complete game state
//!
//! This module ties together all core components: the board, the round's piece
//! catalog and palette, the active and next pieces, scoring and leveling.
//!
//! Every transition is a synchronous `&mut self` method. Illegal moves return
//! `false` and leave the state untouched. Once the game is over, only
//! [`GameState::reset`] changes anything.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::collision::{collide, drop_distance};
use crate::generator::generate_shape_prototypes;
use crate::palette::Palette;
use crate::piece::{create_piece, Piece, PieceProto};
use crate::scoring::{drop_interval_ms, level_for_lines, line_score};
use crate::snapshot::GameSnapshot;
use crate::types::{ConfigError, GameAction, GameConfig};

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Playing,
    GameOver,
}

/// Outcome of the most recent lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockEvent {
    pub lines_cleared: u32,
    pub score_gained: u32,
    pub level_before: u32,
    pub level_after: u32,
}

impl LockEvent {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    seed: u64,
    rng: StdRng,
    board: Board,
    prototypes: Vec<PieceProto>,
    palette: Palette,
    active: Option<Piece>,
    next: Option<Piece>,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Pieces spawned this round, including the first one.
    piece_id: u32,
    /// Last lock event (consumed by presentation).
    last_event: Option<LockEvent>,
    score: u32,
    /// Cleared lines this round; the level is derived from it.
    lines: u32,
    game_over: bool,
}

impl GameState {
    /// Start a round with `config`, drawing all randomness from `seed`.
    ///
    /// The configuration is trusted; use [`GameState::try_new`] to validate it
    /// first.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::new(config.cols, config.rows);
        let prototypes = generate_shape_prototypes(&mut rng, &config);
        let palette = Palette::generate(&mut rng, config.shape_type_count);

        let mut state = Self {
            config,
            seed,
            rng,
            board,
            prototypes,
            palette,
            active: None,
            next: None,
            episode_id: 0,
            piece_id: 0,
            last_event: None,
            score: 0,
            lines: 0,
            game_over: false,
        };
        state.spawn_initial();
        state
    }

    /// Validate `config`, then start a round.
    pub fn try_new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// Throw the round away and start a new one.
    ///
    /// New board, new catalog, new palette, zeroed counters. The RNG stream
    /// continues, so every round differs while staying reproducible per seed.
    pub fn reset(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.board = Board::new(self.config.cols, self.config.rows);
        self.prototypes = generate_shape_prototypes(&mut self.rng, &self.config);
        self.palette = Palette::generate(&mut self.rng, self.config.shape_type_count);
        self.active = None;
        self.next = None;
        self.piece_id = 0;
        self.last_event = None;
        self.score = 0;
        self.lines = 0;
        self.game_over = false;
        self.spawn_initial();
    }

    fn spawn_initial(&mut self) {
        self.next = Some(self.new_piece());
        self.promote_next();
        if !self.game_over {
            info!(
                "round {} started: {} piece types on a {}x{} board",
                self.episode_id,
                self.prototypes.len(),
                self.config.cols,
                self.config.rows
            );
        }
    }

    fn new_piece(&mut self) -> Piece {
        create_piece(&mut self.rng, &self.prototypes, &self.config)
    }

    /// Move the queued piece into play and queue a fresh one.
    ///
    /// Game over is detected here, when the promoted piece already collides.
    fn promote_next(&mut self) {
        let fresh = self.new_piece();
        let Some(promoted) = self.next.replace(fresh) else {
            return;
        };
        self.piece_id = self.piece_id.wrapping_add(1);

        if collide(&self.board, &promoted, 0, 0, None) {
            self.active = None;
            self.next = None;
            self.game_over = true;
            info!(
                "game over: round {} score {} lines {} level {}",
                self.episode_id,
                self.score,
                self.lines,
                self.level()
            );
            return;
        }
        self.active = Some(promoted);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::Playing
        }
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current level, recomputed from the cleared-line total.
    pub fn level(&self) -> u32 {
        level_for_lines(self.lines, self.config.lines_per_level)
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    /// This round's piece catalog
    pub fn prototypes(&self) -> &[PieceProto] {
        &self.prototypes
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Gravity interval for the current level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(&self.config.speed_table, self.level())
    }

    /// Board with the active piece drawn in; the stored board is unchanged.
    pub fn display_board(&self) -> Board {
        match &self.active {
            Some(piece) => self.board.with_piece(piece),
            None => self.board.clone(),
        }
    }

    /// Where the active piece would land if hard-dropped now
    pub fn ghost(&self) -> Option<Piece> {
        let active = self.active.as_ref()?;
        Some(active.moved(0, drop_distance(&self.board, active)))
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::from_state(self)
    }

    /// Try to move the active piece
    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if collide(&self.board, active, dx, dy, None) {
            return false;
        }
        active.x += dx;
        active.y += dy;
        true
    }

    /// Shift the active piece one column (`dir` is -1 or +1); zero is no move.
    pub fn move_horizontal(&mut self, dir: i32) -> bool {
        if dir == 0 {
            return false;
        }
        self.try_move(dir.signum(), 0)
    }

    /// Soft drop: one row down, never locks
    pub fn move_down(&mut self) -> bool {
        self.try_move(0, 1)
    }

    /// Rotate 90° clockwise in place; rejected if the result collides.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let rotated = active.shape.rotate();
        if collide(&self.board, active, 0, 0, Some(&rotated)) {
            return false;
        }
        active.shape = rotated;
        true
    }

    /// Drop to the resting row and lock in one step.
    pub fn hard_drop(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.y += drop_distance(&self.board, active);
        self.lock_active();
        true
    }

    /// Gravity step: fall one row, or lock when blocked.
    pub fn tick(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        if self.try_move(0, 1) {
            return true;
        }
        self.lock_active();
        true
    }

    /// Lock the active piece onto the board and handle line clears
    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.board.lock_piece(&piece);
        let (board, cleared) = self.board.clear_lines();
        self.board = board;

        let level_before = self.level();
        let gained = line_score(cleared, level_before);
        self.score = self.score.saturating_add(gained);
        self.lines = self.lines.saturating_add(cleared as u32);
        let level_after = self.level();

        debug!(
            "locked piece {} (type {}) at ({}, {}): {} lines, +{}",
            self.piece_id, piece.kind, piece.x, piece.y, cleared, gained
        );
        if level_after > level_before {
            info!("level up: {} -> {}", level_before, level_after);
        }

        self.last_event = Some(LockEvent {
            lines_cleared: cleared as u32,
            score_gained: gained,
            level_before,
            level_after,
        });

        self.promote_next();
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::SoftDrop => self.move_down(),
            GameAction::Rotate => self.rotate(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Reset => {
                self.reset();
                true
            }
        }
    }
}
