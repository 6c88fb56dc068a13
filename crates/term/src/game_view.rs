//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Piece, PieceProto, Shape};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell, EMPTY_CELL};

const BLOCK: char = '█';
const GHOST: char = '░';
const EMPTY: char = '·';

const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
/// Used for type-ids the palette does not cover
const FALLBACK_FG: Rgb = Rgb::new(200, 200, 200);

const CONTROLS: [&str; 6] = [
    "←→ move",
    "↓ soft drop",
    "↑ rotate",
    "space drop",
    "r reset",
    "q quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Presentation-only state the snapshot does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    /// Show "LEVEL n" over the board
    pub level_banner: Option<u32>,
    /// Draw this round's piece catalog in the side panel
    pub show_catalog: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            level_banner: None,
            show_catalog: true,
        }
    }
}

/// Board and side panel renderer
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

/// Where the board frame landed in the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardFrame {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Frame position for a board of `cols x rows` centered in `viewport`.
    pub fn board_frame(&self, cols: usize, rows: usize, viewport: Viewport) -> BoardFrame {
        let w = (cols as u16).saturating_mul(self.cell_w).saturating_add(2);
        let h = (rows as u16).saturating_mul(self.cell_h).saturating_add(2);
        BoardFrame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        overlay: &Overlay,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(FALLBACK_FG, PANEL_BG).cell(' '));

        let frame = self.board_frame(snap.cols, snap.rows, viewport);
        let border = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);
        self.draw_border(fb, frame, border);

        // Locked cells and empty grid.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                if cell == EMPTY_CELL {
                    let dot = CellStyle::new(Rgb::new(90, 90, 100), PLAY_BG).dim();
                    self.fill_board_cell(fb, frame, x as i32, y as i32, EMPTY, dot);
                } else {
                    let style = CellStyle::new(piece_color(snap, cell), PLAY_BG);
                    self.fill_board_cell(fb, frame, x as i32, y as i32, BLOCK, style);
                }
            }
        }

        // Ghost piece, only over empty cells.
        if let Some(ghost) = &snap.ghost {
            let style = CellStyle::new(piece_color(snap, ghost.kind).darken(60), PLAY_BG).dim();
            for (x, y) in ghost.cells() {
                if board_cell(snap, x, y) == Some(EMPTY_CELL) {
                    self.fill_board_cell(fb, frame, x, y, GHOST, style);
                }
            }
        }

        // Active piece.
        if let Some(active) = &snap.active {
            let style = CellStyle::new(piece_color(snap, active.kind), PLAY_BG).bold();
            for (x, y) in active.cells() {
                self.fill_board_cell(fb, frame, x, y, BLOCK, style);
            }
        }

        self.draw_side_panel(fb, snap, overlay, viewport, frame);

        if snap.game_over {
            self.draw_overlay_text(fb, frame, 0, "GAME OVER");
            self.draw_overlay_text(fb, frame, 1, "r: new round");
        } else if let Some(level) = overlay.level_banner {
            let text = format!("LEVEL {}", level);
            self.draw_overlay_text(fb, frame, 0, &text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, overlay, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, frame: BoardFrame, style: CellStyle) {
        let BoardFrame { x, y, w, h } = frame;
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Paint one board cell; cells above the board are skipped.
    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: BoardFrame,
        cell_x: i32,
        cell_y: i32,
        ch: char,
        style: CellStyle,
    ) {
        if cell_x < 0 || cell_y < 0 {
            return;
        }
        let px = (cell_x as u16)
            .saturating_mul(self.cell_w)
            .saturating_add(frame.x + 1);
        let py = (cell_y as u16)
            .saturating_mul(self.cell_h)
            .saturating_add(frame.y + 1);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        overlay: &Overlay,
        viewport: Viewport,
        frame: BoardFrame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }
        let panel_w = viewport.width - panel_x;

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        for (name, number) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "SPEED", label);
        fb.put_u32(panel_x, y.saturating_add(1), snap.drop_interval_ms, value);
        let unit_x = panel_x.saturating_add(digit_count(snap.drop_interval_ms));
        fb.put_str(unit_x, y.saturating_add(1), "ms", value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = &snap.next {
            y = y.saturating_add(self.draw_next(fb, snap, next, panel_x, y));
        } else {
            fb.put_str(panel_x, y, "-", value);
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        if overlay.show_catalog && !snap.prototypes.is_empty() {
            fb.put_str(panel_x, y, "PIECES", label);
            y = y.saturating_add(1);
            y = y.saturating_add(draw_catalog(fb, snap, &snap.prototypes, panel_x, y, panel_w));
            y = y.saturating_add(1);
        }

        fb.put_str(panel_x, y, "CONTROLS", label);
        for line in CONTROLS {
            y = y.saturating_add(1);
            fb.put_str(panel_x, y, line, value);
        }
    }

    /// Draw the queued piece at board cell scale. Returns rows used.
    fn draw_next(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, next: &Piece, x: u16, y: u16) -> u16 {
        let shape = next.shape.normalize();
        let style = CellStyle::new(piece_color(snap, next.kind), PANEL_BG);
        for (cx, cy) in shape.filled_cells() {
            let px = x.saturating_add(cx as u16 * self.cell_w);
            let py = y.saturating_add(cy as u16 * self.cell_h);
            fb.fill_rect(px, py, self.cell_w, self.cell_h, BLOCK, style);
        }
        shape.height() as u16 * self.cell_h
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: BoardFrame, line: u16, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

/// Small one-column-per-cell thumbnails of every prototype, wrapped to fit.
/// Returns rows used.
fn draw_catalog(
    fb: &mut FrameBuffer,
    snap: &GameSnapshot,
    protos: &[PieceProto],
    x: u16,
    y: u16,
    width: u16,
) -> u16 {
    const SLOT_W: u16 = 5;
    const SLOT_H: u16 = 5;
    let per_row = (width / SLOT_W).max(1);

    for (i, proto) in protos.iter().enumerate() {
        let col = i as u16 % per_row;
        let row = i as u16 / per_row;
        let sx = x.saturating_add(col * SLOT_W);
        let sy = y.saturating_add(row * SLOT_H);
        let style = CellStyle::new(piece_color(snap, proto.kind), PANEL_BG);
        draw_thumbnail(fb, &proto.shape, sx, sy, style);
    }

    let rows = (protos.len() as u16).div_ceil(per_row);
    rows.saturating_mul(SLOT_H)
}

fn draw_thumbnail(fb: &mut FrameBuffer, shape: &Shape, x: u16, y: u16, style: CellStyle) {
    for (cx, cy) in shape.normalize().filled_cells() {
        fb.put_char(x.saturating_add(cx as u16), y.saturating_add(cy as u16), BLOCK, style);
    }
}

fn piece_color(snap: &GameSnapshot, kind: Cell) -> Rgb {
    snap.color(kind).map_or(FALLBACK_FG, Rgb::from)
}

fn board_cell(snap: &GameSnapshot, x: i32, y: i32) -> Option<Cell> {
    if x < 0 || y < 0 {
        return None;
    }
    snap.board.get(y as usize)?.get(x as usize).copied()
}

fn digit_count(mut n: u32) -> u16 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}
