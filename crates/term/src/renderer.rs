//! Terminal output for framebuffers.
//!
//! Each frame is compared with the one drawn before it and only the changed
//! runs of cells are emitted. Escape sequences are collected in a byte buffer
//! so a frame reaches the terminal in one write.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::{cursor, terminal, QueueableCommand};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Initial capacity of the per-frame escape buffer
const FRAME_BUF_BYTES: usize = 64 * 1024;

/// Owns the terminal session and the last frame shown on it.
pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    shown: Option<FrameBuffer>,
    pending: Vec<u8>,
    active: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            pending: Vec::with_capacity(FRAME_BUF_BYTES),
            active: false,
        }
    }

    /// Switch to raw mode on the alternate screen with the cursor hidden.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.pending.clear();
        self.pending
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.write_pending()
    }

    /// Restore the terminal. Does nothing unless [`TerminalRenderer::enter`]
    /// succeeded and no earlier `exit` ran.
    pub fn exit(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.active, false) {
            return Ok(());
        }
        self.pending.clear();
        self.pending
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.write_pending()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Forget the shown frame so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Show `fb`, then hand the previously shown frame back through it.
    ///
    /// The caller renders into the returned buffer next time, so the two
    /// frames trade places without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.pending.clear();
        let reusable = match self.shown.take() {
            Some(shown) if same_size(&shown, fb) => {
                encode_diff_into(&shown, fb, &mut self.pending)?;
                shown
            }
            stale => {
                encode_full_into(fb, &mut self.pending)?;
                let mut spare = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                spare.resize(fb.width(), fb.height());
                spare
            }
        };
        self.write_pending()?;

        self.shown = Some(std::mem::replace(fb, reusable));
        Ok(())
    }

    /// The underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn write_pending(&mut self) -> Result<()> {
        self.out.write_all(&self.pending)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        // Raw mode must not outlive the renderer, even on panic.
        let _ = self.exit();
    }
}

/// Cell writer that only emits style changes.
struct StyledWriter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> StyledWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    /// Write `len` cells of `fb` starting at (x, y), cursor already placed.
    fn cells(&mut self, fb: &FrameBuffer, x: u16, y: u16, len: u16) -> Result<()> {
        for cx in x..x.saturating_add(len) {
            let cell = fb.get(cx, y).unwrap_or_default();
            if self.style != Some(cell.style) {
                queue_style(self.out, cell.style)?;
                self.style = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    /// Leave the terminal with default attributes if anything was styled.
    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            self.out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

/// Encode a clear plus a complete repaint of `fb` into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut writer = StyledWriter::new(out);
    for y in 0..fb.height() {
        writer.out.queue(cursor::MoveTo(0, y))?;
        writer.cells(fb, 0, y, fb.width())?;
    }
    writer.finish()
}

/// Encode only what changed from `prev` to `next` into `out`.
///
/// Identical frames produce no bytes at all.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = StyledWriter::new(out);
    for (x, y, len) in changed_runs(prev, next) {
        writer.out.queue(cursor::MoveTo(x, y))?;
        writer.cells(next, x, y, len)?;
    }
    writer.finish()
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(to_color(style.fg)))?
        .queue(SetBackgroundColor(to_color(style.bg)))?
        .queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn to_color(Rgb { r, g, b }: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn same_size(a: &FrameBuffer, b: &FrameBuffer) -> bool {
    a.width() == b.width() && a.height() == b.height()
}

/// Horizontal runs `(x, y, len)` of cells that differ; whole rows when the
/// frames differ in size.
fn changed_runs(prev: &FrameBuffer, next: &FrameBuffer) -> Vec<(u16, u16, u16)> {
    let width = next.width();
    if !same_size(prev, next) {
        return (0..next.height()).map(|y| (0, y, width)).collect();
    }

    let mut runs = Vec::new();
    for y in 0..next.height() {
        let mut start = None;
        for x in 0..=width {
            let differs = x < width && prev.get(x, y) != next.get(x, y);
            match (start, differs) {
                (None, true) => start = Some(x),
                (Some(s), false) => {
                    runs.push((s, y, x - s));
                    start = None;
                }
                _ => {}
            }
        }
    }
    runs
}
