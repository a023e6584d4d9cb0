//! Flushes finished frames to a terminal.
//!
//! Each frame is encoded into an in-memory command buffer first and written
//! with a single `write_all`, so a half-drawn frame never reaches the screen.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};

use super::frame::Frame;
use crate::world::{GridError, Rgb};

pub struct TerminalOutput {
    colour: bool,
    buf: Vec<u8>,
}

impl TerminalOutput {
    /// `colour = false` prints plain glyphs; `true` adds 24-bit foreground
    /// colour per cell.
    pub fn new(colour: bool) -> Self {
        Self {
            colour,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    pub fn colour(&self) -> bool {
        self.colour
    }

    /// Clear the screen and hide the cursor.
    pub fn enter<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.buf.clear();
        self.buf.queue(terminal::Clear(terminal::ClearType::All))?;
        self.buf.queue(cursor::Hide)?;
        flush(out, &self.buf)
    }

    /// Restore colours and the cursor.
    pub fn exit<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(cursor::Show)?;
        flush(out, &self.buf)
    }

    /// Draw `frame` from the top-left corner.
    pub fn present<W: Write>(&mut self, frame: &Frame, out: &mut W) -> io::Result<()> {
        self.buf.clear();
        encode_into(frame, self.colour, &mut self.buf)?;
        flush(out, &self.buf)
    }
}

/// Encode one frame as crossterm commands into `out`.
pub fn encode_into(frame: &Frame, colour: bool, out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(cursor::MoveTo(0, 0))?;

    if !colour {
        let text = frame.to_text().map_err(not_ready)?;
        out.queue(Print(text))?;
        return Ok(());
    }

    let grid = frame.grid().map_err(not_ready)?;
    let mut current: Option<Rgb> = None;
    for row in grid.rows() {
        for px in row {
            if current != Some(px.colour) {
                out.queue(SetForegroundColor(to_color(px.colour)))?;
                current = Some(px.colour);
            }
            out.queue(Print(px.glyph))?;
        }
        out.queue(Print('\n'))?;
    }
    out.queue(ResetColor)?;
    Ok(())
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

fn not_ready(e: GridError) -> io::Error {
    io::Error::other(e)
}

fn flush<W: Write>(out: &mut W, buf: &[u8]) -> io::Result<()> {
    out.write_all(buf)?;
    out.flush()
}
