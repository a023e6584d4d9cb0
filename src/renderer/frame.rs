//! Text frame buffer: a `width × height` grid of [`Pixel`]s with the same
//! lifecycle guard as the map.

use std::io::{self, Write};

use glam::UVec2;

use crate::world::{Grid, GridError, GridSlot, Lifecycle, Pixel};

#[derive(Debug)]
pub struct Frame {
    slot: GridSlot<Pixel>,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

impl Frame {
    pub const fn new() -> Self {
        Self {
            slot: GridSlot::new("frame"),
        }
    }

    pub fn create(&mut self, width: usize, height: usize) -> Result<Lifecycle, GridError> {
        self.slot.create(width, height)
    }

    pub fn request_recreate(&mut self) -> Result<Lifecycle, GridError> {
        self.slot.request_recreate()
    }

    pub fn teardown(&mut self) -> Lifecycle {
        self.slot.teardown()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.slot.lifecycle()
    }

    pub fn generation(&self) -> u64 {
        self.slot.generation()
    }

    pub fn grid(&self) -> Result<&Grid<Pixel>, GridError> {
        self.slot.grid()
    }

    pub fn size(&self) -> Result<UVec2, GridError> {
        let g = self.slot.grid()?;
        Ok(UVec2::new(g.width() as u32, g.height() as u32))
    }

    pub fn pixel(&self, x: i64, y: i64) -> Result<Pixel, GridError> {
        self.slot.grid()?.get(x, y).copied()
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, pixel: Pixel) -> Result<(), GridError> {
        self.slot.grid_mut()?.set(x, y, pixel)
    }

    pub fn clear(&mut self, pixel: Pixel) -> Result<(), GridError> {
        self.slot.grid_mut()?.cells_mut().fill(pixel);
        Ok(())
    }

    /// Glyphs row by row, each row followed by `'\n'`:
    /// `(width + 1) × height` characters in total.
    pub fn to_text(&self) -> Result<String, GridError> {
        let g = self.slot.grid()?;
        let mut out = String::with_capacity((g.width() + 1) * g.height());
        for row in g.rows() {
            out.extend(row.iter().map(|p| p.glyph));
            out.push('\n');
        }
        Ok(out)
    }

    /// Stream [`Frame::to_text`] into `out`.
    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let text = self.to_text().map_err(io::Error::other)?;
        out.write_all(text.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Rgb;

    #[test]
    fn pixel_access_guarded_like_map() {
        let mut f = Frame::new();
        assert_eq!(f.pixel(0, 0).unwrap_err(), GridError::NotInitialized("frame"));
        f.create(3, 2).unwrap();
        assert_eq!(f.create(3, 2).unwrap_err(), GridError::AlreadyInitialized("frame"));
        assert!(matches!(
            f.set_pixel(0, -1, Pixel::BLANK).unwrap_err(),
            GridError::NegativeCoordinate { .. }
        ));
    }

    #[test]
    fn text_has_newline_terminated_rows() {
        let mut f = Frame::new();
        f.create(3, 2).unwrap();
        f.clear(Pixel::new(Rgb::WHITE, '.')).unwrap();
        f.set_pixel(2, 1, Pixel::new(Rgb::WHITE, '#')).unwrap();

        let text = f.to_text().unwrap();
        assert_eq!(text, "...\n..#\n");
        assert_eq!(text.chars().count(), (3 + 1) * 2);

        let mut buf = Vec::new();
        f.write_text(&mut buf).unwrap();
        assert_eq!(buf, text.as_bytes());
    }

    #[test]
    fn recreate_keeps_dimensions_and_resets_cells() {
        let mut f = Frame::new();
        f.create(4, 4).unwrap();
        f.set_pixel(1, 1, Pixel::new(Rgb::WHITE, '@')).unwrap();
        f.request_recreate().unwrap();
        f.create(4, 4).unwrap();
        assert_eq!(f.generation(), 2);
        assert_eq!(f.size().unwrap(), UVec2::new(4, 4));
        assert_eq!(f.pixel(1, 1).unwrap(), Pixel::BLANK);
    }
}
