/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Multiply every channel by `factor` (clamped to `0.0 ..= 1.0`).
    pub fn scaled(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        let ch = |c: u8| (c as f32 * f).round() as u8;
        Self::new(ch(self.r), ch(self.g), ch(self.b))
    }
}

/// One display cell: a colour for colour terminals and a glyph for plain
/// text. Both halves are always set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub colour: Rgb,
    pub glyph: char,
}

impl Pixel {
    /// What a freshly allocated frame holds before the first render.
    pub const BLANK: Pixel = Pixel::new(Rgb::BLACK, ' ');

    pub const fn new(colour: Rgb, glyph: char) -> Self {
        Self { colour, glyph }
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self::BLANK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaling_clamps_factor() {
        let c = Rgb::new(200, 100, 10);
        assert_eq!(c.scaled(0.5), Rgb::new(100, 50, 5));
        assert_eq!(c.scaled(2.0), c);
        assert_eq!(c.scaled(-1.0), Rgb::BLACK);
    }
}
