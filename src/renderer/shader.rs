//! Hit record → display cell.
//!
//! Glyph selection:
//!
//! ```text
//! shade = 3 - min(3, depth / UNITS_PER_SQUARE)      // 3 = nearest
//! wall, face 0  -> SHADE_RAMP[min(shade + 2, last)]
//! wall, face 1  -> SHADE_RAMP[shade]
//! wall, face 2  -> 'o'
//! wall, face 3  -> SHADE_RAMP[0]
//! floor         -> '.'
//! ceiling       -> ':'
//! ```
//!
//! The shader is a pure function of its inputs and holds no per-frame state.

use crate::engine::{Face, HitRecord, Surface, UNITS_PER_SQUARE};
use crate::world::{Pixel, Rgb};

/// Wall glyphs from faintest to densest.
pub const SHADE_RAMP: [char; 5] = ['-', '=', '+', '#', '@'];

/// Shade of a wall touching the camera.
pub const MAX_SHADE: usize = 3;

/// Extra shade applied to face 0 so the primary pair reads differently.
pub const FACE_BIAS: usize = 2;

pub const FLOOR_GLYPH: char = '.';
pub const CEILING_GLYPH: char = ':';
pub const SIDE_GLYPH: char = 'o';

/// How the colour half of a pixel is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// Opaque white everywhere.
    #[default]
    Mono,
    /// Grey (or the wall texel) darkened with distance; faces 2/3 dimmer.
    Shaded,
}

/// `3 - min(3, depth / UNITS_PER_SQUARE)`; negative depths count as zero.
#[inline]
pub fn depth_shade(depth: i32) -> usize {
    let squares = (depth.max(0) / UNITS_PER_SQUARE) as usize;
    MAX_SHADE - squares.min(MAX_SHADE)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PixelShader {
    palette: Palette,
}

impl PixelShader {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Glyph for `hit`, ignoring colour.
    pub fn glyph(&self, hit: &HitRecord) -> char {
        let shade = depth_shade(hit.depth);
        match hit.surface {
            Surface::Wall { face, .. } => match face {
                Face::West => ramp(shade + FACE_BIAS),
                Face::North => ramp(shade),
                Face::East => SIDE_GLYPH,
                Face::South => SHADE_RAMP[0],
            },
            Surface::Floor => FLOOR_GLYPH,
            Surface::Ceiling => CEILING_GLYPH,
        }
    }

    /// Full display cell. `texel` is the hit square's texture colour, if it
    /// has one; only [`Palette::Shaded`] uses it.
    pub fn shade(&self, hit: &HitRecord, texel: Option<Rgb>) -> Pixel {
        Pixel::new(self.colour(hit, texel), self.glyph(hit))
    }

    fn colour(&self, hit: &HitRecord, texel: Option<Rgb>) -> Rgb {
        match self.palette {
            Palette::Mono => Rgb::WHITE,
            Palette::Shaded => {
                let light = 0.35 + 0.65 * depth_shade(hit.depth) as f32 / MAX_SHADE as f32;
                match hit.surface {
                    Surface::Wall { face, .. } => {
                        let base = texel.unwrap_or(Rgb::grey(220));
                        let side = if face.index() >= 2 { 0.75 } else { 1.0 };
                        base.scaled(light * side)
                    }
                    Surface::Floor => Rgb::grey(110).scaled(light),
                    Surface::Ceiling => Rgb::grey(70),
                }
            }
        }
    }
}

/// Ramp lookup clamped to the last entry.
#[inline]
fn ramp(index: usize) -> char {
    SHADE_RAMP[index.min(SHADE_RAMP.len() - 1)]
}

/*──────────────────────────────── Tests ───────────────────────────────*/
