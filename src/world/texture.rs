// Named paint sheets used when placing walls and rooms.
// Map placement copies columns out of a texture; the renderer only ever sees
// the copied columns, never the bank.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use super::pixel::{Pixel, Rgb};

/// A `w × h` sheet of pixels in row-major order, top row first.
///
/// Painted onto the map, each texture column becomes one square's vertical
/// slice and `h` becomes that square's height. A `0 × 0` texture paints open
/// floor. Either both dimensions are zero or neither is.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    name: String,
    w: usize,
    h: usize,
    pixels: Vec<Pixel>,
}

impl Default for Texture {
    fn default() -> Self {
        Self::checker()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture `{0}` is already registered")]
    Duplicate(String),

    /// Pixel count does not match the declared dimensions.
    #[error("texture `{name}` is {w}x{h} but has {len} pixels")]
    Size {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },
}

impl Texture {
    /// Build a texture, checking that `pixels.len() == w * h` and that a
    /// zero dimension is never paired with a non-zero one.
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Pixel>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        check_size(&name, w, h, pixels.len())?;
        Ok(Self { name, w, h, pixels })
    }

    /// `w × h` texture where every cell is `pixel`.
    pub fn solid<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixel: Pixel,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        let len = w.checked_mul(h).unwrap_or(usize::MAX);
        check_size(&name, w, h, len)?;
        Ok(Self {
            name,
            w,
            h,
            pixels: vec![pixel; len],
        })
    }

    /// 2 × 2 light/dark checkerboard, the fallback for unknown names.
    pub fn checker() -> Self {
        let light = Pixel::new(Rgb::grey(200), '#');
        let dark = Pixel::new(Rgb::grey(90), '+');
        Self {
            name: "CHECKER".into(),
            w: 2,
            h: 2,
            pixels: vec![light, dark, dark, light],
        }
    }

    /// The zero-height texture: painting with it clears cells to open floor.
    pub fn empty() -> Self {
        Self {
            name: "EMPTY".into(),
            w: 0,
            h: 0,
            pixels: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Copy column `c % w` top to bottom. Empty textures yield no pixels.
    pub fn column(&self, c: usize) -> Vec<Pixel> {
        if self.is_empty() {
            return Vec::new();
        }
        let c = c % self.w;
        (0..self.h).map(|y| self.pixels[y * self.w + c]).collect()
    }
}

fn check_size(name: &str, w: usize, h: usize, len: usize) -> Result<(), TextureError> {
    let expected = w.checked_mul(h);
    if expected != Some(len) || (w == 0) != (h == 0) {
        return Err(TextureError::Size {
            name: name.to_string(),
            w,
            h,
            len,
        });
    }
    Ok(())
}

/// Textures keyed by their own name, plus a fallback for names that were
/// never registered.
#[derive(Clone, Debug)]
pub struct TextureBank {
    textures: HashMap<String, Texture>,
    fallback: Texture,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::with_fallback(Texture::default())
    }
}

impl TextureBank {
    pub fn with_fallback(fallback: Texture) -> Self {
        Self {
            textures: HashMap::new(),
            fallback,
        }
    }

    /// Registered textures; the fallback is not counted.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn fallback(&self) -> &Texture {
        &self.fallback
    }

    /// Unknown names resolve to the fallback.
    pub fn get_or_fallback(&self, name: &str) -> &Texture {
        self.get(name).unwrap_or_else(|| {
            debug!(name, "unknown texture, using fallback");
            &self.fallback
        })
    }

    /// Add `tex` under its own name. A name can be registered once.
    pub fn register(&mut self, tex: Texture) -> Result<(), TextureError> {
        if self.textures.contains_key(&tex.name) {
            warn!(name = %tex.name, "duplicate texture rejected");
            return Err(TextureError::Duplicate(tex.name));
        }
        self.textures.insert(tex.name.clone(), tex);
        Ok(())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}

/*──────────────────────── built-in catalogue ─────────────────────────*/

fn striped(name: &str, colours: &[Rgb], glyph: char) -> Texture {
    let pixels = colours.iter().map(|&c| Pixel::new(c, glyph)).collect();
    Texture {
        name: name.to_string(),
        w: colours.len(),
        h: 1,
        pixels,
    }
}

static BUILTIN: Lazy<TextureBank> = Lazy::new(|| {
    let brick = striped(
        "BRICK",
        &[
            Rgb::new(178, 34, 34),
            Rgb::new(160, 40, 30),
            Rgb::new(190, 60, 45),
            Rgb::new(120, 30, 25),
        ],
        '#',
    );
    let stone = striped(
        "STONE",
        &[
            Rgb::new(130, 130, 140),
            Rgb::new(110, 110, 118),
            Rgb::new(150, 150, 155),
        ],
        '%',
    );
    let mut bank = TextureBank::default();
    for tex in [Texture::empty(), Texture::checker(), brick, stone] {
        // names are distinct, so registration cannot fail
        let _ = bank.register(tex);
    }
    bank
});

/// Read-only process-wide bank: `EMPTY`, `CHECKER`, `BRICK` and `STONE`,
/// falling back to the checkerboard.
pub fn builtin() -> &'static TextureBank {
    &BUILTIN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(name: &str, glyph: char) -> Texture {
        Texture::solid(name, 2, 2, Pixel::new(Rgb::WHITE, glyph)).unwrap()
    }

    #[test]
    fn register_then_get_by_name() {
        let mut bank = TextureBank::default();
        bank.register(plain("RED", 'r')).unwrap();
        bank.register(plain("BLUE", 'b')).unwrap();

        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get("RED").unwrap().pixels()[0].glyph, 'r');
        assert_eq!(bank.get("BLUE").unwrap().pixels()[0].glyph, 'b');
        assert!(bank.get("NOPE").is_none());

        let mut names: Vec<_> = bank.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["BLUE", "RED"]);
    }

    #[test]
    fn second_registration_of_a_name_fails() {
        let mut bank = TextureBank::default();
        bank.register(plain("WOOD", 'w')).unwrap();
        let err = bank.register(plain("WOOD", 'x')).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.get("WOOD").unwrap().pixels()[0].glyph, 'w');
    }

    #[test]
    fn unknown_name_uses_fallback() {
        let bank = TextureBank::with_fallback(plain("MAGENTA", 'm'));
        assert!(bank.is_empty());
        assert_eq!(bank.get_or_fallback("NOPE").name(), "MAGENTA");
    }

    #[test]
    fn size_mismatch_rejected() {
        let err = Texture::new("BAD", 2, 2, vec![Pixel::BLANK; 3]).unwrap_err();
        assert!(matches!(err, TextureError::Size { len: 3, .. }));
        assert!(Texture::new("ODD", 0, 3, Vec::new()).is_err());
    }

    #[test]
    fn one_zero_dimension_is_rejected() {
        let px = Pixel::new(Rgb::WHITE, 'x');
        for (w, h) in [(0, 2), (3, 0)] {
            let err = Texture::solid("FLAT", w, h, px).unwrap_err();
            assert!(matches!(err, TextureError::Size { .. }), "{w}x{h}");
        }
        assert!(Texture::solid("HUGE", usize::MAX, 2, px).is_err());
        assert!(Texture::solid("NONE", 0, 0, px).unwrap().is_empty());
    }

    #[test]
    fn column_wraps_and_reads_top_down() {
        let [a, b, c, d] = ['a', 'b', 'c', 'd'].map(|g| Pixel::new(Rgb::WHITE, g));
        let tex = Texture::new("T", 2, 2, vec![a, b, c, d]).unwrap();
        assert_eq!(tex.column(0), vec![a, c]);
        assert_eq!(tex.column(3), vec![b, d]);
        assert!(Texture::empty().column(5).is_empty());
    }

    #[test]
    fn builtins_present() {
        let bank = builtin();
        assert_eq!(bank.get("BRICK").unwrap().height(), 1);
        assert!(bank.get("STONE").is_some());
        assert!(bank.get_or_fallback("EMPTY").is_empty());
        assert_eq!(bank.get_or_fallback("NOPE").name(), "CHECKER");
        assert_eq!(bank.len(), 4);
    }
}
