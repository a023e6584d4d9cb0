//! Frame buffer, shading and output.
//!
//! *Nothing here casts rays.* A caster reports hit records, the
//! [`PixelShader`] turns each into a [`Pixel`](crate::world::Pixel), and the
//! finished [`Frame`] is serialised either as plain text or through
//! [`TerminalOutput`].

mod frame;
mod shader;
mod terminal;

pub use frame::Frame;
pub use shader::{
    CEILING_GLYPH, FACE_BIAS, FLOOR_GLYPH, MAX_SHADE, Palette, PixelShader, SHADE_RAMP,
    SIDE_GLYPH, depth_shade,
};
pub use terminal::{TerminalOutput, encode_into};
