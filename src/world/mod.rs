mod camera;
mod grid;
mod level;
mod map;
mod pixel;
mod texture;

pub use camera::{Camera, FOV};
pub use grid::{Grid, GridError, GridSlot, Lifecycle};
pub use level::{DEMO_LAYOUT, DEMO_LENGTH, DEMO_WIDTH, demo_level, paint_layout};
pub use map::{Map, Square};
pub use pixel::{Pixel, Rgb};
pub use texture::{Texture, TextureBank, TextureError, builtin};
