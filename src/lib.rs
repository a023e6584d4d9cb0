//! ASCII ray-casting renderer.
//!
//! * [`world`]    – map grid, squares, textures, camera.
//! * [`engine`]   – ray-casting contract and the stock [`GridCaster`](engine::GridCaster).
//! * [`renderer`] – frame buffer, pixel shader, terminal output.
//! * [`session`]  – [`RenderSession`], the owner that ties them together.

pub mod config;
pub mod engine;
pub mod renderer;
pub mod session;
pub mod world;

pub use config::{ConfigError, RenderConfig};
pub use session::{RenderError, RenderSession};
