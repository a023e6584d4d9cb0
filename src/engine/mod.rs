//! Ray-casting contract.
//!
//! *The renderer never marches rays itself.* It hands a [`RayCaster`] the
//! camera, a [`HeightSource`] and the [`RayConstraints`], and receives one
//! [`HitRecord`] per screen pixel through a sink closure.
//!
//! * Swap the caster without touching the map, frame or shader.
//! * Tests drive the renderer with a scripted caster.
//!
//! [`GridCaster`] is the stock DDA implementation.

use glam::{IVec2, UVec2};

use crate::world::Camera;

mod caster;

pub use caster::GridCaster;

/// Library distance units per map square.
pub const UNITS_PER_SQUARE: i32 = 1024;

/// Height reported for anything outside the map. Rays always stop on it.
pub const SOLID_HEIGHT: i32 = i32::MAX;

/// Map heights in library units, queried by square coordinate.
pub trait HeightSource {
    fn height_at(&self, x: i32, y: i32) -> i32;
}

impl<F> HeightSource for F
where
    F: Fn(i32, i32) -> i32,
{
    fn height_at(&self, x: i32, y: i32) -> i32 {
        self(x, y)
    }
}

/// Limits on how far and how often a single ray may travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayConstraints {
    /// Height changes recorded per ray before it stops.
    pub max_hits: u16,
    /// Grid cells a ray may enter.
    pub max_steps: u16,
    /// Travel limit in library units.
    pub max_distance: i32,
}

impl RayConstraints {
    /// Single-hit constraints reaching `squares` squares.
    ///
    /// A ray crosses at most `2 * squares + 2` cell borders on its way out.
    pub fn for_view_distance(squares: u32) -> Self {
        let steps = squares.saturating_mul(2).saturating_add(2);
        Self {
            max_hits: 1,
            max_steps: steps.min(u16::MAX as u32) as u16,
            max_distance: (squares as i64 * UNITS_PER_SQUARE as i64).min(i32::MAX as i64) as i32,
        }
    }
}

impl Default for RayConstraints {
    fn default() -> Self {
        Self::for_view_distance(16)
    }
}

/// Which side of a square a ray struck, numbered 0–3.
///
/// 0 and 1 are the primary pair (rays travelling +X / +Y).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    West = 0,
    North = 1,
    East = 2,
    South = 3,
}

impl Face {
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(i: u8) -> Option<Self> {
        match i {
            0 => Some(Face::West),
            1 => Some(Face::North),
            2 => Some(Face::East),
            3 => Some(Face::South),
            _ => None,
        }
    }
}

/// What the ray behind one pixel ended on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    Wall {
        face: Face,
        /// Map square that was hit.
        square: IVec2,
        /// Vertical position on the wall, 0 = bottom edge, 1 = top edge.
        v: f32,
    },
    Floor,
    Ceiling,
}

/// Per-pixel output of a caster.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitRecord {
    /// Screen coordinate, `(0, 0)` top-left.
    pub position: UVec2,
    pub surface: Surface,
    /// Distance in library units (perpendicular to the view plane for walls).
    pub depth: i32,
}

impl HitRecord {
    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(self.surface, Surface::Wall { .. })
    }

    #[inline]
    pub fn is_floor(&self) -> bool {
        matches!(self.surface, Surface::Floor)
    }
}

/// Anything that can turn a camera and a height field into hit records.
///
/// `cast` must call `sink` exactly once for every pixel of `size` and
/// return only after the last one.
pub trait RayCaster {
    fn cast<H, F>(
        &mut self,
        camera: &Camera,
        heights: &H,
        constraints: &RayConstraints,
        size: UVec2,
        sink: F,
    ) where
        H: HeightSource + ?Sized,
        F: FnMut(&HitRecord);
}
