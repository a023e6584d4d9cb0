use glam::{IVec2, UVec2, Vec2};

use crate::engine::UNITS_PER_SQUARE;

/// Player view-point in map space.
///
/// * All lengths are integer library units (`UNITS_PER_SQUARE` per square).
/// * `direction` is an angle where one full turn is `UNITS_PER_SQUARE`;
///   0 looks along +X, increasing values rotate towards +Y.
/// * Only yaw is modelled; there is no pitch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    pos: IVec2,         // x,y in library units
    direction: i32,     // library angle units, never normalised here
    height: i32,        // eye height above the floor
    resolution: UVec2,  // projection resolution in camera pixels
}

/// Horizontal field of view, fixed at 90°.
pub const FOV: f32 = std::f32::consts::FRAC_PI_2;

impl Camera {
    pub fn new(pos: IVec2, direction: i32, height: i32, resolution: UVec2) -> Self {
        Self {
            pos,
            direction,
            height,
            resolution,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.pos
    }

    #[inline]
    pub fn direction(&self) -> i32 {
        self.direction
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn resolution(&self) -> UVec2 {
        self.resolution
    }

    /// Position in (fractional) squares.
    #[inline]
    pub fn pos_squares(&self) -> Vec2 {
        self.pos.as_vec2() / UNITS_PER_SQUARE as f32
    }

    /// Facing angle in radians.
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.direction as f32 / UNITS_PER_SQUARE as f32 * std::f32::consts::TAU
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        Vec2::from_angle(self.yaw())
    }

    /// Unit vector pointing to the camera's right.
    ///
    /// Map rows grow downwards, so a quarter turn towards +Y is a right turn.
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Add `angle` to the facing direction. No wraparound is applied, so
    /// `turn(a)` then `turn(-a)` is an exact no-op.
    pub fn turn(&mut self, angle: i32) {
        self.direction = self.direction.wrapping_add(angle);
    }

    /// Move by `forward` units and `side` (strafe), preserving eye-height.
    /// Position saturates at the `i32` range.
    pub fn step(&mut self, forward: i32, side: i32) {
        let delta = self.forward() * forward as f32 + self.right() * side as f32;
        self.pos = self.pos.saturating_add(delta.round().as_ivec2());
    }

    pub fn walk(&mut self, distance: i32) {
        self.step(distance, 0);
    }

    pub fn strafe(&mut self, distance: i32) {
        self.step(0, distance);
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Camera-pixel-per-unit scale for the configured resolution.
    ///
    /// ```text
    /// focal = w / (2 * tan(fov/2))
    /// ```
    #[inline]
    pub fn screen_scale(self) -> f32 {
        self.resolution.x as f32 * 0.5 / (FOV * 0.5).tan()
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
