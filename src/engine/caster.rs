//! ---------------------------------------------------------------------------
//! DDA grid caster
//!
//! * One ray per screen column across the camera's 90° field of view.
//! * Each ray walks the grid cell by cell and records every change of height
//!   (up to `max_hits`); the nearest band covering a row wins.
//! * Depth is perpendicular to the view plane, so walls do not fisheye.
//! ---------------------------------------------------------------------------

use glam::{IVec2, UVec2, Vec2};
use smallvec::SmallVec;
use tracing::trace;

use super::{
    Face, HeightSource, HitRecord, RayCaster, RayConstraints, SOLID_HEIGHT, Surface,
    UNITS_PER_SQUARE,
};
use crate::world::Camera;

/// Height of the ceiling plane in library units. Negative squares hang
/// down from it.
pub const CEILING_HEIGHT: i32 = UNITS_PER_SQUARE;

/// Stand-in for an infinite per-cell step when a ray runs parallel to an axis.
const NEVER: f32 = 1e30;

/// One height change found while marching.
#[derive(Clone, Copy, Debug)]
struct RayHit {
    square: IVec2,
    face: Face,
    height: i32,
    depth: f32, // library units
}

/// A hit projected onto one screen column, in camera-pixel rows.
#[derive(Clone, Copy, Debug)]
struct Band {
    hit: RayHit,
    top: f32,
    bottom: f32,
    z_bottom: f32,
    z_top: f32,
}

/// Stock [`RayCaster`] for square grids.
#[derive(Default)]
pub struct GridCaster {
    hits: SmallVec<[RayHit; 4]>,
    bands: SmallVec<[Band; 4]>,
}

impl GridCaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the grid from `origin` (squares) along `dir`, filling `self.hits`.
    fn march<H>(&mut self, origin: Vec2, dir: Vec2, heights: &H, limits: &RayConstraints)
    where
        H: HeightSource + ?Sized,
    {
        self.hits.clear();

        let mut cell = origin.floor().as_ivec2();
        let delta = Vec2::new(
            if dir.x.abs() < 1e-8 { NEVER } else { (1.0 / dir.x).abs() },
            if dir.y.abs() < 1e-8 { NEVER } else { (1.0 / dir.y).abs() },
        );
        let step = IVec2::new(
            if dir.x < 0.0 { -1 } else { 1 },
            if dir.y < 0.0 { -1 } else { 1 },
        );
        let mut side = Vec2::new(
            if dir.x < 0.0 {
                (origin.x - cell.x as f32) * delta.x
            } else {
                (cell.x as f32 + 1.0 - origin.x) * delta.x
            },
            if dir.y < 0.0 {
                (origin.y - cell.y as f32) * delta.y
            } else {
                (cell.y as f32 + 1.0 - origin.y) * delta.y
            },
        );

        let max_dist = limits.max_distance as f32 / UNITS_PER_SQUARE as f32;
        let max_hits = limits.max_hits.max(1) as usize;
        let mut prev = heights.height_at(cell.x, cell.y);

        for _ in 0..limits.max_steps {
            let (dist, face) = if side.x < side.y {
                let d = side.x;
                side.x += delta.x;
                cell.x += step.x;
                (d, if step.x > 0 { Face::West } else { Face::East })
            } else {
                let d = side.y;
                side.y += delta.y;
                cell.y += step.y;
                (d, if step.y > 0 { Face::North } else { Face::South })
            };
            if dist > max_dist {
                break;
            }

            let h = heights.height_at(cell.x, cell.y);
            if h != 0 && h != prev {
                self.hits.push(RayHit {
                    square: cell,
                    face,
                    height: h,
                    depth: dist * UNITS_PER_SQUARE as f32,
                });
                if self.hits.len() >= max_hits {
                    break;
                }
            }
            if h == SOLID_HEIGHT {
                break;
            }
            prev = h;
        }
    }
}

impl RayCaster for GridCaster {
    fn cast<H, F>(
        &mut self,
        camera: &Camera,
        heights: &H,
        constraints: &RayConstraints,
        size: UVec2,
        mut sink: F,
    ) where
        H: HeightSource + ?Sized,
        F: FnMut(&HitRecord),
    {
        if size.x == 0 || size.y == 0 {
            return;
        }

        let res = camera.resolution().max(UVec2::ONE).as_vec2();
        let half = res.y * 0.5;
        let focal = camera.screen_scale().max(1.0);
        let eye = camera.height() as f32;
        let origin = camera.pos_squares();
        let forward = camera.forward();
        let right = camera.right();
        let max_depth = constraints.max_distance.max(0) as f32;

        // screen row → camera row, and camera row → height at a given depth
        let cam_row = |y: u32| (y as f32 + 0.5) * res.y / size.y as f32;
        let project = |z: f32, depth: f32| half - (z - eye) * focal / depth;

        for x in 0..size.x {
            // tan(fov / 2) = 1 for the fixed 90° view, so the plane spans ±right
            let k = 2.0 * (x as f32 + 0.5) / size.x as f32 - 1.0;
            let dir = forward + right * k;
            self.march(origin, dir, heights, constraints);

            self.bands.clear();
            for hit in &self.hits {
                let depth = hit.depth.max(1.0);
                let h = hit.height as f32;
                let (z_bottom, z_top) = if hit.height > 0 {
                    (0.0, h)
                } else {
                    (CEILING_HEIGHT as f32 + h, CEILING_HEIGHT as f32)
                };
                self.bands.push(Band {
                    hit: *hit,
                    top: project(z_top, depth),
                    bottom: project(z_bottom, depth),
                    z_bottom,
                    z_top,
                });
            }

            for y in 0..size.y {
                let cy = cam_row(y);
                let covering = self.bands.iter().find(|b| b.top <= cy && cy < b.bottom);

                let (surface, depth) = match covering {
                    Some(b) => {
                        let depth = b.hit.depth.max(1.0);
                        let z = eye + (half - cy) * depth / focal;
                        let v = ((z - b.z_bottom) / (b.z_top - b.z_bottom)).clamp(0.0, 1.0);
                        let surface = Surface::Wall {
                            face: b.hit.face,
                            square: b.hit.square,
                            v,
                        };
                        (surface, b.hit.depth)
                    }
                    None if cy > half => {
                        let depth = eye.max(0.0) * focal / (cy - half);
                        (Surface::Floor, depth.min(max_depth))
                    }
                    None => {
                        let above = (CEILING_HEIGHT as f32 - eye).max(0.0);
                        let depth = if half > cy {
                            above * focal / (half - cy)
                        } else {
                            max_depth
                        };
                        (Surface::Ceiling, depth.min(max_depth))
                    }
                };

                sink(&HitRecord {
                    position: UVec2::new(x, y),
                    surface,
                    depth: depth.round().min(i32::MAX as f32) as i32,
                });
            }
        }
        trace!(columns = size.x, rows = size.y, "cast complete");
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
