//! One render session: map, frame, camera and ray limits in a single owner.
//!
//! ```text
//! configure ─► render ─► present ─► turn / walk / strafe ─► render …
//! ```
//!
//! Every operation other than `configure` fails with
//! [`RenderError::NotConfigured`] until `configure` has succeeded once.

use std::io::{self, Write};

use glam::UVec2;
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::config::{ConfigError, RenderConfig};
use crate::engine::{GridCaster, HitRecord, RayCaster, RayConstraints, Surface};
use crate::renderer::{Frame, PixelShader};
use crate::world::{Camera, GridError, Lifecycle, Map};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("rendering has not been configured")]
    NotConfigured,

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `render` was asked for a size other than the frame's.
    #[error("render size {got} does not match frame size {expected}")]
    FrameSize { expected: UVec2, got: UVec2 },

    /// The caster skipped pixels; the frame is not shown.
    #[error("{missing} frame cells were not written")]
    IncompleteFrame { missing: usize },

    #[error("failed to write frame: {0}")]
    Io(#[from] io::Error),
}

/// Owner of everything a frame needs, generic over the ray caster.
pub struct RenderSession<C: RayCaster = GridCaster> {
    caster: C,
    shader: PixelShader,
    map: Map,
    frame: Frame,
    camera: Option<Camera>,
    constraints: RayConstraints,
    coverage: Vec<bool>,
}

impl Default for RenderSession<GridCaster> {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSession<GridCaster> {
    pub fn new() -> Self {
        Self::with_caster(GridCaster::new())
    }
}

impl<C: RayCaster> RenderSession<C> {
    pub fn with_caster(caster: C) -> Self {
        Self {
            caster,
            shader: PixelShader::default(),
            map: Map::new(),
            frame: Frame::new(),
            camera: None,
            constraints: RayConstraints::default(),
            coverage: Vec::new(),
        }
    }

    pub fn set_shader(&mut self, shader: PixelShader) {
        self.shader = shader;
    }

    #[inline]
    pub fn is_configured(&self) -> bool {
        self.camera.is_some()
    }

    /*──────────────────────── configuration ─────────────────────────*/

    /// Set up camera, constraints, map and frame from `config`.
    ///
    /// A second call replaces everything: both grids are explicitly
    /// recreated at the new sizes and the camera returns to its start pose.
    /// If building the new grids fails, the session is torn down and stays
    /// unconfigured.
    pub fn configure(&mut self, config: &RenderConfig) -> Result<(), RenderError> {
        config.validate()?;

        let camera = config.camera();
        let constraints = config.constraints();

        if let Err(e) = self.rebuild_grids(config) {
            warn!(error = %e, "configure failed, tearing down");
            self.teardown();
            return Err(e.into());
        }

        self.camera = Some(camera);
        self.constraints = constraints;
        info!(
            map = %format!("{}x{}", config.map_width, config.map_height),
            frame = %format!("{}x{}", config.frame_width, config.frame_height),
            view_distance = config.camera_view_distance,
            "rendering configured"
        );
        Ok(())
    }

    fn rebuild_grids(&mut self, config: &RenderConfig) -> Result<(), GridError> {
        if self.map.lifecycle() != Lifecycle::Uninitialized {
            self.map.request_recreate()?;
        }
        if self.frame.lifecycle() != Lifecycle::Uninitialized {
            self.frame.request_recreate()?;
        }
        self.map.create(config.map_width, config.map_height)?;
        self.frame
            .create(config.frame_width as usize, config.frame_height as usize)?;
        Ok(())
    }

    /// Release map and frame storage and forget the camera. A later
    /// `configure` starts from scratch.
    pub fn teardown(&mut self) {
        self.map.teardown();
        self.frame.teardown();
        self.camera = None;
        self.coverage = Vec::new();
        info!("rendering torn down");
    }

    /*──────────────────────── accessors ─────────────────────────────*/

    pub fn camera(&self) -> Result<&Camera, RenderError> {
        self.camera.as_ref().ok_or(RenderError::NotConfigured)
    }

    fn camera_mut(&mut self) -> Result<&mut Camera, RenderError> {
        self.camera.as_mut().ok_or_else(|| {
            warn!("camera moved before configure");
            RenderError::NotConfigured
        })
    }

    pub fn constraints(&self) -> Result<&RayConstraints, RenderError> {
        self.camera()?;
        Ok(&self.constraints)
    }

    pub fn map(&self) -> Result<&Map, RenderError> {
        self.camera()?;
        Ok(&self.map)
    }

    pub fn map_mut(&mut self) -> Result<&mut Map, RenderError> {
        self.camera()?;
        Ok(&mut self.map)
    }

    pub fn frame(&self) -> Result<&Frame, RenderError> {
        self.camera()?;
        Ok(&self.frame)
    }

    /*──────────────────────── camera control ────────────────────────*/

    pub fn turn(&mut self, angle: i32) -> Result<(), RenderError> {
        self.camera_mut()?.turn(angle);
        Ok(())
    }

    pub fn walk(&mut self, distance: i32) -> Result<(), RenderError> {
        self.camera_mut()?.walk(distance);
        Ok(())
    }

    pub fn strafe(&mut self, distance: i32) -> Result<(), RenderError> {
        self.camera_mut()?.strafe(distance);
        Ok(())
    }

    /*──────────────────────── rendering ─────────────────────────────*/

    /// Render one `width × height` frame; the size must match the frame.
    ///
    /// On success every frame cell has been overwritten exactly as the caster
    /// reported it. On error the frame content is unspecified and must not be
    /// presented.
    pub fn render(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let camera = *self.camera()?;
        self.map.grid()?;
        let expected = self.frame.size()?;
        let got = UVec2::new(width, height);
        if got != expected {
            warn!(%expected, %got, "render size mismatch");
            return Err(RenderError::FrameSize { expected, got });
        }

        let Self {
            caster,
            shader,
            map,
            frame,
            constraints,
            coverage,
            ..
        } = self;

        coverage.clear();
        coverage.resize(width as usize * height as usize, false);
        let mut first_err: Option<GridError> = None;

        caster.cast(&camera, &*map, constraints, got, |hit: &HitRecord| {
            if first_err.is_some() {
                return;
            }
            let texel = match hit.surface {
                Surface::Wall { square, v, .. } => map
                    .square(square.x as i64, square.y as i64)
                    .ok()
                    .and_then(|sq| sq.texel(v))
                    .map(|px| px.colour),
                _ => None,
            };
            let (x, y) = (hit.position.x as i64, hit.position.y as i64);
            match frame.set_pixel(x, y, shader.shade(hit, texel)) {
                Ok(()) => coverage[y as usize * width as usize + x as usize] = true,
                Err(e) => first_err = Some(e),
            }
        });

        if let Some(e) = first_err {
            warn!(error = %e, "caster wrote outside the frame");
            return Err(e.into());
        }
        let missing = coverage.iter().filter(|&&c| !c).count();
        if missing > 0 {
            warn!(missing, "caster left frame cells unwritten");
            return Err(RenderError::IncompleteFrame { missing });
        }

        trace!(width, height, "frame rendered");
        Ok(())
    }

    /// [`render`](Self::render) at the frame's own size.
    pub fn render_frame(&mut self) -> Result<(), RenderError> {
        self.camera()?;
        let size = self.frame.size()?;
        self.render(size.x, size.y)
    }

    /// Write the frame as plain text rows.
    pub fn present<W: Write>(&self, out: &mut W) -> Result<(), RenderError> {
        self.frame()?.write_text(out)?;
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
