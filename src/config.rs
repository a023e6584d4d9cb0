//! Start-up configuration for a render session.
//!
//! ```toml
//! camera_pos_x = 1.5          # squares
//! camera_pos_y = 1.5
//! camera_res_x = 80           # projection resolution
//! camera_res_y = 40
//! camera_start_height = 0.5   # eye height, squares
//! camera_start_direction = 0  # degrees, 0 = +X, 90 = +Y
//! camera_view_distance = 16   # squares
//! map_width = 20
//! map_height = 15
//! frame_width = 80
//! frame_height = 40
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::{fs, path::Path, path::PathBuf};

use glam::{IVec2, UVec2};
use serde::Deserialize;
use thiserror::Error;

use crate::engine::{RayConstraints, UNITS_PER_SQUARE};
use crate::world::Camera;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the renderer cannot work with.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Immutable bundle consumed once by `RenderSession::configure`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub camera_pos_x: f32,
    pub camera_pos_y: f32,
    pub camera_res_x: u32,
    pub camera_res_y: u32,
    pub camera_start_height: f32,
    pub camera_start_direction: f32,
    pub camera_view_distance: u32,
    pub map_width: usize,
    pub map_height: usize,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera_pos_x: 1.5,
            camera_pos_y: 1.5,
            camera_res_x: 80,
            camera_res_y: 40,
            camera_start_height: 0.5,
            camera_start_direction: 0.0,
            camera_view_distance: 16,
            map_width: 20,
            map_height: 15,
            frame_width: 80,
            frame_height: 40,
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would leave the session unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.map_width == 0 || self.map_height == 0 {
            return invalid("map_width/map_height", "must be non-zero");
        }
        if self.frame_width == 0 || self.frame_height == 0 {
            return invalid("frame_width/frame_height", "must be non-zero");
        }
        if self.camera_res_x == 0 || self.camera_res_y == 0 {
            return invalid("camera_res_x/camera_res_y", "must be non-zero");
        }
        if self.camera_view_distance == 0 {
            return invalid("camera_view_distance", "must be at least one square");
        }
        let finite = [
            self.camera_pos_x,
            self.camera_pos_y,
            self.camera_start_height,
            self.camera_start_direction,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return invalid("camera", "position, height and direction must be finite");
        }
        Ok(())
    }

    /// Camera in library units at the configured start pose.
    pub fn camera(&self) -> Camera {
        let u = UNITS_PER_SQUARE as f32;
        let pos = IVec2::new(
            (self.camera_pos_x * u).round() as i32,
            (self.camera_pos_y * u).round() as i32,
        );
        let direction = (self.camera_start_direction / 360.0 * u).round() as i32;
        let height = (self.camera_start_height * u).round() as i32;
        Camera::new(
            pos,
            direction,
            height,
            UVec2::new(self.camera_res_x, self.camera_res_y),
        )
    }

    /// Single-hit constraints reaching the view distance.
    pub fn constraints(&self) -> RayConstraints {
        RayConstraints::for_view_distance(self.camera_view_distance)
    }

    pub fn frame_size(&self) -> UVec2 {
        UVec2::new(self.frame_width, self.frame_height)
    }
}
