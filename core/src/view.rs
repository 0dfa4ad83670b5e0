//! Screen and projection parameters shared by the ray caster and sprite projector.

use std::f32::consts::FRAC_PI_3;

use serde::{Deserialize, Serialize};

/// Viewport, field of view and traversal limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Horizontal field of view in radians.
    pub fov: f32,
    /// Number of rays cast per sweep. Zero means one ray per two pixels.
    pub num_rays: u32,
    /// Maximum grid lines crossed per axis before a traversal gives up.
    pub max_depth: u32,
    /// Normalized distances at or below this value are not projected.
    pub near_clip: f32,
    /// Width in pixels of the aiming band centred on the screen.
    pub aim_band_width: f32,
}

impl ViewConfig {
    /// Number of rays cast per sweep.
    #[must_use]
    pub fn ray_count(&self) -> u32 {
        if self.num_rays == 0 {
            (self.width / 2).max(1)
        } else {
            self.num_rays
        }
    }

    /// Half of the field of view.
    #[must_use]
    pub fn half_fov(&self) -> f32 {
        self.fov / 2.0
    }

    /// Angle between adjacent rays.
    #[must_use]
    pub fn delta_angle(&self) -> f32 {
        self.fov / self.ray_count() as f32
    }

    /// Distance from the eye to the projection plane, in pixels.
    #[must_use]
    pub fn screen_dist(&self) -> f32 {
        self.half_width() / self.half_fov().tan()
    }

    /// Width in pixels of one ray column.
    #[must_use]
    pub fn column_width(&self) -> f32 {
        self.width as f32 / self.ray_count() as f32
    }

    /// Horizontal centre of the viewport.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.width as f32 / 2.0
    }

    /// Vertical centre of the viewport.
    #[must_use]
    pub fn half_height(&self) -> f32 {
        self.height as f32 / 2.0
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            fov: FRAC_PI_3,
            num_rays: 0,
            max_depth: 20,
            near_clip: 0.5,
            aim_band_width: 2.0,
        }
    }
}
