#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projection of world-space billboards onto the screen.

use glam::Vec2;
use gridfire_core::{wrap_angle_delta, SpriteDescriptor, ViewConfig, WorldPoint};

/// Screen-space placement of a billboard for a single viewer pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Angle between the viewer's heading and the sprite, in `(-π, π]`.
    pub delta: f32,
    /// Euclidean distance from the viewer.
    pub distance: f32,
    /// Distance along the viewing axis; used as the sprite's depth.
    pub normalized_distance: f32,
    /// Horizontal screen position of the sprite's centre, in pixels.
    pub screen_x: f32,
    /// Projected width and height, in pixels.
    pub size: Vec2,
    /// Top-left corner of the projected image, in pixels.
    pub origin: Vec2,
    /// Whether the sprite survived near-plane and horizontal culling.
    pub visible: bool,
}

impl SpriteProjection {
    /// Half of the projected width.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        self.size.x / 2.0
    }
}

/// Projects sprites for a fixed view configuration.
#[derive(Clone, Copy, Debug)]
pub struct SpriteProjector {
    view: ViewConfig,
}

impl SpriteProjector {
    /// Creates a projector for the provided view.
    #[must_use]
    pub const fn new(view: ViewConfig) -> Self {
        Self { view }
    }

    /// View parameters used for projection.
    #[must_use]
    pub const fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Projects a sprite at `position` for a viewer at `viewer` facing `heading`.
    ///
    /// Culled projections still carry their angular offset and distances so
    /// callers can reason about off-screen sprites.
    #[must_use]
    pub fn project(
        &self,
        viewer: WorldPoint,
        heading: f32,
        position: WorldPoint,
        sprite: &SpriteDescriptor,
    ) -> SpriteProjection {
        let view = &self.view;
        let delta = wrap_angle_delta(viewer.bearing_to(position) - heading);
        let screen_x =
            (view.ray_count() as f32 / 2.0 + delta / view.delta_angle()) * view.column_width();
        let distance = viewer.distance_to(position);
        let normalized_distance = distance * delta.cos();

        if normalized_distance <= view.near_clip {
            return SpriteProjection {
                delta,
                distance,
                normalized_distance,
                screen_x,
                size: Vec2::ZERO,
                origin: Vec2::new(screen_x, view.half_height()),
                visible: false,
            };
        }

        let height = view.screen_dist() / normalized_distance * sprite.scale;
        let size = Vec2::new(height * sprite.image_ratio, height);
        let half_width = size.x / 2.0;
        let origin = Vec2::new(
            screen_x - half_width,
            view.half_height() - height / 2.0 + height * sprite.height_shift,
        );
        let visible = screen_x > -half_width && screen_x < view.width as f32 + half_width;

        SpriteProjection {
            delta,
            distance,
            normalized_distance,
            screen_x,
            size,
            origin,
            visible,
        }
    }

    /// Reports whether a visible projection overlaps the aiming band at the screen centre.
    #[must_use]
    pub fn overlaps_aim(&self, projection: &SpriteProjection) -> bool {
        if !projection.visible {
            return false;
        }
        let centre = self.view.half_width();
        let reach = projection.half_width() + self.view.aim_band_width / 2.0;
        (projection.screen_x - centre).abs() < reach
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;

    fn projector() -> SpriteProjector {
        SpriteProjector::new(ViewConfig::default())
    }

    fn unit_sprite() -> SpriteDescriptor {
        SpriteDescriptor::new(1.0, 0.0, 1.0)
    }

    #[test]
    fn sprite_straight_ahead_lands_on_screen_centre() {
        let projection = projector().project(
            WorldPoint::new(1.5, 1.5),
            0.0,
            WorldPoint::new(4.5, 1.5),
            &unit_sprite(),
        );
        assert!(projection.visible);
        assert!((projection.screen_x - 800.0).abs() < 1e-2);
        assert!((projection.normalized_distance - 3.0).abs() < 1e-5);
        assert!(projector().overlaps_aim(&projection));
    }

    #[test]
    fn sprite_behind_viewer_is_culled() {
        let projection = projector().project(
            WorldPoint::new(4.5, 1.5),
            0.0,
            WorldPoint::new(1.5, 1.5),
            &unit_sprite(),
        );
        assert!((projection.delta.abs() - PI).abs() < 1e-5);
        assert!(!projection.visible);
        assert!(!projector().overlaps_aim(&projection));
    }

    #[test]
    fn sprite_inside_near_plane_is_culled() {
        let projection = projector().project(
            WorldPoint::new(1.5, 1.5),
            0.0,
            WorldPoint::new(1.9, 1.5),
            &unit_sprite(),
        );
        assert!(!projection.visible);
    }

    #[test]
    fn heading_wraparound_keeps_delta_small() {
        let heading = 2.0 * PI - 0.05;
        let projection = projector().project(
            WorldPoint::new(1.5, 1.5),
            heading,
            WorldPoint::new(4.5, 1.5 + 3.0 * 0.05_f32.tan()),
            &unit_sprite(),
        );
        assert!((projection.delta - 0.1).abs() < 1e-3);
        assert!(projection.visible);
    }

    #[test]
    fn sprite_to_the_side_is_outside_the_field_of_view() {
        let projection = projector().project(
            WorldPoint::new(1.5, 1.5),
            0.0,
            WorldPoint::new(1.5, 5.5),
            &unit_sprite(),
        );
        assert!((projection.delta - FRAC_PI_2).abs() < 1e-5);
        assert!(!projection.visible);
    }

    #[test]
    fn height_shift_moves_image_down() {
        let flat = projector().project(
            WorldPoint::new(1.5, 1.5),
            0.0,
            WorldPoint::new(4.5, 1.5),
            &SpriteDescriptor::new(0.6, 0.0, 0.5),
        );
        let shifted = projector().project(
            WorldPoint::new(1.5, 1.5),
            0.0,
            WorldPoint::new(4.5, 1.5),
            &SpriteDescriptor::new(0.6, 0.38, 0.5),
        );
        assert!(shifted.origin.y > flat.origin.y);
        assert!((shifted.size.x - shifted.size.y * 0.5).abs() < 1e-3);
    }
}
