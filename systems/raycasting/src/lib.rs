#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid ray casting: per-column wall sweeps and line-of-sight tests.
//!
//! Both traversals walk the horizontal and vertical grid lines crossed by a
//! ray (DDA) and stop after a bounded number of crossings per axis, so
//! malformed levels can never cause an unbounded walk.

use gridfire_core::{CellCoord, GridMap, ViewConfig, WallType, WorldPoint};

/// Offset applied to the first ray of a sweep so it never lies exactly on the FOV edge.
const RAY_ANGLE_EPSILON: f32 = 1e-4;
/// Smallest magnitude allowed for a ray's sine or cosine.
const DIRECTION_EPSILON: f32 = 1e-6;
/// Added to depths before division to keep projected heights finite.
const DEPTH_EPSILON: f32 = 1e-4;

/// Grid line family a ray crossed when it struck a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitAxis {
    /// A horizontal grid line (constant `y`).
    Horizontal,
    /// A vertical grid line (constant `x`).
    Vertical,
}

/// Wall struck by a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Euclidean distance from the origin to the hit point.
    pub depth: f32,
    /// Wall type of the struck cell.
    pub wall: WallType,
    /// Fractional texture coordinate along the struck face, in `[0, 1)`.
    pub offset: f32,
    /// Cell that was struck.
    pub cell: CellCoord,
    /// Grid line family the hit lies on.
    pub axis: HitAxis,
}

/// Result of casting a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CastOutcome {
    /// The ray struck a wall within the step cap.
    Hit(RayHit),
    /// Neither traversal struck a wall within the step cap.
    StepCapExceeded,
}

impl CastOutcome {
    /// Hit carried by the outcome, if any.
    #[must_use]
    pub fn hit(&self) -> Option<RayHit> {
        match self {
            Self::Hit(hit) => Some(*hit),
            Self::StepCapExceeded => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Direction {
    sin: f32,
    cos: f32,
}

impl Direction {
    fn new(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            sin: nudge(sin),
            cos: nudge(cos),
        }
    }
}

fn nudge(component: f32) -> f32 {
    if component.abs() < DIRECTION_EPSILON {
        DIRECTION_EPSILON.copysign(component)
    } else {
        component
    }
}

/// Where a single grid-line traversal stopped.
#[derive(Clone, Copy, Debug)]
enum Crossing {
    Wall { depth: f32, cell: CellCoord, along: f32 },
    Target { depth: f32 },
    Exhausted,
}

/// Walks the horizontal grid lines (constant `y`) crossed by the ray.
fn walk_horizontal(
    grid: &GridMap,
    origin: WorldPoint,
    direction: Direction,
    max_depth: u32,
    target: Option<CellCoord>,
) -> Crossing {
    let start = origin.cell();
    let (mut row, edge, step) = if direction.sin > 0.0 {
        (start.row() + 1, 0.0, 1)
    } else {
        (start.row() - 1, 1.0, -1)
    };

    for _ in 0..max_depth {
        let y = row as f32 + edge;
        let depth = (y - origin.y()) / direction.sin;
        let x = origin.x() + depth * direction.cos;
        let cell = CellCoord::new(x.floor() as i32, row);
        if target == Some(cell) {
            return Crossing::Target { depth };
        }
        if grid.is_wall(cell) {
            return Crossing::Wall {
                depth,
                cell,
                along: x,
            };
        }
        row += step;
    }
    Crossing::Exhausted
}

/// Walks the vertical grid lines (constant `x`) crossed by the ray.
fn walk_vertical(
    grid: &GridMap,
    origin: WorldPoint,
    direction: Direction,
    max_depth: u32,
    target: Option<CellCoord>,
) -> Crossing {
    let start = origin.cell();
    let (mut column, edge, step) = if direction.cos > 0.0 {
        (start.column() + 1, 0.0, 1)
    } else {
        (start.column() - 1, 1.0, -1)
    };

    for _ in 0..max_depth {
        let x = column as f32 + edge;
        let depth = (x - origin.x()) / direction.cos;
        let y = origin.y() + depth * direction.sin;
        let cell = CellCoord::new(column, y.floor() as i32);
        if target == Some(cell) {
            return Crossing::Target { depth };
        }
        if grid.is_wall(cell) {
            return Crossing::Wall {
                depth,
                cell,
                along: y,
            };
        }
        column += step;
    }
    Crossing::Exhausted
}

/// Casts a single ray and reports the nearest wall it strikes.
///
/// Each axis may cross at most `max_depth` grid lines. When only one axis
/// strikes a wall that hit is used; when both do, the shallower one wins and
/// ties go to the horizontal crossing.
#[must_use]
pub fn cast_ray(grid: &GridMap, origin: WorldPoint, angle: f32, max_depth: u32) -> CastOutcome {
    let direction = Direction::new(angle);
    let horizontal = walk_horizontal(grid, origin, direction, max_depth, None);
    let vertical = walk_vertical(grid, origin, direction, max_depth, None);

    let horizontal_hit = match horizontal {
        Crossing::Wall { depth, cell, along } => {
            let fraction = along.rem_euclid(1.0);
            let offset = if direction.sin > 0.0 {
                1.0 - fraction
            } else {
                fraction
            };
            Some((depth, cell, offset, HitAxis::Horizontal))
        }
        Crossing::Target { .. } | Crossing::Exhausted => None,
    };
    let vertical_hit = match vertical {
        Crossing::Wall { depth, cell, along } => {
            let fraction = along.rem_euclid(1.0);
            let offset = if direction.cos > 0.0 {
                fraction
            } else {
                1.0 - fraction
            };
            Some((depth, cell, offset, HitAxis::Vertical))
        }
        Crossing::Target { .. } | Crossing::Exhausted => None,
    };

    let chosen = match (horizontal_hit, vertical_hit) {
        (Some(h), Some(v)) => Some(if v.0 < h.0 { v } else { h }),
        (Some(hit), None) | (None, Some(hit)) => Some(hit),
        (None, None) => None,
    };

    match chosen {
        Some((depth, cell, offset, axis)) => CastOutcome::Hit(RayHit {
            depth,
            wall: grid.wall_at(cell).unwrap_or(WallType::BOUNDARY),
            offset: offset.clamp(0.0, 1.0),
            cell,
            axis,
        }),
        None => CastOutcome::StepCapExceeded,
    }
}

/// Reports whether `target` is visible from `origin`.
///
/// Points sharing a cell always see each other. Otherwise both axis
/// traversals run along the bearing to the target, each stopping on the
/// target's cell or on a wall. The target is visible when it was reached
/// nearer than any wall, or when neither traversal struck a wall.
#[must_use]
pub fn line_of_sight(
    grid: &GridMap,
    origin: WorldPoint,
    target: WorldPoint,
    max_depth: u32,
) -> bool {
    let target_cell = target.cell();
    if origin.cell() == target_cell {
        return true;
    }

    let direction = Direction::new(origin.bearing_to(target));
    let crossings = [
        walk_horizontal(grid, origin, direction, max_depth, Some(target_cell)),
        walk_vertical(grid, origin, direction, max_depth, Some(target_cell)),
    ];

    let mut target_depth = 0.0_f32;
    let mut wall_depth = 0.0_f32;
    for crossing in crossings {
        match crossing {
            Crossing::Target { depth } => target_depth = target_depth.max(depth),
            Crossing::Wall { depth, .. } => wall_depth = wall_depth.max(depth),
            Crossing::Exhausted => {}
        }
    }

    if wall_depth == 0.0 && target_depth == 0.0 {
        log::warn!(
            "line of sight from ({:.2}, {:.2}) to ({:.2}, {:.2}) exceeded {} grid crossings",
            origin.x(),
            origin.y(),
            target.x(),
            target.y(),
            max_depth
        );
    }

    (target_depth > 0.0 && target_depth < wall_depth) || wall_depth == 0.0
}

/// One ray of a render sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallColumn {
    /// Zero-based index of the ray from the left edge of the view.
    pub index: u32,
    /// Absolute angle of the ray.
    pub angle: f32,
    /// Depth corrected for fish-eye distortion. Infinite when nothing was struck.
    pub depth: f32,
    /// Height of the wall slice in pixels. Zero when nothing was struck.
    pub projected_height: f32,
    /// Wall struck by the ray, absent when the step cap was exceeded.
    pub hit: Option<RayHit>,
}

/// Casts one ray per screen column across the field of view.
#[derive(Debug)]
pub struct RayCaster {
    view: ViewConfig,
    columns: Vec<WallColumn>,
}

impl RayCaster {
    /// Creates a ray caster for the provided view.
    #[must_use]
    pub fn new(view: ViewConfig) -> Self {
        Self {
            columns: Vec::with_capacity(view.ray_count() as usize),
            view,
        }
    }

    /// View parameters the sweep is computed for.
    #[must_use]
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Columns produced by the most recent sweep, left to right.
    #[must_use]
    pub fn columns(&self) -> &[WallColumn] {
        &self.columns
    }

    /// Recomputes every column for a viewer at `viewer` facing `heading`.
    pub fn sweep(&mut self, grid: &GridMap, viewer: WorldPoint, heading: f32) -> &[WallColumn] {
        self.columns.clear();

        let screen_dist = self.view.screen_dist();
        let delta_angle = self.view.delta_angle();
        let mut angle = heading - self.view.half_fov() + RAY_ANGLE_EPSILON;
        let mut capped = 0_u32;

        for index in 0..self.view.ray_count() {
            let column = match cast_ray(grid, viewer, angle, self.view.max_depth) {
                CastOutcome::Hit(hit) => {
                    let depth = hit.depth * (heading - angle).cos();
                    WallColumn {
                        index,
                        angle,
                        depth,
                        projected_height: screen_dist / (depth + DEPTH_EPSILON),
                        hit: Some(hit),
                    }
                }
                CastOutcome::StepCapExceeded => {
                    capped += 1;
                    WallColumn {
                        index,
                        angle,
                        depth: f32::INFINITY,
                        projected_height: 0.0,
                        hit: None,
                    }
                }
            };
            self.columns.push(column);
            angle += delta_angle;
        }

        if capped > 0 {
            log::warn!(
                "{capped} rays from ({:.2}, {:.2}) exceeded {} grid crossings without a wall",
                viewer.x(),
                viewer.y(),
                self.view.max_depth
            );
        }

        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use super::*;

    fn corridor() -> GridMap {
        GridMap::from_rows(&[
            [1, 1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1],
        ])
    }

    #[test]
    fn east_ray_hits_vertical_face() {
        let outcome = cast_ray(&corridor(), WorldPoint::new(1.5, 1.25), 0.0, 20);
        let hit = outcome.hit().expect("hit");
        assert_eq!(hit.axis, HitAxis::Vertical);
        assert_eq!(hit.cell, CellCoord::new(6, 1));
        assert!((hit.depth - 4.5).abs() < 1e-4);
        assert!((hit.offset - 0.25).abs() < 1e-4);
    }

    #[test]
    fn west_ray_mirrors_vertical_offset() {
        let hit = cast_ray(&corridor(), WorldPoint::new(3.5, 1.25), PI, 20)
            .hit()
            .expect("hit");
        assert_eq!(hit.cell, CellCoord::new(0, 1));
        assert!((hit.depth - 2.5).abs() < 1e-4);
        assert!((hit.offset - 0.75).abs() < 1e-4);
    }

    #[test]
    fn south_ray_hits_horizontal_face() {
        let hit = cast_ray(&corridor(), WorldPoint::new(2.25, 1.5), FRAC_PI_2, 20)
            .hit()
            .expect("hit");
        assert_eq!(hit.axis, HitAxis::Horizontal);
        assert_eq!(hit.cell, CellCoord::new(2, 2));
        assert!((hit.depth - 0.5).abs() < 1e-4);
        assert!((hit.offset - 0.75).abs() < 1e-4);
    }

    #[test]
    fn exhausted_traversal_is_reported() {
        let mut rows = vec![vec![0_u8; 9]; 9];
        for (index, row) in rows.iter_mut().enumerate() {
            row[0] = 1;
            row[8] = 1;
            if index == 0 || index == 8 {
                row.fill(1);
            }
        }
        let grid = GridMap::from_rows(&rows);

        let outcome = cast_ray(&grid, WorldPoint::new(4.5, 4.5), FRAC_PI_4, 1);

        assert_eq!(outcome, CastOutcome::StepCapExceeded);
        assert!(cast_ray(&grid, WorldPoint::new(4.5, 4.5), FRAC_PI_4, 20)
            .hit()
            .is_some());
    }

    #[test]
    fn sweep_produces_one_column_per_ray() {
        let view = ViewConfig {
            width: 64,
            height: 48,
            ..ViewConfig::default()
        };
        let mut caster = RayCaster::new(view);
        let columns = caster.sweep(&corridor(), WorldPoint::new(1.5, 1.5), 0.0);
        assert_eq!(columns.len(), 32);
        assert!(columns.iter().all(|column| column.hit.is_some()));
        assert!(columns.windows(2).all(|pair| pair[0].angle < pair[1].angle));
    }

    #[test]
    fn same_cell_is_always_visible() {
        let grid = corridor();
        assert!(line_of_sight(
            &grid,
            WorldPoint::new(2.1, 1.1),
            WorldPoint::new(2.9, 1.9),
            0
        ));
    }

    #[test]
    fn open_corridor_is_visible_in_both_directions() {
        let grid = corridor();
        let a = WorldPoint::new(1.5, 1.5);
        let b = WorldPoint::new(4.5, 1.5);
        assert!(line_of_sight(&grid, a, b, 20));
        assert!(line_of_sight(&grid, b, a, 20));
    }
}
