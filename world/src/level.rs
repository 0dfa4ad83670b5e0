//! Level layouts and their validation.

use gridfire_core::{CellCoord, GridMap, PropKind, WorldPoint};
use serde::{Deserialize, Serialize};

/// Reasons a level cannot be loaded.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    /// The level contains no rows or no columns.
    #[error("level data is empty")]
    Empty,
    /// Every cell of the level is a wall.
    #[error("level has no traversable cells")]
    NoFreeCells,
    /// The configured player start lies inside a wall.
    #[error("player start cell ({}, {}) is a wall", cell.column(), cell.row())]
    PlayerInsideWall {
        /// Cell containing the configured start position.
        cell: CellCoord,
    },
}

/// Static decoration placed at a fixed position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    /// Kind of prop.
    pub kind: PropKind,
    /// Position in grid units.
    pub position: WorldPoint,
}

impl PropPlacement {
    const fn at(kind: PropKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: WorldPoint::new(x, y),
        }
    }
}

/// Raw level description: wall-type ids per cell plus prop placements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    /// Row-major wall ids; zero is traversable.
    pub rows: Vec<Vec<u8>>,
    /// Props decorating the level.
    pub props: Vec<PropPlacement>,
}

impl LevelData {
    /// Builds the immutable grid, rejecting levels without any free cell.
    pub fn build_grid(&self) -> Result<GridMap, LevelError> {
        if self.rows.is_empty() || self.rows.iter().all(Vec::is_empty) {
            return Err(LevelError::Empty);
        }

        let grid = GridMap::from_rows(&self.rows);
        if grid.free_cells().next().is_none() {
            return Err(LevelError::NoFreeCells);
        }
        Ok(grid)
    }

    /// Level made of a rectangular room enclosed by a single ring of walls.
    #[must_use]
    pub fn open_room(columns: usize, rows: usize) -> Self {
        let mut layout = vec![vec![1; columns]; rows];
        for (row_index, row) in layout.iter_mut().enumerate() {
            if row_index == 0 || row_index + 1 == rows {
                continue;
            }
            for cell in row.iter_mut().skip(1).take(columns.saturating_sub(2)) {
                *cell = 0;
            }
        }
        Self {
            rows: layout,
            props: Vec::new(),
        }
    }
}

impl Default for LevelData {
    fn default() -> Self {
        Self {
            rows: DEFAULT_LAYOUT.iter().map(|row| row.to_vec()).collect(),
            props: default_props(),
        }
    }
}

const DEFAULT_LAYOUT: [[u8; 16]; 32] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 3, 3, 3, 3, 0, 0, 0, 3, 1, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 3, 0, 0, 1],
    [1, 0, 0, 3, 3, 3, 3, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 4, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 3, 1, 3, 1, 1, 1, 3, 0, 0, 3, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 0, 0, 3, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 3, 0, 0, 3, 1, 1, 1],
    [1, 1, 3, 1, 1, 1, 1, 1, 1, 3, 0, 0, 3, 1, 1, 1],
    [1, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 2, 0, 0, 0, 0, 0, 3, 4, 0, 4, 3, 0, 1],
    [1, 0, 0, 5, 0, 0, 0, 0, 0, 0, 3, 0, 3, 0, 0, 1],
    [1, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 4, 0, 0, 0, 0, 0, 0, 4, 0, 0, 4, 0, 0, 0, 1],
    [1, 1, 3, 3, 0, 0, 3, 3, 1, 3, 3, 1, 3, 1, 1, 1],
    [1, 1, 1, 3, 0, 0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 3, 3, 4, 0, 0, 4, 3, 3, 3, 3, 3, 3, 3, 3, 1],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 5, 0, 0, 0, 5, 0, 0, 0, 5, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 3],
    [3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3],
];

fn default_props() -> Vec<PropPlacement> {
    use PropKind::{GreenLight, RedLight};

    vec![
        PropPlacement::at(GreenLight, 11.5, 3.5),
        PropPlacement::at(GreenLight, 1.5, 1.5),
        PropPlacement::at(GreenLight, 1.5, 7.5),
        PropPlacement::at(GreenLight, 5.5, 3.25),
        PropPlacement::at(GreenLight, 5.5, 4.75),
        PropPlacement::at(GreenLight, 7.5, 2.5),
        PropPlacement::at(GreenLight, 7.5, 5.5),
        PropPlacement::at(GreenLight, 14.5, 1.5),
        PropPlacement::at(GreenLight, 14.5, 4.5),
        PropPlacement::at(RedLight, 14.5, 5.5),
        PropPlacement::at(RedLight, 14.5, 7.5),
        PropPlacement::at(RedLight, 12.5, 7.5),
        PropPlacement::at(RedLight, 9.5, 7.5),
        PropPlacement::at(RedLight, 14.5, 12.5),
        PropPlacement::at(RedLight, 9.5, 20.5),
        PropPlacement::at(RedLight, 10.5, 20.5),
        PropPlacement::at(RedLight, 3.5, 14.5),
        PropPlacement::at(RedLight, 3.5, 18.5),
        PropPlacement::at(GreenLight, 14.5, 24.5),
        PropPlacement::at(GreenLight, 14.5, 30.5),
        PropPlacement::at(GreenLight, 1.5, 30.5),
        PropPlacement::at(GreenLight, 1.5, 24.5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_enclosed() {
        let grid = LevelData::default().build_grid().expect("default level");
        assert_eq!((grid.columns(), grid.rows()), (16, 32));
        for column in 0..16 {
            assert!(grid.is_wall(CellCoord::new(column, 0)));
            assert!(grid.is_wall(CellCoord::new(column, 31)));
        }
        for row in 0..32 {
            assert!(grid.is_wall(CellCoord::new(0, row)));
            assert!(grid.is_wall(CellCoord::new(15, row)));
        }
    }

    #[test]
    fn empty_level_is_rejected() {
        let level = LevelData {
            rows: Vec::new(),
            props: Vec::new(),
        };
        assert_eq!(level.build_grid(), Err(LevelError::Empty));
    }

    #[test]
    fn solid_level_is_rejected() {
        let level = LevelData {
            rows: vec![vec![1, 1], vec![1, 1]],
            props: Vec::new(),
        };
        assert_eq!(level.build_grid(), Err(LevelError::NoFreeCells));
    }

    #[test]
    fn open_room_has_walled_border_and_free_interior() {
        let grid = LevelData::open_room(5, 4).build_grid().expect("room");
        assert_eq!(grid.free_cells().count(), 3 * 2);
        assert!(grid.is_wall(CellCoord::new(4, 1)));
        assert!(!grid.is_wall(CellCoord::new(3, 2)));
    }
}
