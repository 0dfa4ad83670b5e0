//! Static occupancy grid of wall-type identifiers.

use serde::{Deserialize, Serialize};

use crate::CellCoord;

/// Identifier of a wall texture. Zero is reserved for traversable cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallType(u8);

impl WallType {
    /// Wall type reported for cells outside the level bounds and for padding.
    pub const BOUNDARY: WallType = WallType(1);

    /// Creates a wall type, returning `None` for the traversable id zero.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value == 0 {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Numeric texture identifier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Immutable mapping from cell to wall type built once from level data.
///
/// Cells outside the stored bounds are walls, so every traversal over the
/// grid stays bounded even when the level is missing its outer ring.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    cells: Vec<Option<WallType>>,
}

impl GridMap {
    /// Builds a grid from row-major level data. Short rows are padded with walls.
    #[must_use]
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let width = rows
            .iter()
            .map(|row| row.as_ref().len())
            .max()
            .unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for row in rows {
            let row = row.as_ref();
            cells.extend(row.iter().map(|&value| WallType::new(value)));
            cells.extend(std::iter::repeat(Some(WallType::BOUNDARY)).take(width - row.len()));
        }

        Self {
            columns: u32::try_from(width).unwrap_or(0),
            rows: u32::try_from(rows.len()).unwrap_or(0),
            cells,
        }
    }

    /// Number of columns stored in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows stored in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies within the stored bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Wall occupying the cell, if any. Out-of-bounds cells are boundary walls.
    #[must_use]
    pub fn wall_at(&self, cell: CellCoord) -> Option<WallType> {
        match self.index(cell) {
            Some(index) => self.cells[index],
            None => Some(WallType::BOUNDARY),
        }
    }

    /// Reports whether the cell blocks rays and movement.
    #[must_use]
    pub fn is_wall(&self, cell: CellCoord) -> bool {
        self.wall_at(cell).is_some()
    }

    /// Iterator over every traversable cell in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, wall)| wall.is_none())
            .map(move |(index, _)| {
                CellCoord::new((index % columns) as i32, (index / columns) as i32)
            })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}
