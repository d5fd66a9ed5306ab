//! Bounded build grid with blocked road cells.

use std::collections::BTreeSet;

use turret_defence_core::CellCoord;

use crate::CellOccupancy;

/// Rectangular grid on which turrets may be built.
///
/// Cells outside the bounds and cells covered by the enemy road are never
/// available for building.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    road: BTreeSet<CellCoord>,
}

impl Grid {
    /// Creates an open grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            road: BTreeSet::new(),
        }
    }

    /// Marks the provided cells as road, ignoring cells outside the grid.
    #[must_use]
    pub fn with_road(mut self, cells: impl IntoIterator<Item = CellCoord>) -> Self {
        for cell in cells {
            if self.contains(cell) {
                let _ = self.road.insert(cell);
            }
        }
        self
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Reports whether the cell is part of the road.
    #[must_use]
    pub fn is_road(&self, cell: CellCoord) -> bool {
        self.road.contains(&cell)
    }
}

impl CellOccupancy for Grid {
    fn is_cell_empty(&self, cell: CellCoord) -> bool {
        self.contains(cell) && !self.is_road(cell)
    }
}
