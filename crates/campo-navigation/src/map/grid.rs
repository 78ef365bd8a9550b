#![warn(missing_docs)]

use super::{GridPoint, WorldPoint};
use crate::error::NavigationError;

/// A square grid of `size × size` cells, each of side `cell_size` meters.
///
/// The grid is a coordinate system, not a stored array: it converts between
/// continuous world coordinates and integer cell indices, and occupancy
/// evidence is produced per tick as sets of indices rather than persisted
/// here. When `centered`, the world origin maps to the middle cell instead
/// of cell (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    /// Side length of the grid in cells.
    size: usize,
    /// Side length of one cell in meters.
    cell_size: f64,
    /// Whether the world origin maps to the middle cell.
    centered: bool,
}

impl Grid {
    /// Creates a new grid.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::InvalidGridSize)` if `size` is zero and
    /// `Err(NavigationError::InvalidCellSize)` if `cell_size` is not positive
    /// and finite. Both are fatal configuration errors, not per-tick
    /// conditions.
    pub fn new(size: usize, cell_size: f64, centered: bool) -> Result<Self, NavigationError> {
        if size == 0 {
            return Err(NavigationError::InvalidGridSize("must be non-zero"));
        }
        if !(cell_size > 0.0) || !cell_size.is_finite() {
            return Err(NavigationError::InvalidCellSize("must be positive and finite"));
        }
        Ok(Grid {
            size,
            cell_size,
            centered,
        })
    }

    /// Side length of the grid in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Side length of one cell in meters.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Whether the world origin maps to the middle cell.
    pub fn centered(&self) -> bool {
        self.centered
    }

    /// Cell index of a world point, per axis `ceil(coord / cell_size) - 1`.
    ///
    /// The ceil-then-minus-one rule ties points that fall exactly on a cell
    /// boundary to the cell on the origin side of that boundary, so cells
    /// cover the half-open interval `(k*cell_size, (k+1)*cell_size]`.
    /// No bounds checking is performed; callers clip with [`Grid::contains`].
    pub fn cell_of(&self, p: WorldPoint) -> GridPoint {
        let mut cx = ((1.0 / self.cell_size) * p.x).ceil() as i32 - 1;
        let mut cy = ((1.0 / self.cell_size) * p.y).ceil() as i32 - 1;
        if self.centered {
            let center = (self.size / 2) as i32;
            cx += center;
            cy += center;
        }
        GridPoint::new(cx, cy)
    }

    /// World coordinates of a cell's reference corner.
    ///
    /// Approximate inverse of [`Grid::cell_of`]: the centering shift is
    /// undone first, then the index is scaled by the cell size. The result
    /// is the corner shared with the neighbor on the origin side, not the
    /// cell center.
    pub fn point_of(&self, cell: GridPoint) -> WorldPoint {
        let (mut x, mut y) = (cell.x as f64, cell.y as f64);
        if self.centered {
            let center = (self.size / 2) as f64;
            x -= center;
            y -= center;
        }
        WorldPoint::new(x * self.cell_size, y * self.cell_size)
    }

    /// World coordinates of a cell's center.
    pub fn center_of(&self, cell: GridPoint) -> WorldPoint {
        let corner = self.point_of(cell);
        WorldPoint::new(corner.x + self.cell_size / 2.0, corner.y + self.cell_size / 2.0)
    }

    /// Whether both indices of `cell` fall inside `[0, size)`.
    pub fn contains(&self, cell: GridPoint) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.size
            && (cell.y as usize) < self.size
    }
}

/// The 8-connected neighborhood of a cell, in no particular order.
///
/// Neighbors are not bounds-checked; callers clip with [`Grid::contains`].
pub fn neighbors8(cell: GridPoint) -> [GridPoint; 8] {
    let (x, y) = (cell.x, cell.y);
    [
        GridPoint::new(x, y + 1),
        GridPoint::new(x + 1, y),
        GridPoint::new(x, y - 1),
        GridPoint::new(x - 1, y),
        GridPoint::new(x + 1, y + 1),
        GridPoint::new(x - 1, y + 1),
        GridPoint::new(x + 1, y - 1),
        GridPoint::new(x - 1, y - 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(matches!(
            Grid::new(0, 1.0, true),
            Err(NavigationError::InvalidGridSize(_))
        ));
        assert!(matches!(
            Grid::new(5, 0.0, true),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            Grid::new(5, -0.5, false),
            Err(NavigationError::InvalidCellSize(_))
        ));
        assert!(matches!(
            Grid::new(5, f64::NAN, false),
            Err(NavigationError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_cell_of_centered_reference_case() {
        // ceil(0.5) - 1 = 0, plus center offset 5/2 = 2 on each axis.
        let grid = Grid::new(5, 1.0, true).unwrap();
        assert_eq!(grid.cell_of(WorldPoint::new(0.5, 0.5)), GridPoint::new(2, 2));
    }

    #[test]
    fn test_cell_of_origin_anchored() {
        let grid = Grid::new(10, 0.5, false).unwrap();
        assert_eq!(grid.cell_of(WorldPoint::new(0.3, 0.3)), GridPoint::new(0, 0));
        assert_eq!(grid.cell_of(WorldPoint::new(1.3, 0.8)), GridPoint::new(2, 1));
    }

    #[test]
    fn test_cell_of_boundary_tie_break() {
        // A point exactly on a cell boundary belongs to the cell on the
        // origin side: ceil(1.0) - 1 = 0, not 1.
        let grid = Grid::new(10, 1.0, false).unwrap();
        assert_eq!(grid.cell_of(WorldPoint::new(1.0, 1.0)), GridPoint::new(0, 0));
        assert_eq!(grid.cell_of(WorldPoint::new(2.0, 3.0)), GridPoint::new(1, 2));
    }

    #[test]
    fn test_cell_of_negative_coordinates() {
        // ceil(-0.3) - 1 = -1: negative coordinates round toward the
        // boundary nearer the origin side of the cell.
        let grid = Grid::new(10, 1.0, false).unwrap();
        assert_eq!(grid.cell_of(WorldPoint::new(-0.3, -1.2)), GridPoint::new(-1, -2));

        let centered = Grid::new(10, 1.0, true).unwrap();
        assert_eq!(centered.cell_of(WorldPoint::new(-0.3, -1.2)), GridPoint::new(4, 3));
    }

    #[test]
    fn test_point_of_undoes_center_shift() {
        let grid = Grid::new(5, 1.0, true).unwrap();
        assert_eq!(grid.point_of(GridPoint::new(2, 2)), WorldPoint::new(0.0, 0.0));
        assert_eq!(grid.point_of(GridPoint::new(0, 4)), WorldPoint::new(-2.0, 2.0));

        let anchored = Grid::new(5, 0.5, false).unwrap();
        assert_eq!(anchored.point_of(GridPoint::new(3, 1)), WorldPoint::new(1.5, 0.5));
    }

    #[test]
    fn test_round_trip_through_cell_interior() {
        // point_of returns the corner shared with the origin-side neighbor,
        // which the boundary tie-break assigns to that neighbor. Stepping
        // half a cell into the interior recovers the original index.
        for grid in [
            Grid::new(5, 1.0, true).unwrap(),
            Grid::new(8, 0.25, false).unwrap(),
        ] {
            for cell in [GridPoint::new(2, 2), GridPoint::new(0, 3), GridPoint::new(4, 1)] {
                let interior = grid.center_of(cell);
                assert_eq!(grid.cell_of(interior), cell, "grid {:?} cell {:?}", grid, cell);
            }
        }
    }

    #[test]
    fn test_point_of_recovers_corner_of_indexed_cell() {
        let grid = Grid::new(6, 0.5, false).unwrap();
        let p = WorldPoint::new(1.7, 0.9);
        let cell = grid.cell_of(p);
        let corner = grid.point_of(cell);
        // The corner is within one cell of the original point on each axis.
        assert!((p.x - corner.x).abs() <= grid.cell_size());
        assert!((p.y - corner.y).abs() <= grid.cell_size());
        // And the corner itself indexes to the origin-side neighbor.
        let corner_cell = grid.cell_of(corner);
        assert_eq!(corner_cell, GridPoint::new(cell.x - 1, cell.y - 1));
    }

    #[test]
    fn test_contains_bounds() {
        let grid = Grid::new(5, 1.0, true).unwrap();
        assert!(grid.contains(GridPoint::new(0, 0)));
        assert!(grid.contains(GridPoint::new(4, 4)));
        assert!(!grid.contains(GridPoint::new(5, 0)));
        assert!(!grid.contains(GridPoint::new(0, -1)));
    }

    #[test]
    fn test_neighbors8_surround_cell() {
        let n = neighbors8(GridPoint::new(1, 1));
        assert_eq!(n.len(), 8);
        for neighbor in n {
            assert_ne!(neighbor, GridPoint::new(1, 1));
            assert!((neighbor.x - 1).abs() <= 1 && (neighbor.y - 1).abs() <= 1);
        }
    }
}
