#![warn(missing_docs)]

//! Perceptual field construction.
//!
//! The perceptual field is the instantaneous occupancy evidence of one scan:
//! the union of all grid cells the sensor rays pass through, clipped to the
//! grid bounds. Nothing is persisted here; a mapping consumer merges fields
//! across ticks.

use std::collections::HashSet;

use super::{Grid, WorldPoint, raster::cells_on_line};

/// One tick's occupancy evidence, as `(row, col)` indices inside the grid.
pub type PerceptualField = HashSet<(usize, usize)>;

/// Unions the rasterized cells of every robot→endpoint ray, discarding cells
/// outside `[0, size)` on either axis.
///
/// Ray endpoints must already be expressed in the same frame as `robot`.
/// The result does not depend on ray order, and duplicate cells across rays
/// collapse naturally. No rays means an empty field.
pub fn perceptual_field(
    grid: &Grid,
    robot: WorldPoint,
    ray_endpoints: &[WorldPoint],
) -> PerceptualField {
    let mut field = PerceptualField::new();
    let size = grid.size() as i32;
    for endpoint in ray_endpoints {
        for (col, row) in cells_on_line(grid, robot, *endpoint) {
            if (0..size).contains(&col) && (0..size).contains(&row) {
                field.insert((row as usize, col as usize));
            }
        }
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::new(8, 1.0, false).unwrap()
    }

    #[test]
    fn test_no_rays_empty_field() {
        let field = perceptual_field(&grid(), WorldPoint::new(3.5, 3.5), &[]);
        assert!(field.is_empty());
    }

    #[test]
    fn test_single_ray_matches_rasterization() {
        let g = grid();
        let robot = WorldPoint::new(0.5, 0.5);
        let endpoint = WorldPoint::new(3.5, 0.5);
        let field = perceptual_field(&g, robot, &[endpoint]);
        // Rows and columns transpose relative to the raw (col, row) raster
        // output.
        let expected: PerceptualField = cells_on_line(&g, robot, endpoint)
            .into_iter()
            .map(|(col, row)| (row as usize, col as usize))
            .collect();
        assert_eq!(field, expected);
    }

    #[test]
    fn test_order_independent_union() {
        let g = grid();
        let robot = WorldPoint::new(2.5, 2.5);
        let rays = [
            WorldPoint::new(6.5, 2.5),
            WorldPoint::new(2.5, 6.5),
            WorldPoint::new(5.5, 5.5),
        ];
        let forward = perceptual_field(&g, robot, &rays);
        let reversed: Vec<_> = rays.iter().rev().copied().collect();
        assert_eq!(forward, perceptual_field(&g, robot, &reversed));
    }

    #[test]
    fn test_duplicate_rays_collapse() {
        let g = grid();
        let robot = WorldPoint::new(1.5, 1.5);
        let ray = WorldPoint::new(4.5, 1.5);
        let once = perceptual_field(&g, robot, &[ray]);
        let twice = perceptual_field(&g, robot, &[ray, ray]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_out_of_bounds_cells_discarded() {
        let g = grid();
        let robot = WorldPoint::new(6.5, 6.5);
        // Endpoint far outside the 8x8 grid.
        let field = perceptual_field(&g, robot, &[WorldPoint::new(15.5, 6.5)]);
        assert!(!field.is_empty());
        for &(row, col) in &field {
            assert!(row < g.size() && col < g.size());
        }
        // The in-bounds prefix of the ray survives.
        assert!(field.contains(&(6, 6)));
        assert!(field.contains(&(6, 7)));
    }
}
