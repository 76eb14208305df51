//! Property tests for grid and contour merging.

use hm_model::{Contour2D, Grid2D};
use proptest::prelude::*;

proptest! {
    #[test]
    fn merged_grid_contains_every_cell(
        nx in 1usize..5,
        ny in 1usize..5,
        shift in -3i32..3,
    ) {
        let mut merged = Grid2D::rectangle(0.0, 0.0, 1.0, 1.0, nx, ny);
        let other = Grid2D::rectangle(f64::from(shift), 2.0, 1.0, 1.0, ny, nx);
        let expected_cells = merged.n_cells() + other.n_cells();
        let point_bound = merged.n_points() + other.n_points();

        merged.add_from_grid(&other);

        prop_assert_eq!(merged.n_cells(), expected_cells);
        prop_assert!(merged.n_points() <= point_bound);
        prop_assert!(merged.validate().is_ok());
    }

    #[test]
    fn boundary_contour_of_rectangle_is_closed(nx in 1usize..6, ny in 1usize..6) {
        let grid = Grid2D::rectangle(0.0, 0.0, 2.0, 1.0, nx, ny);
        let contour: Contour2D = grid.boundary_contour();

        prop_assert_eq!(contour.n_edges(), 2 * (nx + ny));
        prop_assert_eq!(contour.n_points(), 2 * (nx + ny));
        prop_assert!(contour.validate().is_ok());
    }
}
