//! GridGen plain text grids: a point list followed by 1-based cell loops.

use std::io::Write;
use std::path::Path;

use hm_engine::Result;
use hm_model::Grid2D;

use super::write_file;

pub(super) fn write_grid2d(path: &Path, grid: &Grid2D) -> Result<()> {
    write_file(path, |out| {
        writeln!(out, "{}", grid.n_points())?;
        for p in &grid.points {
            writeln!(out, "{} {}", p.x, p.y)?;
        }
        writeln!(out, "{}", grid.n_cells())?;
        for cell in &grid.cells {
            write!(out, "{}", cell.len())?;
            for v in cell {
                write!(out, " {}", v + 1)?;
            }
            writeln!(out)?;
        }
        Ok(())
    })
}
