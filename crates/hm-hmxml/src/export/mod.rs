//! External mesh format writers.

mod fluent;
mod ggen;
mod gmsh;
mod tecplot;
mod vtk;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use hm_engine::{
    ContourTarget, EngineError, ExternalPayload, Grid2dTarget, Grid3dTarget, ProgressReporter,
    Result, SurfaceTarget,
};
use hm_model::Grid3D;
use tracing::info;

/// Write one object to `path` in its payload's target format.
pub(crate) fn write_payload(
    payload: ExternalPayload<'_>,
    path: &Path,
    progress: ProgressReporter<'_>,
) -> Result<()> {
    let target = payload.target_name();
    progress.report("Writing file", target, 0.0, false)?;
    match payload {
        ExternalPayload::Contour {
            contour,
            target,
            boundary_types,
        } => match target {
            ContourTarget::Vtk => vtk::write_contour(path, contour),
            ContourTarget::Tecplot => tecplot::write_contour(path, contour, boundary_types),
        },
        ExternalPayload::Grid2d {
            grid,
            target,
            boundary_types,
            periodic,
        } => match target {
            Grid2dTarget::Vtk => vtk::write_grid2d(path, grid),
            Grid2dTarget::Msh => fluent::write_grid2d(path, grid, boundary_types, periodic),
            Grid2dTarget::Ggen => ggen::write_grid2d(path, grid),
            Grid2dTarget::Gmsh => gmsh::write_grid2d(path, grid, boundary_types),
            Grid2dTarget::Tecplot => tecplot::write_grid2d(path, grid, boundary_types),
        },
        ExternalPayload::Grid3d {
            grid,
            target,
            boundary_types,
            periodic,
        } => match target {
            Grid3dTarget::Vtk => vtk::write_grid3d(path, grid),
            Grid3dTarget::Msh => fluent::write_grid3d(path, grid, boundary_types, periodic),
            Grid3dTarget::Gmsh => gmsh::write_grid3d(path, grid, boundary_types),
            Grid3dTarget::Tecplot => tecplot::write_grid3d(path, grid, boundary_types),
        },
        ExternalPayload::Surface { surface, target } => match target {
            SurfaceTarget::Vtk => vtk::write_surface(path, surface),
        },
    }?;
    info!(path = %path.display(), format = target, "exported file");
    progress.report("Writing file", target, 1.0, false)
}

/// Create `path` and run `body` against a buffered writer.
fn write_file(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<()> {
    let file = File::create(path).map_err(|e| EngineError::io("create", path, e))?;
    let mut out = BufWriter::new(file);
    body(&mut out)
        .and_then(|()| out.flush())
        .map_err(|e| EngineError::io("write", path, e))
}

/// Split a polygon into a triangle fan around its first vertex.
fn fan_triangles(polygon: &[usize]) -> Vec<[usize; 3]> {
    (1..polygon.len().saturating_sub(1))
        .map(|i| [polygon[0], polygon[i], polygon[i + 1]])
        .collect()
}

/// Faces of every cell with vertex order giving an outward normal.
///
/// A face's natural normal points from its left cell to its right cell, so
/// it is reversed when seen from the right cell.
fn outward_cell_faces(grid: &Grid3D) -> Vec<Vec<Vec<usize>>> {
    let mut cells = vec![Vec::new(); grid.n_cells()];
    for face in &grid.faces {
        if let Some(cell) = face.left.and_then(|c| cells.get_mut(c)) {
            cell.push(face.vertices.clone());
        }
        if let Some(cell) = face.right.and_then(|c| cells.get_mut(c)) {
            let mut reversed = face.vertices.clone();
            reversed.reverse();
            cell.push(reversed);
        }
    }
    cells
}
