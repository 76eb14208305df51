//! Legacy ASCII VTK unstructured grids.

use std::io::{self, Write};
use std::path::Path;

use hm_engine::Result;
use hm_model::{Contour2D, Grid2D, Grid3D, Surface3D};

use super::{outward_cell_faces, write_file};

const VTK_LINE: u8 = 3;
const VTK_TRIANGLE: u8 = 5;
const VTK_POLYGON: u8 = 7;
const VTK_QUAD: u8 = 9;
const VTK_POLYHEDRON: u8 = 42;

fn header(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "{title}")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET UNSTRUCTURED_GRID")
}

fn points(
    out: &mut impl Write,
    coords: impl ExactSizeIterator<Item = [f64; 3]>,
) -> io::Result<()> {
    writeln!(out, "POINTS {} double", coords.len())?;
    for [x, y, z] in coords {
        writeln!(out, "{x} {y} {z}")?;
    }
    Ok(())
}

/// `CELLS` and `CELL_TYPES` sections for cells given as flat entry lists.
fn cells(out: &mut impl Write, entries: &[(Vec<usize>, u8)]) -> io::Result<()> {
    let size: usize = entries.iter().map(|(e, _)| e.len() + 1).sum();
    writeln!(out, "CELLS {} {size}", entries.len())?;
    for (entry, _) in entries {
        write!(out, "{}", entry.len())?;
        for value in entry {
            write!(out, " {value}")?;
        }
        writeln!(out)?;
    }
    writeln!(out, "CELL_TYPES {}", entries.len())?;
    for (_, kind) in entries {
        writeln!(out, "{kind}")?;
    }
    Ok(())
}

fn btype_data(out: &mut impl Write, btypes: &[i32]) -> io::Result<()> {
    writeln!(out, "CELL_DATA {}", btypes.len())?;
    writeln!(out, "SCALARS btype int 1")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for btype in btypes {
        writeln!(out, "{btype}")?;
    }
    Ok(())
}

fn polygon_entry(vertices: &[usize]) -> (Vec<usize>, u8) {
    let kind = match vertices.len() {
        3 => VTK_TRIANGLE,
        4 => VTK_QUAD,
        _ => VTK_POLYGON,
    };
    (vertices.to_vec(), kind)
}

pub(super) fn write_contour(path: &Path, contour: &Contour2D) -> Result<()> {
    let entries: Vec<_> = contour
        .edges
        .iter()
        .map(|e| (vec![e.start, e.end], VTK_LINE))
        .collect();
    let btypes: Vec<i32> = contour.edges.iter().map(|e| e.btype).collect();
    write_file(path, |out| {
        header(out, "HybMesh contour")?;
        points(out, contour.points.iter().map(|p| [p.x, p.y, 0.0]))?;
        cells(out, &entries)?;
        btype_data(out, &btypes)
    })
}

pub(super) fn write_grid2d(path: &Path, grid: &Grid2D) -> Result<()> {
    let entries: Vec<_> = grid.cells.iter().map(|c| polygon_entry(c)).collect();
    write_file(path, |out| {
        header(out, "HybMesh 2D grid")?;
        points(out, grid.points.iter().map(|p| [p.x, p.y, 0.0]))?;
        cells(out, &entries)
    })
}

pub(super) fn write_surface(path: &Path, surface: &Surface3D) -> Result<()> {
    let entries: Vec<_> = surface
        .faces
        .iter()
        .map(|f| polygon_entry(&f.vertices))
        .collect();
    let btypes: Vec<i32> = surface.faces.iter().map(|f| f.btype).collect();
    write_file(path, |out| {
        header(out, "HybMesh surface")?;
        points(out, surface.points.iter().map(|p| [p.x, p.y, p.z]))?;
        cells(out, &entries)?;
        btype_data(out, &btypes)
    })
}

/// Every cell is written as a polyhedron:
/// `nfaces, (npts, p0, p1, ...) per face`.
pub(super) fn write_grid3d(path: &Path, grid: &Grid3D) -> Result<()> {
    let entries: Vec<_> = outward_cell_faces(grid)
        .into_iter()
        .map(|faces| {
            let mut entry = vec![faces.len()];
            for face in faces {
                entry.push(face.len());
                entry.extend(face);
            }
            (entry, VTK_POLYHEDRON)
        })
        .collect();
    write_file(path, |out| {
        header(out, "HybMesh 3D grid")?;
        points(out, grid.points.iter().map(|p| [p.x, p.y, p.z]))?;
        cells(out, &entries)
    })
}
