//! Tecplot ASCII finite-element zones.
//!
//! The main object goes into a polygon/polyhedron zone (block packing,
//! 1-based indices, 0 for "no element"). Boundary faces are repeated in one
//! extra zone per boundary type, named after the project's boundary table.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;

use hm_engine::Result;
use hm_model::{BoundaryTypes, Contour2D, Grid2D, Grid3D};

use super::{fan_triangles, write_file};

const VALUES_PER_LINE: usize = 10;

fn block<T: Display>(
    out: &mut impl Write,
    values: impl IntoIterator<Item = T>,
) -> io::Result<()> {
    let mut column = 0;
    for value in values {
        if column > 0 {
            write!(out, " ")?;
        }
        write!(out, "{value}")?;
        column += 1;
        if column == VALUES_PER_LINE {
            writeln!(out)?;
            column = 0;
        }
    }
    if column > 0 {
        writeln!(out)?;
    }
    Ok(())
}

fn one_based(cell: Option<usize>) -> usize {
    cell.map_or(0, |c| c + 1)
}

/// Points referenced by `elements`, renumbered locally from 0.
fn local_points(elements: &[Vec<usize>]) -> (Vec<usize>, Vec<Vec<usize>>) {
    let mut renumber: HashMap<usize, usize> = HashMap::new();
    let mut used = Vec::new();
    let local = elements
        .iter()
        .map(|element| {
            element
                .iter()
                .map(|&v| {
                    *renumber.entry(v).or_insert_with(|| {
                        used.push(v);
                        used.len() - 1
                    })
                })
                .collect()
        })
        .collect();
    (used, local)
}

/// One `FELINESEG` zone for a set of 2D segments.
fn segment_zone(
    out: &mut impl Write,
    title: &str,
    coords: &[[f64; 2]],
    segments: &[Vec<usize>],
) -> io::Result<()> {
    let (used, local) = local_points(segments);
    writeln!(
        out,
        "ZONE T=\"{title}\" ZONETYPE=FELINESEG NODES={} ELEMENTS={} DATAPACKING=BLOCK",
        used.len(),
        local.len()
    )?;
    block(out, used.iter().map(|&v| coords[v][0]))?;
    block(out, used.iter().map(|&v| coords[v][1]))?;
    for segment in &local {
        writeln!(out, "{} {}", segment[0] + 1, segment[1] + 1)?;
    }
    Ok(())
}

fn grouped<T>(items: impl Iterator<Item = (i32, T)>) -> BTreeMap<i32, Vec<T>> {
    let mut groups: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    for (btype, item) in items {
        groups.entry(btype).or_default().push(item);
    }
    groups
}

pub(super) fn write_contour(
    path: &Path,
    contour: &Contour2D,
    boundary_types: &BoundaryTypes,
) -> Result<()> {
    let coords: Vec<[f64; 2]> = contour.points.iter().map(|p| [p.x, p.y]).collect();
    let segments: Vec<Vec<usize>> = contour.edges.iter().map(|e| vec![e.start, e.end]).collect();
    let groups = grouped(
        contour
            .edges
            .iter()
            .map(|e| (e.btype, vec![e.start, e.end])),
    );
    write_file(path, |out| {
        writeln!(out, "TITLE = \"HybMesh contour\"")?;
        writeln!(out, "VARIABLES = \"X\" \"Y\"")?;
        segment_zone(out, "Contour", &coords, &segments)?;
        for (btype, segments) in &groups {
            segment_zone(out, &boundary_types.zone_name(*btype), &coords, segments)?;
        }
        Ok(())
    })
}

pub(super) fn write_grid2d(
    path: &Path,
    grid: &Grid2D,
    boundary_types: &BoundaryTypes,
) -> Result<()> {
    let coords: Vec<[f64; 2]> = grid.points.iter().map(|p| [p.x, p.y]).collect();
    let edges = grid.edges();
    let groups = grouped(grid.boundary_edges().into_iter().map(|e| {
        let [a, b] = e.vertices;
        (grid.boundary_type(a, b), vec![a, b])
    }));
    write_file(path, |out| {
        writeln!(out, "TITLE = \"HybMesh 2D grid\"")?;
        writeln!(out, "VARIABLES = \"X\" \"Y\"")?;
        writeln!(
            out,
            "ZONE T=\"Grid\" ZONETYPE=FEPOLYGON NODES={} ELEMENTS={} FACES={} \
             NumConnectedBoundaryFaces=0 TotalNumBoundaryConnections=0 DATAPACKING=BLOCK",
            grid.n_points(),
            grid.n_cells(),
            edges.len()
        )?;
        block(out, coords.iter().map(|c| c[0]))?;
        block(out, coords.iter().map(|c| c[1]))?;
        writeln!(out, "# face nodes")?;
        for edge in &edges {
            writeln!(out, "{} {}", edge.vertices[0] + 1, edge.vertices[1] + 1)?;
        }
        writeln!(out, "# left elements")?;
        block(out, edges.iter().map(|e| one_based(e.left)))?;
        writeln!(out, "# right elements")?;
        block(out, edges.iter().map(|e| one_based(e.right)))?;
        for (btype, segments) in &groups {
            segment_zone(out, &boundary_types.zone_name(*btype), &coords, segments)?;
        }
        Ok(())
    })
}

pub(super) fn write_grid3d(
    path: &Path,
    grid: &Grid3D,
    boundary_types: &BoundaryTypes,
) -> Result<()> {
    let total_face_nodes: usize = grid.faces.iter().map(|f| f.vertices.len()).sum();
    let groups = grouped(grid.boundary_faces().map(|(_, face)| {
        let mut vertices = face.vertices.clone();
        if face.left.is_none() {
            vertices.reverse();
        }
        (face.btype, vertices)
    }));

    write_file(path, |out| {
        writeln!(out, "TITLE = \"HybMesh 3D grid\"")?;
        writeln!(out, "VARIABLES = \"X\" \"Y\" \"Z\"")?;
        writeln!(
            out,
            "ZONE T=\"Grid\" ZONETYPE=FEPOLYHEDRON NODES={} ELEMENTS={} FACES={} \
             TotalNumFaceNodes={total_face_nodes} NumConnectedBoundaryFaces=0 \
             TotalNumBoundaryConnections=0 DATAPACKING=BLOCK",
            grid.n_points(),
            grid.n_cells(),
            grid.n_faces()
        )?;
        block(out, grid.points.iter().map(|p| p.x))?;
        block(out, grid.points.iter().map(|p| p.y))?;
        block(out, grid.points.iter().map(|p| p.z))?;
        writeln!(out, "# node count per face")?;
        block(out, grid.faces.iter().map(|f| f.vertices.len()))?;
        writeln!(out, "# face nodes")?;
        for face in &grid.faces {
            block(out, face.vertices.iter().map(|v| v + 1))?;
        }
        writeln!(out, "# left elements")?;
        block(out, grid.faces.iter().map(|f| one_based(f.left)))?;
        writeln!(out, "# right elements")?;
        block(out, grid.faces.iter().map(|f| one_based(f.right)))?;

        for (btype, faces) in &groups {
            surface_zone(out, &boundary_types.zone_name(*btype), grid, faces)?;
        }
        Ok(())
    })
}

/// Boundary faces of one type as an `FEQUADRILATERAL` zone; triangles repeat
/// their last vertex and larger polygons are fan-split.
fn surface_zone(
    out: &mut impl Write,
    title: &str,
    grid: &Grid3D,
    faces: &[Vec<usize>],
) -> io::Result<()> {
    let quads: Vec<Vec<usize>> = faces
        .iter()
        .flat_map(|face| match face.len() {
            4 => vec![face.clone()],
            _ => fan_triangles(face)
                .into_iter()
                .map(|[a, b, c]| vec![a, b, c, c])
                .collect(),
        })
        .collect();
    let (used, local) = local_points(&quads);
    writeln!(
        out,
        "ZONE T=\"{title}\" ZONETYPE=FEQUADRILATERAL NODES={} ELEMENTS={} DATAPACKING=BLOCK",
        used.len(),
        local.len()
    )?;
    block(out, used.iter().map(|&v| grid.points[v].x))?;
    block(out, used.iter().map(|&v| grid.points[v].y))?;
    block(out, used.iter().map(|&v| grid.points[v].z))?;
    for quad in &local {
        block(out, quad.iter().map(|v| v + 1))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_grid2d_zones() {
        let mut grid = Grid2D::rectangle(0.0, 0.0, 2.0, 1.0, 2, 1);
        grid.set_boundary_type(0, 1, 1);
        let mut names = BoundaryTypes::new();
        names.insert(1, "inlet");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.dat");
        write_grid2d(&path, &grid, &names).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.contains("ZONETYPE=FEPOLYGON NODES=6 ELEMENTS=2 FACES=7"));
        assert!(text.contains("ZONE T=\"default\" ZONETYPE=FELINESEG NODES=6 ELEMENTS=5"));
        assert!(text.contains("ZONE T=\"inlet\" ZONETYPE=FELINESEG NODES=2 ELEMENTS=1"));
        assert!(text.find("\"default\"") < text.find("\"inlet\""));
    }

    #[test]
    fn test_contour_zone_per_type() {
        let mut contour = Contour2D::closed_polygon(
            vec![
                hm_model::Point2::new(0.0, 0.0),
                hm_model::Point2::new(1.0, 0.0),
                hm_model::Point2::new(0.0, 1.0),
            ],
            2,
        );
        contour.edges[0].btype = 5;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("contour.dat");
        write_contour(&path, &contour, &BoundaryTypes::new()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("ZONE T=").count(), 3);
        assert!(text.contains("ZONE T=\"boundary2\" ZONETYPE=FELINESEG NODES=3 ELEMENTS=2"));
        assert!(text.contains("ZONE T=\"boundary5\" ZONETYPE=FELINESEG NODES=2 ELEMENTS=1"));
    }
}
