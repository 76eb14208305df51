//! Gmsh 2.2 ASCII meshes.
//!
//! Boundary elements get physical tag `btype + 1` in dimension `d - 1`; the
//! domain is physical tag 1 in dimension `d`. Physical names come from the
//! project's boundary table.

use std::collections::{BTreeSet, HashSet};
use std::io::{self, Write};
use std::path::Path;

use hm_engine::{EngineError, Result};
use hm_model::{BoundaryTypes, Grid2D, Grid3D};

use super::{fan_triangles, outward_cell_faces, write_file};

const LINE: u8 = 1;
const TRIANGLE: u8 = 2;
const QUADRANGLE: u8 = 3;
const TETRAHEDRON: u8 = 4;
const HEXAHEDRON: u8 = 5;
const PRISM: u8 = 6;
const PYRAMID: u8 = 7;

const DOMAIN_TAG: i64 = 1;

struct MeshElement {
    kind: u8,
    physical: i64,
    nodes: Vec<usize>,
}

fn boundary_tag(btype: i32) -> i64 {
    i64::from(btype) + 1
}

/// Elements for a polygon: triangles and quads as is, larger polygons
/// fan-split into triangles.
fn polygon_elements(polygon: &[usize], physical: i64) -> Vec<MeshElement> {
    match polygon.len() {
        3 => vec![MeshElement {
            kind: TRIANGLE,
            physical,
            nodes: polygon.to_vec(),
        }],
        4 => vec![MeshElement {
            kind: QUADRANGLE,
            physical,
            nodes: polygon.to_vec(),
        }],
        _ => fan_triangles(polygon)
            .into_iter()
            .map(|tri| MeshElement {
                kind: TRIANGLE,
                physical,
                nodes: tri.to_vec(),
            })
            .collect(),
    }
}

fn write_mesh(
    out: &mut impl Write,
    dimension: u8,
    btypes: &BTreeSet<i32>,
    boundary_types: &BoundaryTypes,
    points: &[[f64; 3]],
    elements: &[MeshElement],
) -> io::Result<()> {
    writeln!(out, "$MeshFormat")?;
    writeln!(out, "2.2 0 8")?;
    writeln!(out, "$EndMeshFormat")?;

    writeln!(out, "$PhysicalNames")?;
    writeln!(out, "{}", btypes.len() + 1)?;
    for &btype in btypes {
        writeln!(
            out,
            "{} {} \"{}\"",
            dimension - 1,
            boundary_tag(btype),
            boundary_types.zone_name(btype)
        )?;
    }
    writeln!(out, "{dimension} {DOMAIN_TAG} \"domain\"")?;
    writeln!(out, "$EndPhysicalNames")?;

    writeln!(out, "$Nodes")?;
    writeln!(out, "{}", points.len())?;
    for (i, [x, y, z]) in points.iter().enumerate() {
        writeln!(out, "{} {x} {y} {z}", i + 1)?;
    }
    writeln!(out, "$EndNodes")?;

    writeln!(out, "$Elements")?;
    writeln!(out, "{}", elements.len())?;
    for (i, element) in elements.iter().enumerate() {
        write!(
            out,
            "{} {} 2 {} {}",
            i + 1,
            element.kind,
            element.physical,
            element.physical
        )?;
        for node in &element.nodes {
            write!(out, " {}", node + 1)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "$EndElements")
}

pub(super) fn write_grid2d(
    path: &Path,
    grid: &Grid2D,
    boundary_types: &BoundaryTypes,
) -> Result<()> {
    let mut btypes = BTreeSet::new();
    let mut elements = Vec::new();
    for edge in grid.boundary_edges() {
        let [a, b] = edge.vertices;
        let btype = grid.boundary_type(a, b);
        btypes.insert(btype);
        elements.push(MeshElement {
            kind: LINE,
            physical: boundary_tag(btype),
            nodes: vec![a, b],
        });
    }
    for cell in &grid.cells {
        elements.extend(polygon_elements(cell, DOMAIN_TAG));
    }
    let points: Vec<[f64; 3]> = grid.points.iter().map(|p| [p.x, p.y, 0.0]).collect();
    write_file(path, |out| {
        write_mesh(out, 2, &btypes, boundary_types, &points, &elements)
    })
}

pub(super) fn write_grid3d(
    path: &Path,
    grid: &Grid3D,
    boundary_types: &BoundaryTypes,
) -> Result<()> {
    let mut btypes = BTreeSet::new();
    let mut elements = Vec::new();
    for (_, face) in grid.boundary_faces() {
        btypes.insert(face.btype);
        let mut vertices = face.vertices.clone();
        if face.left.is_none() {
            vertices.reverse();
        }
        elements.extend(polygon_elements(&vertices, boundary_tag(face.btype)));
    }
    for (index, faces) in outward_cell_faces(grid).iter().enumerate() {
        let (kind, nodes) = classify_cell(faces).ok_or_else(|| EngineError::Unsupported {
            target: "gmsh3d",
            reason: format!(
                "cell {index} with {} faces is not a tetrahedron, pyramid, prism or hexahedron",
                faces.len()
            ),
        })?;
        elements.push(MeshElement {
            kind,
            physical: DOMAIN_TAG,
            nodes,
        });
    }
    let points: Vec<[f64; 3]> = grid.points.iter().map(|p| [p.x, p.y, p.z]).collect();
    write_file(path, |out| {
        write_mesh(out, 3, &btypes, boundary_types, &points, &elements)
    })
}

/// Gmsh element type and node order for a cell given by outward faces.
///
/// The base face is reversed so that its normal points into the cell, then
/// completed either by the apex or by following the edge leaving each base
/// vertex.
fn classify_cell(faces: &[Vec<usize>]) -> Option<(u8, Vec<usize>)> {
    let vertices: BTreeSet<usize> = faces.iter().flatten().copied().collect();
    let triangles = faces.iter().filter(|f| f.len() == 3).count();
    let quads = faces.iter().filter(|f| f.len() == 4).count();

    let (kind, base_size) = match (vertices.len(), faces.len(), triangles, quads) {
        (4, 4, 4, 0) => (TETRAHEDRON, 3),
        (5, 5, 4, 1) => (PYRAMID, 4),
        (6, 5, 2, 3) => (PRISM, 3),
        (8, 6, 0, 6) => (HEXAHEDRON, 4),
        _ => return None,
    };
    let mut base = faces.iter().find(|f| f.len() == base_size)?.clone();
    base.reverse();

    let mut nodes = base.clone();
    if vertices.len() == base.len() + 1 {
        nodes.push(*vertices.iter().find(|&&v| !base.contains(&v))?);
        return Some((kind, nodes));
    }

    let edges: HashSet<(usize, usize)> = faces
        .iter()
        .flat_map(|f| (0..f.len()).map(move |i| (f[i], f[(i + 1) % f.len()])))
        .flat_map(|(a, b)| [(a, b), (b, a)])
        .collect();
    for &v in &base {
        let mut opposite = vertices
            .iter()
            .filter(|&&w| !base.contains(&w) && edges.contains(&(v, w)));
        let top = *opposite.next()?;
        if opposite.next().is_some() {
            return None;
        }
        nodes.push(top);
    }
    Some((kind, nodes))
}
