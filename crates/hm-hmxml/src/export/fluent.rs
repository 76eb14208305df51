//! Fluent ASCII mesh files.
//!
//! Indices and zone ids are hexadecimal and 1-based. Faces are written with
//! a node order whose right-hand normal points into cell `c0`; `c1` is 0 on
//! the boundary. Zone 1 holds the nodes, zone 2 the cells, zone 3 the
//! interior faces, and every boundary type gets its own face zone after
//! that. Boundary types named in a periodic condition become periodic and
//! periodic-shadow zones, linked by a `(18 ...)` face pair section.

use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};
use std::path::Path;

use hm_engine::{EngineError, PeriodicCondition2d, PeriodicCondition3d, Result};
use hm_model::{BoundaryTypes, Grid2D, Grid3D, Point3};

use super::write_file;

const NODE_ZONE: usize = 1;
const CELL_ZONE: usize = 2;
const INTERIOR_ZONE: usize = 3;

const BC_INTERIOR: u8 = 2;
const BC_WALL: u8 = 3;
const BC_PERIODIC_SHADOW: u8 = 8;
const BC_PERIODIC: u8 = 12;

struct Face {
    nodes: Vec<usize>,
    c0: usize,
    c1: usize,
}

impl Face {
    /// Orient a face stored with its left cell first.
    fn new(vertices: &[usize], left: Option<usize>, right: Option<usize>) -> Self {
        match left {
            Some(left) => {
                let mut nodes = vertices.to_vec();
                nodes.reverse();
                Self {
                    nodes,
                    c0: left + 1,
                    c1: right.map_or(0, |c| c + 1),
                }
            }
            None => Self {
                nodes: vertices.to_vec(),
                c0: right.map_or(0, |c| c + 1),
                c1: 0,
            },
        }
    }
}

struct FaceZone {
    id: usize,
    bc: u8,
    name: String,
    faces: Vec<Face>,
    /// Global index of the zone's first face.
    first: usize,
}

struct PeriodicPairs {
    periodic_zone: usize,
    shadow_zone: usize,
    pairs: Vec<(usize, usize)>,
}

struct FluentMesh {
    dimension: u8,
    points: Vec<[f64; 3]>,
    cell_types: Vec<u8>,
    zones: Vec<FaceZone>,
    periodic: Vec<PeriodicPairs>,
}

fn zone_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Assemble face zones: interior first, then boundary types in ascending
/// order. `role` decides the boundary condition of each boundary type.
fn build_zones(
    interior: Vec<Face>,
    boundary: BTreeMap<i32, Vec<Face>>,
    boundary_types: &BoundaryTypes,
    role: impl Fn(i32) -> u8,
) -> (Vec<FaceZone>, HashMap<i32, usize>) {
    let mut zones = Vec::new();
    let mut next_face = 1;
    if !interior.is_empty() {
        next_face += interior.len();
        zones.push(FaceZone {
            id: INTERIOR_ZONE,
            bc: BC_INTERIOR,
            name: "default-interior".to_string(),
            faces: interior,
            first: 1,
        });
    }
    let mut by_btype = HashMap::new();
    for (offset, (btype, faces)) in boundary.into_iter().enumerate() {
        let id = INTERIOR_ZONE + 1 + offset;
        by_btype.insert(btype, zones.len());
        let first = next_face;
        next_face += faces.len();
        zones.push(FaceZone {
            id,
            bc: role(btype),
            name: zone_name(&boundary_types.zone_name(btype)),
            faces,
            first,
        });
    }
    (zones, by_btype)
}

fn periodic_role(btype: i32, periodic: &[i32], shadow: &[i32]) -> u8 {
    if periodic.contains(&btype) {
        BC_PERIODIC
    } else if shadow.contains(&btype) {
        BC_PERIODIC_SHADOW
    } else {
        BC_WALL
    }
}

fn periodic_zones<'z>(
    target: &'static str,
    zones: &'z [FaceZone],
    by_btype: &HashMap<i32, usize>,
    periodic: i32,
    shadow: i32,
) -> Result<(&'z FaceZone, &'z FaceZone)> {
    let zone = |btype: i32| {
        by_btype
            .get(&btype)
            .map(|&i| &zones[i])
            .ok_or_else(|| EngineError::Unsupported {
                target,
                reason: format!("no boundary faces with type {btype}"),
            })
    };
    let (periodic_zone, shadow_zone) = (zone(periodic)?, zone(shadow)?);
    if periodic_zone.faces.len() != shadow_zone.faces.len() {
        return Err(EngineError::Unsupported {
            target,
            reason: format!(
                "periodic boundary {periodic} has {} faces but shadow {shadow} has {}",
                periodic_zone.faces.len(),
                shadow_zone.faces.len()
            ),
        });
    }
    Ok((periodic_zone, shadow_zone))
}

/// Boundary edges oriented with the grid on their left, ordered along
/// connected chains.
fn chain_order(edges: Vec<[usize; 2]>) -> Vec<[usize; 2]> {
    let by_start: HashMap<usize, usize> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| (e[0], i))
        .collect();
    let ends: Vec<usize> = edges.iter().map(|e| e[1]).collect();
    let mut visited = vec![false; edges.len()];
    let mut ordered = Vec::with_capacity(edges.len());

    let open_starts = (0..edges.len()).filter(|&i| !ends.contains(&edges[i][0]));
    let all = 0..edges.len();
    for start in open_starts.chain(all) {
        let mut current = Some(start);
        while let Some(i) = current {
            if visited[i] {
                break;
            }
            visited[i] = true;
            ordered.push(edges[i]);
            current = by_start.get(&edges[i][1]).copied();
        }
    }
    ordered
}

pub(super) fn write_grid2d(
    path: &Path,
    grid: &Grid2D,
    boundary_types: &BoundaryTypes,
    periodic: &[PeriodicCondition2d],
) -> Result<()> {
    let (edges, _) = grid.edge_table();
    let mut interior = Vec::new();
    let mut boundary_edges: BTreeMap<i32, Vec<[usize; 2]>> = BTreeMap::new();
    for edge in &edges {
        if edge.is_boundary() {
            let [a, b] = edge.vertices;
            let oriented = if edge.left.is_some() { [a, b] } else { [b, a] };
            boundary_edges
                .entry(grid.boundary_type(a, b))
                .or_default()
                .push(oriented);
        } else {
            interior.push(Face::new(&edge.vertices, edge.left, edge.right));
        }
    }

    let mut boundary = BTreeMap::new();
    for (btype, group) in boundary_edges {
        let faces: Vec<Face> = chain_order(group)
            .iter()
            .map(|e| Face::new(e, cell_left_of(&edges, *e), None))
            .collect();
        boundary.insert(btype, faces);
    }

    let periodic_btypes: Vec<i32> = periodic.iter().map(|c| c.periodic).collect();
    let shadow_btypes: Vec<i32> = periodic.iter().map(|c| c.shadow).collect();
    let (zones, by_btype) = build_zones(interior, boundary, boundary_types, |btype| {
        periodic_role(btype, &periodic_btypes, &shadow_btypes)
    });

    let mut pairs = Vec::new();
    for condition in periodic {
        let (periodic_zone, shadow_zone) =
            periodic_zones("msh", &zones, &by_btype, condition.periodic, condition.shadow)?;
        let n = periodic_zone.faces.len();
        pairs.push(PeriodicPairs {
            periodic_zone: periodic_zone.id,
            shadow_zone: shadow_zone.id,
            pairs: (0..n)
                .map(|i| {
                    let j = if condition.reversed { n - 1 - i } else { i };
                    (periodic_zone.first + i, shadow_zone.first + j)
                })
                .collect(),
        });
    }

    let cell_types = grid
        .cells
        .iter()
        .map(|c| match c.len() {
            3 => 1,
            4 => 3,
            _ => 7,
        })
        .collect();
    let mesh = FluentMesh {
        dimension: 2,
        points: grid.points.iter().map(|p| [p.x, p.y, 0.0]).collect(),
        cell_types,
        zones,
        periodic: pairs,
    };
    write_file(path, |out| write_mesh(out, &mesh))
}

/// Cell on the left of a boundary edge.
fn cell_left_of(edges: &[hm_model::GridEdge], oriented: [usize; 2]) -> Option<usize> {
    edges.iter().find_map(|e| {
        if e.vertices == oriented {
            e.left
        } else if e.vertices == [oriented[1], oriented[0]] {
            e.right
        } else {
            None
        }
    })
}

pub(super) fn write_grid3d(
    path: &Path,
    grid: &Grid3D,
    boundary_types: &BoundaryTypes,
    periodic: &[PeriodicCondition3d],
) -> Result<()> {
    let mut interior = Vec::new();
    let mut boundary: BTreeMap<i32, Vec<Face>> = BTreeMap::new();
    let mut centers: BTreeMap<i32, Vec<Point3>> = BTreeMap::new();
    for face in &grid.faces {
        let record = Face::new(&face.vertices, face.left, face.right);
        if face.is_boundary() {
            boundary.entry(face.btype).or_default().push(record);
            centers
                .entry(face.btype)
                .or_default()
                .push(face_center(grid, &face.vertices));
        } else {
            interior.push(record);
        }
    }

    let periodic_btypes: Vec<i32> = periodic.iter().map(|c| c.periodic).collect();
    let shadow_btypes: Vec<i32> = periodic.iter().map(|c| c.shadow).collect();
    let (zones, by_btype) = build_zones(interior, boundary, boundary_types, |btype| {
        periodic_role(btype, &periodic_btypes, &shadow_btypes)
    });

    let tolerance = 1e-6 * bounding_diagonal(&grid.points).max(1e-12);
    let mut pairs = Vec::new();
    for condition in periodic {
        let (periodic_zone, shadow_zone) =
            periodic_zones("msh3d", &zones, &by_btype, condition.periodic, condition.shadow)?;
        let shift = [
            condition.shadow_point.x - condition.periodic_point.x,
            condition.shadow_point.y - condition.periodic_point.y,
            condition.shadow_point.z - condition.periodic_point.z,
        ];
        let from = centers.get(&condition.periodic).map_or(&[][..], Vec::as_slice);
        let to = centers.get(&condition.shadow).map_or(&[][..], Vec::as_slice);
        let matched = match_centers(from, to, shift, tolerance).ok_or_else(|| {
            EngineError::Unsupported {
                target: "msh3d",
                reason: format!(
                    "faces of boundary {} do not map onto boundary {}",
                    condition.periodic, condition.shadow
                ),
            }
        })?;
        pairs.push(PeriodicPairs {
            periodic_zone: periodic_zone.id,
            shadow_zone: shadow_zone.id,
            pairs: matched
                .into_iter()
                .enumerate()
                .map(|(i, j)| (periodic_zone.first + i, shadow_zone.first + j))
                .collect(),
        });
    }

    let cell_types = grid
        .cell_faces()
        .iter()
        .zip(grid.cell_vertices())
        .map(|(faces, vertices)| match (faces.len(), vertices.len()) {
            (4, 4) => 2,
            (6, 8) => 4,
            (5, 5) => 5,
            (5, 6) => 6,
            _ => 7,
        })
        .collect();
    let mesh = FluentMesh {
        dimension: 3,
        points: grid.points.iter().map(|p| [p.x, p.y, p.z]).collect(),
        cell_types,
        zones,
        periodic: pairs,
    };
    write_file(path, |out| write_mesh(out, &mesh))
}

fn face_center(grid: &Grid3D, vertices: &[usize]) -> Point3 {
    let n = vertices.len().max(1) as f64;
    let sum = vertices.iter().fold([0.0; 3], |acc, &v| {
        let p = grid.points[v];
        [acc[0] + p.x, acc[1] + p.y, acc[2] + p.z]
    });
    Point3::new(sum[0] / n, sum[1] / n, sum[2] / n)
}

fn bounding_diagonal(points: &[Point3]) -> f64 {
    let mut lo = [f64::INFINITY; 3];
    let mut hi = [f64::NEG_INFINITY; 3];
    for p in points {
        for (k, value) in [p.x, p.y, p.z].into_iter().enumerate() {
            lo[k] = lo[k].min(value);
            hi[k] = hi[k].max(value);
        }
    }
    if points.is_empty() {
        return 0.0;
    }
    (0..3).map(|k| (hi[k] - lo[k]).powi(2)).sum::<f64>().sqrt()
}

/// For every center in `from`, the index of the center in `to` it maps onto
/// after translation by `shift`. Each target is used at most once.
fn match_centers(
    from: &[Point3],
    to: &[Point3],
    shift: [f64; 3],
    tolerance: f64,
) -> Option<Vec<usize>> {
    let mut used = vec![false; to.len()];
    let mut matched = Vec::with_capacity(from.len());
    for c in from {
        let moved = [c.x + shift[0], c.y + shift[1], c.z + shift[2]];
        let (best, distance) = to
            .iter()
            .enumerate()
            .filter(|(j, _)| !used[*j])
            .map(|(j, s)| {
                let d = (s.x - moved[0]).powi(2)
                    + (s.y - moved[1]).powi(2)
                    + (s.z - moved[2]).powi(2);
                (j, d.sqrt())
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if distance > tolerance {
            return None;
        }
        used[best] = true;
        matched.push(best);
    }
    Some(matched)
}

fn write_mesh(out: &mut impl Write, mesh: &FluentMesh) -> io::Result<()> {
    let dim = mesh.dimension;
    let n_points = mesh.points.len();
    let n_cells = mesh.cell_types.len();
    let n_faces: usize = mesh.zones.iter().map(|z| z.faces.len()).sum();

    writeln!(out, "(0 \"HybMesh export\")")?;
    writeln!(out, "(2 {dim})")?;

    writeln!(out, "(10 (0 1 {n_points:x} 0 {dim}))")?;
    writeln!(out, "(10 ({NODE_ZONE:x} 1 {n_points:x} 1 {dim})(")?;
    for [x, y, z] in &mesh.points {
        if dim == 2 {
            writeln!(out, "{x} {y}")?;
        } else {
            writeln!(out, "{x} {y} {z}")?;
        }
    }
    writeln!(out, "))")?;

    writeln!(out, "(12 (0 1 {n_cells:x} 0))")?;
    writeln!(out, "(12 ({CELL_ZONE:x} 1 {n_cells:x} 1 0)(")?;
    for chunk in mesh.cell_types.chunks(20) {
        let line: Vec<String> = chunk.iter().map(|t| format!("{t:x}")).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    writeln!(out, "))")?;

    writeln!(out, "(13 (0 1 {n_faces:x} 0))")?;
    for zone in &mesh.zones {
        let last = zone.first + zone.faces.len() - 1;
        writeln!(
            out,
            "(13 ({:x} {:x} {last:x} {:x} 0)(",
            zone.id, zone.first, zone.bc
        )?;
        for face in &zone.faces {
            write!(out, "{:x}", face.nodes.len())?;
            for node in &face.nodes {
                write!(out, " {:x}", node + 1)?;
            }
            writeln!(out, " {:x} {:x}", face.c0, face.c1)?;
        }
        writeln!(out, "))")?;
    }

    for periodic in &mesh.periodic {
        writeln!(
            out,
            "(18 (1 {:x} {:x} {:x})(",
            periodic.pairs.len(),
            periodic.periodic_zone,
            periodic.shadow_zone
        )?;
        for (p, s) in &periodic.pairs {
            writeln!(out, "{p:x} {s:x}")?;
        }
        writeln!(out, "))")?;
    }

    writeln!(out, "(45 ({CELL_ZONE:x} fluid fluid)())")?;
    for zone in &mesh.zones {
        let kind = match zone.bc {
            BC_INTERIOR => "interior",
            BC_PERIODIC => "periodic",
            BC_PERIODIC_SHADOW => "periodic-shadow",
            _ => "wall",
        };
        writeln!(out, "(45 ({:x} {kind} {})())", zone.id, zone.name)?;
    }
    Ok(())
}
