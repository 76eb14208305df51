//! `GRID3D` elements.
//!
//! ```text
//! <GRID3D name="..">
//!   <N_VERTICES/> <N_FACES/> <N_CELLS/>
//!   <VERTICES/>                       x0 y0 z0 ...
//!   <FACES><DIM/><VERTICES_CONNECT/></FACES>
//!   <FACE_CELLS/>                     left right per face, -1 for none
//!   <FACE_BTYPES/>                    one boundary type per face
//!   <AUX name="cell-face|cell-vert"/>
//! </GRID3D>
//! ```

use hm_engine::tree::Element;
use hm_engine::{AuxField, CompositeOptions, Named, ProgressReporter, Result};
use hm_model::{Category, Grid3D, GridFace, Point3};
use tracing::debug;

use super::{NAME_ATTR, object_name, polygons_element, read_polygons};
use crate::array::{
    btype_array, count_element, expect_len, float_array, int_array, optional_index, read_btypes,
    read_count, read_floats, read_optional_indices, required, scaled_len,
};

pub(crate) fn encode(name: &str, grid: &Grid3D, options: &CompositeOptions<'_>) -> Element {
    let encoding = options.encoding;
    let coords: Vec<f64> = grid
        .points
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect();
    let faces: Vec<Vec<usize>> = grid.faces.iter().map(|f| f.vertices.clone()).collect();
    let face_cells: Vec<i64> = grid
        .faces
        .iter()
        .flat_map(|f| [optional_index(f.left), optional_index(f.right)])
        .collect();

    let mut element = Element::new(Category::Grid3d.section())
        .with_attribute(NAME_ATTR, name)
        .with_child(count_element("N_VERTICES", grid.n_points()))
        .with_child(count_element("N_FACES", grid.n_faces()))
        .with_child(count_element("N_CELLS", grid.n_cells()))
        .with_child(float_array("VERTICES", &coords, encoding))
        .with_child(polygons_element("FACES", &faces, encoding))
        .with_child(int_array("FACE_CELLS", &face_cells, encoding))
        .with_child(btype_array(
            "FACE_BTYPES",
            grid.faces.iter().map(|f| f.btype),
            encoding,
        ));

    for &field in options.aux_fields {
        let table = match field {
            AuxField::CellFaces => grid.cell_faces(),
            AuxField::CellVertices => grid.cell_vertices(),
            AuxField::EdgeVertices | AuxField::EdgeCells | AuxField::CellEdges => {
                debug!(field = field.as_str(), grid = name, "skipping 2d field for 3d grid");
                continue;
            }
        };
        element.push(
            polygons_element("AUX", &table, encoding).with_attribute(NAME_ATTR, field.as_str()),
        );
    }
    element
}

pub(crate) fn decode(element: &Element, progress: ProgressReporter<'_>) -> Result<Named<Grid3D>> {
    let name = object_name(element)?;
    progress.report("Reading vertices", &name, 0.0, false)?;
    let n_points = read_count(element, "N_VERTICES")?;
    let n_faces = read_count(element, "N_FACES")?;
    let n_cells = read_count(element, "N_CELLS")?;
    let coords = expect_len(
        read_floats(required(element, "VERTICES")?)?,
        scaled_len(n_points, 3, "VERTICES")?,
        "VERTICES",
    )?;
    let points = coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();

    progress.report("Reading faces", &name, 0.3, false)?;
    let polygons = read_polygons(required(element, "FACES")?, n_faces)?;
    let cells = expect_len(
        read_optional_indices(required(element, "FACE_CELLS")?)?,
        scaled_len(n_faces, 2, "FACE_CELLS")?,
        "FACE_CELLS",
    )?;
    let btypes = match element.child("FACE_BTYPES") {
        Some(btypes) => expect_len(read_btypes(btypes)?, n_faces, "FACE_BTYPES")?,
        None => vec![0; n_faces],
    };

    progress.report("Assembling cells", &name, 0.7, false)?;
    let faces = polygons
        .into_iter()
        .zip(cells.chunks_exact(2))
        .zip(btypes)
        .map(|((vertices, adjacent), btype)| {
            GridFace::new(vertices, adjacent[0], adjacent[1], btype)
        })
        .collect();
    let grid = Grid3D::new(points, faces, n_cells);
    grid.validate()?;
    progress.report("Grid ready", &name, 1.0, false)?;
    Ok(Named::new(name, grid))
}
