//! `GRID2D` elements.
//!
//! ```text
//! <GRID2D name="..">
//!   <N_VERTICES/> <N_CELLS/> <N_EDGES/>
//!   <VERTICES/>                       x0 y0 x1 y1 ...
//!   <CELLS><DIM/><VERTICES_CONNECT/></CELLS>
//!   <BTYPE_EDGES/>                    a b btype, for typed edges only
//!   <AUX name="edge-vert|edge-cell|cell-edge"/>
//! </GRID2D>
//! ```

use hm_engine::tree::Element;
use hm_engine::{AuxField, CompositeOptions, EngineError, Named, Result};
use hm_model::{Category, Grid2D, Point2};
use tracing::debug;

use super::{NAME_ATTR, aux_element, flatten_pairs, object_name, polygons_element, read_polygons};
use crate::array::{
    count_element, expect_len, float_array, index_array, int_array, optional_index, read_count,
    read_floats, read_ints, required, scaled_len,
};

pub(crate) fn encode(name: &str, grid: &Grid2D, options: &CompositeOptions<'_>) -> Element {
    let encoding = options.encoding;
    let (edges, cell_edges) = grid.edge_table();
    let coords: Vec<f64> = grid.points.iter().flat_map(|p| [p.x, p.y]).collect();
    let typed: Vec<i64> = grid
        .typed_edges()
        .flat_map(|((a, b), btype)| [a as i64, b as i64, i64::from(btype)])
        .collect();

    let mut element = Element::new(Category::Grid2d.section())
        .with_attribute(NAME_ATTR, name)
        .with_child(count_element("N_VERTICES", grid.n_points()))
        .with_child(count_element("N_CELLS", grid.n_cells()))
        .with_child(count_element("N_EDGES", edges.len()))
        .with_child(float_array("VERTICES", &coords, encoding))
        .with_child(polygons_element("CELLS", &grid.cells, encoding))
        .with_child(int_array("BTYPE_EDGES", &typed, encoding));

    for &field in options.aux_fields {
        let aux = match field {
            AuxField::EdgeVertices => aux_element(field.as_str()).with_child(index_array(
                "VALUES",
                &flatten_pairs(edges.iter().map(|e| e.vertices)),
                encoding,
            )),
            AuxField::EdgeCells => {
                let cells: Vec<i64> = edges
                    .iter()
                    .flat_map(|e| [optional_index(e.left), optional_index(e.right)])
                    .collect();
                aux_element(field.as_str()).with_child(int_array("VALUES", &cells, encoding))
            }
            AuxField::CellEdges => {
                polygons_element("AUX", &cell_edges, encoding)
                    .with_attribute(NAME_ATTR, field.as_str())
            }
            AuxField::CellFaces | AuxField::CellVertices => {
                debug!(field = field.as_str(), grid = name, "skipping 3d field for 2d grid");
                continue;
            }
        };
        element.push(aux);
    }
    element
}

pub(crate) fn decode(element: &Element) -> Result<Named<Grid2D>> {
    let name = object_name(element)?;
    let n_points = read_count(element, "N_VERTICES")?;
    let n_cells = read_count(element, "N_CELLS")?;

    let coords = expect_len(
        read_floats(required(element, "VERTICES")?)?,
        scaled_len(n_points, 2, "VERTICES")?,
        "VERTICES",
    )?;
    let points = coords
        .chunks_exact(2)
        .map(|c| Point2::new(c[0], c[1]))
        .collect();
    let cells = read_polygons(required(element, "CELLS")?, n_cells)?;
    let mut grid = Grid2D::new(points, cells);

    if let Some(typed) = element.child("BTYPE_EDGES") {
        let values = read_ints(typed)?;
        if values.len() % 3 != 0 {
            return Err(EngineError::malformed(
                "BTYPE_EDGES",
                format!("{} values is not a list of triples", values.len()),
            ));
        }
        for triple in values.chunks_exact(3) {
            let (a, b, btype) = match (
                usize::try_from(triple[0]),
                usize::try_from(triple[1]),
                i32::try_from(triple[2]),
            ) {
                (Ok(a), Ok(b), Ok(btype)) => (a, b, btype),
                _ => {
                    return Err(EngineError::malformed(
                        "BTYPE_EDGES",
                        format!("invalid entry {triple:?}"),
                    ));
                }
            };
            grid.set_boundary_type(a, b, btype);
        }
    }

    grid.validate()?;
    Ok(Named::new(name, grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hm_engine::Encoding;

    fn typed_rectangle() -> Grid2D {
        let mut grid = Grid2D::rectangle(0.0, 0.0, 2.0, 1.0, 2, 1);
        grid.set_boundary_type(0, 1, 1);
        grid.set_boundary_type(1, 2, 1);
        grid.set_boundary_type(2, 5, 4);
        grid
    }

    #[test]
    fn test_decode_encoded_grid() {
        for encoding in [Encoding::Ascii, Encoding::Binary] {
            let options = CompositeOptions {
                encoding,
                aux_fields: &[],
            };
            let named = decode(&encode("g", &typed_rectangle(), &options)).unwrap();
            assert_eq!(named.name, "g");
            assert_eq!(named.object, typed_rectangle());
        }
    }

    #[test]
    fn test_aux_fields_are_written_and_ignored() {
        let fields = [
            AuxField::EdgeVertices,
            AuxField::EdgeCells,
            AuxField::CellEdges,
            AuxField::CellFaces,
        ];
        let options = CompositeOptions {
            encoding: Encoding::Ascii,
            aux_fields: &fields,
        };
        let element = encode("g", &typed_rectangle(), &options);
        let names: Vec<&str> = element
            .children_named("AUX")
            .filter_map(|aux| aux.attribute("name"))
            .collect();
        assert_eq!(names, ["edge-vert", "edge-cell", "cell-edge"]);

        let edge_cells = element
            .children_named("AUX")
            .find(|aux| aux.attribute("name") == Some("edge-cell"))
            .and_then(|aux| aux.child("VALUES"))
            .unwrap();
        assert_eq!(read_ints(edge_cells).unwrap().len(), 2 * 7);

        assert_eq!(decode(&element).unwrap().object, typed_rectangle());
    }

    #[test]
    fn test_cell_count_mismatch_is_malformed() {
        let mut element = encode("g", &typed_rectangle(), &CompositeOptions::default());
        if let Some(count) = element.child_mut("N_CELLS") {
            count.text = "3".to_string();
        }
        assert!(matches!(decode(&element), Err(EngineError::Malformed { .. })));
    }
}
