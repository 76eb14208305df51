//! `CONTOUR2D` elements.
//!
//! ```text
//! <CONTOUR2D name="..">
//!   <N_VERTICES/> <N_EDGES/>
//!   <VERTICES/>   x0 y0 x1 y1 ...
//!   <EDGES/>      start0 end0 start1 end1 ...
//!   <BTYPES/>     one boundary type per edge
//! </CONTOUR2D>
//! ```

use hm_engine::tree::Element;
use hm_engine::{CompositeOptions, Named, Result};
use hm_model::{Category, Contour2D, ContourEdge, Point2};

use super::{NAME_ATTR, flatten_pairs, object_name};
use crate::array::{
    btype_array, count_element, expect_len, float_array, index_array, read_btypes, read_count,
    read_floats, read_indices, required, scaled_len,
};

pub(crate) fn encode(name: &str, contour: &Contour2D, options: &CompositeOptions<'_>) -> Element {
    let encoding = options.encoding;
    let coords: Vec<f64> = contour.points.iter().flat_map(|p| [p.x, p.y]).collect();
    let edges = flatten_pairs(contour.edges.iter().map(|e| [e.start, e.end]));

    Element::new(Category::Contour.section())
        .with_attribute(NAME_ATTR, name)
        .with_child(count_element("N_VERTICES", contour.n_points()))
        .with_child(count_element("N_EDGES", contour.n_edges()))
        .with_child(float_array("VERTICES", &coords, encoding))
        .with_child(index_array("EDGES", &edges, encoding))
        .with_child(btype_array(
            "BTYPES",
            contour.edges.iter().map(|e| e.btype),
            encoding,
        ))
}

pub(crate) fn decode(element: &Element) -> Result<Named<Contour2D>> {
    let name = object_name(element)?;
    let n_points = read_count(element, "N_VERTICES")?;
    let n_edges = read_count(element, "N_EDGES")?;

    let coords = expect_len(
        read_floats(required(element, "VERTICES")?)?,
        scaled_len(n_points, 2, "VERTICES")?,
        "VERTICES",
    )?;
    let ends = expect_len(
        read_indices(required(element, "EDGES")?)?,
        scaled_len(n_edges, 2, "EDGES")?,
        "EDGES",
    )?;
    let btypes = match element.child("BTYPES") {
        Some(btypes) => expect_len(read_btypes(btypes)?, n_edges, "BTYPES")?,
        None => vec![0; n_edges],
    };

    let points = coords
        .chunks_exact(2)
        .map(|c| Point2::new(c[0], c[1]))
        .collect();
    let edges = ends
        .chunks_exact(2)
        .zip(btypes)
        .map(|(pair, btype)| ContourEdge::new(pair[0], pair[1], btype))
        .collect();

    let contour = Contour2D::new(points, edges);
    contour.validate()?;
    Ok(Named::new(name, contour))
}
