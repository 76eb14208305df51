//! `SURFACE3D` elements.
//!
//! ```text
//! <SURFACE3D name="..">
//!   <N_VERTICES/> <N_FACES/>
//!   <VERTICES/>
//!   <FACES><DIM/><VERTICES_CONNECT/></FACES>
//!   <FACE_BTYPES/>
//! </SURFACE3D>
//! ```

use hm_engine::tree::Element;
use hm_engine::{CompositeOptions, Named, Result};
use hm_model::{Category, Point3, Surface3D, SurfaceFace};

use super::{NAME_ATTR, object_name, polygons_element, read_polygons};
use crate::array::{
    btype_array, count_element, expect_len, float_array, read_btypes, read_count, read_floats,
    required, scaled_len,
};

pub(crate) fn encode(name: &str, surface: &Surface3D, options: &CompositeOptions<'_>) -> Element {
    let encoding = options.encoding;
    let coords: Vec<f64> = surface
        .points
        .iter()
        .flat_map(|p| [p.x, p.y, p.z])
        .collect();
    let faces: Vec<Vec<usize>> = surface.faces.iter().map(|f| f.vertices.clone()).collect();

    Element::new(Category::Surface3d.section())
        .with_attribute(NAME_ATTR, name)
        .with_child(count_element("N_VERTICES", surface.n_points()))
        .with_child(count_element("N_FACES", surface.n_faces()))
        .with_child(float_array("VERTICES", &coords, encoding))
        .with_child(polygons_element("FACES", &faces, encoding))
        .with_child(btype_array(
            "FACE_BTYPES",
            surface.faces.iter().map(|f| f.btype),
            encoding,
        ))
}

pub(crate) fn decode(element: &Element) -> Result<Named<Surface3D>> {
    let name = object_name(element)?;
    let n_points = read_count(element, "N_VERTICES")?;
    let n_faces = read_count(element, "N_FACES")?;
    let coords = expect_len(
        read_floats(required(element, "VERTICES")?)?,
        scaled_len(n_points, 3, "VERTICES")?,
        "VERTICES",
    )?;
    let polygons = read_polygons(required(element, "FACES")?, n_faces)?;
    let btypes = match element.child("FACE_BTYPES") {
        Some(btypes) => expect_len(read_btypes(btypes)?, n_faces, "FACE_BTYPES")?,
        None => vec![0; n_faces],
    };

    let points = coords
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect();
    let faces = polygons
        .into_iter()
        .zip(btypes)
        .map(|(vertices, btype)| SurfaceFace::new(vertices, btype))
        .collect();
    let surface = Surface3D::new(points, faces);
    surface.validate()?;
    Ok(Named::new(name, surface))
}
