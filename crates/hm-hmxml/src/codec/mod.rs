//! Encoding of model objects as document elements.
//!
//! Every object element carries a `name` attribute and a fixed set of child
//! elements described in the per-type modules. Variable-length polygons are
//! stored as a `DIM` array of sizes followed by a flat `VERTICES_CONNECT`
//! array. Auxiliary connectivity requested by the caller is written under
//! `<AUX name="...">` and skipped when reading.

pub(crate) mod contour;
pub(crate) mod grid2d;
pub(crate) mod grid3d;
pub(crate) mod surface;

use hm_engine::tree::Element;
use hm_engine::{Encoding, EngineError, Result};

use crate::array::{expect_len, index_array, read_indices, required};

pub(crate) const NAME_ATTR: &str = "name";
const AUX_TAG: &str = "AUX";

/// Stored object name.
pub(crate) fn object_name(element: &Element) -> Result<String> {
    element
        .attribute(NAME_ATTR)
        .map(str::to_string)
        .ok_or_else(|| EngineError::malformed(&element.name, "missing name attribute"))
}

/// Element holding a list of polygons.
pub(crate) fn polygons_element(name: &str, polygons: &[Vec<usize>], encoding: Encoding) -> Element {
    let dims: Vec<usize> = polygons.iter().map(Vec::len).collect();
    let flat: Vec<usize> = polygons.iter().flatten().copied().collect();
    Element::new(name)
        .with_child(index_array("DIM", &dims, encoding))
        .with_child(index_array("VERTICES_CONNECT", &flat, encoding))
}

/// Read `count` polygons from an element written by [`polygons_element`].
pub(crate) fn read_polygons(element: &Element, count: usize) -> Result<Vec<Vec<usize>>> {
    let dims = expect_len(read_indices(required(element, "DIM")?)?, count, "DIM")?;
    let flat = read_indices(required(element, "VERTICES_CONNECT")?)?;
    let total = dims
        .iter()
        .try_fold(0usize, |total, &dim| total.checked_add(dim))
        .ok_or_else(|| EngineError::malformed("DIM", "polygon sizes overflow"))?;
    let flat = expect_len(flat, total, "VERTICES_CONNECT")?;

    let mut polygons = Vec::with_capacity(count);
    let mut offset = 0;
    for dim in dims {
        polygons.push(flat[offset..offset + dim].to_vec());
        offset += dim;
    }
    Ok(polygons)
}

/// Flatten pairs into a `[a0, b0, a1, b1, ...]` array.
pub(crate) fn flatten_pairs(pairs: impl Iterator<Item = [usize; 2]>) -> Vec<usize> {
    pairs.flatten().collect()
}

pub(crate) fn aux_element(field: &str) -> Element {
    Element::new(AUX_TAG).with_attribute(NAME_ATTR, field)
}
