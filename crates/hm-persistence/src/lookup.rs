//! Contour lookup with grid-boundary fallback.

use std::borrow::Cow;

use hm_model::{Contour2D, Framework};

/// Prefix of the display name given to a grid's boundary contour.
pub const GRID_CONTOUR_PREFIX: &str = "ContourOf";

/// Result of resolving a contour name.
#[derive(Debug, Clone, PartialEq)]
pub enum ContourLookup<'a> {
    Found {
        contour: Cow<'a, Contour2D>,
        display_name: String,
    },
    NotFound,
}

/// Resolve `name` as a standalone contour, or else as the boundary of the
/// 2D grid with that name.
///
/// Standalone contours are borrowed and keep their name. A grid boundary is
/// built on demand and named `ContourOf<name>`.
pub fn lookup_contour<'a>(framework: &'a Framework, name: &str) -> ContourLookup<'a> {
    if let Some(contour) = framework.contours.get(name) {
        return ContourLookup::Found {
            contour: Cow::Borrowed(contour),
            display_name: name.to_string(),
        };
    }
    match framework.grids2d.get(name) {
        Some(grid) => ContourLookup::Found {
            contour: Cow::Owned(grid.boundary_contour()),
            display_name: format!("{GRID_CONTOUR_PREFIX}{name}"),
        },
        None => ContourLookup::NotFound,
    }
}
