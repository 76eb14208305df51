//! Points and point-list merging.

use std::collections::HashMap;
use std::hash::Hash;

/// Planar point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Point in space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Exact identity of a point's coordinates.
///
/// Adding `0.0` folds `-0.0` into `0.0` so both compare congruent.
pub(crate) trait CongruenceKey: Copy {
    type Key: Hash + Eq;

    fn congruence_key(&self) -> Self::Key;
}

impl CongruenceKey for Point2 {
    type Key = [u64; 2];

    fn congruence_key(&self) -> Self::Key {
        [(self.x + 0.0).to_bits(), (self.y + 0.0).to_bits()]
    }
}

impl CongruenceKey for Point3 {
    type Key = [u64; 3];

    fn congruence_key(&self) -> Self::Key {
        [
            (self.x + 0.0).to_bits(),
            (self.y + 0.0).to_bits(),
            (self.z + 0.0).to_bits(),
        ]
    }
}

/// Append `incoming` to `points`, reusing points with identical coordinates.
///
/// Returns the new index of every incoming point.
pub(crate) fn merge_points<P: CongruenceKey>(points: &mut Vec<P>, incoming: &[P]) -> Vec<usize> {
    let mut known: HashMap<P::Key, usize> = HashMap::with_capacity(points.len() + incoming.len());
    for (index, point) in points.iter().enumerate() {
        known.entry(point.congruence_key()).or_insert(index);
    }

    incoming
        .iter()
        .map(|point| {
            *known.entry(point.congruence_key()).or_insert_with(|| {
                points.push(*point);
                points.len() - 1
            })
        })
        .collect()
}
