//! Options consumed by engine writers.

use std::fmt;
use std::str::FromStr;

use hm_model::Point3;

use crate::error::EngineError;

/// Encoding of numeric arrays inside a native document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Whitespace separated decimal text.
    #[default]
    Ascii,
    /// Hex-encoded little-endian binary.
    Binary,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascii" => Ok(Self::Ascii),
            "binary" | "bin" => Ok(Self::Binary),
            _ => Err(EngineError::UnknownEncoding(s.to_string())),
        }
    }
}

/// Extra connectivity tables written next to a grid in native documents.
///
/// Consumers outside HybMesh use them to avoid rebuilding adjacency. They
/// are ignored when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuxField {
    /// 2D: vertex pair of every edge.
    EdgeVertices,
    /// 2D: left/right cell of every edge.
    EdgeCells,
    /// 2D: edge loop of every cell.
    CellEdges,
    /// 3D: faces of every cell.
    CellFaces,
    /// 3D: distinct vertices of every cell.
    CellVertices,
}

impl AuxField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EdgeVertices => "edge-vert",
            Self::EdgeCells => "edge-cell",
            Self::CellEdges => "cell-edge",
            Self::CellFaces => "cell-face",
            Self::CellVertices => "cell-vert",
        }
    }
}

impl FromStr for AuxField {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edge-vert" => Ok(Self::EdgeVertices),
            "edge-cell" => Ok(Self::EdgeCells),
            "cell-edge" => Ok(Self::CellEdges),
            "cell-face" => Ok(Self::CellFaces),
            "cell-vert" => Ok(Self::CellVertices),
            _ => Err(EngineError::UnknownAuxField(s.to_string())),
        }
    }
}

/// Periodic pairing of two 2D boundary types for Fluent export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicCondition2d {
    /// Boundary type of the periodic side.
    pub periodic: i32,
    /// Boundary type of the shadow side.
    pub shadow: i32,
    /// Pair the shadow edges in reverse order.
    pub reversed: bool,
}

/// Periodic pairing of two 3D boundary types for Fluent export.
///
/// `periodic_point` on the periodic side corresponds to `shadow_point` on
/// the shadow side; their difference is the periodic translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicCondition3d {
    pub periodic: i32,
    pub shadow: i32,
    pub periodic_point: Point3,
    pub shadow_point: Point3,
}
