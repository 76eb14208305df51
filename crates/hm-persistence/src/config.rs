//! Typed export configuration.

use hm_engine::{
    AuxField, CompositeOptions, DocumentHandle, Encoding, PeriodicCondition2d,
    PeriodicCondition3d,
};

/// Per-format-family export options.
///
/// Options that do not apply to the chosen format are ignored, so a
/// `Periodic2d` configuration passed to a VTK export has no effect.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExportConfig {
    #[default]
    Default,
    /// Options for native documents (`hmg`, `hmc`, `hms`, `hmg3d`).
    Composite(CompositeConfig),
    /// Periodic boundary pairs for 2D Fluent export.
    Periodic2d(Vec<PeriodicCondition2d>),
    /// Periodic boundary pairs for 3D Fluent export.
    Periodic3d(Vec<PeriodicCondition3d>),
}

/// Options for native documents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompositeConfig {
    pub encoding: Encoding,

    /// Derived connectivity written next to each object.
    pub aux_fields: Vec<AuxField>,

    /// Open document to append to instead of writing a new file. The
    /// document stays open after the export.
    pub writer: Option<DocumentHandle>,
}

impl ExportConfig {
    /// Engine options and caller writer for composite formats.
    pub(crate) fn composite(&self) -> (CompositeOptions<'_>, Option<DocumentHandle>) {
        match self {
            Self::Composite(config) => (
                CompositeOptions {
                    encoding: config.encoding,
                    aux_fields: &config.aux_fields,
                },
                config.writer,
            ),
            _ => (CompositeOptions::default(), None),
        }
    }

    pub(crate) fn periodic_2d(&self) -> &[PeriodicCondition2d] {
        match self {
            Self::Periodic2d(conditions) => conditions,
            _ => &[],
        }
    }

    pub(crate) fn periodic_3d(&self) -> &[PeriodicCondition3d] {
        match self {
            Self::Periodic3d(conditions) => conditions,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrelated_options_are_ignored() {
        let config = ExportConfig::Periodic2d(vec![PeriodicCondition2d {
            periodic: 1,
            shadow: 2,
            reversed: false,
        }]);
        let (options, writer) = config.composite();
        assert_eq!(options.encoding, Encoding::Ascii);
        assert!(options.aux_fields.is_empty());
        assert!(writer.is_none());
        assert!(config.periodic_3d().is_empty());
        assert_eq!(config.periodic_2d().len(), 1);
    }

    #[test]
    fn test_composite_options() {
        let config = ExportConfig::Composite(CompositeConfig {
            encoding: Encoding::Binary,
            aux_fields: vec![AuxField::CellEdges],
            writer: Some(DocumentHandle::from_raw(7)),
        });
        let (options, writer) = config.composite();
        assert_eq!(options.encoding, Encoding::Binary);
        assert_eq!(options.aux_fields, [AuxField::CellEdges]);
        assert_eq!(writer, Some(DocumentHandle::from_raw(7)));
    }
}
