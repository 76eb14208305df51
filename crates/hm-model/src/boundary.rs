//! Boundary type table.

/// A named boundary type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryType {
    pub index: i32,
    pub name: String,
}

/// Project-wide mapping from boundary type index to name.
///
/// Entries are kept sorted by index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoundaryTypes {
    entries: Vec<BoundaryType>,
}

impl BoundaryTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or rename a boundary type.
    pub fn insert(&mut self, index: i32, name: impl Into<String>) {
        let name = name.into();
        match self.entries.binary_search_by_key(&index, |b| b.index) {
            Ok(pos) => self.entries[pos].name = name,
            Err(pos) => self.entries.insert(pos, BoundaryType { index, name }),
        }
    }

    pub fn name(&self, index: i32) -> Option<&str> {
        self.entries
            .binary_search_by_key(&index, |b| b.index)
            .ok()
            .map(|pos| self.entries[pos].name.as_str())
    }

    /// Name used in exported files: the registered name, or a generated one.
    pub fn zone_name(&self, index: i32) -> String {
        match self.name(index) {
            Some(name) => name.to_string(),
            None if index == 0 => "default".to_string(),
            None => format!("boundary{index}"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryType> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_sorted_and_renames() {
        let mut bt = BoundaryTypes::new();
        bt.insert(3, "outlet");
        bt.insert(1, "wall");
        bt.insert(3, "far");
        let indices: Vec<i32> = bt.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert_eq!(bt.name(3), Some("far"));
    }

    #[test]
    fn test_zone_name_fallback() {
        let bt = BoundaryTypes::new();
        assert_eq!(bt.zone_name(0), "default");
        assert_eq!(bt.zone_name(7), "boundary7");
    }
}
