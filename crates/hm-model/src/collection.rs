//! Insertion-ordered named collections.

use crate::category::Category;
use crate::error::{ModelError, Result};

/// Objects of one category keyed by unique name.
///
/// Lookups are linear; projects hold tens of objects, not thousands, and
/// insertion order must survive a save/load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCollection<T> {
    category: Category,
    entries: Vec<(String, T)>,
}

impl<T> NamedCollection<T> {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Add an object under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateName`] if the name is taken.
    pub fn add(&mut self, name: impl Into<String>, item: T) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(ModelError::DuplicateName {
                category: self.category,
                name,
            });
        }
        self.entries.push((name, item));
        Ok(())
    }

    /// Add or replace an object, returning the replaced one.
    pub fn insert(&mut self, name: impl Into<String>, item: T) -> Option<T> {
        let name = name.into();
        match self.position(&name) {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, item)),
            None => {
                self.entries.push((name, item));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name).map(|pos| &self.entries[pos].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.position(name).map(|pos| &mut self.entries[pos].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.position(name).map(|pos| self.entries.remove(pos).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(name, item)| (name.as_str(), item))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}
