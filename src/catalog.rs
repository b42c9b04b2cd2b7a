//! Class catalog and presence-vector encoding.
//!
//! The catalog is the fixed, ordered list of object classes the batch cares
//! about. Its order defines the column order of every presence vector and of
//! the final results table, so it is resolved once at startup and never
//! mutated afterwards.

use std::collections::HashSet;

use crate::error::ConfigError;

/// Ordered list of class names of interest, validated against a detector
/// vocabulary at construction.
#[derive(Clone, Debug)]
pub struct ClassCatalog {
    names: Vec<String>,
}

impl ClassCatalog {
    /// Resolve `names` against the detector's label vocabulary.
    ///
    /// Fails fast with `ConfigError` when the list is empty or any name is
    /// absent from the vocabulary; a typo here would otherwise surface as an
    /// all-zero column after a full batch run.
    pub fn resolve(names: &[String], vocabulary: &[String]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for name in names {
            if !vocabulary.iter().any(|label| label == name) {
                return Err(ConfigError::UnknownClass {
                    name: name.clone(),
                    vocabulary_size: vocabulary.len(),
                });
            }
        }
        Ok(Self {
            names: names.to_vec(),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when `name` is a catalog entry.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|entry| entry == name)
    }

    /// Encode a detection result as a 0/1 vector in catalog order.
    ///
    /// Pure: `v[i] == 1` iff `names[i]` is in `detected`. Length always equals
    /// the catalog length.
    pub fn presence_vector(&self, detected: &HashSet<String>) -> Vec<u8> {
        self.names
            .iter()
            .map(|name| u8::from(detected.contains(name)))
            .collect()
    }
}
