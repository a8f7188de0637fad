//! # Contributing Strain Definitions
//!
//! Candidate parental strains for a sample and the index type used to refer
//! to them from hidden states and haplotype blocks.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrainHapError};

/// Zero-cost newtype for contributing strain indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrainIdx(pub u16);

impl StrainIdx {
    pub fn new(idx: u16) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for StrainIdx {
    fn from(idx: usize) -> Self {
        Self(idx as u16)
    }
}

impl From<StrainIdx> for usize {
    fn from(idx: StrainIdx) -> usize {
        idx.0 as usize
    }
}

/// The ordered list of candidate parental strains for one sample.
///
/// Order matters: strain `i` is column `i` of the reference code matrix and
/// `haplotype_index_*` values in blocks refer back to it.
#[derive(Clone, Debug, Default)]
pub struct ContributingStrains {
    names: Vec<Arc<str>>,
    /// First position of each name (duplicates resolve to the earliest)
    name_to_idx: HashMap<Arc<str>, StrainIdx>,
}

impl ContributingStrains {
    /// Create from strain names, enforcing the platform maximum
    pub fn new(names: Vec<String>, max_strains: usize) -> Result<Self> {
        if names.len() > max_strains {
            return Err(StrainHapError::config(format!(
                "{} contributing strains exceeds the maximum of {}",
                names.len(),
                max_strains
            )));
        }
        let names: Vec<Arc<str>> = names.into_iter().map(|s| s.into()).collect();
        let mut name_to_idx = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            name_to_idx
                .entry(name.clone())
                .or_insert_with(|| StrainIdx::from(i));
        }
        Ok(Self { names, name_to_idx })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<StrainIdx> {
        self.name_to_idx.get(name).copied()
    }

    pub fn names(&self) -> &[Arc<str>] {
        &self.names
    }

    /// Name for an index, if in range
    pub fn name(&self, idx: StrainIdx) -> Option<&str> {
        self.names.get(idx.as_usize()).map(|s| s.as_ref())
    }
}

impl std::ops::Index<StrainIdx> for ContributingStrains {
    type Output = str;

    fn index(&self, idx: StrainIdx) -> &Self::Output {
        &self.names[idx.as_usize()]
    }
}
