//! # Diplotype State Space
//!
//! Hidden states are unordered pairs `(i, j)`, `i <= j`, of contributing
//! strain indices. For `K` strains there are `K(K+1)/2` states, enumerated in
//! row-major upper-triangle order:
//!
//! ```text
//! K = 3:  (0,0) (0,1) (0,2) (1,1) (1,2) (2,2)
//! ```
//!
//! The enumeration order is observable: Viterbi ties resolve to the lowest
//! state index.

use serde::{Deserialize, Serialize};

use crate::data::strain::StrainIdx;
use crate::error::{Result, StrainHapError};

/// One hidden diplotype: "inherited from strain `first` and strain `second`"
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiplotypeState {
    pub first: StrainIdx,
    pub second: StrainIdx,
}

impl DiplotypeState {
    pub fn new(first: usize, second: usize) -> Self {
        Self {
            first: StrainIdx::from(first),
            second: StrainIdx::from(second),
        }
    }

    /// Both homologs from the same strain
    pub fn is_homozygous(self) -> bool {
        self.first == self.second
    }

    /// Same pair with the slots exchanged
    pub fn swapped(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    /// Pair with `first <= second`
    pub fn canonical(self) -> Self {
        if self.first <= self.second {
            self
        } else {
            self.swapped()
        }
    }
}

impl From<(usize, usize)> for DiplotypeState {
    fn from((first, second): (usize, usize)) -> Self {
        Self::new(first, second)
    }
}

/// Canonical enumeration of all diplotype states for `K` strains
#[derive(Clone, Debug)]
pub struct StateSpace {
    n_strains: usize,
    states: Vec<DiplotypeState>,
}

impl StateSpace {
    /// Build the state space; zero strains is a configuration error.
    pub fn new(n_strains: usize) -> Result<Self> {
        if n_strains == 0 {
            return Err(StrainHapError::config(
                "cannot decode with zero contributing strains",
            ));
        }
        if n_strains > u16::MAX as usize {
            return Err(StrainHapError::config(format!(
                "{} contributing strains cannot be indexed",
                n_strains
            )));
        }
        let mut states = Vec::with_capacity(Self::count_for(n_strains));
        for i in 0..n_strains {
            for j in i..n_strains {
                states.push(DiplotypeState::new(i, j));
            }
        }
        Ok(Self { n_strains, states })
    }

    /// `K(K+1)/2`
    pub fn count_for(n_strains: usize) -> usize {
        n_strains * (n_strains + 1) / 2
    }

    pub fn n_strains(&self) -> usize {
        self.n_strains
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn state(&self, idx: usize) -> DiplotypeState {
        self.states[idx]
    }

    pub fn states(&self) -> &[DiplotypeState] {
        &self.states
    }

    /// Canonical index of a state in either slot order
    pub fn index_of(&self, state: DiplotypeState) -> Option<usize> {
        let s = state.canonical();
        let (i, j) = (s.first.as_usize(), s.second.as_usize());
        if j >= self.n_strains {
            return None;
        }
        // rows before i hold K + (K-1) + ... + (K-i+1) states
        let row_start = i * self.n_strains - i * (i.saturating_sub(1)) / 2;
        Some(row_start + (j - i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order() {
        let space = StateSpace::new(3).unwrap();
        let pairs: Vec<(usize, usize)> = space
            .states()
            .iter()
            .map(|s| (s.first.as_usize(), s.second.as_usize()))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_counts() {
        assert_eq!(StateSpace::new(1).unwrap().len(), 1);
        assert_eq!(StateSpace::new(2).unwrap().len(), 3);
        assert_eq!(StateSpace::new(15).unwrap().len(), 120);
        assert!(StateSpace::new(0).is_err());
    }

    #[test]
    fn test_index_of_round_trips() {
        for k in 1..=15 {
            let space = StateSpace::new(k).unwrap();
            for (idx, &state) in space.states().iter().enumerate() {
                assert_eq!(space.index_of(state), Some(idx));
                assert_eq!(space.index_of(state.swapped()), Some(idx));
            }
            assert_eq!(space.index_of(DiplotypeState::new(0, k)), None);
        }
    }

    #[test]
    fn test_swapped_and_canonical() {
        let s = DiplotypeState::new(2, 1);
        assert_eq!(s.swapped(), DiplotypeState::new(1, 2));
        assert_eq!(s.canonical(), DiplotypeState::new(1, 2));
        assert!(DiplotypeState::new(3, 3).is_homozygous());
    }
}
