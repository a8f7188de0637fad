//! # Genotype Calls
//!
//! Raw forward-strand allele pairs and the 4-symbol AB code derived from them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrainHapError};

/// Symbol used by the array software for a failed read
pub const NO_CALL: char = '-';

/// Genotype call relative to a SNP's two probe alleles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum AbCode {
    /// No read
    N = 0,
    /// Homozygous for the X probe allele
    A = 1,
    /// Homozygous for the Y probe allele
    B = 2,
    /// Heterozygous
    H = 3,
}

impl AbCode {
    /// All codes in numeric order
    pub const ALL: [AbCode; 4] = [AbCode::N, AbCode::A, AbCode::B, AbCode::H];

    /// Numeric code (N=0, A=1, B=2, H=3)
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self as usize
    }

    /// Decode a numeric code, rejecting anything outside 0..=3
    pub fn from_u8(code: u8) -> Result<Self> {
        match code {
            0 => Ok(AbCode::N),
            1 => Ok(AbCode::A),
            2 => Ok(AbCode::B),
            3 => Ok(AbCode::H),
            other => Err(StrainHapError::invalid_data(format!(
                "genotype code {} is outside the N/A/B/H alphabet",
                other
            ))),
        }
    }

    /// Homozygous call (A or B)
    #[inline]
    pub fn is_homozygous(self) -> bool {
        matches!(self, AbCode::A | AbCode::B)
    }

    /// N or H: a parental call that carries no homozygous allele
    #[inline]
    pub fn is_uninformative_parent(self) -> bool {
        matches!(self, AbCode::N | AbCode::H)
    }

    /// Encode one allele pair against the SNP's probe calls.
    ///
    /// Returns `None` for pairs fitting no category; the caller attaches
    /// sample and SNP context to the error.
    pub fn from_alleles(allele1: char, allele2: char, x_call: char, y_call: char) -> Option<Self> {
        if allele1 == NO_CALL || allele2 == NO_CALL {
            return Some(AbCode::N);
        }
        let a1_is_x = allele1 == x_call;
        let a2_is_x = allele2 == x_call;
        let a1_is_y = allele1 == y_call;
        let a2_is_y = allele2 == y_call;
        if a1_is_x && a2_is_x {
            Some(AbCode::A)
        } else if a1_is_y && a2_is_y {
            Some(AbCode::B)
        } else if (a1_is_x && a2_is_y) || (a1_is_y && a2_is_x) {
            Some(AbCode::H)
        } else {
            None
        }
    }

    /// A representative allele pair that encodes back to this code
    pub fn canonical_alleles(self, x_call: char, y_call: char) -> (char, char) {
        match self {
            AbCode::N => (NO_CALL, NO_CALL),
            AbCode::A => (x_call, x_call),
            AbCode::B => (y_call, y_call),
            AbCode::H => (x_call, y_call),
        }
    }
}

impl std::fmt::Display for AbCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            AbCode::N => 'N',
            AbCode::A => 'A',
            AbCode::B => 'B',
            AbCode::H => 'H',
        };
        write!(f, "{}", c)
    }
}

/// Forward-strand allele arrays for one sample on one chromosome
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlleleCalls {
    pub sample_id: String,
    pub allele1_fwds: Vec<char>,
    pub allele2_fwds: Vec<char>,
}

impl AlleleCalls {
    pub fn new(sample_id: impl Into<String>, allele1_fwds: Vec<char>, allele2_fwds: Vec<char>) -> Self {
        Self {
            sample_id: sample_id.into(),
            allele1_fwds,
            allele2_fwds,
        }
    }

    /// Build from genotype strings such as `"AA"`, `"AG"`, `"--"`
    pub fn from_pairs<'a>(sample_id: impl Into<String>, pairs: impl IntoIterator<Item = &'a str>) -> Self {
        let mut allele1_fwds = Vec::new();
        let mut allele2_fwds = Vec::new();
        for pair in pairs {
            let mut chars = pair.chars();
            allele1_fwds.push(chars.next().unwrap_or(NO_CALL));
            allele2_fwds.push(chars.next().unwrap_or(NO_CALL));
        }
        Self::new(sample_id, allele1_fwds, allele2_fwds)
    }

    pub fn len(&self) -> usize {
        self.allele1_fwds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allele1_fwds.is_empty()
    }
}
