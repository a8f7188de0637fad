//! # AB Code Matrix
//!
//! Dense row-major matrix of genotype codes: one row per SNP, one column per
//! sample. Reference strains and the observed sample share this layout so the
//! decoder reads a whole SNP row with a single slice.

use crate::data::genotype::AbCode;
use crate::error::{Result, StrainHapError};

/// Dense `n_snps x n_samples` matrix of AB codes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeMatrix {
    data: Vec<AbCode>,
    n_snps: usize,
    n_samples: usize,
}

impl CodeMatrix {
    /// Matrix filled with `N`
    pub fn new(n_snps: usize, n_samples: usize) -> Self {
        Self {
            data: vec![AbCode::N; n_snps * n_samples],
            n_snps,
            n_samples,
        }
    }

    /// Build from per-SNP rows
    pub fn from_rows(rows: Vec<Vec<AbCode>>) -> Result<Self> {
        let n_snps = rows.len();
        let n_samples = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_snps * n_samples);
        for (i, row) in rows.into_iter().enumerate() {
            StrainHapError::check_len(&format!("code matrix row {}", i), n_samples, row.len())?;
            data.extend(row);
        }
        Ok(Self {
            data,
            n_snps,
            n_samples,
        })
    }

    /// Build from per-sample columns of equal length
    pub fn from_columns(columns: &[Vec<AbCode>]) -> Result<Self> {
        let n_samples = columns.len();
        let n_snps = columns.first().map(|c| c.len()).unwrap_or(0);
        let mut matrix = Self::new(n_snps, n_samples);
        for (s, column) in columns.iter().enumerate() {
            StrainHapError::check_len(&format!("code matrix column {}", s), n_snps, column.len())?;
            for (t, &code) in column.iter().enumerate() {
                matrix.set(t, s, code);
            }
        }
        Ok(matrix)
    }

    /// Build from numeric codes (0..=3) in row-major order
    pub fn from_raw(n_snps: usize, n_samples: usize, codes: &[u8]) -> Result<Self> {
        StrainHapError::check_len("raw code buffer", n_snps * n_samples, codes.len())?;
        let data = codes
            .iter()
            .map(|&c| AbCode::from_u8(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            data,
            n_snps,
            n_samples,
        })
    }

    pub fn n_snps(&self) -> usize {
        self.n_snps
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    #[inline]
    pub fn get(&self, snp: usize, sample: usize) -> AbCode {
        self.data[snp * self.n_samples + sample]
    }

    #[inline]
    pub fn set(&mut self, snp: usize, sample: usize, code: AbCode) {
        self.data[snp * self.n_samples + sample] = code;
    }

    /// All sample codes at one SNP
    #[inline]
    pub fn row(&self, snp: usize) -> &[AbCode] {
        let start = snp * self.n_samples;
        &self.data[start..start + self.n_samples]
    }

    /// Copy out one sample's codes
    pub fn column(&self, sample: usize) -> Vec<AbCode> {
        (0..self.n_snps).map(|t| self.get(t, sample)).collect()
    }

    /// New matrix restricted to the given sample columns, in the given order
    pub fn select_columns(&self, samples: &[usize]) -> Result<Self> {
        if let Some(&bad) = samples.iter().find(|&&s| s >= self.n_samples) {
            return Err(StrainHapError::invalid_data(format!(
                "sample column {} out of range for {} samples",
                bad, self.n_samples
            )));
        }
        let mut out = Self::new(self.n_snps, samples.len());
        for t in 0..self.n_snps {
            for (new_s, &old_s) in samples.iter().enumerate() {
                out.set(t, new_s, self.get(t, old_s));
            }
        }
        Ok(out)
    }
}
