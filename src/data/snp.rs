//! # SNP Definitions
//!
//! Per-chromosome SNP panel for a genotyping platform.
//!
//! Within a (platform, chromosome) pair SNPs are totally ordered by
//! `(position_bp, snp_id)`. The 0-based rank in that order is the
//! `within_chr_index`, and it is the row index of every genotype array.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrainHapError};

/// Zero-cost newtype for within-chromosome SNP indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SnpIdx(pub u32);

impl SnpIdx {
    pub fn new(idx: u32) -> Self {
        Self(idx)
    }

    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for SnpIdx {
    fn from(idx: usize) -> Self {
        Self(idx as u32)
    }
}

impl From<SnpIdx> for usize {
    fn from(idx: SnpIdx) -> usize {
        idx.0 as usize
    }
}

/// A single array SNP with its two probe alleles
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snp {
    pub platform_id: String,
    pub chromosome: String,
    pub snp_id: String,
    pub position_bp: u64,
    /// Forward-strand nucleotide read by the X probe (the "A" allele)
    pub x_probe_call: char,
    /// Forward-strand nucleotide read by the Y probe (the "B" allele)
    pub y_probe_call: char,
    pub within_chr_index: usize,
}

impl Snp {
    /// Sort key defining the within-chromosome order
    fn order_key(&self) -> (u64, &str) {
        (self.position_bp, self.snp_id.as_str())
    }
}

/// Ordered, gap-free SNP list for one (platform, chromosome) pair
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnpPanel {
    platform_id: String,
    chromosome: String,
    snps: Vec<Snp>,
}

impl SnpPanel {
    /// Wrap an already ordered SNP list, validating the index invariants.
    pub fn new(
        platform_id: impl Into<String>,
        chromosome: impl Into<String>,
        snps: Vec<Snp>,
    ) -> Result<Self> {
        let panel = Self {
            platform_id: platform_id.into(),
            chromosome: chromosome.into(),
            snps,
        };
        panel.validate()?;
        Ok(panel)
    }

    /// Sort SNPs by `(position_bp, snp_id)` and assign contiguous indices.
    pub fn from_unsorted(
        platform_id: impl Into<String>,
        chromosome: impl Into<String>,
        mut snps: Vec<Snp>,
    ) -> Result<Self> {
        snps.sort_by(|a, b| a.order_key().cmp(&b.order_key()));
        for (i, snp) in snps.iter_mut().enumerate() {
            snp.within_chr_index = i;
        }
        Self::new(platform_id, chromosome, snps)
    }

    fn validate(&self) -> Result<()> {
        for (i, snp) in self.snps.iter().enumerate() {
            if snp.platform_id != self.platform_id || snp.chromosome != self.chromosome {
                return Err(StrainHapError::invalid_data(format!(
                    "SNP {} belongs to ({}, {}), expected ({}, {})",
                    snp.snp_id, snp.platform_id, snp.chromosome, self.platform_id, self.chromosome
                )));
            }
            if snp.within_chr_index != i {
                return Err(StrainHapError::invalid_data(format!(
                    "SNP {} has within-chromosome index {} at rank {}",
                    snp.snp_id, snp.within_chr_index, i
                )));
            }
            if i > 0 && self.snps[i - 1].order_key() >= snp.order_key() {
                return Err(StrainHapError::invalid_data(format!(
                    "SNP {} is not ordered after {} by (position, id)",
                    snp.snp_id,
                    self.snps[i - 1].snp_id
                )));
            }
        }
        Ok(())
    }

    pub fn platform_id(&self) -> &str {
        &self.platform_id
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn len(&self) -> usize {
        self.snps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snps.is_empty()
    }

    pub fn snp(&self, idx: SnpIdx) -> &Snp {
        &self.snps[idx.as_usize()]
    }

    pub fn snps(&self) -> &[Snp] {
        &self.snps
    }

    /// Base-pair positions aligned to the genotype arrays
    pub fn positions(&self) -> Vec<u64> {
        self.snps.iter().map(|s| s.position_bp).collect()
    }
}
