//! # Sample Summaries
//!
//! Aggregates per-chromosome results into sample-level reports: total call
//! concordance, the share of the genome assigned to each strain pair, and a
//! per-SNP view of the inferred haplotypes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::snp::Snp;
use crate::data::strain::StrainIdx;
use crate::model::blocks::{block_for_each_snp, HaplotypeBlock};
use crate::model::concordance::concordant_percent;
use crate::pipelines::inference::{ChromosomeOutcome, ChromosomeReport, SampleResult};

/// Concordance totals over all inferred chromosomes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub informative_count: usize,
    pub concordant_count: usize,
    /// `None` when no SNP was informative
    pub concordant_percent: Option<f64>,
    pub n_inferred: usize,
    pub n_skipped: usize,
    pub n_failed: usize,
}

impl SampleSummary {
    pub fn from_result(result: &SampleResult) -> Self {
        let mut summary = Self::default();
        for chrom in &result.chromosomes {
            match &chrom.outcome {
                ChromosomeOutcome::Inferred(r) => {
                    summary.n_inferred += 1;
                    summary.informative_count += r.concordance.informative_count;
                    summary.concordant_count += r.concordance.concordant_count;
                }
                ChromosomeOutcome::Skipped { .. } => summary.n_skipped += 1,
                ChromosomeOutcome::Failed { .. } => summary.n_failed += 1,
            }
        }
        summary.concordant_percent =
            concordant_percent(summary.concordant_count, summary.informative_count);
        summary
    }
}

/// Genome share of one unordered strain pair
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrainPairShare {
    pub strain_1: String,
    pub strain_2: String,
    pub covered_bp: u64,
    pub percent: f64,
}

/// Percent of covered base pairs per unordered strain pair.
///
/// Pairs are listed in canonical `(i <= j)` index order; pairs with no
/// coverage are omitted.
pub fn strain_composition<'a>(
    blocks: impl IntoIterator<Item = &'a HaplotypeBlock>,
    strain_names: &[String],
) -> Vec<StrainPairShare> {
    let mut covered: BTreeMap<(StrainIdx, StrainIdx), u64> = BTreeMap::new();
    for block in blocks {
        let state = block.state().canonical();
        *covered.entry((state.first, state.second)).or_default() += block.length_bp();
    }

    let total: u64 = covered.values().sum();
    let name = |idx: StrainIdx| {
        strain_names
            .get(idx.as_usize())
            .cloned()
            .unwrap_or_else(|| format!("#{}", idx.as_usize()))
    };

    covered
        .into_iter()
        .filter(|&(_, bp)| bp > 0)
        .map(|((i, j), bp)| StrainPairShare {
            strain_1: name(i),
            strain_2: name(j),
            covered_bp: bp,
            percent: bp as f64 * 100.0 / total as f64,
        })
        .collect()
}

/// Inferred haplotype pair at one SNP
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnpHaplotype {
    pub snp_id: String,
    pub chromosome: String,
    pub position_bp: u64,
    /// `None` when no block covers the SNP
    pub haplotype_1: Option<String>,
    pub haplotype_2: Option<String>,
}

/// Per-SNP haplotype rows for one chromosome; `snps` must be sorted.
///
/// Lookup is by position, so SNPs sharing a position with a state change
/// between them all report the later block.
pub fn snp_haplotypes(
    snps: &[Snp],
    blocks: &[HaplotypeBlock],
    strain_names: &[String],
) -> Vec<SnpHaplotype> {
    let positions: Vec<u64> = snps.iter().map(|s| s.position_bp).collect();
    let name = |idx: StrainIdx| strain_names.get(idx.as_usize()).cloned();
    block_for_each_snp(blocks, &positions)
        .into_iter()
        .zip(snps)
        .map(|(block_idx, snp)| {
            let block = block_idx.map(|i| &blocks[i]);
            SnpHaplotype {
                snp_id: snp.snp_id.clone(),
                chromosome: snp.chromosome.clone(),
                position_bp: snp.position_bp,
                haplotype_1: block.and_then(|b| name(b.haplotype_index_1)),
                haplotype_2: block.and_then(|b| name(b.haplotype_index_2)),
            }
        })
        .collect()
}

/// Everything reported for one sample
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub sample_id: String,
    pub contributing_strains: Vec<String>,
    pub summary: SampleSummary,
    pub composition: Vec<StrainPairShare>,
    pub chromosomes: Vec<ChromosomeReport>,
}

impl SampleReport {
    pub fn from_result(result: SampleResult) -> Self {
        let summary = SampleSummary::from_result(&result);
        let composition = strain_composition(
            result.inferred().flat_map(|(_, r)| r.haplotype_blocks.iter()),
            &result.contributing_strains,
        );
        Self {
            sample_id: result.sample_id,
            contributing_strains: result.contributing_strains,
            summary,
            composition,
            chromosomes: result.chromosomes,
        }
    }
}
