//! # Haplotype Inference Pipeline
//!
//! Orchestrates per-chromosome inference for one sample:
//! 1. Decide whether the chromosome is inferred at all (skip rules)
//! 2. Encode the sample and its contributing strains to AB codes
//! 3. Viterbi-decode the diplotype path
//! 4. Score call concordance and compress the path into blocks
//!
//! Chromosomes are independent and run in parallel with rayon, each worker
//! reusing one `ViterbiWorkspace`. A chromosome that fails reports its own
//! error and never affects the others.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::config::HmmConfig;
use crate::data::genotype::{AbCode, AlleleCalls};
use crate::data::matrix::CodeMatrix;
use crate::data::snp::{Snp, SnpPanel};
use crate::data::strain::{ContributingStrains, StrainIdx};
use crate::error::{Result, StrainHapError};
use crate::model::blocks::{compress_and_extend, HaplotypeBlock};
use crate::model::candidates;
use crate::model::concordance::{self, ConcordanceReport};
use crate::model::encoder::{codes_from_raw, encode_sample};
use crate::model::hmm::DiplotypeHmm;
use crate::model::parameters::ModelParams;
use crate::utils::workspace::ViterbiWorkspace;

/// Chromosome skipped for female samples
const Y_CHROMOSOME: &str = "Y";

// ============================================================================
// Inputs
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Genotypes of one sample on one chromosome, raw or pre-encoded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenotypeInput {
    Alleles {
        allele1_fwds: Vec<char>,
        allele2_fwds: Vec<char>,
    },
    /// Numeric AB codes, `0..=3`
    Codes(Vec<u8>),
}

impl GenotypeInput {
    /// AB codes against the chromosome's SNPs
    pub fn to_codes(&self, sample_id: &str, snps: &[Snp]) -> Result<Vec<AbCode>> {
        match self {
            Self::Alleles {
                allele1_fwds,
                allele2_fwds,
            } => {
                let calls = AlleleCalls::new(sample_id, allele1_fwds.clone(), allele2_fwds.clone());
                encode_sample(snps, &calls)
            }
            Self::Codes(raw) => {
                StrainHapError::check_len(
                    &format!("AB codes of sample {:?}", sample_id),
                    snps.len(),
                    raw.len(),
                )?;
                codes_from_raw(raw)
            }
        }
    }
}

/// SNPs and genotypes for one chromosome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeInput {
    pub chromosome: String,
    /// Ordered by `(position_bp, snp_id)` with contiguous indices
    pub snps: Vec<Snp>,
    pub sample: GenotypeInput,
    /// Genotypes keyed by contributing strain name
    #[serde(default)]
    pub strains: BTreeMap<String, GenotypeInput>,
}

/// Everything needed to infer one sample's haplotypes
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    pub sample_id: String,
    #[serde(default)]
    pub sex: Option<Sex>,
    pub platform_id: String,
    /// Chromosomes the platform genotypes
    pub platform_chromosomes: Vec<String>,
    /// Candidate parental strains, in model column order
    pub contributing_strains: Vec<String>,
    pub chromosomes: Vec<ChromosomeInput>,
}

// ============================================================================
// Outputs
// ============================================================================

/// Why a chromosome was not inferred
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoContributingStrains,
    NotOnPlatform,
    FemaleY,
    /// Contributing strains with no genotypes on this chromosome
    MissingStrains(Vec<String>),
}

/// Inference result for one chromosome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeResult {
    pub n_snps: usize,
    pub log_likelihood: f64,
    pub haplotype_blocks: Vec<HaplotypeBlock>,
    #[serde(flatten)]
    pub concordance: ConcordanceReport,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChromosomeOutcome {
    Inferred(ChromosomeResult),
    Skipped { reason: SkipReason },
    Failed { message: String },
}

impl ChromosomeOutcome {
    pub fn result(&self) -> Option<&ChromosomeResult> {
        match self {
            Self::Inferred(result) => Some(result),
            _ => None,
        }
    }
}

/// A ranked strain pair, by name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrainPairCandidate {
    pub haplotype_1: String,
    pub haplotype_2: String,
    pub neg_log_likelihood: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChromosomeReport {
    pub chromosome: String,
    #[serde(flatten)]
    pub outcome: ChromosomeOutcome,
}

/// Per-chromosome outcomes for one sample, in input order
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub sample_id: String,
    pub contributing_strains: Vec<String>,
    pub chromosomes: Vec<ChromosomeReport>,
}

impl SampleResult {
    /// Inferred chromosomes only
    pub fn inferred(&self) -> impl Iterator<Item = (&str, &ChromosomeResult)> {
        self.chromosomes
            .iter()
            .filter_map(|c| c.outcome.result().map(|r| (c.chromosome.as_str(), r)))
    }
}

// ============================================================================
// Pipeline
// ============================================================================

pub struct InferencePipeline {
    config: HmmConfig,
    params: ModelParams,
}

impl InferencePipeline {
    pub fn new(config: HmmConfig) -> Result<Self> {
        config.validate()?;
        let params = config.build_model()?;
        Ok(Self { config, params })
    }

    pub fn config(&self) -> &HmmConfig {
        &self.config
    }

    /// Infer every chromosome of a sample.
    ///
    /// Only a strain list over the configured maximum fails the whole sample;
    /// everything else is reported per chromosome.
    pub fn run(&self, sample: &SampleInput) -> Result<SampleResult> {
        let strains = ContributingStrains::new(
            sample.contributing_strains.clone(),
            self.config.max_contributing_strains,
        )?;
        let platform: HashSet<&str> = sample
            .platform_chromosomes
            .iter()
            .map(String::as_str)
            .collect();

        let sample_span = info_span!("sample", sample_id = %sample.sample_id);
        let _enter = sample_span.enter();

        let chromosomes: Vec<ChromosomeReport> = sample
            .chromosomes
            .par_iter()
            .map_init(ViterbiWorkspace::default, |ws, chrom| {
                // rayon workers do not inherit the caller's current span
                let _span = info_span!(
                    parent: &sample_span,
                    "chromosome",
                    chromosome = %chrom.chromosome
                )
                .entered();
                ChromosomeReport {
                    chromosome: chrom.chromosome.clone(),
                    outcome: self.infer_chromosome(sample, &strains, &platform, chrom, ws),
                }
            })
            .collect();

        Ok(SampleResult {
            sample_id: sample.sample_id.clone(),
            contributing_strains: sample.contributing_strains.clone(),
            chromosomes,
        })
    }

    /// Apply skip rules, then decode
    pub fn infer_chromosome(
        &self,
        sample: &SampleInput,
        strains: &ContributingStrains,
        platform: &HashSet<&str>,
        chrom: &ChromosomeInput,
        ws: &mut ViterbiWorkspace,
    ) -> ChromosomeOutcome {
        if let Some(reason) = skip_reason(sample, strains, platform, chrom) {
            match &reason {
                SkipReason::MissingStrains(missing) => warn!(
                    sample_id = %sample.sample_id,
                    chromosome = %chrom.chromosome,
                    platform_id = %sample.platform_id,
                    "candidate haplotype strains not found: {}",
                    missing.join(", ")
                ),
                other => debug!(?other, "skipping chromosome"),
            }
            return ChromosomeOutcome::Skipped { reason };
        }

        match self.decode_chromosome(&sample.sample_id, &sample.platform_id, strains, chrom, ws) {
            Ok(result) => ChromosomeOutcome::Inferred(result),
            Err(e) => {
                warn!(
                    sample_id = %sample.sample_id,
                    chromosome = %chrom.chromosome,
                    "inference failed: {}",
                    e
                );
                ChromosomeOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Rank contributing strain pairs over `[start_bp, end_bp]` of one chromosome.
    ///
    /// Skip rules do not apply here; a chromosome that is absent or lacks a
    /// strain's genotypes is an error.
    pub fn candidate_pairs(
        &self,
        sample: &SampleInput,
        chromosome: &str,
        start_bp: u64,
        end_bp: u64,
        limit: usize,
    ) -> Result<Vec<StrainPairCandidate>> {
        let strains = ContributingStrains::new(
            sample.contributing_strains.clone(),
            self.config.max_contributing_strains,
        )?;
        let chrom = sample
            .chromosomes
            .iter()
            .find(|c| c.chromosome == chromosome)
            .ok_or_else(|| {
                StrainHapError::invalid_data(format!(
                    "sample {:?} has no chromosome {:?}",
                    sample.sample_id, chromosome
                ))
            })?;

        let _span = info_span!(
            "candidates",
            sample_id = %sample.sample_id,
            chromosome = %chromosome
        )
        .entered();

        let (panel, observed, refs) =
            encode_chromosome(&sample.sample_id, &sample.platform_id, &strains, chrom)?;
        let ranked = candidates::rank_pairs(
            &self.params.emission,
            &refs,
            &observed,
            &panel.positions(),
            start_bp,
            end_bp,
            limit,
        )?;

        let name = |idx: StrainIdx| strains.name(idx).unwrap_or_default().to_string();
        Ok(ranked
            .into_iter()
            .map(|c| StrainPairCandidate {
                haplotype_1: name(c.haplotype_index_1),
                haplotype_2: name(c.haplotype_index_2),
                neg_log_likelihood: c.neg_log_likelihood,
            })
            .collect())
    }

    fn decode_chromosome(
        &self,
        sample_id: &str,
        platform_id: &str,
        strains: &ContributingStrains,
        chrom: &ChromosomeInput,
        ws: &mut ViterbiWorkspace,
    ) -> Result<ChromosomeResult> {
        let (panel, observed, refs) = encode_chromosome(sample_id, platform_id, strains, chrom)?;
        let positions = panel.positions();

        let hmm = DiplotypeHmm::from_params(&self.params, strains.len())?;
        let path = hmm.decode_with(&refs, &observed, ws)?;

        let concordance = concordance::score(
            &path.states,
            &observed,
            &refs,
            &positions,
            self.config.bin_size,
        )?;
        let haplotype_blocks = compress_and_extend(&path.states, &positions)?;

        debug!(
            n_blocks = haplotype_blocks.len(),
            informative = concordance.informative_count,
            concordant = concordance.concordant_count,
            "chromosome decoded"
        );

        Ok(ChromosomeResult {
            n_snps: panel.len(),
            log_likelihood: path.log_likelihood,
            haplotype_blocks,
            concordance,
        })
    }
}

/// Validated SNPs, the sample's codes and the strains' code matrix
fn encode_chromosome(
    sample_id: &str,
    platform_id: &str,
    strains: &ContributingStrains,
    chrom: &ChromosomeInput,
) -> Result<(SnpPanel, Vec<AbCode>, CodeMatrix)> {
    let panel = SnpPanel::new(platform_id, chrom.chromosome.as_str(), chrom.snps.clone())?;
    let observed = chrom.sample.to_codes(sample_id, panel.snps())?;
    let columns = strains
        .names()
        .iter()
        .map(|name| {
            let genotypes = chrom.strains.get(&**name).ok_or_else(|| {
                StrainHapError::invalid_data(format!("no genotypes for strain {:?}", name))
            })?;
            genotypes.to_codes(name, panel.snps())
        })
        .collect::<Result<Vec<_>>>()?;
    let refs = CodeMatrix::from_columns(&columns)?;
    Ok((panel, observed, refs))
}

fn skip_reason(
    sample: &SampleInput,
    strains: &ContributingStrains,
    platform: &HashSet<&str>,
    chrom: &ChromosomeInput,
) -> Option<SkipReason> {
    if strains.is_empty() {
        return Some(SkipReason::NoContributingStrains);
    }
    if !platform.contains(chrom.chromosome.as_str()) {
        return Some(SkipReason::NotOnPlatform);
    }
    if chrom.chromosome == Y_CHROMOSOME && sample.sex == Some(Sex::Female) {
        return Some(SkipReason::FemaleY);
    }
    let missing: Vec<String> = strains
        .names()
        .iter()
        .filter(|name| !chrom.strains.contains_key(&***name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Some(SkipReason::MissingStrains(missing));
    }
    None
}
