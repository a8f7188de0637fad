//! # Configuration
//!
//! Model constants and the command-line surface of the `strainhap` binary.
//!
//! `HmmConfig` carries the hand-tuned model constants and can be loaded from
//! JSON; `Config` is the CLI, whose overrides are layered on top.
//!
//! ## Example CLI
//! ```bash
//! strainhap --input sample.json --out report.json --trans-prob 0.01 --nthreads 8
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrainHapError};
use crate::model::concordance::DEFAULT_BIN_SIZE;
use crate::model::emission::{normalize, EmissionProfiles};
use crate::model::parameters::{check_probability, ModelParams};

/// Largest contributing strain list accepted per sample on production arrays
pub const DEFAULT_MAX_CONTRIBUTING_STRAINS: usize = 15;

/// Default per-SNP probability of switching diplotype
pub const DEFAULT_TRANS_PROB: f64 = 0.01;

// ============================================================================
// Model constants
// ============================================================================

/// Model constants; defaults are the production values
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmmConfig {
    /// Probability of switching to a different diplotype between adjacent SNPs
    pub trans_prob: f64,
    /// Weights over (match, opposite hom, het, no-call) when both parents agree
    pub hom_profile: [f64; 4],
    /// Weights over (het, either hom, no-call) when the parents differ
    pub het_profile: [f64; 3],
    /// Weights over (no-call, either hom, het) when a parent is N or H
    pub noread_profile: [f64; 3],
    /// Informative SNPs per concordance window
    pub bin_size: usize,
    pub max_contributing_strains: usize,
}

impl Default for HmmConfig {
    fn default() -> Self {
        let profiles = EmissionProfiles::default();
        Self {
            trans_prob: DEFAULT_TRANS_PROB,
            hom_profile: profiles.hom,
            het_profile: profiles.het,
            noread_profile: profiles.noread,
            bin_size: DEFAULT_BIN_SIZE,
            max_contributing_strains: DEFAULT_MAX_CONTRIBUTING_STRAINS,
        }
    }
}

impl HmmConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("transition probability", self.trans_prob)?;
        normalize("hom", self.hom_profile)?;
        normalize("het", self.het_profile)?;
        normalize("noread", self.noread_profile)?;
        if self.bin_size == 0 {
            return Err(StrainHapError::config("bin_size must be positive"));
        }
        if self.max_contributing_strains == 0 {
            return Err(StrainHapError::config(
                "max_contributing_strains must be positive",
            ));
        }
        Ok(())
    }

    pub fn profiles(&self) -> EmissionProfiles {
        EmissionProfiles {
            hom: self.hom_profile,
            het: self.het_profile,
            noread: self.noread_profile,
        }
    }

    /// Build the emission table and transition parameter
    pub fn build_model(&self) -> Result<ModelParams> {
        ModelParams::from_profiles(self.trans_prob, &self.profiles())
    }
}

// ============================================================================
// Command line
// ============================================================================

/// Infer parental strain haplotypes for one genotyped sample
#[derive(Parser, Debug, Clone)]
#[command(name = "strainhap", version, about)]
pub struct Config {
    /// Input sample bundle (JSON)
    #[arg(long)]
    pub input: PathBuf,

    /// Output report path (JSON)
    #[arg(long)]
    pub out: PathBuf,

    /// Model constants (JSON); unspecified fields keep their defaults
    #[arg(long)]
    pub params: Option<PathBuf>,

    /// Per-SNP diplotype switch probability
    #[arg(long = "trans-prob")]
    pub trans_prob: Option<f64>,

    /// Informative SNPs per concordance window
    #[arg(long = "bin-size")]
    pub bin_size: Option<usize>,

    /// Number of threads (default: all cores)
    #[arg(long)]
    pub nthreads: Option<usize>,

    /// Print span timings to stderr
    #[arg(long, default_value = "false")]
    pub profile: bool,
}

impl Config {
    /// Parse command line arguments and validate
    pub fn parse_and_validate() -> Result<Self> {
        let config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(StrainHapError::config(format!(
                "input file not found: {}",
                self.input.display()
            )));
        }
        if let Some(params) = &self.params {
            if !params.exists() {
                return Err(StrainHapError::config(format!(
                    "params file not found: {}",
                    params.display()
                )));
            }
        }
        if self.nthreads == Some(0) {
            return Err(StrainHapError::config("nthreads must be positive"));
        }
        Ok(())
    }

    /// Number of worker threads
    pub fn nthreads(&self) -> usize {
        self.nthreads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Model constants after applying `--params` and CLI overrides
    pub fn hmm_config(&self) -> Result<HmmConfig> {
        let mut hmm = match &self.params {
            Some(path) => HmmConfig::from_json_file(path)?,
            None => HmmConfig::default(),
        };
        if let Some(p) = self.trans_prob {
            hmm.trans_prob = p;
        }
        if let Some(bin_size) = self.bin_size {
            hmm.bin_size = bin_size;
        }
        hmm.validate()?;
        Ok(hmm)
    }
}
