//! # Emission Model
//!
//! Observation probabilities for a diploid hidden state whose two parental
//! calls are `(hidden1, hidden2)`. Valid observations change from SNP to SNP,
//! so instead of a per-state emission vector the model is parameterised by
//! three small categorical profiles and expanded into a dense
//! `[hidden1][hidden2][observed]` table over the N/A/B/H alphabet.
//!
//! ## Profiles
//! - **Homozygous** (`hidden1 == hidden2`, both A or B):
//!   `[matching hom, opposite hom, het, no read]`
//! - **Heterozygous** (`hidden1 != hidden2`, both A or B):
//!   `[het, hom (either allele), no read]`
//! - **No read** (either hidden call is N or H):
//!   `[no read, hom, het]`
//!
//! The no-read case takes priority over the homozygous/heterozygous split.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::genotype::AbCode;
use crate::error::{Result, StrainHapError};

/// Number of symbols in the AB alphabet
pub const N_CODES: usize = 4;

type Table = [[[f64; N_CODES]; N_CODES]; N_CODES];

/// Unnormalized categorical weights for the three hidden-call cases
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmissionProfiles {
    pub hom: [f64; 4],
    pub het: [f64; 3],
    pub noread: [f64; 3],
}

impl Default for EmissionProfiles {
    fn default() -> Self {
        Self {
            hom: [50.0, 0.5, 1.0, 1.0],
            het: [50.0, 2.0, 2.0],
            noread: [1.0, 1.0, 1.0],
        }
    }
}

/// Scale a categorical profile so it sums to one
pub fn normalize<const N: usize>(name: &str, weights: [f64; N]) -> Result<[f64; N]> {
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(StrainHapError::config(format!(
            "{} profile contains invalid weight {}",
            name, bad
        )));
    }
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 {
        return Err(StrainHapError::config(format!(
            "{} profile sums to zero",
            name
        )));
    }
    if !sum.is_finite() {
        return Err(StrainHapError::config(format!(
            "{} profile sum overflows",
            name
        )));
    }
    let mut out = weights;
    for w in out.iter_mut() {
        *w /= sum;
    }
    Ok(out)
}

/// Dense emission table, stored both linear and natural-log
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionModel {
    hom: [f64; 4],
    het: [f64; 3],
    noread: [f64; 3],
    probs: Table,
    log_probs: Table,
}

impl EmissionModel {
    /// Normalize the three profiles and expand them into the dense table.
    pub fn build(hom: [f64; 4], het: [f64; 3], noread: [f64; 3]) -> Result<Self> {
        let hom = normalize("homozygous", hom)?;
        let het = normalize("heterozygous", het)?;
        let noread = normalize("no-read", noread)?;

        let mut probs = [[[0.0; N_CODES]; N_CODES]; N_CODES];
        for h1 in AbCode::ALL {
            for h2 in AbCode::ALL {
                for obs in AbCode::ALL {
                    probs[h1.as_usize()][h2.as_usize()][obs.as_usize()] =
                        Self::select(&hom, &het, &noread, h1, h2, obs);
                }
            }
        }

        let mut log_probs = [[[0.0; N_CODES]; N_CODES]; N_CODES];
        for (h1, plane) in probs.iter().enumerate() {
            for (h2, row) in plane.iter().enumerate() {
                for (obs, &p) in row.iter().enumerate() {
                    // ln(0) is -inf, which the decoder treats as a disfavoured path
                    log_probs[h1][h2][obs] = p.ln();
                }
            }
        }

        debug!(?hom, ?het, ?noread, "built emission table");

        Ok(Self {
            hom,
            het,
            noread,
            probs,
            log_probs,
        })
    }

    /// Build from a profile bundle
    pub fn from_profiles(profiles: &EmissionProfiles) -> Result<Self> {
        Self::build(profiles.hom, profiles.het, profiles.noread)
    }

    fn select(
        hom: &[f64; 4],
        het: &[f64; 3],
        noread: &[f64; 3],
        h1: AbCode,
        h2: AbCode,
        obs: AbCode,
    ) -> f64 {
        if h1.is_uninformative_parent() || h2.is_uninformative_parent() {
            match obs {
                AbCode::N => noread[0],
                AbCode::A | AbCode::B => noread[1],
                AbCode::H => noread[2],
            }
        } else if h1 == h2 {
            match obs {
                AbCode::N => hom[3],
                AbCode::H => hom[2],
                o if o == h1 => hom[0],
                _ => hom[1],
            }
        } else {
            match obs {
                AbCode::N => het[2],
                AbCode::H => het[0],
                AbCode::A | AbCode::B => het[1],
            }
        }
    }

    /// `P(obs | hidden1, hidden2)`
    #[inline]
    pub fn prob(&self, h1: AbCode, h2: AbCode, obs: AbCode) -> f64 {
        self.probs[h1.as_usize()][h2.as_usize()][obs.as_usize()]
    }

    /// `ln P(obs | hidden1, hidden2)`, `-inf` for impossible observations
    #[inline]
    pub fn log_prob(&self, h1: AbCode, h2: AbCode, obs: AbCode) -> f64 {
        self.log_probs[h1.as_usize()][h2.as_usize()][obs.as_usize()]
    }

    /// Normalized homozygous profile
    pub fn hom_profile(&self) -> &[f64; 4] {
        &self.hom
    }

    /// Normalized heterozygous profile
    pub fn het_profile(&self) -> &[f64; 3] {
        &self.het
    }

    /// Normalized no-read profile
    pub fn noread_profile(&self) -> &[f64; 3] {
        &self.noread
    }

    /// Log-likelihood of an observed sequence given two fixed parental sequences.
    ///
    /// Sum of `ln P[hap1[t]][hap2[t]][obs[t]]` over all positions, without
    /// any transitions. Used to rank candidate haplotype pairs.
    pub fn log_likelihood(&self, hap1: &[AbCode], hap2: &[AbCode], obs: &[AbCode]) -> Result<f64> {
        StrainHapError::check_len("haplotype 2 codes", hap1.len(), hap2.len())?;
        StrainHapError::check_len("observed codes", hap1.len(), obs.len())?;
        Ok(hap1
            .iter()
            .zip(hap2)
            .zip(obs)
            .map(|((&h1, &h2), &o)| self.log_prob(h1, h2, o))
            .sum())
    }
}
