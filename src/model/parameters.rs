//! # Model Parameters
//!
//! Hand-tuned HMM hyperparameters: the per-SNP state-switch probability and
//! the emission model. Nothing here is fitted from data.
//!
//! ### Transition structure
//! ```text
//! log_trans[from][to] = ln(1 - p)             if from == to
//!                     = ln(p / (n_states - 1)) otherwise
//! ```
//! where `p` is the probability of leaving the current diplotype between two
//! adjacent SNPs. A single-state model has no alternative to move to, so its
//! only transition carries log-probability `0`.

use crate::error::{Result, StrainHapError};
use crate::model::emission::{EmissionModel, EmissionProfiles};

/// Validate a probability parameter
pub fn check_probability(name: &str, p: f64) -> Result<f64> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(StrainHapError::config(format!(
            "{} must be a probability in [0, 1], got {}",
            name, p
        )))
    }
}

/// Log transition probabilities for a uniform-switch state space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transitions {
    log_stay: f64,
    log_switch: f64,
}

impl Transitions {
    pub fn new(trans_prob: f64, n_states: usize) -> Result<Self> {
        let p = check_probability("transition probability", trans_prob)?;
        if n_states == 0 {
            return Err(StrainHapError::config("transition model needs at least one state"));
        }
        if n_states == 1 {
            return Ok(Self {
                log_stay: 0.0,
                log_switch: 0.0,
            });
        }
        Ok(Self {
            log_stay: (1.0 - p).ln(),
            log_switch: (p / (n_states - 1) as f64).ln(),
        })
    }

    #[inline]
    pub fn log_prob(&self, from: usize, to: usize) -> f64 {
        if from == to {
            self.log_stay
        } else {
            self.log_switch
        }
    }

    pub fn log_stay(&self) -> f64 {
        self.log_stay
    }

    pub fn log_switch(&self) -> f64 {
        self.log_switch
    }
}

/// Complete parameter set for one decode
#[derive(Clone, Debug)]
pub struct ModelParams {
    /// Probability of switching diplotype between adjacent SNPs
    pub trans_prob: f64,
    pub emission: EmissionModel,
}

impl ModelParams {
    pub fn new(trans_prob: f64, emission: EmissionModel) -> Result<Self> {
        Ok(Self {
            trans_prob: check_probability("transition probability", trans_prob)?,
            emission,
        })
    }

    /// Parameters built from raw profile weights
    pub fn from_profiles(trans_prob: f64, profiles: &EmissionProfiles) -> Result<Self> {
        Self::new(trans_prob, EmissionModel::from_profiles(profiles)?)
    }

    pub fn transitions(&self, n_states: usize) -> Result<Transitions> {
        Transitions::new(self.trans_prob, n_states)
    }
}
