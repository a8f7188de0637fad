//! # Diplotype Pair-HMM
//!
//! Log-space Viterbi decoding over unordered pairs of contributing strains.
//!
//! ## Key Concepts
//! - `States`: every `(i, j)`, `i <= j`, of the sample's `K` contributing strains
//! - `Transitions`: stay with `1 - p`, otherwise switch uniformly to any other state
//! - `Emissions`: `P[ref(i)][ref(j)][obs]` from the dense emission table
//!
//! ## Recurrence
//! ```text
//! V[0][s]  = ln(1/S) + ln P[ref[0,i_s]][ref[0,j_s]][obs[0]]
//! V[t][to] = max_from (V[t-1][from] + ln T[from][to]) + ln P[ref[t,i_to]][ref[t,j_to]][obs[t]]
//! ```
//! Every argmax keeps the first index reaching the maximum, so ties resolve
//! toward the lowest canonical state index. Zero-probability emissions are
//! `-inf` and only ever lose comparisons.
//!
//! Cost is `O(M * S^2)` time and `O(M * S)` back-pointer memory; with the
//! platform maximum of 15 strains `S` is 120.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::data::genotype::AbCode;
use crate::data::matrix::CodeMatrix;
use crate::error::{Result, StrainHapError};
use crate::model::emission::EmissionModel;
use crate::model::parameters::{ModelParams, Transitions};
use crate::model::states::{DiplotypeState, StateSpace};
use crate::utils::workspace::ViterbiWorkspace;

/// Maximum-likelihood hidden state sequence for one chromosome
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViterbiPath {
    /// Decoded state for every SNP
    pub states: Vec<DiplotypeState>,
    /// Log-likelihood of the decoded path
    pub log_likelihood: f64,
    /// Best log-likelihood ending in each canonical state at the last SNP
    pub final_scores: Vec<f64>,
}

impl ViterbiPath {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// First index of the maximum, matching `argmax` on IEEE-754 doubles
#[inline]
fn argmax(values: impl Iterator<Item = f64>) -> (usize, f64) {
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (idx, v) in values.enumerate() {
        if idx == 0 || v > best {
            best_idx = idx;
            best = v;
        }
    }
    (best_idx, best)
}

/// Viterbi decoder over the diplotype state space
pub struct DiplotypeHmm<'a> {
    emission: &'a EmissionModel,
    space: StateSpace,
    transitions: Transitions,
}

impl<'a> DiplotypeHmm<'a> {
    /// Create a decoder for `n_strains` contributing strains
    pub fn new(emission: &'a EmissionModel, trans_prob: f64, n_strains: usize) -> Result<Self> {
        let space = StateSpace::new(n_strains)?;
        let transitions = Transitions::new(trans_prob, space.len())?;
        Ok(Self {
            emission,
            space,
            transitions,
        })
    }

    /// Create a decoder from a full parameter set
    pub fn from_params(params: &'a ModelParams, n_strains: usize) -> Result<Self> {
        Self::new(&params.emission, params.trans_prob, n_strains)
    }

    /// Number of HMM states
    pub fn n_states(&self) -> usize {
        self.space.len()
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.space
    }

    /// Fill `ws.emit` with per-state log emissions at SNP `t`
    #[inline]
    fn load_emissions(&self, refs: &[AbCode], obs: AbCode, emit: &mut [f64]) {
        for (s, e) in emit.iter_mut().enumerate() {
            let state = self.space.state(s);
            *e = self.emission.log_prob(
                refs[state.first.as_usize()],
                refs[state.second.as_usize()],
                obs,
            );
        }
    }

    /// Decode with a freshly allocated workspace
    pub fn decode(&self, refs: &CodeMatrix, observed: &[AbCode]) -> Result<ViterbiPath> {
        let mut ws = ViterbiWorkspace::default();
        self.decode_with(refs, observed, &mut ws)
    }

    /// Decode the maximum-likelihood state path.
    ///
    /// `refs` is `M x K` (one column per contributing strain), `observed`
    /// has length `M`. An empty chromosome decodes to an empty path with
    /// log-likelihood zero.
    #[instrument(skip_all, fields(n_snps = observed.len(), n_states = self.space.len()))]
    pub fn decode_with(
        &self,
        refs: &CodeMatrix,
        observed: &[AbCode],
        ws: &mut ViterbiWorkspace,
    ) -> Result<ViterbiPath> {
        StrainHapError::check_len("reference SNP rows", observed.len(), refs.n_snps())?;
        StrainHapError::check_len(
            "reference strain columns",
            self.space.n_strains(),
            refs.n_samples(),
        )?;

        let n_snps = observed.len();
        let n_states = self.space.len();
        if n_snps == 0 {
            return Ok(ViterbiPath {
                states: Vec::new(),
                log_likelihood: 0.0,
                final_scores: Vec::new(),
            });
        }

        ws.resize(n_states, n_snps);

        // Initialize with uniform prior
        let log_init = (1.0 / n_states as f64).ln();
        self.load_emissions(refs.row(0), observed[0], &mut ws.emit);
        for s in 0..n_states {
            ws.curr[s] = log_init + ws.emit[s];
        }

        for t in 1..n_snps {
            std::mem::swap(&mut ws.prev, &mut ws.curr);
            self.load_emissions(refs.row(t), observed[t], &mut ws.emit);

            let lattice_row = &mut ws.lattice[(t - 1) * n_states..t * n_states];
            for to in 0..n_states {
                let (best_from, best) = argmax(
                    ws.prev
                        .iter()
                        .enumerate()
                        .map(|(from, &v)| v + self.transitions.log_prob(from, to)),
                );
                lattice_row[to] = best_from as u32;
                ws.curr[to] = best + ws.emit[to];
            }
        }

        // Backtrace from the best final state
        let (final_state, log_likelihood) = argmax(ws.curr.iter().copied());
        let mut path = vec![0usize; n_snps];
        path[n_snps - 1] = final_state;
        for t in (0..n_snps - 1).rev() {
            path[t] = ws.lattice[t * n_states + path[t + 1]] as usize;
        }

        Ok(ViterbiPath {
            states: path.into_iter().map(|s| self.space.state(s)).collect(),
            log_likelihood,
            final_scores: ws.curr.clone(),
        })
    }
}

/// Decode one chromosome: build the state space for `refs.n_samples()`
/// strains and run Viterbi.
pub fn viterbi_decode(
    emission: &EmissionModel,
    trans_prob: f64,
    refs: &CodeMatrix,
    observed: &[AbCode],
) -> Result<ViterbiPath> {
    DiplotypeHmm::new(emission, trans_prob, refs.n_samples())?.decode(refs, observed)
}
