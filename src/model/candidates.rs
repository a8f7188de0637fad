//! # Candidate Strain Pairs
//!
//! Ranks every unordered pair of contributing strains by how well it explains
//! the sample's calls over a genomic interval, ignoring transitions. Used to
//! suggest alternatives to the decoded diplotype for a region.

use serde::{Deserialize, Serialize};

use crate::data::genotype::AbCode;
use crate::data::matrix::CodeMatrix;
use crate::data::strain::StrainIdx;
use crate::error::{Result, StrainHapError};
use crate::model::emission::EmissionModel;
use crate::model::states::StateSpace;

/// Pairs returned when the caller gives no limit
pub const DEFAULT_CANDIDATE_LIMIT: usize = 20;

/// One scored strain pair
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidatePair {
    pub haplotype_index_1: StrainIdx,
    pub haplotype_index_2: StrainIdx,
    /// `-ln P(observed | pair)`; lower is better
    pub neg_log_likelihood: f64,
}

/// SNP index range `[left, right)` whose positions fall in `[start_bp, end_bp]`
pub fn snp_range(positions: &[u64], start_bp: u64, end_bp: u64) -> (usize, usize) {
    let left = positions.partition_point(|&p| p < start_bp);
    let right = left + positions[left..].partition_point(|&p| p <= end_bp);
    (left, right)
}

/// Rank all pairs `(i, j)` with `i <= j` over the SNPs inside `[start_bp, end_bp]`.
///
/// Pairs are ordered by descending log-likelihood; ties keep enumeration
/// order. At most `limit` pairs are returned, and none when no SNP falls in
/// the interval or there are no strains. `positions` must be sorted.
pub fn rank_pairs(
    model: &EmissionModel,
    refs: &CodeMatrix,
    observed: &[AbCode],
    positions: &[u64],
    start_bp: u64,
    end_bp: u64,
    limit: usize,
) -> Result<Vec<CandidatePair>> {
    StrainHapError::check_len("observed codes", refs.n_snps(), observed.len())?;
    StrainHapError::check_len("SNP positions", refs.n_snps(), positions.len())?;

    let (left, right) = snp_range(positions, start_bp, end_bp);
    if left == right || refs.n_samples() == 0 {
        return Ok(Vec::new());
    }

    let columns: Vec<Vec<AbCode>> = (0..refs.n_samples())
        .map(|s| refs.column(s)[left..right].to_vec())
        .collect();
    let observed = &observed[left..right];

    let space = StateSpace::new(refs.n_samples())?;
    let mut scored = space
        .states()
        .iter()
        .map(|state| {
            let hap1 = &columns[state.first.as_usize()];
            let hap2 = &columns[state.second.as_usize()];
            Ok((*state, model.log_likelihood(hap1, hap2, observed)?))
        })
        .collect::<Result<Vec<_>>>()?;

    // stable, so equal likelihoods stay in (i, j) order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);

    Ok(scored
        .into_iter()
        .map(|(state, ll)| CandidatePair {
            haplotype_index_1: state.first,
            haplotype_index_2: state.second,
            neg_log_likelihood: -ll,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use AbCode::*;

    fn model() -> EmissionModel {
        EmissionModel::build([50.0, 0.5, 1.0, 1.0], [50.0, 2.0, 2.0], [1.0, 1.0, 1.0]).unwrap()
    }

    fn pairs(candidates: &[CandidatePair]) -> Vec<(usize, usize)> {
        candidates
            .iter()
            .map(|c| (c.haplotype_index_1.as_usize(), c.haplotype_index_2.as_usize()))
            .collect()
    }

    #[test]
    fn test_snp_range_includes_both_ends() {
        let positions = [100, 200, 200, 300, 400];
        assert_eq!(snp_range(&positions, 200, 300), (1, 4));
        assert_eq!(snp_range(&positions, 150, 250), (1, 3));
        assert_eq!(snp_range(&positions, 0, 99), (0, 0));
        assert_eq!(snp_range(&positions, 401, 500), (5, 5));
        assert_eq!(snp_range(&positions, 300, 200), (3, 3));
    }

    #[test]
    fn test_best_pair_first() {
        let refs = CodeMatrix::from_rows(vec![
            vec![A, B, A],
            vec![A, B, B],
            vec![B, A, A],
        ])
        .unwrap();
        let observed = [H, H, H];
        let ranked = rank_pairs(&model(), &refs, &observed, &[10, 20, 30], 0, 100, 20).unwrap();
        assert_eq!(ranked.len(), 6);
        assert_eq!(pairs(&ranked)[0], (0, 1));
        for w in ranked.windows(2) {
            assert!(w[0].neg_log_likelihood <= w[1].neg_log_likelihood);
        }
        let expected = -model().log_likelihood(&[A, A, B], &[B, B, A], &observed).unwrap();
        assert!((ranked[0].neg_log_likelihood - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ties_keep_enumeration_order() {
        // identical strains score every pair the same
        let refs = CodeMatrix::from_rows(vec![vec![A, A, A], vec![B, B, B]]).unwrap();
        let ranked = rank_pairs(&model(), &refs, &[A, B], &[1, 2], 1, 2, 20).unwrap();
        assert_eq!(
            pairs(&ranked),
            vec![(0, 0), (0, 1), (0, 2), (1, 1), (1, 2), (2, 2)]
        );
    }

    #[test]
    fn test_interval_restricts_snps() {
        let refs = CodeMatrix::from_rows(vec![vec![A, B], vec![A, B], vec![B, A]]).unwrap();
        let observed = [A, A, B];
        let positions = [100, 200, 300];

        // only the SNP at exactly 300 is scored, where strain 0 carries B
        let ranked = rank_pairs(&model(), &refs, &observed, &positions, 300, 300, 20).unwrap();
        assert_eq!(pairs(&ranked)[0], (0, 0));
        let expected = -model().log_prob(B, B, B);
        assert!((ranked[0].neg_log_likelihood - expected).abs() < 1e-12);

        let ranked = rank_pairs(&model(), &refs, &observed, &positions, 100, 200, 20).unwrap();
        assert_eq!(pairs(&ranked)[0], (0, 0));
        let expected = -2.0 * model().log_prob(A, A, A);
        assert!((ranked[0].neg_log_likelihood - expected).abs() < 1e-12);
    }

    #[test]
    fn test_truncates_to_limit() {
        let refs = CodeMatrix::from_rows(vec![vec![A, B, H, N]]).unwrap();
        let ranked = rank_pairs(&model(), &refs, &[A], &[5], 0, 10, 3).unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(pairs(&ranked)[0], (0, 0));
        assert!(rank_pairs(&model(), &refs, &[A], &[5], 0, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn test_empty_interval_and_shape_errors() {
        let refs = CodeMatrix::from_rows(vec![vec![A, B]]).unwrap();
        assert!(rank_pairs(&model(), &refs, &[A], &[5], 6, 10, 20).unwrap().is_empty());
        assert!(rank_pairs(&model(), &CodeMatrix::new(1, 0), &[A], &[5], 0, 10, 20)
            .unwrap()
            .is_empty());
        assert!(rank_pairs(&model(), &refs, &[A, B], &[5], 0, 10, 20).is_err());
    }
}
