//! # Call Concordance
//!
//! QC statistics comparing the sample's observed calls with the calls its
//! decoded parental diplotype predicts.
//!
//! A SNP is informative when the sample call is not N. An informative SNP is
//! concordant when:
//! - neither decoded parent is N or H, and
//! - the parents differ and the sample is H, or
//! - the parents agree and the sample carries that same homozygous call.
//!
//! Totals are also accumulated into windows of `bin_size` informative SNPs
//! for plotting; a trailing partial window is kept.

use serde::{Deserialize, Serialize};

use crate::data::genotype::AbCode;
use crate::data::matrix::CodeMatrix;
use crate::error::{Result, StrainHapError};
use crate::model::states::DiplotypeState;

/// Informative SNPs per concordance window in production plots
pub const DEFAULT_BIN_SIZE: usize = 50;

/// One window of informative SNPs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceBin {
    pub start_position_bp: u64,
    pub end_position_bp: u64,
    pub informative_count: usize,
    pub concordant_count: usize,
}

/// Chromosome-level concordance summary
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcordanceReport {
    pub informative_count: usize,
    pub concordant_count: usize,
    /// SNP indices of informative but discordant calls
    pub discordant_snp_indexes: Vec<usize>,
    pub concordance_bins: Vec<ConcordanceBin>,
}

impl ConcordanceReport {
    /// Percentage of informative SNPs that are concordant
    pub fn concordant_percent(&self) -> Option<f64> {
        concordant_percent(self.concordant_count, self.informative_count)
    }
}

/// `100 * concordant / informative`, or `None` with no informative SNPs
pub fn concordant_percent(concordant: usize, informative: usize) -> Option<f64> {
    (informative > 0).then(|| concordant as f64 * 100.0 / informative as f64)
}

/// Whether an observed call agrees with the two parental calls
pub fn is_concordant(parent1: AbCode, parent2: AbCode, observed: AbCode) -> bool {
    if parent1.is_uninformative_parent() || parent2.is_uninformative_parent() {
        false
    } else if parent1 != parent2 {
        observed == AbCode::H
    } else {
        observed == parent1
    }
}

/// Running state of the window being filled
#[derive(Default)]
struct OpenBin {
    start_position_bp: Option<u64>,
    informative_count: usize,
    concordant_count: usize,
}

impl OpenBin {
    fn close(&mut self, end_position_bp: u64) -> ConcordanceBin {
        let bin = ConcordanceBin {
            start_position_bp: self.start_position_bp.unwrap_or(end_position_bp),
            end_position_bp,
            informative_count: self.informative_count,
            concordant_count: self.concordant_count,
        };
        *self = Self::default();
        bin
    }
}

/// Score a decoded path against the sample's calls.
pub fn score(
    states: &[DiplotypeState],
    observed: &[AbCode],
    refs: &CodeMatrix,
    positions: &[u64],
    bin_size: usize,
) -> Result<ConcordanceReport> {
    if bin_size == 0 {
        return Err(StrainHapError::config("concordance bin size must be positive"));
    }
    StrainHapError::check_len("observed codes", states.len(), observed.len())?;
    StrainHapError::check_len("reference SNP rows", states.len(), refs.n_snps())?;
    StrainHapError::check_len("SNP positions", states.len(), positions.len())?;
    if let Some(bad) = states
        .iter()
        .find(|s| s.first.as_usize() >= refs.n_samples() || s.second.as_usize() >= refs.n_samples())
    {
        return Err(StrainHapError::invalid_data(format!(
            "state {:?} refers to a strain beyond the {} reference columns",
            bad,
            refs.n_samples()
        )));
    }

    let mut report = ConcordanceReport::default();
    let mut bin = OpenBin::default();

    for (t, (&state, &obs)) in states.iter().zip(observed).enumerate() {
        let pos = positions[t];
        bin.start_position_bp.get_or_insert(pos);

        if obs == AbCode::N {
            continue;
        }

        let row = refs.row(t);
        let concordant = is_concordant(
            row[state.first.as_usize()],
            row[state.second.as_usize()],
            obs,
        );

        bin.informative_count += 1;
        report.informative_count += 1;
        if concordant {
            bin.concordant_count += 1;
            report.concordant_count += 1;
        } else {
            report.discordant_snp_indexes.push(t);
        }

        if bin.informative_count >= bin_size {
            report.concordance_bins.push(bin.close(pos));
        }
    }

    if bin.informative_count > 0 {
        if let Some(&last) = positions.last() {
            report.concordance_bins.push(bin.close(last));
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use AbCode::*;

    fn s(i: usize, j: usize) -> DiplotypeState {
        DiplotypeState::new(i, j)
    }

    #[test]
    fn test_concordance_rules() {
        assert!(is_concordant(A, A, A));
        assert!(!is_concordant(A, A, B));
        assert!(!is_concordant(A, A, H));
        assert!(is_concordant(A, B, H));
        assert!(is_concordant(B, A, H));
        assert!(!is_concordant(A, B, A));
        assert!(!is_concordant(H, H, H));
        assert!(!is_concordant(N, A, A));
    }

    #[test]
    fn test_score_counts_and_discordant() {
        let refs = CodeMatrix::from_rows(vec![
            vec![A, B],
            vec![A, B],
            vec![A, B],
            vec![H, B],
            vec![A, B],
        ])
        .unwrap();
        let states = vec![s(0, 0), s(1, 1), s(0, 1), s(0, 1), s(0, 0)];
        let observed = vec![A, A, H, H, N];
        let report = score(&states, &observed, &refs, &[10, 20, 30, 40, 50], 50).unwrap();
        assert_eq!(report.informative_count, 4);
        assert_eq!(report.concordant_count, 2);
        assert_eq!(report.discordant_snp_indexes, vec![1, 3]);
        assert_eq!(
            report.concordance_bins,
            vec![ConcordanceBin {
                start_position_bp: 10,
                end_position_bp: 50,
                informative_count: 4,
                concordant_count: 2,
            }]
        );
        assert_eq!(report.concordant_percent(), Some(50.0));
    }

    #[test]
    fn test_bins_close_on_informative_count() {
        // positions 1..=7, SNP 2 is a no-call
        let refs = CodeMatrix::from_rows(vec![vec![A]; 7]).unwrap();
        let states = vec![s(0, 0); 7];
        let observed = vec![A, N, A, B, A, A, A];
        let positions: Vec<u64> = (1..=7).collect();
        let report = score(&states, &observed, &refs, &positions, 2).unwrap();
        assert_eq!(
            report.concordance_bins,
            vec![
                ConcordanceBin { start_position_bp: 1, end_position_bp: 3, informative_count: 2, concordant_count: 2 },
                ConcordanceBin { start_position_bp: 4, end_position_bp: 5, informative_count: 2, concordant_count: 1 },
                ConcordanceBin { start_position_bp: 6, end_position_bp: 7, informative_count: 2, concordant_count: 2 },
            ]
        );
    }

    #[test]
    fn test_trailing_partial_bin_ends_at_last_snp() {
        let refs = CodeMatrix::from_rows(vec![vec![B]; 4]).unwrap();
        let states = vec![s(0, 0); 4];
        let observed = vec![B, B, B, N];
        let report = score(&states, &observed, &refs, &[5, 6, 7, 8], 2).unwrap();
        assert_eq!(report.concordance_bins.len(), 2);
        assert_eq!(report.concordance_bins[1].start_position_bp, 7);
        assert_eq!(report.concordance_bins[1].end_position_bp, 8);
        assert_eq!(report.concordance_bins[1].informative_count, 1);
    }

    #[test]
    fn test_all_no_calls() {
        let refs = CodeMatrix::from_rows(vec![vec![A, B]; 3]).unwrap();
        let report = score(&[s(0, 1); 3], &[N, N, N], &refs, &[1, 2, 3], 50).unwrap();
        assert_eq!(report.informative_count, 0);
        assert_eq!(report.concordant_count, 0);
        assert!(report.concordance_bins.is_empty());
        assert!(report.discordant_snp_indexes.is_empty());
        assert_eq!(report.concordant_percent(), None);
    }

    #[test]
    fn test_counts_are_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let n = rng.gen_range(1..500);
            let k = rng.gen_range(1..5);
            let rows: Vec<Vec<AbCode>> = (0..n)
                .map(|_| (0..k).map(|_| AbCode::ALL[rng.gen_range(0..4)]).collect())
                .collect();
            let refs = CodeMatrix::from_rows(rows).unwrap();
            let observed: Vec<AbCode> = (0..n).map(|_| AbCode::ALL[rng.gen_range(0..4)]).collect();
            let states: Vec<DiplotypeState> = (0..n)
                .map(|_| {
                    let i = rng.gen_range(0..k);
                    s(i, rng.gen_range(i..k))
                })
                .collect();
            let positions: Vec<u64> = (0..n as u64).map(|p| p * 10).collect();
            let report = score(&states, &observed, &refs, &positions, 50).unwrap();

            let called = observed.iter().filter(|&&o| o != N).count();
            assert!(report.informative_count <= called);
            assert!(report.concordant_count <= report.informative_count);
            let binned: usize = report.concordance_bins.iter().map(|b| b.informative_count).sum();
            assert_eq!(binned, report.informative_count);
            assert_eq!(
                report.discordant_snp_indexes.len(),
                report.informative_count - report.concordant_count
            );
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let refs = CodeMatrix::from_rows(vec![vec![A, B]; 2]).unwrap();
        assert!(score(&[s(0, 0); 2], &[A, A], &refs, &[1, 2], 0).is_err());
        assert!(score(&[s(0, 0); 2], &[A], &refs, &[1, 2], 50).is_err());
        assert!(score(&[s(0, 2); 2], &[A, A], &refs, &[1, 2], 50).is_err());
    }
}
