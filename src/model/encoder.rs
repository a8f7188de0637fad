//! # Genotype Encoder
//!
//! Converts forward-strand allele pairs into AB codes relative to each SNP's
//! X/Y probe alleles. Samples are encoded together into one `CodeMatrix`
//! (typically the observed sample followed by its contributing strains).

use crate::data::genotype::{AbCode, AlleleCalls};
use crate::data::matrix::CodeMatrix;
use crate::data::snp::Snp;
use crate::error::{Result, StrainHapError};

/// Encode every sample against the SNP list.
///
/// Column `s` of the result holds `samples[s]`. Fails on the first allele
/// pair that fits none of N/A/B/H, naming the sample and SNP index.
pub fn encode(snps: &[Snp], samples: &[AlleleCalls]) -> Result<CodeMatrix> {
    let n_snps = snps.len();
    let mut codes = CodeMatrix::new(n_snps, samples.len());

    for (s, calls) in samples.iter().enumerate() {
        StrainHapError::check_len(
            &format!("allele1 calls of sample {:?}", calls.sample_id),
            n_snps,
            calls.allele1_fwds.len(),
        )?;
        StrainHapError::check_len(
            &format!("allele2 calls of sample {:?}", calls.sample_id),
            n_snps,
            calls.allele2_fwds.len(),
        )?;

        for (t, snp) in snps.iter().enumerate() {
            let a1 = calls.allele1_fwds[t];
            let a2 = calls.allele2_fwds[t];
            let code = AbCode::from_alleles(a1, a2, snp.x_probe_call, snp.y_probe_call)
                .ok_or_else(|| StrainHapError::Encoding {
                    sample: calls.sample_id.clone(),
                    snp_index: t,
                    allele1: a1,
                    allele2: a2,
                })?;
            codes.set(t, s, code);
        }
    }

    Ok(codes)
}

/// Encode a single sample into a code vector
pub fn encode_sample(snps: &[Snp], calls: &AlleleCalls) -> Result<Vec<AbCode>> {
    Ok(encode(snps, std::slice::from_ref(calls))?.column(0))
}

/// Validate pre-encoded numeric codes (0..=3) for one sample
pub fn codes_from_raw(raw: &[u8]) -> Result<Vec<AbCode>> {
    raw.iter().map(|&c| AbCode::from_u8(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::snp::tests::make_snp;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use AbCode::*;

    fn three_snps() -> Vec<Snp> {
        vec![
            make_snp("rs1", 100, 'A', 'G'),
            make_snp("rs2", 200, 'C', 'T'),
            make_snp("rs3", 300, 'G', 'T'),
        ]
    }

    #[test]
    fn test_encode_matrix_layout() {
        let snps = three_snps();
        let samples = vec![
            AlleleCalls::from_pairs("obs", ["AA", "CT", "--"]),
            AlleleCalls::from_pairs("ref0", ["GG", "TC", "GT"]),
        ];
        let codes = encode(&snps, &samples).unwrap();
        assert_eq!(codes.n_snps(), 3);
        assert_eq!(codes.n_samples(), 2);
        assert_eq!(codes.column(0), vec![A, H, N]);
        assert_eq!(codes.column(1), vec![B, H, H]);
    }

    #[test]
    fn test_encode_error_names_offender() {
        let snps = three_snps();
        let samples = vec![
            AlleleCalls::from_pairs("ok", ["AA", "CC", "GG"]),
            AlleleCalls::from_pairs("bad", ["AA", "CA", "GG"]),
        ];
        let err = encode(&snps, &samples).unwrap_err();
        match err {
            StrainHapError::Encoding {
                sample, snp_index, ..
            } => {
                assert_eq!(sample, "bad");
                assert_eq!(snp_index, 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_encode_length_mismatch() {
        let snps = three_snps();
        let samples = vec![AlleleCalls::from_pairs("short", ["AA", "CC"])];
        let err = encode(&snps, &samples).unwrap_err();
        assert!(matches!(err, StrainHapError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_reencoding_is_stable() {
        let nucleotides = ['A', 'C', 'G', 'T'];
        let mut rng = StdRng::seed_from_u64(7);
        let snps: Vec<Snp> = (0..200)
            .map(|i| {
                let x = nucleotides[rng.gen_range(0..4)];
                let mut y = nucleotides[rng.gen_range(0..4)];
                while y == x {
                    y = nucleotides[rng.gen_range(0..4)];
                }
                make_snp(&format!("rs{}", i), 100 * i as u64, x, y)
            })
            .collect();

        let mut a1 = Vec::new();
        let mut a2 = Vec::new();
        for snp in &snps {
            let choices = ['-', snp.x_probe_call, snp.y_probe_call];
            a1.push(choices[rng.gen_range(0..3)]);
            a2.push(choices[rng.gen_range(0..3)]);
        }
        let calls = AlleleCalls::new("rand", a1, a2);
        let first = encode_sample(&snps, &calls).unwrap();

        let (r1, r2): (Vec<char>, Vec<char>) = first
            .iter()
            .zip(&snps)
            .map(|(code, snp)| code.canonical_alleles(snp.x_probe_call, snp.y_probe_call))
            .unzip();
        let second = encode_sample(&snps, &AlleleCalls::new("rand", r1, r2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_codes_from_raw() {
        assert_eq!(codes_from_raw(&[0, 1, 2, 3]).unwrap(), vec![N, A, B, H]);
        assert!(codes_from_raw(&[4]).is_err());
    }
}
