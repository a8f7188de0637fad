use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

use strainhap::data::genotype::AbCode;
use strainhap::model::blocks::compress_and_extend;
use strainhap::model::concordance::score;
use strainhap::model::emission::{EmissionModel, EmissionProfiles};
use strainhap::model::hmm::DiplotypeHmm;
use strainhap::model::states::StateSpace;
use strainhap::utils::workspace::ViterbiWorkspace;
use strainhap::CodeMatrix;

/// Reference codes with long identical-by-descent stretches, and a sample
/// that is a noisy mosaic of two of them
fn synthetic_chromosome(n_snps: usize, n_strains: usize, seed: u64) -> (CodeMatrix, Vec<AbCode>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let rows: Vec<Vec<AbCode>> = (0..n_snps)
        .map(|_| {
            (0..n_strains)
                .map(|_| if rng.gen_bool(0.5) { AbCode::A } else { AbCode::B })
                .collect()
        })
        .collect();

    let (mut p1, mut p2) = (0, n_strains - 1);
    let observed = rows
        .iter()
        .map(|row| {
            if rng.gen_bool(0.001) {
                p1 = rng.gen_range(0..n_strains);
                p2 = rng.gen_range(0..n_strains);
            }
            if rng.gen_bool(0.02) {
                return AbCode::N;
            }
            match (row[p1], row[p2]) {
                (a, b) if a == b => a,
                _ => AbCode::H,
            }
        })
        .collect();
    (CodeMatrix::from_rows(rows).unwrap(), observed)
}

/// Viterbi decode scaling with the number of contributing strains
fn bench_viterbi_strains(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi_strains");
    group.sample_size(10);
    let model = EmissionModel::from_profiles(&EmissionProfiles::default()).unwrap();
    let n_snps = 5_000;

    for n_strains in [2, 5, 10, 15] {
        let n_states = StateSpace::count_for(n_strains);
        group.throughput(Throughput::Elements((n_snps * n_states * n_states) as u64));

        group.bench_with_input(
            BenchmarkId::new("strains", n_strains),
            &n_strains,
            |b, &n_strains| {
                let (refs, observed) = synthetic_chromosome(n_snps, n_strains, 42);
                let hmm = DiplotypeHmm::new(&model, 0.01, n_strains).unwrap();
                let mut ws = ViterbiWorkspace::new(n_states, n_snps);

                b.iter(|| {
                    let path = hmm
                        .decode_with(black_box(&refs), black_box(&observed), &mut ws)
                        .unwrap();
                    black_box(path.log_likelihood)
                })
            },
        );
    }

    group.finish();
}

/// Chromosome-scale decode at the maximum strain count
fn bench_viterbi_chromosome(c: &mut Criterion) {
    let mut group = c.benchmark_group("viterbi_chromosome");
    group.sample_size(10);
    let model = EmissionModel::from_profiles(&EmissionProfiles::default()).unwrap();
    let n_strains = 15;

    for n_snps in [10_000, 40_000] {
        group.throughput(Throughput::Elements(n_snps as u64));

        group.bench_with_input(BenchmarkId::new("snps", n_snps), &n_snps, |b, &n_snps| {
            let (refs, observed) = synthetic_chromosome(n_snps, n_strains, 7);
            let hmm = DiplotypeHmm::new(&model, 0.01, n_strains).unwrap();
            let mut ws = ViterbiWorkspace::default();

            b.iter(|| {
                let path = hmm.decode_with(&refs, &observed, &mut ws).unwrap();
                black_box(path.states.len())
            })
        });
    }

    group.finish();
}

/// Post-processing of a decoded path: blocks and concordance
fn bench_post_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("post_processing");
    let model = EmissionModel::from_profiles(&EmissionProfiles::default()).unwrap();
    let n_snps = 40_000;
    let n_strains = 8;
    let (refs, observed) = synthetic_chromosome(n_snps, n_strains, 3);
    let path = DiplotypeHmm::new(&model, 0.01, n_strains)
        .unwrap()
        .decode(&refs, &observed)
        .unwrap();
    let positions: Vec<u64> = (0..n_snps as u64).map(|i| 3_000_000 + i * 2_500).collect();
    group.throughput(Throughput::Elements(n_snps as u64));

    group.bench_function("blocks", |b| {
        b.iter(|| black_box(compress_and_extend(&path.states, &positions).unwrap().len()))
    });
    group.bench_function("concordance", |b| {
        b.iter(|| {
            let report = score(&path.states, &observed, &refs, &positions, 50).unwrap();
            black_box(report.concordant_count)
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_viterbi_strains,
    bench_viterbi_chromosome,
    bench_post_processing
);
criterion_main!(benches);
