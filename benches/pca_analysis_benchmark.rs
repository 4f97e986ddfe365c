use chem_extensions::analysis::{PcaAnalysis, PipelineConfig};
use chem_extensions::clustering::KMeans;
use chem_extensions::dimred::PCABuilder;
use chem_extensions::fingerprint::{to_matrix, FingerprintEncoder, MorganEncoder};
use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BenchmarkGroup, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

const CORES: [&str; 8] = [
    "C",
    "CC",
    "CCC",
    "CC(C)",
    "c1ccccc1",
    "C1CCCCC1",
    "c1ccncc1",
    "C1CCOC1",
];
const LINKERS: [&str; 5] = ["", "C", "CC", "OC", "NC"];
const GROUPS: [&str; 8] = ["O", "N", "C(=O)O", "Cl", "C#N", "C(=O)N", "S", "F"];

#[derive(Clone)]
pub struct PipelineBenchConfig {
    seed: u64,
    library_sizes: Vec<usize>,
    n_bits: Vec<usize>,
    measurement_time: u64,
    sample_size: usize,
}

impl Default for PipelineBenchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            library_sizes: vec![50, 200, 1000],
            n_bits: vec![512, 2048],
            measurement_time: 10,
            sample_size: 10,
        }
    }
}

fn create_library(size: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size)
        .map(|_| {
            format!(
                "{}{}{}",
                CORES[rng.random_range(0..CORES.len())],
                LINKERS[rng.random_range(0..LINKERS.len())],
                GROUPS[rng.random_range(0..GROUPS.len())]
            )
        })
        .collect()
}

fn configure_group<'a, M: Measurement>(
    c: &'a mut Criterion<M>,
    name: &str,
    config: &PipelineBenchConfig,
) -> BenchmarkGroup<'a, M> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(config.measurement_time));
    group.sample_size(config.sample_size);
    group
}

pub fn bench_stages(c: &mut Criterion) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = PipelineBenchConfig::default();
    let mut group = configure_group(c, "PCA_Analysis_Stages", &config);

    for &size in config.library_sizes.iter() {
        for &n_bits in config.n_bits.iter() {
            let library = create_library(size, config.seed + size as u64);
            let encoder = MorganEncoder::new(1, n_bits).unwrap();
            let label = format!("{}mol_{}bits", size, n_bits);

            group.bench_with_input(BenchmarkId::new("encode", &label), &library, |b, library| {
                b.iter(|| encoder.encode_all(library));
            });

            let fingerprints: Vec<_> = encoder
                .encode_all(&library)
                .into_iter()
                .filter_map(Result::ok)
                .collect();
            let refs: Vec<_> = fingerprints.iter().collect();
            let matrix = to_matrix(&refs);

            group.bench_with_input(BenchmarkId::new("pca", &label), &matrix, |b, matrix| {
                b.iter(|| {
                    let mut pca = PCABuilder::with_default_svd().build();
                    pca.fit_transform(matrix.view()).unwrap()
                });
            });

            let mut pca = PCABuilder::with_default_svd().build();
            let projection = pca.fit_transform(matrix.view()).unwrap();
            group.bench_with_input(BenchmarkId::new("kmeans", &label), &projection, |b, projection| {
                b.iter(|| KMeans::new(5).fit(projection.view()).unwrap());
            });
        }
    }
    group.finish();
}

pub fn bench_pipeline(c: &mut Criterion) {
    let config = PipelineBenchConfig::default();
    let mut group = configure_group(c, "PCA_Analysis_Pipeline", &config);

    for &size in config.library_sizes.iter() {
        let library = create_library(size, config.seed + size as u64);
        let pipeline_config = PipelineConfig::builder()
            .return_mapping(true)
            .build()
            .unwrap();
        let analysis = PcaAnalysis::new(pipeline_config).unwrap();

        group.bench_with_input(BenchmarkId::new("mapping", size), &library, |b, library| {
            b.iter(|| analysis.conduct_analysis(library).unwrap());
        });
    }
    group.finish();
}

criterion_group!(pipeline_benches, bench_stages, bench_pipeline);
criterion_main!(pipeline_benches);
