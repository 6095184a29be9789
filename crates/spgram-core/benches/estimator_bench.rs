//! Benchmarks for the streaming estimators
//!
//! Run with: cargo bench -p spgram-core --bench estimator_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use spgram_core::analysis::{SpectralEstimator, SpectrumConfig, WaterfallConfig, WaterfallEstimator};
use spgram_sim::{NoiseSource, SignalSource};

const BLOCK_LEN: usize = 2_400;

fn bench_spectral_execute(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectral_execute");
    let block = NoiseSource::new(1.0, 42).generate(BLOCK_LEN);
    group.throughput(Throughput::Elements(BLOCK_LEN as u64));

    for (nfft, wlen, delay) in [(256, 256, 128), (600, 400, 10), (1024, 1024, 512), (4096, 4096, 1024)] {
        let mut psd = SpectralEstimator::new(SpectrumConfig::new(nfft, wlen, delay)).unwrap();
        group.bench_with_input(
            BenchmarkId::new(format!("delay_{}", delay), nfft),
            &nfft,
            |b, _| b.iter(|| psd.execute(black_box(&block))),
        );
    }

    group.finish();
}

fn bench_get_psd(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_psd");

    for nfft in [256, 1024, 4096] {
        let mut psd = SpectralEstimator::with_defaults(nfft).unwrap();
        psd.execute(&NoiseSource::new(1.0, 7).generate(nfft * 8));
        group.bench_with_input(BenchmarkId::from_parameter(nfft), &nfft, |b, _| {
            b.iter(|| psd.get_psd(black_box(20e6), black_box(460e6)))
        });
    }

    group.finish();
}

fn bench_waterfall(c: &mut Criterion) {
    let mut group = c.benchmark_group("waterfall");
    let block = NoiseSource::new(1.0, 3).generate(BLOCK_LEN);
    group.throughput(Throughput::Elements(BLOCK_LEN as u64));

    let config = WaterfallConfig::new(600, 800, 400, 10).with_slot_len(600);
    let mut waterfall = WaterfallEstimator::new(config).unwrap();
    group.bench_function("execute_600x800", |b| {
        b.iter(|| waterfall.execute(black_box(&block)))
    });
    group.bench_function("get_psd_600x800", |b| {
        b.iter(|| waterfall.get_psd(black_box(20e6), black_box(460e6)))
    });

    group.finish();
}

criterion_group!(benches, bench_spectral_execute, bench_get_psd, bench_waterfall);
criterion_main!(benches);
