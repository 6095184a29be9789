//! Power Spectral Density Demo
//!
//! Streams a continuous tone-plus-noise signal into a spectral estimator
//! until enough samples have been seen, then prints the strongest bins on
//! a normalized frequency axis.
//!
//! Run with: cargo run --example psd_demo -p spgram-sim

use spgram_core::analysis::{SpectralEstimator, SpectrumConfig};
use spgram_core::PsdError;
use spgram_sim::{SignalConfig, SignalSource, TestSignal};
use tracing_subscriber::EnvFilter;

const NUM_SAMPLES: u64 = 4_000_000;
const BLOCK_LEN: usize = 2_400;

fn main() -> Result<(), PsdError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("SPGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let mut signal = TestSignal::new(SignalConfig::noise(1e-3, 7).with_tone(0.1, 1.0).with_tone(-0.2, 0.1));
    let mut psd = SpectralEstimator::new(SpectrumConfig::new(600, 400, 10))?;
    println!("{}", psd);

    let mut magnitude_sum = 0.0;
    while psd.num_samples_total() < NUM_SAMPLES {
        let block = signal.generate(BLOCK_LEN);
        magnitude_sum += block.iter().map(|s| s.norm()).sum::<f64>();
        psd.execute(&block);
    }

    let estimate = psd.get_psd_normalized();
    println!(
        "{} samples, {} transforms, mean |x| = {:.4}",
        psd.num_samples_total(),
        estimate.num_transforms,
        magnitude_sum / psd.num_samples_total() as f64
    );

    let db = estimate.psd_db();
    let mut order: Vec<usize> = (0..db.len()).collect();
    order.sort_by(|&a, &b| db[b].total_cmp(&db[a]));

    println!("  f/Fs        Power (dB)");
    println!("{}", "─".repeat(26));
    for &i in order.iter().take(8) {
        println!("{:>+8.4}    {:>10.2}", estimate.frequencies[i], db[i]);
    }

    Ok(())
}
