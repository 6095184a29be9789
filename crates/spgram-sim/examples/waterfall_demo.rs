//! Waterfall Demo
//!
//! Streams noise with intermittent bursts into a waterfall estimator and
//! prints a coarse view of the resulting time/frequency history.
//!
//! Run with: SPGRAM_LOG=debug cargo run --example waterfall_demo -p spgram-sim

use spgram_core::analysis::{WaterfallConfig, WaterfallEstimator};
use spgram_core::PsdError;
use spgram_sim::{NoiseSource, SignalConfig, SignalSource, TestSignal};
use tracing_subscriber::EnvFilter;

const NUM_SAMPLES: u64 = 20_000;
const FRAME_LEN: usize = 1_000;
const SAMPLE_RATE: f64 = 20e6;
const CENTER_FREQ: f64 = 460e6;

fn main() -> Result<(), PsdError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("SPGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config = WaterfallConfig::new(600, 800, 400, 1).with_slot_len(25);
    let mut waterfall = WaterfallEstimator::new(config)?;
    println!("{}", waterfall);

    let mut noise = NoiseSource::new(0.01, 1);
    let mut frame = TestSignal::new(
        SignalConfig::noise(0.01, 2)
            .with_sample_rate(SAMPLE_RATE)
            .with_tone(-3.2e6, 1.0)
            .with_tone(4.1e6, 0.5),
    );

    while waterfall.num_samples_total() < NUM_SAMPLES {
        waterfall.execute(&noise.generate(FRAME_LEN));
        waterfall.execute(&frame.generate(FRAME_LEN));
        waterfall.execute(&noise.generate(FRAME_LEN));
    }

    let result = waterfall.get_psd(SAMPLE_RATE, CENTER_FREQ);
    let (width, height) = result.dimensions();
    println!(
        "Sxx: ({}, {}) t: ({},) f: ({},)",
        height,
        width,
        result.times.len(),
        result.frequencies.len()
    );

    // One character per 40 rows / 30 bins, '#' where the cell exceeds the noise floor by 10 dB
    let db = result.power_db();
    let floor = -20.0;
    for rows in db.chunks(40) {
        let line: String = (0..width / 30)
            .map(|col| {
                let peak = rows
                    .iter()
                    .flat_map(|r| r[col * 30..(col + 1) * 30].iter())
                    .cloned()
                    .fold(f64::NEG_INFINITY, f64::max);
                if peak > floor + 10.0 {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{}", line);
    }
    println!(
        "{:.1} MHz .. {:.1} MHz",
        result.frequencies[0] * 1e-6,
        result.frequencies[width - 1] * 1e-6
    );

    Ok(())
}
