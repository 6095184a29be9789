//! # spgram test signal sources
//!
//! Deterministic I/Q producers for exercising the spgram estimators in
//! tests, benchmarks and demos. Every source takes an explicit seed, so a
//! run is reproducible without touching any process-wide RNG state.
//!
//! ## Sources
//!
//! - **NoiseSource**: complex AWGN with a given total variance
//! - **ToneSource**: phase-continuous complex exponential
//! - **TestSignal**: tones plus noise, optionally gated into bursts
//!
//! ## Usage
//!
//! ```rust
//! use spgram_sim::{NoiseSource, SignalSource, ToneSource};
//!
//! let mut noise = NoiseSource::new(0.01, 42);
//! let mut tone = ToneSource::new(0.125, 1.0);
//!
//! let mut samples = tone.generate(1024);
//! noise.add_to(&mut samples);
//! assert_eq!(samples.len(), 1024);
//! ```

pub mod noise;
pub mod scenario;
pub mod tone;

use spgram_core::types::IQSample;

// Re-exports
pub use noise::NoiseSource;
pub use scenario::{BurstConfig, SignalConfig, TestSignal, ToneConfig};
pub use tone::ToneSource;

/// A producer of I/Q samples
pub trait SignalSource {
    /// Produce the next `n` samples of the stream
    fn generate(&mut self, n: usize) -> Vec<IQSample>;

    /// Restart the stream from its initial state
    fn reset(&mut self);
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::noise::NoiseSource;
    pub use crate::scenario::{SignalConfig, TestSignal};
    pub use crate::tone::ToneSource;
    pub use crate::SignalSource;
}
