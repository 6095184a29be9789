//! # spgram
//!
//! Streaming power spectral density and waterfall estimation for complex
//! baseband (I/Q) samples.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐  execute(&[IQSample])  ┌──────────────────────┐
//! │  sample producer │ ─────────────────────▶ │  WaterfallEstimator  │
//! │  (radio, file,   │                        │   slot ring (time)   │
//! │   simulator)     │                        └──────────┬───────────┘
//! └──────────────────┘                                   │ per slot
//!          │                                             ▼
//!          │              execute(&[IQSample])  ┌──────────────────────┐
//!          └──────────────────────────────────▶ │  SpectralEstimator   │
//!                                               │ window ▸ FFT ▸ |X|²  │
//!                                               └──────────────────────┘
//! ```
//!
//! Both estimators are synchronous and single-owner: `execute` runs every
//! transform its input completes before returning, and `get_psd` is a pure
//! read. Share an estimator across threads by wrapping it in a mutex or by
//! cloning a snapshot for readers.
//!
//! ## Usage
//!
//! ```rust
//! use spgram_core::prelude::*;
//!
//! let mut psd = SpectralEstimator::new(SpectrumConfig::new(600, 400, 10))?;
//! psd.execute(&vec![IQSample::new(1.0, 0.0); 4096]);
//!
//! let estimate = psd.get_psd_normalized();
//! assert_eq!(estimate.frequencies.len(), 600);
//! # Ok::<(), PsdError>(())
//! ```

pub mod analysis;
pub mod fft_utils;
pub mod types;

// Re-exports
pub use analysis::{
    Averaging, PsdEstimate, SpectralEstimator, SpectrumConfig, WaterfallConfig, WaterfallEstimator,
    WaterfallResult, WindowFunction,
};
pub use types::{Complex, IQBuffer, IQSample, PsdError, PsdResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{
        Averaging, PsdEstimate, SpectralEstimator, SpectrumConfig, WaterfallConfig,
        WaterfallEstimator, WaterfallResult, WindowFunction,
    };
    pub use crate::types::{IQSample, PsdError, PsdResult};
}
