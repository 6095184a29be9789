//! Spectral Estimation Module
//!
//! Streaming estimators that turn an unbounded I/Q sample stream into
//! averaged power spectra.
//!
//! ## Features
//!
//! - **Spectral Estimator**: overlapped, windowed periodogram averaging with
//!   running-mean or exponential accumulation
//! - **Waterfall Estimator**: bounded time-by-frequency history built from
//!   fixed-length slots of the stream
//! - **Window Functions**: Hann, Hamming, Blackman, Blackman-Harris, flat-top,
//!   triangular and Kaiser tapers
//!
//! ## Example
//!
//! ```rust
//! use spgram_core::analysis::{WaterfallConfig, WaterfallEstimator};
//! use spgram_core::types::IQSample;
//!
//! let mut waterfall = WaterfallEstimator::new(WaterfallConfig::new(64, 32, 48, 16)).unwrap();
//! waterfall.execute(&vec![IQSample::new(0.5, -0.5); 64 * 40]);
//!
//! let result = waterfall.get_psd(1e6, 915e6);
//! assert_eq!(result.dimensions(), (64, 32));
//! ```

pub mod spectrum;
pub mod waterfall;
pub mod window;

pub use spectrum::{power_to_db, Averaging, PsdEstimate, SpectralEstimator, SpectrumConfig};
pub use waterfall::{WaterfallConfig, WaterfallEstimator, WaterfallResult};
pub use window::WindowFunction;
