//! Streaming Spectral Estimation
//!
//! Overlapped, windowed periodogram averaging (Welch's method) over an
//! unbounded stream of I/Q samples.
//!
//! ## Transform scheduling
//!
//! A read cursor walks the stream. Whenever `nfft` samples are available
//! at the cursor a segment is taken, tapered by the window, transformed,
//! and its per-bin power is folded into the accumulator. The cursor then
//! advances by `delay` samples:
//!
//! ```text
//!   stream:  ─────────────────────────────────────────────▶
//!            [── segment 0 (nfft) ──]
//!                 [── segment 1 (nfft) ──]
//!                      [── segment 2 (nfft) ──]
//!            |delay|
//! ```
//!
//! The window occupies the last `wlen` taps of each segment and the leading
//! `nfft - wlen` taps are zero, so each transform is a zero-padded transform
//! of the most recent `wlen` samples. With `delay < wlen` consecutive
//! segments overlap by `wlen - delay` samples; with `delay > nfft` samples
//! between segments are skipped.
//!
//! Only the unfinished tail of the stream (fewer than `nfft` samples) is
//! held between calls; segments are read straight from the caller's block.
//!
//! Because segment boundaries depend only on the absolute sample position,
//! the estimate is identical no matter how the stream is split across
//! `execute` calls.

use crate::analysis::window::WindowFunction;
use crate::fft_utils::FftProcessor;
use crate::types::{IQSample, PsdError, PsdResult};
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Floor used when converting zero power to dB
pub const POWER_FLOOR_DB: f64 = -200.0;

/// Convert linear power to dB for display
#[inline]
pub fn power_to_db(power: f64) -> f64 {
    if power > 1e-20 {
        10.0 * power.log10()
    } else {
        POWER_FLOOR_DB
    }
}

/// How successive periodograms are combined
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Averaging {
    /// Equal weight for every transform since the last clear
    #[default]
    RunningMean,
    /// Exponentially decaying average, `acc = (1 - alpha) * acc + alpha * P`
    Exponential { alpha: f64 },
}

impl Averaging {
    /// Validate the averaging factor
    pub fn validate(&self) -> PsdResult<()> {
        match *self {
            Averaging::RunningMean => Ok(()),
            Averaging::Exponential { alpha } => {
                if alpha > 0.0 && alpha <= 1.0 {
                    Ok(())
                } else {
                    Err(PsdError::InvalidAlpha(alpha))
                }
            }
        }
    }
}

/// Spectral estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumConfig {
    /// Transform size (number of frequency bins)
    pub nfft: usize,
    /// Window length in samples, `0 < wlen <= nfft`
    pub wlen: usize,
    /// Samples between the starts of successive transforms
    pub delay: usize,
    /// Taper applied to each segment
    pub window: WindowFunction,
    /// Periodogram averaging policy
    pub averaging: Averaging,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            nfft: 1024,
            wlen: 1024,
            delay: 512,
            window: WindowFunction::Hann,
            averaging: Averaging::RunningMean,
        }
    }
}

impl SpectrumConfig {
    /// Create a configuration with a Hann window and running-mean averaging
    pub fn new(nfft: usize, wlen: usize, delay: usize) -> Self {
        Self {
            nfft,
            wlen,
            delay,
            ..Default::default()
        }
    }

    /// Set the window function
    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.window = window;
        self
    }

    /// Set the averaging policy
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }

    /// Use exponential averaging with the given factor
    pub fn with_alpha(self, alpha: f64) -> Self {
        self.with_averaging(Averaging::Exponential { alpha })
    }

    /// Check all construction invariants
    pub fn validate(&self) -> PsdResult<()> {
        if self.nfft == 0 {
            return Err(PsdError::ZeroFftSize);
        }
        if self.wlen == 0 {
            return Err(PsdError::ZeroWindowLength);
        }
        if self.wlen > self.nfft {
            return Err(PsdError::WindowTooLong {
                wlen: self.wlen,
                nfft: self.nfft,
            });
        }
        if self.delay == 0 {
            return Err(PsdError::ZeroDelay);
        }
        self.window.validate()?;
        self.averaging.validate()
    }

    /// Overlap between consecutive windows in samples
    pub fn overlap(&self) -> usize {
        self.wlen.saturating_sub(self.delay)
    }
}

/// Finalized power spectral density
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsdEstimate {
    /// Linear power per bin, FFT-shifted (most negative frequency first)
    pub psd: Vec<f64>,
    /// Frequency of each bin in Hz (or f/Fs when normalized)
    pub frequencies: Vec<f64>,
    /// FFT size used
    pub nfft: usize,
    /// Sample rate used for the frequency axis
    pub sample_rate: f64,
    /// Center frequency offset of the axis
    pub center_frequency: f64,
    /// Number of transforms behind this estimate
    pub num_transforms: u64,
}

impl PsdEstimate {
    /// Power per bin in dB
    pub fn psd_db(&self) -> Vec<f64> {
        self.psd.iter().map(|&p| power_to_db(p)).collect()
    }

    /// Frequency resolution (bin spacing)
    pub fn freq_resolution(&self) -> f64 {
        self.sample_rate / self.nfft as f64
    }

    /// Index of the strongest bin in the shifted spectrum
    pub fn peak_index(&self) -> usize {
        let mut max_idx = 0;
        let mut max_power = f64::NEG_INFINITY;

        for (i, &power) in self.psd.iter().enumerate() {
            if power > max_power {
                max_power = power;
                max_idx = i;
            }
        }

        max_idx
    }

    /// Get the peak frequency and linear power
    pub fn find_peak(&self) -> (f64, f64) {
        let idx = self.peak_index();
        (self.frequencies[idx], self.psd[idx])
    }

    /// Mean power across all bins
    pub fn mean_power(&self) -> f64 {
        if self.psd.is_empty() {
            return 0.0;
        }
        self.psd.iter().sum::<f64>() / self.psd.len() as f64
    }

    /// True when no transform has contributed yet
    pub fn is_empty(&self) -> bool {
        self.num_transforms == 0
    }
}

/// Streaming power spectral density estimator
///
/// ```rust
/// use spgram_core::analysis::{SpectralEstimator, SpectrumConfig};
/// use spgram_core::types::IQSample;
///
/// let mut psd = SpectralEstimator::new(SpectrumConfig::new(64, 48, 16)).unwrap();
/// let samples = vec![IQSample::new(1.0, 0.0); 256];
/// psd.execute(&samples);
///
/// let estimate = psd.get_psd(1e6, 0.0);
/// assert_eq!(estimate.psd.len(), 64);
/// assert!(estimate.num_transforms > 0);
/// ```
#[derive(Debug, Clone)]
pub struct SpectralEstimator {
    config: SpectrumConfig,
    /// Window taps, `nfft` long with zeros ahead of the `wlen` taper
    window_coeffs: Vec<f64>,
    window_energy: f64,
    processor: FftProcessor,
    /// Transform input/output scratch
    frame: Vec<Complex64>,
    /// Start of the next segment onward, always shorter than `nfft`
    pending: Vec<IQSample>,
    /// Samples still to discard when `delay > nfft`
    skip: usize,
    /// Raw per-bin power, unshifted
    accumulator: Vec<f64>,
    num_transforms: u64,
    num_transforms_total: u64,
    num_samples: u64,
    num_samples_total: u64,
}

impl SpectralEstimator {
    /// Create a new estimator, validating the configuration
    pub fn new(config: SpectrumConfig) -> PsdResult<Self> {
        config.validate()?;

        let nfft = config.nfft;
        let mut window_coeffs = vec![0.0; nfft - config.wlen];
        window_coeffs.extend(config.window.generate(config.wlen));
        let window_energy: f64 = window_coeffs.iter().map(|w| w * w).sum();
        if window_energy <= 0.0 {
            return Err(PsdError::InvalidConfig(format!(
                "{:?} window of length {} has no energy",
                config.window, config.wlen
            )));
        }

        tracing::debug!(
            nfft,
            wlen = config.wlen,
            delay = config.delay,
            window = ?config.window,
            averaging = ?config.averaging,
            "created spectral estimator"
        );

        Ok(Self {
            window_coeffs,
            window_energy,
            processor: FftProcessor::new(nfft),
            frame: vec![Complex64::new(0.0, 0.0); nfft],
            pending: Vec::with_capacity(nfft),
            skip: 0,
            accumulator: vec![0.0; nfft],
            num_transforms: 0,
            num_transforms_total: 0,
            num_samples: 0,
            num_samples_total: 0,
            config,
        })
    }

    /// Estimator with `wlen = nfft`, half-window delay and a Hann taper
    pub fn with_defaults(nfft: usize) -> PsdResult<Self> {
        Self::new(SpectrumConfig::new(nfft, nfft, (nfft + 1) / 2))
    }

    /// Get the configuration
    pub fn config(&self) -> &SpectrumConfig {
        &self.config
    }

    /// Get the FFT size
    pub fn nfft(&self) -> usize {
        self.config.nfft
    }

    /// Get the window length
    pub fn wlen(&self) -> usize {
        self.config.wlen
    }

    /// Get the transform delay
    pub fn delay(&self) -> usize {
        self.config.delay
    }

    /// Get the window function
    pub fn window(&self) -> WindowFunction {
        self.config.window
    }

    /// Window taps as applied to each segment (`nfft` long)
    pub fn window_coeffs(&self) -> &[f64] {
        &self.window_coeffs
    }

    /// Sum of squared window taps
    pub fn window_energy(&self) -> f64 {
        self.window_energy
    }

    /// Get the averaging policy
    pub fn averaging(&self) -> Averaging {
        self.config.averaging
    }

    /// Samples fed since the last clear or reset
    pub fn num_samples(&self) -> u64 {
        self.num_samples
    }

    /// Samples fed over the estimator's lifetime
    pub fn num_samples_total(&self) -> u64 {
        self.num_samples_total
    }

    /// Transforms in the current estimate
    pub fn num_transforms(&self) -> u64 {
        self.num_transforms
    }

    /// Transforms computed over the estimator's lifetime
    pub fn num_transforms_total(&self) -> u64 {
        self.num_transforms_total
    }

    /// Switch the averaging policy, keeping the current estimate
    pub fn set_averaging(&mut self, averaging: Averaging) -> PsdResult<()> {
        averaging.validate()?;

        // Running mean keeps a sum, exponential keeps an average
        if self.num_transforms > 0 {
            let count = self.num_transforms as f64;
            match (self.config.averaging, averaging) {
                (Averaging::RunningMean, Averaging::Exponential { .. }) => {
                    self.accumulator.iter_mut().for_each(|p| *p /= count);
                }
                (Averaging::Exponential { .. }, Averaging::RunningMean) => {
                    self.accumulator.iter_mut().for_each(|p| *p *= count);
                }
                _ => {}
            }
        }

        self.config.averaging = averaging;
        Ok(())
    }

    /// Use exponential averaging with the given factor
    pub fn set_alpha(&mut self, alpha: f64) -> PsdResult<()> {
        self.set_averaging(Averaging::Exponential { alpha })
    }

    /// Feed a block of samples, running as many transforms as it completes
    pub fn execute(&mut self, samples: &[IQSample]) {
        if samples.is_empty() {
            return;
        }

        let n = samples.len() as u64;
        self.num_samples += n;
        self.num_samples_total += n;

        let nfft = self.config.nfft;
        let delay = self.config.delay;

        let mut input = samples;

        // Leftover stride from a previous call where delay > nfft
        if self.skip > 0 {
            let skipped = self.skip.min(input.len());
            self.skip -= skipped;
            input = &input[skipped..];
            if input.is_empty() {
                return;
            }
        }

        // Cursor runs over `pending` followed by `input`
        let held = self.pending.len();
        let available = held + input.len();
        let mut cursor = 0usize;

        while cursor <= available && available - cursor >= nfft {
            self.transform_at(input, cursor);
            cursor = cursor.saturating_add(delay);
        }

        if cursor >= available {
            self.skip = cursor - available;
            self.pending.clear();
        } else if cursor < held {
            self.pending.drain(..cursor);
            self.pending.extend_from_slice(input);
        } else {
            self.pending.clear();
            self.pending.extend_from_slice(&input[cursor - held..]);
        }
    }

    /// Feed a single sample
    pub fn push(&mut self, sample: IQSample) {
        self.execute(std::slice::from_ref(&sample));
    }

    /// Transform the segment starting `start` samples into `pending ++ input`
    fn transform_at(&mut self, input: &[IQSample], start: usize) {
        let held = self.pending.len();
        let segment = self
            .pending
            .get(start..)
            .unwrap_or(&[])
            .iter()
            .chain(&input[start.saturating_sub(held)..]);
        for ((out, &s), &w) in self.frame.iter_mut().zip(segment).zip(&self.window_coeffs) {
            *out = s * w;
        }

        self.processor.fft_inplace(&mut self.frame);

        match self.config.averaging {
            Averaging::RunningMean => {
                for (acc, bin) in self.accumulator.iter_mut().zip(&self.frame) {
                    *acc += bin.norm_sqr();
                }
            }
            Averaging::Exponential { alpha } => {
                if self.num_transforms == 0 {
                    for (acc, bin) in self.accumulator.iter_mut().zip(&self.frame) {
                        *acc = bin.norm_sqr();
                    }
                } else {
                    let gamma = 1.0 - alpha;
                    for (acc, bin) in self.accumulator.iter_mut().zip(&self.frame) {
                        *acc = gamma * *acc + alpha * bin.norm_sqr();
                    }
                }
            }
        }

        self.num_transforms += 1;
        self.num_transforms_total += 1;
        tracing::trace!(transform = self.num_transforms_total, "accumulated periodogram");
    }

    /// Finalized PSD with a frequency axis in Hz centered on `fc`
    ///
    /// Returns zeros until the first transform completes.
    pub fn get_psd(&self, fs: f64, fc: f64) -> PsdEstimate {
        let nfft = self.config.nfft;

        let psd = if self.num_transforms == 0 {
            vec![0.0; nfft]
        } else {
            let scale = match self.config.averaging {
                Averaging::RunningMean => 1.0 / (self.num_transforms as f64 * self.window_energy),
                Averaging::Exponential { .. } => 1.0 / self.window_energy,
            };
            (0..nfft)
                .map(|i| self.accumulator[FftProcessor::shifted_bin(i, nfft)] * scale)
                .collect()
        };

        PsdEstimate {
            psd,
            frequencies: FftProcessor::frequency_axis(nfft, fs, fc),
            nfft,
            sample_rate: fs,
            center_frequency: fc,
            num_transforms: self.num_transforms,
        }
    }

    /// Finalized PSD with a normalized frequency axis (f/Fs in [-0.5, 0.5))
    pub fn get_psd_normalized(&self) -> PsdEstimate {
        self.get_psd(1.0, 0.0)
    }

    /// Clear the accumulator but keep buffered samples, so the stream
    /// continues without a gap
    pub fn clear(&mut self) {
        self.accumulator.iter_mut().for_each(|p| *p = 0.0);
        self.num_transforms = 0;
        self.num_samples = 0;
        tracing::trace!("cleared spectral accumulator");
    }

    /// Clear the accumulator and the overlap buffer
    ///
    /// The lifetime counters are not affected.
    pub fn reset(&mut self) {
        self.clear();
        self.pending.clear();
        self.skip = 0;
        tracing::debug!(
            num_samples_total = self.num_samples_total,
            "reset spectral estimator"
        );
    }
}

impl fmt::Display for SpectralEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<spgram nfft={}, wlen={}, delay={}, window={:?}, averaging={:?}>",
            self.config.nfft,
            self.config.wlen,
            self.config.delay,
            self.config.window,
            self.config.averaging
        )
    }
}
