//! Waterfall/Spectrogram Estimation
//!
//! A bounded time-by-frequency history of power spectra. The input stream
//! is cut into slots of `slot_len` samples; each slot gets its own averaged
//! spectrum, and sealed slots are kept in a ring of `time` rows.
//!
//! ```text
//!  slot:    ACCUMULATING ──(slot_len samples)──▶ SEALED ──▶ ring[head]
//!
//!  ring (time = 4, 6 slots sealed):
//!     storage  [ s4 | s5 | s2 | s3 ]      head = 2
//!     output   [ s2 | s3 | s4 | s5 ]      oldest first
//! ```
//!
//! Slot boundaries are counted in input samples, not in transforms, so a
//! single `execute` call may seal any number of slots and the result does
//! not depend on how the stream is chunked. The overlap buffer runs across
//! slot boundaries; a transform is credited to the slot in which it
//! completes.

use crate::analysis::spectrum::{power_to_db, Averaging, PsdEstimate, SpectralEstimator, SpectrumConfig};
use crate::analysis::window::WindowFunction;
use crate::fft_utils::FftProcessor;
use crate::types::{IQSample, PsdError, PsdResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Waterfall estimator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// Per-slot spectral estimator settings
    pub spectrum: SpectrumConfig,
    /// Number of history rows
    pub time: usize,
    /// Input samples aggregated into each row
    pub slot_len: usize,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        let spectrum = SpectrumConfig::default();
        Self {
            slot_len: spectrum.nfft,
            spectrum,
            time: 256,
        }
    }
}

impl WaterfallConfig {
    /// Create a configuration; rows default to `nfft` samples each
    pub fn new(nfft: usize, time: usize, wlen: usize, delay: usize) -> Self {
        Self {
            spectrum: SpectrumConfig::new(nfft, wlen, delay),
            time,
            slot_len: nfft,
        }
    }

    /// Set the number of input samples per row
    pub fn with_slot_len(mut self, slot_len: usize) -> Self {
        self.slot_len = slot_len;
        self
    }

    /// Set the window function
    pub fn with_window(mut self, window: WindowFunction) -> Self {
        self.spectrum.window = window;
        self
    }

    /// Set the per-slot averaging policy
    pub fn with_averaging(mut self, averaging: Averaging) -> Self {
        self.spectrum.averaging = averaging;
        self
    }

    /// Check all construction invariants
    pub fn validate(&self) -> PsdResult<()> {
        self.spectrum.validate()?;
        if self.time == 0 {
            return Err(PsdError::ZeroHistory);
        }
        if self.slot_len == 0 {
            return Err(PsdError::ZeroSlotLength);
        }
        Ok(())
    }
}

/// Result of a waterfall query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallResult {
    /// Linear power [time][frequency], oldest row first, FFT-shifted
    pub power: Vec<Vec<f64>>,
    /// Time axis (seconds, or samples when normalized)
    pub times: Vec<f64>,
    /// Frequency axis (Hz, FFT-shifted)
    pub frequencies: Vec<f64>,
    /// FFT size used
    pub nfft: usize,
    /// History depth
    pub time: usize,
    /// Input samples per row
    pub slot_len: usize,
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Center frequency in Hz
    pub center_frequency: f64,
    /// Rows holding a sealed slot; the rest are zero
    pub rows_filled: usize,
}

impl WaterfallResult {
    /// Get dimensions (width, height) = (freq bins, time bins)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.nfft, self.power.len())
    }

    /// Power values in dB [time][frequency]
    pub fn power_db(&self) -> Vec<Vec<f64>> {
        self.power
            .iter()
            .map(|row| row.iter().map(|&p| power_to_db(p)).collect())
            .collect()
    }

    /// Get power range (min, max) over non-zero cells, linear units
    pub fn power_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for &val in self.power.iter().flatten() {
            if val > 0.0 {
                min = min.min(val);
                max = max.max(val);
            }
        }

        (max >= min).then_some((min, max))
    }
}

/// Streaming waterfall estimator
#[derive(Debug, Clone)]
pub struct WaterfallEstimator {
    config: WaterfallConfig,
    estimator: SpectralEstimator,
    /// Ring storage; grows to `time` rows, then overwritten at `head`
    history: Vec<Vec<f64>>,
    head: usize,
    /// Samples fed into the accumulating slot
    slot_fill: usize,
    num_slots_sealed: u64,
}

impl WaterfallEstimator {
    /// Create a new waterfall estimator, validating the configuration
    pub fn new(config: WaterfallConfig) -> PsdResult<Self> {
        config.validate()?;
        let estimator = SpectralEstimator::new(config.spectrum.clone())?;

        tracing::debug!(
            nfft = config.spectrum.nfft,
            time = config.time,
            slot_len = config.slot_len,
            "created waterfall estimator"
        );

        Ok(Self {
            history: Vec::with_capacity(config.time),
            head: 0,
            slot_fill: 0,
            num_slots_sealed: 0,
            estimator,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &WaterfallConfig {
        &self.config
    }

    /// Get the FFT size
    pub fn nfft(&self) -> usize {
        self.config.spectrum.nfft
    }

    /// Get the history depth
    pub fn time(&self) -> usize {
        self.config.time
    }

    /// Input samples per row
    pub fn slot_len(&self) -> usize {
        self.config.slot_len
    }

    /// Sealed rows currently held (at most `time`)
    pub fn num_rows(&self) -> usize {
        self.history.len()
    }

    /// Slots sealed over the estimator's lifetime
    pub fn num_slots_sealed(&self) -> u64 {
        self.num_slots_sealed
    }

    /// Samples fed over the estimator's lifetime
    pub fn num_samples_total(&self) -> u64 {
        self.estimator.num_samples_total()
    }

    /// Samples fed into the slot currently accumulating
    pub fn slot_fill(&self) -> usize {
        self.slot_fill
    }

    /// Feed a block of samples, sealing every slot it completes
    pub fn execute(&mut self, samples: &[IQSample]) {
        let mut input = samples;

        while !input.is_empty() {
            let take = (self.config.slot_len - self.slot_fill).min(input.len());
            self.estimator.execute(&input[..take]);
            self.slot_fill += take;
            input = &input[take..];

            if self.slot_fill == self.config.slot_len {
                self.seal();
            }
        }
    }

    fn seal(&mut self) {
        let row = self.estimator.get_psd_normalized();
        let transforms = row.num_transforms;

        if self.history.len() < self.config.time {
            self.history.push(row.psd);
        } else {
            self.history[self.head] = row.psd;
        }
        self.head = (self.head + 1) % self.config.time;

        self.num_slots_sealed += 1;
        self.slot_fill = 0;
        self.estimator.clear();

        tracing::debug!(
            slot = self.num_slots_sealed,
            transforms,
            rows = self.history.len(),
            "sealed waterfall slot"
        );
    }

    /// Spectrum of the slot still accumulating
    pub fn current_slot(&self, fs: f64, fc: f64) -> PsdEstimate {
        self.estimator.get_psd(fs, fc)
    }

    /// The `time x nfft` history, oldest row first, with time and
    /// frequency axes
    ///
    /// Row `i` is stamped `i * slot_len / fs`. Rows not yet sealed are zero.
    pub fn get_psd(&self, fs: f64, fc: f64) -> WaterfallResult {
        let nfft = self.config.spectrum.nfft;
        let time = self.config.time;
        let filled = self.history.len();

        // Before wraparound `head == filled`, so the oldest row is index 0
        let start = if filled < time { 0 } else { self.head };

        let mut power: Vec<Vec<f64>> = (0..filled)
            .map(|i| self.history[(start + i) % filled].clone())
            .collect();
        power.resize(time, vec![0.0; nfft]);

        let row_period = self.config.slot_len as f64 / fs;
        let times = (0..time).map(|i| i as f64 * row_period).collect();

        WaterfallResult {
            power,
            times,
            frequencies: FftProcessor::frequency_axis(nfft, fs, fc),
            nfft,
            time,
            slot_len: self.config.slot_len,
            sample_rate: fs,
            center_frequency: fc,
            rows_filled: filled,
        }
    }

    /// History with normalized axes (time in samples, frequency in f/Fs)
    pub fn get_psd_normalized(&self) -> WaterfallResult {
        self.get_psd(1.0, 0.0)
    }

    /// Drop all history and buffered samples
    ///
    /// The lifetime counters are not affected.
    pub fn reset(&mut self) {
        self.estimator.reset();
        self.history.clear();
        self.head = 0;
        self.slot_fill = 0;
        tracing::debug!(
            num_slots_sealed = self.num_slots_sealed,
            "reset waterfall estimator"
        );
    }
}

impl fmt::Display for WaterfallEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<spwaterfall nfft={}, time={}, wlen={}, delay={}, slot_len={}>",
            self.config.spectrum.nfft,
            self.config.time,
            self.config.spectrum.wlen,
            self.config.spectrum.delay,
            self.config.slot_len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex64;

    const NFFT: usize = 16;

    /// One rectangular transform per slot; slot `i` carries DC of amplitude `i + 1`
    fn dc_waterfall(time: usize) -> WaterfallEstimator {
        let config = WaterfallConfig::new(NFFT, time, NFFT, NFFT).with_window(WindowFunction::None);
        WaterfallEstimator::new(config).unwrap()
    }

    fn dc_slots(range: std::ops::Range<usize>) -> Vec<IQSample> {
        range
            .flat_map(|i| std::iter::repeat(Complex64::new((i + 1) as f64, 0.0)).take(NFFT))
            .collect()
    }

    /// DC bin power in a shifted row, mapped back to the slot amplitude
    fn amplitude(row: &[f64]) -> f64 {
        (row[NFFT / 2] / NFFT as f64).sqrt()
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            WaterfallEstimator::new(WaterfallConfig::new(64, 0, 64, 1)).unwrap_err(),
            PsdError::ZeroHistory
        );
        assert_eq!(
            WaterfallEstimator::new(WaterfallConfig::new(64, 8, 64, 1).with_slot_len(0)).unwrap_err(),
            PsdError::ZeroSlotLength
        );
        assert_eq!(
            WaterfallEstimator::new(WaterfallConfig::new(64, 8, 128, 1)).unwrap_err(),
            PsdError::WindowTooLong { wlen: 128, nfft: 64 }
        );
    }

    #[test]
    fn test_empty_waterfall() {
        let waterfall = WaterfallEstimator::new(WaterfallConfig::new(600, 800, 400, 1)).unwrap();
        let result = waterfall.get_psd(20e6, 460e6);

        assert_eq!(result.dimensions(), (600, 800));
        assert_eq!(result.times.len(), 800);
        assert_eq!(result.frequencies.len(), 600);
        assert_eq!(result.rows_filled, 0);
        assert!(result.power.iter().flatten().all(|&p| p == 0.0));
        assert!(result.power_range().is_none());
        assert!((result.frequencies[0] - (460e6 - 10e6)).abs() < 1e-3);
    }

    #[test]
    fn test_partial_fill() {
        let mut waterfall = dc_waterfall(4);
        waterfall.execute(&dc_slots(0..2));

        let result = waterfall.get_psd_normalized();
        assert_eq!(result.rows_filled, 2);
        assert!((amplitude(&result.power[0]) - 1.0).abs() < 1e-9);
        assert!((amplitude(&result.power[1]) - 2.0).abs() < 1e-9);
        assert!(result.power[2].iter().all(|&p| p == 0.0));
        assert!(result.power[3].iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_ring_eviction() {
        let time = 4;
        for extra in 0..7 {
            let mut waterfall = dc_waterfall(time);
            waterfall.execute(&dc_slots(0..time + extra));

            assert_eq!(waterfall.num_rows(), time);
            assert_eq!(waterfall.num_slots_sealed(), (time + extra) as u64);

            let result = waterfall.get_psd_normalized();
            assert_eq!(result.power.len(), time);
            for (i, row) in result.power.iter().enumerate() {
                let expected = (extra + i + 1) as f64;
                assert!(
                    (amplitude(row) - expected).abs() < 1e-9,
                    "extra={} row {} holds {} instead of {}",
                    extra,
                    i,
                    amplitude(row),
                    expected
                );
            }
        }
    }

    #[test]
    fn test_sealing_independent_of_chunking() {
        let samples = dc_slots(0..9);

        let mut whole = dc_waterfall(5);
        whole.execute(&samples);

        let mut split = dc_waterfall(5);
        for chunk in samples.chunks(7) {
            split.execute(chunk);
        }

        assert_eq!(whole.num_slots_sealed(), 9);
        assert_eq!(split.num_slots_sealed(), 9);
        assert_eq!(whole.get_psd_normalized(), split.get_psd_normalized());
    }

    #[test]
    fn test_partial_slot_not_sealed() {
        let mut waterfall = dc_waterfall(4);
        waterfall.execute(&vec![Complex64::new(1.0, 0.0); NFFT - 1]);

        assert_eq!(waterfall.num_rows(), 0);
        assert_eq!(waterfall.slot_fill(), NFFT - 1);
        assert!(waterfall.current_slot(1.0, 0.0).is_empty());
        assert_eq!(waterfall.num_samples_total(), (NFFT - 1) as u64);
    }

    #[test]
    fn test_time_axis() {
        let config = WaterfallConfig::new(64, 10, 64, 32).with_slot_len(1000);
        let waterfall = WaterfallEstimator::new(config).unwrap();
        let result = waterfall.get_psd(1e6, 0.0);

        assert_eq!(result.times.len(), 10);
        assert_eq!(result.times[0], 0.0);
        assert!((result.times[3] - 3e-3).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut waterfall = dc_waterfall(4);
        waterfall.execute(&dc_slots(0..6));
        waterfall.execute(&vec![Complex64::new(1.0, 0.0); 3]);

        waterfall.reset();
        assert_eq!(waterfall.num_rows(), 0);
        assert_eq!(waterfall.slot_fill(), 0);
        assert_eq!(waterfall.num_samples_total(), (6 * NFFT + 3) as u64);
        assert!(waterfall
            .get_psd_normalized()
            .power
            .iter()
            .flatten()
            .all(|&p| p == 0.0));

        // Ring restarts from an empty state
        waterfall.execute(&dc_slots(2..3));
        let result = waterfall.get_psd_normalized();
        assert_eq!(result.rows_filled, 1);
        assert!((amplitude(&result.power[0]) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_power_db() {
        let mut waterfall = dc_waterfall(2);
        waterfall.execute(&dc_slots(0..1));
        let result = waterfall.get_psd_normalized();
        let db = result.power_db();

        // amplitude 1, rectangular: DC power = NFFT
        assert!((db[0][NFFT / 2] - 10.0 * (NFFT as f64).log10()).abs() < 1e-9);
        assert_eq!(db[1][0], crate::analysis::spectrum::POWER_FLOOR_DB);

        let (_, max) = result.power_range().unwrap();
        assert!((max - NFFT as f64).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let waterfall = WaterfallEstimator::new(WaterfallConfig::new(600, 800, 400, 1)).unwrap();
        assert!(waterfall.to_string().contains("time=800"));
    }
}
