//! Complex tone source

use crate::SignalSource;
use spgram_core::types::{Complex, IQSample};
use std::f64::consts::PI;

/// Phase-continuous complex exponential
///
/// Frequency is in cycles per sample (f/Fs); negative values rotate
/// clockwise.
#[derive(Debug, Clone)]
pub struct ToneSource {
    frequency: f64,
    amplitude: f64,
    phase: f64,
}

impl ToneSource {
    /// Create a tone at a normalized frequency
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }

    /// Create a tone from a frequency in Hz
    pub fn from_hz(frequency_hz: f64, sample_rate: f64, amplitude: f64) -> Self {
        Self::new(frequency_hz / sample_rate, amplitude)
    }

    /// Tone sitting exactly on bin `bin` of an `nfft`-point transform
    pub fn bin_centered(bin: i64, nfft: usize, amplitude: f64) -> Self {
        Self::new(bin as f64 / nfft as f64, amplitude)
    }

    /// Normalized frequency
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Draw one sample
    pub fn next_sample(&mut self) -> IQSample {
        let s = Complex::from_polar(self.amplitude, 2.0 * PI * self.phase);
        self.phase = (self.phase + self.frequency).rem_euclid(1.0);
        s
    }
}

impl SignalSource for ToneSource {
    fn generate(&mut self, n: usize) -> Vec<IQSample> {
        (0..n).map(|_| self.next_sample()).collect()
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}
