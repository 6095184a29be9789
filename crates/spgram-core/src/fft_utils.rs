//! FFT Utilities for Spectral Estimation
//!
//! Thin wrapper over `rustfft` that owns a planned forward transform and
//! its scratch space, plus the helpers needed to present a spectrum with
//! DC in the middle.
//!
//! ## FFT-shift convention
//!
//! A raw transform of size N places DC at bin 0, positive frequencies in
//! the first half and negative frequencies in the second half. Shifting
//! rotates the spectrum so the output is ordered from the most negative
//! frequency to the most positive:
//!
//! ```text
//!  raw:      [ 0  +1  +2  +3  -4  -3  -2  -1 ]    (N = 8)
//!  shifted:  [ -4 -3  -2  -1   0  +1  +2  +3 ]
//! ```
//!
//! For odd N the positive side holds one more bin than the negative side,
//! matching the usual `fftshift`/`fftfreq` pairing.

use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Forward FFT processor with a reusable scratch buffer
pub struct FftProcessor {
    /// FFT size
    size: usize,
    /// Forward FFT instance
    fft_forward: Arc<dyn Fft<f64>>,
    /// Scratch buffer for FFT operations
    scratch: Vec<Complex64>,
}

impl fmt::Debug for FftProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftProcessor")
            .field("size", &self.size)
            .finish()
    }
}

impl Clone for FftProcessor {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            fft_forward: Arc::clone(&self.fft_forward),
            scratch: vec![Complex64::new(0.0, 0.0); self.scratch.len()],
        }
    }
}

impl FftProcessor {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft_forward.get_inplace_scratch_len()];

        Self {
            size,
            fft_forward,
            scratch,
        }
    }

    /// Get the FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compute the forward FFT in-place
    pub fn fft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_forward.process_with_scratch(buffer, &mut self.scratch);
    }

    /// Index of the raw bin that lands at position `i` after shifting
    #[inline]
    pub fn shifted_bin(i: usize, n: usize) -> usize {
        (i + (n + 1) / 2) % n
    }

    /// Rotate a spectrum so DC sits in the middle
    pub fn fft_shift<T: Copy>(input: &[T]) -> Vec<T> {
        let n = input.len();
        (0..n).map(|i| input[Self::shifted_bin(i, n)]).collect()
    }

    /// Signed frequency index of raw bin `k` for a transform of size `n`
    #[inline]
    pub fn signed_bin(k: usize, n: usize) -> i64 {
        if k < (n + 1) / 2 {
            k as i64
        } else {
            k as i64 - n as i64
        }
    }

    /// Shifted frequency axis in Hz, monotonically increasing and offset by
    /// `center_frequency`
    pub fn frequency_axis(n: usize, sample_rate: f64, center_frequency: f64) -> Vec<f64> {
        let resolution = sample_rate / n as f64;
        (0..n)
            .map(|i| {
                let k = Self::shifted_bin(i, n);
                center_frequency + Self::signed_bin(k, n) as f64 * resolution
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_dc() {
        let mut processor = FftProcessor::new(8);
        let mut buffer = vec![Complex64::new(1.0, 0.0); 8];
        processor.fft_inplace(&mut buffer);

        assert!((buffer[0].re - 8.0).abs() < 1e-10);
        for bin in &buffer[1..] {
            assert!(bin.norm() < 1e-10);
        }
    }

    #[test]
    fn test_fft_shift_even() {
        let raw = [0, 1, 2, 3, -4, -3, -2, -1];
        assert_eq!(FftProcessor::fft_shift(&raw), vec![-4, -3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn test_fft_shift_odd() {
        let raw = [0, 1, 2, -2, -1];
        assert_eq!(FftProcessor::fft_shift(&raw), vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn test_frequency_axis() {
        let axis = FftProcessor::frequency_axis(4, 1000.0, 0.0);
        assert_eq!(axis, vec![-500.0, -250.0, 0.0, 250.0]);

        let axis = FftProcessor::frequency_axis(4, 1000.0, 1e6);
        assert_eq!(axis[0], 1e6 - 500.0);
        assert!(axis.windows(2).all(|w| w[1] > w[0]));
    }
}
