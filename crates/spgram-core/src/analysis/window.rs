//! Window Functions
//!
//! Tapers applied to each transform segment before the FFT. Coefficients are
//! generated with the periodic convention (`n / len`), which is what spectral
//! averaging wants: overlapped Hann windows at 50% sum to a constant.

use crate::types::{PsdError, PsdResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::str::FromStr;

/// Default Kaiser shape parameter (~ -60 dB sidelobes)
pub const DEFAULT_KAISER_BETA: f64 = 8.6;

/// Largest accepted Kaiser beta; `I0` overflows `f64` just past 713
pub const MAX_KAISER_BETA: f64 = 700.0;

/// Window functions for spectral analysis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowFunction {
    /// No windowing (rectangular)
    None,
    /// Hann window (default) - good general purpose
    #[default]
    Hann,
    /// Hamming window - slightly less sidelobe suppression than Hann
    Hamming,
    /// Blackman window - excellent sidelobe suppression
    Blackman,
    /// Blackman-Harris window - very low sidelobes
    BlackmanHarris,
    /// Flat-top window - accurate amplitude measurement
    FlatTop,
    /// Triangular (Bartlett) window
    Triangular,
    /// Kaiser window with shape parameter `beta`
    Kaiser { beta: f64 },
}

impl WindowFunction {
    /// Generate window coefficients for the given size
    pub fn generate(&self, size: usize) -> Vec<f64> {
        if size <= 1 {
            return vec![1.0; size];
        }

        let n = size as f64;
        match *self {
            WindowFunction::None => vec![1.0; size],
            WindowFunction::Hann => (0..size)
                .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
                .collect(),
            WindowFunction::Hamming => (0..size)
                .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / n).cos())
                .collect(),
            WindowFunction::Blackman => (0..size)
                .map(|i| {
                    let x = i as f64 / n;
                    0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                })
                .collect(),
            WindowFunction::BlackmanHarris => (0..size)
                .map(|i| {
                    let x = i as f64 / n;
                    0.35875 - 0.48829 * (2.0 * PI * x).cos()
                        + 0.14128 * (4.0 * PI * x).cos()
                        - 0.01168 * (6.0 * PI * x).cos()
                })
                .collect(),
            WindowFunction::FlatTop => (0..size)
                .map(|i| {
                    let x = i as f64 / n;
                    0.21557895 - 0.41663158 * (2.0 * PI * x).cos()
                        + 0.277263158 * (4.0 * PI * x).cos()
                        - 0.083578947 * (6.0 * PI * x).cos()
                        + 0.006947368 * (8.0 * PI * x).cos()
                })
                .collect(),
            WindowFunction::Triangular => {
                let half = n / 2.0;
                (0..size)
                    .map(|i| 1.0 - ((i as f64 - half) / half).abs())
                    .collect()
            }
            WindowFunction::Kaiser { beta } => {
                let norm = bessel_i0(beta);
                let half = n / 2.0;
                (0..size)
                    .map(|i| {
                        let r = (i as f64 - half) / half;
                        let arg = (1.0 - r * r).max(0.0).sqrt();
                        bessel_i0(beta * arg) / norm
                    })
                    .collect()
            }
        }
    }

    /// Reject parameterised windows with unusable parameters
    pub fn validate(&self) -> PsdResult<()> {
        match *self {
            WindowFunction::Kaiser { beta } if !(0.0..=MAX_KAISER_BETA).contains(&beta) => {
                Err(PsdError::InvalidConfig(format!(
                    "kaiser beta must be in [0, {}], got {}",
                    MAX_KAISER_BETA, beta
                )))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for WindowFunction {
    type Err = PsdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "rectangular" | "rect" => Ok(WindowFunction::None),
            "hann" | "hanning" => Ok(WindowFunction::Hann),
            "hamming" => Ok(WindowFunction::Hamming),
            "blackman" => Ok(WindowFunction::Blackman),
            "blackman-harris" | "blackmanharris" => Ok(WindowFunction::BlackmanHarris),
            "flat-top" | "flattop" => Ok(WindowFunction::FlatTop),
            "triangular" | "bartlett" => Ok(WindowFunction::Triangular),
            "kaiser" => Ok(WindowFunction::Kaiser {
                beta: DEFAULT_KAISER_BETA,
            }),
            other => Err(PsdError::InvalidConfig(format!("unknown window: {}", other))),
        }
    }
}

/// Zeroth-order modified Bessel function of the first kind (power series)
///
/// Summed until the terms stop contributing; terms peak near `k = x / 2`,
/// so large arguments need proportionally more of them.
fn bessel_i0(x: f64) -> f64 {
    let half = x / 2.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    loop {
        term *= half / k;
        let t2 = term * term;
        sum += t2;
        if t2.is_nan() || !sum.is_finite() || t2 <= sum * 1e-16 {
            return sum;
        }
        k += 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_generation() {
        let size = 64;

        // Hann window should be 0 at edges, 1 at center
        let hann = WindowFunction::Hann.generate(size);
        assert!(hann[0] < 0.01);
        assert!(hann[size / 2] > 0.99);

        // Hamming should be ~0.08 at edges
        let hamming = WindowFunction::Hamming.generate(size);
        assert!((hamming[0] - 0.08).abs() < 0.01);

        let tri = WindowFunction::Triangular.generate(size);
        assert!(tri[0].abs() < 1e-12);
        assert!((tri[size / 2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kaiser_shape() {
        let kaiser = WindowFunction::Kaiser { beta: 8.6 }.generate(65);
        assert!((kaiser[32] - 1.0).abs() < 0.01);
        assert!(kaiser[0] < 0.01);

        // beta = 0 degenerates to rectangular
        let flat = WindowFunction::Kaiser { beta: 0.0 }.generate(16);
        assert!(flat.iter().all(|&w| (w - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_bessel_i0() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-12);
        assert!((bessel_i0(1.0) - 1.2660658777520082).abs() < 1e-12);
        // Well past the point where a short fixed-length series falls off
        let big = bessel_i0(100.0);
        assert!((big / 1.0737517071310738e42 - 1.0).abs() < 1e-12);
        assert!(bessel_i0(MAX_KAISER_BETA).is_finite());
        // Overflowing arguments terminate instead of spinning
        assert!(bessel_i0(2000.0).is_infinite());
    }

    #[test]
    fn test_kaiser_large_beta() {
        let beta = 160.0;
        let kaiser = WindowFunction::Kaiser { beta }.generate(1024);
        assert!((kaiser[512] - 1.0).abs() < 1e-12);
        // Symmetric about the center and strictly tapered
        assert!((kaiser[256] - kaiser[768]).abs() < 1e-12);
        assert!(kaiser[256] < kaiser[384] && kaiser[384] < kaiser[512]);
        // Narrow main lobe: energy well below the rectangular length
        let energy: f64 = kaiser.iter().map(|w| w * w).sum();
        assert!(energy.is_finite() && energy > 1.0 && energy < 200.0);
    }

    #[test]
    fn test_window_from_str() {
        assert_eq!("hann".parse::<WindowFunction>(), Ok(WindowFunction::Hann));
        assert_eq!("HAMMING".parse::<WindowFunction>(), Ok(WindowFunction::Hamming));
        assert_eq!(
            "kaiser".parse::<WindowFunction>(),
            Ok(WindowFunction::Kaiser {
                beta: DEFAULT_KAISER_BETA
            })
        );
        assert!("invalid".parse::<WindowFunction>().is_err());
    }

    #[test]
    fn test_kaiser_validation() {
        assert!(WindowFunction::Kaiser { beta: -1.0 }.validate().is_err());
        assert!(WindowFunction::Kaiser { beta: f64::NAN }.validate().is_err());
        assert!(WindowFunction::Kaiser { beta: 2000.0 }.validate().is_err());
        assert!(WindowFunction::Kaiser { beta: MAX_KAISER_BETA }.validate().is_ok());
        assert!(WindowFunction::Hann.validate().is_ok());
    }
}
