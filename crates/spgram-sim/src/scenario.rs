//! Composite test signals
//!
//! A [`TestSignal`] sums a set of tones over a noise floor. Tones can be
//! gated into bursts (on for `on_samples`, off for `off_samples`) to produce
//! the intermittent activity a waterfall is meant to show.
//!
//! ```rust
//! use spgram_sim::{BurstConfig, SignalConfig, SignalSource, TestSignal, ToneConfig};
//!
//! let config = SignalConfig {
//!     sample_rate: 20e6,
//!     noise_variance: 0.01,
//!     tones: vec![ToneConfig { frequency_hz: 2.5e6, amplitude: 1.0 }],
//!     burst: Some(BurstConfig { on_samples: 2_000, off_samples: 6_000 }),
//!     seed: 1,
//! };
//!
//! let mut signal = TestSignal::new(config);
//! let samples = signal.generate(20_000);
//! assert_eq!(samples.len(), 20_000);
//! ```

use crate::noise::NoiseSource;
use crate::tone::ToneSource;
use crate::SignalSource;
use serde::{Deserialize, Serialize};
use spgram_core::types::IQSample;

/// One tone in a test signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneConfig {
    /// Offset from the center frequency in Hz
    pub frequency_hz: f64,
    /// Peak amplitude
    pub amplitude: f64,
}

/// On/off gating applied to the tones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurstConfig {
    /// Samples with tones present
    pub on_samples: usize,
    /// Samples of noise only
    pub off_samples: usize,
}

impl BurstConfig {
    fn period(&self) -> usize {
        self.on_samples + self.off_samples
    }
}

/// Test signal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Sample rate in Hz (for tone frequencies)
    pub sample_rate: f64,
    /// Total complex noise power
    pub noise_variance: f64,
    /// Tones to sum
    pub tones: Vec<ToneConfig>,
    /// Optional burst gating for the tones
    pub burst: Option<BurstConfig>,
    /// RNG seed
    pub seed: u64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1.0,
            noise_variance: 0.01,
            tones: Vec::new(),
            burst: None,
            seed: 0,
        }
    }
}

impl SignalConfig {
    /// Noise only
    pub fn noise(noise_variance: f64, seed: u64) -> Self {
        Self {
            noise_variance,
            seed,
            ..Default::default()
        }
    }

    /// Set the sample rate used to place tones
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Add a tone
    pub fn with_tone(mut self, frequency_hz: f64, amplitude: f64) -> Self {
        self.tones.push(ToneConfig {
            frequency_hz,
            amplitude,
        });
        self
    }

    /// Gate the tones into bursts
    pub fn with_burst(mut self, on_samples: usize, off_samples: usize) -> Self {
        self.burst = Some(BurstConfig {
            on_samples,
            off_samples,
        });
        self
    }
}

/// Tones over a noise floor
#[derive(Debug, Clone)]
pub struct TestSignal {
    config: SignalConfig,
    noise: NoiseSource,
    tones: Vec<ToneSource>,
    position: u64,
}

impl TestSignal {
    /// Create a new test signal
    pub fn new(config: SignalConfig) -> Self {
        let noise = NoiseSource::new(config.noise_variance, config.seed);
        let tones = config
            .tones
            .iter()
            .map(|t| ToneSource::from_hz(t.frequency_hz, config.sample_rate, t.amplitude))
            .collect();

        tracing::debug!(
            tones = config.tones.len(),
            noise_variance = config.noise_variance,
            seed = config.seed,
            "created test signal"
        );

        Self {
            config,
            noise,
            tones,
            position: 0,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Samples produced so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the tones are on at the current position
    pub fn is_active(&self) -> bool {
        match self.config.burst {
            Some(burst) if burst.period() > 0 => {
                (self.position % burst.period() as u64) < burst.on_samples as u64
            }
            _ => true,
        }
    }

    fn next_sample(&mut self) -> IQSample {
        let mut s = self.noise.next_sample();
        let active = self.is_active();
        // Tones keep running while gated off so bursts stay phase-coherent
        for tone in &mut self.tones {
            let t = tone.next_sample();
            if active {
                s += t;
            }
        }
        self.position += 1;
        s
    }
}

impl SignalSource for TestSignal {
    fn generate(&mut self, n: usize) -> Vec<IQSample> {
        (0..n).map(|_| self.next_sample()).collect()
    }

    fn reset(&mut self) {
        self.noise.reset();
        self.tones.iter_mut().for_each(|t| t.reset());
        self.position = 0;
    }
}
