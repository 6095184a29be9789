//! Core types for spectral estimation
//!
//! Samples are complex baseband I/Q values. The estimators borrow sample
//! slices for the duration of a single call and copy what they need, so any
//! contiguous buffer of [`IQSample`] can be fed directly.
//!
//! ```text
//!            Q (Imaginary)
//!            ^
//!            |     * (I=0.7, Q=0.7)
//!            |    /
//!            |   / magnitude = 1.0
//!            |  /  phase = 45°
//!            | /
//!   ---------+---------> I (Real)
//!            |
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// A buffer of I/Q samples
pub type IQBuffer = Vec<IQSample>;

/// Result type for estimator construction and reconfiguration
pub type PsdResult<T> = Result<T, PsdError>;

/// Errors raised when an estimator is configured with invalid parameters.
///
/// Every variant is an invalid-configuration error; nothing in the
/// streaming path (`execute`, `get_psd`) can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PsdError {
    #[error("Invalid FFT size: must be greater than zero")]
    ZeroFftSize,

    #[error("Invalid window length: must be greater than zero")]
    ZeroWindowLength,

    #[error("Window length {wlen} exceeds FFT size {nfft}")]
    WindowTooLong { wlen: usize, nfft: usize },

    #[error("Invalid delay: must be greater than zero")]
    ZeroDelay,

    #[error("Invalid averaging factor: {0}. Must be in (0, 1]")]
    InvalidAlpha(f64),

    #[error("Invalid waterfall history: must hold at least one row")]
    ZeroHistory,

    #[error("Invalid slot length: must be greater than zero")]
    ZeroSlotLength,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PsdError {
    /// All estimator errors are configuration errors
    pub fn is_invalid_config(&self) -> bool {
        matches!(
            self,
            PsdError::ZeroFftSize
                | PsdError::ZeroWindowLength
                | PsdError::WindowTooLong { .. }
                | PsdError::ZeroDelay
                | PsdError::InvalidAlpha(_)
                | PsdError::ZeroHistory
                | PsdError::ZeroSlotLength
                | PsdError::InvalidConfig(_)
        )
    }
}
