//! Sizing limits shared by every matrix implementation.
//!
//! Matrices validate the environment against these limits before touching
//! their buffers, so an absurd band or read fails fast instead of allocating.

use crate::RealignError;

/// Default maximum band width (`2 * max_shift + 1`).
pub const DEFAULT_MAX_BAND_WIDTH: usize = 2001;
/// Default maximum read length.
pub const DEFAULT_MAX_READ_LENGTH: usize = 100_000;

/// Configuration parameters for matrix population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixConfig {
    /// Widest band a matrix will accept.
    pub max_band_width: usize,
    /// Longest read a matrix will accept.
    pub max_read_length: usize,
}

impl MatrixConfig {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self {
            max_band_width: DEFAULT_MAX_BAND_WIDTH,
            max_read_length: DEFAULT_MAX_READ_LENGTH,
        }
    }

    /// Set the maximum band width.
    pub fn with_max_band_width(mut self, max_band_width: usize) -> Self {
        self.max_band_width = max_band_width;
        self
    }

    /// Set the maximum read length.
    pub fn with_max_read_length(mut self, max_read_length: usize) -> Self {
        self.max_read_length = max_read_length;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), RealignError> {
        if self.max_band_width == 0 {
            return Err(RealignError::InvalidConfiguration(
                "maximum band width must be > 0".to_string(),
            ));
        }
        if self.max_read_length == 0 {
            return Err(RealignError::InvalidConfiguration(
                "maximum read length must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Check a read length and band width against the limits.
    pub fn check(&self, read_length: usize, width: usize) -> Result<(), RealignError> {
        if read_length == 0 {
            return Err(RealignError::EmptyRead);
        }
        if read_length > self.max_read_length {
            return Err(RealignError::ReadTooLong {
                length: read_length,
                max: self.max_read_length,
            });
        }
        if width > self.max_band_width {
            return Err(RealignError::BandTooWide {
                width,
                max: self.max_band_width,
            });
        }
        Ok(())
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::new()
    }
}
