use std::sync::Arc;

use super::{check_quality, Environment, EnvironmentError};
use crate::dna;

/// Plain forward environment over an owned read and a shared template.
#[derive(Debug, Clone)]
pub struct EnvironmentImplementation {
    max_shift: usize,
    template: Arc<[u8]>,
    start: isize,
    read: Vec<u8>,
    quality: Vec<f64>,
}

impl EnvironmentImplementation {
    /// Construct from encoded bases.
    ///
    /// `start` is the absolute template position read base 0 aligns to under
    /// zero drift; it may lie outside the template.
    pub fn new(
        max_shift: usize,
        template: impl Into<Arc<[u8]>>,
        start: isize,
        read: Vec<u8>,
        quality: Vec<f64>,
    ) -> Result<Self, EnvironmentError> {
        if read.len() != quality.len() {
            return Err(EnvironmentError::QualityLengthMismatch {
                bases: read.len(),
                qualities: quality.len(),
            });
        }
        check_quality(&quality)?;
        Ok(Self {
            max_shift,
            template: template.into(),
            start,
            read,
            quality,
        })
    }

    /// Construct from ASCII sequences with a uniform error probability.
    pub fn from_strs(
        max_shift: usize,
        template: &str,
        start: isize,
        read: &str,
        quality: f64,
    ) -> Result<Self, EnvironmentError> {
        let read = dna::encode_strict(read.as_bytes())?;
        let quality = vec![quality; read.len()];
        Self::new(
            max_shift,
            dna::encode_strict(template.as_bytes())?,
            start,
            read,
            quality,
        )
    }

    /// Absolute template position of read base 0.
    pub fn start(&self) -> isize {
        self.start
    }
}

impl Environment for EnvironmentImplementation {
    fn max_shift(&self) -> usize {
        self.max_shift
    }

    fn read_length(&self) -> usize {
        self.read.len()
    }

    fn template_length(&self) -> usize {
        self.template.len()
    }

    fn absolute_template_position(&self, index: isize) -> isize {
        self.start + index
    }

    #[inline]
    fn template(&self, index: isize) -> u8 {
        let pos = self.start + index;
        if pos < 0 {
            return dna::N;
        }
        self.template.get(pos as usize).copied().unwrap_or(dna::N)
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.read[index]
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.quality[index]
    }
}
