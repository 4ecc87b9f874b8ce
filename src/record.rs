//! Upstream alignment records handed to the engine by the calling pipeline.

use std::sync::Arc;

use crate::params::MachineType;

/// Highest error probability a quality value may translate to.
pub const MAX_ERROR_PROBABILITY: f64 = 0.75;

/// Aligned read with sequence and quality information.
#[derive(Debug, Clone)]
pub struct AlignmentRecord {
    /// 0-based leftmost template coordinate of the alignment.
    pub start: i64,
    /// Read sequence stored as uppercase ASCII.
    pub sequence: Arc<[u8]>,
    /// Per-base quality scores in Phred space.
    pub qualities: Arc<[u8]>,
    /// Whether the read maps to the reverse complement strand.
    pub is_reverse: bool,
    /// Sequencing machine that produced the read.
    pub machine: MachineType,
}

impl AlignmentRecord {
    /// Construct a new alignment record.
    pub fn new(
        start: i64,
        sequence: impl Into<Arc<[u8]>>,
        qualities: impl Into<Arc<[u8]>>,
        is_reverse: bool,
        machine: MachineType,
    ) -> Self {
        Self {
            start,
            sequence: sequence.into(),
            qualities: qualities.into(),
            is_reverse,
            machine,
        }
    }

    /// Read length inferred from the sequence.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the record holds no bases.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Base at the provided read offset.
    pub fn base_at(&self, offset: usize) -> Option<u8> {
        self.sequence.get(offset).copied()
    }

    /// Quality score at the provided read offset.
    pub fn quality_at(&self, offset: usize) -> Option<u8> {
        self.qualities.get(offset).copied()
    }
}

/// Convert a Phred score to an error probability, capped at
/// [`MAX_ERROR_PROBABILITY`].
#[inline]
pub fn phred_to_error(phred: u8) -> f64 {
    10f64.powf(-(phred as f64) / 10.0).min(MAX_ERROR_PROBABILITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phred_conversion() {
        assert!((phred_to_error(20) - 0.01).abs() < 1e-12);
        assert!((phred_to_error(10) - 0.1).abs() < 1e-12);
        assert_eq!(phred_to_error(0), MAX_ERROR_PROBABILITY);
    }

    #[test]
    fn test_record_accessors() {
        let record = AlignmentRecord::new(
            12,
            b"ACGT".to_vec(),
            vec![30, 30, 20, 10],
            false,
            MachineType::IlluminaPe,
        );
        assert_eq!(record.len(), 4);
        assert_eq!(record.base_at(2), Some(b'G'));
        assert_eq!(record.quality_at(3), Some(10));
        assert_eq!(record.base_at(4), None);
    }
}
