use super::{check_quality, EnvironmentError};
use crate::dna;
use crate::record::{phred_to_error, AlignmentRecord};

/// Read side of an environment.
pub trait EnvironmentRead {
    /// Number of bases.
    fn read_length(&self) -> usize;

    /// Encoded base.
    fn read(&self, index: usize) -> u8;

    /// Error probability of the base.
    fn quality(&self, index: usize) -> f64;
}

/// Read bases and their error probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadEnvironment {
    bases: Vec<u8>,
    quality: Vec<f64>,
}

impl ReadEnvironment {
    /// Construct from encoded bases and error probabilities.
    pub fn new(bases: Vec<u8>, quality: Vec<f64>) -> Result<Self, EnvironmentError> {
        if bases.len() != quality.len() {
            return Err(EnvironmentError::QualityLengthMismatch {
                bases: bases.len(),
                qualities: quality.len(),
            });
        }
        check_quality(&quality)?;
        Ok(Self { bases, quality })
    }

    /// Build from an upstream record, converting Phred scores.
    ///
    /// Unrecognised letters become `N`. A record whose quality string does
    /// not match its sequence is rejected.
    pub fn from_record(record: &AlignmentRecord) -> Result<Self, EnvironmentError> {
        if record.sequence.len() != record.qualities.len() {
            return Err(EnvironmentError::QualityLengthMismatch {
                bases: record.sequence.len(),
                qualities: record.qualities.len(),
            });
        }
        let bases = dna::encode_lenient(&record.sequence);
        let quality = record.qualities.iter().map(|&q| phred_to_error(q)).collect();
        Ok(Self { bases, quality })
    }
}

impl EnvironmentRead for ReadEnvironment {
    fn read_length(&self) -> usize {
        self.bases.len()
    }

    #[inline]
    fn read(&self, index: usize) -> u8 {
        self.bases[index]
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.quality[index]
    }
}

impl<R: EnvironmentRead + ?Sized> EnvironmentRead for &R {
    fn read_length(&self) -> usize {
        (**self).read_length()
    }

    fn read(&self, index: usize) -> u8 {
        (**self).read(index)
    }

    fn quality(&self, index: usize) -> f64 {
        (**self).quality(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MachineType;

    #[test]
    fn test_from_record_converts_phred() {
        let record = AlignmentRecord::new(
            0,
            b"ACRT".to_vec(),
            vec![20, 10, 30, 0],
            false,
            MachineType::IlluminaSe,
        );
        let read = ReadEnvironment::from_record(&record).unwrap();
        assert_eq!(read.read_length(), 4);
        assert_eq!(read.read(2), dna::N);
        assert!((read.quality(0) - 0.01).abs() < 1e-12);
        assert_eq!(read.quality(3), 0.75);
    }

    #[test]
    fn test_from_record_rejects_length_mismatch() {
        let record =
            AlignmentRecord::new(0, b"ACGT".to_vec(), vec![20, 20], true, MachineType::IlluminaPe);
        assert_eq!(
            ReadEnvironment::from_record(&record).unwrap_err(),
            EnvironmentError::QualityLengthMismatch { bases: 4, qualities: 2 }
        );
    }

    #[test]
    fn test_rejects_quality_outside_probability_range() {
        let err = ReadEnvironment::new(vec![dna::A, dna::C], vec![0.01, f64::NAN]).unwrap_err();
        assert!(matches!(err, EnvironmentError::InvalidQuality { offset: 1, .. }));
        assert!(err.to_string().contains("position 1"));
    }
}
