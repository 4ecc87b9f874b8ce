//! Realignment parameters: calibrated error rates as log-probabilities.
//!
//! Three sources are provided:
//! - [`RealignParamsImplementation`] derives everything from a calibrated
//!   [`MachineErrorParams`] profile
//! - [`RealignParamsGenome`] is a fixed whole-genome default
//! - [`LiteralRealignParams`] is built from literal tables
//!
//! Gap accessors exist only for machines whose reads are split into
//! fragments; every other machine answers them with
//! [`RealignError::Unsupported`].

mod genome;
mod homopolymer;
mod implementation;
mod literal;

use std::fmt;

use thiserror::Error;

pub use genome::RealignParamsGenome;
pub use homopolymer::HomopolymerParams;
pub use implementation::{MachineErrorParams, RealignParamsImplementation};
pub use literal::LiteralRealignParams;

use crate::arithmetic::PossibilityArithmetic;
use crate::RealignError;

/// Sequencing machine an error model was calibrated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MachineType {
    /// Illumina paired-end.
    IlluminaPe,
    /// Illumina single-end.
    IlluminaSe,
    /// Complete Genomics, first-generation gapped reads.
    CompleteGenomics,
    /// Complete Genomics, second-generation gapped reads.
    CompleteGenomics2,
    /// Ion Torrent.
    IonTorrent,
}

impl MachineType {
    /// Whether reads from this machine consist of gapped fragments.
    pub fn is_cg(self) -> bool {
        matches!(self, MachineType::CompleteGenomics | MachineType::CompleteGenomics2)
    }
}

impl fmt::Display for MachineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Category of the gap between two read fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GapCategory {
    /// Fragments overlap on the template (negative gap).
    Overlap,
    /// Short gap.
    Small,
    /// Long gap.
    Large,
}

impl GapCategory {
    /// All categories in table order.
    pub const ALL: [GapCategory; 3] =
        [GapCategory::Overlap, GapCategory::Small, GapCategory::Large];

    /// Table index of the category.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for GapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Errors raised while loading or validating calibration data.
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Line with fewer than two fields
    #[error("malformed calibration line {line_number}: '{line}'")]
    MalformedLine {
        /// 1-based line number
        line_number: usize,
        /// Offending line text
        line: String,
    },

    /// Line whose tag is not in the vocabulary
    #[error("unknown tag on calibration line {line_number}: '{line}'")]
    UnknownTag {
        /// 1-based line number
        line_number: usize,
        /// Offending line text
        line: String,
    },

    /// Line with a length or count that is not a non-negative number
    #[error("invalid number on calibration line {line_number}: '{line}'")]
    InvalidCount {
        /// 1-based line number
        line_number: usize,
        /// Offending line text
        line: String,
    },

    /// Rate outside `[0, 1)`
    #[error("rate {name} = {value} is outside [0, 1)")]
    InvalidRate {
        /// Rate name
        name: &'static str,
        /// Supplied value
        value: f64,
    },

    /// Length distribution with no mass
    #[error("{0} distribution is empty or has no positive mass")]
    EmptyDistribution(&'static str),

    /// Gapped machine without a distribution for a category
    #[error("missing gap distribution for category {0}")]
    MissingGapDistribution(GapCategory),

    /// Failure reading calibration input
    #[error("failed to read calibration data: {0}")]
    Io(#[from] std::io::Error),
}

/// Error model consumed by the matrices.
pub trait RealignParams: fmt::Debug + Send + Sync {
    /// Log probability that a base is read correctly.
    fn match_ln(&self) -> f64;

    /// Log aggregate mismatch rate.
    fn mismatch_ln(&self) -> f64;

    /// Log probability of opening an insertion.
    fn insert_open_ln(&self) -> f64;

    /// Log probability of extending an insertion.
    fn insert_extend_ln(&self) -> f64;

    /// Log probability of opening a deletion.
    fn delete_open_ln(&self) -> f64;

    /// Log probability of extending a deletion.
    fn delete_extend_ln(&self) -> f64;

    /// Machine the parameters describe.
    fn machine_type(&self) -> MachineType;

    /// Smallest gap length of a category.
    fn gap_start(&self, _category: GapCategory) -> Result<i32, RealignError> {
        Err(unsupported("gap_start", self.machine_type()))
    }

    /// Largest gap length of a category.
    fn gap_end(&self, _category: GapCategory) -> Result<i32, RealignError> {
        Err(unsupported("gap_end", self.machine_type()))
    }

    /// Log frequency of a gap length within a category.
    fn gap_freq_ln(&self, _category: GapCategory, _length: i32) -> Result<f64, RealignError> {
        Err(unsupported("gap_freq_ln", self.machine_type()))
    }

    /// Frequencies for `gap_start..=gap_end` converted into `arith`.
    fn gap_distribution_poss(
        &self,
        category: GapCategory,
        arith: &dyn PossibilityArithmetic,
    ) -> Result<Vec<f64>, RealignError> {
        let start = self.gap_start(category)?;
        let end = self.gap_end(category)?;
        (start..=end)
            .map(|length| Ok(arith.ln2poss(self.gap_freq_ln(category, length)?)))
            .collect()
    }

    /// Most frequent gap length of a category (the smallest on ties).
    fn gap_mode(&self, category: GapCategory) -> Result<i32, RealignError> {
        let start = self.gap_start(category)?;
        let end = self.gap_end(category)?;
        let mut best = (start, f64::NEG_INFINITY);
        for length in start..=end {
            let freq = self.gap_freq_ln(category, length)?;
            if freq > best.1 {
                best = (length, freq);
            }
        }
        Ok(best.0)
    }
}

pub(crate) fn unsupported(operation: &'static str, machine: MachineType) -> RealignError {
    RealignError::Unsupported { operation, machine }
}

pub(crate) fn rate_ln(name: &'static str, value: f64) -> Result<f64, CalibrationError> {
    if !(0.0..1.0).contains(&value) {
        return Err(CalibrationError::InvalidRate { name, value });
    }
    Ok(value.ln())
}

/// Discrete distribution of gap lengths for one category.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GapDistribution {
    /// Category described.
    pub category: GapCategory,
    /// Gap length of the first frequency.
    pub start: i32,
    /// Relative frequencies for `start, start + 1, ...`.
    pub frequencies: Vec<f64>,
}

impl GapDistribution {
    /// Construct a distribution.
    pub fn new(category: GapCategory, start: i32, frequencies: Vec<f64>) -> Self {
        Self {
            category,
            start,
            frequencies,
        }
    }

    /// Gap length of the last frequency.
    pub fn end(&self) -> i32 {
        self.start + self.frequencies.len() as i32 - 1
    }
}

/// Normalised log-frequency tables indexed by [`GapCategory::index`].
#[derive(Debug, Clone, Default)]
pub(crate) struct GapTables {
    tables: [Option<(i32, Vec<f64>)>; 3],
}

impl GapTables {
    pub(crate) fn insert(
        &mut self,
        distribution: &GapDistribution,
    ) -> Result<(), CalibrationError> {
        let total: f64 = distribution.frequencies.iter().sum();
        if distribution.frequencies.iter().any(|&f| f < 0.0 || !f.is_finite()) || total <= 0.0 {
            return Err(CalibrationError::EmptyDistribution("gap length"));
        }
        let ln = distribution
            .frequencies
            .iter()
            .map(|&f| (f / total).ln())
            .collect();
        self.tables[distribution.category.index()] = Some((distribution.start, ln));
        Ok(())
    }

    pub(crate) fn contains(&self, category: GapCategory) -> bool {
        self.tables[category.index()].is_some()
    }

    fn table(
        &self,
        category: GapCategory,
        operation: &'static str,
        machine: MachineType,
    ) -> Result<&(i32, Vec<f64>), RealignError> {
        self.tables[category.index()]
            .as_ref()
            .ok_or_else(|| unsupported(operation, machine))
    }

    pub(crate) fn start(
        &self,
        category: GapCategory,
        machine: MachineType,
    ) -> Result<i32, RealignError> {
        Ok(self.table(category, "gap_start", machine)?.0)
    }

    pub(crate) fn end(
        &self,
        category: GapCategory,
        machine: MachineType,
    ) -> Result<i32, RealignError> {
        let (start, ln) = self.table(category, "gap_end", machine)?;
        Ok(start + ln.len() as i32 - 1)
    }

    pub(crate) fn freq_ln(
        &self,
        category: GapCategory,
        length: i32,
        machine: MachineType,
    ) -> Result<f64, RealignError> {
        let (start, ln) = self.table(category, "gap_freq_ln", machine)?;
        let offset = length - start;
        if offset < 0 {
            return Ok(f64::NEG_INFINITY);
        }
        Ok(ln.get(offset as usize).copied().unwrap_or(f64::NEG_INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::{LogPossibility, SimplePossibility};

    #[test]
    fn test_genome_params_reject_gap_queries() {
        let params = RealignParamsGenome::new();
        for category in GapCategory::ALL {
            assert!(matches!(
                params.gap_start(category),
                Err(RealignError::Unsupported { operation: "gap_start", .. })
            ));
            assert!(params.gap_end(category).is_err());
            assert!(params.gap_freq_ln(category, 0).is_err());
            assert!(params.gap_distribution_poss(category, &LogPossibility).is_err());
        }
    }

    #[test]
    fn test_gap_distribution_in_linear_domain_sums_to_one() {
        let params = LiteralRealignParams::cg_v1().unwrap();
        for category in GapCategory::ALL {
            let dist = params.gap_distribution_poss(category, &SimplePossibility).unwrap();
            let span = params.gap_end(category).unwrap() - params.gap_start(category).unwrap() + 1;
            assert_eq!(dist.len(), span as usize);
            assert!((dist.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gap_modes() {
        let params = LiteralRealignParams::cg_v1().unwrap();
        assert_eq!(params.gap_mode(GapCategory::Overlap).unwrap(), -2);
        assert_eq!(params.gap_mode(GapCategory::Small).unwrap(), 0);
        assert_eq!(params.gap_mode(GapCategory::Large).unwrap(), 6);
    }

    #[test]
    fn test_freq_outside_range_is_impossible() {
        let params = LiteralRealignParams::cg_v2().unwrap();
        assert_eq!(params.gap_freq_ln(GapCategory::Small, 3).unwrap(), f64::NEG_INFINITY);
        assert_eq!(params.gap_freq_ln(GapCategory::Small, -1).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_rate_validation() {
        assert!(rate_ln("mismatch", 0.5).is_ok());
        assert!(matches!(
            rate_ln("mismatch", 1.0),
            Err(CalibrationError::InvalidRate { name: "mismatch", .. })
        ));
        assert!(rate_ln("mismatch", -0.1).is_err());
    }
}
