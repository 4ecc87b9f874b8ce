//! # Probabilistic Banded Realignment
//!
//! This library scores a sequencing read against a window of reference
//! template by summing over *all* alignment paths inside a diagonal band,
//! under an explicit match/insert/delete error model.
//!
//! ## Core Components
//!
//! 1. **Possibility arithmetic**: interchangeable numeric domains (exact
//!    log, approximate log, linear) behind [`arithmetic::PossibilityArithmetic`]
//! 2. **Environments**: read/template windows and the views layered on them
//!    (subread, substitution, inversion, homopolymer runs, CG splicing)
//! 3. **Realignment parameters**: calibrated machine error profiles turned
//!    into the transition probabilities the recurrence consumes
//! 4. **All-paths matrices**: the standard, CG-gapped and homopolymer-aware
//!    forward engines, underflow-safe wrappers and the posterior matrix
//!
//! ## Usage Example
//!
//! ```
//! use realign::arithmetic::LogPossibility;
//! use realign::environment::EnvironmentImplementation;
//! use realign::matrix::{AllPaths, ScoreMatrix};
//! use realign::params::RealignParamsGenome;
//!
//! let env = EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, "ACGCGACG", 0.01)?;
//! let mut matrix = ScoreMatrix::<LogPossibility>::new(&RealignParamsGenome::new());
//! matrix.set_env(&env)?;
//! assert!(matrix.total_score_ln() < 0.0);
//! # Ok::<(), realign::RealignError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod arithmetic;  // Possibility domains
pub mod config;      // Matrix sizing limits
pub mod dna;         // Base encoding
pub mod environment; // Read/template windows
pub mod matrix;      // All-paths DP engines
pub mod params;      // Machine error models
pub mod record;      // Upstream alignment records

pub use arithmetic::{
    ArithmeticKind, LogApproximatePossibility, LogPossibility, PossibilityArithmetic,
    SimplePossibility,
};
pub use config::MatrixConfig;
pub use environment::{Environment, EnvironmentError, EnvironmentImplementation};
pub use matrix::{
    AllPaths, DeltaMatrix, FastUnderflow, ScoreFastUnderflow, ScoreFastUnderflowCg,
    ScoreFastUnderflowHomopolymer, ScoreMatrix, ScoreMatrixCg, ScoreMatrixCgReverse,
    ScoreMatrixHomopolymer, ScoreMatrixReverse,
};
pub use params::{
    CalibrationError, GapCategory, HomopolymerParams, MachineType, RealignParams,
    RealignParamsGenome, RealignParamsImplementation,
};
pub use record::AlignmentRecord;

use thiserror::Error;

/// Errors raised while configuring or populating a realignment matrix.
///
/// Every variant is local to one read: nothing shared between matrices is
/// left in a modified state when one of these is returned.
#[derive(Error, Debug)]
pub enum RealignError {
    /// Operation not provided by the parameters or matrix in use
    #[error("{operation} is not supported for machine type {machine}")]
    Unsupported {
        /// Name of the rejected operation
        operation: &'static str,
        /// Machine the parameters were calibrated for
        machine: MachineType,
    },

    /// Band would exceed the configured maximum width
    #[error("band width {width} exceeds configured maximum {max}")]
    BandTooWide {
        /// Requested band width `2 * max_shift + 1`
        width: usize,
        /// Configured maximum
        max: usize,
    },

    /// Read would exceed the configured maximum length
    #[error("read length {length} exceeds configured maximum {max}")]
    ReadTooLong {
        /// Requested read length
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Read contains no bases
    #[error("cannot realign an empty read")]
    EmptyRead,

    /// Read length does not fit the fragment layout of the matrix
    #[error("read length {actual} does not match fragment layout length {expected}")]
    LayoutMismatch {
        /// Length required by the layout
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// Invalid matrix configuration
    #[error("invalid matrix configuration: {0}")]
    InvalidConfiguration(String),

    /// Environment construction failed
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// Calibration data was rejected
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}
