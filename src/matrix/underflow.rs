use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{AllPaths, ScoreMatrix, ScoreMatrixCg, ScoreMatrixHomopolymer};
use crate::arithmetic::{LogPossibility, SimplePossibility};
use crate::environment::Environment;
use crate::params::{HomopolymerParams, RealignParams};
use crate::RealignError;

/// Routes a query to whichever matrix produced the last result.
macro_rules! active {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        if $self.fallback {
            $self.safe.$method($($arg),*)
        } else {
            $self.fast.$method($($arg),*)
        }
    };
}

/// Runs a fast matrix and falls back to a safe one when the fast result
/// underflows.
///
/// Every query is answered by whichever matrix produced the last result;
/// [`AllPaths::underflow`] reports whether that was the fallback.
#[derive(Debug, Clone)]
pub struct FastUnderflow<F, S> {
    fast: F,
    safe: S,
    fallback: bool,
}

/// Linear-domain standard matrix with a log-domain fallback.
pub type ScoreFastUnderflow =
    FastUnderflow<ScoreMatrix<SimplePossibility>, ScoreMatrix<LogPossibility>>;

/// Linear-domain gapped matrix with a log-domain fallback.
pub type ScoreFastUnderflowCg =
    FastUnderflow<ScoreMatrixCg<SimplePossibility>, ScoreMatrixCg<LogPossibility>>;

/// Linear-domain homopolymer matrix with a log-domain fallback.
pub type ScoreFastUnderflowHomopolymer = FastUnderflow<
    ScoreMatrixHomopolymer<SimplePossibility>,
    ScoreMatrixHomopolymer<LogPossibility>,
>;

impl<F: AllPaths, S: AllPaths> FastUnderflow<F, S> {
    /// Pair two matrices built from the same parameters.
    pub fn from_parts(fast: F, safe: S) -> Self {
        Self {
            fast,
            safe,
            fallback: false,
        }
    }
}

impl ScoreFastUnderflow {
    /// Standard pair with the default configuration.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Self {
        Self::from_parts(ScoreMatrix::new(params), ScoreMatrix::new(params))
    }
}

impl ScoreFastUnderflowCg {
    /// Gapped pair; fails if `params` has no gap tables.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Result<Self, RealignError> {
        Ok(Self::from_parts(ScoreMatrixCg::new(params)?, ScoreMatrixCg::new(params)?))
    }
}

impl ScoreFastUnderflowHomopolymer {
    /// Homopolymer pair sharing one calibration.
    pub fn new<P: RealignParams + ?Sized>(params: &P, calibration: Arc<HomopolymerParams>) -> Self {
        Self::from_parts(
            ScoreMatrixHomopolymer::new(params, Arc::clone(&calibration)),
            ScoreMatrixHomopolymer::new(params, calibration),
        )
    }
}

impl<F: AllPaths, S: AllPaths> AllPaths for FastUnderflow<F, S> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        self.fallback = false;
        self.fast.set_env(env)?;
        self.fallback = self.fast.underflow();
        if self.fallback {
            debug!(
                read_length = env.read_length(),
                max_shift = env.max_shift(),
                "fast matrix underflowed, recomputing in log domain"
            );
            self.safe.set_env(env)?;
        }
        Ok(())
    }

    fn total_score_ln(&self) -> f64 {
        active!(self.total_score_ln())
    }

    fn read_starts_before_ln(&self, index: isize) -> Result<f64, RealignError> {
        active!(self.read_starts_before_ln(index))
    }

    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError> {
        active!(self.read_ends_after_ln(index))
    }

    fn underflow(&self) -> bool {
        self.fallback
    }

    fn length(&self) -> usize {
        active!(self.length())
    }

    fn width(&self) -> usize {
        active!(self.width())
    }

    fn row_offset(&self, row: usize) -> isize {
        active!(self.row_offset(row))
    }

    fn match_ln(&self, row: usize, col: usize) -> f64 {
        active!(self.match_ln(row, col))
    }

    fn insert_ln(&self, row: usize, col: usize) -> f64 {
        active!(self.insert_ln(row, col))
    }

    fn delete_ln(&self, row: usize, col: usize) -> f64 {
        active!(self.delete_ln(row, col))
    }

    fn allocations(&self) -> usize {
        self.fast.allocations() + self.safe.allocations()
    }
}

impl<F: AllPaths, S: AllPaths> fmt::Display for FastUnderflow<F, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fallback {
            fmt::Display::fmt(&self.safe, f)
        } else {
            fmt::Display::fmt(&self.fast, f)
        }
    }
}
