//! All-paths dynamic-programming matrices.
//!
//! Every matrix sums the weight of all alignments of the read inside the
//! band, rather than keeping the best one. The forward engines differ only
//! in the read topology they model:
//!
//! | Matrix | Topology |
//! |---|---|
//! | [`ScoreMatrix`], [`ScoreMatrixReverse`] | contiguous read |
//! | [`ScoreMatrixCg`], [`ScoreMatrixCgReverse`] | four fragments separated by gaps |
//! | [`ScoreMatrixHomopolymer`] | contiguous, with calibrated run lengths |
//!
//! [`FastUnderflow`] runs a linear-domain matrix and falls back to the log
//! domain when values underflow. [`DeltaMatrix`] adds the backward pass and
//! exposes per-cell posteriors.
//!
//! Matrices are built once and reused: [`AllPaths::set_env`] only allocates
//! when the read or band outgrows the buffers already held.

/// Delegates the cell-level `AllPaths` queries to a `band` field.
macro_rules! delegate_band {
    () => {
        fn total_score_ln(&self) -> f64 {
            self.band.arith().poss2ln(self.band.total())
        }

        fn underflow(&self) -> bool {
            self.band.underflow()
        }

        fn length(&self) -> usize {
            self.band.length()
        }

        fn width(&self) -> usize {
            self.band.width()
        }

        fn row_offset(&self, row: usize) -> isize {
            self.band.offset(row)
        }

        fn match_ln(&self, row: usize, col: usize) -> f64 {
            self.band.arith().poss2ln(self.band.match_poss(row, col))
        }

        fn insert_ln(&self, row: usize, col: usize) -> f64 {
            self.band.arith().poss2ln(self.band.insert_poss(row, col))
        }

        fn delete_ln(&self, row: usize, col: usize) -> f64 {
            self.band.arith().poss2ln(self.band.delete_poss(row, col))
        }

        fn allocations(&self) -> usize {
            self.band.allocations()
        }
    };
}

mod band;
mod cg;
mod delta;
mod homopolymer;
mod score;
mod underflow;

use std::fmt;

pub use cg::{CgLayout, ScoreMatrixCg, ScoreMatrixCgReverse};
pub use delta::DeltaMatrix;
pub use homopolymer::ScoreMatrixHomopolymer;
pub use score::{ScoreMatrix, ScoreMatrixReverse};
pub use underflow::{
    FastUnderflow, ScoreFastUnderflow, ScoreFastUnderflowCg, ScoreFastUnderflowHomopolymer,
};

use crate::environment::Environment;
use crate::RealignError;

/// Contract shared by every all-paths matrix.
///
/// `Display` renders every cell as natural logs, one row per line.
pub trait AllPaths: fmt::Display {
    /// Populate the matrix for a new environment, reusing buffers.
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError>;

    /// `ln` of the summed weight of all paths.
    fn total_score_ln(&self) -> f64;

    /// Summed weight of all paths as a probability.
    fn total_score(&self) -> f64 {
        self.total_score_ln().exp()
    }

    /// `ln` of the share of weight whose first template offset is below
    /// `index`; only reverse-oriented matrices provide it.
    fn read_starts_before_ln(&self, index: isize) -> Result<f64, RealignError>;

    /// `ln` of the share of weight whose last template offset is above
    /// `index`; only forward-oriented matrices provide it.
    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError>;

    /// Whether the last population lost precision (or, for the
    /// fast-underflow wrappers, whether the fallback ran).
    fn underflow(&self) -> bool;

    /// Read length of the last population.
    fn length(&self) -> usize;

    /// Band width of the last population.
    fn width(&self) -> usize;

    /// Template offset of column 0 of `row`, in the matrix's walking frame.
    fn row_offset(&self, row: usize) -> isize;

    /// `ln` of the match cell.
    fn match_ln(&self, row: usize, col: usize) -> f64;

    /// `ln` of the insert cell.
    fn insert_ln(&self, row: usize, col: usize) -> f64;

    /// `ln` of the delete cell.
    fn delete_ln(&self, row: usize, col: usize) -> f64;

    /// Number of times the cell buffers were (re)allocated.
    fn allocations(&self) -> usize;
}
