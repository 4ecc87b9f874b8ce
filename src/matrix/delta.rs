use std::fmt;
use std::fmt::Write as _;

use tracing::trace;

use super::{AllPaths, ScoreMatrix};
use crate::arithmetic::PossibilityArithmetic;
use crate::config::MatrixConfig;
use crate::environment::Environment;
use crate::params::RealignParams;
use crate::RealignError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Match,
    Insert,
    Delete,
}

impl State {
    fn letter(self) -> char {
        match self {
            State::Match => 'M',
            State::Insert => 'I',
            State::Delete => 'D',
        }
    }
}

/// Forward matrix plus the matching backward pass.
///
/// `posterior_*(row, col)` is the share of the total weight carried by paths
/// that visit that cell in that state. Every path visits exactly one match or
/// insert cell per read base, so each row from 1 on sums to one over those
/// two states; row 0 sums to one over match and delete.
#[derive(Debug, Clone)]
pub struct DeltaMatrix<A: PossibilityArithmetic> {
    forward: ScoreMatrix<A>,
    back_match: Vec<f64>,
    back_insert: Vec<f64>,
    back_delete: Vec<f64>,
    allocations: usize,
}

impl<A: PossibilityArithmetic + Default + Copy> DeltaMatrix<A> {
    /// Matrix with the default configuration.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Self {
        Self::from_forward(ScoreMatrix::new(params))
    }

    /// Matrix with explicit sizing limits.
    pub fn with_config<P: RealignParams + ?Sized>(
        params: &P,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        Ok(Self::from_forward(ScoreMatrix::with_config(params, config)?))
    }

    fn from_forward(forward: ScoreMatrix<A>) -> Self {
        Self {
            forward,
            back_match: Vec::new(),
            back_insert: Vec::new(),
            back_delete: Vec::new(),
            allocations: 0,
        }
    }

    /// The forward matrix the posteriors were computed from.
    pub fn forward(&self) -> &ScoreMatrix<A> {
        &self.forward
    }

    fn backward<E: Environment + ?Sized>(&mut self, env: &E) {
        let band = self.forward.band();
        let a = *band.arith();
        let p = band.poss;
        let zero = a.zero();
        let one = a.one();
        let n = band.length();
        let width = band.width();
        let cells = (n + 1) * width;
        if cells > self.back_match.len() {
            self.back_match = vec![zero; cells];
            self.back_insert = vec![zero; cells];
            self.back_delete = vec![zero; cells];
            self.allocations += 1;
            trace!(rows = n + 1, width, "allocated backward buffers");
        }
        let idx = |row: usize, col: usize| row * width + col;
        let in_band = |col: isize| (col >= 0 && (col as usize) < width).then_some(col as usize);

        for j in (0..width).rev() {
            let next = if j + 1 < width { self.back_delete[idx(n, j + 1)] } else { zero };
            self.back_match[idx(n, j)] = a.add(one, a.multiply(p.delete_open, next));
            self.back_delete[idx(n, j)] = a.add(one, a.multiply(p.delete_extend, next));
            self.back_insert[idx(n, j)] = zero;
        }

        for i in (0..n).rev() {
            let read = env.read(i);
            let (same, diff) = band.emissions(env.quality(i));
            let delta = band.offset(i + 1) - band.offset(i);
            for j in (0..width).rev() {
                let to_match = match in_band(j as isize + 1 - delta) {
                    Some(jm) => {
                        let t = band.offset(i + 1) + jm as isize;
                        let e = band.emission(read, env.template(t), same, diff);
                        a.multiply(e, self.back_match[idx(i + 1, jm)])
                    }
                    None => zero,
                };
                let to_insert = match in_band(j as isize - delta) {
                    Some(ji) => a.multiply(p.quarter, self.back_insert[idx(i + 1, ji)]),
                    None => zero,
                };
                // row 0 deletes are initial values, not a chain
                let to_delete = if i > 0 && j + 1 < width {
                    self.back_delete[idx(i, j + 1)]
                } else {
                    zero
                };
                self.back_match[idx(i, j)] = a.add(
                    a.add(
                        a.multiply(p.match_from_match, to_match),
                        a.multiply(p.insert_open, to_insert),
                    ),
                    a.multiply(p.delete_open, to_delete),
                );
                self.back_insert[idx(i, j)] = a.add(
                    a.multiply(p.match_from_insert, to_match),
                    a.multiply(p.insert_extend, to_insert),
                );
                self.back_delete[idx(i, j)] = a.add(
                    a.multiply(p.match_from_delete, to_match),
                    a.multiply(p.delete_extend, to_delete),
                );
            }
        }
    }

    fn posterior(&self, forward: f64, backward: f64) -> f64 {
        let band = self.forward.band();
        let a = band.arith();
        if a.is_zero(band.total()) {
            return 0.0;
        }
        a.poss2prob(a.divide(a.multiply(forward, backward), band.total()))
    }

    /// Posterior probability of the match state at `(row, col)`.
    pub fn posterior_match(&self, row: usize, col: usize) -> f64 {
        let band = self.forward.band();
        self.posterior(band.match_poss(row, col), self.back_match[row * band.width() + col])
    }

    /// Posterior probability of the insert state at `(row, col)`.
    pub fn posterior_insert(&self, row: usize, col: usize) -> f64 {
        let band = self.forward.band();
        self.posterior(band.insert_poss(row, col), self.back_insert[row * band.width() + col])
    }

    /// Posterior probability of the delete state at `(row, col)`.
    pub fn posterior_delete(&self, row: usize, col: usize) -> f64 {
        let band = self.forward.band();
        self.posterior(band.delete_poss(row, col), self.back_delete[row * band.width() + col])
    }

    fn dominant(&self, row: usize, col: usize) -> (State, f64) {
        let mut best = (State::Match, self.posterior_match(row, col));
        for (state, p) in [
            (State::Insert, self.posterior_insert(row, col)),
            (State::Delete, self.posterior_delete(row, col)),
        ] {
            if p > best.1 {
                best = (state, p);
            }
        }
        best
    }

    /// One digit per cell, each row shifted to its template offset.
    ///
    /// The digit is the dominant state's posterior times ten, rounded and
    /// capped at 9; `.` marks a cell no path visits.
    pub fn render_terse(&self) -> String {
        let mut out = String::new();
        if self.back_match.is_empty() {
            return out;
        }
        let base = self.forward.row_offset(0);
        for row in 0..=self.forward.length() {
            let indent = (self.forward.row_offset(row) - base).max(0) as usize;
            out.extend(std::iter::repeat(' ').take(indent));
            for col in 0..self.forward.width() {
                let (_, p) = self.dominant(row, col);
                if p <= 0.0 {
                    out.push('.');
                } else {
                    let digit = (p * 10.0).round().min(9.0) as u32;
                    out.push(char::from_digit(digit, 10).unwrap_or('9'));
                }
            }
            out.push('\n');
        }
        out
    }

    /// Dominant state and its posterior to one decimal, per cell.
    pub fn render_dense(&self) -> String {
        let mut out = String::new();
        if self.back_match.is_empty() {
            return out;
        }
        for row in 0..=self.forward.length() {
            let _ = write!(out, "{:>4} {:>5} |", row, self.forward.row_offset(row));
            for col in 0..self.forward.width() {
                let (state, p) = self.dominant(row, col);
                let _ = write!(out, " {}{:.1}", state.letter(), p);
            }
            out.push('\n');
        }
        out
    }
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for DeltaMatrix<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        self.forward.set_env(env)?;
        self.backward(env);
        Ok(())
    }

    fn total_score_ln(&self) -> f64 {
        self.forward.total_score_ln()
    }

    fn read_starts_before_ln(&self, index: isize) -> Result<f64, RealignError> {
        self.forward.read_starts_before_ln(index)
    }

    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError> {
        self.forward.read_ends_after_ln(index)
    }

    fn underflow(&self) -> bool {
        self.forward.underflow()
    }

    fn length(&self) -> usize {
        self.forward.length()
    }

    fn width(&self) -> usize {
        self.forward.width()
    }

    fn row_offset(&self, row: usize) -> isize {
        self.forward.row_offset(row)
    }

    fn match_ln(&self, row: usize, col: usize) -> f64 {
        self.forward.match_ln(row, col)
    }

    fn insert_ln(&self, row: usize, col: usize) -> f64 {
        self.forward.insert_ln(row, col)
    }

    fn delete_ln(&self, row: usize, col: usize) -> f64 {
        self.forward.delete_ln(row, col)
    }

    /// Growth events of the forward and backward buffers together.
    fn allocations(&self) -> usize {
        self.forward.allocations() + self.allocations
    }
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for DeltaMatrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_dense())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::{LogPossibility, SimplePossibility};
    use crate::environment::EnvironmentImplementation;
    use crate::params::{LiteralRealignParams, MachineType};
    use approx::assert_abs_diff_eq;

    fn params() -> LiteralRealignParams {
        LiteralRealignParams::new(MachineType::IlluminaPe, 0.02, 0.003, 0.25, 0.05, 0.2)
    }

    fn populated<A: PossibilityArithmetic + Default + Copy>() -> DeltaMatrix<A> {
        let env =
            EnvironmentImplementation::from_strs(2, "GGACGTACGTTT", 2, "ACGCGACG", 0.01).unwrap();
        let mut matrix = DeltaMatrix::new(&params());
        matrix.set_env(&env).unwrap();
        matrix
    }

    fn assert_rows_normalised<A: PossibilityArithmetic + Default + Copy>(matrix: &DeltaMatrix<A>) {
        let w = matrix.width();
        let first: f64 = (0..w)
            .map(|j| matrix.posterior_match(0, j) + matrix.posterior_delete(0, j))
            .sum();
        assert_abs_diff_eq!(first, 1.0, epsilon = 1e-9);
        for row in 1..=matrix.length() {
            let sum: f64 = (0..w)
                .map(|j| matrix.posterior_match(row, j) + matrix.posterior_insert(row, j))
                .sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rows_sum_to_one() {
        assert_rows_normalised(&populated::<LogPossibility>());
        assert_rows_normalised(&populated::<SimplePossibility>());
    }

    #[test]
    fn test_last_row_covers_end_profile() {
        let matrix = populated::<LogPossibility>();
        let n = matrix.length();
        // a path ending in a cell also visits it
        for k in 4..9 {
            let visited: f64 = (0..matrix.width())
                .filter(|&j| matrix.row_offset(n) + j as isize > k)
                .map(|j| matrix.posterior_match(n, j) + matrix.posterior_delete(n, j))
                .sum();
            assert!(matrix.read_ends_after_ln(k).unwrap().exp() <= visited + 1e-9);
        }
    }

    #[test]
    fn test_renderings() {
        let matrix = populated::<LogPossibility>();
        let terse = matrix.render_terse();
        let lines: Vec<&str> = terse.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0].len(), 5);
        assert!(lines[8].starts_with("        "));
        assert!(lines
            .iter()
            .all(|l| l.trim_start().chars().all(|c| c == '.' || c.is_ascii_digit())));

        let dense = matrix.to_string();
        assert_eq!(dense.lines().count(), 9);
        assert!(dense.lines().nth(8).unwrap().contains('M'));
    }

    #[test]
    fn test_empty_before_population() {
        let matrix = DeltaMatrix::<LogPossibility>::new(&params());
        assert_eq!(matrix.render_terse(), "");
    }
}
