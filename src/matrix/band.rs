//! Banded forward kernel shared by every matrix.
//!
//! Cells are stored row-major in three flat buffers (match, insert, delete)
//! that only ever grow. Row `i` covers template offsets
//! `offset(i)..offset(i) + width`; row 0 is the free start state and row `i`
//! consumes read base `i - 1`.

use std::fmt;

use tracing::trace;

use crate::arithmetic::PossibilityArithmetic;
use crate::config::MatrixConfig;
use crate::dna;
use crate::environment::Environment;
use crate::params::{MachineType, RealignParams};
use crate::RealignError;

/// Error model in linear probabilities.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransitionModel {
    pub(crate) machine: MachineType,
    pub(crate) mismatch: f64,
    pub(crate) insert_open: f64,
    pub(crate) insert_extend: f64,
    pub(crate) delete_open: f64,
    pub(crate) delete_extend: f64,
}

impl TransitionModel {
    pub(crate) fn from_params<P: RealignParams + ?Sized>(params: &P) -> Self {
        Self {
            machine: params.machine_type(),
            mismatch: params.mismatch_ln().exp(),
            insert_open: params.insert_open_ln().exp(),
            insert_extend: params.insert_extend_ln().exp(),
            delete_open: params.delete_open_ln().exp(),
            delete_extend: params.delete_extend_ln().exp(),
        }
    }

    /// Per-base error combining the read quality and the machine mismatch rate.
    #[inline]
    fn error(&self, quality: f64) -> f64 {
        quality + self.mismatch - 4.0 / 3.0 * quality * self.mismatch
    }
}

/// Transition model converted into the arithmetic domain.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Transitions {
    pub(crate) match_from_match: f64,
    pub(crate) match_from_insert: f64,
    pub(crate) match_from_delete: f64,
    pub(crate) insert_open: f64,
    pub(crate) insert_extend: f64,
    pub(crate) delete_open: f64,
    pub(crate) delete_extend: f64,
    pub(crate) quarter: f64,
}

impl Transitions {
    fn new<A: PossibilityArithmetic>(arith: &A, model: &TransitionModel) -> Self {
        Self {
            match_from_match: arith.prob2poss(1.0 - model.insert_open - model.delete_open),
            match_from_insert: arith.prob2poss(1.0 - model.insert_extend),
            match_from_delete: arith.prob2poss(1.0 - model.delete_extend),
            insert_open: arith.prob2poss(model.insert_open),
            insert_extend: arith.prob2poss(model.insert_extend),
            delete_open: arith.prob2poss(model.delete_open),
            delete_extend: arith.prob2poss(model.delete_extend),
            quarter: arith.prob2poss(0.25),
        }
    }
}

/// Row at which a later read fragment starts, with its gap distribution.
#[derive(Debug, Clone)]
pub(crate) struct Boundary {
    pub(crate) row: usize,
    pub(crate) start: i32,
    pub(crate) mode: i32,
    pub(crate) frequencies: Vec<f64>,
}

/// Fragment structure of the read; empty for contiguous reads.
#[derive(Debug, Clone, Default)]
pub(crate) struct Topology {
    pub(crate) boundaries: Vec<Boundary>,
}

impl Topology {
    #[inline]
    fn boundary(&self, row: usize) -> Option<&Boundary> {
        self.boundaries.iter().find(|b| b.row == row)
    }

    /// Sum of the modal gap lengths.
    pub(crate) fn expected_gap(&self) -> isize {
        self.boundaries.iter().map(|b| b.mode as isize).sum()
    }
}

/// Forward all-paths kernel.
#[derive(Debug, Clone)]
pub(crate) struct Band<A> {
    arith: A,
    config: MatrixConfig,
    pub(crate) model: TransitionModel,
    pub(crate) poss: Transitions,
    rows: usize,
    width: usize,
    offsets: Vec<isize>,
    matches: Vec<f64>,
    inserts: Vec<f64>,
    deletes: Vec<f64>,
    total: f64,
    underflow: bool,
    allocations: usize,
}

impl<A: PossibilityArithmetic + Default + Copy> Band<A> {
    pub(crate) fn new(model: TransitionModel, config: MatrixConfig) -> Self {
        let arith = A::default();
        Self {
            arith,
            config,
            model,
            poss: Transitions::new(&arith, &model),
            rows: 0,
            width: 0,
            offsets: Vec::new(),
            matches: Vec::new(),
            inserts: Vec::new(),
            deletes: Vec::new(),
            total: arith.zero(),
            underflow: false,
            allocations: 0,
        }
    }

    #[inline]
    pub(crate) fn arith(&self) -> &A {
        &self.arith
    }

    /// Number of read bases of the last population.
    #[inline]
    pub(crate) fn length(&self) -> usize {
        self.rows.saturating_sub(1)
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub(crate) fn offset(&self, row: usize) -> isize {
        self.offsets[row]
    }

    #[inline]
    pub(crate) fn total(&self) -> f64 {
        self.total
    }

    #[inline]
    pub(crate) fn underflow(&self) -> bool {
        self.underflow
    }

    #[inline]
    pub(crate) fn allocations(&self) -> usize {
        self.allocations
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    fn in_band(&self, col: isize) -> Option<usize> {
        (col >= 0 && (col as usize) < self.width).then_some(col as usize)
    }

    #[inline]
    pub(crate) fn match_poss(&self, row: usize, col: usize) -> f64 {
        self.matches[self.index(row, col)]
    }

    #[inline]
    pub(crate) fn insert_poss(&self, row: usize, col: usize) -> f64 {
        self.inserts[self.index(row, col)]
    }

    #[inline]
    pub(crate) fn delete_poss(&self, row: usize, col: usize) -> f64 {
        self.deletes[self.index(row, col)]
    }

    /// Weight leaving cell `(row, col)` into a match on the next row.
    #[inline]
    pub(crate) fn entry(&self, row: usize, col: usize) -> f64 {
        let a = &self.arith;
        let idx = self.index(row, col);
        let p = &self.poss;
        a.add(
            a.add(
                a.multiply(self.matches[idx], p.match_from_match),
                a.multiply(self.inserts[idx], p.match_from_insert),
            ),
            a.multiply(self.deletes[idx], p.match_from_delete),
        )
    }

    /// Emission possibilities `(same base, different base)` for a quality.
    #[inline]
    pub(crate) fn emissions(&self, quality: f64) -> (f64, f64) {
        let err = self.model.error(quality);
        (self.arith.prob2poss(1.0 - err), self.arith.prob2poss(err / 3.0))
    }

    #[inline]
    pub(crate) fn emission(&self, read: u8, template: u8, same: f64, diff: f64) -> f64 {
        if read == dna::N || template == dna::N {
            self.poss.quarter
        } else if read == template {
            same
        } else {
            diff
        }
    }

    fn resize(&mut self, rows: usize, width: usize) {
        let cells = rows * width;
        if cells > self.matches.len() || rows > self.offsets.len() {
            let zero = self.arith.zero();
            let capacity = cells.max(self.matches.len());
            self.matches = vec![zero; capacity];
            self.inserts = vec![zero; capacity];
            self.deletes = vec![zero; capacity];
            self.offsets = vec![0; rows.max(self.offsets.len())];
            self.allocations += 1;
            trace!(rows, width, capacity, "allocated matrix buffers");
        }
        self.rows = rows;
        self.width = width;
    }

    /// Populate the band for `env`.
    ///
    /// `hook` may replace the match entry of any cell outside a fragment
    /// boundary row; it sees every earlier row fully populated.
    pub(crate) fn populate<E, H>(
        &mut self,
        env: &E,
        topology: &Topology,
        mut hook: H,
    ) -> Result<(), RealignError>
    where
        E: Environment + ?Sized,
        H: FnMut(&Self, &E, usize, usize, isize) -> Option<f64>,
    {
        let n = env.read_length();
        let max_shift = env.max_shift();
        let width = max_shift.saturating_mul(2).saturating_add(1);
        self.config.check(n, width)?;
        self.resize(n + 1, width);

        let a = self.arith;
        let zero = a.zero();
        let p = self.poss;

        self.offsets[0] = -1 - max_shift as isize;
        for i in 1..=n {
            let jump = topology.boundary(i).map_or(0, |b| b.mode as isize);
            self.offsets[i] = self.offsets[i - 1] + 1 + jump;
        }

        let start_match = a.prob2poss((1.0 - self.model.delete_open) / width as f64);
        let start_delete = a.prob2poss(self.model.delete_open / width as f64);
        for j in 0..width {
            self.matches[j] = start_match;
            self.deletes[j] = start_delete;
            self.inserts[j] = zero;
        }

        self.underflow = false;
        let mut first_underflow = None;
        for i in 1..=n {
            let read = env.read(i - 1);
            let (same, diff) = self.emissions(env.quality(i - 1));
            let delta = self.offsets[i] - self.offsets[i - 1];
            let boundary = topology.boundary(i);
            let mut row_max = zero;
            for j in 0..width {
                let t = self.offsets[i] + j as isize;
                let e = self.emission(read, env.template(t), same, diff);
                let (m, ins) = match boundary {
                    Some(b) => {
                        let mut acc = zero;
                        for (k, &f) in b.frequencies.iter().enumerate() {
                            let gap = b.start as isize + k as isize;
                            if let Some(jp) = self.in_band(j as isize + delta - 1 - gap) {
                                acc = a.add(acc, a.multiply(f, self.entry(i - 1, jp)));
                            }
                        }
                        (a.multiply(e, acc), zero)
                    }
                    None => {
                        let mut m = match self.in_band(j as isize + delta - 1) {
                            Some(jp) => a.multiply(e, self.entry(i - 1, jp)),
                            None => zero,
                        };
                        if let Some(replaced) = hook(self, env, i, j, t) {
                            m = replaced;
                        }
                        let ins = match self.in_band(j as isize + delta) {
                            Some(jq) => {
                                let prev = self.index(i - 1, jq);
                                a.multiply(
                                    p.quarter,
                                    a.add(
                                        a.multiply(self.matches[prev], p.insert_open),
                                        a.multiply(self.inserts[prev], p.insert_extend),
                                    ),
                                )
                            }
                            None => zero,
                        };
                        (m, ins)
                    }
                };
                let idx = self.index(i, j);
                let del = if j == 0 {
                    zero
                } else {
                    a.add(
                        a.multiply(self.matches[idx - 1], p.delete_open),
                        a.multiply(self.deletes[idx - 1], p.delete_extend),
                    )
                };
                self.matches[idx] = m;
                self.inserts[idx] = ins;
                self.deletes[idx] = del;
                for v in [m, ins, del] {
                    if a.gt(v, row_max) {
                        row_max = v;
                    }
                }
            }
            if a.underflow(row_max) {
                self.underflow = true;
                first_underflow.get_or_insert(i);
            }
        }

        let mut total = zero;
        for j in 0..width {
            let idx = self.index(n, j);
            total = a.add(total, a.add(self.matches[idx], self.deletes[idx]));
        }
        self.total = total;
        if let Some(row) = first_underflow {
            trace!(row, read_length = n, width, "matrix values underflowed");
        }

        #[cfg(debug_assertions)]
        self.check_integrity();
        Ok(())
    }

    /// `ln` of the share of total weight whose last template offset is
    /// strictly greater than `index`.
    pub(crate) fn ends_after_ln(&self, index: isize) -> f64 {
        let a = &self.arith;
        if self.rows == 0 || a.is_zero(self.total) {
            return f64::NEG_INFINITY;
        }
        let n = self.rows - 1;
        let mut acc = a.zero();
        for j in 0..self.width {
            if self.offsets[n] + j as isize > index {
                let idx = self.index(n, j);
                acc = a.add(acc, a.add(self.matches[idx], self.deletes[idx]));
            }
        }
        a.poss2ln(a.divide(acc, self.total))
    }

    #[cfg(debug_assertions)]
    fn check_integrity(&self) {
        let a = &self.arith;
        for idx in 0..self.rows * self.width {
            debug_assert!(
                a.is_valid(self.matches[idx])
                    && a.is_valid(self.inserts[idx])
                    && a.is_valid(self.deletes[idx]),
                "invalid cell {idx}"
            );
        }
        debug_assert!(a.is_valid(self.total), "invalid total");
    }
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for Band<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.arith;
        writeln!(f, "AllPaths length={} width={}", self.length(), self.width)?;
        for row in 0..self.rows {
            write!(f, "{:>4} {:>5} |", row, self.offsets[row])?;
            for col in 0..self.width {
                write!(
                    f,
                    " {:>8.3}{:>8.3}{:>8.3}",
                    a.poss2ln(self.delete_poss(row, col)),
                    a.poss2ln(self.match_poss(row, col)),
                    a.poss2ln(self.insert_poss(row, col)),
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f, "total {:.6}", a.poss2ln(self.total))
    }
}
