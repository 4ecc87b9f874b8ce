use std::fmt;

use super::band::{Band, Boundary, Topology, TransitionModel};
use super::AllPaths;
use crate::arithmetic::PossibilityArithmetic;
use crate::config::MatrixConfig;
use crate::environment::{Environment, InvertedEnvironment};
use crate::params::{unsupported, GapCategory, RealignParams};
use crate::RealignError;

/// Fragment lengths of a gapped read and the gap category between each pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CgLayout {
    fragments: [usize; 4],
    gaps: [GapCategory; 3],
}

impl CgLayout {
    /// Layout shared by both Complete Genomics generations: 5 bases, an
    /// overlap, then three 10-base fragments separated by a small and a
    /// large gap.
    pub const STANDARD: CgLayout = CgLayout {
        fragments: [5, 10, 10, 10],
        gaps: [GapCategory::Overlap, GapCategory::Small, GapCategory::Large],
    };

    /// Custom layout.
    pub fn new(fragments: [usize; 4], gaps: [GapCategory; 3]) -> Self {
        Self { fragments, gaps }
    }

    /// Fragment lengths in read order.
    pub fn fragments(&self) -> &[usize; 4] {
        &self.fragments
    }

    /// Gap categories in read order.
    pub fn gaps(&self) -> &[GapCategory; 3] {
        &self.gaps
    }

    /// Total read length.
    pub fn read_length(&self) -> usize {
        self.fragments.iter().sum()
    }

    /// The same layout read from the other end.
    pub fn reversed(&self) -> Self {
        let mut fragments = self.fragments;
        let mut gaps = self.gaps;
        fragments.reverse();
        gaps.reverse();
        Self { fragments, gaps }
    }

    /// Matrix rows (1-based read positions) that start a later fragment.
    pub fn boundary_rows(&self) -> [(usize, GapCategory); 3] {
        let mut rows = [(0, GapCategory::Overlap); 3];
        let mut consumed = 0;
        for (k, slot) in rows.iter_mut().enumerate() {
            consumed += self.fragments[k];
            *slot = (consumed + 1, self.gaps[k]);
        }
        rows
    }

    fn topology<A, P>(&self, params: &P, arith: &A) -> Result<Topology, RealignError>
    where
        A: PossibilityArithmetic,
        P: RealignParams + ?Sized,
    {
        let boundaries = self
            .boundary_rows()
            .iter()
            .map(|&(row, category)| {
                Ok(Boundary {
                    row,
                    start: params.gap_start(category)?,
                    mode: params.gap_mode(category)?,
                    frequencies: params.gap_distribution_poss(category, arith)?,
                })
            })
            .collect::<Result<Vec<_>, RealignError>>()?;
        Ok(Topology { boundaries })
    }

    fn check(&self, read_length: usize) -> Result<(), RealignError> {
        if read_length != self.read_length() {
            return Err(RealignError::LayoutMismatch {
                expected: self.read_length(),
                actual: read_length,
            });
        }
        Ok(())
    }
}

/// Matrix for gapped reads.
///
/// At the first row of each later fragment the match entry sums over every
/// gap length of the category, weighted by its frequency, and the band jumps
/// by the modal gap so the expected path stays centred.
#[derive(Debug, Clone)]
pub struct ScoreMatrixCg<A: PossibilityArithmetic> {
    band: Band<A>,
    layout: CgLayout,
    topology: Topology,
}

impl<A: PossibilityArithmetic + Default + Copy> ScoreMatrixCg<A> {
    /// Matrix for [`CgLayout::STANDARD`]; fails if `params` has no gap tables.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Result<Self, RealignError> {
        Self::with_layout(params, CgLayout::STANDARD, MatrixConfig::new())
    }

    /// Matrix for an explicit layout and configuration.
    pub fn with_layout<P: RealignParams + ?Sized>(
        params: &P,
        layout: CgLayout,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        config.validate()?;
        let band = Band::new(TransitionModel::from_params(params), config);
        let topology = layout.topology(params, band.arith())?;
        Ok(Self {
            band,
            layout,
            topology,
        })
    }

    /// Layout the matrix expects.
    pub fn layout(&self) -> &CgLayout {
        &self.layout
    }
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for ScoreMatrixCg<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        self.layout.check(env.read_length())?;
        self.band.populate(env, &self.topology, |_, _, _, _, _| None)
    }

    fn read_starts_before_ln(&self, _index: isize) -> Result<f64, RealignError> {
        Err(unsupported("read_starts_before_ln", self.band.model.machine))
    }

    fn read_ends_after_ln(&self, index: isize) -> Result<f64, RealignError> {
        Ok(self.band.ends_after_ln(index))
    }

    delegate_band!();
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for ScoreMatrixCg<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.band, f)
    }
}

/// Gapped-read matrix walked from the end of the read.
///
/// The read and template are reflected about `read length + expected gap`,
/// and the layout is reversed, so the walk starts at the last fragment.
#[derive(Debug, Clone)]
pub struct ScoreMatrixCgReverse<A: PossibilityArithmetic> {
    band: Band<A>,
    layout: CgLayout,
    topology: Topology,
    pivot: isize,
}

impl<A: PossibilityArithmetic + Default + Copy> ScoreMatrixCgReverse<A> {
    /// Matrix for [`CgLayout::STANDARD`]; fails if `params` has no gap tables.
    pub fn new<P: RealignParams + ?Sized>(params: &P) -> Result<Self, RealignError> {
        Self::with_layout(params, CgLayout::STANDARD, MatrixConfig::new())
    }

    /// Matrix for an explicit (forward-order) layout and configuration.
    pub fn with_layout<P: RealignParams + ?Sized>(
        params: &P,
        layout: CgLayout,
        config: MatrixConfig,
    ) -> Result<Self, RealignError> {
        config.validate()?;
        let band = Band::new(TransitionModel::from_params(params), config);
        let topology = layout.reversed().topology(params, band.arith())?;
        Ok(Self {
            band,
            layout,
            topology,
            pivot: 0,
        })
    }

    /// Reflection pivot of the last population.
    pub fn pivot(&self) -> isize {
        self.pivot
    }
}

impl<A: PossibilityArithmetic + Default + Copy> AllPaths for ScoreMatrixCgReverse<A> {
    fn set_env<E: Environment + ?Sized>(&mut self, env: &E) -> Result<(), RealignError> {
        self.layout.check(env.read_length())?;
        self.pivot = env.read_length() as isize + self.topology.expected_gap();
        let inverted = InvertedEnvironment::with_pivot(env, self.pivot);
        self.band.populate(&inverted, &self.topology, |_, _, _, _, _| None)
    }

    fn read_starts_before_ln(&self, index: isize) -> Result<f64, RealignError> {
        Ok(self.band.ends_after_ln(self.pivot - 1 - index))
    }

    fn read_ends_after_ln(&self, _index: isize) -> Result<f64, RealignError> {
        Err(unsupported("read_ends_after_ln", self.band.model.machine))
    }

    delegate_band!();
}

impl<A: PossibilityArithmetic + Default + Copy> fmt::Display for ScoreMatrixCgReverse<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.band, f)
    }
}
